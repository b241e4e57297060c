//! Dead-band position stabilization.
//!
//! The first observed reference coordinate anchors the dead-band for the
//! whole session; it is never recomputed, so the control does not drift away
//! from the user's initial comfortable position.

/// Converts a raw tracked height into a centered, normalized scalar.
#[derive(Debug, Default)]
pub struct PositionStabilizer {
    central_reference: Option<f32>,
}

impl PositionStabilizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The raw offset from the central reference, setting the reference on
    /// the first call.
    pub fn offset(&mut self, y: f32) -> f32 {
        let center = *self.central_reference.get_or_insert(y);
        y - center
    }

    /// Normalized position: 0.5 at center, 0 and 1 at the dead-band edges.
    /// Values outside [0, 1] mean the tracked point left the stable range;
    /// callers clamp at read-out.
    pub fn normalized(&mut self, y: f32, stable_range: f32) -> f32 {
        let offset = self.offset(y);
        ((offset / stable_range) + 1.0) / 2.0
    }

    pub fn central_reference(&self) -> Option<f32> {
        self.central_reference
    }
}
