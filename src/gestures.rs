//! Circle-gesture recognition for manual window scrolling.

use crate::sample::{GestureKind, TrackingSample};

/// Items scrolled per mm of circling tip travel.
const CIRCLE_SCROLL_GAIN: f32 = 0.02;

/// Scans each tick's gesture list for a circle tied to the tracked
/// pointable and turns it into a signed scroll impulse.
#[derive(Debug, Default)]
pub struct CircleDetector;

impl CircleDetector {
    pub fn new() -> Self {
        Self
    }

    /// Signed scroll delta for this tick, or `None` when the tracked
    /// pointable is not circling.
    ///
    /// The impulse scales with the physical tip speed, so faster circling
    /// scrolls linearly faster. Positive means clockwise (`normal.z < 0` by
    /// tracker convention), which scrolls the window forward.
    pub fn scroll_impulse(&self, sample: &TrackingSample, dt: f32) -> Option<f32> {
        let p = sample.pointable.as_ref()?;

        // First matching circle wins; a single pointable cannot register
        // two circle gestures in the source model.
        let circle = sample
            .active_gestures
            .iter()
            .find(|g| g.kind == GestureKind::Circle && g.pointable_ids.contains(&p.id))?;

        let speed = p.tip_velocity.length();
        let magnitude = CIRCLE_SCROLL_GAIN * speed * dt;

        if circle.normal.z < 0.0 {
            Some(magnitude)
        } else {
            Some(-magnitude)
        }
    }
}
