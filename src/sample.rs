//! Per-tick tracking snapshot types.
//!
//! One `TrackingSample` is produced fresh every tick by the tracking source
//! and never mutated by the engine. The serde derives exist so recorded
//! streams can be replayed from JSON (`posepick replay`).

use serde::Deserialize;

/// A 3D position or velocity in tracker coordinates (millimeters, mm/s).
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Euclidean norm.
    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

/// A tracked finger-like object.
#[derive(Debug, Clone, Deserialize)]
pub struct Pointable {
    pub id: i32,
    /// Id of the hand this pointable belongs to, if any.
    #[serde(default)]
    pub hand_id: Option<i32>,
    pub tip_position: Vec3,
    #[serde(default)]
    pub tip_velocity: Vec3,
    /// Whether the finger is extended this tick.
    #[serde(default)]
    pub extended: bool,
    /// Ordered finger number: 0=thumb, 1=index, 2=middle, 3=ring, 4=pinky.
    #[serde(default)]
    pub finger_index: u8,
}

/// A tracked palm-level object.
#[derive(Debug, Clone, Deserialize)]
pub struct HandSnapshot {
    pub id: i32,
    pub palm_position: Vec3,
    #[serde(default)]
    pub pinch_strength: f32,
}

/// Gesture kinds the tracking source can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GestureKind {
    Circle,
    Swipe,
    Tap,
}

/// One active gesture reported by the tracking source this tick.
#[derive(Debug, Clone, Deserialize)]
pub struct GestureEvent {
    pub kind: GestureKind,
    /// Ids of the pointables participating in the gesture.
    #[serde(default)]
    pub pointable_ids: Vec<i32>,
    /// Gesture plane normal; for circles, `z < 0` means clockwise.
    #[serde(default)]
    pub normal: Vec3,
}

/// Everything the engine sees of the outside world for one tick.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrackingSample {
    /// The most stable currently tracked pointable, if any.
    #[serde(default)]
    pub pointable: Option<Pointable>,
    /// The most stable currently tracked hand, if any.
    #[serde(default)]
    pub hand: Option<HandSnapshot>,
    /// All pointables visible this tick (used for finger-extension flags).
    #[serde(default)]
    pub pointables: Vec<Pointable>,
    /// Gestures active this tick.
    #[serde(default)]
    pub active_gestures: Vec<GestureEvent>,
}

/// Supplies one sample per tick. Must not block.
pub trait TrackingSource {
    fn sample(&mut self) -> TrackingSample;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec3_length() {
        let v = Vec3::new(3.0, 4.0, 0.0);
        assert!((v.length() - 5.0).abs() < 1e-6);
    }

    #[test]
    fn sample_deserializes_from_json() {
        let json = r#"{
            "pointable": {
                "id": 7,
                "hand_id": 1,
                "tip_position": {"x": 0.0, "y": 210.5, "z": 12.0},
                "tip_velocity": {"x": 0.0, "y": -3.0, "z": 0.0},
                "extended": true,
                "finger_index": 1
            },
            "hand": {"id": 1, "palm_position": {"x": 0.0, "y": 200.0, "z": 0.0}, "pinch_strength": 0.2},
            "active_gestures": [
                {"kind": "circle", "pointable_ids": [7], "normal": {"x": 0.0, "y": 0.0, "z": -1.0}}
            ]
        }"#;
        let s: TrackingSample = serde_json::from_str(json).unwrap();
        assert_eq!(s.pointable.as_ref().unwrap().id, 7);
        assert_eq!(s.active_gestures[0].kind, GestureKind::Circle);
        assert!(s.pointables.is_empty());
    }

    #[test]
    fn empty_sample_deserializes() {
        let s: TrackingSample = serde_json::from_str("{}").unwrap();
        assert!(s.pointable.is_none());
        assert!(s.hand.is_none());
    }
}
