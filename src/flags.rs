//! Finger-extension bit flags and per-shape selectability constraints.
//!
//! The flag layout follows the tracker's finger ordering:
//! bit0=thumb, bit1=index, bit2=middle, bit3=ring, bit4=pinky, bit5=pinch.

use std::collections::HashMap;

use crate::sample::TrackingSample;

/// Pinch strength above which bit 5 is set.
pub const PINCH_THRESHOLD: f32 = 0.95;

/// 6-bit finger state mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FingerFlags(pub u8);

impl FingerFlags {
    pub const THUMB: FingerFlags = FingerFlags(0b000001);
    pub const INDEX: FingerFlags = FingerFlags(0b000010);
    pub const MIDDLE: FingerFlags = FingerFlags(0b000100);
    pub const RING: FingerFlags = FingerFlags(0b001000);
    pub const PINKY: FingerFlags = FingerFlags(0b010000);
    pub const PINCH: FingerFlags = FingerFlags(0b100000);

    /// All six bits set.
    pub const ALL: FingerFlags = FingerFlags(0b111111);

    pub fn contains(&self, other: FingerFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

/// Derive the hand flag for one tick: OR of `1 << finger_index` for every
/// extended pointable belonging to the tracked hand, plus the pinch bit.
pub fn hand_bit_flag(hand_id: i32, sample: &TrackingSample) -> FingerFlags {
    let mut out: u8 = 0;

    for p in &sample.pointables {
        if p.hand_id == Some(hand_id) && p.extended && p.finger_index < 5 {
            out |= 1 << p.finger_index;
        }
    }

    if let Some(h) = &sample.hand {
        if h.id == hand_id && h.pinch_strength > PINCH_THRESHOLD {
            out |= FingerFlags::PINCH.0;
        }
    }

    FingerFlags(out)
}

/// Open/closed finger requirements for one catalog item.
///
/// `None` means no constraint of that kind.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShapeConstraints {
    pub must_be_open: Option<FingerFlags>,
    pub must_be_closed: Option<FingerFlags>,
}

/// Static lookup of per-item constraints.
#[derive(Debug, Clone, Default)]
pub struct ConstraintStore {
    entries: HashMap<String, ShapeConstraints>,
}

impl ConstraintStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The fingerspelling-alphabet defaults shipped with the engine.
    pub fn fingerspelling_defaults() -> Self {
        let mut store = Self::new();
        for (name, mask) in FINGER_OPEN_DEFAULTS {
            store.require_open(name, FingerFlags(*mask));
        }
        for (name, mask) in FINGER_CLOSED_DEFAULTS {
            store.require_closed(name, FingerFlags(*mask));
        }
        store
    }

    pub fn require_open(&mut self, name: &str, flags: FingerFlags) {
        self.entries.entry(name.to_string()).or_default().must_be_open = Some(flags);
    }

    pub fn require_closed(&mut self, name: &str, flags: FingerFlags) {
        self.entries.entry(name.to_string()).or_default().must_be_closed = Some(flags);
    }

    /// Constraints for an item name; absent entries constrain nothing.
    pub fn constraints(&self, name: &str) -> ShapeConstraints {
        self.entries.get(name).copied().unwrap_or_default()
    }
}

// Which fingers MUST BE OPEN for each shape to stay selectable.
// <pinch> <pinky> <ring> <middle> <index> <thumb>
const FINGER_OPEN_DEFAULTS: &[(&str, u8)] = &[
    ("OpenHand", 0b11111),
    ("b", 0b11110),
    ("d", 0b00010),
    ("f", 0b11100),
    ("g", 0b00010),
    ("h", 0b00110),
    ("i", 0b10000),
    ("j", 0b10000),
    ("k", 0b00111),
    ("l", 0b00011),
    ("m", 0b01110),
    ("n", 0b00110),
    ("p", 0b00111),
    ("q", 0b00011),
    ("r", 0b00110),
    ("sch", 0b11111),
    ("t", 0b00010),
    ("u", 0b00110),
    ("v", 0b00110),
    ("w", 0b01110),
    ("y", 0b10001),
    ("z", 0b00010),
];

// Which fingers MUST BE CLOSED for each shape to stay selectable.
const FINGER_CLOSED_DEFAULTS: &[(&str, u8)] = &[
    ("ClosedHand", 0b11111),
    ("a", 0b11110),
    ("b", 0b00001),
    ("e", 0b11111),
    ("f", 0b00010),
    ("g", 0b11100),
    ("h", 0b11000),
    ("i", 0b01111),
    ("j", 0b01111),
    ("k", 0b11000),
    ("l", 0b11100),
    ("m", 0b10000),
    ("n", 0b110000),
    ("p", 0b11000),
    ("q", 0b11100),
    ("r", 0b110011),
    ("s", 0b11111),
    ("t", 0b11100),
    ("u", 0b11000),
    ("v", 0b11000),
    ("w", 0b10000),
    ("x", 0b11101),
    ("y", 0b01110),
    ("z", 0b11100),
];
