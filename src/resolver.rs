//! Final index resolution: normalized position x scroll window -> item.

use log::warn;

/// Floor clamp for the normalized position. Never exactly 0, so the
/// trailing (possibly out-of-range) slot below the window is unreachable.
const POSITION_FLOOR: f32 = 0.01;

/// Combine the stabilized position with the current window into a
/// continuous selection index.
///
/// Position 1 (top of the visible band) maps toward `first_visible`,
/// position 0.01 toward the last visible slot. The result stays continuous;
/// truncate only at read-out ([`selected_slot`]) to avoid feedback jitter
/// across ticks.
pub fn resolve(normalized_position: f32, first_visible: f32, visible_slots: usize, n_items: usize) -> f32 {
    let clamped = normalized_position.clamp(POSITION_FLOOR, 1.0);

    let first = first_visible;
    let slots_left = (n_items as f32 - first).min(visible_slots as f32);
    let last = first + slots_left;

    (last - first) * (1.0 - clamped) + first
}

/// Truncate a continuous index to the committed slot.
///
/// The clamps in [`resolve`] and in the scroll window make an out-of-range
/// index unreachable; if it happens anyway it is an internal-consistency
/// fault, logged and clamped rather than silently selecting past the end.
pub fn selected_slot(selected_index: f32, n_items: usize) -> Option<usize> {
    if n_items == 0 {
        return None;
    }
    let slot = selected_index as usize;
    if slot >= n_items {
        warn!("resolved index {selected_index} out of range (n={n_items}); clamping");
        return Some(n_items - 1);
    }
    Some(slot)
}
