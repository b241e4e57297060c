//! Scroll window over the effective catalog.
//!
//! Owns the floating-point "first visible item" offset. All mutations go
//! through [`ScrollWindow::apply_delta`], which clamps to the valid range,
//! so the window can never scroll into empty space.

/// The contiguous slice of the catalog eligible for display and selection.
#[derive(Debug, Clone)]
pub struct ScrollWindow {
    first_visible: f32,
    visible_slots: usize,
    scroll_zone_size: f32,
    scroll_max_speed: f32,
    scroll_boost: f32,
}

impl ScrollWindow {
    pub fn new(
        visible_slots: usize,
        scroll_zone_size: f32,
        scroll_max_speed: f32,
        scroll_boost: f32,
    ) -> Self {
        Self {
            first_visible: 0.0,
            visible_slots,
            scroll_zone_size,
            scroll_max_speed,
            scroll_boost,
        }
    }

    pub fn first_visible(&self) -> f32 {
        self.first_visible
    }

    pub fn visible_slots(&self) -> usize {
        self.visible_slots
    }

    /// Add a scroll delta (items) and clamp to `[0, max(0, n - slots)]`.
    pub fn apply_delta(&mut self, delta: f32, n_items: usize) {
        let max_start = n_items.saturating_sub(self.visible_slots) as f32;
        self.first_visible = (self.first_visible + delta).clamp(0.0, max_start);
    }

    /// Auto-scroll when the tracked point pushes past the dead-band.
    ///
    /// The overshoot beyond `stable_range` is normalized by the scroll zone
    /// size, clamped to [-1, 1], boosted, and cubed (sign-preserving). The
    /// cubic ramp leaves jitter near the band edge at near-zero scroll and
    /// accelerates on clear overshoot. The factor is re-clamped after the
    /// boost so the rate never exceeds `scroll_max_speed` items/second.
    /// Dead-band bounds are symmetric (`-stable_range` below).
    pub fn apply_edge_scroll(&mut self, offset_y: f32, stable_range: f32, dt: f32, n_items: usize) {
        let raw = if offset_y > stable_range {
            ((offset_y - stable_range) / self.scroll_zone_size).min(1.0)
        } else if offset_y < -stable_range {
            ((offset_y + stable_range) / self.scroll_zone_size).max(-1.0)
        } else {
            return;
        };

        let factor = (raw * self.scroll_boost).powi(3).clamp(-1.0, 1.0);
        let delta = -factor * self.scroll_max_speed * dt;
        self.apply_delta(delta, n_items);
    }
}
