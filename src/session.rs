//! The per-activation selection session.
//!
//! Owns all mutable state between `start` and commit/cancel and composes the
//! stabilizer, gesture detector, scroll window, filter and resolver once per
//! tick. Single-threaded and tick-driven: the host guarantees one tick at a
//! time and stops ticking after a terminal transition.

use std::time::Instant;

use log::{debug, warn};
use thiserror::Error;

use crate::catalog::{CatalogItem, CatalogProvider, HandProfile};
use crate::config::SelectorConfig;
use crate::filter;
use crate::flags::hand_bit_flag;
use crate::gestures::CircleDetector;
use crate::resolver;
use crate::stabilizer::PositionStabilizer;
use crate::window::ScrollWindow;

/// Nominal tick cadence; also the `dt` assumed for the very first tick.
pub const NOMINAL_TICK_SECONDS: f32 = 0.04;

/// Applies a chosen pose, or restores the host's pre-session snapshot.
pub trait PoseApplier {
    type Snapshot;

    /// Apply a pose from the given library. Called once on commit and, when
    /// live preview is enabled, once per tracking tick with the hovered item.
    fn apply(&mut self, pose_library: &str, pose_name: &str);

    /// Undo everything back to the snapshot the host captured before the
    /// session began. Called exactly once, on cancel.
    fn restore(&mut self, snapshot: &Self::Snapshot);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// Before the first tick.
    Idle,
    /// A trackable pointable/hand is present; selection is live.
    Tracking,
    /// Nothing trackable this tick; last selection and window held.
    NotVisible,
    Committed,
    Cancelled,
}

impl SessionStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Committed | Self::Cancelled)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// Commit without a resolvable selection (no tracking tick yet, or the
    /// filter removed every item).
    #[error("no pose selected")]
    NothingSelected,
    /// Tick/commit/cancel after the session already ended.
    #[error("session already committed or cancelled")]
    SessionEnded,
}

/// What the presentation layer reads after each tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub status: SessionStatus,
    /// Index into the effective catalog, `None` while nothing is selectable.
    pub hovered_index: Option<usize>,
    /// Continuous first-visible-item offset of the scroll window.
    pub window_start: f32,
    /// Whether a trackable pointable/hand was present this tick.
    pub visible: bool,
    /// Set while filtering has removed every catalog item.
    pub no_selectable_items: bool,
}

/// One user-facing selection interaction, from activation to commit/cancel.
pub struct Session<C, A>
where
    C: CatalogProvider,
    A: PoseApplier,
{
    config: SelectorConfig,
    profile: HandProfile,
    provider: C,
    applier: A,
    snapshot: A::Snapshot,

    full_catalog: Vec<CatalogItem>,
    effective: Vec<CatalogItem>,

    stabilizer: PositionStabilizer,
    circle: CircleDetector,
    window: ScrollWindow,

    status: SessionStatus,
    /// Continuous selection index; truncated only at read-out.
    selected_index: Option<f32>,
    last_tick: Option<Instant>,
}

impl<C, A> Session<C, A>
where
    C: CatalogProvider,
    A: PoseApplier,
{
    /// Start a session. The catalog is read once, here; the snapshot is
    /// whatever the host captured before activating the selector.
    pub fn start(config: SelectorConfig, provider: C, applier: A, snapshot: A::Snapshot) -> Self {
        let profile = HandProfile::resolve(config.side);
        let full_catalog = provider.items();
        let effective = full_catalog.clone();
        let window = ScrollWindow::new(
            config.visible_slots,
            config.scroll_zone_size,
            config.scroll_max_speed,
            config.scroll_boost,
        );
        debug!(
            "session start: {} items, {} hand, filtering={}",
            full_catalog.len(),
            profile.side.as_str(),
            config.filtering_enabled
        );
        Self {
            config,
            profile,
            provider,
            applier,
            snapshot,
            full_catalog,
            effective,
            stabilizer: PositionStabilizer::new(),
            circle: CircleDetector::new(),
            window,
            status: SessionStatus::Idle,
            selected_index: None,
            last_tick: None,
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// The effective (filtered) catalog as of the last tick.
    pub fn effective_catalog(&self) -> &[CatalogItem] {
        &self.effective
    }

    /// Whether fingertip coordinates drive the selection. When filtering is
    /// enabled the palm drives instead and the stable range widens.
    fn tip_mode(&self) -> bool {
        self.config.tip_selection && !self.config.filtering_enabled
    }

    fn effective_stable_range(&self) -> f32 {
        if self.tip_mode() {
            self.config.stable_range
        } else {
            self.config.stable_range * self.config.hand_mode_range_multiplier
        }
    }

    fn report(&self, no_selectable: bool) -> TickReport {
        TickReport {
            status: self.status,
            hovered_index: self
                .selected_index
                .and_then(|idx| resolver::selected_slot(idx, self.effective.len())),
            window_start: self.window.first_visible(),
            visible: self.status == SessionStatus::Tracking,
            no_selectable_items: no_selectable,
        }
    }

    /// Advance one tick with a fresh tracking snapshot.
    pub fn tick(
        &mut self,
        sample: &crate::sample::TrackingSample,
        now: Instant,
    ) -> Result<TickReport, SessionError> {
        if self.status.is_terminal() {
            return Err(SessionError::SessionEnded);
        }

        let dt = match self.last_tick {
            None => NOMINAL_TICK_SECONDS,
            Some(prev) => now.saturating_duration_since(prev).as_secs_f32(),
        };
        self.last_tick = Some(now);

        // Reference coordinate: tip height in tip mode, palm height otherwise.
        // Its absence is what NOT_VISIBLE means.
        let y = if self.tip_mode() {
            sample.pointable.as_ref().map(|p| p.tip_position.y)
        } else {
            sample.hand.as_ref().map(|h| h.palm_position.y)
        };
        let Some(y) = y else {
            self.status = SessionStatus::NotVisible;
            return Ok(self.report(self.effective.is_empty()));
        };
        self.status = SessionStatus::Tracking;

        // Filtering recomputes the selectable list from this tick's
        // finger-extension flags.
        if self.config.filtering_enabled {
            if let Some(hand) = &sample.hand {
                let flags = hand_bit_flag(hand.id, sample);
                self.effective = filter::recompute(&self.provider, &self.full_catalog, flags);
            }
        }

        let n_items = self.effective.len();
        // A shrinking filter can strand the window past the new catalog end.
        self.window.apply_delta(0.0, n_items);
        if n_items == 0 {
            warn!("filtering removed every catalog item");
            self.selected_index = None;
            return Ok(self.report(true));
        }

        let stable_range = self.effective_stable_range();
        let offset = self.stabilizer.offset(y);
        let normalized = self.stabilizer.normalized(y, stable_range);

        if let Some(impulse) = self.circle.scroll_impulse(sample, dt) {
            self.window.apply_delta(impulse, n_items);
        }
        self.window.apply_edge_scroll(offset, stable_range, dt, n_items);

        let index = resolver::resolve(
            normalized,
            self.window.first_visible(),
            self.window.visible_slots(),
            n_items,
        );
        self.selected_index = Some(index);

        if self.config.live_preview {
            if let Some(slot) = resolver::selected_slot(index, n_items) {
                self.applier
                    .apply(&self.profile.pose_library, &self.effective[slot].name);
            }
        }

        Ok(self.report(false))
    }

    /// Freeze the current selection, apply it, and end the session.
    pub fn commit(&mut self) -> Result<String, SessionError> {
        if self.status.is_terminal() {
            return Err(SessionError::SessionEnded);
        }
        let slot = self
            .selected_index
            .and_then(|idx| resolver::selected_slot(idx, self.effective.len()))
            .ok_or(SessionError::NothingSelected)?;

        let name = self.effective[slot].name.clone();
        self.status = SessionStatus::Committed;
        self.applier.apply(&self.profile.pose_library, &name);
        debug!("committed '{name}'");
        Ok(name)
    }

    /// End the session without choosing; restores the host's snapshot.
    pub fn cancel(&mut self) -> Result<(), SessionError> {
        if self.status.is_terminal() {
            return Err(SessionError::SessionEnded);
        }
        self.status = SessionStatus::Cancelled;
        self.applier.restore(&self.snapshot);
        debug!("cancelled");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::catalog::StaticCatalog;
    use crate::flags::{ConstraintStore, FingerFlags};
    use crate::sample::{GestureEvent, GestureKind, HandSnapshot, Pointable, TrackingSample, Vec3};

    #[derive(Default)]
    struct RecordingApplier {
        applied: Vec<(String, String)>,
        restores: usize,
    }

    impl PoseApplier for RecordingApplier {
        type Snapshot = ();

        fn apply(&mut self, pose_library: &str, pose_name: &str) {
            self.applied.push((pose_library.to_string(), pose_name.to_string()));
        }

        fn restore(&mut self, _snapshot: &()) {
            self.restores += 1;
        }
    }

    impl PoseApplier for &mut RecordingApplier {
        type Snapshot = ();

        fn apply(&mut self, pose_library: &str, pose_name: &str) {
            RecordingApplier::apply(self, pose_library, pose_name);
        }

        fn restore(&mut self, snapshot: &()) {
            RecordingApplier::restore(self, snapshot);
        }
    }

    fn plain_catalog() -> StaticCatalog {
        StaticCatalog::new(
            vec!["a".into(), "b".into(), "c".into(), "d".into()],
            ConstraintStore::new(),
        )
    }

    fn tip_sample(y: f32) -> TrackingSample {
        TrackingSample {
            pointable: Some(Pointable {
                id: 7,
                hand_id: Some(1),
                tip_position: Vec3::new(0.0, y, 0.0),
                tip_velocity: Vec3::default(),
                extended: true,
                finger_index: 1,
            }),
            ..Default::default()
        }
    }

    fn session(config: SelectorConfig) -> Session<StaticCatalog, RecordingApplier> {
        Session::start(config, plain_catalog(), RecordingApplier::default(), ())
    }

    #[test]
    fn centered_tip_hovers_within_first_window() {
        let mut s = session(SelectorConfig::default());
        let t0 = Instant::now();
        let report = s.tick(&tip_sample(200.0), t0).unwrap();
        assert_eq!(report.status, SessionStatus::Tracking);
        assert!(report.visible);
        // normalized 0.5 -> index (2 * 0.5) = 1.0 -> slot 1
        assert_eq!(report.hovered_index, Some(1));
        assert_eq!(report.window_start, 0.0);
    }

    #[test]
    fn tick_is_idempotent_at_zero_dt() {
        let mut s = session(SelectorConfig::default());
        let t0 = Instant::now();
        let first = s.tick(&tip_sample(203.0), t0).unwrap();
        let second = s.tick(&tip_sample(203.0), t0).unwrap();
        assert_eq!(first.hovered_index, second.hovered_index);
        assert_eq!(first.window_start, second.window_start);
    }

    #[test]
    fn missing_pointable_holds_last_state() {
        let mut s = session(SelectorConfig::default());
        let t0 = Instant::now();
        let tracked = s.tick(&tip_sample(196.0), t0).unwrap();
        let gone = s.tick(&TrackingSample::default(), t0).unwrap();
        assert_eq!(gone.status, SessionStatus::NotVisible);
        assert!(!gone.visible);
        assert_eq!(gone.hovered_index, tracked.hovered_index);
        assert_eq!(gone.window_start, tracked.window_start);
    }

    #[test]
    fn commit_before_any_tick_fails() {
        let mut s = session(SelectorConfig::default());
        assert_eq!(s.commit(), Err(SessionError::NothingSelected));
        // NothingSelected is recoverable; the session is still live.
        assert!(!s.status().is_terminal());
    }

    #[test]
    fn commit_freezes_and_applies_once_more() {
        let mut cfg = SelectorConfig::default();
        cfg.live_preview = false;
        let cat = plain_catalog();
        let mut applier = RecordingApplier::default();
        let mut s = Session::start(cfg, cat, &mut applier, ());
        s.tick(&tip_sample(200.0), Instant::now()).unwrap();
        let name = s.commit().unwrap();
        assert_eq!(name, "b");
        assert_eq!(s.status(), SessionStatus::Committed);
        drop(s);
        assert_eq!(applier.applied, vec![("handshape_lib_R".to_string(), "b".to_string())]);
        assert_eq!(applier.restores, 0);
    }

    #[test]
    fn cancel_restores_exactly_once() {
        let cat = plain_catalog();
        let mut applier = RecordingApplier::default();
        let mut s = Session::start(SelectorConfig::default(), cat, &mut applier, ());
        s.tick(&tip_sample(200.0), Instant::now()).unwrap();
        s.cancel().unwrap();
        assert_eq!(s.cancel(), Err(SessionError::SessionEnded));
        assert_eq!(s.commit(), Err(SessionError::SessionEnded));
        drop(s);
        assert_eq!(applier.restores, 1);
    }

    #[test]
    fn no_ticks_accepted_after_terminal() {
        let mut s = session(SelectorConfig::default());
        s.tick(&tip_sample(200.0), Instant::now()).unwrap();
        s.commit().unwrap();
        let err = s.tick(&tip_sample(200.0), Instant::now());
        assert_eq!(err, Err(SessionError::SessionEnded));
    }

    #[test]
    fn live_preview_applies_hovered_item_per_tick() {
        let cat = plain_catalog();
        let mut applier = RecordingApplier::default();
        let mut s = Session::start(SelectorConfig::default(), cat, &mut applier, ());
        let t0 = Instant::now();
        s.tick(&tip_sample(200.0), t0).unwrap();
        s.tick(&tip_sample(200.0), t0).unwrap();
        drop(s);
        assert_eq!(applier.applied.len(), 2);
        assert_eq!(applier.applied[0].1, "b");
    }

    #[test]
    fn first_tick_circle_uses_nominal_dt() {
        let mut cfg = SelectorConfig::default();
        cfg.live_preview = false;
        let mut s = session(cfg);
        let mut sample = tip_sample(200.0);
        sample.pointable.as_mut().unwrap().tip_velocity = Vec3::new(200.0, 0.0, 0.0);
        sample.active_gestures.push(GestureEvent {
            kind: GestureKind::Circle,
            pointable_ids: vec![7],
            normal: Vec3::new(0.0, 0.0, -1.0),
        });
        let report = s.tick(&sample, Instant::now()).unwrap();
        // 0.02 * 200 mm/s * 0.04 s = 0.16 items, clamped within [0, 2]
        assert!((report.window_start - 0.16).abs() < 1e-6);
    }

    fn filtered_session(applier: &mut RecordingApplier) -> Session<StaticCatalog, &mut RecordingApplier> {
        let mut store = ConstraintStore::new();
        store.require_open("d", FingerFlags(0b00010));
        store.require_open("b", FingerFlags(0b11110));
        let cat = StaticCatalog::new(
            vec!["a".into(), "b".into(), "c".into(), "d".into()],
            store,
        );
        let mut cfg = SelectorConfig::default();
        cfg.filtering_enabled = true;
        cfg.live_preview = false;
        Session::start(cfg, cat, applier, ())
    }

    fn hand_sample(y: f32, extended_fingers: &[u8]) -> TrackingSample {
        TrackingSample {
            hand: Some(HandSnapshot {
                id: 1,
                palm_position: Vec3::new(0.0, y, 0.0),
                pinch_strength: 0.0,
            }),
            pointables: extended_fingers
                .iter()
                .map(|&finger_index| Pointable {
                    id: 50 + finger_index as i32,
                    hand_id: Some(1),
                    tip_position: Vec3::default(),
                    tip_velocity: Vec3::default(),
                    extended: true,
                    finger_index,
                })
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn filtering_narrows_effective_catalog() {
        let mut applier = RecordingApplier::default();
        let mut s = filtered_session(&mut applier);
        // Only the index finger extended: "d" stays, "b" drops.
        s.tick(&hand_sample(150.0, &[1]), Instant::now()).unwrap();
        let names: Vec<&str> = s.effective_catalog().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["a", "c", "d"]);
    }

    #[test]
    fn empty_effective_catalog_blocks_commit() {
        let mut store = ConstraintStore::new();
        store.require_open("only", FingerFlags(0b11111));
        let cat = StaticCatalog::new(vec!["only".into()], store);
        let mut cfg = SelectorConfig::default();
        cfg.filtering_enabled = true;
        let mut s = Session::start(cfg, cat, RecordingApplier::default(), ());
        // Fist: the single item requires all fingers open.
        let report = s.tick(&hand_sample(150.0, &[]), Instant::now()).unwrap();
        assert!(report.no_selectable_items);
        assert_eq!(report.hovered_index, None);
        assert_eq!(s.commit(), Err(SessionError::NothingSelected));
    }

    #[test]
    fn shrinking_filter_reclamps_scrolled_window() {
        let mut store = ConstraintStore::new();
        for name in ["h", "i", "j"] {
            store.require_open(name, FingerFlags(0b00010));
        }
        let names = ["a", "b", "c", "d", "e", "f", "g", "h", "i", "j"]
            .map(String::from)
            .to_vec();
        let mut cfg = SelectorConfig::default();
        cfg.filtering_enabled = true;
        cfg.live_preview = false;
        let mut s = Session::start(cfg, StaticCatalog::new(names, store), RecordingApplier::default(), ());

        let t0 = Instant::now();
        s.tick(&hand_sample(150.0, &[1]), t0).unwrap();
        // 90 mm below center saturates the downward ramp: 2 items/s toward
        // the end of the 10-item catalog, hitting the max start of 8.
        let mut last_window = 0.0;
        for i in 1..=4u64 {
            let report = s
                .tick(&hand_sample(60.0, &[1]), t0 + Duration::from_secs(i))
                .unwrap();
            last_window = report.window_start;
        }
        assert_eq!(last_window, 8.0);

        // Closing the index finger drops "h", "i", "j"; with 7 items left
        // the window must come back inside [0, 5] even though the hand is
        // re-centered inside the dead-band.
        let report = s
            .tick(&hand_sample(150.0, &[]), t0 + Duration::from_secs(5))
            .unwrap();
        assert_eq!(s.effective_catalog().len(), 7);
        assert_eq!(report.window_start, 5.0);
        assert_eq!(report.hovered_index, Some(6));
    }

    #[test]
    fn not_visible_tick_keeps_reporting_empty_catalog() {
        let mut store = ConstraintStore::new();
        store.require_open("only", FingerFlags(0b11111));
        let cat = StaticCatalog::new(vec!["only".into()], store);
        let mut cfg = SelectorConfig::default();
        cfg.filtering_enabled = true;
        let mut s = Session::start(cfg, cat, RecordingApplier::default(), ());
        let t0 = Instant::now();
        let fist = s.tick(&hand_sample(150.0, &[]), t0).unwrap();
        assert!(fist.no_selectable_items);
        // The hand drops out; the emptiness persists and keeps being
        // reported until a later tick widens the catalog again.
        let gone = s.tick(&TrackingSample::default(), t0).unwrap();
        assert_eq!(gone.status, SessionStatus::NotVisible);
        assert!(gone.no_selectable_items);
    }

    #[test]
    fn hand_mode_widens_stable_range() {
        let mut applier = RecordingApplier::default();
        let mut s = filtered_session(&mut applier);
        let t0 = Instant::now();
        s.tick(&hand_sample(150.0, &[1]), t0).unwrap();
        // 12 mm above center: past a 10 mm tip-mode band, but inside the
        // tripled 30 mm hand-mode band, so the window must not move.
        let t1 = t0 + Duration::from_millis(100);
        let report = s.tick(&hand_sample(162.0, &[1]), t1).unwrap();
        assert_eq!(report.window_start, 0.0);
    }
}
