#![forbid(unsafe_code)]

//! Drag-to-reveal panel controller.
//!
//! ```text
//! Closed -> Dragging -> Opening -> Open     (entered)
//!              \------> Closing -> Closed   (snapped back)
//! Open   -> Dragging -> Closing -> Closed   (entered)
//!              \------> Opening -> Open     (snapped back)
//! Closed <-> Opening/Closing <-> Open       (toggle, fixed duration)
//! ```
//!
//! `drag_offset_px` is the panel translation relative to its fully open
//! position: `0` when open, `-width` (left side) or `+width` (right side)
//! when closed. It never leaves `[-width, width]`.
//!
//! While dragging, the pointer's horizontal travel is projected onto the
//! reveal axis (positive = into view) and clamped to `[0, width]` from closed
//! or `[-width, 0]` from open; movement the other way is ignored
//! (rubber-band, no overshoot).
//!
//! On release the drag completes ("entered") when the clamped travel exceeds
//! a third of the width OR the whole-gesture average velocity exceeds
//! `velocity_threshold_px_per_ms`; otherwise it snaps back.

use crate::clock::TimerSlot;
use crate::edge::{Edge, EdgeAdmission};
use crate::listener::{ListenerId, ListenerIds, ListenerSet};

/// Default panel width when the host does not provide one.
pub const DEFAULT_PANEL_WIDTH_PX: f64 = 280.0;
/// Default release velocity that completes a drag regardless of distance.
pub const DEFAULT_VELOCITY_THRESHOLD_PX_PER_MS: f64 = 0.5;
/// Default duration of snap and toggle animations.
pub const DEFAULT_SNAP_DURATION_MS: u64 = 300;

/// Screen side the panel is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PanelSide {
    #[default]
    Left,
    Right,
}

impl PanelSide {
    /// The screen edge an opening drag must start from.
    #[must_use]
    pub const fn edge(self) -> Edge {
        match self {
            Self::Left => Edge::Left,
            Self::Right => Edge::Right,
        }
    }

    /// Pointer delta projected onto the reveal axis.
    const fn reveal_sign(self) -> f64 {
        match self {
            Self::Left => 1.0,
            Self::Right => -1.0,
        }
    }
}

/// Panel geometry and resolution parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PanelConfig {
    pub width_px: f64,
    pub side: PanelSide,
    pub velocity_threshold_px_per_ms: f64,
    /// Zero lands resolutions and toggles immediately.
    pub snap_duration_ms: u64,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            width_px: DEFAULT_PANEL_WIDTH_PX,
            side: PanelSide::Left,
            velocity_threshold_px_per_ms: DEFAULT_VELOCITY_THRESHOLD_PX_PER_MS,
            snap_duration_ms: DEFAULT_SNAP_DURATION_MS,
        }
    }
}

impl PanelConfig {
    #[must_use]
    pub fn with_width(mut self, px: f64) -> Self {
        self.width_px = px;
        self
    }

    #[must_use]
    pub fn with_side(mut self, side: PanelSide) -> Self {
        self.side = side;
        self
    }

    #[must_use]
    pub fn with_velocity_threshold(mut self, px_per_ms: f64) -> Self {
        self.velocity_threshold_px_per_ms = px_per_ms;
        self
    }

    #[must_use]
    pub fn with_snap_duration(mut self, ms: u64) -> Self {
        self.snap_duration_ms = ms;
        self
    }

    pub fn validate(&self) -> Result<(), PanelConfigError> {
        if !(self.width_px.is_finite() && self.width_px > 0.0) {
            return Err(PanelConfigError::InvalidWidth {
                value: self.width_px,
            });
        }
        if !(self.velocity_threshold_px_per_ms.is_finite()
            && self.velocity_threshold_px_per_ms > 0.0)
        {
            return Err(PanelConfigError::InvalidVelocityThreshold {
                value: self.velocity_threshold_px_per_ms,
            });
        }
        Ok(())
    }

    /// Offset of the fully closed panel.
    #[must_use]
    pub fn closed_offset(&self) -> f64 {
        -self.side.reveal_sign() * self.width_px
    }

    fn offset_for_reveal(&self, reveal_px: f64) -> f64 {
        self.closed_offset() + self.side.reveal_sign() * reveal_px
    }

    fn rest_offset(&self, rest: PanelRest) -> f64 {
        match rest {
            PanelRest::Open => 0.0,
            PanelRest::Closed => self.closed_offset(),
        }
    }
}

/// Panel configuration errors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanelConfigError {
    InvalidWidth { value: f64 },
    InvalidVelocityThreshold { value: f64 },
}

impl std::fmt::Display for PanelConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidWidth { value } => write!(f, "panel width must be > 0 (got {value})"),
            Self::InvalidVelocityThreshold { value } => {
                write!(f, "velocity threshold must be > 0 px/ms (got {value})")
            }
        }
    }
}

impl std::error::Error for PanelConfigError {}

/// A stable resting state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PanelRest {
    Closed,
    Open,
}

impl PanelRest {
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Closed => Self::Open,
            Self::Open => Self::Closed,
        }
    }
}

/// Public lifecycle mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PanelMode {
    Closed,
    Opening,
    Open,
    Closing,
    Dragging,
}

impl PanelMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::Opening => "opening",
            Self::Open => "open",
            Self::Closing => "closing",
            Self::Dragging => "dragging",
        }
    }
}

/// Read-only snapshot for renderers.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PanelState {
    pub mode: PanelMode,
    pub drag_offset_px: f64,
    pub width_px: f64,
}

/// Permission to start a drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragGrant {
    /// The session started in the edge band; required when closed.
    Edge(EdgeAdmission),
    /// The session started on the panel itself; only valid when open.
    PanelSurface,
}

/// Why a drag was not started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragRefused {
    AlreadyDragging,
    Animating,
    EdgeGrantRequired,
    EdgeMismatch,
    Destroyed,
}

impl DragRefused {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AlreadyDragging => "already_dragging",
            Self::Animating => "animating",
            Self::EdgeGrantRequired => "edge_grant_required",
            Self::EdgeMismatch => "edge_mismatch",
            Self::Destroyed => "destroyed",
        }
    }
}

/// Live drag progress pushed to `on_drag_update` listeners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragUpdate {
    pub drag_offset_px: f64,
    /// Fraction of the panel in view, `0.0..=1.0`.
    pub reveal: f64,
}

/// How a drag ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ResolveOutcome {
    /// Moved to the opposite resting state.
    Entered,
    /// Returned to the resting state held before the drag.
    SnappedBack,
    /// Dropped by `cancel_drag` or teardown; lands on the pre-drag state.
    Cancelled,
}

/// Result of a drag release, pushed to `on_resolve` listeners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelResolution {
    pub from: PanelRest,
    pub target: PanelRest,
    pub outcome: ResolveOutcome,
    /// Clamped travel at release (absolute).
    pub offset_at_release_px: f64,
    /// Whole-gesture average speed at release.
    pub velocity_px_per_ms: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Resting(PanelRest),
    Animating {
        target: PanelRest,
        ends_ms: u64,
    },
    Dragging {
        from: PanelRest,
        started_ms: u64,
        /// Clamped travel along the reveal axis.
        applied_px: f64,
    },
}

/// State machine owning one panel's [`PanelState`].
pub struct PanelController {
    config: PanelConfig,
    phase: Phase,
    snap_timer: TimerSlot,
    transitions: u64,
    ids: ListenerIds,
    drag_listeners: ListenerSet<DragUpdate>,
    resolve_listeners: ListenerSet<PanelResolution>,
    destroyed: bool,
}

impl std::fmt::Debug for PanelController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PanelController")
            .field("config", &self.config)
            .field("phase", &self.phase)
            .field("transitions", &self.transitions)
            .field("destroyed", &self.destroyed)
            .finish()
    }
}

impl PanelController {
    /// Create a closed panel.
    pub fn new(config: PanelConfig) -> Result<Self, PanelConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            phase: Phase::Resting(PanelRest::Closed),
            snap_timer: TimerSlot::new(),
            transitions: 0,
            ids: ListenerIds::default(),
            drag_listeners: ListenerSet::new(),
            resolve_listeners: ListenerSet::new(),
            destroyed: false,
        })
    }

    pub fn on_drag_update(&mut self, callback: impl FnMut(&DragUpdate) + 'static) -> ListenerId {
        let id = self.ids.next_id();
        self.drag_listeners.add(id, callback);
        id
    }

    pub fn on_resolve(&mut self, callback: impl FnMut(&PanelResolution) + 'static) -> ListenerId {
        let id = self.ids.next_id();
        self.resolve_listeners.add(id, callback);
        id
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.drag_listeners.remove(id) || self.resolve_listeners.remove(id)
    }

    #[must_use]
    pub const fn config(&self) -> &PanelConfig {
        &self.config
    }

    #[must_use]
    pub fn mode(&self) -> PanelMode {
        match self.phase {
            Phase::Resting(PanelRest::Closed) => PanelMode::Closed,
            Phase::Resting(PanelRest::Open) => PanelMode::Open,
            Phase::Animating {
                target: PanelRest::Open,
                ..
            } => PanelMode::Opening,
            Phase::Animating {
                target: PanelRest::Closed,
                ..
            } => PanelMode::Closing,
            Phase::Dragging { .. } => PanelMode::Dragging,
        }
    }

    /// Current translation; animations report their target offset.
    #[must_use]
    pub fn drag_offset_px(&self) -> f64 {
        match self.phase {
            Phase::Resting(rest) | Phase::Animating { target: rest, .. } => {
                self.config.rest_offset(rest)
            }
            Phase::Dragging {
                from, applied_px, ..
            } => self
                .config
                .offset_for_reveal(reveal_from(from, self.config.width_px) + applied_px),
        }
    }

    #[must_use]
    pub fn state(&self) -> PanelState {
        PanelState {
            mode: self.mode(),
            drag_offset_px: self.drag_offset_px(),
            width_px: self.config.width_px,
        }
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, Phase::Dragging { .. })
    }

    /// Number of mode changes since construction.
    #[must_use]
    pub const fn transitions(&self) -> u64 {
        self.transitions
    }

    #[must_use]
    pub fn next_deadline(&self) -> Option<u64> {
        self.snap_timer.deadline()
    }

    #[must_use]
    pub const fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Linear progress of a running snap/toggle animation.
    #[must_use]
    pub fn animation_progress(&self, now_ms: u64) -> Option<f32> {
        let Phase::Animating { ends_ms, .. } = self.phase else {
            return None;
        };
        let duration = self.config.snap_duration_ms;
        if duration == 0 {
            return Some(1.0);
        }
        let remaining = ends_ms.saturating_sub(now_ms).min(duration);
        Some(((duration - remaining) as f64 / duration as f64) as f32)
    }

    // --- drag lifecycle ---

    /// Begin a drag from a resting state.
    pub fn start_drag(&mut self, grant: DragGrant, now_ms: u64) -> Result<(), DragRefused> {
        if self.destroyed {
            return Err(DragRefused::Destroyed);
        }
        let from = match self.phase {
            Phase::Resting(rest) => rest,
            Phase::Animating { .. } => return Err(DragRefused::Animating),
            Phase::Dragging { .. } => return Err(DragRefused::AlreadyDragging),
        };
        match (from, grant) {
            (PanelRest::Closed, DragGrant::PanelSurface) => {
                return Err(DragRefused::EdgeGrantRequired);
            }
            (_, DragGrant::Edge(admission)) if admission.edge() != self.config.side.edge() => {
                return Err(DragRefused::EdgeMismatch);
            }
            _ => {}
        }
        self.set_phase(Phase::Dragging {
            from,
            started_ms: now_ms,
            applied_px: 0.0,
        });
        Ok(())
    }

    /// Apply the pointer's total horizontal travel since the drag began.
    pub fn update_drag(&mut self, total_delta_x: f64, _now_ms: u64) -> Option<DragUpdate> {
        if self.destroyed || !total_delta_x.is_finite() {
            return None;
        }
        let Phase::Dragging {
            from, started_ms, ..
        } = self.phase
        else {
            return None;
        };
        let width = self.config.width_px;
        let projected = total_delta_x * self.config.side.reveal_sign();
        let applied_px = match from {
            PanelRest::Closed => projected.clamp(0.0, width),
            PanelRest::Open => projected.clamp(-width, 0.0),
        };
        self.phase = Phase::Dragging {
            from,
            started_ms,
            applied_px,
        };
        let reveal_px = reveal_from(from, width) + applied_px;
        let update = DragUpdate {
            drag_offset_px: self.config.offset_for_reveal(reveal_px),
            reveal: reveal_px / width,
        };
        self.drag_listeners.emit(&update);
        Some(update)
    }

    /// Release the drag and pick the resting state to animate to.
    pub fn resolve_drag(&mut self, now_ms: u64) -> Option<PanelResolution> {
        if self.destroyed {
            return None;
        }
        let Phase::Dragging {
            from,
            started_ms,
            applied_px,
        } = self.phase
        else {
            return None;
        };
        let travel = applied_px.abs();
        let elapsed = now_ms.saturating_sub(started_ms);
        let velocity = if elapsed == 0 {
            0.0
        } else {
            travel / elapsed as f64
        };
        let entered = travel > self.config.width_px / 3.0
            || velocity > self.config.velocity_threshold_px_per_ms;
        let (target, outcome) = if entered {
            (from.flipped(), ResolveOutcome::Entered)
        } else {
            (from, ResolveOutcome::SnappedBack)
        };
        let resolution = PanelResolution {
            from,
            target,
            outcome,
            offset_at_release_px: travel,
            velocity_px_per_ms: velocity,
        };
        #[cfg(feature = "tracing")]
        tracing::debug!(
            travel,
            velocity,
            entered,
            "panel drag resolved"
        );
        self.animate_to(target, now_ms);
        self.resolve_listeners.emit(&resolution);
        Some(resolution)
    }

    /// Drop the drag and land on the pre-drag state immediately.
    pub fn cancel_drag(&mut self) -> Option<PanelResolution> {
        if self.destroyed {
            return None;
        }
        let resolution = self.force_cancel()?;
        self.resolve_listeners.emit(&resolution);
        Some(resolution)
    }

    fn force_cancel(&mut self) -> Option<PanelResolution> {
        let Phase::Dragging {
            from, applied_px, ..
        } = self.phase
        else {
            return None;
        };
        self.set_phase(Phase::Resting(from));
        #[cfg(feature = "tracing")]
        tracing::debug!(from = ?from, "panel drag cancelled");
        Some(PanelResolution {
            from,
            target: from,
            outcome: ResolveOutcome::Cancelled,
            offset_at_release_px: applied_px.abs(),
            velocity_px_per_ms: 0.0,
        })
    }

    // --- programmatic toggles ---

    /// Flip toward the other resting state. Reverses a running animation;
    /// refused while dragging.
    pub fn toggle(&mut self, now_ms: u64) -> bool {
        if self.destroyed {
            return false;
        }
        match self.phase {
            Phase::Dragging { .. } => false,
            Phase::Resting(rest) => {
                self.animate_to(rest.flipped(), now_ms);
                true
            }
            Phase::Animating { target, ends_ms } => {
                let duration = self.config.snap_duration_ms;
                let remaining = ends_ms.saturating_sub(now_ms).min(duration);
                // The reverse run only covers the distance already travelled.
                let elapsed = duration - remaining;
                self.set_phase(Phase::Animating {
                    target: target.flipped(),
                    ends_ms: now_ms.saturating_add(elapsed),
                });
                self.snap_timer.arm(now_ms, elapsed);
                true
            }
        }
    }

    /// Open unless already open or opening.
    pub fn open(&mut self, now_ms: u64) -> bool {
        matches!(self.mode(), PanelMode::Closed | PanelMode::Closing) && self.toggle(now_ms)
    }

    /// Close unless already closed or closing.
    pub fn close(&mut self, now_ms: u64) -> bool {
        matches!(self.mode(), PanelMode::Open | PanelMode::Opening) && self.toggle(now_ms)
    }

    /// Land a finished animation. Returns the resting state reached.
    pub fn poll(&mut self, now_ms: u64) -> Option<PanelRest> {
        if self.destroyed {
            return None;
        }
        self.snap_timer.take_expired(now_ms)?;
        let Phase::Animating { target, .. } = self.phase else {
            return None;
        };
        self.set_phase(Phase::Resting(target));
        Some(target)
    }

    /// Force-resolve any drag or animation, clear timers and listeners.
    /// Returns `false` when already destroyed.
    pub fn destroy(&mut self) -> bool {
        if self.destroyed {
            return false;
        }
        if let Some(resolution) = self.force_cancel() {
            self.resolve_listeners.emit(&resolution);
        }
        if let Phase::Animating { target, .. } = self.phase {
            self.set_phase(Phase::Resting(target));
        }
        self.snap_timer.clear();
        self.drag_listeners.clear();
        self.resolve_listeners.clear();
        self.destroyed = true;
        true
    }

    fn animate_to(&mut self, target: PanelRest, now_ms: u64) {
        if self.config.snap_duration_ms == 0 {
            self.snap_timer.clear();
            self.set_phase(Phase::Resting(target));
            return;
        }
        self.set_phase(Phase::Animating {
            target,
            ends_ms: now_ms.saturating_add(self.config.snap_duration_ms),
        });
        self.snap_timer.arm(now_ms, self.config.snap_duration_ms);
    }

    fn set_phase(&mut self, phase: Phase) {
        let before = self.mode();
        self.phase = phase;
        let after = self.mode();
        if before != after {
            self.transitions = self.transitions.saturating_add(1);
            #[cfg(feature = "tracing")]
            tracing::debug!(
                from = before.as_str(),
                to = after.as_str(),
                "panel transition"
            );
        }
        if !matches!(phase, Phase::Animating { .. }) {
            self.snap_timer.clear();
        }
    }
}

fn reveal_from(from: PanelRest, width: f64) -> f64 {
    match from {
        PanelRest::Closed => 0.0,
        PanelRest::Open => width,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::{EdgeDetector, EdgeSpec};
    use crate::geometry::{Point, Viewport};
    use std::cell::RefCell;
    use std::rc::Rc;

    const PHONE: Viewport = Viewport::new(400.0, 800.0);

    fn panel() -> PanelController {
        PanelController::new(PanelConfig::default()).expect("default config is valid")
    }

    fn left_grant() -> DragGrant {
        let admission = EdgeDetector::new(EdgeSpec::at(Edge::Left))
            .expect("valid")
            .admit(Point::new(5.0, 300.0), PHONE)
            .expect("inside band");
        DragGrant::Edge(admission)
    }

    fn right_grant() -> DragGrant {
        let admission = EdgeDetector::new(EdgeSpec::at(Edge::Right))
            .expect("valid")
            .admit(Point::new(395.0, 300.0), PHONE)
            .expect("inside band");
        DragGrant::Edge(admission)
    }

    #[test]
    fn starts_closed_at_negative_width() {
        let p = panel();
        assert_eq!(
            p.state(),
            PanelState {
                mode: PanelMode::Closed,
                drag_offset_px: -280.0,
                width_px: 280.0,
            }
        );
    }

    #[test]
    fn fast_short_drag_enters() {
        let mut p = panel();
        p.start_drag(left_grant(), 1_000).expect("drag starts");
        p.update_drag(50.0, 1_040);
        let r = p.resolve_drag(1_040).expect("was dragging");
        assert_eq!(r.outcome, ResolveOutcome::Entered);
        assert_eq!(r.target, PanelRest::Open);
        assert!((r.velocity_px_per_ms - 1.25).abs() < 1e-9);
        assert_eq!(p.mode(), PanelMode::Opening);
        assert_eq!(p.drag_offset_px(), 0.0);
        assert_eq!(p.poll(1_339), None);
        assert_eq!(p.poll(1_340), Some(PanelRest::Open));
        assert_eq!(p.mode(), PanelMode::Open);
    }

    #[test]
    fn slow_short_drag_snaps_back() {
        let mut p = panel();
        p.start_drag(left_grant(), 0).expect("drag starts");
        p.update_drag(50.0, 500);
        let r = p.resolve_drag(500).expect("was dragging");
        assert_eq!(r.outcome, ResolveOutcome::SnappedBack);
        assert_eq!(r.target, PanelRest::Closed);
        assert_eq!(p.mode(), PanelMode::Closing);
        assert_eq!(p.poll(800), Some(PanelRest::Closed));
    }

    #[test]
    fn slow_long_drag_enters_on_distance() {
        let mut p = panel();
        p.start_drag(left_grant(), 0).expect("drag starts");
        p.update_drag(100.0, 2_000);
        let r = p.resolve_drag(2_000).expect("was dragging");
        assert_eq!(r.outcome, ResolveOutcome::Entered);
    }

    #[test]
    fn zero_elapsed_counts_as_zero_velocity() {
        let mut p = panel();
        p.start_drag(left_grant(), 10).expect("drag starts");
        p.update_drag(20.0, 10);
        let r = p.resolve_drag(10).expect("was dragging");
        assert_eq!(r.velocity_px_per_ms, 0.0);
        assert_eq!(r.outcome, ResolveOutcome::SnappedBack);
    }

    #[test]
    fn closed_drag_ignores_negative_delta_and_clamps() {
        let mut p = panel();
        p.start_drag(left_grant(), 0).expect("drag starts");
        let update = p.update_drag(-40.0, 10).expect("dragging");
        assert_eq!(update.drag_offset_px, -280.0);
        assert_eq!(update.reveal, 0.0);
        let update = p.update_drag(900.0, 20).expect("dragging");
        assert_eq!(update.drag_offset_px, 0.0);
        assert_eq!(update.reveal, 1.0);
    }

    #[test]
    fn open_drag_only_moves_away() {
        let mut p = PanelController::new(PanelConfig::default().with_snap_duration(0))
            .expect("valid");
        assert!(p.open(0));
        assert_eq!(p.mode(), PanelMode::Open);
        p.start_drag(DragGrant::PanelSurface, 100).expect("drag starts");
        assert_eq!(
            p.update_drag(30.0, 110).map(|u| u.drag_offset_px),
            Some(0.0)
        );
        assert_eq!(
            p.update_drag(-120.0, 120).map(|u| u.drag_offset_px),
            Some(-120.0)
        );
        let r = p.resolve_drag(2_000).expect("was dragging");
        assert_eq!(r.outcome, ResolveOutcome::Entered);
        assert_eq!(p.mode(), PanelMode::Closed);
    }

    #[test]
    fn right_side_panel_mirrors_offsets() {
        let mut p = PanelController::new(PanelConfig::default().with_side(PanelSide::Right))
            .expect("valid");
        assert_eq!(p.drag_offset_px(), 280.0);
        assert_eq!(p.start_drag(left_grant(), 0), Err(DragRefused::EdgeMismatch));
        p.start_drag(right_grant(), 0).expect("drag starts");
        assert_eq!(
            p.update_drag(60.0, 10).map(|u| u.drag_offset_px),
            Some(280.0)
        );
        assert_eq!(
            p.update_drag(-100.0, 20).map(|u| u.drag_offset_px),
            Some(180.0)
        );
    }

    #[test]
    fn closed_panel_requires_edge_grant() {
        let mut p = panel();
        assert_eq!(
            p.start_drag(DragGrant::PanelSurface, 0),
            Err(DragRefused::EdgeGrantRequired)
        );
        assert_eq!(p.mode(), PanelMode::Closed);
    }

    #[test]
    fn drag_refused_while_animating_or_dragging() {
        let mut p = panel();
        assert!(p.toggle(0));
        assert_eq!(
            p.start_drag(left_grant(), 10),
            Err(DragRefused::Animating)
        );
        p.poll(300);
        p.start_drag(DragGrant::PanelSurface, 400).expect("drag starts");
        assert_eq!(
            p.start_drag(DragGrant::PanelSurface, 410),
            Err(DragRefused::AlreadyDragging)
        );
        assert!(!p.toggle(420));
    }

    #[test]
    fn toggle_reverses_running_animation() {
        let mut p = panel();
        assert!(p.toggle(0));
        assert_eq!(p.mode(), PanelMode::Opening);
        let progress = p.animation_progress(100).expect("animating");
        assert!((progress - 1.0 / 3.0).abs() < 1e-6);
        assert!(p.toggle(100));
        assert_eq!(p.mode(), PanelMode::Closing);
        assert_eq!(p.next_deadline(), Some(200));
        assert_eq!(p.poll(200), Some(PanelRest::Closed));
        assert_eq!(p.animation_progress(200), None);
    }

    #[test]
    fn open_and_close_are_directional() {
        let mut p = panel();
        assert!(!p.close(0));
        assert!(p.open(0));
        assert!(!p.open(10));
        assert!(p.close(20));
        assert_eq!(p.mode(), PanelMode::Closing);
    }

    #[test]
    fn cancel_drag_lands_on_pre_drag_state() {
        let mut p = panel();
        p.start_drag(left_grant(), 0).expect("drag starts");
        p.update_drag(200.0, 10);
        let r = p.cancel_drag().expect("was dragging");
        assert_eq!(r.outcome, ResolveOutcome::Cancelled);
        assert_eq!(r.target, PanelRest::Closed);
        assert_eq!(p.mode(), PanelMode::Closed);
        assert_eq!(p.drag_offset_px(), -280.0);
        assert!(p.cancel_drag().is_none());
    }

    #[test]
    fn listeners_receive_updates_and_resolution() {
        let mut p = panel();
        let updates = Rc::new(RefCell::new(Vec::new()));
        let resolutions = Rc::new(RefCell::new(Vec::new()));
        let u = Rc::clone(&updates);
        p.on_drag_update(move |e| u.borrow_mut().push(e.drag_offset_px));
        let r = Rc::clone(&resolutions);
        let id = p.on_resolve(move |e| r.borrow_mut().push(e.outcome));

        p.start_drag(left_grant(), 0).expect("drag starts");
        p.update_drag(10.0, 5);
        p.update_drag(40.0, 10);
        p.resolve_drag(20);
        assert_eq!(*updates.borrow(), vec![-270.0, -240.0]);
        assert_eq!(*resolutions.borrow(), vec![ResolveOutcome::Entered]);
        assert!(p.remove_listener(id));
        assert!(!p.remove_listener(id));
    }

    #[test]
    fn destroy_mid_drag_force_resolves() {
        let mut p = panel();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        p.on_resolve(move |e| s.borrow_mut().push(e.outcome));
        p.start_drag(left_grant(), 0).expect("drag starts");
        p.update_drag(150.0, 10);
        assert!(p.destroy());
        assert!(!p.destroy());
        assert_eq!(p.mode(), PanelMode::Closed);
        assert_eq!(*seen.borrow(), vec![ResolveOutcome::Cancelled]);
        assert_eq!(p.next_deadline(), None);
        assert!(!p.toggle(100));
        assert_eq!(p.start_drag(left_grant(), 100), Err(DragRefused::Destroyed));
    }

    #[test]
    fn destroy_mid_animation_lands_on_target() {
        let mut p = panel();
        p.toggle(0);
        assert!(p.destroy());
        assert_eq!(p.mode(), PanelMode::Open);
        assert_eq!(p.next_deadline(), None);
    }

    #[test]
    fn transitions_are_counted() {
        let mut p = panel();
        p.toggle(0);
        p.poll(300);
        assert_eq!(p.transitions(), 2);
    }

    #[test]
    fn invalid_config_rejected() {
        assert_eq!(
            PanelController::new(PanelConfig::default().with_width(0.0)).err(),
            Some(PanelConfigError::InvalidWidth { value: 0.0 })
        );
        assert!(
            PanelConfig::default()
                .with_velocity_threshold(-1.0)
                .validate()
                .is_err()
        );
    }
}
