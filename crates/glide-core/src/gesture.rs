#![forbid(unsafe_code)]

//! Gesture classification: turns a raw touch stream into semantic events.
//!
//! [`GestureClassifier`] consumes `start` / `move_to` / `end` / `cancel`
//! samples for one gesture source and pushes [`Tap`], [`LongPress`],
//! [`Swipe`] and [`PinchDelta`] events to registered listeners.
//!
//! # State Machine
//!
//! - **Single contact**: long-press timer armed at start (only when a
//!   long-press listener exists), disarmed once the contact travels more than
//!   [`TAP_SLOP_PX`]. At release the session resolves to swipe, tap, or
//!   nothing.
//! - **Pinch**: a second contact switches the session to pinch tracking for
//!   the rest of its life. Tap, long-press and swipe are no longer possible.
//! - **Edge gated**: with an [`EdgeDetector`] attached, starts outside the
//!   band are ignored, vertical drift cancels, and the edge release rule
//!   replaces the swipe distance threshold.
//!
//! # Invariants
//!
//! 1. At most one of `Tap`, `LongPress`, `Swipe` per session.
//! 2. Nothing is emitted after `cancel()` or `destroy()` for that session.
//! 3. Every timer is cleared on end, cancel and destroy.
//! 4. State transitions complete before any listener runs.
//!
//! # Failure Modes
//!
//! - Samples with no matching session (or no contacts) are ignored and
//!   reported as [`StepOutcome::Ignored`]; they never error.
//! - Slow, short movement that is neither tap nor swipe resolves to
//!   [`StepOutcome::Ended`] with no event.

use crate::clock::TimerSlot;
use crate::edge::EdgeDetector;
use crate::event::{GestureEvent, LongPress, PinchDelta, Swipe, SwipeDirection, Tap};
use crate::geometry::{TouchSample, Viewport};
use crate::listener::{ListenerId, ListenerIds, ListenerSet};
use crate::session::{ContactAdded, Lift, SampleIgnored, SessionMode, SessionTracker, TouchSession};

/// Movement beyond this distance rules out tap and long-press.
pub const TAP_SLOP_PX: f64 = 10.0;

/// Relative spread change that produces a [`PinchDelta`].
pub const PINCH_STEP_RATIO: f64 = 0.10;

/// Two contacts closer than this never establish a pinch baseline.
pub const MIN_PINCH_SPREAD_PX: f64 = 1.0;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Thresholds and timeouts for gesture classification.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GestureConfig {
    /// Minimum travel for a swipe (default: 50px).
    pub swipe_threshold_px: f64,
    /// Maximum press duration for a tap (default: 300ms).
    pub tap_timeout_ms: u64,
    /// Hold duration before long-press fires (default: 500ms).
    pub long_press_timeout_ms: u64,
    /// Ask the host to suppress native scrolling once a move looks like a
    /// swipe (default: true).
    pub prevent_default_on_swipe_candidate: bool,
    /// Track a second contact as a pinch; when false a second contact
    /// cancels the session (default: true).
    pub pinch_enabled: bool,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            swipe_threshold_px: 50.0,
            tap_timeout_ms: 300,
            long_press_timeout_ms: 500,
            prevent_default_on_swipe_candidate: true,
            pinch_enabled: true,
        }
    }
}

impl GestureConfig {
    #[must_use]
    pub fn with_swipe_threshold(mut self, px: f64) -> Self {
        self.swipe_threshold_px = px;
        self
    }

    #[must_use]
    pub fn with_tap_timeout(mut self, ms: u64) -> Self {
        self.tap_timeout_ms = ms;
        self
    }

    #[must_use]
    pub fn with_long_press_timeout(mut self, ms: u64) -> Self {
        self.long_press_timeout_ms = ms;
        self
    }

    #[must_use]
    pub fn with_prevent_default(mut self, enabled: bool) -> Self {
        self.prevent_default_on_swipe_candidate = enabled;
        self
    }

    #[must_use]
    pub fn with_pinch(mut self, enabled: bool) -> Self {
        self.pinch_enabled = enabled;
        self
    }

    /// Check that thresholds and timeouts are usable.
    pub fn validate(&self) -> Result<(), GestureConfigError> {
        if !(self.swipe_threshold_px.is_finite() && self.swipe_threshold_px > 0.0) {
            return Err(GestureConfigError::InvalidSwipeThreshold {
                value: self.swipe_threshold_px,
            });
        }
        if self.tap_timeout_ms == 0 {
            return Err(GestureConfigError::InvalidTapTimeout {
                value: self.tap_timeout_ms,
            });
        }
        if self.long_press_timeout_ms == 0 {
            return Err(GestureConfigError::InvalidLongPressTimeout {
                value: self.long_press_timeout_ms,
            });
        }
        Ok(())
    }
}

/// Classifier configuration errors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureConfigError {
    InvalidSwipeThreshold { value: f64 },
    InvalidTapTimeout { value: u64 },
    InvalidLongPressTimeout { value: u64 },
}

impl std::fmt::Display for GestureConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidSwipeThreshold { value } => {
                write!(f, "swipe threshold must be > 0 (got {value})")
            }
            Self::InvalidTapTimeout { value } => {
                write!(f, "tap timeout must be > 0ms (got {value})")
            }
            Self::InvalidLongPressTimeout { value } => {
                write!(f, "long-press timeout must be > 0ms (got {value})")
            }
        }
    }
}

impl std::error::Error for GestureConfigError {}

// ---------------------------------------------------------------------------
// Step results
// ---------------------------------------------------------------------------

/// Why a session was dropped without an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelCause {
    /// `cancel()` called by the host (native cancel sample).
    Host,
    /// A second contact landed while pinch tracking is off.
    SecondContact,
    /// A third contact landed.
    ThirdContact,
    /// Edge-gated session drifted vertically (scroll intent).
    VerticalDrift,
    /// The component was torn down.
    Teardown,
}

impl CancelCause {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Host => "host",
            Self::SecondContact => "second_contact",
            Self::ThirdContact => "third_contact",
            Self::VerticalDrift => "vertical_drift",
            Self::Teardown => "teardown",
        }
    }
}

/// What one sample did to the classifier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    /// A new session began.
    Began,
    /// The session absorbed the sample.
    Tracking,
    /// The sample produced an event (already pushed to listeners).
    Emitted(GestureEvent),
    /// The session ended without an event.
    Ended,
    /// The session was dropped.
    Cancelled(CancelCause),
    /// The sample did not touch classifier state.
    Ignored(SampleIgnored),
}

/// Result of one classifier entry point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub outcome: StepOutcome,
    /// Host hint: suppress native default handling (scroll) for this sample.
    pub suppress_default: bool,
}

impl Step {
    const fn of(outcome: StepOutcome) -> Self {
        Self {
            outcome,
            suppress_default: false,
        }
    }

    const fn ignored(reason: SampleIgnored) -> Self {
        Self::of(StepOutcome::Ignored(reason))
    }

    /// Report a long press that came due before this sample was applied.
    /// Ignored, cancelled and emitting steps keep their own outcome.
    fn with_overdue(self, overdue: Option<GestureEvent>) -> Self {
        match (overdue, self.outcome) {
            (Some(event), StepOutcome::Tracking | StepOutcome::Ended) => Self {
                outcome: StepOutcome::Emitted(event),
                ..self
            },
            _ => self,
        }
    }

    /// The emitted event, if any.
    #[must_use]
    pub const fn event(&self) -> Option<GestureEvent> {
        match self.outcome {
            StepOutcome::Emitted(event) => Some(event),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// GestureClassifier
// ---------------------------------------------------------------------------

struct EdgeGate {
    detector: EdgeDetector,
    viewport: Box<dyn Fn() -> Viewport>,
}

#[derive(Default)]
struct Listeners {
    ids: ListenerIds,
    tap: ListenerSet<Tap>,
    long_press: ListenerSet<LongPress>,
    swipe: ListenerSet<Swipe>,
    pinch: ListenerSet<PinchDelta>,
}

impl Listeners {
    fn remove(&mut self, id: ListenerId) -> bool {
        self.tap.remove(id)
            || self.long_press.remove(id)
            || self.swipe.remove(id)
            || self.pinch.remove(id)
    }

    fn clear(&mut self) {
        self.tap.clear();
        self.long_press.clear();
        self.swipe.clear();
        self.pinch.clear();
    }

    fn emit(&mut self, event: &GestureEvent) {
        match event {
            GestureEvent::Tap(tap) => self.tap.emit(tap),
            GestureEvent::LongPress(press) => self.long_press.emit(press),
            GestureEvent::Swipe(swipe) => self.swipe.emit(swipe),
            GestureEvent::PinchDelta(pinch) => self.pinch.emit(pinch),
        }
    }
}

/// Stateful classifier for one gesture source.
///
/// Call the four sample entry points in arrival order, and
/// [`poll`](GestureClassifier::poll) when [`next_deadline`] is reached.
///
/// [`next_deadline`]: GestureClassifier::next_deadline
pub struct GestureClassifier {
    config: GestureConfig,
    tracker: SessionTracker,
    long_press_timer: TimerSlot,
    pinch_baseline: Option<f64>,
    gate: Option<EdgeGate>,
    listeners: Listeners,
    destroyed: bool,
}

impl std::fmt::Debug for GestureClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GestureClassifier")
            .field("tracking", &self.is_tracking())
            .field("edge_gated", &self.gate.is_some())
            .field("long_press_armed", &self.long_press_timer.is_armed())
            .field("destroyed", &self.destroyed)
            .finish()
    }
}

impl GestureClassifier {
    /// Create an ungated classifier.
    pub fn new(config: GestureConfig) -> Result<Self, GestureConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            tracker: SessionTracker::new(),
            long_press_timer: TimerSlot::new(),
            pinch_baseline: None,
            gate: None,
            listeners: Listeners::default(),
            destroyed: false,
        })
    }

    /// Create a classifier that only tracks sessions starting in the edge
    /// band. `viewport` is queried at every session start.
    pub fn edge_gated(
        config: GestureConfig,
        detector: EdgeDetector,
        viewport: impl Fn() -> Viewport + 'static,
    ) -> Result<Self, GestureConfigError> {
        let mut classifier = Self::new(config)?;
        classifier.gate = Some(EdgeGate {
            detector,
            viewport: Box::new(viewport),
        });
        Ok(classifier)
    }

    // --- listener registration ---

    pub fn on_tap(&mut self, callback: impl FnMut(&Tap) + 'static) -> ListenerId {
        let id = self.listeners.ids.next_id();
        self.listeners.tap.add(id, callback);
        id
    }

    /// Register a long-press listener. The timer is only armed for sessions
    /// that start while at least one is registered.
    pub fn on_long_press(&mut self, callback: impl FnMut(&LongPress) + 'static) -> ListenerId {
        let id = self.listeners.ids.next_id();
        self.listeners.long_press.add(id, callback);
        id
    }

    pub fn on_swipe(&mut self, callback: impl FnMut(&Swipe) + 'static) -> ListenerId {
        let id = self.listeners.ids.next_id();
        self.listeners.swipe.add(id, callback);
        id
    }

    pub fn on_pinch(&mut self, callback: impl FnMut(&PinchDelta) + 'static) -> ListenerId {
        let id = self.listeners.ids.next_id();
        self.listeners.pinch.add(id, callback);
        id
    }

    /// Unregister any listener. Returns `false` if `id` is unknown.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    // --- accessors ---

    #[inline]
    #[must_use]
    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// The edge detector, when this classifier is gated.
    #[must_use]
    pub fn edge_detector(&self) -> Option<&EdgeDetector> {
        self.gate.as_ref().map(|gate| &gate.detector)
    }

    #[inline]
    #[must_use]
    pub fn is_tracking(&self) -> bool {
        self.tracker.is_active()
    }

    /// Read-only view of the active session.
    #[inline]
    #[must_use]
    pub fn session(&self) -> Option<&TouchSession> {
        self.tracker.session()
    }

    /// Deadline the host should call [`poll`](Self::poll) at, if any.
    #[inline]
    #[must_use]
    pub fn next_deadline(&self) -> Option<u64> {
        self.long_press_timer.deadline()
    }

    #[inline]
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    // --- sample entry points ---

    /// A contact landed.
    pub fn start(&mut self, sample: &TouchSample) -> Step {
        if self.destroyed {
            return Step::ignored(SampleIgnored::Destroyed);
        }
        if self.tracker.is_active() {
            return self.on_contact_added(sample);
        }

        if let Some(gate) = &self.gate {
            let Some(contact) = sample.touches.first() else {
                return Step::ignored(SampleIgnored::EmptySample);
            };
            let viewport = (gate.viewport)();
            if gate.detector.admit(contact.pos, viewport).is_none() {
                #[cfg(feature = "tracing")]
                tracing::trace!(x = contact.pos.x, "gesture start outside edge band");
                return Step::ignored(SampleIgnored::OutsideEdgeBand);
            }
        }

        if let Err(reason) = self.tracker.begin(sample) {
            return Step::ignored(reason);
        }
        if !self.listeners.long_press.is_empty() {
            self.long_press_timer
                .arm(sample.timestamp_ms, self.config.long_press_timeout_ms);
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(
            t = sample.timestamp_ms,
            long_press_armed = self.long_press_timer.is_armed(),
            "gesture session began"
        );
        Step::of(StepOutcome::Began)
    }

    /// Contacts moved.
    pub fn move_to(&mut self, sample: &TouchSample) -> Step {
        if self.destroyed {
            return Step::ignored(SampleIgnored::Destroyed);
        }
        let overdue = self.fire_due_long_press(sample.timestamp_ms);
        self.track_move(sample).with_overdue(overdue)
    }

    fn track_move(&mut self, sample: &TouchSample) -> Step {
        let session = match self.tracker.apply_move(sample) {
            Ok(session) => session,
            Err(reason) => return Step::ignored(reason),
        };

        if session.mode() == SessionMode::Pinch {
            let spread = if session.active_count() == 2 {
                session.spread()
            } else {
                None
            };
            return self.on_pinch_move(spread);
        }

        let distance = session.distance();
        let (_, delta_y) = session.delta();
        if distance > TAP_SLOP_PX {
            self.long_press_timer.clear();
        }
        if let Some(gate) = &self.gate
            && gate.detector.exceeds_vertical(delta_y)
        {
            return self.cancel_with(CancelCause::VerticalDrift);
        }

        Step {
            outcome: StepOutcome::Tracking,
            suppress_default: self.config.prevent_default_on_swipe_candidate
                && distance > self.config.swipe_threshold_px / 2.0,
        }
    }

    /// A contact lifted.
    pub fn end(&mut self, sample: &TouchSample) -> Step {
        if self.destroyed {
            return Step::ignored(SampleIgnored::Destroyed);
        }
        let overdue = self.fire_due_long_press(sample.timestamp_ms);
        self.track_lift(sample).with_overdue(overdue)
    }

    fn track_lift(&mut self, sample: &TouchSample) -> Step {
        match self.tracker.apply_lift(sample) {
            Lift::Ignored(reason) => Step::ignored(reason),
            Lift::Continuing => {
                // The pair changed; a re-landed contact sets a fresh baseline.
                self.pinch_baseline = None;
                Step::of(StepOutcome::Tracking)
            }
            Lift::Ended(session) => {
                self.long_press_timer.clear();
                self.pinch_baseline = None;
                match self.classify(&session) {
                    Some(event) => {
                        #[cfg(feature = "tracing")]
                        tracing::debug!(kind = event.kind(), "gesture classified");
                        self.listeners.emit(&event);
                        Step::of(StepOutcome::Emitted(event))
                    }
                    None => Step::of(StepOutcome::Ended),
                }
            }
        }
    }

    /// Drop the active session without emitting anything.
    pub fn cancel(&mut self) -> Step {
        if self.destroyed {
            return Step::ignored(SampleIgnored::Destroyed);
        }
        if !self.tracker.is_active() {
            return Step::ignored(SampleIgnored::NoActiveSession);
        }
        self.cancel_with(CancelCause::Host)
    }

    /// Fire the long-press timer if its deadline has passed.
    pub fn poll(&mut self, now_ms: u64) -> Option<GestureEvent> {
        if self.destroyed {
            return None;
        }
        self.fire_due_long_press(now_ms)
    }

    /// Detach every listener, clear every timer and drop the session.
    /// Safe to call repeatedly; returns `false` when already destroyed.
    pub fn destroy(&mut self) -> bool {
        if self.destroyed {
            return false;
        }
        if self.tracker.is_active() {
            self.cancel_with(CancelCause::Teardown);
        }
        self.long_press_timer.clear();
        self.pinch_baseline = None;
        self.listeners.clear();
        self.destroyed = true;
        true
    }
}

// ---------------------------------------------------------------------------
// Internal handlers
// ---------------------------------------------------------------------------

impl GestureClassifier {
    fn on_contact_added(&mut self, sample: &TouchSample) -> Step {
        match self.tracker.add_contact(sample) {
            ContactAdded::Overflow => self.cancel_with(CancelCause::ThirdContact),
            ContactAdded::Ignored(reason) => Step::ignored(reason),
            ContactAdded::Secondary => {
                if !self.config.pinch_enabled || self.gate.is_some() {
                    return self.cancel_with(CancelCause::SecondContact);
                }
                self.long_press_timer.clear();
                self.pinch_baseline = self
                    .tracker
                    .session()
                    .and_then(TouchSession::spread)
                    .filter(|spread| *spread >= MIN_PINCH_SPREAD_PX);
                Step::of(StepOutcome::Tracking)
            }
        }
    }

    fn on_pinch_move(&mut self, spread: Option<f64>) -> Step {
        let suppress_default = self.config.prevent_default_on_swipe_candidate;
        let Some(spread) = spread.filter(|spread| *spread >= MIN_PINCH_SPREAD_PX) else {
            return Step {
                outcome: StepOutcome::Tracking,
                suppress_default,
            };
        };
        let Some(baseline) = self.pinch_baseline else {
            self.pinch_baseline = Some(spread);
            return Step {
                outcome: StepOutcome::Tracking,
                suppress_default,
            };
        };
        let scale = spread / baseline;
        if (scale - 1.0).abs() <= PINCH_STEP_RATIO {
            return Step {
                outcome: StepOutcome::Tracking,
                suppress_default,
            };
        }
        self.pinch_baseline = Some(spread);
        let event = GestureEvent::PinchDelta(PinchDelta { scale });
        self.listeners.emit(&event);
        Step {
            outcome: StepOutcome::Emitted(event),
            suppress_default,
        }
    }

    fn fire_due_long_press(&mut self, now_ms: u64) -> Option<GestureEvent> {
        self.long_press_timer.take_expired(now_ms)?;
        let session = self.tracker.session_mut()?;
        if session.mode() != SessionMode::Single || session.is_resolved() {
            return None;
        }
        session.mark_resolved();
        let event = GestureEvent::LongPress(LongPress {
            pos: session.primary_start().pos,
            timestamp_ms: now_ms,
        });
        #[cfg(feature = "tracing")]
        tracing::debug!(t = now_ms, "long press fired");
        self.listeners.emit(&event);
        Some(event)
    }

    fn cancel_with(&mut self, cause: CancelCause) -> Step {
        self.long_press_timer.clear();
        self.pinch_baseline = None;
        let _cancelled = self.tracker.cancel();
        #[cfg(feature = "tracing")]
        tracing::debug!(cause = cause.as_str(), "gesture session cancelled");
        Step::of(StepOutcome::Cancelled(cause))
    }

    fn classify(&self, session: &TouchSession) -> Option<GestureEvent> {
        if session.mode() == SessionMode::Pinch || session.is_resolved() {
            return None;
        }
        let (delta_x, delta_y) = session.delta();
        let distance = session.distance();
        let duration_ms = session.duration_ms();

        let swipe_direction = match &self.gate {
            Some(gate) => gate.detector.accepts_end(delta_x, delta_y),
            None => (distance >= self.config.swipe_threshold_px)
                .then(|| SwipeDirection::from_delta(delta_x, delta_y)),
        };
        if let Some(direction) = swipe_direction {
            return Some(GestureEvent::Swipe(Swipe {
                direction,
                delta_x,
                delta_y,
                duration_ms,
            }));
        }

        if distance < TAP_SLOP_PX && duration_ms < self.config.tap_timeout_ms {
            let end = session.primary_current();
            return Some(GestureEvent::Tap(Tap {
                pos: end.pos,
                timestamp_ms: end.timestamp_ms,
            }));
        }
        None
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
