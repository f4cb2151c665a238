#![forbid(unsafe_code)]

//! Structured result of one adapter entry point.

use glide_core::{
    CancelCause, DragRefused, GestureEvent, PanelRest, ResolveOutcome, SampleIgnored, Step,
    StepOutcome, SwipeDirection,
};

use crate::style::StyleCommand;

/// Entry point that produced a dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostPhase {
    Mount,
    PointerDown,
    PointerMove,
    PointerUp,
    PointerCancel,
    Tick,
    Toggle,
    Destroy,
}

/// Classified gesture kind, without coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GestureKind {
    Tap,
    LongPress,
    Swipe(SwipeDirection),
    Pinch,
}

impl From<&GestureEvent> for GestureKind {
    fn from(event: &GestureEvent) -> Self {
        match event {
            GestureEvent::Tap(_) => Self::Tap,
            GestureEvent::LongPress(_) => Self::LongPress,
            GestureEvent::Swipe(swipe) => Self::Swipe(swipe.direction),
            GestureEvent::PinchDelta(_) => Self::Pinch,
        }
    }
}

/// Why an entry point did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoredReason {
    Sample(SampleIgnored),
    Drag(DragRefused),
    /// `tick` with no deadline reached.
    NothingDue,
    /// The adapter was already destroyed.
    Destroyed,
}

/// Outcome category for one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Mounted,
    SessionBegan,
    Tracking,
    /// The session ended without a recognized gesture.
    SessionEnded,
    Recognized(GestureKind),
    Cancelled(CancelCause),
    DragStarted,
    DragUpdated,
    DragResolved(ResolveOutcome),
    PanelAnimating,
    PanelLanded(PanelRest),
    Destroyed,
    Ignored(IgnoredReason),
}

impl DispatchOutcome {
    /// Map a classifier step, preferring the gesture it recognized.
    pub(crate) fn from_step(step: &Step, recognized: Option<&GestureEvent>) -> Self {
        if let Some(event) = recognized {
            return Self::Recognized(event.into());
        }
        match step.outcome {
            StepOutcome::Began => Self::SessionBegan,
            StepOutcome::Tracking => Self::Tracking,
            StepOutcome::Emitted(event) => Self::Recognized((&event).into()),
            StepOutcome::Ended => Self::SessionEnded,
            StepOutcome::Cancelled(cause) => Self::Cancelled(cause),
            StepOutcome::Ignored(reason) => Self::Ignored(IgnoredReason::Sample(reason)),
        }
    }
}

/// Structured log record for one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchLogEntry {
    pub phase: HostPhase,
    /// Per-adapter counter, starting at 1.
    pub sequence: u64,
    pub timestamp_ms: Option<u64>,
    pub outcome: DispatchOutcome,
    pub callbacks_invoked: u32,
    pub callbacks_failed: u32,
}

/// Result of one adapter entry point.
#[derive(Debug, Clone, PartialEq)]
pub struct HostDispatch {
    /// Style effects to apply, already deduplicated.
    pub commands: Vec<StyleCommand>,
    pub log: DispatchLogEntry,
}

impl HostDispatch {
    /// Whether the host should call `preventDefault()` on the event.
    #[must_use]
    pub fn prevents_default(&self) -> bool {
        self.commands.contains(&StyleCommand::PreventDefault)
    }
}

/// Sequence counter and callback tally shared by every adapter.
#[derive(Debug, Clone, Default)]
pub(crate) struct DispatchLog {
    sequence: u64,
    invoked: u32,
    failed: u32,
}

impl DispatchLog {
    /// Count one callback attempt.
    pub(crate) fn callback(&mut self, ok: bool) {
        self.invoked = self.invoked.saturating_add(1);
        if !ok {
            self.failed = self.failed.saturating_add(1);
        }
    }

    /// Close the current dispatch and reset the callback tally.
    pub(crate) fn finish(
        &mut self,
        phase: HostPhase,
        timestamp_ms: Option<u64>,
        outcome: DispatchOutcome,
        commands: Vec<StyleCommand>,
    ) -> HostDispatch {
        self.sequence = self.sequence.saturating_add(1);
        let log = DispatchLogEntry {
            phase,
            sequence: self.sequence,
            timestamp_ms,
            outcome,
            callbacks_invoked: std::mem::take(&mut self.invoked),
            callbacks_failed: std::mem::take(&mut self.failed),
        };
        tracing::trace!(
            phase = ?log.phase,
            sequence = log.sequence,
            outcome = ?log.outcome,
            "adapter dispatch"
        );
        HostDispatch { commands, log }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glide_core::{Point, Tap};

    #[test]
    fn recognized_event_wins_over_step() {
        let step = Step {
            outcome: StepOutcome::Ended,
            suppress_default: false,
        };
        let tap = GestureEvent::Tap(Tap {
            pos: Point::new(1.0, 2.0),
            timestamp_ms: 3,
        });
        assert_eq!(
            DispatchOutcome::from_step(&step, Some(&tap)),
            DispatchOutcome::Recognized(GestureKind::Tap)
        );
        assert_eq!(
            DispatchOutcome::from_step(&step, None),
            DispatchOutcome::SessionEnded
        );
    }

    #[test]
    fn sequence_increments_and_tally_resets() {
        let mut log = DispatchLog::default();
        log.callback(true);
        log.callback(false);
        let first = log.finish(HostPhase::PointerUp, Some(5), DispatchOutcome::Tracking, vec![]);
        assert_eq!(first.log.sequence, 1);
        assert_eq!(first.log.callbacks_invoked, 2);
        assert_eq!(first.log.callbacks_failed, 1);
        let second = log.finish(HostPhase::Tick, None, DispatchOutcome::Tracking, vec![]);
        assert_eq!(second.log.sequence, 2);
        assert_eq!(second.log.callbacks_invoked, 0);
    }

    #[test]
    fn prevents_default_reads_commands() {
        let mut log = DispatchLog::default();
        let dispatch = log.finish(
            HostPhase::PointerMove,
            Some(1),
            DispatchOutcome::Tracking,
            vec![StyleCommand::PreventDefault],
        );
        assert!(dispatch.prevents_default());
    }
}
