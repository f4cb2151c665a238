#![forbid(unsafe_code)]

//! Quick-action overlay adapter.
//!
//! The overlay owns every touch on its surface (`touch-action: none`):
//! tap runs the primary action, swipe up starts a new chat, swipe down
//! dismisses, and a long press shows a hint toast. Pinch is off here.

use glide_core::{GestureClassifier, GestureEvent, Step, SwipeDirection, TouchSample};

use crate::bridge::{GestureBridge, Interests};
use crate::dispatch::{DispatchLog, DispatchOutcome, HostDispatch, HostPhase, IgnoredReason};
use crate::host::{AppHost, HapticPulse, IsolatedHost, NavigationIntent};
use crate::options::{HostOptions, OptionsError};
use crate::style::{StyleCommand, StyleLedger, TouchAction};

pub const DEFAULT_HINT: &str = "Swipe up for a new chat, down to dismiss";

#[derive(Debug)]
pub struct QuickActionOverlay<H> {
    bridge: GestureBridge,
    host: IsolatedHost<H>,
    ledger: StyleLedger,
    log: DispatchLog,
    hint: String,
    destroyed: bool,
}

impl<H: AppHost> QuickActionOverlay<H> {
    /// Build the overlay. `pinchEnabled` in `options` is overridden.
    pub fn new(options: &HostOptions, host: H) -> Result<Self, OptionsError> {
        let config = options.gesture_config()?.with_pinch(false);
        let classifier = GestureClassifier::new(config)?;
        let interests = Interests {
            tap: true,
            long_press: true,
            swipe: true,
            pinch: false,
        };
        Ok(Self {
            bridge: GestureBridge::new(classifier, interests),
            host: IsolatedHost::new(host),
            ledger: StyleLedger::new(),
            log: DispatchLog::default(),
            hint: DEFAULT_HINT.to_owned(),
            destroyed: false,
        })
    }

    #[must_use]
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = hint.into();
        self
    }

    #[must_use]
    pub fn hint(&self) -> &str {
        &self.hint
    }

    #[must_use]
    pub fn host(&self) -> &H {
        self.host.host()
    }

    #[must_use]
    pub const fn callback_failures(&self) -> u64 {
        self.host.failures()
    }

    #[must_use]
    pub fn next_deadline(&self) -> Option<u64> {
        self.bridge.classifier().next_deadline()
    }

    pub fn mount(&mut self) -> HostDispatch {
        if self.destroyed {
            return self.ignored(HostPhase::Mount, None, IgnoredReason::Destroyed);
        }
        let mut commands = Vec::new();
        self.ledger
            .apply(StyleCommand::SetTouchAction(TouchAction::None), &mut commands);
        self.log
            .finish(HostPhase::Mount, None, DispatchOutcome::Mounted, commands)
    }

    pub fn pointer_down(&mut self, sample: &TouchSample) -> HostDispatch {
        let (step, events) = self.bridge.start(sample);
        self.route(HostPhase::PointerDown, sample.timestamp_ms, &step, events)
    }

    pub fn pointer_move(&mut self, sample: &TouchSample) -> HostDispatch {
        let (step, events) = self.bridge.move_to(sample);
        self.route(HostPhase::PointerMove, sample.timestamp_ms, &step, events)
    }

    pub fn pointer_up(&mut self, sample: &TouchSample) -> HostDispatch {
        let (step, events) = self.bridge.end(sample);
        self.route(HostPhase::PointerUp, sample.timestamp_ms, &step, events)
    }

    pub fn pointer_cancel(&mut self, timestamp_ms: u64) -> HostDispatch {
        let step = self.bridge.cancel();
        self.route(HostPhase::PointerCancel, timestamp_ms, &step, Vec::new())
    }

    pub fn tick(&mut self, now_ms: u64) -> HostDispatch {
        if self.destroyed {
            return self.ignored(HostPhase::Tick, Some(now_ms), IgnoredReason::Destroyed);
        }
        let events = self.bridge.poll(now_ms);
        let Some(last) = events.last().copied() else {
            return self.ignored(HostPhase::Tick, Some(now_ms), IgnoredReason::NothingDue);
        };
        for event in &events {
            self.deliver(event);
        }
        let outcome = DispatchOutcome::Recognized((&last).into());
        self.log
            .finish(HostPhase::Tick, Some(now_ms), outcome, Vec::new())
    }

    pub fn destroy(&mut self) -> HostDispatch {
        if self.destroyed {
            return self.ignored(HostPhase::Destroy, None, IgnoredReason::Destroyed);
        }
        self.bridge.destroy();
        self.destroyed = true;
        let commands = self.ledger.reset();
        self.log
            .finish(HostPhase::Destroy, None, DispatchOutcome::Destroyed, commands)
    }

    fn route(
        &mut self,
        phase: HostPhase,
        timestamp_ms: u64,
        step: &Step,
        events: Vec<GestureEvent>,
    ) -> HostDispatch {
        for event in &events {
            self.deliver(event);
        }
        let mut commands = Vec::new();
        if step.suppress_default {
            self.ledger.apply(StyleCommand::PreventDefault, &mut commands);
        }
        let outcome = DispatchOutcome::from_step(step, events.last());
        self.log.finish(phase, Some(timestamp_ms), outcome, commands)
    }

    fn deliver(&mut self, event: &GestureEvent) {
        let intent = match event {
            GestureEvent::Tap(_) => NavigationIntent::PrimaryAction,
            GestureEvent::Swipe(swipe) => match swipe.direction {
                SwipeDirection::Up => NavigationIntent::NewChat,
                SwipeDirection::Down => NavigationIntent::DismissOverlay,
                SwipeDirection::Left | SwipeDirection::Right => return,
            },
            GestureEvent::LongPress(_) => {
                let ok = self.host.toast(&self.hint);
                self.log.callback(ok);
                let ok = self.host.haptic(HapticPulse::Light);
                self.log.callback(ok);
                return;
            }
            GestureEvent::PinchDelta(_) => return,
        };
        let ok = self.host.navigate(intent);
        self.log.callback(ok);
    }

    fn ignored(
        &mut self,
        phase: HostPhase,
        now: Option<u64>,
        reason: IgnoredReason,
    ) -> HostDispatch {
        self.log
            .finish(phase, now, DispatchOutcome::Ignored(reason), Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::GestureKind;
    use crate::host::CallbackResult;
    use glide_core::{CancelCause, Contact};

    #[derive(Debug, Default)]
    struct Recorder {
        intents: Vec<NavigationIntent>,
        toasts: Vec<String>,
    }

    impl AppHost for Recorder {
        fn navigate(&mut self, intent: NavigationIntent) -> CallbackResult {
            self.intents.push(intent);
            Ok(())
        }

        fn toast(&mut self, message: &str) -> CallbackResult {
            self.toasts.push(message.to_owned());
            Ok(())
        }
    }

    fn overlay() -> QuickActionOverlay<Recorder> {
        QuickActionOverlay::new(&HostOptions::default(), Recorder::default()).expect("valid")
    }

    #[test]
    fn mount_claims_all_touches() {
        let mut o = overlay();
        assert_eq!(
            o.mount().commands,
            vec![StyleCommand::SetTouchAction(TouchAction::None)]
        );
    }

    #[test]
    fn tap_and_vertical_swipes_route() {
        let mut o = overlay();
        o.pointer_down(&TouchSample::single(0, 200.0, 600.0));
        let tap = o.pointer_up(&TouchSample::lifted(80, 202.0, 601.0));
        assert_eq!(tap.log.outcome, DispatchOutcome::Recognized(GestureKind::Tap));

        o.pointer_down(&TouchSample::single(200, 200.0, 600.0));
        o.pointer_up(&TouchSample::lifted(300, 205.0, 450.0));
        o.pointer_down(&TouchSample::single(400, 200.0, 300.0));
        o.pointer_up(&TouchSample::lifted(500, 195.0, 480.0));
        o.pointer_down(&TouchSample::single(600, 100.0, 300.0));
        o.pointer_up(&TouchSample::lifted(700, 250.0, 300.0));

        assert_eq!(
            o.host().intents,
            vec![
                NavigationIntent::PrimaryAction,
                NavigationIntent::NewChat,
                NavigationIntent::DismissOverlay,
            ]
        );
    }

    #[test]
    fn long_press_shows_custom_hint() {
        let mut o = overlay().with_hint("Hold harder");
        o.pointer_down(&TouchSample::single(0, 200.0, 600.0));
        let tick = o.tick(500);
        assert_eq!(
            tick.log.outcome,
            DispatchOutcome::Recognized(GestureKind::LongPress)
        );
        assert_eq!(tick.log.callbacks_invoked, 2);
        assert_eq!(o.host().toasts, vec!["Hold harder".to_owned()]);
        let up = o.pointer_up(&TouchSample::lifted(700, 200.0, 600.0));
        assert_eq!(up.log.outcome, DispatchOutcome::SessionEnded);
        assert!(o.host().intents.is_empty());
    }

    #[test]
    fn second_finger_cancels_without_pinch() {
        let mut o = overlay();
        o.pointer_down(&TouchSample::single(0, 200.0, 600.0));
        let two = TouchSample::down(
            20,
            &[Contact::new(0, 200.0, 600.0), Contact::new(1, 260.0, 600.0)],
        );
        let down = o.pointer_down(&two);
        assert_eq!(
            down.log.outcome,
            DispatchOutcome::Cancelled(CancelCause::SecondContact)
        );
        assert_eq!(o.next_deadline(), None);
    }

    #[test]
    fn quiet_tick_reports_nothing_due() {
        let mut o = overlay();
        assert_eq!(
            o.tick(10).log.outcome,
            DispatchOutcome::Ignored(IgnoredReason::NothingDue)
        );
        assert_eq!(o.hint(), DEFAULT_HINT);
    }
}
