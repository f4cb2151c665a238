#![forbid(unsafe_code)]

//! Conversation surface adapter.
//!
//! Horizontal swipes step between conversations, a long press opens the
//! message action sheet, and pinches rescale the chat text.

use glide_core::{GestureClassifier, GestureEvent, Step, SwipeDirection, TouchSample};

use crate::bridge::{GestureBridge, Interests};
use crate::dispatch::{DispatchLog, DispatchOutcome, HostDispatch, HostPhase, IgnoredReason};
use crate::host::{AppHost, HapticPulse, IsolatedHost, NavigationIntent};
use crate::options::{HostOptions, OptionsError};
use crate::style::{StyleCommand, StyleLedger, TouchAction};

/// Smallest text scale a pinch can reach.
pub const MIN_TEXT_SCALE: f64 = 0.75;
/// Largest text scale a pinch can reach.
pub const MAX_TEXT_SCALE: f64 = 2.0;

/// Routes classified gestures on the chat surface to navigation callbacks.
#[derive(Debug)]
pub struct ChatSwipeAdapter<H> {
    bridge: GestureBridge,
    host: IsolatedHost<H>,
    ledger: StyleLedger,
    log: DispatchLog,
    text_scale: f64,
    destroyed: bool,
}

impl<H: AppHost> ChatSwipeAdapter<H> {
    pub fn new(options: &HostOptions, host: H) -> Result<Self, OptionsError> {
        let classifier = GestureClassifier::new(options.gesture_config()?)?;
        let interests = Interests {
            swipe: true,
            long_press: true,
            pinch: true,
            ..Interests::default()
        };
        Ok(Self {
            bridge: GestureBridge::new(classifier, interests),
            host: IsolatedHost::new(host),
            ledger: StyleLedger::new(),
            log: DispatchLog::default(),
            text_scale: 1.0,
            destroyed: false,
        })
    }

    /// Current absolute text scale.
    #[must_use]
    pub const fn text_scale(&self) -> f64 {
        self.text_scale
    }

    #[must_use]
    pub fn host(&self) -> &H {
        self.host.host()
    }

    pub fn host_mut(&mut self) -> &mut H {
        self.host.host_mut()
    }

    #[must_use]
    pub const fn callback_failures(&self) -> u64 {
        self.host.failures()
    }

    #[must_use]
    pub const fn is_destroyed(&self) -> bool {
        self.destroyed
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
            .apply(StyleCommand::SetTouchAction(TouchAction::PanY), &mut commands);
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

    /// Fire a due long press.
    pub fn tick(&mut self, now_ms: u64) -> HostDispatch {
        let phase = HostPhase::Tick;
        if self.destroyed {
            return self.ignored(phase, Some(now_ms), IgnoredReason::Destroyed);
        }
        let events = self.bridge.poll(now_ms);
        let Some(last) = events.last().copied() else {
            return self.ignored(phase, Some(now_ms), IgnoredReason::NothingDue);
        };
        for event in &events {
            self.deliver(event);
        }
        let outcome = DispatchOutcome::Recognized((&last).into());
        self.log.finish(phase, Some(now_ms), outcome, Vec::new())
    }

    pub fn destroy(&mut self) -> HostDispatch {
        if self.destroyed {
            return self.ignored(HostPhase::Destroy, None, IgnoredReason::Destroyed);
        }
        self.bridge.destroy();
        self.destroyed = true;
        let commands = self.ledger.reset();
        tracing::debug!(text_scale = self.text_scale, "chat adapter destroyed");
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
        match event {
            GestureEvent::Swipe(swipe) => {
                let intent = match swipe.direction {
                    SwipeDirection::Right => NavigationIntent::PreviousConversation,
                    SwipeDirection::Left => NavigationIntent::NextConversation,
                    SwipeDirection::Up | SwipeDirection::Down => return,
                };
                let ok = self.host.navigate(intent);
                self.log.callback(ok);
            }
            GestureEvent::LongPress(press) => {
                let ok = self.host.navigate(NavigationIntent::MessageActions {
                    x: press.pos.x,
                    y: press.pos.y,
                });
                self.log.callback(ok);
                let ok = self.host.haptic(HapticPulse::Medium);
                self.log.callback(ok);
            }
            GestureEvent::PinchDelta(pinch) => {
                let scaled = (self.text_scale * pinch.scale).clamp(MIN_TEXT_SCALE, MAX_TEXT_SCALE);
                if scaled == self.text_scale {
                    return;
                }
                self.text_scale = scaled;
                let ok = self
                    .host
                    .navigate(NavigationIntent::SetTextScale { factor: scaled });
                self.log.callback(ok);
            }
            GestureEvent::Tap(_) => {}
        }
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
