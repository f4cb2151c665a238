#![forbid(unsafe_code)]

//! Navigation drawer adapter.
//!
//! Opening drags must start in the edge band of the drawer's side; closing
//! drags may start anywhere on the open panel. Raw horizontal travel is fed
//! to the [`PanelController`] on every move, and the release resolves with
//! the distance-or-velocity rule. An edge-gated classifier watches opening
//! sessions so vertical drift (scroll intent) drops the drag, and an opening
//! release it does not accept as an edge swipe lands back closed.

use std::rc::Rc;

use glide_core::gesture::TAP_SLOP_PX;
use glide_core::{
    CancelCause, DragGrant, DragRefused, EdgeDetector, GestureClassifier, GestureEvent,
    PanelController, PanelMode, PanelRest, PanelState, ResolveOutcome, SampleIgnored,
    StepOutcome, TouchSample, Viewport,
};

use crate::bridge::{GestureBridge, Interests};
use crate::dispatch::{DispatchLog, DispatchOutcome, HostDispatch, HostPhase, IgnoredReason};
use crate::host::{AppHost, HapticPulse, IsolatedHost, NavigationIntent};
use crate::options::{HostOptions, OptionsError};
use crate::style::{CursorStyle, StyleCommand, StyleLedger, TouchAction};

#[derive(Debug, Clone, Copy, PartialEq)]
struct ActiveDrag {
    contact_id: u32,
    origin_x: f64,
    /// Opening drag, also tracked by the edge-gated classifier.
    gated: bool,
}

/// Drives a sliding navigation drawer from raw pointer samples.
pub struct NavigationDrawerAdapter<H> {
    bridge: GestureBridge,
    detector: EdgeDetector,
    viewport: Rc<dyn Fn() -> Viewport>,
    panel: PanelController,
    host: IsolatedHost<H>,
    ledger: StyleLedger,
    log: DispatchLog,
    drag: Option<ActiveDrag>,
    destroyed: bool,
}

impl<H: std::fmt::Debug> std::fmt::Debug for NavigationDrawerAdapter<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavigationDrawerAdapter")
            .field("panel", &self.panel.state())
            .field("drag", &self.drag)
            .field("host", &self.host)
            .field("destroyed", &self.destroyed)
            .finish()
    }
}

impl<H: AppHost> NavigationDrawerAdapter<H> {
    /// Build the adapter. `viewport` is queried at every session start.
    pub fn new(
        options: &HostOptions,
        viewport: impl Fn() -> Viewport + 'static,
        host: H,
    ) -> Result<Self, OptionsError> {
        let panel_config = options.panel_config()?;
        let spec = options.edge_spec(panel_config.side.edge())?;
        let detector = EdgeDetector::new(spec)?;
        let viewport: Rc<dyn Fn() -> Viewport> = Rc::new(viewport);
        let classifier_viewport = Rc::clone(&viewport);
        let classifier =
            GestureClassifier::edge_gated(options.gesture_config()?, detector, move || {
                classifier_viewport()
            })?;
        Ok(Self {
            bridge: GestureBridge::new(classifier, Interests::default()),
            detector,
            viewport,
            panel: PanelController::new(panel_config)?,
            host: IsolatedHost::new(host),
            ledger: StyleLedger::new(),
            log: DispatchLog::default(),
            drag: None,
            destroyed: false,
        })
    }

    #[must_use]
    pub fn panel_state(&self) -> PanelState {
        self.panel.state()
    }

    #[must_use]
    pub fn host(&self) -> &H {
        self.host.host()
    }

    pub fn host_mut(&mut self) -> &mut H {
        self.host.host_mut()
    }

    /// Application callbacks that failed and were isolated.
    #[must_use]
    pub const fn callback_failures(&self) -> u64 {
        self.host.failures()
    }

    #[must_use]
    pub const fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Earliest time the host should call [`tick`](Self::tick).
    #[must_use]
    pub fn next_deadline(&self) -> Option<u64> {
        match (
            self.panel.next_deadline(),
            self.bridge.classifier().next_deadline(),
        ) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Initial element styles.
    pub fn mount(&mut self) -> HostDispatch {
        if self.destroyed {
            return self.ignored(HostPhase::Mount, None, IgnoredReason::Destroyed);
        }
        let mut commands = Vec::new();
        self.ledger
            .apply(StyleCommand::SetTouchAction(TouchAction::PanY), &mut commands);
        self.ledger.apply(
            StyleCommand::SetTransform {
                translate_x_px: self.panel.drag_offset_px(),
            },
            &mut commands,
        );
        self.log
            .finish(HostPhase::Mount, None, DispatchOutcome::Mounted, commands)
    }

    pub fn pointer_down(&mut self, sample: &TouchSample) -> HostDispatch {
        let phase = HostPhase::PointerDown;
        let now = Some(sample.timestamp_ms);
        if self.destroyed {
            return self.ignored(phase, now, IgnoredReason::Destroyed);
        }
        if let Some(drag) = self.drag {
            // Extra contact during a drag.
            if drag.gated {
                let (step, _) = self.bridge.start(sample);
                if let StepOutcome::Cancelled(cause) = step.outcome {
                    return self.drop_drag(phase, now, cause);
                }
            }
            return self.ignored(
                phase,
                now,
                IgnoredReason::Sample(SampleIgnored::SessionAlreadyActive),
            );
        }
        let Some(contact) = sample.first() else {
            return self.ignored(phase, now, IgnoredReason::Sample(SampleIgnored::EmptySample));
        };

        let (grant, gated) = match self.panel.mode() {
            PanelMode::Closed => {
                let Some(admission) = self.detector.admit(contact.pos, (self.viewport)()) else {
                    return self.ignored(
                        phase,
                        now,
                        IgnoredReason::Sample(SampleIgnored::OutsideEdgeBand),
                    );
                };
                (DragGrant::Edge(admission), true)
            }
            PanelMode::Open => (DragGrant::PanelSurface, false),
            PanelMode::Opening | PanelMode::Closing => {
                return self.ignored(phase, now, IgnoredReason::Drag(DragRefused::Animating));
            }
            PanelMode::Dragging => {
                return self.ignored(phase, now, IgnoredReason::Drag(DragRefused::AlreadyDragging));
            }
        };

        if gated {
            let (step, _) = self.bridge.start(sample);
            if let StepOutcome::Ignored(reason) = step.outcome {
                return self.ignored(phase, now, IgnoredReason::Sample(reason));
            }
        }
        if let Err(refused) = self.panel.start_drag(grant, sample.timestamp_ms) {
            if gated {
                self.bridge.cancel();
            }
            return self.ignored(phase, now, IgnoredReason::Drag(refused));
        }
        self.drag = Some(ActiveDrag {
            contact_id: contact.id,
            origin_x: contact.pos.x,
            gated,
        });

        let mut commands = Vec::new();
        self.ledger
            .apply(StyleCommand::SetTransition { duration_ms: 0 }, &mut commands);
        self.ledger
            .apply(StyleCommand::SetCursor(CursorStyle::Grabbing), &mut commands);
        self.log
            .finish(phase, now, DispatchOutcome::DragStarted, commands)
    }

    pub fn pointer_move(&mut self, sample: &TouchSample) -> HostDispatch {
        let phase = HostPhase::PointerMove;
        let now = Some(sample.timestamp_ms);
        if self.destroyed {
            return self.ignored(phase, now, IgnoredReason::Destroyed);
        }
        let Some(drag) = self.drag else {
            return self.ignored(
                phase,
                now,
                IgnoredReason::Sample(SampleIgnored::NoActiveSession),
            );
        };

        let mut suppress = false;
        if drag.gated {
            let (step, _) = self.bridge.move_to(sample);
            match step.outcome {
                StepOutcome::Cancelled(cause) => return self.drop_drag(phase, now, cause),
                StepOutcome::Ignored(reason) => {
                    return self.ignored(phase, now, IgnoredReason::Sample(reason));
                }
                _ => suppress = step.suppress_default,
            }
        }
        let Some(pos) = sample.position_of(drag.contact_id) else {
            return self.ignored(
                phase,
                now,
                IgnoredReason::Sample(SampleIgnored::ContactMismatch),
            );
        };
        let delta_x = pos.x - drag.origin_x;
        if !drag.gated {
            suppress = delta_x.abs() > TAP_SLOP_PX;
        }

        let mut commands = Vec::new();
        if let Some(update) = self.panel.update_drag(delta_x, sample.timestamp_ms) {
            self.ledger.apply(
                StyleCommand::SetTransform {
                    translate_x_px: update.drag_offset_px,
                },
                &mut commands,
            );
        }
        if suppress {
            self.ledger.apply(StyleCommand::PreventDefault, &mut commands);
        }
        self.log
            .finish(phase, now, DispatchOutcome::DragUpdated, commands)
    }

    pub fn pointer_up(&mut self, sample: &TouchSample) -> HostDispatch {
        let phase = HostPhase::PointerUp;
        let now = Some(sample.timestamp_ms);
        if self.destroyed {
            return self.ignored(phase, now, IgnoredReason::Destroyed);
        }
        let Some(drag) = self.drag else {
            return self.ignored(
                phase,
                now,
                IgnoredReason::Sample(SampleIgnored::NoActiveSession),
            );
        };
        if sample.touches.iter().any(|contact| contact.id == drag.contact_id) {
            // The dragging contact is still down; another one lifted.
            if drag.gated {
                self.bridge.end(sample);
            }
            return self.log.finish(phase, now, DispatchOutcome::Tracking, Vec::new());
        }
        let edge_accepted = !drag.gated || {
            let (step, _) = self.bridge.end(sample);
            matches!(step.event(), Some(GestureEvent::Swipe(_)))
        };
        if !edge_accepted {
            self.drag = None;
            self.panel.cancel_drag();
            tracing::debug!("drawer edge release short of the opening travel");
            let mut commands = Vec::new();
            self.settle(&mut commands);
            return self.log.finish(
                phase,
                now,
                DispatchOutcome::DragResolved(ResolveOutcome::Cancelled),
                commands,
            );
        }
        if let Some(pos) = sample.position_of(drag.contact_id) {
            self.panel
                .update_drag(pos.x - drag.origin_x, sample.timestamp_ms);
        }
        self.drag = None;

        let Some(resolution) = self.panel.resolve_drag(sample.timestamp_ms) else {
            return self.ignored(
                phase,
                now,
                IgnoredReason::Sample(SampleIgnored::NoActiveSession),
            );
        };
        tracing::debug!(
            outcome = ?resolution.outcome,
            target = ?resolution.target,
            velocity = resolution.velocity_px_per_ms,
            "drawer drag resolved"
        );

        let mut commands = Vec::new();
        self.settle(&mut commands);
        if resolution.outcome == ResolveOutcome::Entered {
            let intent = match resolution.target {
                PanelRest::Open => NavigationIntent::OpenDrawer,
                PanelRest::Closed => NavigationIntent::CloseDrawer,
            };
            let ok = self.host.navigate(intent);
            self.log.callback(ok);
            let ok = self.host.haptic(HapticPulse::Light);
            self.log.callback(ok);
        }
        self.log.finish(
            phase,
            now,
            DispatchOutcome::DragResolved(resolution.outcome),
            commands,
        )
    }

    pub fn pointer_cancel(&mut self, timestamp_ms: u64) -> HostDispatch {
        let phase = HostPhase::PointerCancel;
        let now = Some(timestamp_ms);
        if self.destroyed {
            return self.ignored(phase, now, IgnoredReason::Destroyed);
        }
        if self.drag.is_none() {
            return self.ignored(
                phase,
                now,
                IgnoredReason::Sample(SampleIgnored::NoActiveSession),
            );
        }
        self.drop_drag(phase, now, CancelCause::Host)
    }

    /// Fire due timers and land finished animations.
    pub fn tick(&mut self, now_ms: u64) -> HostDispatch {
        let phase = HostPhase::Tick;
        let now = Some(now_ms);
        if self.destroyed {
            return self.ignored(phase, now, IgnoredReason::Destroyed);
        }
        self.bridge.poll(now_ms);
        match self.panel.poll(now_ms) {
            Some(rest) => {
                self.log
                    .finish(phase, now, DispatchOutcome::PanelLanded(rest), Vec::new())
            }
            None => self.ignored(phase, now, IgnoredReason::NothingDue),
        }
    }

    /// Programmatic open/close (menu button). Refused while dragging.
    pub fn toggle(&mut self, now_ms: u64) -> HostDispatch {
        let phase = HostPhase::Toggle;
        let now = Some(now_ms);
        if self.destroyed {
            return self.ignored(phase, now, IgnoredReason::Destroyed);
        }
        if !self.panel.toggle(now_ms) {
            return self.ignored(phase, now, IgnoredReason::Drag(DragRefused::AlreadyDragging));
        }
        let mut commands = Vec::new();
        self.settle(&mut commands);
        self.log
            .finish(phase, now, DispatchOutcome::PanelAnimating, commands)
    }

    /// Detach: force-resolve any drag, clear timers, restore styles.
    pub fn destroy(&mut self) -> HostDispatch {
        let phase = HostPhase::Destroy;
        if self.destroyed {
            return self.ignored(phase, None, IgnoredReason::Destroyed);
        }
        self.bridge.destroy();
        self.panel.destroy();
        self.drag = None;
        self.destroyed = true;

        let mut commands = Vec::new();
        self.ledger.apply(
            StyleCommand::SetTransform {
                translate_x_px: self.panel.drag_offset_px(),
            },
            &mut commands,
        );
        commands.extend(self.ledger.reset());
        tracing::debug!(mode = self.panel.mode().as_str(), "drawer destroyed");
        self.log
            .finish(phase, None, DispatchOutcome::Destroyed, commands)
    }

    fn drop_drag(
        &mut self,
        phase: HostPhase,
        now: Option<u64>,
        cause: CancelCause,
    ) -> HostDispatch {
        if self.drag.take().is_some_and(|drag| drag.gated) {
            self.bridge.cancel();
        }
        self.panel.cancel_drag();
        let mut commands = Vec::new();
        self.settle(&mut commands);
        self.log
            .finish(phase, now, DispatchOutcome::Cancelled(cause), commands)
    }

    /// Animate to wherever the panel is heading.
    fn settle(&mut self, commands: &mut Vec<StyleCommand>) {
        let duration_ms = self.panel.config().snap_duration_ms;
        self.ledger
            .apply(StyleCommand::SetTransition { duration_ms }, commands);
        self.ledger.apply(
            StyleCommand::SetTransform {
                translate_x_px: self.panel.drag_offset_px(),
            },
            commands,
        );
        self.ledger
            .apply(StyleCommand::SetCursor(CursorStyle::Auto), commands);
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
