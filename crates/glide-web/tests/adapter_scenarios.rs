#![forbid(unsafe_code)]

//! End-to-end adapter scenarios: JSON mount options, failing application
//! callbacks, and teardown.

use std::sync::{Arc, Mutex};

use glide_core::{PanelMode, ResolveOutcome, SwipeDirection, TouchSample, Viewport};
use glide_web::{
    AppHost, CallbackError, CallbackResult, ChatSwipeAdapter, DispatchOutcome, GestureKind,
    HapticPulse, HostOptions, IgnoredReason, NavigationDrawerAdapter, NavigationIntent,
    QuickActionOverlay, StyleCommand, TouchAction,
};
use pretty_assertions::assert_eq;
use tracing::Subscriber;
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

const PHONE: Viewport = Viewport::new(400.0, 800.0);

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

/// Navigation panics, toasts fail, haptics succeed.
#[derive(Debug, Default)]
struct Broken {
    haptics: u32,
}

impl AppHost for Broken {
    fn navigate(&mut self, intent: NavigationIntent) -> CallbackResult {
        panic!("router exploded on {}", intent.as_str());
    }

    fn toast(&mut self, _message: &str) -> CallbackResult {
        Err(CallbackError::new("toast queue full"))
    }

    fn haptic(&mut self, _pulse: HapticPulse) -> CallbackResult {
        self.haptics += 1;
        Ok(())
    }
}

// =========================================================================
// Drawer
// =========================================================================

#[test]
fn right_edge_drawer_from_json_options() {
    let options = HostOptions::from_json(r#"{"edge":"right","panelWidthPx":300}"#)
        .expect("valid options");
    let mut drawer =
        NavigationDrawerAdapter::new(&options, || PHONE, Recorder::default()).expect("mounts");
    let mount = drawer.mount();
    assert_eq!(
        mount.commands,
        vec![
            StyleCommand::SetTouchAction(TouchAction::PanY),
            StyleCommand::SetTransform {
                translate_x_px: 300.0
            },
        ]
    );

    // Left-edge starts are outside the band for a right drawer.
    let miss = drawer.pointer_down(&TouchSample::single(0, 5.0, 400.0));
    assert!(matches!(miss.log.outcome, DispatchOutcome::Ignored(_)));

    drawer.pointer_down(&TouchSample::single(100, 390.0, 400.0));
    let mv = drawer.pointer_move(&TouchSample::single(120, 300.0, 402.0));
    assert!(mv.commands.contains(&StyleCommand::SetTransform {
        translate_x_px: 210.0
    }));
    let up = drawer.pointer_up(&TouchSample::lifted(140, 300.0, 402.0));
    assert_eq!(
        up.log.outcome,
        DispatchOutcome::DragResolved(ResolveOutcome::Entered)
    );
    assert_eq!(drawer.panel_state().mode, PanelMode::Opening);
    assert_eq!(drawer.host().intents, vec![NavigationIntent::OpenDrawer]);
}

#[test]
fn drawer_state_survives_panicking_navigation() {
    let mut drawer =
        NavigationDrawerAdapter::new(&HostOptions::default(), || PHONE, Broken::default())
            .expect("mounts");
    drawer.pointer_down(&TouchSample::single(0, 4.0, 300.0));
    drawer.pointer_move(&TouchSample::single(30, 200.0, 300.0));
    let up = drawer.pointer_up(&TouchSample::lifted(60, 200.0, 300.0));

    assert_eq!(up.log.callbacks_invoked, 2);
    assert_eq!(up.log.callbacks_failed, 1);
    assert_eq!(drawer.callback_failures(), 1);
    assert_eq!(drawer.host().haptics, 1);
    assert_eq!(drawer.panel_state().mode, PanelMode::Opening);

    let landed = drawer.tick(360);
    assert_eq!(
        landed.log.outcome,
        DispatchOutcome::PanelLanded(glide_core::PanelRest::Open)
    );
}

#[test]
fn drawer_sequence_numbers_are_monotonic() {
    let mut drawer =
        NavigationDrawerAdapter::new(&HostOptions::default(), || PHONE, Recorder::default())
            .expect("mounts");
    let sequences: Vec<u64> = [
        drawer.mount(),
        drawer.pointer_down(&TouchSample::single(0, 4.0, 300.0)),
        drawer.pointer_cancel(10),
        drawer.tick(20),
        drawer.destroy(),
    ]
    .iter()
    .map(|dispatch| dispatch.log.sequence)
    .collect();
    assert_eq!(sequences, vec![1, 2, 3, 4, 5]);
}

// =========================================================================
// Chat and overlay
// =========================================================================

#[test]
fn chat_swipe_survives_panicking_navigation() {
    let mut chat = ChatSwipeAdapter::new(&HostOptions::default(), Broken::default())
        .expect("mounts");
    chat.pointer_down(&TouchSample::single(0, 300.0, 400.0));
    let up = chat.pointer_up(&TouchSample::lifted(100, 150.0, 400.0));
    assert_eq!(
        up.log.outcome,
        DispatchOutcome::Recognized(GestureKind::Swipe(SwipeDirection::Left))
    );
    assert_eq!(up.log.callbacks_failed, 1);

    // The classifier is idle and ready for the next gesture.
    let down = chat.pointer_down(&TouchSample::single(200, 300.0, 400.0));
    assert_eq!(down.log.outcome, DispatchOutcome::SessionBegan);
}

#[test]
fn overlay_toast_error_is_counted() {
    let mut overlay = QuickActionOverlay::new(&HostOptions::default(), Broken::default())
        .expect("mounts");
    overlay.pointer_down(&TouchSample::single(0, 200.0, 600.0));
    let tick = overlay.tick(500);
    assert_eq!(tick.log.callbacks_invoked, 2);
    assert_eq!(tick.log.callbacks_failed, 1);
    assert_eq!(overlay.host().haptics, 1);
}

#[test]
fn custom_thresholds_flow_into_classifier() {
    let options = HostOptions::from_json(r#"{"swipeThresholdPx":120}"#).expect("valid options");
    let mut chat = ChatSwipeAdapter::new(&options, Recorder::default()).expect("mounts");
    chat.pointer_down(&TouchSample::single(0, 300.0, 400.0));
    let up = chat.pointer_up(&TouchSample::lifted(100, 200.0, 400.0));
    assert_eq!(up.log.outcome, DispatchOutcome::SessionEnded);
    assert!(chat.host().intents.is_empty());
}

#[test]
fn every_adapter_tolerates_double_destroy() {
    let mut drawer =
        NavigationDrawerAdapter::new(&HostOptions::default(), || PHONE, Recorder::default())
            .expect("mounts");
    let mut chat = ChatSwipeAdapter::new(&HostOptions::default(), Recorder::default())
        .expect("mounts");
    let mut overlay = QuickActionOverlay::new(&HostOptions::default(), Recorder::default())
        .expect("mounts");
    drawer.mount();
    chat.mount();
    overlay.mount();
    drawer.pointer_down(&TouchSample::single(0, 4.0, 300.0));
    chat.pointer_down(&TouchSample::single(0, 100.0, 300.0));
    overlay.pointer_down(&TouchSample::single(0, 100.0, 300.0));

    let firsts = [drawer.destroy(), chat.destroy(), overlay.destroy()];
    for dispatch in &firsts {
        assert_eq!(dispatch.log.outcome, DispatchOutcome::Destroyed);
        assert!(dispatch
            .commands
            .contains(&StyleCommand::SetTouchAction(TouchAction::Auto)));
    }
    let seconds = [drawer.destroy(), chat.destroy(), overlay.destroy()];
    for dispatch in &seconds {
        assert_eq!(
            dispatch.log.outcome,
            DispatchOutcome::Ignored(IgnoredReason::Destroyed)
        );
        assert!(dispatch.commands.is_empty());
    }

    // Timers armed before teardown never fire.
    for now in [500, 1_000] {
        assert!(matches!(
            chat.tick(now).log.outcome,
            DispatchOutcome::Ignored(IgnoredReason::Destroyed)
        ));
        assert!(matches!(
            overlay.tick(now).log.outcome,
            DispatchOutcome::Ignored(IgnoredReason::Destroyed)
        ));
    }
    assert!(chat.host().intents.is_empty());
    assert!(overlay.host().toasts.is_empty());
}

// =========================================================================
// Tracing
// =========================================================================

#[derive(Default)]
struct WarnState {
    messages: Vec<String>,
    callbacks: Vec<String>,
}

struct WarnCapture {
    state: Arc<Mutex<WarnState>>,
}

impl<S> Layer<S> for WarnCapture
where
    S: Subscriber + for<'lookup> tracing_subscriber::registry::LookupSpan<'lookup>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() != tracing::Level::WARN {
            return;
        }
        struct Fields {
            message: Option<String>,
            callback: Option<String>,
        }
        impl tracing::field::Visit for Fields {
            fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
                match field.name() {
                    "message" => self.message = Some(value.to_string()),
                    "callback" => self.callback = Some(value.to_string()),
                    _ => {}
                }
            }

            fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
                let text = format!("{value:?}").trim_matches('"').to_string();
                match field.name() {
                    "message" => self.message = Some(text),
                    "callback" => self.callback = Some(text),
                    _ => {}
                }
            }
        }
        let mut fields = Fields {
            message: None,
            callback: None,
        };
        event.record(&mut fields);
        let mut state = self.state.lock().expect("warn capture lock");
        if let Some(message) = fields.message {
            state.messages.push(message);
        }
        if let Some(callback) = fields.callback {
            state.callbacks.push(callback);
        }
    }
}

#[test]
fn callback_failures_are_logged_as_warnings() {
    let state = Arc::new(Mutex::new(WarnState::default()));
    let subscriber = tracing_subscriber::registry().with(WarnCapture {
        state: Arc::clone(&state),
    });
    let _guard = tracing::subscriber::set_default(subscriber);

    let mut overlay = QuickActionOverlay::new(&HostOptions::default(), Broken::default())
        .expect("mounts");
    overlay.pointer_down(&TouchSample::single(0, 200.0, 600.0));
    overlay.pointer_up(&TouchSample::lifted(50, 200.0, 600.0));
    overlay.pointer_down(&TouchSample::single(100, 200.0, 600.0));
    overlay.tick(600);

    let snapshot = state.lock().expect("warn capture lock");
    assert_eq!(
        snapshot.messages,
        vec![
            "host callback panicked".to_string(),
            "host callback returned an error".to_string(),
        ]
    );
    assert_eq!(
        snapshot.callbacks,
        vec!["primary_action".to_string(), "toast".to_string()]
    );
}
