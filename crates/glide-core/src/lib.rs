#![forbid(unsafe_code)]

//! Core: touch sessions, gesture classification, edge gating, and the
//! drag-to-reveal panel state machine.
//!
//! # Role in Glide
//! `glide-core` is the engine. It owns no platform bindings: the host pushes
//! touch samples and millisecond timestamps in, and reads classified events
//! back through listeners and step results.
//!
//! # Primary responsibilities
//! - **SessionTracker**: lifecycle of one contact (or contact pair).
//! - **GestureClassifier**: tap, long-press, directional swipe, pinch.
//! - **EdgeDetector**: restrict session starts to a band at a screen edge.
//! - **PanelController**: closed/opening/open/closing/dragging panel with
//!   distance-or-velocity drag resolution.
//!
//! # How it fits in the system
//! `glide-web` wires one classifier (and optionally one panel controller) per
//! interactive region, turns outcomes into application callbacks, and
//! applies style side effects. Time only moves when the host calls `poll`,
//! so every timed behavior is reproducible with a [`clock::DeterministicClock`].

pub mod clock;
pub mod edge;
pub mod event;
pub mod geometry;
pub mod gesture;
pub mod listener;
pub mod panel;
pub mod session;

pub use edge::{Edge, EdgeAdmission, EdgeDetector, EdgeIntent, EdgeSpec, EdgeSpecError};
pub use event::{GestureEvent, LongPress, PinchDelta, Swipe, SwipeDirection, Tap};
pub use geometry::{Contact, Point, TouchSample, Viewport};
pub use gesture::{
    CancelCause, GestureClassifier, GestureConfig, GestureConfigError, Step, StepOutcome,
};
pub use listener::ListenerId;
pub use panel::{
    DragGrant, DragRefused, DragUpdate, PanelConfig, PanelConfigError, PanelController, PanelMode,
    PanelResolution, PanelRest, PanelSide, PanelState, ResolveOutcome,
};
pub use session::{SampleIgnored, TouchSession};
