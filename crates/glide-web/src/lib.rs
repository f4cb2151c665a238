#![forbid(unsafe_code)]

//! `glide-web` binds the `glide-core` gesture engines to interactive regions
//! of a web page.
//!
//! Design goals:
//! - **Host-driven I/O**: the embedding JS layer forwards touch events and
//!   calls `tick` at the deadlines the adapters report.
//! - **Effects as data**: every entry point returns a [`HostDispatch`] with
//!   the style commands to apply and a structured log record.
//! - **Isolated callbacks**: a failing or panicking [`AppHost`] callback is
//!   logged and counted; engine state is already committed when it runs.
//!
//! Three adapters ship here: [`NavigationDrawerAdapter`] (edge drag-to-reveal
//! drawer), [`ChatSwipeAdapter`] (conversation swipes, message long press,
//! text pinch), and [`QuickActionOverlay`] (tap and vertical swipe actions).
//! This crate does not bind to `wasm-bindgen`; a thin JS shim owns the DOM.

mod bridge;
pub mod chat;
pub mod dispatch;
pub mod drawer;
pub mod host;
pub mod options;
pub mod overlay;
pub mod style;

pub use chat::ChatSwipeAdapter;
pub use dispatch::{
    DispatchLogEntry, DispatchOutcome, GestureKind, HostDispatch, HostPhase, IgnoredReason,
};
pub use drawer::NavigationDrawerAdapter;
pub use host::{AppHost, CallbackError, CallbackResult, HapticPulse, IsolatedHost, NavigationIntent};
pub use options::{HostOptions, OptionsError};
pub use overlay::QuickActionOverlay;
pub use style::{CursorStyle, StyleCommand, StyleLedger, TouchAction};
