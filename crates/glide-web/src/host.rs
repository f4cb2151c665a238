#![forbid(unsafe_code)]

//! Application callbacks and failure isolation.
//!
//! Adapters never call an [`AppHost`] directly. Every call goes through
//! [`IsolatedHost::invoke`], which catches returned errors and panics, logs
//! them with `tracing::warn!`, and counts them. Engine state is always
//! updated before the callback runs, so a failing callback cannot corrupt it.

use std::panic::{AssertUnwindSafe, catch_unwind};

/// Something the application should do in response to a gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NavigationIntent {
    OpenDrawer,
    CloseDrawer,
    PreviousConversation,
    NextConversation,
    /// Show the message action sheet for the message under this point.
    MessageActions { x: f64, y: f64 },
    /// Apply an absolute chat text scale.
    SetTextScale { factor: f64 },
    PrimaryAction,
    NewChat,
    DismissOverlay,
}

impl NavigationIntent {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::OpenDrawer => "open_drawer",
            Self::CloseDrawer => "close_drawer",
            Self::PreviousConversation => "previous_conversation",
            Self::NextConversation => "next_conversation",
            Self::MessageActions { .. } => "message_actions",
            Self::SetTextScale { .. } => "set_text_scale",
            Self::PrimaryAction => "primary_action",
            Self::NewChat => "new_chat",
            Self::DismissOverlay => "dismiss_overlay",
        }
    }
}

/// Haptic feedback strength. Hosts without a vibration API ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HapticPulse {
    Light,
    Medium,
}

/// Error returned by an application callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackError {
    message: String,
}

impl CallbackError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for CallbackError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CallbackError {}

pub type CallbackResult = Result<(), CallbackError>;

/// Application side of an adapter.
pub trait AppHost {
    fn navigate(&mut self, intent: NavigationIntent) -> CallbackResult;

    fn toast(&mut self, message: &str) -> CallbackResult;

    fn haptic(&mut self, _pulse: HapticPulse) -> CallbackResult {
        Ok(())
    }
}

/// Owns an [`AppHost`] and shields the caller from its failures.
#[derive(Debug)]
pub struct IsolatedHost<H> {
    host: H,
    failures: u64,
}

impl<H: AppHost> IsolatedHost<H> {
    pub fn new(host: H) -> Self {
        Self { host, failures: 0 }
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_inner(self) -> H {
        self.host
    }

    /// Total isolated failures since construction.
    #[must_use]
    pub const fn failures(&self) -> u64 {
        self.failures
    }

    /// Run one callback. Returns `true` when it completed without error.
    pub fn invoke(
        &mut self,
        callback: &'static str,
        f: impl FnOnce(&mut H) -> CallbackResult,
    ) -> bool {
        let host = &mut self.host;
        match catch_unwind(AssertUnwindSafe(|| f(host))) {
            Ok(Ok(())) => true,
            Ok(Err(err)) => {
                self.failures = self.failures.saturating_add(1);
                tracing::warn!(callback, error = %err, "host callback returned an error");
                false
            }
            Err(payload) => {
                self.failures = self.failures.saturating_add(1);
                let panic = panic_message(payload.as_ref());
                tracing::warn!(callback, panic, "host callback panicked");
                false
            }
        }
    }

    pub fn navigate(&mut self, intent: NavigationIntent) -> bool {
        self.invoke(intent.as_str(), |host| host.navigate(intent))
    }

    pub fn toast(&mut self, message: &str) -> bool {
        self.invoke("toast", |host| host.toast(message))
    }

    pub fn haptic(&mut self, pulse: HapticPulse) -> bool {
        self.invoke("haptic", |host| host.haptic(pulse))
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Flaky {
        calls: Vec<&'static str>,
    }

    impl AppHost for Flaky {
        fn navigate(&mut self, intent: NavigationIntent) -> CallbackResult {
            self.calls.push(intent.as_str());
            match intent {
                NavigationIntent::NewChat => Err(CallbackError::new("storage full")),
                NavigationIntent::DismissOverlay => panic!("overlay already gone"),
                _ => Ok(()),
            }
        }

        fn toast(&mut self, _message: &str) -> CallbackResult {
            self.calls.push("toast");
            Ok(())
        }
    }

    #[test]
    fn successful_callback_is_not_counted() {
        let mut host = IsolatedHost::new(Flaky::default());
        assert!(host.navigate(NavigationIntent::PrimaryAction));
        assert!(host.toast("hi"));
        assert!(host.haptic(HapticPulse::Light));
        assert_eq!(host.failures(), 0);
        assert_eq!(host.host().calls, vec!["primary_action", "toast"]);
    }

    #[test]
    fn returned_error_is_counted() {
        let mut host = IsolatedHost::new(Flaky::default());
        assert!(!host.navigate(NavigationIntent::NewChat));
        assert_eq!(host.failures(), 1);
    }

    #[test]
    fn panic_is_caught_and_host_stays_usable() {
        let mut host = IsolatedHost::new(Flaky::default());
        assert!(!host.navigate(NavigationIntent::DismissOverlay));
        assert!(host.navigate(NavigationIntent::PrimaryAction));
        assert_eq!(host.failures(), 1);
        assert_eq!(host.into_inner().calls.len(), 2);
    }

    #[test]
    fn panic_payloads_are_described() {
        let owned: Box<dyn std::any::Any + Send> = Box::new(String::from("boom"));
        assert_eq!(panic_message(owned.as_ref()), "boom");
        let other: Box<dyn std::any::Any + Send> = Box::new(7u8);
        assert_eq!(panic_message(other.as_ref()), "non-string panic payload");
    }
}
