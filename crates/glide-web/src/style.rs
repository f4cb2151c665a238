#![forbid(unsafe_code)]

//! Style side effects for the host element.
//!
//! Adapters describe DOM effects as [`StyleCommand`]s. A [`StyleLedger`]
//! remembers what was last applied per property and drops repeats, so a
//! command list can be replayed onto the element without checks on the JS
//! side.

/// CSS `touch-action` values the adapters use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TouchAction {
    Auto,
    /// Native vertical scrolling only; horizontal gestures are ours.
    PanY,
    None,
}

impl TouchAction {
    #[must_use]
    pub const fn as_css(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::PanY => "pan-y",
            Self::None => "none",
        }
    }
}

/// CSS `cursor` values the adapters use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CursorStyle {
    Auto,
    Grab,
    Grabbing,
}

impl CursorStyle {
    #[must_use]
    pub const fn as_css(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Grab => "grab",
            Self::Grabbing => "grabbing",
        }
    }
}

/// One side effect for the host to apply.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StyleCommand {
    SetTouchAction(TouchAction),
    /// Call `preventDefault()` on the event being dispatched.
    PreventDefault,
    /// `transform: translateX(..px)`.
    SetTransform { translate_x_px: f64 },
    /// `transition: transform ..ms`; zero disables the transition.
    SetTransition { duration_ms: u64 },
    SetCursor(CursorStyle),
}

/// Last applied value per style property.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleLedger {
    touch_action: Option<TouchAction>,
    translate_x_px: Option<f64>,
    transition_ms: Option<u64>,
    cursor: Option<CursorStyle>,
}

impl StyleLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `command` unless it would not change anything.
    ///
    /// `PreventDefault` targets the current event, not the element, and is
    /// always queued.
    pub fn apply(&mut self, command: StyleCommand, out: &mut Vec<StyleCommand>) {
        let changed = match command {
            StyleCommand::PreventDefault => true,
            StyleCommand::SetTouchAction(value) => replace(&mut self.touch_action, value),
            StyleCommand::SetTransform { translate_x_px } => {
                replace(&mut self.translate_x_px, translate_x_px)
            }
            StyleCommand::SetTransition { duration_ms } => {
                replace(&mut self.transition_ms, duration_ms)
            }
            StyleCommand::SetCursor(value) => replace(&mut self.cursor, value),
        };
        if changed {
            out.push(command);
        }
    }

    /// Forget everything, returning commands that restore element defaults
    /// for the properties that were touched.
    pub fn reset(&mut self) -> Vec<StyleCommand> {
        let mut out = Vec::new();
        if self.touch_action.take().is_some() {
            out.push(StyleCommand::SetTouchAction(TouchAction::Auto));
        }
        if self.cursor.take().is_some() {
            out.push(StyleCommand::SetCursor(CursorStyle::Auto));
        }
        if self.transition_ms.take().is_some() {
            out.push(StyleCommand::SetTransition { duration_ms: 0 });
        }
        self.translate_x_px = None;
        out
    }
}

fn replace<T: PartialEq>(slot: &mut Option<T>, value: T) -> bool {
    if slot.as_ref() == Some(&value) {
        return false;
    }
    *slot = Some(value);
    true
}
