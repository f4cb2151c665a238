#![forbid(unsafe_code)]

//! Semantic gesture events emitted by the classifier.
//!
//! # Invariants
//! 1. At most one of `Tap`, `LongPress`, `Swipe` is emitted per session.
//! 2. Nothing is emitted for a session after it is cancelled.
//! 3. `PinchDelta` may repeat while two contacts are down; `scale` is always
//!    finite and positive.

use crate::geometry::Point;

/// Cardinal direction for swipe gestures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SwipeDirection {
    Up,
    Down,
    Left,
    Right,
}

impl SwipeDirection {
    /// Classify a displacement. Horizontal wins ties.
    #[must_use]
    pub fn from_delta(delta_x: f64, delta_y: f64) -> Self {
        if delta_x.abs() >= delta_y.abs() {
            if delta_x > 0.0 { Self::Right } else { Self::Left }
        } else if delta_y > 0.0 {
            Self::Down
        } else {
            Self::Up
        }
    }

    /// Returns the opposite direction.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Returns true for horizontal directions.
    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl std::fmt::Display for SwipeDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single tap at the release point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tap {
    pub pos: Point,
    pub timestamp_ms: u64,
}

/// A press held past the long-press timeout, reported at the press origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LongPress {
    pub pos: Point,
    pub timestamp_ms: u64,
}

/// A completed swipe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Swipe {
    pub direction: SwipeDirection,
    pub delta_x: f64,
    pub delta_y: f64,
    pub duration_ms: u64,
}

/// Relative change in two-contact spread since the last reported pinch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinchDelta {
    pub scale: f64,
}

/// Any event the classifier can emit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    Tap(Tap),
    LongPress(LongPress),
    Swipe(Swipe),
    PinchDelta(PinchDelta),
}

impl GestureEvent {
    /// Returns true for the mutually exclusive once-per-session kinds.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Tap(_) | Self::LongPress(_) | Self::Swipe(_))
    }

    /// Short kind label for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Tap(_) => "tap",
            Self::LongPress(_) => "long_press",
            Self::Swipe(_) => "swipe",
            Self::PinchDelta(_) => "pinch",
        }
    }
}

impl From<Tap> for GestureEvent {
    fn from(value: Tap) -> Self {
        Self::Tap(value)
    }
}

impl From<LongPress> for GestureEvent {
    fn from(value: LongPress) -> Self {
        Self::LongPress(value)
    }
}

impl From<Swipe> for GestureEvent {
    fn from(value: Swipe) -> Self {
        Self::Swipe(value)
    }
}

impl From<PinchDelta> for GestureEvent {
    fn from(value: PinchDelta) -> Self {
        Self::PinchDelta(value)
    }
}
