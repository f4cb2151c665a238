#![forbid(unsafe_code)]

//! Geometric primitives and raw touch samples.
//!
//! Coordinates are CSS pixels with the origin at the top-left of the
//! viewport. Timestamps are host-supplied milliseconds.

/// A point in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[inline]
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Component-wise delta `other - self`.
    #[inline]
    #[must_use]
    pub fn delta_to(self, other: Self) -> (f64, f64) {
        (other.x - self.x, other.y - self.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Viewport size, queried from the host at session start.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    #[inline]
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// One contact point (finger or pointer).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub id: u32,
    pub pos: Point,
}

impl Contact {
    #[inline]
    #[must_use]
    pub const fn new(id: u32, x: f64, y: f64) -> Self {
        Self {
            id,
            pos: Point::new(x, y),
        }
    }
}

/// A raw touch sample as delivered by the host.
///
/// `touches` lists every contact still on the surface after this sample;
/// `changed` lists the contacts the sample is about (the one that landed,
/// moved, or lifted).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TouchSample {
    pub timestamp_ms: u64,
    pub touches: Vec<Contact>,
    pub changed: Vec<Contact>,
}

impl TouchSample {
    /// Sample where the listed contacts are all down and all changed.
    #[must_use]
    pub fn down(timestamp_ms: u64, contacts: &[Contact]) -> Self {
        Self {
            timestamp_ms,
            touches: contacts.to_vec(),
            changed: contacts.to_vec(),
        }
    }

    /// Single-contact sample at `(x, y)`, still down.
    #[must_use]
    pub fn single(timestamp_ms: u64, x: f64, y: f64) -> Self {
        Self::down(timestamp_ms, &[Contact::new(0, x, y)])
    }

    /// Single-contact release at `(x, y)`: nothing left on the surface.
    #[must_use]
    pub fn lifted(timestamp_ms: u64, x: f64, y: f64) -> Self {
        Self {
            timestamp_ms,
            touches: Vec::new(),
            changed: vec![Contact::new(0, x, y)],
        }
    }

    /// Number of contacts still on the surface.
    #[inline]
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.touches.len()
    }

    /// Position of `id` in this sample, preferring `changed` over `touches`.
    #[must_use]
    pub fn position_of(&self, id: u32) -> Option<Point> {
        self.changed
            .iter()
            .chain(self.touches.iter())
            .find(|contact| contact.id == id)
            .map(|contact| contact.pos)
    }

    /// First contact the sample reports, if any.
    #[must_use]
    pub fn first(&self) -> Option<Contact> {
        self.changed.first().or_else(|| self.touches.first()).copied()
    }
}
