#![forbid(unsafe_code)]

//! Edge-gated region detection.
//!
//! Restricts gesture starts to a narrow band at one screen edge so that
//! ordinary scrolling and platform back gestures elsewhere are left alone.
//!
//! # Invariants
//! 1. The band check runs once, at session start, against the viewport size
//!    queried at that moment.
//! 2. After admission, vertical drift beyond `max_vertical_delta_px` cancels
//!    the session (scroll intent), never produces a swipe.
//! 3. At release, only horizontal travel in the accepted direction that
//!    reaches `min_horizontal_delta_px` counts.

use crate::event::SwipeDirection;
use crate::geometry::{Point, TouchSample, Viewport};

/// Default band width at the edge.
pub const DEFAULT_EDGE_WIDTH_PX: f64 = 24.0;
/// Default minimum horizontal travel at release.
pub const DEFAULT_MIN_HORIZONTAL_DELTA_PX: f64 = 40.0;
/// Default vertical drift tolerated before the session is dropped.
pub const DEFAULT_MAX_VERTICAL_DELTA_PX: f64 = 30.0;

/// Screen edge a detector watches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Edge {
    #[default]
    Left,
    Right,
}

/// Which way a gated swipe has to travel to count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EdgeIntent {
    /// Away from the edge, into the viewport (opening gestures).
    #[default]
    IntoViewport,
    /// Toward the edge, out of the viewport (closing gestures).
    OutOfViewport,
}

/// Edge gating parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeSpec {
    pub edge: Edge,
    pub edge_width_px: f64,
    pub min_horizontal_delta_px: f64,
    pub max_vertical_delta_px: f64,
    pub intent: EdgeIntent,
}

impl Default for EdgeSpec {
    fn default() -> Self {
        Self {
            edge: Edge::Left,
            edge_width_px: DEFAULT_EDGE_WIDTH_PX,
            min_horizontal_delta_px: DEFAULT_MIN_HORIZONTAL_DELTA_PX,
            max_vertical_delta_px: DEFAULT_MAX_VERTICAL_DELTA_PX,
            intent: EdgeIntent::IntoViewport,
        }
    }
}

impl EdgeSpec {
    /// Spec for `edge` with default thresholds.
    #[must_use]
    pub fn at(edge: Edge) -> Self {
        Self {
            edge,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_edge_width(mut self, px: f64) -> Self {
        self.edge_width_px = px;
        self
    }

    #[must_use]
    pub fn with_min_horizontal_delta(mut self, px: f64) -> Self {
        self.min_horizontal_delta_px = px;
        self
    }

    #[must_use]
    pub fn with_max_vertical_delta(mut self, px: f64) -> Self {
        self.max_vertical_delta_px = px;
        self
    }

    #[must_use]
    pub fn with_intent(mut self, intent: EdgeIntent) -> Self {
        self.intent = intent;
        self
    }

    /// Check that every threshold is finite and positive.
    pub fn validate(&self) -> Result<(), EdgeSpecError> {
        if !(self.edge_width_px.is_finite() && self.edge_width_px > 0.0) {
            return Err(EdgeSpecError::InvalidEdgeWidth {
                value: self.edge_width_px,
            });
        }
        if !(self.min_horizontal_delta_px.is_finite() && self.min_horizontal_delta_px > 0.0) {
            return Err(EdgeSpecError::InvalidMinHorizontalDelta {
                value: self.min_horizontal_delta_px,
            });
        }
        if !(self.max_vertical_delta_px.is_finite() && self.max_vertical_delta_px > 0.0) {
            return Err(EdgeSpecError::InvalidMaxVerticalDelta {
                value: self.max_vertical_delta_px,
            });
        }
        Ok(())
    }

    /// Swipe direction that satisfies this spec at release.
    #[must_use]
    pub const fn accepted_direction(&self) -> SwipeDirection {
        match (self.edge, self.intent) {
            (Edge::Left, EdgeIntent::IntoViewport) | (Edge::Right, EdgeIntent::OutOfViewport) => {
                SwipeDirection::Right
            }
            (Edge::Right, EdgeIntent::IntoViewport) | (Edge::Left, EdgeIntent::OutOfViewport) => {
                SwipeDirection::Left
            }
        }
    }
}

/// Edge spec validation errors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EdgeSpecError {
    InvalidEdgeWidth { value: f64 },
    InvalidMinHorizontalDelta { value: f64 },
    InvalidMaxVerticalDelta { value: f64 },
}

impl std::fmt::Display for EdgeSpecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidEdgeWidth { value } => {
                write!(f, "edge width must be > 0 (got {value})")
            }
            Self::InvalidMinHorizontalDelta { value } => {
                write!(f, "minimum horizontal delta must be > 0 (got {value})")
            }
            Self::InvalidMaxVerticalDelta { value } => {
                write!(f, "maximum vertical delta must be > 0 (got {value})")
            }
        }
    }
}

impl std::error::Error for EdgeSpecError {}

/// Proof that a session started inside the edge band.
///
/// Only [`EdgeDetector::admit`] constructs one; the panel controller demands
/// it before a closed panel may be dragged open.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeAdmission {
    edge: Edge,
    origin: Point,
}

impl EdgeAdmission {
    #[must_use]
    pub const fn edge(&self) -> Edge {
        self.edge
    }

    #[must_use]
    pub const fn origin(&self) -> Point {
        self.origin
    }
}

/// Evaluates an [`EdgeSpec`] against session samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeDetector {
    spec: EdgeSpec,
}

impl EdgeDetector {
    /// Construct a detector with a validated spec.
    pub fn new(spec: EdgeSpec) -> Result<Self, EdgeSpecError> {
        spec.validate()?;
        Ok(Self { spec })
    }

    #[must_use]
    pub const fn spec(&self) -> &EdgeSpec {
        &self.spec
    }

    /// Whether `point` lies inside the band for the given viewport.
    #[must_use]
    pub fn in_band(&self, point: Point, viewport: Viewport) -> bool {
        match self.spec.edge {
            Edge::Left => point.x <= self.spec.edge_width_px,
            Edge::Right => point.x >= viewport.width - self.spec.edge_width_px,
        }
    }

    /// Admit a session start at `point`, or reject it.
    #[must_use]
    pub fn admit(&self, point: Point, viewport: Viewport) -> Option<EdgeAdmission> {
        self.in_band(point, viewport).then_some(EdgeAdmission {
            edge: self.spec.edge,
            origin: point,
        })
    }

    /// Vertical drift beyond the tolerance (scroll intent).
    #[must_use]
    pub fn exceeds_vertical(&self, delta_y: f64) -> bool {
        delta_y.abs() > self.spec.max_vertical_delta_px
    }

    /// Direction of an accepted release, or `None`.
    #[must_use]
    pub fn accepts_end(&self, delta_x: f64, delta_y: f64) -> Option<SwipeDirection> {
        let direction = self.spec.accepted_direction();
        let travel = match direction {
            SwipeDirection::Right => delta_x,
            _ => -delta_x,
        };
        (travel >= self.spec.min_horizontal_delta_px && delta_x.abs() >= delta_y.abs())
            .then_some(direction)
    }
}

/// One-shot band check for a start sample.
#[must_use]
pub fn should_track(sample: &TouchSample, spec: &EdgeSpec, viewport: Viewport) -> bool {
    sample
        .first()
        .is_some_and(|contact| EdgeDetector { spec: *spec }.in_band(contact.pos, viewport))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PHONE: Viewport = Viewport::new(400.0, 800.0);

    fn right() -> EdgeDetector {
        EdgeDetector::new(EdgeSpec::at(Edge::Right)).expect("default spec is valid")
    }

    #[test]
    fn right_band_membership() {
        let detector = right();
        assert!(detector.in_band(Point::new(390.0, 100.0), PHONE));
        assert!(detector.in_band(Point::new(376.0, 100.0), PHONE));
        assert!(!detector.in_band(Point::new(375.9, 100.0), PHONE));
        assert!(!detector.in_band(Point::new(350.0, 100.0), PHONE));
    }

    #[test]
    fn left_band_membership() {
        let detector = EdgeDetector::new(EdgeSpec::at(Edge::Left)).expect("valid");
        assert!(detector.in_band(Point::new(0.0, 5.0), PHONE));
        assert!(detector.in_band(Point::new(24.0, 5.0), PHONE));
        assert!(!detector.in_band(Point::new(24.5, 5.0), PHONE));
    }

    #[test]
    fn band_follows_viewport_resize() {
        let detector = right();
        let point = Point::new(390.0, 10.0);
        assert!(detector.in_band(point, PHONE));
        assert!(!detector.in_band(point, Viewport::new(800.0, 400.0)));
    }

    #[test]
    fn should_track_uses_first_contact() {
        let spec = EdgeSpec::at(Edge::Right);
        assert!(should_track(&TouchSample::single(0, 390.0, 10.0), &spec, PHONE));
        assert!(!should_track(&TouchSample::single(0, 350.0, 10.0), &spec, PHONE));
        assert!(!should_track(&TouchSample::default(), &spec, PHONE));
    }

    #[test]
    fn accepted_direction_by_edge_and_intent() {
        assert_eq!(
            EdgeSpec::at(Edge::Left).accepted_direction(),
            SwipeDirection::Right
        );
        assert_eq!(
            EdgeSpec::at(Edge::Right).accepted_direction(),
            SwipeDirection::Left
        );
        assert_eq!(
            EdgeSpec::at(Edge::Left)
                .with_intent(EdgeIntent::OutOfViewport)
                .accepted_direction(),
            SwipeDirection::Left
        );
    }

    #[test]
    fn release_requires_min_travel_in_direction() {
        let detector = right();
        assert_eq!(detector.accepts_end(-40.0, 0.0), Some(SwipeDirection::Left));
        assert_eq!(detector.accepts_end(-39.0, 0.0), None);
        assert_eq!(detector.accepts_end(60.0, 0.0), None);
        assert_eq!(detector.accepts_end(-45.0, 50.0), None);
    }

    #[test]
    fn vertical_drift_limit() {
        let detector = right();
        assert!(!detector.exceeds_vertical(30.0));
        assert!(detector.exceeds_vertical(-30.5));
        assert!(detector.exceeds_vertical(60.0));
    }

    #[test]
    fn admission_carries_origin() {
        let admission = right()
            .admit(Point::new(396.0, 100.0), PHONE)
            .expect("inside band");
        assert_eq!(admission.edge(), Edge::Right);
        assert_eq!(admission.origin(), Point::new(396.0, 100.0));
        assert!(right().admit(Point::new(10.0, 100.0), PHONE).is_none());
    }

    #[test]
    fn invalid_spec_rejected() {
        let err = EdgeDetector::new(EdgeSpec::default().with_edge_width(0.0))
            .expect_err("zero band rejected");
        assert_eq!(err, EdgeSpecError::InvalidEdgeWidth { value: 0.0 });
        assert!(err.to_string().contains("edge width"));
        assert!(
            EdgeSpec::default()
                .with_max_vertical_delta(f64::NAN)
                .validate()
                .is_err()
        );
    }
}
