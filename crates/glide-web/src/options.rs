#![forbid(unsafe_code)]

//! Host options object.
//!
//! JS hosts pass one camelCase JSON object when mounting an adapter:
//!
//! ```json
//! { "swipeThresholdPx": 60, "edge": "right", "panelWidthPx": 300 }
//! ```
//!
//! Missing fields take engine defaults. Unknown fields are rejected so that
//! typos surface at mount time rather than as silently ignored settings.

use glide_core::{
    Edge, EdgeSpec, EdgeSpecError, GestureConfig, GestureConfigError, PanelConfig,
    PanelConfigError, PanelSide,
};
use serde::{Deserialize, Serialize};

/// Errors from parsing or validating host options.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionsError {
    /// Malformed JSON or a field of the wrong type.
    Json(String),
    Gesture(GestureConfigError),
    Edge(EdgeSpecError),
    Panel(PanelConfigError),
}

impl std::fmt::Display for OptionsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(msg) => write!(f, "options JSON error: {msg}"),
            Self::Gesture(err) => write!(f, "invalid gesture options: {err}"),
            Self::Edge(err) => write!(f, "invalid edge options: {err}"),
            Self::Panel(err) => write!(f, "invalid panel options: {err}"),
        }
    }
}

impl std::error::Error for OptionsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(_) => None,
            Self::Gesture(err) => Some(err),
            Self::Edge(err) => Some(err),
            Self::Panel(err) => Some(err),
        }
    }
}

impl From<GestureConfigError> for OptionsError {
    fn from(err: GestureConfigError) -> Self {
        Self::Gesture(err)
    }
}

impl From<EdgeSpecError> for OptionsError {
    fn from(err: EdgeSpecError) -> Self {
        Self::Edge(err)
    }
}

impl From<PanelConfigError> for OptionsError {
    fn from(err: PanelConfigError) -> Self {
        Self::Panel(err)
    }
}

/// Recognized mount options. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct HostOptions {
    pub swipe_threshold_px: Option<f64>,
    pub tap_timeout_ms: Option<u64>,
    pub long_press_timeout_ms: Option<u64>,
    pub prevent_default_on_swipe_candidate: Option<bool>,
    pub pinch_enabled: Option<bool>,
    pub edge: Option<Edge>,
    pub edge_width_px: Option<f64>,
    pub min_horizontal_delta_px: Option<f64>,
    pub max_vertical_delta_px: Option<f64>,
    pub panel_width_px: Option<f64>,
    pub velocity_threshold_px_per_ms: Option<f64>,
    pub snap_duration_ms: Option<u64>,
}

impl HostOptions {
    pub fn from_json(json: &str) -> Result<Self, OptionsError> {
        serde_json::from_str(json).map_err(|e| OptionsError::Json(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, OptionsError> {
        serde_json::to_string(self).map_err(|e| OptionsError::Json(e.to_string()))
    }

    /// Classifier configuration with defaults filled in, validated.
    pub fn gesture_config(&self) -> Result<GestureConfig, OptionsError> {
        let defaults = GestureConfig::default();
        let config = GestureConfig {
            swipe_threshold_px: self.swipe_threshold_px.unwrap_or(defaults.swipe_threshold_px),
            tap_timeout_ms: self.tap_timeout_ms.unwrap_or(defaults.tap_timeout_ms),
            long_press_timeout_ms: self
                .long_press_timeout_ms
                .unwrap_or(defaults.long_press_timeout_ms),
            prevent_default_on_swipe_candidate: self
                .prevent_default_on_swipe_candidate
                .unwrap_or(defaults.prevent_default_on_swipe_candidate),
            pinch_enabled: self.pinch_enabled.unwrap_or(defaults.pinch_enabled),
        };
        config.validate()?;
        Ok(config)
    }

    /// Edge gate with defaults filled in, validated. `fallback` is used when
    /// the options name no edge.
    pub fn edge_spec(&self, fallback: Edge) -> Result<EdgeSpec, OptionsError> {
        let defaults = EdgeSpec::at(self.edge.unwrap_or(fallback));
        let spec = EdgeSpec {
            edge_width_px: self.edge_width_px.unwrap_or(defaults.edge_width_px),
            min_horizontal_delta_px: self
                .min_horizontal_delta_px
                .unwrap_or(defaults.min_horizontal_delta_px),
            max_vertical_delta_px: self
                .max_vertical_delta_px
                .unwrap_or(defaults.max_vertical_delta_px),
            ..defaults
        };
        spec.validate()?;
        Ok(spec)
    }

    /// Panel configuration. The panel hangs off the configured edge.
    pub fn panel_config(&self) -> Result<PanelConfig, OptionsError> {
        let defaults = PanelConfig::default();
        let side = match self.edge.unwrap_or_default() {
            Edge::Left => PanelSide::Left,
            Edge::Right => PanelSide::Right,
        };
        let config = PanelConfig {
            width_px: self.panel_width_px.unwrap_or(defaults.width_px),
            side,
            velocity_threshold_px_per_ms: self
                .velocity_threshold_px_per_ms
                .unwrap_or(defaults.velocity_threshold_px_per_ms),
            snap_duration_ms: self.snap_duration_ms.unwrap_or(defaults.snap_duration_ms),
        };
        config.validate()?;
        Ok(config)
    }
}
