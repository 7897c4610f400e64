//! Host configuration surface.
//!
//! Parsed from host JSON with per-field defaults; numeric fields are
//! clamped to fixed valid ranges before the engine uses them.

use serde::{Deserialize, Serialize};

pub const MIN_POSSIBLE_RADIUS: f64 = 0.1;
pub const MAX_POSSIBLE_RADIUS: f64 = 20.0;
pub const MIN_POSSIBLE_THICKNESS: f64 = 0.5;
pub const MAX_POSSIBLE_THICKNESS: f64 = 20.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteSettings {
    pub route_color: String,
    /// Fill color of the direction icon when no state band applies.
    pub icon_color: String,
    pub default_thickness: f64,
    pub min_thickness: f64,
    pub max_thickness: f64,
}

impl Default for RouteSettings {
    fn default() -> Self {
        Self {
            route_color: "cornflowerblue".into(),
            icon_color: "red".into(),
            default_thickness: 3.0,
            min_thickness: 2.0,
            max_thickness: 8.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerSettings {
    pub marker_color: String,
    pub label_font_color: String,
    pub radius: f64,
}

impl Default for MarkerSettings {
    fn default() -> Self {
        Self {
            marker_color: "blue".into(),
            label_font_color: "black".into(),
            radius: 6.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateSettings {
    pub state_color: String,
}

impl StateSettings {
    pub fn new(color: &str) -> Self {
        Self {
            state_color: color.into(),
        }
    }
}

impl Default for StateSettings {
    fn default() -> Self {
        Self::new("red")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteMapSettings {
    pub routes: RouteSettings,
    pub markers: MarkerSettings,
    pub state1: StateSettings,
    pub state2: StateSettings,
    pub state3: StateSettings,
}

impl Default for RouteMapSettings {
    fn default() -> Self {
        Self {
            routes: RouteSettings::default(),
            markers: MarkerSettings::default(),
            state1: StateSettings::new("red"),
            state2: StateSettings::new("yellow"),
            state3: StateSettings::new("green"),
        }
    }
}

#[derive(Debug)]
pub enum SettingsError {
    Parse(String),
}

impl std::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingsError::Parse(reason) => write!(f, "settings parse error: {reason}"),
        }
    }
}

impl std::error::Error for SettingsError {}

impl RouteMapSettings {
    pub fn from_json_value(value: serde_json::Value) -> Result<Self, SettingsError> {
        serde_json::from_value(value).map_err(|e| SettingsError::Parse(e.to_string()))
    }

    /// Copy with every numeric field forced into its valid range.
    pub fn sanitized(mut self) -> Self {
        self.markers.radius = self
            .markers
            .radius
            .clamp(MIN_POSSIBLE_RADIUS, MAX_POSSIBLE_RADIUS);
        self.routes.default_thickness = clamp_thickness(self.routes.default_thickness);
        self.routes.min_thickness = clamp_thickness(self.routes.min_thickness);
        self.routes.max_thickness = clamp_thickness(self.routes.max_thickness);
        self
    }
}

fn clamp_thickness(value: f64) -> f64 {
    value.clamp(MIN_POSSIBLE_THICKNESS, MAX_POSSIBLE_THICKNESS)
}
