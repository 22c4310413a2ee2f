use serde::{Deserialize, Serialize};

pub const MIN_TEMPERATURE: f32 = 0.0;
pub const MAX_TEMPERATURE: f32 = 1.0;
pub const TEMPERATURE_STEP: f32 = 0.1;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Generation settings read from the controls at submit time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    pub temperature: f32,
    pub structured_output: bool,
    pub use_tools: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            structured_output: true,
            use_tools: true,
        }
    }
}

impl Settings {
    /// Move the temperature by `steps` slider notches, clamped to the slider range.
    pub fn nudge_temperature(&mut self, steps: i32) {
        let raw = self.temperature + steps as f32 * TEMPERATURE_STEP;
        self.set_temperature(raw);
    }

    pub fn set_temperature(&mut self, value: f32) {
        let clamped = value.clamp(MIN_TEMPERATURE, MAX_TEMPERATURE);
        // Snap to one decimal so repeated nudges don't drift.
        self.temperature = (clamped * 10.0).round() / 10.0;
    }

    pub fn toggle_structured_output(&mut self) {
        self.structured_output = !self.structured_output;
    }

    pub fn toggle_use_tools(&mut self) {
        self.use_tools = !self.use_tools;
    }
}

/// Display mode, persisted under the `theme` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}
