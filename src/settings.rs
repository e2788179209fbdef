//! Game settings and preferences

use serde::{Deserialize, Serialize};

/// How the ship is steered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ControlMode {
    /// Hand tracker drives position; closed fist fires
    #[default]
    Gesture,
    /// Arrow keys move; space/click fires
    Keyboard,
}

impl ControlMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlMode::Gesture => "gesture",
            ControlMode::Keyboard => "keyboard",
        }
    }
}

/// Game settings/preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub control_mode: ControlMode,
    /// Master toggle for the audio sink
    pub audio_enabled: bool,
    /// Hand travel scale about the screen center, 0.5 - 2.0
    pub hand_sensitivity: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            control_mode: ControlMode::Gesture,
            audio_enabled: true,
            hand_sensitivity: 1.0,
        }
    }
}

impl Settings {
    /// Parse host-supplied settings from JSON text.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.hand_sensitivity = settings.hand_sensitivity.clamp(0.5, 2.0);
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_gesture_control() {
        let s = Settings::default();
        assert_eq!(s.control_mode, ControlMode::Gesture);
        assert!(s.audio_enabled);
        assert_eq!(s.hand_sensitivity, 1.0);
    }

    #[test]
    fn from_json_parses_and_clamps() {
        let s = Settings::from_json(
            r#"{"control_mode":"keyboard","audio_enabled":false,"hand_sensitivity":5.0}"#,
        )
        .unwrap();
        assert_eq!(s.control_mode, ControlMode::Keyboard);
        assert!(!s.audio_enabled);
        assert_eq!(s.hand_sensitivity, 2.0);
    }

    #[test]
    fn from_json_rejects_garbage() {
        assert!(Settings::from_json("not json").is_err());
    }
}
