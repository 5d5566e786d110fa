//! Board configuration
//!
//! ```yaml
//! tone-pin: 33
//! audio:
//!   capacity: 4000
//!   tempo: 120
//!   octave: 5
//!   volume: 5
//!   end-marker: false
//! ```

use crate::error::BoardError;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use yaudio::{EngineConfig, RawEngineConfig};

/// Speaker pin on the YBoard v2
pub const DEFAULT_TONE_PIN: u8 = 33;

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct RawBoardConfig {
    tone_pin: Option<u8>,
    audio: Option<RawEngineConfig>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoardConfig {
    pub tone_pin: u8,
    pub audio: EngineConfig,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            tone_pin: DEFAULT_TONE_PIN,
            audio: EngineConfig::default(),
        }
    }
}

impl BoardConfig {
    pub fn from_yaml(content: &str) -> Result<Self, BoardError> {
        let raw: RawBoardConfig = serde_yaml::from_str(content)?;
        Ok(Self {
            tone_pin: raw.tone_pin.unwrap_or(DEFAULT_TONE_PIN),
            audio: EngineConfig::try_from(raw.audio.unwrap_or_default())?,
        })
    }

    pub fn load(path: &Path) -> Result<Self, BoardError> {
        let content = fs::read_to_string(path).map_err(|source| BoardError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yaudio::AudioError;

    #[test]
    fn test_defaults() {
        let config = BoardConfig::from_yaml("{}").unwrap();
        assert_eq!(config, BoardConfig::default());
        assert_eq!(config.tone_pin, 33);
    }

    #[test]
    fn test_nested_audio_section() {
        let config = BoardConfig::from_yaml("tone-pin: 25\naudio:\n  tempo: 180\n  end-marker: true\n")
            .unwrap();
        assert_eq!(config.tone_pin, 25);
        assert_eq!(config.audio.defaults.tempo, 180);
        assert!(config.audio.end_marker);
        assert_eq!(config.audio.capacity, 4000);
    }

    #[test]
    fn test_invalid_audio_section() {
        let err = BoardConfig::from_yaml("audio:\n  volume: 11\n").unwrap_err();
        assert!(matches!(err, BoardError::Audio(AudioError::Config(_))));
    }

    #[test]
    fn test_malformed_yaml() {
        let err = BoardConfig::from_yaml("tone-pin: [").unwrap_err();
        assert!(matches!(err, BoardError::Config(_)));
        assert!(err.to_string().starts_with("Invalid board configuration"));
    }

    #[test]
    fn test_missing_file() {
        let err = BoardConfig::load(Path::new("/nonexistent/yboard.yaml")).unwrap_err();
        assert!(matches!(err, BoardError::Io { .. }));
    }
}
