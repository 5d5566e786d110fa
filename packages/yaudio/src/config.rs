//! # Engine Configuration
//!
//! Configuration is read from YAML into [`RawEngineConfig`], where every field
//! is optional, then validated into an [`EngineConfig`].
//!
//! ## Example
//! ```rust
//! use yaudio::EngineConfig;
//!
//! let config = EngineConfig::from_yaml(
//!     r#"
//! capacity: 1000
//! tempo: 90
//! end-marker: true
//! "#,
//! )?;
//!
//! assert_eq!(config.capacity, 1000);
//! assert_eq!(config.defaults.tempo, 90);
//! assert_eq!(config.defaults.octave, 5);
//! assert!(config.end_marker);
//! # Ok::<(), yaudio::AudioError>(())
//! ```

use crate::error::AudioError;
use crate::playback::{ModalState, OCTAVE_RANGE, TEMPO_RANGE, VOLUME_RANGE};
use serde::Deserialize;
use std::ops::RangeInclusive;

/// Default command buffer capacity, in bytes of notation text
pub const DEFAULT_CAPACITY: usize = 4000;

/// Engine configuration as written in YAML
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RawEngineConfig {
    pub capacity: Option<usize>,
    pub tempo: Option<u32>,
    pub octave: Option<u32>,
    pub volume: Option<u32>,
    pub end_marker: Option<bool>,
}

/// Validated engine configuration
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Maximum number of bytes the command buffer may hold
    pub capacity: usize,
    /// Modal state at startup and after `!`
    pub defaults: ModalState,
    /// Append the `z` end marker to text passed to `play_notes*`
    pub end_marker: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            defaults: ModalState::default(),
            end_marker: false,
        }
    }
}

impl EngineConfig {
    pub fn from_yaml(content: &str) -> Result<Self, AudioError> {
        let raw: RawEngineConfig =
            serde_yaml::from_str(content).map_err(|e| AudioError::Config(e.to_string()))?;
        Self::try_from(raw)
    }
}

impl TryFrom<RawEngineConfig> for EngineConfig {
    type Error = AudioError;

    fn try_from(raw: RawEngineConfig) -> Result<Self, Self::Error> {
        let fallback = ModalState::default();

        let capacity = raw.capacity.unwrap_or(DEFAULT_CAPACITY);
        if capacity == 0 {
            return Err(AudioError::Config("capacity must be greater than 0".to_string()));
        }

        let defaults = ModalState {
            tempo: check_range("tempo", raw.tempo, TEMPO_RANGE)?.unwrap_or(fallback.tempo),
            octave: check_range("octave", raw.octave, OCTAVE_RANGE)?.unwrap_or(fallback.octave),
            volume: check_range("volume", raw.volume, VOLUME_RANGE)?.unwrap_or(fallback.volume),
        };

        Ok(Self {
            capacity,
            defaults,
            end_marker: raw.end_marker.unwrap_or(false),
        })
    }
}

fn check_range(
    name: &str,
    value: Option<u32>,
    range: RangeInclusive<u32>,
) -> Result<Option<u32>, AudioError> {
    match value {
        Some(v) if !range.contains(&v) => Err(AudioError::Config(format!(
            "{} must be between {} and {}, got {}",
            name,
            range.start(),
            range.end(),
            v
        ))),
        other => Ok(other),
    }
}
