//! Playback type definitions
//!
//! This module defines the values that flow between the interpreter, the
//! scheduler and the tone driver.

use serde::Serialize;
use std::ops::RangeInclusive;

/// Valid tempo range in beats per minute (`T` token)
pub const TEMPO_RANGE: RangeInclusive<u32> = 40..=240;
/// Valid octave range (`O` token)
pub const OCTAVE_RANGE: RangeInclusive<u32> = 4..=7;
/// Valid volume range (`V` token)
pub const VOLUME_RANGE: RangeInclusive<u32> = 1..=10;

const MS_EPSILON: f64 = 1e-6;

/// Modal interpreter state
///
/// Persists across notes until changed by a control token or reset by `!`.
///
/// # Fields
/// - `tempo`: Beats per minute, where the beat is a quarter note
/// - `octave`: Octave applied to `A`-`G`; octave 4 is the reference octave of the frequency table
/// - `volume`: Loudness hint forwarded to the tone driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModalState {
    pub tempo: u32,
    pub octave: u32,
    pub volume: u32,
}

impl Default for ModalState {
    fn default() -> Self {
        Self {
            tempo: 120,
            octave: 5,
            volume: 5,
        }
    }
}

impl ModalState {
    /// Duration of a quarter note at the current tempo, in seconds
    pub fn quarter_note_secs(&self) -> f64 {
        60.0 / self.tempo as f64
    }

    /// Multiplier applied to the octave-4 frequency table
    pub fn octave_multiplier(&self) -> f64 {
        2f64.powi(self.octave as i32 - 4)
    }
}

/// A resolved tone, ready to be realized on the output
///
/// A frequency of 0 Hz is silence (rest, end marker, or the terminal event
/// produced after a syntax error).
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct ToneEvent {
    pub frequency_hz: f64,
    pub duration_secs: f64,
    pub volume: u32,
}

impl ToneEvent {
    /// Zero-length silence, emitted after a syntax error so the scheduler has
    /// something to consume
    pub const SILENT: ToneEvent = ToneEvent {
        frequency_hz: 0.0,
        duration_secs: 0.0,
        volume: 0,
    };

    /// Duration in whole milliseconds, truncated
    pub fn duration_ms(&self) -> u64 {
        // The epsilon keeps `M<ms>` durations whole after the ms -> s -> ms
        // trip (1001 / 1000 * 1000 is 1000.999...). Casts saturate, so
        // negative durations become 0.
        (self.duration_secs * 1000.0 + MS_EPSILON) as u64
    }

    pub fn is_silent(&self) -> bool {
        self.frequency_hz == 0.0
    }
}

/// Scheduler state, as reported by `AudioEngine::playback_state`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// Nothing buffered and no pending event
    Idle,
    /// Text buffered, next event not parsed yet
    Parsing,
    /// An event is pending or being emitted
    Sounding,
}
