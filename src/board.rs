//! Board facade
//!
//! [`YBoard`] owns the board's peripherals. Only the speaker is modelled
//! here; its audio calls delegate to a shared [`AudioEngine`].

use crate::config::BoardConfig;
use std::time::Duration;
use tracing::info;
use yaudio::{AudioEngine, AudioError, ToneDriver};

pub struct YBoard<D: ToneDriver + 'static> {
    tone_pin: u8,
    audio: AudioEngine<D>,
}

impl<D: ToneDriver + 'static> YBoard<D> {
    pub fn new(driver: D, config: BoardConfig) -> Self {
        info!(tone_pin = config.tone_pin, "Setting up speaker");
        Self {
            tone_pin: config.tone_pin,
            audio: AudioEngine::new(driver, config.audio),
        }
    }

    pub fn tone_pin(&self) -> u8 {
        self.tone_pin
    }

    /// The underlying engine, for callers that need `step`, `wait_idle` or
    /// the modal state
    pub fn audio(&self) -> &AudioEngine<D> {
        &self.audio
    }

    /// Play notes, blocking until they finish
    pub fn play_notes(&self, notes: &str) -> Result<(), AudioError> {
        self.audio.play_notes(notes)
    }

    /// Play notes on a background thread and return immediately
    pub fn play_notes_background(&self, notes: &str) -> Result<(), AudioError> {
        self.audio.play_notes_background(notes)
    }

    pub fn stop_audio(&self) {
        self.audio.stop();
    }

    pub fn is_audio_playing(&self) -> bool {
        self.audio.is_playing()
    }

    /// Wait for background playback to finish. Returns whether it did.
    pub fn wait_audio(&self, timeout: Duration) -> bool {
        self.audio.wait_idle(timeout)
    }
}
