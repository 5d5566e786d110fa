//! Audio engine facade
//!
//! [`AudioEngine`] is a cheap, cloneable handle. Every clone talks to the same
//! buffer, interpreter and tone driver.

use super::scheduler::{EngineState, Shared};
use super::types::{ModalState, PlaybackState};
use crate::config::EngineConfig;
use crate::error::AudioError;
use crate::tone::ToneDriver;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::debug;

/// Text appended by `play_notes*` when `EngineConfig::end_marker` is set
const END_MARKER: &str = "z";

/// Note-sequence interpreter and playback scheduler
///
/// # Example
/// ```rust
/// use yaudio::{AudioEngine, RecordingDriver};
///
/// let driver = RecordingDriver::new();
/// let engine = AudioEngine::with_defaults(driver.clone());
///
/// // Blocks until both tones have played
/// engine.play_notes("X440M5 X880M5")?;
///
/// assert!(!engine.is_playing());
/// assert_eq!(driver.emitted(), vec![(440.0, 5), (880.0, 5)]);
/// # Ok::<(), yaudio::AudioError>(())
/// ```
pub struct AudioEngine<D: ToneDriver + 'static> {
    shared: Arc<Shared<D>>,
    config: EngineConfig,
}

impl<D: ToneDriver + 'static> Clone for AudioEngine<D> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            config: self.config.clone(),
        }
    }
}

impl<D: ToneDriver + 'static> AudioEngine<D> {
    pub fn new(driver: D, config: EngineConfig) -> Self {
        Self {
            shared: Arc::new(Shared::new(driver, &config)),
            config,
        }
    }

    /// Engine with a 4000-byte buffer, tempo 120, octave 5, volume 5
    pub fn with_defaults(driver: D) -> Self {
        Self::new(driver, EngineConfig::default())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Queue notes without playing them.
    ///
    /// # Errors
    /// [`AudioError::CapacityExceeded`] if the text does not fit; nothing is
    /// queued in that case.
    pub fn add_notes(&self, notes: &str) -> Result<(), AudioError> {
        self.append(notes, false)
    }

    /// Queue notes and play everything queued, returning once it has finished.
    ///
    /// Fails without playing anything if the notes do not fit in the buffer.
    pub fn play_notes(&self, notes: &str) -> Result<(), AudioError> {
        self.append(notes, self.config.end_marker)?;
        while self.shared.step() {}
        Ok(())
    }

    /// Queue notes and return immediately while they play on a background
    /// thread.
    ///
    /// Calls made while playback is still running extend the current sequence
    /// rather than starting a second one.
    ///
    /// # Errors
    /// [`AudioError::CapacityExceeded`] if the notes do not fit; nothing is
    /// queued in that case.
    ///
    /// [`AudioError::Spawn`] if the thread could not be started. Unlike the
    /// capacity error, this is reported after the append has succeeded: the
    /// notes stay queued with no worker, and can be driven with
    /// [`AudioEngine::step`] or [`AudioEngine::play_notes`].
    pub fn play_notes_background(&self, notes: &str) -> Result<(), AudioError> {
        let mut state = self.shared.state.lock();
        self.append_locked(&mut state, notes, self.config.end_marker)?;

        if !state.worker_active {
            let shared = Arc::clone(&self.shared);
            thread::Builder::new()
                .name("yaudio-playback".to_string())
                .spawn(move || shared.run_worker())
                .map_err(|e| AudioError::Spawn(e.to_string()))?;
            state.worker_active = true;
        }
        Ok(())
    }

    /// Discard everything queued and silence the current tone. Idempotent.
    pub fn stop(&self) {
        let mut state = self.shared.state.lock();
        if state.is_playing() {
            debug!("Stopping playback");
        }
        state.stop();
        self.shared.changed.notify_all();
    }

    /// True while notes are queued or a tone is pending
    pub fn is_playing(&self) -> bool {
        self.shared.state.lock().is_playing()
    }

    /// Run one scheduling step on the calling thread.
    ///
    /// For callers that drive playback from their own loop. Blocks for the
    /// length of the tone it plays; returns whether more remains.
    pub fn step(&self) -> bool {
        self.shared.step()
    }

    /// Block until playback finishes or `timeout` passes. Returns whether the
    /// engine is idle.
    ///
    /// Something must be driving playback (a background worker, or another
    /// thread calling `step`) for this to return before the timeout.
    pub fn wait_idle(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut state = self.shared.state.lock();
        while state.is_playing() {
            if self.shared.changed.wait_until(&mut state, deadline).timed_out() {
                return !state.is_playing();
            }
        }
        true
    }

    pub fn playback_state(&self) -> PlaybackState {
        self.shared.state.lock().playback_state()
    }

    /// Tempo, octave and volume as the interpreter currently has them
    pub fn modal_state(&self) -> ModalState {
        self.shared.state.lock().interpreter.state()
    }

    /// The last syntax error, kept until `clear_error` or `stop`
    pub fn last_error(&self) -> Option<AudioError> {
        self.shared.state.lock().last_error.clone()
    }

    pub fn clear_error(&self) {
        self.shared.state.lock().last_error = None;
    }

    fn append(&self, notes: &str, end_marker: bool) -> Result<(), AudioError> {
        let mut state = self.shared.state.lock();
        self.append_locked(&mut state, notes, end_marker)
    }

    fn append_locked(
        &self,
        state: &mut EngineState,
        notes: &str,
        end_marker: bool,
    ) -> Result<(), AudioError> {
        if end_marker {
            state.append(&[notes, END_MARKER])?;
        } else {
            state.append(&[notes])?;
        }
        self.shared.changed.notify_all();
        Ok(())
    }
}
