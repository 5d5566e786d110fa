//! Playback scheduler
//!
//! All mutable engine state lives in one [`EngineState`] behind a mutex. A
//! scheduling step holds the driver lock for its whole length, so only one
//! context sounds tones at a time, but it releases the state lock while a tone
//! plays, so `add_notes`, `stop` and `is_playing` never wait on a note.

use super::types::{PlaybackState, ToneEvent};
use crate::buffer::CommandBuffer;
use crate::config::EngineConfig;
use crate::error::AudioError;
use crate::parser::Interpreter;
use crate::tone::ToneDriver;
use parking_lot::{Condvar, Mutex};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Buffer, interpreter and pending event of one engine
#[derive(Debug)]
pub(crate) struct EngineState {
    pub buffer: CommandBuffer,
    pub interpreter: Interpreter,
    /// The next tone, parsed but not yet finished. Never more than one.
    pub pending: Option<ToneEvent>,
    pub running: bool,
    /// Bumped by `stop` so a sounding step can tell it was cancelled
    pub generation: u64,
    /// A background worker thread exists and will keep stepping
    pub worker_active: bool,
    pub last_error: Option<AudioError>,
}

impl EngineState {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            buffer: CommandBuffer::new(config.capacity),
            interpreter: Interpreter::new(config.defaults),
            pending: None,
            running: false,
            generation: 0,
            worker_active: false,
            last_error: None,
        }
    }

    pub fn is_playing(&self) -> bool {
        !self.buffer.is_empty() || self.pending.is_some()
    }

    pub fn playback_state(&self) -> PlaybackState {
        if self.pending.is_some() {
            PlaybackState::Sounding
        } else if !self.buffer.is_empty() {
            PlaybackState::Parsing
        } else {
            PlaybackState::Idle
        }
    }

    /// Append all pieces or none of them.
    pub fn append(&mut self, pieces: &[&str]) -> Result<(), AudioError> {
        if let Err(e) = self.buffer.append_all(pieces) {
            warn!("Error adding notes: {}", e);
            return Err(e);
        }
        self.running = true;
        Ok(())
    }

    pub fn stop(&mut self) {
        self.buffer.clear();
        self.pending = None;
        self.running = false;
        self.generation = self.generation.wrapping_add(1);
        self.last_error = None;
    }

    /// Make sure an event is pending if the buffer has one to give.
    ///
    /// A syntax error discards the buffer and leaves a silent zero-length
    /// event pending, so the step that follows still has something to finish.
    pub fn prepare(&mut self) -> Option<ToneEvent> {
        if !self.running {
            return None;
        }

        if self.pending.is_none() && !self.buffer.is_empty() {
            match self.interpreter.next_event(&mut self.buffer) {
                Ok(event) => self.pending = event,
                Err(e) => {
                    warn!("{}", e);
                    self.last_error = Some(e);
                    self.pending = Some(ToneEvent::SILENT);
                }
            }
        }

        if !self.is_playing() {
            self.running = false;
        }
        self.pending
    }
}

/// State shared between the facade and the background worker
pub(crate) struct Shared<D> {
    pub state: Mutex<EngineState>,
    pub driver: Mutex<D>,
    /// Signalled when notes are added, an event finishes, or playback stops
    pub changed: Condvar,
}

impl<D: ToneDriver> Shared<D> {
    pub fn new(driver: D, config: &EngineConfig) -> Self {
        Self {
            state: Mutex::new(EngineState::new(config)),
            driver: Mutex::new(driver),
            changed: Condvar::new(),
        }
    }

    /// Run one scheduling step: parse the next event if none is pending, then
    /// sound it and block for its duration.
    ///
    /// Returns whether anything is left to play. A `stop` during the tone wakes
    /// the step early and silences the driver.
    pub fn step(&self) -> bool {
        let mut driver = self.driver.lock();
        let mut state = self.state.lock();

        let Some(event) = state.prepare() else {
            self.changed.notify_all();
            return false;
        };

        let generation = state.generation;
        let duration_ms = event.duration_ms();
        debug!(
            frequency_hz = event.frequency_hz,
            duration_ms, "Playing note"
        );
        if !event.is_silent() {
            driver.set_volume(event.volume);
        }
        driver.emit(event.frequency_hz, duration_ms);

        let deadline = Instant::now() + Duration::from_millis(duration_ms);
        while state.generation == generation {
            if self.changed.wait_until(&mut state, deadline).timed_out() {
                break;
            }
        }

        if state.generation == generation {
            state.pending = None;
        } else {
            debug!("Playback stopped mid-note");
            driver.silence();
        }

        let more = state.running && state.is_playing();
        if !more {
            state.running = false;
        }
        self.changed.notify_all();
        more
    }

    /// Body of the background playback thread.
    ///
    /// Steps until nothing is left, then clears `worker_active` under the same
    /// lock that `play_notes_background` checks, so notes appended after the
    /// last step are never stranded.
    pub fn run_worker(&self) {
        debug!("Background playback started");
        loop {
            if self.step() {
                continue;
            }
            let mut state = self.state.lock();
            if !state.is_playing() {
                state.worker_active = false;
                break;
            }
        }
        debug!("Background playback finished");
    }
}
