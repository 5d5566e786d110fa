//! Tone output
//!
//! The engine drives one square-wave channel through [`ToneDriver`]. Drivers
//! start the tone and return at once; the scheduler does the waiting.

use parking_lot::Mutex;
use std::sync::Arc;

/// One tone output channel
pub trait ToneDriver: Send {
    /// Sound `frequency_hz` for `duration_ms`. 0 Hz is silence.
    fn emit(&mut self, frequency_hz: f64, duration_ms: u64);

    /// Volume (1-10) for the tones that follow. Drivers without volume
    /// control ignore it.
    fn set_volume(&mut self, _volume: u32) {}

    /// Cut the current tone short.
    fn silence(&mut self) {
        self.emit(0.0, 0);
    }
}

impl<D: ToneDriver + ?Sized> ToneDriver for Box<D> {
    fn emit(&mut self, frequency_hz: f64, duration_ms: u64) {
        (**self).emit(frequency_hz, duration_ms)
    }

    fn set_volume(&mut self, volume: u32) {
        (**self).set_volume(volume)
    }

    fn silence(&mut self) {
        (**self).silence()
    }
}

/// A call made on a [`RecordingDriver`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DriverCall {
    Emit { frequency_hz: f64, duration_ms: u64 },
    Volume(u32),
    Silence,
}

/// Driver that records every call instead of producing sound.
///
/// Clones share one log, so a test can keep a handle while the engine owns
/// the driver.
#[derive(Debug, Clone, Default)]
pub struct RecordingDriver {
    calls: Arc<Mutex<Vec<DriverCall>>>,
}

impl RecordingDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// All calls so far, oldest first
    pub fn calls(&self) -> Vec<DriverCall> {
        self.calls.lock().clone()
    }

    /// Only the `emit` calls, as `(frequency_hz, duration_ms)`
    pub fn emitted(&self) -> Vec<(f64, u64)> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                DriverCall::Emit {
                    frequency_hz,
                    duration_ms,
                } => Some((*frequency_hz, *duration_ms)),
                _ => None,
            })
            .collect()
    }

    pub fn was_silenced(&self) -> bool {
        self.calls.lock().contains(&DriverCall::Silence)
    }
}

impl ToneDriver for RecordingDriver {
    fn emit(&mut self, frequency_hz: f64, duration_ms: u64) {
        self.calls.lock().push(DriverCall::Emit {
            frequency_hz,
            duration_ms,
        });
    }

    fn set_volume(&mut self, volume: u32) {
        self.calls.lock().push(DriverCall::Volume(volume));
    }

    fn silence(&mut self) {
        self.calls.lock().push(DriverCall::Silence);
    }
}
