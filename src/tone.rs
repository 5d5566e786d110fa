use tracing::info;
use yaudio::ToneDriver;

/// Tone driver for hosts without a speaker pin: logs each tone instead of
/// toggling the output.
#[derive(Debug, Clone)]
pub struct LogTone {
    pin: u8,
    volume: u32,
}

impl LogTone {
    pub fn new(pin: u8) -> Self {
        Self { pin, volume: 0 }
    }
}

impl ToneDriver for LogTone {
    fn emit(&mut self, frequency_hz: f64, duration_ms: u64) {
        if frequency_hz == 0.0 {
            info!(pin = self.pin, duration_ms, "rest");
        } else {
            info!(
                pin = self.pin,
                volume = self.volume,
                duration_ms,
                "tone {:.2} Hz",
                frequency_hz
            );
        }
    }

    fn set_volume(&mut self, volume: u32) {
        self.volume = volume;
    }

    fn silence(&mut self) {
        info!(pin = self.pin, "silence");
    }
}
