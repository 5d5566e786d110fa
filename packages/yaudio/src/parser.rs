//! # Notation Interpreter
//!
//! Turns the front of the command buffer into one [`ToneEvent`] at a time.
//!
//! Control tokens (`O`, `T`, `V`, `!`) update the modal state and parsing
//! continues. The first pitch (`A`-`G`, `R`, `z`) or explicit-frequency escape
//! (`X`) ends the step; the modifiers directly after a pitch are folded into
//! that event. The buffer is never parsed ahead of the event being returned.
//!
//! ## Grammar
//! ```text
//! A-G               note, frequency from the octave-4 table scaled by 2^(octave-4)
//! R                 rest, quarter note by default
//! z                 end marker, 0.2s of silence regardless of tempo
//! O<digit>          octave 4-7
//! T<integer>        tempo 40-240
//! V<integer>        volume 1-10
//! !                 reset octave, tempo and volume
//! X<float>[M<float>] explicit frequency (20-20000 Hz, else silence) and duration in ms
//!
//! after a pitch:
//! 1-2000            duration = quarter * 4/n
//! .                 dotted (each further dot adds half the previous increment)
//! > <               octave up / down
//! # + -             sharp / flat
//! ```
//!
//! ## Example
//! ```rust
//! use yaudio::{CommandBuffer, Interpreter, ModalState};
//!
//! let mut buffer = CommandBuffer::new(100);
//! buffer.append("T240 C8 D").unwrap();
//!
//! let mut interpreter = Interpreter::new(ModalState::default());
//! let event = interpreter.next_event(&mut buffer)?.unwrap();
//!
//! assert_eq!(event.frequency_hz, 1046.5);
//! assert_eq!(event.duration_secs, 0.125);
//! assert_eq!(buffer.remaining(), " D");
//! # Ok::<(), yaudio::AudioError>(())
//! ```

use crate::buffer::CommandBuffer;
use crate::config::EngineConfig;
use crate::error::AudioError;
use crate::lexer::{Control, Lexer, Modifier, Pitch, Token};
use crate::playback::{ModalState, ToneEvent, OCTAVE_RANGE, TEMPO_RANGE, VOLUME_RANGE};
use std::ops::RangeInclusive;
use tracing::trace;

/// Valid note length divisors (`C1` whole note ... `C2000`)
pub const DURATION_RANGE: RangeInclusive<u32> = 1..=2000;
/// Frequencies an `X` escape may request; anything else plays silence
pub const EXPLICIT_FREQUENCY_RANGE: RangeInclusive<f64> = 20.0..=20000.0;
/// Length of the `z` end marker
pub const END_MARKER_SECS: f64 = 0.2;
/// 2^(1/12)
const SEMITONE: f64 = 1.059_463_094_359_295_3;

/// Interpreter over the command buffer, owning the modal state
#[derive(Debug, Clone)]
pub struct Interpreter {
    state: ModalState,
    defaults: ModalState,
}

impl Interpreter {
    pub fn new(defaults: ModalState) -> Self {
        Self {
            state: defaults,
            defaults,
        }
    }

    /// Current modal state
    pub fn state(&self) -> ModalState {
        self.state
    }

    /// Restore the modal defaults, as `!` does
    pub fn reset(&mut self) {
        self.state = self.defaults;
    }

    /// Parse the next tone event from the front of `buffer`.
    ///
    /// Returns `Ok(None)` when the buffer holds nothing but whitespace and
    /// control tokens (all of which are consumed). On a syntax error the whole
    /// buffer is discarded and the error returned.
    pub fn next_event(&mut self, buffer: &mut CommandBuffer) -> Result<Option<ToneEvent>, AudioError> {
        let mut lexer = Lexer::with_offset(buffer.remaining(), buffer.position());
        let result = self.read_event(&mut lexer);
        let consumed = lexer.position();

        match result {
            Ok(event) => {
                buffer.consume(consumed);
                Ok(event)
            }
            Err(e) => {
                buffer.clear();
                Err(e)
            }
        }
    }

    fn read_event(&mut self, lexer: &mut Lexer<'_>) -> Result<Option<ToneEvent>, AudioError> {
        while let Some(located) = lexer.next_token()? {
            trace!(offset = located.offset, token = ?located.token, "Parsed token");
            match located.token {
                Token::Control(control) => self.apply_control(control),
                Token::Pitch(pitch) => return Ok(Some(self.read_note(pitch, lexer))),
                Token::Explicit {
                    frequency_hz,
                    duration_ms,
                } => return Ok(Some(self.explicit(frequency_hz, duration_ms))),
            }
        }
        Ok(None)
    }

    fn apply_control(&mut self, control: Control) {
        match control {
            Control::Octave(Some(v)) if OCTAVE_RANGE.contains(&v) => self.state.octave = v,
            Control::Tempo(Some(v)) if TEMPO_RANGE.contains(&v) => self.state.tempo = v,
            Control::Volume(Some(v)) if VOLUME_RANGE.contains(&v) => self.state.volume = v,
            Control::Reset => self.reset(),
            ignored => trace!(control = ?ignored, "Ignoring out-of-range control value"),
        }
    }

    fn read_note(&mut self, pitch: Pitch, lexer: &mut Lexer<'_>) -> ToneEvent {
        let quarter = self.state.quarter_note_secs();
        let (mut frequency_hz, mut duration_secs) = match pitch {
            Pitch::Note(name) => (name.base_frequency() * self.state.octave_multiplier(), quarter),
            Pitch::Rest => (0.0, quarter),
            Pitch::End => (0.0, END_MARKER_SECS),
        };

        // Amount the last dot added; None outside a run of dots
        let mut dot_increment: Option<f64> = None;

        while let Some(modifier) = lexer.next_modifier() {
            match modifier {
                Modifier::Duration(divisor) => {
                    if let Some(n) = divisor.filter(|n| DURATION_RANGE.contains(n)) {
                        duration_secs *= 4.0 / n as f64;
                    }
                    dot_increment = None;
                }
                Modifier::Dot => {
                    let increment = dot_increment.unwrap_or(duration_secs) / 2.0;
                    duration_secs += increment;
                    dot_increment = Some(increment);
                }
                Modifier::OctaveUp => frequency_hz *= 2.0,
                Modifier::OctaveDown => frequency_hz /= 2.0,
                Modifier::Sharp => frequency_hz *= SEMITONE,
                Modifier::Flat => frequency_hz /= SEMITONE,
            }
        }

        ToneEvent {
            frequency_hz,
            duration_secs,
            volume: self.state.volume,
        }
    }

    fn explicit(&self, frequency_hz: f64, duration_ms: Option<f64>) -> ToneEvent {
        let frequency_hz = if EXPLICIT_FREQUENCY_RANGE.contains(&frequency_hz) {
            frequency_hz
        } else {
            0.0
        };
        ToneEvent {
            frequency_hz,
            duration_secs: duration_ms
                .map(|ms| ms / 1000.0)
                .unwrap_or_else(|| self.state.quarter_note_secs()),
            volume: self.state.volume,
        }
    }
}

/// Interpret a whole notation text without playing it.
///
/// Starts from the configured defaults and stops at the first syntax error.
pub fn parse_events(text: &str, config: &EngineConfig) -> Result<Vec<ToneEvent>, AudioError> {
    let mut buffer = CommandBuffer::new(text.len());
    buffer.append(text)?;

    let mut interpreter = Interpreter::new(config.defaults);
    let mut events = Vec::new();
    while let Some(event) = interpreter.next_event(&mut buffer)? {
        events.push(event);
    }
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-6,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    fn parse(text: &str) -> Vec<ToneEvent> {
        parse_events(text, &EngineConfig::default()).unwrap()
    }

    fn single(text: &str) -> ToneEvent {
        let events = parse(text);
        assert_eq!(events.len(), 1, "expected one event for {:?}", text);
        events[0]
    }

    #[test]
    fn test_default_quarter_note() {
        let event = single("C");
        assert_close(event.frequency_hz, 1046.5);
        assert_close(event.duration_secs, 0.5);
        assert_eq!(event.volume, 5);
    }

    #[test]
    fn test_lowercase_notes() {
        assert_eq!(single("c"), single("C"));
        assert_eq!(single("o4 t60 a"), single("O4 T60 A"));
    }

    #[test]
    fn test_note_table_at_octave_four() {
        let events = parse("O4 A B C D E F G");
        let expected = [440.0, 493.88, 523.25, 587.33, 659.25, 698.46, 783.99];
        assert_eq!(events.len(), expected.len());
        for (event, freq) in events.iter().zip(expected) {
            assert_close(event.frequency_hz, freq);
        }
    }

    #[test]
    fn test_duration_modifier() {
        assert_close(single("C4").duration_secs, 0.5);
        assert_close(single("C8").duration_secs, 0.25);
        assert_close(single("C1").duration_secs, 2.0);
        assert_close(single("C4").frequency_hz, 1046.5);
    }

    #[test]
    fn test_duration_out_of_range_ignored() {
        assert_close(single("C0").duration_secs, 0.5);
        assert_close(single("C2001").duration_secs, 0.5);
        assert_close(single("C99999999999").duration_secs, 0.5);
    }

    #[test]
    fn test_octave_control() {
        assert_close(single("O4 C").frequency_hz, 523.25);
        assert_close(single("O7 C").frequency_hz, 4186.0);
        // Out of range: octave stays at the default
        assert_close(single("O3 C").frequency_hz, 1046.5);
        assert_close(single("O8 C").frequency_hz, 1046.5);
    }

    #[test]
    fn test_octave_out_of_range_keeps_previous() {
        let events = parse("O6 C O3 C");
        assert_close(events[0].frequency_hz, 2093.0);
        assert_close(events[1].frequency_hz, 2093.0);
    }

    #[test]
    fn test_tempo_control() {
        assert_close(single("T240 C").duration_secs, 0.25);
        assert_close(single("T60 C").duration_secs, 1.0);
        assert_close(single("T30 C").duration_secs, 0.5);
        assert_close(single("T241 C").duration_secs, 0.5);
    }

    #[test]
    fn test_volume_control() {
        assert_eq!(single("V10 C").volume, 10);
        assert_eq!(single("V1 C").volume, 1);
        assert_eq!(single("V0 C").volume, 5);
        assert_eq!(single("V11 C").volume, 5);
    }

    #[test]
    fn test_reset() {
        let events = parse("T60 O7 V9 C ! C");
        assert_close(events[0].frequency_hz, 4186.0);
        assert_close(events[0].duration_secs, 1.0);
        assert_eq!(events[0].volume, 9);

        assert_close(events[1].frequency_hz, 1046.5);
        assert_close(events[1].duration_secs, 0.5);
        assert_eq!(events[1].volume, 5);
    }

    #[test]
    fn test_reset_uses_configured_defaults() {
        let config = EngineConfig {
            defaults: ModalState {
                tempo: 60,
                octave: 4,
                volume: 2,
            },
            ..EngineConfig::default()
        };
        let events = parse_events("T240 O7 ! C", &config).unwrap();
        assert_close(events[0].frequency_hz, 523.25);
        assert_close(events[0].duration_secs, 1.0);
        assert_eq!(events[0].volume, 2);
    }

    #[test]
    fn test_dots() {
        assert_close(single("C.").duration_secs, 0.75);
        assert_close(single("C..").duration_secs, 0.875);
        assert_close(single("C8.").duration_secs, 0.375);
        assert_close(single("C2..").duration_secs, 1.75);
    }

    #[test]
    fn test_octave_shift_modifiers() {
        assert_close(single("C>").frequency_hz, 2093.0);
        assert_close(single("C>>").frequency_hz, 4186.0);
        assert_close(single("C<").frequency_hz, 523.25);
        assert_close(single("C><").frequency_hz, 1046.5);
    }

    #[test]
    fn test_sharp_and_flat() {
        let sharp = single("C#").frequency_hz;
        assert_close(sharp, 1046.5 * SEMITONE);
        assert_close(single("C+").frequency_hz, sharp);
        assert_close(single("C-").frequency_hz, 1046.5 / SEMITONE);
        assert_close(single("C#-").frequency_hz, 1046.5);
    }

    #[test]
    fn test_modifiers_in_any_order() {
        let a = single("C8.#>");
        let b = single("C>#8.");
        assert_close(a.frequency_hz, b.frequency_hz);
        assert_close(a.duration_secs, b.duration_secs);
    }

    #[test]
    fn test_rest() {
        let event = single("R");
        assert_eq!(event.frequency_hz, 0.0);
        assert_close(event.duration_secs, 0.5);
        assert_close(single("r8").duration_secs, 0.25);
        assert!(single("R#>").is_silent());
    }

    #[test]
    fn test_end_marker_ignores_tempo() {
        let event = single("T40 z");
        assert!(event.is_silent());
        assert_close(event.duration_secs, 0.2);
        assert_close(single("z2").duration_secs, 0.4);
    }

    #[test]
    fn test_explicit_frequency() {
        let event = single("X1000M250");
        assert_close(event.frequency_hz, 1000.0);
        assert_close(event.duration_secs, 0.25);

        // Octave and tempo have no effect
        let event = single("O7 T40 X1000M250");
        assert_close(event.frequency_hz, 1000.0);
        assert_close(event.duration_secs, 0.25);
    }

    #[test]
    fn test_explicit_frequency_out_of_range() {
        let event = single("X50000M10");
        assert_eq!(event.frequency_hz, 0.0);
        assert_close(event.duration_secs, 0.01);

        assert_eq!(single("X19.9M10").frequency_hz, 0.0);
        assert_close(single("X20M10").frequency_hz, 20.0);
    }

    #[test]
    fn test_explicit_without_duration_uses_quarter_note() {
        assert_close(single("T240 x440").duration_secs, 0.25);
    }

    #[test]
    fn test_one_event_per_step() {
        let mut buffer = CommandBuffer::new(64);
        buffer.append("T60 C D").unwrap();
        let mut interpreter = Interpreter::new(ModalState::default());

        let first = interpreter.next_event(&mut buffer).unwrap().unwrap();
        assert_close(first.frequency_hz, 1046.5);
        assert_eq!(buffer.remaining(), " D");
        assert_eq!(interpreter.state().tempo, 60);

        let second = interpreter.next_event(&mut buffer).unwrap().unwrap();
        assert_close(second.frequency_hz, 1174.66);
        assert!(buffer.is_empty());

        assert_eq!(interpreter.next_event(&mut buffer).unwrap(), None);
    }

    #[test]
    fn test_controls_only_yield_no_event() {
        let mut buffer = CommandBuffer::new(64);
        buffer.append(" T100 V7 ").unwrap();
        let mut interpreter = Interpreter::new(ModalState::default());

        assert_eq!(interpreter.next_event(&mut buffer).unwrap(), None);
        assert!(buffer.is_empty());
        assert_eq!(interpreter.state().tempo, 100);
        assert_eq!(interpreter.state().volume, 7);
    }

    #[test]
    fn test_syntax_error_clears_buffer() {
        let mut buffer = CommandBuffer::new(64);
        buffer.append("C Q D E").unwrap();
        let mut interpreter = Interpreter::new(ModalState::default());

        assert!(interpreter.next_event(&mut buffer).unwrap().is_some());
        let err = interpreter.next_event(&mut buffer).unwrap_err();
        assert_eq!(
            err,
            AudioError::Syntax {
                position: 2,
                found: 'Q',
                remaining: "Q D E".to_string(),
            }
        );
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_control_before_error_still_applies() {
        let mut buffer = CommandBuffer::new(64);
        buffer.append("T60 ?").unwrap();
        let mut interpreter = Interpreter::new(ModalState::default());

        assert!(interpreter.next_event(&mut buffer).is_err());
        assert_eq!(interpreter.state().tempo, 60);
    }

    #[test]
    fn test_whitespace_inside_token_is_error() {
        // "T 120" lexes T (no digits) then a bare number
        assert!(parse_events("T 120 A", &EngineConfig::default()).is_err());
        // "C 4" is a C followed by a bare number
        assert!(parse_events("C 4", &EngineConfig::default()).is_err());
    }

    #[test]
    fn test_non_ascii_is_error() {
        let err = parse_events("C é", &EngineConfig::default()).unwrap_err();
        assert!(matches!(err, AudioError::Syntax { found: 'é', position: 2, .. }));
    }
}
