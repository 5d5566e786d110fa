use crate::error::AudioError;

/// Note names with their frequency at the reference octave (octave 4)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteName {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
}

impl NoteName {
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'A' => Some(NoteName::A),
            'B' => Some(NoteName::B),
            'C' => Some(NoteName::C),
            'D' => Some(NoteName::D),
            'E' => Some(NoteName::E),
            'F' => Some(NoteName::F),
            'G' => Some(NoteName::G),
            _ => None,
        }
    }

    /// Frequency in Hz at octave 4. The table runs A..G upward from A440, so
    /// C-G sit above A.
    pub fn base_frequency(&self) -> f64 {
        match self {
            NoteName::A => 440.0,
            NoteName::B => 493.88,
            NoteName::C => 523.25,
            NoteName::D => 587.33,
            NoteName::E => 659.25,
            NoteName::F => 698.46,
            NoteName::G => 783.99,
        }
    }
}

/// Control tokens change modal state and produce no sound.
///
/// A `None` value means the token had no usable number; out-of-range values
/// are filtered later by the interpreter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Control {
    Octave(Option<u32>), // O<digit>
    Tempo(Option<u32>),  // T<integer>
    Volume(Option<u32>), // V<integer>
    Reset,               // !
}

/// Tokens that start a tone event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pitch {
    Note(NoteName), // A-G
    Rest,           // R
    End,            // z (internal end marker)
}

/// Tokens that may follow a pitch
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Modifier {
    Duration(Option<u32>), // 1-2000
    Dot,                   // .
    OctaveUp,              // >
    OctaveDown,            // <
    Sharp,                 // # or +
    Flat,                  // -
}

/// Token types for the notation language
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token {
    Control(Control),
    Pitch(Pitch),
    /// X<float>[M<float>]
    Explicit {
        frequency_hz: f64,
        duration_ms: Option<f64>,
    },
}

/// A token with its byte offset in the sequence
#[derive(Debug, Clone, PartialEq)]
pub struct LocatedToken {
    pub token: Token,
    pub offset: usize,
}

/// Lexer over the unread front of the command buffer
///
/// Leading tokens (`next_token`) may be preceded by whitespace. Modifiers
/// (`next_modifier`) must follow their pitch directly, so a space ends a
/// note. `position()` reports how many bytes have been consumed, which the
/// caller uses to advance the buffer cursor.
pub struct Lexer<'a> {
    input: &'a str,
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    position: usize,
    base_offset: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self::with_offset(input, 0)
    }

    /// Create a lexer whose token offsets start at `base_offset`.
    pub fn with_offset(input: &'a str, base_offset: usize) -> Self {
        Self {
            input,
            chars: input.chars().peekable(),
            position: 0,
            base_offset,
        }
    }

    /// Bytes consumed so far
    pub fn position(&self) -> usize {
        self.position
    }

    /// Unconsumed input
    pub fn rest(&self) -> &'a str {
        &self.input[self.position..]
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        self.position += c.len_utf8();
        Some(c)
    }

    fn peek(&mut self) -> Option<&char> {
        self.chars.peek()
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_ascii_whitespace() {
                break;
            }
            self.advance();
        }
    }

    /// Consume the maximal run of decimal digits.
    ///
    /// Returns `None` when the run is empty or does not fit in a `u32`.
    fn read_number(&mut self) -> Option<u32> {
        let start = self.position;
        while let Some(c) = self.peek() {
            if !c.is_ascii_digit() {
                break;
            }
            self.advance();
        }
        self.input[start..self.position].parse().ok()
    }

    /// Consume a decimal float: `[+-]digits[.digits][(e|E)[+-]digits]`.
    ///
    /// At least one mantissa digit is required. Nothing is consumed when no
    /// float is present.
    fn read_float(&mut self) -> Option<f64> {
        let bytes = self.input.as_bytes();
        let start = self.position;
        let mut end = start;

        if matches!(bytes.get(end), Some(b'+' | b'-')) {
            end += 1;
        }
        let mantissa_start = end;
        while bytes.get(end).is_some_and(u8::is_ascii_digit) {
            end += 1;
        }
        let mut digits = end - mantissa_start;
        if bytes.get(end) == Some(&b'.') {
            let fraction_start = end + 1;
            let mut fraction_end = fraction_start;
            while bytes.get(fraction_end).is_some_and(u8::is_ascii_digit) {
                fraction_end += 1;
            }
            digits += fraction_end - fraction_start;
            end = fraction_end;
        }
        if digits == 0 {
            return None;
        }
        if matches!(bytes.get(end), Some(b'e' | b'E')) {
            let mut exp_end = end + 1;
            if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
                exp_end += 1;
            }
            let exp_digits_start = exp_end;
            while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
                exp_end += 1;
            }
            if exp_end > exp_digits_start {
                end = exp_end;
            }
        }

        let value = self.input[start..end].parse().ok()?;
        // Every byte in the float is ASCII, so one char per byte
        for _ in start..end {
            self.advance();
        }
        Some(value)
    }

    fn syntax_error(&self, offset: usize, found: char) -> AudioError {
        AudioError::Syntax {
            position: self.base_offset + offset,
            found,
            remaining: self.input[offset..].to_string(),
        }
    }

    /// Lex the next leading token, skipping whitespace before it.
    ///
    /// Returns `Ok(None)` once the input is exhausted.
    pub fn next_token(&mut self) -> Result<Option<LocatedToken>, AudioError> {
        self.skip_whitespace();

        let start = self.position;
        let Some(&c) = self.peek() else {
            return Ok(None);
        };

        let token = match c {
            'O' | 'o' => {
                self.advance();
                // Always two characters; a non-digit is swallowed and discarded
                let digit = self.advance().and_then(|d| d.to_digit(10));
                Token::Control(Control::Octave(digit))
            }
            'T' | 't' => {
                self.advance();
                Token::Control(Control::Tempo(self.read_number()))
            }
            'V' | 'v' => {
                self.advance();
                Token::Control(Control::Volume(self.read_number()))
            }
            '!' => {
                self.advance();
                Token::Control(Control::Reset)
            }
            'R' | 'r' => {
                self.advance();
                Token::Pitch(Pitch::Rest)
            }
            'z' => {
                self.advance();
                Token::Pitch(Pitch::End)
            }
            'X' | 'x' => {
                self.advance();
                let frequency_hz = self
                    .read_float()
                    .ok_or_else(|| self.syntax_error(start, c))?;
                let duration_ms = match self.peek() {
                    Some('M' | 'm') => {
                        self.advance();
                        Some(self.read_float().ok_or_else(|| self.syntax_error(start, c))?)
                    }
                    _ => None,
                };
                Token::Explicit {
                    frequency_hz,
                    duration_ms,
                }
            }
            _ => match NoteName::from_char(c) {
                Some(name) => {
                    self.advance();
                    Token::Pitch(Pitch::Note(name))
                }
                None => return Err(self.syntax_error(start, c)),
            },
        };

        Ok(Some(LocatedToken {
            token,
            offset: self.base_offset + start,
        }))
    }

    /// Lex a note modifier at the current position, if one is there.
    ///
    /// Nothing is consumed when the next character does not start a modifier.
    pub fn next_modifier(&mut self) -> Option<Modifier> {
        let &c = self.peek()?;

        let modifier = match c {
            '0'..='9' => Modifier::Duration(self.read_number()),
            '.' => {
                self.advance();
                Modifier::Dot
            }
            '>' => {
                self.advance();
                Modifier::OctaveUp
            }
            '<' => {
                self.advance();
                Modifier::OctaveDown
            }
            '#' | '+' => {
                self.advance();
                Modifier::Sharp
            }
            '-' => {
                self.advance();
                Modifier::Flat
            }
            _ => return None,
        };

        Some(modifier)
    }
}
