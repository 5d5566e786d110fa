//! # Error Types
//!
//! This module defines all error types for the audio engine.
//!
//! ## Error Types
//! - `CapacityExceeded` - `add_notes` would overflow the command buffer (reported to the caller)
//! - `Syntax` - Unrecognized leading token in the notation text (logged and kept as `last_error`)
//! - `Config` - Invalid engine configuration
//! - `Spawn` - The background playback thread could not be started
//!
//! ## Usage
//! ```rust
//! use yaudio::{AudioEngine, AudioError, RecordingDriver};
//!
//! let engine = AudioEngine::with_defaults(RecordingDriver::new());
//! match engine.add_notes("C D E") {
//!     Ok(()) => {}
//!     Err(AudioError::CapacityExceeded { capacity, .. }) => {
//!         eprintln!("Too many notes (capacity {})", capacity);
//!     }
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AudioError {
    /// The append would push the command buffer past its capacity.
    ///
    /// The buffer is left untouched when this is returned.
    ///
    /// # Example
    /// ```
    /// # use yaudio::AudioError;
    /// let err = AudioError::CapacityExceeded {
    ///     buffered: 3998,
    ///     incoming: 5,
    ///     capacity: 4000,
    /// };
    /// assert_eq!(
    ///     err.to_string(),
    ///     "Too many notes in buffer (3998 + 5 > 4000)"
    /// );
    /// ```
    #[error("Too many notes in buffer ({buffered} + {incoming} > {capacity})")]
    CapacityExceeded {
        buffered: usize,
        incoming: usize,
        capacity: usize,
    },

    /// Syntax error in the notation text.
    ///
    /// `position` is the byte offset of the offending character within the
    /// sequence appended since the buffer was last emptied. `remaining` is the
    /// text that was discarded.
    ///
    /// # Example
    /// ```
    /// # use yaudio::AudioError;
    /// let err = AudioError::Syntax {
    ///     position: 4,
    ///     found: 'Q',
    ///     remaining: "Q C D".to_string(),
    /// };
    /// assert_eq!(err.to_string(), "Syntax error in notes at offset 4: unexpected 'Q' in \"Q C D\"");
    /// ```
    #[error("Syntax error in notes at offset {position}: unexpected '{found}' in \"{remaining}\"")]
    Syntax {
        position: usize,
        found: char,
        remaining: String,
    },

    /// Invalid engine configuration.
    #[error("Invalid audio configuration: {0}")]
    Config(String),

    /// The background playback context could not be started.
    #[error("Failed to start background playback: {0}")]
    Spawn(String),
}
