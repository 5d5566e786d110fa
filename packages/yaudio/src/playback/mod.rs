//! # Playback Module
//!
//! Realize parsed tone events on a [`ToneDriver`](crate::tone::ToneDriver) in
//! real time.
//!
//! ## Sub-modules
//! - `types` - ToneEvent, ModalState, PlaybackState type definitions
//! - `scheduler` - Engine state and the one-event scheduling step
//! - `engine` - The public `AudioEngine` facade and background playback
//!
//! ## Scheduling
//!
//! Each step moves the engine through
//! `Idle -> Parsing -> Sounding -> Parsing/Idle`:
//! 1. If no event is pending and text is buffered, parse exactly one event
//! 2. Emit it on the driver and block for its duration
//! 3. Clear the pending event
//!
//! The buffer is never parsed more than one event ahead.
//!
//! ### Synchronous playback
//! `play_notes` appends and then runs steps on the calling thread until
//! nothing is left.
//!
//! ### Background playback
//! `play_notes_background` appends and, unless a worker already exists,
//! starts one thread that runs steps until nothing is left and then exits.
//! Further calls while it runs extend the same sequence.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use yaudio::{AudioEngine, RecordingDriver};
//!
//! let driver = RecordingDriver::new();
//! let engine = AudioEngine::with_defaults(driver.clone());
//!
//! engine.play_notes_background("X300M2")?;
//! engine.play_notes_background("X600M2")?;
//! assert!(engine.wait_idle(Duration::from_secs(5)));
//!
//! assert_eq!(driver.emitted(), vec![(300.0, 2), (600.0, 2)]);
//! # Ok::<(), yaudio::AudioError>(())
//! ```

mod engine;
mod scheduler;
mod types;


pub use engine::AudioEngine;
pub use types::{ModalState, PlaybackState, ToneEvent, OCTAVE_RANGE, TEMPO_RANGE, VOLUME_RANGE};
