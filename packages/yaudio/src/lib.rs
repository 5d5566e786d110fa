pub mod buffer;
pub mod config;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod playback;
pub mod tone;

pub use buffer::CommandBuffer;
pub use config::{EngineConfig, RawEngineConfig, DEFAULT_CAPACITY};
pub use error::*;
pub use parser::{parse_events, Interpreter};
pub use playback::{AudioEngine, ModalState, PlaybackState, ToneEvent};
pub use tone::{DriverCall, RecordingDriver, ToneDriver};
