pub mod board;
pub mod config;
pub mod error;
pub mod report;
pub mod tone;

pub use board::YBoard;
pub use config::{BoardConfig, DEFAULT_TONE_PIN};
pub use error::*;
pub use report::dry_run;
pub use tone::LogTone;

/// Board wired to the logging tone driver, for hosts without a speaker
pub fn host_board(config: BoardConfig) -> YBoard<LogTone> {
    let driver = LogTone::new(config.tone_pin);
    YBoard::new(driver, config)
}
