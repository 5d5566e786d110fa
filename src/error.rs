use std::path::PathBuf;
use thiserror::Error;
use yaudio::AudioError;

#[derive(Error, Debug)]
pub enum BoardError {
    #[error(transparent)]
    Audio(#[from] AudioError),

    #[error("Invalid board configuration: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("Error writing report: {0}")]
    Report(serde_yaml::Error),

    #[error("Error reading '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}
