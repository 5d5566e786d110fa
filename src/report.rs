//! Dry-run reports
//!
//! Interprets notation without a tone driver and renders the resulting
//! events as YAML, e.g.
//!
//! ```yaml
//! total-ms: 500
//! events:
//! - frequency-hz: 523.25
//!   duration-secs: 0.5
//!   volume: 5
//! ```

use crate::error::BoardError;
use serde::Serialize;
use yaudio::{parse_events, EngineConfig, ToneEvent};

#[derive(Serialize, Debug)]
#[serde(rename_all = "kebab-case")]
struct Report {
    total_ms: u64,
    events: Vec<ToneEvent>,
}

pub fn dry_run(notes: &str, config: &EngineConfig) -> Result<String, BoardError> {
    let events = parse_events(notes, config)?;
    let report = Report {
        total_ms: events.iter().map(ToneEvent::duration_ms).sum(),
        events,
    };
    serde_yaml::to_string(&report).map_err(BoardError::Report)
}
