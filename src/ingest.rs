//! Ingestion of exported scrim logs.
//!
//! A log holds one record per line: an optional `[hh:mm:ss.xx] ` wall-clock
//! prefix, then comma-separated fields led by the event kind. Every record is
//! validated through [`crate::schema`]; what happens to invalid records is
//! decided by the caller's [`IngestPolicy`].

use std::path::Path;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::{MapId, PlayerStatRow, RawField, RawRecord, TypedEvent};
use crate::schema::{self, ValidationError};
use crate::stream::EventStream;

/// Ingestion errors.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Failed to read log: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid record on line {line}: {source}")]
    Invalid {
        line: usize,
        source: ValidationError,
    },
}

/// What to do with a record that fails validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IngestPolicy {
    /// Stop at the first invalid record
    #[default]
    Abort,

    /// Log a warning, note the record in the report, and carry on
    Skip,
}

/// A record dropped under [`IngestPolicy::Skip`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedRecord {
    pub line: usize,
    pub error: ValidationError,
}

/// Counts for one ingested log.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IngestReport {
    /// Non-blank lines seen
    pub records: usize,
    pub events: usize,
    pub skipped: Vec<SkippedRecord>,
}

/// Everything ingested from one map's log.
#[derive(Debug, Clone)]
pub struct ParsedMap {
    pub map_id: MapId,
    pub stream: EventStream,
    pub stat_rows: Vec<PlayerStatRow>,
    pub report: IngestReport,
}

/// Split one log line into raw fields.
///
/// Returns `None` for blank lines. Every field becomes a trimmed
/// [`RawField::Token`], so identifiers such as `007` survive untouched until
/// the schema reads numeric fields as numbers.
pub fn tokenize_line(line: &str) -> Option<RawRecord> {
    let line = strip_timestamp(line.trim());
    if line.is_empty() {
        return None;
    }

    let fields = line
        .split(',')
        .map(|field| RawField::Token(field.trim().to_string()))
        .collect();
    Some(RawRecord::new(fields))
}

fn strip_timestamp(line: &str) -> &str {
    if !line.starts_with('[') {
        return line;
    }
    match line.find(']') {
        Some(end) => line[end + 1..].trim_start(),
        None => line,
    }
}

/// Ingest a log held in memory. `source` labels the map in its identifier.
pub fn ingest_str(
    source: &str,
    contents: &str,
    policy: IngestPolicy,
) -> Result<ParsedMap, IngestError> {
    let mut report = IngestReport::default();
    let mut events: Vec<TypedEvent> = Vec::new();

    for (index, line) in contents.lines().enumerate() {
        let line_number = index + 1;
        let Some(record) = tokenize_line(line) else {
            continue;
        };
        report.records += 1;

        match schema::parse_tagged(&record) {
            Ok(event) => events.push(event),
            Err(error) => match policy {
                IngestPolicy::Abort => {
                    return Err(IngestError::Invalid {
                        line: line_number,
                        source: error,
                    })
                }
                IngestPolicy::Skip => {
                    warn!("Skipping line {} of {}: {}", line_number, source, error);
                    report.skipped.push(SkippedRecord {
                        line: line_number,
                        error,
                    });
                }
            },
        }
    }
    report.events = events.len();

    let map_id = map_id_for(source, &events);
    let stream = EventStream::new(map_id.clone(), events);
    if !stream.is_time_ordered() {
        debug!("Events in {} are not in match-time order", source);
    }
    let stat_rows = stream.stat_rows();

    info!(
        "Ingested {} events from {} ({} skipped) as map {}",
        report.events,
        source,
        report.skipped.len(),
        map_id
    );

    Ok(ParsedMap {
        map_id,
        stream,
        stat_rows,
        report,
    })
}

/// Ingest a log file.
pub fn ingest_file(path: &Path, policy: IngestPolicy) -> Result<ParsedMap, IngestError> {
    let contents = std::fs::read_to_string(path)?;
    ingest_str(&path.display().to_string(), &contents, policy)
}

fn map_id_for(source: &str, events: &[TypedEvent]) -> MapId {
    let start = events.iter().find_map(|e| match e {
        TypedEvent::MatchStart(m) => Some(m),
        _ => None,
    });
    match start {
        Some(m) => MapId::generate(&[
            source,
            m.map_name.as_str(),
            m.team_1_name.as_str(),
            m.team_2_name.as_str(),
        ]),
        None => MapId::generate(&[source]),
    }
}
