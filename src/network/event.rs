use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Severity of a simulation log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Error,
    Warning,
}

/// A single entry in the simulator's chronological event log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// Unique identifier for the entry
    pub id: String,

    /// Timestamp when the entry was recorded
    pub timestamp: DateTime<Utc>,

    /// Human-readable message
    pub message: String,

    /// Severity of the event
    pub severity: Severity,
}

impl LogEntry {
    /// Creates a new log entry stamped with the current time
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        LogEntry {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            message: message.into(),
            severity,
        }
    }
}

/// A transient marker for a block in flight between two nodes
///
/// Purely visual: a view layer may render it as a packet travelling from
/// the miner to a peer. Markers have a fixed lifetime and carry no
/// authority over the simulation outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropagationEvent {
    /// Unique identifier for the marker
    pub id: String,

    /// Id of the node the block departs from
    pub from: String,

    /// Id of the node the block travels to
    pub to: String,

    /// Timestamp when the marker was emitted
    pub timestamp: DateTime<Utc>,
}

impl PropagationEvent {
    /// Creates a new marker stamped with the current time
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        PropagationEvent {
            id: Uuid::new_v4().to_string(),
            from: from.into(),
            to: to.into(),
            timestamp: Utc::now(),
        }
    }
}
