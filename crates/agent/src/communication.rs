//! Communication log — a session-scoped record of inter-agent queries.
//!
//! The chat UI reads it to show how many peer consultations happened and
//! what was asked. The router only appends.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// A single query/response exchange between two agents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommunicationEntry {
    pub timestamp: DateTime<Utc>,
    pub from: String,
    pub to: String,
    pub query: String,
    pub response: Option<String>,
    pub outcome: CommunicationOutcome,
    pub duration_ms: u64,
    pub details: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CommunicationOutcome {
    /// The peer replied with usable text
    Answered,
    /// The peer is not registered or replied with nothing
    Unavailable,
    /// The query errored, panicked or timed out
    Failed,
}

/// Where entries are forwarded in addition to the in-memory list.
pub trait CommunicationSink: Send + Sync {
    fn record(&self, entry: &CommunicationEntry);
}

/// In-memory communication log with optional sinks.
pub struct CommunicationLog {
    entries: Mutex<Vec<CommunicationEntry>>,
    sinks: Vec<Box<dyn CommunicationSink>>,
}

impl std::fmt::Debug for CommunicationLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommunicationLog")
            .field("entry_count", &self.count())
            .field("sink_count", &self.sinks.len())
            .finish()
    }
}

impl Default for CommunicationLog {
    fn default() -> Self {
        Self::new()
    }
}

impl CommunicationLog {
    pub fn new() -> Self {
        Self::with_sinks(Vec::new())
    }

    pub fn with_sinks(sinks: Vec<Box<dyn CommunicationSink>>) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            sinks,
        }
    }

    /// Append an entry and forward it to every sink.
    pub fn record(&self, entry: CommunicationEntry) {
        for sink in &self.sinks {
            sink.record(&entry);
        }
        self.lock().push(entry);
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> Vec<CommunicationEntry> {
        self.lock().clone()
    }

    /// Entries addressed to one agent.
    pub fn entries_for(&self, agent: &str) -> Vec<CommunicationEntry> {
        self.lock().iter().filter(|e| e.to == agent).cloned().collect()
    }

    pub fn count(&self) -> usize {
        self.lock().len()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<CommunicationEntry>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Logs each entry through `tracing`.
pub struct TracingSink;

impl CommunicationSink for TracingSink {
    fn record(&self, entry: &CommunicationEntry) {
        tracing::info!(
            from = %entry.from,
            to = %entry.to,
            outcome = ?entry.outcome,
            duration_ms = entry.duration_ms,
            query = %entry.query,
            "agent communication"
        );
    }
}
