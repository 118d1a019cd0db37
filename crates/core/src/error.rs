//! Error types for the Credit Pack domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for all Credit Pack operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Agent bus errors ---
    #[error("Agent bus error: {0}")]
    Bus(#[from] BusError),

    // --- Tool errors ---
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    // --- Drafting ---
    #[error("Invalid section request: {0}")]
    InvalidSection(String),

    #[error("Drafting failed for section '{section}': {reason}")]
    Drafting { section: String, reason: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BusError {
    #[error("Agent not registered: {0}")]
    NotRegistered(String),

    #[error("Agent {agent} failed: {reason}")]
    AgentFailed { agent: String, reason: String },

    #[error("Agent {agent} did not answer within {timeout_ms}ms")]
    Timeout { agent: String, timeout_ms: u64 },

    #[error("Agent {agent} panicked while handling a query")]
    Panicked { agent: String },
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Alias '{alias}' is already bound to a tool")]
    AliasConflict { alias: String },

    #[error("Tool execution failed: {tool_name} — {reason}")]
    ExecutionFailed { tool_name: String, reason: String },

    #[error("Invalid tool arguments: {0}")]
    InvalidArguments(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bus_error_displays_agent() {
        let err = Error::Bus(BusError::Timeout {
            agent: "analyst".into(),
            timeout_ms: 1500,
        });
        assert!(err.to_string().contains("analyst"));
        assert!(err.to_string().contains("1500ms"));
    }

    #[test]
    fn tool_error_displays_correctly() {
        let err = Error::Tool(ToolError::InvalidArguments(
            "search_procedure: unexpected parameter 'top_k'".into(),
        ));
        assert!(err.to_string().contains("search_procedure"));
        assert!(err.to_string().contains("top_k"));
    }
}
