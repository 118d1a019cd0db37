//! `search_procedure` — retrieval over the bank's credit procedures.
//!
//! The declared name and parameter names here are the ones the LLM sees and
//! the ones the registry binds; callers must use `num_results`, not `top_k`.

use async_trait::async_trait;
use creditpack_core::error::ToolError;
use creditpack_core::tool::{Tool, ToolResult};

use crate::corpus::{self, SearchArgs, SearchLimits};

pub const NAME: &str = "search_procedure";

#[derive(Debug, Default)]
pub struct SearchProcedureTool {
    limits: SearchLimits,
}

impl SearchProcedureTool {
    pub fn new(limits: SearchLimits) -> Self {
        Self { limits }
    }
}

#[async_trait]
impl Tool for SearchProcedureTool {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Search internal credit procedures (approval workflow, risk rating, collateral, monitoring). Returns passages sorted by relevance."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "What to look up in the procedures"
                },
                "num_results": {
                    "type": "integer",
                    "description": format!("Maximum number of passages to return (default {})", self.limits.default_num_results),
                    "default": self.limits.default_num_results
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let args = SearchArgs::parse(&arguments, self.limits)?;
        let hits = corpus::rank(corpus::PROCEDURES, &args.query, args.num_results);
        tracing::debug!(query = %args.query, hits = hits.len(), "search_procedure");

        let data = serde_json::to_value(&hits).map_err(|e| ToolError::ExecutionFailed {
            tool_name: NAME.into(),
            reason: e.to_string(),
        })?;

        Ok(ToolResult {
            call_id: String::new(),
            success: true,
            output: serde_json::to_string_pretty(&data).unwrap_or_default(),
            data: Some(data),
        })
    }
}
