//! `search_guidelines` — retrieval over lending policy and compliance guidelines.
//!
//! The declared name and parameter names here are the ones the LLM sees and
//! the ones the registry binds; callers must use `num_results`, not `top_k`.

use async_trait::async_trait;
use creditpack_core::error::ToolError;
use creditpack_core::tool::{Tool, ToolResult};

use crate::corpus::{self, SearchArgs, SearchLimits};

pub const NAME: &str = "search_guidelines";

#[derive(Debug, Default)]
pub struct SearchGuidelinesTool {
    limits: SearchLimits,
}

impl SearchGuidelinesTool {
    pub fn new(limits: SearchLimits) -> Self {
        Self { limits }
    }
}

#[async_trait]
impl Tool for SearchGuidelinesTool {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Search lending policy and compliance guidelines (concentration limits, LTV, KYC/AML, ESG, governance). Returns passages sorted by relevance."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "What to look up in the guidelines"
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
        let hits = corpus::rank(corpus::GUIDELINES, &args.query, args.num_results);
        tracing::debug!(query = %args.query, hits = hits.len(), "search_guidelines");

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

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn query_returns_guidelines() {
        let tool = SearchGuidelinesTool::default();
        let result = tool
            .execute(serde_json::json!({"query": "loan-to-value thresholds"}))
            .await
            .unwrap();

        assert!(result.success);
        assert!(result.output.contains("guide_002"));
    }

    #[tokio::test]
    async fn respects_num_results() {
        let tool = SearchGuidelinesTool::default();
        let result = tool
            .execute(serde_json::json!({"query": "risk policy committee capital", "num_results": 2}))
            .await
            .unwrap();

        let data: Vec<serde_json::Value> = serde_json::from_str(&result.output).unwrap();
        assert_eq!(data.len(), 2);
    }

    #[tokio::test]
    async fn missing_query_returns_error() {
        let tool = SearchGuidelinesTool::default();
        let result = tool.execute(serde_json::json!({})).await;
        assert!(matches!(result, Err(ToolError::InvalidArguments(_))));
    }

    #[test]
    fn tool_definition() {
        let def = SearchGuidelinesTool::default().to_definition();
        assert_eq!(def.name, "search_guidelines");
        let mut params = def.parameter_names();
        params.sort();
        assert_eq!(params, vec!["num_results", "query"]);
    }
}
