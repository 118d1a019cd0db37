//! `creditpack search` — run a retrieval tool through the registry.

use creditpack_config::AppConfig;
use creditpack_core::tool::ToolCall;

pub async fn run(tool: &str, query: &str, num_results: Option<u64>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let registry = creditpack_tools::registry_with_limits(&config.tools);

    let mut arguments = serde_json::json!({ "query": query });
    if let Some(n) = num_results {
        arguments["num_results"] = n.into();
    }

    let call = ToolCall {
        id: "cli".into(),
        name: tool.to_string(),
        arguments,
    };
    let result = registry.execute(&call).await?;
    println!("{}", result.output);
    Ok(())
}
