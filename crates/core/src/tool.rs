//! Tool trait — the abstraction over agent capabilities.
//!
//! Tools are what an LLM invokes through native function-calling: the
//! retrieval searches over credit procedures and guidelines. For a call to
//! land, the name the model is told to use, the name in the declaration and
//! the name bound in the registry must be the same string, and so must every
//! parameter name. The registry derives all three from `Tool::name()` and
//! `Tool::parameters_schema()` so there is exactly one source for each.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use crate::error::ToolError;

/// A tool definition sent to the LLM so it knows what tools it can call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// The tool name
    pub name: String,

    /// Description of what the tool does
    pub description: String,

    /// JSON Schema describing the tool's parameters
    pub parameters: serde_json::Value,
}

impl ToolDefinition {
    /// Declared parameter names, in schema order.
    pub fn parameter_names(&self) -> Vec<&str> {
        self.parameters["properties"]
            .as_object()
            .map(|props| props.keys().map(|k| k.as_str()).collect())
            .unwrap_or_default()
    }

    /// Names listed under `required`.
    pub fn required_parameters(&self) -> Vec<&str> {
        self.parameters["required"]
            .as_array()
            .map(|req| req.iter().filter_map(|v| v.as_str()).collect())
            .unwrap_or_default()
    }
}

/// A request to execute a tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique call ID (matches the LLM's tool_call.id)
    pub id: String,

    /// Name of the tool to execute
    pub name: String,

    /// Arguments as a JSON value
    pub arguments: serde_json::Value,
}

/// The result of a tool execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// The call ID this result is for
    pub call_id: String,

    /// Whether the tool executed successfully
    pub success: bool,

    /// The output content
    pub output: String,

    /// Optional structured data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

/// The core Tool trait.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique name of this tool (e.g., "search_procedure").
    fn name(&self) -> &str;

    /// A description of what this tool does (sent to the LLM).
    fn description(&self) -> &str;

    /// JSON Schema describing this tool's parameters.
    fn parameters_schema(&self) -> serde_json::Value;

    /// Execute the tool with the given arguments.
    async fn execute(&self, arguments: serde_json::Value) -> std::result::Result<ToolResult, ToolError>;

    /// Convert this tool into a ToolDefinition for sending to the LLM.
    fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }
}

/// A mismatch somewhere in the prompt → declaration → binding chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractViolation {
    pub tool: String,
    pub problem: String,
}

impl std::fmt::Display for ContractViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.tool, self.problem)
    }
}

/// A registry of available tools.
///
/// Tools are bound under their canonical name. Older callers that still use
/// another name can be served through `alias`, which points at the very
/// same tool object; aliases are never advertised to the LLM.
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn Tool>>,
    aliases: HashMap<String, String>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
            aliases: HashMap::new(),
        }
    }

    /// Register a tool. Replaces any existing tool with the same name.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        let name = tool.name().to_string();
        self.aliases.remove(&name);
        self.tools.insert(name, tool);
    }

    /// Bind `alias` to the tool registered as `canonical`.
    pub fn alias(&mut self, alias: impl Into<String>, canonical: &str) -> Result<(), ToolError> {
        let alias = alias.into();
        if self.tools.contains_key(&alias) {
            return Err(ToolError::AliasConflict { alias });
        }
        if !self.tools.contains_key(canonical) {
            return Err(ToolError::NotFound(canonical.to_string()));
        }
        self.aliases.insert(alias, canonical.to_string());
        Ok(())
    }

    /// The canonical name `name` resolves to, if any.
    pub fn canonical_name<'a>(&'a self, name: &'a str) -> Option<&'a str> {
        if self.tools.contains_key(name) {
            return Some(name);
        }
        self.aliases
            .get(name)
            .map(|s| s.as_str())
            .filter(|target| self.tools.contains_key(*target))
    }

    /// Get a tool by canonical name or alias.
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        let canonical = self.canonical_name(name)?;
        self.tools.get(canonical).map(|t| t.as_ref())
    }

    /// Get all tool definitions (for sending to the LLM), sorted by name.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        let mut defs: Vec<ToolDefinition> = self.tools.values().map(|t| t.to_definition()).collect();
        defs.sort_by(|a, b| a.name.cmp(&b.name));
        defs
    }

    /// Render the tool list for an agent instruction, e.g.
    /// `- search_procedure(query, num_results): ...`.
    pub fn prompt_listing(&self) -> String {
        self.definitions()
            .iter()
            .map(|d| format!("- {}({}): {}", d.name, d.parameter_names().join(", "), d.description))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Execute a tool call.
    ///
    /// Arguments are checked against the declared schema first, so a caller
    /// using a parameter name the tool never declared fails loudly instead
    /// of being silently defaulted.
    pub async fn execute(&self, call: &ToolCall) -> std::result::Result<ToolResult, ToolError> {
        let tool = self.get(&call.name).ok_or_else(|| ToolError::NotFound(call.name.clone()))?;
        check_arguments(&tool.to_definition(), &call.arguments)?;

        let mut result = tool.execute(call.arguments.clone()).await?;
        result.call_id = call.id.clone();
        Ok(result)
    }

    /// Check every declaration for internal consistency.
    ///
    /// An empty list means each tool can be called by the name it
    /// advertises with the parameters it declares.
    pub fn verify_declarations(&self) -> Vec<ContractViolation> {
        let mut violations = Vec::new();

        let mut names: Vec<&String> = self.tools.keys().collect();
        names.sort();
        for bound_name in names {
            let def = self.tools[bound_name].to_definition();
            let mut problem = |p: String| {
                violations.push(ContractViolation {
                    tool: bound_name.clone(),
                    problem: p,
                })
            };

            if def.name.trim().is_empty() {
                problem("declared name is empty".into());
            }
            if &def.name != bound_name {
                problem(format!("declared as '{}' but bound as '{}'", def.name, bound_name));
            }
            if def.parameters["type"] != "object" {
                problem("parameter schema is not an object".into());
            }
            let declared = def.parameter_names();
            for req in def.required_parameters() {
                if !declared.contains(&req) {
                    problem(format!("required parameter '{req}' is not declared"));
                }
            }
        }

        let mut aliases: Vec<(&String, &String)> = self.aliases.iter().collect();
        aliases.sort();
        for (alias, target) in aliases {
            if !self.tools.contains_key(target) {
                violations.push(ContractViolation {
                    tool: alias.clone(),
                    problem: format!("alias points at missing tool '{target}'"),
                });
            }
        }

        violations
    }

    /// List all registered tool names (canonical only).
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(|s| s.as_str()).collect();
        names.sort();
        names
    }

    /// List `(alias, canonical)` pairs.
    pub fn aliases(&self) -> Vec<(&str, &str)> {
        let mut pairs: Vec<(&str, &str)> = self
            .aliases
            .iter()
            .map(|(a, c)| (a.as_str(), c.as_str()))
            .collect();
        pairs.sort();
        pairs
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn check_arguments(def: &ToolDefinition, arguments: &serde_json::Value) -> Result<(), ToolError> {
    let args = arguments.as_object().ok_or_else(|| {
        ToolError::InvalidArguments(format!("{}: arguments must be a JSON object", def.name))
    })?;

    let declared = def.parameter_names();
    if let Some(unknown) = args.keys().find(|k| !declared.contains(&k.as_str())) {
        return Err(ToolError::InvalidArguments(format!(
            "{}: unexpected parameter '{}' (declared: {})",
            def.name,
            unknown,
            declared.join(", ")
        )));
    }

    if let Some(missing) = def.required_parameters().into_iter().find(|r| !args.contains_key(*r)) {
        return Err(ToolError::InvalidArguments(format!(
            "{}: missing required parameter '{}'",
            def.name, missing
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A simple test tool for unit tests.
    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str { "echo" }
        fn description(&self) -> &str { "Echoes back the input" }
        fn parameters_schema(&self) -> serde_json::Value {
            serde_json::json!({
                "type": "object",
                "properties": {
                    "text": { "type": "string" },
                    "repeat": { "type": "integer" }
                },
                "required": ["text"]
            })
        }
        async fn execute(&self, arguments: serde_json::Value) -> std::result::Result<ToolResult, ToolError> {
            let text = arguments["text"].as_str().unwrap_or("").to_string();
            let repeat = arguments["repeat"].as_u64().unwrap_or(1) as usize;
            Ok(ToolResult {
                call_id: String::new(),
                success: true,
                output: text.repeat(repeat),
                data: None,
            })
        }
    }

    /// Declares a required parameter it never lists.
    struct BrokenTool;

    #[async_trait]
    impl Tool for BrokenTool {
        fn name(&self) -> &str { "broken" }
        fn description(&self) -> &str { "Inconsistent declaration" }
        fn parameters_schema(&self) -> serde_json::Value {
            serde_json::json!({
                "type": "object",
                "properties": { "query": { "type": "string" } },
                "required": ["query", "top_k"]
            })
        }
        async fn execute(&self, _arguments: serde_json::Value) -> std::result::Result<ToolResult, ToolError> {
            Err(ToolError::ExecutionFailed {
                tool_name: "broken".into(),
                reason: "never called".into(),
            })
        }
    }

    fn call(name: &str, arguments: serde_json::Value) -> ToolCall {
        ToolCall {
            id: "call_1".into(),
            name: name.into(),
            arguments,
        }
    }

    #[test]
    fn registry_register_and_lookup() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool));
        assert!(registry.get("echo").is_some());
        assert!(registry.get("nonexistent").is_none());
    }

    #[test]
    fn registry_definitions_hide_aliases() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool));
        registry.alias("tool_echo", "echo").unwrap();
        let defs = registry.definitions();
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].name, "echo");
        assert_eq!(registry.aliases(), vec![("tool_echo", "echo")]);
    }

    #[tokio::test]
    async fn registry_execute_tool() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool));

        let result = registry
            .execute(&call("echo", serde_json::json!({"text": "hello world"})))
            .await
            .unwrap();
        assert!(result.success);
        assert_eq!(result.output, "hello world");
        assert_eq!(result.call_id, "call_1");
    }

    #[tokio::test]
    async fn alias_executes_same_tool() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool));
        registry.alias("tool_echo", "echo").unwrap();

        let args = serde_json::json!({"text": "ab", "repeat": 2});
        let direct = registry.execute(&call("echo", args.clone())).await.unwrap();
        let aliased = registry.execute(&call("tool_echo", args)).await.unwrap();
        assert_eq!(direct.output, aliased.output);
        assert_eq!(registry.canonical_name("tool_echo"), Some("echo"));
    }

    #[test]
    fn alias_cannot_shadow_a_tool() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool));
        let err = registry.alias("echo", "echo").unwrap_err();
        assert!(matches!(err, ToolError::AliasConflict { .. }));
        let err = registry.alias("tool_missing", "missing").unwrap_err();
        assert!(matches!(err, ToolError::NotFound(_)));
    }

    #[tokio::test]
    async fn undeclared_parameter_rejected() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool));

        let err = registry
            .execute(&call("echo", serde_json::json!({"text": "x", "times": 3})))
            .await
            .unwrap_err();
        match err {
            ToolError::InvalidArguments(msg) => assert!(msg.contains("'times'")),
            other => panic!("expected InvalidArguments, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_required_parameter_rejected() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool));
        let err = registry
            .execute(&call("echo", serde_json::json!({"repeat": 2})))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }

    #[tokio::test]
    async fn registry_execute_missing_tool() {
        let registry = ToolRegistry::new();
        let err = registry
            .execute(&call("nonexistent", serde_json::json!({})))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::NotFound(_)));
    }

    #[test]
    fn verify_reports_undeclared_required_parameter() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool));
        registry.register(Box::new(BrokenTool));

        let violations = registry.verify_declarations();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].tool, "broken");
        assert!(violations[0].problem.contains("top_k"));
    }

    #[test]
    fn prompt_listing_uses_declared_names() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool));
        let listing = registry.prompt_listing();
        assert!(listing.starts_with("- echo("));
        assert!(listing.contains("text"));
        assert!(listing.contains("repeat"));
    }
}
