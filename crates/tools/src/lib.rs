//! Retrieval tools for the Credit Pack drafting agents.
//!
//! The writer and its peers look up bank procedures and lending guidelines
//! through these tools, either by calling them directly or through the
//! LLM's native function-calling.

pub mod corpus;
pub mod search_guidelines;
pub mod search_procedure;

use creditpack_config::ToolsConfig;
use creditpack_core::tool::ToolRegistry;

pub use corpus::{SearchHit, SearchLimits};
pub use search_guidelines::SearchGuidelinesTool;
pub use search_procedure::SearchProcedureTool;

/// Names older agent instructions used for the search tools. They resolve
/// to the canonical tools and are never advertised.
pub const LEGACY_ALIASES: &[(&str, &str)] = &[
    ("tool_search_procedure", search_procedure::NAME),
    ("tool_search_guidelines", search_guidelines::NAME),
];

/// Create a tool registry with the search tools and default limits.
pub fn default_registry() -> ToolRegistry {
    registry_with_limits(&ToolsConfig::default())
}

/// Create a tool registry with the search tools, limited per `config`.
pub fn registry_with_limits(config: &ToolsConfig) -> ToolRegistry {
    let limits = SearchLimits::from(config);
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(SearchProcedureTool::new(limits)));
    registry.register(Box::new(SearchGuidelinesTool::new(limits)));

    for (alias, canonical) in LEGACY_ALIASES {
        if let Err(e) = registry.alias(*alias, canonical) {
            tracing::warn!(alias, canonical, error = %e, "Skipping tool alias");
        }
    }
    registry
}
