//! `creditpack route` — dry-run peer routing for a section.

use std::sync::Arc;
use creditpack_agent::AgentQueryRouter;
use creditpack_config::AppConfig;
use creditpack_core::bus::InMemoryAgentBus;

use super::parse_context;

pub async fn run(section: &str, context: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let context = parse_context(context)?;

    let router = AgentQueryRouter::new(Arc::new(InMemoryAgentBus::new()), &config.router);
    let plan = router.plan(section, &context);

    println!();
    println!("  Section:  {section}");
    if plan.is_empty() {
        println!("  No peer consultation; the section is drafted from context alone.");
        println!();
        return Ok(());
    }

    for query in &plan {
        println!();
        println!("  → {} ({}, topic: {})", query.agent, query.role, query.topic);
        println!("    {}", query.query);
    }
    println!();
    Ok(())
}
