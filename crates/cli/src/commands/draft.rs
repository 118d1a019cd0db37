//! `creditpack draft` — draft a section offline.
//!
//! No peer agents run in the CLI, so every consultation comes back empty
//! and the section is drafted from context alone. This is the same path a
//! live session takes when its peers are down.

use std::sync::Arc;
use creditpack_agent::{AgentQueryRouter, CommunicationLog, OutlineDrafter, TracingSink, WriterAgent};
use creditpack_config::AppConfig;
use creditpack_core::bus::InMemoryAgentBus;
use creditpack_core::section::SectionRequest;

use super::parse_context;

pub async fn run(section: &str, context: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let request = SectionRequest::new(section)?.with_context_map(parse_context(context)?);

    let log = Arc::new(CommunicationLog::with_sinks(vec![Box::new(TracingSink)]));
    let router = AgentQueryRouter::new(Arc::new(InMemoryAgentBus::new()), &config.router)
        .with_communication_log(log.clone());
    let writer = WriterAgent::new(router, Arc::new(OutlineDrafter));

    let drafted = writer.draft_section(&request).await?;

    println!("{}", drafted.text);
    eprintln!(
        "  Agent communications: {} ({} with insight)",
        log.count(),
        drafted.consultation.insight_count()
    );
    Ok(())
}
