//! Writer agent — drafts credit pack sections, consulting its peers first.
//!
//! The writer always goes through the [`AgentQueryRouter`] before calling
//! the drafter, so any analyst or compliance insight available on the bus
//! reaches the draft. Peer trouble never stops a draft; only the drafter
//! itself can fail.

use async_trait::async_trait;
use chrono::Utc;
use creditpack_core::error::{Error, Result};
use creditpack_core::event::{DomainEvent, EventBus};
use creditpack_core::section::{SectionContext, SectionRequest};
use std::sync::Arc;
use tracing::{info, warn};

use crate::router::{AgentQueryRouter, Consultation};

/// The generation step: turns context and peer insights into section prose.
#[async_trait]
pub trait SectionDrafter: Send + Sync {
    async fn draft(&self, section_name: &str, context: &SectionContext, insights: &str) -> Result<String>;
}

/// A finished section.
#[derive(Debug, Clone)]
pub struct DraftedSection {
    pub section_name: String,
    pub text: String,
    pub insights: String,
    pub consultation: Consultation,
}

pub struct WriterAgent {
    router: AgentQueryRouter,
    drafter: Arc<dyn SectionDrafter>,
    events: Option<Arc<EventBus>>,
}

impl WriterAgent {
    pub fn new(router: AgentQueryRouter, drafter: Arc<dyn SectionDrafter>) -> Self {
        Self {
            router,
            drafter,
            events: None,
        }
    }

    pub fn with_event_bus(mut self, events: Arc<EventBus>) -> Self {
        self.events = Some(events);
        self
    }

    /// Consult peers, then draft the section.
    pub async fn draft_section(&self, request: &SectionRequest) -> Result<DraftedSection> {
        let consultation = self.router.consult(request).await;
        let insights = consultation.insights();

        let text = match self
            .drafter
            .draft(&request.section_name, &request.context, &insights)
            .await
        {
            Ok(text) => text,
            Err(e) => {
                warn!(section = %request.section_name, error = %e, "Drafting failed");
                self.publish(DomainEvent::ErrorOccurred {
                    context: format!("drafting '{}'", request.section_name),
                    error_message: e.to_string(),
                    timestamp: Utc::now(),
                });
                return Err(e);
            }
        };

        info!(
            section = %request.section_name,
            request_id = %request.id,
            insight_sources = consultation.insight_count(),
            "Section drafted"
        );
        self.publish(DomainEvent::SectionDrafted {
            section: request.section_name.clone(),
            insight_sources: consultation.insight_count(),
            timestamp: Utc::now(),
        });

        Ok(DraftedSection {
            section_name: request.section_name.clone(),
            text,
            insights,
            consultation,
        })
    }

    fn publish(&self, event: DomainEvent) {
        if let Some(events) = &self.events {
            events.publish(event);
        }
    }
}

/// Offline drafter: lays out the context and insights as a markdown
/// skeleton for a human (or a later LLM pass) to fill in.
#[derive(Debug, Default)]
pub struct OutlineDrafter;

#[async_trait]
impl SectionDrafter for OutlineDrafter {
    async fn draft(&self, section_name: &str, context: &SectionContext, insights: &str) -> Result<String> {
        let title = section_name.trim();
        if title.is_empty() {
            return Err(Error::Drafting {
                section: section_name.to_string(),
                reason: "empty section title".into(),
            });
        }

        let mut out = format!("## {title}\n");

        if !context.is_empty() {
            out.push_str("\n### Context\n");
            for (key, value) in context {
                let rendered = match value {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                out.push_str(&format!("- {key}: {rendered}\n"));
            }
        }

        if !insights.trim().is_empty() {
            out.push_str("\n### Peer insights\n");
            out.push_str(insights.trim());
            out.push('\n');
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use creditpack_config::RouterConfig;
    use creditpack_core::bus::InMemoryAgentBus;

    struct FailingDrafter;

    #[async_trait]
    impl SectionDrafter for FailingDrafter {
        async fn draft(&self, section_name: &str, _context: &SectionContext, _insights: &str) -> Result<String> {
            Err(Error::Drafting {
                section: section_name.into(),
                reason: "generation backend down".into(),
            })
        }
    }

    /// Captures the insights the writer hands over.
    struct CapturingDrafter(std::sync::Mutex<Option<String>>);

    #[async_trait]
    impl SectionDrafter for CapturingDrafter {
        async fn draft(&self, _section_name: &str, _context: &SectionContext, insights: &str) -> Result<String> {
            *self.0.lock().unwrap() = Some(insights.to_string());
            Ok("drafted".into())
        }
    }

    fn router_over(bus: InMemoryAgentBus) -> AgentQueryRouter {
        AgentQueryRouter::new(Arc::new(bus), &RouterConfig::default())
    }

    #[tokio::test]
    async fn writer_passes_peer_insights_to_drafter() {
        let bus = InMemoryAgentBus::new();
        bus.register(Arc::new(ScriptedAgent::new("analyst", "DSCR falls to 1.1x in the downside case.")));
        let drafter = Arc::new(CapturingDrafter(std::sync::Mutex::new(None)));
        let writer = WriterAgent::new(router_over(bus), drafter.clone());

        let request = SectionRequest::new("Risk Assessment").unwrap();
        let drafted = writer.draft_section(&request).await.unwrap();

        assert_eq!(drafted.text, "drafted");
        let seen = drafter.0.lock().unwrap().clone().unwrap();
        assert!(seen.contains("DSCR falls to 1.1x"));
        assert_eq!(drafted.insights, seen);
    }

    #[tokio::test]
    async fn writer_drafts_without_peers() {
        let writer = WriterAgent::new(router_over(InMemoryAgentBus::new()), Arc::new(OutlineDrafter));
        let request = SectionRequest::new("Executive Summary")
            .unwrap()
            .with_context("borrower", "Acme Corp");

        let drafted = writer.draft_section(&request).await.unwrap();
        assert!(drafted.insights.is_empty());
        assert!(drafted.text.starts_with("## Executive Summary"));
        assert!(drafted.text.contains("- borrower: Acme Corp"));
        assert!(!drafted.text.contains("Peer insights"));
    }

    #[tokio::test]
    async fn drafter_failure_is_reported() {
        let events = Arc::new(EventBus::new(8));
        let mut rx = events.subscribe();
        let writer = WriterAgent::new(router_over(InMemoryAgentBus::new()), Arc::new(FailingDrafter))
            .with_event_bus(events);

        let request = SectionRequest::new("Appendix A").unwrap();
        let err = writer.draft_section(&request).await.unwrap_err();
        assert!(matches!(err, Error::Drafting { .. }));

        let event = rx.recv().await.unwrap();
        assert!(matches!(event.as_ref(), DomainEvent::ErrorOccurred { .. }));
    }

    #[tokio::test]
    async fn success_publishes_section_drafted() {
        let events = Arc::new(EventBus::new(8));
        let mut rx = events.subscribe();
        let bus = InMemoryAgentBus::new();
        bus.register(Arc::new(ScriptedAgent::new("compliance", "Within LTV policy.")));
        let writer = WriterAgent::new(router_over(bus), Arc::new(OutlineDrafter)).with_event_bus(events);

        let request = SectionRequest::new("Policy Compliance").unwrap();
        let drafted = writer.draft_section(&request).await.unwrap();
        assert!(drafted.text.contains("### Peer insights\nCompliance insights:\nWithin LTV policy."));

        let event = rx.recv().await.unwrap();
        match event.as_ref() {
            DomainEvent::SectionDrafted { section, insight_sources, .. } => {
                assert_eq!(section, "Policy Compliance");
                assert_eq!(*insight_sources, 1);
            }
            other => panic!("expected SectionDrafted, got {other:?}"),
        }
    }
}
