//! Agent query router — decides which peers to consult for a section and
//! folds their answers into the drafting context.
//!
//! ```text
//!  section name ──► SectionClassifier ──► topics ──► routing table
//!                                                      │
//!                          ┌───────────────────────────┴──────┐
//!                          ▼                                  ▼
//!                   analyst query                     compliance query
//!                          │          AgentBus (sequential)   │
//!                          ▼                                  ▼
//!                    PeerOutcome                        PeerOutcome
//!                          └──────────► insights ◄────────────┘
//! ```
//!
//! Consulting peers is best-effort enrichment: a missing, failing, panicking
//! or slow peer only removes its own contribution. Nothing here returns an
//! error to the writer.

pub mod classifier;
pub mod template;

use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use creditpack_config::RouterConfig;
use creditpack_core::bus::{is_not_registered_reply, AgentBus};
use creditpack_core::error::BusError;
use creditpack_core::event::{DomainEvent, EventBus};
use creditpack_core::peer::{PeerRole, Topic};
use creditpack_core::section::{SectionContext, SectionRequest};
use futures::FutureExt;
use tracing::{debug, info, warn};

use crate::communication::{CommunicationEntry, CommunicationLog, CommunicationOutcome};

pub use classifier::{KeywordClassifier, SectionClassifier};

/// A query addressed to one peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerQuery {
    pub role: PeerRole,
    pub agent: String,
    pub topic: Topic,
    pub query: String,
}

/// Why a peer contributed nothing, without having failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoInsightReason {
    NotRegistered,
    EmptyResponse,
}

/// What came back from one peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeerOutcome {
    /// Usable text, trimmed
    Insight(String),
    /// Nothing to add
    NoInsight(NoInsightReason),
    /// The query failed; the reason is logged, never surfaced
    Errored(BusError),
}

impl PeerOutcome {
    pub fn kind(&self) -> &'static str {
        match self {
            PeerOutcome::Insight(_) => "insight",
            PeerOutcome::NoInsight(_) => "no_insight",
            PeerOutcome::Errored(_) => "errored",
        }
    }

    pub fn insight(&self) -> Option<&str> {
        match self {
            PeerOutcome::Insight(text) => Some(text),
            _ => None,
        }
    }
}

/// One dispatched query and its outcome.
#[derive(Debug, Clone)]
pub struct PeerConsultation {
    pub query: PeerQuery,
    pub outcome: PeerOutcome,
    pub duration: Duration,
}

/// Everything the router learned for one section.
#[derive(Debug, Clone)]
pub struct Consultation {
    pub section_name: String,
    pub consultations: Vec<PeerConsultation>,
    separator: String,
}

impl Consultation {
    fn empty(section_name: &str, separator: &str) -> Self {
        Self {
            section_name: section_name.to_string(),
            consultations: Vec::new(),
            separator: separator.to_string(),
        }
    }

    /// Accepted peer answers, analyst first, each under a role heading.
    /// Empty when no peer had anything to add.
    pub fn insights(&self) -> String {
        let mut accepted: Vec<(PeerRole, &str)> = self
            .consultations
            .iter()
            .filter_map(|c| c.outcome.insight().map(|text| (c.query.role, text)))
            .collect();
        accepted.sort_by_key(|(role, _)| *role);

        accepted
            .iter()
            .map(|(role, text)| format!("{} insights:\n{}", role.label(), text))
            .collect::<Vec<_>>()
            .join(&self.separator)
    }

    /// Number of peers that contributed text.
    pub fn insight_count(&self) -> usize {
        self.consultations
            .iter()
            .filter(|c| c.outcome.insight().is_some())
            .count()
    }

    /// Number of queries that errored.
    pub fn error_count(&self) -> usize {
        self.consultations
            .iter()
            .filter(|c| matches!(c.outcome, PeerOutcome::Errored(_)))
            .count()
    }
}

/// Routes section drafting requests to peer agents.
pub struct AgentQueryRouter {
    bus: Arc<dyn AgentBus>,
    classifier: Box<dyn SectionClassifier>,
    templates: HashMap<Topic, String>,
    agents: HashMap<PeerRole, String>,
    timeout: Option<Duration>,
    separator: String,
    sender: String,
    log: Option<Arc<CommunicationLog>>,
    events: Option<Arc<EventBus>>,
}

impl AgentQueryRouter {
    /// Create a router over `bus` with keyword classification from `config`.
    pub fn new(bus: Arc<dyn AgentBus>, config: &RouterConfig) -> Self {
        let mut templates = HashMap::new();
        for rule in &config.topics {
            // First rule for a topic wins.
            templates
                .entry(rule.topic)
                .or_insert_with(|| rule.template.clone());
        }

        let agents = PeerRole::ALL
            .into_iter()
            .map(|role| (role, config.agent_for(role).to_string()))
            .collect();

        Self {
            bus,
            classifier: Box::new(KeywordClassifier::from_rules(&config.topics)),
            templates,
            agents,
            timeout: (config.query_timeout_ms > 0).then(|| Duration::from_millis(config.query_timeout_ms)),
            separator: config.insight_separator.clone(),
            sender: "writer".into(),
            log: None,
            events: None,
        }
    }

    /// Swap the section classifier.
    pub fn with_classifier(mut self, classifier: Box<dyn SectionClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    /// Append every attempted query to a shared communication log.
    pub fn with_communication_log(mut self, log: Arc<CommunicationLog>) -> Self {
        self.log = Some(log);
        self
    }

    /// Publish a `PeerQueried` event per attempted query.
    pub fn with_event_bus(mut self, events: Arc<EventBus>) -> Self {
        self.events = Some(events);
        self
    }

    /// Override the per-query timeout (`None` waits indefinitely).
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Work out which peers to ask and what, without sending anything.
    ///
    /// At most one query per peer, analyst first. A peer's query comes from
    /// the first of its topics that has a template.
    pub fn plan(&self, section_name: &str, context: &SectionContext) -> Vec<PeerQuery> {
        if section_name.trim().is_empty() {
            return Vec::new();
        }

        let topics = self.classifier.classify(section_name);
        let mut queries = Vec::new();

        for role in PeerRole::ALL {
            let chosen = topics
                .iter()
                .filter(|t| t.peer() == role)
                .find_map(|t| self.templates.get(t).map(|tpl| (*t, tpl)));

            let Some((topic, tpl)) = chosen else {
                continue;
            };
            let Some(agent) = self.agents.get(&role) else {
                continue;
            };

            queries.push(PeerQuery {
                role,
                agent: agent.clone(),
                topic,
                query: template::render(tpl, section_name, context),
            });
        }

        queries
    }

    /// Consult the peers for a drafting request.
    pub async fn consult(&self, request: &SectionRequest) -> Consultation {
        self.consult_section(&request.section_name, &request.context).await
    }

    /// Consult the peers for a section, one query at a time.
    pub async fn consult_section(&self, section_name: &str, context: &SectionContext) -> Consultation {
        let mut consultation = Consultation::empty(section_name, &self.separator);

        let queries = self.plan(section_name, context);
        if queries.is_empty() {
            debug!(section = %section_name, "No peer consultation needed");
            return consultation;
        }

        for query in queries {
            let started = Instant::now();
            let outcome = self.dispatch(&query).await;
            let duration = started.elapsed();

            self.observe(section_name, &query, &outcome, duration);
            consultation.consultations.push(PeerConsultation {
                query,
                outcome,
                duration,
            });
        }

        info!(
            section = %section_name,
            queried = consultation.consultations.len(),
            insights = consultation.insight_count(),
            errors = consultation.error_count(),
            "Peer consultation complete"
        );

        consultation
    }

    /// Insights text for a section; empty when no peer contributed.
    pub async fn query_agents_for_section(&self, section_name: &str, context: &SectionContext) -> String {
        self.consult_section(section_name, context).await.insights()
    }

    async fn dispatch(&self, query: &PeerQuery) -> PeerOutcome {
        let agent = query.agent.as_str();
        let send = AssertUnwindSafe(self.bus.send(agent, &query.query)).catch_unwind();

        let caught = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, send).await {
                Ok(caught) => caught,
                Err(_) => {
                    return PeerOutcome::Errored(BusError::Timeout {
                        agent: agent.to_string(),
                        timeout_ms: limit.as_millis() as u64,
                    });
                }
            },
            None => send.await,
        };

        let reply = caught.unwrap_or_else(|_| {
            Err(BusError::Panicked {
                agent: agent.to_string(),
            })
        });

        match reply {
            Ok(text) if is_not_registered_reply(&text) => {
                PeerOutcome::NoInsight(NoInsightReason::NotRegistered)
            }
            Ok(text) if text.trim().is_empty() => PeerOutcome::NoInsight(NoInsightReason::EmptyResponse),
            Ok(text) => PeerOutcome::Insight(text.trim().to_string()),
            Err(BusError::NotRegistered(_)) => PeerOutcome::NoInsight(NoInsightReason::NotRegistered),
            Err(e) => PeerOutcome::Errored(e),
        }
    }

    fn observe(&self, section_name: &str, query: &PeerQuery, outcome: &PeerOutcome, duration: Duration) {
        let duration_ms = duration.as_millis() as u64;

        let (log_outcome, response, details) = match outcome {
            PeerOutcome::Insight(text) => {
                debug!(agent = %query.agent, topic = %query.topic, duration_ms, "Peer insight accepted");
                (CommunicationOutcome::Answered, Some(text.clone()), None)
            }
            PeerOutcome::NoInsight(reason) => {
                debug!(agent = %query.agent, ?reason, "Peer had no insight");
                (CommunicationOutcome::Unavailable, None, Some(format!("{reason:?}")))
            }
            PeerOutcome::Errored(e) => {
                warn!(agent = %query.agent, section = %section_name, error = %e, "Peer query failed, drafting without it");
                (CommunicationOutcome::Failed, None, Some(e.to_string()))
            }
        };

        if let Some(log) = &self.log {
            log.record(CommunicationEntry {
                timestamp: Utc::now(),
                from: self.sender.clone(),
                to: query.agent.clone(),
                query: query.query.clone(),
                response,
                outcome: log_outcome,
                duration_ms,
                details,
            });
        }

        if let Some(events) = &self.events {
            events.publish(DomainEvent::PeerQueried {
                section: section_name.to_string(),
                agent: query.agent.clone(),
                outcome: outcome.kind().to_string(),
                duration_ms,
                timestamp: Utc::now(),
            });
        }
    }
}
