//! Agent bus — the shared registry through which agents address each other
//! by name.
//!
//! The writer never owns the bus; it only sends queries through it. Whoever
//! builds the session registers the peer agents and hands the writer an
//! `Arc<dyn AgentBus>`.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::BusError;

/// Reply text some buses use instead of an error when the addressed agent
/// is missing. Treated exactly like [`BusError::NotRegistered`].
pub const AGENT_NOT_REGISTERED: &str = "Agent not registered";

/// Whether a raw reply is the "not registered" sentinel.
pub fn is_not_registered_reply(reply: &str) -> bool {
    reply.trim() == AGENT_NOT_REGISTERED
}

/// A named agent that can answer free-text queries from its peers.
#[async_trait]
pub trait PeerAgent: Send + Sync {
    /// Registry name (e.g., "analyst", "compliance").
    fn name(&self) -> &str;

    /// Answer a single query.
    async fn handle_query(&self, query: &str) -> Result<String, BusError>;
}

/// The messaging facility between agents.
#[async_trait]
pub trait AgentBus: Send + Sync {
    /// Send `query` to `agent` and wait for its single reply.
    async fn send(&self, agent: &str, query: &str) -> Result<String, BusError>;
}

/// In-process bus backed by a name → agent map.
#[derive(Default)]
pub struct InMemoryAgentBus {
    agents: RwLock<HashMap<String, Arc<dyn PeerAgent>>>,
}

impl InMemoryAgentBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an agent. Replaces any existing agent with the same name.
    pub fn register(&self, agent: Arc<dyn PeerAgent>) {
        let name = agent.name().to_string();
        tracing::debug!(agent = %name, "Registering agent on bus");
        self.agents
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(name, agent);
    }

    /// Remove an agent. Returns whether it was registered.
    pub fn unregister(&self, name: &str) -> bool {
        self.agents
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(name)
            .is_some()
    }

    /// Registered agent names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .agents
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    /// Whether an agent is currently registered under `name`.
    pub fn is_registered(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    fn lookup(&self, name: &str) -> Option<Arc<dyn PeerAgent>> {
        self.agents
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(name)
            .cloned()
    }
}

impl std::fmt::Debug for InMemoryAgentBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryAgentBus")
            .field("agents", &self.names())
            .finish()
    }
}

#[async_trait]
impl AgentBus for InMemoryAgentBus {
    async fn send(&self, agent: &str, query: &str) -> Result<String, BusError> {
        // Clone the handle out so the lock is not held across the await.
        let target = self
            .lookup(agent)
            .ok_or_else(|| BusError::NotRegistered(agent.to_string()))?;
        target.handle_query(query).await
    }
}
