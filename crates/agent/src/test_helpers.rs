//! Shared test doubles for peer agents and buses.

use async_trait::async_trait;
use creditpack_core::bus::{AgentBus, PeerAgent, AGENT_NOT_REGISTERED};
use creditpack_core::error::BusError;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// A bus with canned replies per agent that records every send.
///
/// Unknown agents get the sentinel reply, like the string-based buses.
pub struct RecordingBus {
    replies: HashMap<String, String>,
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingBus {
    pub fn with_replies(replies: &[(&str, &str)]) -> Self {
        Self {
            replies: replies
                .iter()
                .map(|(agent, reply)| (agent.to_string(), reply.to_string()))
                .collect(),
            sent: Mutex::new(Vec::new()),
        }
    }

    /// `(agent, query)` pairs in send order.
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl AgentBus for RecordingBus {
    async fn send(&self, agent: &str, query: &str) -> Result<String, BusError> {
        self.sent
            .lock()
            .unwrap()
            .push((agent.to_string(), query.to_string()));
        Ok(self
            .replies
            .get(agent)
            .cloned()
            .unwrap_or_else(|| AGENT_NOT_REGISTERED.to_string()))
    }
}

/// Always answers with the same text.
pub struct ScriptedAgent {
    name: String,
    reply: String,
}

impl ScriptedAgent {
    pub fn new(name: &str, reply: &str) -> Self {
        Self {
            name: name.into(),
            reply: reply.into(),
        }
    }
}

#[async_trait]
impl PeerAgent for ScriptedAgent {
    fn name(&self) -> &str {
        &self.name
    }

    async fn handle_query(&self, _query: &str) -> Result<String, BusError> {
        Ok(self.reply.clone())
    }
}

/// Always fails.
pub struct FailingAgent {
    name: String,
}

impl FailingAgent {
    pub fn new(name: &str) -> Self {
        Self { name: name.into() }
    }
}

#[async_trait]
impl PeerAgent for FailingAgent {
    fn name(&self) -> &str {
        &self.name
    }

    async fn handle_query(&self, _query: &str) -> Result<String, BusError> {
        Err(BusError::AgentFailed {
            agent: self.name.clone(),
            reason: "model quota exhausted".into(),
        })
    }
}

/// Panics on every query.
pub struct PanickingAgent {
    name: String,
}

impl PanickingAgent {
    pub fn new(name: &str) -> Self {
        Self { name: name.into() }
    }
}

#[async_trait]
impl PeerAgent for PanickingAgent {
    fn name(&self) -> &str {
        &self.name
    }

    async fn handle_query(&self, _query: &str) -> Result<String, BusError> {
        panic!("{} blew up", self.name);
    }
}

/// Answers only after `delay`.
pub struct SlowAgent {
    name: String,
    delay: Duration,
}

impl SlowAgent {
    pub fn new(name: &str, delay: Duration) -> Self {
        Self {
            name: name.into(),
            delay,
        }
    }
}

#[async_trait]
impl PeerAgent for SlowAgent {
    fn name(&self) -> &str {
        &self.name
    }

    async fn handle_query(&self, _query: &str) -> Result<String, BusError> {
        tokio::time::sleep(self.delay).await;
        Ok("too late".into())
    }
}
