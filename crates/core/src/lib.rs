//! # Credit Pack Core
//!
//! Domain types, traits, and error definitions for the Credit Pack drafting
//! agents. This crate has no framework dependencies; it defines the model
//! the other crates implement against.
//!
//! - [`section`]: one drafting turn for one named section
//! - [`peer`]: peer roles and the topic → peer routing table
//! - [`bus`]: the agent registry agents are addressed through
//! - [`tool`]: function-calling tools and their registry
//! - [`event`]: domain events for the UI

pub mod error;
pub mod section;
pub mod peer;
pub mod bus;
pub mod tool;
pub mod event;

// Re-export key types at crate root for ergonomics
pub use error::{BusError, Error, Result, ToolError};
pub use section::{SectionContext, SectionRequest};
pub use peer::{PeerRole, Topic};
pub use bus::{AgentBus, InMemoryAgentBus, PeerAgent, AGENT_NOT_REGISTERED};
pub use tool::{ContractViolation, Tool, ToolCall, ToolDefinition, ToolRegistry, ToolResult};
pub use event::{DomainEvent, EventBus};
