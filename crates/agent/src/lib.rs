//! Agents for drafting credit packs.
//!
//! The writer drafts one section per turn. Before drafting it asks its
//! peers for targeted input:
//!
//! 1. **Classify** the section title into topics
//! 2. **Plan** at most one query per peer (analyst, then compliance)
//! 3. **Dispatch** each query over the shared agent bus, one at a time
//! 4. **Fold** accepted answers into an insights block
//! 5. **Draft** the section from context + insights
//!
//! Steps 3 and 4 degrade silently: a peer that is absent or broken just
//! contributes nothing.

pub mod communication;
pub mod router;
pub mod writer;

pub use communication::{
    CommunicationEntry, CommunicationLog, CommunicationOutcome, CommunicationSink, TracingSink,
};
pub use router::{
    AgentQueryRouter, Consultation, KeywordClassifier, NoInsightReason, PeerConsultation,
    PeerOutcome, PeerQuery, SectionClassifier,
};
pub use writer::{DraftedSection, OutlineDrafter, SectionDrafter, WriterAgent};

#[cfg(test)]
pub(crate) mod test_helpers;
