//! Peer roles and topic tags — the routing table between section topics
//! and the agents that can add insight to them.

use serde::{Deserialize, Serialize};

/// A peer agent the writer can consult.
///
/// Ordering matters: insights are assembled in `PeerRole` order, so the
/// analyst's contribution always precedes the compliance reviewer's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeerRole {
    /// Financial and risk analysis
    Analyst,
    /// Regulatory and policy review
    Compliance,
}

impl PeerRole {
    pub const ALL: [PeerRole; 2] = [PeerRole::Analyst, PeerRole::Compliance];

    /// Human-readable label used in insight headings.
    pub fn label(&self) -> &'static str {
        match self {
            PeerRole::Analyst => "Analyst",
            PeerRole::Compliance => "Compliance",
        }
    }
}

impl std::fmt::Display for PeerRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PeerRole::Analyst => f.write_str("analyst"),
            PeerRole::Compliance => f.write_str("compliance"),
        }
    }
}

/// Closed set of section topics a classifier can assign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    Risk,
    DealStructure,
    ExecutiveSummary,
    Background,
    Analysis,
    Regulatory,
    Guidelines,
}

impl Topic {
    pub const ALL: [Topic; 7] = [
        Topic::Risk,
        Topic::DealStructure,
        Topic::ExecutiveSummary,
        Topic::Background,
        Topic::Analysis,
        Topic::Regulatory,
        Topic::Guidelines,
    ];

    /// The peer responsible for this topic.
    pub fn peer(&self) -> PeerRole {
        match self {
            Topic::Risk
            | Topic::DealStructure
            | Topic::ExecutiveSummary
            | Topic::Background
            | Topic::Analysis => PeerRole::Analyst,
            Topic::Regulatory | Topic::Guidelines => PeerRole::Compliance,
        }
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Topic::Risk => "risk",
            Topic::DealStructure => "deal_structure",
            Topic::ExecutiveSummary => "executive_summary",
            Topic::Background => "background",
            Topic::Analysis => "analysis",
            Topic::Regulatory => "regulatory",
            Topic::Guidelines => "guidelines",
        };
        f.write_str(s)
    }
}
