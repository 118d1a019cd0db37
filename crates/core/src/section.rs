//! Section requests — one drafting turn for one named section.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Opaque key/value data already gathered for drafting a section.
pub type SectionContext = serde_json::Map<String, serde_json::Value>;

/// A request to draft one section of the credit pack.
///
/// Created per user drafting turn and dropped once the section is written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionRequest {
    /// Unique ID for this drafting turn
    pub id: Uuid,

    /// Free-text section title (e.g. "Executive Summary")
    pub section_name: String,

    /// Context bundle handed to the drafter
    #[serde(default)]
    pub context: SectionContext,

    /// When the turn started
    pub created_at: DateTime<Utc>,
}

impl SectionRequest {
    /// Create a request for a section. The name must not be blank.
    pub fn new(section_name: impl Into<String>) -> Result<Self> {
        let section_name = section_name.into();
        if section_name.trim().is_empty() {
            return Err(Error::InvalidSection("section name is empty".into()));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            section_name,
            context: SectionContext::new(),
            created_at: Utc::now(),
        })
    }

    /// Add a context entry.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Replace the whole context bundle.
    pub fn with_context_map(mut self, context: SectionContext) -> Self {
        self.context = context;
        self
    }
}
