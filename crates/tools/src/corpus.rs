//! Built-in passage sets and the keyword ranking shared by the search tools.
//!
//! In production these searches run against the bank's indexed procedure
//! and guideline documents. The built-in passages stand in for that index
//! so the tools behave realistically in tests and offline runs.

use creditpack_config::ToolsConfig;
use creditpack_core::error::ToolError;
use serde::Serialize;

/// One retrievable passage.
#[derive(Debug, Clone, Copy)]
pub struct Passage {
    pub document_id: &'static str,
    pub title: &'static str,
    pub content: &'static str,
    pub source: &'static str,
}

/// A ranked search hit, as returned to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub document_id: String,
    pub title: String,
    pub content: String,
    pub source: String,
    pub score: usize,
}

/// Result-count limits a search tool applies.
#[derive(Debug, Clone, Copy)]
pub struct SearchLimits {
    pub default_num_results: usize,
    pub max_num_results: usize,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self::from(&ToolsConfig::default())
    }
}

impl From<&ToolsConfig> for SearchLimits {
    fn from(config: &ToolsConfig) -> Self {
        Self {
            default_num_results: config.default_num_results,
            max_num_results: config.max_num_results,
        }
    }
}

/// Arguments common to every search tool: `query` and `num_results`.
pub(crate) struct SearchArgs {
    pub query: String,
    pub num_results: usize,
}

impl SearchArgs {
    pub(crate) fn parse(arguments: &serde_json::Value, limits: SearchLimits) -> Result<Self, ToolError> {
        let query = arguments["query"]
            .as_str()
            .filter(|q| !q.trim().is_empty())
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'query' argument".into()))?
            .to_string();

        let num_results = match &arguments["num_results"] {
            serde_json::Value::Null => limits.default_num_results,
            value => value
                .as_u64()
                .filter(|n| *n > 0)
                .ok_or_else(|| {
                    ToolError::InvalidArguments("'num_results' must be a positive integer".into())
                })? as usize,
        };

        Ok(Self {
            query,
            num_results: num_results.min(limits.max_num_results),
        })
    }
}

fn terms(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.len() >= 3)
        .map(|t| t.to_lowercase())
        .collect()
}

/// Rank passages by how many query terms they contain.
///
/// Passages without any matching term are dropped; ties keep corpus order.
pub fn rank(passages: &[Passage], query: &str, num_results: usize) -> Vec<SearchHit> {
    let query_terms = terms(query);

    let mut scored: Vec<(usize, &Passage)> = passages
        .iter()
        .map(|p| {
            let haystack = format!("{} {}", p.title, p.content).to_lowercase();
            let score = query_terms.iter().filter(|t| haystack.contains(t.as_str())).count();
            (score, p)
        })
        .filter(|(score, _)| *score > 0)
        .collect();

    // Stable sort keeps corpus order for equal scores.
    scored.sort_by(|a, b| b.0.cmp(&a.0));

    scored
        .into_iter()
        .take(num_results)
        .map(|(score, p)| SearchHit {
            document_id: p.document_id.into(),
            title: p.title.into(),
            content: p.content.into(),
            source: p.source.into(),
            score,
        })
        .collect()
}

pub const PROCEDURES: &[Passage] = &[
    Passage {
        document_id: "proc_001",
        title: "Credit approval workflow",
        content: "Every new facility requires a credit pack reviewed by the relationship manager, an independent credit analyst and, above delegated authority, the credit committee. Approval is recorded before any commitment letter is issued.",
        source: "credit_procedures.md",
    },
    Passage {
        document_id: "proc_002",
        title: "Risk rating assignment",
        content: "The analyst assigns an obligor risk rating using the internal scorecard. Financial spreading of the last three fiscal years is mandatory; overrides of the scorecard rating must be justified in the risk assessment section.",
        source: "credit_procedures.md",
    },
    Passage {
        document_id: "proc_003",
        title: "Collateral valuation",
        content: "Real estate collateral is valued by an approved independent valuer no older than twelve months. Receivables and inventory are subject to borrowing base haircuts recorded in the deal structure section.",
        source: "collateral_procedures.md",
    },
    Passage {
        document_id: "proc_004",
        title: "Covenant monitoring",
        content: "Financial covenants such as leverage and interest cover are tested quarterly from compliance certificates. Breaches are escalated to the credit risk team within five business days.",
        source: "monitoring_procedures.md",
    },
    Passage {
        document_id: "proc_005",
        title: "Annual review",
        content: "Each facility is reviewed at least annually. The review updates the executive summary, financial analysis and risk rating, and confirms that conditions precedent remain satisfied.",
        source: "monitoring_procedures.md",
    },
];

pub const GUIDELINES: &[Passage] = &[
    Passage {
        document_id: "guide_001",
        title: "Single obligor concentration limit",
        content: "Aggregate exposure to a single obligor group must not exceed 10% of the bank's eligible capital. Exceptions require board risk committee approval and are reported to the regulator.",
        source: "lending_policy.md",
    },
    Passage {
        document_id: "guide_002",
        title: "Loan-to-value thresholds",
        content: "Commercial real estate lending is capped at 65% loan-to-value for investment property and 75% for owner-occupied property. Higher leverage is a policy exception that must be disclosed in the credit pack.",
        source: "lending_policy.md",
    },
    Passage {
        document_id: "guide_003",
        title: "KYC and anti-money-laundering requirements",
        content: "Know-your-customer checks, beneficial ownership verification and sanctions screening must be complete and current before approval. The compliance section records the date and outcome of each check.",
        source: "compliance_framework.md",
    },
    Passage {
        document_id: "guide_004",
        title: "Environmental and social risk guidelines",
        content: "Transactions in high-impact sectors require an environmental and social due diligence questionnaire. Identified risks and mitigants are summarised for the credit committee.",
        source: "esg_guidelines.md",
    },
    Passage {
        document_id: "guide_005",
        title: "Regulatory capital and governance",
        content: "Credit decisions follow the delegated authority matrix approved by the board. Risk-weighted assets for the facility are calculated under the standardised approach and stated in the regulatory section.",
        source: "governance_framework.md",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_orders_by_term_overlap() {
        let hits = rank(PROCEDURES, "risk rating scorecard", 3);
        assert!(!hits.is_empty());
        assert_eq!(hits[0].document_id, "proc_002");
        assert!(hits.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn rank_drops_unrelated_passages() {
        assert!(rank(GUIDELINES, "weather forecast", 5).is_empty());
    }

    #[test]
    fn rank_respects_limit() {
        assert_eq!(rank(PROCEDURES, "credit facility review", 2).len(), 2);
    }

    #[test]
    fn args_default_and_clamp() {
        let limits = SearchLimits {
            default_num_results: 3,
            max_num_results: 4,
        };
        let args = SearchArgs::parse(&serde_json::json!({"query": "x"}), limits).unwrap();
        assert_eq!(args.num_results, 3);

        let args = SearchArgs::parse(&serde_json::json!({"query": "x", "num_results": 50}), limits).unwrap();
        assert_eq!(args.num_results, 4);
    }

    #[test]
    fn args_reject_non_positive_num_results() {
        let limits = SearchLimits::default();
        assert!(SearchArgs::parse(&serde_json::json!({"query": "x", "num_results": 0}), limits).is_err());
        assert!(SearchArgs::parse(&serde_json::json!({"query": "x", "num_results": "3"}), limits).is_err());
        assert!(SearchArgs::parse(&serde_json::json!({"query": "  "}), limits).is_err());
    }
}
