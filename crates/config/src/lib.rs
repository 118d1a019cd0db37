//! Configuration loading, validation, and management for the Credit Pack
//! drafting agents.
//!
//! Loads configuration from `~/.creditpack/config.toml` with environment
//! variable overrides. Validates all settings at startup.
//!
//! The keyword sets and canned query templates the writer uses to consult
//! its peers live here as data, so they can be tuned per deployment without
//! touching the routing code.

use creditpack_core::peer::{PeerRole, Topic};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.creditpack/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Peer routing: agent names, keywords, query templates
    #[serde(default)]
    pub router: RouterConfig,

    /// Retrieval tool limits
    #[serde(default)]
    pub tools: ToolsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Bus name of the analyst agent
    #[serde(default = "default_analyst_agent")]
    pub analyst_agent: String,

    /// Bus name of the compliance agent
    #[serde(default = "default_compliance_agent")]
    pub compliance_agent: String,

    /// Per-query timeout in milliseconds (0 = wait indefinitely)
    #[serde(default = "default_query_timeout_ms")]
    pub query_timeout_ms: u64,

    /// Placed between insight blocks from different peers
    #[serde(default = "default_insight_separator")]
    pub insight_separator: String,

    /// Topic rules in priority order. The first matching rule of a peer
    /// supplies that peer's query template.
    #[serde(default = "default_topic_rules")]
    pub topics: Vec<TopicRule>,
}

/// Keywords that tag a section with a topic, and the query to send the
/// topic's peer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicRule {
    pub topic: Topic,

    /// Case-insensitive substrings of the section name
    pub keywords: Vec<String>,

    /// Query template; `{section}` and `{<context key>}` are substituted
    pub template: String,
}

impl TopicRule {
    fn new(topic: Topic, keywords: &[&str], template: &str) -> Self {
        Self {
            topic,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            template: template.to_string(),
        }
    }
}

fn default_analyst_agent() -> String {
    "analyst".into()
}
fn default_compliance_agent() -> String {
    "compliance".into()
}
fn default_query_timeout_ms() -> u64 {
    30_000
}
fn default_insight_separator() -> String {
    "\n\n".into()
}

fn default_topic_rules() -> Vec<TopicRule> {
    vec![
        TopicRule::new(
            Topic::Risk,
            &["risk"],
            "For the '{section}' section, what are the 2-3 most critical risks in this credit and how are they mitigated?",
        ),
        TopicRule::new(
            Topic::DealStructure,
            &["deal", "structure"],
            "For the '{section}' section, what are the key features of the deal structure the credit committee should understand?",
        ),
        TopicRule::new(
            Topic::ExecutiveSummary,
            &["executive", "summary", "overview"],
            "For the '{section}' section, what are the 3-4 most important points the credit committee should see first?",
        ),
        TopicRule::new(
            Topic::Background,
            &["background", "key features"],
            "For the '{section}' section, what background on the borrower and the transaction is most relevant?",
        ),
        TopicRule::new(
            Topic::Analysis,
            &["assessment", "analysis"],
            "For the '{section}' section, what are the key analytical findings and the figures that support them?",
        ),
        TopicRule::new(
            Topic::Regulatory,
            &["compliance", "regulatory", "legal", "governance"],
            "For the '{section}' section, which regulatory and compliance requirements apply and how are they met?",
        ),
        TopicRule::new(
            Topic::Guidelines,
            &["guidelines", "policy", "requirements", "framework"],
            "For the '{section}' section, which internal guidelines and policy requirements must be addressed?",
        ),
    ]
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            analyst_agent: default_analyst_agent(),
            compliance_agent: default_compliance_agent(),
            query_timeout_ms: default_query_timeout_ms(),
            insight_separator: default_insight_separator(),
            topics: default_topic_rules(),
        }
    }
}

impl RouterConfig {
    /// Bus name configured for a peer role.
    pub fn agent_for(&self, role: PeerRole) -> &str {
        match role {
            PeerRole::Analyst => &self.analyst_agent,
            PeerRole::Compliance => &self.compliance_agent,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.analyst_agent.trim().is_empty() || self.compliance_agent.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "router agent names must not be empty".into(),
            ));
        }
        if self.analyst_agent == self.compliance_agent {
            return Err(ConfigError::ValidationError(
                "analyst_agent and compliance_agent must differ".into(),
            ));
        }

        let mut by_role: [HashSet<String>; 2] = [HashSet::new(), HashSet::new()];
        for rule in &self.topics {
            if rule.template.trim().is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "topic '{}' has an empty template",
                    rule.topic
                )));
            }
            if rule.keywords.iter().all(|k| k.trim().is_empty()) {
                return Err(ConfigError::ValidationError(format!(
                    "topic '{}' has no keywords",
                    rule.topic
                )));
            }
            let slot = match rule.topic.peer() {
                PeerRole::Analyst => 0,
                PeerRole::Compliance => 1,
            };
            by_role[slot].extend(
                rule.keywords
                    .iter()
                    .map(|k| k.trim().to_lowercase())
                    .filter(|k| !k.is_empty()),
            );
        }

        let mut shared: Vec<&String> = by_role[0].intersection(&by_role[1]).collect();
        if !shared.is_empty() {
            shared.sort();
            return Err(ConfigError::ValidationError(format!(
                "keywords route to both analyst and compliance: {}",
                shared.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(", ")
            )));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// `num_results` used when a call omits it
    #[serde(default = "default_num_results")]
    pub default_num_results: usize,

    /// Upper bound applied to any requested `num_results`
    #[serde(default = "default_max_num_results")]
    pub max_num_results: usize,
}

fn default_num_results() -> usize {
    3
}
fn default_max_num_results() -> usize {
    10
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            default_num_results: default_num_results(),
            max_num_results: default_max_num_results(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.creditpack/config.toml).
    ///
    /// Environment variables override the file:
    /// - `CREDITPACK_ANALYST_AGENT`
    /// - `CREDITPACK_COMPLIANCE_AGENT`
    /// - `CREDITPACK_QUERY_TIMEOUT_MS`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from an environment lookup, then re-validate.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(name) = lookup("CREDITPACK_ANALYST_AGENT") {
            self.router.analyst_agent = name;
        }
        if let Some(name) = lookup("CREDITPACK_COMPLIANCE_AGENT") {
            self.router.compliance_agent = name;
        }
        if let Some(raw) = lookup("CREDITPACK_QUERY_TIMEOUT_MS") {
            self.router.query_timeout_ms = raw.trim().parse().map_err(|_| {
                ConfigError::ValidationError(format!(
                    "CREDITPACK_QUERY_TIMEOUT_MS must be an integer, got '{raw}'"
                ))
            })?;
        }
        self.validate()
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".creditpack")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.router.validate()?;

        if self.tools.default_num_results == 0 {
            return Err(ConfigError::ValidationError(
                "tools.default_num_results must be at least 1".into(),
            ));
        }
        if self.tools.default_num_results > self.tools.max_num_results {
            return Err(ConfigError::ValidationError(
                "tools.default_num_results must not exceed tools.max_num_results".into(),
            ));
        }

        Ok(())
    }

    /// Generate a default config TOML string.
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
