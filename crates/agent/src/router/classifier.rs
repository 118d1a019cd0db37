//! Section classification — section title → topic tags.
//!
//! Kept apart from dispatch so the keyword matcher can be replaced (by an
//! embedding or LLM classifier, say) without touching the router.

use creditpack_config::TopicRule;
use creditpack_core::peer::Topic;

/// Assigns topic tags to a section title.
pub trait SectionClassifier: Send + Sync {
    /// Matching topics, most specific first. No duplicates.
    fn classify(&self, section_name: &str) -> Vec<Topic>;
}

/// Case-insensitive substring matching against per-topic keyword lists.
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    rules: Vec<(Topic, Vec<String>)>,
}

impl KeywordClassifier {
    /// Build from topic rules; rule order is match priority.
    pub fn from_rules(rules: &[TopicRule]) -> Self {
        Self {
            rules: rules
                .iter()
                .map(|r| {
                    let keywords = r
                        .keywords
                        .iter()
                        .map(|k| k.trim().to_lowercase())
                        .filter(|k| !k.is_empty())
                        .collect();
                    (r.topic, keywords)
                })
                .collect(),
        }
    }
}

impl SectionClassifier for KeywordClassifier {
    fn classify(&self, section_name: &str) -> Vec<Topic> {
        let name = section_name.to_lowercase();
        let mut topics = Vec::new();
        for (topic, keywords) in &self.rules {
            if topics.contains(topic) {
                continue;
            }
            if keywords.iter().any(|k| name.contains(k.as_str())) {
                topics.push(*topic);
            }
        }
        topics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use creditpack_config::RouterConfig;

    fn classifier() -> KeywordClassifier {
        KeywordClassifier::from_rules(&RouterConfig::default().topics)
    }

    #[test]
    fn risk_is_case_insensitive() {
        let c = classifier();
        assert_eq!(c.classify("RISK factors"), vec![Topic::Risk]);
        assert_eq!(c.classify("Key Risks"), vec![Topic::Risk]);
    }

    #[test]
    fn mixed_section_matches_both_peers() {
        let topics = classifier().classify("Regulatory Risk Assessment");
        assert_eq!(topics, vec![Topic::Risk, Topic::Analysis, Topic::Regulatory]);
    }

    #[test]
    fn multi_word_keyword_matches() {
        let topics = classifier().classify("Key Features of the Facility");
        assert_eq!(topics, vec![Topic::Background]);
    }

    #[test]
    fn unrelated_section_has_no_topics() {
        assert!(classifier().classify("Appendix A").is_empty());
    }

    #[test]
    fn duplicate_rules_do_not_duplicate_topics() {
        let mut rules = RouterConfig::default().topics;
        rules.push(rules[0].clone());
        let c = KeywordClassifier::from_rules(&rules);
        assert_eq!(c.classify("Risk"), vec![Topic::Risk]);
    }
}
