//! Extractor configuration.
//!
//! Defaults match the layout of the Commission's initiative pages; a partial
//! JSON document can override any field.

use eci_core::HeadingSelector;
use serde::{Deserialize, Serialize};

use crate::error::ExtractError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    pub answer_heading: HeadingSelector,
    pub follow_up_heading: HeadingSelector,
    pub updates_heading: HeadingSelector,
    /// Hosts (optionally with a path prefix) whose links are official legal documents.
    pub legal_domains: Vec<String>,
    /// Non-legislative candidates shorter than this are ignored.
    pub min_policy_chars: usize,
    /// Colon-terminated fragments up to this length are treated as headers.
    pub header_max_chars: usize,
    /// Length of the text preview attached to classification failures.
    pub preview_chars: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            answer_heading: HeadingSelector::new(
                Some("answer-of-the-commission"),
                "Answer of the Commission",
            ),
            follow_up_heading: HeadingSelector::new(Some("follow-up"), "Follow-up"),
            updates_heading: HeadingSelector::new(Some("updates"), "Updates"),
            legal_domains: vec![
                "eur-lex.europa.eu".into(),
                "op.europa.eu".into(),
                "data.europa.eu/eli".into(),
            ],
            min_policy_chars: 20,
            header_max_chars: 100,
            preview_chars: 300,
        }
    }
}

impl ExtractorConfig {
    /// Load from JSON; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ExtractError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Whether `href` points at one of the configured legal-document domains.
    pub fn is_legal_document(&self, href: &str) -> bool {
        let lower = href.to_ascii_lowercase();
        let without_scheme = lower
            .split_once("://")
            .map(|(_, rest)| rest)
            .unwrap_or(&lower);
        let without_www = without_scheme.strip_prefix("www.").unwrap_or(without_scheme);
        self.legal_domains
            .iter()
            .any(|domain| without_www.starts_with(&domain.to_ascii_lowercase()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = ExtractorConfig::from_json(r#"{"min_policy_chars": 40}"#).unwrap();
        assert_eq!(config.min_policy_chars, 40);
        assert_eq!(config.header_max_chars, 100);
        assert_eq!(config.answer_heading.text, "Answer of the Commission");
    }

    #[test]
    fn invalid_json_is_a_config_error() {
        let err = ExtractorConfig::from_json(r#"{"min_policy_chars": "many"}"#).unwrap_err();
        assert!(matches!(err, ExtractError::Config(_)));
    }

    #[test]
    fn legal_document_hosts() {
        let config = ExtractorConfig::default();
        assert!(config.is_legal_document(
            "https://eur-lex.europa.eu/legal-content/EN/TXT/?uri=CELEX:32019R0904"
        ));
        assert!(config.is_legal_document("http://data.europa.eu/eli/reg/2019/904/oj"));
        assert!(config.is_legal_document("https://www.op.europa.eu/en/publication"));
        assert!(!config.is_legal_document("https://data.europa.eu/euodp/en/data"));
        assert!(!config.is_legal_document("https://ec.europa.eu/info/law"));
        assert!(!config.is_legal_document("https://evil.example/eur-lex.europa.eu"));
    }
}
