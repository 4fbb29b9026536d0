//! Pipeline configuration snapshot.

use serde::{Deserialize, Serialize};

/// Default removal pattern: anything that is not a word character,
/// whitespace, or a CJK Unified Ideograph.
pub const DEFAULT_CLEAN_PATTERN: &str = r"[^\w\s\u{4e00}-\u{9fa5}]";

/// Default exclusive upper bound (in code points) for cleaning eligibility.
pub const DEFAULT_CLEAN_TEXT_LENGTH: usize = 100;

/// Immutable option snapshot for the sanitization pipeline.
///
/// Read once per run, never mutated by a stage. Deserializes from a
/// host-supplied options blob; unrecognized keys are ignored and missing
/// keys fall back to the documented defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Intercept error-keyword replies regardless of the sender's admin
    /// status. When false, interception still applies to non-admin senders.
    pub intercept_error: bool,
    /// Substrings that mark an outgoing reply as internal error text.
    pub error_keywords: Vec<String>,
    /// Exclusive upper bound, in code points, for normalization
    /// eligibility. Texts of exactly this length are left uncleaned.
    pub clean_text_length: usize,
    /// Strip emoji graphemes from the trailing text segment.
    pub clean_emoji: bool,
    /// Removal pattern for the punctuation step; empty disables it.
    pub clean_punctuation: String,
    /// Literal prefixes stripped from the cleaned text, once each, first
    /// match in list order.
    pub remove_lead: Vec<String>,
    /// Enable the reasoning-trace failsafe.
    pub enable_cot_failsafe: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            intercept_error: true,
            error_keywords: Vec::new(),
            clean_text_length: DEFAULT_CLEAN_TEXT_LENGTH,
            clean_emoji: true,
            clean_punctuation: DEFAULT_CLEAN_PATTERN.to_string(),
            remove_lead: Vec::new(),
            enable_cot_failsafe: true,
        }
    }
}

impl FilterConfig {
    /// Extract the recognized options from a raw host config value.
    pub fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = FilterConfig::default();
        assert!(config.intercept_error);
        assert!(config.error_keywords.is_empty());
        assert_eq!(config.clean_text_length, 100);
        assert!(config.clean_emoji);
        assert_eq!(config.clean_punctuation, DEFAULT_CLEAN_PATTERN);
        assert!(config.remove_lead.is_empty());
        assert!(config.enable_cot_failsafe);
    }

    #[test]
    fn empty_object_deserializes_to_defaults() {
        let config = FilterConfig::from_value(serde_json::json!({})).unwrap();
        assert_eq!(config.clean_text_length, 100);
        assert!(config.clean_emoji);
    }

    #[test]
    fn partial_snapshot_keeps_remaining_defaults() {
        let config = FilterConfig::from_value(serde_json::json!({
            "error_keywords": ["ERR500", "Traceback"],
            "clean_emoji": false,
        }))
        .unwrap();
        assert_eq!(config.error_keywords, vec!["ERR500", "Traceback"]);
        assert!(!config.clean_emoji);
        // Untouched options fall back to defaults.
        assert!(config.intercept_error);
        assert_eq!(config.clean_punctuation, DEFAULT_CLEAN_PATTERN);
    }

    #[test]
    fn unrecognized_keys_are_ignored() {
        let config = FilterConfig::from_value(serde_json::json!({
            "clean_text_length": 50,
            "some_future_option": true,
        }))
        .unwrap();
        assert_eq!(config.clean_text_length, 50);
    }
}
