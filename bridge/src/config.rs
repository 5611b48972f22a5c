//! # Bridge Configuration
//!
//! Account identity, service limits, and the outside world the in-memory
//! service pretends to see (subscribed rule groups, reachable buckets).
//! Every field has a default, so a config file only names what it changes.

use serde::{Deserialize, Serialize};
use std::path::Path;
use waf_model::SubscribedRuleGroupSummary;

// ================================================================================================
// SERVICE LIMITS
// ================================================================================================

/// Per-account quotas enforced with `WAFLimitsExceededException`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceLimits {
    /// Entities of one type per account
    pub entities_per_type: usize,
    /// Updates in one Update request
    pub updates_per_request: usize,
    /// Descriptors in one IP set
    pub descriptors_per_ip_set: usize,
    /// Values in any other condition set
    pub values_per_set: usize,
    /// Predicates in one rule
    pub predicates_per_rule: usize,
    /// Activated rules in one web ACL or rule group
    pub rules_per_container: usize,
    /// Tags on one resource
    pub tags_per_resource: usize,
    /// Requests GetSampledRequests draws its sample from
    pub sample_population: usize,
}

impl Default for ServiceLimits {
    fn default() -> Self {
        Self {
            entities_per_type: 100,
            updates_per_request: 1000,
            descriptors_per_ip_set: 10_000,
            values_per_set: 100,
            predicates_per_rule: 10,
            rules_per_container: 10,
            tags_per_resource: 50,
            sample_population: 5000,
        }
    }
}

// ================================================================================================
// BRIDGE CONFIGURATION
// ================================================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Account id embedded in resource ARNs
    pub account_id: String,
    /// Region for a regional endpoint; `None` serves the global endpoint
    pub region: Option<String>,
    pub limits: ServiceLimits,
    /// Page size when a list request sends no `Limit` or `Limit` 0
    pub default_page_size: usize,
    /// Largest page a list request may get
    pub max_page_size: usize,
    /// Status polls a consumed change token stays PENDING for
    pub polls_until_insync: u32,
    /// Third-party rule groups the account subscribes to
    pub subscribed_rule_groups: Vec<SubscribedRuleGroupSummary>,
    /// Buckets a migration stack can be written to
    pub migration_buckets: Vec<String>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            account_id: "123456789012".to_string(),
            region: None,
            limits: ServiceLimits::default(),
            default_page_size: 100,
            max_page_size: 100,
            polls_until_insync: 1,
            subscribed_rule_groups: Vec::new(),
            migration_buckets: Vec::new(),
        }
    }
}

impl BridgeConfig {
    /// Parses a config from JSON text.
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("Failed to parse bridge config: {}", e))
    }

    /// Loads a config from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, String> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        Self::from_json(&text)
    }

    /// ARN prefix shared by every resource of the account.
    pub fn arn_prefix(&self) -> String {
        match &self.region {
            Some(region) => format!("arn:aws:waf-regional:{}:{}", region, self.account_id),
            None => format!("arn:aws:waf::{}", self.account_id),
        }
    }

    /// Effective page size for a requested `Limit`.
    pub fn page_size(&self, limit: Option<i32>) -> usize {
        match limit {
            Some(limit) if limit > 0 => (limit as usize).min(self.max_page_size),
            _ => self.default_page_size.min(self.max_page_size),
        }
        .max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_defaults() {
        let config = BridgeConfig::default();
        assert_eq!(config.default_page_size, 100);
        assert_eq!(config.polls_until_insync, 1);
        assert_eq!(config.limits.tags_per_resource, 50);
        assert_eq!(config.limits.sample_population, 5000);
        assert!(config.subscribed_rule_groups.is_empty());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = BridgeConfig::from_json(
            r#"{"region": "us-east-1", "limits": {"entities_per_type": 2}}"#,
        )
        .unwrap();
        assert_eq!(config.limits.entities_per_type, 2);
        assert_eq!(config.limits.updates_per_request, 1000);
        assert_eq!(config.arn_prefix(), "arn:aws:waf-regional:us-east-1:123456789012");
    }

    #[test]
    fn test_page_size_clamps() {
        let config = BridgeConfig {
            default_page_size: 20,
            ..Default::default()
        };
        assert_eq!(config.page_size(None), 20);
        assert_eq!(config.page_size(Some(0)), 20);
        assert_eq!(config.page_size(Some(3)), 3);
        assert_eq!(config.page_size(Some(500)), 100);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"account_id": "111122223333", "migration_buckets": ["aws-waf-migration-test"]}}"#
        )
        .unwrap();

        let config = BridgeConfig::from_file(file.path()).unwrap();
        assert_eq!(config.account_id, "111122223333");
        assert_eq!(config.migration_buckets, vec!["aws-waf-migration-test"]);
        assert_eq!(config.arn_prefix(), "arn:aws:waf::111122223333");
    }

    #[test]
    fn test_bad_file_reports_path() {
        let err = BridgeConfig::from_file("/nonexistent/bridge.json").unwrap_err();
        assert!(err.contains("/nonexistent/bridge.json"));
    }
}
