// Resource-level metadata: tags and logging configuration.

use crate::conditions::FieldToMatch;
use crate::validation::{nested, require, require_non_empty, require_text, Validate, ValidationError};
use serde::{Deserialize, Serialize};

/// Longest tag key the service accepts.
pub const MAX_TAG_KEY_CHARS: usize = 128;
pub const MAX_TAG_VALUE_CHARS: usize = 256;

/// Key/value label on a web ACL, rule group or rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    #[serde(rename = "Key", default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    #[serde(rename = "Value", default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            value: Some(value.into()),
        }
    }
}

impl Validate for Tag {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text("Key", &self.key)?;
        require("Value", &self.value)?;
        let key_chars = self.key.as_deref().map(|k| k.chars().count()).unwrap_or(0);
        let value_chars = self.value.as_deref().map(|v| v.chars().count()).unwrap_or(0);
        if key_chars > MAX_TAG_KEY_CHARS {
            return Err(ValidationError::InvalidValue {
                field: "Key".to_string(),
                reason: format!("at most {MAX_TAG_KEY_CHARS} characters"),
            });
        }
        if value_chars > MAX_TAG_VALUE_CHARS {
            return Err(ValidationError::InvalidValue {
                field: "Value".to_string(),
                reason: format!("at most {MAX_TAG_VALUE_CHARS} characters"),
            });
        }
        Ok(())
    }
}

/// The tags of one resource, as returned by ListTagsForResource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagInfoForResource {
    #[serde(rename = "ResourceARN", default, skip_serializing_if = "Option::is_none")]
    pub resource_arn: Option<String>,

    #[serde(rename = "TagList", default, skip_serializing_if = "Option::is_none")]
    pub tag_list: Option<Vec<Tag>>,
}

/// Where a web ACL's request logs go and which fields are redacted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfiguration {
    #[serde(rename = "ResourceArn", default, skip_serializing_if = "Option::is_none")]
    pub resource_arn: Option<String>,

    /// Delivery stream ARNs. The service currently accepts exactly one.
    #[serde(rename = "LogDestinationConfigs", default, skip_serializing_if = "Option::is_none")]
    pub log_destination_configs: Option<Vec<String>>,

    #[serde(rename = "RedactedFields", default, skip_serializing_if = "Option::is_none")]
    pub redacted_fields: Option<Vec<FieldToMatch>>,
}

impl LoggingConfiguration {
    pub fn new(resource_arn: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            resource_arn: Some(resource_arn.into()),
            log_destination_configs: Some(vec![destination.into()]),
            redacted_fields: None,
        }
    }

    pub fn with_redacted_fields(mut self, fields: Vec<FieldToMatch>) -> Self {
        self.redacted_fields = Some(fields);
        self
    }
}

impl Validate for LoggingConfiguration {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text("ResourceArn", &self.resource_arn)?;
        require_non_empty("LogDestinationConfigs", &self.log_destination_configs)?;
        nested("RedactedFields", &self.redacted_fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_logging_configuration_wire_shape() {
        let config = LoggingConfiguration::new(
            "arn:aws:waf::123456789012:webacl/acl-1",
            "arn:aws:firehose:us-east-1:123456789012:deliverystream/aws-waf-logs-acl-1",
        )
        .with_redacted_fields(vec![FieldToMatch::header("Authorization")]);

        assert_eq!(
            serde_json::to_value(&config).unwrap(),
            json!({
                "ResourceArn": "arn:aws:waf::123456789012:webacl/acl-1",
                "LogDestinationConfigs": [
                    "arn:aws:firehose:us-east-1:123456789012:deliverystream/aws-waf-logs-acl-1"
                ],
                "RedactedFields": [{"Type": "HEADER", "Data": "Authorization"}]
            })
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_logging_configuration_needs_a_destination() {
        let config = LoggingConfiguration {
            resource_arn: Some("arn".into()),
            log_destination_configs: Some(vec![]),
            redacted_fields: None,
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::EmptyCollection("LogDestinationConfigs".into()))
        );
    }

    #[test]
    fn test_tag_limits() {
        assert!(Tag::new("team", "edge").validate().is_ok());
        assert!(Tag::new("k".repeat(MAX_TAG_KEY_CHARS + 1), "v").validate().is_err());
        assert!(Tag::new("", "v").validate().is_err());
        assert_eq!(
            Tag { key: Some("team".into()), value: None }.validate(),
            Err(ValidationError::MissingField("Value".into()))
        );
    }

    #[test]
    fn test_tag_info_uses_upper_case_arn_member() {
        let info = TagInfoForResource {
            resource_arn: Some("arn:aws:waf::123456789012:rule/r-1".into()),
            tag_list: Some(vec![Tag::new("env", "prod")]),
        };
        let value = serde_json::to_value(&info).unwrap();
        assert!(value.get("ResourceARN").is_some());
        assert_eq!(value["TagList"], json!([{"Key": "env", "Value": "prod"}]));
    }
}
