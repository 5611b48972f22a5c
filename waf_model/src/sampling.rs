// Read-only observability data returned by GetSampledRequests.

use crate::validation::{require, require_valid, Validate, ValidationError};
use crate::wire::timestamp;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Interval of sampled traffic. The service clamps it to the previous
/// three hours.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    #[serde(
        rename = "StartTime",
        default,
        skip_serializing_if = "Option::is_none",
        with = "timestamp"
    )]
    pub start_time: Option<DateTime<Utc>>,

    #[serde(
        rename = "EndTime",
        default,
        skip_serializing_if = "Option::is_none",
        with = "timestamp"
    )]
    pub end_time: Option<DateTime<Utc>>,
}

impl TimeWindow {
    pub fn new(start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Self {
        Self {
            start_time: Some(start_time),
            end_time: Some(end_time),
        }
    }

    /// The `length` leading up to `end`.
    pub fn ending_at(end: DateTime<Utc>, length: Duration) -> Self {
        Self::new(end - length, end)
    }

    /// Whether `at` lies in `[start, end]`. An open bound admits everything.
    pub fn contains(&self, at: &DateTime<Utc>) -> bool {
        self.start_time.map_or(true, |start| *at >= start)
            && self.end_time.map_or(true, |end| *at <= end)
    }
}

impl Validate for TimeWindow {
    fn validate(&self) -> Result<(), ValidationError> {
        require("StartTime", &self.start_time)?;
        require("EndTime", &self.end_time)
    }
}

/// One header of a sampled request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HTTPHeader {
    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "Value", default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl HTTPHeader {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            value: Some(value.into()),
        }
    }
}

/// The captured parts of a sampled request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HTTPRequest {
    /// Source address, or the `X-Forwarded-For` address behind a CDN.
    #[serde(rename = "ClientIP", default, skip_serializing_if = "Option::is_none")]
    pub client_ip: Option<String>,

    /// ISO-3166 alpha-2 code of the country the request came from.
    #[serde(rename = "Country", default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,

    #[serde(rename = "URI", default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,

    #[serde(rename = "Method", default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,

    #[serde(rename = "HTTPVersion", default, skip_serializing_if = "Option::is_none")]
    pub http_version: Option<String>,

    #[serde(rename = "Headers", default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<Vec<HTTPHeader>>,
}

/// A sampled request and what the web ACL did with it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampledHTTPRequest {
    #[serde(rename = "Request", default, skip_serializing_if = "Option::is_none")]
    pub request: Option<HTTPRequest>,

    /// How many requests of the population this sample stands for.
    #[serde(rename = "Weight", default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<i64>,

    #[serde(
        rename = "Timestamp",
        default,
        skip_serializing_if = "Option::is_none",
        with = "timestamp"
    )]
    pub timestamp: Option<DateTime<Utc>>,

    /// `BLOCK`, `ALLOW` or `COUNT`.
    #[serde(rename = "Action", default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,

    /// Id of the rule inside a rule group that matched, when the sampled
    /// rule is a group.
    #[serde(rename = "RuleWithinRuleGroup", default, skip_serializing_if = "Option::is_none")]
    pub rule_within_rule_group: Option<String>,
}

impl Validate for HTTPRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

impl Validate for SampledHTTPRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        require_valid("Request", &self.request)?;
        require("Weight", &self.weight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_time_window_from_iso_strings() {
        let window: TimeWindow = serde_json::from_value(json!({
            "StartTime": "2016-09-27T14:50Z",
            "EndTime": "2016-09-27T15:50Z"
        }))
        .unwrap();
        assert!(window.validate().is_ok());
        assert_eq!(
            serde_json::to_value(&window).unwrap(),
            json!({"StartTime": 1474987800, "EndTime": 1474991400})
        );
    }

    #[test]
    fn test_time_window_contains() {
        let end = Utc.with_ymd_and_hms(2016, 9, 27, 15, 50, 0).unwrap();
        let window = TimeWindow::ending_at(end, Duration::hours(3));
        assert!(window.contains(&(end - Duration::hours(1))));
        assert!(window.contains(&end));
        assert!(!window.contains(&(end - Duration::hours(4))));
        assert!(TimeWindow::default().contains(&end));
    }

    #[test]
    fn test_sampled_request_wire_shape() {
        let sample: SampledHTTPRequest = serde_json::from_value(json!({
            "Request": {
                "ClientIP": "192.0.2.44",
                "Country": "US",
                "URI": "/",
                "Method": "HEAD",
                "HTTPVersion": "HTTP/1.1",
                "Headers": [{"Name": "User-Agent", "Value": "BadBot"}]
            },
            "Weight": 1,
            "Timestamp": 1474987800,
            "Action": "BLOCK"
        }))
        .unwrap();
        assert!(sample.validate().is_ok());
        let request = sample.request.as_ref().unwrap();
        assert_eq!(request.client_ip.as_deref(), Some("192.0.2.44"));
        assert_eq!(request.headers.as_ref().unwrap()[0], HTTPHeader::new("User-Agent", "BadBot"));
        assert_eq!(sample.rule_within_rule_group, None);
    }

    #[test]
    fn test_window_requires_both_bounds() {
        let window = TimeWindow {
            start_time: Some(Utc::now()),
            end_time: None,
        };
        assert_eq!(window.validate(), Err(ValidationError::MissingField("EndTime".into())));
    }
}
