// Operation descriptors and the cross-cutting request/response pairs.

use crate::entity::{Entity, Listing, Unscoped};
use crate::envelope::{ChangeBody, EntityRef, GetResponse, ListRequest, Mutating, Page};
use crate::ids::{ChangeToken, NextMarker};
use crate::resources::{LoggingConfiguration, Tag, TagInfoForResource};
use crate::rules::{ActivatedRule, SubscribedRuleGroupSummary};
use crate::sampling::{SampledHTTPRequest, TimeWindow};
use crate::validation::{
    in_range, nested, require, require_non_empty, require_text, require_valid, Validate,
    ValidationError,
};
use crate::vocabulary::ChangeTokenStatus;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Prefix of the `X-Amz-Target` header value.
pub const TARGET_PREFIX: &str = "AWSWAF_20150824";

/// Most samples GetSampledRequests returns.
pub const MAX_SAMPLED_ITEMS: i64 = 500;

/// A request type, tied to its response type and operation name.
pub trait Operation: Serialize + DeserializeOwned + Validate + Debug {
    type Output: Serialize + DeserializeOwned + Debug;

    fn name() -> String;

    /// Value of the `X-Amz-Target` header, e.g. `AWSWAF_20150824.GetIPSet`.
    fn target() -> String {
        format!("{TARGET_PREFIX}.{}", Self::name())
    }
}

impl<B: ChangeBody> Operation for Mutating<B> {
    type Output = B::Output;

    fn name() -> String {
        B::operation_name()
    }
}

impl<E: Entity> Operation for EntityRef<E> {
    type Output = GetResponse<E>;

    fn name() -> String {
        format!("Get{}", E::NAME)
    }
}

impl<L: Listing + Debug + Clone + PartialEq> Operation for ListRequest<L> {
    type Output = Page<L>;

    fn name() -> String {
        L::OPERATION.to_string()
    }
}

macro_rules! operation {
    ($($request:ty => $output:ty, $name:literal;)+) => {
        $(
            impl Operation for $request {
                type Output = $output;

                fn name() -> String {
                    $name.to_string()
                }
            }
        )+
    };
}

/// `{}`: the response of operations that return nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmptyResponse {}

// ============================================================================
// CHANGE TOKENS
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetChangeTokenRequest {}

impl Validate for GetChangeTokenRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetChangeTokenResponse {
    #[serde(rename = "ChangeToken", default, skip_serializing_if = "Option::is_none")]
    pub change_token: Option<ChangeToken>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetChangeTokenStatusRequest {
    #[serde(rename = "ChangeToken", default, skip_serializing_if = "Option::is_none")]
    pub change_token: Option<ChangeToken>,
}

impl GetChangeTokenStatusRequest {
    pub fn new(change_token: ChangeToken) -> Self {
        Self {
            change_token: Some(change_token),
        }
    }
}

impl Validate for GetChangeTokenStatusRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        require("ChangeToken", &self.change_token)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetChangeTokenStatusResponse {
    #[serde(rename = "ChangeTokenStatus", default, skip_serializing_if = "Option::is_none")]
    pub change_token_status: Option<ChangeTokenStatus>,
}

// ============================================================================
// SAMPLING AND RATE-BASED KEYS
// ============================================================================

/// Samples of the requests a rule (or the default action) of a web ACL
/// handled during a time window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetSampledRequestsRequest {
    /// Note the lower-case `Acl`: this member is spelled differently from
    /// every other web ACL id member.
    #[serde(rename = "WebAclId", default, skip_serializing_if = "Option::is_none")]
    pub web_acl_id: Option<String>,

    /// A rule id, or `Default_Action` for requests no rule matched.
    #[serde(rename = "RuleId", default, skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,

    #[serde(rename = "TimeWindow", default, skip_serializing_if = "Option::is_none")]
    pub time_window: Option<TimeWindow>,

    #[serde(rename = "MaxItems", default, skip_serializing_if = "Option::is_none")]
    pub max_items: Option<i64>,
}

impl GetSampledRequestsRequest {
    pub fn new(
        web_acl_id: impl Into<String>,
        rule_id: impl Into<String>,
        time_window: TimeWindow,
        max_items: i64,
    ) -> Self {
        Self {
            web_acl_id: Some(web_acl_id.into()),
            rule_id: Some(rule_id.into()),
            time_window: Some(time_window),
            max_items: Some(max_items),
        }
    }
}

impl Validate for GetSampledRequestsRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text("WebAclId", &self.web_acl_id)?;
        require_text("RuleId", &self.rule_id)?;
        require_valid("TimeWindow", &self.time_window)?;
        require("MaxItems", &self.max_items)?;
        in_range("MaxItems", self.max_items.unwrap_or_default(), 1, MAX_SAMPLED_ITEMS)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetSampledRequestsResponse {
    #[serde(rename = "SampledRequests", default, skip_serializing_if = "Option::is_none")]
    pub sampled_requests: Option<Vec<SampledHTTPRequest>>,

    /// Requests in the window the samples were drawn from.
    #[serde(rename = "PopulationSize", default, skip_serializing_if = "Option::is_none")]
    pub population_size: Option<i64>,

    /// The window actually sampled, which may be narrower than requested.
    #[serde(rename = "TimeWindow", default, skip_serializing_if = "Option::is_none")]
    pub time_window: Option<TimeWindow>,
}

/// Source addresses a rate-based rule is currently blocking.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetRateBasedRuleManagedKeysRequest {
    #[serde(rename = "RuleId", default, skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,

    #[serde(rename = "NextMarker", default, skip_serializing_if = "Option::is_none")]
    pub next_marker: Option<NextMarker>,
}

impl GetRateBasedRuleManagedKeysRequest {
    pub fn new(rule_id: impl Into<String>) -> Self {
        Self {
            rule_id: Some(rule_id.into()),
            next_marker: None,
        }
    }
}

impl Validate for GetRateBasedRuleManagedKeysRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text("RuleId", &self.rule_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetRateBasedRuleManagedKeysResponse {
    #[serde(rename = "ManagedKeys", default, skip_serializing_if = "Option::is_none")]
    pub managed_keys: Option<Vec<String>>,

    #[serde(rename = "NextMarker", default, skip_serializing_if = "Option::is_none")]
    pub next_marker: Option<NextMarker>,
}

// ============================================================================
// LOGGING
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PutLoggingConfigurationRequest {
    #[serde(rename = "LoggingConfiguration", default, skip_serializing_if = "Option::is_none")]
    pub logging_configuration: Option<LoggingConfiguration>,
}

impl PutLoggingConfigurationRequest {
    pub fn new(logging_configuration: LoggingConfiguration) -> Self {
        Self {
            logging_configuration: Some(logging_configuration),
        }
    }
}

impl Validate for PutLoggingConfigurationRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        require_valid("LoggingConfiguration", &self.logging_configuration)
    }
}

/// Response of both Put and Get.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfigurationResponse {
    #[serde(rename = "LoggingConfiguration", default, skip_serializing_if = "Option::is_none")]
    pub logging_configuration: Option<LoggingConfiguration>,
}

/// `{ResourceArn}`: the request of the logging and permission-policy Get
/// and Delete operations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceArnRequest {
    #[serde(rename = "ResourceArn", default, skip_serializing_if = "Option::is_none")]
    pub resource_arn: Option<String>,
}

impl ResourceArnRequest {
    pub fn new(resource_arn: impl Into<String>) -> Self {
        Self {
            resource_arn: Some(resource_arn.into()),
        }
    }
}

impl Validate for ResourceArnRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text("ResourceArn", &self.resource_arn)
    }
}

macro_rules! resource_request {
    ($($name:ident,)+) => {
        $(
            #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
            #[serde(transparent)]
            pub struct $name(pub ResourceArnRequest);

            impl $name {
                pub fn new(resource_arn: impl Into<String>) -> Self {
                    Self(ResourceArnRequest::new(resource_arn))
                }

                pub fn resource_arn(&self) -> Option<&str> {
                    self.0.resource_arn.as_deref()
                }
            }

            impl Validate for $name {
                fn validate(&self) -> Result<(), ValidationError> {
                    self.0.validate()
                }
            }
        )+
    };
}

resource_request! {
    GetLoggingConfigurationRequest,
    DeleteLoggingConfigurationRequest,
    GetPermissionPolicyRequest,
    DeletePermissionPolicyRequest,
}

/// Logging configurations of every web ACL.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfigurations;

impl Listing for LoggingConfigurations {
    const OPERATION: &'static str = "ListLoggingConfigurations";
    const KEY: &'static str = "LoggingConfigurations";

    type Item = LoggingConfiguration;
    type Scope = Unscoped;
}

// ============================================================================
// PERMISSION POLICY
// ============================================================================

/// Attaches an IAM policy to a rule group so other accounts can use it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PutPermissionPolicyRequest {
    #[serde(rename = "ResourceArn", default, skip_serializing_if = "Option::is_none")]
    pub resource_arn: Option<String>,

    /// Policy document as JSON text.
    #[serde(rename = "Policy", default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<String>,
}

impl PutPermissionPolicyRequest {
    pub fn new(resource_arn: impl Into<String>, policy: impl Into<String>) -> Self {
        Self {
            resource_arn: Some(resource_arn.into()),
            policy: Some(policy.into()),
        }
    }
}

impl Validate for PutPermissionPolicyRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text("ResourceArn", &self.resource_arn)?;
        require_text("Policy", &self.policy)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetPermissionPolicyResponse {
    #[serde(rename = "Policy", default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<String>,
}

// ============================================================================
// TAGGING
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagResourceRequest {
    #[serde(rename = "ResourceARN", default, skip_serializing_if = "Option::is_none")]
    pub resource_arn: Option<String>,

    #[serde(rename = "Tags", default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
}

impl TagResourceRequest {
    pub fn new(resource_arn: impl Into<String>, tags: Vec<Tag>) -> Self {
        Self {
            resource_arn: Some(resource_arn.into()),
            tags: Some(tags),
        }
    }
}

impl Validate for TagResourceRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text("ResourceARN", &self.resource_arn)?;
        require_non_empty("Tags", &self.tags)?;
        nested("Tags", &self.tags)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UntagResourceRequest {
    #[serde(rename = "ResourceARN", default, skip_serializing_if = "Option::is_none")]
    pub resource_arn: Option<String>,

    #[serde(rename = "TagKeys", default, skip_serializing_if = "Option::is_none")]
    pub tag_keys: Option<Vec<String>>,
}

impl UntagResourceRequest {
    pub fn new(resource_arn: impl Into<String>, tag_keys: Vec<String>) -> Self {
        Self {
            resource_arn: Some(resource_arn.into()),
            tag_keys: Some(tag_keys),
        }
    }
}

impl Validate for UntagResourceRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text("ResourceARN", &self.resource_arn)?;
        require_non_empty("TagKeys", &self.tag_keys)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListTagsForResourceRequest {
    #[serde(rename = "NextMarker", default, skip_serializing_if = "Option::is_none")]
    pub next_marker: Option<NextMarker>,

    #[serde(rename = "Limit", default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<i32>,

    #[serde(rename = "ResourceARN", default, skip_serializing_if = "Option::is_none")]
    pub resource_arn: Option<String>,
}

impl ListTagsForResourceRequest {
    pub fn new(resource_arn: impl Into<String>) -> Self {
        Self {
            next_marker: None,
            limit: None,
            resource_arn: Some(resource_arn.into()),
        }
    }
}

impl Validate for ListTagsForResourceRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(limit) = self.limit {
            in_range("Limit", i64::from(limit), 0, 100)?;
        }
        require_text("ResourceARN", &self.resource_arn)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListTagsForResourceResponse {
    #[serde(rename = "NextMarker", default, skip_serializing_if = "Option::is_none")]
    pub next_marker: Option<NextMarker>,

    #[serde(rename = "TagInfoForResource", default, skip_serializing_if = "Option::is_none")]
    pub tag_info_for_resource: Option<TagInfoForResource>,
}

// ============================================================================
// RULE GROUP COLLECTIONS
// ============================================================================

/// The activated rules of one rule group, or of every group when
/// `RuleGroupId` is absent.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivatedRulesInRuleGroup;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleGroupScope {
    #[serde(rename = "RuleGroupId", default, skip_serializing_if = "Option::is_none")]
    pub rule_group_id: Option<String>,
}

impl Validate for RuleGroupScope {
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

impl Listing for ActivatedRulesInRuleGroup {
    const OPERATION: &'static str = "ListActivatedRulesInRuleGroup";
    const KEY: &'static str = "ActivatedRules";

    type Item = ActivatedRule;
    type Scope = RuleGroupScope;
}

impl ListRequest<ActivatedRulesInRuleGroup> {
    pub fn in_rule_group(rule_group_id: impl Into<String>) -> Self {
        Self::scoped(RuleGroupScope {
            rule_group_id: Some(rule_group_id.into()),
        })
    }
}

/// Third-party rule groups the account subscribes to.
#[derive(Debug, Clone, PartialEq)]
pub struct SubscribedRuleGroups;

impl Listing for SubscribedRuleGroups {
    const OPERATION: &'static str = "ListSubscribedRuleGroups";
    const KEY: &'static str = "RuleGroups";

    type Item = SubscribedRuleGroupSummary;
    type Scope = Unscoped;
}

// ============================================================================
// MIGRATION
// ============================================================================

/// Renders a web ACL as a template for the newer API into an S3 bucket
/// whose name starts with `aws-waf-migration-`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateWebACLMigrationStackRequest {
    #[serde(rename = "WebACLId", default, skip_serializing_if = "Option::is_none")]
    pub web_acl_id: Option<String>,

    #[serde(rename = "S3BucketName", default, skip_serializing_if = "Option::is_none")]
    pub s3_bucket_name: Option<String>,

    /// Skip entities that cannot be migrated instead of failing.
    #[serde(rename = "IgnoreUnsupportedType", default, skip_serializing_if = "Option::is_none")]
    pub ignore_unsupported_type: Option<bool>,
}

impl CreateWebACLMigrationStackRequest {
    pub fn new(
        web_acl_id: impl Into<String>,
        s3_bucket_name: impl Into<String>,
        ignore_unsupported_type: bool,
    ) -> Self {
        Self {
            web_acl_id: Some(web_acl_id.into()),
            s3_bucket_name: Some(s3_bucket_name.into()),
            ignore_unsupported_type: Some(ignore_unsupported_type),
        }
    }
}

impl Validate for CreateWebACLMigrationStackRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text("WebACLId", &self.web_acl_id)?;
        require_text("S3BucketName", &self.s3_bucket_name)?;
        require("IgnoreUnsupportedType", &self.ignore_unsupported_type)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateWebACLMigrationStackResponse {
    #[serde(rename = "S3ObjectUrl", default, skip_serializing_if = "Option::is_none")]
    pub s3_object_url: Option<String>,
}

operation! {
    GetChangeTokenRequest => GetChangeTokenResponse, "GetChangeToken";
    GetChangeTokenStatusRequest => GetChangeTokenStatusResponse, "GetChangeTokenStatus";
    GetSampledRequestsRequest => GetSampledRequestsResponse, "GetSampledRequests";
    GetRateBasedRuleManagedKeysRequest => GetRateBasedRuleManagedKeysResponse, "GetRateBasedRuleManagedKeys";
    PutLoggingConfigurationRequest => LoggingConfigurationResponse, "PutLoggingConfiguration";
    GetLoggingConfigurationRequest => LoggingConfigurationResponse, "GetLoggingConfiguration";
    DeleteLoggingConfigurationRequest => EmptyResponse, "DeleteLoggingConfiguration";
    PutPermissionPolicyRequest => EmptyResponse, "PutPermissionPolicy";
    GetPermissionPolicyRequest => GetPermissionPolicyResponse, "GetPermissionPolicy";
    DeletePermissionPolicyRequest => EmptyResponse, "DeletePermissionPolicy";
    TagResourceRequest => EmptyResponse, "TagResource";
    UntagResourceRequest => EmptyResponse, "UntagResource";
    ListTagsForResourceRequest => ListTagsForResourceResponse, "ListTagsForResource";
    CreateWebACLMigrationStackRequest => CreateWebACLMigrationStackResponse, "CreateWebACLMigrationStack";
}

pub type ListLoggingConfigurationsRequest = ListRequest<LoggingConfigurations>;
pub type ListLoggingConfigurationsResponse = Page<LoggingConfigurations>;
pub type ListActivatedRulesInRuleGroupRequest = ListRequest<ActivatedRulesInRuleGroup>;
pub type ListActivatedRulesInRuleGroupResponse = Page<ActivatedRulesInRuleGroup>;
pub type ListSubscribedRuleGroupsRequest = ListRequest<SubscribedRuleGroups>;
pub type ListSubscribedRuleGroupsResponse = Page<SubscribedRuleGroups>;
pub type PutLoggingConfigurationResponse = LoggingConfigurationResponse;
pub type GetLoggingConfigurationResponse = LoggingConfigurationResponse;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::{Batch, CreateRequest, DeleteRequest, GetRequest, NewSet, UpdateRequest};
    use crate::rules::{RateBasedRule, WebACL};
    use crate::sets::{ByteMatchSet, IPSet};
    use chrono::{Duration, TimeZone, Utc};
    use serde_json::json;

    #[test]
    fn test_operation_names() {
        assert_eq!(CreateRequest::<ByteMatchSet>::name(), "CreateByteMatchSet");
        assert_eq!(GetRequest::<IPSet>::name(), "GetIPSet");
        assert_eq!(UpdateRequest::<RateBasedRule>::name(), "UpdateRateBasedRule");
        assert_eq!(DeleteRequest::<WebACL>::name(), "DeleteWebACL");
        assert_eq!(ListRequest::<IPSet>::name(), "ListIPSets");
        assert_eq!(ListRequest::<ActivatedRulesInRuleGroup>::name(), "ListActivatedRulesInRuleGroup");
        assert_eq!(GetChangeTokenRequest::target(), "AWSWAF_20150824.GetChangeToken");
        assert_eq!(
            CreateWebACLMigrationStackRequest::target(),
            "AWSWAF_20150824.CreateWebACLMigrationStack"
        );
    }

    #[test]
    fn test_output_types_line_up() {
        fn output_of<O: Operation>(_: &O) -> &'static str {
            std::any::type_name::<O::Output>()
        }
        let create = NewSet::<IPSet>::named("office").with_token(ChangeToken::new("t"));
        assert!(output_of(&create).contains("CreateResponse"));
        let update = Batch::<IPSet>::new("id", vec![]).with_token(ChangeToken::new("t"));
        assert!(output_of(&update).contains("ChangeReceipt"));
    }

    #[test]
    fn test_sampled_requests_request_shape() {
        let end = Utc.with_ymd_and_hms(2016, 9, 27, 17, 50, 0).unwrap();
        let request = GetSampledRequestsRequest::new(
            "acl-1",
            "Default_Action",
            TimeWindow::ending_at(end, Duration::hours(3)),
            100,
        );
        assert!(request.validate().is_ok());
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "WebAclId": "acl-1",
                "RuleId": "Default_Action",
                "TimeWindow": {"StartTime": 1474987800, "EndTime": 1474998600},
                "MaxItems": 100
            })
        );

        let mut too_many = request.clone();
        too_many.max_items = Some(501);
        assert!(too_many.validate().is_err());
    }

    #[test]
    fn test_resource_requests_are_flat() {
        let request = GetLoggingConfigurationRequest::new("arn:aws:waf::123456789012:webacl/acl-1");
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"ResourceArn": "arn:aws:waf::123456789012:webacl/acl-1"})
        );
        assert!(DeletePermissionPolicyRequest::default().validate().is_err());
    }

    #[test]
    fn test_tagging_requests() {
        let tag = TagResourceRequest::new("arn:aws:waf::123456789012:rule/r-1", vec![]);
        assert_eq!(tag.validate(), Err(ValidationError::EmptyCollection("Tags".into())));

        let untag = UntagResourceRequest::new(
            "arn:aws:waf::123456789012:rule/r-1",
            vec!["env".to_string()],
        );
        assert_eq!(
            serde_json::to_value(&untag).unwrap(),
            json!({"ResourceARN": "arn:aws:waf::123456789012:rule/r-1", "TagKeys": ["env"]})
        );
    }

    #[test]
    fn test_activated_rules_listing_scope() {
        let request = ListRequest::<ActivatedRulesInRuleGroup>::in_rule_group("rg-1").with_limit(10);
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value, json!({"RuleGroupId": "rg-1", "Limit": 10}));

        let back: ListActivatedRulesInRuleGroupRequest = serde_json::from_value(value).unwrap();
        assert_eq!(back.scope.rule_group_id.as_deref(), Some("rg-1"));

        let page: ListActivatedRulesInRuleGroupResponse = serde_json::from_value(json!({
            "ActivatedRules": [{"Priority": 1, "RuleId": "r-1", "Action": {"Type": "BLOCK"}}]
        }))
        .unwrap();
        assert_eq!(page.items.len(), 1);
    }

    #[test]
    fn test_change_token_status_response() {
        let response: GetChangeTokenStatusResponse =
            serde_json::from_value(json!({"ChangeTokenStatus": "INSYNC"})).unwrap();
        assert!(response.change_token_status.unwrap().is_insync());
    }

    #[test]
    fn test_migration_request_requires_flag() {
        let mut request = CreateWebACLMigrationStackRequest::new("acl-1", "aws-waf-migration-demo", false);
        assert!(request.validate().is_ok());
        request.ignore_unsupported_type = None;
        assert_eq!(
            request.validate(),
            Err(ValidationError::MissingField("IgnoreUnsupportedType".into()))
        );
    }
}
