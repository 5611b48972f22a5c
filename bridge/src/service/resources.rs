// Operations on resources addressed by ARN (tags, logging configurations,
// permission policies), the rule group collections, and web ACL migration.

use super::{admit, lookup, required, MemoryWaf, State, Stored};
use crate::table::paginate;
use indexmap::IndexMap;
use log::info;
use serde_json::{json, Value};
use waf_model::operations::{
    ActivatedRulesInRuleGroup, CreateWebACLMigrationStackRequest,
    CreateWebACLMigrationStackResponse, DeleteLoggingConfigurationRequest,
    DeletePermissionPolicyRequest, EmptyResponse, GetLoggingConfigurationRequest,
    GetPermissionPolicyRequest, GetPermissionPolicyResponse, ListTagsForResourceRequest,
    ListTagsForResourceResponse, LoggingConfigurationResponse, LoggingConfigurations,
    PutLoggingConfigurationRequest, PutPermissionPolicyRequest, SubscribedRuleGroups,
    TagResourceRequest, UntagResourceRequest,
};
use waf_model::resources::MAX_TAG_KEY_CHARS;
use waf_model::{
    ActivatedRule, ErrorKind, ListRequest, LoggingConfiguration, MigrationErrorType, Page,
    ParameterExceptionField, ParameterExceptionReason, RateBasedRule, Rule, RuleGroup, ServiceError,
    SubscribedRuleGroupSummary, Tag, TagInfoForResource, WafRuleType, WebACL,
};

/// Tag keys with this prefix belong to the provider.
const RESERVED_TAG_PREFIX: &str = "aws:";

/// Bucket names a migration stack may be written to start with this.
pub const MIGRATION_BUCKET_PREFIX: &str = "aws-waf-migration-";

/// Taggable resource types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    WebAcl,
    Rule,
    RateBasedRule,
    RuleGroup,
}

impl Resource {
    const ALL: [Resource; 4] = [
        Resource::WebAcl,
        Resource::Rule,
        Resource::RateBasedRule,
        Resource::RuleGroup,
    ];

    /// The resource-type segment of the ARN.
    pub fn kind(self) -> Option<&'static str> {
        match self {
            Resource::WebAcl => WebACL::ARN_KIND,
            Resource::Rule => Rule::ARN_KIND,
            Resource::RateBasedRule => RateBasedRule::ARN_KIND,
            Resource::RuleGroup => RuleGroup::ARN_KIND,
        }
    }

    fn from_kind(kind: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|resource| resource.kind() == Some(kind))
    }

    fn exists(self, state: &State, id: &str) -> bool {
        match self {
            Resource::WebAcl => state.web_acls.contains(id),
            Resource::Rule => state.rules.contains(id),
            Resource::RateBasedRule => state.rate_based_rules.contains(id),
            Resource::RuleGroup => state.rule_groups.contains(id),
        }
    }
}

fn no_such_resource(arn: &str) -> ServiceError {
    ServiceError::new(
        ErrorKind::NonexistentItem,
        format!("No resource with ARN {}", arn),
    )
}

fn invalid_tag_key(key: &str) -> ServiceError {
    ServiceError::invalid_parameter(
        ParameterExceptionField::TagKeys,
        ParameterExceptionReason::InvalidTagKey,
        key,
    )
}

impl MemoryWaf {
    /// The resource an ARN of this account names, if it exists.
    pub(crate) fn resolve_arn(&self, state: &State, arn: &str) -> Option<Resource> {
        let path = arn.strip_prefix(&self.config.arn_prefix())?.strip_prefix(':')?;
        let (kind, id) = path.split_once('/')?;
        let resource = Resource::from_kind(kind)?;
        resource.exists(state, id).then_some(resource)
    }

    fn require_resource(
        &self,
        state: &State,
        arn: &str,
        allowed: &[Resource],
    ) -> Result<Resource, ServiceError> {
        self.resolve_arn(state, arn)
            .filter(|resource| allowed.contains(resource))
            .ok_or_else(|| no_such_resource(arn))
    }

    /// The tags of `arn` with `tags` added, checked against key rules and
    /// the per-resource limit.
    pub(crate) fn merged_tags(
        &self,
        state: &State,
        arn: &str,
        tags: &[Tag],
    ) -> Result<IndexMap<String, String>, ServiceError> {
        let mut merged = state.tags.get(arn).cloned().unwrap_or_default();
        for tag in tags {
            let key = tag.key.as_deref().unwrap_or_default();
            let chars = key.chars().count();
            if chars == 0 || chars > MAX_TAG_KEY_CHARS || key.starts_with(RESERVED_TAG_PREFIX) {
                return Err(invalid_tag_key(key));
            }
            merged.insert(key.to_string(), tag.value.clone().unwrap_or_default());
        }

        let limit = self.config.limits.tags_per_resource;
        if merged.len() > limit {
            return Err(ServiceError::new(
                ErrorKind::LimitsExceeded,
                format!("A resource can carry at most {} tags", limit),
            ));
        }
        Ok(merged)
    }

    // ============================================================================================
    // TAGGING
    // ============================================================================================

    pub fn tag_resource(&self, request: TagResourceRequest) -> Result<EmptyResponse, ServiceError> {
        admit(&request)?;
        let arn = required(&request.resource_arn, "ResourceARN")?;
        let tags = required(&request.tags, "Tags")?;

        let mut state = self.state.write();
        self.resolve_arn(&state, arn).ok_or_else(|| no_such_resource(arn))?;
        let merged = self.merged_tags(&state, arn, tags)?;
        state.tags.insert(arn.clone(), merged);
        Ok(EmptyResponse {})
    }

    pub fn untag_resource(&self, request: UntagResourceRequest) -> Result<EmptyResponse, ServiceError> {
        admit(&request)?;
        let arn = required(&request.resource_arn, "ResourceARN")?;
        let keys = required(&request.tag_keys, "TagKeys")?;

        let mut state = self.state.write();
        self.resolve_arn(&state, arn).ok_or_else(|| no_such_resource(arn))?;
        if let Some(key) = keys.iter().find(|key| key.is_empty()) {
            return Err(invalid_tag_key(key));
        }
        if let Some(tags) = state.tags.get_mut(arn) {
            for key in keys {
                tags.shift_remove(key);
            }
        }
        Ok(EmptyResponse {})
    }

    pub fn list_tags_for_resource(
        &self,
        request: ListTagsForResourceRequest,
    ) -> Result<ListTagsForResourceResponse, ServiceError> {
        admit(&request)?;
        let arn = required(&request.resource_arn, "ResourceARN")?;

        let state = self.state.read();
        self.resolve_arn(&state, arn).ok_or_else(|| no_such_resource(arn))?;
        let keyed: Vec<(String, Tag)> = state
            .tags
            .get(arn)
            .map(|tags| {
                tags.iter()
                    .map(|(key, value)| (key.clone(), Tag::new(key.as_str(), value.as_str())))
                    .collect()
            })
            .unwrap_or_default();
        let (tag_list, next_marker) = paginate(
            keyed,
            request.next_marker.as_ref(),
            self.config.page_size(request.limit),
        )?;

        Ok(ListTagsForResourceResponse {
            next_marker,
            tag_info_for_resource: Some(TagInfoForResource {
                resource_arn: Some(arn.clone()),
                tag_list: Some(tag_list),
            }),
        })
    }

    // ============================================================================================
    // LOGGING
    // ============================================================================================

    pub fn put_logging_configuration(
        &self,
        request: PutLoggingConfigurationRequest,
    ) -> Result<LoggingConfigurationResponse, ServiceError> {
        admit(&request)?;
        let configuration = required(&request.logging_configuration, "LoggingConfiguration")?;
        let arn = required(&configuration.resource_arn, "ResourceArn")?;

        let destinations = configuration
            .log_destination_configs
            .as_deref()
            .unwrap_or_default();
        if destinations.len() != 1 {
            return Err(ServiceError::new(
                ErrorKind::InvalidParameter,
                format!(
                    "LogDestinationConfigs must name exactly one destination, got {}",
                    destinations.len()
                ),
            ));
        }

        let mut state = self.state.write();
        self.require_resource(&state, arn, &[Resource::WebAcl])?;
        state.logging.insert(arn.clone(), configuration.clone());

        info!("Logging for {} goes to {}", arn, destinations[0]);
        Ok(LoggingConfigurationResponse {
            logging_configuration: Some(configuration.clone()),
        })
    }

    pub fn get_logging_configuration(
        &self,
        request: GetLoggingConfigurationRequest,
    ) -> Result<LoggingConfigurationResponse, ServiceError> {
        admit(&request)?;
        let arn = request.resource_arn().unwrap_or_default();
        let state = self.state.read();
        let configuration = state.logging.get(arn).ok_or_else(|| no_such_resource(arn))?;
        Ok(LoggingConfigurationResponse {
            logging_configuration: Some(configuration.clone()),
        })
    }

    pub fn delete_logging_configuration(
        &self,
        request: DeleteLoggingConfigurationRequest,
    ) -> Result<EmptyResponse, ServiceError> {
        admit(&request)?;
        let arn = request.resource_arn().unwrap_or_default();
        let mut state = self.state.write();
        state
            .logging
            .shift_remove(arn)
            .ok_or_else(|| no_such_resource(arn))?;
        Ok(EmptyResponse {})
    }

    pub fn list_logging_configurations(
        &self,
        request: ListRequest<LoggingConfigurations>,
    ) -> Result<Page<LoggingConfigurations>, ServiceError> {
        admit(&request)?;
        let state = self.state.read();
        let keyed: Vec<(String, LoggingConfiguration)> = state
            .logging
            .iter()
            .map(|(arn, configuration)| (arn.clone(), configuration.clone()))
            .collect();
        let (items, next_marker) = paginate(
            keyed,
            request.next_marker.as_ref(),
            self.config.page_size(request.limit),
        )?;
        Ok(Page { items, next_marker })
    }

    // ============================================================================================
    // PERMISSION POLICY
    // ============================================================================================

    pub fn put_permission_policy(
        &self,
        request: PutPermissionPolicyRequest,
    ) -> Result<EmptyResponse, ServiceError> {
        admit(&request)?;
        let arn = required(&request.resource_arn, "ResourceArn")?;
        let policy = required(&request.policy, "Policy")?;

        let has_statement = serde_json::from_str::<Value>(policy)
            .ok()
            .and_then(|document| document.get("Statement").cloned())
            .is_some();
        if !has_statement {
            return Err(ServiceError::new(
                ErrorKind::InvalidPermissionPolicy,
                "Policy must be a JSON object with a Statement",
            ));
        }

        let mut state = self.state.write();
        self.require_resource(&state, arn, &[Resource::RuleGroup])?;
        state.policies.insert(arn.clone(), policy.clone());
        Ok(EmptyResponse {})
    }

    pub fn get_permission_policy(
        &self,
        request: GetPermissionPolicyRequest,
    ) -> Result<GetPermissionPolicyResponse, ServiceError> {
        admit(&request)?;
        let arn = request.resource_arn().unwrap_or_default();
        let state = self.state.read();
        let policy = state.policies.get(arn).ok_or_else(|| no_such_resource(arn))?;
        Ok(GetPermissionPolicyResponse {
            policy: Some(policy.clone()),
        })
    }

    pub fn delete_permission_policy(
        &self,
        request: DeletePermissionPolicyRequest,
    ) -> Result<EmptyResponse, ServiceError> {
        admit(&request)?;
        let arn = request.resource_arn().unwrap_or_default();
        let mut state = self.state.write();
        self.require_resource(&state, arn, &[Resource::RuleGroup])?;
        state.policies.remove(arn);
        Ok(EmptyResponse {})
    }

    // ============================================================================================
    // RULE GROUP COLLECTIONS
    // ============================================================================================

    /// Activated rules of one rule group, or of every group in creation
    /// order when no group is named.
    pub fn list_activated_rules_in_rule_group(
        &self,
        request: ListRequest<ActivatedRulesInRuleGroup>,
    ) -> Result<Page<ActivatedRulesInRuleGroup>, ServiceError> {
        admit(&request)?;
        let state = self.state.read();

        let groups: Vec<String> = match &request.scope.rule_group_id {
            Some(id) => {
                lookup::<RuleGroup>(&state, id)?;
                vec![id.clone()]
            }
            None => state
                .rule_groups
                .values()
                .filter_map(|group| group.rule_group_id.clone())
                .collect(),
        };

        let keyed: Vec<(String, ActivatedRule)> = groups
            .iter()
            .flat_map(|group_id| {
                state
                    .group_rules
                    .get(group_id)
                    .into_iter()
                    .flatten()
                    .map(move |rule| {
                        let rule_id = rule.rule_id.as_deref().unwrap_or_default();
                        (format!("{}/{}", group_id, rule_id), rule.clone())
                    })
            })
            .collect();
        let (items, next_marker) = paginate(
            keyed,
            request.next_marker.as_ref(),
            self.config.page_size(request.limit),
        )?;
        Ok(Page { items, next_marker })
    }

    pub fn list_subscribed_rule_groups(
        &self,
        request: ListRequest<SubscribedRuleGroups>,
    ) -> Result<Page<SubscribedRuleGroups>, ServiceError> {
        admit(&request)?;
        let keyed: Vec<(String, SubscribedRuleGroupSummary)> = self
            .config
            .subscribed_rule_groups
            .iter()
            .map(|group| (group.rule_group_id.clone().unwrap_or_default(), group.clone()))
            .collect();
        let (items, next_marker) = paginate(
            keyed,
            request.next_marker.as_ref(),
            self.config.page_size(request.limit),
        )?;
        Ok(Page { items, next_marker })
    }

    // ============================================================================================
    // MIGRATION
    // ============================================================================================

    /// Renders a web ACL and everything it uses as a template for the newer
    /// API and stores it in the named bucket.
    pub fn create_web_acl_migration_stack(
        &self,
        request: CreateWebACLMigrationStackRequest,
    ) -> Result<CreateWebACLMigrationStackResponse, ServiceError> {
        admit(&request)?;
        let web_acl_id = required(&request.web_acl_id, "WebACLId")?;
        let bucket = required(&request.s3_bucket_name, "S3BucketName")?;
        let ignore_unsupported = request.ignore_unsupported_type.unwrap_or(false);

        let mut state = self.state.write();
        let acl = state.web_acls.get(web_acl_id).cloned().ok_or_else(|| {
            ServiceError::migration(
                MigrationErrorType::EntityNotFound,
                format!("WebACL {} does not exist", web_acl_id),
            )
        })?;

        if !bucket.starts_with(MIGRATION_BUCKET_PREFIX) {
            return Err(ServiceError::migration(
                MigrationErrorType::S3BucketNoPermission,
                format!("Bucket names must start with {}", MIGRATION_BUCKET_PREFIX),
            ));
        }
        if !self.config.migration_buckets.contains(bucket) {
            return Err(ServiceError::migration(
                MigrationErrorType::S3BucketNotFound,
                format!("Bucket {} does not exist", bucket),
            ));
        }

        let mut resources = serde_json::Map::new();
        let mut activated = Vec::new();
        for rule in acl.rules() {
            let rule_id = rule.rule_id.as_deref().unwrap_or_default();
            let subscribed = rule.effective_type() == WafRuleType::Group
                && !state.rule_groups.contains(rule_id);
            if subscribed {
                if ignore_unsupported {
                    continue;
                }
                return Err(ServiceError::migration(
                    MigrationErrorType::EntityNotSupported,
                    format!("Subscribed rule group {} cannot be migrated", rule_id),
                ));
            }
            if rule.effective_type() == WafRuleType::RateBased {
                activated.push(self.render_rate_based(&state, rule));
                continue;
            }
            let logical_id = format!("Rule{}", rule.priority.unwrap_or_default());
            resources.insert(logical_id.clone(), self.render_rule(&state, rule_id, rule.effective_type()));
            activated.push(json!({
                "Priority": rule.priority,
                "Rule": {"Ref": logical_id},
                "Action": rule.action,
                "OverrideAction": rule.override_action,
            }));
        }
        resources.insert(
            "WebACL".to_string(),
            json!({
                "Type": "AWS::WAFv2::WebACL",
                "Properties": {
                    "Name": acl.name,
                    "MetricName": acl.metric_name,
                    "DefaultAction": acl.default_action,
                    "Rules": activated,
                }
            }),
        );

        let template = json!({
            "AWSTemplateFormatVersion": "2010-09-09",
            "Description": format!("Migrated from WAF Classic web ACL {}", web_acl_id),
            "Resources": resources,
        })
        .to_string();
        let url = format!(
            "https://{}.s3.amazonaws.com/AWSWAF/{}/{}.json",
            bucket,
            web_acl_id,
            uuid::Uuid::new_v4()
        );
        state.migrations.insert(url.clone(), template);

        info!("Migration stack for web ACL {} written to {}", web_acl_id, url);
        Ok(CreateWebACLMigrationStackResponse {
            s3_object_url: Some(url),
        })
    }

    /// The template stored at a migration stack URL.
    pub fn migration_template(&self, url: &str) -> Option<String> {
        self.state.read().migrations.get(url).cloned()
    }

    /// Rate limits have no standalone resource in the newer API; they become
    /// a rule statement inside the web ACL.
    fn render_rate_based(&self, state: &State, activated: &ActivatedRule) -> Value {
        let rule = activated
            .rule_id
            .as_deref()
            .and_then(|id| state.rate_based_rules.get(id));
        let name = rule.and_then(|r| r.name.clone());
        json!({
            "Name": name,
            "Priority": activated.priority,
            "Action": activated.action,
            "Statement": {
                "RateBasedStatement": {
                    "Limit": rule.and_then(|r| r.rate_limit),
                    "AggregateKeyType": "IP",
                }
            },
            "VisibilityConfig": {
                "MetricName": rule.and_then(|r| r.metric_name.clone()),
                "SampledRequestsEnabled": true,
                "CloudWatchMetricsEnabled": true,
            },
        })
    }

    fn render_rule(&self, state: &State, rule_id: &str, rule_type: WafRuleType) -> Value {
        match rule_type {
            WafRuleType::Group => {
                let group = state.rule_groups.get(rule_id);
                json!({
                    "Type": "AWS::WAFv2::RuleGroup",
                    "Properties": {
                        "Name": group.and_then(|g| g.name.clone()),
                        "Rules": state.group_rules.get(rule_id).cloned().unwrap_or_default(),
                    }
                })
            }
            _ => {
                let rule = state.rules.get(rule_id);
                json!({
                    "Type": "AWS::WAFv2::Rule",
                    "Properties": {
                        "Name": rule.and_then(|r| r.name.clone()),
                        "Predicates": rule.map(|r| r.predicates().to_vec()).unwrap_or_default(),
                    }
                })
            }
        }
    }
}
