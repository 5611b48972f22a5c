// Rules and the containers that activate them.
//
// A rule ANDs its predicates; each predicate points at one condition set.
// Rule groups and web ACLs hold activated rules, each binding a rule to a
// priority and an action (or, for a group, an override action).

use crate::entity::{entity_listing, Entity, NoExtras};
use crate::envelope::{NewRateBasedRule, NewRule, NewRuleGroup, NewWebAcl};
use crate::validation::{
    in_range, known, nested, require, require_known, require_text, require_valid, Validate,
    ValidationError,
};
use crate::vocabulary::{PredicateType, RateKey, WafActionType, WafOverrideActionType, WafRuleType};
use serde::{Deserialize, Serialize};

/// Smallest request count per five-minute window a rate-based rule accepts.
pub const MIN_RATE_LIMIT: i64 = 100;
pub const MAX_RATE_LIMIT: i64 = 2_000_000_000;

// ============================================================================
// ACTIONS
// ============================================================================

/// What to do with a request that matches a rule, or with every request
/// that matches no rule when used as a web ACL's default action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WafAction {
    #[serde(rename = "Type", default, skip_serializing_if = "Option::is_none")]
    pub action_type: Option<WafActionType>,
}

impl WafAction {
    pub fn new(action_type: WafActionType) -> Self {
        Self {
            action_type: Some(action_type),
        }
    }

    pub fn allow() -> Self {
        Self::new(WafActionType::Allow)
    }

    pub fn block() -> Self {
        Self::new(WafActionType::Block)
    }

    pub fn count() -> Self {
        Self::new(WafActionType::Count)
    }
}

impl Validate for WafAction {
    fn validate(&self) -> Result<(), ValidationError> {
        require_known("Type", &self.action_type)
    }
}

/// Overrides the actions of the rules inside a rule group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WafOverrideAction {
    #[serde(rename = "Type", default, skip_serializing_if = "Option::is_none")]
    pub action_type: Option<WafOverrideActionType>,
}

impl WafOverrideAction {
    pub fn new(action_type: WafOverrideActionType) -> Self {
        Self {
            action_type: Some(action_type),
        }
    }

    /// Keep the group's own rule actions.
    pub fn none() -> Self {
        Self::new(WafOverrideActionType::None)
    }

    pub fn count() -> Self {
        Self::new(WafOverrideActionType::Count)
    }
}

impl Validate for WafOverrideAction {
    fn validate(&self) -> Result<(), ValidationError> {
        require_known("Type", &self.action_type)
    }
}

// ============================================================================
// PREDICATES AND ACTIVATED RULES
// ============================================================================

/// Reference to one condition set. `Negated` inverts the match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Predicate {
    #[serde(rename = "Negated", default, skip_serializing_if = "Option::is_none")]
    pub negated: Option<bool>,

    #[serde(rename = "Type", default, skip_serializing_if = "Option::is_none")]
    pub predicate_type: Option<PredicateType>,

    #[serde(rename = "DataId", default, skip_serializing_if = "Option::is_none")]
    pub data_id: Option<String>,
}

impl Predicate {
    pub fn new(predicate_type: PredicateType, data_id: impl Into<String>, negated: bool) -> Self {
        Self {
            negated: Some(negated),
            predicate_type: Some(predicate_type),
            data_id: Some(data_id.into()),
        }
    }

    /// Matches requests the referenced set matches.
    pub fn matching(predicate_type: PredicateType, data_id: impl Into<String>) -> Self {
        Self::new(predicate_type, data_id, false)
    }

    /// Matches requests the referenced set does not match.
    pub fn negated(predicate_type: PredicateType, data_id: impl Into<String>) -> Self {
        Self::new(predicate_type, data_id, true)
    }
}

impl Validate for Predicate {
    fn validate(&self) -> Result<(), ValidationError> {
        require("Negated", &self.negated)?;
        require_known("Type", &self.predicate_type)?;
        require_text("DataId", &self.data_id)
    }
}

/// A rule inside a rule group that should only count matches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExcludedRule {
    #[serde(rename = "RuleId", default, skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,
}

impl ExcludedRule {
    pub fn new(rule_id: impl Into<String>) -> Self {
        Self {
            rule_id: Some(rule_id.into()),
        }
    }
}

impl Validate for ExcludedRule {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text("RuleId", &self.rule_id)
    }
}

/// A rule bound into a web ACL or rule group.
///
/// Rules are evaluated in ascending `Priority`; priorities need not be
/// consecutive but must be unique within the container. A `GROUP` entry
/// refers to a rule group and carries `OverrideAction` instead of `Action`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActivatedRule {
    #[serde(rename = "Priority", default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,

    #[serde(rename = "RuleId", default, skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,

    #[serde(rename = "Action", default, skip_serializing_if = "Option::is_none")]
    pub action: Option<WafAction>,

    #[serde(rename = "OverrideAction", default, skip_serializing_if = "Option::is_none")]
    pub override_action: Option<WafOverrideAction>,

    #[serde(rename = "Type", default, skip_serializing_if = "Option::is_none")]
    pub rule_type: Option<WafRuleType>,

    #[serde(rename = "ExcludedRules", default, skip_serializing_if = "Option::is_none")]
    pub excluded_rules: Option<Vec<ExcludedRule>>,
}

impl ActivatedRule {
    /// A regular rule with the given action.
    pub fn new(priority: i32, rule_id: impl Into<String>, action: WafAction) -> Self {
        Self {
            priority: Some(priority),
            rule_id: Some(rule_id.into()),
            action: Some(action),
            override_action: None,
            rule_type: Some(WafRuleType::Regular),
            excluded_rules: None,
        }
    }

    /// A rate-based rule with the given action.
    pub fn rate_based(priority: i32, rule_id: impl Into<String>, action: WafAction) -> Self {
        Self {
            rule_type: Some(WafRuleType::RateBased),
            ..Self::new(priority, rule_id, action)
        }
    }

    /// A rule group, whose rules keep or override their own actions.
    pub fn group(
        priority: i32,
        rule_group_id: impl Into<String>,
        override_action: WafOverrideAction,
    ) -> Self {
        Self {
            priority: Some(priority),
            rule_id: Some(rule_group_id.into()),
            action: None,
            override_action: Some(override_action),
            rule_type: Some(WafRuleType::Group),
            excluded_rules: None,
        }
    }

    pub fn with_excluded_rules(mut self, rule_ids: impl IntoIterator<Item = String>) -> Self {
        self.excluded_rules = Some(rule_ids.into_iter().map(ExcludedRule::new).collect());
        self
    }

    /// The rule type, `REGULAR` when unset.
    pub fn effective_type(&self) -> WafRuleType {
        self.rule_type.clone().unwrap_or_default()
    }
}

impl Validate for ActivatedRule {
    fn validate(&self) -> Result<(), ValidationError> {
        require("Priority", &self.priority)?;
        require_text("RuleId", &self.rule_id)?;
        nested("Action", &self.action)?;
        nested("OverrideAction", &self.override_action)?;
        known("Type", &self.rule_type)?;
        nested("ExcludedRules", &self.excluded_rules)
    }
}

// ============================================================================
// RULES
// ============================================================================

/// Predicates that, all matching, identify requests to act on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    #[serde(rename = "RuleId", default, skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,

    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "MetricName", default, skip_serializing_if = "Option::is_none")]
    pub metric_name: Option<String>,

    #[serde(rename = "Predicates", default, skip_serializing_if = "Option::is_none")]
    pub predicates: Option<Vec<Predicate>>,
}

impl Rule {
    pub fn predicates(&self) -> &[Predicate] {
        self.predicates.as_deref().unwrap_or(&[])
    }
}

impl Validate for Rule {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text("RuleId", &self.rule_id)?;
        require("Predicates", &self.predicates)?;
        nested("Predicates", &self.predicates)
    }
}

/// A rule that also counts requests per source address and only acts on
/// addresses exceeding `RateLimit` in a trailing five-minute window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateBasedRule {
    #[serde(rename = "RuleId", default, skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,

    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "MetricName", default, skip_serializing_if = "Option::is_none")]
    pub metric_name: Option<String>,

    #[serde(rename = "MatchPredicates", default, skip_serializing_if = "Option::is_none")]
    pub match_predicates: Option<Vec<Predicate>>,

    #[serde(rename = "RateKey", default, skip_serializing_if = "Option::is_none")]
    pub rate_key: Option<RateKey>,

    #[serde(rename = "RateLimit", default, skip_serializing_if = "Option::is_none")]
    pub rate_limit: Option<i64>,
}

impl RateBasedRule {
    pub fn predicates(&self) -> &[Predicate] {
        self.match_predicates.as_deref().unwrap_or(&[])
    }
}

impl Validate for RateBasedRule {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text("RuleId", &self.rule_id)?;
        require("MatchPredicates", &self.match_predicates)?;
        nested("MatchPredicates", &self.match_predicates)?;
        require_known("RateKey", &self.rate_key)?;
        require("RateLimit", &self.rate_limit)
    }
}

/// Rules bundled for reuse. Its activated rules are listed separately.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleGroup {
    #[serde(rename = "RuleGroupId", default, skip_serializing_if = "Option::is_none")]
    pub rule_group_id: Option<String>,

    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "MetricName", default, skip_serializing_if = "Option::is_none")]
    pub metric_name: Option<String>,
}

impl Validate for RuleGroup {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text("RuleGroupId", &self.rule_group_id)
    }
}

/// The top-level policy: a default action plus prioritised rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebACL {
    #[serde(rename = "WebACLId", default, skip_serializing_if = "Option::is_none")]
    pub web_acl_id: Option<String>,

    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "MetricName", default, skip_serializing_if = "Option::is_none")]
    pub metric_name: Option<String>,

    #[serde(rename = "DefaultAction", default, skip_serializing_if = "Option::is_none")]
    pub default_action: Option<WafAction>,

    #[serde(rename = "Rules", default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<ActivatedRule>>,

    #[serde(rename = "WebACLArn", default, skip_serializing_if = "Option::is_none")]
    pub web_acl_arn: Option<String>,
}

impl WebACL {
    pub fn rules(&self) -> &[ActivatedRule] {
        self.rules.as_deref().unwrap_or(&[])
    }
}

impl Validate for WebACL {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text("WebACLId", &self.web_acl_id)?;
        require_valid("DefaultAction", &self.default_action)?;
        require("Rules", &self.rules)?;
        nested("Rules", &self.rules)
    }
}

// ============================================================================
// SUMMARIES
// ============================================================================

/// List entry for both regular and rate-based rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSummary {
    #[serde(rename = "RuleId", default, skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,

    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleGroupSummary {
    #[serde(rename = "RuleGroupId", default, skip_serializing_if = "Option::is_none")]
    pub rule_group_id: Option<String>,

    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// A third-party rule group the account subscribes to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscribedRuleGroupSummary {
    #[serde(rename = "RuleGroupId", default, skip_serializing_if = "Option::is_none")]
    pub rule_group_id: Option<String>,

    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "MetricName", default, skip_serializing_if = "Option::is_none")]
    pub metric_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebACLSummary {
    #[serde(rename = "WebACLId", default, skip_serializing_if = "Option::is_none")]
    pub web_acl_id: Option<String>,

    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

// ============================================================================
// UPDATE EXTRAS
// ============================================================================

/// `RateLimit` member of UpdateRateBasedRule. The service requires it on
/// every update, even one that leaves the limit unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitSetting {
    #[serde(rename = "RateLimit", default, skip_serializing_if = "Option::is_none")]
    pub rate_limit: Option<i64>,
}

impl RateLimitSetting {
    pub fn new(rate_limit: i64) -> Self {
        Self {
            rate_limit: Some(rate_limit),
        }
    }
}

impl Validate for RateLimitSetting {
    fn validate(&self) -> Result<(), ValidationError> {
        require("RateLimit", &self.rate_limit)?;
        in_range(
            "RateLimit",
            self.rate_limit.unwrap_or_default(),
            MIN_RATE_LIMIT,
            MAX_RATE_LIMIT,
        )
    }
}

/// Optional `DefaultAction` member of UpdateWebACL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultActionSetting {
    #[serde(rename = "DefaultAction", default, skip_serializing_if = "Option::is_none")]
    pub default_action: Option<WafAction>,
}

impl DefaultActionSetting {
    pub fn new(default_action: WafAction) -> Self {
        Self {
            default_action: Some(default_action),
        }
    }
}

impl Validate for DefaultActionSetting {
    fn validate(&self) -> Result<(), ValidationError> {
        nested("DefaultAction", &self.default_action)
    }
}

// ============================================================================
// ENTITY DESCRIPTORS
// ============================================================================

impl Entity for Rule {
    const NAME: &'static str = "Rule";
    const PLURAL: &'static str = "Rules";
    const ID_FIELD: &'static str = "RuleId";
    const KEY: &'static str = "Rule";

    type Summary = RuleSummary;
    type Change = Predicate;
    type Spec = NewRule;
    type Extras = NoExtras;

    fn id(&self) -> Option<&str> {
        self.rule_id.as_deref()
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn summary(&self) -> RuleSummary {
        RuleSummary {
            rule_id: self.rule_id.clone(),
            name: self.name.clone(),
        }
    }
}

impl Entity for RateBasedRule {
    const NAME: &'static str = "RateBasedRule";
    const PLURAL: &'static str = "RateBasedRules";
    const ID_FIELD: &'static str = "RuleId";
    const KEY: &'static str = "Rule";

    type Summary = RuleSummary;
    type Change = Predicate;
    type Spec = NewRateBasedRule;
    type Extras = RateLimitSetting;

    fn id(&self) -> Option<&str> {
        self.rule_id.as_deref()
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn summary(&self) -> RuleSummary {
        RuleSummary {
            rule_id: self.rule_id.clone(),
            name: self.name.clone(),
        }
    }
}

impl Entity for RuleGroup {
    const NAME: &'static str = "RuleGroup";
    const PLURAL: &'static str = "RuleGroups";
    const ID_FIELD: &'static str = "RuleGroupId";
    const KEY: &'static str = "RuleGroup";

    type Summary = RuleGroupSummary;
    type Change = ActivatedRule;
    type Spec = NewRuleGroup;
    type Extras = NoExtras;

    fn id(&self) -> Option<&str> {
        self.rule_group_id.as_deref()
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn summary(&self) -> RuleGroupSummary {
        RuleGroupSummary {
            rule_group_id: self.rule_group_id.clone(),
            name: self.name.clone(),
        }
    }
}

impl Entity for WebACL {
    const NAME: &'static str = "WebACL";
    const PLURAL: &'static str = "WebACLs";
    const ID_FIELD: &'static str = "WebACLId";
    const KEY: &'static str = "WebACL";
    const UPDATES_OPTIONAL: bool = true;

    type Summary = WebACLSummary;
    type Change = ActivatedRule;
    type Spec = NewWebAcl;
    type Extras = DefaultActionSetting;

    fn id(&self) -> Option<&str> {
        self.web_acl_id.as_deref()
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn summary(&self) -> WebACLSummary {
        WebACLSummary {
            web_acl_id: self.web_acl_id.clone(),
            name: self.name.clone(),
        }
    }
}

entity_listing!(Rule, "ListRules", "Rules");
entity_listing!(RateBasedRule, "ListRateBasedRules", "Rules");
entity_listing!(RuleGroup, "ListRuleGroups", "RuleGroups");
entity_listing!(WebACL, "ListWebACLs", "WebACLs");

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_activated_rule_wire_shape() {
        let rule = ActivatedRule::new(1, "WAFRule-1-Example", WafAction::block());
        assert_eq!(
            serde_json::to_value(&rule).unwrap(),
            json!({
                "Priority": 1,
                "RuleId": "WAFRule-1-Example",
                "Action": {"Type": "BLOCK"},
                "Type": "REGULAR"
            })
        );
    }

    #[test]
    fn test_group_entry_carries_override_action() {
        let rule = ActivatedRule::group(5, "rg-1", WafOverrideAction::none())
            .with_excluded_rules(vec!["r-7".to_string()]);
        let value = serde_json::to_value(&rule).unwrap();
        assert_eq!(value["OverrideAction"], json!({"Type": "NONE"}));
        assert_eq!(value["ExcludedRules"], json!([{"RuleId": "r-7"}]));
        assert!(value.get("Action").is_none());
        assert_eq!(rule.effective_type(), WafRuleType::Group);
    }

    #[test]
    fn test_missing_type_defaults_to_regular() {
        let rule: ActivatedRule =
            serde_json::from_value(json!({"Priority": 2, "RuleId": "r"})).unwrap();
        assert_eq!(rule.rule_type, None);
        assert_eq!(rule.effective_type(), WafRuleType::Regular);
        assert!(rule.validate().is_ok());
    }

    #[test]
    fn test_predicate_requires_all_members() {
        let predicate = Predicate::matching(PredicateType::IpMatch, "ipset-1");
        assert_eq!(
            serde_json::to_value(&predicate).unwrap(),
            json!({"Negated": false, "Type": "IPMatch", "DataId": "ipset-1"})
        );
        assert!(predicate.validate().is_ok());
        assert_eq!(
            Predicate::default().validate(),
            Err(ValidationError::MissingField("Negated".into()))
        );
    }

    #[test]
    fn test_web_acl_requires_default_action_and_rules() {
        let acl: WebACL = serde_json::from_value(json!({
            "WebACLId": "acl-1",
            "Rules": []
        }))
        .unwrap();
        assert_eq!(
            acl.validate(),
            Err(ValidationError::MissingField("DefaultAction".into()))
        );

        let acl: WebACL = serde_json::from_value(json!({
            "WebACLId": "acl-1",
            "DefaultAction": {"Type": "ALLOW"},
            "Rules": [{"Priority": 1}],
            "WebACLArn": "arn:aws:waf::123456789012:webacl/acl-1"
        }))
        .unwrap();
        assert_eq!(
            acl.validate(),
            Err(ValidationError::MissingField("Rules[0].RuleId".into()))
        );
    }

    #[test]
    fn test_rate_limit_setting_bounds() {
        assert!(RateLimitSetting::new(2000).validate().is_ok());
        assert!(RateLimitSetting::new(99).validate().is_err());
        assert_eq!(
            RateLimitSetting::default().validate(),
            Err(ValidationError::MissingField("RateLimit".into()))
        );
    }

    #[test]
    fn test_rate_based_rule_decodes() {
        let rule: RateBasedRule = serde_json::from_value(json!({
            "RuleId": "rbr-1",
            "Name": "throttle",
            "MetricName": "throttle",
            "MatchPredicates": [],
            "RateKey": "IP",
            "RateLimit": 2000
        }))
        .unwrap();
        assert!(rule.validate().is_ok());
        assert_eq!(rule.summary().rule_id.as_deref(), Some("rbr-1"));
    }
}
