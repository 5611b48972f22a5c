// Per-entity behaviour of the in-memory service: where each entity type is
// stored, what its create call builds, how an update batch changes it, and
// what stops it from being deleted.

use super::State;
use crate::config::BridgeConfig;
use crate::table::Table;
use std::collections::HashSet;
use waf_model::{
    ActivatedRule, Batch, ByteMatchSet, ByteMatchTuple, ChangeAction, Entity, ErrorKind,
    GeoMatchConstraint, GeoMatchSet, IPSet, IPSetDescriptor, NewRateBasedRule, NewRule,
    NewRuleGroup, NewSet, NewWebAcl, ParameterExceptionField, ParameterExceptionReason,
    Predicate, PredicateType, RateBasedRule, RegexMatchSet, RegexMatchTuple, RegexPatternSet,
    RegexPatternString, Rule, RuleGroup, ServiceError, SizeConstraint, SizeConstraintSet,
    SqlInjectionMatchSet, SqlInjectionMatchTuple, Tag, Update, UpdateValue, WafRuleType, WebACL,
    XssMatchSet, XssMatchTuple,
};

/// The parts of a create body the service checks before building.
#[derive(Debug, Clone, Copy)]
pub struct Draft<'a> {
    pub name: Option<&'a str>,
    pub metric_name: Option<&'a str>,
    pub tags: &'a [Tag],
}

/// An entity type `MemoryWaf` can store.
pub trait Stored: Entity {
    /// Resource type segment of the ARN, for entities that have one.
    const ARN_KIND: Option<&'static str> = None;

    /// Result of staging an update batch, written back on commit.
    type Staged;

    fn table(state: &State) -> &Table<Self>;
    fn table_mut(state: &mut State) -> &mut Table<Self>;

    fn draft(spec: &Self::Spec) -> Draft<'_>;

    /// The entity a create call stores and returns.
    fn build(id: &str, spec: &Self::Spec, arn: Option<String>) -> Self;

    /// Checks and applies `batch` to a copy of `current`.
    fn stage(
        state: &State,
        current: &Self,
        batch: &Batch<Self>,
        config: &BridgeConfig,
    ) -> Result<Self::Staged, ServiceError>;

    fn commit(state: &mut State, id: &str, staged: Self::Staged);

    /// Whether the entity still holds values, which blocks deletion.
    fn holds_values(state: &State, entity: &Self) -> bool;

    /// Describes an entity that refers to `id`, if any does.
    fn referenced_by(state: &State, id: &str) -> Option<String>;

    /// Drops state kept outside the entity's table.
    fn forget(_state: &mut State, _id: &str) {}
}

// ================================================================================================
// SHARED UPDATE LOGIC
// ================================================================================================

/// Applies updates in order to a copy of `current`. `same` decides which
/// existing value an update refers to.
fn apply<T: UpdateValue>(
    current: &[T],
    updates: &[Update<T>],
    same: impl Fn(&T, &T) -> bool,
) -> Result<Vec<T>, ServiceError> {
    let mut values = current.to_vec();
    for update in updates {
        let position = values.iter().position(|value| same(value, &update.value));
        match (&update.action, position) {
            (ChangeAction::Insert, None) => values.push(update.value.clone()),
            (ChangeAction::Insert, Some(_)) => {
                return Err(ServiceError::new(
                    ErrorKind::InvalidOperation,
                    format!("Cannot insert a {} that is already present", T::FIELD),
                ))
            }
            (ChangeAction::Delete, Some(index)) => {
                values.remove(index);
            }
            (ChangeAction::Delete, None) => {
                return Err(ServiceError::new(
                    ErrorKind::InvalidOperation,
                    format!("Cannot delete a {} that is not present", T::FIELD),
                ))
            }
            (ChangeAction::Unknown(action), _) => {
                return Err(ServiceError::invalid_parameter(
                    ParameterExceptionField::ChangeAction,
                    ParameterExceptionReason::InvalidOption,
                    action.clone(),
                ))
            }
        }
    }
    Ok(values)
}

fn check_size(what: &str, len: usize, limit: usize) -> Result<(), ServiceError> {
    if len > limit {
        return Err(ServiceError::new(
            ErrorKind::LimitsExceeded,
            format!("A {} can hold at most {} values", what, limit),
        ));
    }
    Ok(())
}

/// Whether the condition set a predicate of `kind` names exists.
fn condition_exists(state: &State, kind: &PredicateType, id: &str) -> bool {
    match kind {
        PredicateType::IpMatch => state.ip_sets.contains(id),
        PredicateType::ByteMatch => state.byte_match_sets.contains(id),
        PredicateType::SqlInjectionMatch => state.sql_injection_match_sets.contains(id),
        PredicateType::GeoMatch => state.geo_match_sets.contains(id),
        PredicateType::SizeConstraint => state.size_constraint_sets.contains(id),
        PredicateType::XssMatch => state.xss_match_sets.contains(id),
        PredicateType::RegexMatch => state.regex_match_sets.contains(id),
        PredicateType::Unknown(_) => false,
    }
}

fn check_predicates(state: &State, updates: &[Update<Predicate>]) -> Result<(), ServiceError> {
    for update in updates.iter().filter(|u| u.is_insert()) {
        let predicate = &update.value;
        let id = predicate.data_id.as_deref().unwrap_or_default();
        let kind = predicate
            .predicate_type
            .clone()
            .unwrap_or_else(|| PredicateType::Unknown(String::new()));
        if !condition_exists(state, &kind, id) {
            return Err(ServiceError::new(
                ErrorKind::NonexistentItem,
                format!("{} condition {} does not exist", kind, id),
            ));
        }
    }
    Ok(())
}

fn same_predicate(a: &Predicate, b: &Predicate) -> bool {
    a.data_id == b.data_id && a.predicate_type == b.predicate_type
}

/// Checks the target and the action members of a rule being activated in
/// a web ACL or, with `in_group`, in a rule group.
fn check_activation(
    state: &State,
    config: &BridgeConfig,
    rule: &ActivatedRule,
    in_group: bool,
) -> Result<(), ServiceError> {
    let id = rule.rule_id.as_deref().unwrap_or_default();
    let rule_type = rule.effective_type();

    let exists = match &rule_type {
        WafRuleType::Regular => state.rules.contains(id),
        WafRuleType::RateBased if !in_group => state.rate_based_rules.contains(id),
        WafRuleType::Group if !in_group => {
            state.rule_groups.contains(id)
                || config
                    .subscribed_rule_groups
                    .iter()
                    .any(|group| group.rule_group_id.as_deref() == Some(id))
        }
        other => {
            return Err(ServiceError::invalid_parameter(
                ParameterExceptionField::RuleType,
                ParameterExceptionReason::IllegalCombination,
                other.as_str(),
            ))
        }
    };
    if !exists {
        return Err(ServiceError::new(
            ErrorKind::NonexistentItem,
            format!("{} rule {} does not exist", rule_type, id),
        ));
    }

    let is_group = rule_type == WafRuleType::Group;
    if is_group && (rule.override_action.is_none() || rule.action.is_some()) {
        return Err(ServiceError::invalid_parameter(
            ParameterExceptionField::WafOverrideAction,
            ParameterExceptionReason::IllegalCombination,
            id,
        ));
    }
    if !is_group && (rule.action.is_none() || rule.override_action.is_some()) {
        return Err(ServiceError::invalid_parameter(
            ParameterExceptionField::WafAction,
            ParameterExceptionReason::IllegalCombination,
            id,
        ));
    }
    let excludes = rule.excluded_rules.as_ref().map_or(false, |rules| !rules.is_empty());
    if !is_group && excludes {
        return Err(ServiceError::invalid_parameter(
            ParameterExceptionField::RuleType,
            ParameterExceptionReason::IllegalCombination,
            rule_type.as_str(),
        ));
    }
    Ok(())
}

/// Stages the activated rules of a web ACL or rule group.
fn stage_activations(
    state: &State,
    config: &BridgeConfig,
    current: &[ActivatedRule],
    updates: &[Update<ActivatedRule>],
    in_group: bool,
) -> Result<Vec<ActivatedRule>, ServiceError> {
    for update in updates.iter().filter(|u| u.is_insert()) {
        check_activation(state, config, &update.value, in_group)?;
    }
    let rules = apply(current, updates, |a, b| a.rule_id == b.rule_id)?;

    let mut priorities = HashSet::new();
    for priority in rules.iter().filter_map(|rule| rule.priority) {
        if !priorities.insert(priority) {
            return Err(ServiceError::new(
                ErrorKind::InvalidParameter,
                format!("Priority {} is used by more than one rule", priority),
            ));
        }
    }
    check_size("web ACL or rule group", rules.len(), config.limits.rules_per_container)?;
    Ok(rules)
}

/// A rule, rate-based rule or regex match set that refers to condition
/// set `id`.
fn condition_referrer(state: &State, id: &str) -> Option<String> {
    let names = |predicates: &[Predicate]| {
        predicates
            .iter()
            .any(|predicate| predicate.data_id.as_deref() == Some(id))
    };
    if let Some(rule) = state.rules.values().find(|rule| names(rule.predicates())) {
        return Some(format!("rule {}", rule.rule_id.as_deref().unwrap_or_default()));
    }
    if let Some(rule) = state.rate_based_rules.values().find(|rule| names(rule.predicates())) {
        return Some(format!(
            "rate-based rule {}",
            rule.rule_id.as_deref().unwrap_or_default()
        ));
    }
    state
        .regex_match_sets
        .values()
        .find(|set| {
            set.values()
                .iter()
                .any(|tuple| tuple.regex_pattern_set_id.as_deref() == Some(id))
        })
        .map(|set| {
            format!(
                "regex match set {}",
                set.regex_match_set_id.as_deref().unwrap_or_default()
            )
        })
}

/// A web ACL or rule group that activates rule `id`.
fn activation_referrer(state: &State, id: &str) -> Option<String> {
    let activates = |rules: &[ActivatedRule]| {
        rules.iter().any(|rule| rule.rule_id.as_deref() == Some(id))
    };
    if let Some(acl) = state.web_acls.values().find(|acl| activates(acl.rules())) {
        return Some(format!(
            "web ACL {}",
            acl.web_acl_id.as_deref().unwrap_or_default()
        ));
    }
    state
        .group_rules
        .iter()
        .find(|(_, rules)| activates(rules))
        .map(|(group_id, _)| format!("rule group {}", group_id))
}

// ================================================================================================
// CONDITION SETS
// ================================================================================================

/// Reference checks a condition value needs before it is inserted.
trait ConditionValue: UpdateValue {
    fn check_references(&self, _state: &State) -> Result<(), ServiceError> {
        Ok(())
    }
}

impl ConditionValue for ByteMatchTuple {}
impl ConditionValue for GeoMatchConstraint {}
impl ConditionValue for IPSetDescriptor {}
impl ConditionValue for RegexPatternString {}
impl ConditionValue for SizeConstraint {}
impl ConditionValue for SqlInjectionMatchTuple {}
impl ConditionValue for XssMatchTuple {}

impl ConditionValue for RegexMatchTuple {
    fn check_references(&self, state: &State) -> Result<(), ServiceError> {
        let id = self.regex_pattern_set_id.as_deref().unwrap_or_default();
        if !state.regex_pattern_sets.contains(id) {
            return Err(ServiceError::new(
                ErrorKind::NonexistentItem,
                format!("RegexPatternSet {} does not exist", id),
            ));
        }
        Ok(())
    }
}

macro_rules! stored_set {
    ($($set:ident: $table:ident, $items:ident, $limit:ident;)+) => {
        $(
            impl Stored for $set {
                type Staged = $set;

                fn table(state: &State) -> &Table<Self> {
                    &state.$table
                }

                fn table_mut(state: &mut State) -> &mut Table<Self> {
                    &mut state.$table
                }

                fn draft(spec: &NewSet<Self>) -> Draft<'_> {
                    Draft {
                        name: spec.name.as_deref(),
                        metric_name: None,
                        tags: &[],
                    }
                }

                fn build(id: &str, spec: &NewSet<Self>, _arn: Option<String>) -> Self {
                    $set::empty(id, spec.name.clone().unwrap_or_default())
                }

                fn stage(
                    state: &State,
                    current: &Self,
                    batch: &Batch<Self>,
                    config: &BridgeConfig,
                ) -> Result<Self, ServiceError> {
                    for update in batch.updates().iter().filter(|u| u.is_insert()) {
                        update.value.check_references(state)?;
                    }
                    let values = apply(current.values(), batch.updates(), |a, b| a == b)?;
                    check_size(stringify!($set), values.len(), config.limits.$limit)?;
                    Ok($set {
                        $items: Some(values),
                        ..current.clone()
                    })
                }

                fn commit(state: &mut State, _id: &str, staged: Self) {
                    state.$table.put(staged);
                }

                fn holds_values(_state: &State, entity: &Self) -> bool {
                    !entity.values().is_empty()
                }

                fn referenced_by(state: &State, id: &str) -> Option<String> {
                    condition_referrer(state, id)
                }
            }
        )+
    };
}

stored_set! {
    ByteMatchSet: byte_match_sets, byte_match_tuples, values_per_set;
    GeoMatchSet: geo_match_sets, geo_match_constraints, values_per_set;
    IPSet: ip_sets, ip_set_descriptors, descriptors_per_ip_set;
    RegexMatchSet: regex_match_sets, regex_match_tuples, values_per_set;
    RegexPatternSet: regex_pattern_sets, regex_pattern_strings, values_per_set;
    SizeConstraintSet: size_constraint_sets, size_constraints, values_per_set;
    SqlInjectionMatchSet: sql_injection_match_sets, sql_injection_match_tuples, values_per_set;
    XssMatchSet: xss_match_sets, xss_match_tuples, values_per_set;
}

// ================================================================================================
// RULES
// ================================================================================================

impl Stored for Rule {
    const ARN_KIND: Option<&'static str> = Some("rule");

    type Staged = Rule;

    fn table(state: &State) -> &Table<Self> {
        &state.rules
    }

    fn table_mut(state: &mut State) -> &mut Table<Self> {
        &mut state.rules
    }

    fn draft(spec: &NewRule) -> Draft<'_> {
        Draft {
            name: spec.name.as_deref(),
            metric_name: spec.metric_name.as_deref(),
            tags: spec.tags.as_deref().unwrap_or(&[]),
        }
    }

    fn build(id: &str, spec: &NewRule, _arn: Option<String>) -> Self {
        Rule {
            rule_id: Some(id.to_string()),
            name: spec.name.clone(),
            metric_name: spec.metric_name.clone(),
            predicates: Some(Vec::new()),
        }
    }

    fn stage(
        state: &State,
        current: &Self,
        batch: &Batch<Self>,
        config: &BridgeConfig,
    ) -> Result<Self, ServiceError> {
        check_predicates(state, batch.updates())?;
        let predicates = apply(current.predicates(), batch.updates(), same_predicate)?;
        check_size("rule", predicates.len(), config.limits.predicates_per_rule)?;
        Ok(Rule {
            predicates: Some(predicates),
            ..current.clone()
        })
    }

    fn commit(state: &mut State, _id: &str, staged: Self) {
        state.rules.put(staged);
    }

    fn holds_values(_state: &State, entity: &Self) -> bool {
        !entity.predicates().is_empty()
    }

    fn referenced_by(state: &State, id: &str) -> Option<String> {
        activation_referrer(state, id)
    }
}

impl Stored for RateBasedRule {
    const ARN_KIND: Option<&'static str> = Some("ratebasedrule");

    type Staged = RateBasedRule;

    fn table(state: &State) -> &Table<Self> {
        &state.rate_based_rules
    }

    fn table_mut(state: &mut State) -> &mut Table<Self> {
        &mut state.rate_based_rules
    }

    fn draft(spec: &NewRateBasedRule) -> Draft<'_> {
        Draft {
            name: spec.name.as_deref(),
            metric_name: spec.metric_name.as_deref(),
            tags: spec.tags.as_deref().unwrap_or(&[]),
        }
    }

    fn build(id: &str, spec: &NewRateBasedRule, _arn: Option<String>) -> Self {
        RateBasedRule {
            rule_id: Some(id.to_string()),
            name: spec.name.clone(),
            metric_name: spec.metric_name.clone(),
            match_predicates: Some(Vec::new()),
            rate_key: spec.rate_key.clone(),
            rate_limit: spec.rate_limit,
        }
    }

    fn stage(
        state: &State,
        current: &Self,
        batch: &Batch<Self>,
        config: &BridgeConfig,
    ) -> Result<Self, ServiceError> {
        check_predicates(state, batch.updates())?;
        let predicates = apply(current.predicates(), batch.updates(), same_predicate)?;
        check_size("rate-based rule", predicates.len(), config.limits.predicates_per_rule)?;
        Ok(RateBasedRule {
            match_predicates: Some(predicates),
            rate_limit: batch.extras.rate_limit.or(current.rate_limit),
            ..current.clone()
        })
    }

    fn commit(state: &mut State, _id: &str, staged: Self) {
        state.rate_based_rules.put(staged);
    }

    fn holds_values(_state: &State, entity: &Self) -> bool {
        !entity.predicates().is_empty()
    }

    fn referenced_by(state: &State, id: &str) -> Option<String> {
        activation_referrer(state, id)
    }

    fn forget(state: &mut State, id: &str) {
        state.traffic.remove(id);
    }
}

// ================================================================================================
// RULE GROUPS AND WEB ACLS
// ================================================================================================

impl Stored for RuleGroup {
    const ARN_KIND: Option<&'static str> = Some("rulegroup");

    type Staged = Vec<ActivatedRule>;

    fn table(state: &State) -> &Table<Self> {
        &state.rule_groups
    }

    fn table_mut(state: &mut State) -> &mut Table<Self> {
        &mut state.rule_groups
    }

    fn draft(spec: &NewRuleGroup) -> Draft<'_> {
        Draft {
            name: spec.name.as_deref(),
            metric_name: spec.metric_name.as_deref(),
            tags: spec.tags.as_deref().unwrap_or(&[]),
        }
    }

    fn build(id: &str, spec: &NewRuleGroup, _arn: Option<String>) -> Self {
        RuleGroup {
            rule_group_id: Some(id.to_string()),
            name: spec.name.clone(),
            metric_name: spec.metric_name.clone(),
        }
    }

    fn stage(
        state: &State,
        current: &Self,
        batch: &Batch<Self>,
        config: &BridgeConfig,
    ) -> Result<Vec<ActivatedRule>, ServiceError> {
        let id = current.rule_group_id.as_deref().unwrap_or_default();
        let rules = state.group_rules.get(id).map(Vec::as_slice).unwrap_or(&[]);
        stage_activations(state, config, rules, batch.updates(), true)
    }

    fn commit(state: &mut State, id: &str, staged: Vec<ActivatedRule>) {
        state.group_rules.insert(id.to_string(), staged);
    }

    fn holds_values(state: &State, entity: &Self) -> bool {
        let id = entity.rule_group_id.as_deref().unwrap_or_default();
        state.group_rules.get(id).map_or(false, |rules| !rules.is_empty())
    }

    fn referenced_by(state: &State, id: &str) -> Option<String> {
        activation_referrer(state, id)
    }

    fn forget(state: &mut State, id: &str) {
        state.group_rules.remove(id);
    }
}

impl Stored for WebACL {
    const ARN_KIND: Option<&'static str> = Some("webacl");

    type Staged = WebACL;

    fn table(state: &State) -> &Table<Self> {
        &state.web_acls
    }

    fn table_mut(state: &mut State) -> &mut Table<Self> {
        &mut state.web_acls
    }

    fn draft(spec: &NewWebAcl) -> Draft<'_> {
        Draft {
            name: spec.name.as_deref(),
            metric_name: spec.metric_name.as_deref(),
            tags: spec.tags.as_deref().unwrap_or(&[]),
        }
    }

    fn build(id: &str, spec: &NewWebAcl, arn: Option<String>) -> Self {
        WebACL {
            web_acl_id: Some(id.to_string()),
            name: spec.name.clone(),
            metric_name: spec.metric_name.clone(),
            default_action: spec.default_action.clone(),
            rules: Some(Vec::new()),
            web_acl_arn: arn,
        }
    }

    fn stage(
        state: &State,
        current: &Self,
        batch: &Batch<Self>,
        config: &BridgeConfig,
    ) -> Result<Self, ServiceError> {
        let rules = stage_activations(state, config, current.rules(), batch.updates(), false)?;
        Ok(WebACL {
            rules: Some(rules),
            default_action: batch
                .extras
                .default_action
                .clone()
                .or_else(|| current.default_action.clone()),
            ..current.clone()
        })
    }

    fn commit(state: &mut State, _id: &str, staged: Self) {
        state.web_acls.put(staged);
    }

    fn holds_values(_state: &State, entity: &Self) -> bool {
        !entity.rules().is_empty()
    }

    fn referenced_by(_state: &State, _id: &str) -> Option<String> {
        None
    }

    fn forget(state: &mut State, id: &str) {
        state.samples.retain(|(web_acl_id, _), _| web_acl_id != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waf_model::{WafAction, WafOverrideAction};

    fn state_with_rule(id: &str) -> State {
        let mut state = State::default();
        state.rules.put(Rule {
            rule_id: Some(id.to_string()),
            predicates: Some(vec![]),
            ..Default::default()
        });
        state
    }

    #[test]
    fn test_apply_in_order() {
        let a = IPSetDescriptor::ipv4("192.0.2.0/24");
        let b = IPSetDescriptor::ipv4("198.51.100.0/24");
        let values = apply(
            &[a.clone()],
            &[Update::insert(b.clone()), Update::delete(a.clone()), Update::insert(a.clone())],
            |x, y| x == y,
        )
        .unwrap();
        assert_eq!(values, vec![b, a]);
    }

    #[test]
    fn test_duplicate_priority_rejected() {
        let state = state_with_rule("r-1");
        let config = BridgeConfig::default();
        let current = vec![ActivatedRule::new(1, "r-1", WafAction::block())];
        let mut other = state_with_rule("r-2");
        other.rules.put(Rule {
            rule_id: Some("r-1".into()),
            predicates: Some(vec![]),
            ..Default::default()
        });

        let err = stage_activations(
            &other,
            &config,
            &current,
            &[Update::insert(ActivatedRule::new(1, "r-2", WafAction::allow()))],
            false,
        )
        .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidParameter);
        assert!(stage_activations(&state, &config, &current, &[], false).is_ok());
    }

    #[test]
    fn test_group_activation_needs_override_action() {
        let mut state = State::default();
        state.rule_groups.put(RuleGroup {
            rule_group_id: Some("g-1".into()),
            ..Default::default()
        });
        let config = BridgeConfig::default();

        let mut group = ActivatedRule::group(1, "g-1", WafOverrideAction::none());
        assert!(check_activation(&state, &config, &group, false).is_ok());

        group.action = Some(WafAction::block());
        let err = check_activation(&state, &config, &group, false).unwrap_err();
        assert_eq!(err.field, Some(ParameterExceptionField::WafOverrideAction));
        assert_eq!(err.reason, Some(ParameterExceptionReason::IllegalCombination));
    }

    #[test]
    fn test_regular_activation_needs_action() {
        let state = state_with_rule("r-1");
        let config = BridgeConfig::default();
        let mut rule = ActivatedRule::new(1, "r-1", WafAction::block());
        rule.action = None;
        let err = check_activation(&state, &config, &rule, false).unwrap_err();
        assert_eq!(err.field, Some(ParameterExceptionField::WafAction));
    }

    #[test]
    fn test_rule_groups_hold_only_regular_rules() {
        let state = State::default();
        let config = BridgeConfig::default();
        let rule = ActivatedRule::rate_based(1, "rbr-1", WafAction::block());
        let err = check_activation(&state, &config, &rule, true).unwrap_err();
        assert_eq!(err.field, Some(ParameterExceptionField::RuleType));
    }

    #[test]
    fn test_subscribed_group_can_be_activated() {
        let state = State::default();
        let mut config = BridgeConfig::default();
        config.subscribed_rule_groups.push(waf_model::SubscribedRuleGroupSummary {
            rule_group_id: Some("marketplace-1".into()),
            name: Some("Managed".into()),
            metric_name: Some("Managed".into()),
        });
        let rule = ActivatedRule::group(1, "marketplace-1", WafOverrideAction::count());
        assert!(check_activation(&state, &config, &rule, false).is_ok());
    }

    #[test]
    fn test_regex_match_tuple_needs_pattern_set() {
        let state = State::default();
        let tuple = RegexMatchTuple::new(
            waf_model::FieldToMatch::uri(),
            waf_model::TextTransformation::None,
            "missing",
        );
        let err = tuple.check_references(&state).unwrap_err();
        assert_eq!(err.kind, ErrorKind::NonexistentItem);
    }

    #[test]
    fn test_activation_referrer_names_web_acl() {
        let mut state = state_with_rule("r-1");
        state.web_acls.put(WebACL {
            web_acl_id: Some("acl-1".into()),
            rules: Some(vec![ActivatedRule::new(1, "r-1", WafAction::block())]),
            ..Default::default()
        });
        assert_eq!(activation_referrer(&state, "r-1"), Some("web ACL acl-1".to_string()));
        assert_eq!(activation_referrer(&state, "r-2"), None);
    }
}
