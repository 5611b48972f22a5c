// Generic request and response templates.
//
// The service declares a separate flat request/response pair for every
// Create, Get, Update, Delete and List operation of every entity. Those
// pairs differ only in member names, so they are expressed here once,
// parameterised by the `Entity` and `Listing` descriptors. The JSON each
// template produces is identical to the flat per-operation shape.

use crate::entity::{Entity, Listing};
use crate::ids::{ChangeToken, NextMarker};
use crate::resources::Tag;
use crate::rules::{RateBasedRule, Rule, RuleGroup, WafAction, WebACL, MAX_RATE_LIMIT, MIN_RATE_LIMIT};
use crate::update::{take, Update};
use crate::validation::{
    in_range, nested, require, require_known, require_text, require_valid, Validate,
    ValidationError,
};
use crate::vocabulary::RateKey;
use serde::de::{DeserializeOwned, Error as _};
use serde::ser::{Error as _, SerializeMap};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt::Debug;
use std::marker::PhantomData;

/// Largest page a list request may ask for.
pub const MAX_LIST_LIMIT: i32 = 100;

// ============================================================================
// MUTATING REQUESTS
// ============================================================================

/// Body of a request that must carry a change token.
pub trait ChangeBody: Serialize + DeserializeOwned + Validate + Clone + Debug {
    type Output: Serialize + DeserializeOwned + Debug;

    fn operation_name() -> String;

    /// Attaches the change token this request consumes.
    fn with_token(self, token: ChangeToken) -> Mutating<Self> {
        Mutating::new(token, self)
    }
}

/// A change token plus the operation body, flattened into one object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mutating<B> {
    #[serde(rename = "ChangeToken", default, skip_serializing_if = "Option::is_none")]
    pub change_token: Option<ChangeToken>,

    #[serde(flatten)]
    pub body: B,
}

impl<B> Mutating<B> {
    pub fn new(change_token: ChangeToken, body: B) -> Self {
        Self {
            change_token: Some(change_token),
            body,
        }
    }
}

impl<B: Validate> Validate for Mutating<B> {
    fn validate(&self) -> Result<(), ValidationError> {
        match &self.change_token {
            Some(token) if !token.is_empty() => {}
            Some(_) => {
                return Err(ValidationError::InvalidValue {
                    field: "ChangeToken".to_string(),
                    reason: "must not be empty".to_string(),
                })
            }
            None => return Err(ValidationError::MissingField("ChangeToken".to_string())),
        }
        self.body.validate()
    }
}

/// Response of every Update and Delete: the token that was submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeReceipt {
    #[serde(rename = "ChangeToken", default, skip_serializing_if = "Option::is_none")]
    pub change_token: Option<ChangeToken>,
}

impl ChangeReceipt {
    pub fn new(change_token: ChangeToken) -> Self {
        Self {
            change_token: Some(change_token),
        }
    }
}

// ============================================================================
// ENTITY REFERENCE (Get, Delete)
// ============================================================================

/// `{<IdField>: id}`. Used bare as the Get request and under a change token
/// as the Delete request.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityRef<E: Entity> {
    pub id: Option<String>,
    entity: PhantomData<fn() -> E>,
}

impl<E: Entity> EntityRef<E> {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            entity: PhantomData,
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

impl<E: Entity> Validate for EntityRef<E> {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text(E::ID_FIELD, &self.id)
    }
}

impl<E: Entity> Serialize for EntityRef<E> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if let Some(id) = &self.id {
            map.serialize_entry(E::ID_FIELD, id)?;
        }
        map.end()
    }
}

impl<'de, E: Entity> Deserialize<'de> for EntityRef<E> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut map = Map::<String, Value>::deserialize(deserializer)?;
        Ok(Self {
            id: take::<String, D::Error>(&mut map, E::ID_FIELD)?,
            entity: PhantomData,
        })
    }
}

impl<E: Entity> ChangeBody for EntityRef<E> {
    type Output = ChangeReceipt;

    fn operation_name() -> String {
        format!("Delete{}", E::NAME)
    }
}

/// `{<Key>: entity}`.
#[derive(Debug, Clone, PartialEq)]
pub struct GetResponse<E: Entity> {
    pub entity: Option<E>,
}

impl<E: Entity> Serialize for GetResponse<E> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if let Some(entity) = &self.entity {
            map.serialize_entry(E::KEY, entity)?;
        }
        map.end()
    }
}

impl<'de, E: Entity> Deserialize<'de> for GetResponse<E> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut map = Map::<String, Value>::deserialize(deserializer)?;
        Ok(Self {
            entity: take::<E, D::Error>(&mut map, E::KEY)?,
        })
    }
}

// ============================================================================
// CREATE
// ============================================================================

/// `{<Key>: entity, ChangeToken}`.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateResponse<E: Entity> {
    pub entity: Option<E>,
    pub change_token: Option<ChangeToken>,
}

impl<E: Entity> Serialize for CreateResponse<E> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if let Some(entity) = &self.entity {
            map.serialize_entry(E::KEY, entity)?;
        }
        if let Some(token) = &self.change_token {
            map.serialize_entry("ChangeToken", token)?;
        }
        map.end()
    }
}

impl<'de, E: Entity> Deserialize<'de> for CreateResponse<E> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut map = Map::<String, Value>::deserialize(deserializer)?;
        Ok(Self {
            entity: take::<E, D::Error>(&mut map, E::KEY)?,
            change_token: take::<ChangeToken, D::Error>(&mut map, "ChangeToken")?,
        })
    }
}

/// Create body of the condition sets: just a name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct NewSet<E> {
    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip)]
    entity: PhantomData<fn() -> E>,
}

impl<E> NewSet<E> {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            entity: PhantomData,
        }
    }
}

impl<E> Validate for NewSet<E> {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text("Name", &self.name)
    }
}

impl<E: Entity<Spec = NewSet<E>>> ChangeBody for NewSet<E> {
    type Output = CreateResponse<E>;

    fn operation_name() -> String {
        format!("Create{}", E::NAME)
    }
}

fn validate_tags(tags: &Option<Vec<Tag>>) -> Result<(), ValidationError> {
    if let Some(tags) = tags {
        if tags.is_empty() {
            return Err(ValidationError::EmptyCollection("Tags".to_string()));
        }
    }
    nested("Tags", tags)
}

/// Create body of a rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRule {
    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "MetricName", default, skip_serializing_if = "Option::is_none")]
    pub metric_name: Option<String>,

    #[serde(rename = "Tags", default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
}

impl NewRule {
    pub fn new(name: impl Into<String>, metric_name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            metric_name: Some(metric_name.into()),
            tags: None,
        }
    }

    pub fn with_tags(mut self, tags: Vec<Tag>) -> Self {
        self.tags = Some(tags);
        self
    }
}

impl Validate for NewRule {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text("Name", &self.name)?;
        require_text("MetricName", &self.metric_name)?;
        validate_tags(&self.tags)
    }
}

impl ChangeBody for NewRule {
    type Output = CreateResponse<Rule>;

    fn operation_name() -> String {
        "CreateRule".to_string()
    }
}

/// Create body of a rate-based rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRateBasedRule {
    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "MetricName", default, skip_serializing_if = "Option::is_none")]
    pub metric_name: Option<String>,

    #[serde(rename = "RateKey", default, skip_serializing_if = "Option::is_none")]
    pub rate_key: Option<RateKey>,

    #[serde(rename = "RateLimit", default, skip_serializing_if = "Option::is_none")]
    pub rate_limit: Option<i64>,

    #[serde(rename = "Tags", default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
}

impl NewRateBasedRule {
    /// A rule keyed on the source IP, the only rate key the service offers.
    pub fn by_ip(name: impl Into<String>, metric_name: impl Into<String>, rate_limit: i64) -> Self {
        Self {
            name: Some(name.into()),
            metric_name: Some(metric_name.into()),
            rate_key: Some(RateKey::Ip),
            rate_limit: Some(rate_limit),
            tags: None,
        }
    }

    pub fn with_tags(mut self, tags: Vec<Tag>) -> Self {
        self.tags = Some(tags);
        self
    }
}

impl Validate for NewRateBasedRule {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text("Name", &self.name)?;
        require_text("MetricName", &self.metric_name)?;
        require_known("RateKey", &self.rate_key)?;
        require("RateLimit", &self.rate_limit)?;
        in_range(
            "RateLimit",
            self.rate_limit.unwrap_or_default(),
            MIN_RATE_LIMIT,
            MAX_RATE_LIMIT,
        )?;
        validate_tags(&self.tags)
    }
}

impl ChangeBody for NewRateBasedRule {
    type Output = CreateResponse<RateBasedRule>;

    fn operation_name() -> String {
        "CreateRateBasedRule".to_string()
    }
}

/// Create body of a rule group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRuleGroup {
    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "MetricName", default, skip_serializing_if = "Option::is_none")]
    pub metric_name: Option<String>,

    #[serde(rename = "Tags", default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
}

impl NewRuleGroup {
    pub fn new(name: impl Into<String>, metric_name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            metric_name: Some(metric_name.into()),
            tags: None,
        }
    }

    pub fn with_tags(mut self, tags: Vec<Tag>) -> Self {
        self.tags = Some(tags);
        self
    }
}

impl Validate for NewRuleGroup {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text("Name", &self.name)?;
        require_text("MetricName", &self.metric_name)?;
        validate_tags(&self.tags)
    }
}

impl ChangeBody for NewRuleGroup {
    type Output = CreateResponse<RuleGroup>;

    fn operation_name() -> String {
        "CreateRuleGroup".to_string()
    }
}

/// Create body of a web ACL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewWebAcl {
    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "MetricName", default, skip_serializing_if = "Option::is_none")]
    pub metric_name: Option<String>,

    #[serde(rename = "DefaultAction", default, skip_serializing_if = "Option::is_none")]
    pub default_action: Option<WafAction>,

    #[serde(rename = "Tags", default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
}

impl NewWebAcl {
    pub fn new(
        name: impl Into<String>,
        metric_name: impl Into<String>,
        default_action: WafAction,
    ) -> Self {
        Self {
            name: Some(name.into()),
            metric_name: Some(metric_name.into()),
            default_action: Some(default_action),
            tags: None,
        }
    }

    pub fn with_tags(mut self, tags: Vec<Tag>) -> Self {
        self.tags = Some(tags);
        self
    }
}

impl Validate for NewWebAcl {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text("Name", &self.name)?;
        require_text("MetricName", &self.metric_name)?;
        require_valid("DefaultAction", &self.default_action)?;
        validate_tags(&self.tags)
    }
}

impl ChangeBody for NewWebAcl {
    type Output = CreateResponse<WebACL>;

    fn operation_name() -> String {
        "CreateWebACL".to_string()
    }
}

// ============================================================================
// UPDATE
// ============================================================================

/// `{<IdField>: id, Updates: [...], ...extras}`; the service applies the
/// updates as one atomic batch.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch<E: Entity> {
    pub id: Option<String>,
    pub updates: Option<Vec<Update<E::Change>>>,
    pub extras: E::Extras,
}

impl<E: Entity> Batch<E> {
    pub fn new(id: impl Into<String>, updates: Vec<Update<E::Change>>) -> Self {
        Self {
            id: Some(id.into()),
            updates: Some(updates),
            extras: E::Extras::default(),
        }
    }

    pub fn with_extras(mut self, extras: E::Extras) -> Self {
        self.extras = extras;
        self
    }

    pub fn updates(&self) -> &[Update<E::Change>] {
        self.updates.as_deref().unwrap_or(&[])
    }
}

impl<E: Entity> Validate for Batch<E> {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text(E::ID_FIELD, &self.id)?;
        if !E::UPDATES_OPTIONAL {
            require("Updates", &self.updates)?;
        }
        nested("Updates", &self.updates)?;
        self.extras.validate()
    }
}

impl<E: Entity> Serialize for Batch<E> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let extras = serde_json::to_value(&self.extras).map_err(S::Error::custom)?;
        let mut map = serializer.serialize_map(None)?;
        if let Some(id) = &self.id {
            map.serialize_entry(E::ID_FIELD, id)?;
        }
        if let Some(updates) = &self.updates {
            map.serialize_entry("Updates", updates)?;
        }
        if let Value::Object(extras) = extras {
            for (key, value) in &extras {
                map.serialize_entry(key, value)?;
            }
        }
        map.end()
    }
}

impl<'de, E: Entity> Deserialize<'de> for Batch<E> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut map = Map::<String, Value>::deserialize(deserializer)?;
        let id = take::<String, D::Error>(&mut map, E::ID_FIELD)?;
        let updates = take::<Vec<Update<E::Change>>, D::Error>(&mut map, "Updates")?;
        let extras = serde_json::from_value(Value::Object(map)).map_err(D::Error::custom)?;
        Ok(Self { id, updates, extras })
    }
}

impl<E: Entity> ChangeBody for Batch<E> {
    type Output = ChangeReceipt;

    fn operation_name() -> String {
        format!("Update{}", E::NAME)
    }
}

pub type CreateRequest<E> = Mutating<<E as Entity>::Spec>;
pub type GetRequest<E> = EntityRef<E>;
pub type UpdateRequest<E> = Mutating<Batch<E>>;
pub type DeleteRequest<E> = Mutating<EntityRef<E>>;

// ============================================================================
// LIST
// ============================================================================

/// `{Limit, NextMarker, ...scope}`. Both paging members absent asks for the
/// first page at the service's default size.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct ListRequest<L: Listing> {
    #[serde(rename = "NextMarker", default, skip_serializing_if = "Option::is_none")]
    pub next_marker: Option<NextMarker>,

    #[serde(rename = "Limit", default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<i32>,

    #[serde(flatten)]
    pub scope: L::Scope,

    #[serde(skip)]
    listing: PhantomData<fn() -> L>,
}

impl<L: Listing> Clone for ListRequest<L> {
    fn clone(&self) -> Self {
        Self {
            next_marker: self.next_marker.clone(),
            limit: self.limit,
            scope: self.scope.clone(),
            listing: PhantomData,
        }
    }
}

impl<L: Listing> Default for ListRequest<L> {
    fn default() -> Self {
        Self {
            next_marker: None,
            limit: None,
            scope: L::Scope::default(),
            listing: PhantomData,
        }
    }
}

impl<L: Listing> ListRequest<L> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scoped(scope: L::Scope) -> Self {
        Self {
            scope,
            ..Self::default()
        }
    }

    pub fn with_limit(mut self, limit: i32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn after(mut self, marker: NextMarker) -> Self {
        self.next_marker = Some(marker);
        self
    }

    /// The request for the page following `page`, or `None` at the end.
    pub fn next_page(&self, page: &Page<L>) -> Option<Self> {
        page.next_marker
            .clone()
            .map(|marker| self.clone().after(marker))
    }
}

impl<L: Listing> Validate for ListRequest<L> {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(limit) = self.limit {
            in_range("Limit", i64::from(limit), 0, i64::from(MAX_LIST_LIMIT))?;
        }
        self.scope.validate()
    }
}

/// `{<Key>: [...], NextMarker}`. A missing collection reads as empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<L: Listing> {
    pub items: Vec<L::Item>,
    pub next_marker: Option<NextMarker>,
}

impl<L: Listing> Default for Page<L> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            next_marker: None,
        }
    }
}

impl<L: Listing> Page<L> {
    pub fn is_last(&self) -> bool {
        self.next_marker.is_none()
    }
}

impl<L: Listing> Serialize for Page<L> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if let Some(marker) = &self.next_marker {
            map.serialize_entry("NextMarker", marker)?;
        }
        map.serialize_entry(L::KEY, &self.items)?;
        map.end()
    }
}

impl<'de, L: Listing> Deserialize<'de> for Page<L> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut map = Map::<String, Value>::deserialize(deserializer)?;
        Ok(Self {
            items: take::<Vec<L::Item>, D::Error>(&mut map, L::KEY)?.unwrap_or_default(),
            next_marker: take::<NextMarker, D::Error>(&mut map, "NextMarker")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditions::IPSetDescriptor;
    use crate::rules::{ActivatedRule, DefaultActionSetting, Predicate, RateLimitSetting};
    use crate::sets::{ByteMatchSet, IPSet, IPSetSummary};
    use crate::vocabulary::PredicateType;
    use crate::wire;
    use serde_json::json;

    fn token() -> ChangeToken {
        ChangeToken::new("abcd12f2-46da-4fdb-b8d5-fbd4c466928f")
    }

    #[test]
    fn test_create_set_request_shape() {
        let request: CreateRequest<ByteMatchSet> =
            NewSet::<ByteMatchSet>::named("block-bad-bots").with_token(token());
        assert_eq!(
            wire::encode_value(&request).unwrap(),
            json!({
                "ChangeToken": "abcd12f2-46da-4fdb-b8d5-fbd4c466928f",
                "Name": "block-bad-bots"
            })
        );
        let back: CreateRequest<ByteMatchSet> =
            serde_json::from_value(wire::encode_value(&request).unwrap()).unwrap();
        assert_eq!(back, request);
    }

    #[test]
    fn test_missing_change_token_fails_validation() {
        let request = Mutating {
            change_token: None,
            body: NewSet::<IPSet>::named("office"),
        };
        assert_eq!(
            request.validate(),
            Err(ValidationError::MissingField("ChangeToken".into()))
        );
        assert!(wire::encode(&request).is_err());
    }

    #[test]
    fn test_create_response_shape() {
        let response: CreateResponse<ByteMatchSet> = serde_json::from_value(json!({
            "ByteMatchSet": {"ByteMatchSetId": "bms-1", "Name": "block-bad-bots", "ByteMatchTuples": []},
            "ChangeToken": "abcd12f2-46da-4fdb-b8d5-fbd4c466928f"
        }))
        .unwrap();
        assert_eq!(response.change_token, Some(token()));
        let set = response.entity.unwrap();
        assert_eq!(set.byte_match_tuples, Some(vec![]));
    }

    #[test]
    fn test_rate_based_rule_responses_use_rule_key() {
        let response: GetResponse<RateBasedRule> = serde_json::from_value(json!({
            "Rule": {"RuleId": "rbr-1", "RateKey": "IP", "RateLimit": 2000, "MatchPredicates": []}
        }))
        .unwrap();
        assert_eq!(response.entity.unwrap().rate_limit, Some(2000));
    }

    #[test]
    fn test_get_and_delete_requests() {
        let get = GetRequest::<IPSet>::new("ipset-1");
        assert_eq!(serde_json::to_value(&get).unwrap(), json!({"IPSetId": "ipset-1"}));

        let delete: DeleteRequest<WebACL> = EntityRef::new("acl-1").with_token(token());
        let value = wire::encode_value(&delete).unwrap();
        assert_eq!(
            value,
            json!({"ChangeToken": "abcd12f2-46da-4fdb-b8d5-fbd4c466928f", "WebACLId": "acl-1"})
        );
        let back: DeleteRequest<WebACL> = serde_json::from_value(value).unwrap();
        assert_eq!(back.body.id(), Some("acl-1"));
    }

    #[test]
    fn test_update_ip_set_request_shape() {
        let request: UpdateRequest<IPSet> = Batch::<IPSet>::new(
            "ipset-1",
            vec![Update::insert(IPSetDescriptor::ipv4("192.0.2.44/32"))],
        )
        .with_token(token());
        assert_eq!(
            wire::encode_value(&request).unwrap(),
            json!({
                "ChangeToken": "abcd12f2-46da-4fdb-b8d5-fbd4c466928f",
                "IPSetId": "ipset-1",
                "Updates": [{
                    "Action": "INSERT",
                    "IPSetDescriptor": {"Type": "IPV4", "Value": "192.0.2.44/32"}
                }]
            })
        );
    }

    #[test]
    fn test_update_extras_flatten() {
        let request = Batch::<RateBasedRule>::new(
            "rbr-1",
            vec![Update::insert(Predicate::matching(PredicateType::IpMatch, "ipset-1"))],
        )
        .with_extras(RateLimitSetting::new(5000))
        .with_token(token());
        let value = wire::encode_value(&request).unwrap();
        assert_eq!(value["RateLimit"], json!(5000));
        assert_eq!(value["RuleId"], json!("rbr-1"));

        let back: UpdateRequest<RateBasedRule> = serde_json::from_value(value).unwrap();
        assert_eq!(back.body.extras.rate_limit, Some(5000));
        assert_eq!(back.body.updates().len(), 1);

        let missing_limit = Batch::<RateBasedRule>::new("rbr-1", vec![]).with_token(token());
        assert_eq!(
            missing_limit.validate(),
            Err(ValidationError::MissingField("RateLimit".into()))
        );
    }

    #[test]
    fn test_web_acl_update_may_only_change_default_action() {
        let request = Batch::<WebACL> {
            id: Some("acl-1".into()),
            updates: None,
            extras: DefaultActionSetting::new(WafAction::block()),
        }
        .with_token(token());
        assert!(request.validate().is_ok());
        assert_eq!(
            wire::encode_value(&request).unwrap(),
            json!({
                "ChangeToken": "abcd12f2-46da-4fdb-b8d5-fbd4c466928f",
                "WebACLId": "acl-1",
                "DefaultAction": {"Type": "BLOCK"}
            })
        );

        let with_rule = Batch::<WebACL>::new(
            "acl-1",
            vec![Update::insert(ActivatedRule::new(1, "r-1", WafAction::block()))],
        );
        assert!(with_rule.validate().is_ok());
    }

    #[test]
    fn test_set_update_requires_updates() {
        let batch = Batch::<IPSet> {
            id: Some("ipset-1".into()),
            updates: None,
            extras: Default::default(),
        };
        assert_eq!(batch.validate(), Err(ValidationError::MissingField("Updates".into())));
    }

    #[test]
    fn test_list_request_and_page() {
        let request = ListRequest::<IPSet>::new().with_limit(2);
        assert_eq!(serde_json::to_value(&request).unwrap(), json!({"Limit": 2}));
        assert!(ListRequest::<IPSet>::new().with_limit(101).validate().is_err());

        let page: Page<IPSet> = serde_json::from_value(json!({
            "NextMarker": "m-2",
            "IPSets": [
                {"IPSetId": "b", "Name": "second-created"},
                {"IPSetId": "a", "Name": "first-created"}
            ]
        }))
        .unwrap();
        assert_eq!(
            page.items,
            vec![
                IPSetSummary { ip_set_id: Some("b".into()), name: Some("second-created".into()) },
                IPSetSummary { ip_set_id: Some("a".into()), name: Some("first-created".into()) },
            ]
        );

        let next = request.next_page(&page).unwrap();
        assert_eq!(
            serde_json::to_value(&next).unwrap(),
            json!({"NextMarker": "m-2", "Limit": 2})
        );
    }

    #[test]
    fn test_last_page_and_missing_collection() {
        let page: Page<WebACL> = serde_json::from_value(json!({})).unwrap();
        assert!(page.items.is_empty());
        assert!(page.is_last());
        assert!(ListRequest::<WebACL>::new().next_page(&page).is_none());
    }

    #[test]
    fn test_next_page_keeps_scope_across_pages() {
        use crate::operations::ActivatedRulesInRuleGroup;

        let first = ListRequest::<ActivatedRulesInRuleGroup>::in_rule_group("rg-1").with_limit(1);
        let page_one: Page<ActivatedRulesInRuleGroup> = serde_json::from_value(json!({
            "NextMarker": "m-1",
            "ActivatedRules": [{"Priority": 1, "RuleId": "r-1", "Action": {"Type": "BLOCK"}}]
        }))
        .unwrap();

        let second = first.next_page(&page_one).unwrap();
        assert_eq!(
            serde_json::to_value(&second).unwrap(),
            json!({"NextMarker": "m-1", "Limit": 1, "RuleGroupId": "rg-1"})
        );

        let page_two: Page<ActivatedRulesInRuleGroup> = serde_json::from_value(json!({
            "ActivatedRules": [{"Priority": 2, "RuleId": "r-2", "Action": {"Type": "COUNT"}}]
        }))
        .unwrap();
        assert_eq!(page_two.items.len(), 1);
        assert!(second.next_page(&page_two).is_none());
        assert_eq!(first.next_marker, None);
    }
}
