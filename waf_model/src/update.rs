// Update envelopes: one INSERT or DELETE of exactly one value.
//
// The service names the value member after the value's type
// (`ByteMatchTuple`, `IPSetDescriptor`, `Predicate`, ...), so one generic
// envelope covers every update operation and the member name comes from
// `UpdateValue::FIELD`.

use crate::conditions::{
    ByteMatchTuple, GeoMatchConstraint, IPSetDescriptor, RegexMatchTuple, RegexPatternString,
    SizeConstraint, SqlInjectionMatchTuple, XssMatchTuple,
};
use crate::rules::{ActivatedRule, Predicate};
use crate::validation::{known, nested, Validate, ValidationError};
use crate::vocabulary::ChangeAction;
use serde::de::{DeserializeOwned, Error as _};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt::Debug;

/// A value that can be inserted into or deleted from a container.
pub trait UpdateValue:
    Serialize + DeserializeOwned + Validate + Clone + Debug + PartialEq + Send + Sync + 'static
{
    /// Member name of the value inside an update envelope.
    const FIELD: &'static str;
}

/// One change to a container: an action and the value it applies to.
#[derive(Debug, Clone, PartialEq)]
pub struct Update<T> {
    pub action: ChangeAction,
    pub value: T,
}

impl<T: UpdateValue> Update<T> {
    pub fn new(action: ChangeAction, value: T) -> Self {
        Self { action, value }
    }

    pub fn insert(value: T) -> Self {
        Self::new(ChangeAction::Insert, value)
    }

    pub fn delete(value: T) -> Self {
        Self::new(ChangeAction::Delete, value)
    }

    /// Builds an envelope from possibly missing parts. Both are required.
    pub fn from_parts(action: Option<ChangeAction>, value: Option<T>) -> Result<Self, ValidationError> {
        let action = action.ok_or_else(|| ValidationError::MissingField("Action".to_string()))?;
        let value = value.ok_or_else(|| ValidationError::MissingField(T::FIELD.to_string()))?;
        Ok(Self { action, value })
    }

    pub fn is_insert(&self) -> bool {
        self.action == ChangeAction::Insert
    }
}

impl<T: UpdateValue> Validate for Update<T> {
    fn validate(&self) -> Result<(), ValidationError> {
        known("Action", &Some(self.action.clone()))?;
        nested(T::FIELD, &self.value)
    }
}

impl<T: UpdateValue> Serialize for Update<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("Action", &self.action)?;
        map.serialize_entry(T::FIELD, &self.value)?;
        map.end()
    }
}

impl<'de, T: UpdateValue> Deserialize<'de> for Update<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut map = Map::<String, Value>::deserialize(deserializer)?;
        let action = take::<ChangeAction, D::Error>(&mut map, "Action")?;
        let value = take::<T, D::Error>(&mut map, T::FIELD)?;
        Update::from_parts(action, value).map_err(D::Error::custom)
    }
}

/// Removes `key` from a decoded object; a missing key or `null` is `None`.
pub(crate) fn take<T: DeserializeOwned, E: serde::de::Error>(
    map: &mut Map<String, Value>,
    key: &str,
) -> Result<Option<T>, E> {
    match map.remove(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(|e| E::custom(format!("{key}: {e}"))),
    }
}

macro_rules! update_value {
    ($($value:ty => $field:literal,)+) => {
        $(
            impl UpdateValue for $value {
                const FIELD: &'static str = $field;
            }
        )+
    };
}

update_value! {
    ByteMatchTuple => "ByteMatchTuple",
    GeoMatchConstraint => "GeoMatchConstraint",
    IPSetDescriptor => "IPSetDescriptor",
    RegexMatchTuple => "RegexMatchTuple",
    RegexPatternString => "RegexPatternString",
    SizeConstraint => "SizeConstraint",
    SqlInjectionMatchTuple => "SqlInjectionMatchTuple",
    XssMatchTuple => "XssMatchTuple",
    Predicate => "Predicate",
    ActivatedRule => "ActivatedRule",
}

pub type ByteMatchSetUpdate = Update<ByteMatchTuple>;
pub type GeoMatchSetUpdate = Update<GeoMatchConstraint>;
pub type IPSetUpdate = Update<IPSetDescriptor>;
pub type RegexMatchSetUpdate = Update<RegexMatchTuple>;
pub type RegexPatternSetUpdate = Update<RegexPatternString>;
pub type SizeConstraintSetUpdate = Update<SizeConstraint>;
pub type SqlInjectionMatchSetUpdate = Update<SqlInjectionMatchTuple>;
pub type XssMatchSetUpdate = Update<XssMatchTuple>;
pub type RuleUpdate = Update<Predicate>;
pub type RuleGroupUpdate = Update<ActivatedRule>;
pub type WebACLUpdate = Update<ActivatedRule>;
