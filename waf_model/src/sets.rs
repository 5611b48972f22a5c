// Condition sets: named, service-identified collections of condition tuples
// that a rule predicate refers to by id.

use crate::conditions::{
    ByteMatchTuple, GeoMatchConstraint, IPSetDescriptor, RegexMatchTuple, RegexPatternString,
    SizeConstraint, SqlInjectionMatchTuple, XssMatchTuple,
};
use crate::entity::entity_listing;
use crate::validation::{nested, require, require_text, Validate, ValidationError};
use serde::{Deserialize, Serialize};

/// Declares a condition set, its list summary, and its `Entity` impl.
macro_rules! condition_set {
    (
        $(#[$meta:meta])*
        pub struct $set:ident / $summary:ident {
            $id:ident => $id_wire:literal,
            $items:ident => $items_wire:literal : $item:ty,
            plural => $plural:literal,
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
        pub struct $set {
            #[serde(rename = $id_wire, default, skip_serializing_if = "Option::is_none")]
            pub $id: Option<String>,

            #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
            pub name: Option<String>,

            #[serde(rename = $items_wire, default, skip_serializing_if = "Option::is_none")]
            pub $items: Option<Vec<$item>>,
        }

        impl $set {
            /// A set holding no values yet, as returned by its create call.
            pub fn empty(id: impl Into<String>, name: impl Into<String>) -> Self {
                Self {
                    $id: Some(id.into()),
                    name: Some(name.into()),
                    $items: Some(Vec::new()),
                }
            }

            /// The set's values; an absent collection reads as empty.
            pub fn values(&self) -> &[$item] {
                self.$items.as_deref().unwrap_or(&[])
            }
        }

        impl Validate for $set {
            fn validate(&self) -> Result<(), ValidationError> {
                require_text($id_wire, &self.$id)?;
                require($items_wire, &self.$items)?;
                nested($items_wire, &self.$items)
            }
        }

        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
        pub struct $summary {
            #[serde(rename = $id_wire, default, skip_serializing_if = "Option::is_none")]
            pub $id: Option<String>,

            #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
            pub name: Option<String>,
        }

        impl $crate::entity::Entity for $set {
            const NAME: &'static str = stringify!($set);
            const PLURAL: &'static str = $plural;
            const ID_FIELD: &'static str = $id_wire;
            const KEY: &'static str = stringify!($set);

            type Summary = $summary;
            type Change = $item;
            type Spec = $crate::envelope::NewSet<$set>;
            type Extras = $crate::entity::NoExtras;

            fn id(&self) -> Option<&str> {
                self.$id.as_deref()
            }

            fn name(&self) -> Option<&str> {
                self.name.as_deref()
            }

            fn summary(&self) -> $summary {
                $summary {
                    $id: self.$id.clone(),
                    name: self.name.clone(),
                }
            }
        }

        entity_listing!($set, concat!("List", $plural), $plural);
    };
}

condition_set! {
    /// Byte patterns to look for in web requests.
    pub struct ByteMatchSet / ByteMatchSetSummary {
        byte_match_set_id => "ByteMatchSetId",
        byte_match_tuples => "ByteMatchTuples": ByteMatchTuple,
        plural => "ByteMatchSets",
    }
}

condition_set! {
    /// Countries requests are matched against.
    pub struct GeoMatchSet / GeoMatchSetSummary {
        geo_match_set_id => "GeoMatchSetId",
        geo_match_constraints => "GeoMatchConstraints": GeoMatchConstraint,
        plural => "GeoMatchSets",
    }
}

condition_set! {
    /// Source address ranges. Up to 10,000 descriptors per set.
    pub struct IPSet / IPSetSummary {
        ip_set_id => "IPSetId",
        ip_set_descriptors => "IPSetDescriptors": IPSetDescriptor,
        plural => "IPSets",
    }
}

condition_set! {
    /// Request parts matched against regex pattern sets.
    pub struct RegexMatchSet / RegexMatchSetSummary {
        regex_match_set_id => "RegexMatchSetId",
        regex_match_tuples => "RegexMatchTuples": RegexMatchTuple,
        plural => "RegexMatchSets",
    }
}

condition_set! {
    /// Regular expressions referenced by regex match tuples.
    pub struct RegexPatternSet / RegexPatternSetSummary {
        regex_pattern_set_id => "RegexPatternSetId",
        regex_pattern_strings => "RegexPatternStrings": RegexPatternString,
        plural => "RegexPatternSets",
    }
}

condition_set! {
    pub struct SizeConstraintSet / SizeConstraintSetSummary {
        size_constraint_set_id => "SizeConstraintSetId",
        size_constraints => "SizeConstraints": SizeConstraint,
        plural => "SizeConstraintSets",
    }
}

condition_set! {
    /// Request parts inspected for SQL injection.
    pub struct SqlInjectionMatchSet / SqlInjectionMatchSetSummary {
        sql_injection_match_set_id => "SqlInjectionMatchSetId",
        sql_injection_match_tuples => "SqlInjectionMatchTuples": SqlInjectionMatchTuple,
        plural => "SqlInjectionMatchSets",
    }
}

condition_set! {
    /// Request parts inspected for cross-site scripting.
    pub struct XssMatchSet / XssMatchSetSummary {
        xss_match_set_id => "XssMatchSetId",
        xss_match_tuples => "XssMatchTuples": XssMatchTuple,
        plural => "XssMatchSets",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditions::FieldToMatch;
    use crate::entity::Entity;
    use crate::vocabulary::{PositionalConstraint, TextTransformation};
    use serde_json::json;

    #[test]
    fn test_empty_set_serializes_empty_collection() {
        let set = ByteMatchSet::empty("e6bcc9b5-2ae8-4e53-a5bb-3e54c2f5f0b1", "block-bad-bots");
        assert_eq!(
            serde_json::to_value(&set).unwrap(),
            json!({
                "ByteMatchSetId": "e6bcc9b5-2ae8-4e53-a5bb-3e54c2f5f0b1",
                "Name": "block-bad-bots",
                "ByteMatchTuples": []
            })
        );
        assert!(set.validate().is_ok());
    }

    #[test]
    fn test_required_members() {
        let set: IPSet = serde_json::from_value(json!({"Name": "office"})).unwrap();
        assert_eq!(set.validate(), Err(ValidationError::MissingField("IPSetId".into())));

        let set: IPSet =
            serde_json::from_value(json!({"IPSetId": "id", "Name": "office"})).unwrap();
        assert_eq!(
            set.validate(),
            Err(ValidationError::MissingField("IPSetDescriptors".into()))
        );
        assert!(set.values().is_empty());
    }

    #[test]
    fn test_nested_tuple_is_validated() {
        let mut set = ByteMatchSet::empty("id", "name");
        set.byte_match_tuples = Some(vec![ByteMatchTuple {
            field_to_match: Some(FieldToMatch::uri()),
            target_string: None,
            text_transformation: Some(TextTransformation::None),
            positional_constraint: Some(PositionalConstraint::Exactly),
        }]);
        assert_eq!(
            set.validate(),
            Err(ValidationError::MissingField("ByteMatchTuples[0].TargetString".into()))
        );
    }

    #[test]
    fn test_summary_and_names() {
        let set = RegexPatternSet::empty("rps-1", "bad-bot-patterns");
        let summary = set.summary();
        assert_eq!(
            serde_json::to_value(&summary).unwrap(),
            json!({"RegexPatternSetId": "rps-1", "Name": "bad-bot-patterns"})
        );
        assert_eq!(RegexPatternSet::NAME, "RegexPatternSet");
        assert_eq!(SqlInjectionMatchSet::PLURAL, "SqlInjectionMatchSets");
        assert_eq!(set.id(), Some("rps-1"));
    }
}
