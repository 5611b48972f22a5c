// Condition tuples: where in a web request to look and what to compare.
//
// Every field is optional so partially populated values from the service
// decode cleanly. Constructors fill the fields the service requires and
// `Validate` checks them before a value is sent.

use crate::validation::{
    in_range, require, require_known, require_text, require_valid, Validate,
    ValidationError,
};
use crate::vocabulary::{
    ComparisonOperator, GeoMatchConstraintType, GeoMatchConstraintValue, IPSetDescriptorType,
    MatchFieldType, PositionalConstraint, TextTransformation,
};
use crate::wire::base64_bytes;
use serde::{Deserialize, Serialize};

/// Longest `TargetString` the service accepts, in bytes.
pub const MAX_TARGET_STRING_BYTES: usize = 50;

/// Longest query argument name a `SINGLE_QUERY_ARG` field may name.
pub const MAX_QUERY_ARG_NAME_CHARS: usize = 30;

/// Largest `Size` a size constraint may compare against.
pub const MAX_SIZE_CONSTRAINT: i64 = 21_474_836_480;

// ============================================================================
// FIELD TO MATCH
// ============================================================================

/// The part of a web request to inspect. `Data` names the header or query
/// argument when `Type` is `HEADER` or `SINGLE_QUERY_ARG`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldToMatch {
    #[serde(rename = "Type", default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<MatchFieldType>,

    #[serde(rename = "Data", default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

impl FieldToMatch {
    pub fn new(field_type: MatchFieldType) -> Self {
        Self {
            field_type: Some(field_type),
            data: None,
        }
    }

    pub fn uri() -> Self {
        Self::new(MatchFieldType::Uri)
    }

    pub fn query_string() -> Self {
        Self::new(MatchFieldType::QueryString)
    }

    pub fn body() -> Self {
        Self::new(MatchFieldType::Body)
    }

    pub fn method() -> Self {
        Self::new(MatchFieldType::Method)
    }

    pub fn all_query_args() -> Self {
        Self::new(MatchFieldType::AllQueryArgs)
    }

    /// A single header, e.g. `User-Agent`. Header names are case-insensitive.
    pub fn header(name: impl Into<String>) -> Self {
        Self {
            field_type: Some(MatchFieldType::Header),
            data: Some(name.into()),
        }
    }

    /// A single query argument, e.g. `UserName`.
    pub fn single_query_arg(name: impl Into<String>) -> Self {
        Self {
            field_type: Some(MatchFieldType::SingleQueryArg),
            data: Some(name.into()),
        }
    }
}

impl Validate for FieldToMatch {
    fn validate(&self) -> Result<(), ValidationError> {
        require_known("Type", &self.field_type)?;
        match self.field_type {
            Some(MatchFieldType::Header) => require_text("Data", &self.data),
            Some(MatchFieldType::SingleQueryArg) => {
                require_text("Data", &self.data)?;
                let chars = self.data.as_deref().map(|d| d.chars().count()).unwrap_or(0);
                if chars > MAX_QUERY_ARG_NAME_CHARS {
                    return Err(ValidationError::InvalidValue {
                        field: "Data".to_string(),
                        reason: format!(
                            "query argument name is {chars} characters, at most {MAX_QUERY_ARG_NAME_CHARS} allowed"
                        ),
                    });
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

// ============================================================================
// MATCH TUPLES
// ============================================================================

/// Bytes to search for in a request part, and where they must appear.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ByteMatchTuple {
    #[serde(rename = "FieldToMatch", default, skip_serializing_if = "Option::is_none")]
    pub field_to_match: Option<FieldToMatch>,

    /// Raw bytes; base64 on the wire.
    #[serde(
        rename = "TargetString",
        default,
        skip_serializing_if = "Option::is_none",
        with = "base64_bytes"
    )]
    pub target_string: Option<Vec<u8>>,

    #[serde(rename = "TextTransformation", default, skip_serializing_if = "Option::is_none")]
    pub text_transformation: Option<TextTransformation>,

    #[serde(rename = "PositionalConstraint", default, skip_serializing_if = "Option::is_none")]
    pub positional_constraint: Option<PositionalConstraint>,
}

impl ByteMatchTuple {
    pub fn new(
        field_to_match: FieldToMatch,
        target_string: impl Into<Vec<u8>>,
        text_transformation: TextTransformation,
        positional_constraint: PositionalConstraint,
    ) -> Self {
        Self {
            field_to_match: Some(field_to_match),
            target_string: Some(target_string.into()),
            text_transformation: Some(text_transformation),
            positional_constraint: Some(positional_constraint),
        }
    }
}

impl Validate for ByteMatchTuple {
    fn validate(&self) -> Result<(), ValidationError> {
        require_valid("FieldToMatch", &self.field_to_match)?;
        require("TargetString", &self.target_string)?;
        let len = self.target_string.as_ref().map(Vec::len).unwrap_or(0);
        if len > MAX_TARGET_STRING_BYTES {
            return Err(ValidationError::InvalidValue {
                field: "TargetString".to_string(),
                reason: format!("{len} bytes, at most {MAX_TARGET_STRING_BYTES} allowed"),
            });
        }
        require_known("TextTransformation", &self.text_transformation)?;
        require_known("PositionalConstraint", &self.positional_constraint)
    }
}

/// A request part matched against the patterns of a regex pattern set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegexMatchTuple {
    #[serde(rename = "FieldToMatch", default, skip_serializing_if = "Option::is_none")]
    pub field_to_match: Option<FieldToMatch>,

    #[serde(rename = "TextTransformation", default, skip_serializing_if = "Option::is_none")]
    pub text_transformation: Option<TextTransformation>,

    #[serde(rename = "RegexPatternSetId", default, skip_serializing_if = "Option::is_none")]
    pub regex_pattern_set_id: Option<String>,
}

impl RegexMatchTuple {
    pub fn new(
        field_to_match: FieldToMatch,
        text_transformation: TextTransformation,
        regex_pattern_set_id: impl Into<String>,
    ) -> Self {
        Self {
            field_to_match: Some(field_to_match),
            text_transformation: Some(text_transformation),
            regex_pattern_set_id: Some(regex_pattern_set_id.into()),
        }
    }
}

impl Validate for RegexMatchTuple {
    fn validate(&self) -> Result<(), ValidationError> {
        require_valid("FieldToMatch", &self.field_to_match)?;
        require_known("TextTransformation", &self.text_transformation)?;
        require_text("RegexPatternSetId", &self.regex_pattern_set_id)
    }
}

/// Compares the length of a request part, after transformation, with `Size`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SizeConstraint {
    #[serde(rename = "FieldToMatch", default, skip_serializing_if = "Option::is_none")]
    pub field_to_match: Option<FieldToMatch>,

    #[serde(rename = "TextTransformation", default, skip_serializing_if = "Option::is_none")]
    pub text_transformation: Option<TextTransformation>,

    #[serde(rename = "ComparisonOperator", default, skip_serializing_if = "Option::is_none")]
    pub comparison_operator: Option<ComparisonOperator>,

    #[serde(rename = "Size", default, skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
}

impl SizeConstraint {
    pub fn new(
        field_to_match: FieldToMatch,
        text_transformation: TextTransformation,
        comparison_operator: ComparisonOperator,
        size: i64,
    ) -> Self {
        Self {
            field_to_match: Some(field_to_match),
            text_transformation: Some(text_transformation),
            comparison_operator: Some(comparison_operator),
            size: Some(size),
        }
    }
}

impl Validate for SizeConstraint {
    fn validate(&self) -> Result<(), ValidationError> {
        require_valid("FieldToMatch", &self.field_to_match)?;
        require_known("TextTransformation", &self.text_transformation)?;
        require_known("ComparisonOperator", &self.comparison_operator)?;
        require("Size", &self.size)?;
        in_range("Size", self.size.unwrap_or(0), 0, MAX_SIZE_CONSTRAINT)
    }
}

/// A request part inspected for malicious SQL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SqlInjectionMatchTuple {
    #[serde(rename = "FieldToMatch", default, skip_serializing_if = "Option::is_none")]
    pub field_to_match: Option<FieldToMatch>,

    #[serde(rename = "TextTransformation", default, skip_serializing_if = "Option::is_none")]
    pub text_transformation: Option<TextTransformation>,
}

impl SqlInjectionMatchTuple {
    pub fn new(field_to_match: FieldToMatch, text_transformation: TextTransformation) -> Self {
        Self {
            field_to_match: Some(field_to_match),
            text_transformation: Some(text_transformation),
        }
    }
}

impl Validate for SqlInjectionMatchTuple {
    fn validate(&self) -> Result<(), ValidationError> {
        require_valid("FieldToMatch", &self.field_to_match)?;
        require_known("TextTransformation", &self.text_transformation)
    }
}

/// A request part inspected for cross-site scripting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct XssMatchTuple {
    #[serde(rename = "FieldToMatch", default, skip_serializing_if = "Option::is_none")]
    pub field_to_match: Option<FieldToMatch>,

    #[serde(rename = "TextTransformation", default, skip_serializing_if = "Option::is_none")]
    pub text_transformation: Option<TextTransformation>,
}

impl XssMatchTuple {
    pub fn new(field_to_match: FieldToMatch, text_transformation: TextTransformation) -> Self {
        Self {
            field_to_match: Some(field_to_match),
            text_transformation: Some(text_transformation),
        }
    }
}

impl Validate for XssMatchTuple {
    fn validate(&self) -> Result<(), ValidationError> {
        require_valid("FieldToMatch", &self.field_to_match)?;
        require_known("TextTransformation", &self.text_transformation)
    }
}

/// The country a request originates from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GeoMatchConstraint {
    #[serde(rename = "Type", default, skip_serializing_if = "Option::is_none")]
    pub constraint_type: Option<GeoMatchConstraintType>,

    #[serde(rename = "Value", default, skip_serializing_if = "Option::is_none")]
    pub value: Option<GeoMatchConstraintValue>,
}

impl GeoMatchConstraint {
    pub fn country(value: GeoMatchConstraintValue) -> Self {
        Self {
            constraint_type: Some(GeoMatchConstraintType::Country),
            value: Some(value),
        }
    }
}

impl Validate for GeoMatchConstraint {
    fn validate(&self) -> Result<(), ValidationError> {
        require_known("Type", &self.constraint_type)?;
        require_known("Value", &self.value)
    }
}

/// An IP address range in CIDR notation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IPSetDescriptor {
    #[serde(rename = "Type", default, skip_serializing_if = "Option::is_none")]
    pub descriptor_type: Option<IPSetDescriptorType>,

    #[serde(rename = "Value", default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl IPSetDescriptor {
    pub fn ipv4(cidr: impl Into<String>) -> Self {
        Self {
            descriptor_type: Some(IPSetDescriptorType::Ipv4),
            value: Some(cidr.into()),
        }
    }

    pub fn ipv6(cidr: impl Into<String>) -> Self {
        Self {
            descriptor_type: Some(IPSetDescriptorType::Ipv6),
            value: Some(cidr.into()),
        }
    }
}

impl Validate for IPSetDescriptor {
    fn validate(&self) -> Result<(), ValidationError> {
        require_known("Type", &self.descriptor_type)?;
        require_text("Value", &self.value)
    }
}

/// One regular expression of a regex pattern set, e.g. `B[a@]dB[o0]t`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegexPatternString(pub String);

impl RegexPatternString {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self(pattern.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RegexPatternString {
    fn from(pattern: &str) -> Self {
        Self::new(pattern)
    }
}

impl Validate for RegexPatternString {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.0.is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "RegexPatternString".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
