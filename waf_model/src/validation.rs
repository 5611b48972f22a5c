// Client-side validation of model values.
//
// The service owns every semantic check. What the model guarantees before a
// value leaves the process is presence: each struct declares which of its
// optional fields the service requires, and aggregates validate the values
// they contain. A handful of cheap value checks the service documents
// (target string length, header names) are applied too, along with the
// rule that an enum sent in a request must be a value this model knows.

use crate::vocabulary::WireEnum;
use thiserror::Error;

/// Validation error types
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Empty collection: {0} must contain at least one element")]
    EmptyCollection(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Unrecognised value for {field}: {value}")]
    UnknownVariant { field: String, value: String },
}

impl ValidationError {
    /// Prefixes the field path with the name of the enclosing field, so a
    /// nested failure reads like `Updates[2].ByteMatchTuple.TargetString`.
    pub fn within(self, parent: &str) -> Self {
        let join = |child: String| {
            if child.starts_with('[') {
                format!("{parent}{child}")
            } else {
                format!("{parent}.{child}")
            }
        };
        match self {
            ValidationError::MissingField(field) => ValidationError::MissingField(join(field)),
            ValidationError::EmptyCollection(field) => {
                ValidationError::EmptyCollection(join(field))
            }
            ValidationError::InvalidValue { field, reason } => ValidationError::InvalidValue {
                field: join(field),
                reason,
            },
            ValidationError::UnknownVariant { field, value } => ValidationError::UnknownVariant {
                field: join(field),
                value,
            },
        }
    }

    /// Returns the dotted path of the offending field.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::MissingField(field) | ValidationError::EmptyCollection(field) => field,
            ValidationError::InvalidValue { field, .. }
            | ValidationError::UnknownVariant { field, .. } => field,
        }
    }
}

/// Required-field and value checks run before serialization.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

impl<T: Validate> Validate for Option<T> {
    fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Some(value) => value.validate(),
            None => Ok(()),
        }
    }
}

impl<T: Validate> Validate for Vec<T> {
    fn validate(&self) -> Result<(), ValidationError> {
        for (index, item) in self.iter().enumerate() {
            item.validate()
                .map_err(|e| e.within(&format!("[{index}]")))?;
        }
        Ok(())
    }
}

/// Fails with `MissingField` when a required field is absent.
pub fn require<T>(field: &str, value: &Option<T>) -> Result<(), ValidationError> {
    match value {
        Some(_) => Ok(()),
        None => Err(ValidationError::MissingField(field.to_string())),
    }
}

/// Requires a field and validates its contents, reporting nested failures
/// under the field's wire name.
pub fn require_valid<T: Validate>(field: &str, value: &Option<T>) -> Result<(), ValidationError> {
    require(field, value)?;
    nested(field, value)
}

/// Validates an optional nested value under the field's wire name.
pub fn nested<T: Validate>(field: &str, value: &T) -> Result<(), ValidationError> {
    value.validate().map_err(|e| e.within(field))
}

/// Requires a non-empty string.
pub fn require_text(field: &str, value: &Option<String>) -> Result<(), ValidationError> {
    match value.as_deref() {
        Some(text) if !text.is_empty() => Ok(()),
        Some(_) => Err(ValidationError::InvalidValue {
            field: field.to_string(),
            reason: "must not be empty".to_string(),
        }),
        None => Err(ValidationError::MissingField(field.to_string())),
    }
}

/// Requires a collection with at least one element.
pub fn require_non_empty<T>(field: &str, value: &Option<Vec<T>>) -> Result<(), ValidationError> {
    match value {
        Some(items) if !items.is_empty() => Ok(()),
        Some(_) => Err(ValidationError::EmptyCollection(field.to_string())),
        None => Err(ValidationError::MissingField(field.to_string())),
    }
}

/// Rejects vocabulary values this model did not recognise. Used on
/// request-side fields; responses may legitimately carry newer values.
pub fn known<E: WireEnum>(field: &str, value: &Option<E>) -> Result<(), ValidationError> {
    match value {
        Some(value) if value.is_unknown() => Err(ValidationError::UnknownVariant {
            field: field.to_string(),
            value: value.as_str().to_string(),
        }),
        _ => Ok(()),
    }
}

/// Requires an enum field holding a recognised value.
pub fn require_known<E: WireEnum>(field: &str, value: &Option<E>) -> Result<(), ValidationError> {
    require(field, value)?;
    known(field, value)
}

/// Bounds-checks a numeric field.
pub fn in_range(field: &str, value: i64, min: i64, max: i64) -> Result<(), ValidationError> {
    if value < min || value > max {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            reason: format!("{value} is outside {min}..={max}"),
        });
    }
    Ok(())
}
