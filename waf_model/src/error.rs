// Error taxonomy of the service and the crate-level error type.
//
// The model performs no recovery. A service fault is decoded into a
// `ServiceError` carrying its kind, message and any structured detail, and
// handed to the caller unchanged.

use crate::validation::ValidationError;
use crate::vocabulary::{MigrationErrorType, ParameterExceptionField, ParameterExceptionReason};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Namespace prefix of the `__type` member of fault bodies.
pub const FAULT_NAMESPACE: &str = "com.amazonaws.waf";

wire_enum! {
    /// Client-observable error kinds, keyed by their wire code.
    pub enum ErrorKind {
        BadRequest => "WAFBadRequestException",
        DisallowedName => "WAFDisallowedNameException",
        EntityMigration => "WAFEntityMigrationException",
        InternalError => "WAFInternalErrorException",
        InvalidAccount => "WAFInvalidAccountException",
        InvalidOperation => "WAFInvalidOperationException",
        InvalidParameter => "WAFInvalidParameterException",
        InvalidPermissionPolicy => "WAFInvalidPermissionPolicyException",
        InvalidRegexPattern => "WAFInvalidRegexPatternException",
        LimitsExceeded => "WAFLimitsExceededException",
        NonEmptyEntity => "WAFNonEmptyEntityException",
        NonexistentContainer => "WAFNonexistentContainerException",
        NonexistentItem => "WAFNonexistentItemException",
        ReferencedItem => "WAFReferencedItemException",
        ServiceLinkedRoleError => "WAFServiceLinkedRoleErrorException",
        StaleData => "WAFStaleDataException",
        SubscriptionNotFound => "WAFSubscriptionNotFoundException",
        TagOperation => "WAFTagOperationException",
        TagOperationInternalError => "WAFTagOperationInternalErrorException",
    }
}

impl ErrorKind {
    /// Kinds for which re-obtaining a change token and resubmitting is the
    /// documented recovery. Every other kind needs caller-side correction.
    pub fn is_retryable_after_refresh(&self) -> bool {
        matches!(self, ErrorKind::StaleData | ErrorKind::LimitsExceeded)
    }

    /// Parses the `__type` member of a fault body. Accepts a bare code, a
    /// namespaced `ns#Code`, and a trailing `:detail` suffix.
    pub fn from_type_member(raw: &str) -> Self {
        let code = raw.rsplit('#').next().unwrap_or(raw);
        let code = code.split(':').next().unwrap_or(code);
        ErrorKind::from(code)
    }
}

/// A fault reported by the service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct ServiceError {
    pub kind: ErrorKind,
    pub message: String,
    /// Offending field, for `InvalidParameter`.
    pub field: Option<ParameterExceptionField>,
    /// Offending value, for `InvalidParameter`.
    pub parameter: Option<String>,
    pub reason: Option<ParameterExceptionReason>,
    /// Detail of an `EntityMigration` failure.
    pub migration_error_type: Option<MigrationErrorType>,
    pub migration_error_reason: Option<String>,
}

impl ServiceError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            field: None,
            parameter: None,
            reason: None,
            migration_error_type: None,
            migration_error_reason: None,
        }
    }

    pub fn invalid_parameter(
        field: ParameterExceptionField,
        reason: ParameterExceptionReason,
        parameter: impl Into<String>,
    ) -> Self {
        let parameter = parameter.into();
        let mut error = Self::new(
            ErrorKind::InvalidParameter,
            format!("{reason} for {field}: {parameter}"),
        );
        error.field = Some(field);
        error.reason = Some(reason);
        error.parameter = Some(parameter);
        error
    }

    pub fn migration(kind: MigrationErrorType, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        let mut error = Self::new(ErrorKind::EntityMigration, reason.clone());
        error.migration_error_type = Some(kind);
        error.migration_error_reason = Some(reason);
        error
    }

    pub fn is_retryable_after_refresh(&self) -> bool {
        self.kind.is_retryable_after_refresh()
    }

    /// Decodes a fault body.
    pub fn from_body(body: &str) -> Result<Self, ModelError> {
        let fault: FaultBody =
            serde_json::from_str(body).map_err(|e| ModelError::Serialization(e.to_string()))?;
        Ok(Self {
            kind: ErrorKind::from_type_member(&fault.type_member),
            message: fault.message.unwrap_or_default(),
            field: fault.field,
            parameter: fault.parameter,
            reason: fault.reason,
            migration_error_type: fault.migration_error_type,
            migration_error_reason: fault.migration_error_reason,
        })
    }

    /// Renders the fault body a service sends for this error.
    pub fn to_body(&self) -> String {
        let fault = FaultBody {
            type_member: format!("{FAULT_NAMESPACE}#{}", self.kind),
            message: Some(self.message.clone()),
            field: self.field.clone(),
            parameter: self.parameter.clone(),
            reason: self.reason.clone(),
            migration_error_type: self.migration_error_type.clone(),
            migration_error_reason: self.migration_error_reason.clone(),
        };
        serde_json::to_string(&fault).unwrap_or_else(|_| {
            format!(r#"{{"__type":"{FAULT_NAMESPACE}#{}"}}"#, self.kind)
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct FaultBody {
    #[serde(rename = "__type")]
    type_member: String,
    #[serde(alias = "Message", default, skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    field: Option<ParameterExceptionField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    parameter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    reason: Option<ParameterExceptionReason>,
    #[serde(rename = "MigrationErrorType", default, skip_serializing_if = "Option::is_none")]
    migration_error_type: Option<MigrationErrorType>,
    #[serde(rename = "MigrationErrorReason", default, skip_serializing_if = "Option::is_none")]
    migration_error_reason: Option<String>,
}

/// Crate error type.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    #[error("Transport error: {0}")]
    Transport(String),
}

impl ModelError {
    /// The service error, if this is one.
    pub fn service(&self) -> Option<&ServiceError> {
        match self {
            ModelError::Service(error) => Some(error),
            _ => None,
        }
    }

    pub fn kind(&self) -> Option<&ErrorKind> {
        self.service().map(|error| &error.kind)
    }

    pub fn is_retryable_after_refresh(&self) -> bool {
        self.service()
            .map(ServiceError::is_retryable_after_refresh)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_type_member_forms() {
        assert_eq!(ErrorKind::from_type_member("WAFStaleDataException"), ErrorKind::StaleData);
        assert_eq!(
            ErrorKind::from_type_member("com.amazonaws.waf#WAFNonexistentItemException"),
            ErrorKind::NonexistentItem
        );
        assert_eq!(
            ErrorKind::from_type_member("WAFReferencedItemException:http://internal.amazon.com/"),
            ErrorKind::ReferencedItem
        );
        assert_eq!(
            ErrorKind::from_type_member("ThrottlingException"),
            ErrorKind::Unknown("ThrottlingException".into())
        );
    }

    #[test]
    fn test_only_stale_data_and_limits_retry() {
        for kind in ErrorKind::known() {
            let expected = matches!(kind, ErrorKind::StaleData | ErrorKind::LimitsExceeded);
            assert_eq!(kind.is_retryable_after_refresh(), expected, "{kind}");
        }
        assert!(!ErrorKind::Unknown("Other".into()).is_retryable_after_refresh());
    }

    #[test]
    fn test_invalid_parameter_body_round_trip() {
        let error = ServiceError::invalid_parameter(
            ParameterExceptionField::NextMarker,
            ParameterExceptionReason::IllegalArgument,
            "garbage",
        );
        let body: serde_json::Value = serde_json::from_str(&error.to_body()).unwrap();
        assert_eq!(body["__type"], json!("com.amazonaws.waf#WAFInvalidParameterException"));
        assert_eq!(body["field"], json!("NEXT_MARKER"));
        assert_eq!(body["reason"], json!("ILLEGAL_ARGUMENT"));
        assert_eq!(body["parameter"], json!("garbage"));

        let back = ServiceError::from_body(&error.to_body()).unwrap();
        assert_eq!(back, error);
    }

    #[test]
    fn test_migration_body_carries_detail() {
        let body = json!({
            "__type": "WAFEntityMigrationException",
            "message": "bucket not found",
            "MigrationErrorType": "S3_BUCKET_NOT_FOUND",
            "MigrationErrorReason": "bucket not found"
        });
        let error = ServiceError::from_body(&body.to_string()).unwrap();
        assert_eq!(error.kind, ErrorKind::EntityMigration);
        assert_eq!(error.migration_error_type, Some(MigrationErrorType::S3BucketNotFound));
    }

    #[test]
    fn test_capitalised_message_is_accepted() {
        let error = ServiceError::from_body(
            r#"{"__type":"WAFStaleDataException","Message":"token used"}"#,
        )
        .unwrap();
        assert_eq!(error.message, "token used");
        assert_eq!(error.to_string(), "WAFStaleDataException: token used");
    }

    #[test]
    fn test_model_error_exposes_service_kind() {
        let error = ModelError::from(ServiceError::new(ErrorKind::StaleData, "stale"));
        assert_eq!(error.kind(), Some(&ErrorKind::StaleData));
        assert!(error.is_retryable_after_refresh());
        assert!(!ModelError::Transport("down".into()).is_retryable_after_refresh());
    }
}
