//! # In-Memory WAF Service
//!
//! `MemoryWaf` keeps every entity of one account in memory and implements
//! each operation of the API with the checks the service makes and clients
//! cannot: the change-token protocol, reference integrity between entities,
//! account limits and list cursors.
//!
//! Every mutating call runs under the state write lock. A change is staged
//! against the current state, and only a fully valid change is committed,
//! together with consuming its change token.

mod resources;
mod stored;
mod traffic;

pub use resources::Resource;
pub use stored::{Draft, Stored};

use crate::config::BridgeConfig;
use crate::table::Table;
use crate::tokens::TokenLedger;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use log::{debug, info};
use parking_lot::RwLock;
use std::collections::HashMap;
use uuid::Uuid;
use waf_model::operations::{
    GetChangeTokenRequest, GetChangeTokenResponse, GetChangeTokenStatusRequest,
    GetChangeTokenStatusResponse,
};
use waf_model::{
    ActivatedRule, ByteMatchSet, ChangeReceipt, CreateRequest, CreateResponse,
    DeleteRequest, Entity, ErrorKind, GeoMatchSet, GetRequest, GetResponse, IPSet, ListRequest,
    Listing, LoggingConfiguration, Page, ParameterExceptionField, ParameterExceptionReason,
    RateBasedRule, RegexMatchSet, RegexPatternSet, Rule, RuleGroup, SampledHTTPRequest,
    ServiceError, SizeConstraintSet, SqlInjectionMatchSet, UpdateRequest, Validate,
    ValidationError, WebACL, XssMatchSet,
};

/// Longest entity or metric name.
pub const MAX_NAME_CHARS: usize = 128;

/// Metric names the service keeps for itself.
const RESERVED_METRIC_NAMES: &[&str] = &["All", "Default_Action"];

// ================================================================================================
// STATE
// ================================================================================================

/// Everything one account has stored.
#[derive(Debug, Default)]
pub struct State {
    pub(crate) byte_match_sets: Table<ByteMatchSet>,
    pub(crate) geo_match_sets: Table<GeoMatchSet>,
    pub(crate) ip_sets: Table<IPSet>,
    pub(crate) regex_match_sets: Table<RegexMatchSet>,
    pub(crate) regex_pattern_sets: Table<RegexPatternSet>,
    pub(crate) size_constraint_sets: Table<SizeConstraintSet>,
    pub(crate) sql_injection_match_sets: Table<SqlInjectionMatchSet>,
    pub(crate) xss_match_sets: Table<XssMatchSet>,
    pub(crate) rules: Table<Rule>,
    pub(crate) rate_based_rules: Table<RateBasedRule>,
    pub(crate) rule_groups: Table<RuleGroup>,
    pub(crate) web_acls: Table<WebACL>,
    /// Activated rules of each rule group, by group id
    pub(crate) group_rules: HashMap<String, Vec<ActivatedRule>>,
    /// Tags by resource ARN, in the order they were added
    pub(crate) tags: HashMap<String, IndexMap<String, String>>,
    /// Logging configurations by web ACL ARN
    pub(crate) logging: IndexMap<String, LoggingConfiguration>,
    /// Permission policies by rule group ARN
    pub(crate) policies: HashMap<String, String>,
    /// Requests seen by each rate-based rule: source address and time
    pub(crate) traffic: HashMap<String, Vec<(String, DateTime<Utc>)>>,
    /// Sampled requests by web ACL id and rule id
    pub(crate) samples: HashMap<(String, String), Vec<SampledHTTPRequest>>,
    /// Rendered migration templates by S3 object URL
    pub(crate) migrations: IndexMap<String, String>,
}

// ================================================================================================
// SERVICE
// ================================================================================================

/// An in-memory WAF Classic account.
#[derive(Debug)]
pub struct MemoryWaf {
    config: BridgeConfig,
    tokens: TokenLedger,
    state: RwLock<State>,
}

impl Default for MemoryWaf {
    fn default() -> Self {
        Self::new(BridgeConfig::default())
    }
}

impl MemoryWaf {
    pub fn new(config: BridgeConfig) -> Self {
        info!(
            "Starting in-memory WAF for account {} ({})",
            config.account_id,
            config.region.as_deref().unwrap_or("global")
        );
        Self {
            tokens: TokenLedger::new(config.polls_until_insync),
            config,
            state: RwLock::new(State::default()),
        }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// ARN of a taggable entity.
    pub fn arn_of<E: Stored>(&self, id: &str) -> Option<String> {
        E::ARN_KIND.map(|kind| format!("{}:{}/{}", self.config.arn_prefix(), kind, id))
    }

    // ============================================================================================
    // CHANGE TOKENS
    // ============================================================================================

    pub fn get_change_token(
        &self,
        _request: GetChangeTokenRequest,
    ) -> Result<GetChangeTokenResponse, ServiceError> {
        Ok(GetChangeTokenResponse {
            change_token: Some(self.tokens.issue()),
        })
    }

    pub fn get_change_token_status(
        &self,
        request: GetChangeTokenStatusRequest,
    ) -> Result<GetChangeTokenStatusResponse, ServiceError> {
        admit(&request)?;
        let token = required(&request.change_token, "ChangeToken")?;
        Ok(GetChangeTokenStatusResponse {
            change_token_status: Some(self.tokens.status(token)?),
        })
    }

    // ============================================================================================
    // ENTITY OPERATIONS
    // ============================================================================================

    pub fn create<E: Stored>(
        &self,
        request: CreateRequest<E>,
    ) -> Result<CreateResponse<E>, ServiceError> {
        admit(&request)?;
        let token = required(&request.change_token, "ChangeToken")?;
        let draft = E::draft(&request.body);
        check_name(draft.name)?;
        if let Some(metric_name) = draft.metric_name {
            check_metric_name(metric_name)?;
        }

        let mut state = self.state.write();
        self.tokens.check(token)?;

        let limit = self.config.limits.entities_per_type;
        if E::table(&state).len() >= limit {
            return Err(ServiceError::new(
                ErrorKind::LimitsExceeded,
                format!("An account can hold at most {} {} entities", limit, E::NAME),
            ));
        }

        let id = Uuid::new_v4().to_string();
        let arn = self.arn_of::<E>(&id);
        let tags = match &arn {
            Some(arn) if !draft.tags.is_empty() => Some(self.merged_tags(&state, arn, draft.tags)?),
            _ => None,
        };

        let entity = E::build(&id, &request.body, arn.clone());
        self.tokens.consume(token)?;
        E::table_mut(&mut state).put(entity.clone());
        if let (Some(arn), Some(tags)) = (arn, tags) {
            state.tags.insert(arn, tags);
        }

        info!("Created {} {}", E::NAME, id);
        Ok(CreateResponse {
            entity: Some(entity),
            change_token: Some(token.clone()),
        })
    }

    pub fn get<E: Stored>(&self, request: GetRequest<E>) -> Result<GetResponse<E>, ServiceError> {
        admit(&request)?;
        let id = required(&request.id, E::ID_FIELD)?;
        let state = self.state.read();
        let entity = lookup::<E>(&state, id)?;
        Ok(GetResponse {
            entity: Some(entity.clone()),
        })
    }

    /// Applies a batch of updates atomically: either every update in the
    /// batch takes effect or none does.
    pub fn update<E: Stored>(&self, request: UpdateRequest<E>) -> Result<ChangeReceipt, ServiceError> {
        admit(&request)?;
        let token = required(&request.change_token, "ChangeToken")?;
        let id = required(&request.body.id, E::ID_FIELD)?;

        let count = request.body.updates().len();
        let limit = self.config.limits.updates_per_request;
        if count > limit {
            return Err(ServiceError::new(
                ErrorKind::LimitsExceeded,
                format!("{} updates in one request, at most {} allowed", count, limit),
            ));
        }

        let mut state = self.state.write();
        self.tokens.check(token)?;
        let current = lookup::<E>(&state, id)?;
        let staged = E::stage(&state, current, &request.body, &self.config)?;

        self.tokens.consume(token)?;
        E::commit(&mut state, id, staged);

        debug!("Applied {} updates to {} {}", count, E::NAME, id);
        Ok(ChangeReceipt::new(token.clone()))
    }

    /// Deletes an entity that holds no values and nothing refers to.
    pub fn delete<E: Stored>(&self, request: DeleteRequest<E>) -> Result<ChangeReceipt, ServiceError> {
        admit(&request)?;
        let token = required(&request.change_token, "ChangeToken")?;
        let id = required(&request.body.id, E::ID_FIELD)?;

        let mut state = self.state.write();
        self.tokens.check(token)?;
        let current = lookup::<E>(&state, id)?;

        if E::holds_values(&state, current) {
            return Err(ServiceError::new(
                ErrorKind::NonEmptyEntity,
                format!("{} {} still contains values", E::NAME, id),
            ));
        }
        if let Some(referrer) = E::referenced_by(&state, id) {
            return Err(ServiceError::new(
                ErrorKind::ReferencedItem,
                format!("{} {} is still used by {}", E::NAME, id, referrer),
            ));
        }

        self.tokens.consume(token)?;
        E::table_mut(&mut state).remove(id);
        E::forget(&mut state, id);
        if let Some(arn) = self.arn_of::<E>(id) {
            state.tags.remove(&arn);
            state.logging.shift_remove(&arn);
            state.policies.remove(&arn);
        }

        info!("Deleted {} {}", E::NAME, id);
        Ok(ChangeReceipt::new(token.clone()))
    }

    pub fn list<E>(&self, request: ListRequest<E>) -> Result<Page<E>, ServiceError>
    where
        E: Stored + Listing<Item = <E as Entity>::Summary>,
    {
        admit(&request)?;
        let state = self.state.read();
        let (items, next_marker) = E::table(&state).page(
            request.next_marker.as_ref(),
            self.config.page_size(request.limit),
        )?;
        Ok(Page { items, next_marker })
    }
}

// ================================================================================================
// REQUEST CHECKS
// ================================================================================================

/// Runs the model's request validation and reports a failure the way the
/// service does.
pub(crate) fn admit<R: Validate>(request: &R) -> Result<(), ServiceError> {
    request.validate().map_err(rejection)
}

/// The service error for a request that failed validation.
pub(crate) fn rejection(error: ValidationError) -> ServiceError {
    if let ValidationError::UnknownVariant { field, value } = &error {
        if let Some(parameter) = parameter_field(field) {
            return ServiceError::invalid_parameter(
                parameter,
                ParameterExceptionReason::InvalidOption,
                value.clone(),
            );
        }
    }
    ServiceError::new(ErrorKind::InvalidParameter, error.to_string())
}

/// Maps the path of an unrecognised enum value to the parameter the
/// service names in its error.
fn parameter_field(path: &str) -> Option<ParameterExceptionField> {
    let mut segments = path
        .rsplit('.')
        .map(|segment| segment.split('[').next().unwrap_or(segment));
    let last = segments.next()?;
    let parent = segments.next().unwrap_or_default();

    let field = match (parent, last) {
        ("Updates", "Action") => ParameterExceptionField::ChangeAction,
        ("IPSetDescriptor", "Type") => ParameterExceptionField::IpsetType,
        ("FieldToMatch", "Type") if path.contains("SqlInjectionMatchTuple") => {
            ParameterExceptionField::SqlInjectionMatchFieldType
        }
        ("FieldToMatch", "Type") => ParameterExceptionField::ByteMatchFieldType,
        (_, "TextTransformation") => ParameterExceptionField::ByteMatchTextTransformation,
        (_, "PositionalConstraint") => ParameterExceptionField::ByteMatchPositionalConstraint,
        (_, "ComparisonOperator") => ParameterExceptionField::SizeConstraintComparisonOperator,
        ("GeoMatchConstraint", "Type") => ParameterExceptionField::GeoMatchLocationType,
        ("GeoMatchConstraint", "Value") => ParameterExceptionField::GeoMatchLocationValue,
        (_, "RateKey") => ParameterExceptionField::RateKey,
        ("Predicate", "Type") => ParameterExceptionField::PredicateType,
        ("ActivatedRule", "Type") => ParameterExceptionField::RuleType,
        ("Action" | "DefaultAction", "Type") => ParameterExceptionField::WafAction,
        ("OverrideAction", "Type") => ParameterExceptionField::WafOverrideAction,
        _ => return None,
    };
    Some(field)
}

/// A member validation has already required.
pub(crate) fn required<'a, T>(value: &'a Option<T>, field: &str) -> Result<&'a T, ServiceError> {
    value.as_ref().ok_or_else(|| {
        ServiceError::new(
            ErrorKind::InvalidParameter,
            format!("Missing required field: {}", field),
        )
    })
}

pub(crate) fn lookup<'a, E: Stored>(state: &'a State, id: &str) -> Result<&'a E, ServiceError> {
    E::table(state).get(id).ok_or_else(|| {
        ServiceError::new(
            ErrorKind::NonexistentItem,
            format!("{} {} does not exist", E::NAME, id),
        )
    })
}

pub(crate) fn check_name(name: Option<&str>) -> Result<(), ServiceError> {
    let chars = name.map(|n| n.chars().count()).unwrap_or(0);
    if chars == 0 || chars > MAX_NAME_CHARS {
        return Err(ServiceError::new(
            ErrorKind::DisallowedName,
            format!("Name must be 1 to {} characters", MAX_NAME_CHARS),
        ));
    }
    Ok(())
}

pub(crate) fn check_metric_name(metric_name: &str) -> Result<(), ServiceError> {
    let chars = metric_name.chars().count();
    let alphanumeric = metric_name.chars().all(|c| c.is_ascii_alphanumeric());
    if chars == 0 || chars > MAX_NAME_CHARS || !alphanumeric {
        return Err(ServiceError::new(
            ErrorKind::DisallowedName,
            format!(
                "Metric name {:?} must be 1 to {} letters and digits",
                metric_name, MAX_NAME_CHARS
            ),
        ));
    }
    if RESERVED_METRIC_NAMES.contains(&metric_name) {
        return Err(ServiceError::new(
            ErrorKind::DisallowedName,
            format!("Metric name {} is reserved", metric_name),
        ));
    }
    Ok(())
}
