//! # WAF Model Library
//!
//! Typed request/response model of the WAF Classic rule-set configuration
//! API: the vocabulary enums, condition tuples and sets, rules, rule groups
//! and web ACLs, the `Update` envelope, the generic per-entity operation
//! templates, sampling types and the service error taxonomy.
//!
//! ## Modules
//!
//! - `vocabulary`: wire enums with an `Unknown` fallback
//! - `conditions`, `sets`, `rules`, `resources`, `sampling`: the data model
//! - `update`, `envelope`, `operations`: request and response shapes
//! - `validation`, `wire`, `error`: checks, JSON codec and errors
//! - `client`: transport seam, pagination, change-token polling and retry
//!
//! The model performs no I/O on its own. Everything that talks to a service
//! goes through a `client::Transport`.

#[macro_use]
pub mod vocabulary;

pub mod aliases;
pub mod client;
pub mod conditions;
pub mod entity;
pub mod envelope;
pub mod error;
pub mod ids;
pub mod operations;
pub mod resources;
pub mod rules;
pub mod sampling;
pub mod sets;
pub mod update;
pub mod validation;
pub mod wire;

pub use vocabulary::{
    ChangeAction, ChangeTokenStatus, ComparisonOperator, GeoMatchConstraintType,
    GeoMatchConstraintValue, IPSetDescriptorType, MatchFieldType, MigrationErrorType,
    ParameterExceptionField, ParameterExceptionReason, PositionalConstraint, PredicateType,
    RateKey, TextTransformation, WafActionType, WafOverrideActionType, WafRuleType, WireEnum,
};

pub use conditions::{
    ByteMatchTuple, FieldToMatch, GeoMatchConstraint, IPSetDescriptor, RegexMatchTuple,
    RegexPatternString, SizeConstraint, SqlInjectionMatchTuple, XssMatchTuple,
};

pub use sets::{
    ByteMatchSet, ByteMatchSetSummary, GeoMatchSet, GeoMatchSetSummary, IPSet, IPSetSummary,
    RegexMatchSet, RegexMatchSetSummary, RegexPatternSet, RegexPatternSetSummary,
    SizeConstraintSet, SizeConstraintSetSummary, SqlInjectionMatchSet,
    SqlInjectionMatchSetSummary, XssMatchSet, XssMatchSetSummary,
};

pub use rules::{
    ActivatedRule, DefaultActionSetting, ExcludedRule, Predicate, RateBasedRule,
    RateLimitSetting, Rule, RuleGroup, RuleGroupSummary, RuleSummary,
    SubscribedRuleGroupSummary, WafAction, WafOverrideAction, WebACL, WebACLSummary,
};

pub use resources::{LoggingConfiguration, Tag, TagInfoForResource};

pub use sampling::{HTTPHeader, HTTPRequest, SampledHTTPRequest, TimeWindow};

pub use update::{Update, UpdateValue};

pub use entity::{Entity, Listing, NoExtras, Unscoped};

pub use envelope::{
    Batch, ChangeBody, ChangeReceipt, CreateRequest, CreateResponse, DeleteRequest, EntityRef,
    GetRequest, GetResponse, ListRequest, Mutating, NewRateBasedRule, NewRule, NewRuleGroup,
    NewSet, NewWebAcl, Page, UpdateRequest,
};

pub use operations::Operation;

pub use ids::{ChangeToken, NextMarker};

pub use validation::{Validate, ValidationError};

pub use error::{ErrorKind, ModelError, ServiceError};

pub use client::{Client, Fault, PollerConfig, RetryPolicy, Transport};
