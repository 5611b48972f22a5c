//! # Wire Dispatch
//!
//! Puts `MemoryWaf` behind the `Transport` seam of `waf_model::Client`.
//! A call arrives as an `X-Amz-Target` value and a JSON body, is decoded
//! into the model's request type, served, and answered with either the
//! response body or a fault body.
//!
//! ## Routing
//!
//! - Entity operations (`Create/Get/Update/Delete<Entity>`, `List<Entities>`)
//!   are matched per entity type from the names the model defines.
//! - Every other operation has one arm in `MemoryWaf::dispatch`.
//!
//! A body that does not decode is a `WAFBadRequestException`; so is an
//! operation this service does not know.

use crate::service::{MemoryWaf, Stored};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use waf_model::operations::{
    ActivatedRulesInRuleGroup, CreateWebACLMigrationStackRequest,
    DeleteLoggingConfigurationRequest, DeletePermissionPolicyRequest, GetChangeTokenRequest,
    GetChangeTokenStatusRequest, GetLoggingConfigurationRequest, GetPermissionPolicyRequest,
    GetRateBasedRuleManagedKeysRequest, GetSampledRequestsRequest, ListTagsForResourceRequest,
    LoggingConfigurations, PutLoggingConfigurationRequest, PutPermissionPolicyRequest,
    SubscribedRuleGroups, TagResourceRequest, UntagResourceRequest, TARGET_PREFIX,
};
use waf_model::{
    wire, ByteMatchSet, CreateRequest, DeleteRequest, Entity, ErrorKind, Fault, GeoMatchSet,
    GetRequest, IPSet, ListRequest, Listing, RateBasedRule, RegexMatchSet, RegexPatternSet, Rule,
    RuleGroup, ServiceError, SizeConstraintSet, SqlInjectionMatchSet, Transport, UpdateRequest,
    WebACL, XssMatchSet,
};

// ================================================================================================
// REQUEST HANDLING
// ================================================================================================

fn reject(error: ServiceError) -> Fault {
    Fault::Rejected {
        body: error.to_body(),
    }
}

/// Decodes `body` as `R`, serves it with `serve` and encodes the answer.
pub fn handle<R, O>(
    body: &str,
    serve: impl FnOnce(R) -> Result<O, ServiceError>,
) -> Result<String, Fault>
where
    R: DeserializeOwned,
    O: Serialize,
{
    let request: R = wire::decode(body)
        .map_err(|e| reject(ServiceError::new(ErrorKind::BadRequest, e.to_string())))?;
    let response = serve(request).map_err(reject)?;
    wire::encode_unvalidated(&response).map_err(|e| Fault::Unavailable(e.to_string()))
}

impl MemoryWaf {
    /// Serves one operation, named without the target prefix.
    pub fn dispatch(&self, operation: &str, body: &str) -> Result<String, Fault> {
        let routed = None
            .or_else(|| self.route_entity::<ByteMatchSet>(operation, body))
            .or_else(|| self.route_entity::<GeoMatchSet>(operation, body))
            .or_else(|| self.route_entity::<IPSet>(operation, body))
            .or_else(|| self.route_entity::<RegexMatchSet>(operation, body))
            .or_else(|| self.route_entity::<RegexPatternSet>(operation, body))
            .or_else(|| self.route_entity::<SizeConstraintSet>(operation, body))
            .or_else(|| self.route_entity::<SqlInjectionMatchSet>(operation, body))
            .or_else(|| self.route_entity::<XssMatchSet>(operation, body))
            .or_else(|| self.route_entity::<Rule>(operation, body))
            .or_else(|| self.route_entity::<RateBasedRule>(operation, body))
            .or_else(|| self.route_entity::<RuleGroup>(operation, body))
            .or_else(|| self.route_entity::<WebACL>(operation, body));
        if let Some(result) = routed {
            return result;
        }

        match operation {
            "GetChangeToken" => handle(body, |r: GetChangeTokenRequest| self.get_change_token(r)),
            "GetChangeTokenStatus" => {
                handle(body, |r: GetChangeTokenStatusRequest| self.get_change_token_status(r))
            }
            "GetSampledRequests" => {
                handle(body, |r: GetSampledRequestsRequest| self.get_sampled_requests(r))
            }
            "GetRateBasedRuleManagedKeys" => handle(body, |r: GetRateBasedRuleManagedKeysRequest| {
                self.get_rate_based_rule_managed_keys(r)
            }),
            "PutLoggingConfiguration" => handle(body, |r: PutLoggingConfigurationRequest| {
                self.put_logging_configuration(r)
            }),
            "GetLoggingConfiguration" => handle(body, |r: GetLoggingConfigurationRequest| {
                self.get_logging_configuration(r)
            }),
            "DeleteLoggingConfiguration" => handle(body, |r: DeleteLoggingConfigurationRequest| {
                self.delete_logging_configuration(r)
            }),
            "ListLoggingConfigurations" => {
                handle(body, |r: ListRequest<LoggingConfigurations>| {
                    self.list_logging_configurations(r)
                })
            }
            "PutPermissionPolicy" => {
                handle(body, |r: PutPermissionPolicyRequest| self.put_permission_policy(r))
            }
            "GetPermissionPolicy" => {
                handle(body, |r: GetPermissionPolicyRequest| self.get_permission_policy(r))
            }
            "DeletePermissionPolicy" => {
                handle(body, |r: DeletePermissionPolicyRequest| self.delete_permission_policy(r))
            }
            "TagResource" => handle(body, |r: TagResourceRequest| self.tag_resource(r)),
            "UntagResource" => handle(body, |r: UntagResourceRequest| self.untag_resource(r)),
            "ListTagsForResource" => {
                handle(body, |r: ListTagsForResourceRequest| self.list_tags_for_resource(r))
            }
            "ListActivatedRulesInRuleGroup" => {
                handle(body, |r: ListRequest<ActivatedRulesInRuleGroup>| {
                    self.list_activated_rules_in_rule_group(r)
                })
            }
            "ListSubscribedRuleGroups" => handle(body, |r: ListRequest<SubscribedRuleGroups>| {
                self.list_subscribed_rule_groups(r)
            }),
            "CreateWebACLMigrationStack" => handle(body, |r: CreateWebACLMigrationStackRequest| {
                self.create_web_acl_migration_stack(r)
            }),
            other => {
                warn!("Unknown operation {}", other);
                Err(reject(ServiceError::new(
                    ErrorKind::BadRequest,
                    format!("Unknown operation {}", other),
                )))
            }
        }
    }

    /// The five entity operations of `E`, or `None` when `operation` is
    /// not one of them.
    fn route_entity<E>(&self, operation: &str, body: &str) -> Option<Result<String, Fault>>
    where
        E: Stored + Listing<Item = <E as Entity>::Summary>,
    {
        let verb = operation.strip_suffix(E::NAME);
        let result = match verb {
            Some("Create") => handle(body, |r: CreateRequest<E>| self.create::<E>(r)),
            Some("Get") => handle(body, |r: GetRequest<E>| self.get::<E>(r)),
            Some("Update") => handle(body, |r: UpdateRequest<E>| self.update::<E>(r)),
            Some("Delete") => handle(body, |r: DeleteRequest<E>| self.delete::<E>(r)),
            _ if operation == <E as Listing>::OPERATION => {
                handle(body, |r: ListRequest<E>| self.list::<E>(r))
            }
            _ => return None,
        };
        Some(result)
    }
}

impl Transport for MemoryWaf {
    fn call(&self, target: &str, body: &str) -> Result<String, Fault> {
        let operation = target
            .strip_prefix(TARGET_PREFIX)
            .and_then(|rest| rest.strip_prefix('.'))
            .unwrap_or(target);
        debug!("Dispatching {}", operation);
        self.dispatch(operation, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn call(waf: &MemoryWaf, operation: &str, body: Value) -> Result<Value, ServiceError> {
        let target = format!("{}.{}", TARGET_PREFIX, operation);
        match waf.call(&target, &body.to_string()) {
            Ok(text) => Ok(serde_json::from_str(&text).unwrap()),
            Err(Fault::Rejected { body }) => Err(ServiceError::from_body(&body).unwrap()),
            Err(Fault::Unavailable(reason)) => panic!("transport failed: {}", reason),
        }
    }

    fn token(waf: &MemoryWaf) -> String {
        call(waf, "GetChangeToken", json!({})).unwrap()["ChangeToken"]
            .as_str()
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_ip_set_round_trip_over_the_wire() {
        let waf = MemoryWaf::default();
        let created = call(
            &waf,
            "CreateIPSet",
            json!({"Name": "MyIPSetFriendlyName", "ChangeToken": token(&waf)}),
        )
        .unwrap();
        let id = created["IPSet"]["IPSetId"].as_str().unwrap().to_string();
        assert_eq!(created["IPSet"]["IPSetDescriptors"], json!([]));

        call(
            &waf,
            "UpdateIPSet",
            json!({
                "IPSetId": id,
                "ChangeToken": token(&waf),
                "Updates": [{
                    "Action": "INSERT",
                    "IPSetDescriptor": {"Type": "IPV4", "Value": "192.0.2.44/32"}
                }]
            }),
        )
        .unwrap();

        let got = call(&waf, "GetIPSet", json!({"IPSetId": id})).unwrap();
        assert_eq!(
            got["IPSet"]["IPSetDescriptors"],
            json!([{"Type": "IPV4", "Value": "192.0.2.44/32"}])
        );

        let listed = call(&waf, "ListIPSets", json!({"Limit": 10})).unwrap();
        assert_eq!(listed["IPSets"][0]["IPSetId"], json!(id));
        assert!(listed.get("NextMarker").is_none());
    }

    #[test]
    fn test_rejections_carry_fault_codes() {
        let waf = MemoryWaf::default();
        let err = call(&waf, "GetRule", json!({"RuleId": "missing"})).unwrap_err();
        assert_eq!(err.kind, ErrorKind::NonexistentItem);

        let err = call(
            &waf,
            "CreateRule",
            json!({"Name": "r", "MetricName": "R", "ChangeToken": "never-issued"}),
        )
        .unwrap_err();
        assert_eq!(err.kind, ErrorKind::StaleData);
    }

    #[test]
    fn test_unknown_enum_value_is_invalid_option() {
        let waf = MemoryWaf::default();
        let id = call(
            &waf,
            "CreateIPSet",
            json!({"Name": "set", "ChangeToken": token(&waf)}),
        )
        .unwrap()["IPSet"]["IPSetId"]
            .clone();

        let err = call(
            &waf,
            "UpdateIPSet",
            json!({
                "IPSetId": id,
                "ChangeToken": token(&waf),
                "Updates": [{
                    "Action": "UPSERT",
                    "IPSetDescriptor": {"Type": "IPV4", "Value": "192.0.2.0/24"}
                }]
            }),
        )
        .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidParameter);
        assert_eq!(err.reason, Some(waf_model::ParameterExceptionReason::InvalidOption));
    }

    #[test]
    fn test_malformed_body_and_unknown_operation() {
        let waf = MemoryWaf::default();
        let err = match waf.call("AWSWAF_20150824.GetIPSet", "{not json") {
            Err(Fault::Rejected { body }) => ServiceError::from_body(&body).unwrap(),
            other => panic!("expected rejection, got {:?}", other),
        };
        assert_eq!(err.kind, ErrorKind::BadRequest);

        let err = call(&waf, "DescribeEverything", json!({})).unwrap_err();
        assert_eq!(err.kind, ErrorKind::BadRequest);
    }

    #[test]
    fn test_change_token_status_over_the_wire() {
        let waf = MemoryWaf::default();
        let token = token(&waf);
        let status = call(&waf, "GetChangeTokenStatus", json!({"ChangeToken": token})).unwrap();
        assert_eq!(status["ChangeTokenStatus"], json!("PROVISIONED"));
    }

    #[test]
    fn test_subscribed_rule_groups_listing() {
        let mut config = crate::config::BridgeConfig::default();
        config.subscribed_rule_groups.push(waf_model::SubscribedRuleGroupSummary {
            rule_group_id: Some("managed-1".into()),
            name: Some("Managed".into()),
            metric_name: Some("Managed".into()),
        });
        let waf = MemoryWaf::new(config);
        let listed = call(&waf, "ListSubscribedRuleGroups", json!({})).unwrap();
        assert_eq!(listed["RuleGroups"][0]["RuleGroupId"], json!("managed-1"));
    }
}
