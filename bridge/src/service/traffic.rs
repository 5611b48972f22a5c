// Observed traffic: the request counts behind rate-based rules and the
// sampled requests a web ACL reports.

use super::{admit, lookup, required, MemoryWaf};
use crate::table::paginate;
use chrono::{DateTime, Duration, Utc};
use indexmap::IndexMap;
use log::debug;
use rand::seq::SliceRandom;
use waf_model::operations::{
    GetRateBasedRuleManagedKeysRequest, GetRateBasedRuleManagedKeysResponse,
    GetSampledRequestsRequest, GetSampledRequestsResponse,
};
use waf_model::{ErrorKind, RateBasedRule, SampledHTTPRequest, ServiceError, TimeWindow, WebACL};

/// Rule id that selects requests handled by the default action.
pub const DEFAULT_ACTION_RULE: &str = "Default_Action";

/// Rate-based rules count requests over this trailing window.
pub fn rate_window() -> Duration {
    Duration::minutes(5)
}

/// Samples older than this are gone.
pub fn sample_retention() -> Duration {
    Duration::hours(3)
}

impl MemoryWaf {
    /// Counts one request from `ip` against a rate-based rule.
    pub fn record_request(
        &self,
        rule_id: &str,
        ip: &str,
        at: DateTime<Utc>,
    ) -> Result<(), ServiceError> {
        let mut state = self.state.write();
        lookup::<RateBasedRule>(&state, rule_id)?;

        let seen = state.traffic.entry(rule_id.to_string()).or_default();
        let horizon = at - rate_window();
        seen.retain(|(_, when)| *when > horizon);
        seen.push((ip.to_string(), at));
        Ok(())
    }

    /// Source addresses over the rule's limit in the last five minutes, in
    /// the order they were first seen.
    pub fn get_rate_based_rule_managed_keys(
        &self,
        request: GetRateBasedRuleManagedKeysRequest,
    ) -> Result<GetRateBasedRuleManagedKeysResponse, ServiceError> {
        admit(&request)?;
        let rule_id = required(&request.rule_id, "RuleId")?;

        let state = self.state.read();
        let rule = lookup::<RateBasedRule>(&state, rule_id)?;
        let limit = rule.rate_limit.unwrap_or_default();

        let horizon = Utc::now() - rate_window();
        let mut counts: IndexMap<&str, i64> = IndexMap::new();
        for (ip, when) in state.traffic.get(rule_id).into_iter().flatten() {
            if *when > horizon {
                *counts.entry(ip.as_str()).or_default() += 1;
            }
        }

        let keyed: Vec<(String, String)> = counts
            .into_iter()
            .filter(|(_, count)| *count > limit)
            .map(|(ip, _)| (ip.to_string(), ip.to_string()))
            .collect();
        let (managed_keys, next_marker) = paginate(
            keyed,
            request.next_marker.as_ref(),
            self.config.page_size(None),
        )?;

        Ok(GetRateBasedRuleManagedKeysResponse {
            managed_keys: Some(managed_keys),
            next_marker,
        })
    }

    /// Files a request the web ACL handled under `rule_id`, which is an
    /// activated rule id or `Default_Action`.
    pub fn record_sample(
        &self,
        web_acl_id: &str,
        rule_id: &str,
        mut sample: SampledHTTPRequest,
    ) -> Result<(), ServiceError> {
        let mut state = self.state.write();
        let acl = lookup::<WebACL>(&state, web_acl_id)?;
        check_sampled_rule(acl, rule_id)?;

        sample.weight.get_or_insert(1);
        let at = *sample.timestamp.get_or_insert_with(Utc::now);
        let samples = state
            .samples
            .entry((web_acl_id.to_string(), rule_id.to_string()))
            .or_default();
        let horizon = Utc::now() - sample_retention();
        samples.retain(|kept| kept.timestamp.map_or(false, |when| when > horizon));
        let position = samples.partition_point(|kept| kept.timestamp <= Some(at));
        samples.insert(position, sample);
        Ok(())
    }

    /// Up to `MaxItems` requests drawn uniformly from the first
    /// `sample_population` requests of the window, returned in time order.
    pub fn get_sampled_requests(
        &self,
        request: GetSampledRequestsRequest,
    ) -> Result<GetSampledRequestsResponse, ServiceError> {
        admit(&request)?;
        let web_acl_id = required(&request.web_acl_id, "WebAclId")?;
        let rule_id = required(&request.rule_id, "RuleId")?;
        let window = required(&request.time_window, "TimeWindow")?;
        let max_items = usize::try_from(*required(&request.max_items, "MaxItems")?).unwrap_or(0);

        let state = self.state.read();
        let acl = lookup::<WebACL>(&state, web_acl_id)?;
        check_sampled_rule(acl, rule_id)?;

        let window = clamp_window(window, Utc::now())?;
        let mut population: Vec<&SampledHTTPRequest> = state
            .samples
            .get(&(web_acl_id.clone(), rule_id.clone()))
            .into_iter()
            .flatten()
            .filter(|sample| sample.timestamp.map_or(false, |at| window.contains(&at)))
            .take(self.config.limits.sample_population)
            .collect();
        let population_size = population.len() as i64;

        let mut rng = rand::thread_rng();
        population.shuffle(&mut rng);
        population.truncate(max_items);
        population.sort_by_key(|sample| sample.timestamp);

        debug!(
            "Sampled {} of {} requests for {} / {}",
            population.len(),
            population_size,
            web_acl_id,
            rule_id
        );
        Ok(GetSampledRequestsResponse {
            sampled_requests: Some(population.into_iter().cloned().collect()),
            population_size: Some(population_size),
            time_window: Some(window),
        })
    }
}

fn check_sampled_rule(acl: &WebACL, rule_id: &str) -> Result<(), ServiceError> {
    let activated = acl
        .rules()
        .iter()
        .any(|rule| rule.rule_id.as_deref() == Some(rule_id));
    if rule_id == DEFAULT_ACTION_RULE || activated {
        Ok(())
    } else {
        Err(ServiceError::new(
            ErrorKind::NonexistentItem,
            format!("Rule {} is not in web ACL", rule_id),
        ))
    }
}

/// Narrows a requested window to the retained three hours before `now`.
fn clamp_window(window: &TimeWindow, now: DateTime<Utc>) -> Result<TimeWindow, ServiceError> {
    let earliest = now - sample_retention();
    let start = window.start_time.unwrap_or(earliest).max(earliest);
    let end = window.end_time.unwrap_or(now).min(now);
    if start >= end {
        return Err(ServiceError::new(
            ErrorKind::InvalidParameter,
            "TimeWindow must end after it starts and overlap the last three hours",
        ));
    }
    Ok(TimeWindow::new(start, end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use waf_model::envelope::{Batch, NewRateBasedRule, NewWebAcl};
    use waf_model::operations::GetChangeTokenRequest;
    use waf_model::{
        ActivatedRule, ChangeBody, ChangeToken, HTTPRequest, RateLimitSetting, Update, WafAction,
    };

    fn token(waf: &MemoryWaf) -> ChangeToken {
        waf.get_change_token(GetChangeTokenRequest {})
            .unwrap()
            .change_token
            .unwrap()
    }

    fn rate_rule(waf: &MemoryWaf, limit: i64) -> String {
        waf.create::<RateBasedRule>(NewRateBasedRule::by_ip("flood", "Flood", limit).with_token(token(waf)))
            .unwrap()
            .entity
            .unwrap()
            .rule_id
            .unwrap()
    }

    fn sample(ip: &str, at: DateTime<Utc>) -> SampledHTTPRequest {
        SampledHTTPRequest {
            request: Some(HTTPRequest {
                client_ip: Some(ip.to_string()),
                ..Default::default()
            }),
            weight: Some(1),
            timestamp: Some(at),
            action: Some("BLOCK".to_string()),
            rule_within_rule_group: None,
        }
    }

    #[test]
    fn test_managed_keys_exceed_limit() {
        let waf = MemoryWaf::default();
        let rule_id = rate_rule(&waf, 100);
        let now = Utc::now();

        for _ in 0..101 {
            waf.record_request(&rule_id, "192.0.2.44", now).unwrap();
        }
        for _ in 0..100 {
            waf.record_request(&rule_id, "198.51.100.7", now).unwrap();
        }

        let keys = waf
            .get_rate_based_rule_managed_keys(GetRateBasedRuleManagedKeysRequest::new(
                rule_id.as_str(),
            ))
            .unwrap();
        assert_eq!(keys.managed_keys, Some(vec!["192.0.2.44".to_string()]));
        assert!(keys.next_marker.is_none());
    }

    #[test]
    fn test_old_requests_fall_out_of_window() {
        let waf = MemoryWaf::default();
        let rule_id = rate_rule(&waf, 100);
        let stale = Utc::now() - Duration::minutes(10);
        for _ in 0..150 {
            waf.record_request(&rule_id, "192.0.2.44", stale).unwrap();
        }

        let keys = waf
            .get_rate_based_rule_managed_keys(GetRateBasedRuleManagedKeysRequest::new(
                rule_id.as_str(),
            ))
            .unwrap();
        assert_eq!(keys.managed_keys, Some(vec![]));
    }

    #[test]
    fn test_raised_limit_releases_keys() {
        let waf = MemoryWaf::default();
        let rule_id = rate_rule(&waf, 100);
        let now = Utc::now();
        for _ in 0..150 {
            waf.record_request(&rule_id, "192.0.2.44", now).unwrap();
        }

        waf.update(
            Batch::<RateBasedRule>::new(rule_id.as_str(), vec![])
                .with_extras(RateLimitSetting::new(200))
                .with_token(token(&waf)),
        )
        .unwrap();
        let keys = waf
            .get_rate_based_rule_managed_keys(GetRateBasedRuleManagedKeysRequest::new(
                rule_id.as_str(),
            ))
            .unwrap();
        assert_eq!(keys.managed_keys, Some(vec![]));
    }

    #[test]
    fn test_unknown_rate_based_rule() {
        let waf = MemoryWaf::default();
        let err = waf
            .record_request("missing", "192.0.2.1", Utc::now())
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NonexistentItem);
    }

    fn acl_with_rule(waf: &MemoryWaf) -> (String, String) {
        let rule_id = rate_rule(waf, 100);
        let acl_id = waf
            .create::<WebACL>(NewWebAcl::new("acl", "Acl", WafAction::allow()).with_token(token(waf)))
            .unwrap()
            .entity
            .unwrap()
            .web_acl_id
            .unwrap();
        waf.update(
            Batch::<WebACL>::new(
                acl_id.as_str(),
                vec![Update::insert(ActivatedRule::rate_based(
                    1,
                    rule_id.as_str(),
                    WafAction::block(),
                ))],
            )
            .with_token(token(waf)),
        )
        .unwrap();
        (acl_id, rule_id)
    }

    #[test]
    fn test_sampled_requests_respect_window_and_max_items() {
        let waf = MemoryWaf::default();
        let (acl_id, rule_id) = acl_with_rule(&waf);
        let now = Utc::now();
        for minutes in [5, 10, 15, 20, 240] {
            waf.record_sample(&acl_id, &rule_id, sample("192.0.2.1", now - Duration::minutes(minutes)))
                .unwrap();
        }

        let window = TimeWindow::ending_at(now, Duration::hours(6));
        let response = waf
            .get_sampled_requests(GetSampledRequestsRequest::new(
                acl_id.as_str(),
                rule_id.as_str(),
                window,
                2,
            ))
            .unwrap();

        assert_eq!(response.population_size, Some(4));
        let samples = response.sampled_requests.unwrap();
        assert_eq!(samples.len(), 2);
        assert!(samples[0].timestamp <= samples[1].timestamp);

        let clamped = response.time_window.unwrap();
        assert!(clamped.start_time.unwrap() >= now - sample_retention());
    }

    #[test]
    fn test_population_is_capped() {
        let mut config = crate::config::BridgeConfig::default();
        config.limits.sample_population = 3;
        let waf = MemoryWaf::new(config);
        let (acl_id, _) = acl_with_rule(&waf);
        let now = Utc::now();
        for minutes in 1..=5 {
            waf.record_sample(
                &acl_id,
                DEFAULT_ACTION_RULE,
                sample("192.0.2.9", now - Duration::minutes(minutes)),
            )
            .unwrap();
        }

        let response = waf
            .get_sampled_requests(GetSampledRequestsRequest::new(
                acl_id.as_str(),
                DEFAULT_ACTION_RULE,
                TimeWindow::ending_at(now, Duration::hours(1)),
                100,
            ))
            .unwrap();
        assert_eq!(response.population_size, Some(3));
        assert_eq!(response.sampled_requests.unwrap().len(), 3);
    }

    #[test]
    fn test_rule_must_be_in_acl() {
        let waf = MemoryWaf::default();
        let (acl_id, _) = acl_with_rule(&waf);
        let err = waf
            .get_sampled_requests(GetSampledRequestsRequest::new(
                acl_id.as_str(),
                "elsewhere",
                TimeWindow::ending_at(Utc::now(), Duration::hours(1)),
                10,
            ))
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NonexistentItem);
    }

    #[test]
    fn test_inverted_window_is_invalid() {
        let now = Utc::now();
        let window = TimeWindow::new(now - Duration::minutes(5), now - Duration::minutes(10));
        let err = clamp_window(&window, now).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidParameter);

        let ancient = TimeWindow::ending_at(now - Duration::days(1), Duration::hours(1));
        assert!(clamp_window(&ancient, now).is_err());
    }
}
