//! Builds a web ACL that blocks one address range, following the change
//! token protocol through `waf_model::Client`.
//!
//! Run with `cargo run -p waf-bridge --example change_token_usage`.

use waf_bridge::MemoryWaf;
use waf_model::envelope::{Batch, NewSet};
use waf_model::{
    ActivatedRule, Client, IPSet, IPSetDescriptor, ModelError, NewRule, NewWebAcl, PollerConfig,
    Predicate, PredicateType, Rule, Update, WafAction, WebACL,
};

fn main() -> Result<(), ModelError> {
    let waf = MemoryWaf::default();
    let client = Client::new(&waf);

    let ip_set = client
        .with_change_token(|| NewSet::<IPSet>::named("blocked-sources"))?
        .entity
        .and_then(|set| set.ip_set_id)
        .unwrap_or_default();
    client.with_change_token(|| {
        Batch::<IPSet>::new(
            ip_set.as_str(),
            vec![Update::insert(IPSetDescriptor::ipv4("192.0.2.0/24"))],
        )
    })?;

    let rule = client
        .with_change_token(|| NewRule::new("blocked-sources", "BlockedSources"))?
        .entity
        .and_then(|rule| rule.rule_id)
        .unwrap_or_default();
    client.with_change_token(|| {
        Batch::<Rule>::new(
            rule.as_str(),
            vec![Update::insert(Predicate::matching(
                PredicateType::IpMatch,
                ip_set.as_str(),
            ))],
        )
    })?;

    let acl = client
        .with_change_token(|| NewWebAcl::new("edge", "Edge", WafAction::allow()))?
        .entity
        .and_then(|acl| acl.web_acl_id)
        .unwrap_or_default();
    let receipt = client.with_change_token(|| {
        Batch::<WebACL>::new(
            acl.as_str(),
            vec![Update::insert(ActivatedRule::new(1, rule.as_str(), WafAction::block()))],
        )
    })?;

    if let Some(token) = receipt.change_token {
        let status = client.wait_for_insync(&token, &PollerConfig::default())?;
        println!("Web ACL {} is {}", acl, status);
    }
    Ok(())
}
