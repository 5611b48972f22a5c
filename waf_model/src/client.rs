// Client-side seams around the model: a transport trait, and the three
// helpers every caller of the service ends up writing (pagination, waiting
// for a change to propagate, and resubmitting with a fresh change token).

use crate::envelope::{ChangeBody, ListRequest, Mutating};
use crate::entity::Listing;
use crate::error::{ModelError, ServiceError};
use crate::ids::ChangeToken;
use crate::operations::{
    GetChangeTokenRequest, GetChangeTokenStatusRequest, Operation,
};
use crate::vocabulary::ChangeTokenStatus;
use crate::wire;
use log::{debug, info, warn};
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

/// Failure reported by a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fault {
    /// The service answered with a fault body.
    Rejected { body: String },
    /// The service could not be reached or gave no usable answer.
    Unavailable(String),
}

/// Moves one serialized request to the service and returns its response
/// body. Signing, HTTP and connection handling live behind this trait.
pub trait Transport {
    fn call(&self, target: &str, body: &str) -> Result<String, Fault>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn call(&self, target: &str, body: &str) -> Result<String, Fault> {
        (**self).call(target, body)
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn call(&self, target: &str, body: &str) -> Result<String, Fault> {
        (**self).call(target, body)
    }
}

/// Polling schedule for `Client::wait_for_insync`.
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Status checks before giving up
    pub max_attempts: u32,
    /// Pause between checks
    pub interval: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            max_attempts: 60,
            interval: Duration::from_secs(2),
        }
    }
}

/// Retry policy for resubmitting a change after a stale-token rejection.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff_ms: u64,
    exponential_backoff: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, 100)
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff_ms: u64) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff_ms,
            exponential_backoff: false,
        }
    }

    pub fn with_exponential_backoff(mut self) -> Self {
        self.exponential_backoff = true;
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    fn delay(&self, attempt: u32) -> Duration {
        let ms = if self.exponential_backoff {
            self.backoff_ms.saturating_mul(2_u64.saturating_pow(attempt))
        } else {
            self.backoff_ms
        };
        Duration::from_millis(ms)
    }

    /// Runs `f` until it succeeds, fails with an error `retryable` rejects,
    /// or the attempt budget is spent. Returns the last error in that case.
    pub fn execute<F, T, E, R>(&self, mut f: F, retryable: R) -> Result<T, E>
    where
        F: FnMut(u32) -> Result<T, E>,
        R: Fn(&E) -> bool,
    {
        let mut attempt = 0;
        loop {
            match f(attempt) {
                Ok(result) => return Ok(result),
                Err(e) if attempt + 1 < self.max_attempts && retryable(&e) => {
                    std::thread::sleep(self.delay(attempt));
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Typed access to the service through a `Transport`.
pub struct Client<T> {
    transport: T,
    retry: RetryPolicy,
}

impl<T: Transport> Client<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Validates and encodes `request`, calls the service, and decodes the
    /// response or the fault.
    pub fn send<O: Operation>(&self, request: &O) -> Result<O::Output, ModelError> {
        let body = wire::encode(request)?;
        let target = O::target();
        debug!("Calling {}", target);

        match self.transport.call(&target, &body) {
            Ok(text) => wire::decode(&text),
            Err(Fault::Rejected { body }) => {
                let error = ServiceError::from_body(&body)?;
                debug!("{} rejected: {}", target, error);
                Err(ModelError::Service(error))
            }
            Err(Fault::Unavailable(reason)) => {
                warn!("{} failed in transport: {}", target, reason);
                Err(ModelError::Transport(reason))
            }
        }
    }

    /// Obtains a change token for the next mutating call.
    pub fn get_change_token(&self) -> Result<ChangeToken, ModelError> {
        self.send(&GetChangeTokenRequest {})?
            .change_token
            .ok_or_else(|| {
                ModelError::Serialization("GetChangeToken response has no ChangeToken".to_string())
            })
    }

    pub fn change_token_status(&self, token: &ChangeToken) -> Result<ChangeTokenStatus, ModelError> {
        self.send(&GetChangeTokenStatusRequest::new(token.clone()))?
            .change_token_status
            .ok_or_else(|| {
                ModelError::Serialization(
                    "GetChangeTokenStatus response has no ChangeTokenStatus".to_string(),
                )
            })
    }

    /// Follows `NextMarker` until the service stops returning one and
    /// returns every item in the order the service reported them.
    pub fn collect_all<L>(&self, request: ListRequest<L>) -> Result<Vec<L::Item>, ModelError>
    where
        L: Listing + Debug + Clone + PartialEq,
    {
        let mut items = Vec::new();
        let mut next = Some(request);
        let mut pages = 0usize;

        while let Some(request) = next {
            let page = self.send(&request)?;
            pages += 1;
            next = request.next_page(&page);
            items.extend(page.items);
        }

        debug!("{} returned {} items in {} pages", L::OPERATION, items.len(), pages);
        Ok(items)
    }

    /// Polls the status of `token` until it is INSYNC or the attempt budget
    /// of `config` is spent. Returns the last status observed.
    pub fn wait_for_insync(
        &self,
        token: &ChangeToken,
        config: &PollerConfig,
    ) -> Result<ChangeTokenStatus, ModelError> {
        let mut status = self.change_token_status(token)?;
        let mut attempts = 1;

        while !status.is_insync() && attempts < config.max_attempts {
            std::thread::sleep(config.interval);
            status = self.change_token_status(token)?;
            attempts += 1;
        }

        if status.is_insync() {
            info!("Change {} in sync after {} status checks", token, attempts);
        } else {
            warn!(
                "Change {} still {} after {} status checks",
                token, status, attempts
            );
        }
        Ok(status)
    }

    /// Obtains a change token, builds one request body, and submits it. A
    /// rejection with a kind that calls for a fresh token (stale data,
    /// exceeded limits) repeats the cycle under the retry policy.
    pub fn with_change_token<B, F>(&self, mut build: F) -> Result<B::Output, ModelError>
    where
        B: ChangeBody,
        F: FnMut() -> B,
    {
        self.retry.execute(
            |attempt| {
                if attempt > 0 {
                    info!(
                        "Resubmitting {} with a fresh change token (attempt {})",
                        B::operation_name(),
                        attempt + 1
                    );
                }
                let token = self.get_change_token()?;
                let request: Mutating<B> = build().with_token(token);
                self.send(&request)
            },
            ModelError::is_retryable_after_refresh,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditions::IPSetDescriptor;
    use crate::envelope::{Batch, NewSet};
    use crate::error::{ErrorKind, ServiceError};
    use crate::sets::IPSet;
    use crate::update::Update;
    use serde_json::{json, Value};
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// Replays scripted answers and records every call.
    #[derive(Default)]
    struct Scripted {
        answers: RefCell<VecDeque<Result<Value, Fault>>>,
        calls: RefCell<Vec<(String, Value)>>,
    }

    impl Scripted {
        fn answer(self, value: Value) -> Self {
            self.answers.borrow_mut().push_back(Ok(value));
            self
        }

        fn fault(self, error: ServiceError) -> Self {
            self.answers
                .borrow_mut()
                .push_back(Err(Fault::Rejected { body: error.to_body() }));
            self
        }

        fn targets(&self) -> Vec<String> {
            self.calls.borrow().iter().map(|(t, _)| t.clone()).collect()
        }
    }

    impl Transport for Scripted {
        fn call(&self, target: &str, body: &str) -> Result<String, Fault> {
            self.calls
                .borrow_mut()
                .push((target.to_string(), serde_json::from_str(body).unwrap()));
            match self.answers.borrow_mut().pop_front() {
                Some(Ok(value)) => Ok(value.to_string()),
                Some(Err(fault)) => Err(fault),
                None => Err(Fault::Unavailable("no scripted answer".into())),
            }
        }
    }

    #[test]
    fn test_send_rejects_invalid_request_before_calling() {
        let client = Client::new(Scripted::default());
        let request = NewSet::<IPSet>::named("").with_token(ChangeToken::new("t"));
        assert!(matches!(client.send(&request), Err(ModelError::Validation(_))));
        assert!(client.transport().calls.borrow().is_empty());
    }

    #[test]
    fn test_faults_map_to_service_errors() {
        let transport = Scripted::default().fault(ServiceError::new(
            ErrorKind::NonexistentItem,
            "IPSet ipset-9 does not exist",
        ));
        let client = Client::new(transport);
        let error = client
            .send(&crate::envelope::GetRequest::<IPSet>::new("ipset-9"))
            .unwrap_err();
        assert_eq!(error.kind(), Some(&ErrorKind::NonexistentItem));
        assert_eq!(client.transport().targets(), vec!["AWSWAF_20150824.GetIPSet"]);
    }

    #[test]
    fn test_unavailable_maps_to_transport_error() {
        let client = Client::new(Scripted::default());
        let error = client.get_change_token().unwrap_err();
        assert!(matches!(error, ModelError::Transport(_)));
    }

    #[test]
    fn test_collect_all_follows_markers_in_order() {
        let transport = Scripted::default()
            .answer(json!({"IPSets": [{"IPSetId": "c", "Name": "c"}, {"IPSetId": "a", "Name": "a"}], "NextMarker": "m1"}))
            .answer(json!({"IPSets": [{"IPSetId": "b", "Name": "b"}], "NextMarker": "m2"}))
            .answer(json!({"IPSets": []}));
        let client = Client::new(transport);

        let items = client
            .collect_all(ListRequest::<IPSet>::new().with_limit(2))
            .unwrap();
        let ids: Vec<_> = items.iter().filter_map(|s| s.ip_set_id.clone()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);

        let calls = client.transport().calls.borrow();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0].1, json!({"Limit": 2}));
        assert_eq!(calls[1].1, json!({"Limit": 2, "NextMarker": "m1"}));
        assert_eq!(calls[2].1, json!({"Limit": 2, "NextMarker": "m2"}));
    }

    #[test]
    fn test_wait_for_insync_polls_until_done() {
        let transport = Scripted::default()
            .answer(json!({"ChangeTokenStatus": "PENDING"}))
            .answer(json!({"ChangeTokenStatus": "PENDING"}))
            .answer(json!({"ChangeTokenStatus": "INSYNC"}));
        let client = Client::new(transport);
        let config = PollerConfig {
            max_attempts: 5,
            interval: Duration::ZERO,
        };
        let status = client.wait_for_insync(&ChangeToken::new("t"), &config).unwrap();
        assert!(status.is_insync());
        assert_eq!(client.transport().calls.borrow().len(), 3);
    }

    #[test]
    fn test_wait_for_insync_gives_up() {
        let transport = Scripted::default()
            .answer(json!({"ChangeTokenStatus": "PENDING"}))
            .answer(json!({"ChangeTokenStatus": "PENDING"}));
        let client = Client::new(transport);
        let config = PollerConfig {
            max_attempts: 2,
            interval: Duration::ZERO,
        };
        let status = client.wait_for_insync(&ChangeToken::new("t"), &config).unwrap();
        assert_eq!(status, ChangeTokenStatus::Pending);
    }

    #[test]
    fn test_stale_token_is_refreshed_and_resubmitted() {
        let transport = Scripted::default()
            .answer(json!({"ChangeToken": "first"}))
            .fault(ServiceError::new(ErrorKind::StaleData, "token already used"))
            .answer(json!({"ChangeToken": "second"}))
            .answer(json!({"ChangeToken": "second"}));
        let client = Client::new(transport).with_retry_policy(RetryPolicy::new(3, 0));

        let receipt = client
            .with_change_token(|| {
                Batch::<IPSet>::new("ipset-1", vec![Update::insert(IPSetDescriptor::ipv4("192.0.2.44/32"))])
            })
            .unwrap();
        assert_eq!(receipt.change_token, Some(ChangeToken::new("second")));

        let calls = client.transport().calls.borrow();
        assert_eq!(calls.len(), 4);
        assert_eq!(calls[1].1["ChangeToken"], json!("first"));
        assert_eq!(calls[3].1["ChangeToken"], json!("second"));
    }

    #[test]
    fn test_terminal_errors_are_not_retried() {
        let transport = Scripted::default()
            .answer(json!({"ChangeToken": "first"}))
            .fault(ServiceError::new(ErrorKind::NonexistentItem, "no such set"));
        let client = Client::new(transport).with_retry_policy(RetryPolicy::new(3, 0));

        let error = client
            .with_change_token(|| Batch::<IPSet>::new("missing", vec![]))
            .unwrap_err();
        assert_eq!(error.kind(), Some(&ErrorKind::NonexistentItem));
        assert_eq!(client.transport().calls.borrow().len(), 2);
    }

    #[test]
    fn test_retry_policy_stops_at_budget() {
        let policy = RetryPolicy::new(3, 0).with_exponential_backoff();
        let mut calls = 0;
        let result: Result<(), &str> = policy.execute(
            |_| {
                calls += 1;
                Err("again")
            },
            |_| true,
        );
        assert_eq!(result, Err("again"));
        assert_eq!(calls, 3);
    }
}
