//! # Change Token Ledger
//!
//! Tracks every token the service has handed out. A token is PROVISIONED
//! until a mutating call consumes it, PENDING while the change propagates,
//! and INSYNC once it has been polled `polls_until_insync` times. Only the
//! most recent consumed tokens are remembered; older ones stop resolving.

use indexmap::IndexMap;
use parking_lot::Mutex;
use uuid::Uuid;
use waf_model::{ChangeToken, ChangeTokenStatus, ErrorKind, ServiceError};

/// Consumed tokens remembered for status polls before the oldest are dropped.
pub const RETAINED_TOKENS: usize = 1024;

#[derive(Debug)]
struct Entry {
    status: ChangeTokenStatus,
    polls: u32,
}

#[derive(Debug, Default)]
struct Ledger {
    entries: IndexMap<String, Entry>,
    outstanding: Option<String>,
}

impl Ledger {
    /// Drops the oldest consumed tokens beyond `retained`, settled ones first.
    fn evict(&mut self, retained: usize) {
        while self.entries.len() > retained + 1 {
            let victim = self
                .entries
                .iter()
                .position(|(_, entry)| entry.status == ChangeTokenStatus::Insync)
                .or_else(|| {
                    self.entries
                        .iter()
                        .position(|(_, entry)| entry.status != ChangeTokenStatus::Provisioned)
                });
            match victim {
                Some(index) => {
                    self.entries.shift_remove_index(index);
                }
                None => break,
            }
        }
    }
}

#[derive(Debug)]
pub struct TokenLedger {
    ledger: Mutex<Ledger>,
    polls_until_insync: u32,
    retained: usize,
}

impl TokenLedger {
    pub fn new(polls_until_insync: u32) -> Self {
        Self::with_retention(polls_until_insync, RETAINED_TOKENS)
    }

    pub fn with_retention(polls_until_insync: u32, retained: usize) -> Self {
        Self {
            ledger: Mutex::new(Ledger::default()),
            polls_until_insync,
            retained,
        }
    }

    /// Returns the outstanding PROVISIONED token, minting one if none is.
    pub fn issue(&self) -> ChangeToken {
        let mut ledger = self.ledger.lock();
        if let Some(token) = &ledger.outstanding {
            return ChangeToken::new(token.clone());
        }

        let token = Uuid::new_v4().to_string();
        ledger.entries.insert(
            token.clone(),
            Entry {
                status: ChangeTokenStatus::Provisioned,
                polls: 0,
            },
        );
        ledger.outstanding = Some(token.clone());
        ledger.evict(self.retained);
        ChangeToken::new(token)
    }

    /// Fails with StaleData unless `token` is PROVISIONED.
    pub fn check(&self, token: &ChangeToken) -> Result<(), ServiceError> {
        Self::check_in(&self.ledger.lock(), token)
    }

    fn check_in(ledger: &Ledger, token: &ChangeToken) -> Result<(), ServiceError> {
        match ledger.entries.get(token.as_str()) {
            Some(entry) if entry.status == ChangeTokenStatus::Provisioned => Ok(()),
            Some(_) => Err(ServiceError::new(
                ErrorKind::StaleData,
                format!("Change token {} has already been used", token),
            )),
            None => Err(ServiceError::new(
                ErrorKind::StaleData,
                format!("Change token {} was not issued by this service", token),
            )),
        }
    }

    /// Marks a checked token as used by a committed change.
    pub fn consume(&self, token: &ChangeToken) -> Result<(), ServiceError> {
        let mut ledger = self.ledger.lock();
        Self::check_in(&ledger, token)?;
        if let Some(entry) = ledger.entries.get_mut(token.as_str()) {
            entry.status = ChangeTokenStatus::Pending;
        }
        if ledger.outstanding.as_deref() == Some(token.as_str()) {
            ledger.outstanding = None;
        }
        ledger.evict(self.retained);
        Ok(())
    }

    /// Reports the status of `token`, advancing a PENDING token one poll.
    pub fn status(&self, token: &ChangeToken) -> Result<ChangeTokenStatus, ServiceError> {
        let mut ledger = self.ledger.lock();
        let entry = ledger.entries.get_mut(token.as_str()).ok_or_else(|| {
            ServiceError::new(
                ErrorKind::NonexistentItem,
                format!("Change token {} does not exist", token),
            )
        })?;

        let reported = entry.status.clone();
        if entry.status == ChangeTokenStatus::Pending {
            entry.polls += 1;
            if entry.polls >= self.polls_until_insync {
                entry.status = ChangeTokenStatus::Insync;
            }
        }
        Ok(reported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outstanding_token_is_reused() {
        let ledger = TokenLedger::new(1);
        let first = ledger.issue();
        assert_eq!(ledger.issue(), first);

        ledger.consume(&first).unwrap();
        assert_ne!(ledger.issue(), first);
    }

    #[test]
    fn test_used_and_unknown_tokens_are_stale() {
        let ledger = TokenLedger::new(1);
        let token = ledger.issue();
        ledger.consume(&token).unwrap();

        let err = ledger.consume(&token).unwrap_err();
        assert_eq!(err.kind, ErrorKind::StaleData);
        let err = ledger.check(&ChangeToken::new("made-up")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::StaleData);
    }

    #[test]
    fn test_status_lifecycle() {
        let ledger = TokenLedger::new(2);
        let token = ledger.issue();
        assert_eq!(ledger.status(&token).unwrap(), ChangeTokenStatus::Provisioned);

        ledger.consume(&token).unwrap();
        assert_eq!(ledger.status(&token).unwrap(), ChangeTokenStatus::Pending);
        assert_eq!(ledger.status(&token).unwrap(), ChangeTokenStatus::Pending);
        assert_eq!(ledger.status(&token).unwrap(), ChangeTokenStatus::Insync);
    }

    #[test]
    fn test_unknown_token_status() {
        let ledger = TokenLedger::new(1);
        let err = ledger.status(&ChangeToken::new("nope")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::NonexistentItem);
    }

    #[test]
    fn test_ledger_forgets_oldest_settled_tokens() {
        let ledger = TokenLedger::with_retention(1, 8);
        let mut consumed = Vec::new();
        for _ in 0..100 {
            let token = ledger.issue();
            ledger.consume(&token).unwrap();
            ledger.status(&token).unwrap();
            consumed.push(token);
        }
        ledger.issue();
        assert!(ledger.ledger.lock().entries.len() <= 9);

        let newest = consumed.last().unwrap();
        assert_eq!(ledger.status(newest).unwrap(), ChangeTokenStatus::Insync);
        let err = ledger.status(&consumed[0]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::NonexistentItem);
    }

    #[test]
    fn test_pending_tokens_outlive_settled_ones() {
        let ledger = TokenLedger::with_retention(5, 2);
        let pending = ledger.issue();
        ledger.consume(&pending).unwrap();
        for _ in 0..4 {
            let token = ledger.issue();
            ledger.consume(&token).unwrap();
            for _ in 0..5 {
                ledger.status(&token).unwrap();
            }
        }
        assert_eq!(ledger.status(&pending).unwrap(), ChangeTokenStatus::Pending);
    }
}
