//! Whitelist Registry
//!
//! The set of accounts permitted to stake. Mutations are strict: adding a
//! present account or removing an absent one is a caller error, not a no-op.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::errors::{StakingError, StakingResult};
use crate::types::Address;
use crate::BTreeSet;

/// Set of eligible participant addresses
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct Whitelist {
    accounts: BTreeSet<Address>,
}

impl Whitelist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `account`, failing if it is already present
    pub fn add(&mut self, account: Address) -> StakingResult<()> {
        if !self.accounts.insert(account) {
            return Err(StakingError::AlreadyWhitelisted { account });
        }
        Ok(())
    }

    /// Remove `account`, failing if it is absent
    pub fn remove(&mut self, account: &Address) -> StakingResult<()> {
        if !self.accounts.remove(account) {
            return Err(StakingError::NotWhitelisted { account: *account });
        }
        Ok(())
    }

    pub fn is_whitelisted(&self, account: &Address) -> bool {
        self.accounts.contains(account)
    }

    /// Fail with `NotWhitelisted` unless `account` is present
    pub fn require(&self, account: &Address) -> StakingResult<()> {
        if !self.is_whitelisted(account) {
            return Err(StakingError::NotWhitelisted { account: *account });
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Address> {
        self.accounts.iter()
    }
}
