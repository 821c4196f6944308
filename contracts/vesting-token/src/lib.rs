//! Vesting Stake Token
//!
//! Mintable fungible token with balances and pre-authorized allowances.
//! Only accounts holding the minter role can mint; the admin that created
//! the token grants that role.
//!
//! The staking engine never depends on this crate directly. It talks to any
//! [`TokenLedger`]; this implementation backs tests and local harnesses.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use vesting_common::{
    constants::token,
    errors::{StakingError, StakingResult},
    events::{EventLog, StakingEvent},
    token_ops::TokenLedger,
    types::{Address, Timestamp},
    validation::require_nonzero,
};

// ============ Token State ============

/// Persisted token state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct TokenState {
    /// Account allowed to grant the minter role
    pub admin: Address,
    /// Accounts allowed to mint
    pub minters: BTreeSet<Address>,
    /// Balance per holder
    pub balances: BTreeMap<Address, u64>,
    /// Allowance per (owner, spender)
    pub allowances: BTreeMap<(Address, Address), u64>,
    /// Total supply tracking
    pub total_supply: u64,
}

/// In-memory token ledger
#[derive(Debug, Clone)]
pub struct StakeToken {
    state: TokenState,
    /// Timestamp stamped on emitted events
    clock: Timestamp,
    events: EventLog,
}

impl StakeToken {
    /// Create a token whose admin is also the first minter and receives
    /// `initial_supply`.
    pub fn new(admin: Address, initial_supply: u64) -> Self {
        let mut minters = BTreeSet::new();
        minters.insert(admin);

        let mut balances = BTreeMap::new();
        if initial_supply > 0 {
            balances.insert(admin, initial_supply);
        }

        Self {
            state: TokenState {
                admin,
                minters,
                balances,
                allowances: BTreeMap::new(),
                total_supply: initial_supply,
            },
            clock: 0,
            events: EventLog::new(),
        }
    }

    /// Get token name
    pub fn name() -> &'static str {
        token::NAME
    }

    /// Get token symbol
    pub fn symbol() -> &'static str {
        token::SYMBOL
    }

    /// Get token decimals
    pub fn decimals() -> u8 {
        token::DECIMALS
    }

    pub fn state(&self) -> &TokenState {
        &self.state
    }

    pub fn total_supply(&self) -> u64 {
        self.state.total_supply
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Set the timestamp stamped on subsequent events
    pub fn set_clock(&mut self, now: Timestamp) {
        self.clock = now;
    }

    pub fn is_minter(&self, account: &Address) -> bool {
        self.state.minters.contains(account)
    }

    /// Grant the minter role (admin only)
    pub fn grant_minter(&mut self, caller: &Address, minter: Address) -> StakingResult<()> {
        if *caller != self.state.admin {
            return Err(StakingError::MintUnauthorized { caller: *caller });
        }
        self.state.minters.insert(minter);
        Ok(())
    }

    /// Mint `amount` to `to` (minters only)
    pub fn mint(&mut self, caller: &Address, to: &Address, amount: u64) -> StakingResult<()> {
        // 1. Amount must be positive
        require_nonzero(amount)?;

        // 2. Caller must hold the minter role
        if !self.is_minter(caller) {
            return Err(StakingError::MintUnauthorized { caller: *caller });
        }

        // 3. Update supply and balance
        let new_supply = self
            .state
            .total_supply
            .checked_add(amount)
            .ok_or(StakingError::Overflow)?;
        let new_balance = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(StakingError::Overflow)?;

        self.state.total_supply = new_supply;
        self.state.balances.insert(*to, new_balance);

        // 4. Emit mint event
        self.events.emit(StakingEvent::TokenMint {
            to: *to,
            amount,
            new_total_supply: new_supply,
            timestamp: self.clock,
        });

        Ok(())
    }

    /// Set the allowance of `spender` on `owner`'s balance
    pub fn approve(&mut self, owner: &Address, spender: &Address, amount: u64) {
        if amount == 0 {
            self.state.allowances.remove(&(*owner, *spender));
        } else {
            self.state.allowances.insert((*owner, *spender), amount);
        }
    }

    /// Raise the allowance of `spender` on `owner`'s balance
    pub fn increase_allowance(
        &mut self,
        owner: &Address,
        spender: &Address,
        added: u64,
    ) -> StakingResult<()> {
        let current = self.allowance(owner, spender);
        let updated = current.checked_add(added).ok_or(StakingError::Overflow)?;
        self.approve(owner, spender, updated);
        Ok(())
    }

    /// Debit `from` and credit `to` with conservation of supply
    fn move_balance(&mut self, from: &Address, to: &Address, amount: u64) -> StakingResult<()> {
        // 1. Amount must be positive
        require_nonzero(amount)?;

        // 2. Sender must have enough balance
        let available = self.balance_of(from);
        if available < amount {
            return Err(StakingError::InsufficientBalance {
                available,
                requested: amount,
            });
        }

        // 3. Apply both sides; a self-transfer is a no-op on balances
        if from != to {
            let credited = self
                .balance_of(to)
                .checked_add(amount)
                .ok_or(StakingError::Overflow)?;
            let debited = available - amount;
            if debited == 0 {
                self.state.balances.remove(from);
            } else {
                self.state.balances.insert(*from, debited);
            }
            self.state.balances.insert(*to, credited);
        }

        // 4. Emit transfer event
        self.events.emit(StakingEvent::TokenTransfer {
            from: *from,
            to: *to,
            amount,
            timestamp: self.clock,
        });

        Ok(())
    }
}

impl TokenLedger for StakeToken {
    fn balance_of(&self, owner: &Address) -> u64 {
        self.state.balances.get(owner).copied().unwrap_or(0)
    }

    fn allowance(&self, owner: &Address, spender: &Address) -> u64 {
        self.state
            .allowances
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or(0)
    }

    fn transfer(&mut self, from: &Address, to: &Address, amount: u64) -> StakingResult<()> {
        self.move_balance(from, to, amount)
    }

    fn transfer_from(
        &mut self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: u64,
    ) -> StakingResult<()> {
        let allowed = self.allowance(from, spender);
        if allowed < amount {
            return Err(StakingError::InsufficientAllowance {
                available: allowed,
                requested: amount,
            });
        }

        self.move_balance(from, to, amount)?;
        self.approve(from, spender, allowed - amount);
        Ok(())
    }
}

// ============ Tests ============

#[cfg(test)]
mod tests {
    use super::*;
    use vesting_common::events::EventType;

    const ADMIN: Address = [1u8; 32];
    const MINTER: Address = [2u8; 32];
    const NOT_MINTER: Address = [3u8; 32];
    const CUSTODY: Address = [9u8; 32];

    #[test]
    fn test_metadata() {
        assert_eq!(StakeToken::symbol(), "VST");
        assert_eq!(StakeToken::decimals(), 18);
        assert!(!StakeToken::name().is_empty());
    }

    #[test]
    fn test_minter_can_mint() {
        let mut token = StakeToken::new(ADMIN, 0);
        token.grant_minter(&ADMIN, MINTER).unwrap();

        let before = token.balance_of(&MINTER);
        token.mint(&MINTER, &MINTER, 10).unwrap();

        assert_eq!(token.balance_of(&MINTER), before + 10);
        assert_eq!(token.total_supply(), 10);
        assert_eq!(token.events().filter_by_type(EventType::TokenMint).len(), 1);
    }

    #[test]
    fn test_not_minter_cannot_mint() {
        let mut token = StakeToken::new(ADMIN, 0);
        assert_eq!(
            token.mint(&NOT_MINTER, &NOT_MINTER, 10),
            Err(StakingError::MintUnauthorized { caller: NOT_MINTER })
        );
        assert_eq!(token.total_supply(), 0);
    }

    #[test]
    fn test_only_admin_grants_minter() {
        let mut token = StakeToken::new(ADMIN, 0);
        assert!(token.grant_minter(&NOT_MINTER, NOT_MINTER).is_err());
        assert!(!token.is_minter(&NOT_MINTER));
    }

    #[test]
    fn test_transfer() {
        let mut token = StakeToken::new(ADMIN, 1_000);
        token.transfer(&ADMIN, &MINTER, 600).unwrap();

        assert_eq!(token.balance_of(&ADMIN), 400);
        assert_eq!(token.balance_of(&MINTER), 600);
        assert_eq!(token.total_supply(), 1_000);

        assert_eq!(
            token.transfer(&ADMIN, &MINTER, 401),
            Err(StakingError::InsufficientBalance { available: 400, requested: 401 })
        );
        assert_eq!(token.transfer(&ADMIN, &MINTER, 0), Err(StakingError::ZeroAmount));
    }

    #[test]
    fn test_transfer_from_consumes_allowance() {
        let mut token = StakeToken::new(ADMIN, 1_000);
        token.increase_allowance(&ADMIN, &CUSTODY, 300).unwrap();

        token.transfer_from(&CUSTODY, &ADMIN, &CUSTODY, 200).unwrap();
        assert_eq!(token.balance_of(&CUSTODY), 200);
        assert_eq!(token.allowance(&ADMIN, &CUSTODY), 100);

        assert_eq!(
            token.transfer_from(&CUSTODY, &ADMIN, &CUSTODY, 101),
            Err(StakingError::InsufficientAllowance { available: 100, requested: 101 })
        );
        assert_eq!(token.balance_of(&ADMIN), 800);
    }

    #[test]
    fn test_events_use_clock() {
        let mut token = StakeToken::new(ADMIN, 50);
        token.set_clock(86_400);
        token.transfer(&ADMIN, &MINTER, 5).unwrap();
        assert_eq!(token.events().last().map(|e| e.timestamp()), Some(86_400));
    }
}
