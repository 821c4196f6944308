//! Token Ledger Seam
//!
//! The value-transfer ledger that actually moves fungible units is an
//! external collaborator. The staking core only computes amounts and
//! instructs transfers through this trait.

use crate::errors::{StakingError, StakingResult};
use crate::types::Address;

/// External fungible-token ledger
pub trait TokenLedger {
    /// Current balance of `owner`
    fn balance_of(&self, owner: &Address) -> u64;

    /// Amount `spender` may still move out of `owner`'s balance
    fn allowance(&self, owner: &Address, spender: &Address) -> u64;

    /// Move `amount` from `from` to `to`, authorized by `from`
    fn transfer(&mut self, from: &Address, to: &Address, amount: u64) -> StakingResult<()>;

    /// Move `amount` from `from` to `to` using `spender`'s allowance on `from`
    fn transfer_from(
        &mut self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: u64,
    ) -> StakingResult<()>;
}

/// Check that `owner` can fund a pull of `amount` by `spender`.
///
/// Balance is checked before allowance, so an account short on both
/// reports `InsufficientBalance`.
pub fn require_fundable<L: TokenLedger + ?Sized>(
    ledger: &L,
    owner: &Address,
    spender: &Address,
    amount: u64,
) -> StakingResult<()> {
    let available = ledger.balance_of(owner);
    if available < amount {
        return Err(StakingError::InsufficientBalance {
            available,
            requested: amount,
        });
    }

    let allowed = ledger.allowance(owner, spender);
    if allowed < amount {
        return Err(StakingError::InsufficientAllowance {
            available: allowed,
            requested: amount,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[derive(Default)]
    struct FixedLedger {
        balances: BTreeMap<Address, u64>,
        allowances: BTreeMap<(Address, Address), u64>,
    }

    impl TokenLedger for FixedLedger {
        fn balance_of(&self, owner: &Address) -> u64 {
            self.balances.get(owner).copied().unwrap_or(0)
        }

        fn allowance(&self, owner: &Address, spender: &Address) -> u64 {
            self.allowances.get(&(*owner, *spender)).copied().unwrap_or(0)
        }

        fn transfer(&mut self, from: &Address, to: &Address, amount: u64) -> StakingResult<()> {
            Err(StakingError::TransferFailed { from: *from, to: *to, amount })
        }

        fn transfer_from(
            &mut self,
            _spender: &Address,
            from: &Address,
            to: &Address,
            amount: u64,
        ) -> StakingResult<()> {
            Err(StakingError::TransferFailed { from: *from, to: *to, amount })
        }
    }

    #[test]
    fn test_require_fundable_order() {
        let user = [1u8; 32];
        let custody = [9u8; 32];
        let mut ledger = FixedLedger::default();
        ledger.balances.insert(user, 1100);
        ledger.allowances.insert((user, custody), 1000);

        assert!(require_fundable(&ledger, &user, &custody, 1000).is_ok());
        assert_eq!(
            require_fundable(&ledger, &user, &custody, 1101),
            Err(StakingError::InsufficientBalance { available: 1100, requested: 1101 })
        );
        assert_eq!(
            require_fundable(&ledger, &user, &custody, 1001),
            Err(StakingError::InsufficientAllowance { available: 1000, requested: 1001 })
        );
    }
}
