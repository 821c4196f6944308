//! Mathematical Utilities for the Vesting Staking Ledger
//!
//! Integer-only vesting, reward and APY calculations. Every division
//! floors, so participants never receive more than they are owed.

use crate::constants::{apy::APY_SCALE, time::SECONDS_PER_DAY};
use crate::errors::{StakingError, StakingResult};
use crate::types::Timestamp;

/// Amount of `total_amount` vested at `now` under a cliff-then-linear curve.
///
/// - Before `stake_start + cliff_secs`: 0
/// - At or after `stake_start + cliff_secs + vesting_secs`: `total_amount`
/// - In between: `total_amount * (now - stake_start - cliff_secs) / vesting_secs`, floored
///
/// # Arguments
/// * `stake_start` - Stake timestamp (seconds)
/// * `cliff_secs` - Cliff length (seconds)
/// * `vesting_secs` - Linear vesting length after the cliff (seconds)
/// * `total_amount` - Stake size
/// * `now` - Evaluation time (seconds)
///
/// Timestamps are not range-checked here. Callers pass values already run
/// through [`crate::validation::validate_timestamp`]; a millisecond
/// `stake_start` would otherwise read as a start far in the future and
/// vest nothing.
pub fn vested_amount(
    stake_start: Timestamp,
    cliff_secs: u64,
    vesting_secs: u64,
    total_amount: u64,
    now: Timestamp,
) -> u64 {
    let cliff_end = stake_start.saturating_add(cliff_secs);
    if now < cliff_end {
        return 0;
    }

    let elapsed = now - cliff_end;
    if elapsed >= vesting_secs {
        return total_amount;
    }

    // elapsed < vesting_secs, so vesting_secs > 0 and the result is < total_amount
    ((total_amount as u128 * elapsed as u128) / vesting_secs as u128) as u64
}

/// Whole days between `since` and `now`, zero if `now` precedes `since`
pub fn elapsed_days(since: Timestamp, now: Timestamp) -> u64 {
    now.saturating_sub(since) / SECONDS_PER_DAY
}

/// Proportional reward owed to one stake
///
/// owed = rate_per_day * days * stake / total_staked
pub fn reward_share(
    rate_per_day: u64,
    days: u64,
    stake: u64,
    total_staked: u64,
) -> StakingResult<u64> {
    if total_staked == 0 {
        return Err(StakingError::DivisionByZero);
    }

    let owed = (rate_per_day as u128)
        .checked_mul(days as u128)
        .ok_or(StakingError::Overflow)?
        .checked_mul(stake as u128)
        .ok_or(StakingError::Overflow)?
        / total_staked as u128;

    u64::try_from(owed).map_err(|_| StakingError::Overflow)
}

/// Annualized yield (x100) for a pool holding `total_staked`
///
/// apy = rate_per_day * 36500 / total_staked
///
/// Rewards are split pro rata, so every staker sees the same figure
/// regardless of the size of their own stake.
pub fn calculate_apy(rate_per_day: u64, total_staked: u64) -> StakingResult<u64> {
    if total_staked == 0 {
        return Err(StakingError::DivisionByZero);
    }

    let apy = (rate_per_day as u128)
        .checked_mul(APY_SCALE as u128)
        .ok_or(StakingError::Overflow)?
        / total_staked as u128;

    u64::try_from(apy).map_err(|_| StakingError::Overflow)
}

/// APY a new stake of `amount` would observe once it joins the pool
pub fn calculate_apy_with_stake(
    rate_per_day: u64,
    total_staked: u64,
    amount: u64,
) -> StakingResult<u64> {
    let projected = total_staked.checked_add(amount).ok_or(StakingError::Overflow)?;
    calculate_apy(rate_per_day, projected)
}
