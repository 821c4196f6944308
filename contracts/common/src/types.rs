//! Core Types for the Vesting Staking Ledger
//!
//! Data structures shared by the engine, the token harness and the
//! persisted snapshot format.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::constants::{staking::MAX_CURVE_DAYS, time::SECONDS_PER_DAY};
use crate::errors::{StakingError, StakingResult};
use crate::validation::validate_timestamp;

/// Type alias for account addresses (32-byte hash)
pub type Address = [u8; 32];

/// Unix timestamp in seconds
pub type Timestamp = u64;

/// Index of a registered vesting curve
pub type CurveId = u8;

// ============ Lifecycle ============

/// Ledger lifecycle phase
///
/// `Setup` moves to `Active` exactly once. Parameters that only exist once
/// the ledger is running are carried by the `Active` variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub enum Phase {
    /// Curves and bulk participants may be registered
    #[default]
    Setup,
    /// Staking, withdrawals and rewards are live
    Active {
        /// Reward units distributed per whole day across all stakers
        reward_rate_per_day: u64,
        /// Timestamp of the `start` call
        started_at: Timestamp,
    },
}

impl Phase {
    /// Fieldless tag, used in errors and events
    pub fn kind(&self) -> PhaseKind {
        match self {
            Phase::Setup => PhaseKind::Setup,
            Phase::Active { .. } => PhaseKind::Active,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Phase::Active { .. })
    }

    /// Reward rate, zero before `start`
    pub fn reward_rate_per_day(&self) -> u64 {
        match self {
            Phase::Setup => 0,
            Phase::Active { reward_rate_per_day, .. } => *reward_rate_per_day,
        }
    }
}

/// Phase tag without payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub enum PhaseKind {
    Setup,
    Active,
}

// ============ Vesting Curve ============

/// Cliff-then-linear vesting schedule, durations in whole days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct VestingCurve {
    /// Days after stake start during which nothing vests
    pub cliff_days: u32,
    /// Days after the cliff over which the stake vests linearly
    pub vesting_days: u32,
}

impl VestingCurve {
    pub fn new(cliff_days: u32, vesting_days: u32) -> Self {
        Self { cliff_days, vesting_days }
    }

    /// Cliff plus vesting span must not exceed `MAX_CURVE_DAYS`
    pub fn validate(&self) -> StakingResult<()> {
        match self.cliff_days.checked_add(self.vesting_days) {
            Some(span) if span <= MAX_CURVE_DAYS => Ok(()),
            _ => Err(StakingError::InvalidCurve),
        }
    }

    /// Cliff length in seconds
    pub fn cliff_secs(&self) -> u64 {
        u64::from(self.cliff_days) * SECONDS_PER_DAY
    }

    /// Linear vesting length in seconds
    pub fn vesting_secs(&self) -> u64 {
        u64::from(self.vesting_days) * SECONDS_PER_DAY
    }

    /// Amount of `total_amount` vested at `now`, see [`crate::math::vested_amount`]
    ///
    /// Both timestamps must already be validated unix seconds; use
    /// [`Self::checked_vested_amount`] for unvalidated input.
    pub fn vested_amount(&self, stake_start: Timestamp, total_amount: u64, now: Timestamp) -> u64 {
        crate::math::vested_amount(
            stake_start,
            self.cliff_secs(),
            self.vesting_secs(),
            total_amount,
            now,
        )
    }

    /// Like [`Self::vested_amount`], rejecting timestamps outside the seconds range
    pub fn checked_vested_amount(
        &self,
        stake_start: Timestamp,
        total_amount: u64,
        now: Timestamp,
    ) -> StakingResult<u64> {
        let stake_start = validate_timestamp(stake_start)?;
        let now = validate_timestamp(now)?;
        Ok(self.vested_amount(stake_start, total_amount, now))
    }
}

// ============ Participant ============

/// Per-participant ledger record
///
/// Created on first stake (or bulk init) and never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct Participant {
    /// Participant address
    pub id: Address,
    /// Amount locked by the single lifetime stake
    pub staked_amount: u64,
    /// Curve governing the stake
    pub curve_id: CurveId,
    /// When the stake was recorded
    pub stake_start: Timestamp,
    /// Cumulative amount already paid out of the stake
    pub withdrawn: u64,
    /// Reward accrual checkpoint
    pub last_claim: Timestamp,
    /// Whether the stake is still open
    pub is_staking: bool,
}

impl Participant {
    /// Open a new stake
    pub fn new(id: Address, staked_amount: u64, curve_id: CurveId, now: Timestamp) -> Self {
        Self {
            id,
            staked_amount,
            curve_id,
            stake_start: now,
            withdrawn: 0,
            last_claim: now,
            is_staking: true,
        }
    }

    /// Vested amount not yet withdrawn
    pub fn claimable(&self, curve: &VestingCurve, now: Timestamp) -> u64 {
        curve
            .vested_amount(self.stake_start, self.staked_amount, now)
            .saturating_sub(self.withdrawn)
    }

    /// Stake amount not yet withdrawn
    pub fn remaining(&self) -> u64 {
        self.staked_amount.saturating_sub(self.withdrawn)
    }
}

/// One row of a bulk-init batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct BulkEntry {
    pub account: Address,
    pub staked_amount: u64,
    pub curve_id: CurveId,
}

impl BulkEntry {
    pub fn new(account: Address, staked_amount: u64, curve_id: CurveId) -> Self {
        Self { account, staked_amount, curve_id }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_kind_and_rate() {
        assert_eq!(Phase::default().kind(), PhaseKind::Setup);
        assert_eq!(Phase::Setup.reward_rate_per_day(), 0);

        let active = Phase::Active { reward_rate_per_day: 10, started_at: 5 };
        assert!(active.is_active());
        assert_eq!(active.kind(), PhaseKind::Active);
        assert_eq!(active.reward_rate_per_day(), 10);
    }

    #[test]
    fn test_curve_durations_in_seconds() {
        let curve = VestingCurve::new(15, 30);
        assert_eq!(curve.cliff_secs(), 15 * SECONDS_PER_DAY);
        assert_eq!(curve.vesting_secs(), 30 * SECONDS_PER_DAY);
    }

    #[test]
    fn test_curve_span_bounded() {
        assert!(VestingCurve::new(15, 30).validate().is_ok());
        assert!(VestingCurve::new(MAX_CURVE_DAYS, 0).validate().is_ok());
        assert_eq!(
            VestingCurve::new(MAX_CURVE_DAYS, 1).validate(),
            Err(StakingError::InvalidCurve)
        );
        assert_eq!(
            VestingCurve::new(u32::MAX, u32::MAX).validate(),
            Err(StakingError::InvalidCurve)
        );
    }

    #[test]
    fn test_checked_vesting_rejects_millisecond_clock() {
        let curve = VestingCurve::new(15, 15);
        let start_secs = 1_622_505_600;
        let now_secs = start_secs + 30 * SECONDS_PER_DAY;

        assert_eq!(curve.checked_vested_amount(start_secs, 10, now_secs), Ok(10));
        assert!(matches!(
            curve.checked_vested_amount(start_secs * 1000, 10, now_secs),
            Err(StakingError::InvalidTimestamp { .. })
        ));
        assert!(matches!(
            curve.checked_vested_amount(start_secs, 10, now_secs * 1000),
            Err(StakingError::InvalidTimestamp { .. })
        ));
    }

    #[test]
    fn test_participant_claimable_tracks_withdrawn() {
        let curve = VestingCurve::new(15, 15);
        let mut p = Participant::new([1u8; 32], 1000, 0, 0);
        let day18 = 18 * SECONDS_PER_DAY;

        assert_eq!(p.claimable(&curve, day18), 200);
        p.withdrawn = 150;
        assert_eq!(p.claimable(&curve, day18), 50);
        assert_eq!(p.remaining(), 850);
    }
}
