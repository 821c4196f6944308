//! Ledger Invariants
//!
//! Consistency checks over the whole ledger. Operations preserve these by
//! construction; the checks exist for restored snapshots and for tests
//! that drive random operation sequences.

use vesting_common::{
    constants::staking::MAX_CURVES,
    errors::{StakingError, StakingResult},
    types::{Participant, PhaseKind, Timestamp},
};

use crate::VestingStaking;

fn violated(reason: &'static str) -> StakingError {
    StakingError::InvariantViolated { reason }
}

impl VestingStaking {
    /// Check every ledger invariant, including vesting bounds at `now`
    pub fn check_invariants(&self, now: Timestamp) -> StakingResult<()> {
        self.check_structure()?;

        for participant in self.participants.values() {
            let curve = self.curve(participant.curve_id)?;
            let vested = curve.vested_amount(participant.stake_start, participant.staked_amount, now);
            if participant.withdrawn > vested {
                return Err(violated("withdrawn exceeds vested amount"));
            }
        }

        Ok(())
    }

    /// Time-independent invariants, checked when restoring a snapshot
    pub(crate) fn check_structure(&self) -> StakingResult<()> {
        if self.curves.len() > MAX_CURVES {
            return Err(violated("more curves than the registry allows"));
        }
        if self.curves.iter().any(|c| c.validate().is_err()) {
            return Err(violated("curve span out of range"));
        }

        let mut open_total: u64 = 0;

        for (account, participant) in &self.participants {
            if participant.id != *account {
                return Err(violated("participant keyed under another address"));
            }
            check_participant(participant)?;
            if self.curve(participant.curve_id).is_err() {
                return Err(violated("participant references unknown curve"));
            }

            if participant.is_staking {
                open_total = open_total
                    .checked_add(participant.staked_amount)
                    .ok_or(StakingError::Overflow)?;
            }
        }

        // Conservation of stake
        if open_total != self.total_staked {
            return Err(violated("total staked differs from sum of open stakes"));
        }

        if self.phase.kind() == PhaseKind::Setup {
            if self.reward_pool != 0 {
                return Err(violated("reward pool funded before start"));
            }
            if self.participants.values().any(|p| p.withdrawn > 0) {
                return Err(violated("withdrawal recorded before start"));
            }
        }

        Ok(())
    }
}

fn check_participant(participant: &Participant) -> StakingResult<()> {
    if participant.staked_amount == 0 {
        return Err(violated("participant with empty stake"));
    }
    if participant.withdrawn > participant.staked_amount {
        return Err(violated("withdrawn exceeds stake"));
    }
    // Closed exactly when fully withdrawn
    if participant.is_staking == (participant.withdrawn == participant.staked_amount) {
        return Err(violated("stake open flag disagrees with withdrawals"));
    }
    Ok(())
}
