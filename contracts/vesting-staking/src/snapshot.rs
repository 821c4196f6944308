//! Ledger Snapshots
//!
//! Point-in-time copy of the persisted ledger state. Snapshots encode with
//! borsh for storage and carry a SHA-256 digest so two replicas can compare
//! state cheaply. The event log is not part of the snapshot.

use std::collections::BTreeMap;

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::warn;

use vesting_common::{
    errors::{StakingError, StakingResult},
    events::EventLog,
    types::{Participant, Phase, VestingCurve},
    whitelist::Whitelist,
};

use crate::{StakingConfig, VestingStaking};

/// Persisted ledger state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct LedgerSnapshot {
    pub config: StakingConfig,
    pub phase: Phase,
    pub curves: Vec<VestingCurve>,
    pub whitelist: Whitelist,
    /// Ordered by participant address
    pub participants: Vec<Participant>,
    pub total_staked: u64,
    pub reward_pool: u64,
}

impl LedgerSnapshot {
    /// Serialize to bytes for storage
    pub fn to_bytes(&self) -> StakingResult<Vec<u8>> {
        borsh::to_vec(self).map_err(|_| StakingError::CorruptState)
    }

    /// Deserialize from bytes. Contents are not validated until restored.
    pub fn from_bytes(bytes: &[u8]) -> StakingResult<Self> {
        borsh::from_slice(bytes).map_err(|_| StakingError::CorruptState)
    }

    /// SHA-256 over the borsh encoding
    pub fn digest(&self) -> StakingResult<[u8; 32]> {
        let bytes = self.to_bytes()?;
        let mut out = [0u8; 32];
        out.copy_from_slice(&Sha256::digest(&bytes));
        Ok(out)
    }
}

impl VestingStaking {
    /// Capture the current persisted state
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            config: self.config.clone(),
            phase: self.phase,
            curves: self.curves.clone(),
            whitelist: self.whitelist.clone(),
            participants: self.participants.values().cloned().collect(),
            total_staked: self.total_staked,
            reward_pool: self.reward_pool,
        }
    }

    /// Rebuild a ledger from a snapshot, rejecting inconsistent state
    pub fn from_snapshot(snapshot: LedgerSnapshot) -> StakingResult<Self> {
        snapshot.config.validate()?;

        let mut participants = BTreeMap::new();
        for participant in snapshot.participants {
            if participants.insert(participant.id, participant).is_some() {
                warn!("snapshot lists a participant twice");
                return Err(StakingError::CorruptState);
            }
        }

        let ledger = Self {
            config: snapshot.config,
            phase: snapshot.phase,
            curves: snapshot.curves,
            whitelist: snapshot.whitelist,
            participants,
            total_staked: snapshot.total_staked,
            reward_pool: snapshot.reward_pool,
            events: EventLog::new(),
        };
        ledger.check_structure()?;

        Ok(ledger)
    }

    /// Restore from the borsh encoding produced by [`LedgerSnapshot::to_bytes`]
    pub fn restore(bytes: &[u8]) -> StakingResult<Self> {
        Self::from_snapshot(LedgerSnapshot::from_bytes(bytes)?)
    }

    /// Digest of the persisted state
    pub fn state_digest(&self) -> StakingResult<[u8; 32]> {
        self.snapshot().digest()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vesting_common::{
        constants::staking::MAX_CURVES,
        token_ops::TokenLedger,
        types::{Address, BulkEntry},
    };
    use vesting_token::StakeToken;

    const T0: u64 = 1_700_000_000;
    const OWNER: Address = [1u8; 32];
    const USER: Address = [2u8; 32];
    const CUSTODY: Address = [9u8; 32];

    fn populated() -> VestingStaking {
        let mut token = StakeToken::new(OWNER, 10_000);
        token.transfer(&OWNER, &USER, 1000).unwrap();
        token.increase_allowance(&USER, &CUSTODY, 1000).unwrap();

        let mut ledger = VestingStaking::with_curves(
            StakingConfig::new(CUSTODY),
            &[VestingCurve::new(15, 15)],
            T0,
        )
        .unwrap();
        ledger
            .bulk_init(&[BulkEntry::new(USER, 1000, 0)], T0, &mut token)
            .unwrap();
        ledger.start(10, 1000, T0).unwrap();
        ledger
    }

    #[test]
    fn test_restore_preserves_state() {
        let ledger = populated();
        let bytes = ledger.snapshot().to_bytes().unwrap();

        let restored = VestingStaking::restore(&bytes).unwrap();
        assert_eq!(restored.snapshot(), ledger.snapshot());
        assert_eq!(restored.state_digest().unwrap(), ledger.state_digest().unwrap());
        assert!(restored.is_whitelisted(&USER));
        assert!(restored.events().is_empty());
    }

    #[test]
    fn test_digest_changes_with_state() {
        let mut ledger = populated();
        let before = ledger.state_digest().unwrap();
        ledger.increase_reward_pool(1, T0).unwrap();
        assert_ne!(ledger.state_digest().unwrap(), before);
    }

    #[test]
    fn test_truncated_bytes_rejected() {
        let bytes = populated().snapshot().to_bytes().unwrap();
        assert!(matches!(
            VestingStaking::restore(&bytes[..bytes.len() - 1]),
            Err(StakingError::CorruptState)
        ));
    }

    #[test]
    fn test_inconsistent_snapshot_rejected() {
        let mut snapshot = populated().snapshot();
        snapshot.total_staked += 1;
        assert!(matches!(
            VestingStaking::from_snapshot(snapshot),
            Err(StakingError::InvariantViolated { .. })
        ));
    }

    #[test]
    fn test_oversized_curve_registry_rejected() {
        let mut snapshot = populated().snapshot();
        snapshot.curves = vec![VestingCurve::new(15, 15); MAX_CURVES + 1];
        assert!(matches!(
            VestingStaking::from_snapshot(snapshot),
            Err(StakingError::InvariantViolated { .. })
        ));
    }

    #[test]
    fn test_duplicate_participant_rejected() {
        let mut snapshot = populated().snapshot();
        let copy = snapshot.participants[0].clone();
        snapshot.participants.push(copy);
        assert!(matches!(
            VestingStaking::from_snapshot(snapshot),
            Err(StakingError::CorruptState)
        ));
    }
}
