//! Staking Configuration

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use vesting_common::{
    constants::staking::MAX_BULK_INIT,
    errors::{StakingError, StakingResult},
    types::Address,
    validation::require_valid_address,
};

/// Configuration for a staking ledger instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct StakingConfig {
    /// Account holding staked tokens and the reward pool on the token ledger
    pub custody: Address,
    /// Maximum entries accepted by one bulk-init call
    pub max_bulk_init: u32,
}

impl StakingConfig {
    /// Config with default limits
    pub fn new(custody: Address) -> Self {
        Self {
            custody,
            max_bulk_init: MAX_BULK_INIT as u32,
        }
    }

    /// Override the bulk-init cap (must stay within `MAX_BULK_INIT`)
    pub fn with_max_bulk_init(mut self, max_bulk_init: u32) -> Self {
        self.max_bulk_init = max_bulk_init;
        self
    }

    pub fn validate(&self) -> StakingResult<()> {
        require_valid_address(&self.custody, "custody")?;

        if self.max_bulk_init == 0 || self.max_bulk_init as usize > MAX_BULK_INIT {
            return Err(StakingError::InvalidConfig {
                param: "max_bulk_init",
                reason: "must be between 1 and MAX_BULK_INIT",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = StakingConfig::new([9u8; 32]);
        assert_eq!(config.max_bulk_init, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_configs() {
        assert!(StakingConfig::new([0u8; 32]).validate().is_err());
        assert!(StakingConfig::new([9u8; 32]).with_max_bulk_init(0).validate().is_err());
        assert!(StakingConfig::new([9u8; 32]).with_max_bulk_init(11).validate().is_err());
        assert!(StakingConfig::new([9u8; 32]).with_max_bulk_init(5).validate().is_ok());
    }
}
