//! Validation Helpers
//!
//! Reusable precondition checks shared by the engine and the token harness.
//!
//! ```rust,ignore
//! use vesting_common::validation::{check, require_nonzero};
//!
//! check!(amount <= claimable, StakingError::ExceedsClaimable { claimable, requested: amount });
//! require_nonzero(amount)?;
//! ```

use crate::constants::time::MAX_TIMESTAMP_SECS;
use crate::errors::{StakingError, StakingResult};
use crate::types::{Address, Phase, PhaseKind, Timestamp};

// ============ Validation Macro ============

/// Check a condition and return an error if it fails.
#[macro_export]
macro_rules! check {
    ($condition:expr, $error:expr) => {
        if !($condition) {
            return Err($error);
        }
    };
}

pub use crate::check;

// ============ Common Validation Helpers ============

/// Amount must be positive
pub fn require_nonzero(amount: u64) -> StakingResult<()> {
    if amount == 0 {
        return Err(StakingError::ZeroAmount);
    }
    Ok(())
}

/// Timestamp must be unix seconds within the supported range
pub fn validate_timestamp(now: Timestamp) -> StakingResult<Timestamp> {
    if now > MAX_TIMESTAMP_SECS {
        return Err(StakingError::InvalidTimestamp {
            value: now,
            maximum: MAX_TIMESTAMP_SECS,
        });
    }
    Ok(now)
}

/// Ledger must be in `expected` phase
pub fn require_phase(phase: &Phase, expected: PhaseKind) -> StakingResult<()> {
    let actual = phase.kind();
    if actual != expected {
        return Err(StakingError::InvalidPhase { expected, actual });
    }
    Ok(())
}

/// Address must not be the zero address
pub fn require_valid_address(address: &Address, param: &'static str) -> StakingResult<()> {
    if *address == [0u8; 32] {
        return Err(StakingError::InvalidConfig {
            param,
            reason: "must not be the zero address",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gated(amount: u64) -> StakingResult<u64> {
        check!(amount < 10, StakingError::Overflow);
        Ok(amount)
    }

    #[test]
    fn test_check_macro() {
        assert_eq!(gated(3), Ok(3));
        assert_eq!(gated(10), Err(StakingError::Overflow));
    }

    #[test]
    fn test_require_nonzero() {
        assert!(require_nonzero(1).is_ok());
        assert_eq!(require_nonzero(0), Err(StakingError::ZeroAmount));
    }

    #[test]
    fn test_millisecond_timestamps_rejected() {
        // 2021-06-01 in seconds and in milliseconds
        assert_eq!(validate_timestamp(1_622_505_600), Ok(1_622_505_600));
        assert!(matches!(
            validate_timestamp(1_622_505_600_000),
            Err(StakingError::InvalidTimestamp { .. })
        ));
    }

    #[test]
    fn test_require_phase() {
        assert!(require_phase(&Phase::Setup, PhaseKind::Setup).is_ok());
        assert_eq!(
            require_phase(&Phase::Setup, PhaseKind::Active),
            Err(StakingError::InvalidPhase {
                expected: PhaseKind::Active,
                actual: PhaseKind::Setup,
            })
        );
    }

    #[test]
    fn test_require_valid_address() {
        assert!(require_valid_address(&[1u8; 32], "custody").is_ok());
        assert!(require_valid_address(&[0u8; 32], "custody").is_err());
    }
}
