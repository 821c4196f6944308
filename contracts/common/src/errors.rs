//! Error Types for the Vesting Staking Ledger
//!
//! Typed errors carrying the offending values so callers can tell exactly
//! which check rejected an operation. Every failure leaves ledger state
//! unchanged.

use core::fmt;

use crate::types::{Address, CurveId, PhaseKind, Timestamp};

/// Result type alias for staking operations
pub type StakingResult<T> = Result<T, StakingError>;

/// Main error enum for all staking ledger errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StakingError {
    // ============ Phase Errors ============
    /// Operation is not allowed in the current lifecycle phase
    InvalidPhase {
        expected: PhaseKind,
        actual: PhaseKind,
    },

    // ============ Whitelist Errors ============
    /// Account is already on the whitelist
    AlreadyWhitelisted { account: Address },

    /// Account is not on the whitelist
    NotWhitelisted { account: Address },

    // ============ Bulk Init Errors ============
    /// Bulk batch exceeds the per-call cap
    BatchTooLarge { size: usize, maximum: usize },

    /// Bulk batch names the same account more than once
    DuplicateEntry { account: Address },

    // ============ Participant Errors ============
    /// Participant already has an active stake
    AlreadyStaking { account: Address },

    /// Participant has no active stake
    NotStaking { account: Address },

    /// Participant already completed its single lifetime stake
    ParticipantExited { account: Address },

    // ============ Amount Errors ============
    /// Zero amount not allowed
    ZeroAmount,

    /// Caller's token balance does not cover the amount
    InsufficientBalance { available: u64, requested: u64 },

    /// Caller's pre-authorized allowance does not cover the amount
    InsufficientAllowance { available: u64, requested: u64 },

    /// Withdrawal exceeds the vested-and-unwithdrawn balance
    ExceedsClaimable { claimable: u64, requested: u64 },

    /// Reward owed exceeds what remains in the reward pool
    InsufficientRewardPool { available: u64, required: u64 },

    // ============ Curve Errors ============
    /// No curve registered under this id
    UnknownCurve { curve_id: CurveId },

    /// Curve registry is full
    TooManyCurves { maximum: usize },

    /// Curve span does not fit the time base
    InvalidCurve,

    // ============ Time Errors ============
    /// Timestamp is outside the supported unix-seconds range
    InvalidTimestamp { value: Timestamp, maximum: Timestamp },

    // ============ Token Errors ============
    /// External ledger rejected a transfer
    TransferFailed { from: Address, to: Address, amount: u64 },

    /// Mint attempted by an account without the minter role
    MintUnauthorized { caller: Address },

    // ============ Config Errors ============
    /// Invalid configuration parameter
    InvalidConfig { param: &'static str, reason: &'static str },

    // ============ Math Errors ============
    /// Arithmetic overflow occurred
    Overflow,

    /// Division by zero
    DivisionByZero,

    // ============ State Errors ============
    /// A ledger invariant does not hold
    InvariantViolated { reason: &'static str },

    /// Persisted state could not be decoded
    CorruptState,
}

impl StakingError {
    /// Returns a stable error code for logging/debugging
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidPhase { .. } => "E001_INVALID_PHASE",
            Self::AlreadyWhitelisted { .. } => "E010_ALREADY_WHITELISTED",
            Self::NotWhitelisted { .. } => "E011_NOT_WHITELISTED",
            Self::BatchTooLarge { .. } => "E012_BATCH_TOO_LARGE",
            Self::DuplicateEntry { .. } => "E013_DUPLICATE_ENTRY",
            Self::AlreadyStaking { .. } => "E020_ALREADY_STAKING",
            Self::NotStaking { .. } => "E021_NOT_STAKING",
            Self::ParticipantExited { .. } => "E022_PARTICIPANT_EXITED",
            Self::ZeroAmount => "E030_ZERO_AMOUNT",
            Self::InsufficientBalance { .. } => "E031_INSUFFICIENT_BALANCE",
            Self::InsufficientAllowance { .. } => "E032_INSUFFICIENT_ALLOWANCE",
            Self::ExceedsClaimable { .. } => "E033_EXCEEDS_CLAIMABLE",
            Self::InsufficientRewardPool { .. } => "E034_REWARD_POOL_LOW",
            Self::UnknownCurve { .. } => "E040_UNKNOWN_CURVE",
            Self::TooManyCurves { .. } => "E041_TOO_MANY_CURVES",
            Self::InvalidCurve => "E042_INVALID_CURVE",
            Self::InvalidTimestamp { .. } => "E050_INVALID_TIMESTAMP",
            Self::TransferFailed { .. } => "E060_TRANSFER_FAILED",
            Self::MintUnauthorized { .. } => "E061_MINT_UNAUTH",
            Self::InvalidConfig { .. } => "E070_INVALID_CONFIG",
            Self::Overflow => "E080_OVERFLOW",
            Self::DivisionByZero => "E081_DIV_ZERO",
            Self::InvariantViolated { .. } => "E090_INVARIANT",
            Self::CorruptState => "E091_CORRUPT_STATE",
        }
    }

    /// Returns true if the caller can fix the condition and retry
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::InsufficientBalance { .. } => true,    // Get more funds
            Self::InsufficientAllowance { .. } => true,  // Approve more
            Self::ExceedsClaimable { .. } => true,       // Wait for vesting
            Self::InsufficientRewardPool { .. } => true, // Wait for top-up
            Self::NotWhitelisted { .. } => true,
            _ => false,
        }
    }
}

impl fmt::Display for StakingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPhase { expected, actual } => {
                write!(f, "{}: expected {:?}, ledger is {:?}", self.code(), expected, actual)
            }
            Self::BatchTooLarge { size, maximum } => {
                write!(f, "{}: {} entries, at most {}", self.code(), size, maximum)
            }
            Self::InsufficientBalance { available, requested }
            | Self::InsufficientAllowance { available, requested } => {
                write!(f, "{}: have {}, need {}", self.code(), available, requested)
            }
            Self::ExceedsClaimable { claimable, requested } => {
                write!(f, "{}: claimable {}, requested {}", self.code(), claimable, requested)
            }
            Self::InsufficientRewardPool { available, required } => {
                write!(f, "{}: pool {}, owed {}", self.code(), available, required)
            }
            Self::UnknownCurve { curve_id } => write!(f, "{}: curve {}", self.code(), curve_id),
            Self::InvalidTimestamp { value, maximum } => {
                write!(f, "{}: {} exceeds {} (expected unix seconds)", self.code(), value, maximum)
            }
            Self::InvalidConfig { param, reason } => {
                write!(f, "{}: {} {}", self.code(), param, reason)
            }
            Self::InvariantViolated { reason } => write!(f, "{}: {}", self.code(), reason),
            _ => f.write_str(self.code()),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for StakingError {}
