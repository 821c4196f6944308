//! Ledger Constants
//!
//! Fixed parameters of the vesting staking ledger. Runtime-tunable values
//! live in `StakingConfig`; these are the hard limits it is validated against.

/// Time base
///
/// All timestamps are unix seconds. Curve durations are whole days.
pub mod time {
    /// Seconds in one day
    pub const SECONDS_PER_DAY: u64 = 86_400;

    /// Largest accepted timestamp (9999-12-31T23:59:59Z in seconds).
    ///
    /// A millisecond clock passes this bound immediately, so a caller feeding
    /// milliseconds is rejected instead of vesting nothing forever.
    pub const MAX_TIMESTAMP_SECS: u64 = 253_402_300_799;
}

/// Staking limits
pub mod staking {
    /// Maximum entries in a single bulk-init call
    pub const MAX_BULK_INIT: usize = 10;

    /// Maximum number of registered vesting curves
    pub const MAX_CURVES: usize = 16;

    /// Longest cliff plus vesting span a curve may declare (100 years)
    pub const MAX_CURVE_DAYS: u32 = 36_500;
}

/// APY projection
pub mod apy {
    /// Days per year times 100 (two implied decimal digits)
    pub const APY_SCALE: u64 = 36_500;
}

/// Token harness metadata
pub mod token {
    /// Token name
    pub const NAME: &str = "Vesting Stake Token";
    /// Token symbol
    pub const SYMBOL: &str = "VST";
    /// Decimal places
    pub const DECIMALS: u8 = 18;
}
