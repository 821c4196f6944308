//! Vesting Staking Common Library
//!
//! Shared types, constants, and utilities for the vesting staking ledger
//! and its token harness.
//!
//! ## Contents
//!
//! - **Vesting Curves**: cliff-then-linear schedules in whole days
//! - **Reward Math**: pro-rata daily reward shares with floor division
//! - **APY**: annualized yield projection from the daily reward rate
//! - **Whitelist**: strict add/remove registry of eligible stakers
//! - **Token Ledger Seam**: trait for the external value-transfer ledger
//! - **Events**: borsh/serde encodable audit trail
//!
//! All arithmetic is integer-only. This crate is `no_std` compatible when
//! built without the default `std` feature.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

// Re-export collections for submodules based on feature
#[cfg(not(feature = "std"))]
pub use alloc::{collections::BTreeSet, vec::Vec};
#[cfg(feature = "std")]
pub use std::{collections::BTreeSet, vec::Vec};

pub mod constants;
pub mod errors;
pub mod events;
pub mod math;
pub mod token_ops;
pub mod types;
pub mod validation;
pub mod whitelist;

// Re-exports for convenience
pub use errors::*;
pub use events::*;
pub use math::*;
pub use token_ops::*;
pub use types::*;
pub use whitelist::*;
