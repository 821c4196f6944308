//! Ledger Events
//!
//! Events are emitted by every successful state transition and can be
//! indexed off-chain for building UIs, analytics, and audits.

use crate::Vec;
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::types::{Address, CurveId, Timestamp};

/// Event types for indexing and filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
#[borsh(use_discriminant = true)]
#[repr(u8)]
pub enum EventType {
    // Registry Events (0x01 - 0x1F)
    WhitelistAdded = 0x01,
    WhitelistRemoved = 0x02,
    CurveRegistered = 0x03,

    // Lifecycle Events (0x20 - 0x3F)
    ParticipantsInitialized = 0x20,
    StakingStarted = 0x21,

    // Stake Events (0x40 - 0x5F)
    Staked = 0x40,
    Withdrawn = 0x41,
    StakeClosed = 0x42,

    // Reward Events (0x60 - 0x7F)
    RewardClaimed = 0x60,
    RewardPoolIncreased = 0x61,

    // Token Events (0x80 - 0x9F)
    TokenTransfer = 0x80,
    TokenMint = 0x81,
}

/// Main event enum containing all ledger events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub enum StakingEvent {
    // ============ Registry Events ============

    /// Account added to the whitelist
    WhitelistAdded { account: Address, timestamp: Timestamp },

    /// Account removed from the whitelist
    WhitelistRemoved { account: Address, timestamp: Timestamp },

    /// Vesting curve registered during setup
    CurveRegistered {
        curve_id: CurveId,
        cliff_days: u32,
        vesting_days: u32,
        timestamp: Timestamp,
    },

    // ============ Lifecycle Events ============

    /// Bulk batch of participants registered during setup
    ParticipantsInitialized {
        count: u32,
        total_amount: u64,
        new_total_staked: u64,
        timestamp: Timestamp,
    },

    /// Ledger moved from setup to active
    StakingStarted {
        reward_rate_per_day: u64,
        initial_reward_pool: u64,
        timestamp: Timestamp,
    },

    // ============ Stake Events ============

    /// New stake recorded
    Staked {
        account: Address,
        amount: u64,
        curve_id: CurveId,
        new_total_staked: u64,
        timestamp: Timestamp,
    },

    /// Vested tokens paid out
    Withdrawn {
        account: Address,
        amount: u64,
        total_withdrawn: u64,
        timestamp: Timestamp,
    },

    /// Stake fully withdrawn and removed from the total
    StakeClosed {
        account: Address,
        staked_amount: u64,
        new_total_staked: u64,
        timestamp: Timestamp,
    },

    // ============ Reward Events ============

    /// Reward paid from the pool
    RewardClaimed {
        account: Address,
        amount: u64,
        days: u64,
        remaining_pool: u64,
        timestamp: Timestamp,
    },

    /// Reward pool topped up
    RewardPoolIncreased {
        amount: u64,
        new_pool: u64,
        timestamp: Timestamp,
    },

    // ============ Token Events ============

    /// Token transfer on the harness ledger
    TokenTransfer {
        from: Address,
        to: Address,
        amount: u64,
        timestamp: Timestamp,
    },

    /// Tokens minted on the harness ledger
    TokenMint {
        to: Address,
        amount: u64,
        new_total_supply: u64,
        timestamp: Timestamp,
    },
}

impl StakingEvent {
    /// Get the event type for filtering
    pub fn event_type(&self) -> EventType {
        match self {
            Self::WhitelistAdded { .. } => EventType::WhitelistAdded,
            Self::WhitelistRemoved { .. } => EventType::WhitelistRemoved,
            Self::CurveRegistered { .. } => EventType::CurveRegistered,
            Self::ParticipantsInitialized { .. } => EventType::ParticipantsInitialized,
            Self::StakingStarted { .. } => EventType::StakingStarted,
            Self::Staked { .. } => EventType::Staked,
            Self::Withdrawn { .. } => EventType::Withdrawn,
            Self::StakeClosed { .. } => EventType::StakeClosed,
            Self::RewardClaimed { .. } => EventType::RewardClaimed,
            Self::RewardPoolIncreased { .. } => EventType::RewardPoolIncreased,
            Self::TokenTransfer { .. } => EventType::TokenTransfer,
            Self::TokenMint { .. } => EventType::TokenMint,
        }
    }

    /// Get the time the event occurred
    pub fn timestamp(&self) -> Timestamp {
        match self {
            Self::WhitelistAdded { timestamp, .. }
            | Self::WhitelistRemoved { timestamp, .. }
            | Self::CurveRegistered { timestamp, .. }
            | Self::ParticipantsInitialized { timestamp, .. }
            | Self::StakingStarted { timestamp, .. }
            | Self::Staked { timestamp, .. }
            | Self::Withdrawn { timestamp, .. }
            | Self::StakeClosed { timestamp, .. }
            | Self::RewardClaimed { timestamp, .. }
            | Self::RewardPoolIncreased { timestamp, .. }
            | Self::TokenTransfer { timestamp, .. }
            | Self::TokenMint { timestamp, .. } => *timestamp,
        }
    }

    /// Serialize event to bytes for storage/transmission
    pub fn to_bytes(&self) -> Vec<u8> {
        borsh::to_vec(self).unwrap_or_default()
    }

    /// Deserialize event from bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        borsh::from_slice(bytes).ok()
    }
}

/// Event log for collecting events during execution
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<StakingEvent>,
}

impl EventLog {
    /// Create a new empty event log
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Emit an event (add to log)
    pub fn emit(&mut self, event: StakingEvent) {
        self.events.push(event);
    }

    /// Get all events
    pub fn events(&self) -> &[StakingEvent] {
        &self.events
    }

    /// Take all events, leaving the log empty
    pub fn drain(&mut self) -> Vec<StakingEvent> {
        core::mem::take(&mut self.events)
    }

    /// Filter events by type
    pub fn filter_by_type(&self, event_type: EventType) -> Vec<&StakingEvent> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    /// Most recent event, if any
    pub fn last(&self) -> Option<&StakingEvent> {
        self.events.last()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}
