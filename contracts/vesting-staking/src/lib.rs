//! Vesting Staking Ledger
//!
//! Tracks how much each whitelisted participant has staked, how much of
//! that stake has vested under the participant's curve, and how a fixed
//! daily reward is split pro rata among open stakes.
//!
//! ## Lifecycle
//!
//! ```text
//! Setup ──start(rate, pool)──▶ Active
//!   │                            │
//!   ├─ register_curve            ├─ stake / withdraw / claim_left
//!   └─ bulk_init (≤ 10)          ├─ get_reward / increase_reward_pool
//!                                └─ APY projections
//! ```
//!
//! ## Atomicity
//!
//! Every operation either applies completely or returns an error with the
//! ledger unchanged. Internal accounting is updated before the token ledger
//! is called; if that call fails the accounting is restored. The one
//! exception is a bulk-init refund the token ledger also rejects: that
//! participant stays registered with its stake held in custody.
//!
//! Caller identity and the current time are explicit arguments. Time is
//! unix seconds and is read once per operation.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, warn};

use vesting_common::{
    check,
    constants::{staking::MAX_CURVES, time::SECONDS_PER_DAY},
    errors::{StakingError, StakingResult},
    events::{EventLog, StakingEvent},
    math::{calculate_apy, calculate_apy_with_stake, elapsed_days, reward_share},
    token_ops::{require_fundable, TokenLedger},
    types::{Address, BulkEntry, CurveId, Participant, Phase, PhaseKind, Timestamp, VestingCurve},
    validation::{require_nonzero, require_phase, validate_timestamp},
    whitelist::Whitelist,
};

pub mod config;
mod invariants;
pub mod snapshot;


pub use config::StakingConfig;
pub use snapshot::LedgerSnapshot;

// ============ Ledger ============

/// Stake accounting engine
#[derive(Debug, Clone)]
pub struct VestingStaking {
    config: StakingConfig,
    phase: Phase,
    curves: Vec<VestingCurve>,
    whitelist: Whitelist,
    participants: BTreeMap<Address, Participant>,
    total_staked: u64,
    reward_pool: u64,
    events: EventLog,
}

impl VestingStaking {
    /// Create an empty ledger in `Setup`
    pub fn new(config: StakingConfig) -> StakingResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            phase: Phase::Setup,
            curves: Vec::new(),
            whitelist: Whitelist::new(),
            participants: BTreeMap::new(),
            total_staked: 0,
            reward_pool: 0,
            events: EventLog::new(),
        })
    }

    /// Create a ledger with `curves` registered in order (ids 0, 1, ...)
    pub fn with_curves(
        config: StakingConfig,
        curves: &[VestingCurve],
        now: Timestamp,
    ) -> StakingResult<Self> {
        let mut ledger = Self::new(config)?;
        for curve in curves {
            ledger.register_curve(*curve, now)?;
        }
        Ok(ledger)
    }

    // ============ Accessors ============

    pub fn config(&self) -> &StakingConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn reward_pool(&self) -> u64 {
        self.reward_pool
    }

    pub fn reward_rate_per_day(&self) -> u64 {
        self.phase.reward_rate_per_day()
    }

    pub fn curve(&self, curve_id: CurveId) -> StakingResult<&VestingCurve> {
        self.curves
            .get(curve_id as usize)
            .ok_or(StakingError::UnknownCurve { curve_id })
    }

    pub fn curves(&self) -> &[VestingCurve] {
        &self.curves
    }

    pub fn participant(&self, account: &Address) -> Option<&Participant> {
        self.participants.get(account)
    }

    pub fn participants(&self) -> impl Iterator<Item = &Participant> {
        self.participants.values()
    }

    pub fn is_whitelisted(&self, account: &Address) -> bool {
        self.whitelist.is_whitelisted(account)
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Take emitted events, e.g. after persisting them elsewhere
    pub fn drain_events(&mut self) -> Vec<StakingEvent> {
        self.events.drain()
    }

    /// Total value locked
    pub fn get_tvl(&self) -> u64 {
        self.total_staked
    }

    fn require_active(&self) -> StakingResult<()> {
        require_phase(&self.phase, PhaseKind::Active)
    }

    /// Open stake of `account`, distinguishing never-staked from exited
    fn staking_participant(&self, account: &Address) -> StakingResult<&Participant> {
        match self.participants.get(account) {
            Some(p) if p.is_staking => Ok(p),
            _ => Err(StakingError::NotStaking { account: *account }),
        }
    }

    // ============ Curve Registry ============

    /// Register a vesting curve (setup only). Ids are dense in registration order.
    pub fn register_curve(&mut self, curve: VestingCurve, now: Timestamp) -> StakingResult<CurveId> {
        let now = validate_timestamp(now)?;
        require_phase(&self.phase, PhaseKind::Setup)?;
        check!(
            self.curves.len() < MAX_CURVES,
            StakingError::TooManyCurves { maximum: MAX_CURVES }
        );
        curve.validate()?;

        let curve_id = self.curves.len() as CurveId;
        self.curves.push(curve);

        self.events.emit(StakingEvent::CurveRegistered {
            curve_id,
            cliff_days: curve.cliff_days,
            vesting_days: curve.vesting_days,
            timestamp: now,
        });
        debug!(
            curve_id,
            cliff_days = curve.cliff_days,
            vesting_days = curve.vesting_days,
            "vesting curve registered"
        );

        Ok(curve_id)
    }

    // ============ Whitelist ============

    /// Permit `account` to stake. Fails if it is already whitelisted.
    pub fn add_to_whitelist(&mut self, account: Address, now: Timestamp) -> StakingResult<()> {
        let now = validate_timestamp(now)?;
        self.whitelist.add(account)?;
        self.events.emit(StakingEvent::WhitelistAdded { account, timestamp: now });
        Ok(())
    }

    /// Revoke `account`'s permission to stake. Open stakes are unaffected.
    pub fn remove_from_whitelist(&mut self, account: &Address, now: Timestamp) -> StakingResult<()> {
        let now = validate_timestamp(now)?;
        self.whitelist.remove(account)?;
        self.events.emit(StakingEvent::WhitelistRemoved {
            account: *account,
            timestamp: now,
        });
        Ok(())
    }

    // ============ Staking Engine ============

    /// Register a batch of pre-activation stakes.
    ///
    /// Each entry's amount is pulled from its account into custody and the
    /// account is implicitly whitelisted. The whole batch is validated before
    /// anything is applied; an oversized batch is rejected outright.
    ///
    /// If a pull fails, earlier pulls are refunded and the batch is undone.
    /// An entry whose refund also fails keeps its participant record, since
    /// custody still holds its stake.
    pub fn bulk_init<L: TokenLedger>(
        &mut self,
        entries: &[BulkEntry],
        now: Timestamp,
        ledger: &mut L,
    ) -> StakingResult<()> {
        let now = validate_timestamp(now)?;
        require_phase(&self.phase, PhaseKind::Setup)?;

        let maximum = self.config.max_bulk_init as usize;
        check!(
            entries.len() <= maximum,
            StakingError::BatchTooLarge { size: entries.len(), maximum }
        );

        // 1. Validate every entry before touching state
        let custody = self.config.custody;
        let mut seen = BTreeSet::new();
        let mut batch_total: u64 = 0;
        for entry in entries {
            require_nonzero(entry.staked_amount)?;
            self.curve(entry.curve_id)?;
            check!(
                seen.insert(entry.account),
                StakingError::DuplicateEntry { account: entry.account }
            );
            check!(
                !self.participants.contains_key(&entry.account),
                StakingError::AlreadyStaking { account: entry.account }
            );
            require_fundable(ledger, &entry.account, &custody, entry.staked_amount)?;
            batch_total = batch_total
                .checked_add(entry.staked_amount)
                .ok_or(StakingError::Overflow)?;
        }
        let new_total = self
            .total_staked
            .checked_add(batch_total)
            .ok_or(StakingError::Overflow)?;

        // 2. Effects
        let previous_total = self.total_staked;
        let mut newly_whitelisted = Vec::new();
        for entry in entries {
            self.participants.insert(
                entry.account,
                Participant::new(entry.account, entry.staked_amount, entry.curve_id, now),
            );
            if !self.whitelist.is_whitelisted(&entry.account) {
                self.whitelist.add(entry.account)?;
                newly_whitelisted.push(entry.account);
            }
        }
        self.total_staked = new_total;

        // 3. Interactions
        for (pulled, entry) in entries.iter().enumerate() {
            if let Err(err) =
                ledger.transfer_from(&custody, &entry.account, &custody, entry.staked_amount)
            {
                warn!(error = %err, entry = pulled, "bulk init pull failed, rolling back batch");

                // Refund what was already pulled. An entry whose refund fails
                // stays registered so custody and the ledger keep agreeing.
                let mut stranded = BTreeSet::new();
                let mut stranded_total: u64 = 0;
                for done in &entries[..pulled] {
                    if let Err(refund_err) =
                        ledger.transfer(&custody, &done.account, done.staked_amount)
                    {
                        warn!(error = %refund_err, "bulk init refund failed, keeping participant");
                        stranded.insert(done.account);
                        // Bounded by batch_total, which was checked above
                        stranded_total += done.staked_amount;
                    }
                }

                for entry in entries.iter().filter(|e| !stranded.contains(&e.account)) {
                    self.participants.remove(&entry.account);
                }
                for account in newly_whitelisted.iter().filter(|a| !stranded.contains(*a)) {
                    let _ = self.whitelist.remove(account);
                }
                self.total_staked = previous_total + stranded_total;

                if !stranded.is_empty() {
                    self.events.emit(StakingEvent::ParticipantsInitialized {
                        count: stranded.len() as u32,
                        total_amount: stranded_total,
                        new_total_staked: self.total_staked,
                        timestamp: now,
                    });
                }

                return Err(StakingError::TransferFailed {
                    from: entry.account,
                    to: custody,
                    amount: entry.staked_amount,
                });
            }
        }

        self.events.emit(StakingEvent::ParticipantsInitialized {
            count: entries.len() as u32,
            total_amount: batch_total,
            new_total_staked: new_total,
            timestamp: now,
        });
        debug!(count = entries.len(), batch_total, new_total, "bulk participants registered");

        Ok(())
    }

    /// Move from `Setup` to `Active`. Callable exactly once.
    ///
    /// Reward accrual for participants registered during setup begins now.
    pub fn start(
        &mut self,
        reward_rate_per_day: u64,
        initial_reward_pool: u64,
        now: Timestamp,
    ) -> StakingResult<()> {
        let now = validate_timestamp(now)?;
        require_phase(&self.phase, PhaseKind::Setup)?;

        self.phase = Phase::Active {
            reward_rate_per_day,
            started_at: now,
        };
        self.reward_pool = initial_reward_pool;
        for participant in self.participants.values_mut() {
            participant.last_claim = now;
        }

        self.events.emit(StakingEvent::StakingStarted {
            reward_rate_per_day,
            initial_reward_pool,
            timestamp: now,
        });
        debug!(reward_rate_per_day, initial_reward_pool, "staking started");

        Ok(())
    }

    /// Lock `amount` from `caller` under `curve_id`.
    ///
    /// Balance and allowance are checked before any transfer is attempted.
    pub fn stake<L: TokenLedger>(
        &mut self,
        caller: &Address,
        amount: u64,
        curve_id: CurveId,
        now: Timestamp,
        ledger: &mut L,
    ) -> StakingResult<()> {
        let now = validate_timestamp(now)?;
        self.require_active()?;
        self.whitelist.require(caller)?;

        match self.participants.get(caller) {
            Some(p) if p.is_staking => {
                return Err(StakingError::AlreadyStaking { account: *caller })
            }
            Some(_) => return Err(StakingError::ParticipantExited { account: *caller }),
            None => {}
        }

        require_nonzero(amount)?;
        self.curve(curve_id)?;

        let custody = self.config.custody;
        require_fundable(ledger, caller, &custody, amount)?;

        let new_total = self
            .total_staked
            .checked_add(amount)
            .ok_or(StakingError::Overflow)?;

        // Effects
        let previous_total = self.total_staked;
        self.participants
            .insert(*caller, Participant::new(*caller, amount, curve_id, now));
        self.total_staked = new_total;

        // Interaction
        if let Err(err) = ledger.transfer_from(&custody, caller, &custody, amount) {
            warn!(error = %err, amount, "stake pull failed, rolling back");
            self.participants.remove(caller);
            self.total_staked = previous_total;
            return Err(StakingError::TransferFailed {
                from: *caller,
                to: custody,
                amount,
            });
        }

        self.events.emit(StakingEvent::Staked {
            account: *caller,
            amount,
            curve_id,
            new_total_staked: new_total,
            timestamp: now,
        });
        debug!(amount, curve_id, new_total, "stake recorded");

        Ok(())
    }

    /// Pay `amount` of the caller's vested, unwithdrawn stake.
    ///
    /// Withdrawing the last unit closes the stake and removes it from TVL.
    pub fn withdraw<L: TokenLedger>(
        &mut self,
        caller: &Address,
        amount: u64,
        now: Timestamp,
        ledger: &mut L,
    ) -> StakingResult<()> {
        let now = validate_timestamp(now)?;
        self.require_active()?;

        let participant = self.staking_participant(caller)?;
        require_nonzero(amount)?;

        let curve = self.curve(participant.curve_id)?;
        let claimable = participant.claimable(curve, now);
        check!(
            amount <= claimable,
            StakingError::ExceedsClaimable { claimable, requested: amount }
        );

        let mut updated = participant.clone();
        updated.withdrawn = updated
            .withdrawn
            .checked_add(amount)
            .ok_or(StakingError::Overflow)?;
        let closed = updated.withdrawn == updated.staked_amount;
        let new_total = if closed {
            updated.is_staking = false;
            self.total_staked
                .checked_sub(updated.staked_amount)
                .ok_or(StakingError::InvariantViolated {
                    reason: "closing stake exceeds total staked",
                })?
        } else {
            self.total_staked
        };

        // Effects
        let previous = self.participants.insert(*caller, updated.clone());
        let previous_total = self.total_staked;
        self.total_staked = new_total;

        // Interaction
        let custody = self.config.custody;
        if let Err(err) = ledger.transfer(&custody, caller, amount) {
            warn!(error = %err, amount, "withdraw payout failed, rolling back");
            if let Some(previous) = previous {
                self.participants.insert(*caller, previous);
            }
            self.total_staked = previous_total;
            return Err(StakingError::TransferFailed {
                from: custody,
                to: *caller,
                amount,
            });
        }

        self.events.emit(StakingEvent::Withdrawn {
            account: *caller,
            amount,
            total_withdrawn: updated.withdrawn,
            timestamp: now,
        });
        if closed {
            self.events.emit(StakingEvent::StakeClosed {
                account: *caller,
                staked_amount: updated.staked_amount,
                new_total_staked: new_total,
                timestamp: now,
            });
            debug!(staked = updated.staked_amount, new_total, "stake closed");
        }
        debug!(amount, total_withdrawn = updated.withdrawn, "withdrawal paid");

        Ok(())
    }

    /// Vested amount the caller can withdraw right now
    pub fn claim_left(&self, caller: &Address, now: Timestamp) -> StakingResult<u64> {
        let now = validate_timestamp(now)?;
        self.require_active()?;

        let participant = self.staking_participant(caller)?;
        let curve = self.curve(participant.curve_id)?;
        Ok(participant.claimable(curve, now))
    }

    // ============ Reward Distributor ============

    /// Add `amount` to the reward pool.
    ///
    /// Moving the matching tokens into custody is a separate step for the caller.
    pub fn increase_reward_pool(&mut self, amount: u64, now: Timestamp) -> StakingResult<()> {
        let now = validate_timestamp(now)?;
        self.require_active()?;

        let new_pool = self
            .reward_pool
            .checked_add(amount)
            .ok_or(StakingError::Overflow)?;
        self.reward_pool = new_pool;

        self.events.emit(StakingEvent::RewardPoolIncreased {
            amount,
            new_pool,
            timestamp: now,
        });
        Ok(())
    }

    /// Pay the caller's pro-rata share of rewards accrued in whole days since
    /// the last claim.
    ///
    /// Returns the amount paid; zero when less than a day has passed. The
    /// claim checkpoint advances by whole days, so the sub-day remainder keeps
    /// accruing. Fails without any change if the pool cannot cover the share.
    pub fn get_reward<L: TokenLedger>(
        &mut self,
        caller: &Address,
        now: Timestamp,
        ledger: &mut L,
    ) -> StakingResult<u64> {
        let now = validate_timestamp(now)?;
        self.require_active()?;

        let participant = self.staking_participant(caller)?;
        let days = elapsed_days(participant.last_claim, now);
        if days == 0 {
            return Ok(0);
        }

        let owed = reward_share(
            self.reward_rate_per_day(),
            days,
            participant.staked_amount,
            self.total_staked,
        )?;
        if owed > self.reward_pool {
            warn!(owed, pool = self.reward_pool, days, "reward pool cannot cover claim");
            return Err(StakingError::InsufficientRewardPool {
                available: self.reward_pool,
                required: owed,
            });
        }

        let advanced = days
            .checked_mul(SECONDS_PER_DAY)
            .and_then(|secs| participant.last_claim.checked_add(secs))
            .ok_or(StakingError::Overflow)?;
        let previous_claim = participant.last_claim;

        // Effects
        self.reward_pool -= owed;
        if let Some(p) = self.participants.get_mut(caller) {
            p.last_claim = advanced;
        }

        // Interaction
        if owed > 0 {
            let custody = self.config.custody;
            if let Err(err) = ledger.transfer(&custody, caller, owed) {
                warn!(error = %err, owed, "reward payout failed, rolling back");
                self.reward_pool += owed;
                if let Some(p) = self.participants.get_mut(caller) {
                    p.last_claim = previous_claim;
                }
                return Err(StakingError::TransferFailed {
                    from: custody,
                    to: *caller,
                    amount: owed,
                });
            }
        }

        self.events.emit(StakingEvent::RewardClaimed {
            account: *caller,
            amount: owed,
            days,
            remaining_pool: self.reward_pool,
            timestamp: now,
        });
        debug!(owed, days, remaining_pool = self.reward_pool, "reward paid");

        Ok(owed)
    }

    // ============ APY Calculator ============

    /// Projected APY (x100) for a new stake of `amount` joining the pool
    pub fn calculate_apy_not_staked(&self, amount: u64) -> StakingResult<u64> {
        calculate_apy_with_stake(self.reward_rate_per_day(), self.total_staked, amount)
    }

    /// Current APY (x100) seen by the caller's open stake.
    ///
    /// Identical for every staker since rewards are split pro rata.
    pub fn calculate_apy_staked(&self, caller: &Address) -> StakingResult<u64> {
        self.staking_participant(caller)?;
        calculate_apy(self.reward_rate_per_day(), self.total_staked)
    }
}

// ============ Tests ============
