//! Staking Ledger
//!
//! Per-account principal accounting over an external token service.
//! The ledger custodies deposited tokens in its own token account and
//! records each depositor's principal; no user can withdraw more than
//! they deposited, and recorded liabilities never exceed custody.
//!
//! ## Operations
//!
//! - **Deposit**: pull tokens from the caller via an allowance-based
//!   transfer, then credit the caller's stake. The caller must have
//!   approved the ledger's custody account beforehand.
//! - **Withdraw**: debit the caller's stake FIRST, then push tokens
//!   back from custody. If the outward transfer fails, the debit is
//!   rolled back.
//!
//! ## Reentrancy
//!
//! The outward transfer during withdraw is the one point where the
//! token service can run foreign code before returning. The stake is
//! debited and the internal borrow released before that call, so a
//! reentrant withdraw for the same account sees the already-debited
//! balance and fails its precondition. This ordering must not be
//! changed.

use std::cell::RefCell;
use std::collections::BTreeMap;

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use staking_common::{
    constants::ledger::MAX_TOTAL_STAKED,
    errors::{AmountErrorReason, StakingError, StakingResult},
    events::{EventLog, StakingEvent},
    types::{Address, StakeEntry},
    validation::require_positive,
    TokenService,
};


// ============ Ledger State ============

/// The ledger's accounting state: one entry per account plus the
/// running total. Kept separate from [`StakingLedger`] so it can be
/// snapshotted and serialized as a unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct LedgerState {
    /// Account -> stake entry; entries rest at zero, never deleted
    pub stakes: BTreeMap<Address, StakeEntry>,
    /// Sum of all staked amounts (total value locked)
    pub total_staked: u64,
}

impl LedgerState {
    fn staked(&self, account: &Address) -> u64 {
        self.stakes.get(account).map(|e| e.amount).unwrap_or(0)
    }

    fn credit(&mut self, account: Address, amount: u64, timestamp: u64) {
        let entry = self
            .stakes
            .entry(account)
            .or_insert_with(|| StakeEntry::new(account, 0, timestamp));
        entry.amount += amount;
        entry.last_updated = timestamp;
        self.total_staked += amount;
    }

}

// ============ Staking Ledger ============

/// The staking ledger instance.
///
/// Operations take the token service by reference and a caller-supplied
/// commit timestamp (unix seconds). State sits behind `RefCell` and
/// methods take `&self` so that the token service's outward leg may
/// legally call back into the ledger; no borrow is ever held across a
/// token service call.
#[derive(Debug)]
pub struct StakingLedger {
    /// Deployer recorded at construction. No operation is owner-gated;
    /// this is the extension point for future admin controls.
    owner: Address,
    /// The ledger's own token account holding all deposited funds
    custody: Address,
    state: RefCell<LedgerState>,
    events: RefCell<EventLog>,
}

impl StakingLedger {
    /// Construct the ledger. `owner` is the deploying caller;
    /// `custody` is the token account the ledger holds funds in.
    /// Both are immutable thereafter.
    pub fn new(owner: Address, custody: Address) -> Self {
        Self {
            owner,
            custody,
            state: RefCell::new(LedgerState::default()),
            events: RefCell::new(EventLog::new()),
        }
    }

    // ============ Mutating Operations ============

    /// Deposit `amount` tokens from `caller` into the ledger.
    ///
    /// The caller must have pre-approved the custody account for at
    /// least `amount`; otherwise the pull fails and the operation
    /// returns `TransferRejected` with no ledger mutation.
    pub fn deposit(
        &self,
        token: &dyn TokenService,
        caller: Address,
        amount: u64,
        timestamp: u64,
    ) -> StakingResult<()> {
        require_positive(amount)?;

        // Pull first: custody must physically increase before the
        // ledger claims it
        token
            .transfer_from(self.custody, caller, self.custody, amount)
            .map_err(|_| StakingError::TransferRejected {
                from: caller,
                to: self.custody,
                amount,
            })?;

        {
            let mut state = self.state.borrow_mut();
            let new_stake = state.staked(&caller).checked_add(amount);
            let new_total = state.total_staked.checked_add(amount);
            match (new_stake, new_total) {
                (Some(_), Some(total)) if total <= MAX_TOTAL_STAKED => {
                    state.credit(caller, amount, timestamp);
                }
                _ => {
                    // Undo the pull so post-state equals pre-state
                    drop(state);
                    token
                        .transfer(self.custody, caller, amount)
                        .map_err(|_| StakingError::TransferRejected {
                            from: self.custody,
                            to: caller,
                            amount,
                        })?;
                    return Err(StakingError::InvalidAmount {
                        amount,
                        reason: AmountErrorReason::TooLarge,
                    });
                }
            }
        }

        self.events.borrow_mut().emit(StakingEvent::Deposited {
            account: caller,
            amount,
            timestamp,
        });
        Ok(())
    }

    /// Withdraw `amount` tokens from `caller`'s stake back to `caller`.
    ///
    /// The stake is debited before the outward transfer (reentrancy
    /// defense, see module docs). If the token service rejects the
    /// transfer the debit is rolled back and `TransferRejected` is
    /// returned; post-state equals pre-state.
    pub fn withdraw(
        &self,
        token: &dyn TokenService,
        caller: Address,
        amount: u64,
        timestamp: u64,
    ) -> StakingResult<()> {
        require_positive(amount)?;

        // Debit-before-transfer, borrow released before the outward call
        let previous_update = {
            let mut guard = self.state.borrow_mut();
            let state = &mut *guard;
            match state.stakes.get_mut(&caller) {
                Some(entry) if entry.amount >= amount => {
                    let previous_update = entry.last_updated;
                    entry.amount -= amount;
                    entry.last_updated = timestamp;
                    state.total_staked -= amount;
                    previous_update
                }
                entry => {
                    let available = entry.map(|e| e.amount).unwrap_or(0);
                    return Err(StakingError::InsufficientBalance {
                        available,
                        requested: amount,
                    });
                }
            }
        };

        if token.transfer(self.custody, caller, amount).is_err() {
            // Tokens never left custody; restore the exact pre-state
            let mut guard = self.state.borrow_mut();
            let state = &mut *guard;
            if let Some(entry) = state.stakes.get_mut(&caller) {
                entry.amount += amount;
                entry.last_updated = previous_update;
                state.total_staked += amount;
            }
            return Err(StakingError::TransferRejected {
                from: self.custody,
                to: caller,
                amount,
            });
        }

        self.events.borrow_mut().emit(StakingEvent::Withdrawn {
            account: caller,
            amount,
            timestamp,
        });
        Ok(())
    }

    // ============ Queries ============

    /// Staked balance recorded for `account`. Never fails; unknown
    /// accounts read as zero.
    pub fn staked_balance_of(&self, account: &Address) -> u64 {
        self.state.borrow().staked(account)
    }

    /// Full stake entry for `account`, if it ever deposited
    pub fn stake_entry(&self, account: &Address) -> Option<StakeEntry> {
        self.state.borrow().stakes.get(account).cloned()
    }

    /// Sum of all staked amounts (total value locked)
    pub fn total_value_locked(&self) -> u64 {
        self.state.borrow().total_staked
    }

    /// Solvency check: recorded liabilities never exceed the tokens
    /// the ledger physically custodies
    pub fn is_solvent(&self, token: &dyn TokenService) -> bool {
        self.total_value_locked() <= token.balance_of(&self.custody)
    }

    /// Deployer recorded at construction
    pub fn owner(&self) -> Address {
        self.owner
    }

    /// The ledger's custody token account
    pub fn custody_account(&self) -> Address {
        self.custody
    }

    /// Snapshot of the accounting state
    pub fn snapshot(&self) -> LedgerState {
        self.state.borrow().clone()
    }

    /// Events emitted so far, in order
    pub fn events(&self) -> Vec<StakingEvent> {
        self.events.borrow().events().to_vec()
    }

    /// Drain the event log (hand the stream to an indexer)
    pub fn take_events(&self) -> Vec<StakingEvent> {
        std::mem::take(&mut *self.events.borrow_mut()).into_events()
    }
}

// ============================================================================
// Tests
// ============================================================================
