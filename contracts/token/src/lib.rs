//! Fungible Token Service
//!
//! In-memory account/allowance token consumed by the staking ledger
//! through the [`TokenService`] trait. The full fixed supply is minted
//! to the deployer at construction; there is no later mint or burn.
//!
//! State lives behind `RefCell` because trait methods take `&self`:
//! the service must be callable from code that is itself running
//! inside a ledger operation (the callback-capable collaborator
//! model). Internal borrows are never held across a call out of this
//! crate.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use staking_common::{
    constants::token,
    errors::{StakingError, StakingResult},
    events::{EventLog, StakingEvent},
    types::Address,
    validation::checked_add,
    TokenService,
};

// ============ Token State ============

/// Balances, allowances, and supply for the token service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct TokenState {
    /// Total supply (fixed after construction)
    pub total_supply: u64,
    /// Account balances
    pub balances: BTreeMap<Address, u64>,
    /// Allowances keyed by (owner, spender)
    pub allowances: BTreeMap<(Address, Address), u64>,
}

impl TokenState {
    /// Move `amount` between accounts. The sole balance-mutating path.
    fn move_tokens(&mut self, from: Address, to: Address, amount: u64) -> StakingResult<()> {
        let from_balance = self.balances.get(&from).copied().unwrap_or(0);
        if from_balance < amount {
            return Err(StakingError::InsufficientBalance {
                available: from_balance,
                requested: amount,
            });
        }

        // Self-transfer is a no-op once the balance check passed
        if from == to {
            return Ok(());
        }

        let to_balance = self.balances.get(&to).copied().unwrap_or(0);
        let new_to_balance = checked_add(to_balance, amount)?;

        self.balances.insert(from, from_balance - amount);
        self.balances.insert(to, new_to_balance);
        Ok(())
    }
}

// ============ Token Service ============

/// The token service instance
#[derive(Debug)]
pub struct Token {
    deployer: Address,
    state: RefCell<TokenState>,
    events: RefCell<EventLog>,
    /// Wall-clock seconds stamped onto emitted events; advanced by the
    /// host environment between transactions
    clock: Cell<u64>,
}

impl Token {
    /// Deploy the token, minting the fixed supply to `deployer`
    pub fn new(deployer: Address) -> Self {
        let mut state = TokenState {
            total_supply: token::INITIAL_SUPPLY,
            ..TokenState::default()
        };
        state.balances.insert(deployer, token::INITIAL_SUPPLY);

        Self {
            deployer,
            state: RefCell::new(state),
            events: RefCell::new(EventLog::new()),
            clock: Cell::new(0),
        }
    }

    /// Token name
    pub fn name() -> &'static str {
        token::NAME
    }

    /// Token symbol
    pub fn symbol() -> &'static str {
        token::SYMBOL
    }

    /// Token decimals
    pub fn decimals() -> u8 {
        token::DECIMALS
    }

    /// Total supply
    pub fn total_supply(&self) -> u64 {
        self.state.borrow().total_supply
    }

    /// Deployer recorded at construction
    pub fn deployer(&self) -> Address {
        self.deployer
    }

    /// Set the wall-clock time stamped onto subsequent events
    pub fn set_time(&self, timestamp: u64) {
        self.clock.set(timestamp);
    }

    /// Snapshot of the full token state (for persistence and tests)
    pub fn snapshot(&self) -> TokenState {
        self.state.borrow().clone()
    }

    /// Events emitted so far, draining the log
    pub fn take_events(&self) -> Vec<StakingEvent> {
        std::mem::take(&mut *self.events.borrow_mut()).into_events()
    }

    fn emit(&self, event: StakingEvent) {
        self.events.borrow_mut().emit(event);
    }
}

impl TokenService for Token {
    fn balance_of(&self, account: &Address) -> u64 {
        self.state.borrow().balances.get(account).copied().unwrap_or(0)
    }

    fn allowance(&self, owner: &Address, spender: &Address) -> u64 {
        self.state
            .borrow()
            .allowances
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or(0)
    }

    fn transfer(&self, from: Address, to: Address, amount: u64) -> StakingResult<()> {
        self.state.borrow_mut().move_tokens(from, to, amount)?;
        self.emit(StakingEvent::TokenTransfer {
            from,
            to,
            amount,
            timestamp: self.clock.get(),
        });
        Ok(())
    }

    fn transfer_from(
        &self,
        spender: Address,
        from: Address,
        to: Address,
        amount: u64,
    ) -> StakingResult<()> {
        {
            let mut state = self.state.borrow_mut();

            let allowance = state.allowances.get(&(from, spender)).copied().unwrap_or(0);
            if allowance < amount {
                return Err(StakingError::InsufficientAllowance {
                    allowance,
                    requested: amount,
                });
            }

            state.move_tokens(from, to, amount)?;
            state.allowances.insert((from, spender), allowance - amount);
        }

        self.emit(StakingEvent::TokenTransfer {
            from,
            to,
            amount,
            timestamp: self.clock.get(),
        });
        Ok(())
    }

    fn approve(&self, owner: Address, spender: Address, amount: u64) -> StakingResult<()> {
        self.state
            .borrow_mut()
            .allowances
            .insert((owner, spender), amount);
        self.emit(StakingEvent::TokenApproval {
            owner,
            spender,
            amount,
            timestamp: self.clock.get(),
        });
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use staking_common::events::EventType;

    const ONE: u64 = token::ONE;

    fn deployer() -> Address {
        [1u8; 32]
    }

    fn user1() -> Address {
        [2u8; 32]
    }

    fn user2() -> Address {
        [3u8; 32]
    }

    #[test]
    fn test_deployment() {
        let t = Token::new(deployer());

        assert_eq!(Token::name(), "MyToken");
        assert_eq!(Token::symbol(), "MTK");
        assert_eq!(Token::decimals(), 8);
        assert_eq!(t.total_supply(), token::INITIAL_SUPPLY);
        assert_eq!(t.balance_of(&deployer()), token::INITIAL_SUPPLY);
        assert_eq!(t.deployer(), deployer());
    }

    #[test]
    fn test_transfer() {
        let t = Token::new(deployer());

        t.transfer(deployer(), user1(), 1000 * ONE).unwrap();

        assert_eq!(t.balance_of(&user1()), 1000 * ONE);
        assert_eq!(t.balance_of(&deployer()), token::INITIAL_SUPPLY - 1000 * ONE);
        // Supply is conserved
        assert_eq!(
            t.balance_of(&deployer()) + t.balance_of(&user1()),
            t.total_supply()
        );
    }

    #[test]
    fn test_transfer_insufficient_balance() {
        let t = Token::new(deployer());

        let result = t.transfer(user1(), user2(), ONE);
        assert_eq!(
            result,
            Err(StakingError::InsufficientBalance {
                available: 0,
                requested: ONE,
            })
        );
        assert_eq!(t.balance_of(&user2()), 0);
    }

    #[test]
    fn test_zero_transfer_is_permitted() {
        let t = Token::new(deployer());

        t.transfer(user1(), user2(), 0).unwrap();
        assert_eq!(t.balance_of(&user2()), 0);
    }

    #[test]
    fn test_self_transfer_keeps_balance() {
        let t = Token::new(deployer());

        t.transfer(deployer(), deployer(), 100 * ONE).unwrap();
        assert_eq!(t.balance_of(&deployer()), token::INITIAL_SUPPLY);
    }

    #[test]
    fn test_approve_and_transfer_from() {
        let t = Token::new(deployer());
        t.transfer(deployer(), user1(), 500 * ONE).unwrap();

        t.approve(user1(), user2(), 300 * ONE).unwrap();
        assert_eq!(t.allowance(&user1(), &user2()), 300 * ONE);

        t.transfer_from(user2(), user1(), user2(), 200 * ONE).unwrap();

        assert_eq!(t.balance_of(&user1()), 300 * ONE);
        assert_eq!(t.balance_of(&user2()), 200 * ONE);
        // Allowance is consumed, not reset
        assert_eq!(t.allowance(&user1(), &user2()), 100 * ONE);
    }

    #[test]
    fn test_transfer_from_without_allowance() {
        let t = Token::new(deployer());
        t.transfer(deployer(), user1(), 500 * ONE).unwrap();

        let result = t.transfer_from(user2(), user1(), user2(), 100 * ONE);
        assert_eq!(
            result,
            Err(StakingError::InsufficientAllowance {
                allowance: 0,
                requested: 100 * ONE,
            })
        );
        assert_eq!(t.balance_of(&user1()), 500 * ONE);
    }

    #[test]
    fn test_approve_overwrites() {
        let t = Token::new(deployer());

        t.approve(user1(), user2(), 300 * ONE).unwrap();
        t.approve(user1(), user2(), 50 * ONE).unwrap();

        assert_eq!(t.allowance(&user1(), &user2()), 50 * ONE);
    }

    #[test]
    fn test_events_carry_clock_time() {
        let t = Token::new(deployer());
        t.set_time(1_700_000_000);

        t.transfer(deployer(), user1(), ONE).unwrap();
        t.approve(user1(), user2(), ONE).unwrap();

        let events = t.take_events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event_type(), EventType::TokenTransfer);
        assert_eq!(events[1].event_type(), EventType::TokenApproval);
        assert!(events.iter().all(|e| e.timestamp() == 1_700_000_000));

        // Log was drained
        assert!(t.take_events().is_empty());
    }

    #[test]
    fn test_state_cbor_round_trip() {
        let t = Token::new(deployer());
        t.transfer(deployer(), user1(), 42 * ONE).unwrap();
        t.approve(user1(), user2(), 7 * ONE).unwrap();
        let state = t.snapshot();

        let mut bytes = Vec::new();
        ciborium::into_writer(&state, &mut bytes).unwrap();
        let restored: TokenState = ciborium::from_reader(bytes.as_slice()).unwrap();

        assert_eq!(state, restored);
    }
}
