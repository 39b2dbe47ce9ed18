//! Core Types for the Staking Protocol

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

/// Type alias for addresses (32-byte hash)
pub type Address = [u8; 32];

/// Type alias for content-derived event identifiers
pub type EventId = [u8; 32];

/// One account's recorded principal within the staking ledger.
///
/// Entries are created implicitly on first deposit and never deleted;
/// a fully withdrawn entry rests at zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct StakeEntry {
    /// Account address
    pub account: Address,
    /// Staked amount in base units
    pub amount: u64,
    /// Unix timestamp of the last deposit/withdraw touching this entry
    pub last_updated: u64,
}

impl StakeEntry {
    pub fn new(account: Address, amount: u64, timestamp: u64) -> Self {
        Self {
            account,
            amount,
            last_updated: timestamp,
        }
    }

    /// Check if the entry can cover a withdrawal
    pub fn has_sufficient(&self, amount: u64) -> bool {
        self.amount >= amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stake_entry_sufficiency() {
        let entry = StakeEntry::new([1u8; 32], 100, 1_700_000_000);
        assert!(entry.has_sufficient(100));
        assert!(!entry.has_sufficient(101));
    }
}
