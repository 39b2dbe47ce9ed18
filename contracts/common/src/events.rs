//! Protocol Events
//!
//! Events are appended to an [`EventLog`] during contract execution
//! and consumed off-ledger (TVL dashboards, account history). Each
//! event carries the wall-clock timestamp of the state transition it
//! records.

use crate::types::{Address, EventId};
use crate::Vec;
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Event types for indexing and filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
#[borsh(use_discriminant = true)]
#[repr(u8)]
pub enum EventType {
    // Staking Ledger Events (0x01 - 0x1F)
    Deposited = 0x01,
    Withdrawn = 0x02,

    // Token Events (0x20 - 0x3F)
    TokenTransfer = 0x20,
    TokenApproval = 0x21,
}

/// Main event enum containing all protocol events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub enum StakingEvent {
    /// Emitted when tokens are deposited into the staking ledger
    Deposited {
        account: Address,
        amount: u64,
        timestamp: u64,
    },

    /// Emitted when tokens are withdrawn from the staking ledger
    Withdrawn {
        account: Address,
        amount: u64,
        timestamp: u64,
    },

    /// Emitted on a token transfer (direct or allowance-based)
    TokenTransfer {
        from: Address,
        to: Address,
        amount: u64,
        timestamp: u64,
    },

    /// Emitted when an allowance is set
    TokenApproval {
        owner: Address,
        spender: Address,
        amount: u64,
        timestamp: u64,
    },
}

impl StakingEvent {
    /// Get the event type for filtering
    pub fn event_type(&self) -> EventType {
        match self {
            Self::Deposited { .. } => EventType::Deposited,
            Self::Withdrawn { .. } => EventType::Withdrawn,
            Self::TokenTransfer { .. } => EventType::TokenTransfer,
            Self::TokenApproval { .. } => EventType::TokenApproval,
        }
    }

    /// Get the timestamp when the event occurred
    pub fn timestamp(&self) -> u64 {
        match self {
            Self::Deposited { timestamp, .. } => *timestamp,
            Self::Withdrawn { timestamp, .. } => *timestamp,
            Self::TokenTransfer { timestamp, .. } => *timestamp,
            Self::TokenApproval { timestamp, .. } => *timestamp,
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

    /// Content-derived identifier for this event at a given sequence
    /// position. Used by indexers as a dedup key.
    pub fn event_id(&self, seq: u64) -> EventId {
        let mut hasher = Sha256::new();
        hasher.update(self.to_bytes());
        hasher.update(seq.to_le_bytes());
        hasher.finalize().into()
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

    /// Get all events in emission order
    pub fn events(&self) -> &[StakingEvent] {
        &self.events
    }

    /// Take ownership of all events
    pub fn into_events(self) -> Vec<StakingEvent> {
        self.events
    }

    /// Filter events by type
    pub fn filter_by_type(&self, event_type: EventType) -> Vec<&StakingEvent> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    /// Check if any events were emitted
    pub fn has_events(&self) -> bool {
        !self.events.is_empty()
    }

    /// Get number of events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Clear all events
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_and_timestamp() {
        let event = StakingEvent::Deposited {
            account: [1u8; 32],
            amount: 100_000_000,
            timestamp: 1_700_000_000,
        };

        assert_eq!(event.event_type(), EventType::Deposited);
        assert_eq!(event.timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_event_serialization() {
        let event = StakingEvent::TokenTransfer {
            from: [1u8; 32],
            to: [2u8; 32],
            amount: 1000_00000000,
            timestamp: 1_700_000_200,
        };

        let bytes = event.to_bytes();
        let restored = StakingEvent::from_bytes(&bytes).unwrap();

        assert_eq!(event, restored);
    }

    #[test]
    fn test_event_id_depends_on_sequence() {
        let event = StakingEvent::Withdrawn {
            account: [3u8; 32],
            amount: 50_00000000,
            timestamp: 1_700_000_300,
        };

        assert_eq!(event.event_id(7), event.event_id(7));
        assert_ne!(event.event_id(7), event.event_id(8));
    }

    #[test]
    fn test_event_log() {
        let mut log = EventLog::new();

        log.emit(StakingEvent::Deposited {
            account: [1u8; 32],
            amount: 100_00000000,
            timestamp: 1_700_000_000,
        });
        log.emit(StakingEvent::TokenTransfer {
            from: [1u8; 32],
            to: [2u8; 32],
            amount: 100_00000000,
            timestamp: 1_700_000_000,
        });

        assert_eq!(log.len(), 2);
        assert!(log.has_events());

        let deposits = log.filter_by_type(EventType::Deposited);
        assert_eq!(deposits.len(), 1);
    }
}
