//! Staking Event Indexer
//!
//! Consumes the ledger's observation stream and answers the queries
//! external monitors need: total value locked and per-account deposit
//! and withdrawal history. Ingestion is idempotent: each event carries
//! a content-derived id, and an event seen twice (e.g. on stream
//! replay) is stored once.
//!
//! Only ledger events count toward TVL; token transfer/approval events
//! are stored for history but do not move the aggregates.

use std::collections::BTreeSet;

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use staking_common::{
    events::{EventType, StakingEvent},
    types::{Address, EventId},
};

/// One indexed event, as stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct EventRecord {
    /// Content-derived identifier (dedup key)
    pub id: EventId,
    /// Stream sequence number at ingestion
    pub seq: u64,
    /// The event itself
    pub event: StakingEvent,
}

/// In-memory event store with TVL and history queries
#[derive(Debug, Clone, Default)]
pub struct EventStore {
    records: Vec<EventRecord>,
    seen: BTreeSet<EventId>,
    deposit_total: u64,
    withdraw_total: u64,
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ingest one event at stream position `seq`. Returns the record
    /// id, or `None` if the event was already stored.
    pub fn ingest(&mut self, event: StakingEvent, seq: u64) -> Option<EventId> {
        let id = event.event_id(seq);
        if !self.seen.insert(id) {
            return None;
        }

        match event {
            StakingEvent::Deposited { amount, .. } => {
                self.deposit_total = self.deposit_total.saturating_add(amount);
            }
            StakingEvent::Withdrawn { amount, .. } => {
                self.withdraw_total = self.withdraw_total.saturating_add(amount);
            }
            StakingEvent::TokenTransfer { .. } | StakingEvent::TokenApproval { .. } => {}
        }

        self.records.push(EventRecord { id, seq, event });
        Some(id)
    }

    /// Ingest a batch in stream order, continuing from `start_seq`.
    /// Returns the number of newly stored events.
    pub fn ingest_all<I>(&mut self, events: I, start_seq: u64) -> usize
    where
        I: IntoIterator<Item = StakingEvent>,
    {
        let mut stored = 0;
        for (offset, event) in events.into_iter().enumerate() {
            if self.ingest(event, start_seq + offset as u64).is_some() {
                stored += 1;
            }
        }
        stored
    }

    /// Total value locked: cumulative deposits minus withdrawals
    pub fn total_value_locked(&self) -> u64 {
        self.deposit_total.saturating_sub(self.withdraw_total)
    }

    /// Cumulative deposited amount
    pub fn deposit_total(&self) -> u64 {
        self.deposit_total
    }

    /// Cumulative withdrawn amount
    pub fn withdraw_total(&self) -> u64 {
        self.withdraw_total
    }

    /// Ledger events touching `account`, in ingestion order
    pub fn account_history(&self, account: &Address) -> Vec<&EventRecord> {
        self.records
            .iter()
            .filter(|r| match &r.event {
                StakingEvent::Deposited { account: a, .. }
                | StakingEvent::Withdrawn { account: a, .. } => a == account,
                _ => false,
            })
            .collect()
    }

    /// All records of one event type
    pub fn records_of_type(&self, event_type: EventType) -> Vec<&EventRecord> {
        self.records
            .iter()
            .filter(|r| r.event.event_type() == event_type)
            .collect()
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================
