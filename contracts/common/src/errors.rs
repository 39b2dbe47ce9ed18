//! Error Types for the Staking Protocol
//!
//! Typed errors with stable codes for logging and debugging. Every
//! operation in the protocol is all-or-nothing: when one of these is
//! returned, no partial state has been persisted.

use crate::types::Address;

/// Result type alias for staking protocol operations
pub type StakingResult<T> = Result<T, StakingError>;

/// Main error enum for all staking protocol errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StakingError {
    // ============ Amount Errors ============
    /// Invalid amount provided (zero, or would overflow accounting)
    InvalidAmount { amount: u64, reason: AmountErrorReason },

    /// Caller's recorded stake (or token balance) cannot cover the request
    InsufficientBalance { available: u64, requested: u64 },

    // ============ Token Service Errors ============
    /// The token service declined a ledger-requested movement.
    /// Any ledger mutation made before the failure has been rolled back.
    TransferRejected {
        from: Address,
        to: Address,
        amount: u64,
    },

    /// Spender's allowance cannot cover the requested `transfer_from`
    InsufficientAllowance { allowance: u64, requested: u64 },

    // ============ Math Errors ============
    /// Arithmetic overflow occurred
    Overflow,
}

/// Reasons for amount-related errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountErrorReason {
    /// Amount is zero when non-zero required
    Zero,
    /// Amount would push an account or total past the representable range
    TooLarge,
}

impl StakingError {
    /// Returns a stable error code for logging/debugging
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidAmount { .. } => "E010_INVALID_AMOUNT",
            Self::InsufficientBalance { .. } => "E011_INSUFFICIENT_BALANCE",
            Self::TransferRejected { .. } => "E020_TRANSFER_REJECTED",
            Self::InsufficientAllowance { .. } => "E021_INSUFFICIENT_ALLOWANCE",
            Self::Overflow => "E030_OVERFLOW",
        }
    }

    /// Returns true if this error is recoverable (caller can fix it)
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::InsufficientBalance { .. } => true,  // Get more funds
            Self::InsufficientAllowance { .. } => true, // Approve more
            Self::InvalidAmount {
                reason: AmountErrorReason::Zero,
                ..
            } => true, // Pick a positive amount
            _ => false,
        }
    }
}
