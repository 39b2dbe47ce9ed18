//! Staking Protocol Common Library
//!
//! Shared types, constants, errors, and events for the staking
//! protocol contracts.
//!
//! The protocol has two on-ledger components:
//! - **Token Service**: a fungible token with balances and allowances,
//!   consumed through the [`TokenService`] trait.
//! - **Staking Ledger**: per-account principal accounting with
//!   deposit/withdraw choreography against the Token Service.
//!
//! This crate is `no_std` compatible when built without the default
//! `std` feature.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

// Re-export alloc types for submodules based on feature
#[cfg(not(feature = "std"))]
pub use alloc::{collections::BTreeMap, string::String, vec::Vec};
#[cfg(feature = "std")]
pub use std::{collections::BTreeMap, string::String, vec::Vec};

pub mod constants;
pub mod errors;
pub mod events;
pub mod token_service;
pub mod types;
pub mod validation;

// Re-exports for convenience
pub use constants::*;
pub use errors::*;
pub use events::*;
pub use token_service::*;
pub use types::*;
