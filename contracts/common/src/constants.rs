//! Protocol Constants
//!
//! Token metadata and the fixed configuration values shared by the
//! staking contracts.

/// Token Metadata
pub mod token {
    /// Token name
    pub const NAME: &str = "MyToken";
    /// Token symbol
    pub const SYMBOL: &str = "MTK";
    /// Decimal places
    pub const DECIMALS: u8 = 8;
    /// One unit with decimals (1 MTK = 100_000_000 base units)
    pub const ONE: u64 = 100_000_000;
    /// Fixed supply minted to the deployer at construction
    pub const INITIAL_SUPPLY: u64 = 10_000 * ONE;
}

/// Staking Ledger Configuration
pub mod ledger {
    use super::token::ONE;

    /// Maximum total value locked the ledger will account for.
    /// Fits comfortably in u64 and bounds overflow checks.
    pub const MAX_TOTAL_STAKED: u64 = 1_000_000_000 * ONE;
}
