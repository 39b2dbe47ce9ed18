//! Token Service Seam
//!
//! The staking ledger never touches token balances directly; it moves
//! funds through this trait. The token service is authoritative for
//! balances and allowances, and each call completes synchronously
//! (success or failure) within the caller's logical transaction.
//!
//! Methods take `&self`: the service is callback-capable (its outward
//! leg may run arbitrary code before returning), so implementations
//! keep their state behind interior mutability rather than requiring
//! an exclusive borrow for the whole call.

use crate::errors::StakingResult;
use crate::types::Address;

pub trait TokenService {
    /// Token balance held by `account`
    fn balance_of(&self, account: &Address) -> u64;

    /// Remaining allowance granted by `owner` to `spender`
    fn allowance(&self, owner: &Address, spender: &Address) -> u64;

    /// Move `amount` from `from` to `to` on the authority of `from`
    fn transfer(&self, from: Address, to: Address, amount: u64) -> StakingResult<()>;

    /// Move `amount` from `from` to `to` on the authority of
    /// `spender`, consuming `spender`'s allowance from `from`
    fn transfer_from(
        &self,
        spender: Address,
        from: Address,
        to: Address,
        amount: u64,
    ) -> StakingResult<()>;

    /// Set (not add to) the allowance granted by `owner` to `spender`
    fn approve(&self, owner: Address, spender: Address, amount: u64) -> StakingResult<()>;
}
