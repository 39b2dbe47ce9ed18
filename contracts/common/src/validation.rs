//! Validation Helpers
//!
//! Reusable precondition checks shared by the token and ledger crates.

use crate::errors::{AmountErrorReason, StakingError, StakingResult};

/// Check a condition and return an error if it fails.
///
/// ```rust,ignore
/// check!(amount > 0, StakingError::InvalidAmount { .. });
/// ```
#[macro_export]
macro_rules! check {
    ($condition:expr, $error:expr) => {
        if !($condition) {
            return Err($error);
        }
    };
}

pub use crate::check;

/// Reject zero amounts. Every ledger mutation requires a positive amount.
pub fn require_positive(amount: u64) -> StakingResult<()> {
    if amount == 0 {
        return Err(StakingError::InvalidAmount {
            amount,
            reason: AmountErrorReason::Zero,
        });
    }
    Ok(())
}

/// Checked addition surfacing overflow as a typed error.
pub fn checked_add(a: u64, b: u64) -> StakingResult<u64> {
    a.checked_add(b).ok_or(StakingError::Overflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_positive() {
        assert!(require_positive(1).is_ok());
        assert!(matches!(
            require_positive(0),
            Err(StakingError::InvalidAmount {
                amount: 0,
                reason: AmountErrorReason::Zero
            })
        ));
    }

    #[test]
    fn test_checked_add_overflow() {
        assert_eq!(checked_add(1, 2).unwrap(), 3);
        assert_eq!(checked_add(u64::MAX, 1), Err(StakingError::Overflow));
    }
}
