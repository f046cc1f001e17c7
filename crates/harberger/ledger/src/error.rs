use thiserror::Error;

use harberger_registry::RegistryError;
use harberger_types::{AssetId, Principal};

/// Precondition failures surfaced by ledger operations.
///
/// Every failure aborts the triggering call synchronously with no retry.
/// Record state, ownership, and the system balance are never mutated by a
/// failed operation; the one carve-out is the `ArrearsDetected`
/// notification, which persists for every arrears check that observes true.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("unknown asset: {0}")]
    UnknownAsset(AssetId),

    #[error("caller {caller} is not the owner of asset {asset} (owner: {owner})")]
    NotOwner {
        asset: AssetId,
        caller: Principal,
        owner: Principal,
    },

    #[error("caller {0} is not the authority")]
    NotAuthorized(Principal),

    #[error("valuation {proposed} below minimum {minimum}")]
    ValuationTooLow { proposed: u128, minimum: u128 },

    #[error("asset {0} is in arrears")]
    InArrears(AssetId),

    #[error("asset {0} is not in arrears")]
    NotInArrears(AssetId),

    #[error("asset {0} is self-evaluation locked")]
    SelfEvaluationLocked(AssetId),

    #[error("asset {0} is force-buy locked")]
    ForceBuyLocked(AssetId),

    #[error("owner cannot force-buy own asset {0}")]
    CannotForceBuySelf(AssetId),

    #[error("insufficient payment: required {required}, sent {sent}")]
    InsufficientPayment { required: u128, sent: u128 },

    #[error("nothing to withdraw")]
    NothingToWithdraw,

    #[error("arithmetic overflow")]
    ArithmeticOverflow,

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("ledger lock poisoned")]
    LockPoisoned,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = LedgerError::InsufficientPayment {
            required: 1_000,
            sent: 500,
        };
        let s = err.to_string();
        assert!(s.contains("1000"));
        assert!(s.contains("500"));
    }

    #[test]
    fn registry_error_is_transparent() {
        let err: LedgerError = RegistryError::NoSuchAsset(AssetId(9)).into();
        assert_eq!(err.to_string(), "no such asset: 9");
    }
}
