use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{AssetId, Principal};

/// Ledger notifications — appended to an ordered, append-only log.
///
/// Each operation emits its events exactly once per call that reaches the
/// relevant point, in the order its guards are evaluated. `ArrearsDetected`
/// is emitted by every arrears check that observes true, including checks
/// that run as guards inside other operations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEvent {
    /// The stored tax owed was recomputed from the accrual clock.
    TaxRecalculated {
        asset: AssetId,
        tax_owed: u128,
        at: DateTime<Utc>,
    },
    /// An arrears check observed the asset past its payment deadline.
    ArrearsDetected { asset: AssetId, at: DateTime<Utc> },
    /// The authority reclaimed a delinquent asset.
    Seized {
        asset: AssetId,
        authority: Principal,
        at: DateTime<Utc>,
    },
    /// The owner declared a new valuation.
    SelfEvaluated {
        asset: AssetId,
        owner: Principal,
        valuation: u128,
        at: DateTime<Utc>,
    },
    /// A third party purchased the asset at its declared valuation.
    ForceBought {
        asset: AssetId,
        buyer: Principal,
        price: u128,
        at: DateTime<Utc>,
    },
}

impl LedgerEvent {
    /// The asset this event concerns.
    pub fn asset(&self) -> AssetId {
        match self {
            Self::TaxRecalculated { asset, .. }
            | Self::ArrearsDetected { asset, .. }
            | Self::Seized { asset, .. }
            | Self::SelfEvaluated { asset, .. }
            | Self::ForceBought { asset, .. } => *asset,
        }
    }

    /// When the event was emitted.
    pub fn at(&self) -> DateTime<Utc> {
        match self {
            Self::TaxRecalculated { at, .. }
            | Self::ArrearsDetected { at, .. }
            | Self::Seized { at, .. }
            | Self::SelfEvaluated { at, .. }
            | Self::ForceBought { at, .. } => *at,
        }
    }
}
