//! Harberger tax accrual and ownership-transfer state machine.
//!
//! Each asset carries a self-declared valuation, accrues tax against it,
//! can be seized by the authority on delinquency, and can be force-bought
//! by any third party at the declared valuation.
//!
//! This crate provides:
//! - `HarbergerLedger`: the per-asset record store, system balance, event
//!   log, and the four state-transition operations (self-evaluate, pay-tax,
//!   force-buy, seize)
//! - `Clock` trait boundary with `SystemClock` and a `ManualClock` for
//!   deterministic test time
//! - `LedgerError`: the precondition-failure taxonomy
//!
//! There is no discrete automaton: each asset's behavior is governed by
//! timestamp-based lock and accrual predicates evaluated against the clock
//! at call time.

#![deny(unsafe_code)]

pub mod clock;
pub mod error;
pub mod ledger;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::LedgerError;
pub use ledger::HarbergerLedger;

pub use harberger_registry::{AssetRegistry, InMemoryAssetRegistry, RegistryError, RegistryHooks};
pub use harberger_types::{AssetId, AssetTaxRecord, LedgerEvent, Principal, TaxSchedule};
