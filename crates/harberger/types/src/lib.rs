//! Shared types for the Harberger ledger.
//!
//! This crate provides:
//! - `AssetId` / `Principal` identifier newtypes
//! - `TaxSchedule` construction-time configuration and per-annum tax math
//! - `AssetTaxRecord` per-asset tax state
//! - `LedgerEvent` ordered notification types

#![deny(unsafe_code)]

pub mod events;
pub mod ids;
pub mod record;
pub mod schedule;

pub use events::LedgerEvent;
pub use ids::{AssetId, Principal};
pub use record::AssetTaxRecord;
pub use schedule::TaxSchedule;
