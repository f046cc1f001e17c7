//! Asset registry capability for the Harberger ledger.
//!
//! The ledger never inherits from a concrete asset implementation — it
//! consumes this capability instead:
//! - `AssetRegistry`: ownership lookup and atomic transfer
//! - `RegistryHooks`: mint/burn callbacks a registry fans out so the ledger
//!   can initialize and delete its per-asset records
//! - `InMemoryAssetRegistry`: implementation for tests, demos, and embedding

#![deny(unsafe_code)]

pub mod error;
pub mod memory;
pub mod traits;

pub use error::RegistryError;
pub use memory::InMemoryAssetRegistry;
pub use traits::{AssetRegistry, RegistryHooks};
