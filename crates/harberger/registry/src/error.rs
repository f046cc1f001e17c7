use thiserror::Error;

use harberger_types::{AssetId, Principal};

/// Errors returned by asset registry implementations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("no such asset: {0}")]
    NoSuchAsset(AssetId),

    #[error("transfer of asset {asset} from {from} rejected: current owner is {owner}")]
    NotCurrentOwner {
        asset: AssetId,
        from: Principal,
        owner: Principal,
    },

    #[error("registry lock poisoned")]
    LockPoisoned,
}
