use harberger_types::{AssetId, Principal};

use crate::error::RegistryError;

/// Ownership boundary consumed by the ledger.
///
/// Ownership lives in the registry, never in the ledger's records — the
/// ledger reads it here and requests transfers on seizure and force-buy.
pub trait AssetRegistry: Send + Sync {
    /// Current owner of an asset. Fails with `NoSuchAsset` for assets
    /// never minted or already burned.
    fn owner_of(&self, asset: &AssetId) -> Result<Principal, RegistryError>;

    /// Atomic ownership change. `from` must be the current owner.
    fn transfer(
        &self,
        from: &Principal,
        to: &Principal,
        asset: &AssetId,
    ) -> Result<(), RegistryError>;
}

/// Lifecycle callbacks a registry fans out to interested parties.
///
/// `on_minted` fires after an asset is created; `on_burned` fires before it
/// is destroyed. The ledger implements this to create and delete its
/// per-asset tax records.
pub trait RegistryHooks: Send + Sync {
    fn on_minted(&self, asset: AssetId);

    fn on_burned(&self, asset: AssetId);
}
