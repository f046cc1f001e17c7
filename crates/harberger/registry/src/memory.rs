use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use tracing::debug;

use harberger_types::{AssetId, Principal};

use crate::error::RegistryError;
use crate::traits::{AssetRegistry, RegistryHooks};

/// In-memory asset registry used for tests, local demos, and embedding.
///
/// Allocates sequential asset ids and fans mint/burn callbacks out to
/// registered hooks.
pub struct InMemoryAssetRegistry {
    next_id: AtomicU64,
    owners: RwLock<HashMap<AssetId, Principal>>,
    hooks: RwLock<Vec<Arc<dyn RegistryHooks>>>,
}

impl InMemoryAssetRegistry {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            owners: RwLock::new(HashMap::new()),
            hooks: RwLock::new(Vec::new()),
        }
    }

    /// Register a hook receiver. Hooks fire in registration order.
    pub fn register_hooks(&self, hooks: Arc<dyn RegistryHooks>) {
        if let Ok(mut list) = self.hooks.write() {
            list.push(hooks);
        }
    }

    /// Mint a new asset to `to`. Hooks fire after the asset exists.
    pub fn mint(&self, to: &Principal) -> Result<AssetId, RegistryError> {
        let asset = AssetId(self.next_id.fetch_add(1, Ordering::SeqCst));

        let mut owners = self.owners.write().map_err(|_| RegistryError::LockPoisoned)?;
        owners.insert(asset, to.clone());
        drop(owners);

        debug!(%asset, owner = %to, "minted asset");
        self.fan_out(|hooks| hooks.on_minted(asset))?;
        Ok(asset)
    }

    /// Burn an asset. Hooks fire before the asset is destroyed.
    pub fn burn(&self, asset: &AssetId) -> Result<(), RegistryError> {
        {
            let owners = self.owners.read().map_err(|_| RegistryError::LockPoisoned)?;
            if !owners.contains_key(asset) {
                return Err(RegistryError::NoSuchAsset(*asset));
            }
        }

        self.fan_out(|hooks| hooks.on_burned(*asset))?;

        let mut owners = self.owners.write().map_err(|_| RegistryError::LockPoisoned)?;
        owners.remove(asset);
        debug!(%asset, "burned asset");
        Ok(())
    }

    fn fan_out(&self, notify: impl Fn(&dyn RegistryHooks)) -> Result<(), RegistryError> {
        let hooks = self.hooks.read().map_err(|_| RegistryError::LockPoisoned)?;
        for receiver in hooks.iter() {
            notify(receiver.as_ref());
        }
        Ok(())
    }
}

impl Default for InMemoryAssetRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetRegistry for InMemoryAssetRegistry {
    fn owner_of(&self, asset: &AssetId) -> Result<Principal, RegistryError> {
        let owners = self.owners.read().map_err(|_| RegistryError::LockPoisoned)?;
        owners
            .get(asset)
            .cloned()
            .ok_or(RegistryError::NoSuchAsset(*asset))
    }

    fn transfer(
        &self,
        from: &Principal,
        to: &Principal,
        asset: &AssetId,
    ) -> Result<(), RegistryError> {
        let mut owners = self.owners.write().map_err(|_| RegistryError::LockPoisoned)?;
        let owner = owners
            .get(asset)
            .ok_or(RegistryError::NoSuchAsset(*asset))?;

        if owner != from {
            return Err(RegistryError::NotCurrentOwner {
                asset: *asset,
                from: from.clone(),
                owner: owner.clone(),
            });
        }

        owners.insert(*asset, to.clone());
        debug!(%asset, from = %from, to = %to, "transferred asset");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct RecordingHooks {
        minted: RwLock<Vec<AssetId>>,
        burned: RwLock<Vec<AssetId>>,
    }

    impl RecordingHooks {
        fn new() -> Self {
            Self {
                minted: RwLock::new(Vec::new()),
                burned: RwLock::new(Vec::new()),
            }
        }
    }

    impl RegistryHooks for RecordingHooks {
        fn on_minted(&self, asset: AssetId) {
            self.minted.write().unwrap().push(asset);
        }

        fn on_burned(&self, asset: AssetId) {
            self.burned.write().unwrap().push(asset);
        }
    }

    #[test]
    fn mint_assigns_sequential_ids() {
        let registry = InMemoryAssetRegistry::new();
        let alice = Principal::new("alice");
        let first = registry.mint(&alice).unwrap();
        let second = registry.mint(&alice).unwrap();
        assert_eq!(first, AssetId(1));
        assert_eq!(second, AssetId(2));
    }

    #[test]
    fn owner_of_minted_asset() {
        let registry = InMemoryAssetRegistry::new();
        let alice = Principal::new("alice");
        let asset = registry.mint(&alice).unwrap();
        assert_eq!(registry.owner_of(&asset).unwrap(), alice);
    }

    #[test]
    fn owner_of_unminted_asset_fails() {
        let registry = InMemoryAssetRegistry::new();
        assert_eq!(
            registry.owner_of(&AssetId(99)),
            Err(RegistryError::NoSuchAsset(AssetId(99)))
        );
    }

    #[test]
    fn transfer_requires_current_owner() {
        let registry = InMemoryAssetRegistry::new();
        let alice = Principal::new("alice");
        let bob = Principal::new("bob");
        let asset = registry.mint(&alice).unwrap();

        let result = registry.transfer(&bob, &alice, &asset);
        assert!(matches!(
            result,
            Err(RegistryError::NotCurrentOwner { .. })
        ));
        assert_eq!(registry.owner_of(&asset).unwrap(), alice);

        registry.transfer(&alice, &bob, &asset).unwrap();
        assert_eq!(registry.owner_of(&asset).unwrap(), bob);
    }

    #[test]
    fn burn_removes_asset() {
        let registry = InMemoryAssetRegistry::new();
        let alice = Principal::new("alice");
        let asset = registry.mint(&alice).unwrap();

        registry.burn(&asset).unwrap();
        assert_eq!(
            registry.owner_of(&asset),
            Err(RegistryError::NoSuchAsset(asset))
        );
        assert_eq!(
            registry.burn(&asset),
            Err(RegistryError::NoSuchAsset(asset))
        );
    }

    #[test]
    fn hooks_fire_on_mint_and_burn() {
        let registry = InMemoryAssetRegistry::new();
        let hooks = Arc::new(RecordingHooks::new());
        registry.register_hooks(hooks.clone());

        let alice = Principal::new("alice");
        let asset = registry.mint(&alice).unwrap();
        registry.burn(&asset).unwrap();

        assert_eq!(*hooks.minted.read().unwrap(), vec![asset]);
        assert_eq!(*hooks.burned.read().unwrap(), vec![asset]);
    }
}
