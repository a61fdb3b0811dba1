//! Injected wallet provider discovery, following [EIP-6963](https://eips.ethereum.org/EIPS/eip-6963).

use crate::events::Subscription;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    sync::{Arc, Weak},
};

/// Metadata a wallet announces about itself.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderInfo {
    pub uuid: String,
    pub name: String,
    /// Data URI of the wallet icon.
    pub icon: String,
    /// Reverse DNS identifier, e.g. `io.metamask`.
    pub rdns: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderDetail {
    pub info: ProviderInfo,
}

/// Called with the complete list of known providers whenever it changes.
pub type ProviderListener = Arc<dyn Fn(&[ProviderDetail]) + Send + Sync>;

pub trait ProviderDiscovery: Send + Sync + 'static {
    fn providers(&self) -> Vec<ProviderDetail>;

    fn subscribe(&self, listener: ProviderListener) -> Subscription;
}

#[derive(Default)]
struct StoreInner {
    providers: Vec<ProviderDetail>,
    next_id: u64,
    listeners: Vec<(u64, ProviderListener)>,
}

/// In-process [`ProviderDiscovery`] fed by [`ProviderStore::announce`].
#[derive(Clone, Default)]
pub struct ProviderStore {
    inner: Arc<Mutex<StoreInner>>,
}

impl ProviderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an announced provider. Repeated announcements of the same `uuid` are ignored.
    ///
    /// Returns whether the provider was new.
    pub fn announce(&self, detail: ProviderDetail) -> bool {
        let (providers, listeners) = {
            let mut inner = self.inner.lock();
            if inner.providers.iter().any(|known| known.info.uuid == detail.info.uuid) {
                return false;
            }
            debug!(target: "frame::discovery", name = %detail.info.name, rdns = %detail.info.rdns, "provider announced");
            inner.providers.push(detail);
            let listeners =
                inner.listeners.iter().map(|(_, listener)| listener.clone()).collect::<Vec<_>>();
            (inner.providers.clone(), listeners)
        };

        for listener in &listeners {
            listener(&providers);
        }
        true
    }

    /// Forgets all providers and notifies the listeners.
    pub fn reset(&self) {
        let listeners = {
            let mut inner = self.inner.lock();
            inner.providers.clear();
            inner.listeners.iter().map(|(_, listener)| listener.clone()).collect::<Vec<_>>()
        };
        for listener in &listeners {
            listener(&[]);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.inner.lock().listeners.len()
    }
}

impl ProviderDiscovery for ProviderStore {
    fn providers(&self) -> Vec<ProviderDetail> {
        self.inner.lock().providers.clone()
    }

    fn subscribe(&self, listener: ProviderListener) -> Subscription {
        let id = {
            let mut inner = self.inner.lock();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.listeners.push((id, listener));
            id
        };

        let inner: Weak<Mutex<StoreInner>> = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = inner.upgrade() {
                inner.lock().listeners.retain(|(entry, _)| *entry != id);
            }
        })
    }
}

impl fmt::Debug for ProviderStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("ProviderStore")
            .field("providers", &inner.providers)
            .field("listeners", &inner.listeners.len())
            .finish()
    }
}
