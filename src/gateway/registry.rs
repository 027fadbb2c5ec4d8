use super::protocol::BarrelHandle;
use crate::client::BarrelClient;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Authoritative registry of storage barrels plus the identifier counters.
///
/// Barrel numbers are minted by `next_barrel_number` before registration and
/// are never reused: removal does not decrement the counter. (The reference
/// implementation decremented it, which can re-mint an identifier under
/// concurrent registration and removal; see DESIGN.md.)
pub struct BarrelRegistry {
    barrels: RwLock<Vec<BarrelHandle>>,
    barrel_counter: AtomicU32,
    downloader_counter: AtomicU32,
}

impl BarrelRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            barrels: RwLock::new(Vec::new()),
            barrel_counter: AtomicU32::new(0),
            downloader_counter: AtomicU32::new(0),
        })
    }

    /// Mints the next barrel identifier, starting at 1.
    pub fn next_barrel_number(&self) -> u32 {
        self.barrel_counter.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Mints the next downloader identifier, starting at 1. Used only for
    /// logging and identification.
    pub fn register_downloader(&self) -> u32 {
        self.downloader_counter.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub async fn register(&self, handle: BarrelHandle) {
        let mut barrels = self.barrels.write().await;
        // Re-registration after a restart replaces the stale address.
        barrels.retain(|b| b.barrel_number != handle.barrel_number);
        tracing::info!(
            "Barrel {} registered at {}",
            handle.barrel_number,
            handle.base_url
        );
        barrels.push(handle);
    }

    /// Removes the matching entry by identifier. The identifier itself stays
    /// burned: the counter is not decremented.
    pub async fn remove(&self, barrel_number: u32) -> bool {
        let mut barrels = self.barrels.write().await;
        let before = barrels.len();
        barrels.retain(|b| b.barrel_number != barrel_number);
        let removed = barrels.len() < before;
        if removed {
            tracing::info!("Barrel {} removed", barrel_number);
        } else {
            tracing::warn!("Barrel {} not found for removal", barrel_number);
        }
        removed
    }

    /// Snapshot of the registry without probing.
    pub async fn all(&self) -> Vec<BarrelHandle> {
        self.barrels.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.barrels.read().await.len()
    }

    /// Liveness sweep: probes every entry with a lightweight `index_size`
    /// call, drops the ones that fail, and returns the surviving live set.
    /// This doubles as the failure-detection mechanism; there is no
    /// separate heartbeat.
    pub async fn probe_live(&self, client: &BarrelClient) -> Vec<BarrelHandle> {
        let candidates = self.all().await;
        let mut live = Vec::new();

        for barrel in candidates {
            match client.index_size(&barrel).await {
                Ok(_) => live.push(barrel),
                Err(e) => {
                    tracing::warn!(
                        "Dropping unresponsive barrel {} at {}: {}",
                        barrel.barrel_number,
                        barrel.base_url,
                        e
                    );
                }
            }
        }

        let mut barrels = self.barrels.write().await;
        barrels.clear();
        barrels.extend(live.iter().cloned());

        live
    }
}
