//! Downloader Worker Loop
//!
//! Consumes frontier URLs from the gateway and replicates the extracted
//! index data to every barrel in a locally cached live set. The cache is
//! refreshed from the gateway on a fixed interval rather than per page.

use super::parse::{self, ExtractedPage};
use crate::client::{BarrelClient, GatewayClient};
use crate::gateway::protocol::BarrelHandle;
use anyhow::Result;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};

/// How often the local barrel cache is refreshed from the gateway.
const BARREL_REFRESH_INTERVAL: Duration = Duration::from_secs(2);

/// How many times a rejected `url_info` write is retried before the barrel
/// is flushed and deregistered.
const URL_INFO_RETRIES: u32 = 5;

/// Pause between the forced snapshot and the deregistration, giving the
/// barrel time to finish writing.
const ESCALATION_PAUSE: Duration = Duration::from_secs(1);

/// Pause before re-polling after a failed `next_url` call.
const POLL_RETRY_PAUSE: Duration = Duration::from_secs(1);

pub struct Downloader {
    downloader_number: u32,
    gateway: GatewayClient,
    barrel_client: BarrelClient,
    http_client: reqwest::Client,
    barrels: RwLock<Vec<BarrelHandle>>,
    visited: Mutex<HashSet<String>>,
}

impl Downloader {
    /// Registers with the gateway and seeds the local barrel cache.
    pub async fn connect(gateway_url: &str) -> Result<Arc<Self>> {
        let gateway = GatewayClient::new(gateway_url);
        let downloader_number = gateway.register_downloader().await?;
        let barrels = gateway.registered_barrels().await.unwrap_or_else(|e| {
            tracing::warn!("Initial barrel discovery failed: {}", e);
            Vec::new()
        });

        tracing::info!(
            "Downloader {} connected to gateway at {} ({} barrels known)",
            downloader_number,
            gateway_url,
            barrels.len()
        );

        Ok(Arc::new(Self {
            downloader_number,
            gateway,
            barrel_client: BarrelClient::new(),
            http_client: reqwest::Client::new(),
            barrels: RwLock::new(barrels),
            visited: Mutex::new(HashSet::new()),
        }))
    }

    pub fn downloader_number(&self) -> u32 {
        self.downloader_number
    }

    /// Spawns the background task that keeps the barrel cache fresh.
    pub fn spawn_barrel_refresh(self: &Arc<Self>) {
        let downloader = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(BARREL_REFRESH_INTERVAL);
            loop {
                ticker.tick().await;
                match downloader.gateway.registered_barrels().await {
                    Ok(live) => {
                        *downloader.barrels.write().await = live;
                    }
                    Err(e) => {
                        tracing::warn!("Barrel cache refresh failed: {}", e);
                    }
                }
            }
        });
    }

    /// Main crawl loop: long-poll the frontier and process each URL. Never
    /// returns under normal operation.
    pub async fn run(self: Arc<Self>) {
        loop {
            let url = match self.gateway.next_url().await {
                Ok(url) => url,
                Err(e) => {
                    tracing::warn!("next_url failed: {}", e);
                    tokio::time::sleep(POLL_RETRY_PAUSE).await;
                    continue;
                }
            };

            if !self.visited.lock().await.insert(url.clone()) {
                tracing::debug!("Skipping already visited URL: {}", url);
                continue;
            }

            self.process_url(&url).await;
        }
    }

    /// Fetches, extracts and replicates one page. Fetch or parse failures
    /// abandon the URL; it is not re-enqueued.
    pub async fn process_url(&self, url: &str) {
        tracing::info!(
            "Downloader {} processing {}",
            self.downloader_number,
            url
        );

        let body = match parse::fetch_page(&self.http_client, url).await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("Failed to download {}: {}", url, e);
                return;
            }
        };

        let page = parse::extract_page(url, &body);
        self.replicate_page(url, &page).await;
    }

    async fn replicate_page(&self, url: &str, page: &ExtractedPage) {
        self.send_url_info(url, &page.title, &page.description)
            .await;

        for word in &page.words {
            self.send_word(url, word).await;
        }

        for link in &page.links {
            self.send_link(url, link).await;
            // Unconditional: the frontier tolerates duplicates and the
            // visited check happens on the consuming side.
            if let Err(e) = self.gateway.put_new(link).await {
                tracing::warn!("Failed to enqueue discovered link {}: {}", link, e);
            }
        }
    }

    /// Sends page metadata to every cached barrel. An application-level
    /// rejection is retried up to `URL_INFO_RETRIES` times; a barrel that
    /// keeps rejecting is told to snapshot and is then deregistered from the
    /// gateway so no other downloader keeps writing to it.
    async fn send_url_info(&self, url: &str, title: &str, description: &str) {
        let barrels = self.barrels.read().await.clone();

        for barrel in &barrels {
            let mut accepted = match self
                .barrel_client
                .receive_url_info(barrel, url, title, description)
                .await
            {
                Ok(accepted) => accepted,
                Err(e) => {
                    tracing::warn!(
                        "url_info to barrel {} failed: {}",
                        barrel.barrel_number,
                        e
                    );
                    continue;
                }
            };

            let mut retries = 0;
            while !accepted {
                match self
                    .barrel_client
                    .receive_url_info(barrel, url, title, description)
                    .await
                {
                    Ok(retry_accepted) => accepted = retry_accepted,
                    Err(e) => {
                        tracing::warn!(
                            "url_info retry to barrel {} failed: {}",
                            barrel.barrel_number,
                            e
                        );
                        break;
                    }
                }

                retries += 1;
                if retries == URL_INFO_RETRIES && !accepted {
                    tracing::error!(
                        "Barrel {} keeps rejecting url_info, deregistering it",
                        barrel.barrel_number
                    );
                    if let Err(e) = self.barrel_client.flush(barrel).await {
                        tracing::warn!(
                            "Flush of barrel {} failed: {}",
                            barrel.barrel_number,
                            e
                        );
                    }
                    tokio::time::sleep(ESCALATION_PAUSE).await;
                    if let Err(e) = self.gateway.remove_barrel(barrel.barrel_number).await {
                        tracing::warn!(
                            "Deregistration of barrel {} failed: {}",
                            barrel.barrel_number,
                            e
                        );
                    }
                    break;
                }
            }
        }
    }

    /// Sends one word to every cached barrel. A transport failure drops the
    /// barrel from the local cache only; the gateway's own probe sweep
    /// decides whether it is really gone.
    async fn send_word(&self, url: &str, word: &str) {
        let barrels = self.barrels.read().await.clone();
        let mut failed: Vec<u32> = Vec::new();

        for barrel in &barrels {
            if let Err(e) = self.barrel_client.receive_word(barrel, url, word).await {
                tracing::warn!(
                    "word to barrel {} failed, dropping it from the local cache: {}",
                    barrel.barrel_number,
                    e
                );
                failed.push(barrel.barrel_number);
            }
        }

        if !failed.is_empty() {
            self.barrels
                .write()
                .await
                .retain(|b| !failed.contains(&b.barrel_number));
        }
    }

    /// Sends one source→target link to every cached barrel, best effort.
    async fn send_link(&self, source_url: &str, target_url: &str) {
        let barrels = self.barrels.read().await.clone();

        for barrel in &barrels {
            if let Err(e) = self
                .barrel_client
                .receive_link(barrel, source_url, target_url)
                .await
            {
                tracing::warn!(
                    "link to barrel {} failed: {}",
                    barrel.barrel_number,
                    e
                );
            }
        }
    }

    /// Replaces the local barrel cache. Used by tests and by callers that
    /// manage discovery themselves.
    pub async fn set_barrels(&self, barrels: Vec<BarrelHandle>) {
        *self.barrels.write().await = barrels;
    }
}
