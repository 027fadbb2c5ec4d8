use super::protocol::PageLinkCount;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Title and description recorded for a crawled URL.
#[derive(Debug, Clone, PartialEq)]
pub struct PageInfo {
    pub title: String,
    pub description: String,
}

/// In-memory state of one storage barrel.
///
/// Each of the three maps is guarded by its own lock: mutations take the
/// write lock, queries and snapshot serialization take the read lock, so a
/// snapshot always sees a consistent point-in-time copy of each map.
pub struct BarrelStore {
    pub barrel_number: u32,
    data_dir: PathBuf,
    /// Word → set of URLs where it occurs. Words are stored case-folded.
    pub(super) index: RwLock<HashMap<String, HashSet<String>>>,
    /// URL → title/description, one record per URL, overwritten on upsert.
    pub(super) url_infos: RwLock<HashMap<String, PageInfo>>,
    /// Target URL → set of distinct source URLs linking to it.
    pub(super) reverse_links: RwLock<HashMap<String, HashSet<String>>>,
}

impl BarrelStore {
    pub fn new(barrel_number: u32, data_dir: PathBuf) -> Arc<Self> {
        Arc::new(Self {
            barrel_number,
            data_dir,
            index: RwLock::new(HashMap::new()),
            url_infos: RwLock::new(HashMap::new()),
            reverse_links: RwLock::new(HashMap::new()),
        })
    }

    /// Path of this barrel's snapshot file, e.g. `<data_dir>/barrel3.txt`.
    pub fn snapshot_path(&self) -> PathBuf {
        self.data_dir
            .join(format!("barrel{}.txt", self.barrel_number))
    }

    /// Inserts a URL into a word's set. Case-folds the word; set semantics
    /// make the operation idempotent.
    pub async fn receive_word(&self, url: &str, word: &str) -> bool {
        let word = word.to_lowercase();
        let mut index = self.index.write().await;
        index.entry(word).or_default().insert(url.to_string());
        true
    }

    /// Upserts the page record for a URL, overwriting any prior value.
    pub async fn receive_url_info(&self, url: &str, title: &str, description: &str) -> bool {
        let mut infos = self.url_infos.write().await;
        infos.insert(
            url.to_string(),
            PageInfo {
                title: title.to_string(),
                description: description.to_string(),
            },
        );
        true
    }

    /// Inserts a source into a target's backlink set. Idempotent.
    pub async fn receive_link(&self, source_url: &str, target_url: &str) -> bool {
        let mut links = self.reverse_links.write().await;
        links
            .entry(target_url.to_string())
            .or_default()
            .insert(source_url.to_string());
        true
    }

    /// Multi-word AND search.
    ///
    /// Case-folds each word and intersects the per-word URL sets; returns
    /// empty immediately if any word is unindexed. Results are formatted
    /// strings built from the page records; URLs lacking a record are
    /// silently dropped.
    pub async fn search_multiple_words(&self, words: &[String]) -> Vec<String> {
        if words.is_empty() {
            return Vec::new();
        }

        let index = self.index.read().await;
        let mut result: Option<HashSet<String>> = None;

        for word in words {
            let word = word.to_lowercase();
            let Some(urls_for_word) = index.get(&word) else {
                return Vec::new();
            };

            match result {
                None => result = Some(urls_for_word.clone()),
                Some(ref mut urls) => urls.retain(|url| urls_for_word.contains(url)),
            }
        }
        drop(index);

        let infos = self.url_infos.read().await;
        let mut formatted = Vec::new();
        if let Some(urls) = result {
            for url in urls {
                if let Some(info) = infos.get(&url) {
                    formatted.push(format!(
                        "{} | Título: {} | Descrição: {}",
                        url, info.title, info.description
                    ));
                }
            }
        }

        formatted
    }

    /// Returns the backlink set for a URL, or empty if none.
    pub async fn pages_linking_to(&self, url: &str) -> Vec<String> {
        let links = self.reverse_links.read().await;
        links
            .get(url)
            .map(|sources| sources.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Ranks all backlink targets by backlink-set size descending and returns
    /// the top 10 in rank order. Ties keep the stable sort input order.
    pub async fn top10_pages_by_links(&self) -> Vec<PageLinkCount> {
        let links = self.reverse_links.read().await;
        let mut counts: Vec<PageLinkCount> = links
            .iter()
            .map(|(url, sources)| PageLinkCount {
                url: url.clone(),
                count: sources.len(),
            })
            .collect();
        counts.sort_by(|a, b| b.count.cmp(&a.count));
        counts.truncate(10);
        counts
    }

    /// Number of distinct indexed words.
    pub async fn index_size(&self) -> usize {
        self.index.read().await.len()
    }

    /// Backlink count for one URL, 0 if unknown.
    pub async fn link_count(&self, url: &str) -> usize {
        let links = self.reverse_links.read().await;
        links.get(url).map(|sources| sources.len()).unwrap_or(0)
    }
}
