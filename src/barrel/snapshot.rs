//! Barrel Snapshot Persistence
//!
//! Serializes the three barrel maps to a newline-delimited text file and
//! restores them at startup. The file is rewritten wholesale on every flush.
//!
//! ## File format
//! ```text
//! word|<word>; <url1>, <url2>, ...
//! info|<url>|<title>| <description>
//! connections|<targetUrl>; <sourceUrl1>, <sourceUrl2>, ...
//! ```
//! An absent file means the barrel starts with empty state; that is not an
//! error.

use super::store::{BarrelStore, PageInfo};
use anyhow::Result;
use std::collections::HashSet;

impl BarrelStore {
    /// Rewrites the snapshot file from the current state.
    ///
    /// Each map is serialized under its read lock, so the file holds a
    /// consistent point-in-time copy of each map. Invoked on graceful
    /// shutdown and remotely when a downloader escalates a failing barrel.
    pub async fn write_snapshot(&self) -> Result<()> {
        let mut out = String::new();

        {
            let index = self.index.read().await;
            for (word, urls) in index.iter() {
                out.push_str(&format!("word|{}; {}\n", word, join_set(urls)));
            }
        }

        {
            let infos = self.url_infos.read().await;
            for (url, info) in infos.iter() {
                out.push_str(&format!("info|{}|{}| {}\n", url, info.title, info.description));
            }
        }

        {
            let links = self.reverse_links.read().await;
            for (target, sources) in links.iter() {
                out.push_str(&format!("connections|{}; {}\n", target, join_set(sources)));
            }
        }

        let path = self.snapshot_path();
        tokio::fs::write(&path, out).await?;
        tracing::info!("Barrel {} snapshot written to {:?}", self.barrel_number, path);

        Ok(())
    }

    /// Loads the snapshot file into the store, replacing prior entries for
    /// the keys it contains. Missing file is not an error.
    pub async fn load_snapshot(&self) -> Result<()> {
        let path = self.snapshot_path();

        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(
                    "Snapshot {:?} not found, barrel {} starting empty",
                    path,
                    self.barrel_number
                );
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        for line in content.lines() {
            if let Some(rest) = line.strip_prefix("word|") {
                if let Some((word, urls)) = parse_key_and_set(rest) {
                    self.index.write().await.insert(word, urls);
                }
            } else if let Some(rest) = line.strip_prefix("info|") {
                if let Some((url, info)) = parse_info(rest) {
                    self.url_infos.write().await.insert(url, info);
                }
            } else if let Some(rest) = line.strip_prefix("connections|") {
                if let Some((target, sources)) = parse_key_and_set(rest) {
                    self.reverse_links.write().await.insert(target, sources);
                }
            }
        }

        tracing::info!(
            "Loaded snapshot {:?}: {} words, {} URLs, {} connections",
            path,
            self.index.read().await.len(),
            self.url_infos.read().await.len(),
            self.reverse_links.read().await.len()
        );

        Ok(())
    }
}

fn join_set(set: &HashSet<String>) -> String {
    set.iter().cloned().collect::<Vec<_>>().join(", ")
}

/// Parses `<key>; <v1>, <v2>, ...` into a key and a set. Malformed lines
/// yield `None` and are skipped by the loader.
fn parse_key_and_set(rest: &str) -> Option<(String, HashSet<String>)> {
    let (key, values) = rest.split_once(';')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }

    let set: HashSet<String> = values
        .split(',')
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .collect();

    if set.is_empty() {
        return None;
    }
    Some((key.to_string(), set))
}

/// Parses `<url>|<title>| <description>`.
fn parse_info(rest: &str) -> Option<(String, PageInfo)> {
    let mut parts = rest.splitn(3, '|');
    let url = parts.next()?.trim();
    let title = parts.next()?.trim();
    let description = parts.next()?.trim();
    if url.is_empty() {
        return None;
    }

    Some((
        url.to_string(),
        PageInfo {
            title: title.to_string(),
            description: description.to_string(),
        },
    ))
}
