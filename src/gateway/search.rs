//! Fan-out Query Logic
//!
//! Implements the gateway-side merge semantics over the barrel replies:
//! intersection for search, union for backlinks, sum for counts. Fan-out is
//! best-effort: each barrel call may fail independently and a failure never
//! aborts the batch.

use super::protocol::BarrelHandle;
use super::registry::BarrelRegistry;
use super::stats::GatewayStats;
use crate::barrel::protocol::PageLinkCount;
use crate::client::BarrelClient;
use std::collections::{HashMap, HashSet};
use std::time::Instant;

pub const PAGE_SIZE: usize = 10;

/// Full search pipeline: histogram, fan-out, merge, rank, paginate, latency.
pub async fn search(
    registry: &BarrelRegistry,
    stats: &GatewayStats,
    client: &BarrelClient,
    query: &str,
    page: usize,
    is_pagination: bool,
) -> Vec<String> {
    let started = Instant::now();

    if !is_pagination {
        stats.register_search(query);
    }

    let words: Vec<String> = query.split_whitespace().map(|w| w.to_string()).collect();
    let barrels = registry.all().await;

    let mut results: Vec<String> = Vec::new();
    for barrel in &barrels {
        match client.search_multiple_words(barrel, &words).await {
            Ok(barrel_results) => {
                results = merge_barrel_results(results, barrel_results);
            }
            Err(e) => {
                tracing::warn!(
                    "Search fan-out to barrel {} failed: {}",
                    barrel.barrel_number,
                    e
                );
            }
        }
    }

    // Rank by aggregate backlink count (summed across barrels) descending.
    let mut counts: HashMap<String, usize> = HashMap::new();
    for entry in &results {
        let url = result_url(entry).to_string();
        if !counts.contains_key(&url) {
            let count = aggregate_link_count(client, &barrels, &url).await;
            counts.insert(url, count);
        }
    }
    sort_by_link_count(&mut results, &counts);

    let page_results = paginate(&results, page);

    // Tenths of a second, the unit the statistics report prints.
    let tenths = started.elapsed().as_nanos() as f32 / 100_000_000.0;
    stats.record_response_time(tenths).await;

    page_results
}

/// Replica merge fold. An empty accumulator is seeded by the next barrel's
/// results; a non-empty one keeps only the entries the next barrel also
/// returned. With fully replicated barrels the steady-state outcome equals
/// any single barrel's answer; a lagging barrel visibly shrinks it.
pub fn merge_barrel_results(acc: Vec<String>, barrel_results: Vec<String>) -> Vec<String> {
    if acc.is_empty() {
        return barrel_results;
    }
    let incoming: HashSet<&String> = barrel_results.iter().collect();
    acc.into_iter()
        .filter(|entry| incoming.contains(entry))
        .collect()
}

/// Extracts the URL component from a formatted result entry.
pub fn result_url(entry: &str) -> &str {
    entry.split(" | ").next().unwrap_or(entry)
}

/// Stable descending sort by the pre-computed backlink counts.
pub fn sort_by_link_count(results: &mut [String], counts: &HashMap<String, usize>) {
    results.sort_by(|a, b| {
        let count_a = counts.get(result_url(a)).copied().unwrap_or(0);
        let count_b = counts.get(result_url(b)).copied().unwrap_or(0);
        count_b.cmp(&count_a)
    });
}

/// Slices one 1-indexed page of `PAGE_SIZE` entries out of the sorted list.
pub fn paginate(results: &[String], page: usize) -> Vec<String> {
    let page = page.max(1);
    let start = (page - 1) * PAGE_SIZE;
    if start >= results.len() {
        return Vec::new();
    }
    let end = (start + PAGE_SIZE).min(results.len());
    results[start..end].to_vec()
}

/// Sums a URL's backlink count across all barrels; a barrel that fails to
/// answer contributes 0.
pub async fn aggregate_link_count(
    client: &BarrelClient,
    barrels: &[BarrelHandle],
    url: &str,
) -> usize {
    let mut total = 0;
    for barrel in barrels {
        match client.link_count(barrel, url).await {
            Ok(count) => total += count,
            Err(e) => {
                tracing::warn!(
                    "link_count from barrel {} failed: {}",
                    barrel.barrel_number,
                    e
                );
            }
        }
    }
    total
}

/// Union of backlink sets across all barrels, de-duplicated.
pub async fn pages_linking_to(
    registry: &BarrelRegistry,
    client: &BarrelClient,
    url: &str,
) -> Vec<String> {
    let barrels = registry.all().await;
    let mut sources = HashSet::new();

    for barrel in &barrels {
        match client.pages_linking_to(barrel, url).await {
            Ok(barrel_sources) => sources.extend(barrel_sources),
            Err(e) => {
                tracing::warn!(
                    "links_to from barrel {} failed: {}",
                    barrel.barrel_number,
                    e
                );
            }
        }
    }

    sources.into_iter().collect()
}

/// Sums the per-barrel top-10 counts per URL, re-ranks and returns the
/// aggregate top 10.
pub async fn top10_pages_by_links(
    registry: &BarrelRegistry,
    client: &BarrelClient,
) -> Vec<PageLinkCount> {
    let barrels = registry.all().await;
    let mut combined: HashMap<String, usize> = HashMap::new();

    for barrel in &barrels {
        match client.top10_pages_by_links(barrel).await {
            Ok(pages) => {
                for page in pages {
                    *combined.entry(page.url).or_insert(0) += page.count;
                }
            }
            Err(e) => {
                tracing::warn!("top10 from barrel {} failed: {}", barrel.barrel_number, e);
            }
        }
    }

    let mut ranked: Vec<PageLinkCount> = combined
        .into_iter()
        .map(|(url, count)| PageLinkCount { url, count })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(10);
    ranked
}

/// Per-barrel index sizes in registry order; a barrel that errors contributes
/// the sentinel -1 instead of being dropped (unlike the liveness sweep).
pub async fn barrels_index_sizes(
    registry: &BarrelRegistry,
    client: &BarrelClient,
) -> Vec<i64> {
    let barrels = registry.all().await;
    let mut sizes = Vec::with_capacity(barrels.len());

    for barrel in &barrels {
        match client.index_size(barrel).await {
            Ok(size) => sizes.push(size as i64),
            Err(e) => {
                tracing::warn!(
                    "index_size from barrel {} failed: {}",
                    barrel.barrel_number,
                    e
                );
                sizes.push(-1);
            }
        }
    }

    sizes
}
