use super::protocol::QueryCount;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Search histogram and latency samples owned by the gateway.
///
/// Latency samples are kept in tenths of a second, the unit the statistics
/// report prints.
pub struct GatewayStats {
    search_history: DashMap<String, u64>,
    response_times: Mutex<Vec<f32>>,
}

impl GatewayStats {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            search_history: DashMap::new(),
            response_times: Mutex::new(Vec::new()),
        })
    }

    /// Increments the histogram for a raw query string. Called once per
    /// non-paginated search request.
    pub fn register_search(&self, query: &str) {
        self.search_history
            .entry(query.to_string())
            .and_modify(|count| *count += 1)
            .or_insert(1);
    }

    /// Records one search latency sample (tenths of a second), regardless of
    /// whether the request was a pagination continuation.
    pub async fn record_response_time(&self, tenths: f32) {
        self.response_times.lock().await.push(tenths);
    }

    /// Histogram sorted by occurrence count descending.
    pub fn most_searched(&self) -> Vec<QueryCount> {
        let mut queries: Vec<QueryCount> = self
            .search_history
            .iter()
            .map(|entry| QueryCount {
                query: entry.key().clone(),
                count: *entry.value(),
            })
            .collect();
        queries.sort_by(|a, b| b.count.cmp(&a.count));
        queries
    }

    /// Running average over all samples, 0 when none were recorded.
    pub async fn average_response_time(&self) -> f32 {
        let times = self.response_times.lock().await;
        if times.is_empty() {
            return 0.0;
        }
        times.iter().sum::<f32>() / times.len() as f32
    }

    /// Renders the consolidated statistics report consumed by the UI layer:
    /// top-10 searched queries, average response time and per-barrel index
    /// sizes (a size of -1 marks a barrel that failed to answer).
    pub async fn formatted_statistics(&self, index_sizes: &[i64]) -> String {
        let mut stats = String::new();
        let most_searched = self.most_searched();
        let avg_response_time = self.average_response_time().await;

        if most_searched.is_empty() {
            stats.push_str("Nenhuma pesquisa registada.\n");
        } else {
            stats.push_str("Top 10 palavras mais pesquisadas:\n");
            for (i, entry) in most_searched.iter().take(10).enumerate() {
                stats.push_str(&format!(
                    "{} - {} | Pesquisas: {}\n",
                    i + 1,
                    entry.query,
                    entry.count
                ));
            }
            stats.push_str(&format!(
                "Tempo médio de resposta: {:.2} décimas de segundo\n",
                avg_response_time
            ));
        }

        stats.push_str("\nTamanho dos índices por Barrel:\n");
        for (i, size) in index_sizes.iter().enumerate() {
            stats.push_str(&format!(
                "Barrel {}: {} palavras indexadas\n",
                i + 1,
                size
            ));
        }

        stats
    }
}
