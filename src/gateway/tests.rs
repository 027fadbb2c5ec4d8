//! Gateway Module Tests
//!
//! Validates the coordinator's pure merge/rank/paginate logic, the registry
//! identifier rules and the statistics report.
//!
//! *Note: the fan-out over real barrels is covered by the integration tests.*

#[cfg(test)]
mod tests {
    use crate::client::BarrelClient;
    use crate::frontier::Frontier;
    use crate::gateway::handlers::FrontierSlot;
    use crate::gateway::protocol::BarrelHandle;
    use crate::gateway::registry::BarrelRegistry;
    use crate::gateway::search::{
        self, merge_barrel_results, paginate, result_url, sort_by_link_count, PAGE_SIZE,
    };
    use crate::gateway::stats::GatewayStats;
    use std::collections::HashMap;

    fn entry(url: &str) -> String {
        format!("{} | Título: t | Descrição: d", url)
    }

    // ============================================================
    // MERGE / RANK / PAGINATE
    // ============================================================

    #[test]
    fn test_merge_seeds_empty_accumulator() {
        let merged = merge_barrel_results(Vec::new(), vec![entry("http://a"), entry("http://b")]);
        assert_eq!(merged, vec![entry("http://a"), entry("http://b")]);
    }

    #[test]
    fn test_merge_intersects_non_empty_accumulator() {
        let acc = vec![entry("http://a"), entry("http://b")];
        let merged = merge_barrel_results(acc, vec![entry("http://b"), entry("http://c")]);
        assert_eq!(merged, vec![entry("http://b")]);
    }

    #[test]
    fn test_merge_with_empty_reply_clears_then_reseeds() {
        // A lagging barrel that answers empty wipes the accumulator, and the
        // next barrel's answer reseeds it. Documented divergence-visibility
        // behavior, kept on purpose.
        let acc = vec![entry("http://a")];
        let merged = merge_barrel_results(acc, Vec::new());
        assert!(merged.is_empty());
        let reseeded = merge_barrel_results(merged, vec![entry("http://c")]);
        assert_eq!(reseeded, vec![entry("http://c")]);
    }

    #[test]
    fn test_result_url_takes_first_segment() {
        assert_eq!(result_url(&entry("http://a")), "http://a");
        assert_eq!(result_url("bare-url-no-separator"), "bare-url-no-separator");
    }

    #[test]
    fn test_sort_is_descending_and_stable() {
        let mut results = vec![entry("http://a"), entry("http://b"), entry("http://c")];
        let mut counts = HashMap::new();
        counts.insert("http://a".to_string(), 1);
        counts.insert("http://b".to_string(), 5);
        // http://c missing: counts as 0.
        sort_by_link_count(&mut results, &counts);
        assert_eq!(
            results,
            vec![entry("http://b"), entry("http://a"), entry("http://c")]
        );

        // Equal counts keep their input order.
        let mut tied = vec![entry("http://x"), entry("http://y")];
        sort_by_link_count(&mut tied, &HashMap::new());
        assert_eq!(tied, vec![entry("http://x"), entry("http://y")]);
    }

    #[test]
    fn test_pagination_slices_are_disjoint_and_cover_everything() {
        let results: Vec<String> = (0..15).map(|i| entry(&format!("http://{}", i))).collect();

        let page1 = paginate(&results, 1);
        let page2 = paginate(&results, 2);
        assert_eq!(page1.len(), PAGE_SIZE);
        assert_eq!(page2.len(), 5);
        assert!(page1.iter().all(|e| !page2.contains(e)));

        let mut joined = page1.clone();
        joined.extend(page2.clone());
        assert_eq!(joined, results);

        assert!(paginate(&results, 3).is_empty());
    }

    #[test]
    fn test_pagination_treats_page_zero_as_first() {
        let results: Vec<String> = (0..3).map(|i| entry(&format!("http://{}", i))).collect();
        assert_eq!(paginate(&results, 0), paginate(&results, 1));
    }

    // ============================================================
    // REGISTRY
    // ============================================================

    #[tokio::test]
    async fn test_barrel_numbers_are_monotonic_and_never_reused() {
        let registry = BarrelRegistry::new();
        let first = registry.next_barrel_number();
        let second = registry.next_barrel_number();
        assert_eq!(first, 1);
        assert_eq!(second, 2);

        registry
            .register(BarrelHandle {
                barrel_number: second,
                base_url: "http://127.0.0.1:9000".to_string(),
            })
            .await;
        assert!(registry.remove(second).await);

        // Removal must not give the identifier back.
        assert_eq!(registry.next_barrel_number(), 3);
    }

    #[tokio::test]
    async fn test_re_registration_replaces_stale_address() {
        let registry = BarrelRegistry::new();
        let number = registry.next_barrel_number();
        registry
            .register(BarrelHandle {
                barrel_number: number,
                base_url: "http://127.0.0.1:9000".to_string(),
            })
            .await;
        registry
            .register(BarrelHandle {
                barrel_number: number,
                base_url: "http://127.0.0.1:9001".to_string(),
            })
            .await;

        let barrels = registry.all().await;
        assert_eq!(barrels.len(), 1);
        assert_eq!(barrels[0].base_url, "http://127.0.0.1:9001");
    }

    #[tokio::test]
    async fn test_removing_unknown_barrel_reports_false() {
        let registry = BarrelRegistry::new();
        assert!(!registry.remove(42).await);
    }

    // ============================================================
    // STATISTICS
    // ============================================================

    #[tokio::test]
    async fn test_histogram_counts_and_orders_queries() {
        let stats = GatewayStats::new();
        stats.register_search("cat");
        stats.register_search("dog");
        stats.register_search("cat");

        let most = stats.most_searched();
        assert_eq!(most[0].query, "cat");
        assert_eq!(most[0].count, 2);
        assert_eq!(most[1].query, "dog");
        assert_eq!(most[1].count, 1);
    }

    #[tokio::test]
    async fn test_average_response_time_is_zero_without_samples() {
        let stats = GatewayStats::new();
        assert_eq!(stats.average_response_time().await, 0.0);

        stats.record_response_time(2.0).await;
        stats.record_response_time(4.0).await;
        assert_eq!(stats.average_response_time().await, 3.0);
    }

    #[tokio::test]
    async fn test_statistics_report_without_searches() {
        let stats = GatewayStats::new();
        let report = stats.formatted_statistics(&[3, -1]).await;
        assert!(report.starts_with("Nenhuma pesquisa registada.\n"));
        assert!(report.contains("Barrel 1: 3 palavras indexadas"));
        assert!(report.contains("Barrel 2: -1 palavras indexadas"));
    }

    #[tokio::test]
    async fn test_statistics_report_with_searches() {
        let stats = GatewayStats::new();
        stats.register_search("cat dog");
        stats.record_response_time(1.5).await;

        let report = stats.formatted_statistics(&[7]).await;
        assert!(report.contains("Top 10 palavras mais pesquisadas:"));
        assert!(report.contains("1 - cat dog | Pesquisas: 1"));
        assert!(report.contains("Tempo médio de resposta: 1.50 décimas de segundo"));
        assert!(report.contains("Barrel 1: 7 palavras indexadas"));
    }

    #[tokio::test]
    async fn test_search_with_empty_registry_records_stats() {
        let registry = BarrelRegistry::new();
        let stats = GatewayStats::new();
        let client = BarrelClient::new();

        let results = search::search(&registry, &stats, &client, "cat", 1, false).await;
        assert!(results.is_empty());
        assert_eq!(stats.most_searched()[0].query, "cat");

        // A pagination continuation must not bump the histogram again.
        search::search(&registry, &stats, &client, "cat", 2, true).await;
        assert_eq!(stats.most_searched()[0].count, 1);

        // Both calls recorded a latency sample.
        assert!(stats.average_response_time().await >= 0.0);
    }

    #[tokio::test]
    async fn test_frontier_slot_is_empty_until_wired() {
        let slot = FrontierSlot::empty();
        assert!(slot.get().await.is_none());

        slot.init(Frontier::new()).await;
        assert!(slot.get().await.is_some());
    }
}
