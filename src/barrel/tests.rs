//! Barrel Module Tests
//!
//! Validates the replica's index semantics and snapshot persistence.
//!
//! ## Test Scopes
//! - **Index**: word insertion, case folding, AND search, short-circuit.
//! - **Backlinks**: idempotence, counts, top-10 ranking bounds.
//! - **Snapshot**: round-trip equality through the flat-file format.

#[cfg(test)]
mod tests {
    use crate::barrel::store::BarrelStore;
    use std::path::PathBuf;

    fn store() -> std::sync::Arc<BarrelStore> {
        BarrelStore::new(1, PathBuf::from("."))
    }

    // ============================================================
    // WORD INDEX & SEARCH
    // ============================================================

    #[tokio::test]
    async fn test_single_word_roundtrip() {
        let store = store();

        store.receive_word("http://a.test/", "gato").await;
        store
            .receive_url_info("http://a.test/", "Página A", "Primeiro parágrafo")
            .await;

        let results = store
            .search_multiple_words(&["gato".to_string()])
            .await;

        assert_eq!(results.len(), 1);
        assert_eq!(
            results[0],
            "http://a.test/ | Título: Página A | Descrição: Primeiro parágrafo"
        );
    }

    #[tokio::test]
    async fn test_search_is_case_folded() {
        let store = store();

        store.receive_word("http://a.test/", "GaTo").await;
        store.receive_url_info("http://a.test/", "A", "d").await;

        let results = store.search_multiple_words(&["GATO".to_string()]).await;
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn test_multi_word_intersection() {
        let store = store();

        store.receive_word("http://a.test/", "cat").await;
        store.receive_word("http://a.test/", "dog").await;
        store.receive_word("http://b.test/", "cat").await;
        store.receive_url_info("http://a.test/", "A", "da").await;
        store.receive_url_info("http://b.test/", "B", "db").await;

        // "cat" alone hits both pages.
        let cat = store.search_multiple_words(&["cat".to_string()]).await;
        assert_eq!(cat.len(), 2);

        // "cat dog" only hits the page with both.
        let both = store
            .search_multiple_words(&["cat".to_string(), "dog".to_string()])
            .await;
        assert_eq!(both.len(), 1);
        assert!(both[0].starts_with("http://a.test/"));
    }

    #[tokio::test]
    async fn test_unindexed_word_short_circuits() {
        let store = store();

        store.receive_word("http://a.test/", "cat").await;
        store.receive_url_info("http://a.test/", "A", "d").await;

        let results = store
            .search_multiple_words(&["cat".to_string(), "zebra".to_string()])
            .await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_url_without_page_record_is_dropped() {
        let store = store();

        // Word indexed but no url_info ever received for it.
        store.receive_word("http://orphan.test/", "cat").await;

        let results = store.search_multiple_words(&["cat".to_string()]).await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_receive_word_is_idempotent() {
        let store = store();

        store.receive_word("http://a.test/", "cat").await;
        store.receive_word("http://a.test/", "cat").await;
        store.receive_word("http://a.test/", "CAT").await;

        assert_eq!(store.index_size().await, 1);
    }

    #[tokio::test]
    async fn test_url_info_overwrites() {
        let store = store();

        store.receive_word("http://a.test/", "cat").await;
        store.receive_url_info("http://a.test/", "Old", "old").await;
        store.receive_url_info("http://a.test/", "New", "new").await;

        let results = store.search_multiple_words(&["cat".to_string()]).await;
        assert_eq!(
            results[0],
            "http://a.test/ | Título: New | Descrição: new"
        );
    }

    // ============================================================
    // BACKLINKS
    // ============================================================

    #[tokio::test]
    async fn test_receive_link_is_idempotent() {
        let store = store();

        store.receive_link("http://a.test/", "http://b.test/").await;
        store.receive_link("http://a.test/", "http://b.test/").await;

        assert_eq!(store.link_count("http://b.test/").await, 1);
        assert_eq!(
            store.pages_linking_to("http://b.test/").await,
            vec!["http://a.test/".to_string()]
        );
    }

    #[tokio::test]
    async fn test_link_count_unknown_url_is_zero() {
        let store = store();
        assert_eq!(store.link_count("http://nowhere.test/").await, 0);
        assert!(store.pages_linking_to("http://nowhere.test/").await.is_empty());
    }

    #[tokio::test]
    async fn test_top10_bounded_and_sorted() {
        let store = store();

        // 12 targets, target i gets i backlinks.
        for target in 1..=12 {
            for source in 0..target {
                store
                    .receive_link(
                        &format!("http://source-{}.test/", source),
                        &format!("http://target-{}.test/", target),
                    )
                    .await;
            }
        }

        let top = store.top10_pages_by_links().await;

        assert_eq!(top.len(), 10);
        assert_eq!(top[0].url, "http://target-12.test/");
        assert_eq!(top[0].count, 12);
        for window in top.windows(2) {
            assert!(window[0].count >= window[1].count, "not sorted descending");
        }
    }

    // ============================================================
    // SNAPSHOT
    // ============================================================

    #[tokio::test]
    async fn test_snapshot_roundtrip() {
        let dir = tempfile::tempdir().unwrap();

        let original = BarrelStore::new(7, dir.path().to_path_buf());
        original.receive_word("http://a.test/", "cat").await;
        original.receive_word("http://a.test/", "dog").await;
        original.receive_word("http://b.test/", "cat").await;
        original
            .receive_url_info("http://a.test/", "Página A", "Primeiro parágrafo")
            .await;
        original
            .receive_url_info("http://b.test/", "Sem título", "Sem descrição")
            .await;
        original.receive_link("http://a.test/", "http://b.test/").await;
        original.receive_link("http://c.test/", "http://b.test/").await;

        original.write_snapshot().await.unwrap();

        let restored = BarrelStore::new(7, dir.path().to_path_buf());
        restored.load_snapshot().await.unwrap();

        assert_eq!(restored.index_size().await, 2);
        assert_eq!(restored.link_count("http://b.test/").await, 2);

        let mut cat = restored.search_multiple_words(&["cat".to_string()]).await;
        cat.sort();
        assert_eq!(cat.len(), 2);
        assert_eq!(
            cat[0],
            "http://a.test/ | Título: Página A | Descrição: Primeiro parágrafo"
        );
        assert_eq!(
            cat[1],
            "http://b.test/ | Título: Sem título | Descrição: Sem descrição"
        );

        let mut sources = restored.pages_linking_to("http://b.test/").await;
        sources.sort();
        assert_eq!(sources, vec!["http://a.test/", "http://c.test/"]);
    }

    #[tokio::test]
    async fn test_missing_snapshot_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = BarrelStore::new(42, dir.path().to_path_buf());

        store.load_snapshot().await.unwrap();

        assert_eq!(store.index_size().await, 0);
    }
}
