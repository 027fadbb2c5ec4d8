//! Downloader Module Tests
//!
//! Validates tokenization, DOM extraction and link absolutization, plus the
//! crawl-to-index path through a local store (no network in between).
//!
//! *Note: the fan-out and escalation policies run against real servers in the
//! integration tests.*

#[cfg(test)]
mod tests {
    use crate::barrel::store::BarrelStore;
    use crate::downloader::parse::{extract_page, tokenize_text, NO_DESCRIPTION, NO_TITLE};
    use std::path::PathBuf;

    // ============================================================
    // TOKENIZATION
    // ============================================================

    #[test]
    fn test_tokenize_lowercases_and_deduplicates() {
        let words = tokenize_text("Cat dog CAT Dog cat");
        assert_eq!(words.len(), 2);
        assert!(words.contains("cat"));
        assert!(words.contains("dog"));
    }

    #[test]
    fn test_tokenize_drops_short_words() {
        let words = tokenize_text("an ox is on a mat");
        assert!(!words.contains("an"));
        assert!(!words.contains("ox"));
        assert!(!words.contains("is"));
        assert!(words.contains("mat"));
    }

    #[test]
    fn test_tokenize_splits_on_punctuation() {
        let words = tokenize_text("hello,world! foo-bar (baz)");
        assert!(words.contains("hello"));
        assert!(words.contains("world"));
        assert!(words.contains("foo"));
        assert!(words.contains("bar"));
        assert!(words.contains("baz"));
    }

    #[test]
    fn test_tokenize_keeps_accented_words() {
        let words = tokenize_text("Descrição título");
        assert!(words.contains("descrição"));
        assert!(words.contains("título"));
    }

    // ============================================================
    // EXTRACTION
    // ============================================================

    #[test]
    fn test_extract_reads_title_and_first_paragraph() {
        let html = "<html><head><title>Cats</title></head>\
                    <body><p>   </p><p>All about cats.</p><p>More.</p></body></html>";
        let page = extract_page("http://example.test/a", html);
        assert_eq!(page.title, "Cats");
        assert_eq!(page.description, "All about cats.");
    }

    #[test]
    fn test_extract_uses_placeholders_when_metadata_missing() {
        let page = extract_page(
            "http://example.test/a",
            "<html><body>bare text</body></html>",
        );
        assert_eq!(page.title, NO_TITLE);
        assert_eq!(page.description, NO_DESCRIPTION);
    }

    #[test]
    fn test_extract_resolves_relative_links_against_page_url() {
        let html = r#"<html><body>
            <a href="/b">rel</a>
            <a href="c.html">doc rel</a>
            <a href="http://other.test/d">abs</a>
            <a href="mailto:someone@example.test">mail</a>
        </body></html>"#;
        let page = extract_page("http://example.test/dir/a.html", html);
        assert_eq!(
            page.links,
            vec![
                "http://example.test/b".to_string(),
                "http://example.test/dir/c.html".to_string(),
                "http://other.test/d".to_string(),
            ]
        );
    }

    #[test]
    fn test_extract_collects_words_from_whole_document() {
        let html = "<html><head><title>Cats</title></head>\
                    <body><p>cat dog cat</p><a href=\"http://example.test/b\">link</a></body></html>";
        let page = extract_page("http://example.test/a", html);
        assert!(page.words.contains("cat"));
        assert!(page.words.contains("dog"));
        assert!(page.words.contains("cats"));
    }

    // ============================================================
    // CRAWL → INDEX
    // ============================================================

    // End-to-end extraction applied to a store: a page containing
    // "cat dog cat" and one link must index both words under the page URL
    // and record the backlink on the target.
    #[tokio::test]
    async fn test_extracted_page_populates_store() {
        let html = "<html><head><title>A</title></head>\
                    <body><p>cat dog cat</p><a href=\"http://example.test/b\">b</a></body></html>";
        let url = "http://example.test/a";
        let page = extract_page(url, html);

        let store = BarrelStore::new(1, PathBuf::from("/tmp"));
        store
            .receive_url_info(url, &page.title, &page.description)
            .await;
        for word in &page.words {
            store.receive_word(url, word).await;
        }
        for link in &page.links {
            store.receive_link(url, link).await;
        }

        let cat = store.search_multiple_words(&["cat".to_string()]).await;
        assert_eq!(cat.len(), 1);
        assert!(cat[0].starts_with(url));

        let both = store
            .search_multiple_words(&["cat".to_string(), "dog".to_string()])
            .await;
        assert_eq!(both.len(), 1);

        assert_eq!(
            store.pages_linking_to("http://example.test/b").await,
            vec![url.to_string()]
        );
        assert_eq!(store.link_count("http://example.test/b").await, 1);
    }
}
