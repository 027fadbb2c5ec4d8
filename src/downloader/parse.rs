//! Page Fetching and Extraction
//!
//! Turns raw HTML into the three things the index stores: metadata (title
//! and description), the set of indexable words, and the outgoing links
//! resolved to absolute URLs.

use anyhow::Result;
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::time::Duration;
use url::Url;

/// Words shorter than this are considered noise and never indexed.
const MIN_WORD_LEN: usize = 3;

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Placeholder when a page has no `<title>`.
pub const NO_TITLE: &str = "Sem título";
/// Placeholder when a page has no non-blank paragraph.
pub const NO_DESCRIPTION: &str = "Sem descrição";

/// Everything extracted from one fetched page.
#[derive(Debug)]
pub struct ExtractedPage {
    pub title: String,
    pub description: String,
    pub words: HashSet<String>,
    pub links: Vec<String>,
}

/// Downloads a page body. Non-2xx statuses are errors: the URL is abandoned,
/// not re-enqueued.
pub async fn fetch_page(client: &reqwest::Client, url: &str) -> Result<String> {
    let response = client.get(url).timeout(FETCH_TIMEOUT).send().await?;
    let response = response.error_for_status()?;
    Ok(response.text().await?)
}

/// Parses a page body into metadata, words and absolute outgoing links.
///
/// `base_url` is the URL the body was fetched from; relative `href` values
/// are resolved against it and unresolvable ones are skipped.
pub fn extract_page(base_url: &str, body: &str) -> ExtractedPage {
    let document = Html::parse_document(body);

    let title = select_first_text(&document, "title").unwrap_or_else(|| NO_TITLE.to_string());
    let description =
        select_first_text(&document, "p").unwrap_or_else(|| NO_DESCRIPTION.to_string());

    let text: String = document
        .root_element()
        .text()
        .collect::<Vec<_>>()
        .join(" ");
    let words = tokenize_text(&text);

    let links = extract_links(&document, base_url);

    ExtractedPage {
        title,
        description,
        words,
        links,
    }
}

/// First non-blank text content matched by a CSS selector.
fn select_first_text(document: &Html, css: &str) -> Option<String> {
    let selector = Selector::parse(css).ok()?;
    document
        .select(&selector)
        .map(|element| element.text().collect::<Vec<_>>().join(" ").trim().to_string())
        .find(|text| !text.is_empty())
}

/// Collects `a[href]` targets resolved to absolute http(s) URLs, in document
/// order. Fragment-only and unresolvable hrefs are skipped.
fn extract_links(document: &Html, base_url: &str) -> Vec<String> {
    let selector = match Selector::parse("a[href]") {
        Ok(selector) => selector,
        Err(_) => return Vec::new(),
    };
    let base = Url::parse(base_url).ok();

    let mut links = Vec::new();
    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let resolved = match Url::parse(href) {
            Ok(absolute) => Some(absolute),
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                base.as_ref().and_then(|b| b.join(href).ok())
            }
            Err(_) => None,
        };
        if let Some(resolved) = resolved {
            if resolved.scheme() == "http" || resolved.scheme() == "https" {
                links.push(resolved.to_string());
            }
        }
    }
    links
}

/// Splits visible text into lowercase alphanumeric words, dropping the ones
/// shorter than `MIN_WORD_LEN`. Duplicates collapse: the index records
/// presence, not frequency.
pub fn tokenize_text(text: &str) -> HashSet<String> {
    let word_re = match Regex::new(r"[\p{Alphabetic}\p{Nd}]+") {
        Ok(re) => re,
        Err(_) => return HashSet::new(),
    };

    word_re
        .find_iter(&text.to_lowercase())
        .map(|m| m.as_str().to_string())
        .filter(|word| word.chars().count() >= MIN_WORD_LEN)
        .collect()
}
