//! Barrel Network Protocol
//!
//! Defines the API endpoints and Data Transfer Objects (DTOs) of the barrel
//! RPC surface, consumed by the gateway (queries, probes) and by the
//! downloaders (index writes).
//!
//! These structures are serialized as JSON and sent over HTTP.

use serde::{Deserialize, Serialize};

// --- API Endpoints ---

/// Write endpoint: one word occurrence on a URL.
pub const ENDPOINT_WORD: &str = "/word";
/// Write endpoint: title/description metadata for a URL.
pub const ENDPOINT_URL_INFO: &str = "/url_info";
/// Write endpoint: one link from a source URL to a target URL.
pub const ENDPOINT_LINK: &str = "/link";
/// Query endpoint: multi-word AND search.
pub const ENDPOINT_SEARCH: &str = "/search";
/// Query endpoint: pages linking to a given URL.
pub const ENDPOINT_LINKS_TO: &str = "/links_to";
/// Query endpoint: top 10 pages ranked by backlink count.
pub const ENDPOINT_TOP10: &str = "/top10";
/// Accessor: number of indexed words. Doubles as the gateway's liveness probe.
pub const ENDPOINT_INDEX_SIZE: &str = "/index_size";
/// Accessor: backlink count for one URL.
pub const ENDPOINT_LINK_COUNT: &str = "/link_count";
/// Accessor: this barrel's identifier.
pub const ENDPOINT_BARREL_NUMBER: &str = "/barrel_number";
/// Forces the barrel to rewrite its snapshot file.
pub const ENDPOINT_FLUSH: &str = "/flush";

// --- Data Transfer Objects ---

#[derive(Debug, Serialize, Deserialize)]
pub struct ReceiveWordRequest {
    pub url: String,
    pub word: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReceiveUrlInfoRequest {
    pub url: String,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReceiveLinkRequest {
    pub source_url: String,
    pub target_url: String,
}

/// Acknowledgement for all write endpoints.
///
/// `accepted: false` is an application-level rejection: the downloader
/// retries a bounded number of times before escalating (forced snapshot and
/// global deregistration of the barrel).
#[derive(Debug, Serialize, Deserialize)]
pub struct AckResponse {
    pub accepted: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchWordsRequest {
    pub words: Vec<String>,
}

/// Search results, already formatted as
/// `"<url> | Título: <title> | Descrição: <description>"`.
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchWordsResponse {
    pub results: Vec<String>,
}

/// Query-string parameter for the URL-keyed lookups (URLs contain slashes,
/// so they travel as a query parameter rather than a path segment).
#[derive(Debug, Serialize, Deserialize)]
pub struct UrlParam {
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LinksToResponse {
    pub sources: Vec<String>,
}

/// One entry of the top-10 ranking. A list of these preserves rank order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PageLinkCount {
    pub url: String,
    pub count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Top10Response {
    pub pages: Vec<PageLinkCount>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IndexSizeResponse {
    pub size: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LinkCountResponse {
    pub count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BarrelNumberResponse {
    pub barrel_number: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FlushResponse {
    pub success: bool,
}
