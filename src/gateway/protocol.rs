//! Gateway Network Protocol
//!
//! Defines the API endpoints and DTOs of the coordinator RPC surface,
//! consumed by the downloaders and by external collaborators (web UI,
//! terminal client, content integrations; all out of scope here, they only
//! call these endpoints).

use serde::{Deserialize, Serialize};

// --- API Endpoints ---

/// Enqueues a URL into the frontier.
pub const ENDPOINT_PUT_NEW: &str = "/put_new";
/// Long-poll: blocks until a frontier URL is available.
pub const ENDPOINT_NEXT_URL: &str = "/next_url";
/// Fan-out search across all registered barrels.
pub const ENDPOINT_SEARCH: &str = "/search";
/// Union of backlink sets across barrels.
pub const ENDPOINT_LINKS_TO: &str = "/links_to";
/// Aggregated top 10 pages by backlink count.
pub const ENDPOINT_TOP10: &str = "/top10";
/// Search histogram, sorted by count descending.
pub const ENDPOINT_MOST_SEARCHED: &str = "/most_searched";
/// Per-barrel index sizes (-1 for barrels that fail to answer).
pub const ENDPOINT_INDEX_SIZES: &str = "/index_sizes";
/// Running average of search latencies.
pub const ENDPOINT_AVG_RESPONSE_TIME: &str = "/avg_response_time";
/// Human-readable statistics report.
pub const ENDPOINT_STATS: &str = "/stats";
/// Barrel registration (the barrel minted its id beforehand).
pub const ENDPOINT_REGISTER_BARREL: &str = "/register_barrel";
/// Global barrel removal by identifier.
pub const ENDPOINT_REMOVE_BARREL: &str = "/remove_barrel";
/// Probing liveness sweep; returns the surviving live set.
pub const ENDPOINT_BARRELS: &str = "/barrels";
/// Mints the next barrel identifier (monotonic, never reused).
pub const ENDPOINT_NEXT_BARREL_NUMBER: &str = "/next_barrel_number";
/// Mints the next downloader identifier.
pub const ENDPOINT_REGISTER_DOWNLOADER: &str = "/register_downloader";

// --- Data Transfer Objects ---

/// Addressing record for one registered barrel.
///
/// The identifier is minted by the gateway before registration and survives
/// removal: a removed barrel's number is never reassigned.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BarrelHandle {
    pub barrel_number: u32,
    /// Base URL of the barrel's HTTP surface, e.g. `http://127.0.0.1:7101`.
    pub base_url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PutNewRequest {
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NextUrlResponse {
    pub url: String,
}

/// Query parameters of the search endpoint. `page` is 1-indexed; a
/// pagination continuation does not re-register the query in the histogram.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: String,
    pub page: Option<usize>,
    pub pagination: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QueryCount {
    pub query: String,
    pub count: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MostSearchedResponse {
    pub queries: Vec<QueryCount>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IndexSizesResponse {
    pub sizes: Vec<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AverageResponseTimeResponse {
    pub average: f32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterBarrelResponse {
    pub success: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RemoveBarrelRequest {
    pub barrel_number: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RemoveBarrelResponse {
    pub success: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BarrelsResponse {
    pub barrels: Vec<BarrelHandle>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NextBarrelNumberResponse {
    pub barrel_number: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterDownloaderResponse {
    pub downloader_number: u32,
}
