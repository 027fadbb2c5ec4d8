//! Gateway HTTP Handlers
//!
//! Maps the coordinator RPC surface onto axum handlers. Query-style
//! operations degrade to empty results when barrels fail; the only explicit
//! failure surfaced to callers is the frontier not being wired in yet.

use super::protocol::*;
use super::registry::BarrelRegistry;
use super::search;
use super::stats::GatewayStats;
use crate::client::BarrelClient;
use crate::frontier::Frontier;
use axum::extract::{Extension, Query};
use axum::http::StatusCode;
use axum::Json;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Holder for the frontier wired into the gateway at startup.
///
/// `put_new` and `next_url` answer 503 until `init` has run: a gateway whose
/// queue is not wired in refuses frontier traffic instead of dropping it.
pub struct FrontierSlot {
    frontier: RwLock<Option<Arc<Frontier>>>,
}

impl FrontierSlot {
    pub fn empty() -> Arc<Self> {
        Arc::new(Self {
            frontier: RwLock::new(None),
        })
    }

    pub async fn init(&self, frontier: Arc<Frontier>) {
        *self.frontier.write().await = Some(frontier);
    }

    pub async fn get(&self) -> Option<Arc<Frontier>> {
        self.frontier.read().await.clone()
    }
}

pub async fn handle_put_new(
    Extension(slot): Extension<Arc<FrontierSlot>>,
    Json(req): Json<PutNewRequest>,
) -> StatusCode {
    match slot.get().await {
        Some(frontier) => {
            frontier.enqueue(req.url).await;
            StatusCode::OK
        }
        None => {
            tracing::error!("put_new rejected: frontier is not initialized");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

/// Long-poll: holds the request open until a frontier URL is available.
pub async fn handle_next_url(
    Extension(slot): Extension<Arc<FrontierSlot>>,
) -> Result<Json<NextUrlResponse>, StatusCode> {
    let frontier = slot.get().await.ok_or_else(|| {
        tracing::error!("next_url rejected: frontier is not initialized");
        StatusCode::SERVICE_UNAVAILABLE
    })?;

    let url = frontier.dequeue().await;
    Ok(Json(NextUrlResponse { url }))
}

pub async fn handle_search(
    Extension(registry): Extension<Arc<BarrelRegistry>>,
    Extension(stats): Extension<Arc<GatewayStats>>,
    Extension(client): Extension<Arc<BarrelClient>>,
    Query(params): Query<SearchParams>,
) -> Json<SearchResponse> {
    let page = params.page.unwrap_or(1);
    let is_pagination = params.pagination.unwrap_or(false);

    let results = search::search(&registry, &stats, &client, &params.q, page, is_pagination).await;

    Json(SearchResponse { results })
}

pub async fn handle_links_to(
    Extension(registry): Extension<Arc<BarrelRegistry>>,
    Extension(client): Extension<Arc<BarrelClient>>,
    Query(params): Query<crate::barrel::protocol::UrlParam>,
) -> Json<crate::barrel::protocol::LinksToResponse> {
    let sources = search::pages_linking_to(&registry, &client, &params.url).await;
    Json(crate::barrel::protocol::LinksToResponse { sources })
}

pub async fn handle_top10(
    Extension(registry): Extension<Arc<BarrelRegistry>>,
    Extension(client): Extension<Arc<BarrelClient>>,
) -> Json<crate::barrel::protocol::Top10Response> {
    let pages = search::top10_pages_by_links(&registry, &client).await;
    Json(crate::barrel::protocol::Top10Response { pages })
}

pub async fn handle_most_searched(
    Extension(stats): Extension<Arc<GatewayStats>>,
) -> Json<MostSearchedResponse> {
    Json(MostSearchedResponse {
        queries: stats.most_searched(),
    })
}

pub async fn handle_index_sizes(
    Extension(registry): Extension<Arc<BarrelRegistry>>,
    Extension(client): Extension<Arc<BarrelClient>>,
) -> Json<IndexSizesResponse> {
    let sizes = search::barrels_index_sizes(&registry, &client).await;
    Json(IndexSizesResponse { sizes })
}

pub async fn handle_avg_response_time(
    Extension(stats): Extension<Arc<GatewayStats>>,
) -> Json<AverageResponseTimeResponse> {
    Json(AverageResponseTimeResponse {
        average: stats.average_response_time().await,
    })
}

pub async fn handle_stats(
    Extension(registry): Extension<Arc<BarrelRegistry>>,
    Extension(stats): Extension<Arc<GatewayStats>>,
    Extension(client): Extension<Arc<BarrelClient>>,
) -> String {
    let sizes = search::barrels_index_sizes(&registry, &client).await;
    stats.formatted_statistics(&sizes).await
}

pub async fn handle_register_barrel(
    Extension(registry): Extension<Arc<BarrelRegistry>>,
    Json(handle): Json<BarrelHandle>,
) -> Json<RegisterBarrelResponse> {
    registry.register(handle).await;
    Json(RegisterBarrelResponse { success: true })
}

pub async fn handle_remove_barrel(
    Extension(registry): Extension<Arc<BarrelRegistry>>,
    Json(req): Json<RemoveBarrelRequest>,
) -> Json<RemoveBarrelResponse> {
    let success = registry.remove(req.barrel_number).await;
    Json(RemoveBarrelResponse { success })
}

/// Liveness sweep: probes the registry and returns the surviving live set.
pub async fn handle_barrels(
    Extension(registry): Extension<Arc<BarrelRegistry>>,
    Extension(client): Extension<Arc<BarrelClient>>,
) -> Json<BarrelsResponse> {
    let barrels = registry.probe_live(&client).await;
    Json(BarrelsResponse { barrels })
}

pub async fn handle_next_barrel_number(
    Extension(registry): Extension<Arc<BarrelRegistry>>,
) -> Json<NextBarrelNumberResponse> {
    Json(NextBarrelNumberResponse {
        barrel_number: registry.next_barrel_number(),
    })
}

pub async fn handle_register_downloader(
    Extension(registry): Extension<Arc<BarrelRegistry>>,
) -> Json<RegisterDownloaderResponse> {
    let downloader_number = registry.register_downloader();
    tracing::info!("Downloader {} registered", downloader_number);
    Json(RegisterDownloaderResponse { downloader_number })
}

/// Builds the gateway's axum router with all shared state injected.
pub fn router(
    registry: Arc<BarrelRegistry>,
    stats: Arc<GatewayStats>,
    frontier_slot: Arc<FrontierSlot>,
    client: Arc<BarrelClient>,
) -> axum::Router {
    use axum::routing::{get, post};

    axum::Router::new()
        .route(ENDPOINT_PUT_NEW, post(handle_put_new))
        .route(ENDPOINT_NEXT_URL, get(handle_next_url))
        .route(ENDPOINT_SEARCH, get(handle_search))
        .route(ENDPOINT_LINKS_TO, get(handle_links_to))
        .route(ENDPOINT_TOP10, get(handle_top10))
        .route(ENDPOINT_MOST_SEARCHED, get(handle_most_searched))
        .route(ENDPOINT_INDEX_SIZES, get(handle_index_sizes))
        .route(ENDPOINT_AVG_RESPONSE_TIME, get(handle_avg_response_time))
        .route(ENDPOINT_STATS, get(handle_stats))
        .route(ENDPOINT_REGISTER_BARREL, post(handle_register_barrel))
        .route(ENDPOINT_REMOVE_BARREL, post(handle_remove_barrel))
        .route(ENDPOINT_BARRELS, get(handle_barrels))
        .route(ENDPOINT_NEXT_BARREL_NUMBER, post(handle_next_barrel_number))
        .route(ENDPOINT_REGISTER_DOWNLOADER, post(handle_register_downloader))
        .layer(Extension(registry))
        .layer(Extension(stats))
        .layer(Extension(frontier_slot))
        .layer(Extension(client))
}
