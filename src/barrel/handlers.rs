//! Barrel HTTP Handlers
//!
//! Maps the barrel RPC surface onto axum handlers. All query-style endpoints
//! degrade to empty results rather than propagating errors; only the flush
//! endpoint reports failure, since the caller escalates on it.

use super::protocol::*;
use super::store::BarrelStore;
use axum::extract::{Extension, Query};
use axum::http::StatusCode;
use axum::Json;
use std::sync::Arc;

pub async fn handle_receive_word(
    Extension(store): Extension<Arc<BarrelStore>>,
    Json(req): Json<ReceiveWordRequest>,
) -> Json<AckResponse> {
    let accepted = store.receive_word(&req.url, &req.word).await;
    Json(AckResponse { accepted })
}

pub async fn handle_receive_url_info(
    Extension(store): Extension<Arc<BarrelStore>>,
    Json(req): Json<ReceiveUrlInfoRequest>,
) -> Json<AckResponse> {
    let accepted = store
        .receive_url_info(&req.url, &req.title, &req.description)
        .await;
    Json(AckResponse { accepted })
}

pub async fn handle_receive_link(
    Extension(store): Extension<Arc<BarrelStore>>,
    Json(req): Json<ReceiveLinkRequest>,
) -> Json<AckResponse> {
    let accepted = store.receive_link(&req.source_url, &req.target_url).await;
    Json(AckResponse { accepted })
}

pub async fn handle_search(
    Extension(store): Extension<Arc<BarrelStore>>,
    Json(req): Json<SearchWordsRequest>,
) -> Json<SearchWordsResponse> {
    let results = store.search_multiple_words(&req.words).await;
    Json(SearchWordsResponse { results })
}

pub async fn handle_links_to(
    Extension(store): Extension<Arc<BarrelStore>>,
    Query(params): Query<UrlParam>,
) -> Json<LinksToResponse> {
    let sources = store.pages_linking_to(&params.url).await;
    Json(LinksToResponse { sources })
}

pub async fn handle_top10(
    Extension(store): Extension<Arc<BarrelStore>>,
) -> Json<Top10Response> {
    let pages = store.top10_pages_by_links().await;
    Json(Top10Response { pages })
}

pub async fn handle_index_size(
    Extension(store): Extension<Arc<BarrelStore>>,
) -> Json<IndexSizeResponse> {
    let size = store.index_size().await;
    Json(IndexSizeResponse { size })
}

pub async fn handle_link_count(
    Extension(store): Extension<Arc<BarrelStore>>,
    Query(params): Query<UrlParam>,
) -> Json<LinkCountResponse> {
    let count = store.link_count(&params.url).await;
    Json(LinkCountResponse { count })
}

pub async fn handle_barrel_number(
    Extension(store): Extension<Arc<BarrelStore>>,
) -> Json<BarrelNumberResponse> {
    Json(BarrelNumberResponse {
        barrel_number: store.barrel_number,
    })
}

pub async fn handle_flush(
    Extension(store): Extension<Arc<BarrelStore>>,
) -> (StatusCode, Json<FlushResponse>) {
    match store.write_snapshot().await {
        Ok(_) => (StatusCode::OK, Json(FlushResponse { success: true })),
        Err(e) => {
            tracing::error!("Barrel {} failed to write snapshot: {}", store.barrel_number, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(FlushResponse { success: false }),
            )
        }
    }
}

/// Builds the barrel's axum router with the store injected as an extension.
pub fn router(store: Arc<BarrelStore>) -> axum::Router {
    use axum::routing::{get, post};

    axum::Router::new()
        .route(ENDPOINT_WORD, post(handle_receive_word))
        .route(ENDPOINT_URL_INFO, post(handle_receive_url_info))
        .route(ENDPOINT_LINK, post(handle_receive_link))
        .route(ENDPOINT_SEARCH, post(handle_search))
        .route(ENDPOINT_LINKS_TO, get(handle_links_to))
        .route(ENDPOINT_TOP10, get(handle_top10))
        .route(ENDPOINT_INDEX_SIZE, get(handle_index_size))
        .route(ENDPOINT_LINK_COUNT, get(handle_link_count))
        .route(ENDPOINT_BARREL_NUMBER, get(handle_barrel_number))
        .route(ENDPOINT_FLUSH, post(handle_flush))
        .layer(Extension(store))
}
