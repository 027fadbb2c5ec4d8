use super::retry::{get_with_retry, post_with_retry, CALL_ATTEMPTS, CALL_TIMEOUT};
use crate::barrel::protocol::{LinksToResponse, PageLinkCount, Top10Response};
use crate::gateway::protocol::*;
use anyhow::Result;
use std::time::Duration;

/// Timeout for gateway operations that fan out to every barrel before
/// answering.
const FAN_OUT_TIMEOUT: Duration = Duration::from_secs(5);

/// Client for the gateway RPC surface, used by barrels (registration,
/// deregistration) and downloaders (frontier, barrel discovery).
pub struct GatewayClient {
    base_url: String,
    http_client: reqwest::Client,
}

impl GatewayClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client: reqwest::Client::new(),
        }
    }

    pub async fn put_new(&self, url: &str) -> Result<()> {
        let payload = PutNewRequest {
            url: url.to_string(),
        };
        let response = post_with_retry(
            &self.http_client,
            format!("{}{}", self.base_url, ENDPOINT_PUT_NEW),
            &payload,
            CALL_TIMEOUT,
            CALL_ATTEMPTS,
        )
        .await?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!("put_new failed: {}", response.status()));
        }
        Ok(())
    }

    /// Long-poll for the next frontier URL. Issued without a client timeout:
    /// the gateway holds the request open until a URL is available.
    pub async fn next_url(&self) -> Result<String> {
        let response = self
            .http_client
            .get(format!("{}{}", self.base_url, ENDPOINT_NEXT_URL))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!("next_url failed: {}", response.status()));
        }
        let body: NextUrlResponse = response.json().await?;
        Ok(body.url)
    }

    pub async fn next_barrel_number(&self) -> Result<u32> {
        let response = post_with_retry(
            &self.http_client,
            format!("{}{}", self.base_url, ENDPOINT_NEXT_BARREL_NUMBER),
            &serde_json::json!({}),
            CALL_TIMEOUT,
            CALL_ATTEMPTS,
        )
        .await?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!(
                "next_barrel_number failed: {}",
                response.status()
            ));
        }
        let body: NextBarrelNumberResponse = response.json().await?;
        Ok(body.barrel_number)
    }

    pub async fn register_barrel(&self, handle: &BarrelHandle) -> Result<()> {
        let response = post_with_retry(
            &self.http_client,
            format!("{}{}", self.base_url, ENDPOINT_REGISTER_BARREL),
            handle,
            CALL_TIMEOUT,
            CALL_ATTEMPTS,
        )
        .await?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!(
                "register_barrel failed: {}",
                response.status()
            ));
        }
        Ok(())
    }

    pub async fn remove_barrel(&self, barrel_number: u32) -> Result<()> {
        let payload = RemoveBarrelRequest { barrel_number };
        let response = post_with_retry(
            &self.http_client,
            format!("{}{}", self.base_url, ENDPOINT_REMOVE_BARREL),
            &payload,
            CALL_TIMEOUT,
            CALL_ATTEMPTS,
        )
        .await?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!("remove_barrel failed: {}", response.status()));
        }
        Ok(())
    }

    /// Merged multi-word search. `pagination` marks the request as a page
    /// continuation, which skips the search histogram.
    pub async fn search(&self, query: &str, page: usize, pagination: bool) -> Result<Vec<String>> {
        let target = reqwest::Url::parse_with_params(
            &format!("{}{}", self.base_url, ENDPOINT_SEARCH),
            &[
                ("q", query),
                ("page", page.to_string().as_str()),
                ("pagination", pagination.to_string().as_str()),
            ],
        )?;
        let response = get_with_retry(
            &self.http_client,
            target.to_string(),
            FAN_OUT_TIMEOUT,
            CALL_ATTEMPTS,
        )
        .await?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!("search failed: {}", response.status()));
        }
        let body: SearchResponse = response.json().await?;
        Ok(body.results)
    }

    pub async fn pages_linking_to(&self, url: &str) -> Result<Vec<String>> {
        let target = reqwest::Url::parse_with_params(
            &format!("{}{}", self.base_url, ENDPOINT_LINKS_TO),
            &[("url", url)],
        )?;
        let response = get_with_retry(
            &self.http_client,
            target.to_string(),
            FAN_OUT_TIMEOUT,
            CALL_ATTEMPTS,
        )
        .await?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!("links_to failed: {}", response.status()));
        }
        let body: LinksToResponse = response.json().await?;
        Ok(body.sources)
    }

    pub async fn top10_pages_by_links(&self) -> Result<Vec<PageLinkCount>> {
        let response = get_with_retry(
            &self.http_client,
            format!("{}{}", self.base_url, ENDPOINT_TOP10),
            FAN_OUT_TIMEOUT,
            CALL_ATTEMPTS,
        )
        .await?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!("top10 failed: {}", response.status()));
        }
        let body: Top10Response = response.json().await?;
        Ok(body.pages)
    }

    pub async fn most_searched(&self) -> Result<Vec<QueryCount>> {
        let response = get_with_retry(
            &self.http_client,
            format!("{}{}", self.base_url, ENDPOINT_MOST_SEARCHED),
            CALL_TIMEOUT,
            CALL_ATTEMPTS,
        )
        .await?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!("most_searched failed: {}", response.status()));
        }
        let body: MostSearchedResponse = response.json().await?;
        Ok(body.queries)
    }

    /// Consolidated human-readable statistics report.
    pub async fn statistics(&self) -> Result<String> {
        let response = get_with_retry(
            &self.http_client,
            format!("{}{}", self.base_url, ENDPOINT_STATS),
            FAN_OUT_TIMEOUT,
            CALL_ATTEMPTS,
        )
        .await?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!("stats failed: {}", response.status()));
        }
        Ok(response.text().await?)
    }

    /// Asks the gateway for the live barrel set. The gateway probes its
    /// registry as a side effect, so the answer reflects current liveness.
    pub async fn registered_barrels(&self) -> Result<Vec<BarrelHandle>> {
        let response = get_with_retry(
            &self.http_client,
            format!("{}{}", self.base_url, ENDPOINT_BARRELS),
            // The gateway probes every barrel before answering, so this
            // call needs more headroom than a point lookup.
            FAN_OUT_TIMEOUT,
            CALL_ATTEMPTS,
        )
        .await?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!("barrels failed: {}", response.status()));
        }
        let body: BarrelsResponse = response.json().await?;
        Ok(body.barrels)
    }

    pub async fn register_downloader(&self) -> Result<u32> {
        let response = post_with_retry(
            &self.http_client,
            format!("{}{}", self.base_url, ENDPOINT_REGISTER_DOWNLOADER),
            &serde_json::json!({}),
            CALL_TIMEOUT,
            CALL_ATTEMPTS,
        )
        .await?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!(
                "register_downloader failed: {}",
                response.status()
            ));
        }
        let body: RegisterDownloaderResponse = response.json().await?;
        Ok(body.downloader_number)
    }
}
