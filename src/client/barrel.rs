use super::retry::{get_with_retry, post_with_retry, CALL_ATTEMPTS, CALL_TIMEOUT};
use crate::barrel::protocol::*;
use crate::gateway::protocol::BarrelHandle;
use anyhow::Result;

/// Client for the barrel RPC surface. One instance serves calls against any
/// number of barrels; the target is passed per call.
pub struct BarrelClient {
    http_client: reqwest::Client,
}

impl BarrelClient {
    pub fn new() -> Self {
        Self {
            http_client: reqwest::Client::new(),
        }
    }

    pub async fn receive_word(&self, barrel: &BarrelHandle, url: &str, word: &str) -> Result<bool> {
        let payload = ReceiveWordRequest {
            url: url.to_string(),
            word: word.to_string(),
        };
        let response = post_with_retry(
            &self.http_client,
            format!("{}{}", barrel.base_url, ENDPOINT_WORD),
            &payload,
            CALL_TIMEOUT,
            CALL_ATTEMPTS,
        )
        .await?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!("receive_word failed: {}", response.status()));
        }
        let ack: AckResponse = response.json().await?;
        Ok(ack.accepted)
    }

    pub async fn receive_url_info(
        &self,
        barrel: &BarrelHandle,
        url: &str,
        title: &str,
        description: &str,
    ) -> Result<bool> {
        let payload = ReceiveUrlInfoRequest {
            url: url.to_string(),
            title: title.to_string(),
            description: description.to_string(),
        };
        let response = post_with_retry(
            &self.http_client,
            format!("{}{}", barrel.base_url, ENDPOINT_URL_INFO),
            &payload,
            CALL_TIMEOUT,
            CALL_ATTEMPTS,
        )
        .await?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!(
                "receive_url_info failed: {}",
                response.status()
            ));
        }
        let ack: AckResponse = response.json().await?;
        Ok(ack.accepted)
    }

    pub async fn receive_link(
        &self,
        barrel: &BarrelHandle,
        source_url: &str,
        target_url: &str,
    ) -> Result<bool> {
        let payload = ReceiveLinkRequest {
            source_url: source_url.to_string(),
            target_url: target_url.to_string(),
        };
        let response = post_with_retry(
            &self.http_client,
            format!("{}{}", barrel.base_url, ENDPOINT_LINK),
            &payload,
            CALL_TIMEOUT,
            CALL_ATTEMPTS,
        )
        .await?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!("receive_link failed: {}", response.status()));
        }
        let ack: AckResponse = response.json().await?;
        Ok(ack.accepted)
    }

    pub async fn search_multiple_words(
        &self,
        barrel: &BarrelHandle,
        words: &[String],
    ) -> Result<Vec<String>> {
        let payload = SearchWordsRequest {
            words: words.to_vec(),
        };
        let response = post_with_retry(
            &self.http_client,
            format!("{}{}", barrel.base_url, ENDPOINT_SEARCH),
            &payload,
            CALL_TIMEOUT,
            CALL_ATTEMPTS,
        )
        .await?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!("search failed: {}", response.status()));
        }
        let body: SearchWordsResponse = response.json().await?;
        Ok(body.results)
    }

    pub async fn pages_linking_to(&self, barrel: &BarrelHandle, url: &str) -> Result<Vec<String>> {
        let target = url_with_param(&barrel.base_url, ENDPOINT_LINKS_TO, url)?;
        let response =
            get_with_retry(&self.http_client, target, CALL_TIMEOUT, CALL_ATTEMPTS).await?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!("links_to failed: {}", response.status()));
        }
        let body: LinksToResponse = response.json().await?;
        Ok(body.sources)
    }

    pub async fn top10_pages_by_links(&self, barrel: &BarrelHandle) -> Result<Vec<PageLinkCount>> {
        let response = get_with_retry(
            &self.http_client,
            format!("{}{}", barrel.base_url, ENDPOINT_TOP10),
            CALL_TIMEOUT,
            CALL_ATTEMPTS,
        )
        .await?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!("top10 failed: {}", response.status()));
        }
        let body: Top10Response = response.json().await?;
        Ok(body.pages)
    }

    /// Lightweight call, also used by the gateway as its liveness probe.
    pub async fn index_size(&self, barrel: &BarrelHandle) -> Result<usize> {
        let response = get_with_retry(
            &self.http_client,
            format!("{}{}", barrel.base_url, ENDPOINT_INDEX_SIZE),
            CALL_TIMEOUT,
            CALL_ATTEMPTS,
        )
        .await?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!("index_size failed: {}", response.status()));
        }
        let body: IndexSizeResponse = response.json().await?;
        Ok(body.size)
    }

    pub async fn link_count(&self, barrel: &BarrelHandle, url: &str) -> Result<usize> {
        let target = url_with_param(&barrel.base_url, ENDPOINT_LINK_COUNT, url)?;
        let response =
            get_with_retry(&self.http_client, target, CALL_TIMEOUT, CALL_ATTEMPTS).await?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!("link_count failed: {}", response.status()));
        }
        let body: LinkCountResponse = response.json().await?;
        Ok(body.count)
    }

    /// Forces the barrel to rewrite its snapshot file.
    pub async fn flush(&self, barrel: &BarrelHandle) -> Result<bool> {
        let response = post_with_retry(
            &self.http_client,
            format!("{}{}", barrel.base_url, ENDPOINT_FLUSH),
            &serde_json::json!({}),
            CALL_TIMEOUT,
            CALL_ATTEMPTS,
        )
        .await?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!("flush failed: {}", response.status()));
        }
        let body: FlushResponse = response.json().await?;
        Ok(body.success)
    }
}

impl Default for BarrelClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds `<base><endpoint>?url=<value>` with proper percent-encoding.
fn url_with_param(base_url: &str, endpoint: &str, url: &str) -> Result<String> {
    let target = reqwest::Url::parse_with_params(
        &format!("{}{}", base_url, endpoint),
        &[("url", url)],
    )?;
    Ok(target.to_string())
}
