use crate::config::NetworkConfig;
use crate::internal::models::{ApiEnvelope, MutationOutcome, Pot, PotDraft, PotList};
use anyhow::{Context, Result, anyhow};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

const LIST_PATH: &str = "getAllPots";
const CREATE_PATH: &str = "potAdmin";
const UPDATE_PATH: &str = "updatePot";
const DELETE_PATH: &str = "deletePot";

/// HTTP client for the pot server.
///
/// All calls return `anyhow::Result` with context naming the operation and URL.
/// A response body that says `success: false` is a [`MutationOutcome::Rejected`],
/// not an error; errors are reserved for transport and decoding failures.
#[derive(Clone, Debug)]
pub struct PotApi {
    client: Client,
    base_url: Url,
    timeout: Duration,
}

impl PotApi {
    pub fn new(config: &NetworkConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()
            .context("failed to build HTTP client")?;
        Self::with_client(client, config)
    }

    pub fn with_client(client: Client, config: &NetworkConfig) -> Result<Self> {
        // Url::join drops the last segment unless the base ends with '/'
        let mut raw = config.base_url.trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        let base_url =
            Url::parse(&raw).with_context(|| format!("invalid base URL '{}'", config.base_url))?;
        if base_url.cannot_be_a_base() {
            return Err(anyhow!("base URL '{}' cannot carry paths", config.base_url));
        }

        Ok(Self {
            client,
            base_url,
            timeout: Duration::from_secs(config.timeout_secs.max(1)),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .with_context(|| format!("failed to build URL for {}", path))
    }

    fn record_endpoint(&self, path: &str, id: &str) -> Result<Url> {
        let mut url = self.endpoint(path)?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("base URL cannot carry paths"))?
            .push(id);
        Ok(url)
    }

    async fn decode<T>(resp: reqwest::Response, url: &Url) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let status = resp.status();
        let bytes = resp
            .bytes()
            .await
            .with_context(|| format!("failed to read response body from {}", url))?;
        serde_json::from_slice(&bytes)
            .with_context(|| format!("failed to parse JSON response from {} ({})", url, status))
    }

    /// Fetch every pot. A payload without `pots` yields an empty list.
    pub async fn fetch_pots(&self) -> Result<Vec<Pot>> {
        let url = self.endpoint(LIST_PATH)?;
        let resp = self
            .client
            .get(url.clone())
            .timeout(self.timeout)
            .send()
            .await
            .with_context(|| format!("failed to send GET request to {}", url))?;

        let list: PotList = Self::decode(resp, &url)
            .await
            .context("fetch_pots failed")?;
        Ok(list.into_pots())
    }

    pub async fn create_pot(&self, draft: &PotDraft) -> Result<MutationOutcome> {
        let url = self.endpoint(CREATE_PATH)?;
        let resp = self
            .client
            .post(url.clone())
            .timeout(self.timeout)
            .json(draft)
            .send()
            .await
            .with_context(|| format!("failed to send POST request to {}", url))?;

        let envelope: ApiEnvelope = Self::decode(resp, &url)
            .await
            .context("create_pot failed")?;
        Ok(envelope.into())
    }

    pub async fn update_pot(&self, id: &str, draft: &PotDraft) -> Result<MutationOutcome> {
        let url = self.record_endpoint(UPDATE_PATH, id)?;
        let resp = self
            .client
            .put(url.clone())
            .timeout(self.timeout)
            .json(draft)
            .send()
            .await
            .with_context(|| format!("failed to send PUT request to {}", url))?;

        let envelope: ApiEnvelope = Self::decode(resp, &url)
            .await
            .with_context(|| format!("update_pot failed for id {}", id))?;
        Ok(envelope.into())
    }

    pub async fn delete_pot(&self, id: &str) -> Result<MutationOutcome> {
        let url = self.record_endpoint(DELETE_PATH, id)?;
        let resp = self
            .client
            .delete(url.clone())
            .timeout(self.timeout)
            .send()
            .await
            .with_context(|| format!("failed to send DELETE request to {}", url))?;

        let envelope: ApiEnvelope = Self::decode(resp, &url)
            .await
            .with_context(|| format!("delete_pot failed for id {}", id))?;
        Ok(envelope.into())
    }
}
