//! Directory HTTP client
//!
//! `DirectoryTransport` is the seam used by the controller and the image
//! enrichment engine; `DirectoryClient` is the reqwest implementation.

use crate::{CallerContext, DirectoryQuery, Error, Result, WalletPage};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{IntoUrl, Url};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Default directory endpoint
pub const DEFAULT_API_URL: &str = "https://api.web3modal.com";

/// Image namespace on the directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageKind {
    /// Wallet artwork
    Wallet,
    /// Chain / asset artwork
    Asset,
}

impl ImageKind {
    fn path(&self) -> &'static str {
        match self {
            ImageKind::Wallet => "/getWalletImage",
            ImageKind::Asset => "/public/getAssetImage",
        }
    }
}

/// Remote directory operations
#[async_trait]
pub trait DirectoryTransport: Send + Sync {
    /// Fetch one page of wallets (or the first page of a search)
    async fn fetch_wallets(&self, query: &DirectoryQuery) -> Result<WalletPage>;

    /// Fetch raw image bytes
    async fn fetch_image(&self, kind: ImageKind, image_id: &str) -> Result<Bytes>;
}

/// Directory client over HTTP
pub struct DirectoryClient {
    base_url: String,
    context: Arc<CallerContext>,
    client: reqwest::Client,
}

impl DirectoryClient {
    /// Create a client using reqwest's default transport settings
    pub fn new(base_url: impl Into<String>, context: CallerContext) -> Self {
        Self::with_http_client(base_url, context, reqwest::Client::new())
    }

    /// Create a client with a request timeout
    pub fn with_timeout(
        base_url: impl Into<String>,
        context: CallerContext,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Transport(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self::with_http_client(base_url, context, client))
    }

    /// Create a client around an existing reqwest client
    pub fn with_http_client(
        base_url: impl Into<String>,
        context: CallerContext,
        client: reqwest::Client,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            context: Arc::new(context),
            client,
        }
    }

    /// Caller context attached to every request
    pub fn context(&self) -> &CallerContext {
        &self.context
    }

    /// Base URL without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Image URL with `image_id` percent-encoded as one path segment
    fn image_url(&self, kind: ImageKind, image_id: &str) -> Result<Url> {
        if image_id.is_empty() || image_id == "." || image_id == ".." {
            return Err(Error::InvalidQuery(format!("invalid image id: {:?}", image_id)));
        }

        let mut url = Url::parse(&format!("{}{}", self.base_url, kind.path()))
            .map_err(|e| Error::InvalidQuery(format!("invalid base url {}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| Error::InvalidQuery(format!("base url cannot carry a path: {}", self.base_url)))?
            .push(image_id);
        Ok(url)
    }

    async fn get<U: IntoUrl>(&self, url: U, params: &[(&'static str, String)]) -> Result<reqwest::Response> {
        let response = self
            .client
            .get(url)
            .headers(self.context.headers().clone())
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Response {
                status: Some(status.as_u16()),
                message: format!("HTTP error: {}", status),
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl DirectoryTransport for DirectoryClient {
    async fn fetch_wallets(&self, query: &DirectoryQuery) -> Result<WalletPage> {
        query.validate()?;

        debug!(
            page = query.page,
            entries = query.entries,
            search = %query.search,
            "Fetching wallet page"
        );

        let url = format!("{}/getWallets", self.base_url);
        let response = self.get(&url, &query.to_params()).await?;
        let page: WalletPage = response.json().await?;

        debug!(
            page = query.page,
            received = page.data.len(),
            count = page.count,
            "Wallet page received"
        );

        Ok(page)
    }

    async fn fetch_image(&self, kind: ImageKind, image_id: &str) -> Result<Bytes> {
        let url = self.image_url(kind, image_id)?;
        let response = self.get(url, &[]).await?;
        Ok(response.bytes().await?)
    }
}
