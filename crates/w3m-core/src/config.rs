//! Modal configuration

use crate::images::DEFAULT_MAX_IN_FLIGHT;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use w3m_api::{AppMetadata, CallerContext, DirectoryClient, DEFAULT_API_URL};

/// SDK version reported in the `x-sdk-version` header
pub const DEFAULT_SDK_VERSION: &str = concat!("rust-", env!("CARGO_PKG_VERSION"));

/// Directory and paging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModalConfig {
    /// Directory base URL
    pub api_url: String,
    /// Project / tenant identifier
    pub project_id: String,
    /// Embedding application metadata
    pub metadata: AppMetadata,
    /// Wallet ids promoted to the top of the listing
    pub recommended_wallet_ids: Vec<String>,
    /// Wallet ids hidden from the listing
    pub excluded_wallet_ids: Vec<String>,
    /// Listing page size
    pub entries_per_page: u32,
    /// Search page size
    pub search_entries: u32,
    /// Featured wallet count
    pub featured_entries: u32,
    /// Cap on concurrent image fetches; `None` for unbounded
    pub max_image_concurrency: Option<usize>,
    /// HTTP request timeout in seconds
    pub request_timeout_secs: u64,
    /// SDK version tag
    pub sdk_version: String,
}

impl Default for ModalConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            project_id: String::new(),
            metadata: AppMetadata::default(),
            recommended_wallet_ids: Vec::new(),
            excluded_wallet_ids: Vec::new(),
            entries_per_page: 40,
            search_entries: 100,
            featured_entries: 4,
            max_image_concurrency: Some(DEFAULT_MAX_IN_FLIGHT),
            request_timeout_secs: 30,
            sdk_version: DEFAULT_SDK_VERSION.to_string(),
        }
    }
}

impl ModalConfig {
    /// Defaults for a project
    pub fn new(project_id: impl Into<String>, metadata: AppMetadata) -> Self {
        Self {
            project_id: project_id.into(),
            metadata,
            ..Default::default()
        }
    }

    /// Reject configurations the directory would refuse
    pub fn validate(&self) -> Result<()> {
        if self.project_id.trim().is_empty() {
            return Err(Error::Config("project_id is required".to_string()));
        }
        if self.api_url.trim().is_empty() {
            return Err(Error::Config("api_url is required".to_string()));
        }
        if self.entries_per_page == 0 || self.search_entries == 0 || self.featured_entries == 0 {
            return Err(Error::Config("page sizes must be > 0".to_string()));
        }
        if self.max_image_concurrency == Some(0) {
            return Err(Error::Config("max_image_concurrency must be > 0".to_string()));
        }
        Ok(())
    }

    /// Parse from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        config.validate()?;
        Ok(config)
    }

    /// Write as JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Caller context for every directory request
    pub fn caller_context(&self) -> Result<CallerContext> {
        let origin = Some(self.metadata.url.trim())
            .filter(|url| !url.is_empty())
            .map(str::to_string);
        Ok(CallerContext::new(
            self.project_id.clone(),
            self.sdk_version.clone(),
            origin,
        )?)
    }

    /// HTTP directory client for this configuration
    pub fn connect(&self) -> Result<DirectoryClient> {
        self.validate()?;
        Ok(DirectoryClient::with_timeout(
            self.api_url.clone(),
            self.caller_context()?,
            Duration::from_secs(self.request_timeout_secs),
        )?)
    }
}
