//! Directory wire types

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Wallet listed in the directory.
///
/// Immutable once received; `id` is unique across the directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WalletEntry {
    /// Stable wallet identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Image identifier, shared with other wallets using the same artwork
    pub image_id: String,
    /// Ordering rank (lower first)
    #[serde(default)]
    pub order: i64,
    /// Wallet homepage
    #[serde(default)]
    pub homepage: Option<String>,
    /// Native deep link scheme
    #[serde(default)]
    pub mobile_link: Option<String>,
    /// Desktop deep link
    #[serde(default)]
    pub desktop_link: Option<String>,
    /// Web app link
    #[serde(default)]
    pub webapp_link: Option<String>,
    /// App Store listing
    #[serde(default)]
    pub app_store: Option<String>,
    /// Play Store listing
    #[serde(default)]
    pub play_store: Option<String>,
    /// Reverse DNS identifier used for injected provider discovery
    #[serde(default)]
    pub rdns: Option<String>,
    /// Injected provider namespaces
    #[serde(default)]
    pub injected: Option<Vec<InjectedProvider>>,
}

/// Injected provider descriptor
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InjectedProvider {
    /// Protocol namespace (e.g. `eip155`)
    pub namespace: String,
    /// Provider identity flag
    pub injected_id: String,
}

/// One page of the directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletPage {
    /// Total number of wallets matching the query (all pages)
    pub count: u64,
    /// Wallets on this page
    pub data: Vec<WalletEntry>,
}

/// Metadata of the embedding application.
///
/// The directory only sees the URL, as the `origin` header. Other metadata
/// keys in a config file are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppMetadata {
    /// Application URL, sent as the request origin
    pub url: String,
}

/// Directory query parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryQuery {
    /// 1-based page number
    pub page: u32,
    /// Page size
    pub entries: u32,
    /// Search filter; empty means no filter
    pub search: String,
    /// Wallet ids promoted to the top of the listing
    pub recommended_ids: Vec<String>,
    /// Wallet ids removed from the listing
    pub excluded_ids: Vec<String>,
}

impl DirectoryQuery {
    /// Query for one listing page
    pub fn page(page: u32, entries: u32) -> Self {
        Self {
            page,
            entries,
            ..Default::default()
        }
    }

    /// Query for the first page of a search
    pub fn search(term: impl Into<String>, entries: u32) -> Self {
        Self {
            page: 1,
            entries,
            search: term.into(),
            ..Default::default()
        }
    }

    /// Attach recommended / excluded wallet ids
    pub fn with_filters(mut self, recommended_ids: &[String], excluded_ids: &[String]) -> Self {
        self.recommended_ids = recommended_ids.to_vec();
        self.excluded_ids = excluded_ids.to_vec();
        self
    }

    /// Check page and page-size constraints
    pub fn validate(&self) -> Result<()> {
        if self.page == 0 {
            return Err(Error::InvalidQuery("page must be >= 1".to_string()));
        }
        if self.entries == 0 {
            return Err(Error::InvalidQuery("entries must be > 0".to_string()));
        }
        Ok(())
    }

    /// Query-string pairs; empty filters are omitted
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("page", self.page.to_string()),
            ("entries", self.entries.to_string()),
        ];
        if !self.search.is_empty() {
            params.push(("search", self.search.clone()));
        }
        if !self.recommended_ids.is_empty() {
            params.push(("recommendedIds", self.recommended_ids.join(",")));
        }
        if !self.excluded_ids.is_empty() {
            params.push(("excludedIds", self.excluded_ids.join(",")));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wallet_page_from_directory_json() {
        let json = r#"{
            "count": 2,
            "data": [
                {
                    "id": "c57ca95b47569778a828d19178114f4db188b89b763c899ba0be274e97267d96",
                    "name": "MetaMask",
                    "homepage": "https://metamask.io/",
                    "image_id": "5195e9db-94d8-4579-6f11-ef553be95100",
                    "order": 10,
                    "mobile_link": "metamask://",
                    "desktop_link": null,
                    "webapp_link": null,
                    "app_store": "https://apps.apple.com/us/app/metamask/id1438144202",
                    "play_store": "https://play.google.com/store/apps/details?id=io.metamask",
                    "rdns": "io.metamask",
                    "injected": [{"namespace": "eip155", "injected_id": "isMetaMask"}],
                    "chains": ["eip155:1"]
                },
                {
                    "id": "1ae92b26df02f0abca6304df07debccd18262fdf5fe82daa81593582dac9a369",
                    "name": "Rainbow",
                    "image_id": "7a33d7f1-3d12-4b5c-f3ee-5cd83cb1b500"
                }
            ]
        }"#;

        let page: WalletPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.count, 2);
        assert_eq!(page.data.len(), 2);

        let metamask = &page.data[0];
        assert_eq!(metamask.name, "MetaMask");
        assert_eq!(metamask.order, 10);
        assert_eq!(metamask.mobile_link.as_deref(), Some("metamask://"));
        assert_eq!(metamask.injected.as_ref().unwrap()[0].injected_id, "isMetaMask");

        let rainbow = &page.data[1];
        assert_eq!(rainbow.order, 0);
        assert!(rainbow.homepage.is_none());
        assert!(rainbow.injected.is_none());
    }

    #[test]
    fn test_app_metadata_keeps_url_only() {
        let metadata: AppMetadata = serde_json::from_str(
            r#"{"name": "Dapp", "description": "d", "url": "https://dapp.example", "icons": []}"#,
        )
        .unwrap();
        assert_eq!(metadata.url, "https://dapp.example");

        let empty: AppMetadata = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, AppMetadata::default());
    }

    #[test]
    fn test_query_validation() {
        assert!(DirectoryQuery::page(1, 40).validate().is_ok());
        assert!(DirectoryQuery::page(0, 40).validate().is_err());
        assert!(DirectoryQuery::page(1, 0).validate().is_err());
        assert!(DirectoryQuery::search("", 100).validate().is_ok());
    }

    #[test]
    fn test_query_params_omit_empty_filters() {
        let params = DirectoryQuery::page(3, 40).to_params();
        assert_eq!(
            params,
            vec![("page", "3".to_string()), ("entries", "40".to_string())]
        );

        let params = DirectoryQuery::search("rain", 100)
            .with_filters(&["a".into(), "b".into()], &["c".into()])
            .to_params();
        assert!(params.contains(&("search", "rain".to_string())));
        assert!(params.contains(&("recommendedIds", "a,b".to_string())));
        assert!(params.contains(&("excludedIds", "c".to_string())));
    }
}
