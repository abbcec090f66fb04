//! In-memory directory used by the integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use w3m_api::{AppMetadata, DirectoryQuery, DirectoryTransport, ImageKind, WalletEntry, WalletPage};
use w3m_core::{ModalConfig, StoreHandle};

pub fn wallet(index: usize) -> WalletEntry {
    named_wallet(&format!("wallet-{:03}", index), &format!("Wallet {:03}", index), index as i64)
}

pub fn named_wallet(id: &str, name: &str, order: i64) -> WalletEntry {
    WalletEntry {
        id: id.to_string(),
        name: name.to_string(),
        image_id: format!("img-{}", id),
        order,
        homepage: None,
        mobile_link: None,
        desktop_link: None,
        webapp_link: None,
        app_store: None,
        play_store: None,
        rdns: None,
        injected: None,
    }
}

pub fn png_bytes() -> Bytes {
    let mut out = Cursor::new(Vec::new());
    image::RgbaImage::new(1, 1)
        .write_to(&mut out, image::ImageFormat::Png)
        .expect("encode png");
    Bytes::from(out.into_inner())
}

/// PNG with an intact header whose body is cut short
pub fn truncated_png_bytes() -> Bytes {
    let mut out = Cursor::new(Vec::new());
    image::RgbaImage::new(64, 64)
        .write_to(&mut out, image::ImageFormat::Png)
        .expect("encode png");
    let mut bytes = out.into_inner();
    bytes.truncate(bytes.len() - 20);
    Bytes::from(bytes)
}

pub fn test_config() -> ModalConfig {
    ModalConfig::new("test-project", AppMetadata::default())
}

/// Fake directory with a fixed listing and canned search results
pub struct FakeDirectory {
    listing: Vec<WalletEntry>,
    searches: Mutex<HashMap<String, Vec<WalletEntry>>>,
    failing_pages: Mutex<HashSet<u32>>,
    failing_images: Mutex<HashSet<String>>,
    truncated_images: Mutex<HashSet<String>>,
    delays: Mutex<Vec<Duration>>,
    observer: Mutex<Option<StoreHandle>>,
    queries: Mutex<Vec<DirectoryQuery>>,
    image_calls: Mutex<Vec<(ImageKind, String)>>,
    loading_seen: Mutex<Vec<bool>>,
    wallet_calls: AtomicUsize,
}

impl FakeDirectory {
    pub fn new(total: usize) -> Self {
        Self {
            listing: (0..total).map(wallet).collect(),
            searches: Mutex::new(HashMap::new()),
            failing_pages: Mutex::new(HashSet::new()),
            failing_images: Mutex::new(HashSet::new()),
            truncated_images: Mutex::new(HashSet::new()),
            delays: Mutex::new(Vec::new()),
            observer: Mutex::new(None),
            queries: Mutex::new(Vec::new()),
            image_calls: Mutex::new(Vec::new()),
            loading_seen: Mutex::new(Vec::new()),
            wallet_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_search(self, term: &str, results: Vec<WalletEntry>) -> Self {
        self.searches.lock().insert(term.to_string(), results);
        self
    }

    /// Delay applied to the n-th `fetch_wallets` call (0-based)
    pub fn with_delays(self, delays: Vec<Duration>) -> Self {
        *self.delays.lock() = delays;
        self
    }

    pub fn fail_page(&self, page: u32) {
        self.failing_pages.lock().insert(page);
    }

    pub fn heal_page(&self, page: u32) {
        self.failing_pages.lock().remove(&page);
    }

    pub fn fail_image(&self, image_id: &str) {
        self.failing_images.lock().insert(image_id.to_string());
    }

    pub fn truncate_image(&self, image_id: &str) {
        self.truncated_images.lock().insert(image_id.to_string());
    }

    pub fn heal_image(&self, image_id: &str) {
        self.truncated_images.lock().remove(image_id);
    }

    pub fn image_calls_for(&self, image_id: &str) -> usize {
        self.image_calls
            .lock()
            .iter()
            .filter(|(_, id)| id == image_id)
            .count()
    }

    pub fn observe(&self, store: StoreHandle) {
        *self.observer.lock() = Some(store);
    }

    pub fn queries(&self) -> Vec<DirectoryQuery> {
        self.queries.lock().clone()
    }

    pub fn listing_pages_requested(&self) -> Vec<u32> {
        self.queries
            .lock()
            .iter()
            .filter(|q| q.search.is_empty())
            .map(|q| q.page)
            .collect()
    }

    pub fn image_calls(&self) -> Vec<(ImageKind, String)> {
        self.image_calls.lock().clone()
    }

    pub fn loading_seen(&self) -> Vec<bool> {
        self.loading_seen.lock().clone()
    }
}

#[async_trait]
impl DirectoryTransport for FakeDirectory {
    async fn fetch_wallets(&self, query: &DirectoryQuery) -> w3m_api::Result<WalletPage> {
        query.validate()?;
        let call = self.wallet_calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().push(query.clone());

        let observer = self.observer.lock().clone();
        if let Some(store) = observer {
            self.loading_seen.lock().push(store.snapshot().is_loading());
        }

        let delay = self.delays.lock().get(call).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if !query.search.is_empty() {
            let data = self
                .searches
                .lock()
                .get(&query.search)
                .cloned()
                .unwrap_or_default();
            return Ok(WalletPage {
                count: data.len() as u64,
                data,
            });
        }

        if self.failing_pages.lock().contains(&query.page) {
            return Err(w3m_api::Error::Response {
                status: Some(502),
                message: "HTTP error: 502 Bad Gateway".to_string(),
            });
        }

        let size = query.entries as usize;
        let start = (query.page as usize - 1).saturating_mul(size).min(self.listing.len());
        let end = start.saturating_add(size).min(self.listing.len());
        Ok(WalletPage {
            count: self.listing.len() as u64,
            data: self.listing[start..end].to_vec(),
        })
    }

    async fn fetch_image(&self, kind: ImageKind, image_id: &str) -> w3m_api::Result<Bytes> {
        self.image_calls.lock().push((kind, image_id.to_string()));
        if self.failing_images.lock().contains(image_id) {
            return Err(w3m_api::Error::Transport("connection reset".to_string()));
        }
        if self.truncated_images.lock().contains(image_id) {
            return Ok(truncated_png_bytes());
        }
        Ok(png_bytes())
    }
}
