//! Image enrichment
//!
//! Fetches wallet and chain artwork that is not cached yet. Fetches run as
//! independent tasks behind a semaphore; a failed fetch only drops that
//! image and never fails the batch.

use crate::{Error, Result};
use bytes::Bytes;
use image::{ImageFormat, ImageReader};
use std::collections::{BTreeSet, HashMap};
use std::io::Cursor;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};
use w3m_api::{DirectoryTransport, ImageKind, WalletEntry};

/// Default cap on concurrent image fetches
pub const DEFAULT_MAX_IN_FLIGHT: usize = 16;

/// Image cache keyed by image id
pub type ImageCache = HashMap<String, WalletImage>;

/// Decoded image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletImage {
    /// Encoded bytes as served by the directory
    pub bytes: Bytes,
    /// Sniffed container format
    pub format: ImageFormat,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl WalletImage {
    /// Sniff the format and decode the full image.
    ///
    /// Truncated or corrupt bodies fail here even when the header is intact.
    pub fn decode(bytes: Bytes) -> Result<Self> {
        let format = image::guess_format(&bytes).map_err(|e| Error::Decode(e.to_string()))?;
        let decoded = ImageReader::with_format(Cursor::new(&bytes[..]), format)
            .decode()
            .map_err(|e| Error::Decode(format!("{:?}: {}", format, e)))?;

        Ok(Self {
            width: decoded.width(),
            height: decoded.height(),
            bytes,
            format,
        })
    }
}

/// Concurrent image fetcher
pub struct ImageEnricher {
    transport: Arc<dyn DirectoryTransport>,
    max_in_flight: Option<usize>,
}

impl ImageEnricher {
    /// Create an enricher; `None` allows one in-flight fetch per missing image
    pub fn new(transport: Arc<dyn DirectoryTransport>, max_in_flight: Option<usize>) -> Self {
        Self {
            transport,
            max_in_flight,
        }
    }

    /// Fetch wallet images missing from `cache`
    pub async fn enrich_wallets(&self, entries: &[WalletEntry], cache: &ImageCache) -> ImageCache {
        self.enrich(
            ImageKind::Wallet,
            entries.iter().map(|entry| entry.image_id.as_str()),
            cache,
        )
        .await
    }

    /// Fetch every image id missing from `cache`.
    ///
    /// Duplicate ids are fetched once. The returned map only holds images
    /// that were fetched and decoded; the caller merges it into the store.
    pub async fn enrich<'a, I>(&self, kind: ImageKind, image_ids: I, cache: &ImageCache) -> ImageCache
    where
        I: IntoIterator<Item = &'a str>,
    {
        let missing: BTreeSet<String> = image_ids
            .into_iter()
            .filter(|id| !id.is_empty() && !cache.contains_key(*id))
            .map(str::to_string)
            .collect();

        if missing.is_empty() {
            return ImageCache::new();
        }

        let requested = missing.len();
        let limit = self.max_in_flight.unwrap_or(requested).max(1);
        let semaphore = Arc::new(Semaphore::new(limit));
        let mut tasks = JoinSet::new();

        for image_id in missing {
            let transport = Arc::clone(&self.transport);
            let sem = Arc::clone(&semaphore);
            tasks.spawn(async move {
                let _permit = sem.acquire_owned().await.ok();
                let result = match transport.fetch_image(kind, &image_id).await {
                    Ok(bytes) => WalletImage::decode(bytes),
                    Err(e) => Err(Error::from(e)),
                };
                (image_id, result)
            });
        }

        let mut images = ImageCache::with_capacity(requested);
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((image_id, Ok(image))) => {
                    images.insert(image_id, image);
                }
                Ok((image_id, Err(e))) => {
                    warn!(image_id = %image_id, kind = ?kind, "Image fetch failed: {}", e);
                }
                Err(e) => {
                    warn!(kind = ?kind, "Image fetch task failed: {}", e);
                }
            }
        }

        debug!(
            event = "images_enriched",
            kind = ?kind,
            requested = requested,
            fetched = images.len(),
            limit = limit,
            "Image enrichment finished"
        );

        images
    }
}
