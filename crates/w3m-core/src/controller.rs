//! Pagination / search controller
//!
//! Owns all writes to the shared store. Listing requests append pages,
//! search requests replace the result set, and both enrich images before
//! publishing. Each mode has its own epoch counter so a slower, older
//! response can never overwrite a newer one.

use crate::chains::ChainPreset;
use crate::config::ModalConfig;
use crate::epoch::{EpochCounter, EpochTicket};
use crate::images::ImageEnricher;
use crate::store::{Mutation, StoreHandle, Toast};
use crate::{Error, Result};
use std::sync::Arc;
use tracing::{debug, info, warn};
use w3m_api::{DirectoryQuery, DirectoryTransport, ImageKind, WalletEntry};

/// Toast shown when a directory request fails
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch wallets.";

/// Result of a controller request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Response published to the store
    Applied {
        /// Wallets in the response
        received: usize,
    },
    /// A newer request of the same mode superseded this one
    Stale,
    /// Every listing page is already loaded; nothing was requested
    Exhausted,
}

/// Wallet directory controller
pub struct DirectoryController {
    transport: Arc<dyn DirectoryTransport>,
    enricher: ImageEnricher,
    store: StoreHandle,
    config: ModalConfig,
    listing_epoch: EpochCounter,
    search_epoch: EpochCounter,
    featured_epoch: EpochCounter,
}

impl DirectoryController {
    /// Create a controller writing into `store`
    pub fn new(transport: Arc<dyn DirectoryTransport>, store: StoreHandle, config: ModalConfig) -> Self {
        let enricher = ImageEnricher::new(Arc::clone(&transport), config.max_image_concurrency);
        Self {
            transport,
            enricher,
            store,
            config,
            listing_epoch: EpochCounter::new(),
            search_epoch: EpochCounter::new(),
            featured_epoch: EpochCounter::new(),
        }
    }

    /// Store this controller publishes into
    pub fn store(&self) -> &StoreHandle {
        &self.store
    }

    /// "Fetch more": next listing page when `search` is empty, otherwise a search
    pub async fn fetch_wallets(&self, search: &str) -> Result<FetchOutcome> {
        if search.is_empty() {
            self.fetch_listing_page().await
        } else {
            self.fetch_search(search).await
        }
    }

    /// Fetch and append the next listing page.
    ///
    /// The loading flag is raised for the whole call and always lowered
    /// before returning. The page counter only moves when the response is
    /// applied.
    pub async fn fetch_listing_page(&self) -> Result<FetchOutcome> {
        self.store.set_loading_flag(true).await?;
        let result = self.load_listing_page().await;
        self.store.set_loading_flag(false).await?;
        self.report("listing", result).await
    }

    async fn load_listing_page(&self) -> Result<FetchOutcome> {
        let state = self.store.snapshot().page_state;
        let Some(page) = state.next_page() else {
            debug!(
                event = "listing_exhausted",
                page = state.page,
                total_pages = ?state.total_pages,
                "All listing pages loaded"
            );
            return Ok(FetchOutcome::Exhausted);
        };

        let ticket = self.listing_epoch.issue();
        let page_size = self.config.entries_per_page;
        let query = self.filtered(DirectoryQuery::page(page, page_size));
        let response = self.transport.fetch_wallets(&query).await?;

        self.merge_wallet_images(&response.data).await?;

        let received = response.data.len();
        let applied = self
            .store
            .commit(
                Some(ticket.clone()),
                vec![
                    Mutation::AppendWallets(response.data),
                    Mutation::ClearSearchResults,
                    Mutation::SetTotals {
                        page,
                        total_entries: response.count,
                        page_size,
                    },
                ],
            )
            .await?;

        Ok(self.outcome("listing", &ticket, applied, received, || {
            info!(
                event = "listing_page_applied",
                page = page,
                received = received,
                total_entries = response.count,
                "Listing page applied"
            );
        }))
    }

    /// Run a search and replace the search results.
    ///
    /// An empty term clears the results and cancels in-flight searches.
    pub async fn fetch_search(&self, term: &str) -> Result<FetchOutcome> {
        if term.is_empty() {
            self.search_epoch.invalidate();
            self.store.apply(vec![Mutation::ClearSearchResults]).await?;
            return Ok(FetchOutcome::Applied { received: 0 });
        }

        let result = self.load_search(term).await;
        self.report("search", result).await
    }

    async fn load_search(&self, term: &str) -> Result<FetchOutcome> {
        let ticket = self.search_epoch.issue();
        let query = self.filtered(DirectoryQuery::search(term, self.config.search_entries));
        let response = self.transport.fetch_wallets(&query).await?;

        self.merge_wallet_images(&response.data).await?;

        let received = response.data.len();
        let applied = self
            .store
            .commit(
                Some(ticket.clone()),
                vec![Mutation::SetSearchResults(response.data)],
            )
            .await?;

        Ok(self.outcome("search", &ticket, applied, received, || {
            info!(
                event = "search_applied",
                term = %term,
                received = received,
                "Search results applied"
            );
        }))
    }

    /// Fetch the featured wallets and the directory's total wallet count
    pub async fn fetch_featured(&self) -> Result<FetchOutcome> {
        let result = self.load_featured().await;
        self.report("featured", result).await
    }

    async fn load_featured(&self) -> Result<FetchOutcome> {
        let ticket = self.featured_epoch.issue();
        let query = self.filtered(DirectoryQuery::page(1, self.config.featured_entries));
        let response = self.transport.fetch_wallets(&query).await?;

        self.merge_wallet_images(&response.data).await?;

        let received = response.data.len();
        let applied = self
            .store
            .commit(
                Some(ticket.clone()),
                vec![Mutation::SetFeatured {
                    wallets: response.data,
                    total_count: response.count,
                }],
            )
            .await?;

        Ok(self.outcome("featured", &ticket, applied, received, || {
            info!(
                event = "featured_applied",
                received = received,
                total_wallets = response.count,
                "Featured wallets applied"
            );
        }))
    }

    /// Prefetch chain artwork into the chain image namespace.
    ///
    /// Returns the number of images fetched. Individual failures are
    /// dropped.
    pub async fn prefetch_chain_images(&self, chains: &[ChainPreset]) -> Result<usize> {
        let snapshot = self.store.snapshot();
        let images = self
            .enricher
            .enrich(
                ImageKind::Asset,
                chains.iter().map(|chain| chain.image_id),
                snapshot.images(ImageKind::Asset),
            )
            .await;

        let fetched = images.len();
        if fetched > 0 {
            self.store.merge_image_cache(ImageKind::Asset, images).await?;
        }
        debug!(event = "chain_images_prefetched", requested = chains.len(), fetched = fetched);
        Ok(fetched)
    }

    /// Drop the listing and search results and restart pagination.
    ///
    /// In-flight listing and search responses are discarded.
    pub async fn reset_listing(&self) -> Result<()> {
        self.listing_epoch.invalidate();
        self.search_epoch.invalidate();
        self.store.reset_listing().await?;
        info!(event = "listing_reset", "Listing reset");
        Ok(())
    }

    /// Discard every in-flight response; store contents are kept
    pub fn cancel(&self) {
        self.listing_epoch.invalidate();
        self.search_epoch.invalidate();
        self.featured_epoch.invalidate();
        debug!(event = "requests_cancelled", "In-flight directory requests cancelled");
    }

    fn filtered(&self, query: DirectoryQuery) -> DirectoryQuery {
        query.with_filters(
            &self.config.recommended_wallet_ids,
            &self.config.excluded_wallet_ids,
        )
    }

    async fn merge_wallet_images(&self, entries: &[WalletEntry]) -> Result<()> {
        let snapshot = self.store.snapshot();
        let images = self
            .enricher
            .enrich_wallets(entries, snapshot.images(ImageKind::Wallet))
            .await;
        if !images.is_empty() {
            self.store.merge_image_cache(ImageKind::Wallet, images).await?;
        }
        Ok(())
    }

    fn outcome(
        &self,
        mode: &'static str,
        ticket: &EpochTicket,
        applied: bool,
        received: usize,
        on_applied: impl FnOnce(),
    ) -> FetchOutcome {
        if applied {
            on_applied();
            FetchOutcome::Applied { received }
        } else {
            debug!(
                event = "response_superseded",
                mode = mode,
                epoch = ticket.value(),
                "Discarded superseded response"
            );
            FetchOutcome::Stale
        }
    }

    async fn report(&self, mode: &'static str, result: Result<FetchOutcome>) -> Result<FetchOutcome> {
        if let Err(Error::Directory(e)) = &result {
            warn!(
                event = "directory_fetch_failed",
                mode = mode,
                status = ?e.status(),
                "Directory request failed: {}",
                e
            );
            self.store
                .set_toast(Some(Toast::error(FETCH_FAILED_MESSAGE)))
                .await?;
        }
        result
    }
}
