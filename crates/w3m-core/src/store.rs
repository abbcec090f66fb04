//! Shared wallet store
//!
//! All writes go through one writer task fed by a command queue. Each batch
//! of mutations is applied atomically and published as a new immutable
//! [`StoreSnapshot`]; readers never observe a half-applied batch.

use crate::epoch::EpochTicket;
use crate::images::{ImageCache, WalletImage};
use crate::{Error, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::debug;
use w3m_api::{ImageKind, WalletEntry};

/// Listing pagination state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageState {
    /// Last applied page (0 before the first listing response)
    pub page: u32,
    /// Known page count; `None` until the first listing response
    pub total_pages: Option<u32>,
    /// Total wallets in the listing
    pub total_entries: u64,
}

impl PageState {
    /// Page the next listing request should ask for, if any remain
    pub fn next_page(&self) -> Option<u32> {
        match self.total_pages {
            Some(total) if self.page >= total => None,
            _ => Some(self.page.saturating_add(1)),
        }
    }

    /// True while the listing is not exhausted
    pub fn has_more(&self) -> bool {
        self.next_page().is_some()
    }
}

/// `ceil(total_entries / page_size)`
pub fn total_pages(total_entries: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    let pages = total_entries.div_ceil(u64::from(page_size));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Transient error notification for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    /// Message text
    pub message: String,
}

impl Toast {
    /// Error toast
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Immutable view of the store
#[derive(Debug, Clone, Default)]
pub struct StoreSnapshot {
    /// Full listing, in arrival order
    pub wallets: Arc<Vec<WalletEntry>>,
    /// Results of the active search
    pub searched_wallets: Arc<Vec<WalletEntry>>,
    /// Featured wallets
    pub featured_wallets: Arc<Vec<WalletEntry>>,
    /// Wallet count reported with the featured set
    pub total_wallets: u64,
    /// Wallet images by image id
    pub wallet_images: Arc<ImageCache>,
    /// Chain asset images by image id
    pub chain_images: Arc<ImageCache>,
    /// Listing pagination
    pub page_state: PageState,
    /// Last toast
    pub toast: Option<Toast>,
    /// Number of published batches
    pub version: u64,
    loading_depth: u32,
}

impl StoreSnapshot {
    /// True while at least one listing request is in flight
    pub fn is_loading(&self) -> bool {
        self.loading_depth > 0
    }

    /// Listing sorted by rank; ties keep arrival order
    pub fn wallets_by_order(&self) -> Vec<WalletEntry> {
        let mut wallets = self.wallets.as_ref().clone();
        wallets.sort_by_key(|wallet| wallet.order);
        wallets
    }

    /// Image namespace
    pub fn images(&self, kind: ImageKind) -> &ImageCache {
        match kind {
            ImageKind::Wallet => &self.wallet_images,
            ImageKind::Asset => &self.chain_images,
        }
    }

    /// Cached image for a wallet
    pub fn wallet_image(&self, wallet: &WalletEntry) -> Option<&WalletImage> {
        self.wallet_images.get(&wallet.image_id)
    }

    /// True while more listing pages remain
    pub fn has_more_pages(&self) -> bool {
        self.page_state.has_more()
    }

    fn apply(&mut self, mutation: Mutation) {
        match mutation {
            Mutation::AppendWallets(wallets) => {
                Arc::make_mut(&mut self.wallets).extend(wallets);
            }
            Mutation::SetSearchResults(wallets) => {
                self.searched_wallets = Arc::new(wallets);
            }
            Mutation::ClearSearchResults => {
                if !self.searched_wallets.is_empty() {
                    self.searched_wallets = Arc::new(Vec::new());
                }
            }
            Mutation::SetFeatured {
                wallets,
                total_count,
            } => {
                self.featured_wallets = Arc::new(wallets);
                self.total_wallets = total_count;
            }
            Mutation::MergeImages { kind, images } => {
                let cache = match kind {
                    ImageKind::Wallet => &mut self.wallet_images,
                    ImageKind::Asset => &mut self.chain_images,
                };
                Arc::make_mut(cache).extend(images);
            }
            Mutation::SetTotals {
                page,
                total_entries,
                page_size,
            } => {
                let pages = total_pages(total_entries, page_size);
                self.page_state = PageState {
                    page: page.min(pages),
                    total_pages: Some(pages),
                    total_entries,
                };
            }
            Mutation::SetLoading(true) => {
                self.loading_depth = self.loading_depth.saturating_add(1);
            }
            Mutation::SetLoading(false) => {
                self.loading_depth = self.loading_depth.saturating_sub(1);
            }
            Mutation::SetToast(toast) => {
                self.toast = toast;
            }
            Mutation::ResetListing => {
                self.wallets = Arc::new(Vec::new());
                self.searched_wallets = Arc::new(Vec::new());
                self.page_state = PageState::default();
            }
        }
    }
}

/// Store mutation
#[derive(Debug, Clone)]
pub enum Mutation {
    /// Append a listing page
    AppendWallets(Vec<WalletEntry>),
    /// Replace the search results
    SetSearchResults(Vec<WalletEntry>),
    /// Drop the search results
    ClearSearchResults,
    /// Replace the featured set
    SetFeatured {
        /// Featured wallets
        wallets: Vec<WalletEntry>,
        /// Total wallets in the directory
        total_count: u64,
    },
    /// Merge images into a namespace; incoming entries win
    MergeImages {
        /// Namespace
        kind: ImageKind,
        /// Images by id
        images: HashMap<String, WalletImage>,
    },
    /// Record the applied page and listing totals
    SetTotals {
        /// Page just applied
        page: u32,
        /// Total wallets in the listing
        total_entries: u64,
        /// Page size used for the listing
        page_size: u32,
    },
    /// Enter (`true`) or leave (`false`) a loading section
    SetLoading(bool),
    /// Replace the toast
    SetToast(Option<Toast>),
    /// Clear listing, search results and pagination
    ResetListing,
}

enum Command {
    Apply {
        ticket: Option<EpochTicket>,
        mutations: Vec<Mutation>,
        ack: oneshot::Sender<bool>,
    },
}

/// Handle to the shared store.
///
/// Cheap to clone. The writer task stops once every handle is dropped.
#[derive(Clone)]
pub struct StoreHandle {
    commands: mpsc::UnboundedSender<Command>,
    snapshots: watch::Receiver<Arc<StoreSnapshot>>,
}

impl StoreHandle {
    /// Start the writer task on the current tokio runtime
    pub fn spawn() -> Self {
        let (commands, queue) = mpsc::unbounded_channel();
        let (publisher, snapshots) = watch::channel(Arc::new(StoreSnapshot::default()));
        tokio::spawn(run_writer(queue, publisher));
        Self {
            commands,
            snapshots,
        }
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> Arc<StoreSnapshot> {
        self.snapshots.borrow().clone()
    }

    /// Receiver notified on every publish
    pub fn subscribe(&self) -> watch::Receiver<Arc<StoreSnapshot>> {
        self.snapshots.clone()
    }

    /// Apply a batch atomically
    pub async fn apply(&self, mutations: Vec<Mutation>) -> Result<()> {
        self.commit(None, mutations).await.map(|_| ())
    }

    /// Apply a batch only if `ticket` is still current when the writer
    /// reaches it. Returns whether the batch was applied.
    pub async fn commit(&self, ticket: Option<EpochTicket>, mutations: Vec<Mutation>) -> Result<bool> {
        let (ack, applied) = oneshot::channel();
        self.commands
            .send(Command::Apply {
                ticket,
                mutations,
                ack,
            })
            .map_err(|_| Error::StoreClosed)?;
        applied.await.map_err(|_| Error::StoreClosed)
    }

    /// Append a listing page
    pub async fn append_wallets(&self, wallets: Vec<WalletEntry>) -> Result<()> {
        self.apply(vec![Mutation::AppendWallets(wallets)]).await
    }

    /// Replace the search results
    pub async fn set_search_results(&self, wallets: Vec<WalletEntry>) -> Result<()> {
        self.apply(vec![Mutation::SetSearchResults(wallets)]).await
    }

    /// Merge images into a namespace
    pub async fn merge_image_cache(&self, kind: ImageKind, images: ImageCache) -> Result<()> {
        self.apply(vec![Mutation::MergeImages { kind, images }]).await
    }

    /// Enter or leave a loading section
    pub async fn set_loading_flag(&self, loading: bool) -> Result<()> {
        self.apply(vec![Mutation::SetLoading(loading)]).await
    }

    /// Record listing totals
    pub async fn set_totals(&self, page: u32, total_entries: u64, page_size: u32) -> Result<()> {
        self.apply(vec![Mutation::SetTotals {
            page,
            total_entries,
            page_size,
        }])
        .await
    }

    /// Replace the featured set
    pub async fn set_featured(&self, wallets: Vec<WalletEntry>, total_count: u64) -> Result<()> {
        self.apply(vec![Mutation::SetFeatured {
            wallets,
            total_count,
        }])
        .await
    }

    /// Replace the toast
    pub async fn set_toast(&self, toast: Option<Toast>) -> Result<()> {
        self.apply(vec![Mutation::SetToast(toast)]).await
    }

    /// Clear listing, search results and pagination
    pub async fn reset_listing(&self) -> Result<()> {
        self.apply(vec![Mutation::ResetListing]).await
    }
}

async fn run_writer(
    mut queue: mpsc::UnboundedReceiver<Command>,
    publisher: watch::Sender<Arc<StoreSnapshot>>,
) {
    let mut state = StoreSnapshot::default();

    while let Some(command) = queue.recv().await {
        match command {
            Command::Apply {
                ticket,
                mutations,
                ack,
            } => {
                let current = ticket.as_ref().map_or(true, EpochTicket::is_current);
                if current {
                    for mutation in mutations {
                        state.apply(mutation);
                    }
                    state.version += 1;
                    publisher.send_replace(Arc::new(state.clone()));
                } else {
                    debug!(
                        event = "store_update_discarded",
                        epoch = ticket.as_ref().map(EpochTicket::value),
                        "Discarding stale store update"
                    );
                }
                let _ = ack.send(current);
            }
        }
    }

    debug!("Store writer stopped");
}
