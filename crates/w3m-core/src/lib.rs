//! Wallet directory cache
//!
//! Drives the wallet directory for the connect modal:
//! - paginated listing and replace-on-response search
//! - concurrent, best-effort image enrichment
//! - a single-writer shared store read through immutable snapshots
//! - request epochs so stale responses never overwrite newer state

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod chains;
pub mod config;
pub mod controller;
pub mod epoch;
pub mod error;
pub mod images;
pub mod search;
pub mod store;

pub use chains::{find_chain, ChainPreset, ETH_CHAINS};
pub use config::{ModalConfig, DEFAULT_SDK_VERSION};
pub use controller::{DirectoryController, FetchOutcome, FETCH_FAILED_MESSAGE};
pub use epoch::{EpochCounter, EpochTicket};
pub use error::{Error, Result};
pub use images::{ImageCache, ImageEnricher, WalletImage, DEFAULT_MAX_IN_FLIGHT};
pub use search::{SearchDebouncer, MIN_SEARCH_LEN, SEARCH_DEBOUNCE};
pub use store::{Mutation, PageState, StoreHandle, StoreSnapshot, Toast};
pub use w3m_api::{ImageKind, WalletEntry};
