//! Wallet directory HTTP client
//!
//! Queries the remote wallet registry (paginated listing and search) and
//! fetches wallet / chain asset images. Every call carries the same
//! immutable [`CallerContext`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod client;
pub mod context;
pub mod error;
pub mod models;

pub use client::{DirectoryClient, DirectoryTransport, ImageKind, DEFAULT_API_URL};
pub use context::{CallerContext, DEFAULT_SDK_TYPE};
pub use error::{Error, Result};
pub use models::{AppMetadata, DirectoryQuery, WalletEntry, WalletPage};
