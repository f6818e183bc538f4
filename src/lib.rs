// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! # Loggie - In-process network traffic logger
//!
//! Records HTTP exchanges and keeps them in an observable, thread-safe log
//! store for debugging and in-app inspection.
//!
//! ## Features
//!
//! - Serialized log store: appends and clears applied in submission order
//! - Consistent snapshots that never see a half-applied change
//! - Change notifications via broadcast channel or callback observers
//! - Recording HTTP client that logs every exchange, failures included
//! - Details view model (overview / request / response sections)
//! - JSON export of snapshots
//!
//! ## Example
//!
//! ```rust,no_run
//! use loggie::{HttpClient, LogStore, RecordingClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = LogStore::with_defaults()?;
//!     let mut changes = store.subscribe();
//!
//!     let client = RecordingClient::new(HttpClient::new()?, &store);
//!     client.get("https://example.com").await?;
//!
//!     changes.recv().await?;
//!     for record in store.snapshot_async().await.iter() {
//!         println!("{} -> {:?}", record.title(), record.status());
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod http;
pub mod network;
pub mod store;

// Errors
pub use error::{Error, Result};

// HTTP
pub use http::{HttpClient, HttpClientConfig, Request, Response};

// Records
pub use network::{DetailsItem, DetailsKind, DetailsSection};
pub use network::{LogRecord, Outcome, RequestInfo, ResponseInfo};
pub use network::{RecorderConfig, RecordingClient};

// Store
pub use store::{LogStore, LogStoreConfig, Observer, Snapshot, StoreEvent, WeakLogStore};

/// Loggie version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
