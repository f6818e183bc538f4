// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! In-memory log store
//!
//! Accumulates [`LogRecord`](crate::network::LogRecord)s from any number of
//! producers, hands out consistent snapshots and tells observers when the
//! contents change.

mod config;
mod log_store;
mod observer;
mod snapshot;

pub use config::{LogStoreConfig, DEFAULT_CHANNEL_CAPACITY};
pub use log_store::{LogStore, WeakLogStore};
pub use observer::{ChangeCallback, Observer, StoreEvent};
pub use snapshot::Snapshot;
