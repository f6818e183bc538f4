// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Recorded network exchanges
//!
//! Record types, their details view model, and the recording client that
//! produces them.

mod details;
mod record;
mod recorder;

pub use details::{DetailsItem, DetailsKind, DetailsSection};
pub use record::{LogRecord, Outcome, RequestInfo, ResponseInfo};
pub use recorder::{RecorderConfig, RecordingClient};
