// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Details view model for a single log record
//!
//! Turns a [`LogRecord`] into titled sections of text items. A presentation
//! layer renders these however it likes; nothing here knows about layout.

use base64::Engine;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use super::record::{LogRecord, Outcome};

/// Which part of the exchange to describe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DetailsKind {
    /// Summary of the whole exchange
    Overview,
    /// Request headers, query and body
    Request,
    /// Response headers and body
    Response,
}

/// A titled group of items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailsSection {
    pub header: Option<String>,
    pub footer: Option<String>,
    pub items: Vec<DetailsItem>,
}

/// One displayable entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DetailsItem {
    /// Key/value row
    Subtitle { title: String, subtitle: String },
    /// Free-form text block (bodies, errors, placeholders)
    Raw(String),
}

impl DetailsSection {
    fn new(header: impl Into<String>) -> Self {
        Self {
            header: Some(header.into()),
            footer: None,
            items: Vec::new(),
        }
    }

    fn footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }

    fn subtitle(mut self, title: impl Into<String>, subtitle: impl Into<String>) -> Self {
        self.items.push(DetailsItem::Subtitle {
            title: title.into(),
            subtitle: subtitle.into(),
        });
        self
    }

    fn raw(mut self, text: impl Into<String>) -> Self {
        self.items.push(DetailsItem::Raw(text.into()));
        self
    }
}

impl LogRecord {
    /// Build the details sections for `kind`
    pub fn details(&self, kind: DetailsKind) -> Vec<DetailsSection> {
        match kind {
            DetailsKind::Overview => overview_sections(self),
            DetailsKind::Request => request_sections(self),
            DetailsKind::Response => response_sections(self),
        }
    }
}

fn overview_sections(record: &LogRecord) -> Vec<DetailsSection> {
    let status = match (record.outcome(), &record.response) {
        (Outcome::Pending, _) => "Pending".to_string(),
        (_, Some(r)) if record.error.is_none() => format!("{} {}", r.status, r.status_text)
            .trim_end()
            .to_string(),
        _ => "Error".to_string(),
    };

    let duration = record
        .duration_ms()
        .map(|ms| format!("{} ms", ms))
        .unwrap_or_else(|| "-".to_string());

    let response_size = record
        .response
        .as_ref()
        .map(|r| format_size(r.body_len()))
        .unwrap_or_else(|| "-".to_string());

    let mut sections = vec![DetailsSection::new("Overview")
        .subtitle("URL", record.request.url.as_str())
        .subtitle("Method", record.request.method.as_str())
        .subtitle("Status", status)
        .subtitle("Started", record.started_at.to_rfc3339())
        .subtitle("Duration", duration)
        .subtitle("Request size", format_size(record.request.body_len()))
        .subtitle("Response size", response_size)];

    if let Some(ref error) = record.error {
        sections.push(DetailsSection::new("Error").raw(error.as_str()));
    }

    sections
}

fn request_sections(record: &LogRecord) -> Vec<DetailsSection> {
    let request = &record.request;
    let mut sections = vec![headers_section(&request.headers)];

    if let Ok(url) = url::Url::parse(&request.url) {
        let pairs: Vec<_> = url.query_pairs().collect();
        if !pairs.is_empty() {
            let section = pairs
                .iter()
                .fold(DetailsSection::new("Query"), |s, (k, v)| s.subtitle(k.to_string(), v.to_string()));
            sections.push(section);
        }
    }

    sections.push(body_section(request.body.as_ref()));
    sections
}

fn response_sections(record: &LogRecord) -> Vec<DetailsSection> {
    match record.response {
        Some(ref response) => vec![
            headers_section(&response.headers),
            body_section(response.body.as_ref()),
        ],
        None => vec![DetailsSection::new("Response").raw("No response")],
    }
}

fn headers_section(headers: &[(String, String)]) -> DetailsSection {
    if headers.is_empty() {
        return DetailsSection::new("Headers").raw("No headers");
    }
    headers
        .iter()
        .fold(DetailsSection::new("Headers"), |s, (k, v)| s.subtitle(k.as_str(), v.as_str()))
}

fn body_section(body: Option<&Bytes>) -> DetailsSection {
    match body {
        Some(bytes) if !bytes.is_empty() => DetailsSection::new("Body")
            .raw(render_body(bytes))
            .footer(format_size(bytes.len())),
        _ => DetailsSection::new("Body").raw("No body"),
    }
}

/// JSON is pretty-printed, UTF-8 shown as-is, anything else as base64
fn render_body(bytes: &[u8]) -> String {
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(bytes) {
        if let Ok(pretty) = serde_json::to_string_pretty(&value) {
            return pretty;
        }
    }
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => base64::engine::general_purpose::STANDARD.encode(bytes),
    }
}

fn format_size(len: usize) -> String {
    format!("{} bytes", len)
}
