// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Log record types
//!
//! A [`LogRecord`] describes one observed HTTP exchange. Records are built by
//! the producer (usually [`RecordingClient`](super::RecordingClient)) and are
//! never mutated once handed to the store.

use std::time::Duration;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::http::{Request, Response};

/// One recorded HTTP exchange
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Producer-assigned sequence number
    pub id: u64,
    /// When the request was sent
    pub started_at: DateTime<Utc>,
    /// Request information
    pub request: RequestInfo,
    /// Response information (absent on transport failure)
    pub response: Option<ResponseInfo>,
    /// Time from send until the response body was received
    pub duration: Option<Duration>,
    /// Transport error message if the exchange failed
    pub error: Option<String>,
}

/// Coarse outcome of an exchange, used for list display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Neither a response nor an error has been recorded
    Pending,
    /// 2xx response
    Success,
    /// Transport error or non-2xx response
    Failure,
}

/// Request information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestInfo {
    /// HTTP method
    pub method: String,
    /// Request URL
    pub url: String,
    /// Request headers in send order
    pub headers: Vec<(String, String)>,
    /// Request body (possibly truncated)
    #[serde(with = "body_base64", default)]
    pub body: Option<Bytes>,
}

/// Response information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseInfo {
    /// Status code
    pub status: u16,
    /// Canonical reason phrase
    pub status_text: String,
    /// Final URL after redirects
    pub url: String,
    /// Response headers in receive order
    pub headers: Vec<(String, String)>,
    /// Response body (possibly truncated)
    #[serde(with = "body_base64", default)]
    pub body: Option<Bytes>,
    /// MIME type from the content-type header, without parameters
    pub mime_type: Option<String>,
}

impl LogRecord {
    /// Create a record for a request that was just sent
    pub fn new(id: u64, request: RequestInfo) -> Self {
        Self {
            id,
            started_at: Utc::now(),
            request,
            response: None,
            duration: None,
            error: None,
        }
    }

    /// Set start time
    pub fn with_started_at(mut self, started_at: DateTime<Utc>) -> Self {
        self.started_at = started_at;
        self
    }

    /// Set response
    pub fn with_response(mut self, response: ResponseInfo) -> Self {
        self.response = Some(response);
        self
    }

    /// Set duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Set error
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Short title: method followed by the URL path
    pub fn title(&self) -> String {
        let path = url::Url::parse(&self.request.url)
            .map(|u| u.path().to_string())
            .unwrap_or_else(|_| self.request.url.clone());
        format!("{} {}", self.request.method, path)
    }

    /// Host of the request URL
    pub fn host(&self) -> Option<String> {
        url::Url::parse(&self.request.url)
            .ok()
            .and_then(|u| u.host_str().map(String::from))
    }

    /// Response status code, if a response was received
    pub fn status(&self) -> Option<u16> {
        self.response.as_ref().map(|r| r.status)
    }

    /// Coarse outcome of the exchange
    pub fn outcome(&self) -> Outcome {
        match (&self.response, &self.error) {
            (_, Some(_)) => Outcome::Failure,
            (Some(r), None) if (200..300).contains(&r.status) => Outcome::Success,
            (Some(_), None) => Outcome::Failure,
            (None, None) => Outcome::Pending,
        }
    }

    /// Check if the exchange completed with a 2xx response
    pub fn is_success(&self) -> bool {
        self.outcome() == Outcome::Success
    }

    /// Duration in milliseconds
    pub fn duration_ms(&self) -> Option<u64> {
        self.duration.map(|d| d.as_millis() as u64)
    }
}

impl RequestInfo {
    /// Create a new request info
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Capture an outgoing request, truncating the body to `max_body_size`
    pub fn from_request(request: &Request, max_body_size: Option<usize>) -> Self {
        Self {
            method: request.method.to_string(),
            url: request.url.to_string(),
            headers: header_pairs(&request.headers),
            body: request
                .body
                .as_ref()
                .and_then(|b| max_body_size.map(|max| b.slice(..b.len().min(max)))),
        }
    }

    /// Add header
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Add body
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Body size in bytes
    pub fn body_len(&self) -> usize {
        self.body.as_ref().map(|b| b.len()).unwrap_or(0)
    }
}

impl ResponseInfo {
    /// Create a new response info
    pub fn new(status: u16, url: impl Into<String>) -> Self {
        Self {
            status,
            status_text: reqwest::StatusCode::from_u16(status)
                .ok()
                .and_then(|s| s.canonical_reason())
                .unwrap_or("")
                .to_string(),
            url: url.into(),
            headers: Vec::new(),
            body: None,
            mime_type: None,
        }
    }

    /// Capture a received response, truncating the body to `max_body_size`
    pub fn from_response(response: &Response, max_body_size: Option<usize>) -> Self {
        Self {
            status: response.status.as_u16(),
            status_text: response
                .status
                .canonical_reason()
                .unwrap_or("")
                .to_string(),
            url: response.url.to_string(),
            headers: header_pairs(&response.headers),
            body: max_body_size.map(|max| response.body.slice(..response.body.len().min(max))),
            mime_type: response.content_type().map(mime_type_of),
        }
    }

    /// Add header. Setting content-type also sets the MIME type.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        if name.eq_ignore_ascii_case("content-type") {
            self.mime_type = Some(mime_type_of(&value));
        }
        self.headers.push((name, value));
        self
    }

    /// Add body
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Body size in bytes
    pub fn body_len(&self) -> usize {
        self.body.as_ref().map(|b| b.len()).unwrap_or(0)
    }

    /// Check if response is JSON
    pub fn is_json(&self) -> bool {
        self.mime_type
            .as_deref()
            .map(|m| m == "application/json" || m.ends_with("+json"))
            .unwrap_or(false)
    }
}

fn header_pairs(headers: &reqwest::header::HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(k, v)| (k.to_string(), String::from_utf8_lossy(v.as_bytes()).into_owned()))
        .collect()
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

fn mime_type_of(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase()
}

/// Bodies travel as base64 strings in JSON exports
mod body_base64 {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use bytes::Bytes;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(body: &Option<Bytes>, serializer: S) -> Result<S::Ok, S::Error> {
        match body {
            Some(bytes) => serializer.serialize_some(&STANDARD.encode(bytes)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Bytes>, D::Error> {
        let encoded: Option<String> = Option::deserialize(deserializer)?;
        encoded
            .map(|s| {
                STANDARD
                    .decode(s.as_bytes())
                    .map(Bytes::from)
                    .map_err(serde::de::Error::custom)
            })
            .transpose()
    }
}
