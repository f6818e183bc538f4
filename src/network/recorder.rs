// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Recording HTTP client
//!
//! Performs requests through [`HttpClient`] and appends one [`LogRecord`] per
//! exchange to a [`LogStore`], failed exchanges included.

use std::time::Instant;

use chrono::Utc;

use super::record::{LogRecord, RequestInfo, ResponseInfo};
use crate::error::Result;
use crate::http::{HttpClient, Request, Response};
use crate::store::{LogStore, WeakLogStore};

/// What the recorder keeps from each exchange
#[derive(Debug, Clone)]
pub struct RecorderConfig {
    /// Capture request and response bodies
    pub capture_bodies: bool,
    /// Maximum body size to capture; longer bodies are truncated
    pub max_body_size: usize,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            capture_bodies: true,
            max_body_size: 1024 * 1024, // 1MB
        }
    }
}

impl RecorderConfig {
    fn body_limit(&self) -> Option<usize> {
        self.capture_bodies.then_some(self.max_body_size)
    }
}

/// HTTP client that logs every exchange it performs
#[derive(Clone)]
pub struct RecordingClient {
    /// HTTP client
    client: HttpClient,
    /// Destination store; recording stops silently once it is dropped.
    /// Record ids come from the store so they stay unique across clients.
    store: WeakLogStore,
    config: RecorderConfig,
}

impl RecordingClient {
    /// Create a recording client writing into `store`
    pub fn new(client: HttpClient, store: &LogStore) -> Self {
        Self {
            client,
            store: store.downgrade(),
            config: RecorderConfig::default(),
        }
    }

    /// Set recorder configuration
    pub fn with_config(mut self, config: RecorderConfig) -> Self {
        self.config = config;
        self
    }

    /// Set body capture settings
    pub fn capture_bodies(mut self, capture: bool, max_size: usize) -> Self {
        self.config.capture_bodies = capture;
        self.config.max_body_size = max_size;
        self
    }

    /// Execute a request and record the exchange
    pub async fn execute(&self, request: Request) -> Result<Response> {
        // Zero only when the store is gone and the record is discarded anyway
        let id = self.store.next_record_id().unwrap_or(0);
        let started_at = Utc::now();
        let start = Instant::now();
        let body_limit = self.config.body_limit();

        let request_info = RequestInfo::from_request(&request, body_limit);
        let method = request.method.clone();
        let url = request.url.clone();

        let result = self.client.execute(request).await;
        let duration = start.elapsed();

        let mut record = LogRecord::new(id, request_info)
            .with_started_at(started_at)
            .with_duration(duration);

        match &result {
            Ok(response) => {
                tracing::info!(
                    id,
                    method = %method,
                    url = %url,
                    status = response.status_code(),
                    time_ms = duration.as_millis() as u64,
                    "Response"
                );
                record = record.with_response(ResponseInfo::from_response(response, body_limit));
            }
            Err(e) => {
                tracing::warn!(id, method = %method, url = %url, error = %e, "Request failed");
                record = record.with_error(e.to_string());
            }
        }

        self.store.append(record);

        result
    }

    /// Execute a GET request
    pub async fn get(&self, url: &str) -> Result<Response> {
        self.execute(Request::get(url)?).await
    }

    /// Execute a POST request
    pub async fn post(&self, url: &str, body: impl Into<bytes::Bytes>) -> Result<Response> {
        self.execute(Request::post(url)?.body(body)).await
    }

    /// Execute multiple requests concurrently
    pub async fn execute_all(&self, requests: Vec<Request>) -> Vec<Result<Response>> {
        let futures: Vec<_> = requests.into_iter().map(|r| self.execute(r)).collect();
        futures::future::join_all(futures).await
    }

    /// Get HTTP client reference
    pub fn client(&self) -> &HttpClient {
        &self.client
    }

    /// Get the destination store handle
    pub fn store(&self) -> &WeakLogStore {
        &self.store
    }

    /// Get recorder configuration
    pub fn config(&self) -> &RecorderConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::network::Outcome;

    fn recorder(store: &LogStore) -> RecordingClient {
        RecordingClient::new(HttpClient::new().unwrap(), store)
    }

    #[tokio::test]
    async fn test_records_successful_exchange() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([{"id": 1, "name": "ana"}])),
            )
            .mount(&server)
            .await;

        let store = LogStore::with_defaults().unwrap();
        let client = recorder(&store);

        let response = client
            .get(&format!("{}/users?page=1", server.uri()))
            .await
            .unwrap();
        assert!(response.is_success());

        let snapshot = store.snapshot_async().await;
        assert_eq!(snapshot.len(), 1);

        let record = &snapshot[0];
        assert_eq!(record.id, 1);
        assert_eq!(record.title(), "GET /users");
        assert_eq!(record.outcome(), Outcome::Success);
        assert!(record.duration.is_some());

        let response_info = record.response.as_ref().unwrap();
        assert!(response_info.is_json());
        assert_eq!(response_info.body.as_ref(), Some(&response.body));
    }

    #[tokio::test]
    async fn test_records_failed_exchange() {
        let store = LogStore::with_defaults().unwrap();
        let client = recorder(&store);

        // Nothing listens on port 1
        let result = client.get("http://127.0.0.1:1/").await;
        assert!(result.is_err());

        let snapshot = store.snapshot_async().await;
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].outcome(), Outcome::Failure);
        assert!(snapshot[0].response.is_none());
        assert!(snapshot[0].error.is_some());
    }

    #[tokio::test]
    async fn test_body_capture_limits() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/upload"))
            .respond_with(ResponseTemplate::new(201).set_body_raw("created-resource", "text/plain"))
            .mount(&server)
            .await;

        let store = LogStore::with_defaults().unwrap();
        let url = format!("{}/upload", server.uri());

        let truncating = recorder(&store).capture_bodies(true, 4);
        truncating.post(&url, "0123456789").await.unwrap();

        let bodiless = recorder(&store).capture_bodies(false, 4);
        bodiless.post(&url, "0123456789").await.unwrap();

        let snapshot = store.snapshot_async().await;
        assert_eq!(snapshot.len(), 2);

        let truncated = &snapshot[0];
        assert_eq!(truncated.request.body.as_deref(), Some(&b"0123"[..]));
        assert_eq!(
            truncated.response.as_ref().and_then(|r| r.body.as_deref()),
            Some(&b"crea"[..])
        );
        assert_eq!(truncated.status(), Some(201));

        let ids: Vec<u64> = snapshot.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2]);

        let skipped = &snapshot[1];
        assert!(skipped.request.body.is_none());
        assert!(skipped.response.as_ref().unwrap().body.is_none());
    }

    #[tokio::test]
    async fn test_execute_all_records_each_exchange() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let store = LogStore::with_defaults().unwrap();
        let client = recorder(&store);

        let requests = (0..3)
            .map(|i| Request::get(format!("{}/item/{}", server.uri(), i)).unwrap())
            .collect();
        let results = client.execute_all(requests).await;
        assert!(results.iter().all(|r| r.is_ok()));

        let mut ids: Vec<u64> = store.snapshot_async().await.iter().map(|r| r.id).collect();
        ids.sort();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_recording_stops_quietly_when_store_dropped() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let store = LogStore::with_defaults().unwrap();
        let client = recorder(&store);
        drop(store);

        let response = client.get(&server.uri()).await.unwrap();
        assert_eq!(response.status_code(), 200);
        assert!(client.store().upgrade().is_none());
    }
}
