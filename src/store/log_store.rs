// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Serialized, observable log store
//!
//! All mutation happens on one dedicated worker thread that owns the record
//! list and applies commands strictly in submission order:
//!
//! ```text
//! append / clear ──┐                        ┌─▶ broadcast::Sender<StoreEvent>
//!                  ├─▶ mpsc ─▶ worker thread ┤
//! snapshot ────────┘    (FIFO)   Vec<Record> └─▶ callback observers
//! ```
//!
//! `append` and `clear` only enqueue. `snapshot` enqueues a read and waits for
//! the reply, so it sees every mutation submitted before it.

use std::cell::RefCell;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::thread::{self, JoinHandle, ThreadId};

use parking_lot::Mutex;
use tokio::sync::{broadcast, mpsc, oneshot};

use super::config::LogStoreConfig;
use super::observer::{ObserverRegistry, Observer, StoreEvent};
use super::snapshot::Snapshot;
use crate::error::Result;
use crate::network::LogRecord;

thread_local! {
    /// State being announced to callback observers on this worker thread
    static NOTIFYING: RefCell<Option<Snapshot>> = RefCell::new(None);
}

enum Command {
    Append(LogRecord),
    Clear,
    Snapshot(Reply),
}

enum Reply {
    Blocking(std::sync::mpsc::SyncSender<Snapshot>),
    Async(oneshot::Sender<Snapshot>),
}

impl Reply {
    fn send(self, snapshot: Snapshot) {
        // The caller may have given up waiting; nothing to do then.
        let _ = match self {
            Reply::Blocking(tx) => tx.send(snapshot).map_err(|_| ()),
            Reply::Async(tx) => tx.send(snapshot).map_err(|_| ()),
        };
    }
}

struct Shared {
    /// Taken on drop so the worker drains and exits
    commands: Option<mpsc::UnboundedSender<Command>>,
    events: broadcast::Sender<StoreEvent>,
    observers: Arc<ObserverRegistry>,
    worker: Mutex<Option<JoinHandle<()>>>,
    worker_id: ThreadId,
    next_record_id: AtomicU64,
    config: LogStoreConfig,
}

impl Shared {
    fn submit(&self, command: Command) -> bool {
        match self.commands {
            Some(ref tx) => tx.send(command).is_ok(),
            None => false,
        }
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        self.commands.take();

        // Joining from the worker itself (last handle dropped inside a
        // callback) would never return.
        if thread::current().id() == self.worker_id {
            return;
        }
        if let Some(handle) = self.worker.lock().take() {
            if handle.join().is_err() {
                tracing::error!("Log store worker panicked");
            }
        }
    }
}

/// Thread-safe, append-only log of recorded exchanges.
///
/// Handles are cheap to clone and all refer to the same store. The worker
/// thread stops once the last handle is dropped, after applying everything
/// that was already submitted.
///
/// # Example
///
/// ```rust,no_run
/// use loggie::{LogRecord, LogStore, LogStoreConfig, RequestInfo};
///
/// let store = LogStore::new(LogStoreConfig::default())?;
/// let _observer = store.observe(|event| println!("changed: {:?}", event));
///
/// store.append(LogRecord::new(1, RequestInfo::new("GET", "https://example.com/")));
/// assert_eq!(store.snapshot().len(), 1);
/// # Ok::<(), loggie::Error>(())
/// ```
#[derive(Clone)]
pub struct LogStore {
    shared: Arc<Shared>,
}

/// Non-owning store handle for producers.
///
/// Submissions through a weak handle are silently dropped once every
/// [`LogStore`] handle is gone.
#[derive(Clone)]
pub struct WeakLogStore {
    shared: Weak<Shared>,
}

impl LogStore {
    /// Create a store and start its worker thread
    pub fn new(config: LogStoreConfig) -> Result<Self> {
        let (commands, receiver) = mpsc::unbounded_channel();
        // The builder clamps this, a struct literal does not
        let (events, _) = broadcast::channel(config.channel_capacity.max(1));
        let observers = Arc::new(ObserverRegistry::default());

        let worker = Worker {
            receiver,
            records: Arc::new(Vec::new()),
            events: events.clone(),
            observers: observers.clone(),
            config: config.clone(),
        };

        let handle = thread::Builder::new()
            .name("loggie-store".to_string())
            .spawn(move || worker.run())?;

        Ok(Self {
            shared: Arc::new(Shared {
                commands: Some(commands),
                events,
                observers,
                worker_id: handle.thread().id(),
                worker: Mutex::new(Some(handle)),
                next_record_id: AtomicU64::new(1),
                config,
            }),
        })
    }

    /// Create a store with default configuration
    pub fn with_defaults() -> Result<Self> {
        Self::new(LogStoreConfig::default())
    }

    /// Submit a record. Returns immediately; the record is applied on the
    /// worker in submission order and observers are notified afterwards.
    pub fn append(&self, record: LogRecord) {
        if !self.shared.submit(Command::Append(record)) {
            tracing::warn!("Log store worker stopped, record dropped");
        }
    }

    /// Submit a clear. Ordered after everything submitted before it.
    pub fn clear(&self) {
        if !self.shared.submit(Command::Clear) {
            tracing::warn!("Log store worker stopped, clear ignored");
        }
    }

    /// Current records, including every mutation submitted before this call.
    ///
    /// Blocks until the worker reaches this request. Async callers should
    /// prefer [`snapshot_async`](Self::snapshot_async).
    ///
    /// Called from an [`observe`](Self::observe) callback, this returns the
    /// state being announced without waiting, so submissions made earlier in
    /// the same callback are not yet included.
    pub fn snapshot(&self) -> Snapshot {
        if self.on_worker() {
            return NOTIFYING.with(|n| n.borrow().clone()).unwrap_or_default();
        }

        let (tx, rx) = std::sync::mpsc::sync_channel(1);
        if !self.shared.submit(Command::Snapshot(Reply::Blocking(tx))) {
            tracing::warn!("Log store worker stopped, returning empty snapshot");
            return Snapshot::default();
        }
        rx.recv().unwrap_or_default()
    }

    /// Async variant of [`snapshot`](Self::snapshot) with the same ordering guarantee
    pub async fn snapshot_async(&self) -> Snapshot {
        if self.on_worker() {
            return NOTIFYING.with(|n| n.borrow().clone()).unwrap_or_default();
        }

        let (tx, rx) = oneshot::channel();
        if !self.shared.submit(Command::Snapshot(Reply::Async(tx))) {
            tracing::warn!("Log store worker stopped, returning empty snapshot");
            return Snapshot::default();
        }
        rx.await.unwrap_or_default()
    }

    /// Number of records after all pending submissions
    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    /// Check if the store is empty after all pending submissions
    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    /// Subscribe to change notifications. Drop the receiver to unsubscribe.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.shared.events.subscribe()
    }

    /// Register a callback run on the worker after each applied change.
    ///
    /// The callback may call [`snapshot`](Self::snapshot) on this store; it
    /// then sees the state being announced. Anything the callback itself
    /// appends or clears is applied after it returns, so such a snapshot
    /// does not include it. Waiting for it instead would deadlock the worker.
    ///
    /// Capture a [`WeakLogStore`] rather than a `LogStore` to avoid keeping
    /// the store alive forever.
    pub fn observe<F>(&self, callback: F) -> Observer
    where
        F: Fn(&StoreEvent) + Send + Sync + 'static,
    {
        self.shared.observers.register(Arc::new(callback))
    }

    /// Allocate a record id, unique across every producer of this store.
    /// Ids start at 1.
    pub fn next_record_id(&self) -> u64 {
        self.shared.next_record_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Number of registered callback observers
    pub fn observer_count(&self) -> usize {
        self.shared.observers.len()
    }

    /// Store configuration
    pub fn config(&self) -> &LogStoreConfig {
        &self.shared.config
    }

    /// Create a non-owning handle
    pub fn downgrade(&self) -> WeakLogStore {
        WeakLogStore {
            shared: Arc::downgrade(&self.shared),
        }
    }

    fn on_worker(&self) -> bool {
        thread::current().id() == self.shared.worker_id
    }
}

impl std::fmt::Debug for LogStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogStore")
            .field("config", &self.shared.config)
            .field("observers", &self.shared.observers.len())
            .finish()
    }
}

impl WeakLogStore {
    /// Upgrade to an owning handle if the store is still alive
    pub fn upgrade(&self) -> Option<LogStore> {
        self.shared.upgrade().map(|shared| LogStore { shared })
    }

    /// Append if the store is still alive, otherwise do nothing
    pub fn append(&self, record: LogRecord) {
        match self.upgrade() {
            Some(store) => store.append(record),
            None => tracing::trace!(id = record.id, "Log store gone, record discarded"),
        }
    }

    /// Clear if the store is still alive, otherwise do nothing
    pub fn clear(&self) {
        if let Some(store) = self.upgrade() {
            store.clear();
        }
    }

    /// Allocate a record id if the store is still alive
    pub fn next_record_id(&self) -> Option<u64> {
        self.upgrade().map(|store| store.next_record_id())
    }

    /// Snapshot if the store is still alive
    pub fn snapshot(&self) -> Option<Snapshot> {
        self.upgrade().map(|store| store.snapshot())
    }
}

impl std::fmt::Debug for WeakLogStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeakLogStore")
            .field("alive", &(self.shared.strong_count() > 0))
            .finish()
    }
}

/// Owns the records; lives on the store thread
struct Worker {
    receiver: mpsc::UnboundedReceiver<Command>,
    records: Arc<Vec<LogRecord>>,
    events: broadcast::Sender<StoreEvent>,
    observers: Arc<ObserverRegistry>,
    config: LogStoreConfig,
}

impl Worker {
    fn run(mut self) {
        tracing::debug!("Log store worker started");

        while let Some(command) = self.receiver.blocking_recv() {
            match command {
                Command::Append(record) => self.append(record),
                Command::Clear => self.clear(),
                Command::Snapshot(reply) => {
                    tracing::trace!(len = self.records.len(), "Snapshot");
                    reply.send(Snapshot::new(self.records.clone()));
                }
            }
        }

        tracing::debug!(len = self.records.len(), "Log store worker stopped");
    }

    fn append(&mut self, record: LogRecord) {
        let id = record.id;

        // Copies only if a snapshot still shares the current list
        let records = Arc::make_mut(&mut self.records);

        if let Some(max) = self.config.max_records {
            // The newest record is always kept
            let max = max.max(1);
            if records.len() >= max {
                let excess = records.len() + 1 - max;
                records.drain(..excess);
                tracing::debug!(evicted = excess, "Evicted oldest records");
            }
        }

        records.push(record);
        let len = records.len();

        tracing::debug!(id, len, "Record appended");
        self.notify(StoreEvent::Appended { id, len });
    }

    fn clear(&mut self) {
        let cleared = self.records.len();
        self.records = Arc::new(Vec::new());

        tracing::debug!(cleared, "Log store cleared");
        if self.config.notify_on_clear {
            self.notify(StoreEvent::Cleared);
        }
    }

    fn notify(&self, event: StoreEvent) {
        // No receivers is fine
        let _ = self.events.send(event);

        if self.observers.is_empty() {
            return;
        }

        NOTIFYING.with(|n| *n.borrow_mut() = Some(Snapshot::new(self.records.clone())));
        self.observers.notify(&event);
        NOTIFYING.with(|n| *n.borrow_mut() = None);
    }
}
