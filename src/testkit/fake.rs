//! Scripted implementations of the outbound ports.
//!
//! - [`ScriptedPoster`] - Hands out sequential container and post ids and
//!   fails chosen `create_container` calls.
//! - [`ScriptedSource`] - Replays feed snapshots or failures in order.
//! - [`RecordingCache`] - In-memory cache that counts listings and can
//!   refuse writes.
//! - [`FlakyLedger`] - In-memory ledger that can refuse inserts.
//! - [`RecordingNotifier`] - Captures every event.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::adapter::outbound::memory::{MemoryPostLedger, MemorySnapshotCache};
use crate::domain::{AlertId, ContainerId, PostDraft, PostId, SnapshotKey};
use crate::error::{Error, PostingError, PostingStage, Result};
use crate::port::{
    AlertSource, ApiFailure, ContainerOutcome, Event, FeedSnapshot, KeyPage, LedgerEntry,
    Notifier, PostLedger, PostingApi, PublishOutcome, SnapshotCache,
};

// ---------------------------------------------------------------------------
// ScriptedPoster
// ---------------------------------------------------------------------------

/// How a scripted `create_container` call fails.
#[derive(Debug, Clone)]
pub enum PosterFault {
    /// The platform answers with an error body.
    Rejected(ApiFailure),
    /// The request never completes.
    Transport(String),
    /// The platform refuses the credential.
    Unauthorized,
}

/// Posting API fake.
///
/// Container ids are `c1, c2, ...` and post ids `p1, p2, ...`, numbered by
/// call. Faults are keyed by the 1-based ordinal of the `create_container`
/// call they replace.
pub struct ScriptedPoster {
    faults: Mutex<HashMap<usize, PosterFault>>,
    drafts: Mutex<Vec<PostDraft>>,
    published: Mutex<Vec<PostId>>,
    creates: AtomicUsize,
    publishes: AtomicUsize,
}

impl ScriptedPoster {
    pub fn new() -> Self {
        Self {
            faults: Mutex::new(HashMap::new()),
            drafts: Mutex::new(Vec::new()),
            published: Mutex::new(Vec::new()),
            creates: AtomicUsize::new(0),
            publishes: AtomicUsize::new(0),
        }
    }

    /// Fail the `nth` container creation (1-based).
    pub fn failing_create(self, nth: usize, fault: PosterFault) -> Self {
        self.faults.lock().insert(nth, fault);
        self
    }

    /// Every draft passed to `create_container`, including failed ones.
    pub fn drafts(&self) -> Vec<PostDraft> {
        self.drafts.lock().clone()
    }

    /// Post ids handed out by successful publishes, in order.
    pub fn published_ids(&self) -> Vec<PostId> {
        self.published.lock().clone()
    }

    pub fn create_calls(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }
}

impl Default for ScriptedPoster {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PostingApi for ScriptedPoster {
    async fn create_container(&self, draft: &PostDraft) -> Result<ContainerOutcome> {
        let n = self.creates.fetch_add(1, Ordering::SeqCst) + 1;
        self.drafts.lock().push(draft.clone());
        match self.faults.lock().remove(&n) {
            None => Ok(ContainerOutcome::Created(ContainerId::new(format!("c{n}")))),
            Some(PosterFault::Rejected(failure)) => Ok(ContainerOutcome::Rejected(failure)),
            Some(PosterFault::Transport(reason)) => Err(Error::Connection(reason)),
            Some(PosterFault::Unauthorized) => Err(PostingError::Unauthorized {
                stage: PostingStage::CreateContainer,
                reason: "HTTP 401".to_string(),
            }
            .into()),
        }
    }

    async fn publish_container(&self, _container: &ContainerId) -> Result<PublishOutcome> {
        let n = self.publishes.fetch_add(1, Ordering::SeqCst) + 1;
        let post_id = PostId::new(format!("p{n}"));
        self.published.lock().push(post_id.clone());
        Ok(PublishOutcome::Published(post_id))
    }

    fn platform_name(&self) -> &'static str {
        "scripted"
    }
}

// ---------------------------------------------------------------------------
// ScriptedSource
// ---------------------------------------------------------------------------

/// Feed fake. Each `fetch` pops the next scripted result; the last one
/// repeats once the script runs out.
pub struct ScriptedSource {
    script: Mutex<VecDeque<std::result::Result<FeedSnapshot, String>>>,
    fetches: AtomicUsize,
}

impl ScriptedSource {
    pub fn new(snapshots: Vec<FeedSnapshot>) -> Self {
        Self {
            script: Mutex::new(snapshots.into_iter().map(Ok).collect()),
            fetches: AtomicUsize::new(0),
        }
    }

    /// A source whose every fetch fails with a connection error.
    pub fn failing(reason: &str) -> Self {
        Self {
            script: Mutex::new(VecDeque::from([Err(reason.to_string())])),
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AlertSource for ScriptedSource {
    async fn fetch(&self) -> Result<FeedSnapshot> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let mut script = self.script.lock();
        let next = if script.len() > 1 {
            script.pop_front()
        } else {
            script.front().cloned()
        };
        match next {
            Some(Ok(snapshot)) => Ok(snapshot),
            Some(Err(reason)) => Err(Error::Connection(reason)),
            None => Ok(FeedSnapshot::default()),
        }
    }

    fn source_name(&self) -> &'static str {
        "scripted"
    }
}

// ---------------------------------------------------------------------------
// RecordingCache
// ---------------------------------------------------------------------------

/// Snapshot cache that records listing cursors and counts writes.
pub struct RecordingCache {
    inner: MemorySnapshotCache,
    listings: Mutex<Vec<Option<String>>>,
    puts: AtomicUsize,
    refuse_puts: bool,
}

impl RecordingCache {
    pub fn new(page_size: usize) -> Self {
        Self {
            inner: MemorySnapshotCache::with_page_size(page_size),
            listings: Mutex::new(Vec::new()),
            puts: AtomicUsize::new(0),
            refuse_puts: false,
        }
    }

    /// Every `put` fails with a database error.
    pub fn refusing_puts(mut self) -> Self {
        self.refuse_puts = true;
        self
    }

    /// Store a value without counting it as a write.
    pub async fn seed(&self, key: &SnapshotKey, value: String) {
        let _ = self.inner.put(key, value).await;
    }

    /// Cursor passed to each `list_keys` call, in order.
    pub fn listings(&self) -> Vec<Option<String>> {
        self.listings.lock().clone()
    }

    pub fn puts(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[async_trait]
impl SnapshotCache for RecordingCache {
    async fn put(&self, key: &SnapshotKey, value: String) -> Result<()> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        if self.refuse_puts {
            return Err(Error::Database("disk I/O error".to_string()));
        }
        self.inner.put(key, value).await
    }

    async fn get(&self, key: &SnapshotKey) -> Result<Option<String>> {
        self.inner.get(key).await
    }

    async fn list_keys(&self, cursor: Option<&str>) -> Result<KeyPage> {
        self.listings.lock().push(cursor.map(str::to_string));
        self.inner.list_keys(cursor).await
    }

    fn page_size(&self) -> usize {
        self.inner.page_size()
    }
}

// ---------------------------------------------------------------------------
// FlakyLedger
// ---------------------------------------------------------------------------

/// Post ledger that can refuse inserts.
#[derive(Default)]
pub struct FlakyLedger {
    inner: MemoryPostLedger,
    refuse_inserts: bool,
}

impl FlakyLedger {
    pub fn refusing_inserts() -> Self {
        Self {
            inner: MemoryPostLedger::default(),
            refuse_inserts: true,
        }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[async_trait]
impl PostLedger for FlakyLedger {
    async fn find(&self, alert_id: &AlertId) -> Result<Option<LedgerEntry>> {
        self.inner.find(alert_id).await
    }

    async fn insert(&self, entry: &LedgerEntry) -> Result<bool> {
        if self.refuse_inserts {
            return Err(Error::Database("database is locked".to_string()));
        }
        self.inner.insert(entry).await
    }
}

// ---------------------------------------------------------------------------
// RecordingNotifier
// ---------------------------------------------------------------------------

/// Notifier that keeps every event. Clones share the same log.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    events: Arc<Mutex<Vec<Event>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().clone()
    }

    pub fn failures(&self) -> Vec<Event> {
        self.events().into_iter().filter(Event::is_failure).collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, event: Event) {
        self.events.lock().push(event);
    }
}
