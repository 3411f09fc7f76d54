//! Request-scoped story contexts
//!
//! A [`StoryContext`] bundles one validated request with the story generated
//! for it. Contexts are immutable; starting over means building a new one.
//! Derived artifacts such as exported PDFs are memoized per context in an
//! [`ArtifactCache`].

use crate::error::{PrintError, Result};
use crate::story::request::StoryRequest;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

static NEXT_CONTEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a story context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ContextId(u64);

impl ContextId {
    fn next() -> Self {
        Self(NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One trip: the request and the story written for it
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StoryContext {
    id: ContextId,
    request: StoryRequest,
    story: String,
    created_at: DateTime<Utc>,
}

impl StoryContext {
    /// Validate the request and bind it to `story` under a fresh identity
    pub fn new(request: StoryRequest, story: impl Into<String>) -> Result<Self> {
        let request = request.validated()?;
        let story = story.into();
        if story.trim().is_empty() {
            return Err(PrintError::InvalidRequest("story text is empty".to_string()));
        }

        Ok(Self {
            id: ContextId::next(),
            request,
            story,
            created_at: Utc::now(),
        })
    }

    pub fn id(&self) -> ContextId {
        self.id
    }

    pub fn request(&self) -> &StoryRequest {
        &self.request
    }

    pub fn story(&self) -> &str {
        &self.story
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Title printed on the exported story
    pub fn title(&self) -> String {
        self.request.title()
    }
}

/// Memo of derived artifacts keyed by context identity
#[derive(Debug)]
pub struct ArtifactCache<V> {
    entries: Mutex<HashMap<ContextId, Arc<V>>>,
}

impl<V> Default for ArtifactCache<V> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl<V> ArtifactCache<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: ContextId) -> Option<Arc<V>> {
        self.lock().get(&id).cloned()
    }

    /// Return the artifact for `id`, producing it with `produce` on a miss.
    ///
    /// The lock is held while producing, so `produce` runs at most once per id
    /// as long as it succeeds. Errors are returned and nothing is cached.
    pub fn get_or_try_insert_with<F>(&self, id: ContextId, produce: F) -> Result<Arc<V>>
    where
        F: FnOnce() -> Result<V>,
    {
        let mut entries = self.lock();
        if let Some(value) = entries.get(&id) {
            tracing::trace!(context = %id, "artifact cache hit");
            return Ok(Arc::clone(value));
        }

        let value = Arc::new(produce()?);
        entries.insert(id, Arc::clone(&value));
        tracing::debug!(context = %id, "artifact cached");
        Ok(value)
    }

    /// Drop the artifact of `id`, returning whether one was cached
    pub fn invalidate(&self, id: ContextId) -> bool {
        self.lock().remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<ContextId, Arc<V>>> {
        // a panic inside `produce` leaves the map itself consistent
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
