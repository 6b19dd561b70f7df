// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The blob-storage collaborator seam for scan media.
//!
//! The core only needs `store(bytes, content type, context) -> URI`;
//! real object storage lives behind this trait in the deployment. Media
//! is persisted before any database write, so a storage failure aborts
//! the scan with nothing recorded.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use thiserror::Error;

/// Errors a media storage backend can report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MediaStorageError {
    /// The backend is unreachable or out of capacity.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
    /// The backend rejected the object (size, type, policy).
    #[error("Storage rejected object: {0}")]
    Rejected(String),
}

/// Ownership context recorded alongside a stored object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaContext {
    /// The scanning officer.
    pub user_id: i64,
    /// The assignment the scan progresses.
    pub assignment_id: i64,
    /// The scanned checkpoint.
    pub checkpoint_id: i64,
}

/// Blob storage for scan-attached media.
pub trait MediaStorage: Send + Sync {
    /// Stores one object and returns its opaque URI.
    ///
    /// # Errors
    ///
    /// Returns an error if the object cannot be stored; the caller aborts
    /// the scan in that case.
    fn store(
        &self,
        data: &[u8],
        content_type: &str,
        context: &MediaContext,
    ) -> Result<String, MediaStorageError>;
}

/// An object held by [`InMemoryMediaStorage`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMediaObject {
    /// The assigned URI.
    pub uri: String,
    /// The declared content type.
    pub content_type: String,
    /// The stored bytes.
    pub data: Vec<u8>,
    /// The ownership context.
    pub context: MediaContext,
}

/// In-memory media storage.
///
/// Backs tests and standalone deployments without object storage. Can be
/// switched into a failing mode to exercise the abort path.
pub struct InMemoryMediaStorage {
    objects: Mutex<Vec<StoredMediaObject>>,
    counter: AtomicU64,
    failing: AtomicBool,
}

impl InMemoryMediaStorage {
    /// Creates an empty in-memory store.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            objects: Mutex::new(Vec::new()),
            counter: AtomicU64::new(0),
            failing: AtomicBool::new(false),
        }
    }

    /// Switches the store into (or out of) failing mode.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Returns the number of stored objects.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn stored_count(&self) -> usize {
        self.objects.lock().map(|objects| objects.len()).unwrap_or(0)
    }
}

impl Default for InMemoryMediaStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaStorage for InMemoryMediaStorage {
    fn store(
        &self,
        data: &[u8],
        content_type: &str,
        context: &MediaContext,
    ) -> Result<String, MediaStorageError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(MediaStorageError::Unavailable(String::from(
                "In-memory storage is in failing mode",
            )));
        }

        let object_id: u64 = self.counter.fetch_add(1, Ordering::SeqCst);
        let uri: String = format!(
            "mem://scans/{}/{}/{object_id}",
            context.assignment_id, context.checkpoint_id
        );
        let object = StoredMediaObject {
            uri: uri.clone(),
            content_type: content_type.to_string(),
            data: data.to_vec(),
            context: *context,
        };
        self.objects
            .lock()
            .map_err(|_| MediaStorageError::Unavailable(String::from("Storage lock poisoned")))?
            .push(object);
        Ok(uri)
    }
}
