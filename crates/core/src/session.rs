//! The single in-memory study session.
//!
//! Notes live in an immutable snapshot behind an `Arc`. An upload builds
//! the complete snapshot first and then publishes it with one swap, so a
//! concurrent voice turn sees either the old pair or the new pair of
//! (text, summary), never text from one upload with the summary of another.
//! Nothing survives a restart.

use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Clone, PartialEq)]
pub struct NotesSnapshot {
    pub raw_text: String,
    pub summary: String,
    pub filename: String,
    pub word_count: usize,
}

#[derive(Debug, Default)]
pub struct SessionStore {
    current: RwLock<Option<Arc<NotesSnapshot>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a new snapshot. Last writer wins.
    pub async fn replace(&self, snapshot: NotesSnapshot) {
        let mut current = self.current.write().await;
        *current = Some(Arc::new(snapshot));
    }

    /// The currently published snapshot, if notes have been uploaded.
    /// The returned `Arc` stays coherent even if a replace happens while
    /// the caller is still using it.
    pub async fn snapshot(&self) -> Option<Arc<NotesSnapshot>> {
        self.current.read().await.clone()
    }
}
