//! Session notes, stored under `notes`.
//!
//! The stored list is append-only in chronological order. Listings are
//! newest-first but keep each note's original index, which is what
//! deletion takes.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};
use crate::storage::keys;
use crate::storage::kv::{self, KvStore};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub text: String,
    pub timestamp: DateTime<Utc>,
    /// Session the note was written in (completed sessions + 1).
    pub session_number: u64,
}

/// A note together with its position in the stored list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexedNote {
    pub index: usize,
    #[serde(flatten)]
    pub note: Note,
}

#[derive(Clone)]
pub struct NoteLog {
    store: Arc<dyn KvStore>,
}

impl NoteLog {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    async fn load(&self) -> Result<Vec<Note>> {
        kv::load_or_default(&*self.store, keys::NOTES).await
    }

    pub async fn add(&self, text: &str, session_number: u64, now: DateTime<Utc>) -> Result<Note> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ValidationError::EmptyText("Note".into()).into());
        }
        let note = Note {
            text: text.to_string(),
            timestamp: now,
            session_number,
        };
        let mut notes = self.load().await?;
        notes.push(note.clone());
        kv::save(&*self.store, keys::NOTES, &notes).await?;
        Ok(note)
    }

    /// All notes, newest first.
    pub async fn newest_first(&self) -> Result<Vec<IndexedNote>> {
        let notes = self.load().await?;
        Ok(notes
            .into_iter()
            .enumerate()
            .rev()
            .map(|(index, note)| IndexedNote { index, note })
            .collect())
    }

    /// Delete by original (chronological) index.
    pub async fn delete(&self, index: usize) -> Result<Note> {
        let mut notes = self.load().await?;
        if index >= notes.len() {
            return Err(ValidationError::OutOfBounds {
                collection: "notes".into(),
                index,
                len: notes.len(),
            }
            .into());
        }
        let removed = notes.remove(index);
        kv::save(&*self.store, keys::NOTES, &notes).await?;
        Ok(removed)
    }
}
