use std::collections::HashMap;
use std::sync::Mutex;

use crate::errors::ServerError;
use crate::models::note::{NoteMetadata, StoredNote};
use crate::utils::unix_now;

use super::NoteStore;

/// Ephemeral backend for local development and handler tests. Notes die
/// with the process; expiry semantics match the postgres backend.
#[derive(Default)]
pub struct MemStore {
    notes: Mutex<HashMap<String, StoredNote>>,
}

impl MemStore {
    pub fn new() -> Self {
        MemStore::default()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.notes.lock().expect("note table poisoned").is_empty()
    }
}

impl NoteStore for MemStore {
    fn put(&self, id: &str, ciphertext: &str, metadata: &NoteMetadata) -> Result<(), ServerError> {
        let mut notes = self.notes.lock().expect("note table poisoned");
        notes.insert(
            id.to_string(),
            StoredNote {
                ciphertext: ciphertext.to_string(),
                metadata: *metadata,
            },
        );
        Ok(())
    }

    fn get_with_metadata(&self, id: &str) -> Result<Option<StoredNote>, ServerError> {
        let mut notes = self.notes.lock().expect("note table poisoned");
        match notes.get(id) {
            Some(note) if note.metadata.expires_at <= unix_now() => {}
            Some(note) => return Ok(Some(note.clone())),
            None => return Ok(None),
        }

        // past expiry but not yet swept
        notes.remove(id);
        Ok(None)
    }

    fn delete(&self, id: &str) -> Result<bool, ServerError> {
        let mut notes = self.notes.lock().expect("note table poisoned");
        Ok(notes.remove(id).is_some())
    }

    fn purge_expired(&self) -> Result<usize, ServerError> {
        let now = unix_now();
        let mut notes = self.notes.lock().expect("note table poisoned");
        let before = notes.len();
        notes.retain(|_, note| note.metadata.expires_at > now);
        Ok(before - notes.len())
    }
}
