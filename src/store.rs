//! Key-value note storage with per-note expiry.

use crate::errors::ServerError;
use crate::models::note::{NoteMetadata, StoredNote};

pub mod memory;
pub mod postgres;

/// Storage consumed by the note handlers. Implementations own expiry: an
/// entry past `expires_at` is never returned, whether or not the sweeper
/// has run yet.
pub trait NoteStore: Send + Sync {
    /// Store `ciphertext` under `id`. The entry must be readable as soon as
    /// this returns.
    fn put(&self, id: &str, ciphertext: &str, metadata: &NoteMetadata) -> Result<(), ServerError>;

    /// Ciphertext and metadata in one call; `None` for ids that are unknown,
    /// expired or already deleted.
    fn get_with_metadata(&self, id: &str) -> Result<Option<StoredNote>, ServerError>;

    /// Idempotent removal. Returns whether an entry was actually removed,
    /// which doubles as the claim check for delete-after-read notes: of two
    /// racing readers only one sees `true`.
    fn delete(&self, id: &str) -> Result<bool, ServerError>;

    /// Drop every entry past its expiry, returning how many went.
    fn purge_expired(&self) -> Result<usize, ServerError>;
}
