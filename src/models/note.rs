use serde_derive::{Deserialize, Serialize};
use std::time::Duration;

/// Expiry choices offered when creating a note. The wire ids are the
/// lifetime in hours, except `"0"` which means delete-after-read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExpirySelection {
    AfterReading,
    OneHour,
    OneDay,
    OneWeek,
    OneMonth,
}

impl ExpirySelection {
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "0" => Some(ExpirySelection::AfterReading),
            "1" => Some(ExpirySelection::OneHour),
            "24" => Some(ExpirySelection::OneDay),
            "168" => Some(ExpirySelection::OneWeek),
            "720" => Some(ExpirySelection::OneMonth),
            _ => None,
        }
    }

    pub fn ttl(&self) -> Duration {
        match self {
            // burn notes keep a 30 day backstop in the store
            ExpirySelection::AfterReading => Duration::from_secs(2_592_000),
            ExpirySelection::OneHour => Duration::from_secs(3_600),
            ExpirySelection::OneDay => Duration::from_secs(86_400),
            ExpirySelection::OneWeek => Duration::from_secs(604_800),
            ExpirySelection::OneMonth => Duration::from_secs(2_592_000),
        }
    }

    pub fn delete_after_read(&self) -> bool {
        matches!(self, ExpirySelection::AfterReading)
    }
}

/// Everything the store keeps next to the ciphertext.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NoteMetadata {
    /// Absolute expiry, epoch seconds.
    pub expires_at: u64,
    pub delete_after_read: bool,
}

#[derive(Clone, Debug)]
pub struct StoredNote {
    pub ciphertext: String,
    pub metadata: NoteMetadata,
}

#[derive(Clone, Deserialize)]
pub struct NewNote {
    pub ciphertext: String,
    pub expires_in: String,
}

#[derive(Deserialize)]
pub struct ReadNote {
    pub confirm: Option<bool>,
}

#[derive(Clone, Serialize)]
pub struct NoteCreated {
    pub id: String,
}
