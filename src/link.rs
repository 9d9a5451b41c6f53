//! Share-link composition and parsing.
//!
//! A note is shared as `<origin>/private-note/<id>#<secret>`. Browsers do
//! not send the fragment, so everything after `#` stays on the client; only
//! the id is visible to the server.

use derive_more::Display;

use crate::crypto::Secret;

/// Path under which notes are served and linked.
pub const NOTE_PATH: &str = "/private-note/";

#[derive(Debug, Display, PartialEq, Eq)]
pub enum LinkError {
    #[display(fmt = "share link has no '#<secret>' fragment")]
    MissingFragment,
    #[display(fmt = "share link does not point at a private note")]
    WrongPath,
    #[display(fmt = "share link has an empty note id")]
    MissingId,
}

impl std::error::Error for LinkError {}

#[derive(Debug)]
pub struct ShareLink {
    pub origin: String,
    pub id: String,
    pub secret: Secret,
}

/// Compose the link handed to the note's recipient.
pub fn compose(origin: &str, id: &str, secret: &Secret) -> String {
    format!(
        "{}{}{}#{}",
        origin.trim_end_matches('/'),
        NOTE_PATH,
        id,
        secret.expose()
    )
}

pub fn parse(url: &str) -> Result<ShareLink, LinkError> {
    let mut parts = url.splitn(2, '#');
    let base = parts.next().unwrap_or("");
    let fragment = parts.next().ok_or(LinkError::MissingFragment)?;
    if fragment.is_empty() {
        return Err(LinkError::MissingFragment);
    }

    let path_start = base.find(NOTE_PATH).ok_or(LinkError::WrongPath)?;
    let id = &base[path_start + NOTE_PATH.len()..];
    if id.is_empty() {
        return Err(LinkError::MissingId);
    }

    Ok(ShareLink {
        origin: base[..path_start].to_string(),
        id: id.to_string(),
        secret: Secret::new(fragment),
    })
}
