//! Client-side sealing of note content.
//!
//! The server only ever stores what comes out of [`encrypt`]; the secret
//! stays in the share link's URL fragment. A key is derived from the secret
//! with PBKDF2-HMAC-SHA256 over a fresh 16-byte salt, and the UTF-8
//! plaintext is sealed with AES-256-GCM under a fresh 12-byte nonce.
//! Transport layout: `base64(salt || nonce || ciphertext+tag)`.

use std::num::NonZeroU32;

use derive_more::Display;
use rand::{distributions::Alphanumeric, Rng};
use ring::aead::{Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM};
use ring::pbkdf2;
use ring::rand::{SecureRandom, SystemRandom};

use crate::encoding;

pub const SALT_LEN: usize = 16;
pub const NONCE_LEN: usize = 12;
const KEY_LEN: usize = 32;
const SECRET_LEN: usize = 16;
const PBKDF2_ITERATIONS: u32 = 100_000;

#[derive(Debug, Display)]
pub enum CryptoError {
    #[display(fmt = "decryption failed, wrong secret or tampered ciphertext")]
    Decryption,
    #[display(fmt = "transport string is not a sealed note")]
    MalformedTransport,
    #[display(fmt = "key setup failed")]
    KeyDerivation,
    #[display(fmt = "encryption failed")]
    Encryption,
    #[display(fmt = "system randomness unavailable")]
    Rng,
}

impl std::error::Error for CryptoError {}

/// The fragment secret. Never serialized, never displayed; the raw token is
/// only reachable from the crypto and link modules, so it cannot end up in a
/// request body or a log line.
pub struct Secret(String);

impl Secret {
    /// Fresh random alphanumeric token for a new note.
    pub fn generate() -> Self {
        let token: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(SECRET_LEN)
            .map(char::from)
            .collect();
        Secret(token)
    }

    /// Wrap a token recovered from a URL fragment.
    pub fn new(token: impl Into<String>) -> Self {
        Secret(token.into())
    }

    pub(crate) fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Secret(..)")
    }
}

/// Deterministic for a given `(secret, salt)` pair; every encryption binds
/// a fresh salt so no key is ever reused across notes.
fn derive_key(secret: &Secret, salt: &[u8]) -> Result<LessSafeKey, CryptoError> {
    let mut key = [0u8; KEY_LEN];
    pbkdf2::derive(
        pbkdf2::PBKDF2_HMAC_SHA256,
        NonZeroU32::new(PBKDF2_ITERATIONS).expect("iteration count is non-zero"),
        salt,
        secret.expose().as_bytes(),
        &mut key,
    );

    let unbound = UnboundKey::new(&AES_256_GCM, &key).map_err(|_| CryptoError::KeyDerivation)?;
    Ok(LessSafeKey::new(unbound))
}

/// Seal `plaintext` under `secret` and return the transport string.
/// Two calls with identical input never produce the same output.
pub fn encrypt(plaintext: &str, secret: &Secret) -> Result<String, CryptoError> {
    let rng = SystemRandom::new();

    let mut salt = [0u8; SALT_LEN];
    rng.fill(&mut salt).map_err(|_| CryptoError::Rng)?;
    let mut nonce_bytes = [0u8; NONCE_LEN];
    rng.fill(&mut nonce_bytes).map_err(|_| CryptoError::Rng)?;

    let key = derive_key(secret, &salt)?;
    let mut sealed = plaintext.as_bytes().to_vec();
    key.seal_in_place_append_tag(
        Nonce::assume_unique_for_key(nonce_bytes),
        Aad::empty(),
        &mut sealed,
    )
    .map_err(|_| CryptoError::Encryption)?;

    let mut blob = Vec::with_capacity(SALT_LEN + NONCE_LEN + sealed.len());
    blob.extend_from_slice(&salt);
    blob.extend_from_slice(&nonce_bytes);
    blob.extend_from_slice(&sealed);
    Ok(encoding::encode(&blob))
}

/// Open a transport string produced by [`encrypt`]. A failure here means a
/// wrong secret or a damaged blob, which callers must keep distinct from a
/// note that does not exist.
pub fn decrypt(transport: &str, secret: &Secret) -> Result<String, CryptoError> {
    let blob = encoding::decode(transport).map_err(|_| CryptoError::MalformedTransport)?;
    if blob.len() < SALT_LEN + NONCE_LEN + AES_256_GCM.tag_len() {
        return Err(CryptoError::MalformedTransport);
    }

    let (salt, rest) = blob.split_at(SALT_LEN);
    let (nonce_bytes, ciphertext) = rest.split_at(NONCE_LEN);
    let nonce =
        Nonce::try_assume_unique_for_key(nonce_bytes).map_err(|_| CryptoError::MalformedTransport)?;

    let key = derive_key(secret, salt)?;
    let mut opened = ciphertext.to_vec();
    let plaintext = key
        .open_in_place(nonce, Aad::empty(), &mut opened)
        .map_err(|_| CryptoError::Decryption)?;

    String::from_utf8(plaintext.to_vec()).map_err(|_| CryptoError::Decryption)
}
