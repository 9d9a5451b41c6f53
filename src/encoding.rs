//! Binary-safe transport encoding.
//!
//! The cipher blob (`salt || nonce || ciphertext`) travels through JSON
//! bodies and the store as a string; standard base64 with padding keeps the
//! round trip exact for arbitrary bytes. The engine accumulates into one
//! pre-sized buffer, so megabyte-sized notes stay off the call stack.

use base64::engine::general_purpose::STANDARD;
use base64::{DecodeError, Engine};

pub fn encode(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

pub fn decode(text: &str) -> Result<Vec<u8>, DecodeError> {
    STANDARD.decode(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrips_every_byte_value() {
        let bytes: Vec<u8> = (0..=255).collect();
        assert_eq!(decode(&encode(&bytes)).unwrap(), bytes);
    }

    #[test]
    fn roundtrips_empty_input() {
        assert_eq!(encode(&[]), "");
        assert_eq!(decode("").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn roundtrips_a_mebibyte() {
        let bytes: Vec<u8> = (0..1_048_576u32).map(|i| (i % 251) as u8).collect();
        assert_eq!(decode(&encode(&bytes)).unwrap(), bytes);
    }

    #[test]
    fn rejects_text_outside_the_alphabet() {
        assert!(decode("not base64!").is_err());
    }
}
