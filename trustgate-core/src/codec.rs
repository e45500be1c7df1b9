//! Transport-safe encoding for binary ceremony artifacts.
//!
//! Every byte sequence crossing the authenticator/network boundary is
//! carried as base64url without padding (`+` -> `-`, `/` -> `_`, `=`
//! stripped). The transform is exact and round-trip safe:
//! `decode(encode(b)) == b` for all byte sequences, including empty ones
//! and lengths that are not a multiple of 3.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

use crate::error::{GateError, Result};

/// Encode bytes as unpadded base64url.
pub fn encode(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Decode an unpadded base64url string back to raw bytes.
pub fn decode(encoded: &str) -> Result<Vec<u8>> {
    URL_SAFE_NO_PAD
        .decode(encoded)
        .map_err(|e| GateError::Codec(format!("invalid base64url input: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_all_remainder_classes() {
        // Lengths congruent to 0, 1 and 2 mod 3, plus empty.
        let cases: &[&[u8]] = &[
            b"",
            b"f",
            b"fo",
            b"foo",
            b"foob",
            b"fooba",
            b"foobar",
            &[0x00],
            &[0xff; 33],
        ];
        for case in cases {
            let encoded = encode(case);
            assert_eq!(decode(&encoded).unwrap(), *case, "case {case:?}");
        }
    }

    #[test]
    fn round_trip_bytes_that_trigger_url_unsafe_alphabet() {
        // 0xfb 0xef produces '+' and '/' under the standard alphabet.
        let bytes: Vec<u8> = (0..=255).collect();
        let encoded = encode(&bytes);
        assert!(!encoded.contains('+'));
        assert!(!encoded.contains('/'));
        assert!(!encoded.contains('='));
        assert_eq!(decode(&encoded).unwrap(), bytes);
    }

    #[test]
    fn decode_rejects_padded_input() {
        assert!(decode("Zm8=").is_err());
    }

    #[test]
    fn decode_rejects_standard_alphabet() {
        // '+' is not part of the url-safe alphabet.
        assert!(decode("+w").is_err());
    }

    #[test]
    fn empty_encodes_to_empty() {
        assert_eq!(encode(b""), "");
        assert_eq!(decode("").unwrap(), Vec::<u8>::new());
    }
}
