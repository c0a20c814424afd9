/// Demonstrative hash-chain signature.
///
/// The signature binds a message digest, a digest of the quantum-derived
/// number and the first 16 characters of the encoded private key:
///
/// ```text
/// sig = base64(hex(SHA256(hex(SHA256(msg)) ":" hex(SHA256(id)) ":" sk[..16])))
/// ```
///
/// There is no public verification predicate; `signature_is_well_formed`
/// only checks the transport shape.
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::crypto::hash::sha256_hex;

const PRIVATE_KEY_PREFIX_CHARS: usize = 16;

/// Message bound by a signature: `session|context|numeric_id|device`.
pub fn message_to_sign(session_id: &str, context: &str, numeric_id: u64, device_id: &str) -> String {
    format!("{session_id}|{context}|{numeric_id}|{device_id}")
}

/// Derive the signature for one key generation.
pub fn sign(
    session_id: &str,
    context: &str,
    numeric_id: u64,
    device_id: &str,
    private_key_encoded: &str,
) -> String {
    let message = message_to_sign(session_id, context, numeric_id, device_id);
    let message_digest = sha256_hex(message.as_bytes());
    let entropy_digest = sha256_hex(numeric_id.to_string().as_bytes());
    let key_prefix: String = private_key_encoded
        .chars()
        .take(PRIVATE_KEY_PREFIX_CHARS)
        .collect();

    let chained = format!("{message_digest}:{entropy_digest}:{key_prefix}");
    STANDARD.encode(sha256_hex(chained.as_bytes()))
}

/// True when `signature` is base64 of a 64-character hex digest.
pub fn signature_is_well_formed(signature: &str) -> bool {
    let Ok(decoded) = STANDARD.decode(signature) else {
        return false;
    };
    decoded.len() == 64 && decoded.iter().all(u8::is_ascii_hexdigit)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL_SK: &str = "eyJ2ZXJzaW9uIjogInRveS1sd2UtMSIsICJxIjogMTIyODksICJuIjogMiwgIm0iOiAyLCAic21hbGxfYm91bmQiOiAxLCAicyI6IFstMSwgMF19";

    #[test]
    fn test_sign_known_vector() {
        assert_eq!(
            sign("s1", "hope", 42, "aws_sv1", SMALL_SK),
            "ZjUyMjcxYWRmYmIxYjMzNjY2MzgxYzNmN2Q1NTQwYjdmMWVhYmNiYjk1YmExNGMxNDdiMTcwZjc1MGRjYTIyOA=="
        );
    }

    #[test]
    fn test_sign_binds_message() {
        let a = sign("s1", "hope", 42, "aws_sv1", SMALL_SK);
        let b = sign("s1", "fear", 42, "aws_sv1", SMALL_SK);
        let c = sign("s1", "hope", 43, "aws_sv1", SMALL_SK);
        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_only_key_prefix_matters() {
        let a = sign("s", "m", 1, "d", "0123456789abcdefXXXX");
        let b = sign("s", "m", 1, "d", "0123456789abcdefYYYY");
        assert_eq!(a, b);
    }

    #[test]
    fn test_short_private_key_is_used_whole() {
        let a = sign("s", "m", 1, "d", "short");
        assert!(signature_is_well_formed(&a));
    }

    #[test]
    fn test_well_formed_check() {
        assert!(signature_is_well_formed(&sign("s", "m", 1, "d", SMALL_SK)));
        assert!(!signature_is_well_formed(""));
        assert!(!signature_is_well_formed("%%%"));
        assert!(!signature_is_well_formed(&STANDARD.encode("not hex")));
    }

    #[test]
    fn test_message_format() {
        assert_eq!(message_to_sign("a", "b:c", 7, "dev"), "a|b:c|7|dev");
    }
}
