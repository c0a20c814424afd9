/// Hashing utilities for sigwall.
///
/// Two primitives are used throughout the key engine:
/// - SHAKE256 as the byte expander (seed stretching, matrix derivation)
/// - SHA-256 for digests bound into signatures and bookkeeping identifiers
use sha2::{Digest, Sha256};
use sha3::digest::{ExtendableOutput, Update, XofReader};
use sha3::Shake256;

/// Stretch `seed` into `output_len` deterministic bytes with SHAKE256.
///
/// The seed may be empty and the output may be longer than the seed.
pub fn expand(seed: &[u8], output_len: usize) -> Vec<u8> {
    let mut out = vec![0u8; output_len];
    expand_into(seed, &mut out);
    out
}

/// Fill `out` with SHAKE256 output for `seed`.
pub fn expand_into(seed: &[u8], out: &mut [u8]) {
    let mut hasher = Shake256::default();
    Update::update(&mut hasher, seed);
    let mut reader = hasher.finalize_xof();
    XofReader::read(&mut reader, out);
}

/// SHA-256 of arbitrary data.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// Lowercase hex SHA-256 of arbitrary data.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(sha256(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_deterministic() {
        let seed = b"sigwall seed";
        assert_eq!(expand(seed, 64), expand(seed, 64));
    }

    #[test]
    fn test_expand_prefix_stable() {
        // A longer read extends a shorter one; it never reshuffles it.
        let short = expand(b"prefix", 16);
        let long = expand(b"prefix", 200);
        assert_eq!(&long[..16], &short[..]);
    }

    #[test]
    fn test_expand_empty_seed() {
        assert_eq!(hex::encode(expand(b"", 8)), "46b9dd2b0ba88d13");
    }

    #[test]
    fn test_expand_zero_length() {
        assert!(expand(b"anything", 0).is_empty());
    }

    #[test]
    fn test_sha256_hex_known_value() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_sha256_different_inputs() {
        assert_ne!(sha256(b"hello"), sha256(b"world"));
    }
}
