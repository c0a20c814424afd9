/// Seed-derived public matrix for the toy LWE scheme.
///
/// Entry `k` (row-major, starting at 0) is
/// `u16_be(SHAKE256(seed || u32_be(k), 2)) mod q`.
/// The matrix is never materialised; callers pull one entry at a time.
use crate::crypto::hash;

/// Size of the public matrix seed in bytes.
pub const MATRIX_SEED_LEN: usize = 32;

/// Derive the matrix coefficient for a single `counter` value.
pub fn matrix_entry(seed: &[u8; MATRIX_SEED_LEN], counter: u32, q: u32) -> u32 {
    let mut input = [0u8; MATRIX_SEED_LEN + 4];
    input[..MATRIX_SEED_LEN].copy_from_slice(seed);
    input[MATRIX_SEED_LEN..].copy_from_slice(&counter.to_be_bytes());

    let mut block = [0u8; 2];
    hash::expand_into(&input, &mut block);
    u32::from(u16::from_be_bytes(block)) % q
}

/// Row-major walk over the matrix owned by one key generation.
///
/// The counter advances exactly once per cell and is never shared between
/// generators, so concurrent key generations cannot interfere. One generator
/// covers at most `2^32` cells; `lwe::generate_keypair` rejects larger shapes.
pub struct MatrixGenerator<'a> {
    seed: &'a [u8; MATRIX_SEED_LEN],
    q: u32,
    counter: u32,
}

impl<'a> MatrixGenerator<'a> {
    pub fn new(seed: &'a [u8; MATRIX_SEED_LEN], q: u32) -> Self {
        Self { seed, q, counter: 0 }
    }

    /// Produce the next cell and advance the counter.
    pub fn next_entry(&mut self) -> u32 {
        let value = matrix_entry(self.seed, self.counter, self.q);
        self.counter = self.counter.wrapping_add(1);
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::lwe::Q;

    #[test]
    fn test_zero_seed_regression() {
        let seed = [0u8; MATRIX_SEED_LEN];
        assert_eq!(matrix_entry(&seed, 0, Q), 3089);
        assert_eq!(matrix_entry(&seed, 1, Q), 3345);
    }

    #[test]
    fn test_matrix_entry_deterministic() {
        let seed = [0x5Au8; MATRIX_SEED_LEN];
        for counter in [0u32, 17, 4095] {
            assert_eq!(matrix_entry(&seed, counter, Q), matrix_entry(&seed, counter, Q));
        }
    }

    #[test]
    fn test_matrix_entry_in_range() {
        let seed = [0x11u8; MATRIX_SEED_LEN];
        assert!((0..1024).all(|c| matrix_entry(&seed, c, Q) < Q));
    }

    #[test]
    fn test_generator_matches_entry_function() {
        let seed = [3u8; MATRIX_SEED_LEN];
        let mut gen = MatrixGenerator::new(&seed, Q);
        for counter in 0..12 {
            assert_eq!(gen.next_entry(), matrix_entry(&seed, counter, Q));
        }
    }

    #[test]
    fn test_different_seeds_diverge() {
        let a: Vec<u32> = (0..32).map(|c| matrix_entry(&[1u8; 32], c, Q)).collect();
        let b: Vec<u32> = (0..32).map(|c| matrix_entry(&[2u8; 32], c, Q)).collect();
        assert_ne!(a, b);
    }
}
