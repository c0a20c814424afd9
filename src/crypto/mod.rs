/// Quantum-seeded toy lattice key and signature engine.
///
/// Leaf first:
/// - `hash`: SHAKE256 byte expander and SHA-256 digests
/// - `sampler`: entropy draws and {-1,0,1} coefficients
/// - `matrix`: seed-derived public matrix, one entry at a time
/// - `lwe`: `b = A·s + e (mod q)` and key-pair assembly
/// - `keys`: key types and their byte-stable encodings
/// - `sign`: hash-chain signature binding
pub mod hash;
pub mod keys;
pub mod lwe;
pub mod matrix;
pub mod sampler;
pub mod sensitive;
pub mod sign;

#[cfg(test)]
pub(crate) mod test_support {
    use rand::{CryptoRng, RngCore};

    /// Entropy source that always fails.
    pub(crate) struct FailingRng;

    impl RngCore for FailingRng {
        fn next_u32(&mut self) -> u32 {
            0
        }

        fn next_u64(&mut self) -> u64 {
            0
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.fill(0);
        }

        fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> Result<(), rand::Error> {
            Err(rand::Error::new("entropy pool closed"))
        }
    }

    impl CryptoRng for FailingRng {}
}
