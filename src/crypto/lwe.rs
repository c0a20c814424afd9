/// Toy Learning-With-Errors key generation.
///
/// Educational parameters only (q=12289, n=m=64, coefficients in {-1,0,1}).
/// Not a production KEM: no IND-CPA claim is made.
use rand::{CryptoRng, RngCore};

use crate::crypto::hash;
use crate::crypto::keys::{PrivateKey, PublicKey, KEY_VERSION};
use crate::crypto::matrix::{MatrixGenerator, MATRIX_SEED_LEN};
use crate::crypto::sampler::{sample_small, try_fill};
use crate::crypto::sensitive::{SeedMaterial, SmallVector};
use crate::error::{Result, SigwallError};

/// Prime modulus.
pub const Q: u32 = 12289;
/// Secret dimension.
pub const N: usize = 64;
/// Public vector dimension.
pub const M: usize = 64;
/// Bound on secret and error coefficients.
pub const SMALL_BOUND: u8 = 1;

/// Domain separation tag mixed into every key-generation seed.
pub const KEYGEN_DOMAIN: &[u8] = b"ToyLWE-KeyGen-v1";

/// Algorithm label reported alongside generated keys.
pub const ALGORITHM: &str = "ToyLWE-Quantum-Seeded-Demo";

const FRESH_ENTROPY_LEN: usize = 32;

/// Matrix counters are `u32`, so one matrix holds at most `2^32` cells.
const MAX_MATRIX_CELLS: u64 = 1 << 32;

/// Scheme parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LweParams {
    pub q: u32,
    pub n: usize,
    pub m: usize,
    pub small_bound: u8,
}

impl Default for LweParams {
    fn default() -> Self {
        Self {
            q: Q,
            n: N,
            m: M,
            small_bound: SMALL_BOUND,
        }
    }
}

/// A freshly generated key pair.
#[derive(Debug, Clone)]
pub struct KeyPair {
    pub public: PublicKey,
    pub private: PrivateKey,
}

/// Key pair in transport form.
#[derive(Debug, Clone)]
pub struct EncodedKeyPair {
    pub public_key: String,
    pub private_key: String,
    pub algorithm: &'static str,
}

impl KeyPair {
    pub fn encode(&self) -> Result<EncodedKeyPair> {
        Ok(EncodedKeyPair {
            public_key: self.public.encode()?,
            private_key: self.private.encode()?,
            algorithm: ALGORITHM,
        })
    }
}

/// Compute `b_i = (Σ_j A_ij·s_j + e_i) mod q` with A streamed from `matrix_seed`.
///
/// The matrix counter runs row-major across all `secret.len()` columns of
/// each row before moving to the next.
pub fn assemble(
    secret: &SmallVector,
    error: &SmallVector,
    matrix_seed: &[u8; MATRIX_SEED_LEN],
    q: u32,
) -> Vec<u32> {
    let q = i64::from(q);
    let s = secret.as_slice();
    let mut matrix = MatrixGenerator::new(matrix_seed, q as u32);

    error
        .as_slice()
        .iter()
        .map(|&e_i| {
            let mut dot: i64 = 0;
            for &s_j in s {
                let a_ij = i64::from(matrix.next_entry());
                dot = (dot + a_ij * i64::from(s_j)) % q;
            }
            (((dot + i64::from(e_i)) % q + q) % q) as u32
        })
        .collect()
}

/// Build seed material: domain tag, quantum seed, request context digest,
/// then fresh randomness from `rng`.
pub fn seed_material<R: RngCore + ?Sized>(
    quantum_seed: u128,
    context_digest: &[u8; 32],
    rng: &mut R,
) -> Result<SeedMaterial> {
    let mut fresh = zeroize::Zeroizing::new([0u8; FRESH_ENTROPY_LEN]);
    try_fill(rng, &mut fresh[..])?;

    let mut bytes =
        Vec::with_capacity(KEYGEN_DOMAIN.len() + 16 + context_digest.len() + FRESH_ENTROPY_LEN);
    bytes.extend_from_slice(KEYGEN_DOMAIN);
    bytes.extend_from_slice(&quantum_seed.to_be_bytes());
    bytes.extend_from_slice(context_digest);
    bytes.extend_from_slice(&fresh[..]);
    Ok(SeedMaterial::new(bytes))
}

/// Derive the public matrix seed from seed material.
///
/// The material is expanded to 64 bytes; the upper half seeds A.
pub fn derive_matrix_seed(material: &SeedMaterial) -> [u8; MATRIX_SEED_LEN] {
    let xof = zeroize::Zeroizing::new(hash::expand(material.as_bytes(), 2 * MATRIX_SEED_LEN));
    let mut seed = [0u8; MATRIX_SEED_LEN];
    seed.copy_from_slice(&xof[MATRIX_SEED_LEN..]);
    seed
}

/// Generate a key pair from prepared seed material.
///
/// `s` and `e` come straight from `rng`, independent of the seed material;
/// only the matrix is seed-derived.
pub fn generate_keypair<R: RngCore + CryptoRng + ?Sized>(
    params: LweParams,
    material: &SeedMaterial,
    rng: &mut R,
) -> Result<KeyPair> {
    if params.q == 0 || params.q > u32::from(u16::MAX) + 1 {
        return Err(SigwallError::Config(format!(
            "modulus {} outside (0, 65536]",
            params.q
        )));
    }
    // Every cell consumes one u32 counter value; none may repeat.
    let cells = (params.n as u64).checked_mul(params.m as u64);
    if cells.map_or(true, |c| c > MAX_MATRIX_CELLS) {
        return Err(SigwallError::Config(format!(
            "{}x{} matrix exceeds the 2^32 counter space",
            params.m, params.n
        )));
    }

    let matrix_seed = derive_matrix_seed(material);
    let secret = sample_small(rng, params.n)?;
    let error = sample_small(rng, params.m)?;
    let b = assemble(&secret, &error, &matrix_seed, params.q);

    let public = PublicKey {
        version: KEY_VERSION.to_string(),
        q: params.q,
        n: params.n,
        m: params.m,
        a_seed: matrix_seed,
        b,
    };
    let private = PrivateKey {
        version: KEY_VERSION.to_string(),
        q: params.q,
        n: params.n,
        m: params.m,
        small_bound: params.small_bound,
        s: secret.as_slice().to_vec(),
    };

    Ok(KeyPair { public, private })
}
