/// Entropy helpers and the small-coefficient sampler.
///
/// Every draw goes through `try_fill_bytes` so a failing entropy source
/// surfaces as `SigwallError::Entropy` instead of a panic.
use rand::{CryptoRng, RngCore};

use crate::crypto::sensitive::SmallVector;
use crate::error::{Result, SigwallError};

/// Cryptographic generator that can sit behind a `Box<dyn SecureRng>`.
pub trait SecureRng: RngCore + CryptoRng + Send {}

impl<T: RngCore + CryptoRng + Send> SecureRng for T {}

/// Fill `buf` from `rng`, mapping RNG failure to an entropy error.
pub fn try_fill<R: RngCore + ?Sized>(rng: &mut R, buf: &mut [u8]) -> Result<()> {
    rng.try_fill_bytes(buf)
        .map_err(|e| SigwallError::Entropy(e.to_string()))
}

/// Draw a big-endian `u32` from `rng`.
pub fn try_u32<R: RngCore + ?Sized>(rng: &mut R) -> Result<u32> {
    let mut buf = [0u8; 4];
    try_fill(rng, &mut buf)?;
    Ok(u32::from_be_bytes(buf))
}

/// Sample `count` coefficients in {-1, 0, 1} as `(byte mod 3) - 1`.
///
/// Byte-mod-3 reduction over 256 values leaves a slight bias toward -1.
/// It is kept as is.
pub fn sample_small<R: RngCore + ?Sized>(rng: &mut R, count: usize) -> Result<SmallVector> {
    let mut bytes = vec![0u8; count];
    try_fill(rng, &mut bytes)?;
    let coeffs = bytes.iter().map(|b| (b % 3) as i8 - 1).collect();
    Ok(SmallVector::new(coeffs))
}
