/// Wrappers for secret material that is zeroized when dropped.
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A vector of small coefficients in {-1, 0, 1}.
///
/// Used for both the secret vector `s` and the error vector `e`.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SmallVector(Vec<i8>);

impl SmallVector {
    pub fn new(coeffs: Vec<i8>) -> Self {
        Self(coeffs)
    }

    pub fn as_slice(&self) -> &[i8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for SmallVector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SmallVector(len={}, ..)", self.0.len())
    }
}

/// Seed material assembled for one key generation. Consumed once.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SeedMaterial(Vec<u8>);

impl SeedMaterial {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_vector_accessors() {
        let v = SmallVector::new(vec![-1, 0, 1]);
        assert_eq!(v.len(), 3);
        assert!(!v.is_empty());
        assert_eq!(v.as_slice(), &[-1, 0, 1]);
    }

    #[test]
    fn test_small_vector_debug_hides_coefficients() {
        let v = SmallVector::new(vec![1, -1]);
        assert_eq!(format!("{v:?}"), "SmallVector(len=2, ..)");
    }

    #[test]
    fn test_small_vector_zeroize() {
        let mut v = SmallVector::new(vec![1, -1, 1]);
        v.zeroize();
        assert!(v.is_empty());
    }
}
