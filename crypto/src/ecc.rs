use crate::hash::Hash256;

/// Helper Extension Trait for Scalar
pub trait ScalarExt {
    /// Reduces 64 bytes of seed material to a Scalar
    fn from_seed(seed: &[u8; 64]) -> Scalar {
        Scalar::from_bytes_mod_order_wide(seed)
    }
}

impl ScalarExt for Scalar {}

pub use curve25519_dalek::constants::ED25519_BASEPOINT_TABLE as BASEPOINT_TABLE;
pub use curve25519_dalek::edwards::CompressedEdwardsY as CompressedPoint;
pub use curve25519_dalek::edwards::EdwardsPoint as Point;
pub use curve25519_dalek::scalar::Scalar;

/// H_s: hashes the given data with `CNFastHash` and reduces it to a `Scalar`
pub fn hash_to_scalar(data: &[u8]) -> Scalar {
    Scalar::from_bytes_mod_order(*Hash256::digest(data).data())
}
