//! Hashes, keys and signatures over the ed25519 group
//!
//! All secret scalar arithmetic goes through `curve25519-dalek`, whose scalar and
//! variable-base point multiplications are constant-time.

pub mod ecc;
pub mod hash;
pub mod keys;
pub mod signature;

pub use digest::Digest;
pub use ecc::ScalarExt;
pub use hash::{CNFastHash, Hash256, Hash256Data};
pub use keys::{Key, KeyPair, PublicKey, SecretKey};
pub use signature::Signature;
