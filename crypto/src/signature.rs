use std::fmt::{self, Debug, Formatter};

use digest::Digest;
use rand::{rngs::OsRng, CryptoRng, RngCore};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::ecc::{Point, Scalar};
use crate::hash::{CNFastHash, Hash256};
use crate::keys::{KeyPair, PublicKey};

/// A Schnorr signature `(c, r)` over a 32 byte message hash
///
/// * Sign: `k` random, `c = H_s(m || P || kG)`, `r = k - cx`
/// * Verify: `c == H_s(m || P || rG + cP)`
#[derive(Clone, Copy, Eq, PartialEq)]
pub struct Signature {
    pub c: Scalar,
    pub r: Scalar,
}

fn challenge(message: &Hash256, public_key: &PublicKey, commitment: &Point) -> Scalar {
    let mut hasher = CNFastHash::new();
    hasher.input(message.data());
    hasher.input(public_key.compress().as_bytes());
    hasher.input(commitment.compress().as_bytes());

    let mut hash = [0; 32];
    hash.copy_from_slice(&hasher.result());
    Scalar::from_bytes_mod_order(hash)
}

impl Signature {
    /// Signs `message` with a nonce from the OS CSPRNG
    pub fn sign(message: &Hash256, keypair: &KeyPair) -> Result<Self, rand::Error> {
        Self::sign_with(&mut OsRng, message, keypair)
    }

    /// Signs `message` with a nonce drawn from the given CSPRNG
    pub fn sign_with<R: RngCore + CryptoRng>(
        rng: &mut R,
        message: &Hash256,
        keypair: &KeyPair,
    ) -> Result<Self, rand::Error> {
        let nonce = KeyPair::generate_with(rng)?;

        let c = challenge(message, &keypair.public_key, &nonce.public_key);
        let r = nonce.secret_key - c * keypair.secret_key;

        Ok(Signature { c, r })
    }

    pub fn verify(&self, message: &Hash256, public_key: &PublicKey) -> bool {
        // rG + cP
        let commitment = Point::vartime_double_scalar_mul_basepoint(&self.c, public_key, &self.r);

        challenge(message, public_key, &commitment) == self.c
    }

    /// `c || r`
    pub fn to_bytes(&self) -> [u8; 64] {
        let mut bytes = [0; 64];
        bytes[..32].copy_from_slice(self.c.as_bytes());
        bytes[32..].copy_from_slice(self.r.as_bytes());
        bytes
    }

    /// Returns `None` unless both scalars are canonically encoded
    pub fn from_bytes(bytes: &[u8; 64]) -> Option<Self> {
        let mut c = [0; 32];
        let mut r = [0; 32];
        c.copy_from_slice(&bytes[..32]);
        r.copy_from_slice(&bytes[32..]);

        Some(Signature {
            c: Scalar::from_canonical_bytes(c)?,
            r: Scalar::from_canonical_bytes(r)?,
        })
    }
}

impl Debug for Signature {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", hex::encode(&self.to_bytes()[..]))
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(&self.to_bytes()[..]))
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let data = String::deserialize(deserializer)?;
        let decoded = hex::decode(&data).map_err(de::Error::custom)?;
        if decoded.len() != 64 {
            return Err(de::Error::invalid_length(decoded.len(), &"64 bytes"));
        }
        let mut bytes = [0; 64];
        bytes.copy_from_slice(&decoded);

        Signature::from_bytes(&bytes).ok_or_else(|| de::Error::custom("non-canonical signature"))
    }
}
