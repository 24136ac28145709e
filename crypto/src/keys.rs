use std::convert::TryFrom;
use std::fmt::{self, Debug, Display, Formatter};
use std::str::FromStr;

use rand::{rngs::OsRng, CryptoRng, RngCore};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::ecc::{CompressedPoint, Point, Scalar, ScalarExt, BASEPOINT_TABLE};
use crate::hash::{self, Hash256};
use crate::signature::Signature;

/// An unsigned 256-bit value used as a private key. Represented with lowercase letters
pub type SecretKey = Scalar;

/// A point on the elliptic curve. Usually determined by multiplication of a scalar to the curve
/// basepoint
pub type PublicKey = Point;

/// A pair of a given secret key and its corresponding public key
#[derive(Clone, Serialize, Deserialize)]
pub struct KeyPair {
    /// The secret key
    pub secret_key: SecretKey,
    /// The public key
    pub public_key: PublicKey,
}

impl KeyPair {
    /// Generates a random keypair using the OS CSPRNG
    pub fn generate() -> Result<Self, rand::Error> {
        Self::generate_with(&mut OsRng)
    }

    /// Generates a keypair from 64 bytes drawn from the given CSPRNG
    pub fn generate_with<R: RngCore + CryptoRng>(rng: &mut R) -> Result<Self, rand::Error> {
        let mut seed = [0; 64];
        rng.try_fill_bytes(&mut seed)?;

        Ok(Self::from_seed(&seed))
    }

    /// Reduces the seed to a secret key and derives its public key
    pub fn from_seed(seed: &[u8; 64]) -> Self {
        Self::from(Scalar::from_seed(seed))
    }

    /// The compressed form of the public key
    pub fn key(&self) -> Key {
        Key::from(&self.public_key)
    }
}

impl From<Scalar> for KeyPair {
    fn from(secret_key: SecretKey) -> Self {
        let public_key = &secret_key * &BASEPOINT_TABLE;
        Self {
            secret_key,
            public_key,
        }
    }
}

/// A compressed public key, as it appears in outputs
///
/// Equality, ordering and hashing are over the compressed bytes, which makes `Key` usable
/// in sets without decompressing
#[derive(Clone, Copy, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Key([u8; 32]);

impl Key {
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Key(bytes)
    }
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Returns `None` if the bytes are not a valid curve point
    pub fn decompress(&self) -> Option<PublicKey> {
        CompressedPoint(self.0).decompress()
    }

    /// Verifies `signature` over `message` against this key
    ///
    /// Keys that do not decompress never verify
    pub fn verify(&self, message: &Hash256, signature: &Signature) -> bool {
        match self.decompress() {
            Some(public_key) => signature.verify(message, &public_key),
            None => false,
        }
    }
}

impl From<&PublicKey> for Key {
    fn from(point: &PublicKey) -> Self {
        Key(point.compress().to_bytes())
    }
}

impl From<PublicKey> for Key {
    fn from(point: PublicKey) -> Self {
        Key::from(&point)
    }
}

impl Display for Key {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl Debug for Key {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Key({})", self)
    }
}

impl TryFrom<&str> for Key {
    type Error = hex::FromHexError;
    fn try_from(data: &str) -> Result<Self, Self::Error> {
        Ok(Key(hash::decode_32(data)?))
    }
}

impl FromStr for Key {
    type Err = hex::FromHexError;
    fn from_str(data: &str) -> Result<Self, Self::Err> {
        Key::try_from(data)
    }
}

impl Serialize for Key {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Key {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let data = String::deserialize(deserializer)?;
        Key::try_from(data.as_str()).map_err(de::Error::custom)
    }
}
