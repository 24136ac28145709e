//! Module for handling account keys and addresses

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use rand::{rngs::OsRng, CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

use crypto::{ecc::hash_to_scalar, Key, KeyPair, PublicKey, ScalarExt, SecretKey};

/// Wrapper for the set of public keys in an address
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PublicAddress {
    /// Public spend key
    pub spend_public_key: PublicKey,
    /// Public view key
    pub view_public_key: PublicKey,
}

/// Error type for parsing a `PublicAddress`
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum Error {
    /// Returned when the address is not 64 hex encoded bytes
    #[error("Invalid address encoding")]
    InvalidEncoding,

    /// Returned when one of the keys is not a valid curve point
    #[error("Invalid address key {0}")]
    InvalidKey(Key),
}

impl PublicAddress {
    /// Creates an address from its public keys
    pub fn new(spend_public_key: PublicKey, view_public_key: PublicKey) -> Self {
        PublicAddress {
            spend_public_key,
            view_public_key,
        }
    }
}

/// Hex of the compressed spend key followed by the compressed view key
impl Display for PublicAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            Key::from(&self.spend_public_key),
            Key::from(&self.view_public_key)
        )
    }
}

impl FromStr for PublicAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 128 || !s.is_ascii() {
            return Err(Error::InvalidEncoding);
        }
        let (spend, view) = s.split_at(64);

        let decompress = |data: &str| -> Result<PublicKey, Error> {
            let key: Key = data.parse().map_err(|_| Error::InvalidEncoding)?;
            key.decompress().ok_or(Error::InvalidKey(key))
        };

        Ok(PublicAddress::new(decompress(spend)?, decompress(view)?))
    }
}

/// A combination of a view and spend keypair which is used to create and recognize outputs
///
/// The spend secret key authorizes spending. The view secret key is enough to recognize
/// outputs and learn their keys but cannot sign for them.
#[derive(Clone, Serialize, Deserialize)]
pub struct Address {
    /// Spend keypair
    pub spend_keypair: KeyPair,
    /// View keypair
    pub view_keypair: KeyPair,
}

/// Deterministic keypair generation
///
/// The view secret key is derived by taking the Keccak (non-standard) hash of the spend secret key
impl From<SecretKey> for Address {
    fn from(spend_secret_key: SecretKey) -> Address {
        let view_secret_key = hash_to_scalar(spend_secret_key.as_bytes());

        Address::from_secret_keys(spend_secret_key, view_secret_key)
    }
}

impl Address {
    /// Generate an account with distinct view and secret keys
    pub fn from_secret_keys(spend_secret_key: SecretKey, view_secret_key: SecretKey) -> Address {
        Address {
            spend_keypair: KeyPair::from(spend_secret_key),
            view_keypair: KeyPair::from(view_secret_key),
        }
    }

    /// Deterministically derive an account from 64 bytes of seed material
    pub fn from_seed(seed: &[u8; 64]) -> Address {
        Address::from(SecretKey::from_seed(seed))
    }

    /// Generate a random account using the OS CSPRNG
    pub fn generate() -> Result<Address, rand::Error> {
        Address::generate_with(&mut OsRng)
    }

    /// Generate a random account from the given CSPRNG
    pub fn generate_with<R: RngCore + CryptoRng>(rng: &mut R) -> Result<Address, rand::Error> {
        let mut seed = [0; 64];
        rng.try_fill_bytes(&mut seed)?;

        Ok(Address::from_seed(&seed))
    }

    /// The public keys others pay this account to
    pub fn public_address(&self) -> PublicAddress {
        PublicAddress::new(self.spend_keypair.public_key, self.view_keypair.public_key)
    }
}
