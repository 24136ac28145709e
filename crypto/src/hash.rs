use std::convert::TryFrom;
use std::fmt::{self, Debug, Display, Formatter};
use std::str::FromStr;

use digest::Digest;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

pub type Hash256Data = [u8; 32];

/// Keccak-256 with the original (pre-FIPS 202) padding
pub type CNFastHash = sha3::Keccak256;

/// A 256-bit digest. Used for transaction identities and asset identifiers
#[derive(Clone, Copy, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Hash256(Hash256Data);

impl Hash256 {
    pub fn null_hash() -> Self {
        Hash256([0; 32])
    }
    pub fn is_null(&self) -> bool {
        self.0 == [0; 32]
    }
    pub fn data(&self) -> &Hash256Data {
        &self.0
    }
    /// Hashes `data` with `CNFastHash`
    pub fn digest(data: &[u8]) -> Self {
        let mut hash = [0; 32];
        hash.copy_from_slice(&CNFastHash::digest(data));
        Hash256(hash)
    }
}

impl Display for Hash256 {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl Debug for Hash256 {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Hash256({})", self)
    }
}

impl From<Hash256Data> for Hash256 {
    fn from(data: Hash256Data) -> Self {
        Hash256(data)
    }
}

/// Decodes a 64 character hex string into 32 bytes
pub(crate) fn decode_32(data: &str) -> Result<[u8; 32], hex::FromHexError> {
    if data.len() != 64 {
        return Err(hex::FromHexError::InvalidStringLength);
    }
    let mut bytes = [0; 32];
    bytes.copy_from_slice(&hex::decode(data)?);
    Ok(bytes)
}

impl TryFrom<&str> for Hash256 {
    type Error = hex::FromHexError;
    fn try_from(data: &str) -> Result<Self, Self::Error> {
        Ok(Hash256(decode_32(data)?))
    }
}

impl FromStr for Hash256 {
    type Err = hex::FromHexError;
    fn from_str(data: &str) -> Result<Self, Self::Err> {
        Hash256::try_from(data)
    }
}

impl Serialize for Hash256 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Hash256 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let data = String::deserialize(deserializer)?;
        Hash256::try_from(data.as_str()).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_hash() {
        assert_eq!(
            Hash256::null_hash().to_string(),
            "0000000000000000000000000000000000000000000000000000000000000000"
        );
        assert!(Hash256::null_hash().is_null());
    }

    #[test]
    fn decodes_correctly() {
        let data: [u8; 32] = [
            1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24,
            25, 26, 27, 28, 29, 30, 31, 32,
        ];
        let hash =
            Hash256::try_from("0102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f20")
                .unwrap();
        assert_eq!(hash.data(), &data);
    }

    #[test]
    fn errors_on_invalid_input() {
        assert!(Hash256::try_from("01").is_err());
        assert!(Hash256::from_str(&"zz".repeat(32)).is_err());
    }

    #[test]
    fn digests_with_original_keccak() {
        // Keccak-256 of the empty string, not SHA3-256
        assert_eq!(
            Hash256::digest(b"").to_string(),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }
}
