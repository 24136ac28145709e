use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use ensure_macro::ensure;

/// Compares the valid signature count against the threshold operand
pub const OPERATOR_CMP: u8 = 0xff;
/// Sums the valid signatures
pub const OPERATOR_SUM: u8 = 0xfe;

/// A threshold program over an output's keys: `[OPERATOR_CMP, OPERATOR_SUM, threshold]`
///
/// The script is satisfied when at least `threshold` signatures verified against the
/// output's keys.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct Script(Vec<u8>);

/// Error returned when a script is malformed or not satisfied
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ScriptError {
    /// The script is not three bytes long
    #[error("Invalid script length {0}")]
    Length(usize),

    /// The script does not start with `OPERATOR_CMP` `OPERATOR_SUM`
    #[error("Invalid script operators {0:#04x} {1:#04x}")]
    Operators(u8, u8),

    /// Fewer valid signatures than the threshold
    #[error("Invalid signature keys {valid} {threshold}")]
    Threshold {
        /// Number of valid signatures
        valid: usize,
        /// Number of signatures required
        threshold: u8,
    },
}

impl Script {
    /// A script requiring `threshold` valid signatures
    pub fn new_threshold(threshold: u8) -> Self {
        Script(vec![OPERATOR_CMP, OPERATOR_SUM, threshold])
    }
    /// Wraps raw script bytes without checking them
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Script(bytes)
    }
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
    /// Non-script outputs carry the empty script
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Checks the shape `[OPERATOR_CMP, OPERATOR_SUM, threshold]`
    pub fn verify_format(&self) -> Result<(), ScriptError> {
        ensure!(self.0.len() == 3, ScriptError::Length(self.0.len()));
        ensure!(
            self.0[0] == OPERATOR_CMP && self.0[1] == OPERATOR_SUM,
            ScriptError::Operators(self.0[0], self.0[1])
        );
        Ok(())
    }

    /// Passes if the script is well formed and `valid` reaches its threshold
    pub fn validate(&self, valid: usize) -> Result<(), ScriptError> {
        self.verify_format()?;

        let threshold = self.0[2];
        ensure!(
            valid >= usize::from(threshold),
            ScriptError::Threshold { valid, threshold }
        );
        Ok(())
    }
}

impl Display for Script {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(&self.0))
    }
}

impl FromStr for Script {
    type Err = hex::FromHexError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Script(hex::decode(s)?))
    }
}

impl Serialize for Script {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Script {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let data = String::deserialize(deserializer)?;
        data.parse().map_err(de::Error::custom)
    }
}
