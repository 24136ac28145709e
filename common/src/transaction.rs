use std::fmt::{self, Display, Formatter};

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crypto::{Hash256, Key, Signature};

use crate::{config::TX_VERSION, Integer, Script};

/// Transaction input. References an output of a previous transaction
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Input {
    /// Hash of the transaction holding the referenced output
    pub hash: Hash256,
    /// Position of the referenced output in that transaction
    pub index: u64,
}

impl Display for Input {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.hash, self.index)
    }
}

/// Kind of an output
///
/// Only script outputs are spendable through signatures. The others are protocol level
/// value movements handled outside of the spend path
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum OutputType {
    /// Spendable by signatures meeting its script
    Script,
    Withdrawal,
    Slash,
    Pledge,
    Reclaim,
}

impl OutputType {
    /// The byte identifying this type in encodings
    pub fn tag(self) -> u8 {
        match self {
            OutputType::Script => 0x00,
            OutputType::Withdrawal => 0xa1,
            OutputType::Slash => 0xa2,
            OutputType::Pledge => 0xa3,
            OutputType::Reclaim => 0xa4,
        }
    }
    /// Returns `None` for unknown tags
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0x00 => Some(OutputType::Script),
            0xa1 => Some(OutputType::Withdrawal),
            0xa2 => Some(OutputType::Slash),
            0xa3 => Some(OutputType::Pledge),
            0xa4 => Some(OutputType::Reclaim),
            _ => None,
        }
    }
}

/// Origin of an unspent output
///
/// UTXOs minted outside of the normal spend path (deposits, rebates, mints) cannot be
/// spent as script inputs
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum InputType {
    /// Created by a script output, the only spendable kind
    Script,
    Deposit,
    Rebate,
    Mint,
}

impl InputType {
    /// The byte identifying this type in encodings
    pub fn tag(self) -> u8 {
        match self {
            InputType::Script => 0x00,
            InputType::Deposit => 0x71,
            InputType::Rebate => 0x72,
            InputType::Mint => 0x73,
        }
    }
    /// Returns `None` for unknown tags
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0x00 => Some(InputType::Script),
            0x71 => Some(InputType::Deposit),
            0x72 => Some(InputType::Rebate),
            0x73 => Some(InputType::Mint),
            _ => None,
        }
    }
}

macro_rules! serde_tag {
    ($ty:ident, $expecting:expr) => {
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_u8(self.tag())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let tag = u8::deserialize(deserializer)?;
                $ty::from_tag(tag).ok_or_else(|| {
                    de::Error::invalid_value(de::Unexpected::Unsigned(tag.into()), &$expecting)
                })
            }
        }
    };
}

serde_tag!(OutputType, "an output type tag");
serde_tag!(InputType, "an input type tag");

/// Transaction output
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Output {
    /// Kind of the output, serialized as `type`
    #[serde(rename = "type")]
    pub output_type: OutputType,
    /// Value carried by the output
    pub amount: Integer,

    // Script output fields
    /// Threshold program deciding how many of `keys` must sign
    #[serde(default, skip_serializing_if = "Script::is_empty")]
    pub script: Script,
    /// One-time (ghost) public keys, one per recipient slot
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keys: Vec<Key>,
    /// The ephemeral public key `R` all of `keys` were derived with
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mask: Option<Key>,
}

impl Output {
    /// Whether this output is spendable through its script
    pub fn is_script(&self) -> bool {
        self.output_type == OutputType::Script
    }
}

mod hex_bytes {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let data = String::deserialize(deserializer)?;
        hex::decode(&data).map_err(de::Error::custom)
    }
}

/// The unsigned part of a transaction
///
/// Its hash is both the transaction's identity and the message signed for every input
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Must be `TX_VERSION`
    pub version: u8,
    /// The asset every input and output holds
    pub asset: Hash256,
    /// Outputs being spent
    pub inputs: Vec<Input>,
    /// Outputs being created
    pub outputs: Vec<Output>,
    /// Opaque payload, bounded by `EXTRA_SIZE_LIMIT`
    #[serde(default, skip_serializing_if = "Vec::is_empty", with = "hex_bytes")]
    pub extra: Vec<u8>,
}

impl Transaction {
    /// Creates an empty transaction of the current version for the given asset
    pub fn new(asset: Hash256) -> Self {
        Transaction {
            version: TX_VERSION,
            asset,
            inputs: Vec::new(),
            outputs: Vec::new(),
            extra: Vec::new(),
        }
    }

    /// Spends output `index` of transaction `hash`
    pub fn add_input(&mut self, hash: Hash256, index: u64) {
        self.inputs.push(Input { hash, index });
    }
}

/// A transaction along with one list of signatures per input
///
/// Fewer signature lists than inputs is a valid state while the transaction is being
/// signed, but fails validation
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SignedTransaction {
    /// The signed transaction, flattened into the record
    #[serde(flatten)]
    pub transaction: Transaction,
    /// `signatures[i]` signs for `inputs[i]`, ordered by the position of the signing key
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub signatures: Vec<Vec<Signature>>,
}

impl From<Transaction> for SignedTransaction {
    fn from(transaction: Transaction) -> Self {
        SignedTransaction {
            transaction,
            signatures: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::config::native_asset_id;

    fn sample_transaction() -> Transaction {
        let mut tx = Transaction::new(native_asset_id());
        tx.add_input(Hash256::null_hash(), 1);
        tx.outputs.push(Output {
            output_type: OutputType::Withdrawal,
            amount: Integer::new(5),
            script: Script::default(),
            keys: Vec::new(),
            mask: None,
        });
        tx
    }

    #[test]
    fn tags_roundtrip() {
        for t in &[
            OutputType::Script,
            OutputType::Withdrawal,
            OutputType::Slash,
            OutputType::Pledge,
            OutputType::Reclaim,
        ] {
            assert_eq!(OutputType::from_tag(t.tag()), Some(*t));
        }
        for t in &[InputType::Script, InputType::Deposit, InputType::Rebate, InputType::Mint] {
            assert_eq!(InputType::from_tag(t.tag()), Some(*t));
        }
        assert_eq!(OutputType::from_tag(0x71), None);
    }

    #[test]
    fn record_shape_is_stable() {
        let tx = sample_transaction();
        let value = serde_json::to_value(&SignedTransaction::from(tx.clone())).unwrap();

        assert_eq!(
            value,
            json!({
                "version": 1,
                "asset": native_asset_id().to_string(),
                "inputs": [{ "hash": Hash256::null_hash().to_string(), "index": 1 }],
                "outputs": [{ "type": 0xa1, "amount": "5.00000000" }],
            })
        );

        let decoded: SignedTransaction = serde_json::from_value(value).unwrap();
        assert_eq!(decoded.transaction, tx);
        assert!(decoded.signatures.is_empty());
    }

    #[test]
    fn extra_serializes_as_hex() {
        let mut tx = sample_transaction();
        tx.extra = vec![0xde, 0xad];
        let value = serde_json::to_value(&tx).unwrap();
        assert_eq!(value["extra"], json!("dead"));
    }

    #[test]
    fn input_display() {
        let input = Input {
            hash: Hash256::null_hash(),
            index: 3,
        };
        assert!(input.to_string().ends_with(":3"));
    }
}
