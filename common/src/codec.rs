//! Canonical binary encoding of transactions
//!
//! Transactions are mapped onto compact wire records and encoded with `bincode` (little
//! endian, varint lengths):
//!
//! ```text
//! magic(2) version(1) asset(32)
//! len { hash(32) index }
//! len { type(1) amount(16, big endian units) len script len { key(32) } option mask(32) }
//! len extra
//! ```
//!
//! A signed transaction appends `len { len { c(32) r(32) } }`. The encoding of the unsigned
//! `Transaction` is what gets hashed and signed, so decoding accepts only the one encoding a
//! transaction has.

use std::convert::TryFrom;

use bincode::Options;
use serde::{Deserialize, Serialize};

use crypto::{Hash256, Key, Signature};
use ensure_macro::ensure;

use crate::{
    config::TRANSACTION_MAXIMUM_SIZE, GetHash, Input, Integer, Output, OutputType, Script,
    SignedTransaction, Transaction,
};

const MAGIC: [u8; 2] = [0x77, 0x77];

/// Error type for decoding
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Returned when the data is larger than any valid transaction
    #[error("Encoded transaction of {0} bytes exceeds the maximum size")]
    TooLarge(usize),

    /// Returned when the data does not decode as a transaction record
    #[error(transparent)]
    Decode(#[from] bincode::Error),

    /// Returned when the data does not start with the transaction magic
    #[error("Invalid encoding magic")]
    InvalidMagic,

    /// Returned when an output carries an unknown type tag
    #[error("Unknown output type {0:#04x}")]
    UnknownOutputType(u8),

    /// Returned when a signature scalar is not reduced
    #[error("Signature is not canonical")]
    InvalidSignature,

    /// Returned when the data decodes but is not the encoding of what it decodes to
    #[error("Encoding is not canonical")]
    NonCanonical,
}

/// Result alias for decoding
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Serialize, Deserialize)]
struct WireInput {
    hash: [u8; 32],
    index: u64,
}

#[derive(Serialize, Deserialize)]
struct WireOutput {
    output_type: u8,
    amount: [u8; 16],
    script: Vec<u8>,
    keys: Vec<[u8; 32]>,
    mask: Option<[u8; 32]>,
}

#[derive(Serialize, Deserialize)]
struct WireTransaction {
    magic: [u8; 2],
    version: u8,
    asset: [u8; 32],
    inputs: Vec<WireInput>,
    outputs: Vec<WireOutput>,
    extra: Vec<u8>,
}

#[derive(Serialize, Deserialize)]
struct WireSignedTransaction {
    transaction: WireTransaction,
    signatures: Vec<Vec<([u8; 32], [u8; 32])>>,
}

impl From<&Output> for WireOutput {
    fn from(output: &Output) -> Self {
        WireOutput {
            output_type: output.output_type.tag(),
            amount: output.amount.units().to_be_bytes(),
            script: output.script.as_bytes().to_vec(),
            keys: output.keys.iter().map(|key| *key.as_bytes()).collect(),
            mask: output.mask.map(|mask| *mask.as_bytes()),
        }
    }
}

impl TryFrom<WireOutput> for Output {
    type Error = Error;

    fn try_from(wire: WireOutput) -> Result<Self> {
        let output_type = OutputType::from_tag(wire.output_type)
            .ok_or(Error::UnknownOutputType(wire.output_type))?;

        Ok(Output {
            output_type,
            amount: Integer::from_units(u128::from_be_bytes(wire.amount)),
            script: Script::from_bytes(wire.script),
            keys: wire.keys.into_iter().map(Key::from_bytes).collect(),
            mask: wire.mask.map(Key::from_bytes),
        })
    }
}

impl From<&Transaction> for WireTransaction {
    fn from(tx: &Transaction) -> Self {
        WireTransaction {
            magic: MAGIC,
            version: tx.version,
            asset: *tx.asset.data(),
            inputs: tx
                .inputs
                .iter()
                .map(|input| WireInput {
                    hash: *input.hash.data(),
                    index: input.index,
                })
                .collect(),
            outputs: tx.outputs.iter().map(WireOutput::from).collect(),
            extra: tx.extra.clone(),
        }
    }
}

impl TryFrom<WireTransaction> for Transaction {
    type Error = Error;

    fn try_from(wire: WireTransaction) -> Result<Self> {
        ensure!(wire.magic == MAGIC, Error::InvalidMagic);

        let inputs = wire
            .inputs
            .into_iter()
            .map(|input| Input {
                hash: Hash256::from(input.hash),
                index: input.index,
            })
            .collect();
        let outputs = wire
            .outputs
            .into_iter()
            .map(Output::try_from)
            .collect::<Result<Vec<_>>>()?;

        Ok(Transaction {
            version: wire.version,
            asset: Hash256::from(wire.asset),
            inputs,
            outputs,
            extra: wire.extra,
        })
    }
}

fn join_signature((c, r): ([u8; 32], [u8; 32])) -> Result<Signature> {
    let mut bytes = [0; 64];
    bytes[..32].copy_from_slice(&c);
    bytes[32..].copy_from_slice(&r);
    Signature::from_bytes(&bytes).ok_or(Error::InvalidSignature)
}

impl From<&SignedTransaction> for WireSignedTransaction {
    fn from(tx: &SignedTransaction) -> Self {
        WireSignedTransaction {
            transaction: WireTransaction::from(&tx.transaction),
            signatures: tx
                .signatures
                .iter()
                .map(|list| {
                    list.iter()
                        .map(|signature| (signature.c.to_bytes(), signature.r.to_bytes()))
                        .collect()
                })
                .collect(),
        }
    }
}

impl TryFrom<WireSignedTransaction> for SignedTransaction {
    type Error = Error;

    fn try_from(wire: WireSignedTransaction) -> Result<Self> {
        let signatures = wire
            .signatures
            .into_iter()
            .map(|list| {
                list.into_iter()
                    .map(join_signature)
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(SignedTransaction {
            transaction: Transaction::try_from(wire.transaction)?,
            signatures,
        })
    }
}

fn encode<T: Serialize>(record: &T) -> Vec<u8> {
    // Wire records hold only fixed arrays and length-prefixed sequences, and no size limit is
    // set, so encoding into memory cannot fail
    bincode::options()
        .serialize(record)
        .expect("wire records always encode")
}

impl Transaction {
    /// Canonical encoding. Signatures are never part of it
    pub fn marshal(&self) -> Vec<u8> {
        encode(&WireTransaction::from(self))
    }
}

impl SignedTransaction {
    /// Canonical encoding of the transaction followed by its signature lists
    pub fn marshal(&self) -> Vec<u8> {
        encode(&WireSignedTransaction::from(self))
    }

    /// Decodes a signed transaction
    ///
    /// Data over `TRANSACTION_MAXIMUM_SIZE`, trailing bytes, unknown output types,
    /// non-canonical signature scalars and any encoding other than the one `marshal`
    /// produces are rejected
    pub fn unmarshal(data: &[u8]) -> Result<Self> {
        ensure!(
            data.len() <= TRANSACTION_MAXIMUM_SIZE,
            Error::TooLarge(data.len())
        );

        let wire: WireSignedTransaction = bincode::options()
            .with_limit(TRANSACTION_MAXIMUM_SIZE as u64)
            .reject_trailing_bytes()
            .deserialize(data)?;
        let signed = SignedTransaction::try_from(wire)?;

        ensure!(signed.marshal() == data, Error::NonCanonical);
        Ok(signed)
    }
}

impl GetHash for Transaction {
    fn get_hash_blob(&self) -> Vec<u8> {
        self.marshal()
    }
}

impl GetHash for SignedTransaction {
    fn get_hash_blob(&self) -> Vec<u8> {
        self.transaction.marshal()
    }
}
