//! Protocol constants
//!
//! These are consensus parameters: every validator must agree on them for transactions to
//! hash and validate identically.

use crypto::Hash256;

/// The only transaction version accepted by validation
pub const TX_VERSION: u8 = 0x01;

/// Maximum number of bytes in a transaction's `extra` field
pub const EXTRA_SIZE_LIMIT: usize = 256;

/// Maximum canonical size of a signed transaction
pub const TRANSACTION_MAXIMUM_SIZE: usize = 1024 * 1024;

/// Time between snapshot rounds, in nanoseconds
pub const SNAPSHOT_ROUND_GAP: u64 = 3_000_000_000;

/// Number of round gaps an input stays locked for after validation
pub const UTXO_LOCK_ROUNDS: u64 = 3;

/// Identifier from which the native asset id is hashed
pub const NATIVE_ASSET_NAME: &str = "c94ac88f-4671-3976-b60a-09064f1811e8";

/// Asset id of the native coin
pub fn native_asset_id() -> Hash256 {
    Hash256::digest(NATIVE_ASSET_NAME.as_bytes())
}
