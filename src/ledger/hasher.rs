use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

use super::transaction::Transaction;

/// Computes the SHA-256 digest of a string as a lowercase hex string
///
/// # Arguments
///
/// * `data` - The string to hash
///
/// # Returns
///
/// The 64-character hex digest
pub fn sha256_hex(data: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Computes the content address of a block from its fields
///
/// The digest covers a canonical concatenation of the previous hash, the
/// millisecond timestamp, an order-preserving JSON serialization of the
/// transaction sequence, the nonce, and the miner identifier. Identical
/// inputs always yield identical output; both mining and validation rely
/// on this.
///
/// # Arguments
///
/// * `previous_hash` - Hash of the preceding block ("0" for genesis)
/// * `timestamp` - Block creation time
/// * `transactions` - Transactions included in the block, in order
/// * `nonce` - The proof-of-work counter
/// * `miner` - Identifier of the node that sealed the block
///
/// # Returns
///
/// The SHA-256 hash of the block as a hexadecimal string
pub fn block_hash(
    previous_hash: &str,
    timestamp: DateTime<Utc>,
    transactions: &[Transaction],
    nonce: u64,
    miner: &str,
) -> String {
    let transaction_data =
        serde_json::to_string(transactions).expect("transaction serialization should not fail");

    let data = format!(
        "{}{}{}{}{}",
        previous_hash,
        timestamp.timestamp_millis(),
        transaction_data,
        nonce,
        miner,
    );

    sha256_hex(&data)
}
