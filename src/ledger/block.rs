use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::hasher;
use super::transaction::Transaction;

/// The previous-hash marker carried by every genesis block.
pub const GENESIS_PREVIOUS_HASH: &str = "0";

/// Miner identifier used for blocks not attributed to a node.
pub const SYSTEM_MINER: &str = "System";

/// Represents a block in a node's chain
///
/// A block starts out unsealed (`nonce = 0`, empty `hash`) and becomes
/// sealed once `seal` finds a nonce satisfying the difficulty target.
/// Sealed blocks are never mutated again, except through the simulator's
/// explicit tamper path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Timestamp when the block was created
    pub timestamp: DateTime<Utc>,

    /// List of transactions included in this block
    pub transactions: Vec<Transaction>,

    /// Hash of the previous block ("0" for genesis)
    pub previous_hash: String,

    /// Hash of this block, assigned by `seal`
    pub hash: String,

    /// Proof-of-work counter
    pub nonce: u64,

    /// Name of the node that mined this block
    pub miner: String,
}

impl Block {
    /// Creates a new unsealed block
    ///
    /// # Arguments
    ///
    /// * `timestamp` - The block creation time
    /// * `transactions` - The transactions to include in the block
    /// * `previous_hash` - The hash of the previous block
    /// * `miner` - The name of the mining node
    ///
    /// # Returns
    ///
    /// A new Block instance with `nonce = 0` and an empty hash
    pub fn new(
        timestamp: DateTime<Utc>,
        transactions: Vec<Transaction>,
        previous_hash: String,
        miner: String,
    ) -> Self {
        Block {
            timestamp,
            transactions,
            previous_hash,
            hash: String::new(),
            nonce: 0,
            miner,
        }
    }

    /// Creates the unsealed genesis block shared by every chain
    pub fn genesis(timestamp: DateTime<Utc>) -> Self {
        Self::new(
            timestamp,
            Vec::new(),
            GENESIS_PREVIOUS_HASH.to_string(),
            SYSTEM_MINER.to_string(),
        )
    }

    /// Recomputes the hash of this block from its current fields
    ///
    /// # Returns
    ///
    /// The SHA-256 hash of the block as a hexadecimal string
    pub fn compute_hash(&self) -> String {
        hasher::block_hash(
            &self.previous_hash,
            self.timestamp,
            &self.transactions,
            self.nonce,
            &self.miner,
        )
    }

    /// Performs proof of work until the hash satisfies the difficulty target
    ///
    /// Searches nonces from 0 upward and stops at the first hash carrying
    /// `difficulty` leading zero hex characters. The search is deterministic:
    /// resealing a block with identical fields reproduces the same nonce.
    /// With `difficulty == 0` any hash qualifies, but the loop still runs
    /// once so the hash is always assigned. This is the only place a block's
    /// hash is legitimately written.
    ///
    /// # Arguments
    ///
    /// * `difficulty` - The number of leading zero hex characters required
    pub fn seal(&mut self, difficulty: u32) {
        let target = "0".repeat(difficulty as usize);
        self.nonce = 0;

        loop {
            self.hash = self.compute_hash();

            if self.hash.starts_with(&target) {
                return;
            }

            self.nonce += 1;
        }
    }
}
