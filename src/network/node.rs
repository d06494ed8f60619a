use serde::{Deserialize, Serialize};

use crate::ledger::block::Block;
use crate::ledger::transaction::Transaction;

/// Represents a single peer in the simulated network
///
/// A node owns its chain, mempool, confirmed balance and mining-speed
/// multiplier, but exposes no mutation of its own: every state transition
/// flows through the `NetworkSimulator` so there is a single source of
/// truth and a single event log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Stable identifier of the node
    pub id: String,

    /// Display name of the node
    pub name: String,

    /// The node's local chain, index 0 = genesis
    pub chain: Vec<Block>,

    /// Transactions not yet included in a mined block
    pub mempool: Vec<Transaction>,

    /// Balance reflecting only mined, adopted blocks
    pub balance: f64,

    /// Mining-speed multiplier (> 0); higher means faster propagation
    pub mining_speed: f64,
}

impl Node {
    /// Creates a new node holding the shared genesis block
    ///
    /// # Arguments
    ///
    /// * `id` - The node's stable identifier
    /// * `name` - The node's display name
    /// * `genesis` - The pre-sealed genesis block common to the network
    /// * `balance` - The node's starting balance
    ///
    /// # Returns
    ///
    /// A new Node instance with an empty mempool and speed 1.0
    pub fn new(id: impl Into<String>, name: impl Into<String>, genesis: Block, balance: f64) -> Self {
        Node {
            id: id.into(),
            name: name.into(),
            chain: vec![genesis],
            mempool: Vec::new(),
            balance,
            mining_speed: 1.0,
        }
    }

    /// Gets the tip of the node's chain
    pub fn latest_block(&self) -> &Block {
        self.chain.last().expect("chain always contains genesis")
    }

    /// Net amount a block's transactions move towards this node
    ///
    /// Sums the amounts this node receives minus the amounts it sends
    /// within the given block. Used for balance updates when the node
    /// mines or adopts the block.
    pub fn block_impact(&self, block: &Block) -> f64 {
        let mut change = 0.0;

        for tx in &block.transactions {
            if tx.from.as_deref() == Some(self.id.as_str()) {
                change -= tx.amount;
            }
            if tx.to == self.id {
                change += tx.amount;
            }
        }

        change
    }

    /// Display-only balance adjusted by pending mempool entries
    ///
    /// Subtracts mempool amounts this node would send and adds those it
    /// would receive. Purely advisory; never persisted and never used for
    /// the simulator's insufficient-funds check.
    pub fn pending_balance(&self) -> f64 {
        let mut balance = self.balance;

        for tx in &self.mempool {
            if tx.from.as_deref() == Some(self.id.as_str()) {
                balance -= tx.amount;
            }
            if tx.to == self.id {
                balance += tx.amount;
            }
        }

        balance
    }
}
