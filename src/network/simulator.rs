use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use dashmap::DashMap;
use log::{debug, error, info, warn};
use thiserror::Error;

use super::event::{LogEntry, PropagationEvent, Severity};
use super::node::Node;
use crate::ledger::block::Block;
use crate::ledger::transaction::Transaction;
use crate::ledger::validator::{self, BlockStatus};

/// Lowest accepted proof-of-work difficulty
pub const MIN_DIFFICULTY: u32 = 1;

/// Highest accepted proof-of-work difficulty
pub const MAX_DIFFICULTY: u32 = 5;

/// The default network: four named peers
const DEFAULT_PEERS: [(&str, &str); 4] = [
    ("node1", "Alice"),
    ("node2", "Bob"),
    ("node3", "Clayton"),
    ("node4", "Dave"),
];

/// Errors that can occur during simulator operations
#[derive(Debug, Error)]
pub enum SimulatorError {
    #[error("Unknown node: {0}")]
    UnknownNode(String),

    #[error("Sender and recipient are the same node: {0}")]
    SelfTransfer(String),

    #[error("Amount must be positive, got {0}")]
    NonPositiveAmount(f64),

    #[error("Insufficient funds: required {required}, available {available}")]
    InsufficientFunds { required: f64, available: f64 },

    #[error("{0} cannot mine on a chain that failed validation")]
    InvalidChain(String),

    #[error("Block index out of range: {0}")]
    BlockIndexOutOfRange(usize),

    #[error("Transaction index out of range: {0}")]
    TransactionIndexOutOfRange(usize),

    #[error("Difficulty out of range: {0} (allowed 1..=5)")]
    InvalidDifficulty(u32),

    #[error("Mining speed must be positive, got {0}")]
    InvalidMiningSpeed(f64),
}

/// Tunable parameters of the simulation
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// Flat reward credited to a miner per mined block
    pub mining_reward: f64,

    /// Maximum number of mempool transactions included per block
    pub block_size: usize,

    /// Base network delay before a mined block reaches peers; divided by
    /// the miner's speed multiplier
    pub base_propagation_delay: Duration,

    /// How long a propagation marker stays visible
    pub marker_lifetime: Duration,

    /// Proof-of-work difficulty the network starts with
    pub initial_difficulty: u32,

    /// Confirmed balance every node starts with
    pub initial_balance: f64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        SimulatorConfig {
            mining_reward: 10.0,
            block_size: 5,
            base_propagation_delay: Duration::from_millis(1500),
            marker_lifetime: Duration::from_millis(1000),
            initial_difficulty: 2,
            initial_balance: 100.0,
        }
    }
}

/// Shared state behind a cloneable simulator handle
struct SimulatorInner {
    /// Nodes addressable by id; entries are never removed
    nodes: DashMap<String, Node>,

    /// Fixed node ordering for stable snapshots and broadcasts
    node_order: Vec<String>,

    /// Global difficulty, read at the moment each mining attempt starts
    difficulty: AtomicU32,

    /// Chronological event log
    logs: Mutex<Vec<LogEntry>>,

    /// In-flight propagation markers (visual only)
    propagation: Mutex<Vec<PropagationEvent>>,

    /// Simulation parameters
    config: SimulatorConfig,
}

/// Orchestrates a small network of simulated peers
///
/// The simulator owns every node and is the only mutation path into them:
/// transaction broadcast, mining, delayed propagation with longest-chain
/// adoption, and the explicit tamper operation all go through here, and
/// every outcome lands in one chronological event log.
///
/// The handle is cheap to clone and is passed explicitly to callers; all
/// clones share the same network.
#[derive(Clone)]
pub struct NetworkSimulator {
    inner: Arc<SimulatorInner>,
}

impl NetworkSimulator {
    /// Creates the default network of four peers
    pub fn new() -> Self {
        Self::with_config(SimulatorConfig::default())
    }

    /// Creates the default network of four peers with custom parameters
    pub fn with_config(config: SimulatorConfig) -> Self {
        Self::with_peers(config, &DEFAULT_PEERS)
    }

    /// Creates a network with the given `(id, name)` peers
    ///
    /// The genesis block is sealed once, before any node exists, and every
    /// node starts from that same common ancestor.
    pub fn with_peers(config: SimulatorConfig, peers: &[(&str, &str)]) -> Self {
        let mut genesis = Block::genesis(Utc::now());
        genesis.seal(config.initial_difficulty);

        let nodes = DashMap::new();
        let mut node_order = Vec::with_capacity(peers.len());

        for (id, name) in peers {
            nodes.insert(
                id.to_string(),
                Node::new(*id, *name, genesis.clone(), config.initial_balance),
            );
            node_order.push(id.to_string());
        }

        let simulator = NetworkSimulator {
            inner: Arc::new(SimulatorInner {
                nodes,
                node_order,
                difficulty: AtomicU32::new(config.initial_difficulty),
                logs: Mutex::new(Vec::new()),
                propagation: Mutex::new(Vec::new()),
                config,
            }),
        };

        simulator.log_event(
            format!("Network initialized with {} peers.", peers.len()),
            Severity::Info,
        );

        simulator
    }

    /// Submits a transaction and broadcasts it to every node's mempool
    ///
    /// Rejects self-transfers, non-positive amounts, unknown nodes, and
    /// senders whose *confirmed* balance is insufficient. Pending mempool
    /// debits are deliberately ignored by that check, so a node can queue
    /// more total spend than it owns. Rejections are logged as error
    /// events and leave every mempool untouched.
    ///
    /// # Arguments
    ///
    /// * `from` - The sender's node id
    /// * `to` - The recipient's node id
    /// * `amount` - The amount to transfer
    ///
    /// # Returns
    ///
    /// The broadcast transaction on success
    pub fn submit_transaction(
        &self,
        from: &str,
        to: &str,
        amount: f64,
    ) -> Result<Transaction, SimulatorError> {
        match self.check_submission(from, to, amount) {
            Ok((sender_name, recipient_name)) => {
                let tx = Transaction::new(Some(from.to_string()), to.to_string(), amount);

                // Explicit broadcast: every peer receives the same pending
                // entry, rather than all peers sharing one container
                for node_id in &self.inner.node_order {
                    if let Some(mut node) = self.inner.nodes.get_mut(node_id) {
                        node.mempool.push(tx.clone());
                    }
                }

                self.log_event(
                    format!("{} sent {} coins to {}.", sender_name, amount, recipient_name),
                    Severity::Info,
                );

                Ok(tx)
            }
            Err(err) => {
                self.log_event(format!("Transaction rejected: {}", err), Severity::Error);
                Err(err)
            }
        }
    }

    /// Checks a submission without touching any state
    fn check_submission(
        &self,
        from: &str,
        to: &str,
        amount: f64,
    ) -> Result<(String, String), SimulatorError> {
        if from == to {
            return Err(SimulatorError::SelfTransfer(from.to_string()));
        }

        if !amount.is_finite() || amount <= 0.0 {
            return Err(SimulatorError::NonPositiveAmount(amount));
        }

        let recipient_name = self
            .inner
            .nodes
            .get(to)
            .map(|node| node.name.clone())
            .ok_or_else(|| SimulatorError::UnknownNode(to.to_string()))?;

        let sender = self
            .inner
            .nodes
            .get(from)
            .ok_or_else(|| SimulatorError::UnknownNode(from.to_string()))?;

        // Confirmed balance only; no double-spend prevention inside a
        // single mempool
        if sender.balance < amount {
            return Err(SimulatorError::InsufficientFunds {
                required: amount,
                available: sender.balance,
            });
        }

        Ok((sender.name.clone(), recipient_name))
    }

    /// Mines a new block on the given node's chain
    ///
    /// Takes up to `block_size` of the oldest pending transactions, refuses
    /// to build on a chain that fails validation, seals the block on a
    /// blocking worker at the current global difficulty, then applies the
    /// result to the miner immediately: block appended, mempool cleared,
    /// balance credited with the mining reward plus the block's net impact.
    /// Propagation to peers is scheduled afterwards and completes on its
    /// own timer; see [`SimulatorConfig::base_propagation_delay`].
    ///
    /// # Arguments
    ///
    /// * `miner_id` - The id of the mining node
    ///
    /// # Returns
    ///
    /// The sealed block on success
    pub async fn mine_block(&self, miner_id: &str) -> Result<Block, SimulatorError> {
        let difficulty = self.difficulty();

        let (miner_name, mining_speed, chain, batch) = match self.inner.nodes.get(miner_id) {
            Some(miner) => (
                miner.name.clone(),
                miner.mining_speed,
                miner.chain.clone(),
                miner
                    .mempool
                    .iter()
                    .take(self.inner.config.block_size)
                    .cloned()
                    .collect::<Vec<_>>(),
            ),
            None => {
                self.log_event(
                    format!("Mining request for unknown node {}.", miner_id),
                    Severity::Error,
                );
                return Err(SimulatorError::UnknownNode(miner_id.to_string()));
            }
        };

        self.log_event(
            format!("{} started mining (difficulty {})...", miner_name, difficulty),
            Severity::Info,
        );

        // A node must not build on top of a chain it cannot verify
        if !validator::validate(&chain) {
            self.log_event(
                format!(
                    "{} tried to mine on an invalid chain! Operation aborted.",
                    miner_name
                ),
                Severity::Error,
            );
            return Err(SimulatorError::InvalidChain(miner_name));
        }

        let previous_hash = chain
            .last()
            .expect("chain always contains genesis")
            .hash
            .clone();
        let unsealed = Block::new(Utc::now(), batch, previous_hash, miner_name.clone());

        // The nonce search is CPU bound; keep it off the async scheduler
        let sealed = tokio::task::spawn_blocking(move || {
            let mut block = unsealed;
            block.seal(difficulty);
            block
        })
        .await
        .expect("mining task panicked");

        // Apply locally before any propagation timer is scheduled: a miner
        // always sees its own block immediately
        let height = {
            let mut miner = self
                .inner
                .nodes
                .get_mut(miner_id)
                .expect("nodes are never removed");
            let impact = miner.block_impact(&sealed);
            miner.chain.push(sealed.clone());
            miner.mempool.clear();
            miner.balance += self.inner.config.mining_reward + impact;
            miner.chain.len() - 1
        };

        self.log_event(
            format!(
                "{} found block #{}! Hash: {}...",
                miner_name,
                height,
                &sealed.hash[..8]
            ),
            Severity::Success,
        );

        self.emit_propagation_markers(miner_id);
        self.schedule_propagation(miner_id, &sealed, mining_speed);

        Ok(sealed)
    }

    /// Emits one visual marker per peer, removed again after a fixed lifetime
    fn emit_propagation_markers(&self, miner_id: &str) {
        let markers: Vec<PropagationEvent> = self
            .inner
            .node_order
            .iter()
            .filter(|id| id.as_str() != miner_id)
            .map(|peer_id| PropagationEvent::new(miner_id, peer_id.clone()))
            .collect();
        let marker_ids: Vec<String> = markers.iter().map(|marker| marker.id.clone()).collect();

        self.inner.propagation.lock().unwrap().extend(markers);

        let simulator = self.clone();
        let lifetime = self.inner.config.marker_lifetime;
        tokio::spawn(async move {
            tokio::time::sleep(lifetime).await;
            simulator
                .inner
                .propagation
                .lock()
                .unwrap()
                .retain(|event| !marker_ids.contains(&event.id));
        });
    }

    /// Schedules the delayed hand-off of a mined block to all peers
    ///
    /// The delay is the base propagation delay divided by the miner's
    /// speed multiplier. Once scheduled the timer always runs; there is
    /// no cancellation.
    fn schedule_propagation(&self, miner_id: &str, mined_block: &Block, mining_speed: f64) {
        let delay = self.inner.config.base_propagation_delay.div_f64(mining_speed);

        let simulator = self.clone();
        let miner_id = miner_id.to_string();
        let mined_block = mined_block.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            simulator.propagate(&miner_id, &mined_block);
        });
    }

    /// Offers the miner's chain to every peer after the network delay
    fn propagate(&self, miner_id: &str, mined_block: &Block) {
        // Re-read the miner's current chain and re-validate it from
        // scratch: it could have been tampered with while in flight
        let (miner_name, chain) = match self.inner.nodes.get(miner_id) {
            Some(miner) => (miner.name.clone(), miner.chain.clone()),
            None => return,
        };

        self.log_event(
            format!("Propagating new chain from {} to the network...", miner_name),
            Severity::Info,
        );

        let chain_valid = validator::validate(&chain);
        let mut rejections = Vec::new();

        for peer_id in &self.inner.node_order {
            if peer_id == miner_id {
                continue;
            }

            if let Some(mut peer) = self.inner.nodes.get_mut(peer_id) {
                // Longest-chain rule: only a strictly longer chain is
                // ever considered
                if chain.len() <= peer.chain.len() {
                    continue;
                }

                if chain_valid {
                    // Wholesale adoption, no partial merge: replace the
                    // chain, drop the mempool, apply the mined block's
                    // impact from this peer's perspective
                    let impact = peer.block_impact(mined_block);
                    peer.chain = chain.clone();
                    peer.mempool.clear();
                    peer.balance += impact;
                    debug!(
                        "{} adopted {}'s chain at height {}",
                        peer.name,
                        miner_name,
                        chain.len() - 1
                    );
                } else {
                    rejections.push(peer.name.clone());
                }
            }
        }

        for peer_name in rejections {
            self.log_event(
                format!(
                    "REJECTED: {} detected an invalid hash in {}'s chain.",
                    peer_name, miner_name
                ),
                Severity::Error,
            );
        }
    }

    /// Mutates a stored transaction's amount in place, without resealing
    ///
    /// The sealed block's hash and nonce are deliberately left untouched,
    /// desynchronizing the stored hash from the recomputed one; the
    /// per-block status classification then surfaces the tampering. This
    /// is the only sanctioned mutation of a sealed block.
    ///
    /// # Arguments
    ///
    /// * `node_id` - The node whose stored chain is edited
    /// * `block_index` - Index of the block within that chain
    /// * `tx_index` - Index of the transaction within that block
    /// * `new_amount` - The forged amount
    pub fn tamper_block(
        &self,
        node_id: &str,
        block_index: usize,
        tx_index: usize,
        new_amount: f64,
    ) -> Result<(), SimulatorError> {
        let node_name;
        {
            let mut node = self
                .inner
                .nodes
                .get_mut(node_id)
                .ok_or_else(|| SimulatorError::UnknownNode(node_id.to_string()))?;
            node_name = node.name.clone();

            let block = node
                .chain
                .get_mut(block_index)
                .ok_or(SimulatorError::BlockIndexOutOfRange(block_index))?;
            let tx = block
                .transactions
                .get_mut(tx_index)
                .ok_or(SimulatorError::TransactionIndexOutOfRange(tx_index))?;

            tx.amount = new_amount;
        }

        self.log_event(
            format!(
                "{} tampered with block #{}! Its hash is now invalid.",
                node_name, block_index
            ),
            Severity::Warning,
        );

        Ok(())
    }

    /// Sets the global difficulty shared by all miners
    ///
    /// Takes effect for every mining attempt started afterwards; attempts
    /// already past their difficulty read are unaffected.
    pub fn set_difficulty(&self, difficulty: u32) -> Result<(), SimulatorError> {
        if !(MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&difficulty) {
            return Err(SimulatorError::InvalidDifficulty(difficulty));
        }

        self.inner.difficulty.store(difficulty, Ordering::Relaxed);
        self.log_event(format!("Difficulty set to {}.", difficulty), Severity::Info);

        Ok(())
    }

    /// Sets a node's mining-speed multiplier
    pub fn set_mining_speed(&self, node_id: &str, multiplier: f64) -> Result<(), SimulatorError> {
        if !multiplier.is_finite() || multiplier <= 0.0 {
            return Err(SimulatorError::InvalidMiningSpeed(multiplier));
        }

        let mut node = self
            .inner
            .nodes
            .get_mut(node_id)
            .ok_or_else(|| SimulatorError::UnknownNode(node_id.to_string()))?;
        node.mining_speed = multiplier;
        debug!("{} mining speed set to {}x", node.name, multiplier);

        Ok(())
    }

    /// Gets the current global difficulty
    pub fn difficulty(&self) -> u32 {
        self.inner.difficulty.load(Ordering::Relaxed)
    }

    /// Snapshot of all nodes in their fixed network order
    pub fn nodes(&self) -> Vec<Node> {
        self.inner
            .node_order
            .iter()
            .filter_map(|id| self.inner.nodes.get(id).map(|node| node.value().clone()))
            .collect()
    }

    /// Snapshot of a single node
    pub fn node(&self, node_id: &str) -> Option<Node> {
        self.inner.nodes.get(node_id).map(|node| node.value().clone())
    }

    /// Snapshot of the chronological event log
    pub fn logs(&self) -> Vec<LogEntry> {
        self.inner.logs.lock().unwrap().clone()
    }

    /// Snapshot of the in-flight propagation markers
    pub fn propagation_events(&self) -> Vec<PropagationEvent> {
        self.inner.propagation.lock().unwrap().clone()
    }

    /// Per-block diagnostic statuses of a node's chain
    pub fn block_statuses(&self, node_id: &str) -> Result<Vec<BlockStatus>, SimulatorError> {
        self.inner
            .nodes
            .get(node_id)
            .map(|node| validator::classify(&node.chain))
            .ok_or_else(|| SimulatorError::UnknownNode(node_id.to_string()))
    }

    /// Records an event in the simulation log and mirrors it to the
    /// process logger
    fn log_event(&self, message: impl Into<String>, severity: Severity) {
        let message = message.into();

        match severity {
            Severity::Error => error!("{}", message),
            Severity::Warning => warn!("{}", message),
            _ => info!("{}", message),
        }

        self.inner
            .logs
            .lock()
            .unwrap()
            .push(LogEntry::new(message, severity));
    }
}

impl Default for NetworkSimulator {
    fn default() -> Self {
        Self::new()
    }
}
