//! A small peer-to-peer ledger network simulator for teaching.
//!
//! Several independent nodes each hold a local chain of hash-linked
//! blocks and a pending-transaction pool, mine new blocks under an
//! adjustable proof-of-work difficulty, and propagate mined blocks to
//! peers after a simulated network delay. Peers adopt an incoming chain
//! only if it is strictly longer and independently valid, and an explicit
//! tamper operation demonstrates how editing sealed data is detected.
//!
//! The crate is the simulation engine only: a presentation layer drives
//! it through [`NetworkSimulator`] operations and reads back serializable
//! snapshots plus a chronological event log. There is no real networking,
//! no signatures and no persistence.
//!
//! ```no_run
//! use ledgersim::NetworkSimulator;
//!
//! # async fn demo() {
//! let simulator = NetworkSimulator::new();
//! simulator.submit_transaction("node1", "node2", 10.0).unwrap();
//! simulator.mine_block("node1").await.unwrap();
//! # }
//! ```

pub mod ledger;
pub mod network;

// Re-export main components for easier access
pub use ledger::block::Block;
pub use ledger::transaction::Transaction;
pub use ledger::validator::{classify, validate, BlockStatus};
pub use network::event::{LogEntry, PropagationEvent, Severity};
pub use network::node::Node;
pub use network::simulator::{NetworkSimulator, SimulatorConfig, SimulatorError};
