// Network module
//
// This module contains the multi-node simulation:
// - Node state (chain, mempool, balance, mining speed)
// - Event log entries and transient propagation markers
// - The network simulator orchestrating mining, broadcast,
//   delayed propagation and fork resolution

pub mod event;
pub mod node;
pub mod simulator;

// Re-export main components for easier access
pub use event::{LogEntry, PropagationEvent, Severity};
pub use node::Node;
pub use simulator::{NetworkSimulator, SimulatorConfig, SimulatorError};
