// Ledger module
//
// This module contains the core ledger data structures:
// - Content-addressing (hashing) helpers
// - Transaction structure
// - Block structure and proof-of-work sealing
// - Chain validation and per-block status classification

pub mod block;
pub mod hasher;
pub mod transaction;
pub mod validator;

// Re-export main components for easier access
pub use block::Block;
pub use transaction::Transaction;
pub use validator::{classify, validate, BlockStatus};
