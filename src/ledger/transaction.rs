use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a value transfer between two nodes
///
/// A transaction is immutable once created; the only sanctioned mutation
/// path is the simulator's explicit tamper operation, which edits the
/// `amount` of a transaction already stored in a sealed block to
/// demonstrate hash invalidation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier for the transaction
    pub id: String,

    /// Sender's node id, or `None` for system/reward transfers
    pub from: Option<String>,

    /// Recipient's node id
    pub to: String,

    /// Amount being transferred
    pub amount: f64,

    /// Timestamp when the transaction was created
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Creates a new transaction
    ///
    /// # Arguments
    ///
    /// * `from` - The sender's node id, or `None` for a system transfer
    /// * `to` - The recipient's node id
    /// * `amount` - The amount to transfer
    ///
    /// # Returns
    ///
    /// A new Transaction instance with a fresh unique id
    pub fn new(from: Option<String>, to: String, amount: f64) -> Self {
        Transaction {
            id: Uuid::new_v4().to_string(),
            from,
            to,
            amount,
            created_at: Utc::now(),
        }
    }
}
