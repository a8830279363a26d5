use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::transaction::Transaction;

/// A single block in the ledger. Never mutated once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    pub timestamp: i64, // Unix milliseconds (UTC)
    pub transactions: Vec<Transaction>,
    pub previous_hash: String,
    pub proof: u64, // Proof-of-Work solution relative to the previous block's proof
}

impl Block {
    /// The genesis block shared by every node. All fields are fixed so that
    /// independently started nodes agree on its digest.
    pub fn genesis() -> Self {
        Self {
            index: 1,
            timestamp: 0,
            transactions: Vec::new(),
            previous_hash: String::from("0"),
            proof: 0,
        }
    }

    /// Create a block stamped with the current time.
    pub fn new(
        index: u64,
        previous_hash: String,
        proof: u64,
        transactions: Vec<Transaction>,
    ) -> Self {
        Self {
            index,
            timestamp: Utc::now().timestamp_millis(),
            transactions,
            previous_hash,
            proof,
        }
    }

    /// Canonical preimage hashed by [`Block::digest`].
    ///
    /// `index:timestamp:previous_hash:proof:transactions_json`, where the
    /// transactions are compact JSON with keys in declaration order.
    pub fn canonical_form(&self) -> String {
        let txs_json = serde_json::to_string(&self.transactions).expect("serialize txs");
        format!(
            "{}:{}:{}:{}:{}",
            self.index, self.timestamp, self.previous_hash, self.proof, txs_json
        )
    }

    /// SHA-256 of the canonical form, lowercase hex.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.canonical_form().as_bytes());
        hex::encode(hasher.finalize())
    }
}
