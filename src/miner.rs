use std::sync::Mutex;

use log::{debug, info};
use serde::Serialize;

use crate::blockchain::{Ledger, MINING_REWARD, REWARD_SENDER};
use crate::error::LedgerError;
use crate::transaction::Transaction;

/// Outcome of one mining round.
#[derive(Debug, Clone, Serialize)]
pub struct MiningResult {
    pub message: String,
    pub index: u64,
    pub previous_hash: String,
    pub proof: u64,
    pub transactions: Vec<Transaction>,
}

/// Runs mining rounds on behalf of one node, crediting the reward to it.
#[derive(Debug, Clone)]
pub struct Miner {
    node_address: String,
}

impl Miner {
    pub fn new(node_address: impl Into<String>) -> Self {
        Self {
            node_address: node_address.into(),
        }
    }

    /// Solve the puzzle for the current tip and seal a block crediting the
    /// reward to this node.
    ///
    /// The ledger lock is only held to snapshot the tip and to append, so the
    /// search does not block readers. If the tip moves while searching (a
    /// concurrent round or a chain replacement), the round starts over on the
    /// new tip.
    pub fn mine(&self, ledger: &Mutex<Ledger>) -> Result<MiningResult, LedgerError> {
        loop {
            let (last_proof, previous_hash, pow) = {
                let l = ledger.lock().expect("mutex poisoned");
                let tip = l.tip();
                (tip.proof, tip.digest(), l.pow())
            };

            let proof = pow.solve(last_proof);

            let mut l = ledger.lock().expect("mutex poisoned");
            match l.check_extension(proof, &previous_hash) {
                Ok(()) => {}
                Err(LedgerError::StaleTip { .. }) => {
                    debug!("MINER - tip moved during proof search, restarting round");
                    continue;
                }
                Err(e) => return Err(e),
            }
            // queue the reward only once the block is known to be accepted
            l.queue_transaction(REWARD_SENDER, self.node_address.as_str(), MINING_REWARD);
            let block = l.append(proof, Some(previous_hash.clone()))?;
            info!(
                "MINER - forged block #{} (proof={}, txs={})",
                block.index,
                block.proof,
                block.transactions.len()
            );
            return Ok(MiningResult {
                message: "New Block Forged".to_string(),
                index: block.index,
                previous_hash,
                proof: block.proof,
                transactions: block.transactions,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::thread;

    use super::Miner;
    use crate::blockchain::{Block, Ledger, ProofOfWork, validate_chain};
    use crate::transaction::Transaction;

    const NODE: &str = "http://127.0.0.1:8080";

    #[test]
    fn first_round_on_fresh_ledger() {
        let ledger = Mutex::new(Ledger::new(ProofOfWork::default()));
        let result = Miner::new(NODE).mine(&ledger).unwrap();

        let l = ledger.lock().unwrap();
        assert_eq!(l.len(), 2);
        assert_eq!(result.index, 2);
        assert_eq!(result.message, "New Block Forged");
        assert_eq!(result.previous_hash, Block::genesis().digest());
        assert!(l.pow().satisfies(0, result.proof));
        assert_eq!(result.transactions, vec![Transaction::new("0", NODE, 1)]);
        assert_eq!(l.tip().transactions, result.transactions);
        assert!(l.pending().is_empty());
    }

    #[test]
    fn reward_joins_queued_transactions() {
        let ledger = Mutex::new(Ledger::new(ProofOfWork::new(2)));
        ledger.lock().unwrap().queue_transaction("alice", "bob", 3);

        let result = Miner::new(NODE).mine(&ledger).unwrap();
        assert_eq!(
            result.transactions,
            vec![
                Transaction::new("alice", "bob", 3),
                Transaction::new("0", NODE, 1)
            ]
        );
    }

    #[test]
    fn concurrent_rounds_keep_chain_valid() {
        let pow = ProofOfWork::new(2);
        let ledger = Arc::new(Mutex::new(Ledger::new(pow)));
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let ledger = Arc::clone(&ledger);
                thread::spawn(move || {
                    let miner = Miner::new(format!("http://node-{i}"));
                    for _ in 0..3 {
                        miner.mine(&ledger).unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let l = ledger.lock().unwrap();
        assert_eq!(l.len(), 13);
        assert!(validate_chain(&l.chain(), &pow));
        // One reward per block, never duplicated.
        assert!(l.chain().iter().skip(1).all(|b| b.transactions.len() == 1));
        assert!(l.pending().is_empty());
    }
}
