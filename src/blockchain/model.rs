use std::sync::Arc;

use log::debug;

use super::validator::{first_invalid, shares_genesis, validate_chain};
use super::{Block, ProofOfWork};
use crate::error::LedgerError;
use crate::transaction::Transaction;

/// In-memory ledger: the block sequence plus the pending-transaction buffer.
///
/// The chain is held behind an `Arc` so readers get immutable snapshots and
/// conflict resolution swaps the whole sequence in one step.
#[derive(Debug)]
pub struct Ledger {
    chain: Arc<Vec<Block>>,
    pending: Vec<Transaction>,
    pow: ProofOfWork,
}

impl Ledger {
    /// Initialize a ledger holding only the genesis block.
    pub fn new(pow: ProofOfWork) -> Self {
        Self {
            chain: Arc::new(vec![Block::genesis()]),
            pending: Vec::new(),
            pow,
        }
    }

    /// Return the last block in the chain.
    pub fn tip(&self) -> &Block {
        self.chain
            .last()
            .expect("ledger always holds at least the genesis block")
    }

    /// Queue a transaction for the next block; returns that block's index.
    pub fn queue_transaction(
        &mut self,
        sender: impl Into<String>,
        recipient: impl Into<String>,
        amount: u64,
    ) -> u64 {
        self.pending.push(Transaction::new(sender, recipient, amount));
        self.tip().index + 1
    }

    /// Seal the pending buffer into a new block on top of the tip.
    ///
    /// `previous_hash` defaults to the tip's digest. A supplied hash that
    /// doesn't match the tip, or a proof that doesn't solve the puzzle for
    /// the tip's proof, is refused and nothing changes.
    pub fn append(
        &mut self,
        proof: u64,
        previous_hash: Option<String>,
    ) -> Result<Block, LedgerError> {
        let previous_hash = previous_hash.unwrap_or_else(|| self.tip().digest());
        self.check_extension(proof, &previous_hash)?;

        let index = self.chain.len() as u64 + 1;
        let transactions = std::mem::take(&mut self.pending);
        let block = Block::new(index, previous_hash, proof, transactions);
        Arc::make_mut(&mut self.chain).push(block.clone());
        debug!(
            "LEDGER - appended block #{} ({} txs)",
            block.index,
            block.transactions.len()
        );
        Ok(block)
    }

    /// Whether a block with `proof` on top of `previous_hash` would be
    /// accepted by [`Ledger::append`] right now.
    pub fn check_extension(&self, proof: u64, previous_hash: &str) -> Result<(), LedgerError> {
        let tip = self.tip();
        let expected = tip.digest();
        if previous_hash != expected {
            return Err(LedgerError::StaleTip {
                given: previous_hash.to_string(),
                expected,
            });
        }
        if !self.pow.satisfies(tip.proof, proof) {
            return Err(LedgerError::InvalidProof {
                last_proof: tip.proof,
                proof,
            });
        }
        Ok(())
    }

    /// Swap in a whole new chain. It must be strictly longer than the local
    /// one, start at genesis and validate. The pending buffer is kept.
    pub fn replace(&mut self, new_chain: Vec<Block>) -> Result<(), LedgerError> {
        if new_chain.len() <= self.chain.len() {
            return Err(LedgerError::NotLonger {
                candidate: new_chain.len(),
                local: self.chain.len(),
            });
        }
        if !shares_genesis(&new_chain) || !validate_chain(&new_chain, &self.pow) {
            return Err(LedgerError::InvalidChain);
        }
        debug!(
            "LEDGER - replacing chain: {} -> {} blocks",
            self.chain.len(),
            new_chain.len()
        );
        self.chain = Arc::new(new_chain);
        Ok(())
    }

    /// Re-validate the local chain from genesis.
    pub fn verify_integrity(&self) -> Result<(), LedgerError> {
        if !shares_genesis(&self.chain) {
            return Err(LedgerError::Corrupted(0));
        }
        match first_invalid(&self.chain, &self.pow) {
            Some(i) => Err(LedgerError::Corrupted(i)),
            None => Ok(()),
        }
    }

    /// Immutable snapshot of the current chain.
    pub fn chain(&self) -> Arc<Vec<Block>> {
        Arc::clone(&self.chain)
    }

    pub fn pending(&self) -> &[Transaction] {
        &self.pending
    }

    pub fn pow(&self) -> ProofOfWork {
        self.pow
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }
}

#[cfg(test)]
mod tests {
    use super::Ledger;
    use crate::blockchain::{Block, ProofOfWork};
    use crate::error::LedgerError;
    use crate::transaction::Transaction;

    fn ledger() -> Ledger {
        Ledger::new(ProofOfWork::new(2))
    }

    fn mine_next(ledger: &mut Ledger) -> Block {
        let proof = ledger.pow().solve(ledger.tip().proof);
        ledger.append(proof, None).unwrap()
    }

    #[test]
    fn starts_with_genesis() {
        let l = ledger();
        assert_eq!(l.len(), 1);
        assert_eq!(l.tip(), &Block::genesis());
        assert!(l.verify_integrity().is_ok());
    }

    #[test]
    fn queue_returns_next_index() {
        let mut l = ledger();
        assert_eq!(l.queue_transaction("a", "b", 5), 2);
        mine_next(&mut l);
        assert_eq!(l.queue_transaction("a", "b", 5), 3);
    }

    #[test]
    fn append_drains_pending_into_exactly_one_block() {
        let mut l = ledger();
        l.queue_transaction("a", "b", 1);
        l.queue_transaction("c", "d", 2);
        let queued = l.pending().to_vec();

        let block = mine_next(&mut l);
        assert_eq!(block.transactions, queued);
        assert!(l.pending().is_empty());

        let next = mine_next(&mut l);
        assert!(next.transactions.is_empty());
        assert_eq!(
            l.chain().iter().map(|b| b.transactions.len()).sum::<usize>(),
            2
        );
    }

    #[test]
    fn appended_blocks_link_and_index() {
        let mut l = ledger();
        for _ in 0..3 {
            mine_next(&mut l);
        }
        let chain = l.chain();
        for (i, b) in chain.iter().enumerate() {
            assert_eq!(b.index, i as u64 + 1);
        }
        for pair in chain.windows(2) {
            assert_eq!(pair[1].previous_hash, pair[0].digest());
        }
        assert!(l.verify_integrity().is_ok());
    }

    #[test]
    fn append_with_stale_hash_is_refused() {
        let mut l = ledger();
        l.queue_transaction("a", "b", 1);
        let proof = l.pow().solve(l.tip().proof);
        let err = l.append(proof, Some("not-the-tip".into())).unwrap_err();
        assert!(matches!(err, LedgerError::StaleTip { .. }));
        assert_eq!(l.len(), 1);
        assert_eq!(l.pending(), &[Transaction::new("a", "b", 1)]);
    }

    #[test]
    fn append_with_bad_proof_is_refused() {
        let mut l = ledger();
        let pow = l.pow();
        let bad = (0u64..).find(|p| !pow.satisfies(0, *p)).unwrap();
        let err = l.append(bad, None).unwrap_err();
        assert_eq!(
            err,
            LedgerError::InvalidProof {
                last_proof: 0,
                proof: bad
            }
        );
        assert_eq!(l.len(), 1);
    }

    #[test]
    fn refused_extension_leaves_pending_alone() {
        let mut l = ledger();
        l.queue_transaction("a", "b", 1);
        let pow = l.pow();
        let tip_hash = l.tip().digest();
        let bad = (0u64..).find(|p| !pow.satisfies(0, *p)).unwrap();

        assert!(l.check_extension(bad, &tip_hash).is_err());
        assert!(matches!(
            l.check_extension(pow.solve(0), "elsewhere"),
            Err(LedgerError::StaleTip { .. })
        ));
        assert!(l.check_extension(pow.solve(0), &tip_hash).is_ok());
        assert_eq!(l.pending(), &[Transaction::new("a", "b", 1)]);
        assert_eq!(l.len(), 1);
    }

    #[test]
    fn replace_swaps_longer_chain_and_keeps_pending() {
        let mut other = ledger();
        for _ in 0..3 {
            mine_next(&mut other);
        }

        let mut l = ledger();
        mine_next(&mut l);
        l.queue_transaction("x", "y", 9);
        let before = l.chain();

        l.replace(other.chain().to_vec()).unwrap();
        assert_eq!(l.len(), 4);
        assert_eq!(l.chain(), other.chain());
        assert_eq!(l.pending().len(), 1);
        // Old snapshot is untouched by the swap.
        assert_eq!(before.len(), 2);
    }

    #[test]
    fn replace_refuses_equal_length_and_invalid() {
        let mut a = ledger();
        mine_next(&mut a);
        let mut b = ledger();
        mine_next(&mut b);

        let err = a.replace(b.chain().to_vec()).unwrap_err();
        assert_eq!(
            err,
            LedgerError::NotLonger {
                candidate: 2,
                local: 2
            }
        );

        mine_next(&mut b);
        let mut forged = b.chain().to_vec();
        forged[1].proof += 1;
        assert_eq!(a.replace(forged), Err(LedgerError::InvalidChain));
    }

    #[test]
    fn integrity_fault_is_reported() {
        let mut l = ledger();
        mine_next(&mut l);
        mine_next(&mut l);
        std::sync::Arc::make_mut(&mut l.chain)[1].timestamp += 1;
        assert_eq!(l.verify_integrity(), Err(LedgerError::Corrupted(2)));
    }
}
