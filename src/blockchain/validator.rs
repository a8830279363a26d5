use super::{Block, ProofOfWork};

/// Check that a candidate chain is internally consistent: every block links
/// to the digest of its predecessor, carries the next index, and holds a
/// proof that solves the puzzle for the predecessor's proof.
///
/// Empty and single-block chains are trivially valid. Timestamps are not
/// checked.
pub fn validate_chain(chain: &[Block], pow: &ProofOfWork) -> bool {
    first_invalid(chain, pow).is_none()
}

/// Position of the first block that breaks the chain rules, if any.
pub fn first_invalid(chain: &[Block], pow: &ProofOfWork) -> Option<usize> {
    chain
        .windows(2)
        .position(|pair| {
            let (prev, cur) = (&pair[0], &pair[1]);
            cur.previous_hash != prev.digest()
                || prev.index.checked_add(1) != Some(cur.index)
                || !pow.satisfies(prev.proof, cur.proof)
        })
        .map(|i| i + 1)
}

/// Whether the chain starts at this network's genesis block.
pub fn shares_genesis(chain: &[Block]) -> bool {
    chain.first() == Some(&Block::genesis())
}
