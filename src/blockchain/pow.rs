use sha2::{Digest, Sha256};

use super::{DEFAULT_DIFFICULTY, MAX_DIFFICULTY};

/// The proof-of-work puzzle: find `proof` such that
/// `sha256("{last_proof}{proof}")` starts with `difficulty` zero hex digits.
///
/// Proofs are `u64`. The search never wraps; exhausting the space panics,
/// which at any supported difficulty is unreachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProofOfWork {
    difficulty: u32,
}

impl Default for ProofOfWork {
    fn default() -> Self {
        Self {
            difficulty: DEFAULT_DIFFICULTY,
        }
    }
}

impl ProofOfWork {
    /// `difficulty` is clamped to `1..=MAX_DIFFICULTY`.
    pub const fn new(difficulty: u32) -> Self {
        let difficulty = if difficulty == 0 {
            1
        } else if difficulty > MAX_DIFFICULTY {
            MAX_DIFFICULTY
        } else {
            difficulty
        };
        Self { difficulty }
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    /// Hex digest checked by [`ProofOfWork::satisfies`].
    pub fn puzzle_hash(last_proof: u64, proof: u64) -> String {
        let mut hasher = Sha256::new();
        hasher.update(format!("{last_proof}{proof}").as_bytes());
        hex::encode(hasher.finalize())
    }

    pub fn satisfies(&self, last_proof: u64, proof: u64) -> bool {
        Self::puzzle_hash(last_proof, proof)
            .bytes()
            .take(self.difficulty as usize)
            .all(|c| c == b'0')
    }

    /// Smallest non-negative proof satisfying the puzzle for `last_proof`.
    pub fn solve(&self, last_proof: u64) -> u64 {
        let mut proof = 0u64;
        while !self.satisfies(last_proof, proof) {
            proof = proof
                .checked_add(1)
                .expect("proof search exhausted the u64 space");
        }
        proof
    }
}
