use thiserror::Error;

/// Reasons a ledger mutation is refused. A refused mutation leaves the
/// ledger untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("previous hash {given} does not match the current tip {expected}")]
    StaleTip { given: String, expected: String },

    #[error("proof {proof} does not satisfy the puzzle for last proof {last_proof}")]
    InvalidProof { last_proof: u64, proof: u64 },

    #[error("candidate chain of length {candidate} is not longer than local length {local}")]
    NotLonger { candidate: usize, local: usize },

    #[error("candidate chain failed validation")]
    InvalidChain,

    #[error("local chain is corrupted at index {0}")]
    Corrupted(usize),
}

/// Errors surfaced by the node outside the ledger core: peer I/O and config.
#[derive(Error, Debug)]
pub enum NodeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("peer {address} answered with status {status}")]
    PeerStatus { address: String, status: u16 },

    #[error("peer {0} timed out")]
    Timeout(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

pub type Result<T> = std::result::Result<T, NodeError>;
