pub mod block;
pub mod model;
pub mod pow;
pub mod validator;

pub use block::Block;
pub use model::Ledger;
pub use pow::ProofOfWork;
pub use validator::{shares_genesis, validate_chain};

/// Default Proof-of-Work difficulty (number of leading zero hex digits).
pub const DEFAULT_DIFFICULTY: u32 = 4;

/// Hex width of a SHA-256 digest; no puzzle can ask for more zeros.
pub const MAX_DIFFICULTY: u32 = 64;

/// Sender recorded on mining rewards.
pub const REWARD_SENDER: &str = "0";

/// Amount credited to the miner per block.
pub const MINING_REWARD: u64 = 1;
