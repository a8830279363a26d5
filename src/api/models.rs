use std::sync::{Mutex, RwLock};

use serde::{Deserialize, Serialize};

use crate::blockchain::{Block, Ledger, ProofOfWork};
use crate::config::NodeConfig;
use crate::consensus::ConsensusResolver;
use crate::error::Result;
use crate::miner::Miner;
use crate::network::{HttpClient, PeerRegistry};
use crate::transaction::Transaction;

/// Shared node state: the ledger, the peer set and the collaborators that
/// act on them.
pub struct AppState {
    pub ledger: Mutex<Ledger>,
    pub peers: RwLock<PeerRegistry>,
    pub miner: Miner,
    pub resolver: ConsensusResolver,
    pub client: HttpClient,
}

impl AppState {
    pub fn new(config: &NodeConfig) -> Result<Self> {
        Ok(Self {
            ledger: Mutex::new(Ledger::new(ProofOfWork::new(config.difficulty))),
            peers: RwLock::new(PeerRegistry::new(config.node_address.as_str())),
            miner: Miner::new(config.node_address.as_str()),
            resolver: ConsensusResolver::new(config.peer_timeout),
            client: HttpClient::new(config.node_address.as_str(), config.peer_timeout)?,
        })
    }
}

/* ---------- Chain API Models ---------- */

#[derive(Serialize)]
pub struct ChainResponse<'a> {
    pub length: usize,
    pub difficulty: u32,
    pub chain: &'a [Block],
}

#[derive(Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub length: usize,
    pub difficulty: u32,
}

/* ---------- TX API Models ---------- */

#[derive(Deserialize)]
pub struct NewTxRequest {
    pub sender: String,
    pub recipient: String,
    pub amount: u64,
}

#[derive(Serialize)]
pub struct NewTxResponse {
    pub message: String,
    pub index: u64,
}

#[derive(Serialize)]
pub struct PendingResponse<'a> {
    pub size: usize,
    pub transactions: &'a [Transaction],
}

/* ---------- Node API Models ---------- */

#[derive(Deserialize)]
pub struct NodesRequest {
    pub nodes: Vec<String>,
}

#[derive(Serialize)]
pub struct NodesResponse {
    pub message: String,
    pub total: usize,
}

#[derive(Serialize)]
pub struct PeersResponse {
    pub total: usize,
    pub nodes: Vec<String>,
}

#[derive(Serialize)]
pub struct ResolveResponse<'a> {
    pub replaced: bool,
    pub message: &'static str,
    pub length: usize,
    pub chain: &'a [Block],
}
