use std::sync::Mutex;
use std::time::Duration;

use futures::future::join_all;
use log::{debug, info, warn};
use tokio::time::timeout;

use crate::blockchain::{Block, Ledger, shares_genesis, validate_chain};
use crate::error::NodeError;
use crate::network::ChainSource;

/// Longest-valid-chain conflict resolution.
#[derive(Debug, Clone, Copy)]
pub struct ConsensusResolver {
    peer_timeout: Duration,
}

impl ConsensusResolver {
    pub fn new(peer_timeout: Duration) -> Self {
        Self { peer_timeout }
    }

    /// Pull every peer's chain and adopt the longest valid one that is
    /// strictly longer than ours. Returns whether the local chain was replaced.
    ///
    /// Peers that fail, time out or send garbage are skipped. Candidates are
    /// weighed in `peers` order, so with a sorted peer list the first of
    /// several equally long winners is kept. The ledger lock is never held
    /// while fetching.
    pub async fn resolve<S: ChainSource + ?Sized>(
        &self,
        ledger: &Mutex<Ledger>,
        peers: &[String],
        source: &S,
    ) -> bool {
        let (local_length, pow) = {
            let l = ledger.lock().expect("mutex poisoned");
            (l.len(), l.pow())
        };

        let fetches = peers.iter().map(|peer| async move {
            let fetched = match timeout(self.peer_timeout, source.fetch_chain(peer)).await {
                Ok(res) => res,
                Err(_) => Err(NodeError::Timeout(peer.clone())),
            };
            (peer, fetched)
        });
        let results = join_all(fetches).await;

        let mut best: Option<(&String, Vec<Block>)> = None;
        let mut best_length = local_length;
        for (peer, fetched) in results {
            let chain = match fetched {
                Ok(chain) => chain,
                Err(e) => {
                    warn!("CONSENSUS - skipping peer {peer}: {e}");
                    continue;
                }
            };
            if chain.len() <= best_length {
                debug!(
                    "CONSENSUS - peer {peer} chain not longer ({} <= {best_length})",
                    chain.len()
                );
                continue;
            }
            if !shares_genesis(&chain) || !validate_chain(&chain, &pow) {
                warn!("CONSENSUS - peer {peer} sent an invalid chain of length {}", chain.len());
                continue;
            }
            best_length = chain.len();
            best = Some((peer, chain));
        }

        let Some((peer, chain)) = best else {
            debug!("CONSENSUS - local chain of length {local_length} stands");
            return false;
        };

        let mut l = ledger.lock().expect("mutex poisoned");
        match l.replace(chain) {
            Ok(()) => {
                info!("CONSENSUS - adopted chain of length {best_length} from {peer}");
                true
            }
            Err(e) => {
                // Local mining may have outgrown the candidate while fetching.
                info!("CONSENSUS - candidate from {peer} dropped: {e}");
                false
            }
        }
    }
}
