use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info};
use reqwest::Client;
use serde::Deserialize;

use crate::blockchain::Block;
use crate::error::{NodeError, Result};

/// Where conflict resolution gets peers' chains from.
#[async_trait]
pub trait ChainSource: Send + Sync {
    async fn fetch_chain(&self, address: &str) -> Result<Vec<Block>>;
}

/// Body of a peer's `GET /api/v1/chain/`.
#[derive(Debug, Deserialize)]
struct PeerChain {
    chain: Vec<Block>,
}

/// HTTP transport to other nodes: chain fetches and seed notifications.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    self_address: String,
}

impl HttpClient {
    pub fn new(self_address: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            self_address: self_address.into(),
        })
    }

    /// Tell `seed` about this node so it adds us to its peers.
    pub async fn announce(&self, seed: &str) -> Result<()> {
        self.notify(seed, "nodes/broadcast_ip/").await
    }

    /// Tell `seed` this node is leaving.
    pub async fn withdraw(&self, seed: &str) -> Result<()> {
        self.notify(seed, "nodes/broadcast_de_registration/").await
    }

    async fn notify(&self, seed: &str, path: &str) -> Result<()> {
        if seed == self.self_address {
            debug!("seed {seed} is this node, skipping {path}");
            return Ok(());
        }
        let url = endpoint(seed, path);
        info!("broadcasting {} to {}", self.self_address, url);
        let resp = self
            .client
            .post(&url)
            .json(&[self.self_address.as_str()])
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(NodeError::PeerStatus {
                address: seed.to_string(),
                status: resp.status().as_u16(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ChainSource for HttpClient {
    async fn fetch_chain(&self, address: &str) -> Result<Vec<Block>> {
        let resp = self.client.get(endpoint(address, "chain/")).send().await?;
        if !resp.status().is_success() {
            return Err(NodeError::PeerStatus {
                address: address.to_string(),
                status: resp.status().as_u16(),
            });
        }
        let body: PeerChain = resp.json().await?;
        Ok(body.chain)
    }
}

fn endpoint(address: &str, path: &str) -> String {
    format!("{}/api/v1/{path}", address.trim_end_matches('/'))
}
