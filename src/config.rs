use std::collections::HashMap;
use std::env;
use std::time::Duration;

use crate::blockchain::{DEFAULT_DIFFICULTY, MAX_DIFFICULTY};
use crate::error::{NodeError, Result};

/// Runtime settings of a node, read from the environment (and `.env`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeConfig {
    pub host: String,
    pub port: u16,
    /// Address peers use to reach this node, e.g. `http://10.0.0.5:8080`.
    pub node_address: String,
    /// Seed node to announce ourselves to on startup.
    pub seed_node: Option<String>,
    pub difficulty: u32,
    pub peer_timeout: Duration,
}

impl NodeConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(env::vars().collect())
    }

    fn from_vars(vars: HashMap<String, String>) -> Result<Self> {
        let get = |key: &str| vars.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());

        let host = get("HOST").unwrap_or("127.0.0.1").to_string();
        let port = parse_or(get("PORT"), "PORT", 8080u16)?;
        let difficulty = parse_or(get("DIFFICULTY"), "DIFFICULTY", DEFAULT_DIFFICULTY)?;
        if !(1..=MAX_DIFFICULTY).contains(&difficulty) {
            return Err(NodeError::Config(format!(
                "DIFFICULTY must be within 1..={MAX_DIFFICULTY}, got {difficulty}"
            )));
        }
        let peer_timeout_secs = parse_or(get("PEER_TIMEOUT_SECS"), "PEER_TIMEOUT_SECS", 5u64)?;

        let node_address = get("NODE_ADDRESS")
            .map(|a| a.trim_end_matches('/').to_string())
            .unwrap_or_else(|| format!("http://{host}:{port}"));
        let seed_node = get("SEED_NODE").map(|a| a.trim_end_matches('/').to_string());

        Ok(Self {
            host,
            port,
            node_address,
            seed_node,
            difficulty,
            peer_timeout: Duration::from_secs(peer_timeout_secs),
        })
    }
}

fn parse_or<T: std::str::FromStr>(value: Option<&str>, key: &str, default: T) -> Result<T> {
    match value {
        None => Ok(default),
        Some(v) => v
            .parse()
            .map_err(|_| NodeError::Config(format!("{key} has an invalid value: {v:?}"))),
    }
}
