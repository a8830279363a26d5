pub mod client;
pub mod peers;

pub use client::{ChainSource, HttpClient};
pub use peers::PeerRegistry;
