use std::collections::BTreeSet;

/// Known peer addresses of this node. Sorted, so every snapshot is iterated
/// in the same order.
#[derive(Debug, Clone)]
pub struct PeerRegistry {
    self_address: String,
    peers: BTreeSet<String>,
}

fn normalize(address: &str) -> &str {
    address.trim().trim_end_matches('/')
}

impl PeerRegistry {
    pub fn new(self_address: impl Into<String>) -> Self {
        Self {
            self_address: normalize(&self_address.into()).to_string(),
            peers: BTreeSet::new(),
        }
    }

    /// Add a peer. Our own address and blanks are ignored. Returns whether the
    /// set changed.
    pub fn register(&mut self, address: &str) -> bool {
        let address = normalize(address);
        if address.is_empty() || address == self.self_address {
            return false;
        }
        self.peers.insert(address.to_string())
    }

    /// Register every address; returns the registry size afterwards.
    pub fn register_all<S: AsRef<str>>(&mut self, addresses: &[S]) -> usize {
        for a in addresses {
            self.register(a.as_ref());
        }
        self.peers.len()
    }

    pub fn deregister(&mut self, address: &str) -> bool {
        self.peers.remove(normalize(address))
    }

    /// Deregister every address; returns the registry size afterwards.
    pub fn deregister_all<S: AsRef<str>>(&mut self, addresses: &[S]) -> usize {
        for a in addresses {
            self.deregister(a.as_ref());
        }
        self.peers.len()
    }

    pub fn list(&self) -> Vec<String> {
        self.peers.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::PeerRegistry;

    const ME: &str = "http://127.0.0.1:5000";

    #[test]
    fn self_registration_is_ignored() {
        let mut r = PeerRegistry::new(ME);
        assert!(!r.register(ME));
        assert!(!r.register("http://127.0.0.1:5000/"));
        assert_eq!(r.len(), 0);
    }

    #[test]
    fn registration_is_idempotent() {
        let mut r = PeerRegistry::new(ME);
        assert!(r.register("http://127.0.0.1:5001"));
        assert!(!r.register("http://127.0.0.1:5001"));
        assert!(!r.register(" http://127.0.0.1:5001/ "));
        assert!(!r.register(""));
        assert_eq!(r.len(), 1);
    }

    #[test]
    fn deregistering_unknown_is_a_no_op() {
        let mut r = PeerRegistry::new(ME);
        r.register("http://b");
        assert!(!r.deregister("http://z"));
        assert!(r.deregister("http://b/"));
        assert_eq!(r.len(), 0);
    }

    #[test]
    fn bulk_operations_return_size_and_list_is_sorted() {
        let mut r = PeerRegistry::new(ME);
        assert_eq!(r.register_all(&["http://c", "http://a", ME, "http://b"]), 3);
        assert_eq!(r.list(), vec!["http://a", "http://b", "http://c"]);
        assert_eq!(r.deregister_all(&["http://a", "http://missing"]), 2);
    }
}
