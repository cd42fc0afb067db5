//! Forward-port policy: decides whether a requested bind port may be opened.
//!
//! A pure predicate with no side effects; it never blocks and never fails.

/// Ports that are never eligible for forwarding, by default: the server's
/// own control plane and well-known protocols it does not intend to proxy.
pub const DEFAULT_RESERVED_PORTS: [u16; 3] = [22, 80, 443];

/// Ports at or below this are privileged and refused (port 0 excepted,
/// which delegates to the OS's ephemeral assignment).
pub const DEFAULT_MIN_PORT: u16 = 1024;

/// Decides which bind ports a `tcpip-forward` request may open.
#[derive(Debug, Clone)]
pub struct ForwardPolicy {
    reserved_ports: Vec<u16>,
    min_port: u16,
}

impl Default for ForwardPolicy {
    fn default() -> Self {
        Self {
            reserved_ports: DEFAULT_RESERVED_PORTS.to_vec(),
            min_port: DEFAULT_MIN_PORT,
        }
    }
}

impl ForwardPolicy {
    pub fn new(reserved_ports: Vec<u16>, min_port: u16) -> Self {
        Self {
            reserved_ports,
            min_port,
        }
    }

    /// Whether `port` may be bound.
    ///
    /// Port 0 is always allowed. Reserved ports are always rejected. All
    /// other ports are allowed only above the privileged floor. Ports beyond
    /// the TCP range pass the policy and fail later at bind time.
    pub fn allows(&self, port: u32) -> bool {
        if port == 0 {
            return true;
        }
        if self.reserved_ports.iter().any(|&r| u32::from(r) == port) {
            return false;
        }
        port > u32::from(self.min_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ephemeral_always_allowed() {
        assert!(ForwardPolicy::default().allows(0));
    }

    #[test]
    fn reserved_ports_rejected() {
        let policy = ForwardPolicy::default();
        assert!(!policy.allows(22));
        assert!(!policy.allows(80));
        assert!(!policy.allows(443));
    }

    #[test]
    fn privileged_ports_rejected() {
        let policy = ForwardPolicy::default();
        assert!(!policy.allows(1));
        assert!(!policy.allows(1000));
        assert!(!policy.allows(1024));
    }

    #[test]
    fn high_ports_allowed() {
        let policy = ForwardPolicy::default();
        assert!(policy.allows(1025));
        assert!(policy.allows(8080));
        assert!(policy.allows(65535));
    }

    #[test]
    fn custom_reserved_set() {
        let policy = ForwardPolicy::new(vec![9999], 1024);
        assert!(policy.allows(8080));
        assert!(!policy.allows(9999));
        // 22 is no longer reserved but still privileged.
        assert!(!policy.allows(22));
    }
}
