//! Engine configuration.

/// Tunables for the bridge engine and its UDP transport.
#[derive(Debug, Clone)]
pub struct BridgeOscConfig {
    /// Capacity of the network -> audio thread event queue.
    pub queue_capacity: usize,
    /// Local bind address for the UDP listener. Port 0 lets the OS pick.
    pub bind_addr: String,
    /// Receive buffer size for inbound datagrams.
    pub recv_buffer_size: usize,
}

impl Default for BridgeOscConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 128,
            bind_addr: "0.0.0.0:0".to_string(),
            recv_buffer_size: 8192,
        }
    }
}
