//! Peer transports: reliable, ordered delivery of opaque message bytes.

/// Link to the connected peers of a match.
///
/// `send` hands bytes to every connected peer and returns once they are
/// queued; there is no acknowledgment. `recv` yields the next complete
/// message from any peer.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn send(&mut self, bytes: Vec<u8>) -> anyhow::Result<()>;
    async fn recv(&mut self) -> anyhow::Result<Vec<u8>>;
}

pub mod in_memory;
pub mod tcp;
