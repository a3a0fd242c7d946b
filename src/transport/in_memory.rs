//! Process-local transport pair, used by tests and local matches.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tokio::task::yield_now;

use crate::transport::Transport;

type Queue = Arc<Mutex<VecDeque<Vec<u8>>>>;

pub struct InMemoryTransport {
    recv_queue: Queue,
    send_queue: Queue,
    duplicate_sends: bool,
}

impl InMemoryTransport {
    /// Two connected endpoints.
    pub fn pair() -> (Self, Self) {
        let q1: Queue = Arc::new(Mutex::new(VecDeque::new()));
        let q2: Queue = Arc::new(Mutex::new(VecDeque::new()));
        (
            Self {
                recv_queue: q1.clone(),
                send_queue: q2.clone(),
                duplicate_sends: false,
            },
            Self {
                recv_queue: q2,
                send_queue: q1,
                duplicate_sends: false,
            },
        )
    }

    /// Deliver every sent message twice, as an at-least-once link may.
    pub fn with_duplicate_delivery(mut self) -> Self {
        self.duplicate_sends = true;
        self
    }

    /// Messages queued for this endpoint and not yet received.
    pub fn pending(&self) -> usize {
        self.recv_queue.lock().map(|q| q.len()).unwrap_or(0)
    }
}

#[async_trait::async_trait]
impl Transport for InMemoryTransport {
    async fn send(&mut self, bytes: Vec<u8>) -> anyhow::Result<()> {
        let mut queue = self
            .send_queue
            .lock()
            .map_err(|_| anyhow::anyhow!("Send queue poisoned"))?;
        if self.duplicate_sends {
            queue.push_back(bytes.clone());
        }
        queue.push_back(bytes);
        Ok(())
    }

    async fn recv(&mut self) -> anyhow::Result<Vec<u8>> {
        loop {
            let next = {
                let mut queue = self
                    .recv_queue
                    .lock()
                    .map_err(|_| anyhow::anyhow!("Receive queue poisoned"))?;
                queue.pop_front()
            };
            if let Some(bytes) = next {
                return Ok(bytes);
            }
            if Arc::strong_count(&self.recv_queue) == 1 {
                return Err(anyhow::anyhow!("Channel closed"));
            }
            yield_now().await;
        }
    }
}
