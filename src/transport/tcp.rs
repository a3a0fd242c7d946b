//! TCP transport: each message is a 4-byte big-endian length followed by
//! that many bytes.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio::time::{timeout, Duration};

use crate::transport::Transport;

/// Maximum frame size (10 MB). World snapshots are the largest messages.
pub const MAX_MESSAGE_SIZE: u32 = 10_000_000;

pub struct TcpTransport {
    stream: TcpStream,
    /// Per-operation limit. `None` waits indefinitely, since a turn may
    /// take as long as the opponent likes.
    timeout_duration: Option<Duration>,
    max_message_size: u32,
    shutdown: Arc<AtomicBool>,
}

impl TcpTransport {
    pub fn new(stream: TcpStream) -> Self {
        Self {
            stream,
            timeout_duration: None,
            max_message_size: MAX_MESSAGE_SIZE,
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_timeout(stream: TcpStream, timeout_duration: Duration) -> Self {
        Self {
            timeout_duration: Some(timeout_duration),
            ..Self::new(stream)
        }
    }

    pub fn with_config(
        stream: TcpStream,
        timeout_duration: Option<Duration>,
        max_message_size: u32,
    ) -> Self {
        Self {
            timeout_duration,
            max_message_size,
            ..Self::new(stream)
        }
    }

    pub async fn connect<A: ToSocketAddrs>(addr: A) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        Ok(Self::new(stream))
    }

    /// Request graceful shutdown of the transport.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }

    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }

    async fn limited<F, T>(limit: Option<Duration>, what: &str, op: F) -> anyhow::Result<T>
    where
        F: Future<Output = anyhow::Result<T>>,
    {
        match limit {
            Some(d) => timeout(d, op)
                .await
                .map_err(|_| anyhow::anyhow!("{} timeout after {:?}", what, d))?,
            None => op.await,
        }
    }
}

fn map_io_error(e: std::io::Error) -> anyhow::Error {
    match e.kind() {
        std::io::ErrorKind::UnexpectedEof
        | std::io::ErrorKind::BrokenPipe
        | std::io::ErrorKind::ConnectionReset => anyhow::anyhow!("Connection closed by peer"),
        _ => anyhow::anyhow!("I/O error: {}", e),
    }
}

#[async_trait::async_trait]
impl Transport for TcpTransport {
    async fn send(&mut self, bytes: Vec<u8>) -> anyhow::Result<()> {
        if self.is_shutdown() {
            return Err(anyhow::anyhow!("Transport is shut down"));
        }
        if bytes.len() as u64 > self.max_message_size as u64 {
            return Err(anyhow::anyhow!(
                "Message too large: {} bytes (max: {})",
                bytes.len(),
                self.max_message_size
            ));
        }
        let stream = &mut self.stream;
        let send_op = async move {
            let len = (bytes.len() as u32).to_be_bytes();
            stream.write_all(&len).await.map_err(map_io_error)?;
            stream.write_all(&bytes).await.map_err(map_io_error)?;
            stream.flush().await.map_err(map_io_error)?;
            anyhow::Ok(())
        };
        Self::limited(self.timeout_duration, "Send", send_op).await
    }

    async fn recv(&mut self) -> anyhow::Result<Vec<u8>> {
        if self.is_shutdown() {
            return Err(anyhow::anyhow!("Transport is shut down"));
        }
        let max = self.max_message_size;
        let stream = &mut self.stream;
        let recv_op = async move {
            let mut len_buf = [0u8; 4];
            stream.read_exact(&mut len_buf).await.map_err(map_io_error)?;
            let len = u32::from_be_bytes(len_buf);
            if len > max {
                return Err(anyhow::anyhow!(
                    "Message too large: {} bytes (max: {})",
                    len,
                    max
                ));
            }
            if len == 0 {
                return Err(anyhow::anyhow!("Invalid message length: 0"));
            }
            let mut buf = vec![0u8; len as usize];
            stream.read_exact(&mut buf).await.map_err(map_io_error)?;
            anyhow::Ok(buf)
        };
        Self::limited(self.timeout_duration, "Receive", recv_op).await
    }
}
