//! Stream transport

use std::time::Duration;

use async_trait::async_trait;
use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, trace, warn};

use crate::{error::*, Transport};

/// Default capacity for a single read
pub const DEFAULT_READ_CHUNK: usize = 4096;

/// Transport over any connected byte stream
///
/// The stream is connected and owned by the caller; this type only moves
/// bytes. Works with [`TcpStream`] as well as in-memory pipes.
pub struct StreamTransport<S> {
    stream: S,
    peer: String,
    read_chunk: usize,
    shut_down: bool,
}

impl<S> StreamTransport<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + Sync,
{
    /// Wrap a connected stream, labelled `peer` in logs
    pub fn new(stream: S, peer: impl Into<String>) -> Self {
        Self {
            stream,
            peer: peer.into(),
            read_chunk: DEFAULT_READ_CHUNK,
            shut_down: false,
        }
    }

    /// Set the buffer capacity of a single read
    pub fn with_read_chunk(mut self, read_chunk: usize) -> Self {
        self.read_chunk = read_chunk.max(1);
        self
    }
}

impl StreamTransport<TcpStream> {
    /// Wrap a connected TCP stream with Nagle's algorithm disabled
    pub fn from_tcp(stream: TcpStream) -> Result<Self> {
        stream.set_nodelay(true)?;
        let peer = stream.peer_addr()?.to_string();
        debug!("Using TCP stream to {}", peer);
        Ok(Self::new(stream, peer))
    }
}

#[async_trait]
impl<S> Transport for StreamTransport<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + Sync,
{
    async fn send(&mut self, data: &[u8]) -> Result<()> {
        trace!(
            "Sending {} bytes to {}: {:02X?}",
            data.len(),
            self.peer,
            &data[..data.len().min(16)]
        );

        self.stream.write_all(data).await?;
        self.stream.flush().await?;

        Ok(())
    }

    async fn receive(&mut self, wait: Duration) -> Result<BytesMut> {
        let mut buf = BytesMut::with_capacity(self.read_chunk);

        let n = timeout(wait, self.stream.read_buf(&mut buf))
            .await
            .map_err(|_| Error::ReadTimeout)?
            .map_err(Error::Io)?;

        if n == 0 {
            return Err(Error::ConnectionClosed);
        }

        trace!("Received {} bytes from {}: {:02X?}", n, self.peer, &buf[..n.min(16)]);

        Ok(buf)
    }

    async fn shutdown(&mut self) -> Result<()> {
        if !self.shut_down {
            debug!("Shutting down stream to {}", self.peer);
            self.shut_down = true;
            self.stream.shutdown().await?;
        }
        Ok(())
    }

    fn peer(&self) -> &str {
        &self.peer
    }
}

impl<S> Drop for StreamTransport<S> {
    fn drop(&mut self) {
        if !self.shut_down {
            warn!("Stream transport to {} dropped without shutdown", self.peer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tokio::io::duplex;

    #[tokio::test]
    async fn test_send_and_receive() {
        let (near, far) = duplex(64);
        let mut left = StreamTransport::new(near, "left");
        let mut right = StreamTransport::new(far, "right");

        left.send(&[0x08, 0, 0, 0, 0x0D, 0, 0, 0]).await.unwrap();
        let received = right.receive(Duration::from_secs(1)).await.unwrap();
        assert_eq!(&received[..], &[0x08, 0, 0, 0, 0x0D, 0, 0, 0]);
        assert_eq!(right.peer(), "right");

        left.shutdown().await.unwrap();
        right.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_read_chunk_limits_single_read() {
        let (near, far) = duplex(64);
        let mut left = StreamTransport::new(near, "left");
        let mut right = StreamTransport::new(far, "right").with_read_chunk(4);

        left.send(&[1, 2, 3, 4, 5, 6]).await.unwrap();
        let first = right.receive(Duration::from_secs(1)).await.unwrap();
        let second = right.receive(Duration::from_secs(1)).await.unwrap();
        assert_eq!(&first[..], &[1, 2, 3, 4]);
        assert_eq!(&second[..], &[5, 6]);

        left.shutdown().await.unwrap();
        right.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_receive_timeout() {
        let (near, _far) = duplex(64);
        let mut transport = StreamTransport::new(near, "idle");

        let err = transport.receive(Duration::from_millis(200)).await.unwrap_err();
        assert!(matches!(err, Error::ReadTimeout));
        assert!(err.is_recoverable());

        transport.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_remote_close() {
        let (near, far) = duplex(64);
        let mut transport = StreamTransport::new(near, "closing");
        drop(far);

        let err = transport.receive(Duration::from_secs(1)).await.unwrap_err();
        assert!(matches!(err, Error::ConnectionClosed));
        assert!(!err.is_recoverable());

        let _ = transport.shutdown().await;
    }
}
