//! Transport layer for PTP/IP
//!
//! Moves raw bytes over a caller-connected duplex stream. Framing happens a
//! layer up; a single receive may return part of a packet or several.

pub mod error;
pub mod stream;

pub use error::{Error, Result};
pub use stream::StreamTransport;

use std::time::Duration;

use async_trait::async_trait;
use bytes::BytesMut;

/// Byte transport for one PTP/IP channel
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send raw bytes
    async fn send(&mut self, data: &[u8]) -> Result<()>;

    /// Receive whatever bytes arrive next, waiting at most `wait`
    async fn receive(&mut self, wait: Duration) -> Result<BytesMut>;

    /// Close the write half
    async fn shutdown(&mut self) -> Result<()>;

    /// Remote endpoint label
    fn peer(&self) -> &str;
}
