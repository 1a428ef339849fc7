//! Packet-level plumbing shared by the command and event channels

use std::collections::VecDeque;
use std::time::Duration;

use ptpip_core::{OutboundPacket, Packet, PacketStream};
use ptpip_transport::Transport;
use tracing::trace;

use crate::error::Result;

/// One TCP connection's worth of framing state
pub(crate) struct Channel {
    transport: Box<dyn Transport>,
    stream: PacketStream,
    inbox: VecDeque<Packet>,
    pub(crate) timeout: Duration,
}

impl Channel {
    pub(crate) fn new(transport: Box<dyn Transport>, timeout: Duration) -> Self {
        Self {
            transport,
            stream: PacketStream::new(),
            inbox: VecDeque::new(),
            timeout,
        }
    }

    pub(crate) fn peer(&self) -> &str {
        self.transport.peer()
    }

    pub(crate) async fn send(&mut self, packet: &OutboundPacket) -> Result<()> {
        trace!("Sending {:?}", packet);
        self.transport.send(&packet.to_bytes()).await?;
        Ok(())
    }

    /// Next complete packet, reading from the transport as needed
    pub(crate) async fn next_packet(&mut self) -> Result<Packet> {
        loop {
            if let Some(packet) = self.inbox.pop_front() {
                trace!("Received {}", packet);
                return Ok(packet);
            }

            let bytes = self.transport.receive(self.timeout).await?;
            self.stream.extend(&bytes)?;
            self.inbox.extend(self.stream.next_packets());
        }
    }

    pub(crate) async fn shutdown(&mut self) -> Result<()> {
        self.stream.clear();
        self.inbox.clear();
        self.transport.shutdown().await?;
        Ok(())
    }
}
