//! Event channel
//!
//! The second TCP connection of a PTP/IP pair. It is bound to the command
//! channel by the connection number from the init command ack and carries
//! device events plus keep-alive pings.

use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;

use ptpip_core::{
    constants::DEFAULT_TIMEOUT, EventPacket, OutboundPacket, Packet, PacketName, Packetable,
};
use ptpip_transport::Transport;
use tracing::{debug, info, trace, warn};

use crate::{
    channel::Channel,
    error::{Error, Result},
};

/// PTP/IP event channel
pub struct EventChannel {
    channel: Channel,
    pending: VecDeque<EventPacket>,
    initialized: bool,
}

impl EventChannel {
    /// Wrap the transport of a connected event channel
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self {
            channel: Channel::new(Box::new(transport), DEFAULT_TIMEOUT),
            pending: VecDeque::new(),
            initialized: false,
        }
    }

    /// Set how long to wait for each read
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.channel.timeout = timeout;
        self
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Bind this channel to the command channel's connection number
    ///
    /// # Errors
    ///
    /// Returns [`Error::InitFailed`] if the responder refuses the binding.
    pub async fn initialize(&mut self, connection_number: u32) -> Result<()> {
        if self.initialized {
            return Err(Error::InvalidSessionState("Event channel already initialized".into()));
        }

        info!(
            "Initializing event channel to {} (connection {})...",
            self.channel.peer(),
            connection_number
        );
        self.channel
            .send(&OutboundPacket::init_event_request(connection_number))
            .await?;

        loop {
            match self.channel.next_packet().await? {
                Packet::Generic(packet) if packet.name == PacketName::InitEventAck => {
                    self.initialized = true;
                    debug!("Event channel initialized");
                    return Ok(());
                }
                Packet::Generic(packet) if packet.name == PacketName::InitFail => {
                    let reason = packet.data.read_at::<u32>(0);
                    warn!("Event channel refused (reason: {:?})", reason);
                    return Err(Error::InitFailed { reason });
                }
                Packet::Generic(packet) if packet.name == PacketName::Ping => self.pong().await?,
                // Early events are kept for next_event
                Packet::Event(event) => self.pending.push_back(event),
                other => return Err(Error::UnexpectedPacket(other.name())),
            }
        }
    }

    /// Wait for the next device event
    ///
    /// Pings are answered along the way; other packets are skipped.
    pub async fn next_event(&mut self) -> Result<EventPacket> {
        self.ensure_initialized()?;
        if let Some(event) = self.pending.pop_front() {
            return Ok(event);
        }

        loop {
            match self.channel.next_packet().await? {
                Packet::Event(event) => {
                    debug!("Event {} {:?}", event.code, event.parameters);
                    return Ok(event);
                }
                Packet::Generic(packet) if packet.name == PacketName::Ping => self.pong().await?,
                other => trace!("Skipping {} on event channel", other),
            }
        }
    }

    /// Send a ping and wait for the pong
    ///
    /// Events that arrive first are queued for [`next_event`](Self::next_event).
    pub async fn ping(&mut self) -> Result<()> {
        self.ensure_initialized()?;
        self.channel.send(&OutboundPacket::ping()).await?;

        loop {
            match self.channel.next_packet().await? {
                Packet::Generic(packet) if packet.name == PacketName::Pong => return Ok(()),
                Packet::Generic(packet) if packet.name == PacketName::Ping => self.pong().await?,
                Packet::Event(event) => self.pending.push_back(event),
                other => trace!("Skipping {} while waiting for pong", other),
            }
        }
    }

    /// Answer a device ping
    pub async fn pong(&mut self) -> Result<()> {
        self.channel.send(&OutboundPacket::pong()).await
    }

    /// Close the transport
    pub async fn shutdown(&mut self) -> Result<()> {
        info!("Closing event channel to {}", self.channel.peer());
        self.initialized = false;
        self.pending.clear();
        self.channel.shutdown().await
    }

    fn ensure_initialized(&self) -> Result<()> {
        if !self.initialized {
            return Err(Error::InvalidSessionState("Event channel not initialized".into()));
        }
        Ok(())
    }
}

impl fmt::Debug for EventChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventChannel")
            .field("peer", &self.channel.peer())
            .field("initialized", &self.initialized)
            .field("pending", &self.pending.len())
            .finish()
    }
}
