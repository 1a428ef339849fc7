//! # ptpip
//!
//! Client for PTP/IP (Picture Transfer Protocol over TCP/IP) cameras.
//!
//! ## Features
//!
//! - Command channel with init handshake, sessions and data phases
//! - Event channel with keep-alive handling
//! - Device info and vendor extension merging
//! - Typed device property descriptors
//! - Async/await API using Tokio over any connected byte stream
//!
//! ## Quick Start
//!
//! ```no_run
//! use ptpip::{Connection, EventChannel, StreamTransport};
//! use tokio::net::TcpStream;
//!
//! #[tokio::main]
//! async fn main() -> ptpip::Result<()> {
//!     let address = ("192.168.122.1", ptpip::DEFAULT_PORT);
//!     let command = TcpStream::connect(address)
//!         .await
//!         .map_err(ptpip_transport::Error::from)?;
//!     let mut connection = Connection::new(StreamTransport::from_tcp(command)?);
//!     connection.initialize().await?;
//!
//!     let event = TcpStream::connect(address)
//!         .await
//!         .map_err(ptpip_transport::Error::from)?;
//!     let mut events = EventChannel::new(StreamTransport::from_tcp(event)?);
//!     events
//!         .initialize(connection.session().connection_number())
//!         .await?;
//!
//!     connection.open_session(1).await?;
//!     let info = connection
//!         .get_device_info_with_extension(ptpip::DEFAULT_EXT_INFO_VERSION)
//!         .await?;
//!     println!("{}", info);
//!
//!     let event = events.next_event().await?;
//!     println!("{} {:?}", event.code, event.parameters);
//!
//!     connection.shutdown().await?;
//!     events.shutdown().await?;
//!     Ok(())
//! }
//! ```

mod channel;
pub mod connection;
pub mod error;
pub mod event;
pub mod session;

#[cfg(test)]
mod testing;

// Re-exports
pub use connection::{CommandOutcome, Connection, DEFAULT_EXT_INFO_VERSION, DEFAULT_FRIENDLY_NAME};
pub use error::{Error, Result};
pub use event::EventChannel;
pub use session::{Session, SessionState};

// Re-export protocol types
pub use ptpip_core::{
    constants::DEFAULT_PORT, ByteBuffer, CommandCode, EventCode, EventPacket, FileFormat,
    InitCommandAckPacket, Packet, PacketName, PacketStream, PropertyCode, ResponseCode,
};
pub use ptpip_transport::{StreamTransport, Transport};
pub use ptpip_types::{
    AnyDeviceProperty, DeviceInfo, DeviceProperty, ExtDeviceInfo, PropertyValue, StringProperty,
};
