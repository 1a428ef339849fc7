//! Command channel
//!
//! [`Connection`] drives the PTP/IP command channel over a transport the
//! caller has already connected: the init handshake, session open and
//! close, and request/response transactions with their data phases.

use std::fmt;
use std::time::Duration;

use ptpip_core::{
    constants::{DEFAULT_TIMEOUT, GUID_SIZE},
    ByteBuffer, CommandCode, CommandRequestPacket, InitCommandAckPacket, OutboundPacket, Packet,
    PacketName, Packetable, PropertyCode, ResponseCode,
};
use ptpip_transport::Transport;
use ptpip_types::{
    decode_all_properties, AnyDeviceProperty, DeviceInfo, DeviceProperty, ExtDeviceInfo,
    PropertyValue,
};
use tracing::{debug, info, trace, warn};

use crate::{
    channel::Channel,
    error::{Error, Result},
    session::{Session, SessionState},
};

/// Dataset version requested with `SdioGetExtDeviceInfo`
pub const DEFAULT_EXT_INFO_VERSION: u32 = 0x0000_012C;

/// Friendly name announced when none is configured
pub const DEFAULT_FRIENDLY_NAME: &str = "ptpip";

/// Result of one operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    pub transaction_id: u32,
    pub code: ResponseCode,

    /// Response parameters
    pub parameters: Vec<u32>,

    /// Payload of the device's data phase (empty if it sent none)
    pub data: ByteBuffer,
}

impl CommandOutcome {
    pub fn is_ok(&self) -> bool {
        self.code == ResponseCode::Ok
    }

    /// Turn a non-OK response code into [`Error::Device`]
    pub fn into_ok(self) -> Result<Self> {
        if self.is_ok() {
            Ok(self)
        } else {
            Err(Error::Device { code: self.code })
        }
    }
}

/// PTP/IP command channel
///
/// # Examples
///
/// ```no_run
/// use ptpip::{Connection, StreamTransport};
/// use tokio::net::TcpStream;
///
/// #[tokio::main]
/// async fn main() -> ptpip::Result<()> {
///     let stream = TcpStream::connect(("192.168.122.1", ptpip::DEFAULT_PORT))
///         .await
///         .map_err(ptpip_transport::Error::from)?;
///     let mut connection = Connection::new(StreamTransport::from_tcp(stream)?)
///         .with_friendly_name("Remote");
///
///     connection.initialize().await?;
///     connection.open_session(1).await?;
///
///     let info = connection.get_device_info().await?;
///     println!("{}", info);
///
///     connection.close_session().await?;
///     connection.shutdown().await?;
///     Ok(())
/// }
/// ```
pub struct Connection {
    channel: Channel,
    session: Session,
    guid: [u8; GUID_SIZE],
    friendly_name: String,
}

impl Connection {
    /// Wrap the transport of a connected command channel
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self {
            channel: Channel::new(Box::new(transport), DEFAULT_TIMEOUT),
            session: Session::new(),
            guid: [0; GUID_SIZE],
            friendly_name: DEFAULT_FRIENDLY_NAME.to_string(),
        }
    }

    /// Set how long to wait for each read
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.channel.timeout = timeout;
        self
    }

    /// Set the initiator GUID (zero-padded or truncated to 16 bytes)
    pub fn with_guid(mut self, guid: &[u8]) -> Self {
        self.guid = [0; GUID_SIZE];
        let count = guid.len().min(GUID_SIZE);
        self.guid[..count].copy_from_slice(&guid[..count]);
        self
    }

    /// Set the name shown on the camera's screen
    pub fn with_friendly_name(mut self, name: impl Into<String>) -> Self {
        self.friendly_name = name.into();
        self
    }

    /// Session shared with this connection
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Perform the init handshake
    ///
    /// The connection number the event channel must present is the leading
    /// word of the responder identifier (see
    /// [`InitCommandAckPacket::connection_number`]) and is recorded in the
    /// [`Session`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InitFailed`] if the responder refuses the request.
    pub async fn initialize(&mut self) -> Result<InitCommandAckPacket> {
        if self.session.is_initialized() {
            return Err(Error::InvalidSessionState("Already initialized".into()));
        }

        info!("Initializing command channel to {}...", self.channel.peer());

        let request = OutboundPacket::init_command_request(&self.guid, &self.friendly_name);
        self.channel.send(&request).await?;

        loop {
            match self.channel.next_packet().await? {
                Packet::InitCommandAck(ack) => {
                    let connection_number = ack.connection_number();
                    self.session.initialize(connection_number)?;
                    info!(
                        "Initialized with {} (connection {})",
                        ack.device_name, connection_number
                    );
                    return Ok(ack);
                }
                Packet::Generic(packet) if packet.name == PacketName::InitFail => {
                    let reason = packet.data.read_at::<u32>(0);
                    warn!("Init request refused (reason: {:?})", reason);
                    return Err(Error::InitFailed { reason });
                }
                Packet::Generic(packet) if packet.name == PacketName::Ping => {
                    self.channel.send(&OutboundPacket::pong()).await?;
                }
                other => return Err(Error::UnexpectedPacket(other.name())),
            }
        }
    }

    /// Open a PTP session
    ///
    /// A device reporting the session as already open is accepted.
    pub async fn open_session(&mut self, session_id: u32) -> Result<()> {
        if self.session.state() != SessionState::Initialized {
            return Err(Error::InvalidSessionState(format!(
                "Cannot open session from state: {:?}",
                self.session.state()
            )));
        }

        let outcome = self.send_command(CommandCode::OpenSession, &[session_id]).await?;
        match outcome.code {
            ResponseCode::Ok => {}
            ResponseCode::SessionAlreadyOpen => warn!("Device reports session already open"),
            code => return Err(Error::Device { code }),
        }

        self.session.open(session_id)?;
        Ok(())
    }

    /// Close the PTP session, keeping the channel usable
    pub async fn close_session(&mut self) -> Result<()> {
        if !self.session.is_open() {
            return Err(Error::InvalidSessionState("No session open".into()));
        }

        self.send_command(CommandCode::CloseSession, &[]).await?.into_ok()?;
        self.session.close_session()?;
        debug!("Session closed");
        Ok(())
    }

    /// Run an operation and collect its data phase and response
    ///
    /// Any response code is returned as-is; use
    /// [`CommandOutcome::into_ok`] to require success.
    pub async fn send_command(
        &mut self,
        code: CommandCode,
        arguments: &[u32],
    ) -> Result<CommandOutcome> {
        self.ensure_initialized()?;
        let request = CommandRequestPacket::new(code, self.session.next_transaction_id())
            .with_arguments(arguments);
        self.transact(request, None).await
    }

    /// Run an operation that sends `payload` to the device
    pub async fn send_command_with_data(
        &mut self,
        code: CommandCode,
        arguments: &[u32],
        payload: &[u8],
    ) -> Result<CommandOutcome> {
        self.ensure_initialized()?;
        let request = CommandRequestPacket::new(code, self.session.next_transaction_id())
            .with_arguments(arguments)
            .with_outgoing_data();
        self.transact(request, Some(payload)).await
    }

    /// Fetch the device info dataset
    pub async fn get_device_info(&mut self) -> Result<DeviceInfo> {
        let outcome = self
            .send_command(CommandCode::GetDeviceInfo, &[])
            .await?
            .into_ok()?;
        let info = DeviceInfo::decode(&outcome.data)?;
        debug!("Device info: {}", info);
        Ok(info)
    }

    /// Fetch the device info and fold in the vendor extension list
    ///
    /// Devices that do not list `SdioGetExtDeviceInfo` get the plain
    /// device info.
    pub async fn get_device_info_with_extension(&mut self, version: u32) -> Result<DeviceInfo> {
        let mut info = self.get_device_info().await?;
        if !info.supports_operation(CommandCode::SdioGetExtDeviceInfo) {
            return Ok(info);
        }

        let outcome = self
            .send_command(CommandCode::SdioGetExtDeviceInfo, &[version])
            .await?
            .into_ok()?;
        let ext = ExtDeviceInfo::decode(&outcome.data)?;
        info.merge(&ext);
        debug!("Merged {} extension codes", ext.codes.len());
        Ok(info)
    }

    /// Fetch one property descriptor with value type `T`
    pub async fn get_device_property<T: PropertyValue>(
        &mut self,
        code: PropertyCode,
    ) -> Result<DeviceProperty<T>> {
        let outcome = self
            .send_command(CommandCode::GetDevicePropDesc, &[u32::from(u16::from(code))])
            .await?
            .into_ok()?;

        let mut offset = 0;
        DeviceProperty::decode(&outcome.data, &mut offset)
            .ok_or(ptpip_types::Error::Decode("device property").into())
    }

    /// Fetch every property descriptor in one vendor operation
    ///
    /// With `changed_only` the device lists only properties changed since
    /// the previous call.
    pub async fn get_all_device_properties(
        &mut self,
        changed_only: bool,
    ) -> Result<Vec<AnyDeviceProperty>> {
        let outcome = self
            .send_command(CommandCode::GetAllDevicePropData, &[u32::from(changed_only)])
            .await?
            .into_ok()?;
        let properties = decode_all_properties(&outcome.data);
        debug!("Decoded {} property descriptors", properties.len());
        Ok(properties)
    }

    /// Close the transport and forget the session
    pub async fn shutdown(&mut self) -> Result<()> {
        info!("Closing command channel to {}", self.channel.peer());
        self.session.close();
        self.channel.shutdown().await
    }

    // Helper methods

    fn ensure_initialized(&self) -> Result<()> {
        if !self.session.is_initialized() {
            return Err(Error::InvalidSessionState("Not initialized".into()));
        }
        Ok(())
    }

    async fn transact(
        &mut self,
        request: CommandRequestPacket,
        payload: Option<&[u8]>,
    ) -> Result<CommandOutcome> {
        let transaction_id = request.transaction_id;
        debug!("{}", request);

        self.channel.send(&request.encode()).await?;
        if let Some(payload) = payload {
            for packet in OutboundPacket::data_phase(transaction_id, payload)? {
                self.channel.send(&packet).await?;
            }
        }

        let mut data = ByteBuffer::new();
        loop {
            match self.channel.next_packet().await? {
                Packet::StartData(start) if start.transaction_id == transaction_id => {
                    trace!("Data phase of {} bytes announced", start.total_length);
                    data.clear();
                }
                Packet::Data(chunk) if chunk.transaction_id == transaction_id => {
                    data.append_buffer(&chunk.data);
                }
                Packet::EndData(end) if end.transaction_id == transaction_id => {
                    data.append_buffer(&end.data);
                }
                // Some bodies answer OpenSession without a transaction id
                Packet::CommandResponse(response)
                    if response.transaction_id.is_none_or(|id| id == transaction_id) =>
                {
                    let code = response
                        .code
                        .ok_or(Error::MalformedResponse { transaction_id })?;
                    if code != ResponseCode::Ok {
                        debug!("Transaction {} answered {}", transaction_id, code);
                    }
                    return Ok(CommandOutcome {
                        transaction_id,
                        code,
                        parameters: response.parameters(),
                        data,
                    });
                }
                Packet::Generic(packet) if packet.name == PacketName::Ping => {
                    self.channel.send(&OutboundPacket::pong()).await?;
                }
                other => {
                    debug!(
                        "Ignoring {} while waiting for transaction {}",
                        other, transaction_id
                    );
                }
            }
        }
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("peer", &self.channel.peer())
            .field("session", &self.session)
            .field("friendly_name", &self.friendly_name)
            .finish()
    }
}
