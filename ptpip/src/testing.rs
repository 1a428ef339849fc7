//! Scripted responder for channel tests

use ptpip_core::{ByteBuffer, CharEncoding, OutboundPacket, PacketName, StringFraming};
use ptpip_transport::StreamTransport;
use tokio::io::{duplex, AsyncReadExt, AsyncWriteExt, DuplexStream};

/// The device end of an in-memory channel
pub(crate) struct ScriptedDevice {
    stream: DuplexStream,
}

impl ScriptedDevice {
    pub(crate) fn pair() -> (StreamTransport<DuplexStream>, ScriptedDevice) {
        let (near, far) = duplex(64 * 1024);
        (StreamTransport::new(near, "camera"), ScriptedDevice { stream: far })
    }

    /// Read one packet, returning its kind tag and body
    pub(crate) async fn read_packet(&mut self) -> (u32, Vec<u8>) {
        let length = self.stream.read_u32_le().await.unwrap();
        let name = self.stream.read_u32_le().await.unwrap();
        let mut body = vec![0; length as usize - 8];
        self.stream.read_exact(&mut body).await.unwrap();
        (name, body)
    }

    pub(crate) async fn write(&mut self, bytes: &[u8]) {
        self.stream.write_all(bytes).await.unwrap();
        self.stream.flush().await.unwrap();
    }

    /// Send `payload` as a start/data/end sequence
    pub(crate) async fn send_data(&mut self, transaction_id: u32, payload: &[u8]) {
        for packet in OutboundPacket::data_phase(transaction_id, payload).unwrap() {
            self.write(&packet.to_bytes()).await;
        }
    }

    pub(crate) async fn close(mut self) {
        let _ = self.stream.shutdown().await;
    }

    /// Init command ack whose responder identifier leads with
    /// `connection_number`
    pub(crate) fn init_ack(connection_number: u32, name: &str) -> Vec<u8> {
        let mut guid = [0x42; 16];
        guid[..4].copy_from_slice(&connection_number.to_le_bytes());

        let mut body = ByteBuffer::new();
        body.append_bytes(&guid);
        body.append_string(name, StringFraming::NullTerminated, CharEncoding::Utf16);
        body.append(0x0001_0000u32);
        framed(PacketName::InitCommandAck, &body)
    }
}

/// Command response; `None` leaves out the transaction id and parameters
pub(crate) fn response_bytes(code: u16, transaction_id: Option<u32>, parameters: &[u32]) -> Vec<u8> {
    let mut body = ByteBuffer::new();
    body.append(code);
    if let Some(transaction_id) = transaction_id {
        body.append(transaction_id);
        for parameter in parameters {
            body.append(*parameter);
        }
    }
    framed(PacketName::CommandResponse, &body)
}

/// Event packet with a transaction id and parameters
pub(crate) fn event_bytes(code: u16, transaction_id: u32, parameters: &[u32]) -> Vec<u8> {
    let mut body = ByteBuffer::new();
    body.append(code);
    body.append(transaction_id);
    for parameter in parameters {
        body.append(*parameter);
    }
    framed(PacketName::Event, &body)
}

fn framed(name: PacketName, body: &ByteBuffer) -> Vec<u8> {
    let mut packet = ByteBuffer::new();
    packet.append((body.len() + 8) as u32);
    packet.append(u32::from(name));
    packet.append_buffer(body);
    packet.to_vec()
}
