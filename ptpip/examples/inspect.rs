//! Print a camera's device info and property descriptors

use ptpip::{AnyDeviceProperty, Connection, StreamTransport, DEFAULT_EXT_INFO_VERSION, DEFAULT_PORT};
use tokio::net::TcpStream;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let ip = std::env::var("CAMERA_IP").unwrap_or_else(|_| "192.168.122.1".to_string());

    let stream = TcpStream::connect((ip.as_str(), DEFAULT_PORT)).await?;
    let mut connection = Connection::new(StreamTransport::from_tcp(stream)?)
        .with_friendly_name("ptpip inspect");

    let ack = connection.initialize().await?;
    println!("Connected to {}", ack.device_name);

    connection.open_session(1).await?;

    let info = connection
        .get_device_info_with_extension(DEFAULT_EXT_INFO_VERSION)
        .await?;
    println!("{}", info);
    println!("  vendor extension: {}", info.vendor_extension_description);
    println!("  serial: {}", info.serial_number.as_deref().unwrap_or("-"));

    let properties = connection.get_all_device_properties(false).await?;
    println!("{} properties:", properties.len());
    for property in &properties {
        match property {
            AnyDeviceProperty::String(p) => println!("  {} = {:?}", property, p.current),
            other => println!("  {}", other),
        }
    }

    connection.close_session().await?;
    connection.shutdown().await?;

    Ok(())
}
