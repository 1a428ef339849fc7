//! Open both channels and log events until interrupted

use std::time::Duration;

use ptpip::{Connection, EventChannel, StreamTransport, DEFAULT_PORT};
use tokio::net::TcpStream;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let ip = std::env::var("CAMERA_IP").unwrap_or_else(|_| "192.168.122.1".to_string());

    let stream = TcpStream::connect((ip.as_str(), DEFAULT_PORT)).await?;
    let mut connection = Connection::new(StreamTransport::from_tcp(stream)?);
    connection.initialize().await?;

    // The event channel must be bound before the session opens
    let stream = TcpStream::connect((ip.as_str(), DEFAULT_PORT)).await?;
    let mut events = EventChannel::new(StreamTransport::from_tcp(stream)?)
        .with_timeout(Duration::from_secs(30));
    events
        .initialize(connection.session().connection_number())
        .await?;

    connection.open_session(1).await?;
    println!("Watching events (Ctrl-C to stop)");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            event = events.next_event() => match event {
                Ok(event) => println!("{} {:x?}", event.code, event.parameters),
                Err(e) if e.is_recoverable() => events.ping().await?,
                Err(e) => return Err(e.into()),
            },
        }
    }

    connection.close_session().await?;
    connection.shutdown().await?;
    events.shutdown().await?;

    Ok(())
}
