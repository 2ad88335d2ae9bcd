use async_trait::async_trait;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::Mutex;

use super::NotifyError;
use shared::message::{BusMessage, FRAME_HEADER_LEN, FrameError, FrameHeader};

/// Transport abstraction for the notification bus
#[async_trait]
pub trait Transport: Send + Sync + std::fmt::Debug {
    async fn read_message(&self) -> Result<BusMessage, NotifyError>;
    async fn write_message(&self, msg: &BusMessage) -> Result<(), NotifyError>;
    async fn close(&self) -> Result<(), NotifyError>;
}

/// TCP transport
#[derive(Debug, Clone)]
pub struct TcpTransport {
    reader: Arc<Mutex<OwnedReadHalf>>,
    writer: Arc<Mutex<OwnedWriteHalf>>,
}

impl TcpTransport {
    pub async fn connect(addr: &str) -> Result<Self, NotifyError> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(|e| NotifyError::Connection(format!("{}: {}", addr, e)))?;
        Ok(Self::from_stream(stream))
    }

    pub fn from_stream(stream: TcpStream) -> Self {
        let (reader, writer) = stream.into_split();
        Self {
            reader: Arc::new(Mutex::new(reader)),
            writer: Arc::new(Mutex::new(writer)),
        }
    }
}

#[async_trait]
impl Transport for TcpTransport {
    /// Read the next frame, skipping frames of unknown type
    async fn read_message(&self) -> Result<BusMessage, NotifyError> {
        let mut reader = self.reader.lock().await;

        loop {
            let mut header_buf = [0u8; FRAME_HEADER_LEN];
            reader.read_exact(&mut header_buf).await?;
            let header = match FrameHeader::parse(&header_buf) {
                Ok(header) => header,
                Err(FrameError::UnknownEventType(event_type)) => {
                    let len = FrameHeader::declared_payload_len(&header_buf);
                    let mut skipped = vec![0u8; len];
                    reader.read_exact(&mut skipped).await?;
                    tracing::debug!(event_type, len, "Skipped frame of unknown type");
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            let mut payload = vec![0u8; header.payload_len];
            reader.read_exact(&mut payload).await?;

            return Ok(BusMessage::from_header(header, payload));
        }
    }

    async fn write_message(&self, msg: &BusMessage) -> Result<(), NotifyError> {
        let mut writer = self.writer.lock().await;
        writer.write_all(&msg.encode()).await?;
        Ok(())
    }

    async fn close(&self) -> Result<(), NotifyError> {
        let mut writer = self.writer.lock().await;
        writer.shutdown().await?;
        Ok(())
    }
}
