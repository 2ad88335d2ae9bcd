//! Notification bus message types
//!
//! Frame layout on the wire:
//!
//! ```text
//! [event type: 1][request id: 16][correlation id: 16][len: u32 LE][JSON payload: len]
//! ```
//!
//! A nil correlation id means "none".

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

pub mod payload;
pub use payload::*;

/// Protocol version sent in the handshake
pub const PROTOCOL_VERSION: u16 = 2;

/// Fixed header size preceding the payload
pub const FRAME_HEADER_LEN: usize = 1 + 16 + 16 + 4;

/// Largest payload accepted from the wire
pub const MAX_PAYLOAD_LEN: usize = 1024 * 1024;

/// Bus event type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    Handshake = 0,
    Notification = 1,
    Response = 5,
}

impl TryFrom<u8> for EventType {
    type Error = FrameError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(EventType::Handshake),
            1 => Ok(EventType::Notification),
            5 => Ok(EventType::Response),
            other => Err(FrameError::UnknownEventType(other)),
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventType::Handshake => write!(f, "handshake"),
            EventType::Notification => write!(f, "notification"),
            EventType::Response => write!(f, "response"),
        }
    }
}

/// Frame decoding errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    #[error("Unknown event type: {0}")]
    UnknownEventType(u8),

    #[error("Payload too large: {0} bytes")]
    PayloadTooLarge(usize),
}

/// Parsed frame header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub event_type: EventType,
    pub request_id: Uuid,
    pub correlation_id: Option<Uuid>,
    pub payload_len: usize,
}

impl FrameHeader {
    /// Payload length as declared by the header, before any validation
    pub fn declared_payload_len(buf: &[u8; FRAME_HEADER_LEN]) -> usize {
        let mut len_buf = [0u8; 4];
        len_buf.copy_from_slice(&buf[33..37]);
        u32::from_le_bytes(len_buf) as usize
    }

    /// Parse a header
    ///
    /// The length is checked before the event type, so an
    /// [`FrameError::UnknownEventType`] frame can still be skipped using
    /// [`declared_payload_len`](Self::declared_payload_len).
    pub fn parse(buf: &[u8; FRAME_HEADER_LEN]) -> Result<Self, FrameError> {
        let payload_len = Self::declared_payload_len(buf);
        if payload_len > MAX_PAYLOAD_LEN {
            return Err(FrameError::PayloadTooLarge(payload_len));
        }
        let event_type = EventType::try_from(buf[0])?;

        let mut uuid_buf = [0u8; 16];
        uuid_buf.copy_from_slice(&buf[1..17]);
        let request_id = Uuid::from_bytes(uuid_buf);

        uuid_buf.copy_from_slice(&buf[17..33]);
        let correlation_raw = Uuid::from_bytes(uuid_buf);
        let correlation_id = (!correlation_raw.is_nil()).then_some(correlation_raw);

        Ok(Self {
            event_type,
            request_id,
            correlation_id,
            payload_len,
        })
    }
}

/// Bus message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusMessage {
    pub request_id: Uuid,
    pub event_type: EventType,
    pub correlation_id: Option<Uuid>,
    pub payload: Vec<u8>,
}

impl BusMessage {
    pub fn new(event_type: EventType, payload: Vec<u8>) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            event_type,
            correlation_id: None,
            payload,
        }
    }

    pub fn from_header(header: FrameHeader, payload: Vec<u8>) -> Self {
        Self {
            request_id: header.request_id,
            event_type: header.event_type,
            correlation_id: header.correlation_id,
            payload,
        }
    }

    /// Set correlation id (RPC response)
    pub fn with_correlation_id(mut self, id: Uuid) -> Self {
        self.correlation_id = Some(id);
        self
    }

    pub fn handshake(payload: &HandshakePayload) -> Result<Self, serde_json::Error> {
        Ok(Self::new(EventType::Handshake, serde_json::to_vec(payload)?))
    }

    pub fn notification(event: &DeskEvent) -> Result<Self, serde_json::Error> {
        Ok(Self::new(EventType::Notification, serde_json::to_vec(event)?))
    }

    pub fn response(payload: &ResponsePayload) -> Result<Self, serde_json::Error> {
        Ok(Self::new(EventType::Response, serde_json::to_vec(payload)?))
    }

    /// Parse payload as the given type
    pub fn parse_payload<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.payload)
    }

    /// Encode header and payload into one buffer
    pub fn encode(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(FRAME_HEADER_LEN + self.payload.len());
        data.push(self.event_type as u8);
        data.extend_from_slice(self.request_id.as_bytes());
        let correlation_bytes = self.correlation_id.unwrap_or(Uuid::nil()).into_bytes();
        data.extend_from_slice(&correlation_bytes);
        data.extend_from_slice(&(self.payload.len() as u32).to_le_bytes());
        data.extend_from_slice(&self.payload);
        data
    }
}
