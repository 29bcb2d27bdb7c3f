use bytes::Bytes;

/// Payload of the generic acknowledgment the meter sends for button
/// presses and as the first answer to the name/serial queries
/// (on the wire: `AB CD 04 FF 00 02 7B`).
pub const ACK: [u8; 2] = [0xFF, 0x00];

/// A validated protocol frame.
///
/// Holds the payload only; header, length byte and the two checksum bytes
/// have been consumed and verified by the decoder. Frames are only ever
/// constructed by [`ProtocolCodec`](super::codec::ProtocolCodec).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    payload: Bytes,
}

impl Frame {
    pub(crate) fn new(payload: Bytes) -> Self {
        Self { payload }
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn into_payload(self) -> Bytes {
        self.payload
    }

    /// Whether this is the generic acknowledgment frame.
    pub fn is_ack(&self) -> bool {
        self.payload[..] == ACK
    }
}
