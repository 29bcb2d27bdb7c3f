use byteorder::{BigEndian, ByteOrder};
use bytes::{Buf, BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};
use tracing::{trace, warn};

use super::checksum;
use super::command::{self, Command};
use super::response::Frame;
use super::ProtoError;

/// Header bytes that open every frame in either direction.
pub const HEADER: [u8; 2] = [0xAB, 0xCD];

/// Smallest valid value of the on-wire length byte (one data byte plus the
/// two checksum bytes).
pub const MIN_FRAME_LEN: u8 = 3;

/// Largest valid value of the on-wire length byte.
pub const MAX_FRAME_LEN: u8 = 60;

/// Bytes preceding the counted region: header plus the length byte itself.
const HEADER_LEN: usize = 3;

/// Codec for the UT61E+ frame protocol.
///
/// Decoding is incremental over whatever the transport delivers: a frame may
/// start in one input report and finish several reports later, and stray
/// bytes between frames are skipped while hunting for the header. One frame
/// per report is never assumed.
#[derive(Debug, Default)]
pub struct ProtocolCodec;

impl Decoder for ProtocolCodec {
    type Item = Frame;
    // Length violations and checksum mismatches surface as errors, but they
    // consume the offending bytes first, so the caller may keep decoding
    // from the same buffer after a failed transaction.
    type Error = ProtoError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        loop {
            // Hunt for the header. Stray bytes are protocol noise on this
            // link and never abort the search.
            match src.iter().position(|b| *b == HEADER[0]) {
                Some(n) if n > 0 => {
                    trace!(skipped = n, "skipping noise ahead of header");
                    src.advance(n);
                }
                Some(_) => {}
                None => {
                    src.clear();
                    return Ok(None);
                }
            }
            if src.len() < 2 {
                return Ok(None);
            }
            if src[1] != HEADER[1] {
                // False start; resume the hunt one byte further on.
                src.advance(1);
                continue;
            }
            if src.len() < HEADER_LEN {
                return Ok(None);
            }
            let len = src[2];
            if !(MIN_FRAME_LEN..=MAX_FRAME_LEN).contains(&len) {
                // Hard rejection, not a resync. Consume the header so a
                // retried transaction does not trip over it again.
                src.advance(HEADER_LEN);
                return Err(ProtoError::FrameLength(len));
            }
            let total = HEADER_LEN + len as usize;
            if src.len() < total {
                src.reserve(total - src.len());
                return Ok(None);
            }
            let frame = src.split_to(total).freeze();
            let expected = BigEndian::read_u16(&frame[total - 2..]);
            let computed = checksum::frame_sum(&frame[..total - 2]);
            if expected != computed {
                warn!(expected, computed, "dropping frame with bad checksum");
                return Err(ProtoError::Checksum { expected, computed });
            }
            trace!(len, "frame accepted");
            return Ok(Some(Frame::new(frame.slice(HEADER_LEN..total - 2))));
        }
    }
}

impl Encoder<Command> for ProtocolCodec {
    type Error = ProtoError;

    fn encode(&mut self, item: Command, dst: &mut BytesMut) -> Result<(), Self::Error> {
        match item {
            Command::GetName => dst.extend_from_slice(&command::GET_NAME),
            Command::GetSerial => dst.extend_from_slice(&command::GET_SERIAL),
            Command::ReadDisplay => dst.extend_from_slice(&command::READ_DISPLAY),
            Command::Press(button) => {
                let opcode = button.opcode();
                dst.extend_from_slice(&command::PREFIX);
                dst.put_u8(opcode);
                dst.put_u16(checksum::command_sum(opcode));
            }
        }
        Ok(())
    }
}
