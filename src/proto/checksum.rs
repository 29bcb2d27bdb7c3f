//! The protocol uses two unrelated checksum schemes, one per direction.
//!
//! Inbound frames end in a 16-bit big-endian sum over every preceding frame
//! byte (header, length byte and data). Outbound commands instead carry
//! `opcode + 379` as their trailing two bytes, an offset lifted from the
//! vendor software rather than a sum over the message. Keep them separate;
//! they only look similar on six-byte frames.

/// Offset added to a command opcode to form its trailing bytes.
pub const OPCODE_OFFSET: u16 = 379;

/// 16-bit wrapping sum used to validate inbound frames.
///
/// Callers pass every frame byte up to (but excluding) the two checksum
/// bytes, i.e. `AB CD <len> <data...>`.
pub fn frame_sum(bytes: &[u8]) -> u16 {
    bytes
        .iter()
        .fold(0u16, |sum, b| sum.wrapping_add(u16::from(*b)))
}

/// Trailing 16-bit value of an outbound command frame, split big-endian
/// behind the opcode byte.
pub fn command_sum(opcode: u8) -> u16 {
    u16::from(opcode) + OPCODE_OFFSET
}
