/// Front panel buttons the meter accepts over the wire.
///
/// Opcodes were reverse engineered from the vendor software; the trailing
/// two bytes of every button frame are `opcode + 379` big-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Enter min/max recording.
    MinMax,
    /// Leave min/max recording.
    MinMaxOff,
    /// Step the manual range.
    Range,
    /// Return to auto ranging.
    Auto,
    /// Relative (delta) mode.
    Rel,
    /// The Hz/USB select button.
    Select2,
    /// Freeze the display.
    Hold,
    /// Backlight on/off.
    Lamp,
    /// The orange select button.
    Select1,
    /// Enter peak min/max recording.
    PeakMinMax,
    /// Leave peak recording.
    PeakOff,
}

impl Button {
    pub const fn opcode(self) -> u8 {
        match self {
            Button::MinMax => 65,
            Button::MinMaxOff => 66,
            Button::Range => 70,
            Button::Auto => 71,
            Button::Rel => 72,
            Button::Select2 => 73,
            Button::Hold => 74,
            Button::Lamp => 75,
            Button::Select1 => 76,
            Button::PeakMinMax => 77,
            Button::PeakOff => 78,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Ask for the model name. The meter answers twice: a generic
    /// acknowledgment, then a frame carrying the ASCII name.
    GetName,
    /// Ask for the serial number; answered like [`Command::GetName`].
    GetSerial,
    /// Ask for the current display contents (a 14-byte measurement payload).
    ReadDisplay,
    /// Press a front panel button; answered with one acknowledgment.
    Press(Button),
}

/// Shared prefix of every outbound command frame: header plus length 3.
pub const PREFIX: [u8; 3] = [0xAB, 0xCD, 0x03];

/// Documented literal for the name query: `AB CD 03 5F 01 DA`.
pub const GET_NAME: [u8; 6] = [0xAB, 0xCD, 0x03, 0x5F, 0x01, 0xDA];

/// Documented literal for the serial number query: `AB CD 03 5D 01 D8`.
pub const GET_SERIAL: [u8; 6] = [0xAB, 0xCD, 0x03, 0x5D, 0x01, 0xD8];

/// Documented literal for the display readout request: `AB CD 03 5E 01 D9`.
pub const READ_DISPLAY: [u8; 6] = [0xAB, 0xCD, 0x03, 0x5E, 0x01, 0xD9];
