pub mod checksum;
pub mod codec;
pub mod command;
pub mod report;
pub mod response;

#[cfg(test)]
pub mod fake;

use thiserror::Error;

use crate::measurement::Mode;

#[derive(Error, Debug)]
pub enum ProtoError {
    #[error("I/O error: {:?}", _0)]
    Io(#[from] std::io::Error),

    #[error("Frame length {0} outside the valid range 3..=60")]
    FrameLength(u8),

    #[error("Frame checksum mismatch: expected {expected:#06x}, computed {computed:#06x}")]
    Checksum { expected: u16, computed: u16 },

    #[error("Command frame of {0} bytes does not fit one output report")]
    ReportOverflow(usize),

    #[error("Input report too short to carry its declared payload")]
    TruncatedReport,

    #[error("Device did not respond in time")]
    Timeout,

    #[error("Connection was closed")]
    Abort,

    #[error("Response was not valid text: {:?}", _0)]
    Text(#[from] std::str::Utf8Error),

    #[error("Measurement payload must be 14 bytes, got {0}")]
    PayloadLength(usize),

    #[error("Unknown mode index {0}")]
    UnknownMode(u8),

    #[error("No unit for mode {mode} with range code {range:?}")]
    UnknownRange { mode: Mode, range: char },

    #[error("Display text {0:?} is not a number")]
    DisplayParse(String),
}

pub type Result<T> = std::result::Result<T, ProtoError>;
