//! The CH9329 bridge exchanges fixed 65-byte HID reports: the report id
//! (always zero on this chip), one payload length byte, then the payload,
//! with the remainder of the report as don't-care padding.

use super::{ProtoError, Result};

/// Total size of one HID report in either direction.
pub const REPORT_SIZE: usize = 65;

/// Report identifier; the CH9329 only knows report 0.
pub const REPORT_ID: u8 = 0;

/// Bytes of a report claimed by the report id and the length byte.
const REPORT_OVERHEAD: usize = 2;

/// Largest payload one report can carry.
pub const MAX_PAYLOAD: usize = REPORT_SIZE - REPORT_OVERHEAD;

/// Pack one command frame into a single output report.
pub fn pack(frame: &[u8]) -> Result<[u8; REPORT_SIZE]> {
    if frame.len() > MAX_PAYLOAD {
        return Err(ProtoError::ReportOverflow(frame.len()));
    }
    let mut report = [0u8; REPORT_SIZE];
    report[0] = REPORT_ID;
    report[1] = frame.len() as u8;
    report[REPORT_OVERHEAD..REPORT_OVERHEAD + frame.len()].copy_from_slice(frame);
    Ok(report)
}

/// Payload bytes of one raw input report, per its declared length.
///
/// Padding past the declared length is ignored; a report shorter than its
/// own declaration is malformed.
pub fn unpack(report: &[u8]) -> Result<&[u8]> {
    if report.len() < REPORT_OVERHEAD {
        return Err(ProtoError::TruncatedReport);
    }
    let len = report[1] as usize;
    report
        .get(REPORT_OVERHEAD..REPORT_OVERHEAD + len)
        .ok_or(ProtoError::TruncatedReport)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proto::command::GET_NAME;

    #[test]
    fn pack_lays_out_id_length_payload() {
        let report = pack(&GET_NAME).expect("pack");
        assert_eq!(report.len(), REPORT_SIZE);
        assert_eq!(report[0], REPORT_ID);
        assert_eq!(report[1], 6);
        assert_eq!(&report[2..8], &GET_NAME);
        assert!(report[8..].iter().all(|b| *b == 0));
    }

    #[test]
    fn pack_rejects_oversized_frames() {
        let frame = [0u8; MAX_PAYLOAD + 1];
        assert!(matches!(
            pack(&frame),
            Err(ProtoError::ReportOverflow(len)) if len == MAX_PAYLOAD + 1
        ));
    }

    #[test]
    fn unpack_strips_id_and_padding() {
        let report = pack(&GET_NAME).expect("pack");
        assert_eq!(unpack(&report).expect("unpack"), &GET_NAME);
    }

    #[test]
    fn unpack_rejects_short_reports() {
        assert!(matches!(unpack(&[0]), Err(ProtoError::TruncatedReport)));
        // Declared length exceeding the actual report is malformed too.
        assert!(matches!(
            unpack(&[0, 10, 1, 2]),
            Err(ProtoError::TruncatedReport)
        ));
    }
}
