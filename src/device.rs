use bytes::{Bytes, BytesMut};
use futures::{SinkExt, StreamExt};
use std::{pin::Pin, str, time::Duration};
use tokio::time::timeout;
use tokio_util::codec::{Decoder, Encoder};
use tracing::debug;

use crate::measurement::Measurement;
use crate::proto::{
    codec::ProtocolCodec,
    command::{Button, Command},
    response::Frame,
    ProtoError, Result,
};
use crate::transport::ReportChannel;

trait ReportIo: futures::Sink<Bytes, Error = std::io::Error> + futures::Stream<Item = Vec<u8>> {}

impl<T> ReportIo for T where
    T: futures::Sink<Bytes, Error = std::io::Error> + futures::Stream<Item = Vec<u8>>
{
}

/// Default time to wait for each inbound report before a transaction fails.
pub const DEFAULT_RESPONSE_TIMEOUT: Duration = Duration::from_millis(500);

/// A session with one UT61E+.
///
/// Owns its transport end exclusively and runs one synchronous
/// command/response transaction at a time; it is not meant to be shared
/// between concurrent callers.
pub struct Device {
    reports: Pin<Box<dyn ReportIo + Send>>,
    codec: ProtocolCodec,
    rx_buf: BytesMut,
    response_timeout: Duration,
}

impl Device {
    pub fn new(transport: ReportChannel) -> Self {
        Self::from_reports(Box::pin(transport))
    }

    #[cfg(test)]
    pub(crate) fn new_faked(reports: Vec<Vec<u8>>) -> Self {
        Self::from_reports(Box::pin(crate::proto::fake::FakeTransport::new(reports)))
    }

    #[cfg(test)]
    pub(crate) fn new_unresponsive() -> Self {
        Self::from_reports(Box::pin(crate::proto::fake::FakeTransport::unresponsive()))
    }

    fn from_reports(reports: Pin<Box<dyn ReportIo + Send>>) -> Self {
        Self {
            reports,
            codec: ProtocolCodec::default(),
            rx_buf: BytesMut::new(),
            response_timeout: DEFAULT_RESPONSE_TIMEOUT,
        }
    }

    /// Time to wait for each inbound report before a transaction fails
    /// with [`ProtoError::Timeout`].
    pub fn set_response_timeout(&mut self, timeout: Duration) {
        self.response_timeout = timeout;
    }

    /// Model name of the connected meter, e.g. `UT61E+`.
    pub async fn name(&mut self) -> Result<String> {
        self.query_text(Command::GetName).await
    }

    /// Serial number of the connected meter.
    pub async fn serial_number(&mut self) -> Result<String> {
        self.query_text(Command::GetSerial).await
    }

    /// Press a front panel button remotely. The meter confirms with a
    /// single acknowledgment frame.
    pub async fn press(&mut self, button: Button) -> Result<()> {
        self.send(Command::Press(button)).await?;
        let ack = self.read_frame().await?;
        debug!(?ack, "button confirmed");
        Ok(())
    }

    /// Read the current measurement from the screen.
    ///
    /// A frame that fails validation or decoding is an error; the caller
    /// may simply retry the read.
    pub async fn measurement(&mut self) -> Result<Measurement> {
        self.send(Command::ReadDisplay).await?;
        let frame = self.read_frame().await?;
        Measurement::try_from(frame.payload())
    }

    /// These queries are answered twice: a generic acknowledgment first,
    /// then the frame carrying the text payload.
    async fn query_text(&mut self, cmd: Command) -> Result<String> {
        self.send(cmd).await?;
        let ack = self.read_frame().await?;
        debug!(?ack, "discarding acknowledgment");
        let frame = self.read_frame().await?;
        Ok(str::from_utf8(frame.payload())?.to_string())
    }

    async fn send(&mut self, cmd: Command) -> Result<()> {
        debug!(?cmd, "sending command");
        // Drop whatever an earlier exchange may have left behind.
        self.rx_buf.clear();
        let mut frame = BytesMut::new();
        self.codec.encode(cmd, &mut frame)?;
        self.reports.send(frame.freeze()).await?;
        Ok(())
    }

    /// Pull input reports until the buffer yields one validated frame.
    /// Frames may span several reports; the codec resynchronizes across
    /// report boundaries on its own.
    async fn read_frame(&mut self) -> Result<Frame> {
        loop {
            if let Some(frame) = self.codec.decode(&mut self.rx_buf)? {
                return Ok(frame);
            }
            let payload = timeout(self.response_timeout, self.reports.next())
                .await
                .map_err(|_| ProtoError::Timeout)?
                .ok_or(ProtoError::Abort)?;
            self.rx_buf.extend_from_slice(&payload);
        }
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::measurement::Mode;

    const ACK_FRAME: [u8; 7] = [0xAB, 0xCD, 0x04, 0xFF, 0x00, 0x02, 0x7B];
    const NAME_FRAME: [u8; 11] = [
        0xAB, 0xCD, 0x08, 0x55, 0x54, 0x36, 0x31, 0x45, 0x2B, 0x03, 0x00,
    ];
    // The documented mV-AC example response.
    const MEA_FRAME: [u8; 19] = [
        0xAB, 0xCD, 0x10, 0x01, 0x30, 0x20, 0x20, 0x35, 0x33, 0x2E, 0x35, 0x34, 0x01, 0x00, 0x30,
        0x34, 0x30, 0x03, 0x8D,
    ];

    #[tokio::test]
    async fn test_get_name() {
        let mut device = Device::new_faked(vec![ACK_FRAME.to_vec(), NAME_FRAME.to_vec()]);
        assert_eq!(device.name().await.expect("name"), "UT61E+");
    }

    #[tokio::test]
    async fn test_press_button() {
        let mut device = Device::new_faked(vec![ACK_FRAME.to_vec()]);
        assert!(device.press(Button::Lamp).await.is_ok());
    }

    #[tokio::test]
    async fn test_take_measurement() {
        let mut device = Device::new_faked(vec![MEA_FRAME.to_vec()]);
        let mea = device.measurement().await.expect("measurement");
        assert_eq!(mea.mode, Mode::MV_AC);
        assert_eq!(mea.display, "533.54");
        assert_eq!(mea.display_unit, "mV");
        assert_eq!(mea.progress, 10);
    }

    #[tokio::test]
    async fn test_measurement_split_across_reports() {
        let mut device = Device::new_faked(vec![
            MEA_FRAME[..5].to_vec(),
            MEA_FRAME[5..12].to_vec(),
            MEA_FRAME[12..].to_vec(),
        ]);
        assert!(device.measurement().await.is_ok());
    }

    #[tokio::test]
    async fn test_measurement_with_leading_noise() {
        let mut report = vec![0x00, 0x13, 0x37];
        report.extend_from_slice(&MEA_FRAME);
        let mut device = Device::new_faked(vec![report]);
        assert!(device.measurement().await.is_ok());
    }

    #[tokio::test]
    async fn test_corrupted_frame_fails_the_transaction() {
        let mut corrupt = MEA_FRAME;
        corrupt[5] = 0xFF;
        let mut device = Device::new_faked(vec![corrupt.to_vec()]);
        assert!(matches!(
            device.measurement().await,
            Err(ProtoError::Checksum { .. })
        ));
    }

    #[tokio::test]
    async fn test_closed_transport_aborts() {
        let mut device = Device::new_faked(vec![]);
        assert!(matches!(
            device.measurement().await,
            Err(ProtoError::Abort)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_silent_device_times_out() {
        let mut device = Device::new_unresponsive();
        assert!(matches!(
            device.measurement().await,
            Err(ProtoError::Timeout)
        ));
    }
}
