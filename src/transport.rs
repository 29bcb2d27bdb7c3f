//! Transport seam between the protocol session and the embedder's HID glue.
//!
//! The vendor tooling parks the newest input report in a single shared
//! buffer overwritten from the HID receive callback, so a read may observe
//! an arbitrary one of several reports. Here the two directions are bounded
//! channels instead: the session blocks on delivery (with a timeout) and
//! reports arrive whole and in order.
//!
//! [`channel`] returns the two ends. The session side, [`ReportChannel`],
//! is a [`Sink`] of command frames (each packed into one 65-byte output
//! report on the way out) and a [`Stream`] of input report payloads, with
//! the report id and length byte already stripped. The collaborator side,
//! [`ReportPump`], is plain channel halves for whatever HID backend the
//! embedder uses.

use std::io;
use std::pin::Pin;
use std::task::{ready, Context, Poll};

use bytes::Bytes;
use futures::channel::mpsc;
use futures::{Sink, Stream};
use tracing::warn;

use crate::proto::report::{self, REPORT_SIZE};

/// One raw outbound HID report, ready for the device.
pub type RawReport = [u8; REPORT_SIZE];

/// Session end of the transport. Owned by [`Device`](crate::Device) for the
/// lifetime of the session.
pub struct ReportChannel {
    outbound: mpsc::Sender<RawReport>,
    inbound: mpsc::Receiver<Vec<u8>>,
}

/// Collaborator end of the transport, handed to the HID glue.
///
/// The glue forwards each `outbound` item to the device as one output
/// report and pushes every received input report (as read, report id
/// included) into `inbound`. A full `inbound` channel means the session has
/// fallen behind; the glue may drop the report, the session decoder
/// resynchronizes on the next frame header.
pub struct ReportPump {
    pub outbound: mpsc::Receiver<RawReport>,
    pub inbound: mpsc::Sender<Vec<u8>>,
}

/// Create a transport with room for `depth` reports in each direction.
pub fn channel(depth: usize) -> (ReportChannel, ReportPump) {
    let (out_tx, out_rx) = mpsc::channel(depth);
    let (in_tx, in_rx) = mpsc::channel(depth);
    (
        ReportChannel {
            outbound: out_tx,
            inbound: in_rx,
        },
        ReportPump {
            outbound: out_rx,
            inbound: in_tx,
        },
    )
}

fn closed(_: mpsc::SendError) -> io::Error {
    io::Error::new(io::ErrorKind::BrokenPipe, "transport closed")
}

impl Sink<Bytes> for ReportChannel {
    type Error = io::Error;

    fn poll_ready(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        self.get_mut().outbound.poll_ready(cx).map_err(closed)
    }

    fn start_send(self: Pin<&mut Self>, frame: Bytes) -> io::Result<()> {
        let packed = report::pack(&frame)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))?;
        self.get_mut().outbound.start_send(packed).map_err(closed)
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().outbound)
            .poll_flush(cx)
            .map_err(closed)
    }

    fn poll_close(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().outbound)
            .poll_close(cx)
            .map_err(closed)
    }
}

impl Stream for ReportChannel {
    type Item = Vec<u8>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            match ready!(Pin::new(&mut this.inbound).poll_next(cx)) {
                Some(raw) => match report::unpack(&raw) {
                    Ok(payload) => return Poll::Ready(Some(payload.to_vec())),
                    Err(err) => warn!(%err, "dropping malformed input report"),
                },
                None => return Poll::Ready(None),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proto::command::GET_NAME;
    use futures::{SinkExt, StreamExt};

    #[tokio::test]
    async fn outbound_frames_are_packed_into_reports() {
        let (mut chan, mut pump) = channel(4);
        chan.send(Bytes::from_static(&GET_NAME)).await.expect("send");
        let raw = pump.outbound.next().await.expect("report");
        assert_eq!(raw.len(), REPORT_SIZE);
        assert_eq!(raw[0], report::REPORT_ID);
        assert_eq!(raw[1], 6);
        assert_eq!(&raw[2..8], &GET_NAME);
    }

    #[tokio::test]
    async fn inbound_reports_are_stripped_to_payloads() {
        let (mut chan, mut pump) = channel(4);
        let raw = report::pack(&[0xDE, 0xAD, 0xBE]).expect("pack").to_vec();
        pump.inbound.send(raw).await.expect("feed");
        let payload = chan.next().await.expect("payload");
        assert_eq!(payload, [0xDE, 0xAD, 0xBE]);
    }

    #[tokio::test]
    async fn malformed_inbound_reports_are_dropped() {
        let (mut chan, mut pump) = channel(4);
        // Declared payload length runs past the end of the report.
        pump.inbound.send(vec![0, 70, 1, 2]).await.expect("feed");
        let good = report::pack(&[0x01]).expect("pack").to_vec();
        pump.inbound.send(good).await.expect("feed");
        let payload = chan.next().await.expect("payload");
        assert_eq!(payload, [0x01]);
    }

    #[tokio::test]
    async fn dropped_pump_closes_both_directions() {
        let (mut chan, pump) = channel(1);
        drop(pump);
        assert!(chan.next().await.is_none());
        assert!(chan.send(Bytes::from_static(&[0x41])).await.is_err());
    }
}
