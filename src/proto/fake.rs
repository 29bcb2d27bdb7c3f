use std::collections::VecDeque;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures::{Sink, Stream};

/// Canned transport for session tests: yields pre-recorded input report
/// payloads and swallows whatever the session writes.
pub(crate) struct FakeTransport {
    payloads: VecDeque<Vec<u8>>,
    silent: bool,
}

impl FakeTransport {
    pub(crate) fn new(payloads: Vec<Vec<u8>>) -> Self {
        Self {
            payloads: payloads.into(),
            silent: false,
        }
    }

    /// A fake that never answers, imitating a hung device. The stream stays
    /// pending instead of ending once exhausted.
    pub(crate) fn unresponsive() -> Self {
        Self {
            payloads: VecDeque::new(),
            silent: true,
        }
    }
}

impl Stream for FakeTransport {
    type Item = Vec<u8>;

    fn poll_next(mut self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        match self.payloads.pop_front() {
            Some(payload) => Poll::Ready(Some(payload)),
            None if self.silent => Poll::Pending,
            None => Poll::Ready(None),
        }
    }
}

impl Sink<Bytes> for FakeTransport {
    type Error = io::Error;

    fn poll_ready(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn start_send(self: Pin<&mut Self>, _frame: Bytes) -> io::Result<()> {
        Ok(())
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_close(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}
