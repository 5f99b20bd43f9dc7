//! In-memory transports for tests and demos.
//!
//! These stand in for a serial line or a UDP socket without touching the
//! OS, while preserving the timing behavior the link layer depends on:
//! reads block with a timeout, and a dropped far end reads as EOF.

use std::collections::VecDeque;
use std::io::{self, Read, Write};
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

use crate::error::{Result, TransportError};
use crate::traits::{DatagramRecv, DatagramSend};

const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(50);

/// Read half of an in-memory byte stream.
pub struct LoopbackReader {
    rx: Receiver<Vec<u8>>,
    pending: VecDeque<u8>,
    read_timeout: Duration,
}

/// Write half of an in-memory byte stream.
pub struct LoopbackWriter {
    tx: Sender<Vec<u8>>,
}

/// One end of an in-memory byte stream.
pub struct LoopbackStream {
    reader: LoopbackReader,
    writer: LoopbackWriter,
}

impl LoopbackStream {
    /// Override the blocking read timeout (default 50ms).
    pub fn set_read_timeout(&mut self, timeout: Duration) {
        self.reader.read_timeout = timeout;
    }

    /// Split into independently-owned read and write halves.
    pub fn split(self) -> (LoopbackReader, LoopbackWriter) {
        (self.reader, self.writer)
    }
}

/// Create a connected pair of in-memory byte streams.
pub fn stream_pair() -> (LoopbackStream, LoopbackStream) {
    let (a_tx, b_rx) = channel();
    let (b_tx, a_rx) = channel();
    let make = |tx, rx| LoopbackStream {
        reader: LoopbackReader {
            rx,
            pending: VecDeque::new(),
            read_timeout: DEFAULT_READ_TIMEOUT,
        },
        writer: LoopbackWriter { tx },
    };
    (make(a_tx, a_rx), make(b_tx, b_rx))
}

impl Read for LoopbackReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        if self.pending.is_empty() {
            match self.rx.recv_timeout(self.read_timeout) {
                Ok(chunk) => self.pending.extend(chunk),
                Err(RecvTimeoutError::Timeout) => {
                    return Err(io::Error::from(io::ErrorKind::TimedOut))
                }
                // Far end dropped: EOF.
                Err(RecvTimeoutError::Disconnected) => return Ok(0),
            }
        }
        let n = buf.len().min(self.pending.len());
        for slot in buf.iter_mut().take(n) {
            *slot = self.pending.pop_front().unwrap_or_default();
        }
        Ok(n)
    }
}

impl Write for LoopbackWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.tx
            .send(buf.to_vec())
            .map_err(|_| io::Error::from(io::ErrorKind::BrokenPipe))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Read for LoopbackStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }
}

impl Write for LoopbackStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// Receive half of an in-memory datagram link.
pub struct LoopbackDatagramRx {
    rx: Receiver<Vec<u8>>,
    read_timeout: Duration,
}

/// Send half of an in-memory datagram link.
pub struct LoopbackDatagramTx {
    tx: Sender<Vec<u8>>,
}

impl DatagramRecv for LoopbackDatagramRx {
    fn recv(&mut self, buf: &mut [u8]) -> Result<Option<usize>> {
        match self.rx.recv_timeout(self.read_timeout) {
            Ok(datagram) => {
                let n = datagram.len().min(buf.len());
                buf[..n].copy_from_slice(&datagram[..n]);
                Ok(Some(n))
            }
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(TransportError::Closed),
        }
    }
}

impl DatagramSend for LoopbackDatagramTx {
    fn send(&mut self, buf: &[u8]) -> Result<()> {
        self.tx
            .send(buf.to_vec())
            .map_err(|_| TransportError::Closed)
    }
}

/// Create a connected pair of in-memory datagram endpoints.
///
/// Returns `(near, far)` where each endpoint is its own `(rx, tx)` pair.
pub fn datagram_pair() -> (
    (LoopbackDatagramRx, LoopbackDatagramTx),
    (LoopbackDatagramRx, LoopbackDatagramTx),
) {
    let (near_tx, far_rx) = channel();
    let (far_tx, near_rx) = channel();
    (
        (
            LoopbackDatagramRx {
                rx: near_rx,
                read_timeout: DEFAULT_READ_TIMEOUT,
            },
            LoopbackDatagramTx { tx: near_tx },
        ),
        (
            LoopbackDatagramRx {
                rx: far_rx,
                read_timeout: DEFAULT_READ_TIMEOUT,
            },
            LoopbackDatagramTx { tx: far_tx },
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_pair_roundtrip() {
        let (mut near, mut far) = stream_pair();
        near.write_all(b"hello").expect("write should succeed");

        let mut buf = [0u8; 5];
        far.read_exact(&mut buf).expect("read should succeed");
        assert_eq!(&buf, b"hello");
    }

    #[test]
    fn stream_read_times_out_when_idle() {
        let (mut near, _far) = stream_pair();
        near.set_read_timeout(Duration::from_millis(10));

        let mut buf = [0u8; 1];
        let err = near.read(&mut buf).expect_err("idle read should time out");
        assert_eq!(err.kind(), io::ErrorKind::TimedOut);
    }

    #[test]
    fn stream_read_sees_eof_after_far_end_drops() {
        let (mut near, far) = stream_pair();
        drop(far);

        let mut buf = [0u8; 1];
        assert_eq!(near.read(&mut buf).expect("EOF is not an error"), 0);
    }

    #[test]
    fn datagram_pair_preserves_boundaries() {
        let ((mut near_rx, _near_tx), (_far_rx, mut far_tx)) = datagram_pair();
        far_tx.send(b"one").expect("send should succeed");
        far_tx.send(b"two").expect("send should succeed");

        let mut buf = [0u8; 16];
        let n = near_rx
            .recv(&mut buf)
            .expect("recv should succeed")
            .expect("datagram should be queued");
        assert_eq!(&buf[..n], b"one");

        let n = near_rx
            .recv(&mut buf)
            .expect("recv should succeed")
            .expect("datagram should be queued");
        assert_eq!(&buf[..n], b"two");
    }

    #[test]
    fn datagram_recv_times_out_as_no_data() {
        let ((mut near_rx, _near_tx), _far) = datagram_pair();
        let got = near_rx
            .recv(&mut [0u8; 8])
            .expect("timeout should not be an error");
        assert!(got.is_none());
    }

    #[test]
    fn datagram_recv_reports_closed_when_far_end_drops() {
        let ((mut near_rx, _near_tx), far) = datagram_pair();
        drop(far);
        let err = near_rx.recv(&mut [0u8; 8]).expect_err("closed link should error");
        assert!(matches!(err, TransportError::Closed));
    }
}
