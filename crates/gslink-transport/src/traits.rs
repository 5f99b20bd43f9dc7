use std::io::{Read, Write};

use crate::error::Result;

/// Receive half of a datagram transport.
///
/// Each successful call yields exactly one datagram. `Ok(None)` means the
/// receive timeout elapsed with no data this cycle, which is not an error —
/// the caller is expected to loop.
pub trait DatagramRecv: Send {
    fn recv(&mut self, buf: &mut [u8]) -> Result<Option<usize>>;
}

/// Send half of a datagram transport.
pub trait DatagramSend: Send {
    fn send(&mut self, buf: &[u8]) -> Result<()>;
}

/// Receive half of a link transport.
pub enum TransportRx {
    /// Continuous byte stream. Reads should be configured with a receive
    /// timeout so a blocked reader thread can observe shutdown.
    Stream(Box<dyn Read + Send>),
    /// Discrete datagrams, one per receive.
    Datagram(Box<dyn DatagramRecv>),
}

/// Send half of a link transport.
pub enum TransportTx {
    Stream(Box<dyn Write + Send>),
    Datagram(Box<dyn DatagramSend>),
}

/// Both halves of one opened link transport.
pub struct Transport {
    pub rx: TransportRx,
    pub tx: TransportTx,
}

impl Transport {
    /// Wrap an already-opened byte stream (e.g. a serial port) as a transport.
    pub fn stream(
        reader: impl Read + Send + 'static,
        writer: impl Write + Send + 'static,
    ) -> Self {
        Self {
            rx: TransportRx::Stream(Box::new(reader)),
            tx: TransportTx::Stream(Box::new(writer)),
        }
    }

    /// Wrap already-opened datagram halves as a transport.
    pub fn datagram(
        rx: impl DatagramRecv + 'static,
        tx: impl DatagramSend + 'static,
    ) -> Self {
        Self {
            rx: TransportRx::Datagram(Box::new(rx)),
            tx: TransportTx::Datagram(Box::new(tx)),
        }
    }

    /// Human-readable transport shape, for logs.
    pub fn kind(&self) -> &'static str {
        match self.rx {
            TransportRx::Stream(_) => "stream",
            TransportRx::Datagram(_) => "datagram",
        }
    }
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport").field("kind", &self.kind()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_transport_reports_kind() {
        let transport = Transport::stream(std::io::empty(), std::io::sink());
        assert_eq!(transport.kind(), "stream");
        assert_eq!(format!("{transport:?}"), "Transport { kind: \"stream\" }");
    }

    #[test]
    fn datagram_transport_reports_kind() {
        let ((rx, tx), _far) = crate::loopback::datagram_pair();
        let transport = Transport::datagram(rx, tx);
        assert_eq!(transport.kind(), "datagram");
    }
}
