use std::io::ErrorKind;
use std::net::{SocketAddr, UdpSocket};
use std::time::Duration;

use crate::error::{Result, TransportError};
use crate::traits::{DatagramRecv, DatagramSend, Transport};

/// Receive half over a bound UDP socket.
pub struct UdpRx {
    socket: UdpSocket,
}

/// Send half over a UDP socket, addressed to a fixed remote.
pub struct UdpTx {
    socket: UdpSocket,
    peer: SocketAddr,
}

impl DatagramRecv for UdpRx {
    fn recv(&mut self, buf: &mut [u8]) -> Result<Option<usize>> {
        match self.socket.recv_from(buf) {
            Ok((n, from)) => {
                tracing::trace!(bytes = n, %from, "datagram received");
                Ok(Some(n))
            }
            // A receive timeout is "no data this cycle", not a fault.
            Err(err) if matches!(err.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                Ok(None)
            }
            Err(err) => Err(TransportError::Io(err)),
        }
    }
}

impl DatagramSend for UdpTx {
    fn send(&mut self, buf: &[u8]) -> Result<()> {
        let sent = self.socket.send_to(buf, self.peer)?;
        if sent != buf.len() {
            return Err(TransportError::Closed);
        }
        Ok(())
    }
}

/// Adapt an already-bound UDP socket into a datagram transport.
///
/// The socket is cloned so receive and send can run on separate threads.
/// `read_timeout` bounds each blocking receive so the reader thread can
/// observe shutdown requests.
pub fn udp_transport(
    socket: UdpSocket,
    peer: SocketAddr,
    read_timeout: Duration,
) -> Result<Transport> {
    socket.set_read_timeout(Some(read_timeout))?;
    let tx_socket = socket.try_clone()?;
    Ok(Transport::datagram(
        UdpRx { socket },
        UdpTx {
            socket: tx_socket,
            peer,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{TransportRx, TransportTx};

    fn bound_socket() -> UdpSocket {
        UdpSocket::bind("127.0.0.1:0").expect("loopback UDP bind should succeed")
    }

    #[test]
    fn roundtrip_between_two_sockets() {
        let a = bound_socket();
        let b = bound_socket();
        let a_addr = a.local_addr().expect("socket should have a local addr");
        let b_addr = b.local_addr().expect("socket should have a local addr");

        let mut ta = udp_transport(a, b_addr, Duration::from_millis(200))
            .expect("transport should wrap socket");
        let mut tb = udp_transport(b, a_addr, Duration::from_millis(200))
            .expect("transport should wrap socket");

        if let TransportTx::Datagram(tx) = &mut ta.tx {
            tx.send(b"ping").expect("send should succeed");
        } else {
            panic!("expected datagram tx half");
        }

        let mut buf = [0u8; 64];
        if let TransportRx::Datagram(rx) = &mut tb.rx {
            let n = rx
                .recv(&mut buf)
                .expect("recv should not fail")
                .expect("datagram should arrive before timeout");
            assert_eq!(&buf[..n], b"ping");
        } else {
            panic!("expected datagram rx half");
        }
    }

    #[test]
    fn recv_timeout_yields_no_data() {
        let socket = bound_socket();
        let peer = socket.local_addr().expect("socket should have a local addr");
        let mut transport = udp_transport(socket, peer, Duration::from_millis(20))
            .expect("transport should wrap socket");

        let mut buf = [0u8; 16];
        if let TransportRx::Datagram(rx) = &mut transport.rx {
            let got = rx.recv(&mut buf).expect("timeout should not be an error");
            assert!(got.is_none());
        } else {
            panic!("expected datagram rx half");
        }
    }
}
