//! Transport abstraction for ground-station datalinks.
//!
//! A link runs over one of two transport shapes:
//! - a byte stream (a serial line, a TCP tunnel, a pty) exposed as plain
//!   [`std::io::Read`]/[`std::io::Write`] halves;
//! - a datagram socket (UDP) exposed as [`DatagramRecv`]/[`DatagramSend`]
//!   halves, where each receive yields one bounded datagram.
//!
//! Opening devices and binding sockets is the caller's job; this crate only
//! adapts already-opened endpoints into the halves the link layer consumes.

pub mod error;
pub mod loopback;
pub mod traits;
pub mod udp;

pub use error::{Result, TransportError};
pub use loopback::{
    datagram_pair, stream_pair, LoopbackDatagramRx, LoopbackDatagramTx, LoopbackReader,
    LoopbackStream, LoopbackWriter,
};
pub use traits::{DatagramRecv, DatagramSend, Transport, TransportRx, TransportTx};
pub use udp::{udp_transport, UdpRx, UdpTx};
