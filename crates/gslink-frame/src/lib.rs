//! Marker-framed wire protocol for a vehicle datalink.
//!
//! This is the pure core of gslink: no I/O, no clocks. Frames are delimited
//! by a 3-byte marker (`UU` + kind byte) with no length prefix:
//! - `UUT` — fixed-layout telemetry, big-endian scaled integers plus float
//!   extension blocks, trailed by a 16-bit additive checksum;
//! - `UUM` — NUL-terminated text messages;
//! - outbound commands reuse `UUT` and carry a monotone counter plus a
//!   20-byte HMAC-SHA1 tag.
//!
//! [`sync::StreamSynchronizer`] recovers frame boundaries from an arbitrary
//! byte stream; [`datagram::scan_datagram`] does the same for one bounded
//! datagram; [`decode::decode`] turns candidate buffers into validated
//! records and never panics or errors on hostile input.

pub mod checksum;
pub mod command;
pub mod datagram;
pub mod decode;
pub mod marker;
pub mod message;
pub mod sync;
pub mod telemetry;

pub use command::{Command, CommandEncoder, COMMAND_TAG_LEN};
pub use decode::{decode, Decoded, RejectReason};
pub use marker::{FrameKind, MARKER_LEN, MESSAGE_MARKER, TELEMETRY_MARKER};
pub use message::{decode_text, MESSAGE_LEN_HINT};
pub use sync::{Candidate, StreamSynchronizer};
pub use telemetry::{TelemetryFrame, Waypoint, TELEMETRY_FRAME_LEN};
