//! Ground-station datalink for small uncrewed vehicles.
//!
//! gslink turns a raw byte stream or datagram socket from a vehicle into
//! discrete validated telemetry and message records, and builds
//! authenticated command frames for uplink.
//!
//! # Crate Structure
//!
//! - [`transport`] — Stream/datagram transport halves (serial, UDP, loopback)
//! - [`frame`] — Marker framing, telemetry/message codec, command signing
//! - [`link`] — Reader threads, liveness watchdog, link manager (behind
//!   `link` feature)

/// Re-export transport types.
pub mod transport {
    pub use gslink_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use gslink_frame::*;
}

/// Re-export link types (requires `link` feature).
#[cfg(feature = "link")]
pub mod link {
    pub use gslink_link::*;
}
