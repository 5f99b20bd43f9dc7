//! Authenticated outbound command frames.
//!
//! Uplink frames reuse the telemetry marker, then carry a 16-bit monotone
//! counter, a type byte, the type-specific payload, and a 20-byte HMAC-SHA1
//! tag computed over every preceding byte of the frame. The counter gives
//! each tag a distinct input while the process runs; the vehicle does not
//! verify counter freshness, only the tag.

use std::sync::atomic::{AtomicU16, Ordering};

use bytes::{BufMut, Bytes, BytesMut};
use hmac::{Hmac, Mac};
use sha1::Sha1;

use crate::marker::TELEMETRY_MARKER;
use crate::telemetry::scale;

type HmacSha1 = Hmac<Sha1>;

/// Authentication tag length (HMAC-SHA1).
pub const COMMAND_TAG_LEN: usize = 20;

/// Wire type code for [`Command::ParameterSet`].
pub const PARAMETER_SET_TYPE: u8 = 0;

/// Wire type code for [`Command::WaypointUpdate`].
pub const WAYPOINT_UPDATE_TYPE: u8 = 1;

/// A command value to be signed and uplinked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Set one tunable parameter on the vehicle.
    ParameterSet { id: u8, value: f32 },
    /// Replace one waypoint in the vehicle's plan.
    WaypointUpdate {
        id: u8,
        longitude_deg: f64,
        latitude_deg: f64,
        altitude: f32,
    },
}

impl Command {
    pub fn type_code(&self) -> u8 {
        match self {
            Command::ParameterSet { .. } => PARAMETER_SET_TYPE,
            Command::WaypointUpdate { .. } => WAYPOINT_UPDATE_TYPE,
        }
    }

    fn payload_len(&self) -> usize {
        match self {
            Command::ParameterSet { .. } => 1 + 4,
            Command::WaypointUpdate { .. } => 1 + 4 + 4 + 4,
        }
    }
}

/// Builds signed command frames.
///
/// Holds the link's shared secret and the process-wide outbound counter.
/// The counter increments once per frame built and is never reset while the
/// process runs; share one encoder per link.
pub struct CommandEncoder {
    key: Vec<u8>,
    counter: AtomicU16,
}

impl CommandEncoder {
    /// Create an encoder with the link's shared secret, counter at zero.
    pub fn new(key: impl Into<Vec<u8>>) -> Self {
        Self::with_counter(key, 0)
    }

    /// Create an encoder with an explicit starting counter.
    pub fn with_counter(key: impl Into<Vec<u8>>, start: u16) -> Self {
        Self {
            key: key.into(),
            counter: AtomicU16::new(start),
        }
    }

    /// The counter value the next frame will carry.
    pub fn next_counter(&self) -> u16 {
        self.counter.load(Ordering::SeqCst)
    }

    /// Assemble one signed command frame ready for transport.
    pub fn encode(&self, command: &Command) -> Bytes {
        let header_len = TELEMETRY_MARKER.len() + 2 + 1;
        let mut buf =
            BytesMut::with_capacity(header_len + command.payload_len() + COMMAND_TAG_LEN);

        buf.put_slice(&TELEMETRY_MARKER);
        buf.put_u16(self.counter.fetch_add(1, Ordering::SeqCst));
        buf.put_u8(command.type_code());

        match *command {
            Command::ParameterSet { id, value } => {
                buf.put_u8(id);
                buf.put_f32(value);
            }
            Command::WaypointUpdate {
                id,
                longitude_deg,
                latitude_deg,
                altitude,
            } => {
                buf.put_u8(id);
                buf.put_i32((longitude_deg / scale::GEO_DEGREES).round() as i32);
                buf.put_i32((latitude_deg / scale::GEO_DEGREES).round() as i32);
                buf.put_f32(altitude);
            }
        }

        let mut mac =
            HmacSha1::new_from_slice(&self.key).expect("HMAC accepts keys of any length");
        mac.update(&buf);
        buf.put_slice(&mac.finalize().into_bytes());

        tracing::trace!(kind = command.type_code(), len = buf.len(), "command frame encoded");
        buf.freeze()
    }
}

impl std::fmt::Debug for CommandEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never expose key material in logs.
        f.debug_struct("CommandEncoder")
            .field("key", &format_args!("<redacted:{} bytes>", self.key.len()))
            .field("counter", &self.counter.load(Ordering::SeqCst))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &[u8] = b"shared-link-secret";

    fn verify_tag(frame: &[u8]) -> bool {
        let (body, tag) = frame.split_at(frame.len() - COMMAND_TAG_LEN);
        let mut mac = HmacSha1::new_from_slice(KEY).expect("HMAC accepts keys of any length");
        mac.update(body);
        mac.verify_slice(tag).is_ok()
    }

    #[test]
    fn parameter_set_layout() {
        let encoder = CommandEncoder::with_counter(KEY, 7);
        let frame = encoder.encode(&Command::ParameterSet { id: 5, value: 3.14 });

        assert_eq!(frame.len(), 3 + 2 + 1 + 5 + COMMAND_TAG_LEN);
        assert_eq!(&frame[..3], b"UUT");
        assert_eq!(u16::from_be_bytes([frame[3], frame[4]]), 7);
        assert_eq!(frame[5], PARAMETER_SET_TYPE);
        assert_eq!(frame[6], 5);
        assert_eq!(
            f32::from_be_bytes(frame[7..11].try_into().expect("4 bytes")),
            3.14
        );
        assert!(verify_tag(&frame));
    }

    #[test]
    fn waypoint_update_layout() {
        let encoder = CommandEncoder::new(KEY);
        let frame = encoder.encode(&Command::WaypointUpdate {
            id: 2,
            longitude_deg: -122.25,
            latitude_deg: 47.5,
            altitude: 150.0,
        });

        assert_eq!(frame.len(), 3 + 2 + 1 + 13 + COMMAND_TAG_LEN);
        assert_eq!(frame[5], WAYPOINT_UPDATE_TYPE);
        assert_eq!(frame[6], 2);
        let lon = i32::from_be_bytes(frame[7..11].try_into().expect("4 bytes"));
        let lat = i32::from_be_bytes(frame[11..15].try_into().expect("4 bytes"));
        assert_eq!(lon, -1_222_500_000);
        assert_eq!(lat, 475_000_000);
        assert!(verify_tag(&frame));
    }

    #[test]
    fn counter_increments_once_per_frame() {
        let encoder = CommandEncoder::with_counter(KEY, 100);
        let first = encoder.encode(&Command::ParameterSet { id: 5, value: 3.14 });
        let second = encoder.encode(&Command::ParameterSet { id: 5, value: 3.14 });

        let c1 = u16::from_be_bytes([first[3], first[4]]);
        let c2 = u16::from_be_bytes([second[3], second[4]]);
        assert_eq!(c1, 100);
        assert_eq!(c2, 101);
        assert_eq!(encoder.next_counter(), 102);

        // Identical except the counter field and the tag it feeds.
        assert_eq!(first[..3], second[..3]);
        assert_eq!(first[5..first.len() - COMMAND_TAG_LEN], second[5..second.len() - COMMAND_TAG_LEN]);
        assert!(verify_tag(&first));
        assert!(verify_tag(&second));
        assert_ne!(first[first.len() - COMMAND_TAG_LEN..], second[second.len() - COMMAND_TAG_LEN..]);
    }

    #[test]
    fn encoding_is_deterministic_for_fixed_counter() {
        let a = CommandEncoder::with_counter(KEY, 9)
            .encode(&Command::ParameterSet { id: 1, value: -2.5 });
        let b = CommandEncoder::with_counter(KEY, 9)
            .encode(&Command::ParameterSet { id: 1, value: -2.5 });
        assert_eq!(a, b);
    }

    #[test]
    fn tag_depends_on_key() {
        let frame = CommandEncoder::with_counter(b"other-key".as_slice(), 0)
            .encode(&Command::ParameterSet { id: 1, value: 1.0 });
        assert!(!verify_tag(&frame));
    }

    #[test]
    fn debug_redacts_key_material() {
        let encoder = CommandEncoder::new(KEY);
        let rendered = format!("{encoder:?}");
        assert!(rendered.contains("redacted"));
        assert!(!rendered.contains("secret"));
    }
}
