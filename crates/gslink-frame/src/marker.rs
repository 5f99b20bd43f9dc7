//! Frame markers.
//!
//! Markers are the only self-describing structure in the stream: 3 bytes,
//! always `'U','U'`, then a discriminator byte naming the frame kind. There
//! is no length prefix anywhere in the protocol.

use crate::message::MESSAGE_LEN_HINT;
use crate::telemetry::TELEMETRY_FRAME_LEN;

/// Marker length in bytes.
pub const MARKER_LEN: usize = 3;

/// First two bytes of every marker.
pub const MARKER_PREFIX: [u8; 2] = [b'U', b'U'];

/// Telemetry marker, also used by outbound command frames.
pub const TELEMETRY_MARKER: [u8; 3] = [b'U', b'U', b'T'];

/// Free-text message marker.
pub const MESSAGE_MARKER: [u8; 3] = [b'U', b'U', b'M'];

/// Frame kind named by a marker's discriminator byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameKind {
    Telemetry,
    Message,
}

impl FrameKind {
    /// Recognize a 3-byte marker.
    pub fn from_marker(bytes: &[u8; 3]) -> Option<Self> {
        if bytes[..2] != MARKER_PREFIX {
            return None;
        }
        match bytes[2] {
            b'T' => Some(FrameKind::Telemetry),
            b'M' => Some(FrameKind::Message),
            _ => None,
        }
    }

    /// The full 3-byte marker for this kind.
    pub fn marker(self) -> [u8; 3] {
        match self {
            FrameKind::Telemetry => TELEMETRY_MARKER,
            FrameKind::Message => MESSAGE_MARKER,
        }
    }

    /// Expected frame length once this kind's marker is seen.
    ///
    /// Exact for telemetry. For messages this is only a bookkeeping hint:
    /// actual extraction is driven by the NUL terminator.
    pub fn frame_len_hint(self) -> usize {
        match self {
            FrameKind::Telemetry => TELEMETRY_FRAME_LEN,
            FrameKind::Message => MESSAGE_LEN_HINT,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FrameKind::Telemetry => "telemetry",
            FrameKind::Message => "message",
        }
    }
}
