//! Candidate buffer -> validated record.
//!
//! Decode never fails at the API level: hostile input resolves to
//! [`Decoded::Rejected`], and no panic or error escapes this boundary.

use crate::checksum::{payload_sum, read_trailer};
use crate::marker::{MESSAGE_MARKER, TELEMETRY_MARKER};
use crate::message::decode_text;
use crate::telemetry::{decode_fields, TelemetryFrame, CHECKSUM_OFFSET, TELEMETRY_FRAME_LEN};

/// Result of decoding one candidate buffer.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    Telemetry(TelemetryFrame),
    Message(String),
    Rejected(RejectReason),
}

/// Why a candidate buffer was discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum RejectReason {
    /// Telemetry checksum did not match the trailer field.
    ChecksumMismatch { computed: u16, received: u16 },
    /// Telemetry marker with a wrong frame length.
    BadLength { len: usize, expected: usize },
    /// Zero-length candidate.
    Empty,
}

impl RejectReason {
    pub fn as_str(self) -> &'static str {
        match self {
            RejectReason::ChecksumMismatch { .. } => "checksum_mismatch",
            RejectReason::BadLength { .. } => "bad_length",
            RejectReason::Empty => "empty",
        }
    }
}

/// Decode a candidate buffer of either telemetry length or message length.
///
/// A buffer with no recognizable marker at all is interpreted as diagnostic
/// text rather than rejected; on a link this noisy, readable context beats
/// a silent drop.
pub fn decode(buf: &[u8]) -> Decoded {
    if buf.is_empty() {
        return Decoded::Rejected(RejectReason::Empty);
    }

    if buf.starts_with(&TELEMETRY_MARKER) {
        if buf.len() != TELEMETRY_FRAME_LEN {
            tracing::warn!(len = buf.len(), expected = TELEMETRY_FRAME_LEN, "telemetry length mismatch");
            return Decoded::Rejected(RejectReason::BadLength {
                len: buf.len(),
                expected: TELEMETRY_FRAME_LEN,
            });
        }
        let computed = payload_sum(&buf[crate::marker::MARKER_LEN..CHECKSUM_OFFSET]);
        let trailer: [u8; 2] = buf[CHECKSUM_OFFSET..]
            .try_into()
            .unwrap_or_default();
        let received = read_trailer(&trailer);
        if computed != received {
            tracing::warn!(computed, received, "telemetry checksum mismatch");
            return Decoded::Rejected(RejectReason::ChecksumMismatch { computed, received });
        }
        let frame = decode_fields(buf);
        tracing::trace!(time_s = frame.time_s, "telemetry frame decoded");
        return Decoded::Telemetry(frame);
    }

    if buf.starts_with(&MESSAGE_MARKER) {
        return Decoded::Message(decode_text(&buf[crate::marker::MARKER_LEN..]));
    }

    tracing::debug!(len = buf.len(), "no marker; decoding as diagnostic text");
    Decoded::Message(decode_text(buf))
}
