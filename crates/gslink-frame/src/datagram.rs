//! Datagram frame extraction.
//!
//! A datagram transport delivers each frame as one bounded buffer, so no
//! state is carried between datagrams and message frames are not expected
//! on this path; only telemetry is scanned for.

use crate::marker::TELEMETRY_MARKER;
use crate::telemetry::TELEMETRY_FRAME_LEN;

/// Scan one datagram for a telemetry frame.
///
/// Scans once from index 2 upward for the telemetry marker; the first match
/// wins and the rest of the datagram is ignored. Returns `None` when no
/// marker is found or the frame window would run past the datagram bounds.
pub fn scan_datagram(datagram: &[u8]) -> Option<&[u8]> {
    for i in 2..datagram.len() {
        if datagram[i - 2..=i] == TELEMETRY_MARKER {
            let start = i - 2;
            let end = start + TELEMETRY_FRAME_LEN;
            if end > datagram.len() {
                tracing::trace!(start, datagram_len = datagram.len(), "telemetry window exceeds datagram");
                return None;
            }
            return Some(&datagram[start..end]);
        }
    }
    None
}
