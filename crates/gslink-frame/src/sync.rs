//! Stream frame synchronizer.
//!
//! Recovers frame boundaries from an open-ended byte stream that may start
//! mid-frame, drop bytes, or carry corruption. The synchronizer owns its
//! accumulator and is driven byte-by-byte from a single reader thread;
//! completed buffers are handed out by value, so the hot loop needs no
//! locking.

use bytes::Bytes;

use crate::marker::{FrameKind, MARKER_LEN};
use crate::telemetry::TELEMETRY_FRAME_LEN;

/// Hard cap on accumulation between synchronization points. A message frame
/// whose terminator never arrives would otherwise grow the buffer without
/// bound.
const MAX_ACCUMULATION: usize = 4096;

/// A complete candidate buffer recovered from the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidate {
    /// Full telemetry frame, marker and checksum included.
    Telemetry(Bytes),
    /// Message payload only: text between the marker and its NUL terminator.
    Message(Bytes),
}

/// Marker-driven synchronizer for a continuous byte stream.
#[derive(Debug)]
pub struct StreamSynchronizer {
    acc: Vec<u8>,
    pos: usize,
    expected_len: usize,
}

impl Default for StreamSynchronizer {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamSynchronizer {
    pub fn new() -> Self {
        Self {
            acc: vec![0; TELEMETRY_FRAME_LEN],
            pos: 0,
            // Until a marker says otherwise, assume a telemetry frame is in
            // progress.
            expected_len: TELEMETRY_FRAME_LEN,
        }
    }

    /// Drop all accumulated state and return to the initial search
    /// condition.
    pub fn reset(&mut self) {
        self.pos = 0;
        self.expected_len = TELEMETRY_FRAME_LEN;
    }

    /// Feed one byte; returns a candidate when one completes.
    pub fn push(&mut self, byte: u8) -> Option<Candidate> {
        if self.pos >= MAX_ACCUMULATION {
            tracing::debug!("accumulator cap hit, restarting frame search");
            self.pos = 0;
        }
        if self.acc.len() <= self.pos {
            self.acc.resize(self.pos + 1, 0);
        }
        self.acc[self.pos] = byte;

        // Marker rescan. A marker appearing where one is not expected is
        // stronger evidence of the true frame boundary than an assumed
        // length, so it preempts whatever was accumulating.
        if self.pos >= 2 {
            let trio = [self.acc[self.pos - 2], self.acc[self.pos - 1], byte];
            if let Some(kind) = FrameKind::from_marker(&trio) {
                if self.pos > 2 {
                    tracing::trace!(kind = kind.as_str(), dropped = self.pos - 2, "marker preempts in-progress buffer");
                }
                self.acc[..MARKER_LEN].copy_from_slice(&kind.marker());
                self.pos = MARKER_LEN;
                self.expected_len = kind.frame_len_hint();
                return None;
            }
        }

        // Message frames complete at the NUL terminator, never at the
        // length hint.
        if byte == 0
            && self.pos >= MARKER_LEN
            && self.kind_in_progress() == Some(FrameKind::Message)
        {
            let payload = Bytes::copy_from_slice(&self.acc[MARKER_LEN..self.pos]);
            self.pos = 0;
            return Some(Candidate::Message(payload));
        }

        // Length-driven completion.
        if self.pos == self.expected_len - 1 {
            return match self.kind_in_progress() {
                Some(FrameKind::Telemetry) => {
                    let frame = Bytes::copy_from_slice(&self.acc[..self.expected_len]);
                    self.pos = 0;
                    Some(Candidate::Telemetry(frame))
                }
                // Hint reached mid-message: keep accumulating to the NUL.
                Some(FrameKind::Message) => {
                    self.pos += 1;
                    None
                }
                // Neither marker at the front: we were never synchronized.
                // Drop silently; rule 2 finds the next real boundary.
                None => {
                    tracing::trace!(len = self.expected_len, "unsynchronized buffer dropped");
                    self.pos = 0;
                    None
                }
            };
        }

        self.pos += 1;
        None
    }

    /// Feed a chunk of bytes, collecting every completed candidate.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<Candidate> {
        let mut out = Vec::new();
        for &byte in chunk {
            if let Some(candidate) = self.push(byte) {
                out.push(candidate);
            }
        }
        out
    }

    fn kind_in_progress(&self) -> Option<FrameKind> {
        if self.pos < MARKER_LEN {
            return None;
        }
        let header: [u8; 3] = self.acc[..MARKER_LEN].try_into().ok()?;
        FrameKind::from_marker(&header)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::{decode, Decoded};
    use crate::telemetry::TelemetryFrame;

    #[test]
    fn clean_telemetry_frame_completes() {
        let wire = TelemetryFrame::default().to_wire();
        let mut sync = StreamSynchronizer::new();

        let candidates = sync.feed(&wire);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0], Candidate::Telemetry(wire));
    }

    #[test]
    fn resyncs_past_leading_noise() {
        let wire = TelemetryFrame::default().to_wire();
        let mut stream = vec![0xFF, 0xFF];
        stream.extend_from_slice(&wire);

        let mut sync = StreamSynchronizer::new();
        let candidates = sync.feed(&stream);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0], Candidate::Telemetry(wire.clone()));
        assert!(matches!(decode(&wire), Decoded::Telemetry(_)));
    }

    #[test]
    fn marker_preempts_partial_frame() {
        let wire = TelemetryFrame::default().to_wire();
        let mut stream = wire[..100].to_vec(); // incomplete frame
        stream.extend_from_slice(&wire); // then a fresh complete one

        let mut sync = StreamSynchronizer::new();
        let candidates = sync.feed(&stream);
        // The partial frame is discarded; only the complete frame emerges.
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0], Candidate::Telemetry(wire));
    }

    #[test]
    fn message_completes_at_nul_not_length() {
        let mut sync = StreamSynchronizer::new();
        let mut stream = b"UUMhello\0".to_vec();
        stream.extend_from_slice(b"junk after terminator");

        let candidates = sync.feed(&stream);
        assert_eq!(candidates.len(), 1);
        assert_eq!(
            candidates[0],
            Candidate::Message(Bytes::copy_from_slice(b"hello"))
        );
    }

    #[test]
    fn message_longer_than_hint_still_completes() {
        let mut sync = StreamSynchronizer::new();
        let text = vec![b'a'; 2 * crate::message::MESSAGE_LEN_HINT];
        let mut stream = b"UUM".to_vec();
        stream.extend_from_slice(&text);
        stream.push(0);

        let candidates = sync.feed(&stream);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0], Candidate::Message(Bytes::from(text)));
    }

    #[test]
    fn unsynchronized_buffer_dropped_silently() {
        // A full telemetry-length run of marker-free noise produces nothing
        // and does not wedge the synchronizer.
        let mut sync = StreamSynchronizer::new();
        let noise = vec![0xA5u8; TELEMETRY_FRAME_LEN + 16];
        assert!(sync.feed(&noise).is_empty());

        // It still locks onto the next real frame.
        let wire = TelemetryFrame::default().to_wire();
        let candidates = sync.feed(&wire);
        assert_eq!(candidates.len(), 1);
    }

    #[test]
    fn back_to_back_frames_of_both_kinds() {
        let wire = TelemetryFrame::default().to_wire();
        let mut stream = wire.to_vec();
        stream.extend_from_slice(b"UUMlink ok\0");
        stream.extend_from_slice(&wire);

        let mut sync = StreamSynchronizer::new();
        let candidates = sync.feed(&stream);
        assert_eq!(candidates.len(), 3);
        assert!(matches!(candidates[0], Candidate::Telemetry(_)));
        assert_eq!(
            candidates[1],
            Candidate::Message(Bytes::copy_from_slice(b"link ok"))
        );
        assert!(matches!(candidates[2], Candidate::Telemetry(_)));
    }

    #[test]
    fn runaway_message_hits_accumulation_cap_and_recovers() {
        let mut sync = StreamSynchronizer::new();
        sync.feed(b"UUM");
        // Terminator never arrives.
        let junk = vec![b'x'; MAX_ACCUMULATION + 64];
        assert!(sync.feed(&junk).is_empty());

        let wire = TelemetryFrame::default().to_wire();
        let candidates = sync.feed(&wire);
        assert_eq!(candidates.len(), 1);
    }

    #[test]
    fn reset_returns_to_search_state() {
        let wire = TelemetryFrame::default().to_wire();
        let mut sync = StreamSynchronizer::new();
        sync.feed(&wire[..50]);
        sync.reset();

        let candidates = sync.feed(&wire);
        assert_eq!(candidates.len(), 1);
    }

    #[test]
    fn empty_message_payload() {
        let mut sync = StreamSynchronizer::new();
        let candidates = sync.feed(b"UUM\0");
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0], Candidate::Message(Bytes::new()));
    }
}
