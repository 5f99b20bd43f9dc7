//! Free-text message frames.
//!
//! A message frame is the `UUM` marker followed by text and a NUL
//! terminator. Unlike telemetry there is no real length; the nominal size
//! below exists only as the synchronizer's expected-length bookkeeping when
//! a message marker is seen mid-resync. Extraction is terminator-driven.

/// Nominal message frame size used as the synchronizer's length hint.
pub const MESSAGE_LEN_HINT: usize = 103;

/// Decode message text: one byte per character, stopping at the first NUL.
///
/// The vehicle emits 8-bit text; bytes map directly to the first Unicode
/// page (Latin-1), so no byte sequence can fail to decode.
pub fn decode_text(bytes: &[u8]) -> String {
    bytes
        .iter()
        .take_while(|&&b| b != 0)
        .map(|&b| char::from(b))
        .collect()
}
