//! Telemetry frame checksum.
//!
//! The checksum is the arithmetic sum, modulo 2^16, of every payload byte
//! strictly between the 3-byte marker and the trailing 2-byte checksum
//! field, carried big-endian on the wire.
//!
//! The reference ground station read the trailer through a sign-extending
//! narrow integer, which diverges from this unsigned comparison for sums
//! >= 0x8000. We use the plain unsigned interpretation (what a firmware
//! emitting the sum as a big-endian u16 needs); see DESIGN.md before
//! changing this.

/// Additive checksum over a payload span.
pub fn payload_sum(payload: &[u8]) -> u16 {
    payload
        .iter()
        .fold(0u16, |acc, &b| acc.wrapping_add(u16::from(b)))
}

/// Read the big-endian trailer field.
pub fn read_trailer(trailer: &[u8; 2]) -> u16 {
    u16::from_be_bytes(*trailer)
}

/// Encode a checksum for the trailer field.
pub fn write_trailer(sum: u16) -> [u8; 2] {
    sum.to_be_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sum_of_empty_payload_is_zero() {
        assert_eq!(payload_sum(&[]), 0);
    }

    #[test]
    fn sum_wraps_modulo_2_16() {
        let payload = vec![0xFFu8; 0x0101]; // 257 * 255 = 65535 + 0 -> wraps
        assert_eq!(payload_sum(&payload), (0x0101u32 * 0xFF % 0x1_0000) as u16);
    }

    #[test]
    fn trailer_roundtrip() {
        for sum in [0u16, 1, 0x7FFF, 0x8000, 0xFFFF] {
            assert_eq!(read_trailer(&write_trailer(sum)), sum);
        }
    }

    // Locks the unsigned interpretation for sums >= 0x8000, where the
    // reference implementation's sign-extending read would diverge.
    #[test]
    fn high_bit_sums_compare_unsigned() {
        let sum = 0x81FFu16;
        let trailer = write_trailer(sum);
        assert_eq!(trailer, [0x81, 0xFF]);
        assert_eq!(read_trailer(&trailer), sum);
    }
}
