//! Fixed-layout telemetry frames.
//!
//! Wire layout (big-endian throughout): 3-byte marker, a base payload of
//! scaled two's-complement integers, three extension blocks (custom scopes,
//! custom parameters, downstream waypoints), and a 2-byte additive checksum.
//! Every length below is computed from the component counts; nothing is
//! hard-coded to a frame size.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::checksum::{payload_sum, write_trailer};
use crate::marker::{MARKER_LEN, TELEMETRY_MARKER};

/// Base payload: time (4) + fifteen 16-bit quantities (30) + lon/lat (8)
/// + flight mode and satellite count (4) + six raw accelerometer words (12).
const BASE_PAYLOAD_LEN: usize = 4 + 15 * 2 + 2 * 4 + 2 * 2 + ACCEL_COUNT * 2;

/// Custom scope channels in extension block A.
pub const SCOPE_COUNT: usize = 10;

/// Custom parameter slots in extension block B.
pub const PARAM_COUNT: usize = 10;

/// Downstream waypoints in extension block C.
pub const WAYPOINT_COUNT: usize = 5;

/// Raw accelerometer words in the base payload.
pub const ACCEL_COUNT: usize = 6;

/// One waypoint entry: id (1) + longitude (4) + latitude (4) + altitude (4).
const WAYPOINT_WIRE_LEN: usize = 1 + 4 + 4 + 4;

const CHECKSUM_LEN: usize = 2;

/// Total telemetry frame size; this is the synchronizer's expected length.
pub const TELEMETRY_FRAME_LEN: usize = MARKER_LEN
    + BASE_PAYLOAD_LEN
    + SCOPE_COUNT * 4
    + PARAM_COUNT * 4
    + WAYPOINT_COUNT * WAYPOINT_WIRE_LEN
    + CHECKSUM_LEN;

/// Offset of the trailing checksum field.
pub const CHECKSUM_OFFSET: usize = TELEMETRY_FRAME_LEN - CHECKSUM_LEN;

/// Fixed linear scales mapping wire integers to engineering units.
pub mod scale {
    /// time -> seconds.
    pub const TIME: f64 = 1e-4;
    /// altRef / iasRef.
    pub const REFERENCE: f64 = 2.441480758e-3;
    /// Body rates p, q, r.
    pub const BODY_RATE: f64 = 1.065264436e-4;
    /// Barometric altitude.
    pub const ALTITUDE: f64 = 3.0517578125e-1;
    /// Indicated airspeed.
    pub const AIRSPEED: f64 = 2.44140625e-3;
    /// psi and phi.
    pub const ROLL_YAW: f64 = 5.4931640625e-3;
    /// theta.
    pub const PITCH: f64 = 2.7465820313e-3;
    /// Aileron, elevator and rudder deflection.
    pub const SURFACE: f64 = 1.220740379e-3;
    /// Throttle.
    pub const THROTTLE: f64 = 3.051850947599719e-5;
    /// Longitude/latitude -> degrees.
    pub const GEO_DEGREES: f64 = 1e-7;
}

/// One downstream waypoint from extension block C.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Waypoint {
    pub id: u8,
    pub longitude_deg: f64,
    pub latitude_deg: f64,
    /// Already in engineering units on the wire (IEEE-754, unscaled).
    pub altitude: f32,
}

/// A decoded telemetry frame, in engineering units.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TelemetryFrame {
    pub time_s: f64,
    pub alt_ref: f64,
    pub ias_ref: f64,
    pub p: f64,
    pub q: f64,
    pub r: f64,
    pub altitude: f64,
    pub ias: f64,
    pub psi: f64,
    pub theta: f64,
    pub phi: f64,
    pub aileron: f64,
    pub elevator: f64,
    pub throttle: f64,
    pub rudder: f64,
    pub cpu_load: i16,
    pub longitude_deg: f64,
    pub latitude_deg: f64,
    pub flight_mode: i16,
    pub gps_satellites: i16,
    pub accel: [i16; ACCEL_COUNT],
    pub scopes: [f32; SCOPE_COUNT],
    pub params: [f32; PARAM_COUNT],
    pub waypoints: [Waypoint; WAYPOINT_COUNT],
}

/// Decode the payload of a checksum-validated telemetry frame.
///
/// Caller guarantees `frame` is exactly [`TELEMETRY_FRAME_LEN`] bytes and
/// starts with the telemetry marker.
pub(crate) fn decode_fields(frame: &[u8]) -> TelemetryFrame {
    debug_assert_eq!(frame.len(), TELEMETRY_FRAME_LEN);
    let mut buf = &frame[MARKER_LEN..CHECKSUM_OFFSET];

    let mut out = TelemetryFrame {
        time_s: f64::from(buf.get_i32()) * scale::TIME,
        alt_ref: f64::from(buf.get_i16()) * scale::REFERENCE,
        ias_ref: f64::from(buf.get_i16()) * scale::REFERENCE,
        p: f64::from(buf.get_i16()) * scale::BODY_RATE,
        q: f64::from(buf.get_i16()) * scale::BODY_RATE,
        r: f64::from(buf.get_i16()) * scale::BODY_RATE,
        altitude: f64::from(buf.get_i16()) * scale::ALTITUDE,
        ias: f64::from(buf.get_i16()) * scale::AIRSPEED,
        psi: f64::from(buf.get_i16()) * scale::ROLL_YAW,
        theta: f64::from(buf.get_i16()) * scale::PITCH,
        phi: f64::from(buf.get_i16()) * scale::ROLL_YAW,
        aileron: f64::from(buf.get_i16()) * scale::SURFACE,
        elevator: f64::from(buf.get_i16()) * scale::SURFACE,
        throttle: f64::from(buf.get_i16()) * scale::THROTTLE,
        rudder: f64::from(buf.get_i16()) * scale::SURFACE,
        cpu_load: buf.get_i16(),
        longitude_deg: f64::from(buf.get_i32()) * scale::GEO_DEGREES,
        latitude_deg: f64::from(buf.get_i32()) * scale::GEO_DEGREES,
        flight_mode: buf.get_i16(),
        gps_satellites: buf.get_i16(),
        ..TelemetryFrame::default()
    };

    for word in &mut out.accel {
        *word = buf.get_i16();
    }
    for slot in &mut out.scopes {
        *slot = buf.get_f32();
    }
    for slot in &mut out.params {
        *slot = buf.get_f32();
    }
    for wp in &mut out.waypoints {
        wp.id = buf.get_u8();
        wp.longitude_deg = f64::from(buf.get_i32()) * scale::GEO_DEGREES;
        wp.latitude_deg = f64::from(buf.get_i32()) * scale::GEO_DEGREES;
        wp.altitude = buf.get_f32();
    }
    debug_assert!(buf.is_empty());

    out
}

impl TelemetryFrame {
    /// Encode this frame to the wire layout, checksum included.
    ///
    /// Engineering units are divided back through the scale table and
    /// rounded to the nearest wire integer. Used by simulators and tests;
    /// a live ground station only decodes this direction.
    pub fn to_wire(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(TELEMETRY_FRAME_LEN);
        buf.put_slice(&TELEMETRY_MARKER);
        buf.put_i32((self.time_s / scale::TIME).round() as i32);
        buf.put_i16((self.alt_ref / scale::REFERENCE).round() as i16);
        buf.put_i16((self.ias_ref / scale::REFERENCE).round() as i16);
        buf.put_i16((self.p / scale::BODY_RATE).round() as i16);
        buf.put_i16((self.q / scale::BODY_RATE).round() as i16);
        buf.put_i16((self.r / scale::BODY_RATE).round() as i16);
        buf.put_i16((self.altitude / scale::ALTITUDE).round() as i16);
        buf.put_i16((self.ias / scale::AIRSPEED).round() as i16);
        buf.put_i16((self.psi / scale::ROLL_YAW).round() as i16);
        buf.put_i16((self.theta / scale::PITCH).round() as i16);
        buf.put_i16((self.phi / scale::ROLL_YAW).round() as i16);
        buf.put_i16((self.aileron / scale::SURFACE).round() as i16);
        buf.put_i16((self.elevator / scale::SURFACE).round() as i16);
        buf.put_i16((self.throttle / scale::THROTTLE).round() as i16);
        buf.put_i16((self.rudder / scale::SURFACE).round() as i16);
        buf.put_i16(self.cpu_load);
        buf.put_i32((self.longitude_deg / scale::GEO_DEGREES).round() as i32);
        buf.put_i32((self.latitude_deg / scale::GEO_DEGREES).round() as i32);
        buf.put_i16(self.flight_mode);
        buf.put_i16(self.gps_satellites);
        for word in &self.accel {
            buf.put_i16(*word);
        }
        for slot in &self.scopes {
            buf.put_f32(*slot);
        }
        for slot in &self.params {
            buf.put_f32(*slot);
        }
        for wp in &self.waypoints {
            buf.put_u8(wp.id);
            buf.put_i32((wp.longitude_deg / scale::GEO_DEGREES).round() as i32);
            buf.put_i32((wp.latitude_deg / scale::GEO_DEGREES).round() as i32);
            buf.put_f32(wp.altitude);
        }

        let sum = payload_sum(&buf[MARKER_LEN..]);
        buf.put_slice(&write_trailer(sum));
        debug_assert_eq!(buf.len(), TELEMETRY_FRAME_LEN);
        buf.freeze()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_length_matches_field_table() {
        // Header 3, base payload 58, scopes 40, params 40, waypoints 65,
        // checksum 2.
        assert_eq!(TELEMETRY_FRAME_LEN, 208);
        assert_eq!(CHECKSUM_OFFSET, 206);
    }

    #[test]
    fn body_rate_scale_decode() {
        // A raw value of 100 at the `p` offset decodes to 100 x the body
        // rate scale.
        let mut wire = TelemetryFrame::default().to_wire().to_vec();
        wire[11..13].copy_from_slice(&100i16.to_be_bytes());
        let sum = payload_sum(&wire[MARKER_LEN..CHECKSUM_OFFSET]);
        wire[CHECKSUM_OFFSET..].copy_from_slice(&write_trailer(sum));

        let frame = decode_fields(&wire);
        assert_eq!(frame.p, 100.0 * scale::BODY_RATE);
    }

    #[test]
    fn wire_roundtrip_preserves_fields() {
        let frame = TelemetryFrame {
            time_s: 12.5,
            altitude: 305.17578125,
            ias: 25.0,
            psi: 1.5,
            cpu_load: 42,
            longitude_deg: -122.3456789,
            latitude_deg: 47.1234567,
            flight_mode: 2,
            gps_satellites: 9,
            accel: [1, -2, 3, -4, 5, -6],
            ..TelemetryFrame::default()
        };
        let wire = frame.to_wire();
        assert_eq!(wire.len(), TELEMETRY_FRAME_LEN);

        let decoded = decode_fields(&wire);
        assert_eq!(decoded.cpu_load, 42);
        assert_eq!(decoded.flight_mode, 2);
        assert_eq!(decoded.gps_satellites, 9);
        assert_eq!(decoded.accel, frame.accel);
        assert!((decoded.time_s - frame.time_s).abs() < scale::TIME);
        assert!((decoded.longitude_deg - frame.longitude_deg).abs() < 1e-6);
        assert!((decoded.latitude_deg - frame.latitude_deg).abs() < 1e-6);
    }

    #[test]
    fn extension_blocks_roundtrip() {
        let mut frame = TelemetryFrame::default();
        for (i, slot) in frame.scopes.iter_mut().enumerate() {
            *slot = i as f32 * 0.5;
        }
        for (i, slot) in frame.params.iter_mut().enumerate() {
            *slot = -(i as f32);
        }
        frame.waypoints[2] = Waypoint {
            id: 7,
            longitude_deg: 10.0000001,
            latitude_deg: -45.5,
            altitude: 120.25,
        };

        let decoded = decode_fields(&frame.to_wire());
        assert_eq!(decoded.scopes, frame.scopes);
        assert_eq!(decoded.params, frame.params);
        assert_eq!(decoded.waypoints[2].id, 7);
        assert_eq!(decoded.waypoints[2].altitude, 120.25);
        assert!((decoded.waypoints[2].longitude_deg - 10.0000001).abs() < 1e-7);
    }

    #[test]
    fn geo_fields_scale_by_1e7() {
        let frame = TelemetryFrame {
            longitude_deg: 1.0,
            ..TelemetryFrame::default()
        };
        let wire = frame.to_wire();
        let raw = i32::from_be_bytes(wire[37..41].try_into().expect("4 bytes"));
        assert_eq!(raw, 10_000_000);
    }
}
