use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use gslink_frame::telemetry::{
    scale, ACCEL_COUNT, PARAM_COUNT, SCOPE_COUNT, WAYPOINT_COUNT,
};
use gslink_frame::{MARKER_LEN, TELEMETRY_FRAME_LEN};
use serde::Serialize;

use crate::cmd::FieldsArgs;
use crate::exit::{CliResult, SUCCESS};
use crate::output::OutputFormat;

#[derive(Serialize)]
struct FieldRow {
    name: &'static str,
    offset: usize,
    size: usize,
    encoding: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    scale: Option<f64>,
}

/// The wire layout, offsets derived by accumulation so the table can never
/// drift from the codec's component counts.
fn layout() -> Vec<FieldRow> {
    let specs: &[(&'static str, usize, &'static str, Option<f64>)] = &[
        ("marker", MARKER_LEN, "ascii 'UUT'", None),
        ("time", 4, "i32", Some(scale::TIME)),
        ("alt_ref", 2, "i16", Some(scale::REFERENCE)),
        ("ias_ref", 2, "i16", Some(scale::REFERENCE)),
        ("p", 2, "i16", Some(scale::BODY_RATE)),
        ("q", 2, "i16", Some(scale::BODY_RATE)),
        ("r", 2, "i16", Some(scale::BODY_RATE)),
        ("altitude", 2, "i16", Some(scale::ALTITUDE)),
        ("ias", 2, "i16", Some(scale::AIRSPEED)),
        ("psi", 2, "i16", Some(scale::ROLL_YAW)),
        ("theta", 2, "i16", Some(scale::PITCH)),
        ("phi", 2, "i16", Some(scale::ROLL_YAW)),
        ("aileron", 2, "i16", Some(scale::SURFACE)),
        ("elevator", 2, "i16", Some(scale::SURFACE)),
        ("throttle", 2, "i16", Some(scale::THROTTLE)),
        ("rudder", 2, "i16", Some(scale::SURFACE)),
        ("cpu_load", 2, "i16", None),
        ("longitude", 4, "i32", Some(scale::GEO_DEGREES)),
        ("latitude", 4, "i32", Some(scale::GEO_DEGREES)),
        ("flight_mode", 2, "i16", None),
        ("gps_satellites", 2, "i16", None),
        ("accel[6]", ACCEL_COUNT * 2, "i16 each", None),
        ("scopes[10]", SCOPE_COUNT * 4, "f32 each", None),
        ("params[10]", PARAM_COUNT * 4, "f32 each", None),
        (
            "waypoints[5]",
            WAYPOINT_COUNT * (1 + 4 + 4 + 4),
            "u8 + i32 + i32 + f32 each",
            None,
        ),
        ("checksum", 2, "u16 additive", None),
    ];

    let mut offset = 0;
    specs
        .iter()
        .map(|&(name, size, encoding, scale)| {
            let row = FieldRow {
                name,
                offset,
                size,
                encoding,
                scale,
            };
            offset += size;
            row
        })
        .collect()
}

pub fn run(_args: FieldsArgs, format: OutputFormat) -> CliResult<i32> {
    let rows = layout();
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(&rows).unwrap_or_else(|_| "[]".to_string())
            );
        }
        OutputFormat::Table | OutputFormat::Pretty => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["FIELD", "OFFSET", "SIZE", "ENCODING", "SCALE"]);
            for row in &rows {
                table.add_row(vec![
                    row.name.to_string(),
                    row.offset.to_string(),
                    row.size.to_string(),
                    row.encoding.to_string(),
                    row.scale.map(|s| format!("{s:e}")).unwrap_or_else(|| "raw".to_string()),
                ]);
            }
            println!("{table}");
            println!("total frame length: {TELEMETRY_FRAME_LEN} bytes");
        }
    }
    Ok(SUCCESS)
}
