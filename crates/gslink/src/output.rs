use std::io::IsTerminal;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use gslink_frame::{RejectReason, TelemetryFrame};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct RecordOutput<'a, T: Serialize> {
    record: &'a str,
    timestamp: String,
    #[serde(flatten)]
    body: T,
}

fn print_json<T: Serialize>(record: &str, body: T) {
    let out = RecordOutput {
        record,
        timestamp: now_unix_seconds(),
        body,
    };
    println!(
        "{}",
        serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
    );
}

pub fn print_telemetry(frame: &TelemetryFrame, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json("telemetry", frame),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["FIELD", "VALUE"]);
            for (name, value) in telemetry_rows(frame) {
                table.add_row(vec![name.to_string(), value]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "t={:.4}s alt={:.1} ias={:.2} att=({:.3},{:.3},{:.3}) pos=({:.7},{:.7}) mode={} sats={}",
                frame.time_s,
                frame.altitude,
                frame.ias,
                frame.phi,
                frame.theta,
                frame.psi,
                frame.latitude_deg,
                frame.longitude_deg,
                frame.flight_mode,
                frame.gps_satellites
            );
        }
    }
}

pub fn print_message(text: &str, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct Body<'a> {
                text: &'a str,
            }
            print_json("message", Body { text });
        }
        OutputFormat::Table | OutputFormat::Pretty => {
            println!("message: {text}");
        }
    }
}

pub fn print_rejected(reason: &RejectReason, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct Body<'a> {
                reason: &'a RejectReason,
            }
            print_json("rejected", Body { reason });
        }
        OutputFormat::Table | OutputFormat::Pretty => {
            println!("rejected: {}", reason.as_str());
        }
    }
}

/// Link-state change without a payload (lost, restored, disconnected).
pub fn print_link_state(state: &str, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct Body {}
            print_json(state, Body {});
        }
        OutputFormat::Table | OutputFormat::Pretty => {
            println!("link: {state}");
        }
    }
}

fn telemetry_rows(frame: &TelemetryFrame) -> Vec<(&'static str, String)> {
    vec![
        ("time [s]", format!("{:.4}", frame.time_s)),
        ("altitude", format!("{:.2}", frame.altitude)),
        ("ias", format!("{:.3}", frame.ias)),
        ("alt ref", format!("{:.3}", frame.alt_ref)),
        ("ias ref", format!("{:.3}", frame.ias_ref)),
        ("p, q, r", format!("{:.4}, {:.4}, {:.4}", frame.p, frame.q, frame.r)),
        ("phi", format!("{:.4}", frame.phi)),
        ("theta", format!("{:.4}", frame.theta)),
        ("psi", format!("{:.4}", frame.psi)),
        (
            "surfaces (ail/ele/rud)",
            format!("{:.4} / {:.4} / {:.4}", frame.aileron, frame.elevator, frame.rudder),
        ),
        ("throttle", format!("{:.5}", frame.throttle)),
        ("cpu load", frame.cpu_load.to_string()),
        ("latitude [deg]", format!("{:.7}", frame.latitude_deg)),
        ("longitude [deg]", format!("{:.7}", frame.longitude_deg)),
        ("flight mode", frame.flight_mode.to_string()),
        ("gps satellites", frame.gps_satellites.to_string()),
        ("accel", format!("{:?}", frame.accel)),
        ("scopes", format!("{:?}", frame.scopes)),
        ("params", format!("{:?}", frame.params)),
    ]
}

fn now_unix_seconds() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "0".to_string())
}
