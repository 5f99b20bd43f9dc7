use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Subcommand};
use gslink_frame::Command as LinkCommand;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod decode;
pub mod encode;
pub mod fields;
pub mod listen;
pub mod send;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the telemetry wire layout.
    Fields(FieldsArgs),
    /// Decode a capture file and print its records.
    Decode(DecodeArgs),
    /// Build one signed command frame and print it.
    Encode(EncodeArgs),
    /// Sign and transmit one command over UDP.
    Send(SendArgs),
    /// Receive over UDP and print link events.
    Listen(ListenArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Fields(args) => fields::run(args, format),
        Command::Decode(args) => decode::run(args, format),
        Command::Encode(args) => encode::run(args, format),
        Command::Send(args) => send::run(args, format),
        Command::Listen(args) => listen::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

/// One uplink command, shared by `encode` and `send`.
#[derive(Subcommand, Debug)]
pub enum CommandSpec {
    /// Set one tunable parameter on the vehicle.
    Param {
        /// Parameter slot.
        #[arg(long)]
        id: u8,
        /// New value.
        #[arg(long)]
        value: f32,
    },
    /// Replace one waypoint in the vehicle's plan.
    Waypoint {
        /// Waypoint slot.
        #[arg(long)]
        id: u8,
        /// Latitude in degrees.
        #[arg(long)]
        lat: f64,
        /// Longitude in degrees.
        #[arg(long)]
        lon: f64,
        /// Altitude in engineering units.
        #[arg(long)]
        alt: f32,
    },
}

impl CommandSpec {
    pub fn to_command(&self) -> LinkCommand {
        match *self {
            CommandSpec::Param { id, value } => LinkCommand::ParameterSet { id, value },
            CommandSpec::Waypoint { id, lat, lon, alt } => LinkCommand::WaypointUpdate {
                id,
                longitude_deg: lon,
                latitude_deg: lat,
                altitude: alt,
            },
        }
    }
}

#[derive(Args, Debug, Default)]
pub struct FieldsArgs {}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Capture file holding raw link bytes.
    pub file: PathBuf,
    /// Stop after printing N records.
    #[arg(long)]
    pub count: Option<usize>,
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Shared link secret.
    #[arg(long, env = "GSLINK_KEY", hide_env_values = true)]
    pub key: String,
    /// Counter value for the frame.
    #[arg(long, default_value_t = 0)]
    pub counter: u16,
    /// Write raw frame bytes to stdout instead of hex.
    #[arg(long)]
    pub raw: bool,
    #[command(subcommand)]
    pub spec: CommandSpec,
}

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Vehicle address (host:port).
    pub addr: SocketAddr,
    /// Shared link secret.
    #[arg(long, env = "GSLINK_KEY", hide_env_values = true)]
    pub key: String,
    /// Local address to bind.
    #[arg(long, default_value = "0.0.0.0:0")]
    pub bind: SocketAddr,
    #[command(subcommand)]
    pub spec: CommandSpec,
}

#[derive(Args, Debug)]
pub struct ListenArgs {
    /// Local address to bind (host:port).
    pub bind: SocketAddr,
    /// Shared link secret, required only if commands will be sent.
    #[arg(long, env = "GSLINK_KEY", hide_env_values = true, default_value = "")]
    pub key: String,
    /// Exit after printing N decoded records.
    #[arg(long)]
    pub count: Option<usize>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
