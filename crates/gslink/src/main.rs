mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "gslink", version, about = "Ground-station datalink CLI")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(
        long,
        value_name = "LEVEL",
        default_value = "info",
        env = "GSLINK_LOG",
        global = true
    )]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_encode_subcommand() {
        let cli = Cli::try_parse_from([
            "gslink", "encode", "--key", "secret", "param", "--id", "3", "--value", "1.5",
        ])
        .expect("encode args should parse");
        assert!(matches!(cli.command, Command::Encode(_)));
    }

    #[test]
    fn parses_send_waypoint_subcommand() {
        let cli = Cli::try_parse_from([
            "gslink",
            "send",
            "10.0.0.2:14550",
            "--key",
            "secret",
            "waypoint",
            "--id",
            "1",
            "--lat",
            "47.5",
            "--lon",
            "-122.25",
            "--alt",
            "120",
        ])
        .expect("send args should parse");
        assert!(matches!(cli.command, Command::Send(_)));
    }

    #[test]
    fn parses_listen_with_count() {
        let cli = Cli::try_parse_from(["gslink", "listen", "0.0.0.0:14550", "--count", "5"])
            .expect("listen args should parse");
        let Command::Listen(args) = cli.command else {
            panic!("expected listen subcommand");
        };
        assert_eq!(args.count, Some(5));
    }

    #[test]
    fn encode_requires_a_command_kind() {
        let err = Cli::try_parse_from(["gslink", "encode", "--key", "secret"])
            .expect_err("missing command kind should fail");
        assert_eq!(
            err.kind(),
            clap::error::ErrorKind::MissingSubcommand
        );
    }
}
