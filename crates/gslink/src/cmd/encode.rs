use std::io::Write;

use gslink_frame::CommandEncoder;
use serde::Serialize;

use crate::cmd::EncodeArgs;
use crate::exit::{CliResult, SUCCESS};
use crate::output::OutputFormat;

pub fn run(args: EncodeArgs, format: OutputFormat) -> CliResult<i32> {
    let encoder = CommandEncoder::with_counter(args.key.as_bytes(), args.counter);
    let frame = encoder.encode(&args.spec.to_command());

    if args.raw {
        let mut out = std::io::stdout();
        let _ = out.write_all(&frame);
        let _ = out.flush();
        return Ok(SUCCESS);
    }

    let hex: String = frame.iter().map(|byte| format!("{byte:02x}")).collect();
    match format {
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct FrameOutput {
                len: usize,
                counter: u16,
                frame_hex: String,
            }
            let out = FrameOutput {
                len: frame.len(),
                counter: args.counter,
                frame_hex: hex,
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table | OutputFormat::Pretty => println!("{hex}"),
    }
    Ok(SUCCESS)
}
