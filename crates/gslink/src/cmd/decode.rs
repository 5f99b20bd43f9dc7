use std::fs;

use gslink_frame::{decode, decode_text, Candidate, Decoded, StreamSynchronizer};

use crate::cmd::DecodeArgs;
use crate::exit::{io_error, CliResult, SUCCESS};
use crate::output::{print_message, print_rejected, print_telemetry, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let bytes = fs::read(&args.file)
        .map_err(|err| io_error(&format!("failed reading {}", args.file.display()), err))?;

    let mut sync = StreamSynchronizer::new();
    let mut printed = 0usize;

    for candidate in sync.feed(&bytes) {
        match candidate {
            Candidate::Telemetry(buf) => match decode(&buf) {
                Decoded::Telemetry(frame) => print_telemetry(&frame, format),
                Decoded::Message(text) => print_message(&text, format),
                Decoded::Rejected(reason) => print_rejected(&reason, format),
            },
            Candidate::Message(payload) => print_message(&decode_text(&payload), format),
        }
        printed += 1;
        if args.count.is_some_and(|count| printed >= count) {
            break;
        }
    }

    tracing::debug!(records = printed, bytes = bytes.len(), "capture decoded");
    Ok(SUCCESS)
}
