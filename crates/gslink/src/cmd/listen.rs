use std::net::UdpSocket;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, RecvTimeoutError};
use std::sync::Arc;
use std::time::Duration;

use gslink_link::{LinkConfig, LinkEvent, LinkManager};
use gslink_transport::udp_transport;

use crate::cmd::ListenArgs;
use crate::exit::{io_error, link_error, transport_error, CliError, CliResult, SUCCESS};
use crate::output::{print_link_state, print_message, print_rejected, print_telemetry, OutputFormat};

pub fn run(args: ListenArgs, format: OutputFormat) -> CliResult<i32> {
    let socket = UdpSocket::bind(args.bind)
        .map_err(|err| io_error(&format!("failed binding {}", args.bind), err))?;
    // No uplink peer is known yet; the send half points back at the local
    // socket and stays unused.
    let peer = socket
        .local_addr()
        .map_err(|err| io_error("failed resolving local address", err))?;
    let transport = udp_transport(socket, peer, Duration::from_millis(200))
        .map_err(|err| transport_error("transport setup failed", err))?;

    let (events, rx) = channel();
    let mut manager = LinkManager::new(LinkConfig::with_key(args.key.as_bytes()), events);
    manager
        .connect(transport)
        .map_err(|err| link_error("connect failed", err))?;

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    let mut printed = 0usize;
    while running.load(Ordering::SeqCst) {
        let event = match rx.recv_timeout(Duration::from_millis(200)) {
            Ok(event) => event,
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => break,
        };

        match &event {
            LinkEvent::Telemetry(frame) => {
                print_telemetry(frame, format);
                printed += 1;
            }
            LinkEvent::Message(text) => {
                print_message(text, format);
                printed += 1;
            }
            LinkEvent::Rejected(reason) => print_rejected(reason, format),
            LinkEvent::LinkLost | LinkEvent::LinkRestored => {
                print_link_state(event.as_str(), format);
            }
            LinkEvent::Disconnected => {
                print_link_state(event.as_str(), format);
                break;
            }
        }

        if args.count.is_some_and(|count| printed >= count) {
            break;
        }
    }

    manager
        .disconnect()
        .map_err(|err| link_error("disconnect failed", err))?;
    Ok(SUCCESS)
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| {
        CliError::new(
            crate::exit::INTERNAL,
            format!("signal handler setup failed: {err}"),
        )
    })
}
