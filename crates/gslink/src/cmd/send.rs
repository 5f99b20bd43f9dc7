use std::net::UdpSocket;
use std::sync::mpsc::channel;
use std::time::Duration;

use gslink_link::{LinkConfig, LinkManager};
use gslink_transport::udp_transport;

use crate::cmd::SendArgs;
use crate::exit::{io_error, link_error, transport_error, CliResult, SUCCESS};
use crate::output::OutputFormat;

pub fn run(args: SendArgs, _format: OutputFormat) -> CliResult<i32> {
    let socket = UdpSocket::bind(args.bind)
        .map_err(|err| io_error(&format!("failed binding {}", args.bind), err))?;
    let transport = udp_transport(socket, args.addr, Duration::from_millis(200))
        .map_err(|err| transport_error("transport setup failed", err))?;

    let (events, _rx) = channel();
    let mut manager = LinkManager::new(LinkConfig::with_key(args.key.as_bytes()), events);
    manager
        .connect(transport)
        .map_err(|err| link_error("connect failed", err))?;
    manager
        .send(&args.spec.to_command())
        .map_err(|err| link_error("send failed", err))?;
    manager
        .disconnect()
        .map_err(|err| link_error("disconnect failed", err))?;

    Ok(SUCCESS)
}
