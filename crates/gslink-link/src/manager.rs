//! Link manager: one active transport, one reader thread, one watchdog.
//!
//! The reader thread owns the synchronizer outright and hands completed
//! buffers to the codec by value, so the per-byte hot path takes no locks.
//! Reconnection fully stops the old reader before a new one starts; two
//! readers never race on synchronizer state.

use std::io::{ErrorKind, Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::JoinHandle;

use gslink_frame::{
    datagram::scan_datagram, decode, decode_text, Candidate, Command, CommandEncoder, Decoded,
    StreamSynchronizer,
};
use gslink_transport::{DatagramRecv, Transport, TransportRx, TransportTx};

use crate::config::LinkConfig;
use crate::error::{LinkError, Result};
use crate::event::LinkEvent;
use crate::watchdog::{LinkWatchdog, WatchdogControl};

struct ActiveLink {
    stop: Arc<AtomicBool>,
    reader: JoinHandle<()>,
    tx: TransportTx,
}

/// Owns one active link: transport halves, reader thread, watchdog, and the
/// outbound command encoder.
pub struct LinkManager {
    config: LinkConfig,
    encoder: Arc<CommandEncoder>,
    events: Sender<LinkEvent>,
    watchdog: LinkWatchdog,
    active: Option<ActiveLink>,
}

impl LinkManager {
    /// Create a manager delivering [`LinkEvent`]s on `events`. No transport
    /// is active until [`connect`](Self::connect); the watchdog starts
    /// disarmed.
    pub fn new(config: LinkConfig, events: Sender<LinkEvent>) -> Self {
        let watchdog = LinkWatchdog::spawn(
            config.watchdog_timeout,
            config.watchdog_interval,
            events.clone(),
        );
        let encoder = Arc::new(CommandEncoder::new(config.key.clone()));
        Self {
            config,
            encoder,
            events,
            watchdog,
            active: None,
        }
    }

    /// Attach a transport and start its reader thread.
    ///
    /// Any previously active reader is stopped and joined first.
    pub fn connect(&mut self, transport: Transport) -> Result<()> {
        self.disconnect()?;

        tracing::info!(kind = transport.kind(), "link connecting");
        let stop = Arc::new(AtomicBool::new(false));
        let control = self.watchdog.control();
        control.arm();

        let reader = {
            let stop = Arc::clone(&stop);
            let events = self.events.clone();
            let control = control.clone();
            match transport.rx {
                TransportRx::Stream(stream) => {
                    let chunk_size = self.config.read_chunk_size;
                    std::thread::spawn(move || {
                        stream_reader(stream, chunk_size, &stop, &events, &control)
                    })
                }
                TransportRx::Datagram(socket) => {
                    let buf_size = self.config.datagram_buffer_size;
                    std::thread::spawn(move || {
                        datagram_reader(socket, buf_size, &stop, &events, &control)
                    })
                }
            }
        };

        self.active = Some(ActiveLink {
            stop,
            reader,
            tx: transport.tx,
        });
        Ok(())
    }

    /// Tear down the active transport and attach a new one.
    pub fn reconnect(&mut self, transport: Transport) -> Result<()> {
        self.connect(transport)
    }

    /// Stop and join the reader thread, if any, and disarm the watchdog.
    pub fn disconnect(&mut self) -> Result<()> {
        let Some(link) = self.active.take() else {
            return Ok(());
        };
        tracing::info!("link disconnecting");
        link.stop.store(true, Ordering::SeqCst);
        self.watchdog.control().disarm();
        link.reader.join().map_err(|_| LinkError::ReaderPanicked)?;
        Ok(())
    }

    /// Sign and transmit one command frame.
    pub fn send(&mut self, command: &Command) -> Result<()> {
        let link = self.active.as_mut().ok_or(LinkError::NotConnected)?;
        let frame = self.encoder.encode(command);
        match &mut link.tx {
            TransportTx::Stream(writer) => {
                writer.write_all(&frame)?;
                writer.flush()?;
            }
            TransportTx::Datagram(socket) => socket.send(&frame)?,
        }
        tracing::debug!(len = frame.len(), "command frame sent");
        Ok(())
    }

    pub fn is_connected(&self) -> bool {
        self.active.is_some()
    }

    /// The encoder carrying this link's outbound counter.
    pub fn encoder(&self) -> &Arc<CommandEncoder> {
        &self.encoder
    }
}

impl Drop for LinkManager {
    fn drop(&mut self) {
        let _ = self.disconnect();
    }
}

fn stream_reader(
    mut stream: Box<dyn Read + Send>,
    chunk_size: usize,
    stop: &AtomicBool,
    events: &Sender<LinkEvent>,
    watchdog: &WatchdogControl,
) {
    let mut sync = StreamSynchronizer::new();
    let mut chunk = vec![0u8; chunk_size.max(1)];

    while !stop.load(Ordering::SeqCst) {
        let read = match stream.read(&mut chunk) {
            Ok(0) => {
                tracing::info!("stream transport reached EOF");
                watchdog.disarm();
                let _ = events.send(LinkEvent::Disconnected);
                return;
            }
            Ok(n) => n,
            // Receive timeout: no data this cycle.
            Err(err)
                if matches!(
                    err.kind(),
                    ErrorKind::TimedOut | ErrorKind::WouldBlock | ErrorKind::Interrupted
                ) =>
            {
                continue
            }
            Err(err) => {
                tracing::warn!(error = %err, "stream transport failed");
                watchdog.disarm();
                let _ = events.send(LinkEvent::Disconnected);
                return;
            }
        };

        // Raw receipt counts as carrier liveness.
        watchdog.reset();
        for &byte in &chunk[..read] {
            if let Some(candidate) = sync.push(byte) {
                if dispatch(candidate, events, watchdog).is_err() {
                    return;
                }
            }
        }
    }
}

fn datagram_reader(
    mut socket: Box<dyn DatagramRecv>,
    buf_size: usize,
    stop: &AtomicBool,
    events: &Sender<LinkEvent>,
    watchdog: &WatchdogControl,
) {
    let mut buf = vec![0u8; buf_size.max(1)];

    while !stop.load(Ordering::SeqCst) {
        match socket.recv(&mut buf) {
            Ok(Some(n)) => {
                watchdog.reset();
                let Some(window) = scan_datagram(&buf[..n]) else {
                    continue;
                };
                let event = classify(decode(window), watchdog);
                if events.send(event).is_err() {
                    return;
                }
            }
            Ok(None) => continue,
            Err(err) => {
                tracing::warn!(error = %err, "datagram transport failed");
                watchdog.disarm();
                let _ = events.send(LinkEvent::Disconnected);
                return;
            }
        }
    }
}

/// Decode one candidate and forward the outcome. Errors only when the
/// consumer hung up.
fn dispatch(
    candidate: Candidate,
    events: &Sender<LinkEvent>,
    watchdog: &WatchdogControl,
) -> std::result::Result<(), ()> {
    let event = match candidate {
        Candidate::Telemetry(frame) => classify(decode(&frame), watchdog),
        Candidate::Message(payload) => {
            watchdog.reset();
            LinkEvent::Message(decode_text(&payload))
        }
    };
    events.send(event).map_err(|_| ())
}

fn classify(decoded: Decoded, watchdog: &WatchdogControl) -> LinkEvent {
    match decoded {
        Decoded::Telemetry(record) => {
            watchdog.reset();
            LinkEvent::Telemetry(record)
        }
        Decoded::Message(text) => {
            watchdog.reset();
            LinkEvent::Message(text)
        }
        // Invalid frames never count as link activity.
        Decoded::Rejected(reason) => LinkEvent::Rejected(reason),
    }
}
