use gslink_frame::{RejectReason, TelemetryFrame};

/// Everything the link layer reports to its consumer.
///
/// Delivered in arrival order on the consumer's channel; decoded records are
/// moved, never shared.
#[derive(Debug, Clone, PartialEq)]
pub enum LinkEvent {
    /// A checksum-validated telemetry frame.
    Telemetry(TelemetryFrame),
    /// A free-text message from the vehicle.
    Message(String),
    /// A candidate buffer that failed validation; dropped, not retried.
    Rejected(RejectReason),
    /// Watchdog: no decode/receive activity within the timeout.
    LinkLost,
    /// Watchdog: activity resumed after a loss.
    LinkRestored,
    /// The transport reached EOF or failed; the reader thread has exited.
    Disconnected,
}

impl LinkEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkEvent::Telemetry(_) => "telemetry",
            LinkEvent::Message(_) => "message",
            LinkEvent::Rejected(_) => "rejected",
            LinkEvent::LinkLost => "link_lost",
            LinkEvent::LinkRestored => "link_restored",
            LinkEvent::Disconnected => "disconnected",
        }
    }
}
