//! Link management for a ground-station datalink.
//!
//! This is the layer that owns threads and clocks. A [`LinkManager`] wires
//! one transport's receive half through the frame synchronizer and codec,
//! delivers validated records and link-state changes as [`LinkEvent`]s on a
//! channel, and signs outbound commands through the send half. A
//! [`LinkWatchdog`] declares the link lost or restored from decode/receive
//! activity.

pub mod config;
pub mod error;
pub mod event;
pub mod manager;
pub mod watchdog;

pub use config::LinkConfig;
pub use error::{LinkError, Result};
pub use event::LinkEvent;
pub use manager::LinkManager;
pub use watchdog::{LinkWatchdog, WatchdogControl};
