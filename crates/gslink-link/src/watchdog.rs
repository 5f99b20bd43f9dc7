//! Link liveness watchdog.
//!
//! Armed while a transport is configured; `reset()` is called on receive
//! and decode activity. A dedicated check thread compares elapsed time
//! against the timeout at a fixed interval and reports each loss and each
//! recovery exactly once. The last-reset timestamp is a single atomic word
//! (milliseconds since the watchdog's epoch), so readers never see a torn
//! value.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crate::event::LinkEvent;

struct WatchdogShared {
    epoch: Instant,
    armed: AtomicBool,
    lost: AtomicBool,
    last_reset_ms: AtomicU64,
}

impl WatchdogShared {
    fn now_ms(&self) -> u64 {
        self.epoch.elapsed().as_millis() as u64
    }
}

/// Cheap cloneable handle for the threads that feed the watchdog.
#[derive(Clone)]
pub struct WatchdogControl {
    shared: Arc<WatchdogShared>,
}

impl WatchdogControl {
    /// Start tracking inactivity from now.
    pub fn arm(&self) {
        self.shared.last_reset_ms.store(self.shared.now_ms(), Ordering::SeqCst);
        self.shared.lost.store(false, Ordering::SeqCst);
        self.shared.armed.store(true, Ordering::SeqCst);
    }

    /// Record activity. No-op while disarmed.
    pub fn reset(&self) {
        if self.shared.armed.load(Ordering::SeqCst) {
            self.shared.last_reset_ms.store(self.shared.now_ms(), Ordering::SeqCst);
        }
    }

    /// Stop tracking and suppress further reports.
    pub fn disarm(&self) {
        self.shared.armed.store(false, Ordering::SeqCst);
    }

    pub fn is_armed(&self) -> bool {
        self.shared.armed.load(Ordering::SeqCst)
    }
}

/// Owns the periodic check thread.
pub struct LinkWatchdog {
    control: WatchdogControl,
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl LinkWatchdog {
    /// Spawn the check thread. The watchdog starts disarmed.
    pub fn spawn(timeout: Duration, interval: Duration, events: Sender<LinkEvent>) -> Self {
        let shared = Arc::new(WatchdogShared {
            epoch: Instant::now(),
            armed: AtomicBool::new(false),
            lost: AtomicBool::new(false),
            last_reset_ms: AtomicU64::new(0),
        });
        let stop = Arc::new(AtomicBool::new(false));

        let thread = {
            let shared = Arc::clone(&shared);
            let stop = Arc::clone(&stop);
            let timeout_ms = timeout.as_millis() as u64;
            std::thread::spawn(move || {
                while !stop.load(Ordering::SeqCst) {
                    std::thread::sleep(interval);
                    if !shared.armed.load(Ordering::SeqCst) {
                        continue;
                    }
                    let elapsed = shared
                        .now_ms()
                        .saturating_sub(shared.last_reset_ms.load(Ordering::SeqCst));
                    if elapsed > timeout_ms {
                        if !shared.lost.swap(true, Ordering::SeqCst) {
                            tracing::warn!(elapsed_ms = elapsed, "link lost");
                            if events.send(LinkEvent::LinkLost).is_err() {
                                break;
                            }
                        }
                    } else if shared.lost.swap(false, Ordering::SeqCst) {
                        tracing::info!("link restored");
                        if events.send(LinkEvent::LinkRestored).is_err() {
                            break;
                        }
                    }
                }
            })
        };

        Self {
            control: WatchdogControl { shared },
            stop,
            thread: Some(thread),
        }
    }

    /// Handle for arm/reset/disarm from reader threads.
    pub fn control(&self) -> WatchdogControl {
        self.control.clone()
    }
}

impl Drop for LinkWatchdog {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}
