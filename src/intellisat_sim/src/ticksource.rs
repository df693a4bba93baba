//! The periodic timer abstraction (spec.md §2, §6, "TickSource").
//!
//! On a hosted platform, implementers use "a periodic interval timer +
//! signal"; this plays out here as a dedicated OS thread that stands in for
//! the hardware timer interrupt, grounded directly on `r3_port_std`'s timer
//! thread (a `std::thread` blocked on `mpsc::Receiver::recv_timeout`, woken
//! either by a real timeout — fire a tick — or by a shutdown message).

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use intellisat_kernel::Executive;

/// The hosted stand-in for the hardware timer interrupt.
///
/// Each period, it invokes [`Executive::tick`], which runs the arbiter and
/// raises the preemption signal if a higher-priority mode has become ready
/// (spec.md §4.4).
pub struct TickSource {
    shutdown: mpsc::Sender<()>,
    handle: Option<JoinHandle<()>>,
    ticks_elapsed: Arc<AtomicU32>,
}

impl TickSource {
    /// Starts the timer thread, ticking every `period`.
    pub fn start(exec: Arc<Executive>, period: Duration) -> Self {
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();
        let ticks_elapsed = Arc::new(AtomicU32::new(0));
        let ticks_elapsed_thread = Arc::clone(&ticks_elapsed);

        log::debug!("tick source: starting, period = {period:?}");
        let handle = std::thread::spawn(move || loop {
            match shutdown_rx.recv_timeout(period) {
                Ok(()) => {
                    log::trace!("tick source: shutdown requested");
                    break;
                }
                Err(mpsc::RecvTimeoutError::Disconnected) => {
                    log::trace!("tick source: sender dropped, exiting");
                    break;
                }
                Err(mpsc::RecvTimeoutError::Timeout) => {
                    ticks_elapsed_thread.fetch_add(1, Ordering::SeqCst);
                    crate::modes::advance_environment();
                    exec.tick();
                }
            }
        });

        Self {
            shutdown: shutdown_tx,
            handle: Some(handle),
            ticks_elapsed,
        }
    }

    /// A shared counter of ticks delivered so far, for the test harness's
    /// "terminate after N ticks" mode (spec.md §6).
    pub fn ticks_elapsed(&self) -> Arc<AtomicU32> {
        Arc::clone(&self.ticks_elapsed)
    }

    /// Stops the timer thread and waits for it to exit.
    pub fn stop(mut self) {
        self.stop_inner();
    }

    fn stop_inner(&mut self) {
        let _ = self.shutdown.send(());
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for TickSource {
    fn drop(&mut self) {
        self.stop_inner();
    }
}

/// A [`intellisat_kernel::StopCondition`] that tells the superloop to return
/// once a fixed number of ticks have been delivered. Test-harness-only
/// (spec.md §6's CLI surface is explicitly out of the flight-core scope);
/// production flight code uses [`intellisat_kernel::NeverStop`] instead.
pub struct TickCountStop {
    ticks_elapsed: Arc<AtomicU32>,
    limit: u32,
}

impl TickCountStop {
    pub fn new(ticks_elapsed: Arc<AtomicU32>, limit: u32) -> Self {
        Self {
            ticks_elapsed,
            limit,
        }
    }
}

impl intellisat_kernel::StopCondition for TickCountStop {
    fn should_stop(&mut self) -> bool {
        self.ticks_elapsed.load(Ordering::SeqCst) >= self.limit
    }
}
