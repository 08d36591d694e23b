//! Read-loop liveness supervision via the hardware watchdog.
//!
//! The read loop bumps a heartbeat counter every iteration, and this
//! task only feeds the watchdog while that counter keeps advancing. A
//! stalled or crashed read loop lets the watchdog expire and reset the
//! board rather than leave the device quietly unresponsive.

use core::sync::atomic::{AtomicU32, Ordering};
use embassy_rp::watchdog::Watchdog;
use embassy_time::{Duration, Timer};

use crate::config::{SUPERVISOR_INTERVAL_MS, SUPERVISOR_WATCHDOG_MS};

/// Bumped once per read-loop iteration. `Relaxed` is enough: this is a
/// liveness heartbeat, not a data handoff, so only forward progress
/// matters, not ordering with any other memory access.
pub static HEARTBEAT: AtomicU32 = AtomicU32::new(0);

pub fn pulse() {
    HEARTBEAT.fetch_add(1, Ordering::Relaxed);
}

#[embassy_executor::task]
pub async fn supervisor_task(mut watchdog: Watchdog) {
    watchdog.start(Duration::from_millis(SUPERVISOR_WATCHDOG_MS));
    let mut last_seen = HEARTBEAT.load(Ordering::Relaxed);

    loop {
        Timer::after(Duration::from_millis(SUPERVISOR_INTERVAL_MS)).await;
        let now = HEARTBEAT.load(Ordering::Relaxed);
        if now != last_seen {
            watchdog.feed();
            last_seen = now;
        }
        // else: no progress since the last check; let the watchdog
        // expire rather than feeding it blind.
    }
}
