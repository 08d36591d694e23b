//! Shared status state observed by both the read loop and the LED
//! task.
//!
//! A single global cell mutated from the PS/2 read loop and the USB
//! write path, and polled by the LED render task; `Status`/timestamps
//! live in atomics rather than behind a lock since ordinary `&mut`
//! sharing across tasks isn't available here.

use core::sync::atomic::{AtomicU32, AtomicU8, Ordering};
use embassy_time::Instant;

use crate::Status;

fn encode(status: Status) -> u8 {
    match status {
        Status::Init => 0,
        Status::Ready => 1,
        Status::UsbErr => 2,
        Status::Ps2Err => 3,
    }
}

fn decode(code: u8) -> Status {
    match code {
        0 => Status::Init,
        1 => Status::Ready,
        2 => Status::UsbErr,
        _ => Status::Ps2Err,
    }
}

/// Global status cell. One instance, shared by `'static` reference.
pub struct StatusCell {
    code: AtomicU8,
    last_set_ms: AtomicU32,
    last_activity_ms: AtomicU32,
}

impl StatusCell {
    pub const fn new() -> Self {
        Self {
            code: AtomicU8::new(0),
            last_set_ms: AtomicU32::new(0),
            last_activity_ms: AtomicU32::new(0),
        }
    }

    pub fn set(&self, status: Status) {
        self.code.store(encode(status), Ordering::Relaxed);
        self.last_set_ms.store(now_ms(), Ordering::Relaxed);
    }

    pub fn trigger_activity(&self) {
        self.last_activity_ms.store(now_ms(), Ordering::Relaxed);
    }

    /// Enters `PS2_ERR` and records the time, so it can later
    /// auto-clear via [`crate::status::tick`].
    pub fn trigger_ps2_error(&self) {
        self.set(Status::Ps2Err);
    }

    /// Current status, applying the `PS2_ERR` auto-clear rule.
    pub fn get(&self) -> Status {
        let current = decode(self.code.load(Ordering::Relaxed));
        let elapsed = now_ms().wrapping_sub(self.last_set_ms.load(Ordering::Relaxed)) as u64;
        let next = crate::status::tick(current, elapsed);
        if next != current {
            self.code.store(encode(next), Ordering::Relaxed);
        }
        next
    }

    /// Milliseconds since the last key activity, for the `READY`
    /// bright/dim flash.
    pub fn ms_since_activity(&self) -> u64 {
        now_ms().wrapping_sub(self.last_activity_ms.load(Ordering::Relaxed)) as u64
    }
}

impl Default for StatusCell {
    fn default() -> Self {
        Self::new()
    }
}

fn now_ms() -> u32 {
    Instant::now().as_millis() as u32
}
