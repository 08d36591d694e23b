//! Bit-banged host-to-device transmit.
//!
//! Open-drain-emulates both lines with [`Flex`] and busy-waits on clock
//! edges with a bounded timeout rather than ever yielding mid-byte: a
//! suspended executor could let the device time out the transfer.

use embassy_rp::gpio::{Flex, Pull};
use embassy_rp::pio::Instance as PioInstance;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{with_timeout, Duration, Instant, Timer};

use crate::config::{HOST_ACK_TIMEOUT_MS, HOST_BIT_TIMEOUT_US, HOST_INHIBIT_US, HOST_INTERBYTE_DELAY_MS, LINE_SETTLE_US};
use crate::embedded::pio_sampler::PioSampler;
use crate::error::SendError;

/// Drives the raw physical byte transmit. Does not know about logical
/// ACKs; [`CommandSender`] layers that on top.
pub struct LineSender<'d> {
    clk: Flex<'d>,
    data: Flex<'d>,
}

impl<'d> LineSender<'d> {
    pub fn new(mut clk: Flex<'d>, mut data: Flex<'d>) -> Self {
        release(&mut clk);
        release(&mut data);
        Self { clk, data }
    }

    /// Transmits one byte using the standard PS/2 request-to-send
    /// sequence. Returns the device's physical ACK bit (`true` = 0,
    /// i.e. acknowledged).
    ///
    /// `sampler` is disabled before the pins are touched and re-enabled
    /// once they're released, on every path including a bit-timeout
    /// failure: the PIO and this bit-banged transmit can never drive
    /// the lines at the same time.
    pub async fn send_byte<PIO: PioInstance, const SM: usize>(
        &mut self,
        sampler: &mut PioSampler<'_, PIO, SM>,
        byte: u8,
    ) -> Result<bool, SendError> {
        sampler.stop();

        let parity = byte.count_ones() % 2 == 0;

        drive_low(&mut self.clk);
        Timer::after(Duration::from_micros(HOST_INHIBIT_US as u64)).await;
        drive_low(&mut self.data);
        release(&mut self.clk);

        let ack = self.clock_out(byte, parity);

        release(&mut self.clk);
        release(&mut self.data);
        Timer::after(Duration::from_micros(LINE_SETTLE_US as u64)).await;

        // Hand the lines straight back to the PIO sampler without
        // waiting for DATA to go idle: the device may already be
        // clocking out its reply (e.g. the 0xFA for this command).
        sampler.restart();

        ack
    }

    /// The byte-plus-parity-plus-stop-plus-ack clockout. Entirely
    /// synchronous: every wait is a bounded busy loop, never an
    /// executor suspension point, so the device can't desynchronize
    /// the bit timing mid-byte.
    fn clock_out(&mut self, byte: u8, parity: bool) -> Result<bool, SendError> {
        for i in 0..8 {
            self.wait_clk(false)?;
            set_bit(&mut self.data, (byte >> i) & 1 != 0);
            self.wait_clk(true)?;
        }

        self.wait_clk(false)?;
        set_bit(&mut self.data, parity);
        self.wait_clk(true)?;

        self.wait_clk(false)?;
        release(&mut self.data);
        self.wait_clk(true)?;

        self.wait_clk(false)?;
        let ack = self.data.is_low();
        self.wait_clk(true)?;

        Ok(ack)
    }

    fn wait_clk(&self, high: bool) -> Result<(), SendError> {
        let deadline = Instant::now() + Duration::from_micros(HOST_BIT_TIMEOUT_US as u64);
        while self.clk.is_high() != high {
            if Instant::now() > deadline {
                return Err(SendError::Timeout);
            }
        }
        Ok(())
    }
}

fn drive_low(pin: &mut Flex) {
    pin.set_low();
    pin.set_as_output();
}

fn release(pin: &mut Flex) {
    pin.set_as_input();
    pin.set_pull(Pull::Up);
}

fn set_bit(pin: &mut Flex, high: bool) {
    if high {
        release(pin);
    } else {
        drive_low(pin);
    }
}

/// Layers the logical-ACK (`0xFA` via the scancode stream) protocol on
/// top of [`LineSender`]'s physical transmit: a command is only
/// considered acknowledged once both the physical ACK bit and the
/// logical `0xFA` byte have arrived.
pub struct CommandSender<'d> {
    line: LineSender<'d>,
}

impl<'d> CommandSender<'d> {
    pub fn new(line: LineSender<'d>) -> Self {
        Self { line }
    }

    /// Sends a command byte and optional argument byte, each requiring
    /// a physical ACK followed by a logical `0xFA` observed by the read
    /// loop and signaled through `ack`. `sampler` must be the same one
    /// feeding that read loop, since each byte disables and re-enables
    /// it around the transmit.
    pub async fn send_cmd<PIO: PioInstance, const SM: usize>(
        &mut self,
        sampler: &mut PioSampler<'_, PIO, SM>,
        ack: &Signal<CriticalSectionRawMutex, ()>,
        cmd: u8,
        arg: Option<u8>,
    ) -> Result<(), SendError> {
        self.send_acked(sampler, ack, cmd).await?;
        if let Some(arg) = arg {
            Timer::after(Duration::from_millis(HOST_INTERBYTE_DELAY_MS)).await;
            self.send_acked(sampler, ack, arg).await?;
        }
        Ok(())
    }

    async fn send_acked<PIO: PioInstance, const SM: usize>(
        &mut self,
        sampler: &mut PioSampler<'_, PIO, SM>,
        ack: &Signal<CriticalSectionRawMutex, ()>,
        byte: u8,
    ) -> Result<(), SendError> {
        ack.reset();
        if !self.line.send_byte(sampler, byte).await? {
            return Err(SendError::PhysicalNack);
        }
        with_timeout(Duration::from_millis(HOST_ACK_TIMEOUT_MS), ack.wait())
            .await
            .map_err(|_| SendError::AckTimeout)
    }

    /// Echo (`0xEE`) and Resend (`0xFE`) reply with a single byte on
    /// the scancode stream rather than `0xFA`; this just does the
    /// physical transmit and leaves logical-reply matching to the
    /// caller.
    pub async fn send_raw<PIO: PioInstance, const SM: usize>(
        &mut self,
        sampler: &mut PioSampler<'_, PIO, SM>,
        byte: u8,
    ) -> Result<bool, SendError> {
        self.line.send_byte(sampler, byte).await
    }
}
