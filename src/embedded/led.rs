//! Status NeoPixel driver: a standard WS2812 one-wire bit-bang program
//! run over a PIO state machine, plus the color/timing table for each
//! [`crate::Status`].
//!
//! This module only renders a [`crate::Status`]; deciding which status
//! applies, and the auto-clear timing, is [`crate::status::tick`]'s job
//! so it stays host-testable.

use embassy_rp::clocks::clk_sys_freq;
use embassy_rp::pio::{Common, Config, FifoJoin, PioPin, ShiftConfig, ShiftDirection, StateMachine};
use embassy_time::{Duration, Timer};
use fixed::types::U24F8;

use crate::config::ACTIVITY_FLASH_MS;
use crate::Status;

/// One RGB triple, 0-255 per channel.
#[derive(Clone, Copy, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

const fn rgb(r: u8, g: u8, b: u8) -> Rgb {
    Rgb { r, g, b }
}

const OFF: Rgb = rgb(0, 0, 0);
const INIT_YELLOW: Rgb = rgb(20, 20, 0);
const USB_ERR_RED: Rgb = rgb(50, 0, 0);
const PS2_ERR_RED: Rgb = rgb(50, 0, 0);
const READY_DIM_GREEN: Rgb = rgb(0, 5, 0);
const READY_BRIGHT_GREEN: Rgb = rgb(0, 50, 0);

/// A single WS2812 pushed out over a PIO state machine. One on-board
/// status LED only.
pub struct Ws2812<'d, PIO: embassy_rp::pio::Instance, const SM: usize> {
    sm: StateMachine<'d, PIO, SM>,
}

impl<'d, PIO: embassy_rp::pio::Instance, const SM: usize> Ws2812<'d, PIO, SM> {
    pub fn new(common: &mut Common<'d, PIO>, mut sm: StateMachine<'d, PIO, SM>, pin: impl PioPin) -> Self {
        // T1+T2+T3 = 1.25us bit period (800kHz), split 3-6-3 "tick"s per
        // the standard published WS2812 PIO program.
        const T1: u8 = 2;
        const T2: u8 = 5;
        const T3: u8 = 3;
        const CYCLES_PER_BIT: u32 = (T1 + T2 + T3) as u32;

        let prg = pio_proc::pio_asm!(
            ".side_set 1",
            ".wrap_target",
            "bitloop:",
            "out x, 1       side 0 [1]",
            "jmp !x do_zero side 1 [1]",
            "do_one:",
            "jmp bitloop    side 1 [1]",
            "do_zero:",
            "nop            side 0 [1]",
            ".wrap",
        );

        let out_pin = common.make_pio_pin(pin);
        let mut cfg = Config::default();
        cfg.use_program(&common.load_program(&prg.program), &[&out_pin]);
        cfg.set_out_pins(&[&out_pin]);
        cfg.shift_out = ShiftConfig {
            threshold: 24,
            direction: ShiftDirection::Left,
            auto_fill: true,
        };
        cfg.fifo_join = FifoJoin::TxOnly;

        let bit_freq = 800_000u32;
        let pio_freq = bit_freq * CYCLES_PER_BIT;
        cfg.clock_divider = U24F8::from_num(clk_sys_freq()) / U24F8::from_num(pio_freq);

        sm.set_config(&cfg);
        sm.set_enable(true);

        Self { sm }
    }

    pub async fn write(&mut self, color: Rgb) {
        // WS2812 wire order is G, R, B, packed MSB-first into the
        // 24-bit word the shift-left config above expects.
        let word = ((color.g as u32) << 16) | ((color.r as u32) << 8) | (color.b as u32);
        self.sm.tx().wait_push(word << 8).await;
    }
}

/// Renders one [`Status`] frame: a color plus a delay, per the
/// per-state table below. The caller supplies `ms_since_activity` so
/// the timing stays driven by a single clock source owned by the
/// status task.
pub async fn render<PIO: embassy_rp::pio::Instance, const SM: usize>(
    led: &mut Ws2812<'_, PIO, SM>,
    status: Status,
    ms_since_activity: u64,
) {
    match status {
        Status::Init => {
            led.write(INIT_YELLOW).await;
            Timer::after(Duration::from_millis(200)).await;
            led.write(OFF).await;
            Timer::after(Duration::from_millis(200)).await;
        }
        Status::UsbErr => {
            led.write(USB_ERR_RED).await;
            Timer::after(Duration::from_millis(200)).await;
        }
        Status::Ps2Err => {
            led.write(PS2_ERR_RED).await;
            Timer::after(Duration::from_millis(100)).await;
            led.write(OFF).await;
            Timer::after(Duration::from_millis(100)).await;
        }
        Status::Ready => {
            if ms_since_activity < ACTIVITY_FLASH_MS {
                led.write(READY_BRIGHT_GREEN).await;
            } else {
                led.write(READY_DIM_GREEN).await;
            }
            Timer::after(Duration::from_millis(50)).await;
        }
    }
}
