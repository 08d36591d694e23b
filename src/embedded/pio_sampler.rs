//! PIO line sampler for the PS/2 clock/data pair.
//!
//! The device drives CLK, so the PIO program only has to wait for
//! edges and sample; the host never needs to generate a clock while
//! reading.

use embassy_rp::gpio::AnyPin;
use embassy_rp::pio::{Common, Config, Direction, LoadedProgram, ShiftConfig, ShiftDirection, StateMachine};

/// Samples CLK (bit 1 of each 2-bit read) and DATA (bit 0) on every
/// falling-then-rising CLK edge and reassembles them into a 22-bit raw
/// frame, pushed to the RX FIFO once per 11-bit PS/2 frame.
///
/// Owns the pins as [`AnyPin`] rather than a generic `impl PioPin` so
/// [`Self::restart`] can re-mux them into the PIO block after
/// [`crate::embedded::sender`] has borrowed them as a plain [`embassy_rp::gpio::Flex`]
/// pair: creating a `Flex` reassigns a pin's function select away from
/// PIO, and re-enabling the state machine alone does not undo that.
pub struct PioSampler<'d, PIO: embassy_rp::pio::Instance, const SM: usize> {
    common: Common<'d, PIO>,
    sm: StateMachine<'d, PIO, SM>,
    program: LoadedProgram<'d, PIO>,
    clk: AnyPin,
    data: AnyPin,
}

impl<'d, PIO: embassy_rp::pio::Instance, const SM: usize> PioSampler<'d, PIO, SM> {
    /// `clk` must be the GPIO immediately below `data` in number,
    /// since both are mapped as a single 2-bit `in_base` group.
    pub fn new(mut common: Common<'d, PIO>, sm: StateMachine<'d, PIO, SM>, clk: AnyPin, data: AnyPin) -> Self {
        let prg = pio_proc::pio_asm!(
            ".wrap_target",
            "wait 1 pin 0",
            "wait 0 pin 0",
            "in pins, 2",
            "set x, 9",
            "bitloop:",
            "wait 1 pin 0",
            "wait 0 pin 0",
            "in pins, 2",
            "jmp x--, bitloop",
            ".wrap",
        );
        let program = common.load_program(&prg.program);

        let mut this = Self {
            common,
            sm,
            program,
            clk,
            data,
        };
        this.mux_and_enable();
        this
    }

    /// Re-muxes CLK/DATA into the PIO block, reloads the sampler
    /// config and enables the state machine. Safe to call repeatedly:
    /// it reuses the already-loaded program rather than loading a new
    /// copy each time.
    fn mux_and_enable(&mut self) {
        // Both lines are pulled up externally by the PS/2 device; the
        // PIO side only ever reads them. `clone_unchecked` is sound
        // here because the sender never holds its own `Flex` handle on
        // these pins at the same time this runs (see `stop`/`restart`).
        let clk_pin = self.common.make_pio_pin(unsafe { self.clk.clone_unchecked() });
        let data_pin = self.common.make_pio_pin(unsafe { self.data.clone_unchecked() });

        let mut cfg = Config::default();
        cfg.use_program(&self.program, &[]);
        cfg.set_in_pins(&[&clk_pin, &data_pin]);
        cfg.set_jmp_pin(&clk_pin);
        cfg.shift_in = ShiftConfig {
            threshold: 22,
            direction: ShiftDirection::Left,
            auto_fill: true,
        };
        self.sm.set_pin_dirs(Direction::In, &[&clk_pin, &data_pin]);
        self.sm.set_config(&cfg);
        self.sm.set_enable(true);
    }

    /// Awaits the next 22-bit raw frame. Cancellation-safe: dropping
    /// the future leaves no partially-consumed FIFO word behind.
    pub async fn next_frame(&mut self) -> u32 {
        self.sm.rx().wait_pull().await
    }

    /// Non-blocking drain, used by the read loop between awaits.
    pub fn try_next_frame(&mut self) -> Option<u32> {
        self.sm.rx().try_pull()
    }

    /// Halts the state machine and stops driving CLK/DATA so
    /// [`crate::embedded::sender`] can take the pins over as a `Flex`
    /// pair. Must be paired with [`Self::restart`] once the send
    /// completes, on every path including a timeout.
    pub fn stop(&mut self) {
        self.sm.set_enable(false);
    }

    /// Re-muxes CLK/DATA back to the PIO block and resumes sampling,
    /// clearing any frame left over from before the pins were released.
    /// Called as soon as the sender releases the lines, without waiting
    /// for the device to go idle first, since the device may already be
    /// clocking out its reply.
    pub fn restart(&mut self) {
        self.mux_and_enable();
        self.sm.clear_fifos();
    }
}
