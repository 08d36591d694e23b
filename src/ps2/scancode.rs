//! Scancode byte stream -> key event state machine.
//!
//! Handles the `E0` extended prefix, `F0` break prefix, the 8-byte
//! Pause/Break `E1 14 77 E1 F0 14 F0 77` sequence, the Print Screen
//! fake-shift, and `0xFA` ACK notification.

/// A decoded logical key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub scancode: u8,
    pub pressed: bool,
    pub extended: bool,
}

impl KeyEvent {
    const fn new(scancode: u8, pressed: bool, extended: bool) -> Self {
        Self {
            scancode,
            pressed,
            extended,
        }
    }
}

/// Reserved scancode byte values with special meaning.
mod reserved {
    pub const EXTENDED: u8 = 0xE0;
    pub const BREAK: u8 = 0xF0;
    pub const PAUSE_PREFIX: u8 = 0xE1;
    pub const ACK: u8 = 0xFA;
}

/// The Pause/Break sequence, bytes following the initial `E1`. State
/// `n` expects the byte at index `n - 1`. The wire sequence carries no
/// separate release code, so the press event fires mid-sequence (state
/// 2, the first `0x77`) and the whole thing is treated as one logical
/// press-then-release: the remaining bytes replay the same shape and
/// the release fires once they're consumed (state 7, the second `0x77`).
const PAUSE_SEQUENCE: [u8; 7] = [0x14, 0x77, 0xE1, 0xF0, 0x14, 0xF0, 0x77];

/// Outcome of feeding one scancode byte to the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// No event; more bytes are needed or the byte was fully consumed
    /// as a prefix/sequence step.
    Pending,
    /// The device acknowledged a host-to-device command byte.
    Ack,
    /// A complete key event was decoded.
    Event(KeyEvent),
    /// A valid terminal byte was decoded but produces no event (the
    /// Print Screen fake-shift).
    Suppressed,
}

/// Parser state: pending prefix flags plus Pause/Break sequence
/// progress. `pause_state` is `0` when no Pause sequence is underway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScancodeFsm {
    extended_pending: bool,
    break_pending: bool,
    pause_state: u8,
}

impl ScancodeFsm {
    pub const fn new() -> Self {
        Self {
            extended_pending: false,
            break_pending: false,
            pause_state: 0,
        }
    }

    /// Feeds one scancode byte and returns what it produced.
    pub fn feed(&mut self, s: u8) -> Outcome {
        if self.pause_state > 0 {
            return self.feed_pause(s);
        }

        match s {
            reserved::ACK => Outcome::Ack,
            reserved::PAUSE_PREFIX => {
                self.pause_state = 1;
                Outcome::Pending
            }
            reserved::EXTENDED => {
                self.extended_pending = true;
                Outcome::Pending
            }
            reserved::BREAK => {
                self.break_pending = true;
                Outcome::Pending
            }
            _ => self.feed_terminal(s),
        }
    }

    fn feed_terminal(&mut self, s: u8) -> Outcome {
        let pressed = !self.break_pending;
        let extended = self.extended_pending;
        self.extended_pending = false;
        self.break_pending = false;

        // Print Screen make/break sends a fake-shift `E0 12`/`E0 F0 12`
        // ahead of the real `E0 7C` code; it carries no key identity.
        if extended && s == 0x12 {
            return Outcome::Suppressed;
        }

        Outcome::Event(KeyEvent::new(s, pressed, extended))
    }

    fn feed_pause(&mut self, s: u8) -> Outcome {
        let expected = PAUSE_SEQUENCE[(self.pause_state - 1) as usize];
        if s != expected {
            // A second E1 mid-sequence restarts at state 1; anything
            // else is a mismatch and drops the sequence entirely.
            self.pause_state = if s == reserved::PAUSE_PREFIX { 1 } else { 0 };
            return Outcome::Pending;
        }

        match self.pause_state {
            1 | 3 | 4 | 5 | 6 => {
                self.pause_state += 1;
                Outcome::Pending
            }
            2 => {
                self.pause_state = 3;
                Outcome::Event(KeyEvent::new(0x77, true, true))
            }
            7 => {
                self.pause_state = 0;
                Outcome::Event(KeyEvent::new(0x77, false, true))
            }
            _ => unreachable!("pause_state is always 1..=7 here"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_all(fsm: &mut ScancodeFsm, bytes: &[u8]) -> heapless::Vec<Outcome, 16> {
        bytes.iter().map(|&b| fsm.feed(b)).collect()
    }

    #[test]
    fn letter_a_press_and_release() {
        let mut fsm = ScancodeFsm::new();
        assert_eq!(
            fsm.feed(0x1C),
            Outcome::Event(KeyEvent::new(0x1C, true, false))
        );
        assert_eq!(fsm.feed(0xF0), Outcome::Pending);
        assert_eq!(
            fsm.feed(0x1C),
            Outcome::Event(KeyEvent::new(0x1C, false, false))
        );
    }

    #[test]
    fn extended_right_arrow_press_and_release() {
        let mut fsm = ScancodeFsm::new();
        assert_eq!(fsm.feed(0xE0), Outcome::Pending);
        assert_eq!(
            fsm.feed(0x74),
            Outcome::Event(KeyEvent::new(0x74, true, true))
        );
        assert_eq!(fsm.feed(0xE0), Outcome::Pending);
        assert_eq!(fsm.feed(0xF0), Outcome::Pending);
        assert_eq!(
            fsm.feed(0x74),
            Outcome::Event(KeyEvent::new(0x74, false, true))
        );
    }

    #[test]
    fn pause_break_sequence_emits_one_press_event() {
        let mut fsm = ScancodeFsm::new();
        let outcomes = feed_all(&mut fsm, &[0xE1, 0x14, 0x77, 0xE1, 0xF0, 0x14, 0xF0, 0x77]);
        assert_eq!(
            outcomes.as_slice(),
            &[
                Outcome::Pending,
                Outcome::Pending,
                Outcome::Event(KeyEvent::new(0x77, true, true)),
                Outcome::Pending,
                Outcome::Pending,
                Outcome::Pending,
                Outcome::Pending,
                Outcome::Event(KeyEvent::new(0x77, false, true)),
            ]
        );
        assert_eq!(fsm.pause_state, 0);
    }

    #[test]
    fn pause_sequence_mismatch_resets_with_no_event() {
        let mut fsm = ScancodeFsm::new();
        assert_eq!(fsm.feed(0xE1), Outcome::Pending);
        assert_eq!(fsm.feed(0x14), Outcome::Pending);
        // Wrong byte here (should be 0x77): resets silently.
        assert_eq!(fsm.feed(0x00), Outcome::Pending);
        assert_eq!(fsm.pause_state, 0);
        // State machine is back to idle and decodes normally.
        assert_eq!(
            fsm.feed(0x1C),
            Outcome::Event(KeyEvent::new(0x1C, true, false))
        );
    }

    #[test]
    fn second_e1_mid_sequence_restarts_at_state_one() {
        let mut fsm = ScancodeFsm::new();
        assert_eq!(fsm.feed(0xE1), Outcome::Pending);
        assert_eq!(fsm.feed(0x14), Outcome::Pending);
        assert_eq!(fsm.feed(0xE1), Outcome::Pending);
        assert_eq!(fsm.pause_state, 1);
    }

    #[test]
    fn print_screen_make_and_break_suppress_fake_shift() {
        let mut fsm = ScancodeFsm::new();
        // Make: E0 12 E0 7C
        assert_eq!(fsm.feed(0xE0), Outcome::Pending);
        assert_eq!(fsm.feed(0x12), Outcome::Suppressed);
        assert_eq!(fsm.feed(0xE0), Outcome::Pending);
        assert_eq!(
            fsm.feed(0x7C),
            Outcome::Event(KeyEvent::new(0x7C, true, true))
        );
        // Break: E0 F0 7C E0 F0 12
        assert_eq!(fsm.feed(0xE0), Outcome::Pending);
        assert_eq!(fsm.feed(0xF0), Outcome::Pending);
        assert_eq!(
            fsm.feed(0x7C),
            Outcome::Event(KeyEvent::new(0x7C, false, true))
        );
        assert_eq!(fsm.feed(0xE0), Outcome::Pending);
        assert_eq!(fsm.feed(0xF0), Outcome::Pending);
        assert_eq!(fsm.feed(0x12), Outcome::Suppressed);
    }

    #[test]
    fn ack_byte_produces_no_event() {
        let mut fsm = ScancodeFsm::new();
        assert_eq!(fsm.feed(0xFA), Outcome::Ack);
        assert_eq!(fsm, ScancodeFsm::new());
    }

    #[test]
    fn flags_clear_after_every_terminal_byte() {
        let mut fsm = ScancodeFsm::new();
        fsm.feed(0xE0);
        fsm.feed(0xF0);
        fsm.feed(0x74);
        assert_eq!(fsm.extended_pending, false);
        assert_eq!(fsm.break_pending, false);
    }
}
