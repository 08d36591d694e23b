//! Active-key set and USB HID report construction.
//!
//! The active-key set is an explicit value owned by the read loop
//! rather than a global singleton, so it stays host-testable without
//! any hardware context.

use crate::hid::mapping::KeyAction;
use heapless::Vec;

/// Active-key set is bounded at 6 non-modifier + 8 modifier entries;
/// round up to a flat capacity since the translator does not itself
/// distinguish modifiers from ordinary usages (that split happens when
/// the wire report is built).
pub const MAX_ACTIVE_KEYS: usize = 14;

/// A sorted ascending snapshot of currently active USB HID usage codes.
pub type KeyReport = Vec<u8, MAX_ACTIVE_KEYS>;

/// Owns the active-key set and the last report actually sent, and
/// decides when a new report must be transmitted.
#[derive(Debug, Default)]
pub struct ReportBuilder {
    active: Vec<u8, MAX_ACTIVE_KEYS>,
    last_sent: KeyReport,
}

impl ReportBuilder {
    pub fn new() -> Self {
        Self {
            active: Vec::new(),
            last_sent: Vec::new(),
        }
    }

    /// Applies one key action's press/release edge to the active-key
    /// set. Returns `true` if the set changed (a new report should be
    /// built and sent).
    pub fn apply(&mut self, action: &KeyAction, pressed: bool) -> bool {
        let mut changed = false;
        for &code in action.codes() {
            if action.is_toggle() {
                if pressed {
                    changed |= self.toggle(code);
                }
            } else if pressed {
                changed |= self.insert(code);
            } else {
                changed |= self.remove(code);
            }
        }
        changed
    }

    fn insert(&mut self, code: u8) -> bool {
        if self.active.contains(&code) {
            return false;
        }
        // A keyboard sending more than MAX_ACTIVE_KEYS simultaneous
        // usages silently drops the overflow here rather than panicking.
        self.active.push(code).is_ok()
    }

    fn remove(&mut self, code: u8) -> bool {
        if let Some(pos) = self.active.iter().position(|&c| c == code) {
            self.active.swap_remove(pos);
            true
        } else {
            false
        }
    }

    fn toggle(&mut self, code: u8) -> bool {
        if self.active.contains(&code) {
            self.remove(code)
        } else {
            self.insert(code)
        }
    }

    /// Builds the sorted ascending report for the current active-key
    /// set, without regard to whether it differs from the last one
    /// sent.
    fn current_sorted(&self) -> KeyReport {
        let mut sorted = self.active.clone();
        sorted.sort_unstable();
        sorted
    }

    /// If the current active-key set differs from the last report
    /// sent, returns the new report to send and records it as sent.
    /// Equal adjacent reports are not retransmitted.
    pub fn next_report(&mut self) -> Option<KeyReport> {
        let sorted = self.current_sorted();
        if sorted == self.last_sent {
            return None;
        }
        self.last_sent = sorted.clone();
        Some(sorted)
    }

    /// USB error recovery: clears the active set and the last-sent
    /// record so the next successful send starts from a known-empty
    /// state, and returns the empty report the caller should attempt
    /// to send.
    pub fn clear_on_usb_error(&mut self) -> KeyReport {
        self.active.clear();
        self.last_sent.clear();
        KeyReport::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hid::mapping::KeyAction;

    fn normal(code: u8) -> KeyAction {
        KeyAction::macro_keys(&[code])
    }

    #[test]
    fn press_then_release_restores_previous_state() {
        let mut rb = ReportBuilder::new();
        let a = normal(0x04);

        assert!(rb.apply(&a, true));
        assert_eq!(rb.next_report().as_deref(), Some([0x04].as_slice()));

        assert!(rb.apply(&a, false));
        assert_eq!(rb.next_report().as_deref(), Some([].as_slice()));
    }

    #[test]
    fn repeated_identical_report_is_not_retransmitted() {
        let mut rb = ReportBuilder::new();
        let a = normal(0x04);
        rb.apply(&a, true);
        assert!(rb.next_report().is_some());
        // No state change; next_report must say "nothing to send".
        assert_eq!(rb.next_report(), None);
    }

    #[test]
    fn report_is_sorted_ascending_regardless_of_press_order() {
        let mut rb = ReportBuilder::new();
        rb.apply(&normal(0x1D), true); // 'a' has no meaning here, just codes
        rb.apply(&normal(0x05), true);
        rb.apply(&normal(0x11), true);
        let report = rb.next_report().unwrap();
        let mut expected = [0x1D, 0x05, 0x11];
        expected.sort_unstable();
        assert_eq!(report.as_slice(), &expected);
    }

    #[test]
    fn toggle_key_pressed_twice_restores_previous_state() {
        let mut rb = ReportBuilder::new();
        let toggle_key = KeyAction::toggle(0x39);

        assert!(rb.apply(&toggle_key, true));
        assert_eq!(rb.next_report().as_deref(), Some([0x39].as_slice()));

        assert!(rb.apply(&toggle_key, true));
        assert_eq!(rb.next_report().as_deref(), Some([].as_slice()));

        // Release is a no-op for toggle keys.
        assert!(!rb.apply(&toggle_key, false));
        assert_eq!(rb.next_report(), None);
    }

    #[test]
    fn usb_error_clears_active_set_and_next_report_is_empty() {
        let mut rb = ReportBuilder::new();
        rb.apply(&normal(0x04), true);
        rb.next_report();

        let recovery_report = rb.clear_on_usb_error();
        assert!(recovery_report.is_empty());

        // A stray release after the error is a no-op, not a panic.
        assert!(!rb.apply(&normal(0x04), false));
        assert_eq!(rb.next_report(), None);
    }

    #[test]
    fn active_set_never_contains_duplicates() {
        let mut rb = ReportBuilder::new();
        let a = normal(0x04);
        rb.apply(&a, true);
        rb.apply(&a, true); // stuck key / repeat make code
        assert_eq!(rb.active.len(), 1);
    }
}
