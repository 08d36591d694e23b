//! Static PS/2 scancode (set 2) -> USB HID usage mapping table.
//!
//! USB HID usage values are Usage Page 0x07 codes (`0x04..0x65` for
//! keys, `0xE0..0xE7` for modifiers) per the USB HID Usage Tables.

/// Capacity of a [`KeyAction`]'s usage list. A key action is at most a
/// 6-key macro; every mapping entry in this table emits exactly one.
pub const MAX_ACTION_CODES: usize = 6;

/// A mapping table entry's effect: the USB HID usage codes a PS/2
/// scancode produces, and whether it behaves as a normal key or a
/// toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyAction {
    codes: [u8; MAX_ACTION_CODES],
    len: u8,
    toggle: bool,
}

impl KeyAction {
    const fn from_codes(codes: [u8; MAX_ACTION_CODES], len: u8, toggle: bool) -> Self {
        Self { codes, len, toggle }
    }

    /// A normal key: press adds the usage, release removes it.
    pub(crate) const fn normal(code: u8) -> Self {
        Self::from_codes([code, 0, 0, 0, 0, 0], 1, false)
    }

    /// A toggle key: each press edge flips membership; release is a no-op.
    #[allow(dead_code)] // not used by the built-in table; kept for extensibility.
    pub(crate) const fn toggle(code: u8) -> Self {
        Self::from_codes([code, 0, 0, 0, 0, 0], 1, true)
    }

    /// A macro: one PS/2 scancode fans out to several USB usages.
    #[allow(dead_code)] // no macro entries in the built-in table.
    pub(crate) const fn macro_keys(codes: &[u8]) -> Self {
        let mut buf = [0u8; MAX_ACTION_CODES];
        let mut i = 0;
        while i < codes.len() && i < MAX_ACTION_CODES {
            buf[i] = codes[i];
            i += 1;
        }
        Self::from_codes(buf, i as u8, false)
    }

    /// The USB HID usage codes this action produces.
    pub fn codes(&self) -> &[u8] {
        &self.codes[..self.len as usize]
    }

    /// Whether this is a toggle key (press edge flips membership) as
    /// opposed to a normal key (press adds, release removes).
    pub fn is_toggle(&self) -> bool {
        self.toggle
    }
}

use usage::*;

/// USB HID Usage Page 0x07 key codes (not modifiers).
mod usage {
    pub const A: u8 = 0x04;
    pub const B: u8 = 0x05;
    pub const C: u8 = 0x06;
    pub const D: u8 = 0x07;
    pub const E: u8 = 0x08;
    pub const F: u8 = 0x09;
    pub const G: u8 = 0x0A;
    pub const H: u8 = 0x0B;
    pub const I: u8 = 0x0C;
    pub const J: u8 = 0x0D;
    pub const K: u8 = 0x0E;
    pub const L: u8 = 0x0F;
    pub const M: u8 = 0x10;
    pub const N: u8 = 0x11;
    pub const O: u8 = 0x12;
    pub const P: u8 = 0x13;
    pub const Q: u8 = 0x14;
    pub const R: u8 = 0x15;
    pub const S: u8 = 0x16;
    pub const T: u8 = 0x17;
    pub const U: u8 = 0x18;
    pub const V: u8 = 0x19;
    pub const W: u8 = 0x1A;
    pub const X: u8 = 0x1B;
    pub const Y: u8 = 0x1C;
    pub const Z: u8 = 0x1D;

    pub const N1: u8 = 0x1E;
    pub const N2: u8 = 0x1F;
    pub const N3: u8 = 0x20;
    pub const N4: u8 = 0x21;
    pub const N5: u8 = 0x22;
    pub const N6: u8 = 0x23;
    pub const N7: u8 = 0x24;
    pub const N8: u8 = 0x25;
    pub const N9: u8 = 0x26;
    pub const N0: u8 = 0x27;

    pub const ENTER: u8 = 0x28;
    pub const ESC: u8 = 0x29;
    pub const BACKSPACE: u8 = 0x2A;
    pub const TAB: u8 = 0x2B;
    pub const SPACE: u8 = 0x2C;
    pub const MINUS: u8 = 0x2D;
    pub const EQUAL: u8 = 0x2E;
    pub const L_BRACKET: u8 = 0x2F;
    pub const R_BRACKET: u8 = 0x30;
    pub const BACKSLASH: u8 = 0x31;
    pub const SEMICOLON: u8 = 0x33;
    pub const QUOTE: u8 = 0x34;
    pub const GRAVE: u8 = 0x35;
    pub const COMMA: u8 = 0x36;
    pub const DOT: u8 = 0x37;
    pub const SLASH: u8 = 0x38;
    pub const CAPS_LOCK: u8 = 0x39;

    pub const F1: u8 = 0x3A;
    pub const F2: u8 = 0x3B;
    pub const F3: u8 = 0x3C;
    pub const F4: u8 = 0x3D;
    pub const F5: u8 = 0x3E;
    pub const F6: u8 = 0x3F;
    pub const F7: u8 = 0x40;
    pub const F8: u8 = 0x41;
    pub const F9: u8 = 0x42;
    pub const F10: u8 = 0x43;
    pub const F11: u8 = 0x44;
    pub const F12: u8 = 0x45;

    pub const PRINTSCR: u8 = 0x46;
    pub const SCROLL_LOCK: u8 = 0x47;
    pub const PAUSE: u8 = 0x48;
    pub const INSERT: u8 = 0x49;
    pub const HOME: u8 = 0x4A;
    pub const PGUP: u8 = 0x4B;
    pub const DELETE: u8 = 0x4C;
    pub const END: u8 = 0x4D;
    pub const PGDN: u8 = 0x4E;
    pub const RIGHT: u8 = 0x4F;
    pub const LEFT: u8 = 0x50;
    pub const DOWN: u8 = 0x51;
    pub const UP: u8 = 0x52;

    pub const NUM_LOCK: u8 = 0x53;
    pub const KP_SLASH: u8 = 0x54;
    pub const KP_STAR: u8 = 0x55;
    pub const KP_MINUS: u8 = 0x56;
    pub const KP_PLUS: u8 = 0x57;
    pub const KP_ENTER: u8 = 0x58;
    pub const KP_1: u8 = 0x59;
    pub const KP_2: u8 = 0x5A;
    pub const KP_3: u8 = 0x5B;
    pub const KP_4: u8 = 0x5C;
    pub const KP_5: u8 = 0x5D;
    pub const KP_6: u8 = 0x5E;
    pub const KP_7: u8 = 0x5F;
    pub const KP_8: u8 = 0x60;
    pub const KP_9: u8 = 0x61;
    pub const KP_0: u8 = 0x62;
    pub const KP_DOT: u8 = 0x63;

    pub const ISO_SLASH: u8 = 0x64;
    pub const APP: u8 = 0x65;

    pub const L_CTRL: u8 = 0xE0;
    pub const L_SHIFT: u8 = 0xE1;
    pub const L_ALT: u8 = 0xE2;
    pub const L_GUI: u8 = 0xE3;
    pub const R_CTRL: u8 = 0xE4;
    pub const R_SHIFT: u8 = 0xE5;
    pub const R_ALT: u8 = 0xE6;
    pub const R_GUI: u8 = 0xE7;
}

/// `(ps2_scancode, extended) -> KeyAction` entries. Unmapped pairs are
/// a soft error: no panic, no event, just a status signal.
const TABLE: &[((u8, bool), KeyAction)] = &[
    // Letters
    ((0x1C, false), KeyAction::normal(A)),
    ((0x32, false), KeyAction::normal(B)),
    ((0x21, false), KeyAction::normal(C)),
    ((0x23, false), KeyAction::normal(D)),
    ((0x24, false), KeyAction::normal(E)),
    ((0x2B, false), KeyAction::normal(F)),
    ((0x34, false), KeyAction::normal(G)),
    ((0x33, false), KeyAction::normal(H)),
    ((0x43, false), KeyAction::normal(I)),
    ((0x3B, false), KeyAction::normal(J)),
    ((0x42, false), KeyAction::normal(K)),
    ((0x4B, false), KeyAction::normal(L)),
    ((0x3A, false), KeyAction::normal(M)),
    ((0x31, false), KeyAction::normal(N)),
    ((0x44, false), KeyAction::normal(O)),
    ((0x4D, false), KeyAction::normal(P)),
    ((0x15, false), KeyAction::normal(Q)),
    ((0x2D, false), KeyAction::normal(R)),
    ((0x1B, false), KeyAction::normal(S)),
    ((0x2C, false), KeyAction::normal(T)),
    ((0x3C, false), KeyAction::normal(U)),
    ((0x2A, false), KeyAction::normal(V)),
    ((0x1D, false), KeyAction::normal(W)),
    ((0x22, false), KeyAction::normal(X)),
    ((0x35, false), KeyAction::normal(Y)),
    ((0x1A, false), KeyAction::normal(Z)),
    // Numbers
    ((0x16, false), KeyAction::normal(N1)),
    ((0x1E, false), KeyAction::normal(N2)),
    ((0x26, false), KeyAction::normal(N3)),
    ((0x25, false), KeyAction::normal(N4)),
    ((0x2E, false), KeyAction::normal(N5)),
    ((0x36, false), KeyAction::normal(N6)),
    ((0x3D, false), KeyAction::normal(N7)),
    ((0x3E, false), KeyAction::normal(N8)),
    ((0x46, false), KeyAction::normal(N9)),
    ((0x45, false), KeyAction::normal(N0)),
    // F-keys
    ((0x05, false), KeyAction::normal(F1)),
    ((0x06, false), KeyAction::normal(F2)),
    ((0x04, false), KeyAction::normal(F3)),
    ((0x0C, false), KeyAction::normal(F4)),
    ((0x03, false), KeyAction::normal(F5)),
    ((0x0B, false), KeyAction::normal(F6)),
    ((0x83, false), KeyAction::normal(F7)),
    ((0x0A, false), KeyAction::normal(F8)),
    ((0x01, false), KeyAction::normal(F9)),
    ((0x09, false), KeyAction::normal(F10)),
    ((0x78, false), KeyAction::normal(F11)),
    ((0x07, false), KeyAction::normal(F12)),
    // Modifiers
    ((0x12, false), KeyAction::normal(L_SHIFT)),
    ((0x59, false), KeyAction::normal(R_SHIFT)),
    ((0x14, false), KeyAction::normal(L_CTRL)),
    ((0x14, true), KeyAction::normal(R_CTRL)),
    ((0x11, false), KeyAction::normal(L_ALT)),
    ((0x11, true), KeyAction::normal(R_ALT)),
    ((0x1F, true), KeyAction::normal(L_GUI)),
    ((0x27, true), KeyAction::normal(R_GUI)),
    ((0x2F, true), KeyAction::normal(APP)),
    // Common
    ((0x5A, false), KeyAction::normal(ENTER)),
    ((0x76, false), KeyAction::normal(ESC)),
    ((0x66, false), KeyAction::normal(BACKSPACE)),
    ((0x0D, false), KeyAction::normal(TAB)),
    ((0x29, false), KeyAction::normal(SPACE)),
    ((0x4E, false), KeyAction::normal(MINUS)),
    ((0x55, false), KeyAction::normal(EQUAL)),
    ((0x54, false), KeyAction::normal(L_BRACKET)),
    ((0x5B, false), KeyAction::normal(R_BRACKET)),
    ((0x5D, false), KeyAction::normal(BACKSLASH)),
    ((0x4C, false), KeyAction::normal(SEMICOLON)),
    ((0x52, false), KeyAction::normal(QUOTE)),
    ((0x0E, false), KeyAction::normal(GRAVE)),
    ((0x41, false), KeyAction::normal(COMMA)),
    ((0x49, false), KeyAction::normal(DOT)),
    ((0x4A, false), KeyAction::normal(SLASH)),
    // Locks
    ((0x58, false), KeyAction::normal(CAPS_LOCK)),
    ((0x77, false), KeyAction::normal(NUM_LOCK)),
    ((0x7E, false), KeyAction::normal(SCROLL_LOCK)),
    // Navigation
    ((0x70, true), KeyAction::normal(INSERT)),
    ((0x71, true), KeyAction::normal(DELETE)),
    ((0x6C, true), KeyAction::normal(HOME)),
    ((0x69, true), KeyAction::normal(END)),
    ((0x7D, true), KeyAction::normal(PGUP)),
    ((0x7A, true), KeyAction::normal(PGDN)),
    ((0x75, true), KeyAction::normal(UP)),
    ((0x72, true), KeyAction::normal(DOWN)),
    ((0x6B, true), KeyAction::normal(LEFT)),
    ((0x74, true), KeyAction::normal(RIGHT)),
    // Print Screen (0x7C, extended) is the code the FSM emits after
    // suppressing the E0 12 / E0 F0 12 fake-shift.
    ((0x7C, true), KeyAction::normal(PRINTSCR)),
    // Pause (scancode 0x77 collides with Num Lock when non-extended;
    // the FSM only ever emits it with extended=true, synthesized from
    // the 8-byte E1 sequence).
    ((0x77, true), KeyAction::normal(PAUSE)),
    // Numpad
    ((0x70, false), KeyAction::normal(KP_0)),
    ((0x69, false), KeyAction::normal(KP_1)),
    ((0x72, false), KeyAction::normal(KP_2)),
    ((0x7A, false), KeyAction::normal(KP_3)),
    ((0x6B, false), KeyAction::normal(KP_4)),
    ((0x73, false), KeyAction::normal(KP_5)),
    ((0x74, false), KeyAction::normal(KP_6)),
    ((0x6C, false), KeyAction::normal(KP_7)),
    ((0x75, false), KeyAction::normal(KP_8)),
    ((0x7D, false), KeyAction::normal(KP_9)),
    ((0x71, false), KeyAction::normal(KP_DOT)),
    ((0x79, false), KeyAction::normal(KP_PLUS)),
    ((0x7B, false), KeyAction::normal(KP_MINUS)),
    ((0x7C, false), KeyAction::normal(KP_STAR)),
    ((0x4A, true), KeyAction::normal(KP_SLASH)),
    ((0x5A, true), KeyAction::normal(KP_ENTER)),
    // ISO
    ((0x61, false), KeyAction::normal(ISO_SLASH)),
];

/// Looks up the [`KeyAction`] for a `(scancode, extended)` pair.
/// Returns `None` for unmapped pairs; the caller is responsible for
/// surfacing that as a soft status error.
pub fn lookup(scancode: u8, extended: bool) -> Option<KeyAction> {
    TABLE
        .iter()
        .find(|&&(key, _)| key == (scancode, extended))
        .map(|&(_, action)| action)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letter_a_maps_to_usage_0x04() {
        let action = lookup(0x1C, false).expect("A is mapped");
        assert_eq!(action.codes(), &[0x04]);
        assert!(!action.is_toggle());
    }

    #[test]
    fn right_arrow_requires_extended_flag() {
        assert!(lookup(0x74, false).is_none());
        let action = lookup(0x74, true).expect("extended right arrow is mapped");
        assert_eq!(action.codes(), &[RIGHT]);
    }

    #[test]
    fn pause_and_num_lock_share_scancode_but_differ_by_extended() {
        let pause = lookup(0x77, true).unwrap();
        let num_lock = lookup(0x77, false).unwrap();
        assert_eq!(pause.codes(), &[PAUSE]);
        assert_eq!(num_lock.codes(), &[NUM_LOCK]);
    }

    #[test]
    fn unmapped_pair_returns_none() {
        assert_eq!(lookup(0xFF, false), None);
    }

    #[test]
    fn toggle_and_macro_constructors_are_available_for_future_entries() {
        let toggle = KeyAction::toggle(CAPS_LOCK);
        assert!(toggle.is_toggle());
        assert_eq!(toggle.codes(), &[CAPS_LOCK]);

        let combo = KeyAction::macro_keys(&[L_CTRL, L_ALT, T]);
        assert_eq!(combo.codes(), &[L_CTRL, L_ALT, T]);
        assert!(!combo.is_toggle());
    }
}
