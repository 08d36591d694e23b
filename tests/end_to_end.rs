//! End-to-end byte-sequence scenarios.
//!
//! Each scenario feeds a raw scancode byte stream through the
//! scancode state machine and the HID translator together and checks
//! the resulting sequence of transmitted reports, mirroring how the
//! read loop wires these two pieces together in `src/bin/firmware.rs`.

use ps2usb::hid::mapping::lookup;
use ps2usb::hid::report::{KeyReport, ReportBuilder};
use ps2usb::ps2::scancode::{Outcome, ScancodeFsm};

/// Runs a raw scancode byte stream through the FSM + translator and
/// collects every report that would have been transmitted.
fn run(bytes: &[u8]) -> Vec<KeyReport> {
    let mut fsm = ScancodeFsm::new();
    let mut rb = ReportBuilder::new();
    let mut reports = Vec::new();

    for &b in bytes {
        match fsm.feed(b) {
            Outcome::Event(event) => {
                if let Some(action) = lookup(event.scancode, event.extended) {
                    if rb.apply(&action, event.pressed) {
                        if let Some(report) = rb.next_report() {
                            reports.push(report);
                        }
                    }
                }
            }
            Outcome::Pending | Outcome::Ack | Outcome::Suppressed => {}
        }
    }
    reports
}

fn report(codes: &[u8]) -> KeyReport {
    let mut r = KeyReport::new();
    for &c in codes {
        r.push(c).unwrap();
    }
    r
}

#[test]
fn letter_a_press_release() {
    let reports = run(&[0x1C, 0xF0, 0x1C]);
    assert_eq!(reports, vec![report(&[0x04]), report(&[])]);
}

#[test]
fn shift_plus_a() {
    // Left Shift down, A down, A up, Shift up.
    let reports = run(&[0x12, 0x1C, 0xF0, 0x1C, 0xF0, 0x12]);
    assert_eq!(
        reports,
        vec![
            report(&[0xE1]),
            report(&[0x04, 0xE1]),
            report(&[0xE1]),
            report(&[]),
        ]
    );
}

#[test]
fn right_arrow_extended() {
    let reports = run(&[0xE0, 0x74, 0xE0, 0xF0, 0x74]);
    assert_eq!(reports, vec![report(&[0x4F]), report(&[])]);
}

#[test]
fn pause_key() {
    let reports = run(&[0xE1, 0x14, 0x77, 0xE1, 0xF0, 0x14, 0xF0, 0x77]);
    assert_eq!(reports, vec![report(&[0x48]), report(&[])]);
}

#[test]
fn print_screen_make_and_break_produce_no_extra_reports() {
    let reports = run(&[
        0xE0, 0x12, 0xE0, 0x7C, // make
        0xE0, 0xF0, 0x7C, 0xE0, 0xF0, 0x12, // break
    ]);
    assert_eq!(reports, vec![report(&[0x46]), report(&[])]);
}

#[test]
fn unknown_scancode_produces_no_report_and_does_not_poison_later_bytes() {
    // 0x7F is not in the mapping table, at either extended state.
    let mut reports = run(&[0x7F]);
    assert!(reports.is_empty());
    reports = run(&[0x7F, 0x1C, 0xF0, 0x1C]);
    assert_eq!(reports, vec![report(&[0x04]), report(&[])]);
}
