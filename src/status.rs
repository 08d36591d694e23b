//! Status indicator state.
//!
//! This holds only the *state*; the LED driver that renders it lives
//! in `src/embedded/led.rs`, kept separate so this state machine stays
//! host-testable on its own.

/// One of the four status states an operator can observe on the LED.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Booting, before USB enumeration completes.
    Init,
    /// Enumerated and decoding normally.
    Ready,
    /// Last USB report send failed; latched until the next success.
    UsbErr,
    /// An unmapped scancode (or frame/parity reject, if surfaced) was
    /// seen; auto-clears back to `Ready` after
    /// [`crate::config::PS2_ERR_CLEAR_MS`] with no further errors.
    Ps2Err,
}

impl Default for Status {
    fn default() -> Self {
        Status::Init
    }
}

/// Decides the next [`Status`] given the current one and an elapsed
/// time (milliseconds) since the error/activity that set it. This is
/// pure state-transition logic; the status loop task supplies the
/// actual elapsed time from its clock.
pub fn tick(current: Status, ms_since_set: u64) -> Status {
    match current {
        Status::Ps2Err if ms_since_set >= crate::config::PS2_ERR_CLEAR_MS => Status::Ready,
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ps2_err_auto_clears_after_threshold() {
        assert_eq!(
            tick(Status::Ps2Err, crate::config::PS2_ERR_CLEAR_MS),
            Status::Ready
        );
        assert_eq!(
            tick(Status::Ps2Err, crate::config::PS2_ERR_CLEAR_MS - 1),
            Status::Ps2Err
        );
    }

    #[test]
    fn other_states_are_unaffected_by_elapsed_time() {
        assert_eq!(tick(Status::Ready, 10_000), Status::Ready);
        assert_eq!(tick(Status::UsbErr, 10_000), Status::UsbErr);
        assert_eq!(tick(Status::Init, 10_000), Status::Init);
    }
}
