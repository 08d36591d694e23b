//! PS/2 physical-layer decoding and protocol state machine.

pub mod frame;
pub mod scancode;
