//! Raw 22-bit PIO frame -> validated scancode byte.
//!
//! The PIO sampler shifts in 11 two-bit (CLK, DATA) samples using
//! `in_shiftdir = Left` with autopush at 22 bits. With a left shift,
//! the first bit sampled (the start bit) ends up in the top-most pair
//! of the 22-bit word and the last bit sampled (the stop bit) ends up
//! in the bottom-most pair:
//!
//! ```text
//! bits 21:20 = start bit sample (CLK, DATA)
//! bits 19:18 = data bit 0
//! ...
//! bits  3:2  = parity bit sample
//! bits  1:0  = stop bit sample
//! ```
//!
//! Each 2-bit sample packs `(CLK, DATA)` with DATA in the low bit,
//! since the PIO's `in_base` pin is CLK and DATA is the next pin.
use crate::error::FrameError;

/// Number of bits sampled per frame (1 start + 8 data + 1 parity + 1 stop).
const FRAME_BITS: u32 = 11;

/// Extracts the DATA sample out of the `i`-th two-bit pair (sampled
/// order, `i = 0` is the start bit, `i = 10` is the stop bit).
fn sample_bit(frame: u32, i: u32) -> bool {
    let shift = (FRAME_BITS - 1 - i) * 2;
    let pair = (frame >> shift) & 0b11;
    (pair & 0b10) != 0
}

/// Decodes one raw 22-bit PIO word into a validated scancode byte.
///
/// Returns [`FrameError::Framing`] if the start bit isn't 0 or the
/// stop bit isn't 1, and [`FrameError::Parity`] if the data+parity
/// bits don't sum to odd. Both are silent-drop conditions: the caller
/// must not touch parser state or emit anything on either error.
pub fn decode_frame(frame: u32) -> Result<u8, FrameError> {
    let start = sample_bit(frame, 0);
    let stop = sample_bit(frame, 10);
    if start || !stop {
        return Err(FrameError::Framing { start, stop });
    }

    let mut data = 0u8;
    for i in 0..8u32 {
        if sample_bit(frame, 1 + i) {
            data |= 1 << i;
        }
    }
    let parity = sample_bit(frame, 9);

    let ones = data.count_ones() + u32::from(parity);
    if ones % 2 != 1 {
        return Err(FrameError::Parity { data, parity });
    }

    Ok(data)
}

/// Packs `(start, d0..d7 LSB-first, parity, stop)` into the raw 22-bit
/// word shape `decode_frame` expects. Only used by tests, to build
/// frames without hand-computing bit offsets.
#[cfg(test)]
fn pack_frame(start: bool, data: u8, parity: bool, stop: bool) -> u32 {
    let mut bits = [false; 11];
    bits[0] = start;
    for i in 0..8 {
        bits[1 + i] = (data >> i) & 1 != 0;
    }
    bits[9] = parity;
    bits[10] = stop;

    let mut frame = 0u32;
    for (i, &data_bit) in bits.iter().enumerate() {
        let shift = (FRAME_BITS as usize - 1 - i) * 2;
        // CLK bit is irrelevant to decoding; always sample CLK=1 here.
        let pair: u32 = 0b10 | u32::from(data_bit);
        frame |= pair << shift;
    }
    frame
}

#[cfg(test)]
mod tests {
    use super::*;

    fn odd_parity(data: u8) -> bool {
        data.count_ones() % 2 == 0
    }

    #[test]
    fn decodes_valid_frame_with_odd_number_of_ones() {
        let data = 0b0001_1100; // 0x1C, 'A' make code
        let frame = pack_frame(false, data, odd_parity(data), true);
        assert_eq!(decode_frame(frame), Ok(data));
    }

    #[test]
    fn decodes_all_zero_data_byte() {
        let frame = pack_frame(false, 0x00, true, true);
        assert_eq!(decode_frame(frame), Ok(0x00));
    }

    #[test]
    fn decodes_all_one_data_byte() {
        let frame = pack_frame(false, 0xFF, true, true);
        assert_eq!(decode_frame(frame), Ok(0xFF));
    }

    #[test]
    fn rejects_bad_start_bit() {
        let frame = pack_frame(true, 0x1C, odd_parity(0x1C), true);
        assert_eq!(
            decode_frame(frame),
            Err(FrameError::Framing {
                start: true,
                stop: true
            })
        );
    }

    #[test]
    fn rejects_bad_stop_bit() {
        let frame = pack_frame(false, 0x1C, odd_parity(0x1C), false);
        assert_eq!(
            decode_frame(frame),
            Err(FrameError::Framing {
                start: false,
                stop: false
            })
        );
    }

    #[test]
    fn rejects_bad_parity() {
        let data = 0x1C;
        let frame = pack_frame(false, data, !odd_parity(data), true);
        assert_eq!(
            decode_frame(frame),
            Err(FrameError::Parity {
                data,
                parity: !odd_parity(data)
            })
        );
    }

    #[test]
    fn all_valid_bit_sequences_roundtrip() {
        for data in 0..=255u8 {
            let frame = pack_frame(false, data, odd_parity(data), true);
            assert_eq!(decode_frame(frame), Ok(data));
        }
    }
}
