//! Integer to text conversion without an allocator

use heapless::String;

use crate::error::{Error, Result};

/// Longest rendering: 32 binary digits and a sign, rounded up
pub const ITOA_CAPACITY: usize = 34;

const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Render `value` in `base` (2..=36)
///
/// Base 10 is signed; every other base shows the two's complement bit
/// pattern as an unsigned number, the way register dumps are usually read.
///
/// # Errors
///
/// [`Error::InvalidBase`] outside 2..=36.
pub fn itoa(value: i32, base: u32) -> Result<String<ITOA_CAPACITY>> {
    if !(2..=36).contains(&base) {
        return Err(Error::InvalidBase(base));
    }

    let negative = base == 10 && value < 0;
    let mut magnitude = if base == 10 {
        value.unsigned_abs()
    } else {
        u32::from_ne_bytes(value.to_ne_bytes())
    };

    let mut reversed = [0u8; ITOA_CAPACITY];
    let mut len = 0;
    loop {
        reversed[len] = DIGITS[(magnitude % base) as usize];
        len += 1;
        magnitude /= base;
        if magnitude == 0 {
            break;
        }
    }

    let sign = negative.then_some('-');
    let digits = reversed[..len].iter().rev().map(|&digit| char::from(digit));
    let mut text = String::new();
    for c in sign.into_iter().chain(digits) {
        // Capacity covers a sign and 32 binary digits
        let pushed = text.push(c);
        debug_assert!(pushed.is_ok());
    }
    Ok(text)
}
