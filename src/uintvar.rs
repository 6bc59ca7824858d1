//! Variable-length unsigned integers
//!
//! The value is encoded in the lower 7 bits of each octet, most significant group first. If
//! the top bit of an octet is set, the value continues into the next octet.
//!
//! Values encoded on more octets than the width of the result are invalid: a warning is
//! logged and the value is decoded as 0.
//!
//! ```rust
//! use iptrace_parser::uintvar::{get_uintvar, parse_uintvar};
//!
//! let (rem, value) = parse_uintvar(&[0x81, 0x00, 0xff]).expect("parse");
//! assert_eq!(value, 128);
//! assert_eq!(rem, &[0xff]);
//!
//! // decode at offset 1, after an already counted octet
//! assert_eq!(get_uintvar(&[0xff, 0x00, 0x05], 1, Some(1)), Some((5, 2)));
//! ```

use log::warn;
use nom::number::streaming::be_u8;
use nom::IResult;
use std::mem;

/// Parse a variable-length unsigned integer
///
/// This is a streaming parser: `Incomplete` is returned if the input ends before an octet
/// without the continuation bit.
pub fn parse_uintvar(i: &[u8]) -> IResult<&[u8], u32> {
    let mut rem = i;
    let mut value: u32 = 0;
    let mut count = 0;
    loop {
        let (r, octet) = be_u8(rem)?;
        rem = r;
        count += 1;
        value = (value << 7) | u32::from(octet & 0x7f);
        if octet & 0x80 == 0 {
            break;
        }
    }
    if count > mem::size_of::<u32>() {
        warn!(
            "uintvar: value encoded on {} octets does not fit in {} octets",
            count,
            mem::size_of::<u32>()
        );
        value = 0;
    }
    Ok((rem, value))
}

/// Decode a variable-length unsigned integer from `data`, at `offset + count`
///
/// `count` is the number of octets already counted by the caller (0 if `None`). Returns the
/// value, and `count` plus the number of octets read.
///
/// Returns `None` if the data ends before the value does.
pub fn get_uintvar(data: &[u8], offset: usize, count: Option<usize>) -> Option<(u32, usize)> {
    let seed = count.unwrap_or(0);
    let start = offset.checked_add(seed)?;
    let i = data.get(start..)?;
    match parse_uintvar(i) {
        Ok((rem, value)) => Some((value, seed + (i.len() - rem.len()))),
        Err(_) => None,
    }
}
