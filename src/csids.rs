//! Cisco Secure IDS iplog format
//!
//! There is no file header. Records are stored back to back, each one being an 8-byte header
//! followed by a raw IP packet:
//!
//! <pre>
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                     Timestamp (seconds)                       |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |           Reserved (0)        |         Captured length       |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! </pre>
//!
//! All fields are big-endian. Some versions of the capturing software wrote the 16-bit fields
//! at the start of the IP header in little-endian order. This is detected once, when opening
//! the file, by comparing the IP total length with the captured length of the first record.
//! The detection cannot tell anything for some small captured lengths (0x0101 to 0x0505):
//! such files are read as not byteswapped.

use nom::number::complete::{be_u16, be_u32};
use nom::IResult;
use std::io::{Read, Seek};

use crate::cursor::ByteCursor;
use crate::encapsulation::{Encapsulation, TsPrecision};
use crate::error::TraceError;
use crate::record::{PseudoHeader, TraceRecord};

/// Size of the header in front of each record
pub const CSIDS_HEADER_SIZE: usize = 8;

/// CSIDS record header
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CsidsHeader {
    /// Time stamp, in seconds since the Epoch
    pub ts_sec: u32,
    /// Always 0
    pub zeropad: u16,
    /// Number of bytes of packet data following the header
    pub caplen: u16,
}

/// Read a CSIDS record header
pub fn parse_csids_header(i: &[u8]) -> IResult<&[u8], CsidsHeader> {
    let (i, ts_sec) = be_u32(i)?;
    let (i, zeropad) = be_u16(i)?;
    let (i, caplen) = be_u16(i)?;
    let header = CsidsHeader {
        ts_sec,
        zeropad,
        caplen,
    };
    Ok((i, header))
}

/// Check if the data at the cursor position looks like a CSIDS file
///
/// Returns `Some(byteswapped)` on a match, `None` otherwise. In both cases the cursor is
/// moved back to its position before the call, since the probed bytes belong to the first
/// record.
pub fn sniff_csids<R>(cursor: &mut ByteCursor<R>) -> Result<Option<bool>, TraceError>
where
    R: Read + Seek,
{
    let start = cursor.tell();
    let res = probe_byteswap(cursor);
    cursor.seek(start)?;
    match res {
        Ok(r) => Ok(r),
        Err(TraceError::UnexpectedEof { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

fn probe_byteswap<R>(cursor: &mut ByteCursor<R>) -> Result<Option<bool>, TraceError>
where
    R: Read + Seek,
{
    let mut buf = [0u8; CSIDS_HEADER_SIZE];
    cursor.read_exact(&mut buf)?;
    let (_, header) = parse_csids_header(&buf)?;
    if header.zeropad != 0 || header.caplen == 0 {
        return Ok(None);
    }
    // IP version/TOS, then total length
    let mut ip = [0u8; 4];
    cursor.read_exact(&mut ip)?;
    let iplen = u16::from_be_bytes([ip[2], ip[3]]);
    if iplen == 0 {
        return Ok(None);
    }
    if iplen <= header.caplen {
        return Ok(Some(false));
    }
    if iplen.swap_bytes() <= header.caplen {
        Ok(Some(true))
    } else {
        Ok(None)
    }
}

/// Swap the bytes of the first three 16-bit words of an IP header, when present
///
/// Words which would extend past the end of `data` are left untouched.
pub fn swap_ip_fields(data: &mut [u8]) {
    for pos in [0usize, 2, 4].iter() {
        if data.len() >= pos + 2 {
            data.swap(*pos, pos + 1);
        }
    }
}

/// Read the next CSIDS record
///
/// Returns [`TraceError::Eof`] if the cursor is exactly at the end of the data.
pub fn read_csids_record<R>(
    cursor: &mut ByteCursor<R>,
    byteswapped: bool,
) -> Result<TraceRecord, TraceError>
where
    R: Read + Seek,
{
    let mut buf = [0u8; CSIDS_HEADER_SIZE];
    if !cursor.read_exact_or_eof(&mut buf)? {
        return Err(TraceError::Eof);
    }
    let (_, header) = parse_csids_header(&buf)?;
    let mut data = cursor.read_vec(usize::from(header.caplen))?;
    if byteswapped {
        swap_ip_fields(&mut data);
    }
    Ok(TraceRecord {
        ts_sec: header.ts_sec,
        ts_nsec: 0,
        ts_precision: TsPrecision::Seconds,
        caplen: u32::from(header.caplen),
        origlen: u32::from(header.caplen),
        encap: Encapsulation::RAW_IP,
        pseudo_header: PseudoHeader::None,
        interface: None,
        data,
    })
}
