use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::combinator::value;
use nom::IResult;
use std::io::{Read, Seek};

use crate::cursor::ByteCursor;
use crate::encapsulation::TsPrecision;
use crate::error::TraceError;

/// Size of the version string at the start of the file
pub const VERSION_STRING_SIZE: usize = 11;

pub const IPTRACE_1_0_MAGIC: &[u8] = b"iptrace 1.0";
pub const IPTRACE_2_0_MAGIC: &[u8] = b"iptrace 2.0";

/// Size of the packet information block in version 1.0
pub const IPTRACE_1_0_PINFO_SIZE: usize = 22;
/// Size of the packet information block in version 2.0
pub const IPTRACE_2_0_PINFO_SIZE: usize = 32;

/// iptrace file version
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IptraceVersion {
    V1_0,
    V2_0,
}

impl IptraceVersion {
    /// The version string identifying this version
    pub const fn magic(self) -> &'static [u8] {
        match self {
            IptraceVersion::V1_0 => IPTRACE_1_0_MAGIC,
            IptraceVersion::V2_0 => IPTRACE_2_0_MAGIC,
        }
    }

    /// Size of the packet information block, following each record header
    pub const fn pinfo_size(self) -> usize {
        match self {
            IptraceVersion::V1_0 => IPTRACE_1_0_PINFO_SIZE,
            IptraceVersion::V2_0 => IPTRACE_2_0_PINFO_SIZE,
        }
    }

    /// Version 1.0 only stores seconds
    pub const fn ts_precision(self) -> TsPrecision {
        match self {
            IptraceVersion::V1_0 => TsPrecision::Seconds,
            IptraceVersion::V2_0 => TsPrecision::Nanoseconds,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            IptraceVersion::V1_0 => "AIX iptrace 1.0",
            IptraceVersion::V2_0 => "AIX iptrace 2.0",
        }
    }
}

/// Read the iptrace version string
pub fn parse_iptrace_header(i: &[u8]) -> IResult<&[u8], IptraceVersion> {
    alt((
        value(IptraceVersion::V1_0, tag(IPTRACE_1_0_MAGIC)),
        value(IptraceVersion::V2_0, tag(IPTRACE_2_0_MAGIC)),
    ))(i)
}

/// Check if the data at the cursor position is an iptrace file, and read its version
///
/// Returns `None` if the file is too short or the version string is not recognized. On
/// success, the cursor is positioned on the first record.
pub fn sniff_iptrace<R>(cursor: &mut ByteCursor<R>) -> Result<Option<IptraceVersion>, TraceError>
where
    R: Read + Seek,
{
    let mut version_string = [0u8; VERSION_STRING_SIZE];
    match cursor.read_exact(&mut version_string) {
        Ok(()) => (),
        Err(TraceError::UnexpectedEof { .. }) => return Ok(None),
        Err(e) => return Err(e),
    }
    Ok(parse_iptrace_header(&version_string)
        .ok()
        .map(|(_, version)| version))
}
