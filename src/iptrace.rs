//! AIX iptrace file format
//!
//! An iptrace file starts with an 11-byte version string (`iptrace 1.0` or `iptrace 2.0`),
//! followed by records. Each record has:
//!
//! - an 8-byte header: record length (big-endian, not counting the header) and a timestamp in
//!   seconds since the Epoch;
//! - a packet information block, describing the capturing interface (22 bytes in version 1.0,
//!   32 bytes in version 2.0, which adds a timestamp with nanosecond precision);
//! - padding, for FDDI frames only (3 bytes);
//! - the raw packet data.
//!
//! There is no per-file link-layer type: each record gives the SNMP `ifType` of its interface,
//! converted using [`ift_to_encapsulation`]. A file can contain packets from several interfaces.
//!
//! The format was discovered through inspection. Bytes 0-2 of the packet information, and
//! bytes 22-23 in version 2.0, are unknown.

mod frame;
mod header;
mod ift;

pub use frame::*;
pub use header::*;
pub use ift::*;
