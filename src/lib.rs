//! # AIX iptrace and CSIDS iplog parsers
//!
//! This crate reads two legacy network capture formats:
//!
//! - AIX iptrace, versions 1.0 and 2.0, produced by the `iptrace` command of IBM AIX;
//! - Cisco Secure IDS iplog.
//!
//! Records are decoded into a common [`TraceRecord`], with a timestamp, lengths, the
//! link-layer encapsulation of the data, and a pseudo-header for encapsulations which need
//! out-of-band information (ATM, Ethernet).
//!
//! The format is detected from the first bytes of the data: iptrace files start with a
//! version string, while CSIDS files have no header and are recognized by a heuristic on their
//! first record.
//!
//! # Example
//!
//! The following code opens an iptrace 2.0 capture stored in memory, and reads all its
//! records using a [`TraceReader`].
//!
//! ```rust
//! use iptrace_parser::*;
//!
//! let mut data = b"iptrace 2.0".to_vec();
//! // record header: length (32 + 4 bytes of data), timestamp
//! data.extend_from_slice(&[0, 0, 0, 36, 0x5f, 0x5e, 0x0f, 0x00]);
//! // packet information: unit 0, "en", Ethernet, received, timestamp
//! let mut pinfo = [0u8; 32];
//! pinfo[4..6].copy_from_slice(b"en");
//! pinfo[20] = 0x06;
//! pinfo[24..28].copy_from_slice(&[0x5f, 0x5e, 0x0f, 0x00]);
//! pinfo[28..32].copy_from_slice(&500u32.to_be_bytes());
//! data.extend_from_slice(&pinfo);
//! data.extend_from_slice(&[1, 2, 3, 4]);
//!
//! let reader = TraceReader::from_slice(&data).expect("TraceReader");
//! assert_eq!(reader.file_type_name(), "AIX iptrace 2.0");
//! let mut num_records = 0;
//! for res in reader {
//!     let (offset, record) = res.expect("record");
//!     assert_eq!(record.encap, Encapsulation::ETHERNET);
//!     println!(
//!         "record at offset {}: {}.{:09} {} bytes",
//!         offset, record.ts_sec, record.ts_nsec, record.caplen
//!     );
//!     num_records += 1;
//! }
//! assert_eq!(num_records, 1);
//! ```
//!
//! For files, use [`TraceReader::from_path`], which opens the file twice: records can be read
//! again from their offset with [`TraceReader::seek_and_read`], without disturbing the
//! sequential reads.
//!
//! The lower-level parts (format detection, record decoders, byte cursor) are also public, to
//! be used with other readers.

mod encapsulation;
mod error;
mod record;
pub use encapsulation::*;
pub use error::*;
pub use record::*;

pub mod atm;
pub mod csids;
pub mod cursor;
pub mod iptrace;
pub mod uintvar;

mod format;
mod reader;
pub use format::*;
pub use reader::*;
