use log::debug;
use std::io::{Read, Seek};

use crate::csids::{read_csids_record, sniff_csids};
use crate::cursor::ByteCursor;
use crate::encapsulation::{Encapsulation, TsPrecision};
use crate::error::TraceError;
use crate::iptrace::{read_iptrace_record, sniff_iptrace, IptraceVersion};
use crate::reader::ReaderOptions;
use crate::record::TraceRecord;

/// Capture file formats, in detection order
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileFormat {
    /// AIX iptrace, identified by its version string
    Iptrace,
    /// Cisco Secure IDS iplog, identified by a heuristic on the first record
    Csids,
}

impl FileFormat {
    /// All supported formats, in the order they are tried
    ///
    /// Formats with a magic value come first: the heuristic ones can match random data.
    pub const ALL: &'static [FileFormat] = &[FileFormat::Iptrace, FileFormat::Csids];

    pub fn name(self) -> &'static str {
        match self {
            FileFormat::Iptrace => "AIX iptrace",
            FileFormat::Csids => "CSIDS IPLog",
        }
    }

    pub fn short_name(self) -> &'static str {
        match self {
            FileFormat::Iptrace => "iptrace",
            FileFormat::Csids => "csids",
        }
    }

    /// Check if the data at the cursor position is in this format
    ///
    /// On success, returns the decoder for the records, with the cursor positioned on the
    /// first record. If the format does not match, returns `None` and the cursor is back to
    /// its starting position.
    pub fn sniff<R>(self, cursor: &mut ByteCursor<R>) -> Result<Option<RecordDecoder>, TraceError>
    where
        R: Read + Seek,
    {
        let start = cursor.tell();
        let decoder = match self {
            FileFormat::Iptrace => sniff_iptrace(cursor)?.map(RecordDecoder::Iptrace),
            FileFormat::Csids => {
                sniff_csids(cursor)?.map(|byteswapped| RecordDecoder::Csids { byteswapped })
            }
        };
        if decoder.is_none() {
            cursor.seek(start)?;
        }
        Ok(decoder)
    }
}

/// Record decoder for one file, with the state found when opening it
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordDecoder {
    Iptrace(IptraceVersion),
    Csids {
        /// The first 16-bit words of IP headers are stored in little-endian order
        byteswapped: bool,
    },
}

impl RecordDecoder {
    pub fn format(self) -> FileFormat {
        match self {
            RecordDecoder::Iptrace(_) => FileFormat::Iptrace,
            RecordDecoder::Csids { .. } => FileFormat::Csids,
        }
    }

    /// Name of the file type, including the version
    pub fn file_type_name(self) -> &'static str {
        match self {
            RecordDecoder::Iptrace(version) => version.name(),
            RecordDecoder::Csids { .. } => "CSIDS IPLog",
        }
    }

    pub fn ts_precision(self) -> TsPrecision {
        match self {
            RecordDecoder::Iptrace(version) => version.ts_precision(),
            RecordDecoder::Csids { .. } => TsPrecision::Seconds,
        }
    }

    /// Encapsulation of the file, before any record is read
    pub fn initial_encapsulation(self) -> Encapsulation {
        match self {
            RecordDecoder::Iptrace(_) => Encapsulation::UNKNOWN,
            RecordDecoder::Csids { .. } => Encapsulation::RAW_IP,
        }
    }

    pub fn is_byteswapped(self) -> bool {
        match self {
            RecordDecoder::Iptrace(_) => false,
            RecordDecoder::Csids { byteswapped } => byteswapped,
        }
    }

    /// Decode the record at the cursor position
    ///
    /// Returns [`TraceError::Eof`] if there is no data left.
    pub fn read_record<R>(
        self,
        cursor: &mut ByteCursor<R>,
        options: &ReaderOptions,
    ) -> Result<TraceRecord, TraceError>
    where
        R: Read + Seek,
    {
        match self {
            RecordDecoder::Iptrace(version) => read_iptrace_record(cursor, version, options),
            RecordDecoder::Csids { byteswapped } => read_csids_record(cursor, byteswapped),
        }
    }

    /// Decode the record at an absolute offset
    ///
    /// The offset must be the start of a record: there is no [`TraceError::Eof`], the end of
    /// the data is reported as [`TraceError::UnexpectedEof`].
    pub fn seek_read<R>(
        self,
        cursor: &mut ByteCursor<R>,
        offset: u64,
        options: &ReaderOptions,
    ) -> Result<TraceRecord, TraceError>
    where
        R: Read + Seek,
    {
        cursor.seek(offset)?;
        match self.read_record(cursor, options) {
            Err(TraceError::Eof) => Err(TraceError::UnexpectedEof {
                offset,
                needed: 1,
                available: 0,
            }),
            r => r,
        }
    }
}

/// Find the format of the data at the cursor position
///
/// `formats` are tried in order, the first match wins. Returns [`TraceError::NotRecognized`]
/// if none matches, with the cursor back at its starting position.
pub fn detect<R>(
    cursor: &mut ByteCursor<R>,
    formats: &[FileFormat],
) -> Result<RecordDecoder, TraceError>
where
    R: Read + Seek,
{
    for format in formats {
        if let Some(decoder) = format.sniff(cursor)? {
            debug!(
                "detected {} file ({})",
                decoder.file_type_name(),
                format.short_name()
            );
            return Ok(decoder);
        }
    }
    debug!("no format matched at offset {}", cursor.tell());
    Err(TraceError::NotRecognized)
}
