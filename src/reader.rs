use log::debug;
use std::fmt;
use std::fs::File;
use std::io::{Cursor, Read, Seek};
use std::path::Path;

use crate::atm::{guess_traffic_type, AtmClassifierFn};
use crate::cursor::{ByteCursor, DEFAULT_CAPACITY};
use crate::encapsulation::{Encapsulation, TsPrecision};
use crate::error::TraceError;
use crate::format::{detect, FileFormat, RecordDecoder};
use crate::record::TraceRecord;

/// Options used when opening a capture
#[derive(Clone, Copy)]
pub struct ReaderOptions {
    /// Initial buffer capacity of each cursor
    pub capacity: usize,
    /// Refuse iptrace records from unknown interface types, instead of reading them with an
    /// `UNKNOWN` encapsulation
    pub strict_interface_types: bool,
    /// Called on each ATM record, to guess the traffic type
    pub atm_classifier: AtmClassifierFn,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        ReaderOptions {
            capacity: DEFAULT_CAPACITY,
            strict_interface_types: false,
            atm_classifier: guess_traffic_type,
        }
    }
}

impl ReaderOptions {
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn strict_interface_types(mut self, strict: bool) -> Self {
        self.strict_interface_types = strict;
        self
    }

    pub fn atm_classifier(mut self, classifier: AtmClassifierFn) -> Self {
        self.atm_classifier = classifier;
        self
    }
}

impl fmt::Debug for ReaderOptions {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ReaderOptions")
            .field("capacity", &self.capacity)
            .field("strict_interface_types", &self.strict_interface_types)
            .finish_non_exhaustive()
    }
}

/// Reader over a capture file in any of the supported formats
///
/// The format is detected when opening the capture. Records can then be read in order with
/// [`read_next`](TraceReader::read_next) (or by iterating), or read again later from the
/// offset returned with them, using [`seek_and_read`](TraceReader::seek_and_read).
///
/// Sequential and random reads use two different handles on the data, each one with its own
/// position and buffer, so they can be interleaved freely.
///
/// ## Example
///
/// ```rust
/// use iptrace_parser::*;
///
/// // CSIDS file, with one 4-byte record
/// let data = [0x5f, 0x5e, 0x0f, 0x00, 0x00, 0x00, 0x00, 0x04, 0x45, 0x00, 0x00, 0x04];
/// let mut reader = TraceReader::from_slice(&data).expect("TraceReader");
/// assert_eq!(reader.file_type_name(), "CSIDS IPLog");
/// let mut offsets = Vec::new();
/// loop {
///     match reader.read_next() {
///         Ok((offset, record)) => {
///             println!("{}: {} bytes, encap {}", record.ts_sec, record.caplen, record.encap);
///             offsets.push(offset);
///         }
///         Err(TraceError::Eof) => break,
///         Err(e) => panic!("error while reading: {}", e),
///     }
/// }
/// let again = reader.seek_and_read(offsets[0]).expect("seek_and_read");
/// assert_eq!(again.data, &[0x45, 0x00, 0x00, 0x04]);
/// ```
pub struct TraceReader<R>
where
    R: Read + Seek,
{
    decoder: RecordDecoder,
    options: ReaderOptions,
    cursor: ByteCursor<R>,
    random_cursor: ByteCursor<R>,
    file_encap: Encapsulation,
    iter_done: bool,
}

impl<R> TraceReader<R>
where
    R: Read + Seek,
{
    /// Open a capture from two handles on the same data, with default options
    ///
    /// `reader` is used for sequential reads, `random_reader` for reads at a given offset.
    /// Detection starts at the current position of `reader`.
    pub fn open(reader: R, random_reader: R) -> Result<TraceReader<R>, TraceError> {
        Self::with_options(reader, random_reader, ReaderOptions::default())
    }

    /// Open a capture from two handles on the same data
    ///
    /// Returns [`TraceError::NotRecognized`] if no format matches.
    pub fn with_options(
        reader: R,
        random_reader: R,
        options: ReaderOptions,
    ) -> Result<TraceReader<R>, TraceError> {
        let mut cursor = ByteCursor::new(options.capacity, reader)?;
        let decoder = detect(&mut cursor, FileFormat::ALL)?;
        let random_cursor = ByteCursor::new(options.capacity, random_reader)?;
        Ok(TraceReader {
            decoder,
            options,
            cursor,
            random_cursor,
            file_encap: decoder.initial_encapsulation(),
            iter_done: false,
        })
    }

    /// Read the next record
    ///
    /// Returns the offset of the record, which can be given to
    /// [`seek_and_read`](TraceReader::seek_and_read), and the record. Returns
    /// [`TraceError::Eof`] when there are no more records.
    pub fn read_next(&mut self) -> Result<(u64, TraceRecord), TraceError> {
        let offset = self.cursor.tell();
        match self.decoder.read_record(&mut self.cursor, &self.options) {
            Ok(record) => {
                self.update_file_encapsulation(record.encap);
                Ok((offset, record))
            }
            Err(TraceError::Eof) => Err(TraceError::Eof),
            Err(e) => {
                debug!("failed to read record at offset {}: {}", offset, e);
                Err(e)
            }
        }
    }

    /// Read the record at `offset`
    ///
    /// The sequential position and the file encapsulation are not modified.
    pub fn seek_and_read(&mut self, offset: u64) -> Result<TraceRecord, TraceError> {
        self.decoder
            .seek_read(&mut self.random_cursor, offset, &self.options)
            .map_err(|e| {
                debug!("failed to read record at offset {} (random access): {}", offset, e);
                e
            })
    }

    // UNKNOWN until the first record, PER_PACKET as soon as two records disagree
    fn update_file_encapsulation(&mut self, encap: Encapsulation) {
        if self.file_encap == Encapsulation::UNKNOWN {
            self.file_encap = encap;
        } else if self.file_encap != encap {
            self.file_encap = Encapsulation::PER_PACKET;
        }
    }

    /// Encapsulation of all the records read so far
    ///
    /// This is `PER_PACKET` if the records seen did not all have the same encapsulation.
    #[inline]
    pub fn file_encapsulation(&self) -> Encapsulation {
        self.file_encap
    }

    #[inline]
    pub fn ts_precision(&self) -> TsPrecision {
        self.decoder.ts_precision()
    }

    #[inline]
    pub fn decoder(&self) -> RecordDecoder {
        self.decoder
    }

    #[inline]
    pub fn format(&self) -> FileFormat {
        self.decoder.format()
    }

    #[inline]
    pub fn file_type_name(&self) -> &'static str {
        self.decoder.file_type_name()
    }

    /// Maximum captured length, 0 if unknown
    ///
    /// None of the supported formats store it.
    #[inline]
    pub fn snapshot_length(&self) -> u32 {
        0
    }

    #[inline]
    pub fn options(&self) -> &ReaderOptions {
        &self.options
    }

    /// Offset of the next record to be read sequentially
    #[inline]
    pub fn position(&self) -> u64 {
        self.cursor.tell()
    }
}

impl<'a> TraceReader<Cursor<&'a [u8]>> {
    /// Open a capture stored in memory
    pub fn from_slice(data: &'a [u8]) -> Result<Self, TraceError> {
        TraceReader::open(Cursor::new(data), Cursor::new(data))
    }
}

impl TraceReader<File> {
    /// Open a capture file
    ///
    /// The file is opened twice, for sequential and random reads.
    pub fn from_path<P: AsRef<Path>>(path: P, options: ReaderOptions) -> Result<Self, TraceError> {
        let path = path.as_ref();
        let reader = File::open(path)?;
        let random_reader = File::open(path)?;
        TraceReader::with_options(reader, random_reader, options)
    }
}

/// Iterate over the records, with their offsets
///
/// Iteration stops at the end of the data, or after the first error.
impl<R> Iterator for TraceReader<R>
where
    R: Read + Seek,
{
    type Item = Result<(u64, TraceRecord), TraceError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.iter_done {
            return None;
        }
        match self.read_next() {
            Ok(r) => Some(Ok(r)),
            Err(TraceError::Eof) => {
                self.iter_done = true;
                None
            }
            Err(e) => {
                self.iter_done = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atm::AtmTrafficType;
    use crate::record::PseudoHeader;
    use hex_literal::hex;

    // iptrace 1.0: one Ethernet record, then one ATM record
    const IPTRACE_MIXED: &[u8] = &hex!(
        "
69 70 74 72 61 63 65 20 31 2e 30
00 00 00 1a 00 00 00 01
00 00 00 00 65 6e 00 00 00 00 00 00 00 00 00 00 00 00 00 00 06 00
01 02 03 04
00 00 00 19 00 00 00 02
00 00 00 00 61 74 00 00 00 00 00 00 30 2e 35 00 00 00 00 00 25 01
aa bb cc"
    );

    #[test]
    fn encapsulation_becomes_per_packet() {
        let mut reader = TraceReader::from_slice(IPTRACE_MIXED).expect("open");
        assert_eq!(reader.file_encapsulation(), Encapsulation::UNKNOWN);
        assert_eq!(reader.ts_precision(), TsPrecision::Seconds);
        let (offset, rec) = reader.read_next().expect("first");
        assert_eq!(offset, 11);
        assert_eq!(rec.encap, Encapsulation::ETHERNET);
        assert_eq!(reader.file_encapsulation(), Encapsulation::ETHERNET);
        let (offset, rec) = reader.read_next().expect("second");
        assert_eq!(offset, 11 + 8 + 26);
        assert_eq!(rec.encap, Encapsulation::ATM_PDUS);
        let atm = rec.atm().expect("atm");
        assert_eq!((atm.vpi, atm.vci), (0, 5));
        assert_eq!(reader.file_encapsulation(), Encapsulation::PER_PACKET);
        assert!(matches!(reader.read_next(), Err(TraceError::Eof)));
    }

    #[test]
    fn random_read_is_independent() {
        let mut reader = TraceReader::from_slice(IPTRACE_MIXED).expect("open");
        let (off1, rec1) = reader.read_next().expect("first");
        let again = reader.seek_and_read(off1).expect("seek_and_read");
        assert_eq!(again, rec1);
        assert_eq!(reader.position(), 11 + 8 + 26);
        let (_, rec2) = reader.read_next().expect("second");
        assert_eq!(rec2.data, &[0xaa, 0xbb, 0xcc]);
        // random reads do not update the file encapsulation
        let mut reader = TraceReader::from_slice(IPTRACE_MIXED).expect("open");
        reader.seek_and_read(45).expect("seek_and_read");
        assert_eq!(reader.file_encapsulation(), Encapsulation::UNKNOWN);
    }

    fn no_classification(_record: &mut TraceRecord) {}

    #[test]
    fn custom_atm_classifier() {
        let data = IPTRACE_MIXED;
        let options = ReaderOptions::default().atm_classifier(no_classification);
        let mut reader =
            TraceReader::with_options(Cursor::new(data), Cursor::new(data), options).expect("open");
        let rec = reader.nth(1).expect("record").expect("read");
        match rec.1.pseudo_header {
            PseudoHeader::Atm(atm) => assert_eq!(atm.traffic_type, AtmTrafficType::Unknown),
            ph => panic!("unexpected pseudo-header {:?}", ph),
        }
    }

    #[test]
    fn iterator_stops_after_error() {
        let data = &IPTRACE_MIXED[..IPTRACE_MIXED.len() - 1];
        let reader = TraceReader::from_slice(data).expect("open");
        let results: Vec<_> = reader.collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(matches!(
            results[1],
            Err(TraceError::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn options_debug() {
        let s = format!("{:?}", ReaderOptions::default().capacity(128));
        assert!(s.contains("capacity: 128"));
    }
}
