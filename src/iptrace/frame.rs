use log::debug;
use nom::bytes::complete::take;
use nom::character::complete::{char, digit1, multispace0};
use nom::combinator::opt;
use nom::number::complete::{be_u32, be_u8};
use nom::sequence::{pair, preceded};
use nom::IResult;
use std::io::{Read, Seek};

use super::header::IptraceVersion;
use super::ift::ift_to_encapsulation;
use crate::cursor::ByteCursor;
use crate::encapsulation::{Encapsulation, MAX_PACKET_SIZE};
use crate::error::TraceError;
use crate::reader::ReaderOptions;
use crate::record::{
    AtmPseudoHeader, Direction, EthernetPseudoHeader, InterfaceInfo, PseudoHeader, TraceRecord,
};

/// Size of the header in front of each record
pub const IPTRACE_RECORD_HEADER_SIZE: usize = 8;

/// Number of padding bytes AIX puts in front of FDDI frames
pub const IPTRACE_FDDI_PADDING: u32 = 3;

/// iptrace record header
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IptraceRecordHeader {
    /// Size of the record data (packet information, padding and packet), without this header
    pub record_length: u32,
    /// Time stamp, in seconds since the Epoch. Only informational in version 2.0.
    pub ts_sec: u32,
}

/// Packet information, following the record header
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IptracePacketInfo<'a> {
    /// Interface unit number
    pub unit: u8,
    /// Interface name prefix, NUL-terminated if shorter than 4 bytes
    pub prefix: &'a [u8],
    /// Interface text. In version 2.0, for ATM, bytes 4-11 hold the "vpi.vci" numbers
    pub text: &'a [u8],
    /// SNMP ifType value
    pub if_type: u8,
    /// 0 = receive, 1 = transmit
    pub tx_flag: u8,
    /// Seconds and nanoseconds (version 2.0 only)
    pub timestamp: Option<(u32, u32)>,
}

impl<'a> IptracePacketInfo<'a> {
    /// Interface name prefix, without the NUL padding
    pub fn prefix_str(&self) -> String {
        String::from_utf8_lossy(until_nul(self.prefix)).into_owned()
    }
}

/// Read an iptrace record header
pub fn parse_iptrace_record_header(i: &[u8]) -> IResult<&[u8], IptraceRecordHeader> {
    let (i, record_length) = be_u32(i)?;
    let (i, ts_sec) = be_u32(i)?;
    let header = IptraceRecordHeader {
        record_length,
        ts_sec,
    };
    Ok((i, header))
}

/// Read the packet information block of an iptrace 1.0 record (22 bytes)
pub fn parse_iptrace_packet_info_v1(i: &[u8]) -> IResult<&[u8], IptracePacketInfo> {
    let (i, _unknown) = take(3usize)(i)?;
    let (i, unit) = be_u8(i)?;
    let (i, prefix) = take(4usize)(i)?;
    let (i, text) = take(12usize)(i)?;
    let (i, if_type) = be_u8(i)?;
    let (i, tx_flag) = be_u8(i)?;
    let info = IptracePacketInfo {
        unit,
        prefix,
        text,
        if_type,
        tx_flag,
        timestamp: None,
    };
    Ok((i, info))
}

/// Read the packet information block of an iptrace 2.0 record (32 bytes)
///
/// The first 22 bytes have the same layout as in version 1.0.
pub fn parse_iptrace_packet_info_v2(i: &[u8]) -> IResult<&[u8], IptracePacketInfo> {
    let (i, mut info) = parse_iptrace_packet_info_v1(i)?;
    let (i, _unknown) = take(2usize)(i)?;
    let (i, ts_sec) = be_u32(i)?;
    let (i, ts_nsec) = be_u32(i)?;
    info.timestamp = Some((ts_sec, ts_nsec));
    Ok((i, info))
}

/// Read the next iptrace record
///
/// Returns [`TraceError::Eof`] if the cursor is exactly at the end of the data.
pub fn read_iptrace_record<R>(
    cursor: &mut ByteCursor<R>,
    version: IptraceVersion,
    options: &ReaderOptions,
) -> Result<TraceRecord, TraceError>
where
    R: Read + Seek,
{
    let mut header = [0u8; IPTRACE_RECORD_HEADER_SIZE];
    if !cursor.read_exact_or_eof(&mut header)? {
        return Err(TraceError::Eof);
    }
    let (_, header) = parse_iptrace_record_header(&header)?;

    let pinfo_size = version.pinfo_size();
    if header.record_length < pinfo_size as u32 {
        return Err(TraceError::BadFile(format!(
            "iptrace: file has a {}-byte record, too small to have even a packet information header",
            header.record_length
        )));
    }

    let mut pinfo = [0u8; super::IPTRACE_2_0_PINFO_SIZE];
    let pinfo = &mut pinfo[..pinfo_size];
    cursor.read_exact(pinfo)?;
    let (_, info) = match version {
        IptraceVersion::V1_0 => parse_iptrace_packet_info_v1(pinfo)?,
        IptraceVersion::V2_0 => parse_iptrace_packet_info_v2(pinfo)?,
    };

    let encap = ift_to_encapsulation(info.if_type);
    if encap == Encapsulation::UNKNOWN {
        if options.strict_interface_types {
            return Err(TraceError::Unsupported(format!(
                "iptrace: interface type IFT=0x{:02x} unknown or unsupported",
                info.if_type
            )));
        }
        debug!(
            "iptrace: interface type IFT=0x{:02x} unknown, reading data without encapsulation",
            info.if_type
        );
    }

    let mut packet_size = header.record_length - pinfo_size as u32;
    if encap == Encapsulation::FDDI_BITSWAPPED {
        // the record length includes the padding
        if packet_size < IPTRACE_FDDI_PADDING {
            return Err(TraceError::BadFile(format!(
                "iptrace: file has a {}-byte record, too small to have even a packet meta-data header",
                header.record_length
            )));
        }
        packet_size -= IPTRACE_FDDI_PADDING;
        cursor.skip(IPTRACE_FDDI_PADDING as usize)?;
    }
    if packet_size > MAX_PACKET_SIZE {
        return Err(TraceError::BadFile(format!(
            "iptrace: File has {}-byte packet, bigger than maximum of {}",
            packet_size, MAX_PACKET_SIZE
        )));
    }

    let (ts_sec, ts_nsec) = info.timestamp.unwrap_or((header.ts_sec, 0));
    let pseudo_header = iptrace_pseudo_header(encap, &info);
    let interface = InterfaceInfo {
        if_type: info.if_type,
        unit: info.unit,
        prefix: info.prefix_str(),
        direction: Direction::from(info.tx_flag),
    };

    let data = cursor.read_vec(packet_size as usize)?;
    let mut record = TraceRecord {
        ts_sec,
        ts_nsec,
        ts_precision: version.ts_precision(),
        caplen: packet_size,
        origlen: packet_size,
        encap,
        pseudo_header,
        interface: Some(interface),
        data,
    };
    if encap == Encapsulation::ATM_PDUS {
        // guess the type of traffic, from the data and the VPI/VCI
        (options.atm_classifier)(&mut record);
    }
    Ok(record)
}

/// Build the pseudo-header from the packet information
///
/// iptrace does not say what type of traffic an ATM circuit carries. Only the VPI/VCI and the
/// channel can be extracted, everything else is left to a classifier.
pub fn iptrace_pseudo_header(encap: Encapsulation, info: &IptracePacketInfo) -> PseudoHeader {
    match encap {
        Encapsulation::ATM_PDUS => {
            let (vpi, vci) = parse_vpi_vci(info.text);
            PseudoHeader::Atm(AtmPseudoHeader {
                vpi,
                vci,
                // byte 13 of the text, which is also the transmit flag
                channel: info.tx_flag,
                ..AtmPseudoHeader::default()
            })
        }
        // no FCS in iptrace frames
        Encapsulation::ETHERNET => PseudoHeader::Ethernet(EthernetPseudoHeader { fcs_len: 0 }),
        _ => PseudoHeader::None,
    }
}

/// Extract the VPI and VCI from the "x.y" string in bytes 4-11 of the interface text
///
/// Returns `(0, 0)` if there is no dot in the string.
pub fn parse_vpi_vci(text: &[u8]) -> (u16, u16) {
    let window = until_nul(text.get(4..12).unwrap_or(&[]));
    match window.iter().position(|&b| b == b'.') {
        Some(dot) => {
            let vpi = decimal_prefix(&window[..dot]);
            let vci = decimal_prefix(&window[dot + 1..]);
            (vpi as u16, vci as u16)
        }
        None => (0, 0),
    }
}

// Leading decimal number, after optional spaces and '+'. 0 if there is none.
fn decimal_prefix(i: &[u8]) -> u32 {
    let res: IResult<&[u8], &[u8]> = preceded(pair(multispace0, opt(char('+'))), digit1)(i);
    match res {
        Ok((_, digits)) => digits.iter().fold(0u32, |acc, d| {
            acc.saturating_mul(10).saturating_add(u32::from(d - b'0'))
        }),
        Err(_) => 0,
    }
}

fn until_nul(s: &[u8]) -> &[u8] {
    match s.iter().position(|&b| b == 0) {
        Some(n) => &s[..n],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atm::{Aal, AtmTrafficType};
    use crate::encapsulation::TsPrecision;
    use hex_literal::hex;
    use std::io::Cursor;

    // iptrace 2.0 record: 32 bytes of packet information, 4 bytes of data
    // ATM interface "at0", text " at0 1.32\0", transmit
    pub const RECORD_V2_ATM: &[u8] = &hex!(
        "
00 00 00 24 11 22 33 44
00 00 00 00 61 74 00 00 20 20 20 20 31 2e 33 32
00 00 00 00 25 01 00 00 5f 5e 0f 00 00 00 03 e8
aa aa 03 00"
    );

    // iptrace 1.0 record: 22 bytes of packet information, 6 bytes of data
    // Ethernet interface "en1", receive
    pub const RECORD_V1_ETHER: &[u8] = &hex!(
        "
00 00 00 1c 5f 5e 0f 00
00 00 00 01 65 6e 00 00 00 00 00 00 00 00 00 00
00 00 00 00 06 00
01 02 03 04 05 06"
    );

    fn read_one(data: &[u8], version: IptraceVersion) -> Result<TraceRecord, TraceError> {
        let mut cursor = ByteCursor::new(64, Cursor::new(data)).expect("cursor");
        read_iptrace_record(&mut cursor, version, &ReaderOptions::default())
    }

    #[test]
    fn parse_packet_info() {
        let (rem, info) = parse_iptrace_packet_info_v2(&RECORD_V2_ATM[8..40]).expect("parse");
        assert!(rem.is_empty());
        assert_eq!(info.if_type, 0x25);
        assert_eq!(info.tx_flag, 1);
        assert_eq!(info.prefix_str(), "at");
        assert_eq!(info.timestamp, Some((0x5f5e_0f00, 1000)));
        let (_, info) = parse_iptrace_packet_info_v1(&RECORD_V1_ETHER[8..30]).expect("parse");
        assert_eq!(info.unit, 1);
        assert_eq!(info.timestamp, None);
    }

    #[test]
    fn read_v1_ethernet() {
        let rec = read_one(RECORD_V1_ETHER, IptraceVersion::V1_0).expect("read");
        assert_eq!(rec.ts_sec, 0x5f5e_0f00);
        assert_eq!(rec.ts_nsec, 0);
        assert_eq!(rec.ts_precision, TsPrecision::Seconds);
        assert_eq!(rec.caplen, 6);
        assert_eq!(rec.origlen, 6);
        assert_eq!(rec.encap, Encapsulation::ETHERNET);
        assert_eq!(
            rec.pseudo_header,
            PseudoHeader::Ethernet(EthernetPseudoHeader { fcs_len: 0 })
        );
        let interface = rec.interface.expect("interface");
        assert_eq!(interface.name(), "en1");
        assert_eq!(interface.direction, Direction::Received);
        assert_eq!(rec.data, &[1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn read_v2_atm() {
        let rec = read_one(RECORD_V2_ATM, IptraceVersion::V2_0).expect("read");
        // timestamp from the packet information, not the header
        assert_eq!(rec.ts_sec, 0x5f5e_0f00);
        assert_eq!(rec.ts_nsec, 1000);
        assert_eq!(rec.ts_precision, TsPrecision::Nanoseconds);
        assert_eq!(rec.encap, Encapsulation::ATM_PDUS);
        let atm = rec.atm().expect("atm pseudo-header");
        assert_eq!(atm.vpi, 1);
        assert_eq!(atm.vci, 32);
        assert_eq!(atm.channel, 1);
        assert_eq!(atm.cells, 0);
        assert_eq!(atm.aal5t_chksum, 0);
        // set by the default classifier
        assert_eq!(atm.aal, Aal::Aal5);
        assert_eq!(atm.traffic_type, AtmTrafficType::LlcMultiplexed);
    }

    #[test]
    fn record_too_small() {
        let mut data = RECORD_V1_ETHER.to_vec();
        data[3] = 21;
        match read_one(&data, IptraceVersion::V1_0) {
            Err(TraceError::BadFile(msg)) => assert!(msg.contains("21-byte record")),
            r => panic!("unexpected result {:?}", r),
        }
        // valid for 1.0 (28 >= 22), too small for 2.0
        match read_one(RECORD_V1_ETHER, IptraceVersion::V2_0) {
            Err(TraceError::BadFile(msg)) => assert!(msg.contains("28-byte record")),
            r => panic!("unexpected result {:?}", r),
        }
    }

    #[test]
    fn fddi_padding() {
        let mut data = RECORD_V1_ETHER.to_vec();
        data[28] = 0x0f;
        let rec = read_one(&data, IptraceVersion::V1_0).expect("read");
        assert_eq!(rec.encap, Encapsulation::FDDI_BITSWAPPED);
        assert_eq!(rec.caplen, 3);
        assert_eq!(rec.data, &[4, 5, 6]);
        assert_eq!(rec.pseudo_header, PseudoHeader::None);

        // 23-byte record: 1 byte left after the packet information, no room for padding
        let mut data = data[..31].to_vec();
        data[3] = 23;
        match read_one(&data, IptraceVersion::V1_0) {
            Err(TraceError::BadFile(msg)) => assert!(msg.contains("meta-data")),
            r => panic!("unexpected result {:?}", r),
        }
    }

    #[test]
    fn packet_too_big() {
        let mut data = RECORD_V1_ETHER.to_vec();
        data[..4].copy_from_slice(&(MAX_PACKET_SIZE + 23).to_be_bytes());
        match read_one(&data, IptraceVersion::V1_0) {
            Err(TraceError::BadFile(msg)) => assert!(msg.contains("bigger than maximum")),
            r => panic!("unexpected result {:?}", r),
        }
    }

    #[test]
    fn unknown_interface_type() {
        let mut data = RECORD_V1_ETHER.to_vec();
        data[28] = 0x01;
        let rec = read_one(&data, IptraceVersion::V1_0).expect("read");
        assert_eq!(rec.encap, Encapsulation::UNKNOWN);
        assert_eq!(rec.data.len(), 6);

        let mut cursor = ByteCursor::new(64, Cursor::new(&data[..])).expect("cursor");
        let options = ReaderOptions::default().strict_interface_types(true);
        match read_iptrace_record(&mut cursor, IptraceVersion::V1_0, &options) {
            Err(TraceError::Unsupported(msg)) => assert!(msg.contains("IFT=0x01")),
            r => panic!("unexpected result {:?}", r),
        }
    }

    #[test]
    fn truncated_record() {
        assert!(matches!(
            read_one(&RECORD_V1_ETHER[..32], IptraceVersion::V1_0),
            Err(TraceError::UnexpectedEof { .. })
        ));
        assert!(matches!(
            read_one(&RECORD_V1_ETHER[..4], IptraceVersion::V1_0),
            Err(TraceError::UnexpectedEof { .. })
        ));
        assert!(matches!(
            read_one(&[], IptraceVersion::V1_0),
            Err(TraceError::Eof)
        ));
    }

    #[test]
    fn vpi_vci() {
        assert_eq!(parse_vpi_vci(b"    1.32\0\0\0\0"), (1, 32));
        assert_eq!(parse_vpi_vci(b"at0 +0.105  "), (0, 105));
        assert_eq!(parse_vpi_vci(b"at0 0\0.5    "), (0, 0));
        assert_eq!(parse_vpi_vci(b"at0 abc.5   "), (0, 5));
        assert_eq!(parse_vpi_vci(b"short"), (0, 0));
    }
}
