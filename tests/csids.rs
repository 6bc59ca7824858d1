use iptrace_parser::*;

fn record(ts_sec: u32, data: &[u8]) -> Vec<u8> {
    let mut v = Vec::new();
    v.extend_from_slice(&ts_sec.to_be_bytes());
    v.extend_from_slice(&[0, 0]);
    v.extend_from_slice(&(data.len() as u16).to_be_bytes());
    v.extend_from_slice(data);
    v
}

// IPv4 header start: version/IHL, TOS, total length, identification
fn ip_packet(len: u16, swapped: bool) -> Vec<u8> {
    let mut v = vec![0u8; usize::from(len)];
    v[0] = 0x45;
    let (total_length, id) = if swapped {
        (len.to_le_bytes(), 0x1234u16.to_le_bytes())
    } else {
        (len.to_be_bytes(), 0x1234u16.to_be_bytes())
    };
    v[2..4].copy_from_slice(&total_length);
    v[4..6].copy_from_slice(&id);
    v
}

#[test]
fn test_csids_native() {
    let mut data = record(10, &ip_packet(40, false));
    data.extend(record(11, &ip_packet(20, false)));
    let mut reader = TraceReader::from_slice(&data).expect("open");
    assert_eq!(reader.file_type_name(), "CSIDS IPLog");
    assert_eq!(reader.decoder(), RecordDecoder::Csids { byteswapped: false });
    // known from the start
    assert_eq!(reader.file_encapsulation(), Encapsulation::RAW_IP);

    let (offset, rec) = reader.read_next().expect("first record");
    assert_eq!(offset, 0);
    assert_eq!(rec.ts_sec, 10);
    assert_eq!(rec.caplen, 40);
    assert_eq!(rec.origlen, 40);
    assert_eq!(rec.encap, Encapsulation::RAW_IP);
    assert_eq!(rec.data, ip_packet(40, false));
    assert!(rec.interface.is_none());

    let (offset, rec) = reader.read_next().expect("second record");
    assert_eq!(offset, 48);
    assert_eq!(rec.data[2..4], [0, 20]);
    assert!(matches!(reader.read_next(), Err(TraceError::Eof)));
    assert_eq!(reader.file_encapsulation(), Encapsulation::RAW_IP);
}

#[test]
fn test_csids_byteswapped() {
    let mut data = record(10, &ip_packet(40, true));
    data.extend(record(11, &ip_packet(1000, true)));
    let mut reader = TraceReader::from_slice(&data).expect("open");
    assert!(reader.decoder().is_byteswapped());

    let (_, rec) = reader.read_next().expect("first record");
    // first three words corrected, so the packet reads as big-endian
    assert_eq!(rec.data[..6], [0x00, 0x45, 0x00, 40, 0x12, 0x34]);
    let (offset, rec) = reader.read_next().expect("second record");
    assert_eq!(rec.data[2..4], [0x03, 0xe8]);

    // same correction on random reads
    let again = reader.seek_and_read(offset).expect("seek_and_read");
    assert_eq!(again, rec);
}

#[test]
fn test_csids_short_packets() {
    // one byte: nothing to swap, caplen 1 still matches the probe on the first record
    let mut data = record(10, &ip_packet(40, true));
    data.extend(record(11, &[0xab]));
    data.extend(record(12, &[]));
    let records: Vec<_> = TraceReader::from_slice(&data)
        .expect("open")
        .map(|r| r.expect("record").1)
        .collect();
    assert_eq!(records.len(), 3);
    assert_eq!(records[1].data, &[0xab]);
    assert!(records[2].data.is_empty());
}

#[test]
fn test_csids_not_recognized() {
    let mut data = record(10, &ip_packet(40, false));
    // reserved field
    data[5] = 1;
    assert!(matches!(
        TraceReader::from_slice(&data),
        Err(TraceError::NotRecognized)
    ));
}
