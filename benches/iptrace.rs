use criterion::{criterion_group, criterion_main, Criterion};
use iptrace_parser::uintvar::parse_uintvar;
use iptrace_parser::TraceReader;

// iptrace 2.0 capture with `count` Ethernet records
fn iptrace_capture(count: usize) -> Vec<u8> {
    let mut v = b"iptrace 2.0".to_vec();
    for n in 0..count {
        let len = 60 + (n % 1400);
        v.extend_from_slice(&((32 + len) as u32).to_be_bytes());
        v.extend_from_slice(&(n as u32).to_be_bytes());
        let mut pinfo = [0u8; 32];
        pinfo[4..6].copy_from_slice(b"en");
        pinfo[20] = 0x06;
        pinfo[24..28].copy_from_slice(&(n as u32).to_be_bytes());
        v.extend_from_slice(&pinfo);
        v.resize(v.len() + len, 0x5a);
    }
    v
}

fn csids_capture(count: usize) -> Vec<u8> {
    let mut v = Vec::new();
    for n in 0..count {
        let len = 40 + (n % 1400) as u16;
        v.extend_from_slice(&(n as u32).to_be_bytes());
        v.extend_from_slice(&[0, 0]);
        v.extend_from_slice(&len.to_be_bytes());
        let mut packet = vec![0u8; usize::from(len)];
        packet[0] = 0x45;
        packet[2..4].copy_from_slice(&len.to_le_bytes());
        v.extend_from_slice(&packet);
    }
    v
}

fn bench_read_iptrace(c: &mut Criterion) {
    let bytes = iptrace_capture(1000);
    c.bench_function("read iptrace 2.0", |b| {
        b.iter(|| {
            let reader = TraceReader::from_slice(&bytes).expect("open");
            reader.filter_map(Result::ok).count()
        })
    });
}

fn bench_read_csids(c: &mut Criterion) {
    let bytes = csids_capture(1000);
    c.bench_function("read csids byteswapped", |b| {
        b.iter(|| {
            let reader = TraceReader::from_slice(&bytes).expect("open");
            reader.filter_map(Result::ok).count()
        })
    });
}

fn bench_uintvar(c: &mut Criterion) {
    let bytes = [0x8f, 0xff, 0xff, 0x7f];
    c.bench_function("parse_uintvar 4 octets", |b| b.iter(|| parse_uintvar(&bytes)));
}

criterion_group!(benches, bench_read_iptrace, bench_read_csids, bench_uintvar);
criterion_main!(benches);
