use iptrace_parser::*;
use std::collections::BTreeMap;
use std::env;
use std::error::Error;

fn main() {
    for arg in env::args().skip(1) {
        if let Err(e) = print_trace_info(&arg) {
            eprintln!("{}: {}", arg, e);
        }
    }
}

fn print_trace_info(arg: &str) -> Result<(), Box<dyn Error>> {
    println!("Name: {}", arg);

    let reader = TraceReader::from_path(arg, ReaderOptions::default())?;
    println!("\tformat: {}", reader.file_type_name());
    if let RecordDecoder::Csids { byteswapped } = reader.decoder() {
        println!("\tbyteswapped: {}", byteswapped);
    }
    let precision = reader.ts_precision();

    let mut num_records = 0;
    let mut interfaces = BTreeMap::new();
    let mut first_last = None;
    let mut reader = reader;
    for res in &mut reader {
        let (_, record) = res?;
        num_records += 1;
        if let Some(interface) = &record.interface {
            *interfaces
                .entry((interface.name(), record.encap.to_string()))
                .or_insert(0) += 1;
        }
        let ts = record.ts_f64();
        first_last = match first_last {
            None => Some((ts, ts)),
            Some((first, _)) => Some((first, ts)),
        };
    }

    println!("\tnum_records: {}", num_records);
    println!("\tencapsulation: {}", reader.file_encapsulation());
    println!(
        "\ttimestamp precision: 1/{}s",
        precision.units_per_second()
    );
    if let Some((first, last)) = first_last {
        println!("\tfirst record: {:.9}", first);
        println!("\tlast record: {:.9}", last);
    }
    for ((name, encap), count) in &interfaces {
        println!("\t\tinterface {} ({}): {} records", name, encap, count);
    }

    Ok(())
}
