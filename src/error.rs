use std::io;
use thiserror::Error;

/// Errors returned while opening a capture or reading its records
#[derive(Debug, Error)]
pub enum TraceError {
    /// No more records: the stream ended cleanly on a record boundary
    #[error("end of file")]
    Eof,
    /// The stream does not match any known capture format
    #[error("header not recognized")]
    NotRecognized,
    /// The stream ended in the middle of a record
    #[error("unexpected end of file at offset {offset}: needed {needed} bytes, got {available}")]
    UnexpectedEof {
        offset: u64,
        needed: usize,
        available: usize,
    },
    /// The capture is structurally inconsistent
    #[error("bad file: {0}")]
    BadFile(String),
    /// The record is valid, but uses a feature this reader was told to refuse
    #[error("unsupported: {0}")]
    Unsupported(String),
    /// Error from the underlying reader
    #[error("read error: {0}")]
    Io(#[from] io::Error),
}

impl TraceError {
    /// Returns true if this error only signals the end of the records
    #[inline]
    pub fn is_eof(&self) -> bool {
        matches!(self, TraceError::Eof)
    }
}

// Parsers only run on buffers of the exact size, so any nom error is a format error
impl<I> From<nom::Err<nom::error::Error<I>>> for TraceError {
    fn from(e: nom::Err<nom::error::Error<I>>) -> Self {
        match e {
            nom::Err::Incomplete(_) => TraceError::BadFile("incomplete data".to_owned()),
            nom::Err::Error(e) | nom::Err::Failure(e) => {
                TraceError::BadFile(format!("parse error: {:?}", e.code))
            }
        }
    }
}
