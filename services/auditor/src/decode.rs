//! # Record Stream Decoding
//!
//! Splits an input byte stream into top-level JSON objects and decodes each
//! one into a [`Record`].
//!
//! ## Accepted Layouts
//!
//! ```text
//! [ {..}, {..}, ... ]        top-level array
//! {..}\n{..}\n...            newline delimited
//! {..}{..} [ {..} ] {..}     any mix of the two
//! ```
//!
//! Framing only tracks brace depth and string state, so a malformed object
//! does not poison the objects around it. Bytes outside objects (whitespace,
//! brackets, commas, stray scalars) are ignored.

use crate::error::{AuditError, Result};
use audit_types::{Record, RecordPosition};
use std::io::{self, BufRead};

/// One framed top-level object, not yet decoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawObject {
    /// 1-based ordinal of the object in the stream
    pub position: RecordPosition,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Default)]
struct ScanState {
    depth: usize,
    in_string: bool,
    escaped: bool,
}

impl ScanState {
    /// Advance over one byte; returns whether the byte belongs to an object
    /// and whether it closed one
    fn feed(&mut self, byte: u8) -> (bool, bool) {
        let inside = self.depth > 0;

        if self.in_string {
            if self.escaped {
                self.escaped = false;
            } else if byte == b'\\' {
                self.escaped = true;
            } else if byte == b'"' {
                self.in_string = false;
            }
            return (inside, false);
        }

        match byte {
            b'"' => {
                self.in_string = true;
                (inside, false)
            }
            b'{' => {
                self.depth += 1;
                (true, false)
            }
            b'}' if inside => {
                self.depth -= 1;
                (true, self.depth == 0)
            }
            _ => (inside, false),
        }
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Iterator over the top-level objects of a buffered JSON stream
pub struct ObjectFramer<R> {
    reader: R,
    state: ScanState,
    current: Vec<u8>,
    next_position: u64,
    finished: bool,
}

impl<R: BufRead> ObjectFramer<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            state: ScanState::default(),
            current: Vec::new(),
            next_position: 1,
            finished: false,
        }
    }

    fn take_object(&mut self) -> RawObject {
        let position = RecordPosition::new(self.next_position);
        self.next_position += 1;
        RawObject {
            position,
            bytes: std::mem::take(&mut self.current),
        }
    }
}

impl<R: BufRead> Iterator for ObjectFramer<R> {
    type Item = io::Result<RawObject>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            let available = match self.reader.fill_buf() {
                Ok(available) => available,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e));
                }
            };

            if available.is_empty() {
                self.finished = true;
                // Unterminated trailing object is still handed to the decoder
                if self.state.depth > 0 {
                    self.state.reset();
                    return Some(Ok(self.take_object()));
                }
                return None;
            }

            let mut consumed = 0;
            let mut closed = false;
            for &byte in available {
                consumed += 1;
                let (inside, closes) = self.state.feed(byte);
                if inside {
                    self.current.push(byte);
                }
                if closes {
                    closed = true;
                    break;
                }
            }

            self.reader.consume(consumed);
            if closed {
                return Some(Ok(self.take_object()));
            }
        }
    }
}

/// Decode one framed object into a record
pub fn decode_record(raw: &RawObject) -> Result<Record> {
    Record::from_json_slice(&raw.bytes).map_err(|source| AuditError::Decode {
        position: raw.position,
        source,
    })
}
