//! Incremental decoder for the chat response stream.
//!
//! Network stacks do not respect record boundaries: one chunk may hold half a
//! record, several records, or end in the middle of a multi-byte character.
//! The decoder keeps the raw bytes and only hands out records that are fully
//! buffered. Records may be separated by newlines, other whitespace, or
//! nothing at all.

use log::debug;

use super::backend::TransportError;
use super::types::StreamRecord;

#[derive(Debug, Default)]
pub struct RecordDecoder {
    buffer: Vec<u8>,
}

impl RecordDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one chunk and returns every record it completed, in order.
    pub fn push(&mut self, chunk: &[u8]) -> Result<Vec<StreamRecord>, TransportError> {
        self.buffer.extend_from_slice(chunk);

        let mut records = Vec::new();
        let mut stream =
            serde_json::Deserializer::from_slice(&self.buffer).into_iter::<StreamRecord>();
        loop {
            match stream.next() {
                Some(Ok(record)) => records.push(record),
                // Incomplete trailing record: wait for more bytes.
                Some(Err(e)) if e.is_eof() => break,
                Some(Err(e)) => return Err(TransportError::Parse(e.to_string())),
                None => break,
            }
        }
        let consumed = stream.byte_offset();
        self.buffer.drain(..consumed);

        if self.pending() > 0 {
            debug!("Decoder holding {} bytes of a partial record", self.pending());
        }
        Ok(records)
    }

    /// Bytes received but not yet part of a complete record.
    fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Called once the byte source is exhausted. Leftover bytes mean the
    /// stream was cut inside a record.
    pub fn finish(self) -> Result<(), TransportError> {
        if self.buffer.iter().all(u8::is_ascii_whitespace) {
            Ok(())
        } else {
            Err(TransportError::Parse(format!(
                "stream ended inside a record ({} bytes pending)",
                self.pending()
            )))
        }
    }
}
