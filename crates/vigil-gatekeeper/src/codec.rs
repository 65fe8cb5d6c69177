//! MessagePack storage for measurement windows.
//!
//! Each measurement is a two-element array `[timestamp, value]` with compact
//! integer encoding; a series is the plain concatenation of its tuples, so
//! appending never rewrites existing bytes.

use std::io::Cursor;

use serde::Deserialize;
use thiserror::Error;
use vigil_core::Measurement;

/// Marker byte of a fixarray holding exactly two elements.
const TUPLE_MARKER: u8 = 0x92;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("expected a 2-element tuple at offset {offset}, found marker {marker:#04x}")]
    BadTupleLength { offset: usize, marker: u8 },
    #[error("failed to encode tuple: {0}")]
    Encode(#[from] rmp_serde::encode::Error),
    #[error("failed to decode tuple: {0}")]
    Decode(#[from] rmp_serde::decode::Error),
}

/// Append one `[timestamp, value]` tuple to `buf`.
pub fn encode_tuple(buf: &mut Vec<u8>, measurement: &Measurement) -> Result<(), CodecError> {
    rmp_serde::encode::write(buf, &(measurement.timestamp, measurement.value))?;
    Ok(())
}

/// Decode every tuple in `bytes`, in stored order.
pub fn decode_all(bytes: &[u8]) -> Result<Vec<Measurement>, CodecError> {
    let mut cursor = Cursor::new(bytes);
    let mut out = Vec::new();

    while (cursor.position() as usize) < bytes.len() {
        let offset = cursor.position() as usize;
        let marker = bytes[offset];
        if marker != TUPLE_MARKER {
            return Err(CodecError::BadTupleLength { offset, marker });
        }
        let mut de = rmp_serde::Deserializer::new(&mut cursor);
        let (timestamp, value) = <(i64, f64)>::deserialize(&mut de)?;
        out.push(Measurement::new(timestamp, value));
    }

    Ok(out)
}

/// Re-encode `bytes` keeping only the most recent `max_len` tuples.
pub fn trim(bytes: &[u8], max_len: usize) -> Result<Vec<u8>, CodecError> {
    let decoded = decode_all(bytes)?;
    let skip = decoded.len().saturating_sub(max_len);

    let mut out = Vec::with_capacity(bytes.len());
    for measurement in &decoded[skip..] {
        encode_tuple(&mut out, measurement)?;
    }
    Ok(out)
}
