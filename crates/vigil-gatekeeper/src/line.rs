//! Graphite plaintext protocol: `<name> <value> <timestamp>\n`.

use thiserror::Error;
use vigil_core::Measurement;

#[derive(Debug, Clone, PartialEq)]
pub struct MetricSample {
    pub name: String,
    pub measurement: Measurement,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LineError {
    #[error("line is missing the {0} field")]
    MissingField(&'static str),
    #[error("invalid value {0:?}")]
    BadValue(String),
    #[error("invalid timestamp {0:?}")]
    BadTimestamp(String),
    #[error("datagram is not valid UTF-8")]
    NotUtf8,
}

/// Parse one line. Fields beyond the third are ignored.
pub fn parse_line(line: &str) -> Result<MetricSample, LineError> {
    let mut fields = line.split_whitespace();
    let name = fields.next().ok_or(LineError::MissingField("name"))?;
    let raw_value = fields.next().ok_or(LineError::MissingField("value"))?;
    let raw_timestamp = fields.next().ok_or(LineError::MissingField("timestamp"))?;

    let value: f64 = raw_value
        .parse()
        .map_err(|_| LineError::BadValue(raw_value.to_string()))?;
    let timestamp: i64 = raw_timestamp
        .parse()
        .map_err(|_| LineError::BadTimestamp(raw_timestamp.to_string()))?;

    Ok(MetricSample {
        name: name.to_string(),
        measurement: Measurement::new(timestamp, value),
    })
}

/// Parse every non-blank line of a datagram.
pub fn parse_datagram(datagram: &[u8]) -> Vec<Result<MetricSample, LineError>> {
    let Ok(text) = std::str::from_utf8(datagram) else {
        return vec![Err(LineError::NotUtf8)];
    };
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(parse_line)
        .collect()
}
