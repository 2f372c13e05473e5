//! JSON Lines reader
//!
//! Streams one JSON object per line out of any `BufRead`. The reader is a
//! single-pass iterator: it owns its input and releases it when dropped.

use super::error::{JsonError, JsonResult};
use crate::core::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;
use tracing::warn;

/// A decoded record, keys kept in file order.
pub type Record = Map<String, JsonValue>;

/// What to do with a line that is not a valid JSON object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LinePolicy {
    /// Fail the read at the first invalid line.
    #[default]
    Strict,
    /// Log and skip invalid lines; they do not consume a row identifier.
    SkipInvalid,
}

pub struct JsonLinesReader<R> {
    reader: R,
    buffer: String,
    line_number: usize,
    policy: LinePolicy,
    done: bool,
}

impl JsonLinesReader<BufReader<File>> {
    pub fn open(path: impl AsRef<Path>, policy: LinePolicy) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file), policy))
    }
}

impl<R: BufRead> JsonLinesReader<R> {
    pub fn new(reader: R, policy: LinePolicy) -> Self {
        Self {
            reader,
            buffer: String::new(),
            line_number: 0,
            policy,
            done: false,
        }
    }
}

impl<R: BufRead> Iterator for JsonLinesReader<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            self.buffer.clear();
            let parsed = match self.reader.read_line(&mut self.buffer) {
                Ok(0) => {
                    self.done = true;
                    continue;
                }
                Ok(_) => {
                    self.line_number += 1;
                    let mut text = self.buffer.trim();
                    if self.line_number == 1 {
                        text = text.trim_start_matches('\u{feff}');
                    }
                    if text.is_empty() {
                        continue;
                    }
                    parse_record(text, self.line_number)
                }
                // The offending line has already been consumed
                Err(err) if err.kind() == ErrorKind::InvalidData => {
                    self.line_number += 1;
                    Err(JsonError::Parse {
                        line: self.line_number,
                        message: err.to_string(),
                    })
                }
                Err(err) => {
                    self.done = true;
                    return Some(Err(err.into()));
                }
            };

            match parsed {
                Ok(record) => return Some(Ok(record)),
                Err(err) if self.policy == LinePolicy::SkipInvalid => {
                    warn!(line = self.line_number, error = %err, "Skipping invalid JSON Lines record");
                }
                Err(err) => {
                    self.done = true;
                    return Some(Err(err.into()));
                }
            }
        }
        None
    }
}

/// Decode one line into a record. Only JSON objects are records.
pub fn parse_record(text: &str, line: usize) -> JsonResult<Record> {
    let value: JsonValue = serde_json::from_str(text).map_err(|e| JsonError::Parse {
        line,
        message: e.to_string(),
    })?;

    match value {
        JsonValue::Object(map) => Ok(map),
        other => Err(JsonError::InvalidStructure {
            line,
            message: format!("expected a JSON object, found {}", json_kind(&other)),
        }),
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::JsonlError;
    use serde_json::json;
    use std::io::Cursor;

    fn read_all(input: &str, policy: LinePolicy) -> Vec<Result<Record>> {
        JsonLinesReader::new(Cursor::new(input.to_string()), policy).collect()
    }

    #[test]
    fn test_reads_records_in_order() {
        let records: Vec<Record> = read_all("{\"a\": 1}\n{\"a\": 2}", LinePolicy::Strict)
            .into_iter()
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[1]["a"], json!(2));
    }

    #[test]
    fn test_preserves_key_order() {
        let records = read_all("{\"z\": 1, \"a\": 2, \"m\": 3}\n", LinePolicy::Strict);
        let record = records[0].as_ref().unwrap();
        let keys: Vec<&str> = record.keys().map(String::as_str).collect();
        assert_eq!(keys, ["z", "a", "m"]);
    }

    #[test]
    fn test_skips_blank_lines_and_crlf() {
        let records = read_all("\n{\"a\": 1}\r\n   \n{\"a\": 2}\r\n\n", LinePolicy::Strict);
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.is_ok()));
    }

    #[test]
    fn test_strict_policy_stops_at_malformed_line() {
        let records = read_all("{\"a\": 1}\n{oops\n{\"a\": 3}\n", LinePolicy::Strict);

        assert_eq!(records.len(), 2);
        match &records[1] {
            Err(JsonlError::Json(JsonError::Parse { line, .. })) => assert_eq!(*line, 2),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_non_object_line_is_invalid() {
        let records = read_all("[1, 2]\n", LinePolicy::Strict);
        assert!(matches!(
            records[0],
            Err(JsonlError::Json(JsonError::InvalidStructure { line: 1, .. }))
        ));
    }

    #[test]
    fn test_skip_invalid_policy() {
        let records = read_all("{\"a\": 1}\nnot json\n42\n{\"a\": 3}\n", LinePolicy::SkipInvalid);

        assert_eq!(records.len(), 2);
        assert_eq!(records[1].as_ref().unwrap()["a"], json!(3));
    }

    #[test]
    fn test_invalid_utf8_reports_line() {
        let input = b"{\"a\": 1}\n{\"a\": \"\xff\"}\n{\"a\": 3}\n".to_vec();

        let strict: Vec<Result<Record>> =
            JsonLinesReader::new(Cursor::new(input.clone()), LinePolicy::Strict).collect();
        assert_eq!(strict.len(), 2);
        assert!(matches!(
            strict[1],
            Err(JsonlError::Json(JsonError::Parse { line: 2, .. }))
        ));

        let skipped: Vec<Record> = JsonLinesReader::new(Cursor::new(input), LinePolicy::SkipInvalid)
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(skipped.len(), 2);
        assert_eq!(skipped[1]["a"], json!(3));
    }
}
