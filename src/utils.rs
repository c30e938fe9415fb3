//! Shared helpers for the key tools

use json_comments::StripComments;

use crate::error::{JwksError, Result};

/// Current time as a numeric Unix timestamp, in seconds
pub fn now_unix() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Parse a JSON-with-comments document
///
/// Key files are JSONC: `//` and `/* */` comments are allowed anywhere
/// whitespace is. Comments are stripped before handing the text to the
/// JSON parser.
pub fn parse_jsonc(text: &str) -> Result<serde_json::Value> {
    let stripped = StripComments::new(text.as_bytes());
    serde_json::from_reader(stripped).map_err(|e| JwksError::parse(e.to_string()))
}
