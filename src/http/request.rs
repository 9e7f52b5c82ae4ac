//! Request interpretation module
//!
//! Turns raw request text into a [`Request`]: method, resolved filesystem path and
//! the outcome of the `If-Modified-Since` header. No other headers are read and the
//! request line is not validated.

use super::date::{parse_wire_date, DateParseError};
use crate::logger;
use chrono::{DateTime, Utc};
use std::path::PathBuf;

const CONDITIONAL_MARKER: &str = "If-Modified-Since:";
const INDEX_FILE: &str = "index.html";

/// Outcome of `If-Modified-Since` interpretation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conditional {
    /// No conditional header was sent
    Absent,
    /// Header parsed successfully
    Since(DateTime<Utc>),
    /// Header present but unparsable - answered with 400
    Malformed,
}

impl From<Result<DateTime<Utc>, DateParseError>> for Conditional {
    fn from(parsed: Result<DateTime<Utc>, DateParseError>) -> Self {
        parsed.map_or(Self::Malformed, Self::Since)
    }
}

/// Structured request, built once per connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    method: String,
    target: Option<String>,
    resolved_path: Option<PathBuf>,
    conditional: Conditional,
}

impl Request {
    /// Interpret `raw` against `root_dir`
    ///
    /// The path is plain string concatenation of `root_dir` and the request target,
    /// so `..` segments are passed through untouched.
    pub fn parse(raw: &str, root_dir: &str) -> Self {
        let mut tokens = raw.split_whitespace();

        let method = tokens.next().map(str::to_ascii_uppercase).unwrap_or_default();
        let target = tokens.next().map(ToString::to_string);
        let resolved_path = target.as_deref().map(|t| resolve_path(root_dir, t));

        let mut conditional = Conditional::Absent;
        while let Some(token) = tokens.next() {
            if token.eq_ignore_ascii_case(CONDITIONAL_MARKER) {
                let value = collect_date_value(&mut tokens);
                conditional = parse_wire_date(&value)
                    .inspect_err(|e| {
                        logger::log_warning(&format!("Malformed If-Modified-Since '{value}': {e}"));
                    })
                    .into();
                break;
            }
        }

        Self {
            method,
            target,
            resolved_path,
            conditional,
        }
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    /// Request target as sent by the client, before joining with the root
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    pub const fn resolved_path(&self) -> Option<&PathBuf> {
        self.resolved_path.as_ref()
    }

    pub const fn conditional(&self) -> &Conditional {
        &self.conditional
    }

    pub fn is_get(&self) -> bool {
        self.method == "GET"
    }

    pub fn is_head(&self) -> bool {
        self.method == "HEAD"
    }

    pub const fn malformed_date(&self) -> bool {
        matches!(self.conditional, Conditional::Malformed)
    }
}

fn resolve_path(root_dir: &str, target: &str) -> PathBuf {
    let mut path = format!("{root_dir}{target}");
    if path.ends_with('/') {
        path.push_str(INDEX_FILE);
    }
    PathBuf::from(path)
}

/// Join tokens with single spaces up to and including the first year token
fn collect_date_value<'a>(tokens: &mut impl Iterator<Item = &'a str>) -> String {
    let mut parts = Vec::new();
    for token in tokens {
        parts.push(token);
        if is_year(token) {
            break;
        }
    }
    parts.join(" ")
}

fn is_year(token: &str) -> bool {
    token.len() == 4 && token.bytes().all(|b| b.is_ascii_digit())
}
