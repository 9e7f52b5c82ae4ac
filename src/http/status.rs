//! Response status codes
//!
//! The server answers with exactly one of five statuses.

use std::fmt;

/// Closed set of statuses the resolver can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// 200 - resource found and (for GET) streamed
    Ok,
    /// 304 - `If-Modified-Since` is later than the resource
    NotModified,
    /// 400 - `If-Modified-Since` could not be parsed
    BadRequest,
    /// 404 - missing path or not a regular file
    NotFound,
    /// 501 - any method other than GET and HEAD
    NotImplemented,
}

impl Status {
    pub const fn code(self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::NotModified => 304,
            Self::BadRequest => 400,
            Self::NotFound => 404,
            Self::NotImplemented => 501,
        }
    }

    pub const fn reason(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::NotModified => "Not Modified",
            Self::BadRequest => "Bad Request",
            Self::NotFound => "Not Found",
            Self::NotImplemented => "Not Implemented",
        }
    }

    /// Plain-text body written after the header block, if any
    pub const fn error_text(self) -> Option<&'static str> {
        match self {
            Self::NotModified => Some("Error 304: Not modified"),
            Self::BadRequest => Some("Error 400: Bad request"),
            Self::NotFound => Some("Error 404: File not found"),
            Self::Ok | Self::NotImplemented => None,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code(), self.reason())
    }
}
