//! HTTP response module
//!
//! Holds the resolved response and serializes its status line and header block.
//! Each status emits its own fixed set of lines:
//!
//! | Status | After the status line                                        |
//! |--------|--------------------------------------------------------------|
//! | 200    | Date, Server, Last-Modified, Content-Length, blank line      |
//! | 304    | Date, blank line, `Error 304: Not modified`                  |
//! | 404    | Date, Server, blank line, `Error 404: File not found`        |
//! | 501    | blank line, the status line again                            |
//! | 400    | blank line, `Error 400: Bad request`                         |

use super::Status;
use std::fmt::Write;

pub const HTTP_VERSION: &str = "HTTP/1.1";
const CRLF: &str = "\r\n";

/// Resolved response; `B` is the open body stream of a GET 200
#[derive(Debug)]
pub struct Response<B> {
    status: Status,
    server_date: String,
    server_name: String,
    last_modified: Option<String>,
    content_length: u64,
    body: Option<B>,
}

impl<B> Response<B> {
    /// Response without resource headers or body (304, 400, 404, 501)
    pub fn error(status: Status, server_date: String, server_name: &str) -> Self {
        Self {
            status,
            server_date,
            server_name: server_name.to_string(),
            last_modified: None,
            content_length: 0,
            body: None,
        }
    }

    /// 200 response; `body` is `None` for HEAD
    pub fn ok(
        server_date: String,
        server_name: &str,
        last_modified: String,
        content_length: u64,
        body: Option<B>,
    ) -> Self {
        Self {
            status: Status::Ok,
            server_date,
            server_name: server_name.to_string(),
            last_modified: Some(last_modified),
            content_length,
            body,
        }
    }

    pub const fn status(&self) -> Status {
        self.status
    }

    #[cfg(test)]
    pub fn server_date(&self) -> &str {
        &self.server_date
    }

    #[cfg(test)]
    pub fn last_modified(&self) -> Option<&str> {
        self.last_modified.as_deref()
    }

    pub const fn content_length(&self) -> u64 {
        self.content_length
    }

    pub const fn has_body(&self) -> bool {
        self.body.is_some()
    }

    /// Hand the body stream to the caller, who drains and drops it
    pub fn take_body(&mut self) -> Option<B> {
        self.body.take()
    }

    fn status_line(&self) -> String {
        format!(
            "{HTTP_VERSION} {} {}{CRLF}",
            self.status.code(),
            self.status.reason()
        )
    }

    /// Serialize the status line and header block (plus any fixed error text)
    pub fn head_bytes(&self) -> Vec<u8> {
        let mut out = self.status_line();

        match self.status {
            Status::Ok => {
                push_header(&mut out, "Date", &self.server_date);
                push_header(&mut out, "Server", &self.server_name);
                push_header(
                    &mut out,
                    "Last-Modified",
                    self.last_modified.as_deref().unwrap_or_default(),
                );
                push_header(&mut out, "Content-Length", self.content_length);
                out.push_str(CRLF);
            }
            Status::NotModified => {
                push_header(&mut out, "Date", &self.server_date);
                out.push_str(CRLF);
            }
            Status::NotFound => {
                push_header(&mut out, "Date", &self.server_date);
                push_header(&mut out, "Server", &self.server_name);
                out.push_str(CRLF);
            }
            Status::NotImplemented => {
                out.push_str(CRLF);
                out.push_str(&self.status_line());
            }
            Status::BadRequest => {
                out.push_str(CRLF);
            }
        }

        if let Some(text) = self.status.error_text() {
            out.push_str(text);
        }

        out.into_bytes()
    }
}

fn push_header(out: &mut String, name: &str, value: impl std::fmt::Display) {
    let _ = write!(out, "{name}: {value}{CRLF}");
}
