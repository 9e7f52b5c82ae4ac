// Connection handling module
// Reads one request, writes one response, then closes the connection

use std::net::SocketAddr;
use std::time::Instant;
use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader,
};

use crate::config::{LoggingConfig, ServeSettings};
use crate::error::ServeError;
use crate::handler::{self, FileSystem};
use crate::http::{Request, Status};
use crate::logger::{self, AccessLogEntry};

/// Upper bound on the request head, terminators included
pub const MAX_HEAD_BYTES: usize = 64 * 1024;

/// Everything a connection needs, shared by the accept loop
pub struct ServerContext<F> {
    pub fs: F,
    pub settings: ServeSettings,
    pub access_log: bool,
    pub access_log_format: String,
}

impl<F: FileSystem> ServerContext<F> {
    pub fn new(fs: F, settings: ServeSettings, logging: &LoggingConfig) -> Self {
        Self {
            fs,
            settings,
            access_log: logging.access_log,
            access_log_format: logging.access_log_format.clone(),
        }
    }
}

/// Summary of a completed request/response exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    pub method: String,
    pub target: Option<String>,
    pub status: Status,
    pub bytes_written: u64,
}

/// Read request lines up to the first empty line or EOF
///
/// Every line is re-terminated with CRLF. Invalid UTF-8 is replaced, not rejected.
pub async fn read_request_head<R>(reader: &mut R) -> Result<String, ServeError>
where
    R: AsyncBufRead + Unpin,
{
    let mut head = String::new();
    let mut line = Vec::new();

    loop {
        line.clear();
        let remaining = (MAX_HEAD_BYTES + 1).saturating_sub(head.len()) as u64;
        let read = (&mut *reader)
            .take(remaining)
            .read_until(b'\n', &mut line)
            .await?;
        if read == 0 {
            break;
        }

        let text = String::from_utf8_lossy(&line);
        let text = text.trim_end_matches(['\r', '\n']);
        if text.is_empty() {
            break;
        }

        head.push_str(text);
        head.push_str("\r\n");
        if head.len() > MAX_HEAD_BYTES {
            return Err(ServeError::RequestTooLarge(MAX_HEAD_BYTES));
        }
    }

    Ok(head)
}

/// Serve a single request on `stream`
///
/// The body stream, if any, is dropped before returning, on success or error.
/// The write side is shut down after a successful exchange.
pub async fn serve<S, F>(stream: S, ctx: &ServerContext<F>) -> Result<Exchange, ServeError>
where
    S: AsyncRead + AsyncWrite + Unpin,
    F: FileSystem,
{
    let (read_half, mut writer) = tokio::io::split(stream);
    let mut reader = BufReader::new(read_half);

    let head = read_request_head(&mut reader).await?;
    let request = Request::parse(&head, &ctx.settings.root_dir);
    logger::log_request(request.method(), request.target());

    let mut response = handler::resolve(&request, &ctx.fs, &ctx.settings).await?;
    logger::log_response(
        response.status(),
        response.content_length(),
        response.has_body(),
    );

    let head_bytes = response.head_bytes();
    writer.write_all(&head_bytes).await?;
    let mut bytes_written = head_bytes.len() as u64;

    if let Some(mut body) = response.take_body() {
        bytes_written += tokio::io::copy(&mut body, &mut writer).await?;
    }

    writer.flush().await?;
    writer.shutdown().await?;

    Ok(Exchange {
        method: request.method().to_string(),
        target: request.target().map(ToString::to_string),
        status: response.status(),
        bytes_written,
    })
}

/// Handle an accepted connection to completion
///
/// Failures are logged and the connection dropped; nothing is returned to the loop.
pub async fn handle_connection<S, F>(stream: S, peer_addr: SocketAddr, ctx: &ServerContext<F>)
where
    S: AsyncRead + AsyncWrite + Unpin,
    F: FileSystem,
{
    let started = Instant::now();

    match serve(stream, ctx).await {
        Ok(exchange) => {
            if ctx.access_log {
                let mut entry = AccessLogEntry::new(
                    peer_addr.ip().to_string(),
                    exchange.method,
                    exchange.target.unwrap_or_else(|| "-".to_string()),
                );
                entry.status = exchange.status.code();
                entry.body_bytes = exchange.bytes_written;
                entry.request_time_us =
                    u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
                logger::log_access(&entry, &ctx.access_log_format);
            }
        }
        Err(e) => logger::log_connection_error(&peer_addr, &e),
    }
}
