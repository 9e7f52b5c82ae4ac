//! Logger module
//!
//! Provides logging utilities for the HTTP server including:
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Error and warning logging
//! - File-based logging support

mod format;
pub mod writer;

pub use format::AccessLogEntry;
pub use writer::Level;

use crate::config::{Config, LoggingConfig};
use crate::http::Status;
use std::net::SocketAddr;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &LoggingConfig) -> std::io::Result<()> {
    let level = config
        .level
        .parse::<Level>()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
    writer::init(
        level,
        config.access_log_file.as_deref(),
        config.error_log_file.as_deref(),
    )
}

/// Write to info/access log
fn write_info(message: &str) {
    match writer::get() {
        Some(w) => w.write_info(message),
        None => println!("{message}"),
    }
}

fn write_debug(message: &str) {
    if let Some(w) = writer::get() {
        w.write_debug(message);
    }
}

fn write_warn(message: &str) {
    match writer::get() {
        Some(w) => w.write_warn(message),
        None => eprintln!("{message}"),
    }
}

/// Write to error log
fn write_error(message: &str) {
    match writer::get() {
        Some(w) => w.write_error(message),
        None => eprintln!("{message}"),
    }
}

/// Write to access log specifically
fn write_access(message: &str) {
    match writer::get() {
        Some(w) => w.write_access(message),
        None => println!("{message}"),
    }
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    write_info("======================================");
    write_info("Web server started");
    write_info(&format!("Listening on: http://{addr}"));
    write_info(&format!("Root directory: {}", config.server.root_dir));
    write_info(&format!("Server name: {}", config.http.server_name));
    write_info(&format!("Date zone: {}", config.http.time_zone));
    write_info(&format!("Log level: {}", config.logging.level));
    if let Some(ref path) = config.logging.access_log_file {
        write_info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write_info(&format!("Error log: {path}"));
    }
    write_info("Handling one connection at a time");
    write_info("======================================\n");
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    write_debug(&format!("[Connection] Accepted from: {peer_addr}"));
}

pub fn log_request(method: &str, target: Option<&str>) {
    write_debug(&format!("[Request] {method} {}", target.unwrap_or("-")));
}

pub fn log_response(status: Status, content_length: u64, has_body: bool) {
    if has_body {
        write_debug(&format!("[Response] {status} ({content_length} byte body)"));
    } else {
        write_debug(&format!("[Response] {status} (no body)"));
    }
}

pub fn log_connection_error(peer_addr: &SocketAddr, err: &impl std::fmt::Display) {
    write_error(&format!("[ERROR] Connection {peer_addr} abandoned: {err}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_warn(&format!("[WARN] {message}"));
}

pub fn log_shutdown() {
    write_info("\n[Shutdown] Stop signal received, no longer accepting connections");
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    write_access(&entry.format(format));
}
