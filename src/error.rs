use thiserror::Error;

/// Failures that abandon a connection without producing a status
#[derive(Debug, Error)]
pub enum ServeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("request head exceeds {0} bytes")]
    RequestTooLarge(usize),
}
