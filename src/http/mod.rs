//! HTTP protocol layer module
//!
//! Request interpretation, wire dates, statuses and response serialization.
//! Nothing here touches the filesystem or sockets.

pub mod date;
pub mod request;
pub mod response;
pub mod status;

// Re-export commonly used types
pub use date::Zone;
pub use request::{Conditional, Request};
pub use response::Response;
pub use status::Status;
