// Server module entry point
// Listener setup, the sequential accept loop, and shutdown signals

pub mod connection;
pub mod listener;
pub mod signal;

// Rust does not allow `loop` as a module name (keyword)
#[path = "loop.rs"]
pub mod server_loop;

// Re-export commonly used types
pub use connection::ServerContext;
pub use listener::create_listener;
pub use server_loop::run;
pub use signal::shutdown_signal;
