// Server loop module
// Accepts connections one at a time until shutdown is requested

use std::future::Future;
use tokio::net::TcpListener;

use super::connection::{handle_connection, ServerContext};
use crate::handler::FileSystem;
use crate::logger;

/// Sequential accept loop
///
/// Each accepted connection is handled to completion before the next `accept`,
/// so at most one request is in flight. Accept errors are logged and the loop
/// keeps going. Returns once `shutdown` resolves.
pub async fn run<F, S>(listener: TcpListener, ctx: &ServerContext<F>, shutdown: S)
where
    F: FileSystem,
    S: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        logger::log_connection_accepted(&peer_addr);
                        handle_connection(stream, peer_addr, ctx).await;
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = &mut shutdown => {
                logger::log_shutdown();
                break;
            }
        }
    }
}
