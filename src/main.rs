use clap::Parser;
use std::path::Path;

mod config;
mod error;
mod handler;
mod http;
mod logger;
mod server;

/// Single-connection static file server (GET/HEAD with If-Modified-Since)
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Port to listen on (overrides config)
    port: Option<u16>,

    /// Directory request paths are appended to (overrides config)
    root_dir: Option<String>,

    /// Configuration file path, without extension
    #[arg(short, long, env = "MYWEBSERVER_CONFIG", default_value = "config")]
    config: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut cfg = config::Config::load_from(&cli.config)?;
    if let Some(port) = cli.port {
        cfg.server.port = port;
    }
    if let Some(root_dir) = cli.root_dir {
        cfg.server.root_dir = root_dir;
    }

    logger::init(&cfg.logging)?;

    // One request at a time: a single-threaded runtime is enough
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let settings = cfg.serve_settings()?;

    if !Path::new(&settings.root_dir).is_dir() {
        logger::log_warning(&format!(
            "Root directory '{}' is not a directory; every request will 404",
            settings.root_dir
        ));
    }

    let listener = server::create_listener(addr)?;
    logger::log_server_start(&addr, &cfg);

    let ctx = server::ServerContext::new(handler::LocalFs, settings, &cfg.logging);
    server::run(listener, &ctx, server::shutdown_signal()).await;

    Ok(())
}
