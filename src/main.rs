use std::sync::Arc;

use edge_index_rewrite::config::{AppState, Config};
use edge_index_rewrite::logger::{self, InvocationLogEntry};
use edge_index_rewrite::{handler, server};

const USAGE: &str = "Usage: edge-index-rewrite [serve|invoke]";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config::load()?;

    match std::env::args().nth(1).as_deref() {
        None | Some("serve") => {
            logger::init(&cfg, false)?;
            run_server(cfg)
        }
        Some("invoke") => {
            logger::init(&cfg, true)?;
            invoke_stdin(&cfg)
        }
        Some("-h" | "--help") => {
            println!("{USAGE}");
            Ok(())
        }
        Some(other) => Err(format!("Unknown command '{other}'. {USAGE}").into()),
    }
}

/// Rewrite a single event read from stdin and print the request to forward
fn invoke_stdin(cfg: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let invocation = handler::invoke_stream(
        std::io::stdin().lock(),
        std::io::stdout().lock(),
        &cfg.rewrite.default_document,
    )?;
    if cfg.logging.access_log {
        logger::log_invocation(&InvocationLogEntry::new(&invocation), cfg.logging.format);
    }
    Ok(())
}

fn run_server(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    // Build the Tokio runtime, honoring the configured worker count
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async move {
        let addr = cfg.get_socket_addr()?;
        let listener = server::create_reusable_listener(addr)?;
        let state = Arc::new(AppState::new(&cfg));

        logger::log_server_start(&addr, &cfg);
        server::serve(listener, state, server::shutdown_signal()).await;
        Ok::<(), Box<dyn std::error::Error>>(())
    })
}
