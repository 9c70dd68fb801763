//! jsonrest demo server.
//!
//! Serves a small resource API on the dispatch core:
//!
//! ```text
//! GET    /health              → {"Status":"ok"}
//! GET    /r/:id               → {"Id":":id"}
//! POST   /r/:id               → echoes the JSON body
//! DELETE /r/:id               → 404 envelope via not_found
//! GET    /files/*             → {"Path":"<tail>"}
//! ```

use std::collections::HashMap;
use std::path::PathBuf;

use clap::Parser;
use serde_json::{json, Value};

use jsonrest::config::{self, AppConfig};
use jsonrest::http::Dispatcher;
use jsonrest::lifecycle::{self, signals};
use jsonrest::observability::logging;
use jsonrest::routing::WILDCARD_PARAM;
use jsonrest::{not_found, Route};

#[derive(Parser)]
#[command(name = "jsonrest")]
#[command(about = "JSON REST dispatch demo server", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `server.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,

    /// Write compact JSON responses.
    #[arg(long)]
    compact: bool,
}

fn routes() -> Vec<Route<jsonrest::http::BoxedHandler>> {
    vec![
        Route::get("/health", |w, _r| async move {
            w.write_json(&json!({ "Status": "ok" }))?;
            Ok(())
        }),
        Route::get("/r/:id", |w, r| async move {
            w.write_json(&HashMap::from([("Id", r.path_param("id"))]))?;
            Ok(())
        }),
        Route::post("/r/:id", |w, r| async move {
            let data: Value = r.decode_json_payload().await?;
            w.write_json(&data)?;
            Ok(())
        }),
        Route::delete("/r/:id", |w, r| async move {
            not_found(&w, &r);
            Ok(())
        }),
        Route::get("/files/*", |w, r| async move {
            w.write_json(&json!({ "Path": r.path_param(WILDCARD_PARAM) }))?;
            Ok(())
        }),
    ]
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => AppConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.server.bind_address = bind;
    }
    if cli.compact {
        config.dispatcher.disable_json_indent = true;
    }

    logging::init(&config.observability)?;
    tracing::info!(
        bind_address = %config.server.bind_address,
        disable_json_indent = config.dispatcher.disable_json_indent,
        "jsonrest v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    let dispatcher = Dispatcher::new(routes(), config.dispatcher.clone())?;
    let server = lifecycle::start(&config, dispatcher).await?;
    tokio::spawn(signals::shutdown_on_ctrl_c(server.shutdown().clone()));

    server.wait().await?;
    tracing::info!("Shutdown complete");
    Ok(())
}
