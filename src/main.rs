mod calc;
mod config;
mod db;
mod ipc;
mod model;
mod store;

use anyhow::Context;
use clap::Parser;
use std::io::{self, BufRead, Write};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // stdout carries protocol frames, so logs go to stderr.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "attendanced=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = config::Args::parse();
    let location = args.store_location()?;
    let store = store::ClassStore::open(&location)
        .with_context(|| format!("failed to open store at {}", location.describe()))?;
    info!(store = %location.describe(), "store opened");

    let state = ipc::AppState { store };

    let mut stdin = io::stdin().lock();
    let mut stdout = io::stdout();
    let mut buf: Vec<u8> = Vec::new();

    loop {
        buf.clear();
        // Raw bytes: a line that is not UTF-8 is a malformed request, not EOF.
        match stdin.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                warn!(error = %e, "stdin read failed");
                break;
            }
        }
        if buf.iter().all(|b| b.is_ascii_whitespace()) {
            continue;
        }

        let resp = match serde_json::from_slice::<ipc::Request>(&buf) {
            Ok(req) => ipc::handle_request(&state, req),
            Err(e) => {
                warn!(error = %e, "malformed request line");
                ipc::malformed_line(e.to_string())
            }
        };
        writeln!(stdout, "{}", resp).context("failed to write response")?;
        stdout.flush().context("failed to flush response")?;
    }

    drop(state);
    info!("store closed, shutting down");
    Ok(())
}
