//! `optimist`: terminal front end for the optimistic todo list.
//!
//! ```text
//! optimist --user-id 1 --api-url http://127.0.0.1:3000
//! optimist --in-memory --latency-ms 800
//! ```
//!
//! Settings are read from the environment (and a `.env` file), then
//! overridden by flags. `RUST_LOG` controls logging.

mod args;
mod command;
mod render;
mod session;

use anyhow::Context;
use args::Cli;
use clap::Parser;
use optimist_todos::{
    ClientConfig, HttpTodoService, MockTodoService, Todo, TodoController, TodoId, TodoService,
};
use session::Session;
use std::time::Duration;
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();
    let config = cli
        .config(|name| std::env::var(name).ok())
        .context("Invalid configuration")?;

    if cli.in_memory {
        let service = MockTodoService::with_todos(sample_todos(&config))
            .with_latency(Duration::from_millis(cli.latency_ms));
        tracing::info!(latency_ms = cli.latency_ms, "Using in-memory todo service");
        run(service, &config).await
    } else {
        let service =
            HttpTodoService::from_config(&config).context("Failed to build HTTP client")?;
        tracing::info!(api_url = %config.api_url, user_id = %config.user_id, "Using todo API");
        run(service, &config).await
    }
}

async fn run<S: TodoService + 'static>(service: S, config: &ClientConfig) -> anyhow::Result<()> {
    let controller = TodoController::new(service, config);
    let session = Session::new(controller, config.request_timeout + Duration::from_secs(1));

    println!("optimist: type `help` for commands");
    session.run(BufReader::new(tokio::io::stdin())).await?;

    if let Err(e) = session.controller().shutdown(config.request_timeout).await {
        tracing::warn!(error = %e, "Exiting with requests still in flight");
    }
    Ok(())
}

fn sample_todos(config: &ClientConfig) -> Vec<Todo> {
    ["Read the docs", "Write a reducer", "Ship it"]
        .into_iter()
        .zip(1..)
        .map(|(title, id)| Todo::new(TodoId::new(id), config.user_id, title, id == 1))
        .collect()
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "optimist=info,optimist_todos=info,optimist_runtime=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}
