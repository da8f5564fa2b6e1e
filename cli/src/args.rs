//! Command-line arguments.

use clap::Parser;
use optimist_todos::{ClientConfig, ConfigError};

/// User assumed by `--in-memory` when none is configured
pub const DEMO_USER_ID: &str = "1";

#[derive(Debug, Parser)]
#[command(name = "optimist")]
#[command(about = "Todo list that applies changes before the server confirms them")]
#[command(version)]
pub struct Cli {
    /// Base URL of the todo API (overrides `TODOS_API_URL`)
    #[arg(long)]
    pub api_url: Option<String>,

    /// User whose todos are shown (overrides `TODOS_USER_ID`)
    #[arg(short, long)]
    pub user_id: Option<String>,

    /// How long an error stays visible, in milliseconds
    #[arg(long)]
    pub error_display_ms: Option<u64>,

    /// Per-request timeout, in milliseconds
    #[arg(long)]
    pub request_timeout_ms: Option<u64>,

    /// Use an in-memory service seeded with sample todos instead of the API
    #[arg(long)]
    pub in_memory: bool,

    /// Simulated latency of the in-memory service, in milliseconds
    #[arg(long, default_value_t = 300)]
    pub latency_ms: u64,
}

impl Cli {
    /// Resolve the client configuration
    ///
    /// Flags win over `lookup` (the environment in the binary). With
    /// `--in-memory` a missing user falls back to [`DEMO_USER_ID`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the user is missing or a value is malformed.
    pub fn config<F>(&self, lookup: F) -> Result<ClientConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        ClientConfig::from_lookup(|name| {
            self.flag(name)
                .or_else(|| lookup(name))
                .or_else(|| self.fallback(name))
        })
    }

    fn flag(&self, name: &str) -> Option<String> {
        match name {
            "TODOS_API_URL" => self.api_url.clone(),
            "TODOS_USER_ID" => self.user_id.clone(),
            "TODOS_ERROR_DISPLAY_MS" => self.error_display_ms.map(|ms| ms.to_string()),
            "TODOS_REQUEST_TIMEOUT_MS" => self.request_timeout_ms.map(|ms| ms.to_string()),
            _ => None,
        }
    }

    fn fallback(&self, name: &str) -> Option<String> {
        (self.in_memory && name == "TODOS_USER_ID").then(|| DEMO_USER_ID.to_string())
    }
}
