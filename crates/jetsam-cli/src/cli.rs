use clap::{Args, Parser, Subcommand};
use jetsam_observe::{DEFAULT_APP_NAME, DEFAULT_CONTRACT_ADDRESS};
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "jetsam",
    about = "Jetsam: mirror an on-chain Petri-net model as JSON and SVG",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Where the contract and the indexer ledger are read from.
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Chain fixture file standing in for the RPC endpoint (URLs are rejected)
    #[arg(long, env = "ENDPOINT", default_value = "fixtures/chain.json")]
    pub endpoint: PathBuf,

    /// Contract address (0x + 40 hex digits)
    #[arg(long, env = "CONTRACT_ADDRESS", default_value = DEFAULT_CONTRACT_ADDRESS)]
    pub address: String,

    /// Indexer ledger JSONL path
    #[arg(long, env = "LEDGER_PATH", default_value = "fixtures/ledger.jsonl")]
    pub ledger: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Bind address (host:port)
    #[arg(long, env = "JETSAM_BIND", default_value = "0.0.0.0:8080")]
    pub bind: SocketAddr,

    /// Indexer database user
    #[arg(long, env = "DB_USERNAME")]
    pub db_username: Option<String>,

    /// Indexer database password
    #[arg(long, env = "DB_PASSWORD", hide_env_values = true)]
    pub db_password: Option<String>,

    /// Indexer database host
    #[arg(long, env = "DB_HOSTNAME", default_value = "localhost")]
    pub db_hostname: String,

    /// APM license key; metrics are tagged with the app name when set
    #[arg(long, env = "NEW_RELIC_LICENSE_KEY", hide_env_values = true)]
    pub license_key: Option<String>,

    /// Application name reported with metrics
    #[arg(long, env = "APP_NAME", default_value = DEFAULT_APP_NAME)]
    pub app_name: String,

    /// Seconds between block-statistics publications
    #[arg(long, env = "STATS_PERIOD_SECS", default_value_t = 30)]
    pub stats_period_secs: u64,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the dashboard and the /v0 JSON endpoints
    Serve(ServeArgs),

    /// Print the full snapshot JSON
    Snapshot {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Print the model JSON built from the declaration
    Model {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Render the declared net as SVG
    Svg {
        #[command(flatten)]
        source: SourceArgs,

        /// Write to this file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Print the marking vector, indexed by place offset
    State {
        #[command(flatten)]
        source: SourceArgs,
    },
}
