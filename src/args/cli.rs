use clap::Parser;
use std::time::Duration;

use crate::user::UserProfile;

use super::defaults::DEFAULT_HOST;
use super::parsers::{
    parse_bool_env, parse_duration_arg, parse_positive_u64, parse_positive_usize, parse_wait_arg,
};
use super::types::{PositiveU64, PositiveUsize};

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Simulates concurrent album-store users against an albums REST API (GET /albums, GET /albums/{id}, POST /albums)."
)]
pub struct TesterArgs {
    /// Base URL of the albums API
    #[arg(long = "host", short = 'H', default_value = DEFAULT_HOST)]
    pub host: String,

    /// Number of simulated users
    #[arg(
        long = "users",
        short = 'u',
        default_value = "1",
        value_parser = parse_positive_usize
    )]
    pub users: PositiveUsize,

    /// Users started per second until --users are running
    #[arg(
        long = "spawn-rate",
        short = 'r',
        default_value = "1",
        value_parser = parse_positive_usize
    )]
    pub spawn_rate: PositiveUsize,

    /// Run time (supports ms/s/m/h; bare numbers are seconds)
    #[arg(
        long = "duration",
        short = 't',
        alias = "run-time",
        default_value = "60s",
        value_parser = parse_duration_arg
    )]
    pub run_time: Duration,

    /// Stop after N total requests across all users
    #[arg(long = "requests", value_parser = parse_positive_u64)]
    pub requests: Option<PositiveU64>,

    /// User behavior profile
    #[arg(long, value_enum, default_value = "standard", ignore_case = true)]
    pub profile: UserProfile,

    /// Minimum wait between tasks (supports ms/s/m/h)
    #[arg(long = "wait-min", default_value = "1s", value_parser = parse_wait_arg)]
    pub wait_min: Duration,

    /// Maximum wait between tasks (supports ms/s/m/h)
    #[arg(long = "wait-max", default_value = "2s", value_parser = parse_wait_arg)]
    pub wait_max: Duration,

    /// Weight of GET /albums
    #[arg(long = "weight-list", default_value = "3")]
    pub weight_list: u32,

    /// Weight of GET /albums/{id}
    #[arg(long = "weight-get", default_value = "3")]
    pub weight_get: u32,

    /// Weight of POST /albums
    #[arg(long = "weight-create", default_value = "1")]
    pub weight_create: u32,

    /// Album ids used by GET /albums/{id} (comma separated)
    #[arg(
        long = "album-ids",
        value_delimiter = ',',
        default_values = ["1", "2", "3"]
    )]
    pub album_ids: Vec<String>,

    /// Request timeout (supports ms/s/m/h)
    #[arg(long = "timeout", default_value = "10s", value_parser = parse_duration_arg)]
    pub request_timeout: Duration,

    /// Timeout for establishing a new connection (supports ms/s/m/h)
    #[arg(
        long = "connect-timeout",
        default_value = "5s",
        value_parser = parse_duration_arg
    )]
    pub connect_timeout: Duration,

    /// Disable connection reuse between requests
    #[arg(long = "disable-keepalive")]
    pub disable_keepalive: bool,

    /// Seed for task and payload choices (user N uses seed + N)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Path to config file (TOML/JSON). Defaults to ./albums-load.toml or ./albums-load.json if present.
    #[arg(long)]
    pub config: Option<String>,

    /// Write the final report as JSON to this path
    #[arg(long = "export-json")]
    pub export_json: Option<String>,

    /// Enable verbose logging (sets log level to debug unless overridden by ALBUMS_LOAD_LOG/RUST_LOG)
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Suppress per-request log lines
    #[arg(long, short = 'q')]
    pub quiet: bool,

    /// Disable color output
    #[arg(long = "no-color", env = "NO_COLOR", value_parser = parse_bool_env)]
    pub no_color: bool,
}
