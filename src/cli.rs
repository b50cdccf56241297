//! Command-line interface for the hogline client binary.

use clap::Parser;

/// Digital curling match client
#[derive(Parser, Debug)]
#[command(name = "hogline")]
#[command(about = "Digital curling match client", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Server host, with or without an explicit http/https scheme
    #[arg(long)]
    pub host: String,

    /// Match id to join
    #[arg(long)]
    pub id: String,

    /// Team index to request (0 or 1)
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=1))]
    pub team: u8,

    /// Authentication id
    #[arg(long, default_value = "user")]
    pub auth_id: String,

    /// Authentication password
    #[arg(long, default_value = "password")]
    pub auth_pw: String,

    /// Stream reconnect attempts before giving up
    #[arg(long, default_value_t = 5)]
    pub max_retries: u32,

    /// Seconds to wait between reconnect attempts
    #[arg(long, default_value_t = 5)]
    pub retry_wait: u64,
}
