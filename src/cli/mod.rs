//! CLI for inspecting and maintaining the configured cache tiers
//!
//! Keys are passed verbatim; the Redis key prefix from configuration still
//! applies inside the Redis tier.

pub mod cache;

use clap::{Parser, Subcommand};

/// Tiered Cacheable - inspect and maintain cached member results
#[derive(Parser)]
#[command(name = "tiered-cacheable")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the value stored under a key
    Get { key: String },

    /// Print the remaining TTL of a key in seconds
    Ttl { key: String },

    /// Delete a key from every tier
    Delete { key: String },

    /// Clear every tier
    Reset,
}
