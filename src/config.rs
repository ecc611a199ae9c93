//! Command-line configuration for the vanity server.
//!
//! Process settings come from the command line via clap, with every flag
//! mirrored by a `VANITY_`-prefixed environment variable. The mount table
//! itself lives in a YAML file loaded by [`crate::mount::load_file`].
//!
//! # Commands
//!
//! - `vanity-server [serve]` - Start the HTTP server (default)
//! - `vanity-server check` - Validate a configuration file and print its mounts
//!
//! # Environment Variables
//!
//! - `VANITY_CONFIG` - Path to the mount configuration (default: vanity.yaml)
//! - `VANITY_HOST` - Server bind address (default: 0.0.0.0)
//! - `VANITY_PORT` - Server port (default: 8080)

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// =============================================================================
// Default Values
// =============================================================================

/// Default server host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port.
pub const DEFAULT_PORT: u16 = 8080;

/// Default mount configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "vanity.yaml";

// =============================================================================
// CLI Arguments
// =============================================================================

/// Vanity Server - serves package import metadata for configured mount points.
///
/// Answers `go get` style requests with go-import and go-source meta tags
/// pointing at the real source repositories.
#[derive(Parser, Debug, Clone)]
#[command(name = "vanity-server")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Serve options when no subcommand is given.
    #[command(flatten)]
    pub serve: ServeConfig,
}

impl Cli {
    /// The command to run, defaulting to `serve`.
    pub fn into_command(self) -> Command {
        self.command.unwrap_or(Command::Serve(self.serve))
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Start the HTTP server.
    Serve(ServeConfig),

    /// Validate a configuration file and print the resulting mount table.
    Check(CheckConfig),
}

/// Options for `serve`.
#[derive(Args, Debug, Clone)]
pub struct ServeConfig {
    /// Path to the YAML mount configuration.
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH, env = "VANITY_CONFIG")]
    pub config: PathBuf,

    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "VANITY_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "VANITY_PORT")]
    pub port: u16,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl ServeConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.config.as_os_str().is_empty() {
            return Err("Configuration path is required. Set --config or VANITY_CONFIG".to_string());
        }
        if self.port == 0 {
            return Err("port must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Output format for `check`.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckOutputFormat {
    /// Human-readable listing
    #[default]
    Text,
    /// JSON document
    Json,
}

/// Options for `check`.
#[derive(Args, Debug, Clone)]
pub struct CheckConfig {
    /// Path to the YAML mount configuration.
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH, env = "VANITY_CONFIG")]
    pub config: PathBuf,

    /// Output format.
    #[arg(long, value_enum, default_value_t = CheckOutputFormat::Text)]
    pub format: CheckOutputFormat,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

// =============================================================================
// Tests
// =============================================================================
