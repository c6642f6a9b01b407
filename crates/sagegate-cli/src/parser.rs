//! Root CLI parser and global options.
//!
//! Every gateway setting can come from a flag or from its environment
//! variable; flags win. Settings without a flag are read from the
//! environment only.

use clap::Parser;
use sagegate_core::config::{
    ENV_BACKEND_URL, ENV_BIND, ENV_ENDPOINT_NAME, ENV_REGION, ENV_TIMEOUT_SECS,
};
use sagegate_core::{ConfigError, GatewayConfig};

use crate::commands::Commands;

/// OpenAI-compatible gateway in front of a hosted inference endpoint.
#[derive(Debug, Parser)]
#[command(name = "sagegate")]
#[command(about = "Serve an OpenAI-compatible API backed by a SageMaker inference endpoint")]
#[command(version)]
pub struct Cli {
    /// Inference endpoint name (also reported as the model id)
    #[arg(long, global = true, env = ENV_ENDPOINT_NAME)]
    pub endpoint: Option<String>,

    /// Region of the inference endpoint
    #[arg(long, global = true, env = ENV_REGION)]
    pub region: Option<String>,

    /// Base URL of the invocation API, overriding the region-derived one
    #[arg(long = "backend-url", global = true, env = ENV_BACKEND_URL)]
    pub backend_url: Option<String>,

    /// Seconds to wait for a backend response
    #[arg(long = "timeout-secs", global = true, env = ENV_TIMEOUT_SECS)]
    pub timeout_secs: Option<u64>,

    /// Address the HTTP server listens on
    #[arg(long, global = true, env = ENV_BIND)]
    pub bind: Option<String>,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Value of `key`, taken from the parsed options when one covers it.
    fn option_for(&self, key: &str) -> Option<Option<String>> {
        let value = match key {
            ENV_ENDPOINT_NAME => self.endpoint.clone(),
            ENV_REGION => self.region.clone(),
            ENV_BACKEND_URL => self.backend_url.clone(),
            ENV_TIMEOUT_SECS => self.timeout_secs.map(|secs| secs.to_string()),
            ENV_BIND => self.bind.clone(),
            _ => return None,
        };
        Some(value)
    }

    /// Build the gateway configuration from the options, falling back to
    /// `env` for settings that have no flag.
    pub fn gateway_config<F>(&self, env: F) -> Result<GatewayConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        GatewayConfig::from_lookup(|key| self.option_for(key).unwrap_or_else(|| env(key)))
    }
}
