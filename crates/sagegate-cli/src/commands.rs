//! Subcommand definitions.

use clap::Subcommand;

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the OpenAI-compatible HTTP server
    Serve,

    /// Send one prompt straight to the inference endpoint and print the reply
    Probe {
        /// Prompt text, sent verbatim
        #[arg(short, long)]
        prompt: String,
        /// Maximum tokens to generate
        #[arg(long = "max-tokens")]
        max_tokens: Option<i64>,
        /// Sampling temperature (0 for greedy decoding)
        #[arg(long)]
        temperature: Option<f64>,
    },
}
