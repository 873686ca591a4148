//! CLI argument definitions for oraclewire.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `fetch` | Run one metric through the pipeline and print the encoded result |
//! | `metrics` | List the metric keys of the dedicated or generalized registry |
//! | `decode` | Decode a hex payload back into values |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `-v` / `--verbose` | `false` | Debug logging on stderr |
//!
//! # Environment
//!
//! | Variable | Description |
//! |----------|-------------|
//! | `ORACLEWIRE_API_KEY` | API key (fallback `TOKEN_METRICS_API_KEY`) |
//! | `ORACLEWIRE_BASE_URL` | Upstream base URL |
//! | `ORACLEWIRE_TIMEOUT_MS` | Default request timeout |
//! | `RUST_LOG` | Log filter when `--verbose` is not set |
//!
//! # Examples
//!
//! ```bash
//! # Batch price, result order follows the request
//! oraclewire fetch price 34008,33305 --pretty
//!
//! # Token lookup by symbol only (blank positional filters are skipped)
//! oraclewire fetch tokens "" "" BTC
//!
//! # Generalized dispatcher
//! oraclewire fetch SENTIMENT --generalized
//!
//! # Decode a returned word as 18-decimal fixed point
//! oraclewire decode 0x...ad7d5a0e7a0000 --as uint
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};

/// oraclewire - Token Metrics market data encoded for on-chain consumers
#[derive(Debug, Parser)]
#[command(
    name = "oraclewire",
    author,
    version,
    about = "Token Metrics market data encoded for on-chain consumers",
    long_about = "oraclewire fetches one market-data metric, validates the upstream envelope, \
extracts a single typed value and encodes it as a uint256 word, a UTF-8 string or a \
length-prefixed uint256 array.\n\
\n\
Use 'oraclewire <command> --help' for command-specific help."
)]
pub struct Cli {
    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Log at debug level to stderr (overrides RUST_LOG).
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch one metric and print its encoded result.
    Fetch(FetchArgs),
    /// List available metric keys.
    Metrics(MetricsArgs),
    /// Decode a hex payload.
    Decode(DecodeArgs),
}

#[derive(Debug, Args)]
pub struct FetchArgs {
    /// Metric key, e.g. `trader-grades`, or `TRADER_GRADES` with --generalized.
    pub metric: String,

    /// Positional identifiers; comma-separated ids for batch metrics.
    pub identifiers: Vec<String>,

    /// Resolve the key in the generalized multi-metric registry.
    #[arg(long, default_value_t = false)]
    pub generalized: bool,

    /// Default request timeout in milliseconds for metrics without their own.
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Upstream base URL.
    #[arg(long)]
    pub base_url: Option<String>,

    /// Do not send the x-integration header.
    #[arg(long, default_value_t = false)]
    pub no_integration_tag: bool,
}

#[derive(Debug, Args)]
pub struct MetricsArgs {
    /// List the generalized registry instead of the dedicated one.
    #[arg(long, default_value_t = false)]
    pub generalized: bool,
}

#[derive(Debug, Args)]
pub struct DecodeArgs {
    /// Hex payload, with or without `0x`.
    pub hex: String,

    /// Layout of the payload.
    #[arg(long = "as", value_enum, default_value_t = DecodeLayout::Uint)]
    pub layout: DecodeLayout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DecodeLayout {
    Uint,
    Array,
    Text,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn fetch_keeps_blank_positional_identifiers() {
        let cli = Cli::try_parse_from(["oraclewire", "fetch", "tokens", "", "", "BTC"])
            .expect("parses");
        let Command::Fetch(args) = cli.command else {
            panic!("expected fetch");
        };
        assert_eq!(args.metric, "tokens");
        assert_eq!(args.identifiers, vec!["", "", "BTC"]);
        assert!(!args.generalized);
    }

    #[test]
    fn decode_layout_defaults_to_uint() {
        let cli = Cli::try_parse_from(["oraclewire", "decode", "0x01", "--as", "array", "-v"])
            .expect("parses");
        assert!(cli.verbose);
        let Command::Decode(args) = cli.command else {
            panic!("expected decode");
        };
        assert_eq!(args.layout, DecodeLayout::Array);
    }
}
