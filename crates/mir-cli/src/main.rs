//! MIR CLI - Command-line interface for claim signing and verification.

use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{canonicalize, keygen, sign, verify};

#[derive(Parser)]
#[command(name = "mir")]
#[command(about = "MIR claim signing and offline verification CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an Ed25519 key pair
    Keygen,
    /// Create and sign a claim
    Sign {
        /// Claim type (core or extension)
        #[arg(long = "type")]
        claim_type: String,
        /// Issuing domain
        #[arg(long)]
        domain: String,
        /// Subject hash (64 lowercase hex chars)
        #[arg(long)]
        subject: String,
        /// ISO 8601 timestamp (defaults to now)
        #[arg(long)]
        timestamp: Option<String>,
        /// Metadata as a JSON object
        #[arg(long)]
        metadata: Option<String>,
        /// Private key as 64 hex chars
        #[arg(long)]
        key: String,
    },
    /// Verify a claim against a public key
    Verify {
        /// Claim JSON file (or stdin if not provided)
        claim: Option<String>,
        /// Public key as 64 hex chars
        #[arg(long)]
        key: String,
        /// Reject claims issued by any other domain
        #[arg(long)]
        expected_domain: Option<String>,
        /// Reject claims older than this many seconds
        #[arg(long)]
        max_age_secs: Option<i64>,
        /// Exit with error code if the claim is invalid
        #[arg(long)]
        strict: bool,
    },
    /// Show the canonical string for a claim
    Canonicalize {
        /// Claim JSON file (or stdin if not provided)
        input: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Keygen => keygen::run(),
        Commands::Sign {
            claim_type,
            domain,
            subject,
            timestamp,
            metadata,
            key,
        } => sign::run(claim_type, domain, subject, timestamp, metadata, key),
        Commands::Verify {
            claim,
            key,
            expected_domain,
            max_age_secs,
            strict,
        } => verify::run(claim, key, expected_domain, max_age_secs, strict),
        Commands::Canonicalize { input } => canonicalize::run(input),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
