//! Operator CLI for the ticket-verification core: mint ticket leaves,
//! enroll biometric commitments, run a one-shot verification, and purge
//! expired nonces from the ledger.
//!
//! Every subcommand is a thin shell around the library crates
//! (`merkle`, `biometric`, `verifier`); this binary owns no domain
//! logic of its own beyond file I/O and argument parsing.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ticket-cli")]
#[command(about = "Operator tooling for the ticket-verification core", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Mint a new ticket leaf into an event's Merkle tree.
    Mint {
        /// Event this ticket belongs to.
        #[arg(long)]
        event_id: u64,
        /// Unique token identifier.
        #[arg(long)]
        token_id: u64,
        /// Tier, a small integer.
        #[arg(long, default_value_t = 0)]
        tier: u64,
        /// Original sale price, integer units.
        #[arg(long)]
        original_price: u64,
        /// JSON file holding this event's leaf hashes (hex), one entry
        /// per minted ticket in mint order. Created if absent.
        #[arg(long)]
        leaves_file: PathBuf,
    },

    /// Enroll a biometric template, producing a commitment.
    Enroll {
        /// Comma-separated real-valued template measurements.
        #[arg(long, value_delimiter = ',')]
        template: Vec<f64>,
        /// Fixed salt to use instead of drawing one at random.
        #[arg(long)]
        salt: Option<u64>,
    },

    /// Run a one-shot verification of a wire-format proof submission.
    Verify {
        /// Event this request is scoped to, decimal.
        #[arg(long)]
        event_id: String,
        /// Hex-encoded compressed Groth16 proof.
        #[arg(long)]
        proof_hex: String,
        /// The seven public signals, in statement order, decimal.
        #[arg(long, value_delimiter = ',', num_args = 7)]
        public_signals: Vec<String>,
        /// Caller-side audit linkage only; never bound into the proof.
        #[arg(long)]
        ticket_id: Option<String>,
        /// Path to the compressed Groth16 verifying key.
        #[arg(long)]
        vk_file: PathBuf,
        /// Path to the nonce ledger / audit log SQLite database.
        #[arg(long)]
        ledger_file: PathBuf,
        /// A root to register as known for this event before verifying,
        /// decimal. Repeatable operator convenience for smoke tests;
        /// a real deployment registers roots from the minting pipeline.
        #[arg(long)]
        known_root: Option<String>,
        /// Wall-clock time to verify against, Unix seconds. Defaults to
        /// the current time.
        #[arg(long)]
        now: Option<u64>,
    },

    /// Purge nonces whose expiry has passed.
    Purge {
        /// Path to the nonce ledger / audit log SQLite database.
        #[arg(long)]
        ledger_file: PathBuf,
        /// Wall-clock time to purge against, Unix seconds. Defaults to
        /// the current time.
        #[arg(long)]
        now: Option<u64>,
        /// Extra margin subtracted from `now` before purging, so nonces
        /// are kept a little past their nominal expiry.
        #[arg(long, default_value_t = 0)]
        safety_margin_secs: u64,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Mint { event_id, token_id, tier, original_price, leaves_file } => {
            commands::mint(event_id, token_id, tier, original_price, &leaves_file)
        }
        Commands::Enroll { template, salt } => commands::enroll(&template, salt),
        Commands::Verify { event_id, proof_hex, public_signals, ticket_id, vk_file, ledger_file, known_root, now } => {
            commands::verify(event_id, proof_hex, public_signals, ticket_id, &vk_file, &ledger_file, known_root, now)
        }
        Commands::Purge { ledger_file, now, safety_margin_secs } => commands::purge(&ledger_file, now, safety_margin_secs),
    }
}
