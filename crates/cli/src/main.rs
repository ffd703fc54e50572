#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::unimplemented,
        clippy::todo
    )
)]

//! # DIME Signet CLI
//!
//! The reference tool for the signet subsystem: generating signets and
//! keychains, applying organizational countersignatures, classifying
//! signets, and dumping their field contents.

use clap::{Parser, Subcommand};
use dime_types::error::SignetError;

mod commands;

use commands::*;

#[derive(Parser, Debug)]
#[clap(
    name = "dime",
    version,
    about = "The DIME signet tool (generate, sign, verify and inspect signets and keychains)."
)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a new signet and its private keychain.
    Generate(generate::GenerateArgs),

    /// Apply organizational signatures to a signet.
    Sign(sign::SignArgs),

    /// Classify a signet and verify its signature cascade.
    Verify(verify::VerifyArgs),

    /// Dump the fields of a signet.
    Dump(dump::DumpArgs),
}

fn main() {
    env_logger::init();
    // Argument errors exit with code 1 per the tool contract; clap's
    // default of 2 is reserved for I/O failures.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let is_usage_error = err.use_stderr();
            let _ = err.print();
            std::process::exit(if is_usage_error { 1 } else { 0 });
        }
    };

    let result = match cli.command {
        Commands::Generate(args) => generate::run(args),
        Commands::Sign(args) => sign::run(args),
        Commands::Verify(args) => verify::run(args),
        Commands::Dump(args) => dump::run(args),
    };

    if let Err(err) = result {
        eprintln!("dime: {}", err);
        std::process::exit(exit_code(&err));
    }
}

/// Maps error kinds to the documented exit codes: 1 argument error, 2 I/O,
/// 3 structural failure, 4 signature verification failure.
fn exit_code(err: &SignetError) -> i32 {
    match err {
        SignetError::BadParam(_) => 1,
        SignetError::Io(_) => 2,
        SignetError::Format(_) | SignetError::Incomplete(_) | SignetError::Unspec(_) => 3,
        SignetError::Crypto(_) => 4,
    }
}
