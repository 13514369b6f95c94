//! Implementation of the `cluster-registry cert` commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::infrastructure::certificates::{decode_certificate, encode_certificate};

#[derive(Args, Debug)]
pub struct CertArgs {
    #[command(subcommand)]
    pub command: CertCommands,
}

#[derive(Subcommand, Debug)]
pub enum CertCommands {
    /// Print a certificate file as base64, ready for a record's `certificate` field
    Encode {
        /// Certificate file (PEM or CRT)
        file: PathBuf,
    },

    /// Print the certificate held base64 encoded in a file
    Decode {
        /// File containing base64 text
        file: PathBuf,
    },
}

pub fn execute(args: CertArgs) -> Result<()> {
    let text = match args.command {
        CertCommands::Encode { file } => encode_certificate(&file)
            .with_context(|| format!("Failed to encode {}", file.display()))?,
        CertCommands::Decode { file } => decode_certificate(&file)
            .with_context(|| format!("Failed to decode {}", file.display()))?,
    };
    println!("{text}");
    Ok(())
}
