//! Command-line interface.

pub mod commands;

use clap::{Parser, Subcommand};

use commands::cert::CertArgs;
use commands::serve::ServeArgs;

#[derive(Parser, Debug)]
#[command(name = "cluster-registry")]
#[command(about = "Registry of per-cluster message bus connection records", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP service
    Serve(ServeArgs),

    /// Base64 helpers for broker certificates
    Cert(CertArgs),
}

/// Print an error chain to stderr and exit non-zero.
pub fn handle_error(err: anyhow::Error) -> ! {
    eprintln!("Error: {err}");
    for cause in err.chain().skip(1) {
        eprintln!("  caused by: {cause}");
    }
    std::process::exit(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use commands::cert::CertCommands;
    use std::path::PathBuf;

    #[test]
    fn test_parse_serve_with_overrides() {
        let cli = Cli::try_parse_from([
            "cluster-registry",
            "serve",
            "--config",
            "/etc/registry.yaml",
            "--log",
            "debug",
        ])
        .unwrap();

        match cli.command {
            Commands::Serve(args) => {
                assert_eq!(args.config, Some(PathBuf::from("/etc/registry.yaml")));
                assert_eq!(args.log.as_deref(), Some("debug"));
            }
            Commands::Cert(_) => panic!("expected serve"),
        }
    }

    #[test]
    fn test_parse_serve_rejects_unknown_level() {
        assert!(Cli::try_parse_from(["cluster-registry", "serve", "--log", "loud"]).is_err());
    }

    #[test]
    fn test_parse_cert_decode() {
        let cli = Cli::try_parse_from(["cluster-registry", "cert", "decode", "ca.b64"]).unwrap();
        match cli.command {
            Commands::Cert(CertArgs { command: CertCommands::Decode { file } }) => {
                assert_eq!(file, PathBuf::from("ca.b64"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
