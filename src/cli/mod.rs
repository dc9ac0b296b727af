//! CLI module for the account service
//!
//! - `serve`: run the HTTP API
//! - `keygen`: write a fresh RSA key pair for token signing

pub mod keygen;
pub mod serve;

use clap::{Parser, Subcommand};

/// Account Service - registration, login and profile management
#[derive(Parser, Debug)]
#[command(name = "account-service")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP API server
    Serve,

    /// Generate the RSA key pair used to sign access tokens
    Keygen(keygen::KeygenArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve() {
        let cli = Cli::try_parse_from(["account-service", "serve"]).unwrap();
        assert!(matches!(cli.command, Command::Serve));
    }

    #[test]
    fn test_parse_keygen_defaults() {
        let cli = Cli::try_parse_from(["account-service", "keygen"]).unwrap();

        let Command::Keygen(args) = cli.command else {
            panic!("expected keygen");
        };
        assert_eq!(args.out_dir, std::path::PathBuf::from("keys"));
        assert_eq!(args.bits, 2048);
        assert!(!args.force);
    }

    #[test]
    fn test_parse_keygen_options() {
        let cli = Cli::try_parse_from([
            "account-service",
            "keygen",
            "--out-dir",
            "/tmp/keys",
            "--bits",
            "4096",
            "--force",
        ])
        .unwrap();

        let Command::Keygen(args) = cli.command else {
            panic!("expected keygen");
        };
        assert_eq!(args.out_dir, std::path::PathBuf::from("/tmp/keys"));
        assert_eq!(args.bits, 4096);
        assert!(args.force);
    }

    #[test]
    fn test_missing_subcommand_is_rejected() {
        assert!(Cli::try_parse_from(["account-service"]).is_err());
    }
}
