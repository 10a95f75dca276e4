//! Command-line interface for reelvault.
//!
//! `serve` is the default when no subcommand is given.

pub mod commands;

use clap::{Parser, Subcommand};

/// reelvault - movie and series catalog backend
#[derive(Parser)]
#[command(name = "reelvault")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API
    #[command(alias = "server")]
    Serve {
        /// Port to listen on, overriding the config file
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Write a default config.toml in the working directory
    Init,

    /// Print catalog and user counts
    Stats,

    /// Create an administrator account
    CreateAdmin {
        username: String,

        password: String,

        /// Display name, defaults to the username
        #[arg(long)]
        name: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_parses() {
        let cli = Cli::try_parse_from(["reelvault"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_create_admin_args() {
        let cli =
            Cli::try_parse_from(["reelvault", "create-admin", "root", "s3cret", "--name", "Root"])
                .unwrap();
        match cli.command {
            Some(Commands::CreateAdmin {
                username,
                password,
                name,
            }) => {
                assert_eq!(username, "root");
                assert_eq!(password, "s3cret");
                assert_eq!(name.as_deref(), Some("Root"));
            }
            _ => panic!("expected create-admin"),
        }
    }

    #[test]
    fn test_serve_port_override() {
        let cli = Cli::try_parse_from(["reelvault", "serve", "--port", "9000"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Serve { port: Some(9000) })));
    }
}
