//! Command-line interface.

#[cfg(feature = "stub")]
use std::net::IpAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::catalogue::{ActionKind, SymType};
use crate::view::FormFields;

/// Operator console for the HYNET power-system simulation API.
#[derive(Debug, Parser)]
#[command(name = "hynet-console", version, about, long_about = None)]
pub struct Cli {
    /// TOML configuration file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend origin, overriding `backend.base_url` from the config.
    #[arg(long, global = true, env = "HYNET_BASE_URL")]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactive terminal form
    #[cfg(feature = "tui")]
    Tui,

    /// Send one action and print the JSON response
    Run(RunArgs),

    /// List the action catalogue
    List,

    /// Serve the stub backend
    #[cfg(feature = "stub")]
    ServeStub(StubArgs),
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Action id, as printed by `list`.
    pub action: ActionKind,

    /// Generator model for `sym-type`.
    #[arg(long)]
    pub sym_type: Option<SymType>,

    /// Loading level, sent as a number.
    #[arg(long, allow_hyphen_values = true)]
    pub loading: Option<String>,

    /// Number of random cases, sent as a number.
    #[arg(long, allow_hyphen_values = true)]
    pub num: Option<String>,

    /// Relay items, comma or whitespace separated.
    #[arg(long)]
    pub items: Option<String>,
}

impl RunArgs {
    /// Overwrites the form fields given on the command line.
    pub fn apply_to(&self, form: &mut FormFields) {
        if let Some(sym_type) = self.sym_type {
            form.sym_type = sym_type;
        }
        if let Some(loading) = &self.loading {
            form.loading_level.clone_from(loading);
        }
        if let Some(num) = &self.num {
            form.random_cases.clone_from(num);
        }
        if let Some(items) = &self.items {
            form.items.clone_from(items);
        }
    }
}

#[cfg(feature = "stub")]
#[derive(Debug, Args)]
pub struct StubArgs {
    /// Address to bind.
    #[arg(long, default_value = "127.0.0.1")]
    pub host: IpAddr,

    /// Port to listen on.
    #[arg(long, default_value_t = 8000)]
    pub port: u16,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("hynet-console").chain(args.iter().copied()))
            .expect("parse should succeed")
    }

    #[test]
    fn run_takes_action_and_fields() {
        let cli = parse(&["run", "loading-level", "--loading", "2.5"]);
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.action, ActionKind::LoadingLevel);

        let mut form = FormFields::default();
        args.apply_to(&mut form);
        assert_eq!(form.loading_level, "2.5");
        assert_eq!(form.random_cases, "100");
    }

    #[test]
    fn negative_numbers_are_values() {
        let cli = parse(&["run", "random-cases", "--num", "-3"]);
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.num.as_deref(), Some("-3"));
    }

    #[test]
    fn global_options_after_subcommand() {
        let cli = parse(&[
            "run",
            "sym-type",
            "--sym-type",
            "standard",
            "--base-url",
            "http://10.1.1.1:9000",
        ]);
        assert_eq!(cli.base_url.as_deref(), Some("http://10.1.1.1:9000"));
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.sym_type, Some(SymType::Standard));
    }

    #[test]
    fn unknown_action_is_rejected() {
        let result = Cli::try_parse_from(["hynet-console", "run", "self-destruct"]);
        assert!(result.is_err());
    }

    #[test]
    fn list_parses() {
        let cli = parse(&["--config", "console.toml", "list"]);
        assert!(matches!(cli.command, Command::List));
        assert_eq!(
            cli.config.as_deref().and_then(|p| p.to_str()),
            Some("console.toml")
        );
    }
}
