//! hynet-console entry point: CLI wiring, config loading and logging setup.

use std::fs::File;
use std::process::ExitCode;

use anyhow::{Context, bail};
use clap::Parser;

use hynet_console::catalogue::ActionKind;
use hynet_console::cli::{Cli, Command, RunArgs};
use hynet_console::client::ApiClient;
use hynet_console::config::ConsoleConfig;
use hynet_console::dispatch::Dispatcher;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = load_config(&cli)?;

    #[cfg(feature = "tui")]
    let interactive = matches!(cli.command, Command::Tui);
    #[cfg(not(feature = "tui"))]
    let interactive = false;
    init_logging(&config, interactive)?;

    match cli.command {
        #[cfg(feature = "tui")]
        Command::Tui => {
            let client = ApiClient::new(&config.backend.base_url, &config.backend.api_prefix);
            hynet_console::tui::run(client, config.form.to_fields()).context("TUI failed")?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Run(args) => run_once(&config, &args),
        Command::List => {
            for kind in ActionKind::ALL {
                let action = kind.bind(&config.form.to_fields());
                println!("{:<26} {:<6} {}", kind.id(), action.method().as_str(), action.path());
            }
            Ok(ExitCode::SUCCESS)
        }
        #[cfg(feature = "stub")]
        Command::ServeStub(args) => {
            let addr = std::net::SocketAddr::new(args.host, args.port);
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(hynet_console::stub::serve(addr))
                .with_context(|| format!("stub backend on {addr} failed"))?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Reads the config file (or defaults), applies `--base-url`, and validates.
fn load_config(cli: &Cli) -> anyhow::Result<ConsoleConfig> {
    let mut config = match &cli.config {
        Some(path) => ConsoleConfig::from_toml_file(path)?,
        None => ConsoleConfig::default(),
    };
    if let Some(base_url) = &cli.base_url {
        config.backend.base_url.clone_from(base_url);
    }

    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        bail!("invalid configuration ({} error(s))", errors.len());
    }
    Ok(config)
}

/// Logs to stderr, or to the configured file while the TUI owns the terminal.
///
/// `RUST_LOG` overrides the configured level.
fn init_logging(config: &ConsoleConfig, interactive: bool) -> anyhow::Result<()> {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(config.log.level_filter())
        .parse_default_env();
    if interactive {
        let file = File::create(&config.log.file)
            .with_context(|| format!("cannot create log file {}", config.log.file.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.try_init()?;
    Ok(())
}

/// Sends one action and prints the response.
fn run_once(config: &ConsoleConfig, args: &RunArgs) -> anyhow::Result<ExitCode> {
    let mut form = config.form.to_fields();
    args.apply_to(&mut form);

    let client = ApiClient::new(&config.backend.base_url, &config.backend.api_prefix);
    let mut dispatcher = Dispatcher::new(client);

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        dispatcher.trigger(args.action, &form)?;
        dispatcher.settle().await;
        anyhow::Ok(())
    })?;

    let state = dispatcher.state();
    if let Some(message) = state.last_error() {
        eprintln!("{message}");
        return Ok(ExitCode::FAILURE);
    }
    let result = state.last_result().cloned().unwrap_or_default();
    println!("{}", result.to_pretty());
    Ok(ExitCode::SUCCESS)
}
