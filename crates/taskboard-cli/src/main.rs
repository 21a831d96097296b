//! Taskboard CLI entry point.

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use taskboard_cli::cli::{Cli, Commands};
use taskboard_cli::commands;
use taskboard_cli::repl::Repl;
use taskboard_cli::{Result, Session};
use taskboard_core::BoardConfig;
use taskboard_runtime::RuntimeConfig;

fn main() {
    let _ = dotenvy::from_filename(".env.local");

    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level().to_string()));

    fmt().with_env_filter(filter).with_target(false).init();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = BoardConfig::load(cli.config.as_deref())?;
    if let Some(Commands::Config) = cli.command {
        return commands::print_config(&config, &mut std::io::stdout());
    }

    let runtime_config = RuntimeConfig::new().with_poll_interval(cli.poll_interval());
    let mut session = Session::start(config, runtime_config, cli.identity())?.with_json(cli.json);

    match &cli.command {
        Some(Commands::Run { script }) => {
            let result = commands::run_script(&mut session, script, &mut std::io::stdout());
            session.close()?;
            result.map(|_| ())
        }
        _ => Repl::new(session)?.run(),
    }
}
