mod config;
mod executor;
mod input;
mod metachar;
mod parser;
mod redirect;
mod shell;
mod signals;
mod status;

use std::io::{self, Write};

use anyhow::Context;
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let filter = EnvFilter::try_from_env("LSH_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    init_logging();

    ctrlc::set_handler(|| {
        println!();
        let _ = io::stdout().flush();
    })
    .context("failed to set Ctrl-C handler")?;

    #[cfg(unix)]
    {
        use crossterm::tty::IsTty;
        if io::stdin().is_tty() {
            signals::ignore_keyboard_signals().context("failed to ignore keyboard signals")?;
        }
    }

    let config = config::Config::from_env();
    tracing::debug!(?config, "starting");

    let mut stdin = io::stdin().lock();
    shell::Shell::new(config)
        .run(&mut stdin, &mut io::stdout())
        .context("failed to read input")?;

    Ok(())
}
