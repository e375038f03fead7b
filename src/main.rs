//! Terminal runner (default binary).
//!
//! Logs go to a file since the terminal is in raw mode on the alternate screen.

use std::fs::File;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event};
use tracing::{error, info};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;

use blockfall::engine::{Engine, EngineConfig};
use blockfall::input::{command_for_key, should_quit};
use blockfall::term::{enter_terminal, leave_terminal, TerminalRenderer};
use blockfall::types::TICK_MS;

fn main() -> Result<()> {
    let config = EngineConfig::from_env();
    init_logging(&config)?;
    info!(seed = ?config.seed, "starting");

    let renderer = TerminalRenderer::stdout()?;
    enter_terminal()?;

    let result = run(Engine::from_config(&config, Box::new(renderer)));

    // Always try to restore terminal state.
    let _ = leave_terminal();
    if let Err(e) = &result {
        error!(error = %e, "exiting with error");
    }
    info!("bye");
    result
}

fn init_logging(config: &EngineConfig) -> Result<()> {
    let level: LevelFilter = config.log_level.parse().unwrap_or(LevelFilter::INFO);
    let file = File::create(&config.log_path)
        .with_context(|| format!("creating log file {}", config.log_path.display()))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .with(level)
        .init();
    Ok(())
}

fn run(mut engine: Engine) -> Result<()> {
    engine.redraw()?;

    let tick = Duration::from_millis(TICK_MS as u64);
    let mut last = Instant::now();

    loop {
        let timeout = tick.saturating_sub(last.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    if should_quit(key) {
                        return Ok(());
                    }
                    if let Some(cmd) = command_for_key(key) {
                        engine.dispatch(cmd)?;
                    }
                }
                Event::Resize(w, h) => engine.resize(w, h)?,
                _ => {}
            }
        }

        let elapsed = last.elapsed();
        if elapsed >= tick {
            last = Instant::now();
            engine.advance(elapsed.as_millis().min(u32::MAX as u128) as u32)?;
        }
    }
}
