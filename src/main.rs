#![doc = include_str!("../README.md")]

mod api;
mod cmd;
mod config;
mod error;
mod language;
mod locate;
mod naming;
mod render;
mod runner;
mod scaffold;
mod sync;
mod template;
mod workspace;

use {
    crate::{cmd::MainCmd, config::LOG_ENV, error::Error},
    std::process::ExitCode,
    tracing_subscriber::EnvFilter,
};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cmd: MainCmd = argh::from_env();
    match cmd.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report(&err),
    }
}

/// Print `err` with its hints and pick the exit code.
fn report(err: &anyhow::Error) -> ExitCode {
    let Some(error) = err.downcast_ref::<Error>() else {
        eprintln!("error: {err:#}");
        return ExitCode::FAILURE;
    };

    eprintln!("error: {err:#}");
    for hint in error.hints() {
        eprintln!("  - {hint}");
    }
    match error {
        // Forward the child's exit code, e.g. a failing test run.
        Error::ChildProcess { status, .. } => status
            .code()
            .and_then(|code| u8::try_from(code).ok())
            .filter(|&code| code != 0)
            .map_or(ExitCode::FAILURE, ExitCode::from),
        _ => ExitCode::FAILURE,
    }
}
