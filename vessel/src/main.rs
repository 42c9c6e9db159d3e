use std::process::ExitCode;
use tokio_util::sync::CancellationToken;

mod cli;
mod commands;
mod config;
mod context;
mod format;
mod logging;

use cli::{CommandError, CommandRegistry, Dispatcher, GlobalFlags};
use context::{AppContext, VerbosityLevel};
use format::ColorChoice;

/// Exit status for failures of vessel itself, as opposed to clap's usage exits
const EXIT_FAILURE: u8 = 125;

fn main() -> ExitCode {
    let argv: Vec<String> = std::env::args().collect();

    let mut registry = CommandRegistry::new();
    if let Err(e) = commands::register_all(&mut registry) {
        format::create_formatter(ColorChoice::default()).error(&e.to_string());
        return ExitCode::from(EXIT_FAILURE);
    }

    // The mode decides which commands exist, so global flags are read before
    // the command tree is built.
    let flags = GlobalFlags::scan(&argv, &registry.value_flags());
    let color = flags
        .color
        .as_deref()
        .map(ColorChoice::from)
        .unwrap_or_default();
    logging::init(
        VerbosityLevel::from_count(flags.verbose),
        format::should_color(color),
    );

    let ctx = match AppContext::build(&flags, CancellationToken::new()) {
        Ok(ctx) => ctx,
        Err(e) => {
            format::create_formatter(color).error(&e.to_string());
            return ExitCode::from(EXIT_FAILURE);
        }
    };

    let dispatcher = match Dispatcher::new(&registry, ctx.mode) {
        Ok(dispatcher) => dispatcher,
        Err(e) => {
            ctx.output.error(&e.to_string());
            return ExitCode::from(EXIT_FAILURE);
        }
    };

    match dispatcher.dispatch(&ctx, argv) {
        Ok(()) => ExitCode::SUCCESS,
        Err(CommandError::Parse(e)) => e.exit(),
        Err(e) => {
            ctx.output.error(&e.to_string());
            ExitCode::from(EXIT_FAILURE)
        }
    }
}
