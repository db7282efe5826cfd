//! `rails-credentials`: show and edit Rails encrypted credentials.
//!
//! Startup sequence:
//! 1. Parse arguments (flags fall back to `RAILS_ENV`, `RAILS_MASTER_KEY`,
//!    `VISUAL`).
//! 2. Initialise stderr logging.
//! 3. Resolve file locations and the master key, then dispatch.

mod cli;
mod commands;
mod context;
mod editor;
mod fs;
mod telemetry;

use std::io;

use anyhow::Result;
use clap::Parser;
use tracing::debug;

use cli::{Cli, Command};
use context::Context;
use editor::ExternalEditor;

fn main() -> Result<()> {
    let cli = Cli::parse();
    telemetry::init(cli.global.verbose)?;

    let ctx = Context::resolve(&cli.global)?;
    match cli.command {
        Command::Show => {
            let stdout = io::stdout();
            commands::show::run(&ctx, &mut stdout.lock())
        }
        Command::Edit { editor } => {
            let surface = ExternalEditor::resolve(editor, std::env::var("EDITOR").ok());
            debug!(editor = surface.command(), "editor selected");
            commands::edit::run(&ctx, &surface)
        }
    }
}
