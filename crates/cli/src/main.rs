use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use shelfkeep_cli::shell::{print_load_report, print_save_report};
use shelfkeep_cli::{App, Editor, Outcome, Shell};
use shelfkeep_core::Session;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let app = App::parse();

    let filter = app.log_level.as_deref().map_or_else(
        || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        EnvFilter::new,
    );
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let mut session = Session::open(&app.store_config());
    let mut stdout = io::stdout();
    if let Err(e) = print_load_report(&mut stdout, session.load_report()) {
        eprintln!("Failed to write to stdout: {e}");
    }

    let editor = match Editor::new() {
        Ok(editor) => editor,
        Err(e) => {
            eprintln!("Failed to start the line editor: {e}");
            return ExitCode::FAILURE;
        }
    };

    match Shell::new(&mut session, editor, io::stdout()).run() {
        Ok(Outcome::Exit) => {}
        Ok(outcome) => tracing::info!(?outcome, "shell ended early"),
        Err(e) => eprintln!("Terminal error: {e}"),
    }

    let report = session.close();
    if let Err(e) = print_save_report(&mut stdout, &report).and_then(|()| stdout.flush()) {
        eprintln!("Failed to write to stdout: {e}");
    }

    if report.is_clean() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
