//! Check a stylesheet from the command line.
//!
//! Prints every declaration that looks like it is missing `calc()`,
//! followed by the available quick fixes.
//!
//! Run with: cargo run -p calc-lint-editor --example check_file -- styles.css

use std::path::PathBuf;

use calc_lint_core::position::Range;
use calc_lint_editor::prelude::*;

fn main() -> calc_lint_editor::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let Some(path) = std::env::args_os().nth(1).map(PathBuf::from) else {
        eprintln!("usage: check_file <stylesheet.css>");
        std::process::exit(2);
    };

    let text = std::fs::read_to_string(&path)
        .map_err(|e| calc_lint_editor::Error::io(&path, e))?;
    let document = TextDocument::from_path(&path, 1, text);

    let mut config = EditorConfig::load_user()?;
    config.prompt_on_activation = false;
    config.enabled = true;

    let mut host = MemoryHost::new();
    let mut session = CalcSession::new(config);
    session.activate(Some(&document), &mut host);

    let diagnostics = host.diagnostics_for(document.uri());
    for diagnostic in diagnostics {
        println!(
            "{}:{}:{}: {:?}: {}",
            path.display(),
            diagnostic.range.start.line + 1,
            diagnostic.range.start.character + 1,
            diagnostic.severity,
            diagnostic.message
        );
    }

    let whole = Range::new(
        document.position_at(0),
        document.position_at(document.text().len()),
    );
    for action in session.code_actions(&document, whole) {
        println!(
            "  fix at {}:{}: {}",
            action.edit.range.start.line + 1,
            action.edit.range.start.character + 1,
            action.edit.new_text
        );
    }

    println!("{} problem(s)", diagnostics.len());
    Ok(())
}
