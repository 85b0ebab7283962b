// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// diffpress — render unified diffs as paginated PDFs (and optionally .docx).
//
// Pipeline: read inputs -> decode and parse -> resolve fonts -> lay out and
// paginate -> draw the PDF, then the Word document when asked. Errors are
// printed in plain language on stderr and mapped to the process exit code.

mod cli;
mod input;

use std::process::ExitCode;

use clap::Parser;
use diffpress_core::error::Result;
use diffpress_core::human_errors::humanize_error;
use diffpress_core::{DiffpressError, RenderConfig};
use diffpress_document::{DocxWriter, FontSet, PdfWriter};
use diffpress_layout::layout_document;
use tracing::info;

use crate::cli::Args;

fn main() -> ExitCode {
    let args = Args::parse();

    let config = match args.render_config() {
        Ok(config) => config,
        Err(err) => return report(&err),
    };
    init_tracing(config.debug);

    match run(&args, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report(&err),
    }
}

fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();
}

fn run(args: &Args, config: &RenderConfig) -> Result<()> {
    info!("Diffpress v{} starting", env!("CARGO_PKG_VERSION"));

    let files = input::collect_diffs(&args.inputs)?;
    let hunks: usize = files.iter().map(|f| f.hunks.len()).sum();
    info!(files = files.len(), hunks, "Parsed diffs");

    let fonts = FontSet::resolve(config);
    let layout = layout_document(&files, &fonts, config);
    PdfWriter::from_config(config).write_to_file(&layout, &fonts, &args.output)?;
    if let Some(path) = args.word_path() {
        DocxWriter::from_config(config).write_to_file(&layout, &path)?;
    }

    info!(
        pages = layout.page_count().max(1),
        output = %args.output.display(),
        "Done"
    );
    Ok(())
}

fn report(err: &DiffpressError) -> ExitCode {
    let human = humanize_error(err);
    eprint!("{}", human.to_stderr_text());
    ExitCode::from(u8::try_from(human.exit_code).unwrap_or(1))
}
