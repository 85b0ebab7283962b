// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the command line.
//
// Every error is mapped to a one-line message, a suggestion, and the process
// exit code the CLI should use.

use crate::error::DiffpressError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The input was read but contained nothing we can render.
    UnsupportedInput,
    /// The user must fix an argument, a path, or a settings file.
    ActionRequired,
    /// Something outside the user's control failed (disk, PDF backend).
    Permanent,
}

/// A human-readable error with a plain message and actionable hints.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain summary (printed first, prefixed with `[ERROR]`).
    pub message: String,
    /// What the user should try.
    pub suggestion: String,
    /// Extra bullet points printed under "Hints:".
    pub hints: Vec<String>,
    /// Process exit code.
    pub exit_code: i32,
    pub severity: Severity,
}

impl HumanError {
    /// Render as the multi-line block written to stderr.
    pub fn to_stderr_text(&self) -> String {
        let mut out = format!("[ERROR] {}\n{}\n", self.message, self.suggestion);
        if !self.hints.is_empty() {
            out.push_str("Hints:\n");
            for hint in &self.hints {
                out.push_str("  \u{2022} ");
                out.push_str(hint);
                out.push('\n');
            }
        }
        out
    }
}

/// Convert a `DiffpressError` into a `HumanError`.
pub fn humanize_error(err: &DiffpressError) -> HumanError {
    match err {
        DiffpressError::NoParsableDiffs => HumanError {
            message: "No parsable diffs found.".into(),
            suggestion: "The input did not contain any `@@` hunk headers.".into(),
            hints: vec![
                "Use a unified diff: e.g., `git diff <commit>` or `git show <commit>`".into(),
                "Not supported: `--word-diff`, `--name-only`, `--name-status`".into(),
                "Binary-only changes have no hunks and are skipped".into(),
            ],
            exit_code: 2,
            severity: Severity::UnsupportedInput,
        },

        DiffpressError::InputNotFound(path) => HumanError {
            message: format!("Input file not found: {path}"),
            suggestion: "Check the path, or pass `-` to read the diff from standard input.".into(),
            hints: Vec::new(),
            exit_code: 1,
            severity: Severity::ActionRequired,
        },

        DiffpressError::InvalidConfig(detail) => HumanError {
            message: "The settings are not valid.".into(),
            suggestion: format!("Fix the value and try again. ({detail})"),
            hints: Vec::new(),
            exit_code: 1,
            severity: Severity::ActionRequired,
        },

        DiffpressError::Serialization(e) => HumanError {
            message: "The settings file could not be read.".into(),
            suggestion: format!("Make sure it is valid JSON. ({e})"),
            hints: Vec::new(),
            exit_code: 1,
            severity: Severity::ActionRequired,
        },

        DiffpressError::PdfError(detail) => HumanError {
            message: "The PDF could not be produced.".into(),
            suggestion: format!("Try a different font or output path. ({detail})"),
            hints: Vec::new(),
            exit_code: 1,
            severity: Severity::Permanent,
        },

        DiffpressError::DocxError(detail) => HumanError {
            message: "The Word document could not be produced.".into(),
            suggestion: format!("The PDF was written; try another `--word-output` path. ({detail})"),
            hints: Vec::new(),
            exit_code: 1,
            severity: Severity::Permanent,
        },

        DiffpressError::Io(io_err) => humanize_io_error(io_err),
    }
}

fn humanize_io_error(err: &std::io::Error) -> HumanError {
    let (message, suggestion, severity) = match err.kind() {
        std::io::ErrorKind::NotFound => (
            "A file or folder could not be found.",
            "Check that the input exists and the output folder is there.",
            Severity::ActionRequired,
        ),
        std::io::ErrorKind::PermissionDenied => (
            "Permission denied.",
            "Choose an output location you are allowed to write to.",
            Severity::ActionRequired,
        ),
        _ => (
            "Reading or writing a file failed.",
            "Check free disk space and try again.",
            Severity::Permanent,
        ),
    };
    HumanError {
        message: message.into(),
        suggestion: format!("{suggestion} ({err})"),
        hints: Vec::new(),
        exit_code: 1,
        severity,
    }
}
