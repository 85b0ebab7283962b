// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Diffpress.
//
// Only `NoParsableDiffs` is raised by the diff/layout core. Decoding anomalies,
// hunk count mismatches, and font failures degrade silently and never reach
// this type.

use thiserror::Error;

/// Top-level error type for all Diffpress operations.
#[derive(Debug, Error)]
pub enum DiffpressError {
    // -- Diff input --
    #[error("no parsable diffs found")]
    NoParsableDiffs,

    #[error("input file not found: {0}")]
    InputNotFound(String),

    // -- Settings --
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // -- Output --
    #[error("PDF operation failed: {0}")]
    PdfError(String),

    #[error("Word document could not be written: {0}")]
    DocxError(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, DiffpressError>;
