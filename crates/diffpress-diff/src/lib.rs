// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// diffpress-diff — Turns raw diff bytes into the structured diff model.
//
// Bytes of unknown encoding are decoded (BOM sniffing, UTF-16 null-byte
// heuristic, lossy UTF-8 fallback), sanitized of invisible characters and
// export artifacts, then parsed by a permissive three-state machine that drops
// what it cannot classify instead of failing.

pub mod encoding;
pub mod parser;
pub mod sanitize;

pub use encoding::{SourceEncoding, decode, detect_encoding};
pub use parser::{DiffParser, parse_unified_diff};
pub use sanitize::{DecodedText, sanitize};

use diffpress_core::FileDiff;

/// Decode, sanitize, and parse one input in a single call.
pub fn parse_bytes(bytes: &[u8]) -> Vec<FileDiff> {
    let text = decode(bytes);
    parse_unified_diff(&text)
}
