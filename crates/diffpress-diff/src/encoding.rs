// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Input encoding detection.
//
// 1. BOM: UTF-8, UTF-16 LE, UTF-16 BE.
// 2. No BOM: dense nulls in alternating byte positions mean UTF-16 (the shape
//    PowerShell `>` redirection produces), odd positions for LE, even for BE.
// 3. Otherwise UTF-8, with U+FFFD for undecodable sequences.
//
// Detection never fails; the worst case is a lossy UTF-8 decode.

use encoding_rs::{UTF_8, UTF_16BE, UTF_16LE};
use tracing::debug;

use crate::sanitize::DecodedText;

/// Bytes examined by the UTF-16 null-byte heuristic.
const SNIFF_LEN: usize = 4096;

/// Share of code units that must carry a null in one byte position before
/// the input is treated as BOM-less UTF-16.
const NULL_DENSITY: f32 = 0.3;

/// Encodings the detector can select.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceEncoding {
    /// UTF-8 without BOM (also covers plain ASCII).
    Utf8,
    /// UTF-8 with a leading `EF BB BF`.
    Utf8Bom,
    /// UTF-16 LE with a leading `FF FE`.
    Utf16LeBom,
    /// UTF-16 BE with a leading `FE FF`.
    Utf16BeBom,
    /// UTF-16 LE recognised from its null-byte pattern.
    Utf16Le,
    /// UTF-16 BE recognised from its null-byte pattern.
    Utf16Be,
}

impl SourceEncoding {
    /// Name used in debug logs.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Utf8 => "UTF-8",
            Self::Utf8Bom => "UTF-8 BOM",
            Self::Utf16LeBom => "UTF-16 LE BOM",
            Self::Utf16BeBom => "UTF-16 BE BOM",
            Self::Utf16Le => "UTF-16 LE (no BOM)",
            Self::Utf16Be => "UTF-16 BE (no BOM)",
        }
    }

    /// Length of the BOM to skip before decoding.
    pub fn bom_len(&self) -> usize {
        match self {
            Self::Utf8Bom => 3,
            Self::Utf16LeBom | Self::Utf16BeBom => 2,
            Self::Utf8 | Self::Utf16Le | Self::Utf16Be => 0,
        }
    }

    /// The encoding_rs decoder for this encoding.
    pub fn to_encoding_rs(&self) -> &'static encoding_rs::Encoding {
        match self {
            Self::Utf8 | Self::Utf8Bom => UTF_8,
            Self::Utf16LeBom | Self::Utf16Le => UTF_16LE,
            Self::Utf16BeBom | Self::Utf16Be => UTF_16BE,
        }
    }
}

/// Pick the decode path for `bytes`.
pub fn detect_encoding(bytes: &[u8]) -> SourceEncoding {
    if let Some((encoding, _)) = encoding_rs::Encoding::for_bom(bytes) {
        if encoding == UTF_8 {
            return SourceEncoding::Utf8Bom;
        }
        if encoding == UTF_16LE {
            return SourceEncoding::Utf16LeBom;
        }
        if encoding == UTF_16BE {
            return SourceEncoding::Utf16BeBom;
        }
    }
    sniff_utf16(bytes).unwrap_or(SourceEncoding::Utf8)
}

/// Null-byte heuristic for BOM-less UTF-16.
fn sniff_utf16(bytes: &[u8]) -> Option<SourceEncoding> {
    let sample = &bytes[..bytes.len().min(SNIFF_LEN)];
    let units = sample.len() / 2;
    if units == 0 {
        return None;
    }

    let (mut even_nulls, mut odd_nulls) = (0usize, 0usize);
    for (idx, byte) in sample.iter().enumerate() {
        if *byte == 0 {
            if idx % 2 == 0 {
                even_nulls += 1;
            } else {
                odd_nulls += 1;
            }
        }
    }

    let even = even_nulls as f32 / units as f32;
    let odd = odd_nulls as f32 / units as f32;
    let quiet = NULL_DENSITY / 3.0;

    if odd >= NULL_DENSITY && even < quiet {
        Some(SourceEncoding::Utf16Le)
    } else if even >= NULL_DENSITY && odd < quiet {
        Some(SourceEncoding::Utf16Be)
    } else {
        None
    }
}

/// Decode without sanitizing. Returns the text, the chosen encoding, and
/// whether replacement characters had to be inserted.
pub fn decode_raw(bytes: &[u8]) -> (String, SourceEncoding, bool) {
    let encoding = detect_encoding(bytes);
    let body = &bytes[encoding.bom_len()..];
    let (text, had_errors) = encoding.to_encoding_rs().decode_without_bom_handling(body);
    (text.into_owned(), encoding, had_errors)
}

/// Decode `bytes` and sanitize the result.
pub fn decode(bytes: &[u8]) -> DecodedText {
    let (text, encoding, had_errors) = decode_raw(bytes);
    debug!(
        encoding = encoding.display_name(),
        bytes = bytes.len(),
        had_errors,
        "decoded diff input"
    );
    DecodedText::new(&text)
}
