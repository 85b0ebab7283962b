// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text sanitizing: removes what terminals, chat tools, and Windows shells
// smuggle into copied diffs.
//
// - CRLF and lone CR become LF.
// - BOMs and zero-width characters are removed wherever they appear.
// - Non-breaking and typographic space variants become ASCII spaces.
// - Ellipsis/bullet glyphs at the very start of a line are removed.
//
// The transformation is idempotent.

use std::fmt;
use std::ops::Deref;

/// Leading glyph runs left behind by terminal scrollback and export tools.
/// Longest first so `···` wins over a single dot-like glyph.
const ARTIFACT_PREFIXES: &[&str] = &[
    "\u{b7}\u{b7}\u{b7}", // ···
    "...",
    "\u{2026}", // …
    "\u{2022}", // •
    "\u{2027}", // ‧
    "\u{2219}", // ∙
    "\u{22c5}", // ⋅
];

/// Characters dropped outright.
fn is_invisible(ch: char) -> bool {
    matches!(ch, '\u{feff}' | '\u{200b}' | '\u{200c}' | '\u{200d}' | '\u{2060}')
}

/// Characters normalised to an ASCII space.
fn is_space_variant(ch: char) -> bool {
    matches!(ch, '\u{a0}' | '\u{202f}' | '\u{205f}' | '\u{2000}'..='\u{200a}')
}

/// Sanitize `text` as described in the module docs.
pub fn sanitize(text: &str) -> String {
    let mut normalised = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                normalised.push('\n');
            }
            c if is_invisible(c) => {}
            c if is_space_variant(c) => normalised.push(' '),
            c => normalised.push(c),
        }
    }

    let mut out = String::with_capacity(normalised.len());
    for (idx, line) in normalised.split('\n').enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        out.push_str(strip_leading_artifacts(line));
    }
    out
}

/// Remove artifact glyphs (and the blanks after them) from the start of a
/// line, repeating until none is left.
fn strip_leading_artifacts(mut line: &str) -> &str {
    while let Some(prefix) = ARTIFACT_PREFIXES.iter().find(|p| line.starts_with(**p)) {
        line = line[prefix.len()..].trim_start_matches([' ', '\t']);
    }
    line
}

/// Sanitized Unicode text, ready for the diff parser.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DecodedText(String);

impl DecodedText {
    /// Sanitize `raw` and wrap it.
    pub fn new(raw: &str) -> Self {
        Self(sanitize(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Deref for DecodedText {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DecodedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
