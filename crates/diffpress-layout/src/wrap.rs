// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Width-driven line wrapping and tab expansion.

use crate::measure::{TextMeasure, TextStyle};

/// Only break at whitespace found in the last 40% of a row.
const SOFT_BREAK_RATIO: f32 = 0.6;

/// Expand tabs to spaces, honouring tab stops every `tab_size` columns.
pub fn expand_tabs(text: &str, tab_size: usize) -> String {
    if !text.contains('\t') {
        return text.to_string();
    }
    let tab_size = tab_size.max(1);
    let mut out = String::with_capacity(text.len() + tab_size * 2);
    let mut column = 0;
    for ch in text.chars() {
        if ch == '\t' {
            let pad = tab_size - column % tab_size;
            out.extend(std::iter::repeat_n(' ', pad));
            column += pad;
        } else {
            out.push(ch);
            column += 1;
        }
    }
    out
}

/// Split `text` into visual rows no wider than `max_width`.
///
/// Each row is the longest prefix that fits, found by binary search over
/// character counts. If that prefix has a space or tab in its final 40%, the
/// row ends there and the blank is consumed; otherwise the row is hard-broken.
/// A row always holds at least one character, so text narrower than a single
/// glyph still terminates. Empty text yields one empty row.
pub fn wrap_text<M: TextMeasure + ?Sized>(
    text: &str,
    max_width: f32,
    measure: &M,
    style: TextStyle,
) -> Vec<String> {
    if text.is_empty() {
        return vec![String::new()];
    }
    let fits = |s: &str| measure.text_width(s, style) <= max_width;
    if fits(text) {
        return vec![text.to_string()];
    }

    let mut rows = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        if fits(rest) {
            rows.push(rest.to_string());
            break;
        }

        // bounds[k] is the byte offset after k characters.
        let bounds: Vec<usize> = rest
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(rest.len()))
            .collect();
        let chars = bounds.len() - 1;

        let (mut lo, mut hi, mut cut) = (1, chars, 1);
        while lo <= hi {
            let mid = (lo + hi) / 2;
            if fits(&rest[..bounds[mid]]) {
                cut = mid;
                lo = mid + 1;
            } else {
                hi = mid - 1;
            }
        }

        let slice = &rest[..bounds[cut]];
        let blank = slice
            .chars()
            .enumerate()
            .filter(|(_, c)| matches!(c, ' ' | '\t'))
            .map(|(idx, _)| idx)
            .last();

        match blank {
            Some(idx) if idx >= (SOFT_BREAK_RATIO * cut as f32) as usize => {
                rows.push(rest[..bounds[idx]].trim_end().to_string());
                rest = &rest[bounds[idx + 1]..];
            }
            _ => {
                rows.push(slice.to_string());
                rest = &rest[bounds[cut]..];
            }
        }
    }
    rows
}
