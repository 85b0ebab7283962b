// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified diff parser.
//
// A permissive three-state machine (seeking file → seeking hunk → in hunk).
// Nothing here returns an error: unclassifiable lines outside a hunk are
// dropped, files that never reach a hunk header are omitted, and hunks whose
// bodies disagree with their header counts are kept as-is and logged.
//
// Accepted file headers: `diff --git a/X b/Y`, `--- X` / `+++ Y` pairs, and
// `rename from` / `rename to`. Mode, index, similarity, and binary notices are
// skipped.

use diffpress_core::{DiffLine, FileDiff, Hunk, LineKind};
use tracing::{debug, instrument, trace};

/// Metadata lines that never carry content.
const SKIPPED_PREFIXES: &[&str] = &[
    "index ",
    "new file mode",
    "deleted file mode",
    "old mode",
    "new mode",
    "similarity index",
    "dissimilarity index",
    "copy from ",
    "copy to ",
    "Binary files ",
];

/// Where the state machine currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// No file is open.
    SeekingFile,
    /// A file is open; waiting for its next `@@` header.
    SeekingHunk,
    /// Accumulating lines for the last hunk of the open file.
    InHunk,
}

/// The numeric part of a hunk header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HunkRange {
    start: u32,
    count: u32,
    /// Whether the count was written out (`12,3`) or implied (`12`).
    explicit_count: bool,
}

impl HunkRange {
    fn write_into(&self, out: &mut String) {
        out.push_str(&self.start.to_string());
        if self.explicit_count {
            out.push(',');
            out.push_str(&self.count.to_string());
        }
    }
}

/// Streaming parser. Feed lines with [`DiffParser::push_line`], then call
/// [`DiffParser::finish`]; or use [`parse_unified_diff`] for whole texts.
#[derive(Debug)]
pub struct DiffParser {
    state: State,
    files: Vec<FileDiff>,
    current: Option<FileDiff>,
    rename_from: Option<String>,
    rename_to: Option<String>,
    old_cursor: u32,
    new_cursor: u32,
    old_remaining: u32,
    new_remaining: u32,
}

impl Default for DiffParser {
    fn default() -> Self {
        Self::new()
    }
}

impl DiffParser {
    pub fn new() -> Self {
        Self {
            state: State::SeekingFile,
            files: Vec::new(),
            current: None,
            rename_from: None,
            rename_to: None,
            old_cursor: 0,
            new_cursor: 0,
            old_remaining: 0,
            new_remaining: 0,
        }
    }

    /// Whether the open hunk still expects lines according to its header.
    fn hunk_open(&self) -> bool {
        self.state == State::InHunk && (self.old_remaining > 0 || self.new_remaining > 0)
    }

    /// Consume one line (without its trailing newline).
    pub fn push_line(&mut self, line: &str) {
        if line.starts_with("diff --git ") {
            self.start_git_file(line);
            return;
        }

        if let Some((old, new, section)) = parse_hunk_header(line) {
            self.start_hunk(old, new, section);
            return;
        }

        if self.hunk_open() {
            self.push_body_line(line);
            return;
        }

        if SKIPPED_PREFIXES.iter().any(|p| line.starts_with(p)) {
            trace!(line, "skipping metadata line");
            return;
        }

        if let Some(from) = line.strip_prefix("rename from ") {
            self.rename_from = Some(from.trim().to_owned());
            return;
        }
        if let Some(to) = line.strip_prefix("rename to ") {
            self.rename_to = Some(to.trim().to_owned());
            return;
        }

        if line.starts_with("--- ") {
            self.old_path_line(line);
            return;
        }
        if line.starts_with("+++ ") {
            self.new_path_line(line);
            return;
        }

        if self.state == State::InHunk {
            self.trailing_line(line);
        } else {
            trace!(line, "dropping line outside any hunk");
        }
    }

    /// Flush the last file and return everything parsed.
    pub fn finish(mut self) -> Vec<FileDiff> {
        self.flush_file();
        for file in &mut self.files {
            if file.old_path.is_empty() && file.new_path.is_empty() {
                file.old_path = "(Unnamed OLD)".into();
                file.new_path = "(Unnamed NEW)".into();
            }
        }
        debug!(files = self.files.len(), "parse complete");
        self.files
    }

    // -- File headers ---------------------------------------------------------

    fn start_git_file(&mut self, line: &str) {
        self.flush_file();
        let (old_path, new_path) = parse_diff_git_paths(line).unwrap_or_default();
        debug!(%old_path, %new_path, "file header (diff --git)");
        self.current = Some(FileDiff {
            old_path,
            new_path,
            hunks: Vec::new(),
        });
        self.state = State::SeekingHunk;
    }

    /// A `---` line opens a new file unless the open file is still waiting
    /// for its first hunk (the `diff --git` + `---` + `+++` shape). The path
    /// it carries replaces the one from `diff --git`; `/dev/null` clears it.
    fn old_path_line(&mut self, line: &str) {
        let needs_new_file = self.current.as_ref().is_none_or(|f| !f.hunks.is_empty());
        if needs_new_file {
            self.flush_file();
            self.current = Some(FileDiff::default());
        }
        if let Some(file) = self.current.as_mut() {
            file.old_path = parse_path_line(line).unwrap_or_default();
        }
        self.state = State::SeekingHunk;
    }

    fn new_path_line(&mut self, line: &str) {
        if self.current.as_ref().is_none_or(|f| !f.hunks.is_empty()) {
            self.flush_file();
            self.current = Some(FileDiff::default());
        }
        let path = parse_path_line(line);
        let rename_from = self.rename_from.take();
        let rename_to = self.rename_to.take();
        if let Some(file) = self.current.as_mut() {
            file.new_path = path.unwrap_or_default();
            if file.old_path.is_empty() {
                file.old_path = rename_from.unwrap_or_default();
            }
            if file.new_path.is_empty() {
                file.new_path = rename_to.unwrap_or_default();
            }
            debug!(old_path = %file.old_path, new_path = %file.new_path, "file header (---/+++)");
        }
        self.state = State::SeekingHunk;
    }

    fn flush_file(&mut self) {
        self.close_hunk();
        if let Some(file) = self.current.take() {
            if file.hunks.is_empty() {
                debug!(label = file.label(), "file has no hunks, omitted");
            } else {
                self.files.push(file);
            }
        }
        self.rename_from = None;
        self.rename_to = None;
        self.state = State::SeekingFile;
    }

    // -- Hunks ----------------------------------------------------------------

    fn start_hunk(&mut self, old: HunkRange, new: HunkRange, section: Option<String>) {
        self.close_hunk();

        let mut header = String::from("@@ -");
        old.write_into(&mut header);
        header.push_str(" +");
        new.write_into(&mut header);
        header.push_str(" @@");
        debug!(%header, "hunk header");

        let file = self.current.get_or_insert_with(|| {
            debug!("hunk before any file header, opening anonymous file");
            FileDiff::default()
        });
        file.hunks.push(Hunk {
            header,
            section,
            old_start: old.start,
            old_count: old.count,
            new_start: new.start,
            new_count: new.count,
            lines: Vec::new(),
        });

        self.old_cursor = old.start;
        self.new_cursor = new.start;
        self.old_remaining = old.count;
        self.new_remaining = new.count;
        self.state = State::InHunk;
    }

    /// Log a count mismatch for the hunk being left. Never fails.
    fn close_hunk(&mut self) {
        if self.state != State::InHunk {
            return;
        }
        if let Some(hunk) = self.current.as_ref().and_then(|f| f.hunks.last()) {
            if !hunk.counts_match() {
                debug!(
                    header = %hunk.header,
                    old_declared = hunk.old_count,
                    old_seen = hunk.old_side_lines(),
                    new_declared = hunk.new_count,
                    new_seen = hunk.new_side_lines(),
                    "hunk line counts disagree with header"
                );
            }
        }
        self.state = State::SeekingHunk;
    }

    /// A line after the hunk's declared counts are used up. Diff-shaped lines
    /// are still accepted; anything else is noise.
    fn trailing_line(&mut self, line: &str) {
        // `-- ` on its own is the signature separator of `git format-patch`.
        if line == "-- " {
            debug!("patch signature, closing file");
            self.flush_file();
            return;
        }
        match line.as_bytes().first() {
            Some(b'+' | b'-' | b' ' | b'\\') => self.push_body_line(line),
            _ => trace!(line, "dropping line after complete hunk"),
        }
    }

    fn push_body_line(&mut self, line: &str) {
        let (kind, content) = match line.as_bytes().first() {
            Some(b'+') => (LineKind::Addition, &line[1..]),
            Some(b'-') => (LineKind::Deletion, &line[1..]),
            Some(b' ') => (LineKind::Context, &line[1..]),
            Some(b'\\') => {
                self.mark_no_newline();
                return;
            }
            // Blank or unprefixed line: editors strip the leading space of
            // empty context lines.
            _ => (LineKind::Context, line),
        };

        let mut diff_line = DiffLine::new(kind, content);
        if kind.on_old_side() {
            diff_line.old_line_no = Some(self.old_cursor);
            self.old_cursor = self.old_cursor.saturating_add(1);
            self.old_remaining = self.old_remaining.saturating_sub(1);
        }
        if kind.on_new_side() {
            diff_line.new_line_no = Some(self.new_cursor);
            self.new_cursor = self.new_cursor.saturating_add(1);
            self.new_remaining = self.new_remaining.saturating_sub(1);
        }

        if let Some(hunk) = self.current.as_mut().and_then(|f| f.hunks.last_mut()) {
            hunk.lines.push(diff_line);
        }
    }

    fn mark_no_newline(&mut self) {
        if let Some(last) = self
            .current
            .as_mut()
            .and_then(|f| f.hunks.last_mut())
            .and_then(|h| h.lines.last_mut())
        {
            last.no_newline = true;
        }
    }
}

/// Parse a whole sanitized text into file diffs.
#[instrument(skip_all, fields(text_len = text.len()))]
pub fn parse_unified_diff(text: &str) -> Vec<FileDiff> {
    let mut parser = DiffParser::new();
    for line in text.lines() {
        parser.push_line(line);
    }
    parser.finish()
}

// -- Line helpers -------------------------------------------------------------

/// Parse `@@ -a[,b] +c[,d] @@[ section]`.
fn parse_hunk_header(line: &str) -> Option<(HunkRange, HunkRange, Option<String>)> {
    let rest = line.strip_prefix("@@")?.trim_start();
    let rest = rest.strip_prefix('-')?;
    let (old, rest) = take_range(rest)?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let rest = rest.trim_start().strip_prefix('+')?;
    let (new, rest) = take_range(rest)?;
    let tail = rest.trim_start().strip_prefix("@@")?;
    let section = tail.trim();
    let section = (!section.is_empty()).then(|| section.to_owned());
    Some((old, new, section))
}

/// Read `start[,count]` from the front of `s`. A range whose end does not
/// fit in a `u32` is not a range.
fn take_range(s: &str) -> Option<(HunkRange, &str)> {
    let end = s
        .find(|c: char| !(c.is_ascii_digit() || c == ','))
        .unwrap_or(s.len());
    let (range, rest) = s.split_at(end);
    let parsed = match range.split_once(',') {
        Some((start, count)) => HunkRange {
            start: start.parse().ok()?,
            count: count.parse().ok()?,
            explicit_count: true,
        },
        None => HunkRange {
            start: range.parse().ok()?,
            count: 1,
            explicit_count: false,
        },
    };
    parsed.start.checked_add(parsed.count)?;
    Some((parsed, rest))
}

/// Paths from `diff --git a/X b/Y`.
fn parse_diff_git_paths(line: &str) -> Option<(String, String)> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 4 {
        return None;
    }
    let old = parts[2].strip_prefix("a/").unwrap_or(parts[2]);
    let new = parts[3].strip_prefix("b/").unwrap_or(parts[3]);
    Some((old.to_owned(), new.to_owned()))
}

/// Path from a `--- X` / `+++ Y` line. `/dev/null` means "no such side".
fn parse_path_line(line: &str) -> Option<String> {
    let rest = line.get(4..)?.trim();
    if rest == "/dev/null" {
        return None;
    }
    let rest = rest
        .strip_prefix("a/")
        .or_else(|| rest.strip_prefix("b/"))
        .unwrap_or(rest);
    let path = sanitize_path(rest);
    (!path.is_empty()).then_some(path)
}

/// Cut at the first character outside the path-safe set. Drops trailing
/// timestamps (`file\t2024-01-01 ...`) and pasted garbage.
pub fn sanitize_path(raw: &str) -> String {
    let end = raw
        .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-' | ' ' | '/' | '\\')))
        .unwrap_or(raw.len());
    raw[..end].trim().to_owned()
}
