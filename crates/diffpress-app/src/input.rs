// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Reading diff inputs from files and standard input.

use std::io::{self, Read};
use std::path::{Path, PathBuf};

use diffpress_core::error::{DiffpressError, Result};
use diffpress_core::FileDiff;
use tracing::{debug, warn};

/// Path that selects standard input.
pub const STDIN_MARKER: &str = "-";

/// Read and parse every input in order.
///
/// Missing files are reported and skipped. Fails with
/// [`DiffpressError::NoParsableDiffs`] when nothing parsable is left.
pub fn collect_diffs(inputs: &[PathBuf]) -> Result<Vec<FileDiff>> {
    collect_diffs_with(inputs, io::stdin().lock())
}

fn collect_diffs_with<R: Read>(inputs: &[PathBuf], mut stdin: R) -> Result<Vec<FileDiff>> {
    let mut files = Vec::new();
    for path in inputs {
        let bytes = match read_input(path, &mut stdin) {
            Ok(bytes) => bytes,
            Err(DiffpressError::InputNotFound(missing)) => {
                warn!(path = %missing, "File not found, skipping");
                continue;
            }
            Err(err) => return Err(err),
        };
        let parsed = diffpress_diff::parse_bytes(&bytes);
        debug!(
            input = %path.display(),
            bytes = bytes.len(),
            files = parsed.len(),
            "Parsed input"
        );
        files.extend(parsed);
    }

    if files.is_empty() {
        return Err(DiffpressError::NoParsableDiffs);
    }
    Ok(files)
}

fn read_input<R: Read>(path: &Path, stdin: &mut R) -> Result<Vec<u8>> {
    if path.as_os_str() == STDIN_MARKER {
        let mut bytes = Vec::new();
        stdin.read_to_end(&mut bytes)?;
        return Ok(bytes);
    }
    match std::fs::read(path) {
        Ok(bytes) => Ok(bytes),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            Err(DiffpressError::InputNotFound(path.display().to_string()))
        }
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "--- a/f.py\n+++ b/f.py\n@@ -1,2 +1,3 @@\n context\n-old\n+new1\n+new2\n";

    #[test]
    fn reads_stdin_for_dash() {
        let files = collect_diffs_with(&[PathBuf::from("-")], SAMPLE.as_bytes()).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].hunks.len(), 1);
    }

    #[test]
    fn missing_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let present = dir.path().join("present.diff");
        std::fs::write(&present, SAMPLE).unwrap();

        let inputs = [dir.path().join("absent.diff"), present];
        let files = collect_diffs_with(&inputs, io::empty()).unwrap();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn files_keep_input_order() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("1.diff");
        let second = dir.path().join("2.diff");
        std::fs::write(&first, "--- a/one.rs\n+++ b/one.rs\n@@ -1 +1 @@\n-a\n+b\n").unwrap();
        std::fs::write(&second, "--- a/two.rs\n+++ b/two.rs\n@@ -1 +1 @@\n-a\n+b\n").unwrap();

        let files = collect_diffs_with(&[first, second], io::empty()).unwrap();
        let labels: Vec<&str> = files.iter().map(|f| f.label()).collect();
        assert_eq!(labels, ["one.rs", "two.rs"]);
    }

    #[test]
    fn nothing_parsable_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let names = dir.path().join("names.txt");
        std::fs::write(&names, "M\tsrc/lib.rs\nA\tsrc/new.rs\n").unwrap();

        let err = collect_diffs_with(&[names], io::empty()).unwrap_err();
        assert!(matches!(err, DiffpressError::NoParsableDiffs));
    }

    #[test]
    fn all_inputs_missing_is_an_error() {
        let err = collect_diffs_with(&[PathBuf::from("/nonexistent/x.diff")], io::empty())
            .unwrap_err();
        assert!(matches!(err, DiffpressError::NoParsableDiffs));
    }

    #[test]
    fn read_input_reports_missing_path() {
        let err = read_input(Path::new("/nonexistent/x.diff"), &mut io::empty()).unwrap_err();
        assert!(matches!(err, DiffpressError::InputNotFound(p) if p == "/nonexistent/x.diff"));
    }
}
