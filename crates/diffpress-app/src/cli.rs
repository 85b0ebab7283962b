// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line arguments.
//
// Flags are layered on top of the settings record: defaults, then the
// optional `--config` JSON file, then whatever was given explicitly here.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use diffpress_core::error::Result;
use diffpress_core::{PaperSize, RenderConfig, ThemeKind, ViewMode};

#[derive(Parser, Debug)]
#[command(name = "diffpress")]
#[command(about = "Render unified diffs as paginated, review-ready PDFs", long_about = None)]
#[command(version)]
pub struct Args {
    /// Diff files to render; `-` reads standard input
    #[arg(value_name = "INPUT", required = true)]
    pub inputs: Vec<PathBuf>,

    /// Output PDF path
    #[arg(short, long, value_name = "PATH")]
    pub output: PathBuf,

    /// Also write a Word document next to the PDF
    #[arg(long)]
    pub word: bool,

    /// Word document path; implies `--word`
    #[arg(long, value_name = "PATH")]
    pub word_output: Option<PathBuf>,

    /// Title printed in every page header
    #[arg(long)]
    pub title: Option<String>,

    /// Layout of changed lines
    #[arg(long, value_enum)]
    pub view: Option<ViewArg>,

    /// Leave out unchanged context lines (unified view)
    #[arg(long)]
    pub hide_context: bool,

    /// Rotate the paper to landscape
    #[arg(long)]
    pub landscape: bool,

    /// Paper size
    #[arg(long, value_enum)]
    pub paper: Option<PaperArg>,

    /// Code font size in points
    #[arg(long, value_name = "PT")]
    pub font_size: Option<f32>,

    /// Tab stop width in spaces
    #[arg(long = "tabsize", value_name = "N")]
    pub tab_size: Option<usize>,

    /// Colour scheme
    #[arg(long, value_enum)]
    pub theme: Option<ThemeArg>,

    /// Code lines that must follow a hunk header on the same page
    #[arg(long = "min-lines", value_name = "N")]
    pub min_lines: Option<usize>,

    /// Let hunks split across pages instead of moving them whole
    #[arg(long)]
    pub no_keep_hunks: bool,

    /// JSON settings file applied before these flags
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log parser and layout decisions to stderr
    #[arg(long)]
    pub debug: bool,

    #[arg(long, value_name = "PATH")]
    pub mono_font_file: Option<PathBuf>,

    #[arg(long, value_name = "PATH")]
    pub mono_bold_font_file: Option<PathBuf>,

    #[arg(long, value_name = "PATH")]
    pub ui_font_file: Option<PathBuf>,

    #[arg(long, value_name = "PATH")]
    pub ui_bold_font_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ViewArg {
    Unified,
    SideBySide,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ThemeArg {
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PaperArg {
    A4,
    A3,
    A5,
    Letter,
    Legal,
    Tabloid,
}

impl From<ViewArg> for ViewMode {
    fn from(arg: ViewArg) -> Self {
        match arg {
            ViewArg::Unified => Self::Unified,
            ViewArg::SideBySide => Self::SideBySide,
        }
    }
}

impl From<ThemeArg> for ThemeKind {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Light => Self::Light,
            ThemeArg::Dark => Self::Dark,
        }
    }
}

impl From<PaperArg> for PaperSize {
    fn from(arg: PaperArg) -> Self {
        match arg {
            PaperArg::A4 => Self::A4,
            PaperArg::A3 => Self::A3,
            PaperArg::A5 => Self::A5,
            PaperArg::Letter => Self::Letter,
            PaperArg::Legal => Self::Legal,
            PaperArg::Tabloid => Self::Tabloid,
        }
    }
}

impl Args {
    /// Build the validated settings record for this run.
    pub fn render_config(&self) -> Result<RenderConfig> {
        let mut config = match &self.config {
            Some(path) => RenderConfig::load(path)?,
            None => RenderConfig::default(),
        };
        self.apply(&mut config);
        config.validate()?;
        Ok(config)
    }

    /// Where the Word document goes, if one was asked for.
    pub fn word_path(&self) -> Option<PathBuf> {
        match &self.word_output {
            Some(path) => Some(path.clone()),
            None if self.word => Some(self.output.with_extension("docx")),
            None => None,
        }
    }

    /// Overwrite `config` with every flag that was given.
    pub fn apply(&self, config: &mut RenderConfig) {
        if let Some(title) = &self.title {
            config.title = title.clone();
        }
        if let Some(view) = self.view {
            config.view = view.into();
        }
        if let Some(paper) = self.paper {
            config.paper_size = paper.into();
        }
        if let Some(theme) = self.theme {
            config.theme = theme.into();
        }
        if let Some(size) = self.font_size {
            config.font_size = size;
        }
        if let Some(tab) = self.tab_size {
            config.tab_size = tab;
        }
        if let Some(min) = self.min_lines {
            config.min_lines_after_header = min;
        }
        config.hide_context |= self.hide_context;
        config.landscape |= self.landscape;
        config.debug |= self.debug;
        if self.no_keep_hunks {
            config.keep_hunks_together = false;
        }

        let fonts = [
            (&self.mono_font_file, &mut config.mono_font_file),
            (&self.mono_bold_font_file, &mut config.mono_bold_font_file),
            (&self.ui_font_file, &mut config.ui_font_file),
            (&self.ui_bold_font_file, &mut config.ui_bold_font_file),
        ];
        for (flag, slot) in fonts {
            if let Some(path) = flag {
                *slot = Some(path.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diffpress_core::DiffpressError;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(args).unwrap()
    }

    #[test]
    fn minimal_invocation_keeps_defaults() {
        let args = parse(&["diffpress", "-o", "out.pdf", "changes.diff"]);
        assert_eq!(args.output, PathBuf::from("out.pdf"));
        assert_eq!(args.inputs, vec![PathBuf::from("changes.diff")]);

        let config = args.render_config().unwrap();
        assert_eq!(config, RenderConfig::default());
    }

    #[test]
    fn output_and_input_are_required() {
        assert!(Args::try_parse_from(["diffpress", "changes.diff"]).is_err());
        assert!(Args::try_parse_from(["diffpress", "-o", "out.pdf"]).is_err());
    }

    #[test]
    fn flags_override_defaults() {
        let args = parse(&[
            "diffpress",
            "--output",
            "out.pdf",
            "--view",
            "side-by-side",
            "--theme",
            "dark",
            "--paper",
            "letter",
            "--landscape",
            "--hide-context",
            "--font-size",
            "8",
            "--tabsize",
            "8",
            "--min-lines",
            "3",
            "--no-keep-hunks",
            "--title",
            "Release notes",
            "a.diff",
            "-",
        ]);
        let config = args.render_config().unwrap();
        assert_eq!(config.view, ViewMode::SideBySide);
        assert_eq!(config.theme, ThemeKind::Dark);
        assert_eq!(config.paper_size, PaperSize::Letter);
        assert!(config.landscape);
        assert!(config.hide_context);
        assert_eq!(config.font_size, 8.0);
        assert_eq!(config.tab_size, 8);
        assert_eq!(config.min_lines_after_header, 3);
        assert!(!config.keep_hunks_together);
        assert_eq!(config.title, "Release notes");
        assert_eq!(args.inputs.len(), 2);
    }

    #[test]
    fn flags_override_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("diffpress.json");
        std::fs::write(&path, r#"{ "theme": "dark", "font_size": 11.0, "title": "From file" }"#)
            .unwrap();

        let args = parse(&[
            "diffpress",
            "-o",
            "out.pdf",
            "--config",
            path.to_str().unwrap(),
            "--font-size",
            "7.5",
            "x.diff",
        ]);
        let config = args.render_config().unwrap();
        assert_eq!(config.theme, ThemeKind::Dark);
        assert_eq!(config.title, "From file");
        assert_eq!(config.font_size, 7.5);
    }

    #[test]
    fn font_files_are_forwarded() {
        let args = parse(&[
            "diffpress",
            "-o",
            "out.pdf",
            "--mono-font-file",
            "/fonts/mono.ttf",
            "--ui-bold-font-file",
            "/fonts/ui-bold.ttf",
            "x.diff",
        ]);
        let config = args.render_config().unwrap();
        assert_eq!(config.mono_font_file, Some(PathBuf::from("/fonts/mono.ttf")));
        assert_eq!(config.ui_bold_font_file, Some(PathBuf::from("/fonts/ui-bold.ttf")));
        assert_eq!(config.ui_font_file, None);
    }

    #[test]
    fn zero_tab_size_is_rejected() {
        let args = parse(&["diffpress", "-o", "out.pdf", "--tabsize", "0", "x.diff"]);
        assert!(matches!(
            args.render_config(),
            Err(DiffpressError::InvalidConfig(_))
        ));
    }

    #[test]
    fn unknown_view_is_a_parse_error() {
        assert!(Args::try_parse_from(["diffpress", "-o", "o.pdf", "--view", "split", "x"]).is_err());
    }

    #[test]
    fn word_document_is_opt_in() {
        let args = parse(&["diffpress", "-o", "out/review.pdf", "x.diff"]);
        assert_eq!(args.word_path(), None);

        let args = parse(&["diffpress", "-o", "out/review.pdf", "--word", "x.diff"]);
        assert_eq!(args.word_path(), Some(PathBuf::from("out/review.docx")));

        let args = parse(&[
            "diffpress",
            "-o",
            "out/review.pdf",
            "--word-output",
            "notes.docx",
            "x.diff",
        ]);
        assert_eq!(args.word_path(), Some(PathBuf::from("notes.docx")));
    }
}
