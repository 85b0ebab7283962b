// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Render configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DiffpressError, Result};
use crate::types::{MIN_PAPER_SIDE_MM, Orientation, PaperSize, ThemeKind, ViewMode};

/// Settings record consumed by the diff/layout core and the renderer.
///
/// Every field has a default, so a JSON settings file only needs the keys it
/// wants to change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Title printed in every page header.
    pub title: String,
    /// Unified or side-by-side layout.
    pub view: ViewMode,
    /// Drop context lines from unified output.
    pub hide_context: bool,
    /// Rotate the paper to landscape.
    pub landscape: bool,
    /// Paper size before orientation is applied.
    pub paper_size: PaperSize,
    /// Code font size in points.
    pub font_size: f32,
    /// Tab stop width used when expanding tabs.
    pub tab_size: usize,
    /// Light or dark palette.
    pub theme: ThemeKind,
    /// Log parser decisions at debug level.
    pub debug: bool,
    /// Code lines that must follow a hunk header on the same page.
    pub min_lines_after_header: usize,
    /// Move a whole hunk to a fresh page when it fits there but not here.
    pub keep_hunks_together: bool,
    /// Optional font file overrides, tried before system fonts.
    pub mono_font_file: Option<PathBuf>,
    pub mono_bold_font_file: Option<PathBuf>,
    pub ui_font_file: Option<PathBuf>,
    pub ui_bold_font_file: Option<PathBuf>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            title: "Changed Code".into(),
            view: ViewMode::Unified,
            hide_context: false,
            landscape: false,
            paper_size: PaperSize::A4,
            font_size: 9.5,
            tab_size: 4,
            theme: ThemeKind::Light,
            debug: false,
            min_lines_after_header: 2,
            keep_hunks_together: true,
            mono_font_file: None,
            mono_bold_font_file: None,
            ui_font_file: None,
            ui_bold_font_file: None,
        }
    }
}

impl RenderConfig {
    /// Read settings from a JSON file. Missing keys take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the layout engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !(self.font_size.is_finite() && self.font_size >= 4.0 && self.font_size <= 72.0) {
            return Err(DiffpressError::InvalidConfig(format!(
                "font size must be between 4 and 72 pt, got {}",
                self.font_size
            )));
        }
        if self.tab_size == 0 || self.tab_size > 16 {
            return Err(DiffpressError::InvalidConfig(format!(
                "tab size must be between 1 and 16, got {}",
                self.tab_size
            )));
        }
        if let PaperSize::Custom {
            width_mm,
            height_mm,
        } = self.paper_size
        {
            if width_mm.min(height_mm) < MIN_PAPER_SIDE_MM {
                return Err(DiffpressError::InvalidConfig(format!(
                    "custom paper must be at least {MIN_PAPER_SIDE_MM} mm on each side, got {width_mm}x{height_mm} mm"
                )));
            }
        }
        Ok(())
    }

    pub fn orientation(&self) -> Orientation {
        if self.landscape {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_cli_defaults() {
        let config = RenderConfig::default();
        assert_eq!(config.font_size, 9.5);
        assert_eq!(config.tab_size, 4);
        assert_eq!(config.min_lines_after_header, 2);
        assert_eq!(config.orientation(), Orientation::Portrait);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("diffpress.json");
        std::fs::write(&path, r#"{ "view": "side-by-side", "theme": "dark", "landscape": true }"#)
            .unwrap();

        let config = RenderConfig::load(&path).unwrap();
        assert_eq!(config.view, ViewMode::SideBySide);
        assert_eq!(config.theme, ThemeKind::Dark);
        assert_eq!(config.orientation(), Orientation::Landscape);
        assert_eq!(config.title, "Changed Code");
    }

    #[test]
    fn rejects_zero_tab_size() {
        let config = RenderConfig {
            tab_size: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(DiffpressError::InvalidConfig(_))
        ));
    }

    #[test]
    fn rejects_tiny_custom_paper() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.json");
        std::fs::write(
            &path,
            r#"{ "paper_size": { "custom": { "width_mm": 10, "height_mm": 10 } } }"#,
        )
        .unwrap();
        assert!(matches!(
            RenderConfig::load(&path),
            Err(DiffpressError::InvalidConfig(_))
        ));

        let narrow = RenderConfig {
            paper_size: PaperSize::Custom {
                width_mm: 300,
                height_mm: 60,
            },
            ..Default::default()
        };
        assert!(narrow.validate().is_err());

        let usable = RenderConfig {
            paper_size: PaperSize::Custom {
                width_mm: MIN_PAPER_SIDE_MM,
                height_mm: 400,
            },
            landscape: true,
            ..Default::default()
        };
        assert!(usable.validate().is_ok());
    }

    #[test]
    fn malformed_json_is_a_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            RenderConfig::load(&path),
            Err(DiffpressError::Serialization(_))
        ));
    }
}
