// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Font resolution and measurement.
//
// Each of the four roles (UI, UI bold, mono, mono bold) is resolved once per
// document through a chain that cannot fail:
//
//   requested font file -> known system family (via fontdb) -> built-in Courier
//
// A candidate face is only accepted when both the metrics reader (swash) and
// the PDF embedder (printpdf) can parse it, so the widths used for layout are
// always the widths of the face that gets drawn.

use std::fmt;
use std::path::{Path, PathBuf};

use diffpress_core::RenderConfig;
use diffpress_layout::measure::DEFAULT_LINE_GAP;
use diffpress_layout::{FixedAdvance, FontRole, TextMeasure, TextStyle};
use fontdb::{Database, Family, Query, Weight};
use printpdf::{BuiltinFont, FontId, ParsedFont, PdfDocument, PdfWarnMsg};
use swash::FontRef;
use tracing::{debug, info, instrument, warn};

/// System families tried for the monospaced roles, in order.
const MONO_FAMILIES: &[&str] = &["DejaVu Sans Mono", "Consolas", "Courier New"];

/// System families tried for the UI roles, in order.
const UI_FAMILIES: &[&str] = &["DejaVu Sans", "Segoe UI", "Arial"];

/// All roles, in the order faces are stored.
const ROLES: [FontRole; 4] = [
    FontRole::Ui,
    FontRole::UiBold,
    FontRole::Mono,
    FontRole::MonoBold,
];

fn role_slot(role: FontRole) -> usize {
    match role {
        FontRole::Ui => 0,
        FontRole::UiBold => 1,
        FontRole::Mono => 2,
        FontRole::MonoBold => 3,
    }
}

fn is_bold(role: FontRole) -> bool {
    matches!(role, FontRole::UiBold | FontRole::MonoBold)
}

fn builtin_for(role: FontRole) -> BuiltinFont {
    if is_bold(role) {
        BuiltinFont::CourierBold
    } else {
        BuiltinFont::Courier
    }
}

/// Where a resolved face came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FaceSource {
    File(PathBuf),
    System(String),
    Builtin,
}

impl fmt::Display for FaceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "file {}", path.display()),
            Self::System(family) => write!(f, "system family {family}"),
            Self::Builtin => f.write_str("built-in Courier"),
        }
    }
}

/// A TrueType/OpenType face accepted by both swash and printpdf.
#[derive(Clone)]
struct EmbeddedFace {
    data: Vec<u8>,
    index: u32,
    units_per_em: f32,
    parsed: ParsedFont,
}

impl EmbeddedFace {
    /// Validate raw font bytes. `None` means the chain should move on.
    fn accept(data: Vec<u8>, index: u32) -> Option<Self> {
        let font = FontRef::from_index(&data, index as usize)?;
        let units_per_em = font.metrics(&[]).units_per_em as f32;
        if units_per_em <= 0.0 {
            return None;
        }
        // Must at least cover the digits and letters used by code and gutters.
        let charmap = font.charmap();
        if ['0', '9', 'a', 'Z', '@'].iter().any(|&c| charmap.map(c) == 0) {
            return None;
        }

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let parsed = ParsedFont::from_bytes(&data, index as usize, &mut warnings)?;
        if !warnings.is_empty() {
            debug!(warnings = warnings.len(), "Font parsed with warnings");
        }
        Some(Self {
            data,
            index,
            units_per_em,
            parsed,
        })
    }

    /// Advance of `text` in em units.
    fn advance_em(&self, text: &str) -> Option<f32> {
        let font = FontRef::from_index(&self.data, self.index as usize)?;
        let charmap = font.charmap();
        let metrics = font.glyph_metrics(&[]);
        let units: f32 = text
            .chars()
            .map(|ch| metrics.advance_width(charmap.map(ch)))
            .sum();
        Some(units / self.units_per_em)
    }
}

#[derive(Clone)]
enum FaceKind {
    Embedded(Box<EmbeddedFace>),
    Builtin(BuiltinFont),
}

/// One role's resolved face.
#[derive(Clone)]
pub struct ResolvedFace {
    pub role: FontRole,
    pub source: FaceSource,
    kind: FaceKind,
}

impl ResolvedFace {
    fn builtin(role: FontRole) -> Self {
        Self {
            role,
            source: FaceSource::Builtin,
            kind: FaceKind::Builtin(builtin_for(role)),
        }
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self.kind, FaceKind::Builtin(_))
    }
}

impl fmt::Debug for ResolvedFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedFace")
            .field("role", &self.role)
            .field("source", &self.source)
            .finish()
    }
}

/// A face as referenced from PDF drawing ops.
#[derive(Debug, Clone, PartialEq)]
pub enum FontHandle {
    Embedded(FontId),
    Builtin(BuiltinFont),
}

/// Drawing handles for all four roles, valid for one `PdfDocument`.
#[derive(Debug, Clone)]
pub struct FontHandles([FontHandle; 4]);

impl FontHandles {
    pub fn get(&self, role: FontRole) -> &FontHandle {
        &self.0[role_slot(role)]
    }
}

/// The four faces used by a document. Also the layout engine's
/// [`TextMeasure`] implementation.
#[derive(Debug, Clone)]
pub struct FontSet {
    faces: [ResolvedFace; 4],
}

impl Default for FontSet {
    /// Built-in Courier for every role.
    fn default() -> Self {
        Self {
            faces: ROLES.map(ResolvedFace::builtin),
        }
    }
}

impl FontSet {
    /// Resolve every role from the configured font files and the fonts
    /// installed on this system. Never fails.
    #[instrument(skip_all)]
    pub fn resolve(config: &RenderConfig) -> Self {
        let requested = [
            config.ui_font_file.as_deref(),
            config.ui_bold_font_file.as_deref(),
            config.mono_font_file.as_deref(),
            config.mono_bold_font_file.as_deref(),
        ];
        let mut system: Option<Database> = None;

        let faces = ROLES.map(|role| {
            let file = requested[role_slot(role)];
            let face = resolve_role(role, file, &mut system);
            info!(role = ?role, source = %face.source, "Resolved font");
            face
        });
        Self { faces }
    }

    pub fn face(&self, role: FontRole) -> &ResolvedFace {
        &self.faces[role_slot(role)]
    }

    /// Register embedded faces with `doc` and return drawing handles.
    pub fn register(&self, doc: &mut PdfDocument) -> FontHandles {
        FontHandles(std::array::from_fn(|slot| match &self.faces[slot].kind {
            FaceKind::Embedded(face) => FontHandle::Embedded(doc.add_font(&face.parsed)),
            FaceKind::Builtin(builtin) => FontHandle::Builtin(*builtin),
        }))
    }
}

fn resolve_role(
    role: FontRole,
    file: Option<&Path>,
    system: &mut Option<Database>,
) -> ResolvedFace {
    if let Some(path) = file {
        match load_file(path) {
            Some(embedded) => {
                return ResolvedFace {
                    role,
                    source: FaceSource::File(path.to_path_buf()),
                    kind: FaceKind::Embedded(Box::new(embedded)),
                };
            }
            None => warn!(
                role = ?role,
                path = %path.display(),
                "Font file unusable, trying system fonts"
            ),
        }
    }

    let db = system.get_or_insert_with(|| {
        let mut db = Database::new();
        db.load_system_fonts();
        debug!(faces = db.len(), "Loaded system font database");
        db
    });

    let families = match role {
        FontRole::Mono | FontRole::MonoBold => MONO_FAMILIES,
        FontRole::Ui | FontRole::UiBold => UI_FAMILIES,
    };
    for family in families {
        if let Some(embedded) = load_system(db, family, is_bold(role)) {
            return ResolvedFace {
                role,
                source: FaceSource::System((*family).to_string()),
                kind: FaceKind::Embedded(Box::new(embedded)),
            };
        }
    }

    debug!(role = ?role, "No usable font found, using built-in Courier");
    ResolvedFace::builtin(role)
}

fn load_file(path: &Path) -> Option<EmbeddedFace> {
    let data = match std::fs::read(path) {
        Ok(data) => data,
        Err(err) => {
            warn!(path = %path.display(), %err, "Cannot read font file");
            return None;
        }
    };
    EmbeddedFace::accept(data, 0)
}

fn load_system(db: &Database, family: &str, bold: bool) -> Option<EmbeddedFace> {
    let query = Query {
        families: &[Family::Name(family)],
        weight: if bold { Weight::BOLD } else { Weight::NORMAL },
        ..Query::default()
    };
    let id = db.query(&query)?;
    let (data, index) = db.with_face_data(id, |data, index| (data.to_vec(), index))?;
    let face = EmbeddedFace::accept(data, index);
    if face.is_none() {
        debug!(family, bold, "System face rejected");
    }
    face
}

impl TextMeasure for FontSet {
    fn text_width(&self, text: &str, style: TextStyle) -> f32 {
        match &self.face(style.role).kind {
            FaceKind::Embedded(face) => match face.advance_em(text) {
                Some(em) => em * style.size,
                None => FixedAdvance::COURIER.text_width(text, style),
            },
            FaceKind::Builtin(_) => FixedAdvance::COURIER.text_width(text, style),
        }
    }

    fn line_height(&self, style: TextStyle) -> f32 {
        style.size + DEFAULT_LINE_GAP
    }
}
