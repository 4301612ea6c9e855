//! Footprint (`.kicad_mod`) handling.
//!
//! This module handles reading footprint library files and rendering placed
//! footprints into board text.
//!
//! # File Structure
//!
//! A `.kicad_mod` file is a single S-expression document:
//!
//! ```text
//! (module R_0402 (layer F.Cu) (tedit 5F68FEEE)
//!   (descr "Resistor SMD 0402")
//!   (attr smd)
//!   (fp_text reference REF** (at 0 -1.17) (layer F.SilkS)
//!     (effects (font (size 1 1) (thickness 0.15)))
//!   )
//!   (fp_line (start -0.93 -0.47) (end 0.93 -0.47) (layer F.CrtYd) (width 0.05))
//!   (pad 1 smd roundrect (at -0.51 0) (size 0.54 0.64) (layers F.Cu F.Paste F.Mask))
//! )
//! ```
//!
//! KiCad 6 renamed the root token from `module` to `footprint`; the reader
//! accepts both and the writer emits the legacy `module` form.

pub mod primitives;
mod reader;
mod writer;

pub use primitives::{Layer, LayerSet, Line, Pad, PadKind, PadNet, PadShape, TextItem, TextRole};

use crate::kicad::error::{KicadError, KicadResult};
use std::path::Path;

/// Mounting attribute of a footprint (`attr` token).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FootprintAttr {
    /// Surface-mount part.
    Smd,
    /// Part excluded from position files and BOM.
    Virtual,
}

impl FootprintAttr {
    /// Returns the KiCad attribute token.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Smd => "smd",
            Self::Virtual => "virtual",
        }
    }

    /// Parses an attribute token.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "smd" => Some(Self::Smd),
            "virtual" => Some(Self::Virtual),
            _ => None,
        }
    }
}

/// A complete footprint.
#[derive(Debug, Clone, PartialEq)]
pub struct Footprint {
    /// Footprint name (e.g., "`R_0402`").
    pub name: String,

    /// Layer the footprint is placed on.
    pub layer: Layer,

    /// Description of the footprint.
    pub descr: String,

    /// Search tags.
    pub tags: String,

    /// Mounting attribute. Absent for plain through-hole parts.
    pub attr: Option<FootprintAttr>,

    /// Text fields (reference, value, user text).
    pub texts: Vec<TextItem>,

    /// Graphic lines (courtyard, silkscreen, fabrication).
    pub lines: Vec<Line>,

    /// Pads in the footprint.
    pub pads: Vec<Pad>,
}

impl Footprint {
    /// Creates a new empty footprint with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            layer: Layer::FCu,
            descr: String::new(),
            tags: String::new(),
            attr: None,
            texts: Vec::new(),
            lines: Vec::new(),
            pads: Vec::new(),
        }
    }

    /// Reads a footprint from a `.kicad_mod` file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid
    /// footprint document.
    pub fn read(path: impl AsRef<Path>) -> KicadResult<Self> {
        let path = path.as_ref();
        let text =
            std::fs::read_to_string(path).map_err(|e| KicadError::file_read(path, e))?;
        let footprint = Self::parse(&text)?;

        tracing::debug!(
            path = %path.display(),
            name = %footprint.name,
            pads = footprint.pads.len(),
            "Read footprint"
        );

        Ok(footprint)
    }

    /// Parses a footprint from `.kicad_mod` document text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid footprint document.
    pub fn parse(text: &str) -> KicadResult<Self> {
        reader::parse_module(text)
    }

    /// Renders this footprint as board text placed at the given position.
    ///
    /// The output is a `(module ...)` block indented for embedding in a
    /// `.kicad_pcb` document. Pad coordinates stay relative to the footprint
    /// origin; the `(at ...)` element carries the placement.
    #[must_use]
    pub fn render_placed(&self, x_mm: f64, y_mm: f64, rotation: f64) -> String {
        writer::render_placed(self, x_mm, y_mm, rotation)
    }

    /// Adds a pad to the footprint.
    pub fn add_pad(&mut self, pad: Pad) {
        self.pads.push(pad);
    }

    /// Adds a graphic line to the footprint.
    pub fn add_line(&mut self, line: Line) {
        self.lines.push(line);
    }

    /// Adds a text field to the footprint.
    pub fn add_text(&mut self, text: TextItem) {
        self.texts.push(text);
    }

    /// Gets a pad by number.
    #[must_use]
    pub fn pad(&self, number: &str) -> Option<&Pad> {
        self.pads.iter().find(|p| p.number == number)
    }

    /// Gets a mutable pad by number.
    pub fn pad_mut(&mut self, number: &str) -> Option<&mut Pad> {
        self.pads.iter_mut().find(|p| p.number == number)
    }

    /// Returns the reference designator field text, if present.
    #[must_use]
    pub fn reference(&self) -> Option<&str> {
        self.field(TextRole::Reference)
    }

    /// Returns the value field text, if present.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.field(TextRole::Value)
    }

    /// Sets the reference designator field, creating it if absent.
    pub fn set_reference(&mut self, text: impl Into<String>) {
        self.set_field(TextRole::Reference, text.into());
    }

    /// Sets the value field, creating it if absent.
    pub fn set_value(&mut self, text: impl Into<String>) {
        self.set_field(TextRole::Value, text.into());
    }

    fn field(&self, role: TextRole) -> Option<&str> {
        self.texts
            .iter()
            .find(|t| t.role == role)
            .map(|t| t.text.as_str())
    }

    fn set_field(&mut self, role: TextRole, text: String) {
        if let Some(item) = self.texts.iter_mut().find(|t| t.role == role) {
            item.text = text;
            return;
        }
        let item = match role {
            TextRole::Reference => TextItem::reference(text, 0.0, -1.5),
            _ => TextItem::value(text, 0.0, 1.5),
        };
        self.texts.push(item);
    }

    /// Returns the extent of the pad centres as `(min_x, min_y, max_x, max_y)`,
    /// or None if the footprint has no pads.
    #[must_use]
    pub fn pad_extent(&self) -> Option<(f64, f64, f64, f64)> {
        extent(self.pads.iter().map(|p| (p.x, p.y)))
    }

    /// Returns the extent of the courtyard outline as
    /// `(min_x, min_y, max_x, max_y)`, or None if no courtyard is drawn.
    #[must_use]
    pub fn courtyard_extent(&self) -> Option<(f64, f64, f64, f64)> {
        extent(
            self.lines
                .iter()
                .filter(|l| matches!(l.layer, Layer::FCrtYd | Layer::BCrtYd))
                .flat_map(|l| [(l.x1, l.y1), (l.x2, l.y2)]),
        )
    }
}

/// Bounding extent of a point set.
fn extent(points: impl Iterator<Item = (f64, f64)>) -> Option<(f64, f64, f64, f64)> {
    let mut bounds: Option<(f64, f64, f64, f64)> = None;
    for (x, y) in points {
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((min_x, min_y, max_x, max_y)) => (
                min_x.min(x),
                min_y.min(y),
                max_x.max(x),
                max_y.max(y),
            ),
        });
    }
    bounds
}
