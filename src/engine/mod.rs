//! Board assembly and relative placement.
//!
//! [`Part`] pairs a footprint with a board position; [`Board`] collects
//! parts, assigns net codes, and writes `.kicad_pcb` files. Placement is
//! relative: [`Board::place_near`] offsets a part from an anchor so the
//! two bounding boxes sit a given gap apart along one axis.

use crate::kicad::board::{compose_board, BoardSetup, NetDecl};
use crate::kicad::Footprint;
use crate::output::write_with_backup;
use indexmap::IndexMap;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::info;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur while assembling a board.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A reference designator was used for two parts.
    #[error("Duplicate reference designator: {reference}")]
    DuplicateReference {
        /// The repeated designator.
        reference: String,
    },

    /// An operation named a part the board does not contain.
    #[error("No part {reference} on the board")]
    UnknownPart {
        /// The missing designator.
        reference: String,
    },

    /// A net assignment named a pad the part does not have.
    #[error("Part {reference} has no pad {pad}")]
    UnknownPad {
        /// Part designator.
        reference: String,
        /// The missing pad number.
        pad: String,
    },

    /// A direction string was not top, bottom, left, or right.
    #[error("Invalid direction {direction}: expected top, bottom, left, or right")]
    InvalidDirection {
        /// The rejected text.
        direction: String,
    },

    /// Failed to write the board file.
    #[error("Failed to write board: {path}")]
    Save {
        /// Path to the file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

impl EngineError {
    /// Creates a duplicate-reference error.
    pub fn duplicate_reference(reference: impl Into<String>) -> Self {
        Self::DuplicateReference {
            reference: reference.into(),
        }
    }

    /// Creates an unknown-part error.
    pub fn unknown_part(reference: impl Into<String>) -> Self {
        Self::UnknownPart {
            reference: reference.into(),
        }
    }

    /// Creates an unknown-pad error.
    pub fn unknown_pad(reference: impl Into<String>, pad: impl Into<String>) -> Self {
        Self::UnknownPad {
            reference: reference.into(),
            pad: pad.into(),
        }
    }

    /// Creates an invalid-direction error.
    pub fn invalid_direction(direction: impl Into<String>) -> Self {
        Self::InvalidDirection {
            direction: direction.into(),
        }
    }

    /// Creates a save error.
    pub fn save(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Save {
            path: path.into(),
            source,
        }
    }
}

/// Relative placement direction on the board canvas.
///
/// KiCad's Y axis grows downward, so `Top` is negative Y.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Negative Y.
    Top,
    /// Positive Y.
    Bottom,
    /// Negative X.
    Left,
    /// Positive X.
    #[default]
    Right,
}

impl Direction {
    /// Returns the lowercase direction name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl FromStr for Direction {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "top" => Ok(Self::Top),
            "bottom" => Ok(Self::Bottom),
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            _ => Err(EngineError::invalid_direction(s)),
        }
    }
}

/// Fallback bounding-box size for parts with no usable geometry.
const DEFAULT_BBOX_MM: (f64, f64) = (6.0, 3.0);

/// Margin added to a pad-extent bounding box, per dimension.
const PAD_EXTENT_MARGIN_MM: f64 = 1.0;

/// A footprint instance on the board: the footprint model plus position
/// and rotation in board coordinates.
#[derive(Debug, Clone)]
pub struct Part {
    footprint: Footprint,
    x: f64,
    y: f64,
    rotation: f64,
}

impl Part {
    /// Creates a part at the origin, stamping the reference designator
    /// onto the footprint.
    #[must_use]
    pub fn new(footprint: Footprint, reference: impl Into<String>) -> Self {
        let mut footprint = footprint;
        footprint.set_reference(reference.into());
        Self {
            footprint,
            x: 0.0,
            y: 0.0,
            rotation: 0.0,
        }
    }

    /// Returns the reference designator.
    #[must_use]
    pub fn reference(&self) -> &str {
        self.footprint.reference().unwrap_or("")
    }

    /// Returns the value field, if set.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.footprint.value()
    }

    /// Sets the value field on the footprint.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.footprint.set_value(value);
    }

    /// Returns the footprint model.
    #[must_use]
    pub fn footprint(&self) -> &Footprint {
        &self.footprint
    }

    /// Returns the part origin in millimetres.
    #[must_use]
    pub fn position_mm(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    /// Moves the part origin.
    pub fn set_position_mm(&mut self, x_mm: f64, y_mm: f64) {
        self.x = x_mm;
        self.y = y_mm;
    }

    /// Returns the rotation in degrees.
    #[must_use]
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Sets the rotation in degrees.
    pub fn set_rotation(&mut self, degrees: f64) {
        self.rotation = degrees;
    }

    /// Approximate bounding-box size as `(width_mm, height_mm)`.
    ///
    /// Uses the courtyard outline when one is drawn, else the pad-centre
    /// extent widened by [`PAD_EXTENT_MARGIN_MM`] per dimension, else a
    /// conservative default. The intermediate steps only apply when both
    /// dimensions come out positive, so single-row pad layouts fall
    /// through to the default.
    #[must_use]
    pub fn bbox_size_mm(&self) -> (f64, f64) {
        if let Some((min_x, min_y, max_x, max_y)) = self.footprint.courtyard_extent() {
            let (w, h) = (max_x - min_x, max_y - min_y);
            if w > 0.0 && h > 0.0 {
                return (w, h);
            }
        }

        if let Some((min_x, min_y, max_x, max_y)) = self.footprint.pad_extent() {
            let (w, h) = (max_x - min_x, max_y - min_y);
            if w > 0.0 && h > 0.0 {
                return (w + PAD_EXTENT_MARGIN_MM, h + PAD_EXTENT_MARGIN_MM);
            }
        }

        DEFAULT_BBOX_MM
    }
}

/// Part container and placement engine.
///
/// Nets are registered by name and assigned codes from 1 in first-use
/// order; code 0 is the unconnected net the board format reserves.
#[derive(Debug, Clone, Default)]
pub struct Board {
    parts: Vec<Part>,
    nets: IndexMap<String, u32>,
    setup: BoardSetup,
}

impl Board {
    /// Creates an empty board with default setup.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty board with the given setup.
    #[must_use]
    pub fn with_setup(setup: BoardSetup) -> Self {
        Self {
            parts: Vec::new(),
            nets: IndexMap::new(),
            setup,
        }
    }

    /// Returns the parts in insertion order.
    #[must_use]
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Gets a part by reference designator.
    #[must_use]
    pub fn part(&self, reference: &str) -> Option<&Part> {
        self.parts.iter().find(|p| p.reference() == reference)
    }

    /// Gets a mutable part by reference designator.
    pub fn part_mut(&mut self, reference: &str) -> Option<&mut Part> {
        self.parts.iter_mut().find(|p| p.reference() == reference)
    }

    fn index_of(&self, reference: &str) -> Option<usize> {
        self.parts.iter().position(|p| p.reference() == reference)
    }

    /// Adds a part, keeping its current position.
    ///
    /// # Errors
    ///
    /// Returns an error if the reference designator is already taken.
    pub fn add_part(&mut self, part: Part) -> EngineResult<()> {
        if self.part(part.reference()).is_some() {
            return Err(EngineError::duplicate_reference(part.reference()));
        }
        self.parts.push(part);
        Ok(())
    }

    /// Adds a part at the given position.
    ///
    /// # Errors
    ///
    /// Returns an error if the reference designator is already taken.
    pub fn add_part_at(&mut self, part: Part, x_mm: f64, y_mm: f64) -> EngineResult<()> {
        let mut part = part;
        part.set_position_mm(x_mm, y_mm);
        self.add_part(part)
    }

    /// Places `reference` beside `anchor` so the two bounding boxes sit
    /// `gap_mm` apart along the direction axis, and returns the computed
    /// position.
    ///
    /// # Errors
    ///
    /// Returns an error if either part is not on the board.
    pub fn place_near(
        &mut self,
        reference: &str,
        anchor: &str,
        gap_mm: f64,
        direction: Direction,
    ) -> EngineResult<(f64, f64)> {
        let part_index = self
            .index_of(reference)
            .ok_or_else(|| EngineError::unknown_part(reference))?;
        let anchor_index = self
            .index_of(anchor)
            .ok_or_else(|| EngineError::unknown_part(anchor))?;

        let (ax, ay) = self.parts[anchor_index].position_mm();
        let (aw, ah) = self.parts[anchor_index].bbox_size_mm();
        let (pw, ph) = self.parts[part_index].bbox_size_mm();

        let (nx, ny) = match direction {
            Direction::Top => (ax, ay - ah / 2.0 - ph / 2.0 - gap_mm),
            Direction::Bottom => (ax, ay + ah / 2.0 + ph / 2.0 + gap_mm),
            Direction::Left => (ax - aw / 2.0 - pw / 2.0 - gap_mm, ay),
            Direction::Right => (ax + aw / 2.0 + pw / 2.0 + gap_mm, ay),
        };

        self.parts[part_index].set_position_mm(nx, ny);
        Ok((nx, ny))
    }

    /// Registers a net name, assigning the next code on first use, and
    /// returns its code.
    pub fn define_net(&mut self, name: &str) -> u32 {
        let next_code = self.nets.len() as u32 + 1;
        *self.nets.entry(name.to_string()).or_insert(next_code)
    }

    /// Returns the code assigned to a net name, if defined.
    #[must_use]
    pub fn net_code(&self, name: &str) -> Option<u32> {
        self.nets.get(name).copied()
    }

    /// Returns the number of named nets.
    #[must_use]
    pub fn net_count(&self) -> usize {
        self.nets.len()
    }

    /// Attaches one pad of a part to a named net, defining the net on
    /// first use, and returns the net code.
    ///
    /// # Errors
    ///
    /// Returns an error if the part or the pad does not exist. The net
    /// stays defined either way, matching netlists that declare nets
    /// before their nodes resolve.
    pub fn connect(&mut self, net: &str, reference: &str, pad: &str) -> EngineResult<u32> {
        let code = self.define_net(net);

        let part = self
            .parts
            .iter_mut()
            .find(|p| p.reference() == reference)
            .ok_or_else(|| EngineError::unknown_part(reference))?;
        let pad_item = part
            .footprint
            .pad_mut(pad)
            .ok_or_else(|| EngineError::unknown_pad(reference, pad))?;

        pad_item.set_net(code, net);
        Ok(code)
    }

    /// Renders the board as `.kicad_pcb` document text.
    #[must_use]
    pub fn to_board_text(&self) -> String {
        let nets: Vec<NetDecl> = self
            .nets
            .iter()
            .map(|(name, code)| NetDecl {
                code: *code,
                name: name.clone(),
            })
            .collect();
        let modules: Vec<String> = self
            .parts
            .iter()
            .map(|p| p.footprint.render_placed(p.x, p.y, p.rotation))
            .collect();

        compose_board(&self.setup, &nets, &modules)
    }

    /// Writes the board to a `.kicad_pcb` file.
    ///
    /// With `backup` set, an existing file at the path is renamed aside
    /// first.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: impl AsRef<Path>, backup: bool) -> EngineResult<()> {
        let path = path.as_ref();
        let text = self.to_board_text();
        write_with_backup(path, &text, backup).map_err(|e| EngineError::save(path, e))?;

        info!(
            path = %path.display(),
            parts = self.parts.len(),
            nets = self.nets.len(),
            "Wrote board"
        );
        Ok(())
    }
}
