//! Footprint primitive types.
//!
//! These types represent the geometric elements that make up a footprint:
//! pads, graphic lines, and text fields.

use bitflags::bitflags;

bitflags! {
    /// Set of board layers a pad's copper and aperture openings appear on.
    ///
    /// KiCad writes these as layer lists like `(layers F.Cu F.Paste F.Mask)`,
    /// with `*.Cu` standing for both copper layers on through-hole pads.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct LayerSet: u16 {
        /// Front copper.
        const F_CU = 1 << 0;
        /// Back copper.
        const B_CU = 1 << 1;
        /// Front solder paste.
        const F_PASTE = 1 << 2;
        /// Back solder paste.
        const B_PASTE = 1 << 3;
        /// Front solder mask.
        const F_MASK = 1 << 4;
        /// Back solder mask.
        const B_MASK = 1 << 5;
        /// Front silkscreen.
        const F_SILKS = 1 << 6;
        /// Back silkscreen.
        const B_SILKS = 1 << 7;
    }
}

impl LayerSet {
    /// Layer set for a top-side SMD pad.
    #[must_use]
    pub const fn smd_top() -> Self {
        Self::F_CU.union(Self::F_PASTE).union(Self::F_MASK)
    }

    /// Layer set for a plated through-hole pad.
    #[must_use]
    pub const fn plated_hole() -> Self {
        Self::F_CU
            .union(Self::B_CU)
            .union(Self::F_MASK)
            .union(Self::B_MASK)
    }

    /// Returns the KiCad layer tokens in canonical order, collapsing
    /// front/back pairs into `*.` wildcards where both sides are present.
    #[must_use]
    pub fn tokens(&self) -> Vec<&'static str> {
        let mut tokens = Vec::new();
        let mut push_pair = |front: Self, back: Self, both: &'static str, f: &'static str, b| {
            if self.contains(front | back) {
                tokens.push(both);
            } else if self.contains(front) {
                tokens.push(f);
            } else if self.contains(back) {
                tokens.push(b);
            }
        };
        push_pair(Self::F_CU, Self::B_CU, "*.Cu", "F.Cu", "B.Cu");
        push_pair(Self::F_PASTE, Self::B_PASTE, "*.Paste", "F.Paste", "B.Paste");
        push_pair(Self::F_MASK, Self::B_MASK, "*.Mask", "F.Mask", "B.Mask");
        push_pair(Self::F_SILKS, Self::B_SILKS, "*.SilkS", "F.SilkS", "B.SilkS");
        tokens
    }

    /// Parses a single layer token, including `*.` wildcards.
    #[must_use]
    pub fn parse_token(s: &str) -> Option<Self> {
        match s {
            "F.Cu" => Some(Self::F_CU),
            "B.Cu" => Some(Self::B_CU),
            "*.Cu" => Some(Self::F_CU | Self::B_CU),
            "F.Paste" => Some(Self::F_PASTE),
            "B.Paste" => Some(Self::B_PASTE),
            "*.Paste" => Some(Self::F_PASTE | Self::B_PASTE),
            "F.Mask" => Some(Self::F_MASK),
            "B.Mask" => Some(Self::B_MASK),
            "*.Mask" => Some(Self::F_MASK | Self::B_MASK),
            "F.SilkS" => Some(Self::F_SILKS),
            "B.SilkS" => Some(Self::B_SILKS),
            "*.SilkS" => Some(Self::F_SILKS | Self::B_SILKS),
            _ => None,
        }
    }
}

/// Board layers graphic items and text can live on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    /// Front copper.
    FCu,
    /// Back copper.
    BCu,
    /// Front silkscreen.
    FSilkS,
    /// Back silkscreen.
    BSilkS,
    /// Front fabrication notes.
    FFab,
    /// Back fabrication notes.
    BFab,
    /// Front courtyard.
    FCrtYd,
    /// Back courtyard.
    BCrtYd,
    /// Board outline.
    EdgeCuts,
}

impl Layer {
    /// Returns the KiCad layer name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FCu => "F.Cu",
            Self::BCu => "B.Cu",
            Self::FSilkS => "F.SilkS",
            Self::BSilkS => "B.SilkS",
            Self::FFab => "F.Fab",
            Self::BFab => "B.Fab",
            Self::FCrtYd => "F.CrtYd",
            Self::BCrtYd => "B.CrtYd",
            Self::EdgeCuts => "Edge.Cuts",
        }
    }

    /// Parses a layer from its KiCad name.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "F.Cu" => Some(Self::FCu),
            "B.Cu" => Some(Self::BCu),
            "F.SilkS" => Some(Self::FSilkS),
            "B.SilkS" => Some(Self::BSilkS),
            "F.Fab" => Some(Self::FFab),
            "B.Fab" => Some(Self::BFab),
            "F.CrtYd" => Some(Self::FCrtYd),
            "B.CrtYd" => Some(Self::BCrtYd),
            "Edge.Cuts" => Some(Self::EdgeCuts),
            _ => None,
        }
    }
}

/// Pad mounting kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadKind {
    /// Surface-mount pad.
    Smd,
    /// Plated through-hole pad.
    ThruHole,
}

impl PadKind {
    /// Returns the KiCad pad type token.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Smd => "smd",
            Self::ThruHole => "thru_hole",
        }
    }

    /// Parses a pad type token.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "smd" => Some(Self::Smd),
            "thru_hole" => Some(Self::ThruHole),
            _ => None,
        }
    }
}

/// Pad copper shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadShape {
    /// Rectangular pad.
    Rect,
    /// Rectangle with rounded corners.
    RoundRect,
    /// Circular pad.
    Circle,
    /// Oval/oblong pad.
    Oval,
}

impl PadShape {
    /// Returns the KiCad shape token.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Rect => "rect",
            Self::RoundRect => "roundrect",
            Self::Circle => "circle",
            Self::Oval => "oval",
        }
    }

    /// Parses a shape token.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "rect" => Some(Self::Rect),
            "roundrect" => Some(Self::RoundRect),
            "circle" => Some(Self::Circle),
            "oval" => Some(Self::Oval),
            _ => None,
        }
    }
}

/// Net assignment carried by a placed pad.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PadNet {
    /// Net code (1-based; 0 is the unconnected net).
    pub code: u32,
    /// Net name.
    pub name: String,
}

/// A footprint pad.
#[derive(Debug, Clone, PartialEq)]
pub struct Pad {
    /// Pad number (e.g., "1", "2", "A1").
    pub number: String,

    /// Mounting kind.
    pub kind: PadKind,

    /// Copper shape.
    pub shape: PadShape,

    /// X position in mm (from footprint origin).
    pub x: f64,

    /// Y position in mm (from footprint origin).
    pub y: f64,

    /// Pad width in mm.
    pub width: f64,

    /// Pad height in mm.
    pub height: f64,

    /// Rotation angle in degrees.
    pub rotation: f64,

    /// Drill diameter for through-hole pads (mm). None for SMD pads.
    pub drill: Option<f64>,

    /// Layers the pad appears on.
    pub layers: LayerSet,

    /// Corner radius ratio for `RoundRect` pads (fraction of the smaller
    /// pad dimension, 0.0 to 0.5).
    pub roundrect_rratio: Option<f64>,

    /// Net this pad is connected to, once placed on a board.
    pub net: Option<PadNet>,
}

impl Pad {
    /// Creates a new top-side SMD pad with a rectangular shape.
    #[must_use]
    pub fn smd(number: impl Into<String>, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            number: number.into(),
            kind: PadKind::Smd,
            shape: PadShape::Rect,
            x,
            y,
            width,
            height,
            rotation: 0.0,
            drill: None,
            layers: LayerSet::smd_top(),
            roundrect_rratio: None,
            net: None,
        }
    }

    /// Creates a new round plated through-hole pad.
    #[must_use]
    pub fn through_hole(number: impl Into<String>, x: f64, y: f64, diameter: f64, drill: f64) -> Self {
        Self {
            number: number.into(),
            kind: PadKind::ThruHole,
            shape: PadShape::Circle,
            x,
            y,
            width: diameter,
            height: diameter,
            rotation: 0.0,
            drill: Some(drill),
            layers: LayerSet::plated_hole(),
            roundrect_rratio: None,
            net: None,
        }
    }

    /// Assigns this pad to a net.
    pub fn set_net(&mut self, code: u32, name: impl Into<String>) {
        self.net = Some(PadNet {
            code,
            name: name.into(),
        });
    }
}

/// A graphic line segment (`fp_line`).
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    /// Start X position in mm.
    pub x1: f64,
    /// Start Y position in mm.
    pub y1: f64,
    /// End X position in mm.
    pub x2: f64,
    /// End Y position in mm.
    pub y2: f64,
    /// Line width in mm.
    pub width: f64,
    /// Layer the line is on.
    pub layer: Layer,
}

impl Line {
    /// Creates a new line.
    #[must_use]
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64, width: f64, layer: Layer) -> Self {
        Self {
            x1,
            y1,
            x2,
            y2,
            width,
            layer,
        }
    }
}

/// Role of a footprint text field (`fp_text`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextRole {
    /// Reference designator field.
    Reference,
    /// Value field.
    Value,
    /// Free-form user text.
    User,
}

impl TextRole {
    /// Returns the KiCad text role token.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Reference => "reference",
            Self::Value => "value",
            Self::User => "user",
        }
    }

    /// Parses a text role token.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "reference" => Some(Self::Reference),
            "value" => Some(Self::Value),
            "user" => Some(Self::User),
            _ => None,
        }
    }
}

/// A footprint text field.
#[derive(Debug, Clone, PartialEq)]
pub struct TextItem {
    /// Field role.
    pub role: TextRole,
    /// Text content.
    pub text: String,
    /// X position in mm (from footprint origin).
    pub x: f64,
    /// Y position in mm (from footprint origin).
    pub y: f64,
    /// Layer the text is on.
    pub layer: Layer,
}

impl TextItem {
    /// Creates a reference field on the front silkscreen.
    #[must_use]
    pub fn reference(text: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            role: TextRole::Reference,
            text: text.into(),
            x,
            y,
            layer: Layer::FSilkS,
        }
    }

    /// Creates a value field on the front fabrication layer.
    #[must_use]
    pub fn value(text: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            role: TextRole::Value,
            text: text.into(),
            x,
            y,
            layer: Layer::FFab,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pad_smd_creation() {
        let pad = Pad::smd("1", -0.6, 0.0, 0.9, 0.9);
        assert_eq!(pad.number, "1");
        assert!((pad.x - -0.6).abs() < f64::EPSILON);
        assert!(pad.drill.is_none());
        assert_eq!(pad.layers, LayerSet::smd_top());
    }

    #[test]
    fn pad_through_hole_creation() {
        let pad = Pad::through_hole("2", 0.0, 2.0, 1.5, 0.8);
        assert_eq!(pad.drill, Some(0.8));
        assert_eq!(pad.shape, PadShape::Circle);
        assert_eq!(pad.layers, LayerSet::plated_hole());
    }

    #[test]
    fn layer_roundtrip() {
        let layer = Layer::FCrtYd;
        assert_eq!(Layer::parse(layer.as_str()), Some(layer));
    }

    #[test]
    fn layer_set_tokens_collapse_pairs() {
        assert_eq!(LayerSet::smd_top().tokens(), vec!["F.Cu", "F.Paste", "F.Mask"]);
        assert_eq!(LayerSet::plated_hole().tokens(), vec!["*.Cu", "*.Mask"]);
    }

    #[test]
    fn layer_set_parse_wildcard() {
        assert_eq!(
            LayerSet::parse_token("*.Cu"),
            Some(LayerSet::F_CU | LayerSet::B_CU)
        );
        assert_eq!(LayerSet::parse_token("F.Mask"), Some(LayerSet::F_MASK));
        assert_eq!(LayerSet::parse_token("In1.Cu"), None);
    }
}
