//! Netlist model and codecs.
//!
//! A netlist names the parts of a circuit and the nets connecting their
//! pads. Two on-disk representations are supported:
//!
//! - the KiCad S-expression export format (`(export (version "D") ...)`),
//!   as written by schematic tools
//! - a minimal JSON shape (`{"parts": [...], "nets": [...]}`) convenient
//!   for hand-written input
//!
//! [`read_netlist`] detects the representation from the file contents, so
//! callers never pick a parser by extension.

mod reader;
mod writer;

pub use reader::read_netlist;
pub use writer::{to_json_string, to_sexpr_string, write_netlist};

use crate::kicad::KicadError;
use serde::{Deserialize, Deserializer, Serialize};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for netlist operations.
pub type NetlistResult<T> = Result<T, NetlistError>;

/// Errors that can occur during netlist operations.
#[derive(Debug, Error)]
pub enum NetlistError {
    /// Failed to open or read the file.
    #[error("Failed to read netlist: {path}")]
    Read {
        /// Path to the file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Failed to write the file.
    #[error("Failed to write netlist: {path}")]
    Write {
        /// Path to the file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The file looked like JSON but did not deserialize.
    #[error("Invalid JSON netlist: {path}")]
    Json {
        /// Path to the file.
        path: PathBuf,
        /// Underlying deserialization error.
        #[source]
        source: serde_json::Error,
    },

    /// The file looked like an S-expression export but did not parse.
    #[error("Invalid netlist: {path}")]
    Sexpr {
        /// Path to the file.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: KicadError,
    },
}

impl NetlistError {
    /// Creates a read error.
    pub fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Creates a write error.
    pub fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    /// Creates a JSON error.
    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }

    /// Creates an S-expression error.
    pub fn sexpr(path: impl Into<PathBuf>, source: KicadError) -> Self {
        Self::Sexpr {
            path: path.into(),
            source,
        }
    }
}

/// On-disk netlist representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NetlistFormat {
    /// KiCad S-expression export format.
    #[default]
    Sexpr,
    /// Minimal JSON shape.
    Json,
}

/// A circuit part as listed in a netlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    /// Reference designator (e.g., "R1").
    #[serde(rename = "ref")]
    pub reference: String,

    /// Part value (e.g., "330", "Battery").
    #[serde(default)]
    pub value: String,

    /// Footprint name, when the netlist pins one down. Parts without a
    /// footprint get one assigned from the part value during import.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footprint: Option<String>,
}

impl Part {
    /// Creates a part without a footprint assignment.
    #[must_use]
    pub fn new(reference: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            value: value.into(),
            footprint: None,
        }
    }

    /// Sets the footprint name.
    #[must_use]
    pub fn with_footprint(mut self, footprint: impl Into<String>) -> Self {
        self.footprint = Some(footprint.into());
        self
    }
}

/// A single pad connection within a net.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Reference designator of the part.
    #[serde(rename = "ref")]
    pub reference: String,

    /// Pad number on that part. JSON input may spell this as a number.
    #[serde(deserialize_with = "pad_from_string_or_number")]
    pub pad: String,
}

/// A named net.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Net {
    /// Net name (e.g., "V+", "GND").
    pub name: String,

    /// Pad connections in this net.
    #[serde(default)]
    pub nodes: Vec<Node>,
}

/// A complete netlist.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Netlist {
    /// Design source the netlist was exported from. Carried by the
    /// S-expression format only.
    #[serde(skip)]
    pub source: Option<String>,

    /// Parts, in declaration order.
    #[serde(default)]
    pub parts: Vec<Part>,

    /// Nets, in declaration order.
    #[serde(default)]
    pub nets: Vec<Net>,
}

impl Netlist {
    /// Gets a part by reference designator.
    #[must_use]
    pub fn part(&self, reference: &str) -> Option<&Part> {
        self.parts.iter().find(|p| p.reference == reference)
    }

    /// Returns true if the netlist has neither parts nor nets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty() && self.nets.is_empty()
    }
}

/// Accepts `"1"` and `1` for a pad number in JSON input.
fn pad_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum PadRepr {
        Text(String),
        Number(u64),
    }

    Ok(match PadRepr::deserialize(deserializer)? {
        PadRepr::Text(s) => s,
        PadRepr::Number(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_part_roundtrip_uses_ref_key() {
        let part: Part = serde_json::from_str(r#"{"ref": "R1", "value": "330"}"#).unwrap();
        assert_eq!(part.reference, "R1");
        assert_eq!(part.footprint, None);

        let json = serde_json::to_string(&part).unwrap();
        assert!(json.contains("\"ref\":\"R1\""));
        assert!(!json.contains("footprint"));
    }

    #[test]
    fn json_node_accepts_numeric_pad() {
        let node: Node = serde_json::from_str(r#"{"ref": "B1", "pad": 1}"#).unwrap();
        assert_eq!(node.pad, "1");

        let node: Node = serde_json::from_str(r#"{"ref": "B1", "pad": "2"}"#).unwrap();
        assert_eq!(node.pad, "2");
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let netlist: Netlist = serde_json::from_str(r#"{"parts": []}"#).unwrap();
        assert!(netlist.nets.is_empty());
        assert!(netlist.is_empty());
    }

    #[test]
    fn part_lookup() {
        let netlist = Netlist {
            source: None,
            parts: vec![Part::new("B1", "Battery"), Part::new("R1", "330")],
            nets: Vec::new(),
        };
        assert!(netlist.part("R1").is_some());
        assert!(netlist.part("R2").is_none());
    }
}
