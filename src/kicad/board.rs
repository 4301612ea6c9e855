//! Board (`.kicad_pcb`) composition.
//!
//! Boards are write-only for this crate: a document is composed from header
//! parameters, the net table, and pre-rendered module blocks.
//!
//! ```text
//! (kicad_pcb (version 20211014) (generator openpcb)
//!   (general (thickness 1.6))
//!   (paper A4)
//!   (setup
//!     (last_trace_width 0.25)
//!   )
//!   (net 0 "")
//!   (net 1 "V+")
//!   (module ...)
//! )
//! ```

use crate::kicad::sexpr::{format_mm, quote, token};
use std::fmt::Write;

/// Format version written into board headers (KiCad 6.0 text format).
pub const BOARD_FORMAT_VERSION: u32 = 20_211_014;

/// Generator token written into board headers.
pub const GENERATOR: &str = "openpcb";

/// Global board parameters carried in the header.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardSetup {
    /// Paper size for the page frame (e.g., "A4").
    pub paper: String,

    /// Board thickness in mm.
    pub thickness_mm: f64,

    /// Default trace width in mm.
    pub last_trace_width_mm: f64,
}

impl Default for BoardSetup {
    fn default() -> Self {
        Self {
            paper: "A4".to_string(),
            thickness_mm: 1.6,
            last_trace_width_mm: 0.25,
        }
    }
}

/// A net table entry. Code 0 is reserved for the unconnected net and is
/// always written implicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetDecl {
    /// Net code (1-based).
    pub code: u32,
    /// Net name.
    pub name: String,
}

/// Composes a complete board document.
///
/// `modules` are rendered module blocks as produced by
/// [`Footprint::render_placed`](crate::kicad::footprint::Footprint::render_placed).
#[must_use]
pub fn compose_board(setup: &BoardSetup, nets: &[NetDecl], modules: &[String]) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_board(&mut out, setup, nets, modules);
    out
}

fn write_board(
    out: &mut String,
    setup: &BoardSetup,
    nets: &[NetDecl],
    modules: &[String],
) -> std::fmt::Result {
    writeln!(
        out,
        "(kicad_pcb (version {BOARD_FORMAT_VERSION}) (generator {GENERATOR})"
    )?;
    writeln!(
        out,
        "  (general (thickness {}))",
        format_mm(setup.thickness_mm)
    )?;
    writeln!(out, "  (paper {})", token(&setup.paper))?;
    writeln!(out, "  (setup")?;
    writeln!(
        out,
        "    (last_trace_width {})",
        format_mm(setup.last_trace_width_mm)
    )?;
    writeln!(out, "  )")?;

    writeln!(out, "  (net 0 \"\")")?;
    for net in nets {
        writeln!(out, "  (net {} {})", net.code, quote(&net.name))?;
    }

    for module in modules {
        out.push_str(module);
    }

    writeln!(out, ")")?;
    Ok(())
}
