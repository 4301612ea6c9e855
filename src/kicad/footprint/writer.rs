//! Renderer for placed footprints.
//!
//! Emits the legacy `(module ...)` block form, indented two spaces for
//! embedding in a `.kicad_pcb` document.

use super::primitives::{Line, Pad, TextItem};
use super::Footprint;
use crate::kicad::sexpr::{format_mm, quote, token};
use std::fmt::Write;
use uuid::Uuid;

/// Stroke font geometry used for all footprint text fields.
const FONT_SIZE_MM: f64 = 1.0;
const FONT_THICKNESS_MM: f64 = 0.15;

/// Renders a footprint placed at the given board position.
pub(crate) fn render_placed(fp: &Footprint, x: f64, y: f64, rotation: f64) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_module(&mut out, fp, x, y, rotation);
    out
}

fn write_module(out: &mut String, fp: &Footprint, x: f64, y: f64, rotation: f64) -> std::fmt::Result {
    writeln!(
        out,
        "  (module {} (layer {}) (tedit 0) (tstamp {})",
        token(&fp.name),
        fp.layer.as_str(),
        Uuid::new_v4()
    )?;

    write!(out, "    (at {} {}", format_mm(x), format_mm(y))?;
    if rotation != 0.0 {
        write!(out, " {}", format_mm(rotation))?;
    }
    writeln!(out, ")")?;

    if !fp.descr.is_empty() {
        writeln!(out, "    (descr {})", quote(&fp.descr))?;
    }
    if !fp.tags.is_empty() {
        writeln!(out, "    (tags {})", quote(&fp.tags))?;
    }
    if let Some(attr) = fp.attr {
        writeln!(out, "    (attr {})", attr.as_str())?;
    }

    for text in &fp.texts {
        write_text(out, text)?;
    }
    for line in &fp.lines {
        write_line(out, line)?;
    }
    for pad in &fp.pads {
        write_pad(out, pad, rotation)?;
    }

    writeln!(out, "  )")?;
    Ok(())
}

fn write_text(out: &mut String, text: &TextItem) -> std::fmt::Result {
    writeln!(
        out,
        "    (fp_text {} {} (at {} {}) (layer {})",
        text.role.as_str(),
        token(&text.text),
        format_mm(text.x),
        format_mm(text.y),
        text.layer.as_str()
    )?;
    writeln!(
        out,
        "      (effects (font (size {size} {size}) (thickness {thickness})))",
        size = format_mm(FONT_SIZE_MM),
        thickness = format_mm(FONT_THICKNESS_MM)
    )?;
    writeln!(out, "    )")
}

fn write_line(out: &mut String, line: &Line) -> std::fmt::Result {
    writeln!(
        out,
        "    (fp_line (start {} {}) (end {} {}) (layer {}) (width {}))",
        format_mm(line.x1),
        format_mm(line.y1),
        format_mm(line.x2),
        format_mm(line.y2),
        line.layer.as_str(),
        format_mm(line.width)
    )
}

fn write_pad(out: &mut String, pad: &Pad, module_rotation: f64) -> std::fmt::Result {
    write!(
        out,
        "    (pad {} {} {}",
        token(&pad.number),
        pad.kind.as_str(),
        pad.shape.as_str()
    )?;

    // Pad orientation is written as the sum of pad and module rotation
    write!(out, " (at {} {}", format_mm(pad.x), format_mm(pad.y))?;
    let orientation = pad.rotation + module_rotation;
    if orientation != 0.0 {
        write!(out, " {}", format_mm(orientation))?;
    }
    write!(out, ")")?;

    write!(
        out,
        " (size {} {})",
        format_mm(pad.width),
        format_mm(pad.height)
    )?;
    if let Some(drill) = pad.drill {
        write!(out, " (drill {})", format_mm(drill))?;
    }
    write!(out, " (layers {})", pad.layers.tokens().join(" "))?;
    if let Some(ratio) = pad.roundrect_rratio {
        write!(out, " (roundrect_rratio {})", format_mm(ratio))?;
    }
    if let Some(net) = &pad.net {
        write!(out, " (net {} {})", net.code, quote(&net.name))?;
    }
    writeln!(out, ")")
}
