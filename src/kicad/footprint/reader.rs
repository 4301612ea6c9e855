//! Parser for footprint document text.
//!
//! Pads are load-bearing for placement and net assignment, so a malformed
//! pad fails the whole document. Graphic lines and text fields are cosmetic
//! and are skipped with a warning when they do not parse.

use super::primitives::{Layer, LayerSet, Line, Pad, PadKind, PadShape, TextItem, TextRole};
use super::{Footprint, FootprintAttr};
use crate::kicad::error::{KicadError, KicadResult};
use crate::kicad::sexpr::Sexpr;

/// Parses a `.kicad_mod` document into a [`Footprint`].
pub(crate) fn parse_module(text: &str) -> KicadResult<Footprint> {
    let doc = Sexpr::parse(text)?;
    let root = doc
        .name()
        .ok_or_else(|| KicadError::malformed("module", "document is not a list"))?;
    if root != "module" && root != "footprint" {
        return Err(KicadError::malformed(
            "module",
            format!("expected a module document, got '{root}'"),
        ));
    }
    let name = doc
        .arg(0)
        .and_then(Sexpr::as_atom)
        .ok_or_else(|| KicadError::malformed("module", "missing footprint name"))?;

    let mut footprint = Footprint::new(name);

    for item in doc.as_list().unwrap_or_default().iter().skip(2) {
        let Some(tag) = item.name() else { continue };
        match tag {
            "layer" => {
                if let Some(s) = item.arg(0).and_then(Sexpr::as_atom) {
                    footprint.layer =
                        Layer::parse(s).ok_or_else(|| KicadError::unknown_layer(s))?;
                }
            }
            "descr" => {
                footprint.descr = item
                    .arg(0)
                    .and_then(Sexpr::as_atom)
                    .unwrap_or_default()
                    .to_string();
            }
            "tags" => {
                footprint.tags = item
                    .arg(0)
                    .and_then(Sexpr::as_atom)
                    .unwrap_or_default()
                    .to_string();
            }
            "attr" => {
                footprint.attr = item
                    .arg(0)
                    .and_then(Sexpr::as_atom)
                    .and_then(FootprintAttr::parse);
            }
            "fp_text" => match parse_text(item) {
                Ok(text) => footprint.texts.push(text),
                Err(e) => {
                    tracing::warn!(
                        footprint = %footprint.name,
                        error = %e,
                        "Skipping malformed fp_text"
                    );
                }
            },
            "fp_line" => match parse_line(item) {
                Ok(line) => footprint.lines.push(line),
                Err(e) => {
                    tracing::warn!(
                        footprint = %footprint.name,
                        error = %e,
                        "Skipping malformed fp_line"
                    );
                }
            },
            "pad" => footprint.pads.push(parse_pad(item)?),
            // tedit, tstamp, at, model, fp_circle and friends
            _ => {}
        }
    }

    Ok(footprint)
}

/// Reads the positional coordinate `index` of an element like `(at x y)`.
fn coord(item: &Sexpr, index: usize, context: &str) -> KicadResult<f64> {
    item.arg(index)
        .and_then(Sexpr::as_atom)
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| {
            KicadError::malformed(context, format!("missing or non-numeric coordinate {index}"))
        })
}

fn parse_pad(item: &Sexpr) -> KicadResult<Pad> {
    let number = item
        .arg(0)
        .and_then(Sexpr::as_atom)
        .ok_or_else(|| KicadError::malformed("pad", "missing pad number"))?;
    let kind_token = item
        .arg(1)
        .and_then(Sexpr::as_atom)
        .ok_or_else(|| KicadError::malformed("pad", "missing pad type"))?;
    let kind = PadKind::parse(kind_token)
        .ok_or_else(|| KicadError::malformed("pad", format!("unknown pad type '{kind_token}'")))?;
    let shape_token = item
        .arg(2)
        .and_then(Sexpr::as_atom)
        .ok_or_else(|| KicadError::malformed("pad", "missing pad shape"))?;
    let shape = PadShape::parse(shape_token).ok_or_else(|| {
        KicadError::malformed("pad", format!("unknown pad shape '{shape_token}'"))
    })?;

    let at = item
        .child("at")
        .ok_or_else(|| KicadError::malformed("pad", "missing (at)"))?;
    let x = coord(at, 0, "pad")?;
    let y = coord(at, 1, "pad")?;
    let rotation = at
        .arg(2)
        .and_then(Sexpr::as_atom)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0.0);

    let size = item
        .child("size")
        .ok_or_else(|| KicadError::malformed("pad", "missing (size)"))?;
    let width = coord(size, 0, "pad")?;
    let height = coord(size, 1, "pad")?;

    let drill = item.child("drill").and_then(parse_drill);
    let layers = parse_layer_set(item.child("layers"), kind);
    let roundrect_rratio = item.f64_value("roundrect_rratio");

    let mut pad = Pad {
        number: number.to_string(),
        kind,
        shape,
        x,
        y,
        width,
        height,
        rotation,
        drill,
        layers,
        roundrect_rratio,
        net: None,
    };

    // Net assignments only appear on pads embedded in a board.
    if let Some(net) = item.child("net") {
        let code = net.arg(0).and_then(Sexpr::as_atom).and_then(|s| s.parse().ok());
        let name = net.arg(1).and_then(Sexpr::as_atom);
        match (code, name) {
            (Some(code), Some(name)) => pad.set_net(code, name),
            _ => {
                tracing::warn!(pad = %pad.number, "Ignoring malformed pad net");
            }
        }
    }

    Ok(pad)
}

/// Reads a drill diameter from `(drill 0.8)` or `(drill oval 0.6 1.0)`.
fn parse_drill(item: &Sexpr) -> Option<f64> {
    item.as_list()?
        .iter()
        .skip(1)
        .find_map(|v| v.as_atom()?.parse().ok())
}

/// Reads a pad layer list, falling back to the conventional set for the pad
/// kind when the list is absent or contains only unknown names.
fn parse_layer_set(item: Option<&Sexpr>, kind: PadKind) -> LayerSet {
    let mut set = LayerSet::empty();
    if let Some(layers) = item {
        for token in layers.as_list().unwrap_or_default().iter().skip(1) {
            let Some(name) = token.as_atom() else { continue };
            match LayerSet::parse_token(name) {
                Some(flags) => set |= flags,
                None => tracing::warn!(layer = %name, "Ignoring unknown pad layer"),
            }
        }
    }
    if set.is_empty() {
        set = match kind {
            PadKind::Smd => LayerSet::smd_top(),
            PadKind::ThruHole => LayerSet::plated_hole(),
        };
    }
    set
}

fn parse_text(item: &Sexpr) -> KicadResult<TextItem> {
    let role_token = item
        .arg(0)
        .and_then(Sexpr::as_atom)
        .ok_or_else(|| KicadError::malformed("fp_text", "missing role"))?;
    let role = TextRole::parse(role_token).ok_or_else(|| {
        KicadError::malformed("fp_text", format!("unknown role '{role_token}'"))
    })?;
    let text = item
        .arg(1)
        .and_then(Sexpr::as_atom)
        .ok_or_else(|| KicadError::malformed("fp_text", "missing text"))?;

    let at = item
        .child("at")
        .ok_or_else(|| KicadError::malformed("fp_text", "missing (at)"))?;
    let x = coord(at, 0, "fp_text")?;
    let y = coord(at, 1, "fp_text")?;

    let layer = match item.string_value("layer") {
        Some(name) => Layer::parse(name).ok_or_else(|| KicadError::unknown_layer(name))?,
        // Reference fields conventionally sit on silkscreen, value on fab
        None => match role {
            TextRole::Reference => Layer::FSilkS,
            _ => Layer::FFab,
        },
    };

    Ok(TextItem {
        role,
        text: text.to_string(),
        x,
        y,
        layer,
    })
}

fn parse_line(item: &Sexpr) -> KicadResult<Line> {
    let start = item
        .child("start")
        .ok_or_else(|| KicadError::malformed("fp_line", "missing (start)"))?;
    let end = item
        .child("end")
        .ok_or_else(|| KicadError::malformed("fp_line", "missing (end)"))?;
    let x1 = coord(start, 0, "fp_line")?;
    let y1 = coord(start, 1, "fp_line")?;
    let x2 = coord(end, 0, "fp_line")?;
    let y2 = coord(end, 1, "fp_line")?;

    let layer_name = item
        .string_value("layer")
        .ok_or_else(|| KicadError::malformed("fp_line", "missing (layer)"))?;
    let layer = Layer::parse(layer_name).ok_or_else(|| KicadError::unknown_layer(layer_name))?;

    // KiCad 6 nests the width inside (stroke ...)
    let width = item
        .f64_value("width")
        .or_else(|| item.child("stroke").and_then(|s| s.f64_value("width")))
        .ok_or_else(|| KicadError::malformed("fp_line", "missing (width)"))?;

    Ok(Line {
        x1,
        y1,
        x2,
        y2,
        width,
        layer,
    })
}
