//! Netlist file readers.
//!
//! The S-expression and JSON representations are distinguished by the first
//! non-whitespace character: an S-expression document starts with `(`,
//! anything else is treated as JSON.

use super::{Net, Netlist, NetlistError, NetlistResult, Node, Part};
use crate::kicad::error::{KicadError, KicadResult};
use crate::kicad::sexpr::Sexpr;
use std::path::Path;

/// Reads a netlist file, detecting its representation from the contents.
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not parse as either
/// representation.
pub fn read_netlist(path: impl AsRef<Path>) -> NetlistResult<Netlist> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| NetlistError::read(path, e))?;

    let netlist = if text.trim_start().starts_with('(') {
        parse_sexpr(&text).map_err(|e| NetlistError::sexpr(path, e))?
    } else {
        serde_json::from_str(&text).map_err(|e| NetlistError::json(path, e))?
    };

    tracing::info!(
        path = %path.display(),
        parts = netlist.parts.len(),
        nets = netlist.nets.len(),
        "Read netlist"
    );

    Ok(netlist)
}

/// Parses the KiCad S-expression export format.
pub(crate) fn parse_sexpr(text: &str) -> KicadResult<Netlist> {
    let doc = Sexpr::parse(text)?;
    let root = doc
        .name()
        .ok_or_else(|| KicadError::malformed("netlist", "document is not a list"))?;
    if root != "export" {
        return Err(KicadError::malformed(
            "netlist",
            format!("expected an export document, got '{root}'"),
        ));
    }

    let source = doc
        .child("design")
        .and_then(|d| d.string_value("source"))
        .map(str::to_string);

    let mut parts = Vec::new();
    if let Some(components) = doc.child("components") {
        for comp in components.children("comp") {
            parts.push(parse_comp(comp)?);
        }
    }

    let mut nets = Vec::new();
    if let Some(section) = doc.child("nets") {
        for net in section.children("net") {
            nets.push(parse_net(net)?);
        }
    }

    Ok(Netlist {
        source,
        parts,
        nets,
    })
}

fn parse_comp(comp: &Sexpr) -> KicadResult<Part> {
    let reference = comp
        .string_value("ref")
        .ok_or_else(|| KicadError::malformed("comp", "missing (ref)"))?;
    let value = comp.string_value("value").unwrap_or_default();
    let footprint = comp.string_value("footprint").map(str::to_string);

    Ok(Part {
        reference: reference.to_string(),
        value: value.to_string(),
        footprint,
    })
}

fn parse_net(net: &Sexpr) -> KicadResult<Net> {
    let name = net
        .string_value("name")
        .ok_or_else(|| KicadError::malformed("net", "missing (name)"))?;

    let mut nodes = Vec::new();
    for node in net.children("node") {
        let reference = node
            .string_value("ref")
            .ok_or_else(|| KicadError::malformed("net", "node missing (ref)"))?;
        // Schematic exports say (pin ...); the JSON shape says pad
        let pad = node
            .string_value("pin")
            .or_else(|| node.string_value("pad"))
            .ok_or_else(|| KicadError::malformed("net", "node missing (pin)"))?;
        nodes.push(Node {
            reference: reference.to_string(),
            pad: pad.to_string(),
        });
    }

    Ok(Net {
        name: name.to_string(),
        nodes,
    })
}
