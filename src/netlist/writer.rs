//! Netlist file writers.

use super::{Netlist, NetlistError, NetlistFormat, NetlistResult};
use crate::kicad::sexpr::{quote, token};
use crate::output::write_with_backup;
use chrono::Utc;
use std::fmt::Write;
use std::path::Path;

/// Netlist export format version, matching what schematic tools emit.
const EXPORT_VERSION: &str = "D";

/// Writes a netlist file in the requested representation.
///
/// # Errors
///
/// Returns an error if serialization or the file write fails.
pub fn write_netlist(
    path: impl AsRef<Path>,
    netlist: &Netlist,
    format: NetlistFormat,
    backup: bool,
) -> NetlistResult<()> {
    let path = path.as_ref();
    let contents = match format {
        NetlistFormat::Sexpr => to_sexpr_string(netlist),
        NetlistFormat::Json => {
            let mut json =
                to_json_string(netlist).map_err(|e| NetlistError::json(path, e))?;
            json.push('\n');
            json
        }
    };

    write_with_backup(path, &contents, backup).map_err(|e| NetlistError::write(path, e))?;

    tracing::info!(
        path = %path.display(),
        parts = netlist.parts.len(),
        nets = netlist.nets.len(),
        "Wrote netlist"
    );

    Ok(())
}

/// Renders the KiCad S-expression export form.
///
/// Parts and nets keep their declaration order; net codes are assigned
/// sequentially from 1.
#[must_use]
pub fn to_sexpr_string(netlist: &Netlist) -> String {
    let mut out = String::with_capacity(1024);
    // Writing into a String cannot fail.
    let _ = write_sexpr(&mut out, netlist);
    out
}

fn write_sexpr(out: &mut String, netlist: &Netlist) -> std::fmt::Result {
    writeln!(out, "(export (version {})", quote(EXPORT_VERSION))?;

    let source = netlist.source.as_deref().unwrap_or("openpcb");
    writeln!(out, "  (design")?;
    writeln!(out, "    (source {})", quote(source))?;
    writeln!(
        out,
        "    (date {})",
        quote(&Utc::now().format("%Y-%m-%d %H:%M:%S").to_string())
    )?;
    writeln!(
        out,
        "    (tool {}))",
        quote(&format!("openpcb ({})", env!("CARGO_PKG_VERSION")))
    )?;

    if netlist.parts.is_empty() {
        writeln!(out, "  (components)")?;
    } else {
        writeln!(out, "  (components")?;
        for (i, part) in netlist.parts.iter().enumerate() {
            write!(
                out,
                "    (comp (ref {}) (value {})",
                token(&part.reference),
                quote(&part.value)
            )?;
            if let Some(footprint) = &part.footprint {
                write!(out, " (footprint {})", quote(footprint))?;
            }
            write!(out, ")")?;
            finish_section_line(out, i + 1 == netlist.parts.len())?;
        }
    }

    if netlist.nets.is_empty() {
        writeln!(out, "  (nets))")?;
    } else {
        writeln!(out, "  (nets")?;
        for (i, net) in netlist.nets.iter().enumerate() {
            writeln!(out, "    (net (code {}) (name {})", i + 1, quote(&net.name))?;
            for (j, node) in net.nodes.iter().enumerate() {
                write!(
                    out,
                    "      (node (ref {}) (pin {}))",
                    token(&node.reference),
                    token(&node.pad)
                )?;
                if j + 1 == net.nodes.len() {
                    write!(out, ")")?;
                }
                writeln!(out)?;
            }
            if net.nodes.is_empty() {
                writeln!(out, "    )")?;
            }
            if i + 1 == netlist.nets.len() {
                writeln!(out, "  ))")?;
            }
        }
    }

    Ok(())
}

/// Closes a `(components ...)` entry, folding the section's own closer onto
/// the last line the way schematic exports do.
fn finish_section_line(out: &mut String, is_last: bool) -> std::fmt::Result {
    if is_last {
        writeln!(out, ")")
    } else {
        writeln!(out)
    }
}

/// Renders the minimal JSON shape, pretty-printed.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json_string(netlist: &Netlist) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(netlist)
}

#[cfg(test)]
mod tests {
    use super::super::reader;
    use super::*;
    use crate::netlist::{Net, Node, Part};

    fn flashlight() -> Netlist {
        Netlist {
            source: Some("led_flashlight".to_string()),
            parts: vec![
                Part::new("B1", "Battery").with_footprint("Battery_Cell"),
                Part::new("R1", "330").with_footprint("R_0402"),
                Part::new("D1", "LED").with_footprint("LED_0603"),
            ],
            nets: vec![
                Net {
                    name: "V+".to_string(),
                    nodes: vec![
                        Node {
                            reference: "B1".to_string(),
                            pad: "1".to_string(),
                        },
                        Node {
                            reference: "R1".to_string(),
                            pad: "1".to_string(),
                        },
                        Node {
                            reference: "D1".to_string(),
                            pad: "2".to_string(),
                        },
                    ],
                },
                Net {
                    name: "GND".to_string(),
                    nodes: vec![
                        Node {
                            reference: "B1".to_string(),
                            pad: "2".to_string(),
                        },
                        Node {
                            reference: "D1".to_string(),
                            pad: "1".to_string(),
                        },
                    ],
                },
            ],
        }
    }

    #[test]
    fn sexpr_output_parses_back() {
        let netlist = flashlight();
        let text = to_sexpr_string(&netlist);

        assert!(text.starts_with("(export (version \"D\")"));
        assert!(text.contains("(source \"led_flashlight\")"));
        assert!(text.contains("(comp (ref B1) (value \"Battery\") (footprint \"Battery_Cell\"))"));
        assert!(text.contains("(net (code 1) (name \"V+\")"));

        let back = reader::parse_sexpr(&text).unwrap();
        assert_eq!(back.parts, netlist.parts);
        assert_eq!(back.nets, netlist.nets);
        assert_eq!(back.source.as_deref(), Some("led_flashlight"));
    }

    #[test]
    fn sexpr_output_with_empty_sections_parses_back() {
        let netlist = Netlist::default();
        let text = to_sexpr_string(&netlist);
        let back = reader::parse_sexpr(&text).unwrap();
        assert!(back.is_empty());
    }

    #[test]
    fn json_output_roundtrips() {
        let netlist = flashlight();
        let json = to_json_string(&netlist).unwrap();

        assert!(json.contains("\"ref\": \"B1\""));
        assert!(json.contains("\"pad\": \"1\""));

        let back: Netlist = serde_json::from_str(&json).unwrap();
        assert_eq!(back.parts, netlist.parts);
        assert_eq!(back.nets, netlist.nets);
    }

    #[test]
    fn write_netlist_sexpr_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("led_flashlight.net");

        write_netlist(&path, &flashlight(), NetlistFormat::Sexpr, false).unwrap();

        let back = reader::read_netlist(&path).unwrap();
        assert_eq!(back.parts.len(), 3);
        assert_eq!(back.nets.len(), 2);
    }

    #[test]
    fn write_netlist_json_file_detected_on_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("led_flashlight.json");

        write_netlist(&path, &flashlight(), NetlistFormat::Json, false).unwrap();

        let back = reader::read_netlist(&path).unwrap();
        assert_eq!(back.parts.len(), 3);
        assert_eq!(back.nets[0].nodes.len(), 3);
    }
}
