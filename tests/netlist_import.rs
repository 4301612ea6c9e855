//! Netlist import tests.
//!
//! These tests read netlists in both formats, resolve footprints, place
//! the parts in a chain the way the importer does, and verify the
//! resulting board.

use openpcb::engine::{Board, Direction, Part};
use openpcb::kicad::sexpr::Sexpr;
use openpcb::library::Library;
use openpcb::netlist::{self, Netlist};
use tempfile::TempDir;

/// Creates a temporary directory inside `.tmp/` for test isolation.
/// The directory is automatically cleaned up when the returned `TempDir` is dropped.
///
/// Converts to an absolute path to avoid issues with parallel test execution.
fn test_temp_dir() -> TempDir {
    let tmp_root = std::path::Path::new(".tmp");
    std::fs::create_dir_all(tmp_root).expect("Failed to create .tmp directory");
    let tmp_root = tmp_root
        .canonicalize()
        .expect("Failed to canonicalize .tmp path");
    tempfile::tempdir_in(&tmp_root).expect("Failed to create temp dir")
}

/// The JSON fallback netlist the flashlight tutorial ships.
const JSON_NETLIST: &str = r#"{
  "parts": [
    {"ref": "B1", "value": "Battery", "footprint": "Battery_Cell"},
    {"ref": "R1", "value": "330", "footprint": "R_0402"},
    {"ref": "D1", "value": "LED", "footprint": "LED_0603"}
  ],
  "nets": [
    {
      "name": "V+",
      "nodes": [
        {"ref": "B1", "pad": "1"},
        {"ref": "R1", "pad": "1"},
        {"ref": "D1", "pad": 2}
      ]
    },
    {
      "name": "GND",
      "nodes": [
        {"ref": "B1", "pad": "2"},
        {"ref": "D1", "pad": 1}
      ]
    }
  ]
}"#;

const SEXPR_NETLIST: &str = r#"(export (version "D")
  (design
    (source "led_flashlight")
    (date "2026-08-21 10:00:00")
    (tool "test"))
  (components
    (comp (ref B1) (value "Battery") (footprint "Battery_Cell"))
    (comp (ref R1) (value "330") (footprint "R_0402"))
    (comp (ref D1) (value "LED") (footprint "LED_0603")))
  (nets
    (net (code 1) (name "V+")
      (node (ref B1) (pin 1))
      (node (ref R1) (pin 1))
      (node (ref D1) (pin 2)))
    (net (code 2) (name "GND")
      (node (ref B1) (pin 2))
      (node (ref D1) (pin 1)))))
"#;

/// Mirrors the importer's placement rule: first part at the origin, each
/// subsequent part placed right of the previous with a 2 mm gap.
fn import_board(netlist: &Netlist, library: &Library) -> Board {
    let mut board = Board::new();
    let mut anchor: Option<String> = None;

    for part in &netlist.parts {
        let mut placed = Part::new(library.footprint_for_part(part), &part.reference);
        placed.set_value(&part.value);

        match anchor.as_deref() {
            None => board.add_part_at(placed, 0.0, 0.0).expect("add part"),
            Some(prev) => {
                board.add_part(placed).expect("add part");
                board
                    .place_near(&part.reference, prev, 2.0, Direction::Right)
                    .expect("place part");
            }
        }
        anchor = Some(part.reference.clone());
    }

    for net in &netlist.nets {
        board.define_net(&net.name);
        for node in &net.nodes {
            // Unresolvable nodes are skipped, matching the importer.
            let _ = board.connect(&net.name, &node.reference, &node.pad);
        }
    }

    board
}

#[test]
fn json_netlist_places_parts_in_a_chain() {
    let temp_dir = test_temp_dir();
    let path = temp_dir.path().join("led_flashlight.net");
    std::fs::write(&path, JSON_NETLIST).expect("write netlist");

    let netlist = netlist::read_netlist(&path).expect("read netlist");
    assert_eq!(netlist.parts.len(), 3);

    // Builtin-only library: every part uses the default bounding box, so
    // the chain spacing is 3.0 + 3.0 + 2.0 between origins.
    let library = Library::open(temp_dir.path().join("no_such_dir"));
    let board = import_board(&netlist, &library);

    assert_eq!(board.part("B1").expect("B1").position_mm(), (0.0, 0.0));
    assert_eq!(board.part("R1").expect("R1").position_mm(), (8.0, 0.0));
    assert_eq!(board.part("D1").expect("D1").position_mm(), (16.0, 0.0));

    assert_eq!(board.net_code("V+"), Some(1));
    assert_eq!(board.net_code("GND"), Some(2));
}

#[test]
fn imported_board_text_carries_nets_and_values() {
    let temp_dir = test_temp_dir();
    let path = temp_dir.path().join("led_flashlight.net");
    std::fs::write(&path, JSON_NETLIST).expect("write netlist");

    let netlist = netlist::read_netlist(&path).expect("read netlist");
    let library = Library::open(temp_dir.path().join("no_such_dir"));
    let board = import_board(&netlist, &library);

    let text = board.to_board_text();
    assert!(text.contains("(module Battery_Cell"));
    assert!(text.contains("(module R_0402"));
    assert!(text.contains("(module LED_0603"));
    assert!(text.contains("(fp_text value Battery"));
    assert!(text.contains("(fp_text value 330"));

    // Net declarations plus one attached pad each.
    assert_eq!(text.matches("(net 1 \"V+\")").count(), 4);
    assert_eq!(text.matches("(net 2 \"GND\")").count(), 3);

    Sexpr::parse(&text).expect("board text parses as one document");
}

#[test]
fn sexpr_netlist_imports_identically() {
    let temp_dir = test_temp_dir();

    let json_path = temp_dir.path().join("a.net");
    std::fs::write(&json_path, JSON_NETLIST).expect("write JSON netlist");
    let sexpr_path = temp_dir.path().join("b.net");
    std::fs::write(&sexpr_path, SEXPR_NETLIST).expect("write sexpr netlist");

    let from_json = netlist::read_netlist(&json_path).expect("read JSON");
    let from_sexpr = netlist::read_netlist(&sexpr_path).expect("read sexpr");

    assert_eq!(from_json.parts, from_sexpr.parts);
    assert_eq!(from_json.nets, from_sexpr.nets);
}

#[test]
fn unresolvable_net_nodes_are_skipped() {
    let temp_dir = test_temp_dir();
    let path = temp_dir.path().join("odd.net");
    std::fs::write(
        &path,
        r#"{
  "parts": [{"ref": "R1", "value": "330"}],
  "nets": [
    {"name": "N1", "nodes": [
      {"ref": "R1", "pad": "1"},
      {"ref": "U9", "pad": "3"},
      {"ref": "R1", "pad": "7"}
    ]}
  ]
}"#,
    )
    .expect("write netlist");

    let netlist = netlist::read_netlist(&path).expect("read netlist");
    let library = Library::open(temp_dir.path().join("no_such_dir"));
    let board = import_board(&netlist, &library);

    // The net exists and the one resolvable pad is attached.
    assert_eq!(board.net_code("N1"), Some(1));
    let pad = board
        .part("R1")
        .expect("R1")
        .footprint()
        .pad("1")
        .expect("pad 1");
    assert_eq!(pad.net.as_ref().map(|n| n.code), Some(1));
}

#[test]
fn malformed_netlist_is_a_typed_error() {
    let temp_dir = test_temp_dir();
    let path = temp_dir.path().join("broken.net");
    std::fs::write(&path, "not a netlist at all").expect("write file");

    let err = netlist::read_netlist(&path).expect_err("must fail");
    // Not JSON and not an S-expression: reported as invalid JSON since
    // the content does not open with a parenthesis.
    assert!(err.to_string().contains("broken.net"));
}
