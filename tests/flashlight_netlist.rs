//! Flashlight circuit tests.
//!
//! These tests drive the typed circuit builder down to netlist files on
//! disk, in both supported formats, and read the results back.

use openpcb::circuit;
use openpcb::netlist::{self, NetlistFormat};
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

#[test]
fn flashlight_connects_led_through_resistor() {
    let netlist = circuit::led_flashlight().expect("build circuit").to_netlist();

    assert_eq!(netlist.parts.len(), 3);
    assert_eq!(
        netlist.part("B1").expect("battery").footprint.as_deref(),
        Some("Battery_Cell")
    );
    assert_eq!(netlist.part("R1").expect("resistor").value, "330");

    // V+ reaches the LED anode (pad 2); GND returns from the cathode.
    let vplus = netlist.nets.iter().find(|n| n.name == "V+").expect("V+");
    assert!(vplus
        .nodes
        .iter()
        .any(|n| n.reference == "D1" && n.pad == "2"));
    assert!(vplus
        .nodes
        .iter()
        .any(|n| n.reference == "B1" && n.pad == "1"));

    let gnd = netlist.nets.iter().find(|n| n.name == "GND").expect("GND");
    assert!(gnd.nodes.iter().any(|n| n.reference == "D1" && n.pad == "1"));
    assert_eq!(gnd.nodes.len(), 2);
}

#[test]
fn sexpr_netlist_file_roundtrip() {
    let temp_dir = test_temp_dir();
    let path = temp_dir.path().join("led_flashlight.net");

    let netlist = circuit::led_flashlight().expect("build circuit").to_netlist();
    netlist::write_netlist(&path, &netlist, NetlistFormat::Sexpr, false).expect("write netlist");

    let text = std::fs::read_to_string(&path).expect("read file");
    assert!(text.starts_with("(export (version \"D\")"));
    assert!(text.contains("(source \"led_flashlight\")"));
    assert!(text.contains("(comp (ref B1) (value \"Battery\") (footprint \"Battery_Cell\"))"));
    assert!(text.contains("(node (ref D1) (pin 2))"));

    let back = netlist::read_netlist(&path).expect("read back");
    assert_eq!(back.parts, netlist.parts);
    assert_eq!(back.nets, netlist.nets);
}

#[test]
fn json_netlist_file_matches_original_shape() {
    let temp_dir = test_temp_dir();
    let path = temp_dir.path().join("led_flashlight.net");

    let netlist = circuit::led_flashlight().expect("build circuit").to_netlist();
    netlist::write_netlist(&path, &netlist, NetlistFormat::Json, false).expect("write netlist");

    let text = std::fs::read_to_string(&path).expect("read file");
    let value: serde_json::Value = serde_json::from_str(&text).expect("valid JSON");

    let parts = value["parts"].as_array().expect("parts array");
    assert_eq!(parts.len(), 3);
    assert_eq!(parts[0]["ref"], "B1");
    assert_eq!(parts[0]["footprint"], "Battery_Cell");

    let nets = value["nets"].as_array().expect("nets array");
    assert_eq!(nets.len(), 2);
    assert_eq!(nets[0]["name"], "V+");
    assert_eq!(nets[0]["nodes"][0]["ref"], "B1");
    assert_eq!(nets[0]["nodes"][0]["pad"], "1");

    // Detection reads the same file back without a format hint.
    let back = netlist::read_netlist(&path).expect("read back");
    assert_eq!(back.parts, netlist.parts);
}
