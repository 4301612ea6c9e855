//! Board generation tests.
//!
//! These tests resolve the shipped footprint files, place them on a
//! board, and verify the written `.kicad_pcb` document.

use openpcb::engine::{Board, Part};
use openpcb::kicad::sexpr::Sexpr;
use openpcb::library::Library;
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

/// Helper to compare floats with tolerance.
fn approx_eq(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() < tolerance
}

#[test]
fn shipped_footprints_parse_with_geometry() {
    let library = Library::open("data/footprints");
    assert!(library.dir_exists());

    let resistor = library.resolve("R_0402");
    assert_eq!(resistor.name, "R_0402");
    assert_eq!(resistor.pads.len(), 2);
    assert!(resistor.courtyard_extent().is_some());

    let led = library.resolve("LED_SMD");
    assert_eq!(led.name, "LED_SMD");
    assert_eq!(led.pads.len(), 2);
    // File geometry, not the builtin fallback
    assert!(approx_eq(led.pad("1").expect("pad 1").x, -0.7875, 1e-9));
}

#[test]
fn starter_board_places_two_footprints() {
    let library = Library::open("data/footprints");

    let mut board = Board::new();
    board
        .add_part_at(Part::new(library.resolve("R_0402"), "R1"), 0.0, 0.0)
        .expect("add R1");
    board
        .add_part_at(Part::new(library.resolve("LED_SMD"), "D1"), 10.0, 0.0)
        .expect("add D1");

    let text = board.to_board_text();
    assert!(text.starts_with("(kicad_pcb (version 20211014) (generator openpcb)\n"));
    assert!(text.contains("(general (thickness 1.6))"));
    assert!(text.contains("(paper A4)"));
    assert!(text.contains("(net 0 \"\")"));
    assert!(text.contains("(module R_0402"));
    assert!(text.contains("(module LED_SMD"));
    assert!(text.contains("(at 0 0)"));
    assert!(text.contains("(at 10 0)"));

    // References stamped over the library REF** placeholders
    assert!(text.contains("(fp_text reference R1"));
    assert!(text.contains("(fp_text reference D1"));
    assert!(!text.contains("REF**"));

    Sexpr::parse(&text).expect("board text parses as one document");
}

#[test]
fn missing_footprint_files_fall_back_to_builtins() {
    let temp_dir = test_temp_dir();
    // Directory exists but holds no footprint files.
    let library = Library::open(temp_dir.path());
    assert!(library.dir_exists());

    let resistor = library.resolve("R_0402");
    assert!(approx_eq(resistor.pad("1").expect("pad 1").x, -0.6, 1e-9));

    let led = library.resolve("LED_SMD");
    assert_eq!(led.name, "LED_SMD");
    assert!(approx_eq(led.pad("1").expect("pad 1").x, -0.75, 1e-9));
}

#[test]
fn nets_render_into_declarations_and_pads() {
    let library = Library::open("data/footprints");

    let mut board = Board::new();
    board
        .add_part_at(Part::new(library.resolve("R_0402"), "R1"), 0.0, 0.0)
        .expect("add R1");
    board.connect("V+", "R1", "1").expect("connect pad 1");
    board.connect("GND", "R1", "2").expect("connect pad 2");

    // Each net appears twice: once in the board net table, once on the
    // attached pad inside the module block.
    let text = board.to_board_text();
    assert_eq!(text.matches("(net 1 \"V+\")").count(), 2);
    assert_eq!(text.matches("(net 2 \"GND\")").count(), 2);
}

#[test]
fn save_writes_file_and_backs_up_previous() {
    let temp_dir = test_temp_dir();
    let path = temp_dir.path().join("hello.kicad_pcb");

    let library = Library::open("data/footprints");
    let mut board = Board::new();
    board
        .add_part_at(Part::new(library.resolve("R_0402"), "R1"), 0.0, 0.0)
        .expect("add R1");

    board.save(&path, false).expect("first save");
    assert!(path.is_file());

    // Second save with backup enabled renames the first file aside.
    board.save(&path, true).expect("second save");
    assert!(path.is_file());

    let backups: Vec<_> = std::fs::read_dir(temp_dir.path())
        .expect("read temp dir")
        .filter_map(Result::ok)
        .filter(|e| e.file_name().to_string_lossy().ends_with(".bak"))
        .collect();
    assert_eq!(backups.len(), 1);
}
