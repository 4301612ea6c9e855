//! KiCad file format handling.
//!
//! This module provides read/write capabilities for the KiCad text formats
//! this crate touches:
//!
//! - `.kicad_mod` — footprint library modules (read)
//! - `.kicad_pcb` — board documents (write)
//!
//! # File Format
//!
//! Every KiCad text file is a single S-expression document. The [`sexpr`]
//! module supplies the shared tokenizer and parser; [`footprint`] builds the
//! footprint model on top of it, and [`board`] composes board documents from
//! rendered module blocks.
//!
//! Boards are write-only: the synthesis flow always starts from a netlist
//! and footprint sources, never from an existing board.

pub mod board;
pub mod error;
pub mod footprint;
pub mod sexpr;

pub use board::{BoardSetup, NetDecl};
pub use error::{KicadError, KicadResult};
pub use footprint::Footprint;
