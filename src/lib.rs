//! openpcb: synthesize KiCad board files from netlists and circuit
//! descriptions.
//!
//! The tool reads circuit connectivity (a netlist file or a typed
//! [`circuit::Circuit`]), resolves each part to a footprint, places the
//! parts relative to each other, and writes a `.kicad_pcb` document that
//! KiCad opens directly. No KiCad installation is involved; the file
//! formats are produced and consumed as plain text.
//!
//! # Pipeline
//!
//! ```text
//! netlist (.net / JSON)      circuit builder
//!          \                 /
//!           netlist::Netlist
//!                  |
//!      library::Library  (footprint files + builtins)
//!                  |
//!            engine::Board  (placement, net codes)
//!                  |
//!         kicad  (.kicad_pcb text)
//! ```
//!
//! # Modules
//!
//! - [`kicad`] — KiCad text formats: S-expressions, footprints, boards
//! - [`netlist`] — Netlist model, readers and writers
//! - [`circuit`] — Typed circuit builder and part templates
//! - [`engine`] — Board assembly and relative placement
//! - [`library`] — Footprint resolution with builtin fallbacks
//! - [`config`] — Configuration loading and validation
//! - [`error`] — Configuration error types
//! - [`output`] — File writes with optional timestamped backups
//! - [`refdes`] — Reference-designator parsing and ordering

pub mod circuit;
pub mod config;
pub mod engine;
pub mod error;
pub mod kicad;
pub mod library;
pub mod netlist;
pub mod output;
pub mod refdes;
