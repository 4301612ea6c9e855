//! Footprint library resolution.
//!
//! A [`Library`] resolves footprint names against `.kicad_mod` files in
//! one directory, falling back to the builtin generators in
//! [`packages`]. Resolution never fails: a missing or unreadable file
//! degrades to the generated model, matching the permissive behavior of
//! the board scripts this tool grew out of.

pub mod packages;

pub use packages::BUILTIN_NAMES;

use crate::kicad::Footprint;
use crate::netlist::Part;
use crate::refdes;
use glob::glob;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Default footprint assignment by part value, used when a netlist part
/// carries no explicit footprint.
const FOOTPRINT_MAP: [(&str, &str); 3] = [
    ("Battery", "Battery_Cell"),
    ("330", "R_0402"),
    ("LED", "LED_0603"),
];

/// Maps a part's value (or, failing that, its reference) to a default
/// footprint name. Unmapped parts get the two-pad resistor footprint.
#[must_use]
pub fn default_footprint_name(value: &str, reference: &str) -> &'static str {
    map_lookup(value)
        .or_else(|| map_lookup(reference))
        .unwrap_or("R_0402")
}

fn map_lookup(key: &str) -> Option<&'static str> {
    FOOTPRINT_MAP
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, footprint)| *footprint)
}

/// A footprint library rooted at one directory.
#[derive(Debug, Clone)]
pub struct Library {
    dir: PathBuf,
}

impl Library {
    /// Opens a library over the given directory.
    ///
    /// The directory does not have to exist; resolution then serves
    /// builtin models only.
    #[must_use]
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        if !dir.is_dir() {
            debug!(dir = %dir.display(), "Footprint directory not found, builtins only");
        }
        Self { dir }
    }

    /// Returns the library directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns true when the library directory exists.
    #[must_use]
    pub fn dir_exists(&self) -> bool {
        self.dir.is_dir()
    }

    /// Resolves a footprint name to a model.
    ///
    /// A `<name>.kicad_mod` file in the library directory wins; a
    /// missing or unparseable file falls back to the builtin generator
    /// for the name.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Footprint {
        let path = self.dir.join(format!("{name}.kicad_mod"));
        if path.is_file() {
            match Footprint::read(&path) {
                Ok(footprint) => return footprint,
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "Skipping unreadable footprint file, using builtin"
                    );
                }
            }
        }
        packages::builtin(name)
    }

    /// Resolves the footprint for a netlist part.
    ///
    /// The part's explicit footprint name wins; otherwise the name comes
    /// from [`default_footprint_name`].
    #[must_use]
    pub fn footprint_for_part(&self, part: &Part) -> Footprint {
        let name = part
            .footprint
            .clone()
            .unwrap_or_else(|| default_footprint_name(&part.value, &part.reference).to_string());
        self.resolve(&name)
    }

    /// Lists every resolvable footprint name: library files plus
    /// builtins, deduplicated, in natural order.
    #[must_use]
    pub fn available(&self) -> Vec<String> {
        let mut names: Vec<String> = BUILTIN_NAMES.iter().map(|name| (*name).to_string()).collect();

        let pattern = self.dir.join("*.kicad_mod");
        if let Ok(entries) = glob(&pattern.to_string_lossy()) {
            for entry in entries {
                match entry {
                    Ok(path) => {
                        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                            names.push(stem.to_string());
                        }
                    }
                    Err(err) => {
                        warn!(error = %err, "Skipping unreadable library entry");
                    }
                }
            }
        }

        names.sort_by(|a, b| refdes::natural_cmp(a, b));
        names.dedup();
        names
    }
}
