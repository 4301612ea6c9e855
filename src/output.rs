//! Output file handling.
//!
//! All generated files go through [`write_with_backup`], so the opt-in
//! backup behaviour is uniform across board and netlist outputs.

use chrono::Utc;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

/// Writes a file, optionally moving any existing file aside first.
///
/// With `backup` enabled, an existing file at `path` is renamed to a
/// timestamped sibling (`hello.kicad_pcb` becomes
/// `hello.kicad_pcb.20211014_120000.bak`) before the new contents are
/// written.
///
/// # Errors
///
/// Returns an error if the backup rename or the write fails.
pub fn write_with_backup(path: &Path, contents: &str, backup: bool) -> io::Result<()> {
    if backup && path.exists() {
        let backup_path = backup_path_for(path);
        std::fs::rename(path, &backup_path)?;
        tracing::info!(
            path = %path.display(),
            backup = %backup_path.display(),
            "Backed up existing file"
        );
    }
    std::fs::write(path, contents)
}

/// Builds the timestamped backup name next to the original file.
fn backup_path_for(path: &Path) -> PathBuf {
    let stamp = Utc::now().format("%Y%m%d_%H%M%S");
    let mut name = path
        .file_name()
        .map_or_else(|| OsString::from("output"), std::ffi::OsStr::to_os_string);
    name.push(format!(".{stamp}.bak"));
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_write_replaces_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");

        write_with_backup(&path, "first", false).unwrap();
        write_with_backup(&path, "second", false).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");
        // No backup siblings appeared
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn backup_preserves_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board.kicad_pcb");

        write_with_backup(&path, "old", true).unwrap();
        write_with_backup(&path, "new", true).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");

        let backup = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(Result::ok)
            .find(|e| e.file_name().to_string_lossy().ends_with(".bak"))
            .expect("backup file");
        assert_eq!(std::fs::read_to_string(backup.path()).unwrap(), "old");
        assert!(backup
            .file_name()
            .to_string_lossy()
            .starts_with("board.kicad_pcb."));
    }

    #[test]
    fn backup_flag_without_existing_file_writes_normally() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fresh.net");

        write_with_backup(&path, "contents", true).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "contents");
    }
}
