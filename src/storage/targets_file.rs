//! Newline-delimited target list persistence.
//!
//! One IPv4 address per line, consumable as a file-mode `--target`.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// File name of the discovered-hosts list inside the host discovery directory.
pub const TARGETS_FILE_NAME: &str = "targets.txt";

/// Create a directory (and parents) if it does not already exist.
pub fn ensure_dir(dir: &Path) -> io::Result<()> {
    if dir.is_dir() {
        return Ok(());
    }
    fs::create_dir_all(dir)
}

/// Write targets to `path`, one per line, replacing any existing file.
pub fn write_targets(path: &Path, targets: &[String]) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for target in targets {
        writeln!(writer, "{}", target)?;
    }
    writer.flush()
}
