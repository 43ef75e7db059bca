//! On-disk artifacts produced by a scan.
//!
//! Provides the output directory layout and the plain-text target list that
//! host discovery hands to later port scans.

mod targets_file;

pub use targets_file::{ensure_dir, write_targets, TARGETS_FILE_NAME};
