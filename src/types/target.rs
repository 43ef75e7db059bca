//! Target specification parsing.
//!
//! A target argument is either:
//! - A path to an existing file listing one target per line (file mode)
//! - A comma-separated list of IPv4 addresses and CIDR blocks
//!
//! File contents are not read here; the external tool consumes the file.

use ipnetwork::Ipv4Network;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::net::Ipv4Addr;
use std::path::Path;

/// Error type for target parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TargetError {
    #[error("invalid target [{0}]: expected an IPv4 address or CIDR block")]
    InvalidTarget(String),
    #[error("no valid target provided")]
    NoValidTarget,
}

/// Parsed target input handed to a scan strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetInput {
    /// Validated targets, or the single file path when `file_mode` is set.
    pub targets: Vec<String>,
    /// Whether `targets[0]` names a file of targets.
    pub file_mode: bool,
}

impl TargetInput {
    /// Parse a raw `--target` value.
    ///
    /// An existing regular file short-circuits validation and is returned as the
    /// sole target. Otherwise every comma-separated piece must be an IPv4 address
    /// or CIDR block; the first invalid piece aborts parsing.
    ///
    /// Empty input yields an empty list; see [`TargetInput::require_targets`].
    pub fn parse(raw: &str) -> Result<Self, TargetError> {
        if is_target_file(raw) {
            return Ok(Self {
                targets: vec![raw.to_string()],
                file_mode: true,
            });
        }

        let mut targets = Vec::new();
        for piece in raw.split(',') {
            let piece = piece.trim();
            if piece.is_empty() {
                continue;
            }
            if !is_valid_target(piece) {
                return Err(TargetError::InvalidTarget(piece.to_string()));
            }
            targets.push(piece.to_string());
        }

        Ok(Self {
            targets,
            file_mode: false,
        })
    }

    /// Reject an empty target list.
    pub fn require_targets(self) -> Result<Self, TargetError> {
        if self.targets.is_empty() {
            Err(TargetError::NoValidTarget)
        } else {
            Ok(self)
        }
    }

    /// Check if no targets were given.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Number of targets (1 in file mode).
    pub fn len(&self) -> usize {
        self.targets.len()
    }
}

impl fmt::Display for TargetInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.targets.join(", "))
    }
}

/// Convenience wrapper returning the `(targets, file_mode)` pair.
pub fn parse_target_input(raw: &str) -> Result<(Vec<String>, bool), TargetError> {
    let input = TargetInput::parse(raw)?;
    Ok((input.targets, input.file_mode))
}

/// Check if a string is an IPv4 address or an IPv4 CIDR block (/0 to /32).
pub fn is_valid_target(s: &str) -> bool {
    match s.split_once('/') {
        None => s.parse::<Ipv4Addr>().is_ok(),
        Some((addr, prefix)) => {
            let prefix_ok = !prefix.is_empty()
                && prefix.len() <= 2
                && prefix.chars().all(|c| c.is_ascii_digit())
                && prefix.parse::<u8>().map_or(false, |p| p <= 32);
            prefix_ok && addr.parse::<Ipv4Addr>().is_ok() && s.parse::<Ipv4Network>().is_ok()
        }
    }
}

fn is_target_file(raw: &str) -> bool {
    if raw.trim().is_empty() {
        return false;
    }
    fs::metadata(Path::new(raw)).map_or(false, |m| !m.is_dir())
}
