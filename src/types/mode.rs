//! Scan mode (timing aggressiveness).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How hard the external tool should push the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanMode {
    /// Fastest timing (`-T4`).
    Aggressive,
    /// Tool defaults, no timing flag.
    #[default]
    Normal,
    /// Slowest timing (`-T2`).
    Stealth,
}

impl ScanMode {
    /// Timing flag passed to nmap for this mode, if any.
    pub const fn timing_flag(self) -> Option<&'static str> {
        match self {
            Self::Aggressive => Some("-T4"),
            Self::Stealth => Some("-T2"),
            Self::Normal => None,
        }
    }
}

impl fmt::Display for ScanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Aggressive => write!(f, "aggressive"),
            Self::Normal => write!(f, "normal"),
            Self::Stealth => write!(f, "stealth"),
        }
    }
}

impl FromStr for ScanMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "aggressive" | "3" => Ok(Self::Aggressive),
            "normal" | "2" => Ok(Self::Normal),
            "stealth" | "1" => Ok(Self::Stealth),
            _ => Err(format!(
                "unknown scan mode: {} (use 1/stealth, 2/normal or 3/aggressive)",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_aliases() {
        assert_eq!("aggressive".parse::<ScanMode>().unwrap(), ScanMode::Aggressive);
        assert_eq!("3".parse::<ScanMode>().unwrap(), ScanMode::Aggressive);
        assert_eq!(" Stealth ".parse::<ScanMode>().unwrap(), ScanMode::Stealth);
        assert_eq!("1".parse::<ScanMode>().unwrap(), ScanMode::Stealth);
        assert_eq!("NORMAL".parse::<ScanMode>().unwrap(), ScanMode::Normal);
        assert_eq!("2".parse::<ScanMode>().unwrap(), ScanMode::Normal);
        assert!("passive".parse::<ScanMode>().is_err());
    }

    #[test]
    fn test_timing_flags() {
        assert_eq!(ScanMode::Aggressive.timing_flag(), Some("-T4"));
        assert_eq!(ScanMode::Stealth.timing_flag(), Some("-T2"));
        assert_eq!(ScanMode::Normal.timing_flag(), None);
        assert_eq!(ScanMode::default(), ScanMode::Normal);
    }
}
