//! Port list parsing and canonicalisation.
//!
//! A `PortList` is always sorted, deduplicated and free of ranges, so its
//! string form can be handed straight to `nmap -p`.

use crate::categories;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// A canonical set of port numbers (0-65535).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PortList(BTreeSet<u16>);

impl PortList {
    /// Create an empty port list.
    pub const fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Parse a free-form port specification leniently.
    ///
    /// Accepts single ports and inclusive `start-end` ranges separated by
    /// commas, e.g. `"22,80,1000-1010"`. Tokens that are not numbers, ranges
    /// with more than two bounds, and ranges whose start exceeds the end are
    /// skipped rather than rejected.
    pub fn parse_lenient(spec: &str) -> Self {
        let mut list = Self::new();

        for token in spec.split(',') {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }

            if token.contains('-') {
                let bounds: Vec<&str> = token.split('-').collect();
                if bounds.len() != 2 {
                    continue;
                }
                if let (Ok(start), Ok(end)) =
                    (bounds[0].trim().parse::<u16>(), bounds[1].trim().parse::<u16>())
                {
                    list.0.extend(start..=end);
                }
            } else if let Ok(port) = token.parse::<u16>() {
                list.0.insert(port);
            }
        }

        list
    }

    /// Add a single port.
    pub fn insert(&mut self, port: u16) -> bool {
        self.0.insert(port)
    }

    /// Merge another set of ports into this list.
    pub fn extend(&mut self, ports: impl IntoIterator<Item = u16>) {
        self.0.extend(ports);
    }

    /// Check whether a port is present.
    pub fn contains(&self, port: u16) -> bool {
        self.0.contains(&port)
    }

    /// Iterate ports in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u16> + '_ {
        self.0.iter().copied()
    }

    /// Get the number of unique ports.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for PortList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(u16::to_string).collect();
        write!(f, "{}", parts.join(","))
    }
}

impl FromStr for PortList {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse_lenient(s))
    }
}

impl FromIterator<u16> for PortList {
    fn from_iter<I: IntoIterator<Item = u16>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Merge an explicit port specification with named categories.
///
/// Ranges are expanded eagerly and the result is rendered as a sorted,
/// comma-joined list of unique ports. An empty `categories` string contributes
/// no ports but still canonicalises `explicit`.
pub fn combine_port_lists(explicit: &str, categories: &str) -> String {
    let mut ports = PortList::parse_lenient(explicit);
    ports.extend(categories::expand(categories));
    ports.to_string()
}
