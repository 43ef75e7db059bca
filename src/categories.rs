//! Named port categories.
//!
//! Maps a category name to the ports commonly exposed by that class of
//! service. `all` is not a table entry: it expands to the union of every
//! category.

use std::collections::BTreeSet;
use tracing::warn;

/// Reserved category name meaning "every category".
pub const ALL_CATEGORIES: &str = "all";

/// Static table of category names to comma-separated port lists.
pub const PORT_CATEGORIES: &[(&str, &str)] = &[
    ("top12", "21,22,2222,23,53,80,135,139,443,445,3389,8080"),
    (
        "database",
        "3306,5432,1433,1521,27017,6379,9042,9160,50000,8086,5984,7474,7687,11211,3050,9092,1527,2638,8529,28015,2424,26257,9200",
    ),
    (
        "web",
        "80,443,8080,8443,8000,3000,5000,4200,8888,8081,8001,3001,9000,9090,1313,8008,8880",
    ),
    (
        "network",
        "10000,20000,902,903,8006,10050,10051,23560,17778,3000,55000,9090,5666,5665,19999,443,8000,8089,6557,8980,9100,9000,8443",
    ),
    ("firewall", "4444,4433,4443,443,8443"),
    ("windows", "88,389,636,593,5985,5986"),
    (
        "vpn",
        "22,2222,3389,1194,1701,500,4500,1723,5900,5901,5985,5986,443,4443,8443,5938,992,8080,6000,5902",
    ),
];

/// Look up a category's port list. Names are case-insensitive.
pub fn lookup(name: &str) -> Option<&'static str> {
    let name = name.trim();
    PORT_CATEGORIES
        .iter()
        .find(|(category, _)| category.eq_ignore_ascii_case(name))
        .map(|(_, ports)| *ports)
}

/// Names of all known categories, in table order.
pub fn names() -> impl Iterator<Item = &'static str> {
    PORT_CATEGORIES.iter().map(|(name, _)| *name)
}

/// Expand a comma-separated list of category names into a port set.
///
/// If any name is `all`, every category is included and the other names are
/// ignored. Unknown names are logged and contribute nothing.
pub fn expand(categories: &str) -> BTreeSet<u16> {
    let requested: Vec<&str> = categories
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .collect();

    let mut ports = BTreeSet::new();

    if requested
        .iter()
        .any(|name| name.eq_ignore_ascii_case(ALL_CATEGORIES)) {
        for &(_, list) in PORT_CATEGORIES {
            ports.extend(parse_list(list));
        }
        return ports;
    }

    for name in requested {
        match lookup(name) {
            Some(list) => ports.extend(parse_list(list)),
            None => warn!(
                "Unknown port category: {} (known: {})",
                name,
                names().collect::<Vec<_>>().join(", ")
            ),
        }
    }

    ports
}

fn parse_list(list: &'static str) -> impl Iterator<Item = u16> {
    list.split(',').filter_map(|p| p.trim().parse().ok())
}
