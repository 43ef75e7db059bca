//! JSON output formatting.

use crate::report::NmapRun;
use std::io::{self, Write};

/// Write a decoded report as pretty-printed JSON.
pub fn write_json<W: Write>(out: &mut W, run: &NmapRun) -> io::Result<()> {
    let json = serde_json::to_string_pretty(run)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    writeln!(out, "{}", json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::fixtures::PORT_SCAN_XML;

    #[test]
    fn test_json_round_trips_through_value() {
        let run = NmapRun::parse(PORT_SCAN_XML).unwrap();
        let mut out = Vec::new();
        write_json(&mut out, &run).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["scanner"], "nmap");
        assert_eq!(
            value["hosts"][0]["ports"]["ports"][0]["service"]["product"],
            "OpenSSH"
        );
    }
}
