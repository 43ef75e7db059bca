//! CSV output formatting.

use crate::report::NmapRun;
use std::io::{self, Write};

/// Write every open port as `host,port,protocol,service`.
pub fn write_csv<W: Write>(out: &mut W, run: &NmapRun) -> io::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);

    wtr.write_record(["host", "port", "protocol", "service"])?;

    for port in run.open_ports() {
        let number = port.port.to_string();
        wtr.write_record([
            port.host.as_str(),
            number.as_str(),
            port.protocol.as_str(),
            port.service.as_deref().unwrap_or(""),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
