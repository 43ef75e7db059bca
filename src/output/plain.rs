//! Plain text output formatting.
//!
//! Produces human-readable output with colors and formatting.

use super::Console;
use crate::report::NmapRun;
use console::Style;
use std::io::{self, Write};

const RULE: &str = "═══════════════════════════════════════════════════════════════";
const THIN_RULE: &str = "───────────────────────────────────────────────────────────────";

/// Print the application banner.
pub(super) fn banner(console: &Console) {
    let accent = Style::new().cyan();
    console.line("");
    console.line("  ┌──────────────────────────────────────────────┐");
    console.line(format_args!(
        "  │   {}   │",
        console.paint("r e c o n n o i t e r   ·   r e c o n", accent)
    ));
    console.line("  └──────────────────────────────────────────────┘");
    console.line(format_args!("\t\t\t\t\tv{}", env!("CARGO_PKG_VERSION")));
    console.line("");
}

/// Render a decoded report as a styled summary of hosts and open ports.
pub fn write_plain<W: Write>(out: &mut W, run: &NmapRun, color: bool) -> io::Result<()> {
    let paint = |text: &str, style: Style| style.force_styling(color).apply_to(text).to_string();

    writeln!(out)?;
    writeln!(out, "{}", paint(RULE, Style::new().cyan()))?;
    writeln!(
        out,
        "                    {} Scan Report",
        paint(scanner_name(run), Style::new().cyan().bold())
    )?;
    writeln!(out, "{}", paint(RULE, Style::new().cyan()))?;
    writeln!(out)?;

    if !run.args.is_empty() {
        writeln!(out, "  {} {}", paint("Command:", Style::new().bold()), run.args)?;
    }
    if !run.start.is_empty() {
        writeln!(out, "  {} {}", paint("Started:", Style::new().bold()), run.start)?;
    }

    let hosts = run.live_hosts();
    let open = run.open_ports();
    writeln!(
        out,
        "  {} {} hosts, {} open ports",
        paint("Summary:", Style::new().bold()),
        paint(&hosts.len().to_string(), Style::new().green().bold()),
        paint(&open.len().to_string(), Style::new().green().bold()),
    )?;
    writeln!(out)?;

    if open.is_empty() {
        if hosts.is_empty() {
            writeln!(out, "  {}", paint("No hosts to display.", Style::new().dim()))?;
        } else {
            for host in &hosts {
                writeln!(out, "  {}", host)?;
            }
        }
    } else {
        writeln!(out, "  {}", paint(THIN_RULE, Style::new().dim()))?;
        writeln!(
            out,
            "  {:<16}  {:>6}  {:<6}  {:<15}  {}",
            "HOST", "PORT", "PROTO", "SERVICE", "VERSION"
        )?;
        writeln!(out, "  {}", paint(THIN_RULE, Style::new().dim()))?;

        for port in &open {
            let version = [port.product.as_deref(), port.version.as_deref()]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(
                out,
                "  {:<16}  {:>6}  {:<6}  {:<15}  {}",
                port.host,
                port.port,
                port.protocol,
                port.service.as_deref().unwrap_or("unknown"),
                truncate_string(&version, 35)
            )?;
        }

        writeln!(out, "  {}", paint(THIN_RULE, Style::new().dim()))?;
    }

    writeln!(out)?;
    writeln!(out, "{}", paint(RULE, Style::new().cyan()))?;
    Ok(())
}

fn scanner_name(run: &NmapRun) -> &str {
    if run.scanner.is_empty() {
        "Nmap"
    } else {
        &run.scanner
    }
}

/// Truncate a string to a maximum length, adding ellipsis if truncated.
fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
