//! Output formatting module.
//!
//! [`Console`] is the user-facing progress channel: status markers, the
//! configuration panel, and the command being run. It is constructed by the
//! caller and passed down explicitly so tests can capture what was printed.
//! Report formatters render a decoded scan report as plain text, JSON or CSV.

mod csv_format;
mod json_format;
mod plain;

pub use csv_format::write_csv;
pub use json_format::write_json;
pub use plain::write_plain;

use crate::cli::OutputFormat;
use crate::report::NmapRun;
use console::{Style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use std::fmt::Display;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Render a report in the requested format.
pub fn format_report<W: Write>(
    out: &mut W,
    run: &NmapRun,
    format: OutputFormat,
    color: bool,
) -> io::Result<()> {
    match format {
        OutputFormat::Plain => write_plain(out, run, color),
        OutputFormat::Json => write_json(out, run),
        OutputFormat::Csv => write_csv(out, run),
    }
}

/// Status marker printed in front of console lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// `[+]` success / progress.
    Success,
    /// `[*]` informational.
    Info,
    /// `[!]` warning.
    Warning,
    /// `[-]` error.
    Error,
}

impl Marker {
    fn text(self) -> &'static str {
        match self {
            Self::Success => "[+]",
            Self::Info => "[*]",
            Self::Warning => "[!]",
            Self::Error => "[-]",
        }
    }

    fn style(self) -> Style {
        match self {
            Self::Success => Style::new().green(),
            Self::Info => Style::new().cyan(),
            Self::Warning => Style::new().yellow(),
            Self::Error => Style::new().red(),
        }
    }
}

/// Explicit output context for user-facing messages.
pub struct Console {
    out: Mutex<Box<dyn Write + Send>>,
    color: bool,
    interactive: bool,
}

impl Console {
    /// Console writing to stdout.
    pub fn stdout(color: bool) -> Self {
        let interactive = Term::stdout().is_term();
        Self {
            out: Mutex::new(Box::new(io::stdout())),
            color: color && interactive,
            interactive,
        }
    }

    /// Console writing to an arbitrary sink. Never shows spinners.
    pub fn with_writer(writer: impl Write + Send + 'static, color: bool) -> Self {
        Self {
            out: Mutex::new(Box::new(writer)),
            color,
            interactive: false,
        }
    }

    /// Console writing to an in-memory buffer, returned alongside it.
    pub fn buffered() -> (Self, SharedBuffer) {
        let buffer = SharedBuffer::default();
        (Self::with_writer(buffer.clone(), false), buffer)
    }

    /// Whether ANSI styling is applied.
    pub fn color(&self) -> bool {
        self.color
    }

    /// Apply a style, honouring the colour switch.
    pub fn paint(&self, text: impl Display, style: Style) -> String {
        style.force_styling(self.color).apply_to(text).to_string()
    }

    /// Write a raw line.
    pub fn line(&self, text: impl Display) {
        if let Ok(mut out) = self.out.lock() {
            let _ = writeln!(out, "{}", text);
        }
    }

    /// Write a line prefixed by a status marker.
    pub fn marked(&self, marker: Marker, text: impl Display) {
        let prefix = self.paint(marker.text(), marker.style());
        self.line(format_args!("{} {}", prefix, text));
    }

    pub fn success(&self, text: impl Display) {
        self.marked(Marker::Success, text);
    }

    pub fn info(&self, text: impl Display) {
        self.marked(Marker::Info, text);
    }

    pub fn warning(&self, text: impl Display) {
        self.marked(Marker::Warning, text);
    }

    pub fn error(&self, text: impl Display) {
        self.marked(Marker::Error, text);
    }

    /// Section title, e.g. `[*] Host Discovery`.
    pub fn section(&self, title: &str) {
        self.line("");
        self.info(title);
    }

    /// Timestamped milestone, e.g. `[*] 2026-10-18 09:30:00 Starting`.
    pub fn timestamp(&self, label: &str) {
        let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        self.info(format_args!("{} {}", now, label));
    }

    /// Announce the external command about to run.
    pub fn running(&self, command: &str) {
        let command = self.paint(command, Style::new().green());
        self.success(format_args!("Running: {}", command));
    }

    /// Announce a file the scan produced.
    pub fn created(&self, path: impl Display) {
        let path = self.paint(path, Style::new().green());
        self.success(format_args!("Creating: {}", path));
    }

    /// Print a boxed key/value panel.
    pub fn panel(&self, rows: &[(&str, String)]) {
        let rule = "─".repeat(46);
        self.line("");
        self.line(format_args!("┌{}┐", rule));
        for (key, value) in rows {
            let key = self.paint(format_args!("⦿ {:<11}", key), Style::new().green());
            self.line(format_args!("  {} : {}", key, value));
        }
        self.line(format_args!("└{}┘", rule));
        self.line("");
    }

    /// Print the application banner.
    pub fn banner(&self) {
        plain::banner(self);
    }

    /// Spinner shown while an external tool runs, on interactive terminals only.
    pub fn spinner(&self, message: &str) -> Option<ProgressBar> {
        if !self.interactive {
            return None;
        }
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) =
            ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")
        {
            spinner.set_style(style);
        }
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(120));
        Some(spinner)
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::stdout(true)
    }
}

/// Cloneable in-memory sink used to capture console output.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    /// Everything written so far, lossily decoded as UTF-8.
    pub fn contents(&self) -> String {
        self.0
            .lock()
            .map(|buf| String::from_utf8_lossy(&buf).into_owned())
            .unwrap_or_default()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut inner = self
            .0
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "buffer lock poisoned"))?;
        inner.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markers_without_color() {
        let (console, buffer) = Console::buffered();
        console.success("done");
        console.info("note");
        console.warning("careful");
        console.error("broken");
        assert_eq!(
            buffer.contents(),
            "[+] done\n[*] note\n[!] careful\n[-] broken\n"
        );
    }

    #[test]
    fn test_running_and_created() {
        let (console, buffer) = Console::buffered();
        console.running("nmap -sn 10.0.0.1");
        console.created("hostDiscovery/targets.txt");
        let out = buffer.contents();
        assert!(out.contains("[+] Running: nmap -sn 10.0.0.1\n"));
        assert!(out.contains("[+] Creating: hostDiscovery/targets.txt\n"));
    }

    #[test]
    fn test_panel_rows() {
        let (console, buffer) = Console::buffered();
        console.panel(&[
            ("Target", "10.0.0.1".to_string()),
            ("Mode", "normal".to_string()),
        ]);
        let out = buffer.contents();
        assert!(out.contains("⦿ Target      : 10.0.0.1"));
        assert!(out.contains("⦿ Mode        : normal"));
        assert!(out.contains('┌') && out.contains('┘'));
    }

    #[test]
    fn test_color_applies_ansi() {
        let console = Console::with_writer(io::sink(), true);
        assert!(console.paint("x", Style::new().green()).contains("\u{1b}["));
        let console = Console::with_writer(io::sink(), false);
        assert_eq!(console.paint("x", Style::new().green()), "x");
    }

    #[test]
    fn test_buffered_console_has_no_spinner() {
        let (console, _) = Console::buffered();
        assert!(console.spinner("scanning").is_none());
    }
}
