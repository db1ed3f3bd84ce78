//! Terminal output for the catalog tool.
//!
//! Every printer is silent in `--json` mode, where commands emit a single
//! JSON document instead.

use console::{style, StyledObject};
use indicatif::{ProgressBar, ProgressStyle};

/// Output handler shared by all commands.
#[derive(Clone)]
pub struct Output {
    json: bool,
}

impl Output {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    /// Whether commands should emit JSON.
    pub fn is_json(&self) -> bool {
        self.json
    }

    fn notice(&self, mark: StyledObject<&str>, msg: &str, stderr: bool) {
        if self.json {
            return;
        }
        if stderr {
            eprintln!("{mark} {msg}");
        } else {
            println!("{mark} {msg}");
        }
    }

    pub fn info(&self, msg: &str) {
        self.notice(style("ℹ").blue(), msg, false);
    }

    pub fn success(&self, msg: &str) {
        self.notice(style("✓").green(), msg, false);
    }

    pub fn warn(&self, msg: &str) {
        self.notice(style("⚠").yellow(), msg, true);
    }

    /// Report a failure. In JSON mode this is the only line printed.
    pub fn error(&self, msg: &str) {
        if self.json {
            eprintln!("{}", serde_json::json!({ "error": msg }));
            return;
        }
        eprintln!("{} {}", style("✗").red(), style(msg).red());
    }

    pub fn header(&self, title: &str) {
        if !self.json {
            println!("\n{}", style(title).bold().underlined());
        }
    }

    /// One labelled field of a report.
    pub fn kv(&self, key: &str, value: &str) {
        if !self.json {
            println!("  {}: {}", style(key).dim(), value);
        }
    }

    pub fn json<T: serde::Serialize>(&self, value: &T) {
        match serde_json::to_string_pretty(value) {
            Ok(json) => println!("{json}"),
            Err(e) => self.error(&format!("failed to encode output: {e}")),
        }
    }

    /// Print the heading of a fixed-width table and return it for rows.
    pub fn table(&self, columns: &[(&str, usize)]) -> Table {
        let table = Table {
            widths: columns.iter().map(|(_, width)| *width).collect(),
            quiet: self.json,
        };
        if !self.json {
            println!();
            let names: Vec<&str> = columns.iter().map(|(name, _)| *name).collect();
            println!("{}", style(table.format(&names)).bold());
        }
        table
    }

    /// Progress bar over `len` requests; hidden in JSON mode.
    pub fn progress(&self, len: u64, msg: &str) -> ProgressBar {
        if self.json {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(len);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        pb.set_message(msg.to_string());
        pb
    }
}

/// Column layout of a table started with [`Output::table`].
pub struct Table {
    widths: Vec<usize>,
    quiet: bool,
}

impl Table {
    pub fn row(&self, cells: &[&str]) {
        if !self.quiet {
            println!("{}", self.format(cells));
        }
    }

    /// Cells padded to their column width, long ones cut with `…`.
    fn format(&self, cells: &[&str]) -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(&self.widths)
            .map(|(cell, &width)| format!("{:width$}", truncate(cell, width)))
            .collect();
        format!("  {}", padded.join("  ").trim_end())
    }
}

/// Shorten `text` to at most `width` characters, marking the cut with `…`.
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(1)).collect();
    format!("{kept}…")
}

/// Milliseconds, switching to seconds past one second.
pub fn format_ms(ms: f64) -> String {
    if ms >= 1000.0 {
        format!("{:.2}s", ms / 1000.0)
    } else {
        format!("{ms:.2}ms")
    }
}

/// Pool occupancy, highlighted once every slot is taken.
pub fn pool_usage(active: usize, waiting: usize, max: usize) -> String {
    let usage = format!("{active}/{max} active, {waiting} waiting");
    if active < max {
        usage
    } else if waiting == 0 {
        style(usage).yellow().to_string()
    } else {
        style(usage).red().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("bolt", 10), "bolt");
        assert_eq!(truncate("hex bolt m8", 6), "hex b…");
    }

    #[test]
    fn test_format_ms() {
        assert_eq!(format_ms(12.345), "12.35ms");
        assert_eq!(format_ms(1500.0), "1.50s");
    }

    #[test]
    fn test_table_pads_and_cuts_cells() {
        let table = Table {
            widths: vec![6, 4],
            quiet: true,
        };
        assert_eq!(table.format(&["bolt", "M8"]), "  bolt    M8");
        assert_eq!(table.format(&["hex bolt", "zinc plated"]), "  hex b…  zin…");
    }

    #[test]
    fn test_pool_usage_below_capacity_is_plain() {
        assert_eq!(pool_usage(3, 0, 10), "3/10 active, 0 waiting");
        assert!(pool_usage(10, 2, 10).contains("10/10 active, 2 waiting"));
    }
}
