//! Output formatting and writing utilities
//!
//! Results are written as human-readable tables or as JSON/YAML for
//! scripts. Status messages only appear in human mode so machine output
//! stays parseable.

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::logging::redaction;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use is_terminal::IsTerminal;
use serde::Serialize;
use std::io::{self, Write};
use std::time::Duration;
use tracing::trace;
use tripkit_core::{Alert, Booking, Itinerary, ItineraryItem, Notification, Page, Review, User};

/// Serialization for the non-human formats
pub trait OutputFormatter {
    fn format<T: Serialize>(&self, value: &T) -> Result<String>;
}

impl OutputFormatter for OutputFormat {
    fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string(value)?),
            OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(value)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
            // Types without a table fall back to pretty JSON
            OutputFormat::Human => Ok(serde_json::to_string_pretty(value)?),
        }
    }
}

/// A record that renders as one table row
pub trait Tabular {
    const HEADERS: &'static [&'static str];

    fn row(&self) -> Vec<String>;
}

fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

impl Tabular for Itinerary {
    const HEADERS: &'static [&'static str] = &["ID", "TITLE", "DESTINATION", "START", "END"];

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.title.clone(),
            or_dash(self.destination.as_deref()),
            or_dash(self.start_date),
            or_dash(self.end_date),
        ]
    }
}

impl Tabular for ItineraryItem {
    const HEADERS: &'static [&'static str] = &["ID", "TITLE", "TYPE", "STARTS"];

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.title.clone(),
            or_dash(self.kind.as_deref()),
            or_dash(self.start_time.map(|t| t.format("%Y-%m-%d %H:%M"))),
        ]
    }
}

impl Tabular for Review {
    const HEADERS: &'static [&'static str] = &["ID", "RATING", "AUTHOR", "HELPFUL", "COMMENT"];

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            "★".repeat(usize::from(self.rating.min(5))),
            or_dash(self.author.as_ref().map(|a| a.name.as_str())),
            self.helpful_count.to_string(),
            or_dash(self.comment.as_deref()),
        ]
    }
}

impl Tabular for Alert {
    const HEADERS: &'static [&'static str] = &["ID", "SEVERITY", "TITLE", "LOCATION"];

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            format!("{:?}", self.severity).to_lowercase(),
            self.title.clone(),
            or_dash(self.location.as_deref()),
        ]
    }
}

impl Tabular for Notification {
    const HEADERS: &'static [&'static str] = &["ID", "", "TITLE", "RECEIVED"];

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            if self.read { " " } else { "●" }.to_string(),
            self.title.clone(),
            or_dash(self.created_at.map(|t| t.format("%Y-%m-%d %H:%M"))),
        ]
    }
}

impl Tabular for Booking {
    const HEADERS: &'static [&'static str] = &["ID", "STATUS", "START", "END", "TOTAL"];

    fn row(&self) -> Vec<String> {
        let total = self.total_price.map(|price| match &self.currency {
            Some(currency) => format!("{price:.2} {currency}"),
            None => format!("{price:.2}"),
        });
        vec![
            self.id.clone(),
            format!("{:?}", self.status).to_lowercase(),
            or_dash(self.start_date),
            or_dash(self.end_date),
            or_dash(total),
        ]
    }
}

impl Tabular for User {
    const HEADERS: &'static [&'static str] = &["ID", "NAME", "EMAIL", "ROLE"];

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.email.clone(),
            or_dash(self.role.as_deref()),
        ]
    }
}

/// Output writer that handles different output formats and colors
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    show_progress: bool,
    quiet: bool,
    writer: Box<dyn Write>,
}

impl OutputWriter {
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool) -> Self {
        Self {
            format,
            use_color,
            show_progress: !quiet && format == OutputFormat::Human && io::stderr().is_terminal(),
            quiet,
            writer: Box::new(io::stdout()),
        }
    }

    /// Create an output writer with a custom writer
    pub fn with_writer(format: OutputFormat, use_color: bool, quiet: bool, writer: Box<dyn Write>) -> Self {
        Self {
            format,
            use_color,
            show_progress: false,
            quiet,
            writer,
        }
    }

    pub fn is_human(&self) -> bool {
        self.format == OutputFormat::Human
    }

    fn write(&mut self, content: &str) -> Result<()> {
        write!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    pub fn writeln(&mut self, content: &str) -> Result<()> {
        writeln!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write an info message
    pub fn info(&mut self, message: &str) -> Result<()> {
        if self.quiet || !self.is_human() {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&format!("{} {}", "ℹ".blue(), message))
        } else {
            self.writeln(&format!("INFO: {}", message))
        }
    }

    /// Write a success message
    pub fn success(&mut self, message: &str) -> Result<()> {
        if self.quiet || !self.is_human() {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&format!("✓ {}", message).green().to_string())
        } else {
            self.writeln(message)
        }
    }

    /// Write a warning message
    pub fn warning(&mut self, message: &str) -> Result<()> {
        if !self.is_human() {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.yellow().to_string())
        } else {
            self.writeln(&format!("WARNING: {}", message))
        }
    }

    /// Write a section header
    pub fn section(&mut self, title: &str) -> Result<()> {
        if self.quiet || !self.is_human() {
            return Ok(());
        }

        self.writeln("")?;
        if self.use_color {
            self.writeln(&format!("═══ {} ═══", title).bright_blue().to_string())
        } else {
            self.writeln(&format!("=== {} ===", title))
        }
    }

    /// Write data in the configured format
    pub fn data<T: Serialize>(&mut self, value: &T) -> Result<()> {
        if tracing::enabled!(tracing::Level::TRACE) {
            let mut logged = serde_json::to_value(value)?;
            redaction::redact_json_value(&mut logged);
            trace!(data = %logged, "Writing output");
        }

        let formatted = self.format.format(value)?;
        if self.is_human() || self.format == OutputFormat::Yaml {
            // serde_yaml already ends with a newline
            if formatted.ends_with('\n') {
                self.write(&formatted)
            } else {
                self.writeln(&formatted)
            }
        } else {
            self.writeln(&formatted)
        }
    }

    /// One record: a single-row table for humans, the record itself otherwise
    pub fn record<T: Tabular + Serialize>(&mut self, record: &T) -> Result<()> {
        if self.is_human() {
            self.table(T::HEADERS, vec![record.row()])
        } else {
            self.data(record)
        }
    }

    /// A page of records with a pagination footer in human mode
    pub fn page<T: Tabular + Serialize>(&mut self, page: &Page<T>, empty: &str) -> Result<()> {
        if !self.is_human() {
            return self.data(page);
        }

        if page.data.is_empty() {
            return self.info(empty);
        }

        self.table(T::HEADERS, page.data.iter().map(Tabular::row).collect())?;
        if let Some(pagination) = page.pagination {
            let more = if pagination.has_more { ", more available" } else { "" };
            self.info(&format!(
                "Page {} ({} of {} total{})",
                pagination.page,
                page.data.len(),
                pagination.total,
                more
            ))?;
        }
        Ok(())
    }

    /// Write a table (for human format)
    pub fn table(&mut self, headers: &[&str], rows: Vec<Vec<String>>) -> Result<()> {
        if !self.is_human() {
            return Ok(());
        }

        // Column widths in characters, not bytes
        let mut widths = headers.iter().map(|h| h.chars().count()).collect::<Vec<_>>();
        for row in &rows {
            for (i, cell) in row.iter().enumerate() {
                if i < widths.len() {
                    widths[i] = widths[i].max(cell.chars().count());
                }
            }
        }

        let header_row = headers
            .iter()
            .enumerate()
            .map(|(i, h)| format!("{:width$}", h, width = widths[i]))
            .collect::<Vec<_>>()
            .join(" │ ");

        if self.use_color {
            self.writeln(header_row.trim_end().bold().to_string().as_str())?;
        } else {
            self.writeln(header_row.trim_end())?;
        }

        let separator = widths
            .iter()
            .map(|w| "─".repeat(*w))
            .collect::<Vec<_>>()
            .join("─┼─");
        self.writeln(&separator)?;

        for row in rows {
            let row_str = row
                .iter()
                .enumerate()
                .map(|(i, cell)| match widths.get(i) {
                    Some(width) => format!("{:width$}", cell, width = *width),
                    None => cell.clone(),
                })
                .collect::<Vec<_>>()
                .join(" │ ");
            self.writeln(row_str.trim_end())?;
        }

        Ok(())
    }

    /// Spinner on stderr while a request is in flight
    pub fn spinner(&self, message: &str) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }

        let pb = ProgressBar::new_spinner();
        pb.set_style(default_spinner_style());
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    }
}

fn default_spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.green} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner())
}
