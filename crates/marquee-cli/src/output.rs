use clap::ValueEnum;
use comfy_table::{presets, modifiers, Attribute, Cell, Color, Table};
use marquee_models::{ContentRecord, ImportSummary, SearchPage};
use owo_colors::OwoColorize;
use serde::Serialize;
use serde_json::json;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
    #[value(name = "json-pretty")]
    JsonPretty,
}

/// Terminal output that switches between colored text and JSON lines
pub struct Output {
    format: OutputFormat,
    quiet: bool,
}

impl Output {
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        Self { format, quiet }
    }

    pub fn is_human(&self) -> bool {
        self.format == OutputFormat::Human
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    fn message(&self, kind: &str, symbol: Option<String>, msg: &str) {
        if self.is_human() {
            match symbol {
                Some(symbol) => println!("{} {}", symbol, msg),
                None => println!("{}", msg),
            }
        } else {
            self.print_json(&json!({ "type": kind, "message": msg }));
        }
    }

    pub fn success(&self, msg: impl AsRef<str>) {
        if !self.quiet {
            self.message("success", Some("✓".green().to_string()), msg.as_ref());
        }
    }

    pub fn info(&self, msg: impl AsRef<str>) {
        if !self.quiet {
            self.message("info", None, msg.as_ref());
        }
    }

    pub fn warn(&self, msg: impl AsRef<str>) {
        if !self.quiet {
            self.message("warning", Some("⚠".yellow().to_string()), msg.as_ref());
        }
    }

    /// Shown even with --quiet
    pub fn error(&self, msg: impl AsRef<str>) {
        if self.is_human() {
            eprintln!("{} {}", "✗".red(), msg.as_ref());
        } else {
            self.print_json(&json!({ "type": "error", "message": msg.as_ref() }));
        }
    }

    /// Machine-readable result for JSON modes; ignored in human mode
    pub fn data<T: Serialize>(&self, value: &T) {
        if self.is_human() {
            return;
        }
        match serde_json::to_value(value) {
            Ok(v) => self.print_json(&v),
            Err(e) => self.error(format!("Failed to serialize output: {}", e)),
        }
    }

    fn print_json(&self, data: &serde_json::Value) {
        let text = match self.format {
            OutputFormat::JsonPretty => serde_json::to_string_pretty(data),
            _ => serde_json::to_string(data),
        };
        println!("{}", text.unwrap_or_default());
    }

    pub fn table(&self, table: &Table) {
        if self.is_human() && !self.quiet {
            println!("{}", table);
        }
    }
}

pub fn styled_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL);
    table.apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.set_header(
        headers
            .iter()
            .map(|h| Cell::new(h).add_attribute(Attribute::Bold).fg(Color::Cyan))
            .collect::<Vec<_>>(),
    );
    table
}

pub fn search_table(page: &SearchPage) -> Table {
    let mut table = styled_table(&["IMDb ID", "Title", "Year", "Type"]);
    for hit in &page.results {
        table.add_row(vec![
            Cell::new(&hit.imdb_id),
            Cell::new(&hit.title),
            Cell::new(&hit.year),
            Cell::new(&hit.kind),
        ]);
    }
    table
}

pub fn records_table(records: &[ContentRecord]) -> Table {
    let mut table = styled_table(&["ID", "IMDb ID", "Title", "Slug", "Year", "Rating"]);
    for record in records {
        table.add_row(vec![
            Cell::new(record.id),
            Cell::new(record.imdb_id().unwrap_or("-")),
            Cell::new(record.display_title()),
            Cell::new(record.slug()),
            Cell::new(record.fields.year.map(|y| y.to_string()).unwrap_or_else(|| "-".to_string())),
            Cell::new(format!("{:.1}", record.fields.rating)),
        ]);
    }
    table
}

pub fn summary_table(summary: &ImportSummary) -> Table {
    let mut table = styled_table(&["Result", "Count"]);
    table.add_row(vec![Cell::new("Succeeded"), Cell::new(summary.success_count).fg(Color::Green)]);
    table.add_row(vec![Cell::new("  created"), Cell::new(summary.created_count)]);
    table.add_row(vec![
        Cell::new("  already present"),
        Cell::new(summary.success_count - summary.created_count),
    ]);
    let failed = Cell::new(summary.failure_count);
    table.add_row(vec![
        Cell::new("Failed"),
        if summary.failure_count > 0 { failed.fg(Color::Red) } else { failed },
    ]);
    table
}

/// Show a secret as "ab***yz"
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    match chars.len() {
        0 => "<not set>".to_string(),
        1..=4 => "*".repeat(chars.len()),
        n => format!(
            "{}***{}",
            chars[..2].iter().collect::<String>(),
            chars[n - 2..].iter().collect::<String>()
        ),
    }
}
