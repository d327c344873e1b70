use anyhow::Result;
use is_terminal::IsTerminal;
use snote::NoteEntry;
use std::io;
use tabled::{
    settings::{object::Rows, Alignment, Color, Modify, Style},
    Table, Tabled,
};

use crate::cli::OutputFormat;

#[derive(Tabled)]
struct NoteRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Title")]
    title: String,
}

#[derive(Debug, serde::Serialize)]
struct NoteRecord {
    date: String,
    title: String,
    filename: String,
    path: String,
}

impl From<&NoteEntry> for NoteRecord {
    fn from(entry: &NoteEntry) -> Self {
        let info = entry.info();
        Self {
            date: info.date,
            title: info.title,
            filename: entry.name().to_string(),
            path: entry.path().display().to_string(),
        }
    }
}

/// Print `entries` to stdout in `format`
pub fn print_notes(entries: &[NoteEntry], format: OutputFormat) -> Result<()> {
    let colored = io::stdout().is_terminal();
    print!("{}", render_notes(entries, format, colored)?);
    Ok(())
}

pub fn render_notes(entries: &[NoteEntry], format: OutputFormat, colored: bool) -> Result<String> {
    let records: Vec<NoteRecord> = entries.iter().map(NoteRecord::from).collect();

    match format {
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(&records)?)),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(&records)?),
        OutputFormat::Table => Ok(render_table(records, colored)),
    }
}

fn render_table(records: Vec<NoteRecord>, colored: bool) -> String {
    if records.is_empty() {
        return "No notes found.\n".to_string();
    }

    let rows = records.into_iter().map(|record| NoteRow {
        date: record.date,
        title: record.title,
    });

    let mut table = Table::new(rows);
    table.with(Style::modern());
    if colored {
        table.with(Modify::new(Rows::one(0)).with(Color::FG_BRIGHT_CYAN));
    }
    table.with(Modify::new(Rows::new(1..)).with(Alignment::left()));

    format!("{}\n", table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use snote::{notebook::index, SortKey};
    use tempfile::TempDir;

    fn entries() -> (TempDir, Vec<NoteEntry>) {
        let temp = TempDir::new().unwrap();
        for name in ["2016-04-22-first-post.md", "2016-08-01-So-how-can-you-return.md"] {
            std::fs::write(temp.path().join(name), "x").unwrap();
        }
        let entries = index::list(temp.path(), SortKey::Name, false).unwrap();
        (temp, entries)
    }

    #[test]
    fn test_table_shows_date_and_title() {
        let (_temp, entries) = entries();
        let table = render_notes(&entries, OutputFormat::Table, false).unwrap();

        assert!(table.contains("Date"));
        assert!(table.contains("Title"));
        assert!(table.contains("2016.04.22"));
        assert!(table.contains("first post"));
        assert!(table.contains("So how can you return"));
        assert!(table.find("first post") < table.find("So how"));
    }

    #[test]
    fn test_empty_table() {
        let table = render_notes(&[], OutputFormat::Table, false).unwrap();
        assert_eq!(table, "No notes found.\n");
    }

    #[test]
    fn test_json_records() {
        let (_temp, entries) = entries();
        let json = render_notes(&entries, OutputFormat::Json, false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        let records = value.as_array().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["date"], "2016.04.22");
        assert_eq!(records[0]["title"], "first post");
        assert_eq!(records[0]["filename"], "2016-04-22-first-post.md");
        assert!(records[0]["path"]
            .as_str()
            .unwrap()
            .ends_with("2016-04-22-first-post.md"));
    }

    #[test]
    fn test_yaml_records() {
        let (_temp, entries) = entries();
        let yaml = render_notes(&entries, OutputFormat::Yaml, false).unwrap();
        assert!(yaml.contains("title: first post"));
        assert!(yaml.contains("filename: 2016-08-01-So-how-can-you-return.md"));
    }
}
