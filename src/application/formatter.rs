//! Output formatting for extracted channel ids.
//!
//! Supports multiple output formats: plain list, JSON, and table view.

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Table};

use crate::domain::{ChannelIdList, ExtractionReport};

/// Output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// One channel id per line.
    #[default]
    List,
    /// JSON array for programmatic use.
    Json,
    /// Numbered table listing.
    Table,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "list" | "text" | "txt" => Ok(Self::List),
            "json" => Ok(Self::Json),
            "table" => Ok(Self::Table),
            _ => Err(format!("Unknown format: {s}. Use: list, json, table")),
        }
    }
}

/// Formats channel ids in the requested format.
///
/// # Errors
/// Returns error if JSON serialization fails.
pub fn format_channel_ids(
    ids: &ChannelIdList,
    format: OutputFormat,
) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::List => Ok(ids.iter().collect::<Vec<_>>().join("\n")),
        OutputFormat::Json => serde_json::to_string_pretty(ids),
        OutputFormat::Table => Ok(format_ids_table(ids)),
    }
}

fn format_ids_table(ids: &ChannelIdList) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["#", "Channel ID"]);

    for (i, id) in ids.iter().enumerate() {
        table.add_row(vec![(i + 1).to_string(), id.to_string()]);
    }

    table.to_string()
}

/// Formats extraction statistics for display.
pub fn format_summary(report: &ExtractionReport) -> String {
    let skipped = report.skipped();
    let skipped = if skipped > 0 {
        skipped.to_string().yellow()
    } else {
        skipped.to_string().green()
    };

    format!(
        "{}\n  Records: {}\n  Channel IDs: {}\n  Duplicates dropped: {}\n  Skipped (no channel id): {}",
        "📊 Summary".bold(),
        report.total_records.to_string().cyan(),
        report.channel_ids.len().to_string().green(),
        report.duplicates().to_string().blue(),
        skipped
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids() -> ChannelIdList {
        ["UC1", "UC2"].into_iter().collect()
    }

    /// Drop `ESC [ ... m` color sequences.
    fn strip_ansi(text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut chars = text.chars();
        while let Some(c) = chars.next() {
            if c == '\u{1b}' {
                for next in chars.by_ref() {
                    if next == 'm' {
                        break;
                    }
                }
            } else {
                out.push(c);
            }
        }
        out
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("list".parse::<OutputFormat>(), Ok(OutputFormat::List));
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!("table".parse::<OutputFormat>(), Ok(OutputFormat::Table));
        assert!("markdown".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_list_format() {
        assert_eq!(format_channel_ids(&ids(), OutputFormat::List).unwrap(), "UC1\nUC2");
    }

    #[test]
    fn test_json_format() {
        let out = format_channel_ids(&ids(), OutputFormat::Json).unwrap();
        let parsed: Vec<String> = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed, ["UC1", "UC2"]);
    }

    #[test]
    fn test_table_contains_ids() {
        let out = format_channel_ids(&ids(), OutputFormat::Table).unwrap();
        assert!(out.contains("Channel ID"));
        assert!(out.contains("UC2"));
    }

    #[test]
    fn test_summary_counts() {
        let report = ExtractionReport {
            channel_ids: ids(),
            warnings: vec![],
            total_records: 3,
        };
        let out = strip_ansi(&format_summary(&report));
        assert!(out.contains("Records: 3"));
        assert!(out.contains("Duplicates dropped: 1"));
        assert!(out.contains("Skipped (no channel id): 0"));
    }
}
