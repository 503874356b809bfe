//! Plain-text renderings of the history for clipboard and speech output.

use crate::engine::format_addition;
use crate::model::CalculationRecord;

/// Output format for [`export`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// One paragraph per record, for the clipboard.
    Text,
    /// One sentence per record, for speech synthesis.
    Speech,
    /// Pretty-printed JSON array of the records.
    Json,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(ExportFormat::Text),
            "speech" => Ok(ExportFormat::Speech),
            "json" => Ok(ExportFormat::Json),
            other => Err(format!("unknown export format: {other}")),
        }
    }
}

/// Paragraphs separated by a blank line, in history order.
pub fn export_text(records: &[CalculationRecord]) -> String {
    records
        .iter()
        .map(|r| {
            format!(
                "Name: {}\nDate: {} at {}\nResult: {}\n",
                r.name,
                r.date,
                r.time,
                format_addition(r.result)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// A single line suited for a speech synthesizer.
pub fn speech_text(records: &[CalculationRecord]) -> String {
    records
        .iter()
        .map(|r| {
            format!(
                "Name: {}, Date: {} at {}, Result: {}",
                r.name,
                r.date,
                r.time,
                format_addition(r.result)
            )
        })
        .collect::<Vec<_>>()
        .join(". ")
}

pub fn export_json(records: &[CalculationRecord]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(records)
}

pub fn export(
    records: &[CalculationRecord],
    format: ExportFormat,
) -> Result<String, serde_json::Error> {
    match format {
        ExportFormat::Text => Ok(export_text(records)),
        ExportFormat::Speech => Ok(speech_text(records)),
        ExportFormat::Json => export_json(records),
    }
}
