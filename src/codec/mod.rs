//! Digest export renderers and the JSON importer.

mod csv;
mod html;
mod import;
mod json;
mod meter;

pub use csv::*;
pub use html::*;
pub use import::*;
pub use json::*;
pub use meter::*;

use chrono::{Local, TimeZone};

use crate::errors::AppError;
use crate::models::Digest;

/// Download file stem shared by every export.
pub const EXPORT_FILE_STEM: &str = "carrot_console_weekly";

/// Supported export artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
    Html,
}

impl ExportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Some(ExportFormat::Json),
            "csv" => Some(ExportFormat::Csv),
            "html" => Some(ExportFormat::Html),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Html => "html",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Csv => "text/csv; charset=utf-8",
            ExportFormat::Html => "text/html; charset=utf-8",
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.{}", EXPORT_FILE_STEM, self.extension())
    }

    /// Render `digest` in this format.
    pub fn render(&self, digest: &Digest) -> Result<Vec<u8>, AppError> {
        match self {
            ExportFormat::Json => export_json(digest),
            ExportFormat::Csv => Ok(export_csv(digest)),
            ExportFormat::Html => export_html(digest),
        }
    }
}

/// Host-local rendering of an epoch-millisecond timestamp. Informational only.
pub fn format_local_time(ms: i64) -> String {
    Local
        .timestamp_millis_opt(ms)
        .single()
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_format_parse() {
        assert_eq!(ExportFormat::from_str("JSON"), Some(ExportFormat::Json));
        assert_eq!(ExportFormat::from_str("csv"), Some(ExportFormat::Csv));
        assert_eq!(ExportFormat::from_str("html"), Some(ExportFormat::Html));
        assert_eq!(ExportFormat::from_str("pdf"), None);
    }

    #[test]
    fn test_file_name() {
        assert_eq!(
            ExportFormat::Html.file_name(),
            "carrot_console_weekly.html"
        );
    }

    #[test]
    fn test_format_local_time_shape() {
        let rendered = format_local_time(1_700_000_000_000);
        assert_eq!(rendered.len(), "2023-11-14 22:13:20".len());
    }
}
