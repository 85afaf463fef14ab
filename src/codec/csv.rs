use super::format_local_time;
use crate::models::{ClipRecord, Digest};

/// Fixed column order of the CSV export.
pub const CSV_HEADER: [&str; 6] = ["timestamp", "local_time", "tag", "note", "duration", "size_kb"];

/// One row per windowed clip. Text columns are always quoted.
pub fn export_csv(digest: &Digest) -> Vec<u8> {
    let mut out = CSV_HEADER.join(",");
    out.push_str("\r\n");

    for clip in &digest.window_clips {
        out.push_str(&csv_row(clip).join(","));
        out.push_str("\r\n");
    }

    out.into_bytes()
}

fn csv_row(clip: &ClipRecord) -> [String; 6] {
    [
        clip.captured_at.to_string(),
        quote_field(&format_local_time(clip.captured_at)),
        quote_field(&clip.tag),
        quote_field(clip.note.as_deref().unwrap_or("")),
        quote_field(clip.duration_label.as_deref().unwrap_or("")),
        format!("{:.1}", clip.size_bytes as f64 / 1024.0),
    ]
}

/// Wrap in double quotes, doubling any embedded quote.
pub fn quote_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}
