use std::fmt::Write as _;

use super::{format_local_time, meter_data_uri};
use crate::errors::AppError;
use crate::models::{meter_percentage, Digest};

const REPORT_TITLE: &str = "Carrot Console — Weekly Digest";

const REPORT_STYLE: &str = "body{font-family:Arial,Helvetica,sans-serif;background:#0b1020;color:#e6e9ef;padding:20px}\
table{width:100%;border-collapse:collapse} td,th{border:1px solid #2a2f52;padding:8px} th{background:#111935}\
.meter{display:block;margin:12px 0}";

/// Self-contained report page. Presentation only; it is never imported back.
pub fn export_html(digest: &Digest) -> Result<Vec<u8>, AppError> {
    let meter = meter_data_uri(meter_percentage(digest.totals.carrots))?;

    let mut rows = String::new();
    for clip in &digest.window_clips {
        // Writing into a String cannot fail.
        let _ = write!(
            rows,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{:.1} KB</td></tr>",
            escape_html(&format_local_time(clip.captured_at)),
            escape_html(&clip.tag),
            escape_html(clip.note.as_deref().unwrap_or("")),
            escape_html(clip.duration_label.as_deref().unwrap_or("")),
            clip.size_bytes as f64 / 1024.0,
        );
    }

    let settings = &digest.settings;
    let html = format!(
        r#"<!doctype html><html><head><meta charset="utf-8">
<style>{style}</style>
<title>{title}</title></head><body>
<h1>{title}</h1>
<p><b>Generated:</b> {generated}</p>
<p><b>Class:</b> {class_name} · <b>Teacher:</b> {teacher}</p>
<p><b>Students:</b> {students}</p>
<p><b>Carrots:</b> {carrots} · <b>Resets:</b> {resets} · <b>Clips:</b> {clips}</p>
<img class="meter" alt="Carrot meter at {percentage}%" src="{meter}">
<table><thead><tr><th>Time</th><th>Tag</th><th>Note</th><th>Duration</th><th>Size</th></tr></thead><tbody>{rows}</tbody></table>
</body></html>"#,
        style = REPORT_STYLE,
        title = REPORT_TITLE,
        generated = escape_html(&digest.generated_at.to_rfc3339()),
        class_name = escape_html(&settings.class_name),
        teacher = escape_html(&settings.teacher),
        students = escape_html(&settings.students.join(", ")),
        carrots = digest.totals.carrots,
        resets = digest.totals.resets,
        clips = digest.totals.clip_count,
        percentage = meter_percentage(digest.totals.carrots),
        meter = meter,
        rows = rows,
    );

    Ok(html.into_bytes())
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}
