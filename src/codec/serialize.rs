use super::table::ConfigTable;

/// Render a table as ini text, grouped by section.
///
/// Entries with empty values are skipped. The first dot-separated segment of
/// a combined key is the section and the rest is the key, so keys may contain
/// dots. Empty segments are dropped. A key without a section ends the output:
/// it and every entry after it are not written.
pub fn serialize(table: &ConfigTable) -> String {
    let mut out = String::new();
    let mut current: Option<&str> = None;

    for (combined, value) in table {
        if value.is_empty() {
            continue;
        }

        let mut segments = combined.split('.').filter(|s| !s.is_empty());
        let (Some(section), Some(first)) = (segments.next(), segments.next()) else {
            tracing::debug!(key = %combined, "Key has no section, truncating output");
            break;
        };

        if current != Some(section) {
            if current.is_some() {
                out.push('\n');
            }
            out.push('[');
            out.push_str(section);
            out.push_str("]\n");
            current = Some(section);
        }

        out.push_str(first);
        for segment in segments {
            out.push('.');
            out.push_str(segment);
        }
        out.push('=');
        out.push_str(value);
        out.push('\n');
    }

    out
}
