use std::fmt;

use super::table::ConfigTable;

/// Kind of anomaly found while parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// `[` without a closing `]`.
    UnmatchedBracket,
    /// Key line without `=`.
    MissingEquals,
    /// Key line starting with `=`.
    EmptyKey,
    /// Section header for a section that already has keys.
    DuplicateSection(String),
    /// Combined key defined twice; the later value wins.
    DuplicateKey(String),
}

/// A parse anomaly and the 1-based line it occurred on.
///
/// Diagnostics never stop parsing. Lines that produce one are skipped,
/// except for duplicates, which are informational.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub line: usize,
    pub kind: DiagnosticKind,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            DiagnosticKind::UnmatchedBracket => write!(f, "line {}: unmatched '['", self.line),
            DiagnosticKind::MissingEquals => write!(f, "line {}: unmatched '='", self.line),
            DiagnosticKind::EmptyKey => write!(f, "line {}: empty key", self.line),
            DiagnosticKind::DuplicateSection(name) => {
                write!(f, "line {}: duplicated section name '{}'", self.line, name)
            }
            DiagnosticKind::DuplicateKey(key) => {
                write!(f, "line {}: duplicated key name '{}'", self.line, key)
            }
        }
    }
}

/// Parse ini text, logging every anomaly.
pub fn parse(text: &str) -> ConfigTable {
    let (table, diagnostics) = parse_with_diagnostics(text);
    for diagnostic in &diagnostics {
        match diagnostic.kind {
            DiagnosticKind::DuplicateSection(_) => {
                tracing::info!(line = diagnostic.line, "{}", diagnostic)
            }
            _ => tracing::warn!(line = diagnostic.line, "{}", diagnostic),
        }
    }
    table
}

/// Parse ini text and return the anomalies alongside the table.
///
/// Lines before the first section header are ignored, as are full-line
/// comments starting with `;` or `#`. There are no inline comments.
pub fn parse_with_diagnostics(text: &str) -> (ConfigTable, Vec<Diagnostic>) {
    let mut table = ConfigTable::new();
    let mut diagnostics = Vec::new();
    let mut section = String::new();

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with([';', '#']) {
            continue;
        }

        if let Some(rest) = line.strip_prefix('[') {
            let Some(end) = rest.find(']') else {
                diagnostics.push(Diagnostic {
                    line: line_no,
                    kind: DiagnosticKind::UnmatchedBracket,
                });
                continue;
            };
            section = rest[..end].trim().to_string();
            if !section.is_empty() && table.has_section(&section) {
                diagnostics.push(Diagnostic {
                    line: line_no,
                    kind: DiagnosticKind::DuplicateSection(section.clone()),
                });
            }
            continue;
        }

        if section.is_empty() {
            continue;
        }

        let kind = match line.find('=') {
            None => DiagnosticKind::MissingEquals,
            Some(0) => DiagnosticKind::EmptyKey,
            Some(eq) => {
                let key = line[..eq].trim();
                let value = line[eq + 1..].trim();
                let combined = format!("{}.{}", section, key);
                if table.insert(combined.clone(), value).is_none() {
                    continue;
                }
                DiagnosticKind::DuplicateKey(combined)
            }
        };
        diagnostics.push(Diagnostic {
            line: line_no,
            kind,
        });
    }

    (table, diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sections_and_keys() {
        let table = parse("[int]\nkey1=1\n[string]\nkey1=value11\n");
        assert_eq!(table.get("int.key1"), Some("1"));
        assert_eq!(table.get("string.key1"), Some("value11"));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn trims_keys_values_and_headers() {
        let table = parse("  [ net ]  \n\t host =  example.com  \n");
        assert_eq!(table.get("net.host"), Some("example.com"));
    }

    #[test]
    fn last_line_without_newline_is_read() {
        let table = parse("[a]\nx=1\ny=2");
        assert_eq!(table.get("a.y"), Some("2"));
    }

    #[test]
    fn handles_crlf_line_endings() {
        let table = parse("[a]\r\nx=1\r\n");
        assert_eq!(table.get("a.x"), Some("1"));
    }

    #[test]
    fn skips_full_line_comments_only() {
        let table = parse("[a]\n; comment\n  # another\nurl=http://x/#frag ; not a comment\n");
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("a.url"), Some("http://x/#frag ; not a comment"));
    }

    #[test]
    fn ignores_keys_before_first_section() {
        let table = parse("orphan=1\n[a]\nx=2\n");
        assert_eq!(table.len(), 1);
        assert!(!table.contains_key(".orphan"));
        assert!(!table.contains_key("orphan"));
    }

    #[test]
    fn empty_header_closes_section() {
        let table = parse("[a]\nx=1\n[]\ny=2\n");
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("a.x"), Some("1"));
    }

    #[test]
    fn splits_at_first_equals() {
        let table = parse("[a]\nexpr = x=y\n");
        assert_eq!(table.get("a.expr"), Some("x=y"));
    }

    #[test]
    fn keeps_empty_values_in_memory() {
        let table = parse("[a]\nempty=\n");
        assert_eq!(table.get("a.empty"), Some(""));
    }

    #[test]
    fn unmatched_bracket_keeps_current_section() {
        let (table, diags) = parse_with_diagnostics("[a]\n[broken\nx=1\n");
        assert_eq!(table.get("a.x"), Some("1"));
        assert_eq!(
            diags,
            vec![Diagnostic {
                line: 2,
                kind: DiagnosticKind::UnmatchedBracket
            }]
        );
    }

    #[test]
    fn reports_malformed_key_lines() {
        let (table, diags) = parse_with_diagnostics("[a]\nnovalue\n=orphan\nok=1\n");
        assert_eq!(table.len(), 1);
        let kinds: Vec<_> = diags.into_iter().map(|d| (d.line, d.kind)).collect();
        assert_eq!(
            kinds,
            vec![
                (2, DiagnosticKind::MissingEquals),
                (3, DiagnosticKind::EmptyKey)
            ]
        );
    }

    #[test]
    fn duplicate_key_overwrites() {
        let (table, diags) = parse_with_diagnostics("[a]\nx=1\nx=2\n");
        assert_eq!(table.get("a.x"), Some("2"));
        assert_eq!(
            diags[0].kind,
            DiagnosticKind::DuplicateKey("a.x".to_string())
        );
    }

    #[test]
    fn duplicate_section_is_informational() {
        let (table, diags) = parse_with_diagnostics("[a]\nx=1\n[b]\ny=1\n[a]\nz=1\n");
        assert_eq!(table.len(), 3);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].line, 5);
        assert_eq!(diags[0].kind, DiagnosticKind::DuplicateSection("a".into()));
    }

    #[test]
    fn diagnostic_display() {
        let diag = Diagnostic {
            line: 7,
            kind: DiagnosticKind::DuplicateKey("a.x".into()),
        };
        assert_eq!(diag.to_string(), "line 7: duplicated key name 'a.x'");
    }
}
