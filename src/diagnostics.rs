use log::{error, warn};

use crate::document::{DiagnosticLevel, ParseDiagnostic};

/// Aggregate view of all occurrences of one parser-error code.
#[derive(Debug, Clone)]
pub struct DiagnosticSummary {
    pub code: String,
    pub level: DiagnosticLevel,
    pub count: usize,
    pub last_line: u64,
    pub last_column: u64,
    pub last_message: String,
}

/// Group diagnostics by error code, in first-seen order.
///
/// Each summary carries the occurrence count and the position/message of the
/// last occurrence of that code.
pub fn summarize(diagnostics: &[ParseDiagnostic]) -> Vec<DiagnosticSummary> {
    let mut summaries: Vec<DiagnosticSummary> = Vec::new();

    for diagnostic in diagnostics {
        match summaries.iter_mut().find(|s| s.code == diagnostic.code) {
            Some(summary) => {
                summary.count += 1;
                summary.level = diagnostic.level;
                summary.last_line = diagnostic.line;
                summary.last_column = diagnostic.column;
                summary.last_message = diagnostic.message.clone();
            }
            None => summaries.push(DiagnosticSummary {
                code: diagnostic.code.clone(),
                level: diagnostic.level,
                count: 1,
                last_line: diagnostic.line,
                last_column: diagnostic.column,
                last_message: diagnostic.message.clone(),
            }),
        }
    }

    summaries
}

/// Emit one log line per distinct parser-error code, tagged with the page URL.
pub fn report(url: &str, summaries: &[DiagnosticSummary]) {
    for summary in summaries {
        let line = format!(
            "markup {} {:?} occurred {} times while parsing {}. Last time in line {} and column {}: {}",
            summary.level.as_str(),
            summary.code,
            summary.count,
            url,
            summary.last_line,
            summary.last_column,
            summary.last_message,
        );

        match summary.level {
            DiagnosticLevel::Error | DiagnosticLevel::Fatal => error!("{}", line),
            DiagnosticLevel::Warning | DiagnosticLevel::Unknown => warn!("{}", line),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diagnostic(code: &str, line: u64, message: &str) -> ParseDiagnostic {
        ParseDiagnostic {
            code: code.to_string(),
            level: DiagnosticLevel::Warning,
            line,
            column: line * 2,
            message: message.to_string(),
        }
    }

    #[test]
    fn test_summarize_groups_by_code() {
        let diagnostics = vec![
            diagnostic("unexpected-token", 3, "first"),
            diagnostic("missing-doctype", 1, "doctype"),
            diagnostic("unexpected-token", 9, "last"),
        ];

        let summaries = summarize(&diagnostics);

        assert_eq!(summaries.len(), 2);
        // First-seen order is preserved
        assert_eq!(summaries[0].code, "unexpected-token");
        assert_eq!(summaries[0].count, 2);
        assert_eq!(summaries[0].last_line, 9);
        assert_eq!(summaries[0].last_column, 18);
        assert_eq!(summaries[0].last_message, "last");
        assert_eq!(summaries[1].code, "missing-doctype");
        assert_eq!(summaries[1].count, 1);
    }

    #[test]
    fn test_summarize_empty() {
        assert!(summarize(&[]).is_empty());
    }
}
