use html_escape::decode_html_entities;
use scraper::Html;

use crate::error::ClipError;

/// Severity of a single markup-parsing defect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticLevel {
    Warning,
    Error,
    Fatal,
    Unknown,
}

impl DiagnosticLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticLevel::Warning => "warning",
            DiagnosticLevel::Error => "error",
            DiagnosticLevel::Fatal => "fatal error",
            DiagnosticLevel::Unknown => "unknown error",
        }
    }
}

/// One structural defect reported by the markup parser.
///
/// Structural defects never fail the pipeline; they are collected here and
/// summarized by the diagnostics aggregator. The html5ever tree builder
/// reports defects as positionless strings, in which case `line` and `column`
/// are 0.
#[derive(Debug, Clone)]
pub struct ParseDiagnostic {
    pub code: String,
    pub level: DiagnosticLevel,
    pub line: u64,
    pub column: u64,
    pub message: String,
}

/// Parse raw page HTML into a traversable document.
///
/// The whole input is entity-decoded before structural parsing; embedded
/// linked-data blocks are frequently entity-encoded by CMS plugins. Broken
/// tags and unclosed elements are tolerated and downgraded to diagnostics. An
/// empty or binary payload is the only hard failure.
pub fn parse_document(raw_html: &str) -> Result<(Html, Vec<ParseDiagnostic>), ClipError> {
    let decoded = decode_html_entities(raw_html);

    if decoded.trim().is_empty() || decoded.contains('\0') {
        return Err(ClipError::MalformedDocument);
    }

    let document = Html::parse_document(&decoded);

    let diagnostics = document
        .errors
        .iter()
        .map(|err| {
            let message = err.to_string();
            ParseDiagnostic {
                code: message.clone(),
                level: classify(&message),
                line: 0,
                column: 0,
                message,
            }
        })
        .collect();

    Ok((document, diagnostics))
}

/// html5ever does not grade its parse errors, so severity is derived from the
/// message: truncated input reads as an error, everything else as a warning.
fn classify(message: &str) -> DiagnosticLevel {
    if message.is_empty() {
        DiagnosticLevel::Unknown
    } else if message.to_ascii_lowercase().contains("eof") {
        DiagnosticLevel::Error
    } else {
        DiagnosticLevel::Warning
    }
}
