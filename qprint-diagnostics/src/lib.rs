// Diagnostics for template errors
// rustc-style messages with the template snippet, carets, and suggestions

use colored::Colorize;
use serde::Serialize;
use std::fmt;

/// Location inside a template (line, column, length in characters)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Span {
    pub file: String,
    pub line: usize,
    pub column: usize,
    pub length: usize,
}

impl Span {
    pub fn new(file: String, line: usize, column: usize, length: usize) -> Self {
        Self {
            file,
            line,
            column,
            length,
        }
    }

    /// Convert a byte range of `source` into a line/column span.
    pub fn from_file_and_span(file: &str, source: &str, span: std::ops::Range<usize>) -> Self {
        let start = floor_boundary(source, span.start);
        let end = floor_boundary(source, span.end.max(start));
        let before = &source[..start];
        let line = before.chars().filter(|&c| c == '\n').count() + 1;
        let column = before
            .rfind('\n')
            .map_or(before.chars().count(), |pos| before[pos + 1..].chars().count())
            + 1;
        let length = source[start..end].chars().count().max(1);

        Self {
            file: file.to_string(),
            line,
            column,
            length,
        }
    }

    pub fn unknown() -> Self {
        Self {
            file: "<unknown>".to_string(),
            line: 0,
            column: 0,
            length: 0,
        }
    }
}

fn floor_boundary(source: &str, mut index: usize) -> usize {
    index = index.min(source.len());
    while !source.is_char_boundary(index) {
        index -= 1;
    }
    index
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorLevel {
    Error,
    Warning,
    Note,
    Help,
}

impl fmt::Display for ErrorLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ErrorLevel::Error => write!(f, "{}", "error".red().bold()),
            ErrorLevel::Warning => write!(f, "{}", "warning".yellow().bold()),
            ErrorLevel::Note => write!(f, "{}", "note".cyan().bold()),
            ErrorLevel::Help => write!(f, "{}", "help".green().bold()),
        }
    }
}

/// Structured diagnostic message
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub level: ErrorLevel,
    pub code: String,
    pub message: String,
    pub span: Span,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<Suggestion>,
}

/// Replacement text for the diagnostic's span
#[derive(Debug, Clone, Serialize)]
pub struct Suggestion {
    pub message: String,
    pub replacement: String,
    pub span: Span,
}

impl Diagnostic {
    pub fn new(level: ErrorLevel, code: &str, message: String, span: Span) -> Self {
        Self {
            level,
            code: code.to_string(),
            message,
            span,
            notes: Vec::new(),
            help: None,
            suggestion: None,
        }
    }

    pub fn error(code: &str, message: String, span: Span) -> Self {
        Self::new(ErrorLevel::Error, code, message, span)
    }

    pub fn warning(code: &str, message: String, span: Span) -> Self {
        Self::new(ErrorLevel::Warning, code, message, span)
    }

    pub fn with_note(mut self, note: String) -> Self {
        self.notes.push(note);
        self
    }

    pub fn with_help(mut self, help: String) -> Self {
        self.help = Some(help);
        self
    }

    pub fn with_suggestion(mut self, message: String, replacement: String, span: Span) -> Self {
        self.suggestion = Some(Suggestion {
            message,
            replacement,
            span,
        });
        self
    }

    /// Render with a snippet of the template the span points into
    pub fn format(&self, source: &str) -> String {
        let mut output = self.header();

        if let Some(snippet) = self.source_snippet(source) {
            output.push_str(&snippet);
        }

        output.push_str(&self.trailer());

        if let Some(suggestion) = &self.suggestion {
            output.push_str(&format!(
                " {} {}\n",
                "help:".green().bold(),
                suggestion.message
            ));
            if let Some(suggested) = self.suggestion_snippet(source) {
                output.push_str(&suggested);
            }
        }

        output
    }

    // error[Q0001]: message
    //  --> template:1:5
    fn header(&self) -> String {
        let mut output = String::new();
        if self.code.is_empty() {
            output.push_str(&format!("{}: {}\n", self.level, self.message.bold()));
        } else {
            output.push_str(&format!(
                "{}[{}]: {}\n",
                self.level,
                self.code,
                self.message.bold()
            ));
        }
        output.push_str(&format!(" {} {}\n", "-->".cyan().bold(), self.span));
        output
    }

    fn trailer(&self) -> String {
        let mut output = String::new();
        for note in &self.notes {
            output.push_str(&format!(" {} {}\n", "=".cyan().bold(), note.cyan()));
        }
        if let Some(help) = &self.help {
            output.push_str(&format!(" {} {}\n", "help:".green().bold(), help));
        }
        output
    }

    fn source_snippet(&self, source: &str) -> Option<String> {
        let line = source_line(source, self.span.line)?;
        let gutter = self.span.line.to_string().len().max(2);

        let mut snippet = String::new();
        snippet.push_str(&format!(" {}\n", " ".repeat(gutter + 1).cyan()));
        snippet.push_str(&format!(
            " {} {} {}\n",
            format!("{:>width$}", self.span.line, width = gutter)
                .cyan()
                .bold(),
            "|".cyan().bold(),
            line
        ));

        let padding = " ".repeat(self.span.column.saturating_sub(1));
        let underline = "^".repeat(self.span.length.max(1));
        snippet.push_str(&format!(
            " {} {} {}{}\n",
            " ".repeat(gutter).cyan(),
            "|".cyan().bold(),
            padding,
            underline.red().bold()
        ));

        Some(snippet)
    }

    fn suggestion_snippet(&self, source: &str) -> Option<String> {
        let suggestion = self.suggestion.as_ref()?;
        let line = source_line(source, suggestion.span.line)?;
        let gutter = suggestion.span.line.to_string().len().max(2);

        let chars: Vec<char> = line.chars().collect();
        let col = suggestion.span.column.checked_sub(1)?;
        let end = (col + suggestion.span.length).min(chars.len());
        let before: String = chars.get(..col)?.iter().collect();
        let after: String = chars.get(end..)?.iter().collect();
        let modified = format!("{}{}{}", before, suggestion.replacement, after);

        let mut snippet = String::new();
        snippet.push_str(&format!(
            " {} {} {}\n",
            format!("{:>width$}", suggestion.span.line, width = gutter)
                .cyan()
                .bold(),
            "|".cyan().bold(),
            modified
        ));
        let padding = " ".repeat(col);
        let indicator = "+".repeat(suggestion.replacement.chars().count().max(1));
        snippet.push_str(&format!(
            " {} {} {}{}\n",
            " ".repeat(gutter).cyan(),
            "|".cyan().bold(),
            padding,
            indicator.green().bold()
        ));

        Some(snippet)
    }
}

// Templates commonly end in `\n`, so line 1 of "a\n" must still be found.
fn source_line(source: &str, line: usize) -> Option<&str> {
    if line == 0 {
        return None;
    }
    source.split('\n').nth(line - 1)
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.header(), self.trailer())
    }
}

/// Diagnostic collection and reporting engine
#[derive(Debug, Default)]
pub struct DiagnosticEngine {
    diagnostics: Vec<Diagnostic>,
    error_count: usize,
    warning_count: usize,
}

#[derive(Serialize)]
struct Report<'a> {
    diagnostics: &'a [Diagnostic],
}

impl DiagnosticEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, diagnostic: Diagnostic) {
        match diagnostic.level {
            ErrorLevel::Error => self.error_count += 1,
            ErrorLevel::Warning => self.warning_count += 1,
            _ => {}
        }
        self.diagnostics.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn warning_count(&self) -> usize {
        self.warning_count
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Print all diagnostics to stderr
    pub fn print_all(&self, source: &str) {
        for diag in &self.diagnostics {
            eprintln!("{}", diag.format(source));
        }
    }

    pub fn print_summary(&self) {
        if self.error_count > 0 {
            eprintln!(
                "{}: {} error{} emitted",
                "error".red().bold(),
                self.error_count,
                if self.error_count == 1 { "" } else { "s" }
            );
        }

        if self.warning_count > 0 {
            eprintln!(
                "{}: {} warning{} emitted",
                "warning".yellow().bold(),
                self.warning_count,
                if self.warning_count == 1 { "" } else { "s" }
            );
        }
    }

    /// Export diagnostics as JSON for editors and scripts
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&Report {
            diagnostics: &self.diagnostics,
        })
    }

    pub fn clear(&mut self) {
        self.diagnostics.clear();
        self.error_count = 0;
        self.warning_count = 0;
    }
}

/// Stable codes for template errors
pub mod error_codes {
    pub const ARITY_MISMATCH: &str = "Q0001";
    pub const NESTED_PLACEHOLDER: &str = "Q0002";
    pub const UNCLOSED_PLACEHOLDER: &str = "Q0003";
    pub const STRAY_CLOSE: &str = "Q0004";
    pub const UNRECOGNIZED_MODIFIER: &str = "Q0005";
    pub const MISSING_ARGUMENT: &str = "Q0006";
    pub const EXTRA_ARGUMENTS: &str = "Q0007";
    pub const OUT_OF_RANGE: &str = "Q0008";
    pub const IO_ERROR: &str = "Q0009";
}

/// Fuzzy matching utilities for "did you mean?" suggestions
pub mod fuzzy {
    use strsim::jaro_winkler;

    /// Up to `max_suggestions` candidates with Jaro-Winkler similarity above `threshold`,
    /// best first
    pub fn find_similar_names(
        target: &str,
        candidates: &[&str],
        threshold: f64,
        max_suggestions: usize,
    ) -> Vec<String> {
        let mut scored: Vec<(&str, f64)> = candidates
            .iter()
            .map(|candidate| (*candidate, jaro_winkler(target, candidate)))
            .filter(|(_, score)| *score > threshold)
            .collect();

        scored.sort_by(|a, b| b.1.total_cmp(&a.1));

        scored
            .into_iter()
            .take(max_suggestions)
            .map(|(name, _)| name.to_string())
            .collect()
    }

    /// Closest candidate for a short token such as a modifier.
    ///
    /// Case-insensitive matches win; otherwise falls back to fuzzy matching.
    pub fn closest_token(target: &str, candidates: &[&str]) -> Option<String> {
        let lowered = target.to_lowercase();
        if let Some(exact) = candidates.iter().find(|c| **c == lowered) {
            return Some(exact.to_string());
        }
        let first = lowered.chars().next()?;
        if let Some(prefix) = candidates.iter().find(|c| c.starts_with(first)) {
            return Some(prefix.to_string());
        }
        find_similar_names(&lowered, candidates, 0.7, 1).into_iter().next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_from_byte_range() {
        let source = "line one\nten: {q}\n";
        let span = Span::from_file_and_span("<template>", source, 14..17);

        assert_eq!(span.line, 2);
        assert_eq!(span.column, 6);
        assert_eq!(span.length, 3);
        assert_eq!(span.to_string(), "<template>:2:6");
    }

    #[test]
    fn test_span_counts_characters() {
        let source = "größe {q}";
        let span = Span::from_file_and_span("<template>", source, 8..11);
        assert_eq!(span.column, 7);
        assert_eq!(span.length, 3);
    }

    #[test]
    fn test_diagnostic_format() {
        colored::control::set_override(false);
        let source = "value: {q}\n";

        let span = Span::new("<template>".to_string(), 1, 8, 3);
        let diag = Diagnostic::error(
            error_codes::UNRECOGNIZED_MODIFIER,
            "unrecognized modifier `q`".to_string(),
            span.clone(),
        )
        .with_note("valid modifiers are x, o, f, e, b".to_string())
        .with_suggestion("use hex".to_string(), "{x}".to_string(), span);

        let formatted = diag.format(source);

        assert!(formatted.contains("error[Q0005]"));
        assert!(formatted.contains("unrecognized modifier `q`"));
        assert!(formatted.contains("<template>:1:8"));
        assert!(formatted.contains(&format!("|{}^^^", " ".repeat(8))));
        assert!(formatted.contains("value: {x}"));
    }

    #[test]
    fn test_engine_counts_and_json() {
        let mut engine = DiagnosticEngine::new();
        engine.emit(Diagnostic::error(
            error_codes::ARITY_MISMATCH,
            "expected 2 arguments".to_string(),
            Span::new("<template>".to_string(), 1, 1, 2),
        ));
        engine.emit(Diagnostic::warning(
            error_codes::EXTRA_ARGUMENTS,
            "unused".to_string(),
            Span::unknown(),
        ));

        assert!(engine.has_errors());
        assert_eq!(engine.error_count(), 1);
        assert_eq!(engine.warning_count(), 1);

        let json: serde_json::Value = serde_json::from_str(&engine.to_json().unwrap()).unwrap();
        assert_eq!(json["diagnostics"][0]["level"], "error");
        assert_eq!(json["diagnostics"][0]["code"], "Q0001");
        assert!(json["diagnostics"][0].get("help").is_none());

        engine.clear();
        assert!(!engine.has_errors());
        assert!(engine.diagnostics().is_empty());
    }

    #[test]
    fn test_closest_token() {
        let modifiers = ["x", "o", "f", "e", "b"];
        assert_eq!(fuzzy::closest_token("X", &modifiers), Some("x".to_string()));
        assert_eq!(fuzzy::closest_token("hex", &modifiers), None);
        assert_eq!(fuzzy::closest_token("bool", &modifiers), Some("b".to_string()));
        assert_eq!(fuzzy::closest_token("q", &modifiers), None);
    }

    #[test]
    fn test_find_similar_names() {
        let names = ["hex", "octal", "fixed", "scientific", "boolean"];
        let similar = fuzzy::find_similar_names("hexa", &names, 0.7, 2);
        assert_eq!(similar.first().map(String::as_str), Some("hex"));
    }
}
