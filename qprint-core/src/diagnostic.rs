// Conversion of formatting failures into user-facing diagnostics

use qprint_diagnostics::{error_codes, fuzzy, Diagnostic, Span};
use qprint_lexer::{pieces, Piece};

use crate::error::{FormatError, TemplateError};
use crate::template::MODIFIERS;

/// File label used for spans into an inline template
pub const TEMPLATE_LABEL: &str = "<template>";

impl TemplateError {
    pub fn code(&self) -> &'static str {
        match self {
            TemplateError::NestedOpen { .. } => error_codes::NESTED_PLACEHOLDER,
            TemplateError::UnclosedOpen { .. } => error_codes::UNCLOSED_PLACEHOLDER,
            TemplateError::StrayClose { .. } => error_codes::STRAY_CLOSE,
            TemplateError::UnknownModifier { .. } => error_codes::UNRECOGNIZED_MODIFIER,
        }
    }
}

impl FormatError {
    pub fn code(&self) -> &'static str {
        match self {
            FormatError::ArityMismatch { .. } => error_codes::ARITY_MISMATCH,
            FormatError::MalformedTemplate(e) => e.code(),
            FormatError::UnrecognizedModifier { .. } => error_codes::UNRECOGNIZED_MODIFIER,
            FormatError::MissingArgument { .. } => error_codes::MISSING_ARGUMENT,
            FormatError::ExtraArguments { .. } => error_codes::EXTRA_ARGUMENTS,
            FormatError::OutOfRange(_) => error_codes::OUT_OF_RANGE,
            FormatError::Io(_) => error_codes::IO_ERROR,
        }
    }

    /// Byte range of `template` the failure points at, if any.
    pub fn byte_range(&self, template: &str) -> Option<std::ops::Range<usize>> {
        match self {
            FormatError::ArityMismatch { found, .. } => {
                // The first placeholder without an argument, or the whole
                // template when arguments are left over.
                let placeholder = placeholder_ranges(template).nth(*found);
                Some(placeholder.unwrap_or(0..template.len()))
            }
            FormatError::MalformedTemplate(TemplateError::UnclosedOpen { offset }) => {
                Some(*offset..template.len())
            }
            FormatError::MalformedTemplate(TemplateError::UnknownModifier { offset })
            | FormatError::UnrecognizedModifier { offset, .. }
            | FormatError::MissingArgument { offset } => Some(placeholder_at(template, *offset)),
            FormatError::MalformedTemplate(e) => Some(e.offset()..e.offset() + 1),
            FormatError::ExtraArguments { .. } => Some(template.len()..template.len()),
            FormatError::OutOfRange(_) | FormatError::Io(_) => None,
        }
    }

    pub fn to_diagnostic(&self, template: &str) -> Diagnostic {
        let span = match self.byte_range(template) {
            Some(range) => Span::from_file_and_span(TEMPLATE_LABEL, template, range),
            None => Span::unknown(),
        };
        let diag = Diagnostic::error(self.code(), self.to_string(), span.clone());

        match self {
            FormatError::ArityMismatch { expected, found } if expected > found => diag
                .with_help(format!(
                    "add {} argument(s) or remove the extra placeholder(s)",
                    expected - found
                )),
            FormatError::ArityMismatch { .. } => {
                diag.with_help("every argument needs a `{}` placeholder".to_string())
            }
            FormatError::MalformedTemplate(TemplateError::NestedOpen { .. }) => diag
                .with_note("placeholders cannot nest".to_string())
                .with_note("literal braces cannot be escaped in templates".to_string()),
            FormatError::MalformedTemplate(TemplateError::UnclosedOpen { .. }) => {
                diag.with_help("close the placeholder with `}`".to_string())
            }
            FormatError::MalformedTemplate(TemplateError::StrayClose { .. }) => {
                diag.with_note("literal braces cannot be escaped in templates".to_string())
            }
            FormatError::MalformedTemplate(TemplateError::UnknownModifier { offset }) => {
                let modifier = modifier_at(template, *offset);
                with_modifier_help(diag, modifier, span)
            }
            FormatError::UnrecognizedModifier { modifier, .. } => {
                with_modifier_help(diag, modifier, span)
            }
            _ => diag,
        }
    }
}

fn with_modifier_help(diag: Diagnostic, modifier: &str, span: Span) -> Diagnostic {
    let diag = diag.with_note(format!(
        "valid modifiers are {}",
        MODIFIERS
            .iter()
            .map(|m| format!("`{}`", m))
            .collect::<Vec<_>>()
            .join(", ")
    ));
    match fuzzy::closest_token(modifier, &MODIFIERS) {
        Some(suggested) => diag.with_suggestion(
            format!("did you mean `{{{}}}`?", suggested),
            format!("{{{}}}", suggested),
            span,
        ),
        None => diag,
    }
}

fn placeholder_ranges(template: &str) -> impl Iterator<Item = std::ops::Range<usize>> + '_ {
    pieces(template)
        .map_while(|piece| piece.ok())
        .filter_map(|piece| match piece {
            Piece::Placeholder(p) => Some(p.range()),
            Piece::Literal(_) => None,
        })
}

// `{...}` starting at `offset`, up to the next `}` or the end of the template.
fn placeholder_at(template: &str, offset: usize) -> std::ops::Range<usize> {
    let end = template
        .get(offset..)
        .and_then(|rest| rest.find('}'))
        .map_or(template.len(), |close| offset + close + 1);
    offset..end
}

fn modifier_at(template: &str, offset: usize) -> &str {
    let range = placeholder_at(template, offset);
    template
        .get(range.start + 1..range.end.saturating_sub(1))
        .unwrap_or("")
}
