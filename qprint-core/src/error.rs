use qprint_lexer::{LexError, OutOfRange};
use thiserror::Error;

/// Structural problems found while scanning a template.
///
/// Every offset is the byte position of the offending delimiter.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateError {
    #[error("`{{` at offset {offset} opens a placeholder inside another placeholder")]
    NestedOpen { offset: usize },
    #[error("placeholder opened at offset {offset} is never closed")]
    UnclosedOpen { offset: usize },
    #[error("`}}` at offset {offset} does not close a placeholder")]
    StrayClose { offset: usize },
    #[error("placeholder at offset {offset} has an unrecognized modifier")]
    UnknownModifier { offset: usize },
}

impl From<LexError> for TemplateError {
    fn from(e: LexError) -> Self {
        match e {
            LexError::NestedOpen { offset } => TemplateError::NestedOpen { offset },
            LexError::UnclosedOpen { offset } => TemplateError::UnclosedOpen { offset },
            LexError::StrayClose { offset } => TemplateError::StrayClose { offset },
        }
    }
}

impl TemplateError {
    pub fn offset(&self) -> usize {
        match *self {
            TemplateError::NestedOpen { offset }
            | TemplateError::UnclosedOpen { offset }
            | TemplateError::StrayClose { offset }
            | TemplateError::UnknownModifier { offset } => offset,
        }
    }
}

#[derive(Error, Debug)]
pub enum FormatError {
    #[error("template has {expected} placeholder(s) but {found} argument(s) were supplied")]
    ArityMismatch { expected: usize, found: usize },

    #[error("malformed template: {0}")]
    MalformedTemplate(#[from] TemplateError),

    #[error("unrecognized modifier `{modifier}` in placeholder at offset {offset}")]
    UnrecognizedModifier { modifier: String, offset: usize },

    #[error("no argument left for the placeholder at offset {offset}")]
    MissingArgument { offset: usize },

    #[error("{remaining} argument(s) left over after the last placeholder")]
    ExtraArguments { remaining: usize },

    #[error(transparent)]
    OutOfRange(#[from] OutOfRange),

    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FormatError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::count_placeholders;

    #[test]
    fn test_lexer_and_validator_agree() {
        for template in ["a{{}}", "{x", "a}", "{} {", "ok {} }{"] {
            let from_lexer = qprint_lexer::pieces(template)
                .find_map(|piece| piece.err())
                .map(TemplateError::from);
            let from_validator = count_placeholders(template).err();

            assert_eq!(from_lexer, from_validator, "{:?}", template);
            let (lexed, validated) = (from_lexer.unwrap(), from_validator.unwrap());
            assert_eq!(lexed.to_string(), validated.to_string());
        }
    }
}
