// Template validation that runs in const contexts
//
// Everything a macro needs to reject a call at build time lives here as a
// `const fn`; the runtime entry points call the same functions first thing.

use crate::error::{FormatError, TemplateError};

/// How one placeholder's argument is turned into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    #[default]
    Default,
    Hex,
    Octal,
    Fixed,
    Scientific,
    BoolWord,
}

/// Every modifier the template syntax accepts, in display order.
pub const MODIFIERS: [&str; 5] = ["x", "o", "f", "e", "b"];

impl DisplayMode {
    /// Resolve the text between `{` and `}`.
    pub const fn from_modifier(token: &[u8]) -> Option<Self> {
        match token {
            [] => Some(DisplayMode::Default),
            [b'x'] => Some(DisplayMode::Hex),
            [b'o'] => Some(DisplayMode::Octal),
            [b'f'] => Some(DisplayMode::Fixed),
            [b'e'] => Some(DisplayMode::Scientific),
            [b'b'] => Some(DisplayMode::BoolWord),
            _ => None,
        }
    }

    pub const fn describe(&self) -> &'static str {
        match self {
            DisplayMode::Default => "default",
            DisplayMode::Hex => "hexadecimal",
            DisplayMode::Octal => "octal",
            DisplayMode::Fixed => "fixed-point",
            DisplayMode::Scientific => "scientific",
            DisplayMode::BoolWord => "boolean word",
        }
    }
}

/// Count placeholders, checking that delimiters pair up without nesting.
pub const fn count_placeholders(template: &str) -> Result<usize, TemplateError> {
    let bytes = template.as_bytes();
    let mut count = 0;
    let mut open: Option<usize> = None;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'{' => {
                if open.is_some() {
                    return Err(TemplateError::NestedOpen { offset: i });
                }
                open = Some(i);
                count += 1;
            }
            b'}' => {
                if open.is_none() {
                    return Err(TemplateError::StrayClose { offset: i });
                }
                open = None;
            }
            _ => {}
        }
        i += 1;
    }

    match open {
        Some(offset) => Err(TemplateError::UnclosedOpen { offset }),
        None => Ok(count),
    }
}

/// Check every placeholder's modifier. Assumes balanced delimiters.
pub const fn validate_modifiers(template: &str) -> Result<(), TemplateError> {
    let bytes = template.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'{' {
            let open = i;
            while i < bytes.len() && bytes[i] != b'}' {
                i += 1;
            }
            let (_, tail) = bytes.split_at(open + 1);
            let (token, _) = tail.split_at(i - open - 1);
            if DisplayMode::from_modifier(token).is_none() {
                return Err(TemplateError::UnknownModifier { offset: open });
            }
        }
        i += 1;
    }
    Ok(())
}

/// A template whose delimiters have been validated and placeholders counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Template<'a> {
    source: &'a str,
    placeholders: usize,
}

impl<'a> Template<'a> {
    /// Validate delimiters. Modifiers are left to substitution so that
    /// runtime templates keep streaming semantics.
    pub const fn parse(source: &'a str) -> Result<Self, TemplateError> {
        match count_placeholders(source) {
            Ok(placeholders) => Ok(Self {
                source,
                placeholders,
            }),
            Err(e) => Err(e),
        }
    }

    /// Validate delimiters and modifiers, failing const evaluation on error.
    ///
    /// Meant for `const` items, where the panic becomes a build error.
    #[allow(clippy::panic)]
    pub const fn checked(source: &'a str) -> Self {
        let template = match Self::parse(source) {
            Ok(template) => template,
            Err(TemplateError::NestedOpen { .. }) => {
                panic!("template opens a placeholder inside another placeholder")
            }
            Err(TemplateError::UnclosedOpen { .. }) => panic!("template has an unclosed `{{`"),
            Err(TemplateError::StrayClose { .. }) => {
                panic!("template has a `}}` that closes no placeholder")
            }
            Err(TemplateError::UnknownModifier { .. }) => panic!("unrecognized modifier"),
        };
        if validate_modifiers(source).is_err() {
            panic!("template has an unrecognized placeholder modifier (expected one of x, o, f, e, b)");
        }
        template
    }

    pub const fn placeholder_count(&self) -> usize {
        self.placeholders
    }

    pub const fn as_str(&self) -> &'a str {
        self.source
    }

    pub fn validate_arity(&self, found: usize) -> Result<(), FormatError> {
        if self.placeholders == found {
            Ok(())
        } else {
            Err(FormatError::ArityMismatch {
                expected: self.placeholders,
                found,
            })
        }
    }
}

/// Const-evaluated arity check used by the formatting macros.
#[allow(clippy::panic)]
pub const fn assert_arity(template: Template<'_>, found: usize) {
    if template.placeholders != found {
        panic!("number of arguments does not match number of placeholders");
    }
}

/// Runtime arity check against raw text.
pub fn validate_arity(template: &str, found: usize) -> Result<(), FormatError> {
    Template::parse(template)?.validate_arity(found)
}

/// Anything the entry points accept as a template.
pub trait IntoTemplate<'a> {
    fn into_template(self) -> Result<Template<'a>, FormatError>;
}

impl<'a> IntoTemplate<'a> for Template<'a> {
    fn into_template(self) -> Result<Template<'a>, FormatError> {
        Ok(self)
    }
}

impl<'a> IntoTemplate<'a> for &'a str {
    fn into_template(self) -> Result<Template<'a>, FormatError> {
        Ok(Template::parse(self)?)
    }
}

impl<'a> IntoTemplate<'a> for &'a String {
    fn into_template(self) -> Result<Template<'a>, FormatError> {
        Ok(Template::parse(self.as_str())?)
    }
}
