// qprint-core - placeholder formatting
// Templates use `{}` for default rendering and `{x}` `{o}` `{f}` `{e}` `{b}`
// for hex, octal, fixed, scientific and boolean words.
//
//! ```
//! use qprint_core::qformat;
//!
//! assert_eq!(qformat!("ten: {}\n", 10).unwrap(), "ten: 10\n");
//! assert_eq!(qformat!("{x}{}\n", 10, 10).unwrap(), "0xa10\n");
//! assert_eq!(qformat!("{}\n", vec![1, 2, 3, 4]).unwrap(), "{1, 2, 3, 4}\n");
//! ```
//!
//! A literal template whose placeholder count does not match its arguments
//! does not build:
//!
//! ```compile_fail
//! let _ = qprint_core::qformat!("{} {}", 1);
//! ```

pub mod config;
pub mod diagnostic;
pub mod engine;
pub mod error;
pub mod render;
pub mod template;

pub use config::{BoolStyle, Config};
pub use error::{FormatError, Result, TemplateError};
pub use qprint_lexer::TextSpan;
pub use render::{render, Render, RenderContext, Scalar, Shape, Text};
pub use template::{
    count_placeholders, validate_arity, validate_modifiers, DisplayMode, IntoTemplate, Template,
};

use std::io::{self, Write};

/// Substitute `args` into `template` and return the text.
pub fn format<'a>(template: impl IntoTemplate<'a>, args: &[&dyn Render]) -> Result<String> {
    format_with(&Config::default(), template, args)
}

pub fn format_with<'a>(
    config: &Config,
    template: impl IntoTemplate<'a>,
    args: &[&dyn Render],
) -> Result<String> {
    let mut out = Vec::new();
    write_to_with(config, &mut out, template, args)?;
    String::from_utf8(out).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e).into())
}

/// Stream the substitution into `sink`.
///
/// Arity is checked before anything is written. Later failures leave
/// whatever was already written in the sink.
pub fn write_to<'a, W: Write + ?Sized>(
    sink: &mut W,
    template: impl IntoTemplate<'a>,
    args: &[&dyn Render],
) -> Result<()> {
    write_to_with(&Config::default(), sink, template, args)
}

pub fn write_to_with<'a, W: Write + ?Sized>(
    config: &Config,
    sink: &mut W,
    template: impl IntoTemplate<'a>,
    args: &[&dyn Render],
) -> Result<()> {
    let template = template.into_template()?;
    template
        .validate_arity(args.len())
        .and_then(|()| engine::substitute(sink, TextSpan::of(template.as_str()), args, config))
        .map_err(|e| {
            log::debug!("formatting {:?} failed: {}", template.as_str(), e);
            e
        })
}

/// Write to standard output.
pub fn print<'a>(template: impl IntoTemplate<'a>, args: &[&dyn Render]) -> Result<()> {
    print_with(&Config::default(), template, args)
}

pub fn print_with<'a>(
    config: &Config,
    template: impl IntoTemplate<'a>,
    args: &[&dyn Render],
) -> Result<()> {
    let mut out = io::stdout().lock();
    write_to_with(config, &mut out, template, args)?;
    out.flush()?;
    Ok(())
}

/// Write to standard error.
pub fn print_error<'a>(template: impl IntoTemplate<'a>, args: &[&dyn Render]) -> Result<()> {
    print_error_with(&Config::default(), template, args)
}

pub fn print_error_with<'a>(
    config: &Config,
    template: impl IntoTemplate<'a>,
    args: &[&dyn Render],
) -> Result<()> {
    let mut err = io::stderr().lock();
    write_to_with(config, &mut err, template, args)?;
    err.flush()?;
    Ok(())
}

/// Like [`write_to_with`], followed by a newline once substitution succeeds.
pub fn write_line_with<'a, W: Write + ?Sized>(
    config: &Config,
    sink: &mut W,
    template: impl IntoTemplate<'a>,
    args: &[&dyn Render],
) -> Result<()> {
    write_to_with(config, sink, template, args)?;
    sink.write_all(b"\n")?;
    Ok(())
}

/// Standard output followed by a newline.
pub fn print_line<'a>(template: impl IntoTemplate<'a>, args: &[&dyn Render]) -> Result<()> {
    print_line_with(&Config::default(), template, args)
}

pub fn print_line_with<'a>(
    config: &Config,
    template: impl IntoTemplate<'a>,
    args: &[&dyn Render],
) -> Result<()> {
    let mut out = io::stdout().lock();
    write_line_with(config, &mut out, template, args)?;
    out.flush()?;
    Ok(())
}

/// Standard error followed by a newline.
pub fn print_error_line<'a>(template: impl IntoTemplate<'a>, args: &[&dyn Render]) -> Result<()> {
    print_error_line_with(&Config::default(), template, args)
}

pub fn print_error_line_with<'a>(
    config: &Config,
    template: impl IntoTemplate<'a>,
    args: &[&dyn Render],
) -> Result<()> {
    let mut err = io::stderr().lock();
    write_line_with(config, &mut err, template, args)?;
    err.flush()?;
    Ok(())
}

#[doc(hidden)]
#[macro_export]
macro_rules! __count_args {
    () => { 0usize };
    ($head:expr $(, $tail:expr)*) => { 1usize + $crate::__count_args!($($tail),*) };
}

// Validates a literal template at build time and yields the const `Template`.
#[doc(hidden)]
#[macro_export]
macro_rules! __checked_template {
    ($template:literal $(, $arg:expr)*) => {{
        const TEMPLATE: $crate::Template<'static> = $crate::Template::checked($template);
        const _: () = $crate::template::assert_arity(TEMPLATE, $crate::__count_args!($($arg),*));
        TEMPLATE
    }};
}

/// Format into a `String`; literal templates are checked at build time.
#[macro_export]
macro_rules! qformat {
    ($template:literal $(, $arg:expr)* $(,)?) => {
        $crate::format(
            $crate::__checked_template!($template $(, $arg)*),
            &[$(&$arg as &dyn $crate::Render),*],
        )
    };
    ($template:expr $(, $arg:expr)* $(,)?) => {
        $crate::format($template, &[$(&$arg as &dyn $crate::Render),*])
    };
}

/// Stream into any `std::io::Write` sink.
#[macro_export]
macro_rules! qwrite {
    ($sink:expr, $template:literal $(, $arg:expr)* $(,)?) => {
        $crate::write_to(
            $sink,
            $crate::__checked_template!($template $(, $arg)*),
            &[$(&$arg as &dyn $crate::Render),*],
        )
    };
    ($sink:expr, $template:expr $(, $arg:expr)* $(,)?) => {
        $crate::write_to($sink, $template, &[$(&$arg as &dyn $crate::Render),*])
    };
}

#[macro_export]
macro_rules! qprint {
    ($template:literal $(, $arg:expr)* $(,)?) => {
        $crate::print(
            $crate::__checked_template!($template $(, $arg)*),
            &[$(&$arg as &dyn $crate::Render),*],
        )
    };
    ($template:expr $(, $arg:expr)* $(,)?) => {
        $crate::print($template, &[$(&$arg as &dyn $crate::Render),*])
    };
}

#[macro_export]
macro_rules! qprintln {
    ($template:literal $(, $arg:expr)* $(,)?) => {
        $crate::print_line(
            $crate::__checked_template!($template $(, $arg)*),
            &[$(&$arg as &dyn $crate::Render),*],
        )
    };
    ($template:expr $(, $arg:expr)* $(,)?) => {
        $crate::print_line($template, &[$(&$arg as &dyn $crate::Render),*])
    };
}

#[macro_export]
macro_rules! qerr {
    ($template:literal $(, $arg:expr)* $(,)?) => {
        $crate::print_error(
            $crate::__checked_template!($template $(, $arg)*),
            &[$(&$arg as &dyn $crate::Render),*],
        )
    };
    ($template:expr $(, $arg:expr)* $(,)?) => {
        $crate::print_error($template, &[$(&$arg as &dyn $crate::Render),*])
    };
}

#[macro_export]
macro_rules! qerrln {
    ($template:literal $(, $arg:expr)* $(,)?) => {
        $crate::print_error_line(
            $crate::__checked_template!($template $(, $arg)*),
            &[$(&$arg as &dyn $crate::Render),*],
        )
    };
    ($template:expr $(, $arg:expr)* $(,)?) => {
        $crate::print_error_line($template, &[$(&$arg as &dyn $crate::Render),*])
    };
}
