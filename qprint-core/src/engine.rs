// Placeholder substitution
//
// Walks the template left to right in a single loop, one placeholder per
// step, consuming one argument per placeholder. Output streams straight into the sink; text
// written before a failure stays written.

use std::io::Write;

use log::trace;
use qprint_lexer::TextSpan;

use crate::config::Config;
use crate::error::{FormatError, Result, TemplateError};
use crate::render::{render, Render, RenderContext};
use crate::template::DisplayMode;

/// Substitute `args` into `template`, writing the result to `sink`.
pub fn substitute<W: Write + ?Sized>(
    sink: &mut W,
    template: TextSpan<'_>,
    args: &[&dyn Render],
    config: &Config,
) -> Result<()> {
    let mut rest = template;
    let mut args = args;

    loop {
        let Some(open) = rest.find(b'{', 0) else {
            sink.write_all(rest.as_bytes())?;
            if !args.is_empty() {
                return Err(FormatError::ExtraArguments {
                    remaining: args.len(),
                });
            }
            return Ok(());
        };

        let offset = rest.start() + open;
        let close = rest
            .find(b'}', open + 1)
            .ok_or(TemplateError::UnclosedOpen { offset })?;
        if let Some(nested) = rest.find(b'{', open + 1).filter(|&n| n < close) {
            return Err(TemplateError::NestedOpen {
                offset: rest.start() + nested,
            }
            .into());
        }

        sink.write_all(rest.slice(0, open)?.as_bytes())?;
        let token = rest.slice(open + 1, close - open - 1)?;

        let Some((arg, remaining)) = args.split_first() else {
            return Err(FormatError::MissingArgument { offset });
        };

        let mode = DisplayMode::from_modifier(token.as_bytes()).ok_or_else(|| {
            FormatError::UnrecognizedModifier {
                modifier: token.to_owned_string(),
                offset,
            }
        })?;
        trace!("placeholder at {} rendered as {}", offset, mode.describe());

        render(sink, *arg, &RenderContext::new(config, mode))?;

        rest = rest.slice_from(close + 1)?;
        args = remaining;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(template: &str, args: &[&dyn Render]) -> (String, Result<()>) {
        let mut out = Vec::new();
        let result = substitute(&mut out, TextSpan::of(template), args, &Config::default());
        (String::from_utf8(out).unwrap(), result)
    }

    #[test]
    fn test_plain_text_is_copied() {
        let (out, result) = run("test a\n", &[]);
        assert!(result.is_ok());
        assert_eq!(out, "test a\n");

        let (out, result) = run("", &[]);
        assert!(result.is_ok());
        assert_eq!(out, "");
    }

    #[test]
    fn test_substitutes_in_order() {
        let (out, result) = run("ten: {}, twenty: {}\n", &[&10, &20]);
        assert!(result.is_ok());
        assert_eq!(out, "ten: 10, twenty: 20\n");
    }

    #[test]
    fn test_modifier_is_scoped_to_its_placeholder() {
        let (out, result) = run("{x}{}\n", &[&10, &10]);
        assert!(result.is_ok());
        assert_eq!(out, "0xa10\n");
    }

    #[test]
    fn test_adjacent_and_edge_placeholders() {
        let (out, result) = run("{}{}{}", &[&"a", &'b', &3]);
        assert!(result.is_ok());
        assert_eq!(out, "ab3");
    }

    #[test]
    fn test_unrecognized_modifier_streams_prefix() {
        let (out, result) = run("before {q} after", &[&1]);
        assert_eq!(out, "before ");
        match result {
            Err(FormatError::UnrecognizedModifier { modifier, offset }) => {
                assert_eq!(modifier, "q");
                assert_eq!(offset, 7);
            }
            other => panic!("Expected UnrecognizedModifier, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_and_extra_arguments() {
        let (out, result) = run("a {} b {}", &[&1]);
        assert_eq!(out, "a 1 b ");
        assert!(matches!(
            result,
            Err(FormatError::MissingArgument { offset: 7 })
        ));

        let (out, result) = run("a {}", &[&1, &2, &3]);
        assert_eq!(out, "a 1");
        assert!(matches!(
            result,
            Err(FormatError::ExtraArguments { remaining: 2 })
        ));
    }

    #[test]
    fn test_malformed_placeholders() {
        let (_, result) = run("x {", &[&1]);
        assert!(matches!(
            result,
            Err(FormatError::MalformedTemplate(TemplateError::UnclosedOpen {
                offset: 2
            }))
        ));

        let (out, result) = run("ok {} {{}", &[&1, &2]);
        assert_eq!(out, "ok 1");
        assert!(matches!(
            result,
            Err(FormatError::MalformedTemplate(TemplateError::NestedOpen {
                offset: 7
            }))
        ));
    }

    #[test]
    fn test_offsets_are_absolute() {
        let (_, result) = run("{} {} {zz}", &[&1, &2, &3]);
        assert!(matches!(
            result,
            Err(FormatError::UnrecognizedModifier { offset: 6, .. })
        ));
    }

    #[test]
    fn test_thousands_of_placeholders() {
        let count = 50_000;
        let template = "{}".repeat(count);
        let args: Vec<&dyn Render> = (0..count).map(|_| &7u8 as &dyn Render).collect();
        let (out, result) = run(&template, &args);
        assert!(result.is_ok());
        assert_eq!(out.len(), count);
        assert!(out.bytes().all(|b| b == b'7'));
    }
}
