use qprint_core::{format, FormatError, TemplateError};

#[test]
fn test_unknown_modifier_diagnostic_renders_snippet() {
    colored::control::set_override(false);

    let template = "value: {X}\n";
    let err = format(template, &[&1]).unwrap_err();
    let rendered = err.to_diagnostic(template).format(template);

    assert!(rendered.contains("error[Q0005]"));
    assert!(rendered.contains("<template>:1:8"));
    assert!(rendered.contains("value: {X}"));
    assert!(rendered.contains("did you mean `{x}`?"));
    assert!(rendered.contains("value: {x}"));
}

#[test]
fn test_arity_diagnostic() {
    colored::control::set_override(false);

    let template = "{} and {}";
    let err = format(template, &[&1]).unwrap_err();
    assert!(matches!(err, FormatError::ArityMismatch { expected: 2, found: 1 }));

    let diag = err.to_diagnostic(template);
    assert_eq!(diag.code, "Q0001");
    assert_eq!(diag.span.column, 8);
    assert!(diag.to_string().contains("2 placeholder(s) but 1 argument(s)"));
}

#[test]
fn test_nested_placeholder_diagnostic() {
    let template = "a {{}}";
    let err = format(template, &[&1]).unwrap_err();
    assert!(matches!(
        err,
        FormatError::MalformedTemplate(TemplateError::NestedOpen { offset: 3 })
    ));

    let diag = err.to_diagnostic(template);
    assert_eq!(diag.code, "Q0002");
    assert_eq!(diag.span.column, 4);
    assert_eq!(diag.notes.len(), 2);
}
