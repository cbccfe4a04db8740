use logos::Logos;

pub mod span;
pub use span::{OutOfRange, TextSpan};

/// Token types of the template language: delimiters and the text between them
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    #[token("{")]
    Open,
    #[token("}")]
    Close,
    #[regex(r"[^{}]+")]
    Text,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TokenSpan {
    pub token: Token,
    pub span: std::ops::Range<usize>,
}

pub struct Lexer<'source> {
    inner: logos::Lexer<'source, Token>,
}

impl<'source> Lexer<'source> {
    pub fn new(source: &'source str) -> Self {
        Self {
            inner: Token::lexer(source),
        }
    }

    pub fn source(&self) -> &'source str {
        self.inner.source()
    }
}

impl<'source> Iterator for Lexer<'source> {
    type Item = TokenSpan;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.inner.next()?;
        let span = self.inner.span();

        // `Text` matches every byte outside the two delimiters, so logos
        // has nothing left to reject.
        let token = token.unwrap_or(Token::Text);
        Some(TokenSpan { token, span })
    }
}

/// Structural errors found while splitting a template into pieces.
///
/// The const validator in `qprint-core` reports the same three conditions
/// with the same offsets; its `TemplateError` converts from this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LexError {
    #[error("`{{` at offset {offset} opens a placeholder inside another placeholder")]
    NestedOpen { offset: usize },
    #[error("placeholder opened at offset {offset} is never closed")]
    UnclosedOpen { offset: usize },
    #[error("`}}` at offset {offset} does not close a placeholder")]
    StrayClose { offset: usize },
}

/// One `{...}` region. Offsets are absolute byte positions in the template.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placeholder<'a> {
    pub open: usize,
    pub close: usize,
    pub modifier: TextSpan<'a>,
}

impl Placeholder<'_> {
    pub fn range(&self) -> std::ops::Range<usize> {
        self.open..self.close + 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Piece<'a> {
    Literal(TextSpan<'a>),
    Placeholder(Placeholder<'a>),
}

/// Splits a template into literal runs and placeholders.
///
/// Stops after the first error.
pub struct Pieces<'a> {
    lexer: std::iter::Peekable<Lexer<'a>>,
    source: TextSpan<'a>,
    failed: bool,
}

pub fn pieces(source: &str) -> Pieces<'_> {
    Pieces {
        lexer: Lexer::new(source).peekable(),
        source: TextSpan::of(source),
        failed: false,
    }
}

impl<'a> Pieces<'a> {
    fn view(&self, range: std::ops::Range<usize>) -> TextSpan<'a> {
        // Token ranges always lie on boundaries of the lexed source.
        self.source
            .slice(range.start, range.end - range.start)
            .unwrap_or(TextSpan::of(""))
    }

    fn placeholder(&mut self, open: usize) -> Result<Placeholder<'a>, LexError> {
        let mut modifier = self.view(open + 1..open + 1);
        loop {
            let next = self
                .lexer
                .next()
                .ok_or(LexError::UnclosedOpen { offset: open })?;
            match next.token {
                Token::Text => modifier = self.view(next.span),
                Token::Close => {
                    return Ok(Placeholder {
                        open,
                        close: next.span.start,
                        modifier,
                    })
                }
                Token::Open => {
                    return Err(LexError::NestedOpen {
                        offset: next.span.start,
                    })
                }
            }
        }
    }
}

impl<'a> Iterator for Pieces<'a> {
    type Item = Result<Piece<'a>, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let TokenSpan { token, span } = self.lexer.next()?;
        let item = match token {
            Token::Text => Ok(Piece::Literal(self.view(span))),
            Token::Close => Err(LexError::StrayClose { offset: span.start }),
            Token::Open => self.placeholder(span.start).map(Piece::Placeholder),
        };
        self.failed = item.is_err();
        Some(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens() {
        let source = "ten: {x}\n";
        let tokens: Vec<_> = Lexer::new(source).map(|t| t.token).collect();

        assert_eq!(
            tokens,
            vec![Token::Text, Token::Open, Token::Text, Token::Close, Token::Text]
        );
    }

    #[test]
    fn test_token_spans() {
        let mut lexer = Lexer::new("a{}b");

        assert_eq!(lexer.next().unwrap().span, 0..1);
        assert_eq!(lexer.next().unwrap().span, 1..2);
        assert_eq!(lexer.next().unwrap().span, 2..3);
        assert_eq!(lexer.next().unwrap().span, 3..4);
        assert!(lexer.next().is_none());
    }

    #[test]
    fn test_text_spans_newlines() {
        let tokens: Vec<_> = Lexer::new("one\ntwo").collect();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].token, Token::Text);
    }

    #[test]
    fn test_pieces() {
        let source = "ten: {}, hex: {x}";
        let pieces: Vec<_> = pieces(source).map(|p| p.unwrap()).collect();

        assert_eq!(pieces.len(), 4);
        assert!(matches!(pieces[0], Piece::Literal(s) if s == "ten: "));
        match pieces[1] {
            Piece::Placeholder(p) => {
                assert_eq!(p.open, 5);
                assert_eq!(p.close, 6);
                assert!(p.modifier.is_empty());
                assert_eq!(p.range(), 5..7);
            }
            other => panic!("Expected placeholder, got {:?}", other),
        }
        assert!(matches!(pieces[2], Piece::Literal(s) if s == ", hex: "));
        match pieces[3] {
            Piece::Placeholder(p) => {
                assert_eq!(p.modifier, "x");
                assert_eq!(p.modifier.start(), 15);
            }
            other => panic!("Expected placeholder, got {:?}", other),
        }
    }

    #[test]
    fn test_pieces_errors() {
        let nested: Vec<_> = pieces("a{{}}").collect();
        assert_eq!(nested.len(), 2);
        assert_eq!(nested[1], Err(LexError::NestedOpen { offset: 2 }));

        let unclosed: Vec<_> = pieces("{x").collect();
        assert_eq!(unclosed, vec![Err(LexError::UnclosedOpen { offset: 0 })]);

        let stray: Vec<_> = pieces("a}").collect();
        assert_eq!(stray[1], Err(LexError::StrayClose { offset: 1 }));
    }

    #[test]
    fn test_lexer_covers_every_input() {
        let source = "é{ }}{{x\n\0";
        let mut end = 0;
        for token in Lexer::new(source) {
            assert_eq!(token.span.start, end);
            end = token.span.end;
        }
        assert_eq!(end, source.len());
    }
}
