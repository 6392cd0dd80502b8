use std::{fmt::Display, num::ParseFloatError};

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::symbol::Operator;

const SOURCE_NAME: &str = "<buffer>";

#[derive(Error, Debug, Diagnostic)]
pub enum SyntaxError {
    #[error("Unexpected character '{token}'")]
    #[diagnostic(help("only digits, `.` and the operators + − × ÷ may appear in an expression"))]
    UnexpectedCharacter {
        #[source_code]
        src: NamedSource<String>,

        #[label("this character")]
        bad_bit: SourceSpan,

        token: char,
    },

    #[error("invalid number `{literal}`")]
    #[diagnostic(help("an operand holds at most one decimal point and at least one digit"))]
    InvalidNumber {
        #[source_code]
        src: NamedSource<String>,

        #[label("this numeric literal")]
        bad_bit: SourceSpan,

        literal: String,

        #[source]
        cause: ParseFloatError,
    },

    #[error("missing operand")]
    #[diagnostic(help("every operator needs a number on both sides"))]
    MissingOperand {
        #[source_code]
        src: NamedSource<String>,

        #[label("expected a number here")]
        bad_bit: SourceSpan,
    },

    #[error("missing operator")]
    #[diagnostic(help("put one of + − × ÷ between two numbers"))]
    MissingOperator {
        #[source_code]
        src: NamedSource<String>,

        #[label("expected an operator before this number")]
        bad_bit: SourceSpan,
    },
}

impl SyntaxError {
    pub fn span(&self) -> SourceSpan {
        match self {
            SyntaxError::UnexpectedCharacter { bad_bit, .. }
            | SyntaxError::InvalidNumber { bad_bit, .. }
            | SyntaxError::MissingOperand { bad_bit, .. }
            | SyntaxError::MissingOperator { bad_bit, .. } => *bad_bit,
        }
    }
}

pub(crate) fn named_source(whole: &str) -> NamedSource<String> {
    NamedSource::new(SOURCE_NAME, whole.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Token<'de> {
    pub kind: TokenKind,
    pub literal: &'de str,
    /// Byte offset of `literal` in the lexed text.
    pub offset: usize,
}

impl Token<'_> {
    pub fn span(&self) -> SourceSpan {
        SourceSpan::from(self.offset..self.offset + self.literal.len())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TokenKind {
    Number(f64),
    Operator(Operator),
}

impl Display for Token<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let lit = self.literal;
        match self.kind {
            TokenKind::Number(n) => write!(f, "NUMBER {lit} {n}"),
            TokenKind::Operator(Operator::Add) => write!(f, "PLUS {lit} null"),
            TokenKind::Operator(Operator::Subtract) => write!(f, "MINUS {lit} null"),
            TokenKind::Operator(Operator::Multiply) => write!(f, "TIMES {lit} null"),
            TokenKind::Operator(Operator::Divide) => write!(f, "DIVIDE {lit} null"),
        }
    }
}

/// Splits buffer text into numbers and operator glyphs.
///
/// An ASCII `-` at the very start is part of the first number: that is
/// how a negative result reads once it is back in the buffer. The operator
/// glyph for subtraction is `−` (U+2212), so the two never collide.
pub struct Lexer<'de> {
    whole: &'de str,
    rest: &'de str,
    pub byte: usize,
}

impl<'de> Lexer<'de> {
    pub fn new(input: &'de str) -> Self {
        Lexer {
            whole: input,
            rest: input,
            byte: 0,
        }
    }
}

impl<'de> Iterator for Lexer<'de> {
    type Item = Result<Token<'de>, SyntaxError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let mut chars = self.rest.chars();
            let c = chars.next()?;
            let offset = self.byte;
            let literal = &self.rest[..c.len_utf8()];
            let cur = self.rest;
            self.rest = chars.as_str();
            self.byte += c.len_utf8();

            match c {
                ' ' | '\t' => continue,
                '0'..='9' | '.' => {}
                '-' if offset == 0 => {}
                c => {
                    if let Some(op) = Operator::from_glyph(c) {
                        return Some(Ok(Token {
                            kind: TokenKind::Operator(op),
                            literal,
                            offset,
                        }));
                    }
                    return Some(Err(SyntaxError::UnexpectedCharacter {
                        src: named_source(self.whole),
                        bad_bit: SourceSpan::from(offset..self.byte),
                        token: c,
                    }));
                }
            }

            let body = &cur[c.len_utf8()..];
            let end = body
                .find(|c| !matches!(c, '0'..='9' | '.'))
                .unwrap_or(body.len());
            let literal = &cur[..c.len_utf8() + end];

            self.byte += end;
            self.rest = &self.rest[end..];

            return Some(match literal.parse() {
                Ok(n) => Ok(Token {
                    kind: TokenKind::Number(n),
                    literal,
                    offset,
                }),
                Err(cause) => Err(SyntaxError::InvalidNumber {
                    src: named_source(self.whole),
                    bad_bit: SourceSpan::from(offset..self.byte),
                    literal: literal.to_string(),
                    cause,
                }),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(input: &str) -> Vec<TokenKind> {
        Lexer::new(input)
            .map(|token| token.map(|t| t.kind))
            .collect::<Result<_, _>>()
            .unwrap()
    }

    #[test]
    fn numbers_and_glyphs() {
        assert_eq!(
            kinds("12.5+3×4÷2−1"),
            vec![
                TokenKind::Number(12.5),
                TokenKind::Operator(Operator::Add),
                TokenKind::Number(3.0),
                TokenKind::Operator(Operator::Multiply),
                TokenKind::Number(4.0),
                TokenKind::Operator(Operator::Divide),
                TokenKind::Number(2.0),
                TokenKind::Operator(Operator::Subtract),
                TokenKind::Number(1.0),
            ]
        );
    }

    #[test]
    fn trailing_point_and_ascii_sign() {
        assert_eq!(
            kinds("-4+0."),
            vec![
                TokenKind::Number(-4.0),
                TokenKind::Operator(Operator::Add),
                TokenKind::Number(0.0),
            ]
        );
    }

    #[test]
    fn offsets_are_bytes() {
        let tokens: Vec<_> = Lexer::new("7×8").collect::<Result<_, _>>().unwrap();
        assert_eq!(tokens[1].literal, "×");
        assert_eq!(tokens[2].offset, 1 + '×'.len_utf8());
        assert_eq!(tokens[2].to_string(), "NUMBER 8 8");
    }

    #[test]
    fn rejects_unknown_characters() {
        let err = Lexer::new("2*3").find_map(Result::err).unwrap();
        match err {
            SyntaxError::UnexpectedCharacter { token, .. } => assert_eq!(token, '*'),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(err_span("2*3"), (1, 1));
    }

    #[test]
    fn ascii_minus_only_signs_the_first_number() {
        assert_eq!(kinds("-3"), vec![TokenKind::Number(-3.0)]);
        for input in ["5-3", "5−-3"] {
            let err = Lexer::new(input).find_map(Result::err).unwrap();
            assert!(
                matches!(err, SyntaxError::UnexpectedCharacter { token: '-', .. }),
                "{input}"
            );
        }
    }

    #[test]
    fn rejects_two_decimal_points() {
        let err = Lexer::new("1.2.3").find_map(Result::err).unwrap();
        assert!(matches!(err, SyntaxError::InvalidNumber { ref literal, .. } if literal == "1.2.3"));
    }

    fn err_span(input: &str) -> (usize, usize) {
        let span = Lexer::new(input).find_map(Result::err).unwrap().span();
        (span.offset(), span.len())
    }
}
