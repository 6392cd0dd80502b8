use miette::Diagnostic;
use thiserror::Error;
use tracing::trace;

use crate::{
    lex::{Lexer, SyntaxError, TokenKind, named_source},
    symbol::Operator,
};

/// Digits kept after the decimal point when a result is written back.
pub const FRACTION_DIGITS: usize = 10;

#[derive(Error, Debug, Diagnostic)]
pub enum EvalError {
    #[error("cannot divide {dividend} by zero")]
    #[diagnostic(code(calc::division_by_zero))]
    DivisionByZero { dividend: f64 },

    #[error("result is not a finite number ({0})")]
    #[diagnostic(
        code(calc::non_finite),
        help("the operands are too large for 64-bit floating point")
    )]
    NonFinite(f64),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] SyntaxError),
}

/// What an `Equals` turns the buffer into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    Number(f64),
    DivisionByZero,
    Failure,
}

impl From<Result<f64, EvalError>> for Outcome {
    fn from(result: Result<f64, EvalError>) -> Self {
        match result {
            Ok(value) => Outcome::Number(value),
            Err(EvalError::DivisionByZero { .. }) => Outcome::DivisionByZero,
            Err(EvalError::NonFinite(_) | EvalError::Syntax(_)) => Outcome::Failure,
        }
    }
}

pub fn evaluate(text: &str) -> Outcome {
    try_evaluate(text).into()
}

/// Evaluates a flat chain of operands and operators, with × and ÷ binding
/// tighter than + and −.
pub fn try_evaluate(text: &str) -> Result<f64, EvalError> {
    let (head, rest) = split(text)?;

    // × and ÷ collapse into the operand on their left; what is left over
    // is joined only by + and −.
    let mut first = head;
    let mut additive: Vec<(Operator, f64)> = Vec::with_capacity(rest.len());
    for (op, rhs) in rest {
        if op.is_multiplicative() {
            let lhs = match additive.last_mut() {
                Some((_, value)) => value,
                None => &mut first,
            };
            *lhs = apply(op, *lhs, rhs)?;
        } else {
            additive.push((op, rhs));
        }
    }

    let value = additive
        .into_iter()
        .try_fold(first, |acc, (op, rhs)| apply(op, acc, rhs))?;
    trace!(text, value, "folded");

    if !value.is_finite() {
        return Err(EvalError::NonFinite(value));
    }
    Ok(value)
}

fn apply(op: Operator, lhs: f64, rhs: f64) -> Result<f64, EvalError> {
    Ok(match op {
        Operator::Add => lhs + rhs,
        Operator::Subtract => lhs - rhs,
        Operator::Multiply => lhs * rhs,
        Operator::Divide => {
            if rhs == 0.0 {
                return Err(EvalError::DivisionByZero { dividend: lhs });
            }
            lhs / rhs
        }
    })
}

/// Tokenizes into `operand (operator operand)*`. A single leading `+` or
/// `−` is read as the sign of the first operand.
fn split(text: &str) -> Result<(f64, Vec<(Operator, f64)>), SyntaxError> {
    let mut sign = 1.0;
    let mut head = None;
    let mut pending = None;
    let mut rest = Vec::new();

    for token in Lexer::new(text) {
        let token = token?;
        match (token.kind, head.is_some(), pending) {
            (TokenKind::Operator(op @ (Operator::Add | Operator::Subtract)), false, None)
                if token.offset == 0 =>
            {
                if op == Operator::Subtract {
                    sign = -1.0;
                }
                pending = Some(op);
            }
            (TokenKind::Number(n), false, _) => {
                head = Some(sign * n);
                pending = None;
            }
            (TokenKind::Number(n), true, Some(op)) => {
                rest.push((op, n));
                pending = None;
            }
            (TokenKind::Number(_), true, None) => {
                return Err(SyntaxError::MissingOperator {
                    src: named_source(text),
                    bad_bit: token.span(),
                });
            }
            (TokenKind::Operator(op), true, None) => pending = Some(op),
            (TokenKind::Operator(_), _, _) => {
                return Err(SyntaxError::MissingOperand {
                    src: named_source(text),
                    bad_bit: token.span(),
                });
            }
        }
    }

    match (head, pending) {
        (Some(head), None) => Ok((head, rest)),
        _ => Err(SyntaxError::MissingOperand {
            src: named_source(text),
            bad_bit: (text.len()..text.len()).into(),
        }),
    }
}

/// Renders a result the way it goes back into the buffer: integers as
/// integers, everything else rounded to [`FRACTION_DIGITS`] places with
/// trailing zeros dropped.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        return format_plain(value);
    }
    format_plain(round_half_away(value, FRACTION_DIGITS))
}

/// Rounds on the exact decimal expansion of `value`, ties away from zero.
fn round_half_away(value: f64, digits: usize) -> f64 {
    // every finite f64 has at most 1074 fractional digits
    let exact = format!("{:.1074}", value.abs());
    let Some((int, frac)) = exact.split_once('.') else {
        return value;
    };

    let mut kept: Vec<char> = int.chars().chain(frac.chars().take(digits)).collect();
    if frac.as_bytes().get(digits).is_some_and(|&d| d >= b'5') {
        let mut carry = true;
        for d in kept.iter_mut().rev() {
            if *d == '9' {
                *d = '0';
            } else {
                *d = char::from(*d as u8 + 1);
                carry = false;
                break;
            }
        }
        if carry {
            kept.insert(0, '1');
        }
    }

    let split = kept.len() - digits;
    let text: String = kept[..split]
        .iter()
        .chain(std::iter::once(&'.'))
        .chain(&kept[split..])
        .collect();
    text.parse::<f64>()
        .map_or(value, |rounded| rounded.copysign(value))
}

fn format_plain(value: f64) -> String {
    // -0 renders as "0"
    if value == 0.0 {
        return "0".to_string();
    }
    value.to_string()
}
