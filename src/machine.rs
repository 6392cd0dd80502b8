use tracing::{debug, trace};

use crate::{
    eval::{self, Outcome},
    symbol::{Operator, Symbol},
};

pub const INITIAL_BUFFER: &str = "0";
pub const DIVIDE_BY_ZERO_MESSAGE: &str = "Cannot divide by zero";
pub const ERROR_MESSAGE: &str = "Error";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Normal,
    /// The buffer holds an error message until a digit, `.`, backspace or
    /// clear arrives.
    Error,
}

/// Expression buffer plus error flag. Every [`Symbol`] either changes the
/// pair or is ignored; nothing here fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Calculator {
    buffer: String,
    error: bool,
}

impl Default for Calculator {
    fn default() -> Self {
        Calculator {
            buffer: INITIAL_BUFFER.to_string(),
            error: false,
        }
    }
}

impl Calculator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from whatever the display already shows, or `"0"` if that is
    /// empty.
    pub fn seeded(display: &str) -> Self {
        let display = display.trim();
        if display.is_empty() {
            return Self::default();
        }
        Calculator {
            buffer: display.to_string(),
            error: false,
        }
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn is_error(&self) -> bool {
        self.error
    }

    pub fn state(&self) -> State {
        if self.error { State::Error } else { State::Normal }
    }

    /// Feeds one symbol. Returns whether the buffer or the error flag changed.
    pub fn apply(&mut self, symbol: Symbol) -> bool {
        let snapshot = (self.buffer.clone(), self.error);

        if self.error {
            self.recover(symbol);
        } else {
            self.step(symbol);
        }

        let changed = snapshot.0 != self.buffer || snapshot.1 != self.error;
        if !changed {
            trace!(%symbol, buffer = %self.buffer, "ignored");
        }
        changed
    }

    fn recover(&mut self, symbol: Symbol) {
        let buffer = match symbol {
            Symbol::Digit(d) => match digit_char(d) {
                Some(c) => c.to_string(),
                None => return,
            },
            Symbol::DecimalPoint => "0.".to_string(),
            Symbol::Backspace | Symbol::Clear => INITIAL_BUFFER.to_string(),
            Symbol::Operator(_) | Symbol::Percent | Symbol::Equals => return,
        };
        debug!(%symbol, %buffer, "recovered from error");
        self.buffer = buffer;
        self.error = false;
    }

    fn step(&mut self, symbol: Symbol) {
        match symbol {
            Symbol::Clear => {
                if !self.is_initial() {
                    self.reset();
                }
            }
            Symbol::Backspace => {
                if !self.is_initial() {
                    self.buffer.pop();
                    if self.buffer.is_empty() {
                        self.reset();
                    }
                }
            }
            Symbol::Equals => self.equals(),
            Symbol::Percent => self.percent(),
            Symbol::DecimalPoint => {
                if self.last_segment().contains('.') {
                    return;
                }
                if self.ends_with_operator() {
                    self.buffer.push_str("0.");
                } else {
                    self.buffer.push('.');
                }
            }
            Symbol::Operator(op) => {
                if self.is_initial() {
                    return;
                }
                if self.ends_with_operator() {
                    self.buffer.pop();
                }
                self.buffer.push(op.glyph());
            }
            Symbol::Digit(d) => {
                let Some(c) = digit_char(d) else {
                    return;
                };
                if self.is_initial() {
                    self.buffer.clear();
                }
                self.buffer.push(c);
            }
        }
    }

    fn equals(&mut self) {
        if self.ends_with_operator() {
            debug!(buffer = %self.buffer, "trailing operator, not evaluating");
            return;
        }
        let outcome = eval::evaluate(&self.buffer);
        debug!(buffer = %self.buffer, ?outcome, "evaluated");
        match outcome {
            Outcome::Number(value) => self.buffer = eval::format_number(value),
            Outcome::DivisionByZero => self.fail(DIVIDE_BY_ZERO_MESSAGE),
            Outcome::Failure => self.fail(ERROR_MESSAGE),
        }
    }

    fn percent(&mut self) {
        if self.is_initial() || self.ends_with_operator() {
            return;
        }
        let start = self.last_segment_start();
        let Ok(value) = self.buffer[start..].parse::<f64>() else {
            debug!(segment = &self.buffer[start..], "segment is not a number");
            return;
        };
        let percentage = value * 0.01;
        self.buffer.truncate(start);
        self.buffer.push_str(&percentage.to_string());
    }

    fn fail(&mut self, message: &str) {
        self.buffer = message.to_string();
        self.error = true;
    }

    fn reset(&mut self) {
        self.buffer = INITIAL_BUFFER.to_string();
    }

    fn is_initial(&self) -> bool {
        self.buffer == INITIAL_BUFFER
    }

    fn ends_with_operator(&self) -> bool {
        self.buffer
            .chars()
            .next_back()
            .is_some_and(|c| Operator::from_glyph(c).is_some())
    }

    /// Byte index where the operand after the last operator begins.
    fn last_segment_start(&self) -> usize {
        self.buffer
            .char_indices()
            .rev()
            .find(|&(_, c)| Operator::from_glyph(c).is_some())
            .map_or(0, |(i, c)| i + c.len_utf8())
    }

    fn last_segment(&self) -> &str {
        &self.buffer[self.last_segment_start()..]
    }
}

fn digit_char(d: u8) -> Option<char> {
    char::from_digit(u32::from(d), 10)
}
