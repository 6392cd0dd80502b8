use std::fmt::Display;

/// Binary operators a buffer can hold between two operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    pub const ALL: [Operator; 4] = [
        Operator::Add,
        Operator::Subtract,
        Operator::Multiply,
        Operator::Divide,
    ];

    /// The character written into the buffer for this operator.
    pub fn glyph(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Subtract => '−',
            Operator::Multiply => '×',
            Operator::Divide => '÷',
        }
    }

    pub fn from_glyph(c: char) -> Option<Self> {
        match c {
            '+' => Some(Operator::Add),
            '−' => Some(Operator::Subtract),
            '×' => Some(Operator::Multiply),
            '÷' => Some(Operator::Divide),
            _ => None,
        }
    }

    pub fn is_multiplicative(self) -> bool {
        matches!(self, Operator::Multiply | Operator::Divide)
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.glyph())
    }
}

/// A normalized input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    /// Always in `0..=9`; see [`Symbol::digit`].
    Digit(u8),
    DecimalPoint,
    Operator(Operator),
    Percent,
    Equals,
    Clear,
    Backspace,
}

impl Symbol {
    pub fn digit(d: u8) -> Option<Self> {
        (d <= 9).then_some(Symbol::Digit(d))
    }

    pub fn from_char_digit(c: char) -> Option<Self> {
        c.to_digit(10).and_then(|d| Symbol::digit(d as u8))
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Symbol::Digit(d) => write!(f, "{d}"),
            Symbol::DecimalPoint => write!(f, "."),
            Symbol::Operator(op) => write!(f, "{op}"),
            Symbol::Percent => write!(f, "%"),
            Symbol::Equals => write!(f, "="),
            Symbol::Clear => write!(f, "C"),
            Symbol::Backspace => write!(f, "⌫"),
        }
    }
}
