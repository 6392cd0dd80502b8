//! Mapping of raw keyboard keys and on-screen button labels to [`Symbol`]s.

use crate::symbol::{Operator, Symbol};

/// Looks up a keyboard event. `key` is tried first, then `code`, so
/// `("a", Some("Numpad4"))` still yields a digit.
pub fn normalize(key: &str, code: Option<&str>) -> Option<Symbol> {
    from_key(key).or_else(|| code.and_then(from_key))
}

pub fn from_key(key: &str) -> Option<Symbol> {
    if let Some(rest) = key.strip_prefix("Numpad") {
        return match rest {
            "Add" => Some(Symbol::Operator(Operator::Add)),
            "Subtract" => Some(Symbol::Operator(Operator::Subtract)),
            "Multiply" => Some(Symbol::Operator(Operator::Multiply)),
            "Divide" => Some(Symbol::Operator(Operator::Divide)),
            "Enter" => Some(Symbol::Equals),
            "Decimal" => Some(Symbol::DecimalPoint),
            _ => single_digit(rest),
        };
    }

    match key {
        "+" => Some(Symbol::Operator(Operator::Add)),
        "-" => Some(Symbol::Operator(Operator::Subtract)),
        "*" => Some(Symbol::Operator(Operator::Multiply)),
        "/" => Some(Symbol::Operator(Operator::Divide)),
        "Enter" => Some(Symbol::Equals),
        "Backspace" | "Delete" => Some(Symbol::Backspace),
        "Escape" => Some(Symbol::Clear),
        "%" => Some(Symbol::Percent),
        "." | "Period" => Some(Symbol::DecimalPoint),
        _ => single_digit(key),
    }
}

/// Button captions as they appear on the keypad.
pub fn from_label(label: &str) -> Option<Symbol> {
    let label = label.trim();
    let mut chars = label.chars();
    let (Some(c), None) = (chars.next(), chars.next()) else {
        return None;
    };
    match c {
        '=' => Some(Symbol::Equals),
        'C' => Some(Symbol::Clear),
        '⌫' => Some(Symbol::Backspace),
        '%' => Some(Symbol::Percent),
        '.' => Some(Symbol::DecimalPoint),
        c => Operator::from_glyph(c)
            .map(Symbol::Operator)
            .or_else(|| Symbol::from_char_digit(c)),
    }
}

fn single_digit(s: &str) -> Option<Symbol> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c @ '0'..='9'), None) => Symbol::from_char_digit(c),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyboard_keys() {
        assert_eq!(from_key("7"), Some(Symbol::Digit(7)));
        assert_eq!(from_key("Numpad0"), Some(Symbol::Digit(0)));
        assert_eq!(from_key("-"), Some(Symbol::Operator(Operator::Subtract)));
        assert_eq!(
            from_key("NumpadDivide"),
            Some(Symbol::Operator(Operator::Divide))
        );
        assert_eq!(from_key("NumpadEnter"), Some(Symbol::Equals));
        assert_eq!(from_key("Delete"), Some(Symbol::Backspace));
        assert_eq!(from_key("Escape"), Some(Symbol::Clear));
        assert_eq!(from_key("Period"), Some(Symbol::DecimalPoint));
    }

    #[test]
    fn unmapped_keys_produce_nothing() {
        for key in ["", "a", "12", "Numpad", "Numpad12", "Tab", "=", "×"] {
            assert_eq!(from_key(key), None, "{key:?}");
        }
    }

    #[test]
    fn code_is_a_fallback() {
        assert_eq!(normalize("Unidentified", Some("Numpad5")), Some(Symbol::Digit(5)));
        assert_eq!(normalize("3", Some("Numpad5")), Some(Symbol::Digit(3)));
        assert_eq!(normalize("Shift", None), None);
    }

    #[test]
    fn button_labels() {
        assert_eq!(from_label(" × "), Some(Symbol::Operator(Operator::Multiply)));
        assert_eq!(from_label("−"), Some(Symbol::Operator(Operator::Subtract)));
        assert_eq!(from_label("⌫"), Some(Symbol::Backspace));
        assert_eq!(from_label("C"), Some(Symbol::Clear));
        assert_eq!(from_label("9"), Some(Symbol::Digit(9)));
        assert_eq!(from_label("AC"), None);
        assert_eq!(from_label("*"), None);
    }
}
