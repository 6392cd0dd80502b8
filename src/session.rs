use tracing::trace;

use crate::{keys, machine::Calculator, symbol::Symbol};

/// Receives the buffer after every processed symbol.
pub trait Renderer {
    fn render(&mut self, buffer: &str, error: bool);
}

impl<F> Renderer for F
where
    F: FnMut(&str, bool),
{
    fn render(&mut self, buffer: &str, error: bool) {
        self(buffer, error)
    }
}

/// Owns the calculator for one session and is the only thing that mutates
/// it, so symbols are applied strictly one after another.
pub struct Session<R> {
    calculator: Calculator,
    renderer: R,
}

impl<R: Renderer> Session<R> {
    pub fn new(renderer: R) -> Self {
        Self::with_calculator(Calculator::new(), renderer)
    }

    pub fn seeded(display: &str, renderer: R) -> Self {
        Self::with_calculator(Calculator::seeded(display), renderer)
    }

    fn with_calculator(calculator: Calculator, mut renderer: R) -> Self {
        renderer.render(calculator.buffer(), calculator.is_error());
        Session {
            calculator,
            renderer,
        }
    }

    pub fn feed(&mut self, symbol: Symbol) {
        self.calculator.apply(symbol);
        self.renderer
            .render(self.calculator.buffer(), self.calculator.is_error());
    }

    /// Feeds a raw keyboard event; keys without a mapping are dropped before
    /// they reach the calculator.
    pub fn feed_key(&mut self, key: &str, code: Option<&str>) -> Option<Symbol> {
        let Some(symbol) = keys::normalize(key, code) else {
            trace!(key, ?code, "unmapped key");
            return None;
        };
        self.feed(symbol);
        Some(symbol)
    }

    pub fn feed_label(&mut self, label: &str) -> Option<Symbol> {
        let symbol = keys::from_label(label)?;
        self.feed(symbol);
        Some(symbol)
    }

    pub fn calculator(&self) -> &Calculator {
        &self.calculator
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn into_parts(self) -> (Calculator, R) {
        (self.calculator, self.renderer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn renders_on_start_and_after_every_symbol() {
        let mut frames = Vec::new();
        let mut session = Session::new(|buffer: &str, _: bool| frames.push(buffer.to_string()));
        session.feed(Symbol::Digit(4));
        session.feed(Symbol::Clear);
        session.feed(Symbol::Clear);
        drop(session);
        assert_eq!(frames, ["0", "4", "0", "0"]);
    }

    #[test]
    fn unmapped_keys_are_not_rendered() {
        let mut count = 0;
        let mut session = Session::seeded("12", |_: &str, _: bool| count += 1);
        assert_eq!(session.feed_key("Shift", None), None);
        assert_eq!(session.feed_key("Enter", None), Some(Symbol::Equals));
        assert_eq!(session.calculator().buffer(), "12");
        drop(session);
        assert_eq!(count, 2);
    }

    #[test]
    fn labels_drive_the_calculator() {
        let mut session = Session::new(|_: &str, _: bool| {});
        for label in ["9", "÷", "0", "="] {
            session.feed_label(label);
        }
        assert!(session.calculator().is_error());
        assert_eq!(session.feed_label("AC"), None);
    }
}
