pub mod eval;
pub mod keys;
pub mod lex;
pub mod machine;
pub mod session;
pub mod symbol;

pub use eval::{Outcome, evaluate, format_number, try_evaluate};
pub use lex::Lexer;
pub use machine::{Calculator, State};
pub use session::{Renderer, Session};
pub use symbol::{Operator, Symbol};
