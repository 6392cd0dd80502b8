use std::io::{BufRead, Write, stdin, stdout};

use clap::Parser;
use clap::Subcommand;
use keypad_calc::{Lexer, Outcome, Renderer, Session, machine};
use miette::IntoDiagnostic;
use miette::WrapErr;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Only print the buffer once input is exhausted
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the tokens of an expression
    Tokenize { expression: String },
    /// Evaluate an expression such as `2+3×4`
    Eval {
        expression: String,
        /// Show the full report instead of the display message on failure
        #[arg(long)]
        diagnostic: bool,
    },
    /// Feed keyboard keys (`7`, `+`, `Enter`, `Escape`, `Numpad5`, ...)
    Press {
        #[arg(long, default_value = "")]
        seed: String,
        #[arg(required = true, allow_hyphen_values = true)]
        keys: Vec<String>,
    },
    /// Read whitespace separated keys from stdin
    Repl {
        #[arg(long, default_value = "")]
        seed: String,
    },
}

struct Screen<W> {
    out: W,
    quiet: bool,
    last: String,
}

impl<W: Write> Renderer for Screen<W> {
    fn render(&mut self, buffer: &str, _error: bool) {
        self.last.clear();
        self.last.push_str(buffer);
        if !self.quiet {
            writeln!(self.out, "{buffer}").ok();
        }
    }
}

fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match args.command {
        Commands::Tokenize { expression } => {
            for token in Lexer::new(&expression) {
                let token = token?;
                println!("{token}");
            }
            println!("EOF  null");
        }
        Commands::Eval {
            expression,
            diagnostic,
        } => {
            if diagnostic {
                let value = keypad_calc::try_evaluate(&expression)?;
                println!("{}", keypad_calc::format_number(value));
            } else {
                match keypad_calc::evaluate(&expression) {
                    Outcome::Number(value) => println!("{}", keypad_calc::format_number(value)),
                    Outcome::DivisionByZero => println!("{}", machine::DIVIDE_BY_ZERO_MESSAGE),
                    Outcome::Failure => println!("{}", machine::ERROR_MESSAGE),
                }
            }
        }
        Commands::Press { seed, keys } => {
            let mut session = Session::seeded(&seed, display(args.quiet));
            for key in &keys {
                if session.feed_key(key, None).is_none() {
                    eprintln!("ignoring unmapped key `{key}`");
                }
            }
            finish(session, args.quiet);
        }
        Commands::Repl { seed } => {
            let mut session = Session::seeded(&seed, display(args.quiet));
            for line in stdin().lock().lines() {
                let line = line
                    .into_diagnostic()
                    .wrap_err("reading keys from stdin failed")?;
                for key in line.split_whitespace() {
                    session.feed_key(key, None);
                }
            }
            finish(session, args.quiet);
        }
    }
    Ok(())
}

fn display(quiet: bool) -> Screen<std::io::Stdout> {
    Screen {
        out: stdout(),
        quiet,
        last: String::new(),
    }
}

fn finish(session: Session<Screen<std::io::Stdout>>, quiet: bool) {
    if quiet {
        println!("{}", session.renderer().last);
    }
}
