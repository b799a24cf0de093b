//! # Scopesim - A Scoping-Discipline Simulator
//!
//! Scopesim is a line-oriented interpreter for a minimal imperative toy
//! language, built to make the difference between **static (lexical)** and
//! **dynamic** scoping observable. The same script can be stepped through
//! under either discipline, and at every executed line the interpreter
//! reports which binding each identifier resolved to.
//!
//! ## The language
//!
//! ```text
//! def <name>            function definition (bodies may nest)
//! end <name>            closes the most recent definition
//! var <name> = <expr>   declaration with initializer
//! <name> = <expr>       assignment to an already-declared variable
//! if <expr> ... endif   conditional block (no else)
//! <name>(...)           call; parenthesis contents are ignored
//! ```
//!
//! Functions take no parameters and return nothing; values are integers and
//! booleans. Blank or unrecognized lines are no-ops. These limitations are
//! deliberate - the language exists to demonstrate name resolution, nothing
//! more.
//!
//! ## Architecture Overview
//!
//! Execution of a single statement flows through three stages:
//!
//! ```text
//! Source line (String)
//!     ↓
//! [Lexer] → Token stream (operands, operators, unary rewrite)
//!     ↓
//! [Parser] → Expression tree via shunting-yard postfix conversion
//!     ↓
//! [Evaluator] → Value, resolving identifiers through a resolver callback
//! ```
//!
//! The block/call interpreter ([`interpreter::Interpreter`]) walks one
//! function body at a time, tracking nested definitions, conditional-block
//! skipping and the two global stacks (active definitions and live variable
//! bindings). Calls re-enter the interpreter recursively; every invocation
//! removes exactly the stack entries it added before returning.
//!
//! ## Resolution strategies
//!
//! The resolution discipline is chosen once, before interpretation begins,
//! by instantiating the interpreter with one of two strategies:
//!
//! - [`interpreter::DynamicScope`] - newest binding on the stack wins,
//!   regardless of which function created it.
//! - [`interpreter::StaticScope`] - walk the lexical-parent chain of the
//!   definition enclosing the usage site; only bindings owned by a function
//!   on that chain are visible.
//!
//! The two strategies diverge whenever a called function shadows a name that
//! its *caller* (but not its lexical ancestry) also binds - which is the
//! entire pedagogical point.
//!
//! ## Stepping
//!
//! After each executed line the interpreter notifies an optional
//! [`interpreter::StepHook`] with the dynamic call chain (innermost first),
//! the bindings owned by each frame and the index of the line just executed.
//! The bundled binary installs a console stepper that pauses on every step.

pub mod ast;
pub mod error;
pub mod interpreter;
pub mod lexer;
pub mod parser;

pub use interpreter::{run_program, DynamicScope, Interpreter, ScopeMode, StaticScope};
