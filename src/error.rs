//! Error types for expression parsing and script interpretation.
//!
//! None of these are recoverable: a malformed expression or an unresolvable
//! identifier aborts the statement, and the interpreter propagates the
//! failure to the top level. Unrecognized statement shapes are deliberately
//! *not* errors - they are silent no-ops, so stray lines in a script are
//! tolerated.

use std::fmt;

/// Malformed expression text: unbalanced parentheses, an empty operand
/// position, or a character run that is neither an operand nor an operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
}

impl ParseError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "parse error: {}", self.message)
    }
}

impl std::error::Error for ParseError {}

/// Failure while evaluating a single expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    /// The expression text could not be tokenized or parsed.
    Parse(ParseError),
    /// An identifier leaf had no binding reachable under the active mode.
    Unresolved(String),
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EvalError::Parse(err) => write!(f, "{}", err),
            EvalError::Unresolved(name) => write!(f, "unresolved identifier `{}`", name),
        }
    }
}

impl std::error::Error for EvalError {}

impl From<ParseError> for EvalError {
    fn from(err: ParseError) -> Self {
        EvalError::Parse(err)
    }
}

/// Fatal interpretation failure, reported with the offending source line.
///
/// Line numbers are 0-based indices into the script, matching the indices
/// reported through the step hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    /// An expression on this line failed to parse.
    Parse { line: usize, error: ParseError },
    /// An identifier on this line had no reachable binding.
    Unresolved { line: usize, name: String },
    /// A function body ended before a nested `def` found its `end`.
    UnclosedDef { function: String },
    /// A function body ended before an `if` found its `endif`.
    UnclosedIf { function: String },
}

impl RuntimeError {
    pub fn parse(line: usize, error: ParseError) -> Self {
        RuntimeError::Parse { line, error }
    }

    pub fn unresolved(line: usize, name: impl Into<String>) -> Self {
        RuntimeError::Unresolved {
            line,
            name: name.into(),
        }
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RuntimeError::Parse { line, error } => {
                write!(f, "line {}: {}", line, error)
            }
            RuntimeError::Unresolved { line, name } => {
                write!(f, "line {}: unresolved identifier `{}`", line, name)
            }
            RuntimeError::UnclosedDef { function } => {
                write!(f, "function `{}`: `def` without matching `end`", function)
            }
            RuntimeError::UnclosedIf { function } => {
                write!(f, "function `{}`: `if` without matching `endif`", function)
            }
        }
    }
}

impl std::error::Error for RuntimeError {}
