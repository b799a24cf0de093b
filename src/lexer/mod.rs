//! Expression tokenizer.
//!
//! A maximal run of non-operator characters forms one operand token (an
//! identifier if entirely alphabetic, a numeral if entirely numeric, after
//! trimming whitespace). Operator characters accumulate greedily with
//! longest-match against the fixed vocabulary, so `-(` stays two tokens
//! while `<=` and `&&` each stay one.
//!
//! `+` and `-` are rewritten to their unary forms whenever a binary reading
//! is impossible: at the start of the expression, or right after another
//! operator or an opening parenthesis.

use crate::error::ParseError;

/// Characters that can never be part of an operand.
const OPERATOR_CHARS: &str = "+-*()!&|=<>~";

/// Every operator and parenthesis the language knows.
const VOCABULARY: &[&str] = &[
    "!", "+", "-", "*", "&&", "||", "==", "~=", "<", "<=", ">", ">=", "(", ")",
];

fn is_operator_char(c: char) -> bool {
    OPERATOR_CHARS.contains(c)
}

fn is_vocabulary_prefix(s: &str) -> bool {
    VOCABULARY.iter().any(|entry| entry.starts_with(s))
}

/// Operators, with `+`/`-` already disambiguated into unary variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Not,
    UnaryPlus,
    UnaryMinus,
    Mul,
    Add,
    Sub,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    And,
    Or,
}

impl Op {
    /// Binding rank; smaller binds tighter. Parentheses sit at rank 0,
    /// outside this table.
    pub fn precedence(self) -> u8 {
        match self {
            Op::Not | Op::UnaryPlus | Op::UnaryMinus => 1,
            Op::Mul => 2,
            Op::Add | Op::Sub => 3,
            Op::Lt | Op::Le | Op::Gt | Op::Ge => 4,
            Op::Eq | Op::Ne => 5,
            Op::And | Op::Or => 6,
        }
    }

    pub fn is_unary(self) -> bool {
        matches!(self, Op::Not | Op::UnaryPlus | Op::UnaryMinus)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Number(i64),
    Ident(String),
    Op(Op),
    LParen,
    RParen,
}

/// Tokenize an expression substring.
pub fn tokenize(text: &str) -> Result<Vec<Token>, ParseError> {
    let chars: Vec<char> = text.chars().collect();
    let mut tokens = Vec::new();
    // The first token can never be a binary operator.
    let mut prev_was_operator = true;
    let mut i = 0;

    while i < chars.len() {
        if !is_operator_char(chars[i]) {
            let start = i;
            while i < chars.len() && !is_operator_char(chars[i]) {
                i += 1;
            }
            let run: String = chars[start..i].iter().collect();
            let word = run.trim();
            if word.is_empty() {
                continue;
            }
            if word.chars().all(|c| c.is_ascii_digit()) {
                let value = word
                    .parse()
                    .map_err(|_| ParseError::new(format!("invalid numeral `{}`", word)))?;
                tokens.push(Token::Number(value));
            } else if word.chars().all(char::is_alphabetic) {
                tokens.push(Token::Ident(word.to_string()));
            } else {
                return Err(ParseError::new(format!("unrecognized token `{}`", word)));
            }
            prev_was_operator = false;
        } else {
            // Longest operator match: extend while the accumulated string is
            // still a prefix of some vocabulary entry, remembering the last
            // length that was a full entry.
            let mut acc = String::new();
            let mut matched = None;
            let mut j = i;
            while j < chars.len() && is_operator_char(chars[j]) {
                acc.push(chars[j]);
                if !is_vocabulary_prefix(&acc) {
                    break;
                }
                if VOCABULARY.contains(&acc.as_str()) {
                    matched = Some(acc.len());
                }
                j += 1;
            }
            let Some(len) = matched else {
                return Err(ParseError::new(format!(
                    "unrecognized operator starting at `{}`",
                    chars[i]
                )));
            };
            let symbol: String = chars[i..i + len].iter().collect();
            i += len;

            match symbol.as_str() {
                "(" => {
                    tokens.push(Token::LParen);
                    prev_was_operator = true;
                }
                ")" => {
                    tokens.push(Token::RParen);
                    prev_was_operator = false;
                }
                other => {
                    let op = match other {
                        "!" => Op::Not,
                        "+" if prev_was_operator => Op::UnaryPlus,
                        "-" if prev_was_operator => Op::UnaryMinus,
                        "+" => Op::Add,
                        "-" => Op::Sub,
                        "*" => Op::Mul,
                        "&&" => Op::And,
                        "||" => Op::Or,
                        "==" => Op::Eq,
                        "~=" => Op::Ne,
                        "<" => Op::Lt,
                        "<=" => Op::Le,
                        ">" => Op::Gt,
                        ">=" => Op::Ge,
                        _ => unreachable!("symbol came from the vocabulary"),
                    };
                    tokens.push(Token::Op(op));
                    prev_was_operator = true;
                }
            }
        }
    }

    Ok(tokens)
}
