use crate::expander::{expand, find_close, ExpandError};
use crate::tokens::{tokenize, Token, TokenKind, TokenizerError};
use crate::types::Value;
use std::fmt;

pub type Result<T = Value> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    Tokenizer(TokenizerError),
    Expand(ExpandError),
    UnclosedList,
    UnopenedList,
    BadNumber(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Tokenizer(e) => write!(f, "{}", e),
            Error::Expand(e) => write!(f, "{}", e),
            Error::UnclosedList => write!(f, "list was opened but not closed"),
            Error::UnopenedList => write!(f, "list was closed but not opened"),
            Error::BadNumber(text) => write!(f, "failed to convert number: {}", text),
        }
    }
}

/// Reads a whole program. The result lists the top level forms in order, or
/// is `Nil` when there are none.
pub fn read_str(input: &str) -> Result {
    let tokens = tokenize(input).map_err(Error::Tokenizer)?;
    let tokens = expand(&tokens).map_err(Error::Expand)?;
    parse(&tokens)
}

/// True when `input` scans cleanly but leaves at least one list open, so more
/// text could still complete it.
pub fn is_incomplete(input: &str) -> bool {
    let tokens = match tokenize(input) {
        Ok(tokens) => tokens,
        Err(_) => return false,
    };
    let mut depth = 0i64;
    for token in &tokens {
        match token.kind {
            TokenKind::Open => depth += 1,
            TokenKind::Close => depth -= 1,
            _ => (),
        }
        if depth < 0 {
            return false;
        }
    }
    depth > 0 || tokens.last().map_or(false, Token::is_colon)
}

pub fn parse(tokens: &[Token]) -> Result {
    let mut elements = Vec::new();
    let mut pos = 0;
    while pos < tokens.len() {
        let token = &tokens[pos];
        let element = match token.kind {
            TokenKind::Number => read_number(token.text)?,
            TokenKind::StringLiteral => read_string(token.text),
            TokenKind::Symbol => Value::symbol(token.text),
            TokenKind::Open => {
                let end = find_close(tokens, pos + 1).ok_or(Error::UnclosedList)?;
                let nested = parse(&tokens[pos + 1..end])?;
                pos = end;
                nested
            }
            TokenKind::Close => return Err(Error::UnopenedList),
            TokenKind::Whitespace | TokenKind::Comment => {
                pos += 1;
                continue;
            }
        };
        elements.push(element);
        pos += 1;
    }
    Ok(Value::list(elements))
}

fn read_number(text: &str) -> Result {
    text.parse()
        .map(Value::Number)
        .map_err(|_| Error::BadNumber(text.into()))
}

fn read_string(text: &str) -> Value {
    let body = text
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(text);
    Value::String(body.into())
}
