// Rewrites the colon shorthand into explicit quote forms before parsing:
//
//     :foo      => (quote foo)
//     ::foo     => (quote (quote foo))
//     :(a b c)  => (quote (a b c))

use crate::tokens::{Token, TokenKind};
use std::fmt;

const OPEN: Token<'static> = Token::new(TokenKind::Open, "(");
const CLOSE: Token<'static> = Token::new(TokenKind::Close, ")");
const QUOTE: Token<'static> = Token::new(TokenKind::Symbol, "quote");

#[derive(Debug)]
pub enum ExpandError {
    UnclosedQuote,
}

impl fmt::Display for ExpandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpandError::UnclosedQuote => write!(f, "unclosed list: quote shorthand has no target"),
        }
    }
}

/// Index of the close paren balancing an open paren that sits just before
/// `start`, or `None` if the tokens run out first.
pub(crate) fn find_close(tokens: &[Token], start: usize) -> Option<usize> {
    let mut depth = 1usize;
    for (i, token) in tokens.iter().enumerate().skip(start) {
        match token.kind {
            TokenKind::Open => depth += 1,
            TokenKind::Close => depth -= 1,
            _ => (),
        }
        if depth == 0 {
            return Some(i);
        }
    }
    None
}

pub fn expand<'a>(tokens: &[Token<'a>]) -> Result<Vec<Token<'a>>, ExpandError> {
    let mut tokens = tokens.to_vec();
    loop {
        let (expanded, count) = expand_pass(&tokens)?;
        log::trace!("expand pass rewrote {} quote sites", count);
        tokens = expanded;
        if count == 0 {
            return Ok(tokens);
        }
    }
}

fn expand_pass<'a>(tokens: &[Token<'a>]) -> Result<(Vec<Token<'a>>, usize), ExpandError> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut count = 0;
    let mut i = 0;
    while i < tokens.len() {
        if !tokens[i].is_colon() {
            output.push(tokens[i]);
            i += 1;
            continue;
        }

        let colons = tokens[i..].iter().take_while(|t| t.is_colon()).count();
        let start = i + colons;
        let end = match tokens.get(start).map(|t| t.kind) {
            None | Some(TokenKind::Close) => return Err(ExpandError::UnclosedQuote),
            Some(TokenKind::Open) => find_close(tokens, start + 1).ok_or(ExpandError::UnclosedQuote)?,
            Some(_) => start,
        };

        let (target, nested) = expand_pass(&tokens[start..=end])?;
        for _ in 0..colons {
            output.push(OPEN);
            output.push(QUOTE);
        }
        output.extend(target);
        output.extend(std::iter::repeat(CLOSE).take(colons));

        count += 1 + nested;
        i = end + 1;
    }
    Ok((output, count))
}
