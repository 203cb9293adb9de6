use regex::Regex;
use std::fmt;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum TokenKind {
    Whitespace,
    Comment,
    StringLiteral,
    Number,
    Open,
    Close,
    Symbol,
}

impl TokenKind {
    fn discarded(self) -> bool {
        matches!(self, TokenKind::Whitespace | TokenKind::Comment)
    }
}

/// A slice of source text tagged with what it is. Tokens synthesised by the
/// expander borrow `'static` text, so they fit alongside scanned ones.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
}

impl<'a> Token<'a> {
    pub(crate) const fn new(kind: TokenKind, text: &'a str) -> Self {
        Self { kind, text }
    }

    pub(crate) fn is_colon(&self) -> bool {
        self.kind == TokenKind::Symbol && self.text == ":"
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

#[derive(Debug)]
pub enum TokenizerError {
    NoMatch(usize),
}

impl fmt::Display for TokenizerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenizerError::NoMatch(pos) => {
                write!(f, "tokenizer failed: no token matches at offset {}", pos)
            }
        }
    }
}

lazy_static! {
    // Order matters: the first pattern to match wins.
    static ref PATTERNS: Vec<(TokenKind, Regex)> = {
        let table = [
            (TokenKind::Whitespace, r"^\s+"),
            (TokenKind::Comment, r"^;.*"),
            (TokenKind::StringLiteral, r#"^"(?:\\.|[^"])*""#),
            (TokenKind::Number, r"^(?:(?:[0-9]+)?\.)?[0-9]+"),
            (TokenKind::Open, r"^\("),
            (TokenKind::Close, r"^\)"),
            (TokenKind::Symbol, r"^(?::|[^\s();]+)"),
        ];
        table
            .iter()
            .map(|(kind, pattern)| (*kind, Regex::new(pattern).unwrap()))
            .collect()
    };
}

fn next_token(input: &str) -> Option<Token> {
    PATTERNS.iter().find_map(|(kind, re)| {
        re.find(input)
            .filter(|m| m.end() > 0)
            .map(|m| Token::new(*kind, m.as_str()))
    })
}

pub fn tokenize(input: &str) -> Result<Vec<Token>, TokenizerError> {
    let mut pos = 0;
    let mut tokens = Vec::new();
    while pos < input.len() {
        let token = next_token(&input[pos..]).ok_or(TokenizerError::NoMatch(pos))?;
        pos += token.text.len();
        if !token.kind.discarded() {
            tokens.push(token);
        }
    }
    log::trace!("tokenize produced {} tokens", tokens.len());
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use TokenKind::*;

    fn kinds(input: &str) -> Vec<(TokenKind, &str)> {
        tokenize(input)
            .unwrap()
            .into_iter()
            .map(|t| (t.kind, t.text))
            .collect()
    }

    #[test]
    fn simple_list() {
        assert_eq!(
            kinds("(+ 1 2)"),
            vec![(Open, "("), (Symbol, "+"), (Number, "1"), (Number, "2"), (Close, ")")]
        );
    }

    #[test]
    fn whitespace_and_comments_dropped() {
        assert_eq!(
            kinds("  ; leading comment\n foo ; trailing\n\tbar"),
            vec![(Symbol, "foo"), (Symbol, "bar")]
        );
    }

    #[test]
    fn strings_keep_quotes_and_escapes() {
        assert_eq!(
            kinds(r#"("a b" "say \"hi\"")"#),
            vec![
                (Open, "("),
                (StringLiteral, r#""a b""#),
                (StringLiteral, r#""say \"hi\"""#),
                (Close, ")")
            ]
        );
    }

    #[test]
    fn unterminated_string_falls_back_to_symbol() {
        assert_eq!(kinds(r#""abc"#), vec![(Symbol, r#""abc"#)]);
    }

    #[test]
    fn numbers() {
        assert_eq!(kinds("42 1.5 .5"), vec![(Number, "42"), (Number, "1.5"), (Number, ".5")]);
        // A leading minus is not part of a numeric literal.
        assert_eq!(kinds("-5"), vec![(Symbol, "-5")]);
    }

    #[test]
    fn colon_is_its_own_token() {
        assert_eq!(kinds(":foo"), vec![(Symbol, ":"), (Symbol, "foo")]);
        assert_eq!(
            kinds("::(a)"),
            vec![(Symbol, ":"), (Symbol, ":"), (Open, "("), (Symbol, "a"), (Close, ")")]
        );
    }

    #[test]
    fn dotted_symbols_and_punctuation() {
        assert_eq!(
            kinds("(set! a.b.c <=)"),
            vec![
                (Open, "("),
                (Symbol, "set!"),
                (Symbol, "a.b.c"),
                (Symbol, "<="),
                (Close, ")")
            ]
        );
    }

    #[test]
    fn empty_input() {
        assert!(tokenize("").unwrap().is_empty());
        assert!(tokenize("   \n ; nothing\n").unwrap().is_empty());
    }
}
