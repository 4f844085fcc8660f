//! Tokeniser for flag annotations.
//!
//! Produces bare words, quoted literals and the `,` / `=` symbols.
//! Whitespace separates tokens and is otherwise dropped.

use std::iter::Peekable;
use std::str::CharIndices;

use crate::error::TagError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Token {
    /// A run of characters other than whitespace, quotes, `,` and `=`.
    Bare(String),
    /// A single- or double-quoted literal with escapes decoded.
    Quoted(String),
    Comma,
    Equals,
}

impl Token {
    /// Text carried by word tokens.
    pub(crate) fn into_word(self) -> Option<String> {
        match self {
            Self::Bare(text) | Self::Quoted(text) => Some(text),
            Self::Comma | Self::Equals => None,
        }
    }
}

pub(crate) struct Lexer<'t> {
    chars: Peekable<CharIndices<'t>>,
}

impl<'t> Lexer<'t> {
    pub(crate) fn new(source: &'t str) -> Self {
        Self {
            chars: source.char_indices().peekable(),
        }
    }

    fn skip_whitespace(&mut self) {
        while self.chars.next_if(|(_, ch)| ch.is_whitespace()).is_some() {}
    }

    fn bare(&mut self, first: char) -> Token {
        let mut text = String::from(first);
        while let Some((_, ch)) = self.chars.next_if(|(_, ch)| !ends_bare_word(*ch)) {
            text.push(ch);
        }
        Token::Bare(text)
    }

    /// Reads up to the closing `quote`. A backslash escapes the quote
    /// character or another backslash; any other backslash is literal.
    fn quoted(&mut self, start: usize, quote: char) -> Result<Token, TagError> {
        let mut text = String::new();
        loop {
            match self.chars.next() {
                None => return Err(TagError::UnterminatedString { position: start }),
                Some((_, ch)) if ch == quote => return Ok(Token::Quoted(text)),
                Some((_, '\\')) => {
                    match self.chars.next_if(|(_, next)| *next == quote || *next == '\\') {
                        Some((_, escaped)) => text.push(escaped),
                        None => text.push('\\'),
                    }
                }
                Some((_, ch)) => text.push(ch),
            }
        }
    }
}

fn ends_bare_word(ch: char) -> bool {
    ch.is_whitespace() || matches!(ch, ',' | '=' | '\'' | '"')
}

impl Iterator for Lexer<'_> {
    /// Byte offset of the token start paired with the token.
    type Item = Result<(usize, Token), TagError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.skip_whitespace();
        let (position, ch) = self.chars.next()?;
        let token = match ch {
            ',' => Ok(Token::Comma),
            '=' => Ok(Token::Equals),
            '\'' | '"' => self.quoted(position, ch),
            other => Ok(self.bare(other)),
        };
        Some(token.map(|tok| (position, tok)))
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for annotation tokenisation.

    use super::{Lexer, Token};
    use crate::error::TagError;
    use rstest::rstest;

    fn tokens(source: &str) -> Result<Vec<Token>, TagError> {
        Lexer::new(source)
            .map(|item| item.map(|(_, token)| token))
            .collect()
    }

    fn bare(text: &str) -> Token {
        Token::Bare(text.to_owned())
    }

    fn quoted(text: &str) -> Token {
        Token::Quoted(text.to_owned())
    }

    #[rstest]
    #[case("ip", vec![bare("ip")])]
    #[case("  dry-run  ", vec![bare("dry-run")])]
    #[case(
        "ip,del=','",
        vec![bare("ip"), Token::Comma, bare("del"), Token::Equals, quoted(",")]
    )]
    #[case("a = b", vec![bare("a"), Token::Equals, bare("b")])]
    #[case(r"'it\'s'", vec![quoted("it's")])]
    #[case(r#""say \"hi\"""#, vec![quoted("say \"hi\"")])]
    #[case(r"'C:\\dir\n'", vec![quoted(r"C:\dir\n")])]
    #[case("''", vec![quoted("")])]
    #[case("x'y'", vec![bare("x"), quoted("y")])]
    fn splits_tokens(#[case] source: &str, #[case] expected: Vec<Token>) {
        assert_eq!(tokens(source), Ok(expected));
    }

    #[rstest]
    #[case("'open", 0)]
    #[case("usage='dangling \\'", 6)]
    #[case("x, \"y", 3)]
    fn reports_unterminated_literals(#[case] source: &str, #[case] position: usize) {
        assert_eq!(
            tokens(source),
            Err(TagError::UnterminatedString { position })
        );
    }

    #[rstest]
    fn records_byte_offsets() {
        let offsets: Vec<usize> = Lexer::new("ab , ='c'")
            .filter_map(Result::ok)
            .map(|(offset, _)| offset)
            .collect();
        assert_eq!(offsets, vec![0, 3, 5, 6]);
    }
}
