//! Logos-based lexer for configuration text
//!
//! Splits device configuration into words, quoted strings, comments and
//! layout. Anything the lexer cannot classify becomes an `ERROR` token; the
//! outline parser turns the enclosing line into an unrecognized-line node.

use super::syntax_kind::SyntaxKind;
use logos::Logos;
use rowan::TextSize;

/// A token with its kind, text, and position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
    pub offset: TextSize,
}

/// Lexer wrapping the logos-generated tokenizer
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, LogosToken>,
    offset: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: LogosToken::lexer(input),
            offset: 0,
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let logos_token = self.inner.next()?;
        let text = self.inner.slice();
        let offset = TextSize::new(self.offset);
        self.offset += text.len() as u32;

        let kind = match logos_token {
            Ok(t) => t.into(),
            Err(()) => SyntaxKind::ERROR,
        };

        Some(Token { kind, text, offset })
    }
}

/// Tokenize an entire string into a Vec
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input).collect()
}

/// Logos token enum - maps to SyntaxKind
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
pub enum LogosToken {
    #[regex(r"[ \t]+")]
    Whitespace,

    #[regex(r"\r?\n")]
    Newline,

    #[regex(r"![^\r\n]*")]
    Comment,

    #[regex(r#"[^\x00-\x20"!\x7f][^\x00-\x20"\x7f]*"#)]
    Word,

    #[regex(r#""[^"\r\n]*""#)]
    Quoted,
}

impl From<LogosToken> for SyntaxKind {
    fn from(token: LogosToken) -> Self {
        match token {
            LogosToken::Whitespace => SyntaxKind::WHITESPACE,
            LogosToken::Newline => SyntaxKind::NEWLINE,
            LogosToken::Comment => SyntaxKind::COMMENT,
            LogosToken::Word => SyntaxKind::WORD,
            LogosToken::Quoted => SyntaxKind::QUOTED,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<SyntaxKind> {
        tokenize(input).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_command_line() {
        assert_eq!(
            kinds("ip address 10.0.0.1 255.255.255.0\n"),
            vec![
                SyntaxKind::WORD,
                SyntaxKind::WHITESPACE,
                SyntaxKind::WORD,
                SyntaxKind::WHITESPACE,
                SyntaxKind::WORD,
                SyntaxKind::WHITESPACE,
                SyntaxKind::WORD,
                SyntaxKind::NEWLINE,
            ]
        );
    }

    #[test]
    fn test_comment_line() {
        assert_eq!(kinds("! hello\n"), vec![SyntaxKind::COMMENT, SyntaxKind::NEWLINE]);
    }

    #[test]
    fn test_bang_inside_word_is_not_comment() {
        assert_eq!(kinds("pass!word"), vec![SyntaxKind::WORD]);
    }

    #[test]
    fn test_quoted_string() {
        let tokens = tokenize("description \"uplink to core\"");
        assert_eq!(tokens[2].kind, SyntaxKind::QUOTED);
        assert_eq!(tokens[2].text, "\"uplink to core\"");
    }

    #[test]
    fn test_unterminated_quote_is_error() {
        assert!(kinds("description \"oops\n").contains(&SyntaxKind::ERROR));
    }

    #[test]
    fn test_control_character_is_error() {
        assert!(kinds("hostname r\x07\n").contains(&SyntaxKind::ERROR));
    }

    #[test]
    fn test_offsets_are_contiguous() {
        let tokens = tokenize("a b\nc");
        let mut expected = 0u32;
        for token in tokens {
            assert_eq!(token.offset, TextSize::new(expected));
            expected += token.text.len() as u32;
        }
    }
}
