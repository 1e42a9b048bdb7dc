//! Outline parser producing a rowan green tree.
//!
//! Device configurations are line oriented and nest by indentation:
//!
//! ```text
//! router bgp 65000
//!  neighbor 10.0.0.1 remote-as 65001
//!  address-family ipv4
//!   neighbor 10.0.0.1 activate
//! ```
//!
//! Each command line becomes a `STANZA`; lines indented deeper than it are
//! collected into the stanza's `BLOCK`. Lines the lexer could not tokenize
//! become `ERROR` nodes in place. The tree keeps every byte of the input.

use rowan::{GreenNode, GreenNodeBuilder, TextRange, TextSize};

use super::lexer::{Token, tokenize};
use super::syntax_kind::SyntaxKind;
use super::SyntaxNode;

/// Result of parsing one configuration file.
#[derive(Debug, Clone)]
pub struct Parse {
    pub green: GreenNode,
    pub errors: Vec<SyntaxError>,
}

impl Parse {
    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A line the lexer could not classify.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    pub range: TextRange,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, range: TextRange) -> Self {
        Self {
            message: message.into(),
            range,
        }
    }
}

/// Parse configuration text into an outline tree.
pub fn parse(text: &str) -> Parse {
    let tokens = tokenize(text);
    let lines = split_lines(&tokens);
    Parser::new(lines).parse()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    Blank,
    Comment,
    Command,
    Error,
}

struct RawLine<'t, 'a> {
    tokens: &'t [Token<'a>],
    indent: usize,
    kind: LineKind,
}

impl<'t, 'a> RawLine<'t, 'a> {
    fn new(tokens: &'t [Token<'a>]) -> Self {
        let indent = match tokens.first() {
            Some(t) if t.kind == SyntaxKind::WHITESPACE => t.text.len(),
            _ => 0,
        };
        let first = tokens
            .iter()
            .find(|t| t.kind != SyntaxKind::WHITESPACE && t.kind != SyntaxKind::NEWLINE);
        let kind = match first {
            None => LineKind::Blank,
            Some(t) if t.kind == SyntaxKind::COMMENT => LineKind::Comment,
            Some(t) if t.kind == SyntaxKind::WORD && t.text.eq_ignore_ascii_case("banner") => {
                LineKind::Command
            }
            Some(_) if tokens.iter().any(|t| t.kind == SyntaxKind::ERROR) => LineKind::Error,
            Some(_) => LineKind::Command,
        };
        Self {
            tokens,
            indent,
            kind,
        }
    }

    fn range(&self) -> TextRange {
        match (self.tokens.first(), self.tokens.last()) {
            (Some(first), Some(last)) => TextRange::new(
                first.offset,
                last.offset + TextSize::of(last.text),
            ),
            _ => TextRange::empty(TextSize::new(0)),
        }
    }

    fn words(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.tokens
            .iter()
            .filter(|t| t.kind.is_word())
            .map(|t| t.text)
    }

    fn text(&self) -> String {
        self.tokens.iter().map(|t| t.text).collect::<String>()
    }
}

fn split_lines<'t, 'a>(tokens: &'t [Token<'a>]) -> Vec<RawLine<'t, 'a>> {
    let mut lines = Vec::new();
    let mut start = 0;
    for (i, token) in tokens.iter().enumerate() {
        if token.kind == SyntaxKind::NEWLINE {
            lines.push(RawLine::new(&tokens[start..=i]));
            start = i + 1;
        }
    }
    if start < tokens.len() {
        lines.push(RawLine::new(&tokens[start..]));
    }
    lines
}

/// Delimiter that closes a banner opened by `header`, if the body spans
/// further lines. `banner motd ^C text ^C` closes on its own line.
fn banner_delimiter(header: &RawLine<'_, '_>) -> Option<String> {
    let words: Vec<&str> = header.words().collect();
    let opener = words.get(2)?;
    let delim: String = if opener.starts_with('^') && opener.len() >= 2 {
        opener.chars().take(2).collect()
    } else {
        opener.chars().take(1).collect()
    };
    let text = header.text();
    let open_at = text.find(delim.as_str())?;
    let rest = &text[open_at + delim.len()..];
    if rest.contains(delim.as_str()) {
        None
    } else {
        Some(delim)
    }
}

struct OpenStanza {
    indent: usize,
    block_open: bool,
}

struct Parser<'t, 'a> {
    lines: Vec<RawLine<'t, 'a>>,
    builder: GreenNodeBuilder<'static>,
    stack: Vec<OpenStanza>,
    errors: Vec<SyntaxError>,
}

impl<'t, 'a> Parser<'t, 'a> {
    fn new(lines: Vec<RawLine<'t, 'a>>) -> Self {
        Self {
            lines,
            builder: GreenNodeBuilder::new(),
            stack: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn parse(mut self) -> Parse {
        self.builder.start_node(SyntaxKind::SOURCE_FILE.into());
        let lines = std::mem::take(&mut self.lines);
        let mut i = 0;
        while i < lines.len() {
            let line = &lines[i];
            i += 1;
            match line.kind {
                LineKind::Blank | LineKind::Comment => self.tokens(line.tokens),
                LineKind::Error => {
                    self.close_to(line.indent);
                    self.open_block();
                    self.errors
                        .push(SyntaxError::new("unrecognized characters in line", line.range()));
                    self.builder.start_node(SyntaxKind::ERROR.into());
                    self.tokens(line.tokens);
                    self.builder.finish_node();
                }
                LineKind::Command => {
                    self.close_to(line.indent);
                    self.open_block();
                    self.builder.start_node(SyntaxKind::STANZA.into());
                    self.builder.start_node(SyntaxKind::LINE.into());
                    self.tokens(line.tokens);
                    self.builder.finish_node();
                    let is_banner = line
                        .words()
                        .next()
                        .is_some_and(|w| w.eq_ignore_ascii_case("banner"));
                    let delim = if is_banner { banner_delimiter(line) } else { None };
                    if let Some(delim) = delim {
                        self.builder.start_node(SyntaxKind::BANNER_BODY.into());
                        while i < lines.len() {
                            let body = &lines[i];
                            i += 1;
                            self.tokens(body.tokens);
                            if body.text().contains(delim.as_str()) {
                                break;
                            }
                        }
                        self.builder.finish_node();
                    }
                    self.stack.push(OpenStanza {
                        indent: line.indent,
                        block_open: false,
                    });
                }
            }
        }
        self.close_to(0);
        self.builder.finish_node();
        Parse {
            green: self.builder.finish(),
            errors: self.errors,
        }
    }

    fn tokens(&mut self, tokens: &[Token<'_>]) {
        for token in tokens {
            self.builder.token(token.kind.into(), token.text);
        }
    }

    /// Close every open stanza indented at or beyond `indent`.
    fn close_to(&mut self, indent: usize) {
        while let Some(top) = self.stack.last() {
            if top.indent < indent {
                break;
            }
            if top.block_open {
                self.builder.finish_node();
            }
            self.builder.finish_node();
            self.stack.pop();
        }
    }

    /// Make sure the innermost open stanza has a `BLOCK` to receive children.
    fn open_block(&mut self) {
        if let Some(top) = self.stack.last_mut() {
            if !top.block_open {
                self.builder.start_node(SyntaxKind::BLOCK.into());
                top.block_open = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds_of_children(node: &SyntaxNode) -> Vec<SyntaxKind> {
        node.children().map(|c| c.kind()).collect()
    }

    #[test]
    fn test_lossless() {
        let text = "hostname r1\n!\ninterface Ethernet0/1\n ip address 10.0.0.1 255.255.255.0\n";
        assert_eq!(parse(text).syntax().to_string(), text);
    }

    #[test]
    fn test_top_level_stanzas() {
        let parse = parse("hostname r1\nip routing\n");
        assert_eq!(
            kinds_of_children(&parse.syntax()),
            vec![SyntaxKind::STANZA, SyntaxKind::STANZA]
        );
    }

    #[test]
    fn test_indented_lines_become_block() {
        let parse = parse("interface Loopback0\n description x\n shutdown\nhostname r\n");
        let root = parse.syntax();
        let first = root.children().next().unwrap();
        assert_eq!(
            kinds_of_children(&first),
            vec![SyntaxKind::LINE, SyntaxKind::BLOCK]
        );
        let block = first.children().nth(1).unwrap();
        assert_eq!(block.children().count(), 2);
        assert_eq!(root.children().count(), 2);
    }

    #[test]
    fn test_nested_blocks() {
        let parse = parse("router bgp 1\n address-family ipv4\n  neighbor 1.1.1.1 activate\n");
        let root = parse.syntax();
        let depth = root
            .descendants()
            .filter(|n| n.kind() == SyntaxKind::STANZA)
            .count();
        assert_eq!(depth, 3);
    }

    #[test]
    fn test_error_line_recorded() {
        let parse = parse("hostname \"r1\ninterface Loopback0\n");
        assert_eq!(parse.errors.len(), 1);
        assert_eq!(
            kinds_of_children(&parse.syntax()),
            vec![SyntaxKind::ERROR, SyntaxKind::STANZA]
        );
    }

    #[test]
    fn test_banner_body_absorbed() {
        let text = "banner motd ^C\nno \"quotes\" here\n^C\nhostname r1\n";
        let parse = parse(text);
        assert!(parse.ok());
        let root = parse.syntax();
        assert_eq!(root.children().count(), 2);
        assert!(root.descendants().any(|n| n.kind() == SyntaxKind::BANNER_BODY));
        assert_eq!(root.to_string(), text);
    }

    #[test]
    fn test_single_line_banner() {
        let parse = parse("banner login #hello#\nhostname r1\n");
        assert!(!parse.syntax().descendants().any(|n| n.kind() == SyntaxKind::BANNER_BODY));
        assert_eq!(parse.syntax().children().count(), 2);
    }
}
