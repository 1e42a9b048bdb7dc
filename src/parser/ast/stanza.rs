//! Source file, stanza and line wrappers.

use super::*;

// ============================================================================
// Item (stanza or unrecognized line)
// ============================================================================

/// A child of a source file or block: a stanza or an unrecognized line
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Item {
    Stanza(Stanza),
    Error(ErrorLine),
}

impl AstNode for Item {
    fn can_cast(kind: SyntaxKind) -> bool {
        matches!(kind, SyntaxKind::STANZA | SyntaxKind::ERROR)
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::STANZA => Some(Self::Stanza(Stanza(node))),
            SyntaxKind::ERROR => Some(Self::Error(ErrorLine(node))),
            _ => None,
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        match self {
            Self::Stanza(n) => n.syntax(),
            Self::Error(n) => n.syntax(),
        }
    }
}

// ============================================================================
// SourceFile
// ============================================================================

ast_node!(SourceFile, SOURCE_FILE);

impl SourceFile {
    children_method!(items, Item);
    children_method!(stanzas, Stanza);
}

// ============================================================================
// Stanza
// ============================================================================

ast_node!(Stanza, STANZA);

impl Stanza {
    first_child_method!(line, CommandLine);
    first_child_method!(block, Block);
    first_child_method!(banner, BannerBody);

    /// Words of the command line, quotes stripped.
    pub fn words(&self) -> Vec<Word> {
        self.line().map(|l| l.words()).unwrap_or_default()
    }

    /// Command line text without indentation or line ending.
    pub fn text(&self) -> String {
        self.line().map(|l| l.text()).unwrap_or_default()
    }

    /// Leading indentation width of the command line.
    pub fn indent(&self) -> usize {
        self.line().map(|l| l.indent()).unwrap_or(0)
    }

    /// Nested stanzas and unrecognized lines, in source order.
    pub fn items(&self) -> Vec<Item> {
        self.block()
            .map(|b| b.items().collect())
            .unwrap_or_default()
    }

    /// Nested stanzas only.
    pub fn children(&self) -> Vec<Stanza> {
        self.block()
            .map(|b| b.stanzas().collect())
            .unwrap_or_default()
    }

    pub fn has_children(&self) -> bool {
        self.block().is_some_and(|b| b.items().next().is_some())
    }
}

// ============================================================================
// CommandLine
// ============================================================================

ast_node!(CommandLine, LINE);

impl CommandLine {
    pub fn words(&self) -> Vec<Word> {
        self.0
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .filter_map(Word::cast)
            .collect()
    }

    pub fn text(&self) -> String {
        trimmed_text(&self.0)
    }

    pub fn indent(&self) -> usize {
        self.0
            .first_token()
            .filter(|t| t.kind() == SyntaxKind::WHITESPACE)
            .map(|t| t.text().len())
            .unwrap_or(0)
    }
}

// ============================================================================
// Block
// ============================================================================

ast_node!(Block, BLOCK);

impl Block {
    children_method!(items, Item);
    children_method!(stanzas, Stanza);
}

// ============================================================================
// ErrorLine / BannerBody
// ============================================================================

ast_node!(ErrorLine, ERROR);

impl ErrorLine {
    pub fn text(&self) -> String {
        trimmed_text(&self.0)
    }
}

ast_node!(BannerBody, BANNER_BODY);

impl BannerBody {
    /// Raw body text, including the closing delimiter line.
    pub fn text(&self) -> String {
        self.0.text().to_string()
    }
}

// ============================================================================
// Word
// ============================================================================

/// A command word: a bare `WORD` or a `QUOTED` string
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Word(SyntaxToken);

impl AstToken for Word {
    fn can_cast(kind: SyntaxKind) -> bool {
        kind.is_word()
    }

    fn cast(token: SyntaxToken) -> Option<Self> {
        if Self::can_cast(token.kind()) {
            Some(Self(token))
        } else {
            None
        }
    }

    fn syntax(&self) -> &SyntaxToken {
        &self.0
    }
}

impl Word {
    pub fn is_quoted(&self) -> bool {
        self.0.kind() == SyntaxKind::QUOTED
    }

    /// Word text with surrounding double quotes removed.
    pub fn value(&self) -> &str {
        let text = self.0.text();
        if self.is_quoted() && text.len() >= 2 {
            &text[1..text.len() - 1]
        } else {
            text
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn source(text: &str) -> SourceFile {
        SourceFile::cast(parse(text).syntax()).unwrap()
    }

    #[test]
    fn test_words_strip_quotes() {
        let file = source("snmp-server location \"rack 4\"\n");
        let stanza = file.stanzas().next().unwrap();
        let words: Vec<String> = stanza.words().iter().map(|w| w.value().to_string()).collect();
        assert_eq!(words, vec!["snmp-server", "location", "rack 4"]);
    }

    #[test]
    fn test_stanza_children() {
        let file = source("route-map RM permit 10\n match tag 5\n set weight 10\n");
        let stanza = file.stanzas().next().unwrap();
        assert!(stanza.has_children());
        let texts: Vec<String> = stanza.children().iter().map(|c| c.text()).collect();
        assert_eq!(texts, vec!["match tag 5", "set weight 10"]);
    }

    #[test]
    fn test_indent() {
        let file = source("router ospf 1\n  network 10.0.0.0 0.0.0.255 area 0\n");
        let child = file.stanzas().next().unwrap().children().remove(0);
        assert_eq!(child.indent(), 2);
    }

    #[test]
    fn test_error_items_in_order() {
        let file = source("hostname r1\nbad \"line\nhostname r2\n");
        let kinds: Vec<bool> = file.items().map(|i| matches!(i, Item::Error(_))).collect();
        assert_eq!(kinds, vec![false, true, false]);
    }
}
