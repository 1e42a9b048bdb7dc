//! Syntax kinds for the Rowan-based CST
//!
//! This enum defines all possible node and token kinds in the outline tree
//! of a device configuration.

/// All syntax kinds (tokens and nodes) of the configuration outline tree
///
/// Tokens are leaf nodes (words, quoted strings, whitespace).
/// Nodes are composite (stanzas, their command lines and nested blocks).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // =========================================================================
    // TRIVIA (whitespace and comments - preserved but not semantically meaningful)
    // =========================================================================
    WHITESPACE = 0,
    NEWLINE,
    COMMENT, // ! text

    // =========================================================================
    // LITERALS
    // =========================================================================
    WORD,   // interface, 10.0.0.1, GigabitEthernet0/0, 65000:100
    QUOTED, // "some description"

    // =========================================================================
    // NODES
    // =========================================================================
    SOURCE_FILE,
    STANZA,      // one command line plus its nested block
    LINE,        // the command words of a stanza
    BLOCK,       // deeper-indented child stanzas
    BANNER_BODY, // raw lines absorbed by a `banner` command

    // =========================================================================
    // SPECIAL
    // =========================================================================
    ERROR,
    TOMBSTONE,

    #[doc(hidden)]
    __LAST,
}

impl SyntaxKind {
    /// Check if this is a trivia token (whitespace, newline or comment)
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::WHITESPACE | Self::NEWLINE | Self::COMMENT)
    }

    /// Check if this token carries a command word
    pub fn is_word(self) -> bool {
        matches!(self, Self::WORD | Self::QUOTED)
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

impl From<rowan::SyntaxKind> for SyntaxKind {
    fn from(raw: rowan::SyntaxKind) -> Self {
        assert!(raw.0 < SyntaxKind::__LAST as u16);
        // SAFETY: SyntaxKind is repr(u16) and the assert bounds the value
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }
}

/// Language definition for Rowan
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConfigLanguage {}

impl rowan::Language for ConfigLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        raw.into()
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type aliases for convenience
pub type SyntaxNode = rowan::SyntaxNode<ConfigLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<ConfigLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<ConfigLanguage>;
