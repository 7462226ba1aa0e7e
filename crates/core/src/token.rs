/// The kinds of token the Nova lexer produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Eof,
    /// Unlexable input; the token text carries the lexer's message
    Error,

    // Type keywords
    Int,
    Float,
    String,
    Bool,
    Void,

    // Literals and names
    Ident,
    IntLiteral,
    FloatLiteral,
    StringLiteral,
    True,
    False,

    // Keywords
    Function,
    Return,
    If,
    Else,
    While,
    For,
    Print,

    // Operators
    Assign,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    And,
    Or,
    Not,

    // Punctuation
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    Semicolon,
    Comma,
    Dot,
}

/// A lexed token with its source position (1-based line and column)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: u32,
    pub column: u32,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
            column,
        }
    }
}
