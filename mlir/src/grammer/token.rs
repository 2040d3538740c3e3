#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub pos: Pos,
    pub end: usize, // byte offset just past the lexeme
}

impl Token {
    pub fn new(kind: TokenKind, pos: Pos, end: usize) -> Self {
        Token { kind, pos, end }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Double character tokens
    Arrow, // '->'
    LProp, // '<{'

    // Single character tokens
    Equal,    // '='
    Colon,    // ':'
    Comma,    // ','
    Question, // '?'
    Star,     // '*'
    Plus,     // '+'
    Minus,    // '-'
    LParen,   // '('
    RParen,   // ')'
    LBracket, // '['
    RBracket, // ']'
    LCurly,   // '{'
    RCurly,   // '}'
    LAngle,   // '<'
    RAngle,   // '>'

    // Sigiled identifiers
    Value(String), // '%' suffix-id [ '#' digits ]
    Hash(String),  // '#' suffix-id
    Caret(String), // '^' suffix-id
    Bang(String),  // '!' suffix-id
    At(String),    // '@' suffix-id | '@' string

    // Identifier
    Ident(String),

    // Literals
    Number(String),
    Text(String),

    // Special
    Comment(String), // Comment
    Error(String),   // Error
}

/// Location of a token inside the statement text. `row` and `col` are
/// 0-based; `offset` is the byte offset from the start of the statement.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
    pub offset: usize,
}
