use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Keyword,
    Identifier,
    VarType,
    Number,
    Operator,
    Separator,
    StringLiteral,
    EndOfFile,
    Unknown,
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
        }
    }

    pub fn eof(line: usize) -> Self {
        Self::new(TokenKind::EndOfFile, "", line)
    }

    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.kind == TokenKind::Keyword && self.text == keyword
    }

    pub fn is_separator(&self, separator: &str) -> bool {
        self.kind == TokenKind::Separator && self.text == separator
    }

    pub fn is_operator(&self, operator: &str) -> bool {
        self.kind == TokenKind::Operator && self.text == operator
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        // The line is diagnostic metadata only.
        self.kind == other.kind && self.text == other.text
    }
}

impl Eq for Token {}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::EndOfFile => write!(f, "end of file"),
            TokenKind::StringLiteral => write!(f, "\"{}\"", self.text),
            _ => write!(f, "{}", self.text),
        }
    }
}
