use std::fmt;
use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PascalError {
    // File and I/O errors
    #[error("File read error: {0}")]
    FileReadError(String),
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    // Lexical analysis errors
    #[error("Lexer error at line {line}: {message}")]
    LexerError { message: String, line: usize },
    #[error("Unterminated comment at line {line}")]
    UnterminatedComment { line: usize },
    #[error("Unterminated string literal at line {line}")]
    UnterminatedString { line: usize },
    #[error("Multiline string literals not supported at line {line}")]
    MultilineString { line: usize },

    // Parsing errors
    #[error("Syntax error at line {line}: expected '{expected}', found '{found}'")]
    SyntaxError {
        expected: String,
        found: String,
        line: usize,
    },
    #[error("Unclosed block at line {line}: 'begin' has no matching 'end'")]
    UnclosedBlock { line: usize },
    #[error("Unmatched '{paren}' at line {line}")]
    UnmatchedParenthesis { paren: char, line: usize },
    #[error("Malformed argument list for '{name}' at line {line}: {message}")]
    MalformedCall {
        name: String,
        message: String,
        line: usize,
    },

    // Declaration errors
    #[error("Invalid declaration: {message}")]
    DeclarationError { message: String },
    #[error("Symbol '{name}' is already declared")]
    SymbolAlreadyDefined { name: String },
    #[error("Unknown type '{type_name}' for '{name}'")]
    UnknownType { name: String, type_name: String },

    // Name resolution and mutability errors
    #[error("Undeclared identifier '{name}'")]
    UndefinedSymbol { name: String },
    #[error("Cannot modify constant '{name}'")]
    AssignmentToConstant { name: String },

    // Expression evaluation errors
    #[error("Division by zero in '{operator}'")]
    DivisionByZero { operator: String },
    #[error("Not enough operands for operator '{operator}'")]
    MissingOperand { operator: String },
    #[error("Unknown operator '{operator}'")]
    UnknownOperator { operator: String },
    #[error("Mismatched parentheses in expression")]
    MismatchedParenthesis,
    #[error("Invalid expression: {message}")]
    ExpressionError { message: String },

    // Console input errors
    #[error("Invalid input '{input}': expected a number")]
    InvalidInput { input: String },

    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Coarse classification of a [`PascalError`], used when reporting a failed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Io,
    Lexical,
    Parse,
    Declaration,
    NameResolution,
    Mutability,
    Arithmetic,
    Expression,
    InputFormat,
    InternalConsistency,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Io => "IoError",
            ErrorKind::Lexical => "LexicalError",
            ErrorKind::Parse => "ParseError",
            ErrorKind::Declaration => "DeclarationError",
            ErrorKind::NameResolution => "NameResolutionError",
            ErrorKind::Mutability => "MutabilityError",
            ErrorKind::Arithmetic => "ArithmeticError",
            ErrorKind::Expression => "ExpressionError",
            ErrorKind::InputFormat => "InputFormatError",
            ErrorKind::InternalConsistency => "InternalConsistencyError",
        };
        f.write_str(name)
    }
}

impl PascalError {
    /// Create a lexer error with line information
    pub fn lexer_error(message: impl Into<String>, line: usize) -> Self {
        PascalError::LexerError {
            message: message.into(),
            line,
        }
    }

    /// Create a syntax error
    pub fn syntax_error(expected: impl Into<String>, found: impl Into<String>, line: usize) -> Self {
        PascalError::SyntaxError {
            expected: expected.into(),
            found: found.into(),
            line,
        }
    }

    pub fn declaration_error(message: impl Into<String>) -> Self {
        PascalError::DeclarationError {
            message: message.into(),
        }
    }

    pub fn expression_error(message: impl Into<String>) -> Self {
        PascalError::ExpressionError {
            message: message.into(),
        }
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        PascalError::InternalError(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            PascalError::FileReadError(_) | PascalError::IoError(_) => ErrorKind::Io,
            PascalError::LexerError { .. }
            | PascalError::UnterminatedComment { .. }
            | PascalError::UnterminatedString { .. }
            | PascalError::MultilineString { .. } => ErrorKind::Lexical,
            PascalError::SyntaxError { .. }
            | PascalError::UnclosedBlock { .. }
            | PascalError::UnmatchedParenthesis { .. }
            | PascalError::MalformedCall { .. } => ErrorKind::Parse,
            PascalError::DeclarationError { .. }
            | PascalError::SymbolAlreadyDefined { .. }
            | PascalError::UnknownType { .. } => ErrorKind::Declaration,
            PascalError::UndefinedSymbol { .. } => ErrorKind::NameResolution,
            PascalError::AssignmentToConstant { .. } => ErrorKind::Mutability,
            PascalError::DivisionByZero { .. } => ErrorKind::Arithmetic,
            PascalError::MissingOperand { .. }
            | PascalError::UnknownOperator { .. }
            | PascalError::MismatchedParenthesis
            | PascalError::ExpressionError { .. } => ErrorKind::Expression,
            PascalError::InvalidInput { .. } => ErrorKind::InputFormat,
            PascalError::InternalError(_) => ErrorKind::InternalConsistency,
        }
    }
}

// Type alias for Result with PascalError
pub type PascalResult<T> = Result<T, PascalError>;
