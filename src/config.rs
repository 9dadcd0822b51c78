// Symbol table constants
pub mod symbols {
    // Bucket count used by SymbolTable::new()
    pub const DEFAULT_BUCKET_COUNT: usize = 10;
}

// Tokenizer tables
pub mod lexer {
    use crate::frontend::token::TokenKind;
    use lazy_static::lazy_static;
    use std::collections::HashMap;

    lazy_static! {
        /// Reserved words, keyed by their lower-case spelling.
        pub static ref KEYWORDS: HashMap<&'static str, TokenKind> = [
            ("program", TokenKind::Keyword),
            ("const", TokenKind::Keyword),
            ("var", TokenKind::Keyword),
            ("begin", TokenKind::Keyword),
            ("end", TokenKind::Keyword),
            ("if", TokenKind::Keyword),
            ("then", TokenKind::Keyword),
            ("else", TokenKind::Keyword),
            ("read", TokenKind::Keyword),
            ("write", TokenKind::Keyword),
            ("integer", TokenKind::VarType),
            ("double", TokenKind::VarType),
            ("div", TokenKind::Operator),
            ("mod", TokenKind::Operator),
            ("and", TokenKind::Operator),
            ("or", TokenKind::Operator),
            ("not", TokenKind::Operator),
        ]
        .into_iter()
        .collect();
    }

    pub const TWO_CHAR_OPERATORS: [&str; 4] = [":=", "<>", "<=", ">="];
    pub const ONE_CHAR_OPERATORS: [char; 7] = ['+', '-', '*', '/', '=', '<', '>'];
    pub const SEPARATORS: [char; 6] = ['(', ')', ';', '.', ',', ':'];
}

// Operator-precedence parsing
pub mod evaluator {
    use lazy_static::lazy_static;
    use std::collections::HashMap;

    // Spellings the evaluator gives prefix sign operators in postfix output.
    pub const UNARY_MINUS: &str = "u-";
    pub const UNARY_PLUS: &str = "u+";
    pub const UNARY_PRECEDENCE: u8 = 6;

    lazy_static! {
        pub static ref PRECEDENCE: HashMap<&'static str, u8> = [
            ("or", 1),
            ("and", 2),
            ("=", 3),
            ("<>", 3),
            ("<", 3),
            (">", 3),
            ("<=", 3),
            (">=", 3),
            ("+", 4),
            ("-", 4),
            ("*", 5),
            ("/", 5),
            ("div", 5),
            ("mod", 5),
            ("not", UNARY_PRECEDENCE),
            (UNARY_MINUS, UNARY_PRECEDENCE),
            (UNARY_PLUS, UNARY_PRECEDENCE),
        ]
        .into_iter()
        .collect();
    }

    pub fn precedence(op: &str) -> Option<u8> {
        PRECEDENCE.get(op).copied()
    }

    pub fn is_unary(op: &str) -> bool {
        matches!(op, "not" | UNARY_MINUS | UNARY_PLUS)
    }
}

// Console I/O performed by read/write calls
pub mod io {
    use lazy_static::lazy_static;
    use regex::Regex;

    pub const READ_PROMPT: &str = "Enter value for";
    pub const WRITE_SEPARATOR: &str = " ";
    // Significant digits printed by write
    pub const DISPLAY_PRECISION: usize = 6;

    lazy_static! {
        pub static ref NUMERIC_INPUT: Regex =
            Regex::new(r"^[+-]?(\d+(\.\d*)?|\.\d+)([eE][+-]?\d+)?$").expect("numeric input pattern");
    }
}
