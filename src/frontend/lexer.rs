use crate::config::lexer::{KEYWORDS, ONE_CHAR_OPERATORS, SEPARATORS, TWO_CHAR_OPERATORS};
use crate::errors::{PascalError, PascalResult};
use crate::frontend::token::{Token, TokenKind};
use crate::LineNumber;
use std::{iter::Peekable, str::Chars};

pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    state: &'a mut LineNumber,
}

impl<'a> Lexer<'a> {
    pub fn new(file_content: &'a str, state: &'a mut LineNumber) -> Self {
        Self {
            chars: file_content.chars().peekable(),
            state,
        }
    }

    pub fn scan(mut self) -> PascalResult<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            self.skip_whitespace_and_comments()?;
            if self.chars.peek().is_none() {
                break;
            }
            let line = self.state.line;
            let (kind, text) = self.scan_token()?;
            tokens.push(Token::new(kind, text, line));
        }
        tokens.push(Token::eof(self.state.line));
        Ok(tokens)
    }

    fn skip_whitespace_and_comments(&mut self) -> PascalResult<()> {
        loop {
            match self.chars.peek() {
                Some(&'{') => self.scan_comment()?,
                Some(&ch) if ch.is_whitespace() => self.scan_whitespace(),
                _ => break,
            }
        }
        Ok(())
    }

    fn scan_token(&mut self) -> PascalResult<(TokenKind, String)> {
        match self.chars.peek() {
            Some(&ch) if ch.is_alphabetic() || ch == '_' => Ok(self.scan_identifier()),
            Some(&ch) if ch.is_ascii_digit() => Ok(self.scan_number()),
            Some(&'"') => self.scan_string_literal('"'),
            Some(&'\'') => self.scan_string_literal('\''),
            Some(&ch) => Ok(self.scan_operator_or_separator(ch)),
            None => Err(PascalError::lexer_error("unexpected end of input", self.state.line)),
        }
    }

    fn scan_comment(&mut self) -> PascalResult<()> {
        self.chars.next(); // Consume '{'
        let start_line = self.state.line;
        while let Some(ch) = self.chars.next() {
            if ch == '\n' {
                self.state.line += 1;
            } else if ch == '}' {
                return Ok(());
            }
        }
        Err(PascalError::UnterminatedComment { line: start_line })
    }

    fn scan_whitespace(&mut self) {
        while let Some(&ch) = self.chars.peek() {
            if !ch.is_whitespace() {
                break;
            }
            if ch == '\n' {
                self.state.line += 1;
            }
            self.chars.next();
        }
    }

    fn scan_identifier(&mut self) -> (TokenKind, String) {
        let mut identifier = String::new();
        while let Some(&ch) = self.chars.peek() {
            if ch.is_alphanumeric() || ch == '_' {
                identifier.push(ch);
                self.chars.next();
            } else {
                break;
            }
        }
        let identifier = identifier.to_lowercase();
        let kind = KEYWORDS
            .get(identifier.as_str())
            .copied()
            .unwrap_or(TokenKind::Identifier);
        (kind, identifier)
    }

    fn scan_number(&mut self) -> (TokenKind, String) {
        let mut number = self.scan_digits();
        // A '.' belongs to the number only when a digit follows it, so `end.` and `5.` stay apart.
        if self.chars.peek() == Some(&'.') {
            let mut ahead = self.chars.clone();
            ahead.next();
            if ahead.peek().is_some_and(|ch| ch.is_ascii_digit()) {
                self.chars.next();
                number.push('.');
                number.push_str(&self.scan_digits());
            }
        }
        (TokenKind::Number, number)
    }

    fn scan_digits(&mut self) -> String {
        let mut digits = String::new();
        while let Some(&ch) = self.chars.peek() {
            if !ch.is_ascii_digit() {
                break;
            }
            digits.push(ch);
            self.chars.next();
        }
        digits
    }

    fn scan_string_literal(&mut self, quote_char: char) -> PascalResult<(TokenKind, String)> {
        self.chars.next(); // Consume opening quote
        let mut literal = String::new();
        loop {
            match self.chars.peek() {
                Some(&ch) if ch == quote_char => {
                    self.chars.next();
                    break;
                }
                Some(&'\n') => {
                    self.state.line += 1;
                    return Err(PascalError::MultilineString { line: self.state.line });
                }
                Some(&ch) => {
                    literal.push(ch);
                    self.chars.next();
                }
                None => {
                    return Err(PascalError::UnterminatedString { line: self.state.line });
                }
            }
        }
        Ok((TokenKind::StringLiteral, literal))
    }

    fn scan_operator_or_separator(&mut self, ch: char) -> (TokenKind, String) {
        self.chars.next();
        if let Some(&next) = self.chars.peek() {
            let pair: String = [ch, next].iter().collect();
            if TWO_CHAR_OPERATORS.contains(&pair.as_str()) {
                self.chars.next();
                return (TokenKind::Operator, pair);
            }
        }
        let kind = if ONE_CHAR_OPERATORS.contains(&ch) {
            TokenKind::Operator
        } else if SEPARATORS.contains(&ch) {
            TokenKind::Separator
        } else {
            TokenKind::Unknown
        };
        (kind, ch.to_string())
    }
}

pub fn scan(state: &mut LineNumber, file_content: &str) -> PascalResult<Vec<Token>> {
    let lexer = Lexer::new(file_content, state);
    lexer.scan()
}
