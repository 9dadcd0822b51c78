use crate::ast::{Builtin, NodeId, NodeKind, SyntaxTree};
use crate::errors::{PascalError, PascalResult};
use crate::frontend::token::{Token, TokenKind};
use log::debug;

/// Recursive-descent parser that recognises statement and declaration
/// boundaries and stores each construct's raw tokens on its tree node.
pub struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    eof: Token,
    tree: SyntaxTree,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        let last_line = tokens.last().map_or(1, |token| token.line);
        Self {
            tokens,
            pos: 0,
            eof: Token::eof(last_line),
            tree: SyntaxTree::new(),
        }
    }

    fn current(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&self.eof)
    }

    fn line(&self) -> usize {
        self.current().line
    }

    fn next(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
    }

    fn at_keyword(&self, keyword: &str) -> bool {
        self.current().is_keyword(keyword)
    }

    fn at_separator(&self, separator: &str) -> bool {
        self.current().is_separator(separator)
    }

    fn at_eof(&self) -> bool {
        self.current().kind == TokenKind::EndOfFile
    }

    fn unexpected(&self, expected: &str) -> PascalError {
        PascalError::syntax_error(expected, self.current().to_string(), self.line())
    }

    fn expect_keyword(&mut self, keyword: &str) -> PascalResult<()> {
        if !self.at_keyword(keyword) {
            return Err(self.unexpected(keyword));
        }
        self.next();
        Ok(())
    }

    fn expect_separator(&mut self, separator: &str) -> PascalResult<()> {
        if !self.at_separator(separator) {
            return Err(self.unexpected(separator));
        }
        self.next();
        Ok(())
    }

    fn expect_ident(&mut self, what: &str) -> PascalResult<()> {
        if self.current().kind != TokenKind::Identifier {
            return Err(self.unexpected(what));
        }
        self.next();
        Ok(())
    }

    fn add_child(&mut self, parent: NodeId, kind: NodeKind, expr: Vec<Token>) -> PascalResult<NodeId> {
        let id = self.tree.add_node(kind, expr);
        self.tree.append_child(parent, id)?;
        debug!("parsed {} node at line {}", kind, self.line());
        Ok(id)
    }

    /// Collects tokens up to the first one at parenthesis depth zero accepted
    /// by `is_end`, which is left as the current token.
    fn collect_until(&mut self, expected: &str, is_end: impl Fn(&Token) -> bool) -> PascalResult<Vec<Token>> {
        let mut run = Vec::new();
        let mut depth = 0usize;
        loop {
            let token = self.current();
            if depth == 0 && is_end(token) {
                return Ok(run);
            }
            let unclosed = PascalError::UnmatchedParenthesis {
                paren: '(',
                line: token.line,
            };
            match token.kind {
                TokenKind::EndOfFile | TokenKind::Keyword => {
                    return Err(if depth > 0 { unclosed } else { self.unexpected(expected) });
                }
                TokenKind::Separator if token.text == "(" => depth += 1,
                TokenKind::Separator if token.text == ")" => {
                    if depth == 0 {
                        return Err(PascalError::UnmatchedParenthesis {
                            paren: ')',
                            line: token.line,
                        });
                    }
                    depth -= 1;
                }
                TokenKind::Separator if token.text == ";" => {
                    return Err(if depth > 0 { unclosed } else { self.unexpected(expected) });
                }
                _ => {}
            }
            run.push(token.clone());
            self.next();
        }
    }

    /**
     * program = "program" ident ";" { constSec | varSec } mainBlock
     */
    fn program(&mut self) -> PascalResult<()> {
        let root = self.tree.add_node(NodeKind::Program, Vec::new());
        self.expect_keyword("program")?;
        self.expect_ident("program name")?;
        self.expect_separator(";")?;

        loop {
            if self.at_keyword("const") {
                self.section(root, NodeKind::ConstSection)?;
            } else if self.at_keyword("var") {
                self.section(root, NodeKind::VarSection)?;
            } else if self.at_keyword("begin") {
                break;
            } else {
                return Err(self.unexpected("const, var or begin"));
            }
        }

        let begin_line = self.line();
        self.next();
        let main_block = self.add_child(root, NodeKind::MainBlock, Vec::new())?;
        self.block_body(main_block, begin_line)?;
        self.expect_separator(".")?;
        if !self.at_eof() {
            return Err(self.unexpected("end of file"));
        }
        Ok(())
    }

    /**
     * constSec = "const" declaration { declaration }
     * varSec   = "var" declaration { declaration }
     */
    fn section(&mut self, root: NodeId, kind: NodeKind) -> PascalResult<()> {
        self.next(); // Skip 'const' / 'var'
        let section = self.add_child(root, kind, Vec::new())?;
        loop {
            if self.current().kind != TokenKind::Identifier {
                return Err(self.unexpected("identifier"));
            }
            self.declaration(section)?;
            if self.at_keyword("const") || self.at_keyword("var") || self.at_keyword("begin") {
                return Ok(());
            }
        }
    }

    /**
     * declaration = ident { "," ident } [ ":" type ] [ "=" expression ] ";"
     *
     * Only the boundary is checked here; the executor interprets the run.
     */
    fn declaration(&mut self, section: NodeId) -> PascalResult<()> {
        let decl = self.collect_until("';'", |token| token.is_separator(";"))?;
        let terminator = self.current().clone();
        self.next();
        let node = self.add_child(section, NodeKind::Declaration, decl)?;
        self.tree.push_expr(node, terminator);
        Ok(())
    }

    /**
     * Statements up to and including the closing "end".
     */
    fn block_body(&mut self, parent: NodeId, begin_line: usize) -> PascalResult<()> {
        loop {
            if self.at_eof() {
                return Err(PascalError::UnclosedBlock { line: begin_line });
            }
            if self.at_keyword("end") {
                self.next();
                return Ok(());
            }
            self.statement(parent)?;
        }
    }

    /**
     * statement = ifStmt | callStmt | block | tokens ";"
     */
    fn statement(&mut self, parent: NodeId) -> PascalResult<()> {
        let token = self.current().clone();
        if token.kind == TokenKind::Keyword {
            return match token.text.as_str() {
                "if" => self.if_statement(parent),
                "read" | "write" => self.call(parent),
                "begin" => self.nested_block(parent),
                _ => Err(self.unexpected("statement")),
            };
        }
        if self.at_separator(";") {
            // Empty statement
            self.next();
            return Ok(());
        }

        let stmt = self.collect_until("';'", |token| {
            token.is_separator(";") || token.is_keyword("else") || token.is_keyword("end")
        })?;
        if self.at_separator(";") {
            self.next();
        }
        self.add_child(parent, NodeKind::Statement, stmt)?;
        Ok(())
    }

    // A begin/end block used as a statement contributes its statements to the enclosing node.
    fn nested_block(&mut self, parent: NodeId) -> PascalResult<()> {
        let begin_line = self.line();
        self.next();
        self.block_body(parent, begin_line)?;
        if self.at_separator(";") {
            self.next();
        }
        Ok(())
    }

    /**
     * ifStmt = "if" expression "then" ( block | statement ) [ "else" ( block | statement ) ]
     */
    fn if_statement(&mut self, parent: NodeId) -> PascalResult<()> {
        self.next(); // Skip 'if'
        if self.at_keyword("then") {
            return Err(self.unexpected("condition"));
        }
        let condition = self.collect_until("then", |token| token.is_keyword("then") || token.is_separator(";"))?;
        if !self.at_keyword("then") {
            return Err(self.unexpected("then"));
        }
        self.next(); // Skip 'then'

        let if_node = self.add_child(parent, NodeKind::If, condition)?;
        self.branch(if_node)?;

        if self.at_keyword("else") {
            self.next();
            // Nothing has been appended to `parent` since the If node, so Else lands right after it.
            let else_node = self.add_child(parent, NodeKind::Else, Vec::new())?;
            self.branch(else_node)?;
        }
        Ok(())
    }

    fn branch(&mut self, owner: NodeId) -> PascalResult<()> {
        if self.at_keyword("else") || self.at_keyword("end") {
            return Ok(());
        }
        self.statement(owner)
    }

    /**
     * callStmt = ( "read" | "write" ) "(" expression { "," expression } ")" ";"
     */
    fn call(&mut self, parent: NodeId) -> PascalResult<()> {
        let name = self.current().clone();
        let builtin = Builtin::from_name(&name.text)
            .ok_or_else(|| PascalError::internal_error(format!("'{}' is not a built-in", name.text)))?;
        self.next();
        self.expect_separator("(")?;

        let call_node = self.add_child(parent, NodeKind::Call(builtin), vec![name.clone()])?;
        loop {
            let arg = self.collect_until("')'", |token| token.is_separator(",") || token.is_separator(")"));
            let arg = match arg {
                Ok(arg) => arg,
                Err(PascalError::SyntaxError { found, line, .. }) => {
                    return Err(PascalError::MalformedCall {
                        name: name.text.clone(),
                        message: format!("unexpected '{}'", found),
                        line,
                    });
                }
                Err(err) => return Err(err),
            };
            if arg.is_empty() {
                return Err(PascalError::MalformedCall {
                    name: name.text.clone(),
                    message: "empty argument".to_string(),
                    line: self.line(),
                });
            }
            self.add_child(call_node, NodeKind::Statement, arg)?;
            if self.at_separator(",") {
                self.next();
                continue;
            }
            self.next(); // Skip ')'
            break;
        }

        if self.at_separator(";") {
            self.next();
        } else if !(self.at_keyword("else") || self.at_keyword("end")) {
            return Err(self.unexpected(";"));
        }
        Ok(())
    }

    pub fn parse(mut self) -> PascalResult<SyntaxTree> {
        self.program()?;
        Ok(self.tree)
    }
}

pub fn parse(tokens: &[Token]) -> PascalResult<SyntaxTree> {
    Parser::new(tokens).parse()
}
