use crate::ast::{Builtin, NodeId, NodeKind, SyntaxTree};
use crate::config::io::{DISPLAY_PRECISION, NUMERIC_INPUT, READ_PROMPT, WRITE_SEPARATOR};
use crate::errors::{PascalError, PascalResult};
use crate::frontend::token::{Token, TokenKind};
use crate::runtime::evaluator;
use crate::semantic::{NumericKind, SymbolTable, Value};
use log::{debug, info, warn};
use std::io::{self, BufRead, StdinLock, Stdout, Write};

/// Formats an evaluated number for `write` in `%g` style: six significant
/// digits, trailing zeros trimmed, exponent form outside `1e-4 ..= 1e6`.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    let precision = DISPLAY_PRECISION as i32;
    // The exponent is taken after rounding, so 999999.5 becomes 1e+06.
    let scientific = format!("{:.*e}", DISPLAY_PRECISION - 1, value);
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent < -4 || exponent >= precision {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_fraction(mantissa), sign, exponent.abs())
    } else {
        let decimals = (precision - 1 - exponent) as usize;
        trim_fraction(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn trim_fraction(digits: &str) -> &str {
    if digits.contains('.') {
        digits.trim_end_matches('0').trim_end_matches('.')
    } else {
        digits
    }
}

/// Tree-walking interpreter. Owns the symbol table for one program run and
/// talks to the console through `input` and `output`.
pub struct Executor<R, W> {
    symbols: SymbolTable,
    input: R,
    output: W,
}

impl Executor<StdinLock<'static>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Executor<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            symbols: SymbolTable::new(),
            input,
            output,
        }
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Runs a parsed program to completion or to its first error.
    pub fn execute(&mut self, tree: SyntaxTree) -> PascalResult<()> {
        let root = tree
            .root()
            .ok_or_else(|| PascalError::internal_error("empty syntax tree"))?;
        if tree.node(root).kind != NodeKind::Program {
            return Err(PascalError::internal_error(format!(
                "tree root is {}, expected PROGRAM",
                tree.node(root).kind
            )));
        }
        info!("executing program ({} nodes)", tree.len());

        let mut main_block = None;
        for section in tree.children(root) {
            let kind = tree.node(section).kind;
            if main_block.is_some() {
                return Err(PascalError::internal_error(format!("{} after MAIN_BLOCK", kind)));
            }
            match kind {
                NodeKind::ConstSection | NodeKind::VarSection => {
                    debug!("entering {}", kind);
                    for decl in tree.children(section) {
                        self.declaration(&tree, decl)?;
                    }
                }
                NodeKind::MainBlock => main_block = Some(section),
                other => {
                    return Err(PascalError::internal_error(format!("{} directly under PROGRAM", other)));
                }
            }
        }
        let main_block = main_block.ok_or_else(|| PascalError::internal_error("program has no MAIN_BLOCK"))?;

        debug!("entering {}", NodeKind::MainBlock);
        if let Some(first) = tree.node(main_block).child() {
            self.run_chain(&tree, first)?;
        }
        self.output.flush()?;
        info!("program finished, {} symbols declared", self.symbols.len());
        Ok(())
    }

    // Executes `first` and its following siblings in order.
    fn run_chain(&mut self, tree: &SyntaxTree, first: NodeId) -> PascalResult<()> {
        let mut cursor = Some(first);
        while let Some(id) = cursor {
            let node = tree.node(id);
            debug!("executing {} at node {}", node.kind, id.index());
            cursor = node.next();
            match node.kind {
                NodeKind::Statement => self.statement(&node.expr)?,
                NodeKind::If => {
                    let else_node = cursor.filter(|&next| tree.node(next).kind == NodeKind::Else);
                    if let Some(else_id) = else_node {
                        cursor = tree.node(else_id).next();
                    }
                    self.if_statement(tree, id, else_node)?;
                }
                NodeKind::Call(builtin) => self.call(tree, id, builtin)?,
                NodeKind::Else => {
                    return Err(PascalError::internal_error("ELSE reached without a preceding IF"));
                }
                other => {
                    return Err(PascalError::internal_error(format!("{} node inside a block", other)));
                }
            }
        }
        Ok(())
    }

    fn if_statement(&mut self, tree: &SyntaxTree, id: NodeId, else_node: Option<NodeId>) -> PascalResult<()> {
        let condition = evaluator::evaluate(&tree.node(id).expr, &self.symbols)?;
        let branch = if condition != 0.0 {
            Some(id)
        } else {
            else_node
        };
        debug!("condition is {}, taking {}", condition, if condition != 0.0 { "then" } else { "else" });
        match branch.and_then(|branch| tree.node(branch).child()) {
            Some(first) => self.run_chain(tree, first),
            None => Ok(()),
        }
    }

    /**
     * declaration = ident { "," ident } [ ":" type ] [ "=" expression ] ";"
     *
     * `=` makes every listed name a constant, the type defaults to integer,
     * and an untyped constant is a double.
     */
    fn declaration(&mut self, tree: &SyntaxTree, id: NodeId) -> PascalResult<()> {
        let tokens = strip_terminator(&tree.node(id).expr);
        let mut pos = 0;

        let mut names = Vec::new();
        loop {
            match tokens.get(pos) {
                Some(token) if token.kind == TokenKind::Identifier => names.push(token.text.as_str()),
                Some(token) => {
                    return Err(PascalError::declaration_error(format!(
                        "expected identifier, found '{}' at line {}",
                        token, token.line
                    )));
                }
                None => return Err(PascalError::declaration_error("missing identifier")),
            }
            pos += 1;
            match tokens.get(pos) {
                Some(token) if token.is_separator(",") => pos += 1,
                _ => break,
            }
        }

        let mut declared_type = None;
        if tokens.get(pos).is_some_and(|t| t.is_separator(":")) {
            pos += 1;
            let type_token = tokens
                .get(pos)
                .ok_or_else(|| PascalError::declaration_error(format!("missing type after ':' for '{}'", names[0])))?;
            let kind = match type_token.kind {
                TokenKind::VarType | TokenKind::Identifier => NumericKind::from_type_name(&type_token.text),
                _ => None,
            }
            .ok_or_else(|| PascalError::UnknownType {
                name: names[0].to_string(),
                type_name: type_token.text.clone(),
            })?;
            declared_type = Some(kind);
            pos += 1;
        }

        let initializer = match tokens.get(pos) {
            None => None,
            Some(token) if token.is_operator("=") => {
                let value_tokens = &tokens[pos + 1..];
                if value_tokens.iter().any(|t| t.is_separator(":")) {
                    return Err(PascalError::declaration_error(format!(
                        "type of '{}' must come before its value",
                        names[0]
                    )));
                }
                if value_tokens.iter().any(|t| t.is_separator(",")) {
                    return Err(PascalError::declaration_error(format!(
                        "only one value is allowed in the declaration of '{}'; declare each constant separately",
                        names.join(", ")
                    )));
                }
                if value_tokens.is_empty() {
                    return Err(PascalError::declaration_error(format!("missing value for '{}'", names[0])));
                }
                Some(evaluator::evaluate(value_tokens, &self.symbols)?)
            }
            Some(token) => {
                return Err(PascalError::declaration_error(format!(
                    "unexpected '{}' in declaration of '{}' at line {}",
                    token, names[0], token.line
                )));
            }
        };

        let is_constant = initializer.is_some();
        let kind = match (declared_type, is_constant) {
            (Some(kind), _) => kind,
            (None, true) => NumericKind::Double,
            (None, false) => NumericKind::Integer,
        };
        let value = Value::coerce(initializer.unwrap_or(0.0), kind);
        for name in names {
            debug!(
                "declaring {} '{}' = {}{}",
                kind.name(),
                name,
                value,
                if is_constant { " (constant)" } else { "" }
            );
            self.symbols.declare(name, value, is_constant)?;
        }
        Ok(())
    }

    fn statement(&mut self, expr: &[Token]) -> PascalResult<()> {
        let tokens = strip_terminator(expr);
        match tokens {
            [] => Ok(()),
            [target, assign, rhs @ ..] if target.kind == TokenKind::Identifier && assign.is_operator(":=") => {
                let name = target.text.as_str();
                if !self.symbols.contains(name) {
                    return Err(PascalError::UndefinedSymbol { name: name.to_string() });
                }
                if self.symbols.is_constant(name)? {
                    return Err(PascalError::AssignmentToConstant { name: name.to_string() });
                }
                let value = evaluator::evaluate(rhs, &self.symbols)?;
                debug!("{} := {}", name, value);
                self.symbols.store(name, value)
            }
            _ => {
                let value = evaluator::evaluate(tokens, &self.symbols)?;
                warn!(
                    "expression statement at line {} has no effect (value {})",
                    tokens[0].line,
                    format_number(value)
                );
                Ok(())
            }
        }
    }

    fn call(&mut self, tree: &SyntaxTree, id: NodeId, builtin: Builtin) -> PascalResult<()> {
        let args: Vec<&[Token]> = tree
            .children(id)
            .map(|arg| strip_terminator(&tree.node(arg).expr))
            .collect();
        match builtin {
            Builtin::Read => self.read(&args),
            Builtin::Write => self.write(&args),
        }
    }

    fn read(&mut self, args: &[&[Token]]) -> PascalResult<()> {
        let target = match args {
            [[token]] if token.kind == TokenKind::Identifier => token,
            _ => {
                return Err(PascalError::MalformedCall {
                    name: Builtin::Read.name().to_string(),
                    message: "expected exactly one identifier".to_string(),
                    line: args.first().and_then(|arg| arg.first()).map_or(0, |t| t.line),
                });
            }
        };
        let name = target.text.as_str();
        if !self.symbols.contains(name) {
            return Err(PascalError::UndefinedSymbol { name: name.to_string() });
        }
        if self.symbols.is_constant(name)? {
            return Err(PascalError::AssignmentToConstant { name: name.to_string() });
        }

        write!(self.output, "{} {}: ", READ_PROMPT, name)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(PascalError::InvalidInput {
                input: "<end of input>".to_string(),
            });
        }
        let input = line.trim();
        if !NUMERIC_INPUT.is_match(input) {
            return Err(PascalError::InvalidInput { input: input.to_string() });
        }
        let value = input
            .parse::<f64>()
            .map_err(|_| PascalError::InvalidInput { input: input.to_string() })?;
        debug!("read {} into '{}'", value, name);
        self.symbols.store(name, value)
    }

    fn write(&mut self, args: &[&[Token]]) -> PascalResult<()> {
        let mut parts = Vec::with_capacity(args.len());
        for arg in args {
            match arg {
                [literal] if literal.kind == TokenKind::StringLiteral => parts.push(literal.text.clone()),
                _ => parts.push(format_number(evaluator::evaluate(arg, &self.symbols)?)),
            }
        }
        writeln!(self.output, "{}", parts.join(WRITE_SEPARATOR))?;
        Ok(())
    }
}

fn strip_terminator(tokens: &[Token]) -> &[Token] {
    match tokens {
        [rest @ .., last] if last.is_separator(";") => rest,
        _ => tokens,
    }
}
