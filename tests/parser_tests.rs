use pasmm::ast::{Builtin, NodeId, NodeKind, SyntaxTree};
use pasmm::errors::{ErrorKind, PascalError, PascalResult};
use pasmm::frontend::lexer::scan;
use pasmm::frontend::parser::parse;
use pasmm::LineNumber;

const EXAMPLE: &str = "program Example; const Pi: double = 3.14; var x: integer;\n\
                       begin x := 5; write(\"val=\", x); end.";

fn parse_source(source: &str) -> PascalResult<SyntaxTree> {
    let mut state = LineNumber::default();
    let tokens = scan(&mut state, source)?;
    parse(&tokens)
}

fn kinds(tree: &SyntaxTree, ids: impl Iterator<Item = NodeId>) -> Vec<NodeKind> {
    ids.map(|id| tree.node(id).kind).collect()
}

fn texts(tree: &SyntaxTree, id: NodeId) -> Vec<String> {
    tree.node(id).expr.iter().map(|t| t.text.clone()).collect()
}

#[test]
fn test_example_structure() -> PascalResult<()> {
    let tree = parse_source(EXAMPLE)?;
    let root = tree.root().expect("root");
    assert_eq!(tree.node(root).kind, NodeKind::Program);

    let sections: Vec<NodeId> = tree.children(root).collect();
    assert_eq!(
        kinds(&tree, sections.iter().copied()),
        vec![NodeKind::ConstSection, NodeKind::VarSection, NodeKind::MainBlock]
    );

    let consts: Vec<NodeId> = tree.children(sections[0]).collect();
    assert_eq!(consts.len(), 1);
    assert_eq!(tree.node(consts[0]).kind, NodeKind::Declaration);
    assert_eq!(texts(&tree, consts[0]), vec!["pi", ":", "double", "=", "3.14", ";"]);

    let vars: Vec<NodeId> = tree.children(sections[1]).collect();
    assert_eq!(vars.len(), 1);
    assert_eq!(texts(&tree, vars[0]), vec!["x", ":", "integer", ";"]);

    let body: Vec<NodeId> = tree.children(sections[2]).collect();
    assert_eq!(
        kinds(&tree, body.iter().copied()),
        vec![NodeKind::Statement, NodeKind::Call(Builtin::Write)]
    );
    assert_eq!(texts(&tree, body[0]), vec!["x", ":=", "5"]);
    assert_eq!(texts(&tree, body[1]), vec!["write"]);

    let args: Vec<NodeId> = tree.children(body[1]).collect();
    assert_eq!(kinds(&tree, args.iter().copied()), vec![NodeKind::Statement, NodeKind::Statement]);
    assert_eq!(texts(&tree, args[0]), vec!["val="]);
    assert_eq!(texts(&tree, args[1]), vec!["x"]);
    Ok(())
}

#[test]
fn test_tree_display() -> PascalResult<()> {
    let tree = parse_source(EXAMPLE)?;
    let expected = "[PROGRAM]\n\
                    \x20 [CONST_SECTION]\n\
                    \x20   [DECLARATION: pi : double = 3.14 ; ]\n\
                    \x20 [VAR_SECTION]\n\
                    \x20   [DECLARATION: x : integer ; ]\n\
                    \x20 [MAIN_BLOCK]\n\
                    \x20   [STATEMENT: x := 5 ]\n\
                    \x20   [CALL: write ]\n\
                    \x20     [STATEMENT: \"val=\" ]\n\
                    \x20     [STATEMENT: x ]\n";
    assert_eq!(tree.to_string(), expected);
    Ok(())
}

#[test]
fn test_parse_is_deterministic() -> PascalResult<()> {
    let source = "program P; var a, b: double; begin\n\
                  if (a < b) then begin a := 1; b := 2 end else write(a);\n\
                  read(b)\n\
                  end.";
    let mut state = LineNumber::default();
    let tokens = scan(&mut state, source)?;
    let first = parse(&tokens)?;
    let second = parse(&tokens)?;
    assert_eq!(first.len(), second.len());
    assert!(first.iter().eq(second.iter()));
    assert_eq!(first.to_string(), second.to_string());
    Ok(())
}

#[test]
fn test_if_else_links_else_as_sibling() -> PascalResult<()> {
    let source = "program P; var x; begin if 1 then x := 1 else x := 2; x := 3; end.";
    let tree = parse_source(source)?;
    let root = tree.root().expect("root");
    let main_block = tree.children(root).last().expect("main block");
    let body: Vec<NodeId> = tree.children(main_block).collect();
    assert_eq!(
        kinds(&tree, body.iter().copied()),
        vec![NodeKind::If, NodeKind::Else, NodeKind::Statement]
    );
    assert_eq!(texts(&tree, body[0]), vec!["1"]);
    assert_eq!(tree.children(body[0]).count(), 1);
    assert_eq!(tree.children(body[1]).count(), 1);
    assert_eq!(texts(&tree, body[2]), vec!["x", ":=", "3"]);
    Ok(())
}

#[test]
fn test_nested_blocks_in_branches() -> PascalResult<()> {
    let source = "program P; var x; begin\n\
                  if x = 0 then begin x := 1; x := 2; end else begin x := 3 end;\n\
                  end.";
    let tree = parse_source(source)?;
    let root = tree.root().expect("root");
    let main_block = tree.children(root).last().expect("main block");
    let body: Vec<NodeId> = tree.children(main_block).collect();
    assert_eq!(kinds(&tree, body.iter().copied()), vec![NodeKind::If, NodeKind::Else]);
    assert_eq!(tree.children(body[0]).count(), 2);
    assert_eq!(tree.children(body[1]).count(), 1);
    Ok(())
}

#[test]
fn test_sections_in_any_order() -> PascalResult<()> {
    let source = "program P; var x; const c = 1; var y: double; begin end.";
    let tree = parse_source(source)?;
    let root = tree.root().expect("root");
    assert_eq!(
        kinds(&tree, tree.children(root)),
        vec![
            NodeKind::VarSection,
            NodeKind::ConstSection,
            NodeKind::VarSection,
            NodeKind::MainBlock
        ]
    );
    Ok(())
}

#[test]
fn test_missing_program_name() {
    let result = parse_source("program ; begin end.");
    assert!(matches!(result, Err(PascalError::SyntaxError { .. })));
}

#[test]
fn test_missing_semicolon_after_header() {
    let result = parse_source("program P begin end.");
    assert!(matches!(result, Err(PascalError::SyntaxError { ref expected, .. }) if expected == ";"));
}

#[test]
fn test_missing_semicolon_after_declaration() {
    let result = parse_source("program P; var x: integer begin end.");
    assert!(matches!(result, Err(PascalError::SyntaxError { .. })));
}

#[test]
fn test_if_without_then() {
    let result = parse_source("program P; var x; begin if x = 1 x := 2; end.");
    assert!(matches!(result, Err(PascalError::SyntaxError { ref expected, .. }) if expected == "then"));
}

#[test]
fn test_unclosed_block() {
    let result = parse_source("program P; begin write(1);");
    assert!(matches!(result, Err(PascalError::UnclosedBlock { line: 1 })));
}

#[test]
fn test_unmatched_parentheses() {
    let open = parse_source("program P; var x; begin x := (1 + 2; end.");
    assert!(matches!(open, Err(PascalError::UnmatchedParenthesis { paren: '(', .. })));

    let close = parse_source("program P; var x; begin x := 1 + 2); end.");
    assert!(matches!(close, Err(PascalError::UnmatchedParenthesis { paren: ')', .. })));
}

#[test]
fn test_malformed_calls() {
    let empty = parse_source("program P; begin write(); end.");
    assert!(matches!(empty, Err(PascalError::MalformedCall { .. })));

    let trailing_comma = parse_source("program P; begin write(1,); end.");
    assert!(matches!(trailing_comma, Err(PascalError::MalformedCall { .. })));

    let no_paren = parse_source("program P; begin write 1; end.");
    assert!(matches!(no_paren, Err(PascalError::SyntaxError { .. })));

    let missing_semicolon = parse_source("program P; begin write(1) write(2); end.");
    assert!(matches!(missing_semicolon, Err(PascalError::SyntaxError { .. })));
}

#[test]
fn test_trailing_tokens_after_end() {
    let result = parse_source("program P; begin end. extra");
    assert!(matches!(result, Err(PascalError::SyntaxError { .. })));
}

#[test]
fn test_parse_errors_share_kind() {
    for source in ["program ; begin end.", "program P; begin", "program P; begin write(; end."] {
        let err = parse_source(source).expect_err("parse should fail");
        assert_eq!(err.kind(), ErrorKind::Parse, "{}", source);
    }
}
