// Syntax tree for Pascal-- programs.
//
// program    = "program" ident ";" { constSec | varSec } mainBlock ;
// constSec   = "const" declaration { declaration } ;
// varSec     = "var" declaration { declaration } ;
// declaration= ident { "," ident } [ ":" type ] [ "=" expression ] ";" ;
// mainBlock  = "begin" { statement } "end" "." ;
// statement  = ifStmt | callStmt | block | tokens ";" ;
// ifStmt     = "if" expression "then" ( block | statement ) [ "else" ( block | statement ) ] ;
// block      = "begin" { statement } "end" [ ";" ] ;
// callStmt   = ( "read" | "write" ) "(" expression { "," expression } ")" ";" ;
//
// Expressions stay as raw token runs on their nodes; precedence is resolved
// by the evaluator when the node executes.

mod node;
mod tree;

pub use node::{Builtin, Node, NodeId, NodeKind};
pub use tree::{Siblings, SyntaxTree};
