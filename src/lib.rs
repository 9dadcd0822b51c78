use std::{fs::File, io::Read, path::Path};

pub mod ast;
pub mod config;
pub mod errors;
pub mod frontend;
pub mod runtime;
pub mod semantic;

pub const VERSION: &str = "0.1.0";

pub struct LineNumber {
    pub line: usize,
}

impl Default for LineNumber {
    fn default() -> Self {
        Self { line: 1 }
    }
}

use crate::errors::{PascalError, PascalResult};
use crate::runtime::Executor;
use std::io::{BufRead, Write};

pub fn read(filename: &Path) -> PascalResult<String> {
    match filename.extension() {
        Some(ext) if ext == "pas" => {}
        _ => return Err(PascalError::FileReadError("File must have a .pas extension".to_string())),
    }
    let mut file = File::open(filename)?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Scans, parses and executes `source` against the given console streams.
pub fn run_source<R: BufRead, W: Write>(source: &str, input: R, output: W) -> PascalResult<W> {
    let mut state = LineNumber::default();
    let tokens = frontend::lexer::scan(&mut state, source)?;
    let tree = frontend::parser::parse(&tokens)?;
    let mut executor = Executor::new(input, output);
    executor.execute(tree)?;
    Ok(executor.into_output())
}
