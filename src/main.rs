use clap::Parser;
use log::{info, LevelFilter};
use pasmm::{
    self, ast::SyntaxTree, errors::PascalResult, frontend::lexer::scan, frontend::token::Token, read,
    runtime::Executor,
};
use std::{path::PathBuf, time::Instant};

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Interpreter for Pascal--, a minimal Pascal-like language",
    long_about = "Interpreter for Pascal--, a minimal Pascal-like language.\n\
                 Source is tokenized, parsed into a syntax tree and executed directly.\n\
                 \n\
                 Example usage:\n\
                 pasmm input.pas                    # Run a program\n\
                 pasmm input.pas --show-tokens      # Print the token stream\n\
                 pasmm input.pas --show-ast         # Print the syntax tree\n\
                 pasmm input.pas --show-symbols     # Print the symbol table after the run\n\
                 pasmm input.pas --verbose          # Debug logging\n\
                 pasmm input.pas --timing           # Show per-phase timing"
)]
struct Cli {
    // The path to the program to run
    path: PathBuf,

    // Print tokens after scanning
    #[arg(long)]
    show_tokens: bool,

    // Print the syntax tree after parsing
    #[arg(long)]
    show_ast: bool,

    // Print the symbol table after execution
    #[arg(long)]
    show_symbols: bool,

    // Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    // Show run timing
    #[arg(short, long)]
    timing: bool,
}

#[derive(Debug, Default)]
struct RunStats {
    lexer_time: f64,
    parser_time: f64,
    execution_time: f64,
    total_time: f64,
    token_count: usize,
    ast_size: usize,
}

fn lexical_analysis(source: &str, stats: &mut RunStats) -> PascalResult<Vec<Token>> {
    let lexer_start = Instant::now();
    let mut state = pasmm::LineNumber::default();
    let tokens = scan(&mut state, source)?;
    stats.lexer_time = lexer_start.elapsed().as_secs_f64();
    stats.token_count = tokens.len();
    info!("scanned {} tokens in {:.3}s", stats.token_count, stats.lexer_time);
    Ok(tokens)
}

fn parsing_phase(tokens: &[Token], stats: &mut RunStats) -> PascalResult<SyntaxTree> {
    let parser_start = Instant::now();
    let tree = pasmm::frontend::parser::parse(tokens)?;
    stats.parser_time = parser_start.elapsed().as_secs_f64();
    stats.ast_size = tree.len();
    info!("parsed {} nodes in {:.3}s", stats.ast_size, stats.parser_time);
    Ok(tree)
}

fn run(args: &Cli) -> PascalResult<RunStats> {
    let start_time = Instant::now();
    let mut stats = RunStats::default();

    let source = read(&args.path)?;
    info!("read {} bytes from {}", source.len(), args.path.display());

    let tokens = lexical_analysis(&source, &mut stats)?;
    if args.show_tokens {
        println!("Tokens:");
        for token in &tokens {
            println!("  {:>4}  {:<14} {}", token.line, format!("{:?}", token.kind), token);
        }
    }

    let tree = parsing_phase(&tokens, &mut stats)?;
    if args.show_ast {
        println!("Syntax Tree:");
        print!("{}", tree);
    }

    let execution_start = Instant::now();
    let mut executor = Executor::stdio();
    executor.execute(tree)?;
    stats.execution_time = execution_start.elapsed().as_secs_f64();

    if args.show_symbols {
        executor.symbols().print_symbols();
    }

    stats.total_time = start_time.elapsed().as_secs_f64();
    Ok(stats)
}

fn print_stats(stats: &RunStats) {
    println!("\nRun Statistics:");
    println!("┌─────────────────────┬───────────┐");
    println!("│ Phase               │ Time (s)  │");
    println!("├─────────────────────┼───────────┤");
    println!("│ Lexical Analysis    │ {:>9.3} │", stats.lexer_time);
    println!("│ Parsing             │ {:>9.3} │", stats.parser_time);
    println!("│ Execution           │ {:>9.3} │", stats.execution_time);
    println!("├─────────────────────┼───────────┤");
    println!("│ Total Time          │ {:>9.3} │", stats.total_time);
    println!("└─────────────────────┴───────────┘");
    println!("  Tokens:     {}", stats.token_count);
    println!("  Tree nodes: {}", stats.ast_size);
}

fn main() {
    let args = Cli::parse();

    let level = if args.verbose { LevelFilter::Debug } else { LevelFilter::Warn };
    env_logger::builder().filter_level(level).parse_default_env().init();

    match run(&args) {
        Ok(stats) => {
            if args.timing {
                print_stats(&stats);
            }
        }
        Err(e) => {
            eprintln!("{}: {}", e.kind(), e);
            std::process::exit(1);
        }
    }
}
