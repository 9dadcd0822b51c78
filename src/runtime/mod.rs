pub mod evaluator;
pub mod executor;

pub use evaluator::{evaluate, evaluate_postfix, to_postfix};
pub use executor::{format_number, Executor};
