pub mod hashtable;
pub mod symboltable;

pub use hashtable::ChainedHashTable;
pub use symboltable::{NumericKind, Symbol, SymbolRef, SymbolTable, Value, ValueMut};
