use crate::errors::{PascalError, PascalResult};
use crate::semantic::hashtable::ChainedHashTable;
use std::fmt;
use std::num::NonZeroUsize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericKind {
    Integer,
    Double,
}

impl NumericKind {
    pub fn from_type_name(name: &str) -> Option<Self> {
        match name {
            "integer" => Some(NumericKind::Integer),
            "double" => Some(NumericKind::Double),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            NumericKind::Integer => "integer",
            NumericKind::Double => "double",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Int(i64),
    Double(f64),
}

impl Value {
    pub fn kind(&self) -> NumericKind {
        match self {
            Value::Int(_) => NumericKind::Integer,
            Value::Double(_) => NumericKind::Double,
        }
    }

    pub fn as_f64(&self) -> f64 {
        match *self {
            Value::Int(v) => v as f64,
            Value::Double(v) => v,
        }
    }

    /// Converts an evaluator result to `kind`; integers truncate toward zero.
    pub fn coerce(value: f64, kind: NumericKind) -> Self {
        match kind {
            NumericKind::Integer => Value::Int(value.trunc() as i64),
            NumericKind::Double => Value::Double(value),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{}", v),
            Value::Double(v) => write!(f, "{}", v),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Symbol<T> {
    pub value: T,
    pub is_constant: bool,
}

/// Read-only view of an entry in either table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SymbolRef {
    pub value: Value,
    pub is_constant: bool,
}

/// Writable slot of a mutable entry.
pub enum ValueMut<'a> {
    Int(&'a mut i64),
    Double(&'a mut f64),
}

impl ValueMut<'_> {
    pub fn assign(self, value: f64) {
        match self {
            ValueMut::Int(slot) => *slot = value.trunc() as i64,
            ValueMut::Double(slot) => *slot = value,
        }
    }
}

/// Name to value store split by numeric kind.
///
/// A name lives in at most one of the two tables; constants are never
/// mutated after `declare`.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    ints: ChainedHashTable<String, Symbol<i64>>,
    doubles: ChainedHashTable<String, Symbol<f64>>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            ints: ChainedHashTable::new(),
            doubles: ChainedHashTable::new(),
        }
    }

    pub fn with_buckets(bucket_count: NonZeroUsize) -> Self {
        Self {
            ints: ChainedHashTable::with_buckets(bucket_count),
            doubles: ChainedHashTable::with_buckets(bucket_count),
        }
    }

    pub fn declare(&mut self, name: &str, value: Value, is_constant: bool) -> PascalResult<()> {
        if name.is_empty() {
            return Err(PascalError::declaration_error("empty identifier"));
        }
        if self.contains(name) {
            return Err(PascalError::SymbolAlreadyDefined {
                name: name.to_string(),
            });
        }
        let inserted = match value {
            Value::Int(value) => self.ints.insert(name.to_string(), Symbol { value, is_constant }),
            Value::Double(value) => self.doubles.insert(name.to_string(), Symbol { value, is_constant }),
        };
        debug_assert!(inserted, "'{}' was checked absent before insert", name);
        Ok(())
    }

    pub fn get(&self, name: &str, kind: NumericKind) -> PascalResult<SymbolRef> {
        let entry = match kind {
            NumericKind::Integer => self.ints.find(name).map(|s| SymbolRef {
                value: Value::Int(s.value),
                is_constant: s.is_constant,
            }),
            NumericKind::Double => self.doubles.find(name).map(|s| SymbolRef {
                value: Value::Double(s.value),
                is_constant: s.is_constant,
            }),
        };
        entry.ok_or_else(|| undefined(name))
    }

    /// Mutable handle to a variable's slot; constants are refused.
    pub fn get_mut(&mut self, name: &str, kind: NumericKind) -> PascalResult<ValueMut<'_>> {
        match kind {
            NumericKind::Integer => {
                let symbol = self.ints.find_mut(name).ok_or_else(|| undefined(name))?;
                if symbol.is_constant {
                    return Err(constant_violation(name));
                }
                Ok(ValueMut::Int(&mut symbol.value))
            }
            NumericKind::Double => {
                let symbol = self.doubles.find_mut(name).ok_or_else(|| undefined(name))?;
                if symbol.is_constant {
                    return Err(constant_violation(name));
                }
                Ok(ValueMut::Double(&mut symbol.value))
            }
        }
    }

    pub fn get_const(&self, name: &str, kind: NumericKind) -> PascalResult<Value> {
        self.get(name, kind).map(|entry| entry.value)
    }

    pub fn set(&mut self, name: &str, kind: NumericKind, value: Value) -> PascalResult<()> {
        self.get_mut(name, kind)?.assign(value.as_f64());
        Ok(())
    }

    /// Checks the int table, then the double table.
    pub fn is_constant(&self, name: &str) -> PascalResult<bool> {
        if let Some(symbol) = self.ints.find(name) {
            return Ok(symbol.is_constant);
        }
        self.doubles
            .find(name)
            .map(|symbol| symbol.is_constant)
            .ok_or_else(|| undefined(name))
    }

    pub fn has(&self, name: &str, kind: NumericKind) -> bool {
        match kind {
            NumericKind::Integer => self.ints.contains(name),
            NumericKind::Double => self.doubles.contains(name),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.ints.contains(name) || self.doubles.contains(name)
    }

    pub fn kind_of(&self, name: &str) -> Option<NumericKind> {
        if self.ints.contains(name) {
            Some(NumericKind::Integer)
        } else if self.doubles.contains(name) {
            Some(NumericKind::Double)
        } else {
            None
        }
    }

    /// Value of `name` for expression evaluation: double table first, then int.
    pub fn lookup(&self, name: &str) -> PascalResult<f64> {
        if let Some(symbol) = self.doubles.find(name) {
            return Ok(symbol.value);
        }
        self.ints
            .find(name)
            .map(|symbol| symbol.value as f64)
            .ok_or_else(|| undefined(name))
    }

    /// Stores an evaluated result into whichever table holds `name`.
    pub fn store(&mut self, name: &str, value: f64) -> PascalResult<()> {
        let kind = self.kind_of(name).ok_or_else(|| undefined(name))?;
        self.get_mut(name, kind)?.assign(value);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.ints.len() + self.doubles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ints.is_empty() && self.doubles.is_empty()
    }

    pub fn print_symbols(&self) {
        let mut rows: Vec<(&String, &'static str, String, bool)> = self
            .ints
            .iter()
            .map(|(name, s)| (name, "integer", s.value.to_string(), s.is_constant))
            .chain(
                self.doubles
                    .iter()
                    .map(|(name, s)| (name, "double", s.value.to_string(), s.is_constant)),
            )
            .collect();
        rows.sort_by(|a, b| a.0.cmp(b.0));

        println!("{:-<60}", "");
        println!("| {:<15} | {:<10} | {:<15} | {:<8} |", "Name", "Type", "Value", "Constant");
        println!("{:-<60}", "");
        for (name, type_name, value, is_constant) in rows {
            println!("| {:<15} | {:<10} | {:<15} | {:<8} |", name, type_name, value, is_constant);
        }
        println!("{:-<60}", "");
    }
}

fn undefined(name: &str) -> PascalError {
    PascalError::UndefinedSymbol {
        name: name.to_string(),
    }
}

fn constant_violation(name: &str) -> PascalError {
    PascalError::AssignmentToConstant {
        name: name.to_string(),
    }
}
