//! The runtime value model.

use crate::error::RuntimeError;
use crate::scope::ScopeRef;
use indexmap::IndexMap;
use rill_par::Expr;
use rill_util::{Span, Symbol};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// A number is either an integer or a float; arithmetic promotes to float
/// whenever one side is already a float, except `^` which always produces
/// a float.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(n) => n as f64,
            Number::Float(f) => f,
        }
    }

    pub fn is_zero(self) -> bool {
        match self {
            Number::Int(n) => n == 0,
            Number::Float(f) => f == 0.0,
        }
    }

    pub fn is_truthy(self) -> bool {
        !self.is_zero()
    }

    /// Two numbers are "both integer" exactly when neither is a float -
    /// the promotion rule driving every binary numeric operation below.
    fn both_int(self, other: Number) -> Option<(i64, i64)> {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => Some((a, b)),
            _ => None,
        }
    }

    pub fn add(self, other: Number) -> Number {
        match self.both_int(other) {
            Some((a, b)) => Number::Int(a.wrapping_add(b)),
            None => Number::Float(self.as_f64() + other.as_f64()),
        }
    }

    pub fn sub(self, other: Number) -> Number {
        match self.both_int(other) {
            Some((a, b)) => Number::Int(a.wrapping_sub(b)),
            None => Number::Float(self.as_f64() - other.as_f64()),
        }
    }

    pub fn mul(self, other: Number) -> Number {
        match self.both_int(other) {
            Some((a, b)) => Number::Int(a.wrapping_mul(b)),
            None => Number::Float(self.as_f64() * other.as_f64()),
        }
    }

    pub fn div(self, other: Number, span: Span) -> Result<Number, RuntimeError> {
        if other.is_zero() {
            return Err(RuntimeError::new("Division by zero", span));
        }
        Ok(match self.both_int(other) {
            Some((a, b)) => Number::Int(a.wrapping_div(b)),
            None => Number::Float(self.as_f64() / other.as_f64()),
        })
    }

    /// `^` always produces a float, even for two integers.
    pub fn pow(self, other: Number) -> Number {
        Number::Float(self.as_f64().powf(other.as_f64()))
    }

    pub fn compare(self, other: Number) -> std::cmp::Ordering {
        match self.both_int(other) {
            Some((a, b)) => a.cmp(&b),
            None => self
                .as_f64()
                .partial_cmp(&other.as_f64())
                .unwrap_or(std::cmp::Ordering::Equal),
        }
    }

    pub fn numeric_eq(self, other: Number) -> bool {
        match self.both_int(other) {
            Some((a, b)) => a == b,
            None => self.as_f64() == other.as_f64(),
        }
    }

    pub fn stringify(self) -> String {
        match self {
            Number::Int(n) => n.to_string(),
            Number::Float(f) => format!("{f:.2}"),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.stringify())
    }
}

/// A map key: numbers and strings hash cleanly, so every other value is
/// rejected with `Runtime("Cannot hashed")` before a map operation ever
/// constructs one. Floats are stored by bit pattern since `f64` itself
/// implements neither `Eq` nor `Hash`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MapKey {
    Int(i64),
    Float(u64),
    Str(Rc<str>),
}

impl MapKey {
    pub fn try_from_value(value: &Value, span: Span) -> Result<MapKey, RuntimeError> {
        match value {
            Value::Number(Number::Int(n)) => Ok(MapKey::Int(*n)),
            Value::Number(Number::Float(f)) => Ok(MapKey::Float(f.to_bits())),
            Value::String(s) => Ok(MapKey::Str(s.clone())),
            _ => Err(RuntimeError::new("Cannot hashed", span)),
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            MapKey::Int(n) => Value::Number(Number::Int(n)),
            MapKey::Float(bits) => Value::Number(Number::Float(f64::from_bits(bits))),
            MapKey::Str(s) => Value::String(s),
        }
    }
}

pub struct FunctionValue {
    pub name: Option<Symbol>,
    pub arg_names: Vec<Symbol>,
    pub body: Rc<Expr>,
    pub captured_scope: ScopeRef,
}

pub type BuiltInCallback =
    fn(&mut crate::evaluator::Evaluator, &ScopeRef, Vec<Value>, Span) -> Result<Value, RuntimeError>;

pub struct BuiltInFunction {
    pub name: &'static str,
    pub arity: usize,
    pub callback: BuiltInCallback,
}

/// The value every Rill expression evaluates to.
///
/// Lists, maps, and functions are reference types (`Rc<RefCell<_>>` /
/// `Rc<_>`): assigning one to a variable aliases it rather than copying.
/// Only list arithmetic that produces a *new* list actually deep-copies
/// elements.
#[derive(Clone)]
pub enum Value {
    Number(Number),
    String(Rc<str>),
    List(Rc<RefCell<Vec<Value>>>),
    Map(Rc<RefCell<IndexMap<MapKey, Value>>>),
    Function(Rc<FunctionValue>),
    BuiltIn(Rc<BuiltInFunction>),
    Null,
}

impl Value {
    pub fn int(n: i64) -> Value {
        Value::Number(Number::Int(n))
    }

    pub fn float(f: f64) -> Value {
        Value::Number(Number::Float(f))
    }

    pub fn string(s: impl Into<Rc<str>>) -> Value {
        Value::String(s.into())
    }

    pub fn list(elements: Vec<Value>) -> Value {
        Value::List(Rc::new(RefCell::new(elements)))
    }

    pub fn map(pairs: IndexMap<MapKey, Value>) -> Value {
        Value::Map(Rc::new(RefCell::new(pairs)))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Function(_) => "function",
            Value::BuiltIn(_) => "built-in function",
            Value::Null => "null",
        }
    }

    /// Truthiness for `if`/`while`/`for`/`not` conditions. Defined directly
    /// only for `Number` and `String`; extended here to collections
    /// (non-empty is truthy), callables (always truthy), and `Null` (always
    /// falsy) - see DESIGN.md.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Number(n) => n.is_truthy(),
            Value::String(s) => !s.is_empty(),
            Value::List(l) => !l.borrow().is_empty(),
            Value::Map(m) => !m.borrow().is_empty(),
            Value::Function(_) | Value::BuiltIn(_) => true,
            Value::Null => false,
        }
    }

    /// The string form used by `str + value` concatenation and by
    /// `print`/`println`.
    pub fn stringify(&self) -> String {
        match self {
            Value::Number(n) => n.stringify(),
            Value::String(s) => s.to_string(),
            Value::List(l) => {
                let items: Vec<String> = l.borrow().iter().map(Value::stringify).collect();
                format!("[{}]", items.join(", "))
            }
            Value::Map(m) => {
                let items: Vec<String> = m
                    .borrow()
                    .iter()
                    .map(|(k, v)| format!("{}: {}", k.clone().into_value().stringify(), v.stringify()))
                    .collect();
                format!("{{{}}}", items.join(", "))
            }
            Value::Function(f) => match f.name {
                Some(name) => format!("<function {}>", name.as_str()),
                None => "<function>".to_string(),
            },
            Value::BuiltIn(b) => format!("<built-in function {}>", b.name),
            Value::Null => "null".to_string(),
        }
    }

    fn illegal_operation(&self, span: Span) -> RuntimeError {
        RuntimeError::new("Illegal operation", span)
    }

    pub fn add(&self, other: &Value, span: Span) -> Result<Value, RuntimeError> {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a.add(*b))),
            (Value::String(_), _) => Ok(Value::string(format!(
                "{}{}",
                self.stringify(),
                other.stringify()
            ))),
            (Value::List(a), Value::List(b)) => {
                let mut items = a.borrow().clone();
                items.extend(b.borrow().iter().cloned());
                Ok(Value::list(items))
            }
            (Value::List(a), _) => {
                let mut items = a.borrow().clone();
                items.push(other.clone());
                Ok(Value::list(items))
            }
            _ => Err(self.illegal_operation(span)),
        }
    }

    pub fn sub(&self, other: &Value, span: Span) -> Result<Value, RuntimeError> {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a.sub(*b))),
            (Value::List(a), Value::Number(Number::Int(idx))) => {
                let mut items = a.borrow().clone();
                let i = normalize_index(*idx, items.len(), span)?;
                items.remove(i);
                Ok(Value::list(items))
            }
            _ => Err(self.illegal_operation(span)),
        }
    }

    pub fn mul(&self, other: &Value, span: Span) -> Result<Value, RuntimeError> {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a.mul(*b))),
            (Value::String(s), Value::Number(Number::Int(n))) => {
                if *n < 0 {
                    return Err(RuntimeError::new(
                        "String repetition count cannot be negative",
                        span,
                    ));
                }
                Ok(Value::string(s.repeat(*n as usize)))
            }
            (Value::List(a), Value::Number(Number::Int(n))) => {
                if *n < 0 {
                    return Err(RuntimeError::new(
                        "List repetition count cannot be negative",
                        span,
                    ));
                }
                let base = a.borrow();
                let mut items = Vec::with_capacity(base.len() * (*n as usize));
                for _ in 0..*n {
                    items.extend(base.iter().cloned());
                }
                Ok(Value::list(items))
            }
            (Value::List(a), Value::List(b)) => {
                let a = a.borrow();
                let b = b.borrow();
                if a.len() != b.len() {
                    return Err(RuntimeError::new(
                        "Lists must be the same length for element-wise multiplication",
                        span,
                    ));
                }
                let items: Result<Vec<Value>, RuntimeError> = a
                    .iter()
                    .zip(b.iter())
                    .map(|(x, y)| x.mul(y, span))
                    .collect();
                Ok(Value::list(items?))
            }
            _ => Err(self.illegal_operation(span)),
        }
    }

    pub fn div(&self, other: &Value, span: Span) -> Result<Value, RuntimeError> {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a.div(*b, span)?)),
            _ => Err(self.illegal_operation(span)),
        }
    }

    pub fn pow(&self, other: &Value, span: Span) -> Result<Value, RuntimeError> {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a.pow(*b))),
            _ => Err(self.illegal_operation(span)),
        }
    }

    pub fn negate(&self, span: Span) -> Result<Value, RuntimeError> {
        self.mul(&Value::int(-1), span)
    }

    pub fn not(&self, span: Span) -> Result<Value, RuntimeError> {
        let _ = span;
        Ok(Value::int(if self.is_truthy() { 0 } else { 1 }))
    }

    pub fn equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a.numeric_eq(*b),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Null, Value::Null) => true,
            (Value::List(a), Value::List(b)) => Rc::ptr_eq(a, b),
            (Value::Map(a), Value::Map(b)) => Rc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::BuiltIn(a), Value::BuiltIn(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    pub fn compare(&self, other: &Value, span: Span) -> Result<std::cmp::Ordering, RuntimeError> {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => Ok(a.compare(*b)),
            (Value::String(a), Value::String(b)) => Ok(a.cmp(b)),
            _ => Err(self.illegal_operation(span)),
        }
    }

    pub fn index_access(&self, index: &Value, span: Span) -> Result<Value, RuntimeError> {
        match self {
            Value::List(items) => {
                let idx = match index {
                    Value::Number(Number::Int(n)) => *n,
                    _ => return Err(RuntimeError::new("List index must be an integer", span)),
                };
                let items = items.borrow();
                let i = normalize_index(idx, items.len(), span)?;
                Ok(items[i].clone())
            }
            Value::String(s) => {
                let idx = match index {
                    Value::Number(Number::Int(n)) => *n,
                    _ => return Err(RuntimeError::new("String index must be an integer", span)),
                };
                let chars: Vec<char> = s.chars().collect();
                let i = normalize_index(idx, chars.len(), span)?;
                Ok(Value::string(chars[i].to_string()))
            }
            Value::Map(map) => {
                let key = MapKey::try_from_value(index, span)?;
                Ok(map.borrow().get(&key).cloned().unwrap_or(Value::Null))
            }
            _ => Err(self.illegal_operation(span)),
        }
    }

    pub fn index_assign(&self, index: &Value, value: Value, span: Span) -> Result<(), RuntimeError> {
        match self {
            Value::List(items) => {
                let idx = match index {
                    Value::Number(Number::Int(n)) => *n,
                    _ => return Err(RuntimeError::new("List index must be an integer", span)),
                };
                let mut items = items.borrow_mut();
                let i = normalize_index(idx, items.len(), span)?;
                items[i] = value;
                Ok(())
            }
            Value::Map(map) => {
                let key = MapKey::try_from_value(index, span)?;
                let mut map = map.borrow_mut();
                if matches!(value, Value::Null) {
                    map.shift_remove(&key);
                } else {
                    map.insert(key, value);
                }
                Ok(())
            }
            _ => Err(self.illegal_operation(span)),
        }
    }
}

/// Maps a possibly-negative index (negative indices are not part of this
/// language; any out-of-range index is simply an error) to a bounds-checked
/// `usize`.
fn normalize_index(idx: i64, len: usize, span: Span) -> Result<usize, RuntimeError> {
    if idx < 0 || idx as usize >= len {
        return Err(RuntimeError::new("Index out of range", span));
    }
    Ok(idx as usize)
}
