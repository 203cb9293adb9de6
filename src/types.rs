use crate::environment::Scope;
use crate::evaluator;
use derive_more::{Deref, DerefMut};
use itertools::Itertools;
use std::collections::HashMap;
use std::fmt;
use std::fmt::Formatter;
use std::ops::{RangeFrom, RangeInclusive};
use std::rc::Rc;

pub type Number = i64;

#[derive(Deref, Debug, PartialEq, Eq, Hash, Clone)]
pub struct Symbol(pub String);

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Symbol {
    fn from(name: &str) -> Self {
        Symbol(name.into())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Deref, DerefMut, Debug, Clone, Default, PartialEq)]
pub struct Vector(pub Vec<Value>);

/// A pair. Proper lists are right-nested chains of pairs ending in `Nil`.
///
/// `Clone`, `PartialEq`, `Debug` and `Drop` are written by hand so that they
/// loop along the `cdr` chain. Only nesting through `car` uses the stack, so
/// a long flat list costs no more stack than a short one.
pub struct Cons {
    pub car: Value,
    pub cdr: Value,
}

impl Drop for Cons {
    fn drop(&mut self) {
        let mut tail = std::mem::replace(&mut self.cdr, Value::Nil);
        while let Value::Cons(mut cell) = tail {
            tail = std::mem::replace(&mut cell.cdr, Value::Nil);
        }
    }
}

impl Clone for Cons {
    fn clone(&self) -> Self {
        let mut cars = Vec::new();
        let mut cell = self;
        let tail = loop {
            match &cell.cdr {
                Value::Cons(next) => {
                    cell = next.as_ref();
                    cars.push(cell.car.clone());
                }
                other => break other.clone(),
            }
        };
        let cdr = cars
            .into_iter()
            .rev()
            .fold(tail, |tail, car| Value::cons(car, tail));
        Cons::new(self.car.clone(), cdr)
    }
}

impl PartialEq for Cons {
    fn eq(&self, other: &Self) -> bool {
        let (mut x, mut y) = (self, other);
        loop {
            if x.car != y.car {
                return false;
            }
            match (&x.cdr, &y.cdr) {
                (Value::Cons(a), Value::Cons(b)) => {
                    x = a.as_ref();
                    y = b.as_ref();
                }
                (a, b) => return a == b,
            }
        }
    }
}

impl fmt::Debug for Cons {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        list.entries(self.iter());
        let tail = self.tail();
        if !tail.is_nil() {
            list.entry(&format_args!(". {:?}", tail));
        }
        list.finish()
    }
}

pub struct Iter<'a> {
    next: Option<&'a Cons>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Value;

    fn next(&mut self) -> Option<Self::Item> {
        let cell = self.next?;
        self.next = match &cell.cdr {
            Value::Cons(next) => Some(next.as_ref()),
            _ => None,
        };
        Some(&cell.car)
    }
}

impl Cons {
    pub fn new(car: Value, cdr: Value) -> Self {
        Self { car, cdr }
    }

    /// The final `cdr` of the chain: `Nil` for a proper list.
    pub fn tail(&self) -> &Value {
        let mut cell = self;
        loop {
            match &cell.cdr {
                Value::Cons(next) => cell = next.as_ref(),
                tail => return tail,
            }
        }
    }

    /// Walks the whole `cdr` chain: only a chain ending in `Nil` is proper.
    pub fn is_proper(&self) -> bool {
        self.tail().is_nil()
    }

    /// Iterates over the `car` of each cell. The tail of an improper list is
    /// not yielded.
    pub fn iter(&self) -> Iter {
        Iter { next: Some(self) }
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn to_vector(&self) -> Vector {
        Vector(self.iter().cloned().collect())
    }
}

/// Capability a host exposes for `a.b.c` lookups.
pub trait ExternalMap: fmt::Debug {
    fn get(&self, key: &str) -> Option<Value>;
}

impl ExternalMap for HashMap<String, Value> {
    fn get(&self, key: &str) -> Option<Value> {
        HashMap::get(self, key).cloned()
    }
}

#[derive(Clone)]
pub struct Procedure {
    pub params: Vec<Symbol>,
    pub body: Cons,
    pub scope: Scope,
}

impl Procedure {
    pub fn arity(&self) -> Arity {
        Arity::exactly(self.params.len())
    }
}

impl fmt::Debug for Procedure {
    // Not derived: the captured scope may well contain this procedure.
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Procedure{{params: ({}), body: {:?}}}",
            self.params.iter().join(" "),
            self.body
        )
    }
}

#[derive(Debug, Clone)]
pub enum Value {
    Nil,
    Symbol(Symbol),
    Number(Number),
    String(String),
    Vector(Vector),
    Cons(Box<Cons>),
    Procedure(Rc<Procedure>),
    Map(Rc<dyn ExternalMap>),
}

impl Value {
    pub fn symbol(name: &str) -> Self {
        Value::Symbol(Symbol::from(name))
    }

    pub fn cons(car: Value, cdr: Value) -> Self {
        Value::Cons(Box::new(Cons::new(car, cdr)))
    }

    pub fn list<I>(elements: I) -> Self
    where
        I: IntoIterator<Item = Value>,
        I::IntoIter: DoubleEndedIterator,
    {
        elements
            .into_iter()
            .rev()
            .fold(Value::Nil, |tail, head| Value::cons(head, tail))
    }

    pub fn map<M: ExternalMap + 'static>(map: M) -> Self {
        Value::Map(Rc::new(map))
    }

    /// `Nil` and the symbol `false` are the only falsy values.
    pub fn truthy(&self) -> bool {
        match self {
            Value::Nil => false,
            Value::Symbol(s) => s.0 != "false",
            _ => true,
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Symbol(_) => "symbol",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Vector(_) => "vector",
            Value::Cons(_) => "pair",
            Value::Procedure(_) => "procedure",
            Value::Map(_) => "map",
        }
    }

    pub(crate) fn as_number(&self) -> Result<Number, TypeMismatch> {
        match self {
            Value::Number(n) => Ok(*n),
            _ => Err(TypeMismatch::NotANumber(self.clone())),
        }
    }

    pub(crate) fn as_cons(&self) -> Result<&Cons, TypeMismatch> {
        match self {
            Value::Cons(c) => Ok(c.as_ref()),
            _ => Err(TypeMismatch::NotAPair(self.clone())),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::symbol(if b { "true" } else { "false" })
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.into())
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Symbol(x), Value::Symbol(y)) => x == y,
            (Value::Number(x), Value::Number(y)) => x == y,
            (Value::String(x), Value::String(y)) => x == y,
            (Value::Vector(x), Value::Vector(y)) => x == y,
            (Value::Cons(x), Value::Cons(y)) => x == y,
            (Value::Procedure(x), Value::Procedure(y)) => Rc::ptr_eq(x, y),
            (Value::Map(x), Value::Map(y)) => {
                Rc::as_ptr(x) as *const () == Rc::as_ptr(y) as *const ()
            }
            _ => false,
        }
    }
}

#[derive(Debug)]
pub enum TypeMismatch {
    NotANumber(Value),
    NotAPair(Value),
    Incomparable(Value, Value),
}

impl fmt::Display for TypeMismatch {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            TypeMismatch::NotANumber(v) => {
                write!(f, "expected a number, got {} {}", v.type_name(), v.inspect())
            }
            TypeMismatch::NotAPair(v) => {
                write!(f, "expected a pair, got {} {}", v.type_name(), v.inspect())
            }
            TypeMismatch::Incomparable(x, y) => write!(
                f,
                "cannot compare {} {} with {} {}",
                x.type_name(),
                x.inspect(),
                y.type_name(),
                y.inspect()
            ),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Arity {
    Between(RangeInclusive<usize>),
    AtLeast(RangeFrom<usize>),
}

#[derive(Debug)]
pub struct BadArgCount {
    name: &'static str,
    expected: Arity,
    got: usize,
}

impl fmt::Display for BadArgCount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "when evaluating {} expected {} arguments, but received {} arguments",
            self.name, self.expected, self.got
        )
    }
}

impl Arity {
    pub(crate) const fn exactly(n: usize) -> Self {
        Self::Between(n..=n)
    }

    pub(crate) const fn at_least(n: usize) -> Self {
        Self::AtLeast(n..)
    }

    pub(crate) fn contains(&self, n: usize) -> bool {
        match self {
            Self::Between(range) => range.contains(&n),
            Self::AtLeast(range) => range.contains(&n),
        }
    }

    pub(crate) fn mismatch(&self, n: usize, name: &'static str) -> BadArgCount {
        BadArgCount {
            name,
            expected: self.clone(),
            got: n,
        }
    }

    pub(crate) fn validate_for(&self, n: usize, name: &'static str) -> Result<(), BadArgCount> {
        match self.contains(n) {
            true => Ok(()),
            false => Err(self.mismatch(n, name)),
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Between(r) => {
                if r.start() == r.end() {
                    write!(f, "exactly {}", r.start())
                } else {
                    write!(f, "from {} to {}", r.start(), r.end())
                }
            }
            Arity::AtLeast(r) => write!(f, "at least {}", r.start),
        }
    }
}

pub struct PrimitiveFn {
    pub name: &'static str,
    pub arity: Arity,
    pub fn_ptr: fn(&[Value]) -> evaluator::Result,
}

impl fmt::Debug for PrimitiveFn {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "builtin #<{}>", self.name)
    }
}
