use crate::types::{Cons, Value};
use itertools::Itertools;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintMode {
    /// Strings appear bare, as `display` shows them.
    Plain,
    /// Strings are quoted so the output reads back as the same value.
    Inspect,
}

pub fn pr_str(value: &Value, mode: PrintMode) -> String {
    match value {
        Value::Nil => String::from("()"),
        Value::Symbol(name) => name.0.clone(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => match mode {
            PrintMode::Plain => s.clone(),
            PrintMode::Inspect => format!("\"{}\"", s),
        },
        Value::Vector(elements) => {
            format!("[{}]", elements.iter().map(|v| pr_str(v, mode)).join(" "))
        }
        Value::Cons(cons) => pr_cons(cons, mode),
        Value::Procedure(p) => format!("#<procedure ({})>", p.params.iter().join(" ")),
        Value::Map(_) => String::from("#<map>"),
    }
}

fn pr_cons(cons: &Cons, mode: PrintMode) -> String {
    let mut parts = Vec::new();
    let mut cell = cons;
    loop {
        parts.push(pr_str(&cell.car, mode));
        match &cell.cdr {
            Value::Nil => break,
            Value::Cons(next) => cell = next.as_ref(),
            tail => {
                parts.push(String::from("."));
                parts.push(pr_str(tail, mode));
                break;
            }
        }
    }
    format!("({})", parts.join(" "))
}

impl Value {
    pub fn inspect(&self) -> String {
        pr_str(self, PrintMode::Inspect)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", pr_str(self, PrintMode::Plain))
    }
}

impl fmt::Display for Cons {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", pr_cons(self, PrintMode::Plain))
    }
}
