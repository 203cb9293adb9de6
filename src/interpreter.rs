use crate::environment::{Bindings, Scope};
use crate::types::Value;
use crate::{evaluator, reader};
use std::fmt;

pub type Result = std::result::Result<Value, Error>;

#[derive(Debug)]
pub enum Error {
    Read(reader::Error),
    Eval(evaluator::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Read(e) => write!(f, "{}", e),
            Error::Eval(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for Error {}

pub fn read(source: &str) -> Result {
    reader::read_str(source).map_err(Error::Read)
}

pub fn eval(program: &Value, scope: &Scope) -> Result {
    match program {
        Value::Cons(forms) => evaluator::eval_sequence(forms, scope).map_err(Error::Eval),
        _ => Ok(Value::Nil),
    }
}

/// Scans, expands, parses and evaluates `source` against `scope`. On success
/// the result is also bound to `_` in the innermost frame.
pub fn evaluate(source: &str, scope: &Scope) -> Result {
    let program = read(source)?;
    let result = eval(&program, scope)?;
    log::debug!("evaluate {:?} produced {}", source, result.inspect());
    scope.create("_", result.clone());
    Ok(result)
}

pub fn rep(line: &str, scope: &Scope) -> String {
    match evaluate(line, scope) {
        Ok(value) => value.inspect(),
        Err(e) => format!("error: {}", e),
    }
}
