use crate::environment::{Bindings, Scope, UnknownSymbol};
use crate::types::{
    BadArgCount, Cons, ExternalMap, PrimitiveFn, Procedure, Symbol, TypeMismatch, Value, Vector,
};
use crate::{core, special_forms};
use itertools::Itertools;
use std::fmt;
use std::rc::Rc;

pub type Result<T = Value> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    UnboundVariable(UnknownSymbol),
    IllFormed { form: &'static str, expr: String },
    ImproperCombination(String),
    TypeMismatch(TypeMismatch),
    BadArgCount(BadArgCount),
    NotApplicable(String),
    NotAMap { variable: String, found: &'static str },
    MissingKey { variable: String, key: String },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnboundVariable(e) => write!(f, "{}", e),
            Error::IllFormed { expr, .. } => write!(f, "ill-formed special form: {}", expr),
            Error::ImproperCombination(expr) => {
                write!(f, "combination must be a proper list: {}", expr)
            }
            Error::TypeMismatch(e) => write!(f, "type mismatch: {}", e),
            Error::BadArgCount(e) => write!(f, "{}", e),
            Error::NotApplicable(obj) => write!(f, "the object {} is not applicable", obj),
            Error::NotAMap { variable, found } => {
                write!(f, "variable '{}' is not a map ({})", variable, found)
            }
            Error::MissingKey { variable, key } => {
                write!(f, "variable '{}' has no key '{}'", variable, key)
            }
        }
    }
}

impl From<TypeMismatch> for Error {
    fn from(t: TypeMismatch) -> Self {
        Self::TypeMismatch(t)
    }
}

impl From<UnknownSymbol> for Error {
    fn from(e: UnknownSymbol) -> Self {
        Self::UnboundVariable(e)
    }
}

pub fn eval(ast: &Value, scope: &Scope) -> Result {
    match ast {
        Value::Symbol(symbol) => evaluate_symbol(symbol, scope),
        Value::Cons(form) => execute(form, scope),
        _ => Ok(ast.clone()),
    }
}

/// Evaluates each element of a body list in order and returns the last value.
pub fn eval_sequence(body: &Cons, scope: &Scope) -> Result {
    evaluate_forms(body.iter(), scope)
}

pub(crate) fn evaluate_forms<'a>(
    forms: impl IntoIterator<Item = &'a Value>,
    scope: &Scope,
) -> Result {
    let mut result = Value::Nil;
    for form in forms {
        result = eval(form, scope)?;
    }
    Ok(result)
}

pub(crate) fn evaluate_elementwise(forms: &[&Value], scope: &Scope) -> Result<Vector> {
    let evaluated: Result<Vec<Value>> = forms.iter().map(|form| eval(form, scope)).collect();
    evaluated.map(Vector)
}

/// Runs a single combination: a special form, a builtin or a procedure call.
pub fn execute(form: &Cons, scope: &Scope) -> Result {
    if !form.is_proper() {
        return Err(Error::ImproperCombination(form.to_string()));
    }
    let argv: Vec<&Value> = form.iter().collect();
    let args = &argv[1..];
    log::trace!("execute {}", form);

    if let Value::Symbol(name) = &form.car {
        match name.as_str() {
            "quote" => return special_forms::apply_quote(args),
            "if" => return special_forms::apply_if(args, scope),
            "set!" => return special_forms::apply_set(args, scope),
            "define" => return special_forms::apply_define(args, scope),
            "lambda" => return special_forms::apply_lambda(args, scope),
            "begin" => return special_forms::apply_begin(args, scope),
            // Builtins take precedence over bindings of the same name.
            _ => {
                if let Some(builtin) = core::lookup(name) {
                    let evaluated = evaluate_elementwise(args, scope)?;
                    return call_builtin(builtin, &evaluated);
                }
            }
        }
    }

    let callable = eval(&form.car, scope)?;
    let evaluated = evaluate_elementwise(args, scope)?;
    apply(&callable, &evaluated)
}

pub fn apply(callable: &Value, args: &[Value]) -> Result {
    match callable {
        Value::Procedure(procedure) => call_procedure(procedure, args),
        _ => Err(Error::NotApplicable(callable.inspect())),
    }
}

pub(crate) fn pretty_print_args(args: &[Value]) -> String {
    match args.len() {
        0 => "no args".into(),
        1 => args[0].inspect(),
        _ => format!("\n\t{}", args.iter().map(Value::inspect).join("\n\t")),
    }
}

pub fn call_builtin(func: &PrimitiveFn, args: &[Value]) -> Result {
    func.arity
        .validate_for(args.len(), func.name)
        .map_err(Error::BadArgCount)?;
    log::trace!("Call {} with {}", func.name, pretty_print_args(args));
    let result = (func.fn_ptr)(args);
    match &result {
        Ok(val) => log::trace!("Call to {} resulted in {}", func.name, val.inspect()),
        Err(e) => log::trace!("Call to {} failed: {}", func.name, e),
    }
    result
}

fn call_procedure(procedure: &Rc<Procedure>, args: &[Value]) -> Result {
    log::trace!(
        "Call {} with {}",
        Value::Procedure(procedure.clone()),
        pretty_print_args(args)
    );
    procedure
        .arity()
        .validate_for(args.len(), "procedure")
        .map_err(Error::BadArgCount)?;

    // Lexical scoping: the new frame goes on the captured scope, not the caller's.
    let mut scope = procedure.scope.clone();
    scope.push();
    for (param, arg) in procedure.params.iter().zip(args) {
        scope.create(param, arg.clone());
    }
    let result = eval_sequence(&procedure.body, &scope);
    scope.pop();
    result
}

fn evaluate_symbol(symbol: &Symbol, scope: &Scope) -> Result {
    if let Some(value) = scope.get(symbol) {
        return Ok(value);
    }
    match symbol.split_once('.') {
        _ if symbol.as_str() == "true" || symbol.as_str() == "false" => {
            Ok(Value::Symbol(symbol.clone()))
        }
        Some((head, rest)) => resolve_path(head, rest, scope),
        None => Err(Error::UnboundVariable(UnknownSymbol(symbol.to_string()))),
    }
}

/// Resolves `head.k1.k2...` by walking external maps one key at a time.
fn resolve_path(head: &str, rest: &str, scope: &Scope) -> Result {
    let mut current = scope.fetch(head)?;
    let mut variable = head;
    for key in rest.split('.') {
        let map = match &current {
            Value::Map(map) => Rc::clone(map),
            other => {
                return Err(Error::NotAMap {
                    variable: variable.into(),
                    found: other.type_name(),
                })
            }
        };
        current = map.get(key).ok_or_else(|| Error::MissingKey {
            variable: variable.into(),
            key: key.into(),
        })?;
        variable = key;
    }
    Ok(current)
}
