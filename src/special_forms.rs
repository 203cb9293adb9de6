use crate::environment::{Bindings, Scope, UnknownSymbol};
use crate::evaluator::{eval, evaluate_forms, Error, Result};
use crate::types::{Cons, Procedure, Symbol, Value};
use itertools::Itertools;
use std::rc::Rc;

fn ill_formed(form: &'static str, args: &[&Value]) -> Error {
    let expr = std::iter::once(form.to_string())
        .chain(args.iter().map(|arg| arg.inspect()))
        .join(" ");
    Error::IllFormed {
        form,
        expr: format!("({})", expr),
    }
}

pub fn apply_quote(args: &[&Value]) -> Result {
    match args {
        [quoted] => Ok((*quoted).clone()),
        _ => Err(ill_formed("quote", args)),
    }
}

pub fn apply_if(args: &[&Value], scope: &Scope) -> Result {
    let (condition, then, otherwise) = match args {
        [condition, then] => (condition, then, None),
        [condition, then, otherwise] => (condition, then, Some(otherwise)),
        _ => return Err(ill_formed("if", args)),
    };
    if eval(condition, scope)?.truthy() {
        eval(then, scope)
    } else if let Some(otherwise) = otherwise {
        eval(otherwise, scope)
    } else {
        Ok(Value::Nil)
    }
}

pub fn apply_set(args: &[&Value], scope: &Scope) -> Result {
    let (name, expr) = match args {
        [Value::Symbol(name), expr] => (name, expr),
        _ => return Err(ill_formed("set!", args)),
    };
    if scope.get(name).is_none() {
        return Err(Error::UnboundVariable(UnknownSymbol(name.to_string())));
    }
    let value = eval(expr, scope)?;
    log::debug!("set! {} to {}", name, value.inspect());
    scope.assign(name, value).map_err(Error::UnboundVariable)
}

pub fn apply_define(args: &[&Value], scope: &Scope) -> Result {
    let (name, value) = match args {
        [Value::Symbol(name)] => (name, Value::Nil),
        [Value::Symbol(name), init] => (name, eval(init, scope)?),
        _ => return Err(ill_formed("define", args)),
    };
    log::debug!("define {} as {}", name, value.inspect());
    scope.create(name, value);
    Ok(Value::Symbol(name.clone()))
}

fn parameter_names(params: &Value) -> Option<Vec<Symbol>> {
    match params {
        Value::Nil => Some(Vec::new()),
        Value::Cons(list) if list.is_proper() => list
            .iter()
            .map(|param| match param {
                Value::Symbol(name) => Some(name.clone()),
                _ => None,
            })
            .collect(),
        _ => None,
    }
}

pub fn apply_lambda(args: &[&Value], scope: &Scope) -> Result {
    let (params, first, rest) = match args {
        [params, first, rest @ ..] => (params, first, rest),
        _ => return Err(ill_formed("lambda", args)),
    };
    let params = parameter_names(params).ok_or_else(|| ill_formed("lambda", args))?;
    let body = Cons::new(
        (*first).clone(),
        Value::list(rest.iter().map(|form| (*form).clone())),
    );
    let procedure = Procedure {
        params,
        body,
        scope: scope.clone(),
    };
    Ok(Value::Procedure(Rc::new(procedure)))
}

pub fn apply_begin(args: &[&Value], scope: &Scope) -> Result {
    if args.is_empty() {
        return Err(ill_formed("begin", args));
    }
    evaluate_forms(args.iter().copied(), scope)
}
