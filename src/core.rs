use crate::evaluator;
use crate::types::{Arity, Number, PrimitiveFn, TypeMismatch, Value};
use itertools::Itertools;
use std::collections::HashMap;

fn grab_numbers(args: &[Value]) -> evaluator::Result<Vec<Number>> {
    let type_check: Result<Vec<_>, _> = args.iter().map(Value::as_number).collect();
    type_check.map_err(evaluator::Error::TypeMismatch)
}

/// Folds with the first argument as the starting accumulator.
fn accumulate(
    args: &[Value],
    name: &'static str,
    op: fn(Number, Number) -> Number,
) -> evaluator::Result {
    grab_numbers(args)?
        .into_iter()
        .fold1(op)
        .map(Value::Number)
        .ok_or_else(|| evaluator::Error::BadArgCount(Arity::at_least(1).mismatch(0, name)))
}

const SUM: PrimitiveFn = PrimitiveFn {
    name: "+",
    fn_ptr: sum_,
    arity: Arity::AtLeast(0..),
};

fn sum_(args: &[Value]) -> evaluator::Result {
    let value = grab_numbers(args)?
        .iter()
        .fold(0 as Number, |acc, &x| acc.wrapping_add(x));
    Ok(Value::Number(value))
}

const SUB: PrimitiveFn = PrimitiveFn {
    name: "-",
    fn_ptr: |args| accumulate(args, "-", Number::wrapping_sub),
    arity: Arity::at_least(1),
};

const MUL: PrimitiveFn = PrimitiveFn {
    name: "*",
    fn_ptr: |args| accumulate(args, "*", Number::wrapping_mul),
    arity: Arity::at_least(1),
};

/// Checks every consecutive pair, so `(> 4 3 2)` means `4 > 3` and `3 > 2`.
fn comparison_(args: &[Value], comp: fn(&Number, &Number) -> bool) -> evaluator::Result {
    let numbers = grab_numbers(args)?;
    let holds = numbers.iter().tuple_windows().all(|(x, y)| comp(x, y));
    Ok(Value::from(holds))
}

macro_rules! comparison_primitive {
    ($SYMBOL:tt, $NAME:ident) => {
        paste::item! {
            const $NAME: PrimitiveFn = PrimitiveFn {
                name: stringify!($SYMBOL),
                fn_ptr: |args: &[Value]| comparison_(args, Number:: [<$NAME:lower>]),
                arity: Arity::at_least(0),
            };
        }
    };
}

comparison_primitive!(<, LT);
comparison_primitive!(<=, LE);
comparison_primitive!(>, GT);
comparison_primitive!(>=, GE);

const EQUAL: PrimitiveFn = PrimitiveFn {
    name: "==",
    fn_ptr: equal_,
    arity: Arity::at_least(0),
};

fn equal_(args: &[Value]) -> evaluator::Result {
    for (x, y) in args.iter().tuple_windows() {
        let same = match (x, y) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            _ => {
                return Err(evaluator::Error::TypeMismatch(TypeMismatch::Incomparable(
                    x.clone(),
                    y.clone(),
                )))
            }
        };
        if !same {
            return Ok(Value::from(false));
        }
    }
    Ok(Value::from(true))
}

const DISPLAY: PrimitiveFn = PrimitiveFn {
    name: "display",
    fn_ptr: display_,
    arity: Arity::exactly(1),
};

fn display_(args: &[Value]) -> evaluator::Result {
    println!("{}", args[0]);
    Ok(args[0].clone())
}

const CONS: PrimitiveFn = PrimitiveFn {
    name: "cons",
    fn_ptr: cons_,
    arity: Arity::exactly(2),
};

fn cons_(args: &[Value]) -> evaluator::Result {
    Ok(Value::cons(args[0].clone(), args[1].clone()))
}

const CAR: PrimitiveFn = PrimitiveFn {
    name: "car",
    fn_ptr: car_,
    arity: Arity::exactly(1),
};

fn car_(args: &[Value]) -> evaluator::Result {
    let pair = args[0].as_cons()?;
    Ok(pair.car.clone())
}

const CDR: PrimitiveFn = PrimitiveFn {
    name: "cdr",
    fn_ptr: cdr_,
    arity: Arity::exactly(1),
};

fn cdr_(args: &[Value]) -> evaluator::Result {
    let pair = args[0].as_cons()?;
    Ok(pair.cdr.clone())
}

static BUILTINS: &[PrimitiveFn] = &[
    // Arithmetic
    SUM,
    SUB,
    MUL,
    // Comparisons
    EQUAL,
    GT,
    GE,
    LT,
    LE,
    // Output
    DISPLAY,
    // Working with pairs
    CONS,
    CAR,
    CDR,
];

type Namespace = HashMap<&'static str, &'static PrimitiveFn>;
lazy_static! {
    static ref CORE: Namespace = BUILTINS.iter().map(|func| (func.name, func)).collect();
}

pub(crate) fn lookup(name: &str) -> Option<&'static PrimitiveFn> {
    CORE.get(name).copied()
}
