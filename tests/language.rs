use matches::assert_matches;
use sexpr::interpreter::Error;
use sexpr::{evaluate, reader, Scope, Value};

fn run(source: &str) -> Value {
    evaluate(source, &Scope::new()).unwrap()
}

fn list_length(value: &Value) -> usize {
    match value {
        Value::Cons(list) => list.len(),
        other => panic!("expected a list, got {}", other),
    }
}

fn number(n: i64) -> Value {
    Value::Number(n)
}

#[test]
fn quote_returns_its_argument() {
    assert_eq!(run("(quote foo)"), Value::symbol("foo"));
    assert_eq!(run("(quote (1 (2 \"x\") y))").inspect(), "(1 (2 \"x\") y)");
    assert_eq!(run("(quote (quote a))").to_string(), "(quote a)");
}

#[test]
fn colon_shorthand_matches_quote() {
    let pairs = [
        (":foo", "(quote foo)"),
        ("::foo", "(quote (quote foo))"),
        (":(1 2 3)", "(quote (1 2 3))"),
        (":(a :b)", "(quote (a (quote b)))"),
        ("(car :(x y))", "(car (quote (x y)))"),
    ];
    for (short, long) in pairs.iter() {
        assert_eq!(run(short), run(long), "{} vs {}", short, long);
    }
}

#[test]
fn arithmetic() {
    assert_eq!(run("(+ 1 2 3)"), number(6));
    assert_eq!(run("(- 5 2 1)"), number(2));
    assert_eq!(run("(* 2 3 4)"), number(24));
    assert_eq!(run("(+ (* 2 3) (- 10 4))"), number(12));
}

#[test]
fn arithmetic_rejects_strings() {
    let err = evaluate("(+ 1 \"a\")", &Scope::new()).unwrap_err();
    assert_matches!(err, Error::Eval(sexpr::evaluator::Error::TypeMismatch(_)));
}

#[test]
fn comparisons() {
    assert_eq!(run("(> 4 3 2)"), Value::from(true));
    assert_eq!(run("(> 4 4 2)"), Value::from(false));
    assert_eq!(run("(== \"a\" \"a\")"), Value::from(true));
    assert_eq!(run("(if (< 1 2) :yes :no)"), Value::symbol("yes"));
}

#[test]
fn if_truthiness() {
    assert_eq!(run("(if false 42 1)"), number(1));
    assert_eq!(run("(if false 42)"), Value::Nil);
    assert_eq!(run("(if (quote false) 42 1)"), number(1));
    assert_eq!(run("(if (quote true) 42 1)"), number(42));
    assert_eq!(run("(if \"\" 42 1)"), number(42));
}

#[test]
fn define_and_set() {
    assert_eq!(run("(begin (define p 3) (+ 39 p))"), number(42));
    assert_eq!(run("(begin (define p 3) (set! p 4) (+ 1 p))"), number(5));
    let err = evaluate("(set! undefined 42)", &Scope::new()).unwrap_err();
    assert_eq!(err.to_string(), "unbound variable: undefined");
}

#[test]
fn recursion_through_closures() {
    let source = "(define fact (lambda (n) (if (<= n 1) 1 (* n (fact (- n 1)))))) (fact 20)";
    assert_eq!(run(source), number(2_432_902_008_176_640_000));
}

#[test]
fn mutual_recursion_sees_later_definitions() {
    let source = "
        (define even? (lambda (n) (if (== n 0) true (odd? (- n 1)))))
        (define odd? (lambda (n) (if (== n 0) false (even? (- n 1)))))
        (even? 10)";
    assert_eq!(run(source), Value::from(true));
}

#[test]
fn scoping_is_lexical() {
    let source = "
        (define x 1)
        (define get-x (lambda () x))
        (define call-with-x (lambda (x) (get-x)))
        (call-with-x 2)";
    assert_eq!(run(source), number(1));
}

#[test]
fn closures_capture_their_frames() {
    let source = "
        (define make-adder (lambda (n) (lambda (m) (+ n m))))
        (define add5 (make-adder 5))
        (define add1 (make-adder 1))
        (+ (add5 10) (add1 10))";
    assert_eq!(run(source), number(26));
}

#[test]
fn closures_share_state_by_reference() {
    let source = "
        (define make-counter
          (lambda ()
            (define count 0)
            (lambda () (set! count (+ count 1)))))
        (define tick (make-counter))
        (tick) (tick) (tick)";
    assert_eq!(run(source), number(3));
}

#[test]
fn define_shadows_inside_procedures() {
    let scope = Scope::new();
    let source = "
        (define x 1)
        (define f (lambda () (define x 2) x))
        (f)";
    assert_eq!(evaluate(source, &scope).unwrap(), number(2));
    assert_eq!(evaluate("x", &scope).unwrap(), number(1));
}

#[test]
fn set_reaches_outer_frames() {
    let source = "
        (define total 0)
        (define add! (lambda (n) (set! total (+ total n))))
        (add! 4) (add! 5)
        total";
    assert_eq!(run(source), number(9));
}

#[test]
fn arity_is_enforced() {
    let err = evaluate("((lambda (x) x) 1 2)", &Scope::new()).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("exactly 1"), "{}", message);
    assert!(message.contains("received 2"), "{}", message);
}

#[test]
fn applying_a_non_procedure() {
    let err = evaluate("(define n 3) (n 1)", &Scope::new()).unwrap_err();
    assert_eq!(err.to_string(), "the object 3 is not applicable");
}

#[test]
fn structural_errors() {
    let scope = Scope::new();
    assert_eq!(
        evaluate("(1", &scope).unwrap_err().to_string(),
        "list was opened but not closed"
    );
    assert_eq!(
        evaluate(") (1)", &scope).unwrap_err().to_string(),
        "list was closed but not opened"
    );
    assert_matches!(
        evaluate("(+ 1 2.5)", &scope),
        Err(Error::Read(reader::Error::BadNumber(_)))
    );
}

#[test]
fn pairs() {
    assert_eq!(run("(car (cons 1 2))"), number(1));
    assert_eq!(run("(cdr (cons 1 2))"), number(2));
    assert_eq!(run("(cons 1 (cons 2 ()))").to_string(), "(1 2)");
    assert_eq!(run("(cons :a :b)").to_string(), "(a . b)");
    assert_eq!(run("(car (cdr :(1 2 3)))"), number(2));
}

#[test]
fn comments_and_whitespace_are_ignored() {
    let source = "
        ; set things up
        (define a 40) ; the answer, almost
        (+ a
           2)";
    assert_eq!(run(source), number(42));
}

#[test]
fn literals_round_trip_through_inspect() {
    let sources = [
        "42",
        "\"a string\"",
        "\"with \\\"escapes\\\"\"",
        "sym",
        "(a 1 \"b\" (c ()))",
        "(quote (x y))",
    ];
    for source in sources.iter() {
        let program = reader::read_str(source).unwrap();
        let form = match &program {
            Value::Cons(forms) => forms.car.clone(),
            other => panic!("nothing parsed from {}: {}", source, other),
        };
        let reparsed = reader::read_str(&form.inspect()).unwrap();
        assert_eq!(reparsed, program, "{}", source);
    }
}

#[test]
fn display_returns_its_argument() {
    assert_eq!(run("(display (+ 1 1))"), number(2));
}

#[test]
fn long_flat_programs_and_lists() {
    let source = "1 ".repeat(100_000);
    let program = reader::read_str(&source).unwrap();
    assert_eq!(list_length(&program), 100_000);
    assert_eq!(program, reader::read_str(&source).unwrap());
    drop(program);

    assert_eq!(run(&source), number(1));

    let quoted = format!("(quote ({}))", source);
    let list = run(&quoted);
    assert_eq!(list_length(&list), 100_000);
}

#[test]
fn clearing_a_scope_frees_recursive_procedures() {
    use sexpr::Bindings;

    let scope = Scope::new();
    evaluate("(define f (lambda (n) (if (== n 0) 0 (f (- n 1)))))", &scope).unwrap();
    let weak = match scope.get("f") {
        Some(Value::Procedure(procedure)) => std::rc::Rc::downgrade(&procedure),
        other => panic!("expected a procedure, got {:?}", other),
    };
    assert_eq!(evaluate("(f 3)", &scope).unwrap(), number(0));

    scope.clear();
    drop(scope);
    assert!(weak.upgrade().is_none());
}
