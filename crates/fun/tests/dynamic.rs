//! Integration tests for the dynamically typed surface.

use std::sync::{Arc, Mutex};

use fun::dynamic;
use fun::{Error, Function, Sequence, Value};
use fun_diag::{Category, ToDiagnostic};
use fun_types::Type;
use fun_value::CallError;

fn ints(xs: &[i64]) -> Value {
    Value::List(Sequence::of(xs.to_vec()))
}

fn floats(xs: &[f64]) -> Value {
    Value::List(Sequence::of(xs.to_vec()))
}

fn strings(xs: &[&str]) -> Value {
    Value::List(Sequence::of(xs.iter().map(|s| s.to_string()).collect()))
}

fn func(f: Function) -> Value {
    Value::Func(f)
}

fn square() -> Value {
    func(Function::unary(|x: i64| x * x))
}

fn even() -> Value {
    func(Function::unary(|x: i64| x % 2 == 0))
}

// ---------------------------------------------------------------------------
// Transforms and folds
// ---------------------------------------------------------------------------

#[test]
fn map() {
    assert_eq!(dynamic::map(&square(), &ints(&[1, 2, 3, 4, 5])), Ok(ints(&[1, 4, 9, 16, 25])));
    assert_eq!(dynamic::map(&square(), &ints(&[])), Ok(ints(&[])));

    let strlen = func(Function::unary(|s: String| s.len() as i64));
    assert_eq!(dynamic::map(&strlen, &strings(&["abc", "ab", "a"])), Ok(ints(&[3, 2, 1])));
}

#[test]
fn map_to_nested_lists() {
    let digits = func(Function::unary(|n: i64| {
        n.to_string()
            .chars()
            .map(|c| i64::from(c.to_digit(10).unwrap_or(0)))
            .collect::<Vec<i64>>()
    }));
    let out = dynamic::map(&digits, &ints(&[12, 3])).expect("map binds");
    assert_eq!(out.ty(), Type::list(Type::list(Type::Int)));
    assert_eq!(out, Value::List(Sequence::of(vec![vec![1i64, 2], vec![3]])));
}

#[test]
fn each() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let greet = func(Function::procedure(move |n: String| {
        sink.lock().expect("not poisoned").push(format!("Hey {n}"));
    }));

    dynamic::each(&greet, &strings(&["a", "b", "c"])).expect("each binds");
    assert_eq!(*seen.lock().expect("not poisoned"), vec!["Hey a", "Hey b", "Hey c"]);

    dynamic::each(&greet, &strings(&[])).expect("each binds");
    assert_eq!(seen.lock().expect("not poisoned").len(), 3);
}

#[test]
fn filter() {
    let xs = ints(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
    assert_eq!(dynamic::filter(&even(), &xs), Ok(ints(&[2, 4, 6, 8, 10])));
    assert_eq!(dynamic::filter(&even(), &ints(&[])), Ok(ints(&[])));
}

#[test]
fn folds_with_non_associative_reducer() {
    let reducer = func(Function::binary(|elem: i64, acc: i64| acc % elem));
    let xs = ints(&[4, 5, 6]);
    assert_eq!(dynamic::foldl(&reducer, &Value::Int(7), &xs), Ok(Value::Int(3)));
    assert_eq!(dynamic::foldr(&reducer, &Value::Int(7), &xs), Ok(Value::Int(1)));
    assert_eq!(dynamic::foldl(&reducer, &Value::Int(0), &ints(&[])), Ok(Value::Int(0)));
    assert_eq!(dynamic::foldr(&reducer, &Value::Int(0), &ints(&[])), Ok(Value::Int(0)));
}

#[test]
fn fold_accumulator_may_differ_from_element() {
    let join = func(Function::binary(|elem: i64, acc: String| format!("{acc}{elem}")));
    let out = dynamic::foldl(&join, &Value::Str(">".into()), &ints(&[1, 2, 3]));
    assert_eq!(out, Ok(Value::Str(">123".into())));
}

#[test]
fn fold_init_must_match_accumulator() {
    let reducer = func(Function::binary(|elem: i64, acc: i64| acc + elem));
    let err = dynamic::foldl(&reducer, &Value::Float(0.0), &ints(&[1]))
        .expect_err("Float init for Int accumulator");
    assert_eq!(err.to_diagnostic().category, Category::TypeMismatch);
}

// ---------------------------------------------------------------------------
// Copying helpers
// ---------------------------------------------------------------------------

#[test]
fn concat() {
    let xss = Value::List(Sequence::of(vec![vec![1i64, 2, 3], vec![4, 5, 6], vec![7, 8, 9]]));
    assert_eq!(dynamic::concat(&xss), Ok(ints(&[1, 2, 3, 4, 5, 6, 7, 8, 9])));
}

#[test]
fn reverse_and_copy() {
    assert_eq!(dynamic::reverse(&ints(&[1, 2, 3, 4, 5])), Ok(ints(&[5, 4, 3, 2, 1])));

    let orig = ints(&[1, 2, 3, 4, 5]);
    let copied = dynamic::copy(&orig).expect("copy binds");
    let mut orig = orig.into_list().expect("a list");
    orig.set(1, Value::Int(999)).expect("Int into List(Int)");
    assert_eq!(copied, ints(&[1, 2, 3, 4, 5]));
}

#[test]
fn zip() {
    assert_eq!(dynamic::zip(&ints(&[1, 3, 5]), &ints(&[2, 4, 6])), Ok(ints(&[1, 2, 3, 4, 5, 6])));
    assert_eq!(dynamic::zip(&ints(&[1, 2, 3]), &ints(&[])), Ok(ints(&[])));
    assert_eq!(
        dynamic::zip(&strings(&["a", "b", "c", "d"]), &strings(&["1", "2"])),
        Ok(strings(&["a", "1", "b", "2"]))
    );
}

#[test]
fn zip_requires_one_element_type() {
    let err = dynamic::zip(&ints(&[1]), &floats(&[1.0])).expect_err("Int vs Float");
    insta::assert_snapshot!(err.to_diagnostic().to_string(), @r"
    error[E0001]: `zip`: type variable A is Int but argument #2 > element is Float
      at: argument #2 > element
      help: every position typed A must receive exactly the same type
    ");
}

#[test]
fn replace() {
    let a = ints(&[1, 2, 3, 4, 5]);
    let b = ints(&[5, 4, 3]);
    assert_eq!(dynamic::replace(&a, &b), Ok(ints(&[5, 4, 3, 4, 5])));
    assert_eq!(dynamic::replace(&b, &a), Ok(ints(&[1, 2, 3])));
}

#[test]
fn range() {
    assert_eq!(dynamic::range(&Value::Int(2), &Value::Int(5)), Ok(ints(&[2, 3, 4])));
    assert_eq!(dynamic::range(&Value::Int(3), &Value::Int(3)), Ok(ints(&[])));
}

#[test]
#[should_panic(expected = "range must have end greater than or equal to start")]
fn range_with_reversed_bounds_panics() {
    let _ = dynamic::range(&Value::Int(5), &Value::Int(1));
}

// ---------------------------------------------------------------------------
// Splitting
// ---------------------------------------------------------------------------

#[test]
fn partition() {
    let (evens, odds) = dynamic::partition(&even(), &ints(&[1, 2, 3, 4, 5])).expect("binds");
    assert_eq!(evens, ints(&[2, 4]));
    assert_eq!(odds, ints(&[1, 3, 5]));

    let (evens, odds) = dynamic::partition(&even(), &ints(&[])).expect("binds");
    assert_eq!((evens, odds), (ints(&[]), ints(&[])));
}

#[test]
fn group_by_first_letter() {
    let first = func(Function::unary(|s: String| s.chars().take(1).collect::<String>()));
    let out = dynamic::group_by(&first, &strings(&["apple", "banana", "avocado", "blueberry", "cherry"]))
        .expect("group_by binds");
    assert_eq!(out.ty(), Type::map(Type::String, Type::list(Type::String)));

    let groups = out.as_map().expect("a mapping");
    let keys: Vec<_> = groups.keys().filter_map(Value::as_str).collect();
    assert_eq!(keys, vec!["a", "b", "c"]);
    assert_eq!(groups.get(&Value::Str("a".into())), Some(&strings(&["apple", "avocado"])));
    assert_eq!(groups.get(&Value::Str("b".into())), Some(&strings(&["banana", "blueberry"])));
}

#[test]
fn group_by_rejects_list_keys() {
    let wrap = func(Function::unary(|n: i64| vec![n]));
    let err = dynamic::group_by(&wrap, &ints(&[1, 2])).expect_err("lists cannot be keys");
    assert_eq!(err.to_diagnostic().category, Category::UnhashableKey);
}

#[test]
fn take_and_drop_until() {
    let big = func(Function::unary(|n: i64| n > 5));
    let xs = ints(&[1, 2, 3, 10, 4]);
    assert_eq!(dynamic::take_until(&big, &xs), Ok(ints(&[1, 2, 3])));
    assert_eq!(dynamic::drop_until(&big, &xs), Ok(ints(&[10, 4])));

    let never = func(Function::unary(|_: i64| false));
    assert_eq!(dynamic::take_until(&never, &xs), Ok(xs.clone()));
    assert_eq!(dynamic::drop_until(&never, &xs), Ok(ints(&[])));
}

// ---------------------------------------------------------------------------
// Quantifiers
// ---------------------------------------------------------------------------

#[test]
fn quantifiers() {
    let xs = ints(&[1, 2, 3, 4, 5, 6]);
    assert_eq!(dynamic::all(&even(), &xs), Ok(false));
    let under_ten = func(Function::unary(|x: i64| x < 10));
    assert_eq!(dynamic::all(&under_ten, &ints(&[1, 2, 3, 4, 5])), Ok(true));

    assert_eq!(dynamic::any(&even(), &xs), Ok(true));
    let over_ten = func(Function::unary(|x: i64| x > 10));
    assert_eq!(dynamic::any(&over_ten, &ints(&[1, 2, 3, 4, 5])), Ok(false));
    assert_eq!(dynamic::none(&over_ten, &xs), Ok(true));

    let four = func(Function::unary(|x: i64| x == 4));
    assert_eq!(dynamic::one(&four, &xs), Ok(true));
    assert_eq!(dynamic::one(&even(), &xs), Ok(false));

    assert_eq!(dynamic::count(&even(), &xs), Ok(3));
    assert_eq!(dynamic::count(&even(), &ints(&[])), Ok(0));
}

#[test]
fn detect() {
    assert_eq!(dynamic::detect(&even(), &ints(&[1, 2, 3, 4, 5, 6])), Ok(Some(Value::Int(2))));
    assert_eq!(dynamic::detect(&even(), &ints(&[])), Ok(None));
}

// ---------------------------------------------------------------------------
// Cycles
// ---------------------------------------------------------------------------

#[test]
fn cycle_each() {
    let out = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&out);
    let counter = Arc::new(Mutex::new(0i64));
    let f = func(Function::procedure(move |n: i64| {
        let mut i = counter.lock().expect("not poisoned");
        sink.lock().expect("not poisoned").push(*i * n);
        *i += 1;
    }));

    dynamic::cycle_each(&f, &ints(&[1, 2, 3]), 2).expect("binds");
    assert_eq!(*out.lock().expect("not poisoned"), vec![0, 2, 6, 3, 8, 15]);

    out.lock().expect("not poisoned").clear();
    dynamic::cycle_each(&f, &ints(&[]), 4).expect("binds");
    dynamic::cycle_each(&f, &ints(&[1, 2]), 0).expect("binds");
    assert!(out.lock().expect("not poisoned").is_empty());
}

#[test]
fn cycle_map() {
    assert_eq!(dynamic::cycle_map(&square(), &ints(&[1, 2, 3]), 2), Ok(ints(&[1, 4, 9, 1, 4, 9])));
    assert_eq!(dynamic::cycle_map(&square(), &ints(&[]), 1), Ok(ints(&[])));
}

// ---------------------------------------------------------------------------
// Aggregates
// ---------------------------------------------------------------------------

#[test]
fn int_aggregates() {
    let xs = ints(&[1, 2, 3]);
    assert_eq!(dynamic::min_int(&square(), &xs), Ok(1));
    assert_eq!(dynamic::max_int(&square(), &xs), Ok(9));
    assert_eq!(dynamic::min_max_int(&square(), &xs), Ok((1, 9)));
    assert_eq!(dynamic::sum_int(&square(), &xs), Ok(14));

    assert_eq!(dynamic::min_int(&square(), &ints(&[])), Ok(0));
    assert_eq!(dynamic::max_int(&square(), &ints(&[])), Ok(0));
    assert_eq!(dynamic::min_max_int(&square(), &ints(&[])), Ok((0, 0)));
}

#[test]
fn float_aggregates() {
    let square = func(Function::unary(|x: f64| x * x));
    let xs = floats(&[1.0, 2.0, 3.0]);
    assert_eq!(dynamic::min_float(&square, &xs), Ok(1.0));
    assert_eq!(dynamic::max_float(&square, &xs), Ok(9.0));
    assert_eq!(dynamic::min_max_float(&square, &xs), Ok((1.0, 9.0)));
    assert_eq!(dynamic::sum_float(&square, &xs), Ok(14.0));

    assert_eq!(dynamic::min_float(&square, &floats(&[])), Ok(0.0));
    assert_eq!(dynamic::min_max_float(&square, &floats(&[])), Ok((0.0, 0.0)));
}

// ---------------------------------------------------------------------------
// Parallel map
// ---------------------------------------------------------------------------

#[test]
fn par_map_preserves_order() {
    let xs: Vec<i64> = (0..5_000).collect();
    let expected = ints(&xs.iter().map(|x| x * x).collect::<Vec<_>>());
    let xs = ints(&xs);
    assert_eq!(dynamic::par_map(&square(), &xs), Ok(expected.clone()));
    for workers in [0, 1, 2, 7] {
        assert_eq!(dynamic::par_map_n(&square(), &xs, workers), Ok(expected.clone()));
    }
}

#[test]
fn par_map_reports_callee_failure() {
    let f = func(Function::try_unary(|x: i64| {
        if x == 1_234 {
            Err(CallError::failed(format!("cannot handle {x}")))
        } else {
            Ok(x)
        }
    }));
    let xs = ints(&(0..4_000).collect::<Vec<_>>());
    let err = dynamic::par_map_n(&f, &xs, 4).expect_err("one element fails");
    assert_eq!(err, Error::Call(CallError::failed("cannot handle 1234")));
}

// ---------------------------------------------------------------------------
// Type errors surface before any call
// ---------------------------------------------------------------------------

#[test]
fn mismatch_is_reported_before_any_call() {
    let calls = Arc::new(Mutex::new(0usize));
    let counted = Arc::clone(&calls);
    let f = func(Function::unary(move |x: i64| {
        *counted.lock().expect("not poisoned") += 1;
        x
    }));

    let err = dynamic::map(&f, &strings(&["a", "b"])).expect_err("String elements for fn(Int)");
    assert!(matches!(err, Error::Solve(_)));
    assert_eq!(*calls.lock().expect("not poisoned"), 0);
}

#[test]
fn untyped_function_must_honor_its_signature() {
    let liar = func(Function::new(
        fun_types::FunctionType::new(vec![Type::Int], vec![Type::Int]),
        |_| Ok(vec![Value::Bool(true)]),
    ));
    let err = dynamic::map(&liar, &ints(&[1])).expect_err("declared Int, returned Bool");
    assert_eq!(err.to_diagnostic().category, Category::CallFailed);
}

#[test]
fn shape_mismatch_diagnostic() {
    let err = dynamic::filter(&ints(&[1]), &ints(&[1])).expect_err("a list is not a predicate");
    insta::assert_snapshot!(err.diagnostic_error().to_string(), @r"
    error[E0002]: `filter`: expected fn(A) -> Bool at argument #1, found List(Int)
      at: argument #1
      help: supply a function value here
    ");
}
