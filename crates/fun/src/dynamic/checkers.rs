//! Quantifiers over a predicate `fn(A) -> Bool`.

use fun_types::CallPattern;
use fun_value::{CallError, Value};

use super::{check, holds, patterns};
use crate::{Error, seq};

type Predicate<'p> = dyn FnMut(&Value) -> Result<bool, CallError> + 'p;

type Quantifier<T> = fn(&[Value], &mut Predicate<'_>) -> Result<T, CallError>;

fn quantify<T>(pattern: &CallPattern, p: &Value, xs: &Value, run: Quantifier<T>) -> Result<T, Error> {
    let call = check(pattern, &[p, xs])?;
    let (p, xs) = (call.func(0), call.list(1));
    Ok(run(xs.items(), &mut |x: &Value| holds(p, x))?)
}

/// True iff every element satisfies `p` (vacuously true when empty).
pub fn all(p: &Value, xs: &Value) -> Result<bool, Error> {
    quantify(&patterns::ALL, p, xs, |xs, p| seq::try_all(xs, p))
}

pub fn any(p: &Value, xs: &Value) -> Result<bool, Error> {
    quantify(&patterns::ANY, p, xs, |xs, p| seq::try_any(xs, p))
}

pub fn none(p: &Value, xs: &Value) -> Result<bool, Error> {
    quantify(&patterns::NONE, p, xs, |xs, p| seq::try_none(xs, p))
}

/// True iff exactly one element satisfies `p`.
pub fn one(p: &Value, xs: &Value) -> Result<bool, Error> {
    quantify(&patterns::ONE, p, xs, |xs, p| seq::try_one(xs, p))
}

pub fn count(p: &Value, xs: &Value) -> Result<usize, Error> {
    quantify(&patterns::COUNT, p, xs, |xs, p| seq::try_count(xs, p))
}

/// The first element satisfying `p`, or `None`.
pub fn detect(p: &Value, xs: &Value) -> Result<Option<Value>, Error> {
    quantify(&patterns::DETECT, p, xs, |xs, p| {
        Ok(seq::try_detect(xs, p)?.cloned())
    })
}
