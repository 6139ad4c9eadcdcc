//! List-producing algorithms: transforms, folds, copies, splits and cycles.
//!
//! Every output sequence is rebuilt through [`Sequence::try_from_values`], so
//! its element type always agrees with its items.

use fun_types::Type;
use fun_value::{Mapping, Sequence, Value, invoke_void, invoke1};

use super::{apply, check, holds, patterns};
use crate::par::{self, ParConfig};
use crate::{Error, seq};

/// Build the output sequence for a list-typed return.
fn list_of(element: Type, items: Vec<Value>) -> Result<Value, Error> {
    Ok(Value::List(Sequence::try_from_values(element, items)?))
}

/// Negative pass counts run zero passes.
fn passes(n: i64) -> usize {
    usize::try_from(n).unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Transforms
// ---------------------------------------------------------------------------

/// `map(f, xs)`: `fn(fn(A) -> B, List(A)) -> List(B)`.
pub fn map(f: &Value, xs: &Value) -> Result<Value, Error> {
    let call = check(&patterns::MAP, &[f, xs])?;
    let f = call.func(0);
    let ys = seq::try_map(call.list(1).items(), |x| apply(f, x))?;
    list_of(call.ret_element(0), ys)
}

/// Call `f` on every element of `xs`, in order.
pub fn each(f: &Value, xs: &Value) -> Result<(), Error> {
    let call = check(&patterns::EACH, &[f, xs])?;
    let f = call.func(0);
    seq::try_each(call.list(1).items(), |x| invoke_void(f, std::slice::from_ref(x)))?;
    Ok(())
}

pub fn filter(p: &Value, xs: &Value) -> Result<Value, Error> {
    let call = check(&patterns::FILTER, &[p, xs])?;
    let (p, xs) = (call.func(0), call.list(1));
    let kept = seq::try_filter(xs.items(), |x| holds(p, x))?;
    list_of(xs.element().clone(), kept)
}

/// [`map`] on a worker pool sized to the machine.
pub fn par_map(f: &Value, xs: &Value) -> Result<Value, Error> {
    par_map_with(f, xs, &ParConfig::default())
}

/// [`map`] on `workers` workers (at least 1).
pub fn par_map_n(f: &Value, xs: &Value, workers: usize) -> Result<Value, Error> {
    par_map_with(f, xs, &ParConfig::with_workers(workers))
}

pub fn par_map_with(f: &Value, xs: &Value, config: &ParConfig) -> Result<Value, Error> {
    let call = check(&patterns::PAR_MAP, &[f, xs])?;
    let f = call.func(0);
    let ys = par::try_par_map_with(call.list(1).items(), config, |x| apply(f, x))?;
    list_of(call.ret_element(0), ys)
}

// ---------------------------------------------------------------------------
// Folds
// ---------------------------------------------------------------------------

/// `foldl(f, init, xs)` with `f(element, accumulator)`.
pub fn foldl(f: &Value, init: &Value, xs: &Value) -> Result<Value, Error> {
    let call = check(&patterns::FOLDL, &[f, init, xs])?;
    let f = call.func(0);
    let result = seq::try_foldl(call.list(2).items(), call.value(1).clone(), |x, acc| {
        invoke1(f, &[x.clone(), acc])
    })?;
    Ok(result)
}

/// `foldr(f, init, xs)`: last element first, `f(element, accumulator)`.
pub fn foldr(f: &Value, init: &Value, xs: &Value) -> Result<Value, Error> {
    let call = check(&patterns::FOLDR, &[f, init, xs])?;
    let f = call.func(0);
    let result = seq::try_foldr(call.list(2).items(), call.value(1).clone(), |x, acc| {
        invoke1(f, &[x.clone(), acc])
    })?;
    Ok(result)
}

// ---------------------------------------------------------------------------
// Copying helpers
// ---------------------------------------------------------------------------

pub fn concat(xss: &Value) -> Result<Value, Error> {
    let call = check(&patterns::CONCAT, &[xss])?;
    let parts: Vec<&[Value]> = call
        .list(0)
        .iter()
        .map(|xs| match xs {
            Value::List(inner) => inner.items(),
            other => unreachable!("concat bound List(List(A)), found {:?}", other.ty()),
        })
        .collect();
    list_of(call.ret_element(0), seq::concat(&parts))
}

pub fn reverse(xs: &Value) -> Result<Value, Error> {
    let call = check(&patterns::REVERSE, &[xs])?;
    let xs = call.list(0);
    list_of(xs.element().clone(), seq::reverse(xs.items()))
}

/// An independent duplicate of `xs`.
pub fn copy(xs: &Value) -> Result<Value, Error> {
    let call = check(&patterns::COPY, &[xs])?;
    let xs = call.list(0);
    list_of(xs.element().clone(), seq::copy(xs.items()))
}

pub fn zip(xs: &Value, ys: &Value) -> Result<Value, Error> {
    let call = check(&patterns::ZIP, &[xs, ys])?;
    let (xs, ys) = (call.list(0), call.list(1));
    list_of(xs.element().clone(), seq::zip(xs.items(), ys.items()))
}

/// `xs` with its first `len(ys)` positions taken from `ys`.
pub fn replace(xs: &Value, ys: &Value) -> Result<Value, Error> {
    let call = check(&patterns::REPLACE, &[xs, ys])?;
    let (xs, ys) = (call.list(0), call.list(1));
    list_of(xs.element().clone(), seq::replace(xs.items(), ys.items()))
}

/// `[start, end)` as a `List(Int)`.
///
/// # Panics
///
/// If `end < start`.
pub fn range(start: &Value, end: &Value) -> Result<Value, Error> {
    let call = check(&patterns::RANGE, &[start, end])?;
    let ints = seq::range(call.int(0), call.int(1));
    Ok(Value::List(Sequence::of(ints)))
}

// ---------------------------------------------------------------------------
// Splitting
// ---------------------------------------------------------------------------

/// `(matches, non_matches)`.
pub fn partition(p: &Value, xs: &Value) -> Result<(Value, Value), Error> {
    let call = check(&patterns::PARTITION, &[p, xs])?;
    let (p, xs) = (call.func(0), call.list(1));
    let (matches, rest) = seq::try_partition(xs.items(), |x| holds(p, x))?;
    Ok((
        list_of(xs.element().clone(), matches)?,
        list_of(xs.element().clone(), rest)?,
    ))
}

/// A mapping from `f(x)` to the elements sharing that key. Keys iterate in
/// first-seen order; each group keeps input order.
pub fn group_by(f: &Value, xs: &Value) -> Result<Value, Error> {
    let call = check(&patterns::GROUP_BY, &[f, xs])?;
    let (f, xs) = (call.func(0), call.list(1));
    let Type::Map(key, group) = call.ret(0) else {
        unreachable!("group_by bound {}", call.ret(0))
    };
    let mut groups = Mapping::new((**key).clone(), (**group).clone())?;
    seq::try_each(xs.items(), |x| -> Result<(), Error> {
        let key = apply(f, x)?;
        groups.push_to(key, x.clone())?;
        Ok(())
    })?;
    Ok(Value::Map(groups))
}

/// Elements before the first one satisfying `p`.
pub fn take_until(p: &Value, xs: &Value) -> Result<Value, Error> {
    let call = check(&patterns::TAKE_UNTIL, &[p, xs])?;
    let (p, xs) = (call.func(0), call.list(1));
    let prefix = seq::try_take_until(xs.items(), |x| holds(p, x))?;
    list_of(xs.element().clone(), prefix)
}

/// Elements from the first one satisfying `p` onwards.
pub fn drop_until(p: &Value, xs: &Value) -> Result<Value, Error> {
    let call = check(&patterns::DROP_UNTIL, &[p, xs])?;
    let (p, xs) = (call.func(0), call.list(1));
    let suffix = seq::try_drop_until(xs.items(), |x| holds(p, x))?;
    list_of(xs.element().clone(), suffix)
}

// ---------------------------------------------------------------------------
// Cycles
// ---------------------------------------------------------------------------

/// [`each`] over `xs`, `n` times. `n <= 0` makes no calls.
pub fn cycle_each(f: &Value, xs: &Value, n: i64) -> Result<(), Error> {
    let call = check(&patterns::CYCLE_EACH, &[f, xs])?;
    let f = call.func(0);
    seq::try_cycle_each(call.list(1).items(), passes(n), |x| {
        invoke_void(f, std::slice::from_ref(x))
    })?;
    Ok(())
}

/// [`map`] over `xs`, `n` times, pass-major. `n <= 0` yields an empty list.
pub fn cycle_map(f: &Value, xs: &Value, n: i64) -> Result<Value, Error> {
    let call = check(&patterns::CYCLE_MAP, &[f, xs])?;
    let f = call.func(0);
    let ys = seq::try_cycle_map(call.list(1).items(), passes(n), |x| apply(f, x))?;
    list_of(call.ret_element(0), ys)
}
