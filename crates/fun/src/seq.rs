//! Sequence algorithms over plain slices.
//!
//! Every algorithm that calls a user function comes in two forms: a `try_*`
//! form whose function returns `Result` and which stops at the first error,
//! and an infallible form built on it. The dynamic surface drives the `try_*`
//! forms with the invoker as the function.

use std::collections::HashMap;
use std::convert::Infallible;
use std::hash::Hash;

pub(crate) fn infallible<T>(result: Result<T, Infallible>) -> T {
    result.unwrap_or_else(|never| match never {})
}

// ---------------------------------------------------------------------------
// Transforms
// ---------------------------------------------------------------------------

/// `output[i] = f(xs[i])`.
pub fn try_map<A, B, E>(xs: &[A], f: impl FnMut(&A) -> Result<B, E>) -> Result<Vec<B>, E> {
    xs.iter().map(f).collect()
}

pub fn map<A, B>(xs: &[A], mut f: impl FnMut(&A) -> B) -> Vec<B> {
    infallible(try_map(xs, |x| Ok(f(x))))
}

/// Call `f` on every element, in order.
pub fn try_each<A, E>(xs: &[A], f: impl FnMut(&A) -> Result<(), E>) -> Result<(), E> {
    xs.iter().try_for_each(f)
}

pub fn each<A>(xs: &[A], f: impl FnMut(&A)) {
    xs.iter().for_each(f)
}

/// Elements satisfying `p`, in their original order.
pub fn try_filter<A: Clone, E>(
    xs: &[A],
    mut p: impl FnMut(&A) -> Result<bool, E>,
) -> Result<Vec<A>, E> {
    let mut out = Vec::with_capacity(xs.len());
    for x in xs {
        if p(x)? {
            out.push(x.clone());
        }
    }
    Ok(out)
}

pub fn filter<A: Clone>(xs: &[A], mut p: impl FnMut(&A) -> bool) -> Vec<A> {
    infallible(try_filter(xs, |x| Ok(p(x))))
}

// ---------------------------------------------------------------------------
// Folds
// ---------------------------------------------------------------------------

/// Left fold. `f` receives the element first and the accumulator second:
/// `f(xs[n-1], ... f(xs[1], f(xs[0], init)))`.
pub fn try_foldl<A, B, E>(
    xs: &[A],
    init: B,
    mut f: impl FnMut(&A, B) -> Result<B, E>,
) -> Result<B, E> {
    xs.iter().try_fold(init, |acc, x| f(x, acc))
}

pub fn foldl<A, B>(xs: &[A], init: B, mut f: impl FnMut(&A, B) -> B) -> B {
    infallible(try_foldl(xs, init, |x, acc| Ok(f(x, acc))))
}

/// Right fold, last element first, with the same argument order as
/// [`foldl`]: `f(xs[0], ... f(xs[n-2], f(xs[n-1], init)))`.
pub fn try_foldr<A, B, E>(
    xs: &[A],
    init: B,
    mut f: impl FnMut(&A, B) -> Result<B, E>,
) -> Result<B, E> {
    xs.iter().rev().try_fold(init, |acc, x| f(x, acc))
}

pub fn foldr<A, B>(xs: &[A], init: B, mut f: impl FnMut(&A, B) -> B) -> B {
    infallible(try_foldr(xs, init, |x, acc| Ok(f(x, acc))))
}

// ---------------------------------------------------------------------------
// Copying helpers
// ---------------------------------------------------------------------------

/// Flatten one level, preserving order.
pub fn concat<A: Clone, S: AsRef<[A]>>(xss: &[S]) -> Vec<A> {
    let total = xss.iter().map(|xs| xs.as_ref().len()).sum();
    let mut out = Vec::with_capacity(total);
    for xs in xss {
        out.extend_from_slice(xs.as_ref());
    }
    out
}

pub fn reverse<A: Clone>(xs: &[A]) -> Vec<A> {
    xs.iter().rev().cloned().collect()
}

/// An independent duplicate of `xs`.
pub fn copy<A: Clone>(xs: &[A]) -> Vec<A> {
    xs.to_vec()
}

/// `x0, y0, x1, y1, ...` up to the shorter input.
pub fn zip<A: Clone>(xs: &[A], ys: &[A]) -> Vec<A> {
    let mut out = Vec::with_capacity(2 * xs.len().min(ys.len()));
    for (x, y) in xs.iter().zip(ys) {
        out.push(x.clone());
        out.push(y.clone());
    }
    out
}

/// `xs` with its first `len(ys)` positions overwritten by `ys`.
pub fn replace<A: Clone>(xs: &[A], ys: &[A]) -> Vec<A> {
    xs.iter()
        .enumerate()
        .map(|(i, x)| ys.get(i).unwrap_or(x).clone())
        .collect()
}

/// The half-open interval `[start, end)`.
///
/// # Panics
///
/// If `end < start`.
pub fn range(start: i64, end: i64) -> Vec<i64> {
    assert!(
        end >= start,
        "range must have end greater than or equal to start (got {start}..{end})"
    );
    (start..end).collect()
}

// ---------------------------------------------------------------------------
// Splitting
// ---------------------------------------------------------------------------

/// `(matches, non_matches)`, each in original order.
pub fn try_partition<A: Clone, E>(
    xs: &[A],
    mut p: impl FnMut(&A) -> Result<bool, E>,
) -> Result<(Vec<A>, Vec<A>), E> {
    let mut matches = Vec::with_capacity(xs.len());
    let mut rest = Vec::with_capacity(xs.len());
    for x in xs {
        if p(x)? {
            matches.push(x.clone());
        } else {
            rest.push(x.clone());
        }
    }
    Ok((matches, rest))
}

pub fn partition<A: Clone>(xs: &[A], mut p: impl FnMut(&A) -> bool) -> (Vec<A>, Vec<A>) {
    infallible(try_partition(xs, |x| Ok(p(x))))
}

/// Group elements by `f(x)`; each group keeps first-seen order.
pub fn try_group_by<A: Clone, K: Hash + Eq, E>(
    xs: &[A],
    mut f: impl FnMut(&A) -> Result<K, E>,
) -> Result<HashMap<K, Vec<A>>, E> {
    let mut groups: HashMap<K, Vec<A>> = HashMap::new();
    for x in xs {
        groups.entry(f(x)?).or_default().push(x.clone());
    }
    Ok(groups)
}

pub fn group_by<A: Clone, K: Hash + Eq>(xs: &[A], mut f: impl FnMut(&A) -> K) -> HashMap<K, Vec<A>> {
    infallible(try_group_by(xs, |x| Ok(f(x))))
}

/// Index of the first element satisfying `p`.
fn try_position<A, E>(xs: &[A], mut p: impl FnMut(&A) -> Result<bool, E>) -> Result<Option<usize>, E> {
    for (i, x) in xs.iter().enumerate() {
        if p(x)? {
            return Ok(Some(i));
        }
    }
    Ok(None)
}

/// The prefix before the first element satisfying `p` (exclusive); all of
/// `xs` if none does. `p` is not called past the first match.
pub fn try_take_until<A: Clone, E>(
    xs: &[A],
    p: impl FnMut(&A) -> Result<bool, E>,
) -> Result<Vec<A>, E> {
    let end = try_position(xs, p)?.unwrap_or(xs.len());
    Ok(xs[..end].to_vec())
}

pub fn take_until<A: Clone>(xs: &[A], mut p: impl FnMut(&A) -> bool) -> Vec<A> {
    infallible(try_take_until(xs, |x| Ok(p(x))))
}

/// The suffix starting at the first element satisfying `p` (inclusive);
/// empty if none does. `p` is not called past the first match.
pub fn try_drop_until<A: Clone, E>(
    xs: &[A],
    p: impl FnMut(&A) -> Result<bool, E>,
) -> Result<Vec<A>, E> {
    let start = try_position(xs, p)?.unwrap_or(xs.len());
    Ok(xs[start..].to_vec())
}

pub fn drop_until<A: Clone>(xs: &[A], mut p: impl FnMut(&A) -> bool) -> Vec<A> {
    infallible(try_drop_until(xs, |x| Ok(p(x))))
}

// ---------------------------------------------------------------------------
// Quantifiers
// ---------------------------------------------------------------------------

pub fn try_all<A, E>(xs: &[A], mut p: impl FnMut(&A) -> Result<bool, E>) -> Result<bool, E> {
    for x in xs {
        if !p(x)? {
            return Ok(false);
        }
    }
    Ok(true)
}

pub fn all<A>(xs: &[A], p: impl FnMut(&A) -> bool) -> bool {
    xs.iter().all(p)
}

pub fn try_any<A, E>(xs: &[A], p: impl FnMut(&A) -> Result<bool, E>) -> Result<bool, E> {
    Ok(try_position(xs, p)?.is_some())
}

pub fn any<A>(xs: &[A], p: impl FnMut(&A) -> bool) -> bool {
    xs.iter().any(p)
}

pub fn try_none<A, E>(xs: &[A], p: impl FnMut(&A) -> Result<bool, E>) -> Result<bool, E> {
    Ok(!try_any(xs, p)?)
}

pub fn none<A>(xs: &[A], p: impl FnMut(&A) -> bool) -> bool {
    !any(xs, p)
}

/// True iff exactly one element satisfies `p`. Stops at the second match.
pub fn try_one<A, E>(xs: &[A], mut p: impl FnMut(&A) -> Result<bool, E>) -> Result<bool, E> {
    let mut seen = false;
    for x in xs {
        if p(x)? {
            if seen {
                return Ok(false);
            }
            seen = true;
        }
    }
    Ok(seen)
}

pub fn one<A>(xs: &[A], mut p: impl FnMut(&A) -> bool) -> bool {
    infallible(try_one(xs, |x| Ok(p(x))))
}

pub fn try_count<A, E>(xs: &[A], mut p: impl FnMut(&A) -> Result<bool, E>) -> Result<usize, E> {
    let mut count = 0;
    for x in xs {
        if p(x)? {
            count += 1;
        }
    }
    Ok(count)
}

pub fn count<A>(xs: &[A], mut p: impl FnMut(&A) -> bool) -> usize {
    xs.iter().filter(|x| p(x)).count()
}

/// The first element satisfying `p`, or `None`.
pub fn try_detect<'a, A, E>(
    xs: &'a [A],
    p: impl FnMut(&A) -> Result<bool, E>,
) -> Result<Option<&'a A>, E> {
    Ok(try_position(xs, p)?.map(|i| &xs[i]))
}

pub fn detect<A>(xs: &[A], mut p: impl FnMut(&A) -> bool) -> Option<&A> {
    xs.iter().find(|x| p(x))
}

// ---------------------------------------------------------------------------
// Cycles
// ---------------------------------------------------------------------------

/// Call `f` on every element of `xs`, `passes` times over.
pub fn try_cycle_each<A, E>(
    xs: &[A],
    passes: usize,
    mut f: impl FnMut(&A) -> Result<(), E>,
) -> Result<(), E> {
    for _ in 0..passes {
        try_each(xs, &mut f)?;
    }
    Ok(())
}

pub fn cycle_each<A>(xs: &[A], passes: usize, mut f: impl FnMut(&A)) {
    infallible(try_cycle_each(xs, passes, |x| {
        f(x);
        Ok(())
    }))
}

/// [`map`] repeated `passes` times; output is pass-major, of length
/// `passes * xs.len()`.
pub fn try_cycle_map<A, B, E>(
    xs: &[A],
    passes: usize,
    mut f: impl FnMut(&A) -> Result<B, E>,
) -> Result<Vec<B>, E> {
    let mut out = Vec::with_capacity(passes.saturating_mul(xs.len()));
    for _ in 0..passes {
        for x in xs {
            out.push(f(x)?);
        }
    }
    Ok(out)
}

pub fn cycle_map<A, B>(xs: &[A], passes: usize, mut f: impl FnMut(&A) -> B) -> Vec<B> {
    infallible(try_cycle_map(xs, passes, |x| Ok(f(x))))
}
