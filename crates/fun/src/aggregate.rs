//! Aggregates over `f(x)`: minimum, maximum, both at once, and sum.
//!
//! Empty input yields zero for every aggregate (`(0, 0)` for the min/max
//! pair), never an error. Callers that must tell "empty" apart from "all
//! zeros" check the length first.

use crate::seq::infallible;

/// Running minimum and maximum of the projected values.
fn try_bounds<A, N, E>(
    xs: &[A],
    mut f: impl FnMut(&A) -> Result<N, E>,
) -> Result<Option<(N, N)>, E>
where
    N: Copy + PartialOrd,
{
    let mut bounds: Option<(N, N)> = None;
    for x in xs {
        let y = f(x)?;
        bounds = Some(match bounds {
            None => (y, y),
            Some((lo, hi)) => (if y < lo { y } else { lo }, if y > hi { y } else { hi }),
        });
    }
    Ok(bounds)
}

macro_rules! aggregates {
    (
        $num:ty, $zero:expr, $add:expr;
        $try_min:ident, $min:ident,
        $try_max:ident, $max:ident,
        $try_min_max:ident, $min_max:ident,
        $try_sum:ident, $sum:ident
    ) => {
        pub fn $try_min<A, E>(
            xs: &[A],
            f: impl FnMut(&A) -> Result<$num, E>,
        ) -> Result<$num, E> {
            Ok(try_bounds(xs, f)?.map_or($zero, |(lo, _)| lo))
        }

        #[doc = concat!("Smallest `f(x)`; `", stringify!($zero), "` for empty input.")]
        pub fn $min<A>(xs: &[A], mut f: impl FnMut(&A) -> $num) -> $num {
            infallible($try_min(xs, |x| Ok(f(x))))
        }

        pub fn $try_max<A, E>(
            xs: &[A],
            f: impl FnMut(&A) -> Result<$num, E>,
        ) -> Result<$num, E> {
            Ok(try_bounds(xs, f)?.map_or($zero, |(_, hi)| hi))
        }

        #[doc = concat!("Largest `f(x)`; `", stringify!($zero), "` for empty input.")]
        pub fn $max<A>(xs: &[A], mut f: impl FnMut(&A) -> $num) -> $num {
            infallible($try_max(xs, |x| Ok(f(x))))
        }

        pub fn $try_min_max<A, E>(
            xs: &[A],
            f: impl FnMut(&A) -> Result<$num, E>,
        ) -> Result<($num, $num), E> {
            Ok(try_bounds(xs, f)?.unwrap_or(($zero, $zero)))
        }

        /// `(min, max)` in one pass.
        pub fn $min_max<A>(xs: &[A], mut f: impl FnMut(&A) -> $num) -> ($num, $num) {
            infallible($try_min_max(xs, |x| Ok(f(x))))
        }

        pub fn $try_sum<A, E>(
            xs: &[A],
            mut f: impl FnMut(&A) -> Result<$num, E>,
        ) -> Result<$num, E> {
            let add: fn($num, $num) -> $num = $add;
            let mut total = $zero;
            for x in xs {
                total = add(total, f(x)?);
            }
            Ok(total)
        }

        pub fn $sum<A>(xs: &[A], mut f: impl FnMut(&A) -> $num) -> $num {
            infallible($try_sum(xs, |x| Ok(f(x))))
        }
    };
}

// Integer sums wrap on overflow.
aggregates!(
    i64, 0, i64::wrapping_add;
    try_min_int, min_int,
    try_max_int, max_int,
    try_min_max_int, min_max_int,
    try_sum_int, sum_int
);

aggregates!(
    f64, 0.0, |a, b| a + b;
    try_min_float, min_float,
    try_max_float, max_float,
    try_min_max_float, min_max_float,
    try_sum_float, sum_float
);
