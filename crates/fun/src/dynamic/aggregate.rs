//! Min, max and sum of `f(x)` for `f: fn(A) -> Int` or `fn(A) -> Float`.
//!
//! Empty input yields zero, as in [`crate::aggregate`].

use fun_types::CallPattern;
use fun_value::{CallError, Function, Value};

use super::{apply, check, patterns};
use crate::{Error, aggregate};

fn int_of(f: &Function, x: &Value) -> Result<i64, CallError> {
    let y = apply(f, x)?;
    Ok(y.as_int().unwrap_or_else(|| unreachable!("fn(A) -> Int returned {y:?}")))
}

fn float_of(f: &Function, x: &Value) -> Result<f64, CallError> {
    let y = apply(f, x)?;
    Ok(y.as_float().unwrap_or_else(|| unreachable!("fn(A) -> Float returned {y:?}")))
}

macro_rules! dynamic_aggregates {
    ($project:ident; $($name:ident => $pattern:ident, $run:path, $out:ty;)*) => {
        $(
            pub fn $name(f: &Value, xs: &Value) -> Result<$out, Error> {
                let pattern: &CallPattern = &patterns::$pattern;
                let call = check(pattern, &[f, xs])?;
                let f = call.func(0);
                Ok($run(call.list(1).items(), |x: &Value| $project(f, x))?)
            }
        )*
    };
}

dynamic_aggregates! {
    int_of;
    min_int => MIN_INT, aggregate::try_min_int, i64;
    max_int => MAX_INT, aggregate::try_max_int, i64;
    min_max_int => MIN_MAX_INT, aggregate::try_min_max_int, (i64, i64);
    sum_int => SUM_INT, aggregate::try_sum_int, i64;
}

dynamic_aggregates! {
    float_of;
    min_float => MIN_FLOAT, aggregate::try_min_float, f64;
    max_float => MAX_FLOAT, aggregate::try_max_float, f64;
    min_max_float => MIN_MAX_FLOAT, aggregate::try_min_max_float, (f64, f64);
    sum_float => SUM_FLOAT, aggregate::try_sum_float, f64;
}
