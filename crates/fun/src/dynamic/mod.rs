//! Dynamically typed entry points.
//!
//! Each algorithm here takes opaque [`Value`]s. It binds its call pattern
//! from [`patterns`] against the runtime types of the arguments, failing with
//! [`Error::Solve`] before any element is touched, and then runs the
//! statically typed algorithm with the invoker as its function. Containers
//! in the result carry the element types the solver bound.

mod aggregate;
mod checkers;
mod list;
pub mod patterns;

use fun_solve::trace::SolveStep;
use fun_solve::{Bindings, SolveError, Solver};
use fun_types::{CallPattern, Type};
use fun_value::{CallError, Function, Sequence, Value, invoke1};

use crate::Error;

pub use aggregate::{
    max_float, max_int, min_float, min_int, min_max_float, min_max_int, sum_float, sum_int,
};
pub use checkers::{all, any, count, detect, none, one};
pub use list::{
    concat, copy, cycle_each, cycle_map, drop_until, each, filter, foldl, foldr, group_by, map,
    par_map, par_map_n, par_map_with, partition, range, replace, reverse, take_until, zip,
};

// ---------------------------------------------------------------------------
// Checked calls
// ---------------------------------------------------------------------------

/// Arguments whose types have been bound against a call pattern.
///
/// The accessors trust the bind: asking for a function where the pattern
/// declared one cannot fail for a checked call.
pub(crate) struct Checked<'a> {
    pattern: &'static str,
    args: Vec<&'a Value>,
    bindings: Bindings,
}

pub(crate) fn check<'a>(pattern: &CallPattern, args: &[&'a Value]) -> Result<Checked<'a>, Error> {
    let types: Vec<Type> = args.iter().map(|arg| arg.ty()).collect();
    let bindings = Solver::new().bind(pattern, &types).inspect_err(|err| {
        tracing::debug!(
            algorithm = pattern.name,
            category = err.category().as_str(),
            "dynamic call rejected"
        );
    })?;
    tracing::debug!(algorithm = pattern.name, bindings = %bindings.substitution, "dynamic call");
    Ok(Checked {
        pattern: pattern.name,
        args: args.to_vec(),
        bindings,
    })
}

impl<'a> Checked<'a> {
    pub(crate) fn value(&self, index: usize) -> &'a Value {
        self.args[index]
    }

    pub(crate) fn func(&self, index: usize) -> &'a Function {
        self.args[index].as_func().unwrap_or_else(|| {
            unreachable!("`{}` argument #{} bound as a function", self.pattern, index + 1)
        })
    }

    pub(crate) fn list(&self, index: usize) -> &'a Sequence {
        self.args[index].as_list().unwrap_or_else(|| {
            unreachable!("`{}` argument #{} bound as a list", self.pattern, index + 1)
        })
    }

    pub(crate) fn int(&self, index: usize) -> i64 {
        self.args[index].as_int().unwrap_or_else(|| {
            unreachable!("`{}` argument #{} bound as Int", self.pattern, index + 1)
        })
    }

    pub(crate) fn ret(&self, index: usize) -> &Type {
        &self.bindings.returns[index]
    }

    /// Element type of a list-typed return.
    pub(crate) fn ret_element(&self, index: usize) -> Type {
        self.ret(index).element().cloned().unwrap_or_else(|| {
            unreachable!("`{}` result #{} is not a list", self.pattern, index + 1)
        })
    }
}

/// Call a predicate that the solver bound as `fn(A) -> Bool`.
pub(crate) fn holds(predicate: &Function, x: &Value) -> Result<bool, CallError> {
    let out = invoke1(predicate, std::slice::from_ref(x))?;
    Ok(out
        .as_bool()
        .unwrap_or_else(|| unreachable!("predicate returned {out:?}")))
}

/// Call a unary function for its single result.
pub(crate) fn apply(f: &Function, x: &Value) -> Result<Value, CallError> {
    invoke1(f, std::slice::from_ref(x))
}

// ---------------------------------------------------------------------------
// Explain
// ---------------------------------------------------------------------------

/// How an algorithm's pattern binds against a set of arguments, step by step.
#[derive(Debug, Clone)]
pub struct Explanation {
    pub pattern: &'static CallPattern,
    pub result: Result<Bindings, SolveError>,
    pub steps: Vec<SolveStep>,
}

/// Bind `algorithm`'s pattern against `args` with solve tracing enabled,
/// without running the algorithm. `None` if no algorithm has that name.
pub fn explain(algorithm: &str, args: &[&Value]) -> Option<Explanation> {
    let pattern = patterns::lookup(algorithm)?;
    let types: Vec<Type> = args.iter().map(|arg| arg.ty()).collect();
    let mut solver = Solver::new();
    solver.enable_tracing();
    let result = solver.bind(pattern, &types);
    Some(Explanation {
        pattern,
        result,
        steps: solver.take_trace(),
    })
}
