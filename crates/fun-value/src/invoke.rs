//! The dynamic invoker.
//!
//! Calls a [`Function`] with opaque arguments and hands back opaque results.
//! Argument types are the solver's business and are not re-checked here;
//! results of untyped bodies are checked against the declared signature so a
//! misbehaving body cannot smuggle a wrongly typed value into an output
//! container.

use fun_diag::{Category, Diagnostic, ToDiagnostic};
use fun_types::Type;

use crate::{Function, Value};

/// Failure raised while calling a function value.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CallError {
    /// The function body itself reported a failure.
    #[error("{message}")]
    Failed { message: String },
    #[error("missing argument #{}", .index + 1)]
    MissingArgument { index: usize },
    #[error("argument #{} is {found}, declared {expected}", .index + 1)]
    ArgumentMismatch {
        index: usize,
        expected: Type,
        found: Type,
    },
    #[error("function returned ({found}), declared ({expected})")]
    ReturnMismatch { expected: String, found: String },
}

impl CallError {
    pub fn failed(message: impl Into<String>) -> Self {
        CallError::Failed {
            message: message.into(),
        }
    }
}

impl ToDiagnostic for CallError {
    fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(Category::CallFailed, self.to_string());
        match self {
            CallError::Failed { .. } => diag,
            CallError::MissingArgument { .. }
            | CallError::ArgumentMismatch { .. }
            | CallError::ReturnMismatch { .. } => {
                diag.with_help("the function's body disagrees with its declared signature")
            }
        }
    }
}

/// Call `func` and return all of its results.
pub fn invoke(func: &Function, args: &[Value]) -> Result<Vec<Value>, CallError> {
    debug_assert_eq!(
        args.len(),
        func.ty().arity(),
        "arguments must be checked against the signature before invoking"
    );
    let results = func.call_raw(args)?;
    if !func.is_typed() {
        check_returns(&func.ty().rets, &results)?;
    }
    Ok(results)
}

/// Call a function declared with exactly one result.
pub fn invoke1(func: &Function, args: &[Value]) -> Result<Value, CallError> {
    let mut results = invoke(func, args)?;
    match results.pop() {
        Some(value) if results.is_empty() => Ok(value),
        _ => Err(return_count_mismatch(func, 1)),
    }
}

/// Call a function declared with exactly two results.
pub fn invoke2(func: &Function, args: &[Value]) -> Result<(Value, Value), CallError> {
    let results = invoke(func, args)?;
    let mut iter = results.into_iter();
    match (iter.next(), iter.next(), iter.next()) {
        (Some(first), Some(second), None) => Ok((first, second)),
        _ => Err(return_count_mismatch(func, 2)),
    }
}

/// Call a function for its side effects, discarding any results.
pub fn invoke_void(func: &Function, args: &[Value]) -> Result<(), CallError> {
    invoke(func, args).map(drop)
}

fn check_returns(declared: &[Type], results: &[Value]) -> Result<(), CallError> {
    let found: Vec<Type> = results.iter().map(Value::ty).collect();
    if found.as_slice() == declared {
        return Ok(());
    }
    Err(CallError::ReturnMismatch {
        expected: join(declared),
        found: join(&found),
    })
}

fn return_count_mismatch(func: &Function, wanted: usize) -> CallError {
    CallError::ReturnMismatch {
        expected: format!("{wanted} value(s)"),
        found: join(&func.ty().rets),
    }
}

fn join(types: &[Type]) -> String {
    types
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
