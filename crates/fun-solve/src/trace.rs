//! Tracing types for solver observability.
//!
//! A [`Solver`](crate::Solver) records one [`SolveStep`] per decision when
//! tracing is enabled; nothing is recorded otherwise.

use serde::Serialize;

/// A single step in a solve trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SolveStep {
    pub step: usize,
    pub action: SolveAction,
    /// The pattern-side type at this position.
    pub pattern: String,
    /// The concrete type observed at this position.
    pub concrete: String,
    /// Rendered [`Site`](crate::Site).
    pub site: String,
    pub detail: String,
}

/// What the solver did at a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SolveAction {
    /// Scalar types already identical.
    Identity,
    /// Structural recursion into a list, map, or function.
    Decompose,
    /// First occurrence of a type variable (e.g. `A := Int`).
    Bind,
    /// Later occurrence of a bound variable agreed with its binding.
    Check,
    /// Binding failed.
    Error,
}
