//! Runtime type-constraint solving for call patterns.
//!
//! Given an algorithm's [`CallPattern`] and the concrete types of the values a
//! caller actually supplied, the [`Solver`] walks both in lock-step, binding
//! each type variable the first time it is seen and checking every later
//! occurrence against that binding. There is no coercion and no subtyping:
//! a variable bound to `Int` only ever matches `Int`.
//!
//! Solving happens once, at call entry, before any element is touched.

pub mod trace;

#[cfg(test)]
mod prop_tests;

use std::fmt;

use fun_diag::{Category, Diagnostic, ToDiagnostic};
use fun_types::{CallPattern, Substitution, Type, TypeVarId, free_type_vars};

use crate::trace::{SolveAction, SolveStep};

// ---------------------------------------------------------------------------
// Provenance: where in the pattern a check happened
// ---------------------------------------------------------------------------

/// One step down into a compound type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Parameter of a function type (0-based).
    Param(usize),
    /// Result of a function type (0-based).
    Result(usize),
    /// Element of a sequence.
    Element,
    /// Key of a mapping.
    Key,
    /// Value of a mapping.
    Value,
}

/// A position inside a call pattern: which argument, and the path into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Site {
    /// 0-based call argument index.
    pub argument: usize,
    pub path: Vec<Step>,
}

impl Site {
    pub fn argument(argument: usize) -> Self {
        Self {
            argument,
            path: Vec::new(),
        }
    }

    fn enter(&mut self, step: Step) {
        self.path.push(step);
    }

    fn leave(&mut self) {
        self.path.pop();
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "argument #{}", self.argument + 1)?;
        for step in &self.path {
            match step {
                Step::Param(i) => write!(f, " > parameter #{}", i + 1)?,
                Step::Result(i) => write!(f, " > result #{}", i + 1)?,
                Step::Element => write!(f, " > element")?,
                Step::Key => write!(f, " > key")?,
                Step::Value => write!(f, " > value")?,
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a call pattern could not be bound to the supplied arguments.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SolveError {
    #[error("`{pattern}`: type variable {var} is {bound} but {site} is {found}")]
    TypeMismatch {
        pattern: &'static str,
        site: Site,
        var: TypeVarId,
        bound: Type,
        found: Type,
    },
    #[error("`{pattern}`: expected {expected} at {site}, found {found}")]
    ShapeMismatch {
        pattern: &'static str,
        site: Site,
        expected: Type,
        found: Type,
    },
    #[error("`{pattern}` takes {expected} argument(s), {found} supplied")]
    ArityMismatch {
        pattern: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("`{pattern}`: {key} cannot be used as a mapping key")]
    UnhashableKey { pattern: &'static str, key: Type },
}

impl SolveError {
    pub fn category(&self) -> Category {
        match self {
            SolveError::TypeMismatch { .. } => Category::TypeMismatch,
            SolveError::ShapeMismatch { .. } => Category::ShapeMismatch,
            SolveError::ArityMismatch { .. } => Category::ArityMismatch,
            SolveError::UnhashableKey { .. } => Category::UnhashableKey,
        }
    }

    pub fn site(&self) -> Option<&Site> {
        match self {
            SolveError::TypeMismatch { site, .. } | SolveError::ShapeMismatch { site, .. } => {
                Some(site)
            }
            SolveError::ArityMismatch { .. } | SolveError::UnhashableKey { .. } => None,
        }
    }
}

impl ToDiagnostic for SolveError {
    fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = Diagnostic::error(self.category(), self.to_string());
        if let Some(site) = self.site() {
            diag = diag.at(site.to_string());
        }
        let help = match self {
            SolveError::TypeMismatch { var, .. } => Some(format!(
                "every position typed {var} must receive exactly the same type"
            )),
            SolveError::ShapeMismatch { expected, .. } => Some(shape_help(expected)),
            SolveError::ArityMismatch { .. } => None,
            SolveError::UnhashableKey { .. } => {
                Some("group by a scalar key (Int, Float, Bool, String or ())".to_string())
            }
        };
        match help {
            Some(help) => diag.with_help(help),
            None => diag,
        }
    }
}

fn shape_help(expected: &Type) -> String {
    match expected {
        Type::Unit => "supply () here".to_string(),
        _ => {
            let name = expected.constructor_name();
            let article = if name.starts_with(['A', 'E', 'I', 'O', 'U', 'a', 'e', 'i', 'o', 'u']) {
                "an"
            } else {
                "a"
            };
            format!("supply {article} {name} value here")
        }
    }
}

// ---------------------------------------------------------------------------
// Bindings
// ---------------------------------------------------------------------------

/// The outcome of a successful bind: every variable's concrete type, and the
/// pattern's return types with those bindings applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bindings {
    pub substitution: Substitution,
    pub returns: Vec<Type>,
}

impl Bindings {
    pub fn get(&self, var: TypeVarId) -> Option<&Type> {
        self.substitution.lookup_type(var)
    }

    /// Resolve a pattern type against these bindings.
    pub fn resolve(&self, ty: &Type) -> Type {
        self.substitution.apply(ty)
    }
}

// ---------------------------------------------------------------------------
// Solver
// ---------------------------------------------------------------------------

/// Binds call patterns to concrete argument types.
///
/// A solver holds no state across `bind` calls other than the optional trace;
/// every call starts from an empty substitution.
#[derive(Debug, Clone, Default)]
pub struct Solver {
    substitution: Substitution,
    pattern_name: &'static str,
    /// When true, solve steps are recorded for observability tools.
    tracing: bool,
    trace: Vec<SolveStep>,
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable step-by-step tracing.
    pub fn enable_tracing(&mut self) {
        self.tracing = true;
    }

    /// Recorded steps (empty if tracing was not enabled).
    pub fn trace(&self) -> &[SolveStep] {
        &self.trace
    }

    pub fn take_trace(&mut self) -> Vec<SolveStep> {
        std::mem::take(&mut self.trace)
    }

    /// Bind `pattern` against the concrete types of the call arguments.
    ///
    /// # Panics
    ///
    /// If a return-position variable is still unbound after every argument
    /// has been visited. That can only happen when the pattern itself is
    /// inconsistent, which is a bug in the pattern's author, not the caller.
    pub fn bind(&mut self, pattern: &CallPattern, args: &[Type]) -> Result<Bindings, SolveError> {
        tracing::debug!(pattern = pattern.name, signature = %pattern, "binding call pattern");
        self.substitution = Substitution::new();
        self.pattern_name = pattern.name;

        if pattern.params.len() != args.len() {
            return Err(SolveError::ArityMismatch {
                pattern: pattern.name,
                expected: pattern.params.len(),
                found: args.len(),
            });
        }

        for (index, (expected, actual)) in pattern.params.iter().zip(args).enumerate() {
            let mut site = Site::argument(index);
            self.unify(expected, actual, &mut site)?;
        }

        let mut returns = Vec::with_capacity(pattern.rets.len());
        for ret in &pattern.rets {
            let resolved = self.substitution.apply(ret);
            let unbound = free_type_vars(&resolved);
            if let Some(var) = unbound.first() {
                panic!(
                    "call pattern `{}` ({pattern}) never binds return variable {var}",
                    pattern.name
                );
            }
            if let Some(key) = unhashable_key(&resolved) {
                return Err(SolveError::UnhashableKey {
                    pattern: pattern.name,
                    key: key.clone(),
                });
            }
            returns.push(resolved);
        }

        tracing::debug!(
            pattern = pattern.name,
            bindings = %self.substitution,
            "call pattern bound"
        );
        Ok(Bindings {
            substitution: std::mem::take(&mut self.substitution),
            returns,
        })
    }

    fn unify(&mut self, expected: &Type, actual: &Type, site: &mut Site) -> Result<(), SolveError> {
        match (expected, actual) {
            (Type::Var(var), _) => self.bind_var(*var, expected, actual, site),

            (Type::List(pe), Type::List(ae)) => {
                self.push_step(SolveAction::Decompose, expected, actual, site, "List(A) ~ List(B) → A ~ B");
                site.enter(Step::Element);
                self.unify(pe, ae, site)?;
                site.leave();
                Ok(())
            }

            (Type::Map(pk, pv), Type::Map(ak, av)) => {
                self.push_step(
                    SolveAction::Decompose,
                    expected,
                    actual,
                    site,
                    "Map(K1, V1) ~ Map(K2, V2) → K1 ~ K2, V1 ~ V2",
                );
                site.enter(Step::Key);
                self.unify(pk, ak, site)?;
                site.leave();
                site.enter(Step::Value);
                self.unify(pv, av, site)?;
                site.leave();
                Ok(())
            }

            (Type::Function(pf), Type::Function(af))
                if pf.params.len() == af.params.len() && pf.rets.len() == af.rets.len() =>
            {
                self.push_step(
                    SolveAction::Decompose,
                    expected,
                    actual,
                    site,
                    "fn(P1..) -> R1.. ~ fn(P2..) -> R2.. → pairwise",
                );
                for (i, (p, a)) in pf.params.iter().zip(&af.params).enumerate() {
                    site.enter(Step::Param(i));
                    self.unify(p, a, site)?;
                    site.leave();
                }
                for (i, (p, a)) in pf.rets.iter().zip(&af.rets).enumerate() {
                    site.enter(Step::Result(i));
                    self.unify(p, a, site)?;
                    site.leave();
                }
                Ok(())
            }

            _ if expected.is_scalar() && expected == actual => {
                self.push_step(SolveAction::Identity, expected, actual, site, "types already equal");
                Ok(())
            }

            _ => {
                self.push_step(SolveAction::Error, expected, actual, site, "shape mismatch");
                Err(SolveError::ShapeMismatch {
                    pattern: self.pattern_name,
                    site: site.clone(),
                    expected: self.substitution.apply(expected),
                    found: actual.clone(),
                })
            }
        }
    }

    fn bind_var(
        &mut self,
        var: TypeVarId,
        expected: &Type,
        actual: &Type,
        site: &Site,
    ) -> Result<(), SolveError> {
        if !actual.is_ground() {
            self.push_step(SolveAction::Error, expected, actual, site, "argument type is not concrete");
            return Err(SolveError::ShapeMismatch {
                pattern: self.pattern_name,
                site: site.clone(),
                expected: expected.clone(),
                found: actual.clone(),
            });
        }

        match self.substitution.lookup_type(var) {
            None => {
                let detail = format!("{var} := {actual}");
                tracing::trace!(%site, %detail, "bind");
                self.push_step(SolveAction::Bind, expected, actual, site, &detail);
                self.substitution.bind_type(var, actual.clone());
                Ok(())
            }
            Some(bound) if bound == actual => {
                let detail = format!("{var} = {actual}");
                self.push_step(SolveAction::Check, expected, actual, site, &detail);
                Ok(())
            }
            Some(bound) => {
                let bound = bound.clone();
                let detail = format!("{var} is {bound}, found {actual}");
                self.push_step(SolveAction::Error, expected, actual, site, &detail);
                Err(SolveError::TypeMismatch {
                    pattern: self.pattern_name,
                    site: site.clone(),
                    var,
                    bound,
                    found: actual.clone(),
                })
            }
        }
    }

    fn push_step(
        &mut self,
        action: SolveAction,
        pattern: &Type,
        concrete: &Type,
        site: &Site,
        detail: &str,
    ) {
        if self.tracing {
            let step = self.trace.len() + 1;
            self.trace.push(SolveStep {
                step,
                action,
                pattern: pattern.to_string(),
                concrete: concrete.to_string(),
                site: site.to_string(),
                detail: detail.to_string(),
            });
        }
    }
}

/// Bind `pattern` against `args` with a fresh, untraced solver.
pub fn bind(pattern: &CallPattern, args: &[Type]) -> Result<Bindings, SolveError> {
    Solver::new().bind(pattern, args)
}

fn unhashable_key(ty: &Type) -> Option<&Type> {
    match ty {
        Type::Map(key, value) => {
            if key.is_hashable() {
                unhashable_key(value)
            } else {
                Some(key)
            }
        }
        Type::List(inner) => unhashable_key(inner),
        Type::Function(ft) => ft.params.iter().chain(&ft.rets).find_map(unhashable_key),
        Type::Unit | Type::Int | Type::Float | Type::Bool | Type::String | Type::Var(_) => None,
    }
}
