//! Error reporting for runtime-checked sequence operations.
//!
//! Errors raised by the solver and the invoker are lowered into a
//! [`Diagnostic`] so callers get one rendering with a stable code,
//! regardless of which layer rejected the call.

use std::fmt;

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// Broad category for diagnostics. Used for filtering and grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// A type variable was bound to two different concrete types.
    TypeMismatch,
    /// A value has the wrong outer shape (sequence where a function was expected).
    ShapeMismatch,
    /// Wrong number of call arguments, parameters, or results.
    ArityMismatch,
    /// A mapping key type that cannot be hashed.
    UnhashableKey,
    /// The caller-supplied function failed.
    CallFailed,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::TypeMismatch,
        Category::ShapeMismatch,
        Category::ArityMismatch,
        Category::UnhashableKey,
        Category::CallFailed,
    ];

    pub fn all() -> &'static [Category] {
        &Self::ALL
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::TypeMismatch => "type_mismatch",
            Category::ShapeMismatch => "shape_mismatch",
            Category::ArityMismatch => "arity_mismatch",
            Category::UnhashableKey => "unhashable_key",
            Category::CallFailed => "call_failed",
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Category::TypeMismatch => "E0001",
            Category::ShapeMismatch => "E0002",
            Category::ArityMismatch => "E0003",
            Category::UnhashableKey => "E0004",
            Category::CallFailed => "E0101",
        }
    }
}

// ---------------------------------------------------------------------------
// Diagnostic
// ---------------------------------------------------------------------------

/// A structured diagnostic message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub code: String,
    pub category: Category,
    /// Primary message: what went wrong.
    pub message: String,
    /// Which pattern position was being checked, rendered for humans.
    pub site: Option<String>,
    /// Suggested fix, if any.
    pub help: Option<String>,
}

impl Diagnostic {
    pub fn error(category: Category, message: impl Into<String>) -> Self {
        Self {
            code: category.code().to_string(),
            category,
            message: message.into(),
            site: None,
            help: None,
        }
    }

    pub fn at(mut self, site: impl Into<String>) -> Self {
        self.site = Some(site.into());
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error[{}]: {}", self.code, self.message)?;
        if let Some(site) = &self.site {
            write!(f, "\n  at: {site}")?;
        }
        if let Some(help) = &self.help {
            write!(f, "\n  help: {help}")?;
        }
        Ok(())
    }
}

/// Implemented by every error type that can be shown as a diagnostic.
pub trait ToDiagnostic {
    fn to_diagnostic(&self) -> Diagnostic;
}

// ---------------------------------------------------------------------------
// Error wrapper
// ---------------------------------------------------------------------------

/// Error type wrapping a single rendered diagnostic.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{0}")]
pub struct DiagnosticError(pub Diagnostic);

impl DiagnosticError {
    pub fn diagnostic(&self) -> &Diagnostic {
        &self.0
    }
}
