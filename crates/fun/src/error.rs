use fun_diag::{Category, Diagnostic, DiagnosticError, ToDiagnostic};
use fun_solve::SolveError;
use fun_value::{CallError, ValueError};

/// Failure of a dynamically typed algorithm call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// The arguments do not fit the algorithm's call pattern. Raised before
    /// any element is touched.
    #[error(transparent)]
    Solve(#[from] SolveError),
    /// A caller-supplied function failed.
    #[error(transparent)]
    Call(#[from] CallError),
    /// A result could not be placed in its output container.
    #[error(transparent)]
    Value(#[from] ValueError),
}

impl Error {
    /// Convert into a displayable error carrying the rendered diagnostic.
    pub fn diagnostic_error(&self) -> DiagnosticError {
        DiagnosticError(self.to_diagnostic())
    }
}

impl ToDiagnostic for Error {
    fn to_diagnostic(&self) -> Diagnostic {
        match self {
            Error::Solve(err) => err.to_diagnostic(),
            Error::Call(err) => err.to_diagnostic(),
            Error::Value(err) => {
                let category = match err {
                    ValueError::UnhashableKey { .. } => Category::UnhashableKey,
                    ValueError::ElementType { .. }
                    | ValueError::KeyType { .. }
                    | ValueError::ValueType { .. } => Category::ShapeMismatch,
                };
                Diagnostic::error(category, err.to_string())
            }
        }
    }
}
