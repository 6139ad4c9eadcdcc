//! Function values.
//!
//! A [`Function`] pairs a declared [`FunctionType`] with a callable body that
//! takes and returns opaque values. Bodies built from typed Rust closures
//! (`unary`, `binary`, ...) produce results of their declared types by
//! construction; bodies supplied through [`Function::new`] are checked by the
//! invoker after every call.

use std::fmt;
use std::sync::Arc;

use fun_types::FunctionType;

use crate::convert::{FromValue, IntoValue, Typed};
use crate::invoke::CallError;
use crate::Value;

type Body = dyn Fn(&[Value]) -> Result<Vec<Value>, CallError> + Send + Sync;

/// A callable value with a declared signature.
#[derive(Clone)]
pub struct Function {
    ty: FunctionType,
    body: Arc<Body>,
    /// Results are produced by typed conversions and need no checking.
    typed: bool,
}

impl Function {
    /// A function whose body works on opaque values directly.
    pub fn new<F>(ty: FunctionType, body: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Vec<Value>, CallError> + Send + Sync + 'static,
    {
        Self {
            ty,
            body: Arc::new(body),
            typed: false,
        }
    }

    fn typed<F>(ty: FunctionType, body: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Vec<Value>, CallError> + Send + Sync + 'static,
    {
        Self {
            ty,
            body: Arc::new(body),
            typed: true,
        }
    }

    /// `fn(A) -> B`
    pub fn unary<A, B, F>(f: F) -> Self
    where
        A: FromValue,
        B: IntoValue,
        F: Fn(A) -> B + Send + Sync + 'static,
    {
        Self::try_unary(move |a: A| Ok(f(a)))
    }

    /// `fn(A) -> B` whose body may fail.
    pub fn try_unary<A, B, F>(f: F) -> Self
    where
        A: FromValue,
        B: IntoValue,
        F: Fn(A) -> Result<B, CallError> + Send + Sync + 'static,
    {
        Self::typed(FunctionType::new(vec![A::ty()], vec![B::ty()]), move |args| {
            let a = arg::<A>(args, 0)?;
            Ok(vec![f(a)?.into_value()])
        })
    }

    /// `fn(A, B) -> C`
    pub fn binary<A, B, C, F>(f: F) -> Self
    where
        A: FromValue,
        B: FromValue,
        C: IntoValue,
        F: Fn(A, B) -> C + Send + Sync + 'static,
    {
        Self::typed(
            FunctionType::new(vec![A::ty(), B::ty()], vec![C::ty()]),
            move |args| {
                let a = arg::<A>(args, 0)?;
                let b = arg::<B>(args, 1)?;
                Ok(vec![f(a, b).into_value()])
            },
        )
    }

    /// `fn(A)`, called for its side effects.
    pub fn procedure<A, F>(f: F) -> Self
    where
        A: FromValue,
        F: Fn(A) + Send + Sync + 'static,
    {
        Self::typed(FunctionType::new(vec![A::ty()], vec![]), move |args| {
            f(arg::<A>(args, 0)?);
            Ok(Vec::new())
        })
    }

    /// `fn(A) -> (B, C)`
    pub fn unary_pair<A, B, C, F>(f: F) -> Self
    where
        A: FromValue,
        B: IntoValue,
        C: IntoValue,
        F: Fn(A) -> (B, C) + Send + Sync + 'static,
    {
        Self::typed(
            FunctionType::new(vec![A::ty()], vec![B::ty(), C::ty()]),
            move |args| {
                let (b, c) = f(arg::<A>(args, 0)?);
                Ok(vec![b.into_value(), c.into_value()])
            },
        )
    }

    pub fn ty(&self) -> &FunctionType {
        &self.ty
    }

    /// Whether two handles share one body.
    pub fn same_as(&self, other: &Function) -> bool {
        Arc::ptr_eq(&self.body, &other.body)
    }

    pub(crate) fn call_raw(&self, args: &[Value]) -> Result<Vec<Value>, CallError> {
        (self.body)(args)
    }

    pub(crate) fn is_typed(&self) -> bool {
        self.typed
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("ty", &self.ty)
            .field("typed", &self.typed)
            .finish_non_exhaustive()
    }
}

fn arg<T: FromValue>(args: &[Value], index: usize) -> Result<T, CallError> {
    let value = args.get(index).ok_or(CallError::MissingArgument { index })?;
    T::from_value(value).ok_or_else(|| CallError::ArgumentMismatch {
        index,
        expected: T::ty(),
        found: value.ty(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use fun_types::Type;

    #[test]
    fn typed_constructors_declare_signatures() {
        let f = Function::binary(|elem: i64, acc: i64| acc % elem);
        assert_eq!(
            f.ty(),
            &FunctionType::new(vec![Type::Int, Type::Int], vec![Type::Int])
        );
        assert!(f.is_typed());

        let p = Function::procedure(|_: String| {});
        assert!(p.ty().rets.is_empty());

        let pair = Function::unary_pair(|n: i64| (n, n as f64));
        assert_eq!(pair.ty().rets, vec![Type::Int, Type::Float]);
    }

    #[test]
    fn typed_body_rejects_wrong_argument() {
        let f = Function::unary(|n: i64| n + 1);
        let err = f.call_raw(&[Value::Bool(true)]).expect_err("bool is not int");
        assert_eq!(
            err,
            CallError::ArgumentMismatch {
                index: 0,
                expected: Type::Int,
                found: Type::Bool,
            }
        );
    }
}
