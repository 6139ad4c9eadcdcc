//! Generic sequence algorithms.
//!
//! Two surfaces share one implementation:
//!
//! - [`seq`], [`aggregate`] and [`par`] are plain generic functions over
//!   slices. Algorithms that call a user function also come in a `try_*`
//!   form that stops at the first error.
//! - [`dynamic`] takes opaque [`Value`]s whose types are only known at run
//!   time. Each entry point binds its call pattern against the arguments
//!   before touching any element, then runs the `try_*` form with the
//!   invoker as the function.

pub mod aggregate;
pub mod dynamic;
mod error;
pub mod par;
pub mod seq;


pub use error::Error;
pub use fun_value::{Function, Mapping, Sequence, Value};
pub use par::ParConfig;
