//! The call pattern of every dynamically typed algorithm.

use std::sync::LazyLock;

use fun_types::{CallPattern, Type, TypeVarId};

fn a() -> Type {
    Type::var(TypeVarId::A)
}

fn b() -> Type {
    Type::var(TypeVarId::B)
}

fn list_a() -> Type {
    Type::list(a())
}

/// `fn(A) -> Bool`
fn predicate() -> Type {
    Type::func(vec![a()], vec![Type::Bool])
}

/// `fn(fn(A) -> R, List(A)) -> ret`
fn over_list(name: &'static str, f_ret: Type, rets: Vec<Type>) -> CallPattern {
    CallPattern::new(name, vec![Type::func(vec![a()], vec![f_ret]), list_a()], rets)
}

/// `fn(fn(A) -> Bool, List(A)) -> ret`
fn tested(name: &'static str, rets: Vec<Type>) -> CallPattern {
    CallPattern::new(name, vec![predicate(), list_a()], rets)
}

fn fold(name: &'static str) -> CallPattern {
    CallPattern::new(
        name,
        vec![Type::func(vec![a(), b()], vec![b()]), b(), list_a()],
        vec![b()],
    )
}

fn list_pair(name: &'static str) -> CallPattern {
    CallPattern::new(name, vec![list_a(), list_a()], vec![list_a()])
}

fn list_copy(name: &'static str) -> CallPattern {
    CallPattern::new(name, vec![list_a()], vec![list_a()])
}

macro_rules! patterns {
    ($($(#[$meta:meta])* $id:ident = $init:expr;)*) => {
        $(
            $(#[$meta])*
            pub static $id: LazyLock<CallPattern> = LazyLock::new(|| $init);
        )*

        /// Every pattern, in declaration order.
        pub fn all() -> Vec<&'static CallPattern> {
            vec![$(&*$id),*]
        }
    };
}

patterns! {
    /// `fn(fn(A) -> B, List(A)) -> List(B)`
    MAP = over_list("map", b(), vec![Type::list(b())]);
    PAR_MAP = over_list("par_map", b(), vec![Type::list(b())]);
    /// `fn(fn(A), List(A))`
    EACH = CallPattern::new("each", vec![Type::func(vec![a()], vec![]), list_a()], vec![]);
    FILTER = tested("filter", vec![list_a()]);
    /// `fn(fn(A, B) -> B, B, List(A)) -> B`
    FOLDL = fold("foldl");
    FOLDR = fold("foldr");
    CONCAT = CallPattern::new("concat", vec![Type::list(list_a())], vec![list_a()]);
    REVERSE = list_copy("reverse");
    COPY = list_copy("copy");
    ZIP = list_pair("zip");
    REPLACE = list_pair("replace");
    PARTITION = tested("partition", vec![list_a(), list_a()]);
    /// `fn(fn(A) -> B, List(A)) -> Map(B, List(A))`
    GROUP_BY = over_list("group_by", b(), vec![Type::map(b(), list_a())]);
    TAKE_UNTIL = tested("take_until", vec![list_a()]);
    DROP_UNTIL = tested("drop_until", vec![list_a()]);
    ALL = tested("all", vec![Type::Bool]);
    ANY = tested("any", vec![Type::Bool]);
    NONE = tested("none", vec![Type::Bool]);
    ONE = tested("one", vec![Type::Bool]);
    COUNT = tested("count", vec![Type::Int]);
    DETECT = tested("detect", vec![a()]);
    CYCLE_EACH = CallPattern::new(
        "cycle_each",
        vec![Type::func(vec![a()], vec![]), list_a()],
        vec![],
    );
    CYCLE_MAP = over_list("cycle_map", b(), vec![Type::list(b())]);
    RANGE = CallPattern::new("range", vec![Type::Int, Type::Int], vec![Type::list(Type::Int)]);
    MIN_INT = over_list("min_int", Type::Int, vec![Type::Int]);
    MAX_INT = over_list("max_int", Type::Int, vec![Type::Int]);
    MIN_MAX_INT = over_list("min_max_int", Type::Int, vec![Type::Int, Type::Int]);
    SUM_INT = over_list("sum_int", Type::Int, vec![Type::Int]);
    MIN_FLOAT = over_list("min_float", Type::Float, vec![Type::Float]);
    MAX_FLOAT = over_list("max_float", Type::Float, vec![Type::Float]);
    MIN_MAX_FLOAT = over_list("min_max_float", Type::Float, vec![Type::Float, Type::Float]);
    SUM_FLOAT = over_list("sum_float", Type::Float, vec![Type::Float]);
}

/// Find a pattern by algorithm name.
pub fn lookup(name: &str) -> Option<&'static CallPattern> {
    all().into_iter().find(|pattern| pattern.name == name)
}
