//! Type representations for runtime-checked sequence operations.
//!
//! This crate defines the small closed type language the solver works over:
//! scalars, sequences, mappings and first-order function signatures, plus
//! type variables that only ever appear inside a [`CallPattern`]. Concrete
//! values (see `fun-value`) always carry ground types.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// A type variable inside a call pattern.
///
/// Variables are scoped to a single pattern; the same id in two different
/// patterns means nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeVarId(pub u32);

impl TypeVarId {
    pub const A: TypeVarId = TypeVarId(0);
    pub const B: TypeVarId = TypeVarId(1);

    /// Display name: `A`..`Z`, then `A1`, `B1`, ...
    pub fn name(self) -> String {
        let letter = char::from(b'A' + (self.0 % 26) as u8);
        match self.0 / 26 {
            0 => letter.to_string(),
            round => format!("{letter}{round}"),
        }
    }
}

impl fmt::Display for TypeVarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A type in the sequence-operation type language.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    // -- Scalars --
    Unit,
    Int,
    Float,
    Bool,
    String,

    /// Pattern-only placeholder.
    Var(TypeVarId),

    // -- Containers --
    /// Ordered, indexable sequence.
    List(Box<Type>),
    /// Key/value mapping (`GroupBy` output).
    Map(Box<Type>, Box<Type>),

    /// First-order function signature.
    Function(FunctionType),
}

impl Type {
    pub fn var(id: TypeVarId) -> Self {
        Type::Var(id)
    }

    pub fn list(element: Type) -> Self {
        Type::List(Box::new(element))
    }

    pub fn map(key: Type, value: Type) -> Self {
        Type::Map(Box::new(key), Box::new(value))
    }

    pub fn func(params: Vec<Type>, rets: Vec<Type>) -> Self {
        Type::Function(FunctionType::new(params, rets))
    }

    /// Element type of a sequence.
    pub fn element(&self) -> Option<&Type> {
        match self {
            Type::List(inner) => Some(inner),
            _ => None,
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Type::Unit | Type::Int | Type::Float | Type::Bool | Type::String
        )
    }

    /// Whether values of this type may be used as mapping keys.
    pub fn is_hashable(&self) -> bool {
        self.is_scalar()
    }

    /// A ground type mentions no type variables.
    pub fn is_ground(&self) -> bool {
        free_type_vars(self).is_empty()
    }

    /// Short name of the outermost constructor, used in shape errors.
    pub fn constructor_name(&self) -> &'static str {
        match self {
            Type::Unit => "()",
            Type::Int => "Int",
            Type::Float => "Float",
            Type::Bool => "Bool",
            Type::String => "String",
            Type::Var(_) => "type variable",
            Type::List(_) => "List",
            Type::Map(..) => "Map",
            Type::Function(_) => "function",
        }
    }
}

/// Parameter and return types of a function value.
///
/// Zero returns is a procedure (`Each`), two returns are allowed for
/// functions that produce pairs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionType {
    pub params: Vec<Type>,
    pub rets: Vec<Type>,
}

impl FunctionType {
    pub fn new(params: Vec<Type>, rets: Vec<Type>) -> Self {
        Self { params, rets }
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

impl fmt::Display for FunctionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fn(")?;
        write_comma_separated(f, &self.params)?;
        write!(f, ")")?;
        match self.rets.as_slice() {
            [] => Ok(()),
            [single] => write!(f, " -> {single}"),
            many => {
                write!(f, " -> (")?;
                write_comma_separated(f, many)?;
                write!(f, ")")
            }
        }
    }
}

fn write_comma_separated(f: &mut fmt::Formatter<'_>, types: &[Type]) -> fmt::Result {
    for (i, ty) in types.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{ty}")?;
    }
    Ok(())
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Unit => write!(f, "()"),
            Type::Int => write!(f, "Int"),
            Type::Float => write!(f, "Float"),
            Type::Bool => write!(f, "Bool"),
            Type::String => write!(f, "String"),
            Type::Var(v) => write!(f, "{v}"),
            Type::List(inner) => write!(f, "List({inner})"),
            Type::Map(k, v) => write!(f, "Map({k}, {v})"),
            Type::Function(ft) => write!(f, "{ft}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Call patterns
// ---------------------------------------------------------------------------

/// The abstract signature an algorithm accepts, e.g.
/// `fn(fn(A) -> B, List(A)) -> List(B)` for `Map`.
///
/// Every variable in `rets` must also occur in `params`; otherwise binding
/// can never resolve it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallPattern {
    pub name: &'static str,
    pub params: Vec<Type>,
    pub rets: Vec<Type>,
}

impl CallPattern {
    pub fn new(name: &'static str, params: Vec<Type>, rets: Vec<Type>) -> Self {
        Self { name, params, rets }
    }

    /// Type variables occurring in parameter positions.
    pub fn param_vars(&self) -> BTreeSet<TypeVarId> {
        self.params.iter().flat_map(free_type_vars).collect()
    }

    /// Return-position variables that no parameter mentions.
    pub fn unresolvable_return_vars(&self) -> BTreeSet<TypeVarId> {
        let bound = self.param_vars();
        self.rets
            .iter()
            .flat_map(free_type_vars)
            .filter(|v| !bound.contains(v))
            .collect()
    }
}

impl fmt::Display for CallPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", FunctionType::new(self.params.clone(), self.rets.clone()))
    }
}

// ---------------------------------------------------------------------------
// Free variables
// ---------------------------------------------------------------------------

/// Collect the type variables mentioned anywhere inside `ty`.
pub fn free_type_vars(ty: &Type) -> BTreeSet<TypeVarId> {
    let mut vars = BTreeSet::new();
    collect_type_vars(ty, &mut vars);
    vars
}

fn collect_type_vars(ty: &Type, acc: &mut BTreeSet<TypeVarId>) {
    match ty {
        Type::Var(v) => {
            acc.insert(*v);
        }
        Type::List(inner) => collect_type_vars(inner, acc),
        Type::Map(k, v) => {
            collect_type_vars(k, acc);
            collect_type_vars(v, acc);
        }
        Type::Function(ft) => {
            for ty in ft.params.iter().chain(&ft.rets) {
                collect_type_vars(ty, acc);
            }
        }
        Type::Unit | Type::Int | Type::Float | Type::Bool | Type::String => {}
    }
}

// ---------------------------------------------------------------------------
// Substitution
// ---------------------------------------------------------------------------

/// Maps type variables to the concrete types they were bound to.
///
/// This is the binding set produced by solving one call pattern.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Substitution {
    type_map: BTreeMap<TypeVarId, Type>,
}

impl Substitution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind_type(&mut self, var: TypeVarId, ty: Type) {
        self.type_map.insert(var, ty);
    }

    pub fn lookup_type(&self, var: TypeVarId) -> Option<&Type> {
        self.type_map.get(&var)
    }

    pub fn type_bindings(&self) -> &BTreeMap<TypeVarId, Type> {
        &self.type_map
    }

    pub fn len(&self) -> usize {
        self.type_map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.type_map.is_empty()
    }

    /// Apply this substitution to a type, replacing all bound variables.
    pub fn apply(&self, ty: &Type) -> Type {
        match ty {
            Type::Var(v) => match self.lookup_type(*v) {
                Some(resolved) => self.apply(resolved),
                None => ty.clone(),
            },
            Type::List(inner) => Type::List(Box::new(self.apply(inner))),
            Type::Map(k, v) => Type::Map(Box::new(self.apply(k)), Box::new(self.apply(v))),
            Type::Function(ft) => Type::Function(FunctionType {
                params: ft.params.iter().map(|p| self.apply(p)).collect(),
                rets: ft.rets.iter().map(|r| self.apply(r)).collect(),
            }),
            Type::Unit | Type::Int | Type::Float | Type::Bool | Type::String => ty.clone(),
        }
    }
}

impl fmt::Display for Substitution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (var, ty)) in self.type_map.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{var} := {ty}")?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn a() -> Type {
        Type::var(TypeVarId::A)
    }

    fn b() -> Type {
        Type::var(TypeVarId::B)
    }

    #[test]
    fn var_names_wrap_after_z() {
        assert_eq!(TypeVarId(0).name(), "A");
        assert_eq!(TypeVarId(25).name(), "Z");
        assert_eq!(TypeVarId(26).name(), "A1");
        assert_eq!(TypeVarId(53).name(), "B2");
    }

    #[test]
    fn map_pattern_display() {
        let pattern = CallPattern::new(
            "map",
            vec![Type::func(vec![a()], vec![b()]), Type::list(a())],
            vec![Type::list(b())],
        );
        insta::assert_snapshot!(pattern.to_string(), @"fn(fn(A) -> B, List(A)) -> List(B)");
    }

    #[test]
    fn multi_return_display() {
        let pattern = CallPattern::new(
            "partition",
            vec![Type::func(vec![a()], vec![Type::Bool]), Type::list(a())],
            vec![Type::list(a()), Type::list(a())],
        );
        insta::assert_snapshot!(
            pattern.to_string(),
            @"fn(fn(A) -> Bool, List(A)) -> (List(A), List(A))"
        );
    }

    #[test]
    fn procedure_display_has_no_arrow() {
        let ty = Type::func(vec![Type::String], vec![]);
        assert_eq!(ty.to_string(), "fn(String)");
    }

    #[test]
    fn free_vars_walks_functions_and_maps() {
        let ty = Type::map(b(), Type::list(Type::func(vec![a()], vec![Type::Int])));
        let vars: Vec<_> = free_type_vars(&ty).into_iter().collect();
        assert_eq!(vars, vec![TypeVarId::A, TypeVarId::B]);
        assert!(!ty.is_ground());
        assert!(Type::list(Type::Float).is_ground());
    }

    #[test]
    fn substitution_apply_nested() {
        let mut subst = Substitution::new();
        subst.bind_type(TypeVarId::A, Type::Int);
        subst.bind_type(TypeVarId::B, Type::list(Type::String));

        let ty = Type::map(b(), Type::list(a()));
        assert_eq!(
            subst.apply(&ty),
            Type::map(Type::list(Type::String), Type::list(Type::Int))
        );
    }

    #[test]
    fn substitution_apply_chain() {
        let mut subst = Substitution::new();
        subst.bind_type(TypeVarId::A, b());
        subst.bind_type(TypeVarId::B, Type::Bool);

        assert_eq!(subst.apply(&a()), Type::Bool);
        assert_eq!(subst.to_string(), "{A := B, B := Bool}");
    }

    #[test]
    fn unresolvable_return_vars_detected() {
        let broken = CallPattern::new("broken", vec![Type::list(a())], vec![Type::list(b())]);
        assert_eq!(
            broken.unresolvable_return_vars().into_iter().collect::<Vec<_>>(),
            vec![TypeVarId::B]
        );

        let fine = CallPattern::new("reverse", vec![Type::list(a())], vec![Type::list(a())]);
        assert!(fine.unresolvable_return_vars().is_empty());
    }

    #[test]
    fn only_scalars_are_hashable() {
        assert!(Type::String.is_hashable());
        assert!(Type::Float.is_hashable());
        assert!(!Type::list(Type::Int).is_hashable());
        assert!(!Type::func(vec![], vec![]).is_hashable());
    }
}
