//! Property tests for the solver using proptest.
//!
//! Key properties:
//!
//! 1. Substitution idempotence: apply(apply(t)) == apply(t)
//! 2. Completeness: a pattern always binds against any ground instance of it
//! 3. Consistency: after a successful bind, apply(param_i) == arg_i
//! 4. Exactness: a shared variable never binds two distinct ground types

use proptest::prelude::*;

use fun_types::*;

use crate::{SolveError, bind};

// ---------------------------------------------------------------------------
// Strategies for generating types
// ---------------------------------------------------------------------------

fn arb_scalar() -> impl Strategy<Value = Type> {
    prop_oneof![
        Just(Type::Unit),
        Just(Type::Int),
        Just(Type::Float),
        Just(Type::Bool),
        Just(Type::String),
    ]
}

/// Ground types of bounded depth. Depth 0 = scalars only.
fn arb_ground_type(depth: u32) -> BoxedStrategy<Type> {
    if depth == 0 {
        return arb_scalar().boxed();
    }
    let inner = arb_ground_type(depth - 1);
    prop_oneof![
        3 => arb_scalar(),
        2 => inner.clone().prop_map(Type::list),
        1 => (arb_scalar(), inner.clone()).prop_map(|(k, v)| Type::map(k, v)),
        1 => (prop::collection::vec(inner.clone(), 1..=2), prop::collection::vec(inner, 0..=2))
            .prop_map(|(params, rets)| Type::func(params, rets)),
    ]
    .boxed()
}

/// Pattern types mixing variables A..D into ground structure.
fn arb_pattern_type(depth: u32) -> BoxedStrategy<Type> {
    let leaf = prop_oneof![
        2 => arb_scalar(),
        1 => (0u32..4).prop_map(|id| Type::var(TypeVarId(id))),
    ];
    if depth == 0 {
        return leaf.boxed();
    }
    let inner = arb_pattern_type(depth - 1);
    prop_oneof![
        3 => leaf,
        2 => inner.clone().prop_map(Type::list),
        1 => (prop::collection::vec(inner.clone(), 1..=2), prop::collection::vec(inner, 0..=2))
            .prop_map(|(params, rets)| Type::func(params, rets)),
    ]
    .boxed()
}

fn a() -> Type {
    Type::var(TypeVarId::A)
}

fn b() -> Type {
    Type::var(TypeVarId::B)
}

proptest! {
    /// Applying a substitution twice produces the same result as once.
    #[test]
    fn substitution_idempotent(ty in arb_pattern_type(3)) {
        let mut subst = Substitution::new();
        subst.bind_type(TypeVarId(0), Type::Int);
        subst.bind_type(TypeVarId(1), Type::list(Type::String));
        subst.bind_type(TypeVarId(2), Type::Bool);

        let once = subst.apply(&ty);
        let twice = subst.apply(&once);
        prop_assert_eq!(once, twice);
    }

    /// Any ground instantiation of the map pattern binds, and the bindings
    /// are exactly the types used to instantiate it.
    #[test]
    fn map_pattern_binds_every_instance(ta in arb_ground_type(2), tb in arb_ground_type(2)) {
        let pattern = CallPattern::new(
            "map",
            vec![Type::func(vec![a()], vec![b()]), Type::list(a())],
            vec![Type::list(b())],
        );
        let args = [Type::func(vec![ta.clone()], vec![tb.clone()]), Type::list(ta.clone())];

        let bindings = bind(&pattern, &args).expect("ground instance must bind");
        prop_assert_eq!(bindings.get(TypeVarId::A), Some(&ta));
        prop_assert_eq!(bindings.get(TypeVarId::B), Some(&tb));
        prop_assert_eq!(bindings.returns, vec![Type::list(tb)]);
    }

    /// After a successful bind every parameter resolves to its argument.
    #[test]
    fn bind_is_consistent(
        param in arb_pattern_type(2),
        ground in prop::collection::vec(arb_ground_type(1), 4),
    ) {
        let mut instance = Substitution::new();
        for (id, ty) in ground.iter().enumerate() {
            instance.bind_type(TypeVarId(id as u32), ty.clone());
        }
        let arg = instance.apply(&param);
        let pattern = CallPattern::new("probe", vec![param.clone()], vec![]);

        let bindings = bind(&pattern, std::slice::from_ref(&arg)).expect("instance must bind");
        prop_assert_eq!(bindings.resolve(&param), arg);
    }

    /// Two lists sharing `A` bind only when their element types are equal.
    #[test]
    fn shared_variable_requires_identical_types(
        left in arb_ground_type(2),
        right in arb_ground_type(2),
    ) {
        let pattern = CallPattern::new(
            "zip",
            vec![Type::list(a()), Type::list(a())],
            vec![Type::list(a())],
        );
        let result = bind(&pattern, &[Type::list(left.clone()), Type::list(right.clone())]);
        if left == right {
            prop_assert!(result.is_ok());
        } else {
            let is_type_mismatch = matches!(result, Err(SolveError::TypeMismatch { .. }));
            prop_assert!(is_type_mismatch);
        }
    }
}
