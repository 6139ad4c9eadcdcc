//! Workloads shared by the benchmarks.

use fun::{Function, Sequence, Value};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// `len` integers drawn uniformly from `[0, max)`, reproducible per seed.
pub fn random_int64s(len: usize, max: i64, seed: u64) -> Vec<i64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len).map(|_| rng.gen_range(0..max.max(1))).collect()
}

pub fn square(x: &i64) -> i64 {
    x.wrapping_mul(*x)
}

/// Prime factors of `n` in ascending order, with multiplicity. Values
/// below 2 have none.
pub fn prime_factors(n: &i64) -> Vec<i64> {
    let mut n = *n;
    let mut factors = Vec::new();
    let mut d = 2;
    while n >= 2 && d * d <= n {
        while n % d == 0 {
            factors.push(d);
            n /= d;
        }
        d += 1;
    }
    if n >= 2 {
        factors.push(n);
    }
    factors
}

pub fn dynamic_list(xs: &[i64]) -> Value {
    Value::List(Sequence::of(xs.to_vec()))
}

pub fn dynamic_square() -> Value {
    Value::Func(Function::unary(|x: i64| square(&x)))
}

pub fn dynamic_prime_factors() -> Value {
    Value::Func(Function::unary(|x: i64| prime_factors(&x)))
}
