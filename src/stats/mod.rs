//! The computational core: descriptive statistics, correlation, least squares, logistic
//! regression and the chi-square test.
//!
//! Nothing in here keeps state between calls.


pub mod bivariate;
pub mod contingency;
pub mod logistic;
pub mod univariate;

mod float;
pub(crate) mod rand_util;

pub use self::float::Float;
pub use self::rand_util::{new_rng, seeded_rng, Rng};

pub(crate) fn dot<A>(xs: &[A], ys: &[A]) -> A
where
    A: Float,
{
    xs.iter()
        .zip(ys)
        .fold(A::cast(0), |acc, (&x, &y)| acc + x * y)
}

pub(crate) fn sum<A>(xs: &[A]) -> A
where
    A: Float,
{
    use std::ops::Add;

    xs.iter().cloned().fold(A::cast(0), Add::add)
}
