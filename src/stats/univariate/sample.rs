use std::{mem, ops};

use crate::error::{Degenerate, Result};
use crate::stats::float::Float;

/// A collection of observations of a single variable
///
/// Invariants:
///
/// - The sample contains at least one data point
/// - The sample contains no `NaN`s
#[repr(transparent)]
pub struct Sample<A>([A]);

impl<A> Sample<A>
where
    A: Float,
{
    /// Creates a new sample from an existing slice
    ///
    /// Fails if `slice` is empty or contains any `NaN`
    #[allow(clippy::new_ret_no_self)]
    pub fn new(slice: &[A]) -> Result<&Sample<A>> {
        if slice.is_empty() {
            return Err(Degenerate::InsufficientData { needed: 1, got: 0 }.into());
        }
        if slice.iter().any(|x| x.is_nan()) {
            return Err(Degenerate::NotANumber.into());
        }

        // NB `Sample` is a transparent wrapper around `[A]`
        Ok(unsafe { mem::transmute::<&[A], &Sample<A>>(slice) })
    }

    /// Returns the biggest element in the sample
    ///
    /// - Time: `O(length)`
    pub fn max(&self) -> A {
        let mut elems = self.iter();

        match elems.next() {
            Some(&head) => elems.fold(head, |a, &b| a.max(b)),
            // NB `unreachable!` because `Sample` is guaranteed to have at least one data point
            None => unreachable!(),
        }
    }

    /// Returns the arithmetic average of the sample
    ///
    /// - Time: `O(length)`
    pub fn mean(&self) -> A {
        let n = self.len();

        self.sum() / A::cast(n)
    }

    /// Returns the smallest element in the sample
    ///
    /// - Time: `O(length)`
    pub fn min(&self) -> A {
        let mut elems = self.iter();

        match elems.next() {
            Some(&elem) => elems.fold(elem, |a, &b| a.min(b)),
            // NB `unreachable!` because `Sample` is guaranteed to have at least one data point
            None => unreachable!(),
        }
    }

    /// Returns the population standard deviation of the sample
    ///
    /// The `mean` can be optionally passed along to speed up (2X) the computation
    ///
    /// - Time: `O(length)`
    pub fn std_dev(&self, mean: Option<A>) -> A {
        self.var(mean).sqrt()
    }

    /// Returns the sum of all the elements of the sample
    ///
    /// - Time: `O(length)`
    pub fn sum(&self) -> A {
        crate::stats::sum(self)
    }

    /// Returns the sum of squared deviations from the mean
    ///
    /// - Time: `O(length)`
    pub fn sum_sq_dev(&self, mean: Option<A>) -> A {
        use std::ops::Add;

        let mean = mean.unwrap_or_else(|| self.mean());

        self.iter()
            .map(|&x| (x - mean).powi(2))
            .fold(A::cast(0), Add::add)
    }

    /// Returns the population variance of the sample (divides by `n`)
    ///
    /// The `mean` can be optionally passed along to speed up (2X) the computation
    ///
    /// - Time: `O(length)`
    pub fn var(&self, mean: Option<A>) -> A {
        self.sum_sq_dev(mean) / A::cast(self.len())
    }
}

impl<A> ops::Deref for Sample<A> {
    type Target = [A];

    fn deref(&self) -> &[A] {
        &self.0
    }
}

#[cfg(test)]
macro_rules! test {
    ($ty:ident) => {
        mod $ty {
            use approx::relative_eq;
            use quickcheck::quickcheck;
            use quickcheck::TestResult;

            use crate::stats::univariate::Sample;

            quickcheck! {
                fn mean_is_bounded(size: u8, start: u8) -> TestResult {
                    let size = size as usize;
                    let start = start as usize;

                    if let Some(v) = crate::stats::test::vec::<$ty>(size, start) {
                        let sample = Sample::new(&v[start..]).unwrap();
                        let mean = sample.mean();

                        TestResult::from_bool(
                            (mean > sample.min() || relative_eq!(mean, sample.min()))
                                && (mean < sample.max() || relative_eq!(mean, sample.max())),
                        )
                    } else {
                        TestResult::discard()
                    }
                }
            }

            quickcheck! {
                fn variance_is_shift_invariant(size: u8, start: u8, shift: u8) -> TestResult {
                    let size = size as usize;
                    let start = start as usize;
                    let shift = shift as $ty;

                    if let Some(v) = crate::stats::test::vec::<$ty>(size, start) {
                        let slice = &v[start..];
                        let shifted = slice.iter().map(|&x| x + shift).collect::<Vec<_>>();
                        let a = Sample::new(slice).unwrap().var(None);
                        let b = Sample::new(&shifted).unwrap().var(None);

                        TestResult::from_bool(relative_eq!(a, b, epsilon = 1e-2, max_relative = 1e-2))
                    } else {
                        TestResult::discard()
                    }
                }
            }
        }
    };
}
