//! Float trait

use cast::From;
use num_traits::float;

/// Floating point type accepted by the descriptive statistics
///
/// `num_traits::float::Float` plus infallible casts from counts and `f32` literals, so generic
/// code can write `A::cast(n)` and `A::cast(0.5)`.
pub trait Float:
    float::Float + From<usize, Output = Self> + From<f32, Output = Self> + Sync + Send
{
}

impl Float for f32 {}
impl Float for f64 {}
