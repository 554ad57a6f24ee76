use oorandom::Rand64;
use std::cell::RefCell;
use std::time::{SystemTime, UNIX_EPOCH};

/// Random number generator used by every synthesizer
pub type Rng = Rand64;

thread_local! {
    static SEED_RAND: RefCell<Rand64> = RefCell::new(Rand64::new(
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_nanos())
            .unwrap_or(0x5eed)
    ));
}

/// Returns a freshly seeded generator
pub fn new_rng() -> Rng {
    SEED_RAND.with(|r| {
        let mut r = r.borrow_mut();
        let seed = ((r.rand_u64() as u128) << 64) | (r.rand_u64() as u128);
        Rand64::new(seed)
    })
}

/// Returns a generator with a fixed seed, for reproducible datasets
pub fn seeded_rng(seed: u64) -> Rng {
    Rand64::new(u128::from(seed))
}

/// Uniform draw from `[low, high)`
pub(crate) fn uniform(rng: &mut Rng, low: f64, high: f64) -> f64 {
    low + (high - low) * rng.rand_float()
}

#[cfg(test)]
mod test {
    use super::*;
    use quickcheck::{quickcheck, TestResult};

    quickcheck! {
        fn uniform_stays_in_range(seed: u64, low: f64, width: f64) -> TestResult {
            if !low.is_finite() || !width.is_finite() || width <= 0. || width > 1e12 {
                return TestResult::discard();
            }

            let high = low + width;
            let mut rng = seeded_rng(seed);

            for _ in 0..100 {
                let value = uniform(&mut rng, low, high);
                if !(low <= value && value <= high) {
                    return TestResult::from_bool(false);
                }
            }

            TestResult::from_bool(true)
        }
    }

    #[test]
    fn seeded_generators_repeat() {
        let mut a = seeded_rng(42);
        let mut b = seeded_rng(42);

        for _ in 0..16 {
            assert_eq!(a.rand_u64(), b.rand_u64());
        }
    }
}
