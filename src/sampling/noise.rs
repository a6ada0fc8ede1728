//! Noise sampling for lattice constructions.

use rand::{CryptoRng, Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use rand_distr::{Distribution, Normal};
use thiserror::Error;

/// A source of uniform residues and discretized Gaussian error terms.
///
/// Wraps a ChaCha20 engine. Every instance owns an independent stream: seed one
/// per thread of execution, either from operating system entropy ([NoiseSampler::new])
/// or from a fixed seed when reproducibility matters. Every sampling call advances
/// the owned engine.
///
/// The sampler also implements [RngCore], so it can feed any consumer of the rand
/// ecosystem directly.
///
/// # Examples
///
/// ```
/// use lattice_math::sampling::NoiseSampler;
/// use rand::SeedableRng;
///
/// let mut sampler = NoiseSampler::seed_from_u64(42);
/// let residue = sampler.uniform_residue(10)?;
/// assert!(residue < 10);
/// # Ok::<(), lattice_math::sampling::SampleError>(())
/// ```
#[derive(Clone, Debug)]
pub struct NoiseSampler {
    rng: ChaCha20Rng,
}

impl NoiseSampler {
    /// Creates a sampler seeded from the operating system entropy source.
    pub fn new() -> Self {
        Self::from_entropy()
    }

    /// Samples a residue uniformly from `[0, bound)`.
    ///
    /// The unit bound always yields zero.
    pub fn uniform_residue(&mut self, bound: u64) -> Result<u64, SampleError> {
        if bound == 0 {
            return Err(SampleError::EmptyRange);
        }
        Ok(self.rng.gen_range(0..bound))
    }

    /// Samples a discretized Gaussian error term.
    ///
    /// Draws from the continuous normal distribution with mean zero and standard
    /// deviation `sigma`, then rounds to the nearest integer with ties away from
    /// zero. A zero `sigma` deterministically yields zero without advancing the
    /// engine. Rounded draws outside the `i64` range saturate at its endpoints,
    /// which takes sigmas around `1e18` and beyond.
    pub fn gaussian_error(&mut self, sigma: f64) -> Result<i64, SampleError> {
        if !sigma.is_finite() || sigma < 0.0 {
            return Err(SampleError::InvalidSigma);
        }
        if sigma == 0.0 {
            return Ok(0);
        }
        let normal = Normal::new(0.0, sigma).map_err(|_| SampleError::InvalidSigma)?;
        Ok(normal.sample(&mut self.rng).round() as i64)
    }
}

impl Default for NoiseSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl SeedableRng for NoiseSampler {
    type Seed = <ChaCha20Rng as SeedableRng>::Seed;

    fn from_seed(seed: Self::Seed) -> Self {
        NoiseSampler { rng: ChaCha20Rng::from_seed(seed) }
    }
}

impl RngCore for NoiseSampler {
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.rng.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.rng.try_fill_bytes(dest)
    }
}

impl CryptoRng for NoiseSampler {}

/// Sampling error.
#[derive(Error, Debug, Eq, PartialEq)]
pub enum SampleError {
    /// Requested range is empty.
    #[error("cannot sample from an empty range")]
    EmptyRange,

    /// Standard deviation is negative or not finite.
    #[error("standard deviation must be finite and non-negative")]
    InvalidSigma,
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::rstest;

    #[test]
    fn empty_range_is_rejected() {
        let mut sampler = NoiseSampler::seed_from_u64(42);
        assert_eq!(sampler.uniform_residue(0), Err(SampleError::EmptyRange));
    }

    #[test]
    fn unit_range_always_yields_zero() {
        let mut sampler = NoiseSampler::seed_from_u64(42);
        for _ in 0..1000 {
            assert_eq!(sampler.uniform_residue(1).unwrap(), 0);
        }
    }

    #[rstest]
    #[case(2)]
    #[case(10)]
    #[case(100)]
    fn residues_stay_in_range(#[case] bound: u64) {
        let mut sampler = NoiseSampler::seed_from_u64(42);
        for _ in 0..1000 {
            assert!(sampler.uniform_residue(bound).unwrap() < bound);
        }
    }

    #[test]
    fn residues_are_roughly_uniform() {
        let mut sampler = NoiseSampler::seed_from_u64(42);
        let bound = 10u64;
        let draws = 100_000usize;
        let mut counts = vec![0usize; bound as usize];
        for _ in 0..draws {
            let value = sampler.uniform_residue(bound).unwrap();
            counts[value as usize] += 1;
        }
        let expected = draws / bound as usize;
        let tolerance = expected / 10;
        for count in counts {
            assert!(count.abs_diff(expected) < tolerance, "bucket count {count} too far from {expected}");
        }
    }

    #[test]
    fn zero_sigma_yields_zero() {
        let mut sampler = NoiseSampler::seed_from_u64(42);
        for _ in 0..100 {
            assert_eq!(sampler.gaussian_error(0.0).unwrap(), 0);
        }
    }

    #[rstest]
    #[case::negative(-1.0)]
    #[case::nan(f64::NAN)]
    #[case::infinite(f64::INFINITY)]
    fn invalid_sigma_is_rejected(#[case] sigma: f64) {
        let mut sampler = NoiseSampler::seed_from_u64(42);
        assert_eq!(sampler.gaussian_error(sigma), Err(SampleError::InvalidSigma));
    }

    #[test]
    fn gaussian_errors_match_the_distribution() {
        let mut sampler = NoiseSampler::seed_from_u64(42);
        let sigma = 3.2f64;
        let draws = 100_000;
        let mut sum = 0i64;
        let mut square_sum = 0i64;
        for _ in 0..draws {
            let error = sampler.gaussian_error(sigma).unwrap();
            sum += error;
            square_sum += error * error;
        }
        let mean = sum as f64 / draws as f64;
        let variance = square_sum as f64 / draws as f64 - mean * mean;
        assert!(mean.abs() < 0.1, "sample mean {mean} too far from zero");
        // Rounding adds roughly 1/12 on top of sigma^2.
        let expected = sigma * sigma;
        assert!((variance / expected - 1.0).abs() < 0.1, "sample variance {variance} too far from {expected}");
    }

    #[test]
    fn extreme_sigma_saturates_at_the_integer_bounds() {
        let mut sampler = NoiseSampler::from_seed([3u8; 32]);
        for _ in 0..32 {
            let error = sampler.gaussian_error(1e30).unwrap();
            assert!(error == i64::MIN || error == i64::MAX);
        }
    }

    #[test]
    fn seeded_samplers_are_deterministic() {
        let mut left = NoiseSampler::from_seed([7u8; 32]);
        let mut right = NoiseSampler::from_seed([7u8; 32]);
        for _ in 0..100 {
            assert_eq!(left.uniform_residue(1 << 40).unwrap(), right.uniform_residue(1 << 40).unwrap());
            assert_eq!(left.gaussian_error(2.5).unwrap(), right.gaussian_error(2.5).unwrap());
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let mut left = NoiseSampler::seed_from_u64(1);
        let mut right = NoiseSampler::seed_from_u64(2);
        let left_draws: Vec<_> = (0..16).map(|_| left.next_u64()).collect();
        let right_draws: Vec<_> = (0..16).map(|_| right.next_u64()).collect();
        assert_ne!(left_draws, right_draws);
    }

    #[test]
    fn forwards_the_rng_core_interface() {
        let mut sampler = NoiseSampler::from_seed([9u8; 32]);
        let mut reference = ChaCha20Rng::from_seed([9u8; 32]);
        assert_eq!(sampler.next_u64(), reference.next_u64());
        let mut bytes = [0u8; 16];
        sampler.fill_bytes(&mut bytes);
        let mut expected = [0u8; 16];
        reference.fill_bytes(&mut expected);
        assert_eq!(bytes, expected);
    }
}
