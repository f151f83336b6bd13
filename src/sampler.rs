use rand::Rng;

use crate::IndexSampler;
use crate::error::{Result, SamplerError};

/// Uniform index sampler: picks an index in `0..n` with equal probability.
#[derive(Debug, Clone, Copy)]
pub struct UniformSampler {
    n: usize,
}

impl UniformSampler {
    pub fn new(n: usize) -> Result<Self> {
        if n == 0 {
            return Err(SamplerError::config("uniform sampler over an empty domain"));
        }
        Ok(Self { n })
    }

    /// Draw a 1-based label in `1..=n`.
    #[inline]
    pub fn sample_label<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        self.sample_index(rng) as u32 + 1
    }
}

impl IndexSampler for UniformSampler {
    #[inline]
    fn len(&self) -> usize {
        self.n
    }
    #[inline]
    fn sample_index<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        rng.random_range(0..self.n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn labels_cover_domain() {
        assert!(UniformSampler::new(0).is_err());
        let s = UniformSampler::new(4).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let mut seen = [false; 4];
        for _ in 0..500 {
            let l = s.sample_label(&mut rng);
            assert!((1..=4).contains(&l));
            seen[l as usize - 1] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }
}
