use rand::rngs::StdRng;
use rand::seq::index;
use rand::SeedableRng;

use crate::error::{Error, Result};

pub trait PointCloudSampler {
    /// Picks `sample_size` distinct indices out of `0..population`.
    fn sample_indices(&mut self, population: usize, sample_size: usize) -> Result<Vec<usize>>;

    /// Copies the selected points out of `points`, in the order the indices
    /// were drawn.
    fn sample<T: Clone>(&mut self, points: &[T], sample_size: usize) -> Result<Vec<T>>
    where
        Self: Sized,
    {
        let indices = self.sample_indices(points.len(), sample_size)?;
        Ok(indices.into_iter().map(|i| points[i].clone()).collect())
    }
}

/// Uniform sampling without replacement.
#[derive(Debug, Clone)]
pub struct RandomSampler {
    rng: StdRng,
}

impl RandomSampler {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self { rng }
    }
}

impl Default for RandomSampler {
    fn default() -> Self {
        Self::new(None)
    }
}

impl PointCloudSampler for RandomSampler {
    fn sample_indices(&mut self, population: usize, sample_size: usize) -> Result<Vec<usize>> {
        if sample_size > population {
            return Err(Error::invalid_argument(format!(
                "cannot sample {sample_size} points without replacement from {population}"
            )));
        }
        log::debug!("sampling {} of {} points", sample_size, population);

        Ok(index::sample(&mut self.rng, population, sample_size).into_vec())
    }
}
