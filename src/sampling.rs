use rand::Rng;
use rand_distr::{Distribution, Normal, NormalError};

use crate::dataset::{Class, ClassifiedDataset, LabeledPoint};

/// Rejected draws allowed before falling back to clamping.
pub const MAX_ATTEMPTS: usize = 64;

/// How far left the red cluster sits from the blue one.
pub const RED_SHIFT: f32 = 0.3;

/// A normal distribution restricted to `[low, high]` by resampling.
#[derive(Debug, Clone, Copy)]
pub struct TruncatedNormal {
    normal: Normal<f32>,
    low: f32,
    high: f32,
}

impl TruncatedNormal {
    pub fn new(mean: f32, std_dev: f32, low: f32, high: f32) -> Result<Self, NormalError> {
        Ok(TruncatedNormal {
            normal: Normal::new(mean, std_dev)?,
            low,
            high,
        })
    }

    /// Mean 0.5, standard deviation 0.1, kept inside the unit interval.
    pub fn unit() -> Result<Self, NormalError> {
        Self::new(0.5, 0.1, 0., 1.)
    }
}

impl Distribution<f32> for TruncatedNormal {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        let mut value = self.normal.sample(rng);

        for _ in 1..MAX_ATTEMPTS {
            if (self.low..=self.high).contains(&value) {
                return value;
            }
            value = self.normal.sample(rng);
        }

        value.clamp(self.low, self.high)
    }
}

/// Initial points of the classification demo: a blue cluster around the middle
/// of the canvas and a red one shifted to the left.
pub fn seed_clusters<R: Rng + ?Sized>(
    rng: &mut R,
    per_class: usize,
) -> Result<ClassifiedDataset, NormalError> {
    let distribution = TruncatedNormal::unit()?;
    let mut dataset = ClassifiedDataset::new();

    for _ in 0..per_class {
        let x = distribution.sample(rng);
        let y = distribution.sample(rng);
        dataset.append(LabeledPoint::new(x, y, Class::Blue));
    }

    for _ in 0..per_class {
        let x = distribution.sample(rng) - RED_SHIFT;
        let y = distribution.sample(rng);
        dataset.append(LabeledPoint::new(x, y, Class::Red));
    }

    Ok(dataset)
}
