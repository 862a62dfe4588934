use candle_core::{Device, Tensor, Var};
use candle_nn::Module;

use rand::Rng;

use crate::mapper::Segment;
use crate::model::{uniform_var, Regression};

/// Keeps `log` away from zero, same constant as the usual `logLoss`.
const EPSILON: f64 = 1e-7;

pub fn sigmoid(xs: &Tensor) -> candle_core::Result<Tensor> {
    xs.neg()?.exp()?.affine(1., 1.)?.recip()
}

/// Binary cross-entropy averaged over the batch.
pub fn log_loss(predictions: &Tensor, truth: &Tensor) -> candle_core::Result<Tensor> {
    let predictions = predictions.clamp(EPSILON, 1. - EPSILON)?;

    let positive = truth.mul(&predictions.log()?)?;
    let negative = truth
        .affine(-1., 1.)?
        .mul(&predictions.affine(-1., 1.)?.log()?)?;

    positive.add(&negative)?.neg()?.mean_all()
}

/// `p = sigmoid(X · wᵗ + b)` over pairs of features.
pub struct LogisticModel {
    w: Var,
    b: Var,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogisticSnapshot {
    pub weights: [f32; 2],
    pub bias: f32,
}

impl LogisticSnapshot {
    /// The line where the predicted probability is exactly one half.
    ///
    /// With `w2 == 0` the boundary is vertical, with both weights zero there is none.
    pub fn boundary(&self) -> Option<Segment> {
        let [w1, w2] = self.weights;
        let b = self.bias;

        if w2 != 0. {
            Some(Segment::new((0., -b / w2), (1., (-b - w1) / w2)))
        } else if w1 != 0. {
            let x = -b / w1;
            Some(Segment::new((x, 0.), (x, 1.)))
        } else {
            None
        }
    }
}

impl LogisticModel {
    pub fn new(weights: [f32; 2], bias: f32, device: &Device) -> candle_core::Result<Self> {
        Ok(LogisticModel {
            w: Var::from_tensor(&Tensor::from_vec(weights.to_vec(), (1, 2), device)?)?,
            b: Var::from_tensor(&Tensor::from_vec(vec![bias], (1, 1), device)?)?,
        })
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R, device: &Device) -> candle_core::Result<Self> {
        Ok(LogisticModel {
            w: uniform_var(rng, (1, 2), device)?,
            b: uniform_var(rng, (1, 1), device)?,
        })
    }

    pub fn snapshot(&self) -> candle_core::Result<LogisticSnapshot> {
        let weights = self.w.flatten_all()?.to_vec1::<f32>()?;
        let bias = self.b.flatten_all()?.to_vec1::<f32>()?;

        match (weights.as_slice(), bias.as_slice()) {
            (&[w1, w2], &[bias]) => Ok(LogisticSnapshot {
                weights: [w1, w2],
                bias,
            }),
            _ => Err(candle_core::Error::Msg(format!(
                "unexpected parameter sizes: {} weights, {} biases",
                weights.len(),
                bias.len()
            ))),
        }
    }

    /// Probability that a single model-space point belongs to class 1.
    pub fn probability(&self, x: f32, y: f32) -> candle_core::Result<f32> {
        let point = Tensor::from_vec(vec![x, y], (1, 2), self.w.device())?;

        self.forward(&point)?.flatten_all()?.get(0)?.to_scalar::<f32>()
    }
}

impl Module for LogisticModel {
    fn forward(&self, xs: &Tensor) -> candle_core::Result<Tensor> {
        let z = xs
            .matmul(&self.w.t()?.contiguous()?)?
            .broadcast_add(&self.b)?;

        sigmoid(&z)
    }
}

impl Regression for LogisticModel {
    const LEARNING_RATE: f64 = 1.;

    fn vars(&self) -> Vec<Var> {
        vec![self.w.clone(), self.b.clone()]
    }

    fn loss(predictions: &Tensor, truth: &Tensor) -> candle_core::Result<Tensor> {
        log_loss(predictions, truth)
    }
}
