use candle_core::{Device, Tensor, Var};
use candle_nn::loss::mse;
use candle_nn::Module;

use rand::Rng;

use crate::mapper::Segment;
use crate::model::{uniform_var, Regression};

/// `y = x * w + b` with scalar weight and bias.
pub struct LinearModel {
    w: Var,
    b: Var,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearSnapshot {
    pub weight: f32,
    pub bias: f32,
}

impl LinearModel {
    pub fn new(weight: f32, bias: f32, device: &Device) -> candle_core::Result<Self> {
        Ok(LinearModel {
            w: Var::new(weight, device)?,
            b: Var::new(bias, device)?,
        })
    }

    /// Weight and bias drawn independently from `U[0, 1)`.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, device: &Device) -> candle_core::Result<Self> {
        Ok(LinearModel {
            w: uniform_var(rng, (), device)?,
            b: uniform_var(rng, (), device)?,
        })
    }

    pub fn snapshot(&self) -> candle_core::Result<LinearSnapshot> {
        Ok(LinearSnapshot {
            weight: self.w.to_scalar::<f32>()?,
            bias: self.b.to_scalar::<f32>()?,
        })
    }

    /// The regression line between model-space x = 0 and x = 1.
    pub fn line(&self) -> candle_core::Result<Segment> {
        let xs = Tensor::new(&[0f32, 1.], self.w.device())?;

        match self.forward(&xs)?.to_vec1::<f32>()?.as_slice() {
            &[y0, y1] => Ok(Segment::new((0., y0), (1., y1))),
            other => Err(candle_core::Error::Msg(format!(
                "expected two line endpoints, got {}",
                other.len()
            ))),
        }
    }
}

impl Module for LinearModel {
    fn forward(&self, xs: &Tensor) -> candle_core::Result<Tensor> {
        xs.broadcast_mul(&self.w)?.broadcast_add(&self.b)
    }
}

impl Regression for LinearModel {
    const LEARNING_RATE: f64 = 0.5;

    fn vars(&self) -> Vec<Var> {
        vec![self.w.clone(), self.b.clone()]
    }

    fn loss(predictions: &Tensor, truth: &Tensor) -> candle_core::Result<Tensor> {
        mse(predictions, truth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn predicts_elementwise() -> candle_core::Result<()> {
        let device = Device::Cpu;
        let model = LinearModel::new(2., 0.5, &device)?;

        let ys = model.forward(&Tensor::new(&[0f32, 1., -1., 0.25], &device)?)?;

        assert_eq!(ys.to_vec1::<f32>()?, vec![0.5, 2.5, -1.5, 1.]);

        Ok(())
    }

    #[test]
    fn line_spans_the_unit_interval() -> candle_core::Result<()> {
        let model = LinearModel::new(-0.5, 0.75, &Device::Cpu)?;

        assert_eq!(model.line()?, Segment::new((0., 0.75), (1., 0.25)));

        Ok(())
    }

    #[test]
    fn random_parameters_are_in_unit_interval() -> candle_core::Result<()> {
        let mut rng = StdRng::seed_from_u64(3);
        let LinearSnapshot { weight, bias } =
            LinearModel::random(&mut rng, &Device::Cpu)?.snapshot()?;

        assert!((0. ..1.).contains(&weight));
        assert!((0. ..1.).contains(&bias));

        Ok(())
    }

    #[test]
    fn autodiff_matches_closed_form_mse_gradient() -> candle_core::Result<()> {
        let device = Device::Cpu;
        let model = LinearModel::new(0.3, -0.2, &device)?;

        let xs = [0.1f32, 0.4, 0.9];
        let ys = [0.3f32, 0.2, 0.8];

        let predictions = model.forward(&Tensor::new(&xs, &device)?)?;
        let loss = LinearModel::loss(&predictions, &Tensor::new(&ys, &device)?)?;
        let grads = loss.backward()?;

        let residuals: Vec<f32> = xs.iter().zip(ys).map(|(x, y)| 0.3 * x - 0.2 - y).collect();
        let n = xs.len() as f32;
        let expected_w = 2. * residuals.iter().zip(xs).map(|(r, x)| r * x).sum::<f32>() / n;
        let expected_b = 2. * residuals.iter().sum::<f32>() / n;

        let grad_w = grads.get(&model.w).unwrap().to_scalar::<f32>()?;
        let grad_b = grads.get(&model.b).unwrap().to_scalar::<f32>()?;

        assert!((grad_w - expected_w).abs() < 1e-5, "{} vs {}", grad_w, expected_w);
        assert!((grad_b - expected_b).abs() < 1e-5, "{} vs {}", grad_b, expected_b);

        Ok(())
    }

    #[test]
    fn mse_is_never_negative() -> candle_core::Result<()> {
        let device = Device::Cpu;

        for (predictions, truth) in [
            ([0f32, 0., 0.], [0f32, 0., 0.]),
            ([1e6, -1e6, 3.], [-1e6, 1e6, 3.]),
            ([0.5, 0.25, 0.125], [0.1, 0.9, 0.3]),
        ] {
            let loss = LinearModel::loss(
                &Tensor::new(&predictions, &device)?,
                &Tensor::new(&truth, &device)?,
            )?
            .to_scalar::<f32>()?;

            assert!(loss >= 0., "negative loss {}", loss);
        }

        Ok(())
    }
}
