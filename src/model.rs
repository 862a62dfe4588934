use candle_core::{Device, Shape, Tensor, Var};
use candle_nn::Module;

use rand::Rng;
use rand_distr::{Distribution, Uniform};

/// A model the online trainer can fit: a prediction function plus the loss it is scored with.
pub trait Regression: Module {
    const LEARNING_RATE: f64;

    /// Every trainable parameter, shared with the optimizer.
    fn vars(&self) -> Vec<Var>;

    fn loss(predictions: &Tensor, truth: &Tensor) -> candle_core::Result<Tensor>;
}

/// A variable of the given shape filled with draws from `U[0, 1)`.
pub fn uniform_var<R, S>(rng: &mut R, shape: S, device: &Device) -> candle_core::Result<Var>
where
    R: Rng + ?Sized,
    S: Into<Shape>,
{
    let shape = shape.into();

    let values: Vec<f32> = Uniform::new(0f32, 1f32)
        .sample_iter(&mut *rng)
        .take(shape.elem_count())
        .collect();

    Var::from_tensor(&Tensor::from_vec(values, shape, device)?)
}
