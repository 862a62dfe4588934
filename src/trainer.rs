use candle_core::Device;
use candle_nn::{Module, Optimizer, SGD};

use log::debug;

use crate::dataset::{Batch, TrainingSet};
use crate::error::Result;
use crate::model::Regression;

/// Fits a model one plain SGD step at a time against whatever data exists right now.
pub struct OnlineTrainer<M: Regression> {
    model: M,
    optimizer: SGD,
    device: Device,
}

impl<M: Regression> OnlineTrainer<M> {
    pub fn new(model: M, device: Device) -> Result<Self> {
        Self::with_learning_rate(model, M::LEARNING_RATE, device)
    }

    pub fn with_learning_rate(model: M, learning_rate: f64, device: Device) -> Result<Self> {
        let optimizer = SGD::new(model.vars(), learning_rate)?;

        Ok(OnlineTrainer {
            model,
            optimizer,
            device,
        })
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn learning_rate(&self) -> f64 {
        self.optimizer.learning_rate()
    }

    /// Runs one step over the entire dataset and returns the loss measured before the update.
    ///
    /// An empty dataset leaves the parameters untouched and yields `None`.
    /// Every tensor built here, gradients included, is dropped when the step returns,
    /// whether it finished or bailed out with an error.
    pub fn step<S: TrainingSet + ?Sized>(&mut self, data: &S) -> Result<Option<f32>> {
        let Some(Batch { inputs, truth }) = data.batch(&self.device)? else {
            debug!("no points yet, skipping training step");
            return Ok(None);
        };

        let predictions = self.model.forward(&inputs)?;
        let loss = M::loss(&predictions, &truth)?;

        self.optimizer.backward_step(&loss)?;

        Ok(Some(loss.to_scalar::<f32>()?))
    }
}
