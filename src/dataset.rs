use candle_core::{Device, Tensor};
use ndarray::Array2;

use crate::error::Result;

/// A captured point in model space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Point { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Class {
    Blue,
    Red,
}

impl Class {
    pub fn label(self) -> f32 {
        match self {
            Class::Blue => 0.,
            Class::Red => 1.,
        }
    }

    /// Anything below the threshold is blue, everything else (NaN included) is red.
    pub fn from_probability(probability: f32, threshold: f32) -> Class {
        if probability < threshold {
            Class::Blue
        } else {
            Class::Red
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabeledPoint {
    pub x: f32,
    pub y: f32,
    pub class: Class,
}

impl LabeledPoint {
    pub fn new(x: f32, y: f32, class: Class) -> Self {
        LabeledPoint { x, y, class }
    }
}

/// Append-only, insertion ordered collection of points.
#[derive(Debug, Clone)]
pub struct Dataset<P> {
    points: Vec<P>,
}

impl<P> Default for Dataset<P> {
    fn default() -> Self {
        Dataset { points: Vec::new() }
    }
}

impl<P> Dataset<P> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, point: P) {
        self.points.push(point);
    }

    pub fn all(&self) -> &[P] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Labeled points kept in one subset per class.
///
/// A point lands in the subset of the class it carried when appended and is never moved.
#[derive(Debug, Clone, Default)]
pub struct ClassifiedDataset {
    blue: Dataset<LabeledPoint>,
    red: Dataset<LabeledPoint>,
}

impl ClassifiedDataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, point: LabeledPoint) {
        match point.class {
            Class::Blue => self.blue.append(point),
            Class::Red => self.red.append(point),
        }
    }

    pub fn blue(&self) -> &[LabeledPoint] {
        self.blue.all()
    }

    pub fn red(&self) -> &[LabeledPoint] {
        self.red.all()
    }

    /// Blue points followed by red points.
    pub fn all(&self) -> impl Iterator<Item = &LabeledPoint> + Clone {
        self.blue.all().iter().chain(self.red.all().iter())
    }

    pub fn len(&self) -> usize {
        self.blue.len() + self.red.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Inputs and ground truth for one training step.
#[derive(Debug, Clone)]
pub struct Batch {
    pub inputs: Tensor,
    pub truth: Tensor,
}

pub trait TrainingSet {
    /// The whole dataset as a single batch, `None` when there is nothing to train on.
    fn batch(&self, device: &Device) -> Result<Option<Batch>>;
}

impl TrainingSet for Dataset<Point> {
    fn batch(&self, device: &Device) -> Result<Option<Batch>> {
        if self.is_empty() {
            return Ok(None);
        }

        let inputs = Tensor::from_iter(self.points.iter().map(|p| p.x), device)?;
        let truth = Tensor::from_iter(self.points.iter().map(|p| p.y), device)?;

        Ok(Some(Batch { inputs, truth }))
    }
}

impl TrainingSet for ClassifiedDataset {
    fn batch(&self, device: &Device) -> Result<Option<Batch>> {
        let n = self.len();
        if n == 0 {
            return Ok(None);
        }

        let features = Array2::from_shape_vec(
            (n, 2),
            self.all().flat_map(|p| [p.x, p.y]).collect::<Vec<_>>(),
        )?;
        let labels = Array2::from_shape_vec(
            (n, 1),
            self.all().map(|p| p.class.label()).collect::<Vec<_>>(),
        )?;

        let inputs = Tensor::from_iter(features.iter().copied(), device)?.reshape((n, 2))?;
        let truth = Tensor::from_iter(labels.iter().copied(), device)?.reshape((n, 1))?;

        Ok(Some(Batch { inputs, truth }))
    }
}
