use std::collections::VecDeque;

use log::debug;

use crate::dataset::{Class, ClassifiedDataset, LabeledPoint, Point};
use crate::logistic::LogisticModel;

pub const THRESHOLD: f32 = 0.5;

/// A captured point whose class has been predicted but which is not in the dataset yet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingLabel {
    point: Point,
    probability: f32,
    ready_at: u64,
}

impl PendingLabel {
    pub fn point(&self) -> Point {
        self.point
    }

    pub fn probability(&self) -> f32 {
        self.probability
    }

    pub fn class(&self) -> Class {
        Class::from_probability(self.probability, THRESHOLD)
    }

    /// First tick on which the label may be committed.
    pub fn ready_at(&self) -> u64 {
        self.ready_at
    }
}

/// First phase of a capture: classify the point with the parameters as they are now.
pub fn predict(
    model: &LogisticModel,
    point: Point,
    ready_at: u64,
) -> candle_core::Result<PendingLabel> {
    let probability = model.probability(point.x, point.y)?;

    Ok(PendingLabel {
        point,
        probability,
        ready_at,
    })
}

/// Second phase: the point joins the subset of its predicted class, for good.
pub fn commit(pending: PendingLabel, dataset: &mut ClassifiedDataset) -> LabeledPoint {
    let point = LabeledPoint::new(pending.point.x, pending.point.y, pending.class());
    dataset.append(point);

    point
}

/// Predictions waiting for their commit tick, in capture order.
#[derive(Debug, Clone, Default)]
pub struct PendingQueue {
    queue: VecDeque<PendingLabel>,
}

impl PendingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, pending: PendingLabel) {
        self.queue.push_back(pending);
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Commits every label due at `tick`, returns how many landed.
    pub fn commit_ready(&mut self, tick: u64, dataset: &mut ClassifiedDataset) -> usize {
        let mut committed = 0;

        while let Some(pending) = self.queue.front().copied() {
            if pending.ready_at > tick {
                break;
            }
            self.queue.pop_front();

            let point = commit(pending, dataset);
            debug!(
                "committed ({:.3}, {:.3}) as {:?} on tick {}",
                point.x, point.y, point.class, tick
            );
            committed += 1;
        }

        committed
    }
}
