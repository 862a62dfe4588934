use candle_core::Device;
use log::{debug, warn};
use plotters::style::full_palette;
use plotters::style::RGBColor;
use rand::Rng;

use crate::config::{ClassifierConfig, SessionConfig};
use crate::dataset::{ClassifiedDataset, Dataset, LabeledPoint, Point};
use crate::error::Result;
use crate::events::PointerEvent;
use crate::feedback::{self, PendingQueue};
use crate::linear::{LinearModel, LinearSnapshot};
use crate::logistic::{LogisticModel, LogisticSnapshot};
use crate::mapper::{CoordinateMapper, Segment};
use crate::model::Regression;
use crate::sampling::seed_clusters;
use crate::trainer::OnlineTrainer;

/// A dot in screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dot {
    pub x: f32,
    pub y: f32,
    pub color: RGBColor,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStyle {
    pub dot_radius: u32,
    pub line_width: u32,
    pub text_origin: (i32, i32),
    pub text_size: u32,
    pub line_spacing: i32,
}

/// Everything one redraw needs, in screen coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub index: u64,
    pub width: u32,
    pub height: u32,
    pub dots: Vec<Dot>,
    pub line: Option<((f32, f32), (f32, f32))>,
    pub text: Vec<String>,
    pub loss: Option<f32>,
    pub style: FrameStyle,
}

/// Application state driven by the frame loop: input goes in through `capture`,
/// one training step and a redraw come out of every `tick`.
pub trait Playground {
    /// Prefix of rendered frame files.
    const NAME: &'static str;

    fn mapper(&self) -> &CoordinateMapper;

    fn capture(&mut self, event: &PointerEvent, frame: u64) -> Result<()>;

    fn tick(&mut self, frame: u64) -> Result<Frame>;

    fn point_count(&self) -> usize;

    /// Captures accepted but not yet part of the dataset.
    fn pending_count(&self) -> usize {
        0
    }
}

fn cost_message(loss: Option<f32>) -> String {
    match loss {
        Some(loss) => format!("Cost: {}", loss),
        None => "Cost: ".to_string(),
    }
}

fn screen_line(segment: Option<Segment>, mapper: &CoordinateMapper) -> Option<((f32, f32), (f32, f32))> {
    segment
        .and_then(Segment::clip_to_unit_square)
        .map(|s| s.to_screen(mapper))
}

fn canvas_mapper(config: &SessionConfig) -> CoordinateMapper {
    CoordinateMapper::new(config.canvas_size as f32, config.canvas_size as f32)
}

fn trainer_for<M: Regression>(
    model: M,
    config: &SessionConfig,
    device: Device,
) -> Result<OnlineTrainer<M>> {
    match config.learning_rate {
        Some(lr) => OnlineTrainer::with_learning_rate(model, lr, device),
        None => OnlineTrainer::new(model, device),
    }
}

/// Warns once when parameters stop being finite; nothing else reacts to it.
fn note_divergence(diverged: &mut bool, parameters: &[f32], frame: u64) {
    if !*diverged && parameters.iter().any(|p| !p.is_finite()) {
        warn!("parameters are no longer finite at frame {}: {:?}", frame, parameters);
        *diverged = true;
    }
}

const LINEAR_STYLE: FrameStyle = FrameStyle {
    dot_radius: 4,
    line_width: 5,
    text_origin: (1040, 742),
    text_size: 60,
    line_spacing: 60,
};

/// Fits a line through clicked points.
pub struct LinearSession {
    mapper: CoordinateMapper,
    dataset: Dataset<Point>,
    trainer: OnlineTrainer<LinearModel>,
    diverged: bool,
}

impl LinearSession {
    pub fn new<R: Rng + ?Sized>(config: &SessionConfig, rng: &mut R) -> Result<Self> {
        let device = Device::Cpu;
        let model = LinearModel::random(rng, &device)?;

        Ok(Self::from_parts(
            canvas_mapper(config),
            trainer_for(model, config, device)?,
        ))
    }

    pub fn from_parts(mapper: CoordinateMapper, trainer: OnlineTrainer<LinearModel>) -> Self {
        LinearSession {
            mapper,
            dataset: Dataset::new(),
            trainer,
            diverged: false,
        }
    }

    pub fn dataset(&self) -> &Dataset<Point> {
        &self.dataset
    }

    pub fn trainer(&self) -> &OnlineTrainer<LinearModel> {
        &self.trainer
    }
}

impl Playground for LinearSession {
    const NAME: &'static str = "reg_lin";

    fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    fn capture(&mut self, event: &PointerEvent, _frame: u64) -> Result<()> {
        let (x, y) = self.mapper.transform(event.x, event.y);
        self.dataset.append(Point::new(x, y));

        Ok(())
    }

    fn tick(&mut self, frame: u64) -> Result<Frame> {
        let dots = self
            .dataset
            .all()
            .iter()
            .map(|p| {
                let (x, y) = self.mapper.inverse_transform(p.x, p.y);
                Dot {
                    x,
                    y,
                    color: full_palette::RED,
                }
            })
            .collect();

        let loss = self.trainer.step(&self.dataset)?;

        let line = match loss {
            Some(_) => screen_line(Some(self.trainer.model().line()?), &self.mapper),
            None => None,
        };

        let LinearSnapshot { weight, bias } = self.trainer.model().snapshot()?;
        note_divergence(&mut self.diverged, &[weight, bias], frame);

        debug!(
            "frame {}: points={} weight={} bias={} loss={:?}",
            frame,
            self.dataset.len(),
            weight,
            bias,
            loss
        );

        Ok(Frame {
            index: frame,
            width: self.mapper.width() as u32,
            height: self.mapper.height() as u32,
            dots,
            line,
            text: vec![
                format!("Bias: {}", bias),
                format!("Weight: {}", weight),
                cost_message(loss),
            ],
            loss,
            style: LINEAR_STYLE,
        })
    }

    fn point_count(&self) -> usize {
        self.dataset.len()
    }
}

const LOGISTIC_STYLE: FrameStyle = FrameStyle {
    dot_radius: 10,
    line_width: 5,
    text_origin: (0, 682),
    text_size: 40,
    line_spacing: 60,
};

/// Classifies clicked points with the current model and keeps fitting the boundary.
pub struct LogisticSession {
    mapper: CoordinateMapper,
    dataset: ClassifiedDataset,
    pending: PendingQueue,
    trainer: OnlineTrainer<LogisticModel>,
    commit_latency: u64,
    diverged: bool,
}

impl LogisticSession {
    pub fn new<R: Rng + ?Sized>(
        config: &SessionConfig,
        classifier: &ClassifierConfig,
        rng: &mut R,
    ) -> Result<Self> {
        let device = Device::Cpu;
        let dataset = seed_clusters(rng, classifier.initial_per_class)?;
        let model = LogisticModel::random(rng, &device)?;

        Ok(Self::from_parts(
            canvas_mapper(config),
            dataset,
            trainer_for(model, config, device)?,
            classifier.commit_latency,
        ))
    }

    pub fn from_parts(
        mapper: CoordinateMapper,
        dataset: ClassifiedDataset,
        trainer: OnlineTrainer<LogisticModel>,
        commit_latency: u64,
    ) -> Self {
        LogisticSession {
            mapper,
            dataset,
            pending: PendingQueue::new(),
            trainer,
            commit_latency,
            diverged: false,
        }
    }

    pub fn dataset(&self) -> &ClassifiedDataset {
        &self.dataset
    }

    pub fn pending(&self) -> &PendingQueue {
        &self.pending
    }

    pub fn trainer(&self) -> &OnlineTrainer<LogisticModel> {
        &self.trainer
    }

    fn dots<'a>(
        &'a self,
        points: &'a [LabeledPoint],
        color: RGBColor,
    ) -> impl Iterator<Item = Dot> + 'a {
        points.iter().map(move |p| {
            let (x, y) = self.mapper.inverse_transform(p.x, p.y);
            Dot { x, y, color }
        })
    }
}

impl Playground for LogisticSession {
    const NAME: &'static str = "log_reg";

    fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    fn capture(&mut self, event: &PointerEvent, frame: u64) -> Result<()> {
        let (x, y) = self.mapper.transform(event.x, event.y);

        let pending = feedback::predict(
            self.trainer.model(),
            Point::new(x, y),
            frame + self.commit_latency,
        )?;
        let point = pending.point();
        debug!(
            "captured ({:.3}, {:.3}) p={} as {:?}, lands on tick {}",
            point.x,
            point.y,
            pending.probability(),
            pending.class(),
            pending.ready_at()
        );
        self.pending.push(pending);

        Ok(())
    }

    fn tick(&mut self, frame: u64) -> Result<Frame> {
        self.pending.commit_ready(frame, &mut self.dataset);

        let dots = self
            .dots(self.dataset.blue(), full_palette::BLUE)
            .chain(self.dots(self.dataset.red(), full_palette::RED))
            .collect();

        let loss = self.trainer.step(&self.dataset)?;

        let snapshot = self.trainer.model().snapshot()?;
        let LogisticSnapshot {
            weights: [w1, w2],
            bias,
        } = snapshot;
        note_divergence(&mut self.diverged, &[w1, w2, bias], frame);

        debug!(
            "frame {}: points={} pending={} weights=[{}, {}] bias={} loss={:?}",
            frame,
            self.dataset.len(),
            self.pending.len(),
            w1,
            w2,
            bias,
            loss
        );

        Ok(Frame {
            index: frame,
            width: self.mapper.width() as u32,
            height: self.mapper.height() as u32,
            dots,
            line: screen_line(snapshot.boundary(), &self.mapper),
            text: vec![
                format!("Bias: {}", bias),
                format!("Weight 1: {}", w1),
                format!("Weight 2: {}", w2),
                cost_message(loss),
            ],
            loss,
            style: LOGISTIC_STYLE,
        })
    }

    fn point_count(&self) -> usize {
        self.dataset.len()
    }

    fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::dataset::Class;
    use crate::events::PointerKind;

    fn press(x: f32, y: f32) -> PointerEvent {
        PointerEvent {
            frame: 0,
            kind: PointerKind::Press,
            x,
            y,
        }
    }

    #[test]
    fn linear_capture_maps_into_model_space() -> Result<()> {
        let device = Device::Cpu;
        let trainer = OnlineTrainer::new(LinearModel::new(0., 0., &device)?, device)?;
        let mut session = LinearSession::from_parts(CoordinateMapper::new(100., 100.), trainer);

        session.capture(&press(25., 75.), 0)?;

        assert_eq!(session.dataset().all(), &[Point::new(0.25, 0.25)]);

        Ok(())
    }

    #[test]
    fn empty_linear_frame_has_no_line_and_no_cost() -> Result<()> {
        let device = Device::Cpu;
        let trainer = OnlineTrainer::new(LinearModel::new(0.2, 0.4, &device)?, device)?;
        let mut session = LinearSession::from_parts(CoordinateMapper::new(100., 100.), trainer);

        let frame = session.tick(0)?;

        assert!(frame.dots.is_empty());
        assert_eq!(frame.line, None);
        assert_eq!(frame.loss, None);
        assert_eq!(frame.text, vec!["Bias: 0.4", "Weight: 0.2", "Cost: "]);
        assert_eq!(
            session.trainer().model().snapshot()?,
            LinearSnapshot {
                weight: 0.2,
                bias: 0.4
            }
        );

        Ok(())
    }

    #[test]
    fn linear_frame_draws_points_and_line() -> Result<()> {
        let device = Device::Cpu;
        let trainer = OnlineTrainer::new(LinearModel::new(0., 0.5, &device)?, device)?;
        let mut session = LinearSession::from_parts(CoordinateMapper::new(200., 100.), trainer);

        session.capture(&press(100., 50.), 0)?;
        let frame = session.tick(0)?;

        assert_eq!(frame.dots.len(), 1);
        assert_eq!((frame.dots[0].x, frame.dots[0].y), (100., 50.));
        assert_eq!(frame.loss, Some(0.));

        let ((x0, _), (x1, _)) = frame.line.unwrap();
        assert_eq!((x0, x1), (0., 200.));
        assert!(frame.text[2].starts_with("Cost: 0"));

        Ok(())
    }

    #[test]
    fn logistic_capture_lands_after_the_latency() -> Result<()> {
        let device = Device::Cpu;
        let trainer = OnlineTrainer::new(LogisticModel::new([2., 0.], -1., &device)?, device)?;
        let mut session = LogisticSession::from_parts(
            CoordinateMapper::new(100., 100.),
            ClassifiedDataset::new(),
            trainer,
            2,
        );

        session.capture(&press(90., 50.), 0)?;

        assert!(session.tick(0)?.dots.is_empty());
        assert!(session.tick(1)?.dots.is_empty());
        assert_eq!(session.pending().len(), 1);

        let frame = session.tick(2)?;
        assert_eq!(frame.dots.len(), 1);
        assert_eq!(frame.dots[0].color, full_palette::RED);
        assert_eq!(session.dataset().red()[0].class, Class::Red);
        assert!(session.pending().is_empty());

        Ok(())
    }

    #[test]
    fn logistic_frame_lists_blue_before_red() -> Result<()> {
        let device = Device::Cpu;
        let trainer = OnlineTrainer::new(LogisticModel::new([2., 0.], -1., &device)?, device)?;

        let mut dataset = ClassifiedDataset::new();
        dataset.append(LabeledPoint::new(0.9, 0.5, Class::Red));
        dataset.append(LabeledPoint::new(0.1, 0.5, Class::Blue));

        let mut session =
            LogisticSession::from_parts(CoordinateMapper::new(100., 100.), dataset, trainer, 0);

        let frame = session.tick(0)?;

        let colors: Vec<RGBColor> = frame.dots.iter().map(|d| d.color).collect();
        assert_eq!(colors, vec![full_palette::BLUE, full_palette::RED]);
        assert_eq!(frame.text.len(), 4);
        assert!(frame.text[1].starts_with("Weight 1: "));
        assert!(frame.loss.unwrap() >= 0.);
        assert!(frame.line.is_some());

        Ok(())
    }

    #[test]
    fn logistic_session_starts_with_seed_clusters() -> Result<()> {
        use rand::rngs::StdRng;
        use rand::SeedableRng;

        let mut rng = StdRng::seed_from_u64(2);
        let session = LogisticSession::new(
            &SessionConfig::default(),
            &ClassifierConfig::default(),
            &mut rng,
        )?;

        assert_eq!(session.dataset().blue().len(), 10);
        assert_eq!(session.dataset().red().len(), 10);
        assert_eq!(session.trainer().learning_rate(), 1.);

        Ok(())
    }
}
