use std::path::PathBuf;

use log::{debug, info, warn};
use rand::Rng;

use crate::config::SessionConfig;
use crate::error::{PlaygroundError, Result};
use crate::events::{load_script, random_presses, EventSchedule};
use crate::plots::render_svg;
use crate::session::Playground;

/// How often progress is logged at `info` level.
const PROGRESS_EVERY: u64 = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub frames: u64,
    pub points: usize,
    /// Captured points still waiting for their commit tick when the run ended.
    pub pending: usize,
    pub last_loss: Option<f32>,
    pub rendered: Vec<PathBuf>,
}

/// Scripted events (if any) plus the requested number of random presses.
pub fn build_schedule<R: Rng + ?Sized>(config: &SessionConfig, rng: &mut R) -> Result<EventSchedule> {
    let mut events = match &config.events {
        Some(path) => {
            let events = load_script(path)?;
            info!("loaded {} pointer events from {}", events.len(), path.display());
            events
        }
        None => Vec::new(),
    };

    let size = config.canvas_size as f32;
    events.extend(random_presses(
        rng,
        config.random_clicks,
        config.frames,
        size,
        size,
    ));

    Ok(EventSchedule::new(events))
}

/// Drives a playground for `config.frames` ticks.
///
/// Events of frame `n` are captured before tick `n`, so they see the parameters left by tick `n - 1`.
pub fn run<P: Playground>(
    playground: &mut P,
    schedule: &mut EventSchedule,
    config: &SessionConfig,
) -> Result<RunSummary> {
    info!(
        "running {} for {} frames on a {}x{} canvas",
        P::NAME,
        config.frames,
        playground.mapper().width(),
        playground.mapper().height()
    );

    if config.frames > 0 {
        std::fs::create_dir_all(&config.output_dir)?;
    }

    let mut last_loss = None;
    let mut rendered = Vec::new();

    for frame in 0..config.frames {
        for event in schedule.take_frame(frame) {
            debug!("frame {}: {:?} at ({}, {})", frame, event.kind, event.x, event.y);
            playground.capture(&event, frame)?;
        }

        let snapshot = playground.tick(frame)?;
        last_loss = snapshot.loss;

        if config.is_render_frame(frame) {
            let path = config
                .output_dir
                .join(format!("{}_{:05}.svg", P::NAME, snapshot.index));

            render_svg(&snapshot, &path).map_err(|e| PlaygroundError::Render(e.to_string()))?;
            debug!("rendered {}", path.display());

            rendered.push(path);
        }

        if frame % PROGRESS_EVERY == 0 {
            info!(
                "frame {}: {} points, loss {:?}",
                frame,
                playground.point_count(),
                snapshot.loss
            );
        }
    }

    if schedule.remaining() > 0 {
        warn!(
            "{} events were scheduled after the last frame and never delivered",
            schedule.remaining()
        );
    }

    if playground.pending_count() > 0 {
        warn!(
            "{} captured points were still waiting for their commit tick and never joined the dataset",
            playground.pending_count()
        );
    }

    let summary = RunSummary {
        frames: config.frames,
        points: playground.point_count(),
        pending: playground.pending_count(),
        last_loss,
        rendered,
    };

    info!(
        "{} finished: {} points, last loss {:?}, {} frames rendered",
        P::NAME,
        summary.points,
        summary.last_loss,
        summary.rendered.len()
    );

    Ok(summary)
}
