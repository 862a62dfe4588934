use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::SeedableRng;

pub const DEFAULT_FRAMES: u64 = 600;
pub const DEFAULT_CANVAS_SIZE: u32 = 2400;
pub const DEFAULT_OUTPUT_DIR: &str = "plots";
pub const DEFAULT_INITIAL_PER_CLASS: usize = 10;
pub const DEFAULT_COMMIT_LATENCY: u64 = 1;

/// Settings shared by both demos.
#[derive(clap::Args, Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Number of frames to run before exiting
    #[arg(long, default_value_t = DEFAULT_FRAMES)]
    pub frames: u64,

    /// Width and height of the square canvas in pixels
    #[arg(long, default_value_t = DEFAULT_CANVAS_SIZE, value_parser = clap::value_parser!(u32).range(1..))]
    pub canvas_size: u32,

    /// Seed for parameter initialization and generated input
    #[arg(long)]
    pub seed: Option<u64>,

    /// Overrides the variant's learning rate
    #[arg(long)]
    pub learning_rate: Option<f64>,

    /// CSV script of pointer events (frame,kind,x,y)
    #[arg(long)]
    pub events: Option<PathBuf>,

    /// Random presses spread over the run, on top of the script
    #[arg(long, default_value_t = 0)]
    pub random_clicks: usize,

    /// Render every n-th frame, 0 renders only the last one
    #[arg(long, default_value_t = 0)]
    pub render_every: u64,

    /// Directory the rendered SVG frames are written to
    #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            frames: DEFAULT_FRAMES,
            canvas_size: DEFAULT_CANVAS_SIZE,
            seed: None,
            learning_rate: None,
            events: None,
            random_clicks: 0,
            render_every: 0,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

impl SessionConfig {
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    pub fn is_render_frame(&self, frame: u64) -> bool {
        frame + 1 == self.frames || (self.render_every > 0 && frame % self.render_every == 0)
    }
}

/// Settings of the classification demo only.
#[derive(clap::Args, Debug, Clone, PartialEq)]
pub struct ClassifierConfig {
    /// Seed points generated per class at startup
    #[arg(long, default_value_t = DEFAULT_INITIAL_PER_CLASS)]
    pub initial_per_class: usize,

    /// Ticks between classifying a captured point and adding it to the dataset
    #[arg(long, default_value_t = DEFAULT_COMMIT_LATENCY)]
    pub commit_latency: u64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        ClassifierConfig {
            initial_per_class: DEFAULT_INITIAL_PER_CLASS,
            commit_latency: DEFAULT_COMMIT_LATENCY,
        }
    }
}
