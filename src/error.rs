use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlaygroundError {
    #[error("tensor error: {0}")]
    Candle(#[from] candle_core::Error),

    #[error("batch shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error("sampling error: {0}")]
    Distribution(#[from] rand_distr::NormalError),

    #[error("event script error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("render error: {0}")]
    Render(String),
}

pub type Result<T> = std::result::Result<T, PlaygroundError>;
