pub mod config;
pub mod dataset;
pub mod error;
pub mod events;
pub mod feedback;
pub mod host;
pub mod linear;
pub mod logistic;
pub mod mapper;
pub mod model;
pub mod plots;
pub mod sampling;
pub mod session;
pub mod trainer;
