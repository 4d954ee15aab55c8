pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod metrics;

// Domain data shapes shared across layers
pub mod domain;

// Flattening and per-game orchestration
pub mod pipeline;

// Ports (app) and their filesystem / broker adapters (infra)
pub mod app;
pub mod infra;

pub use error::{FlattenError, Result};
