//! Transport side of the odds board: engine configuration, the HTTP engine,
//! and the adapter that turns engine outcomes into display results.

mod adapter;
mod config;
mod dispatcher;
mod engine;
mod error;
pub mod logging;

pub use adapter::*;
pub use config::*;
pub use dispatcher::*;
pub use engine::*;
pub use error::*;
