//! Simulated market data: the tracked-asset model, the tick-driven
//! simulation that evolves it, and the pure read-side transforms
//! (view pipeline, aggregates, display formatting) built on top of it.

pub mod aggregate;
pub mod catalog;
pub mod error;
pub mod format;
pub mod model;
pub mod simulation;
pub mod sparkline;
pub mod store;
pub mod trend_window;
pub mod view;
