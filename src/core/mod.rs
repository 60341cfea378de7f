//! Core building blocks: the frame model, conversion parameters, progress
//! observers and the background matte. These are internal primitives consumed
//! by the high-level `api` module.
pub mod frame;
pub mod params;
pub mod processing;
pub mod progress;
