pub mod matte;
pub mod pipeline;
