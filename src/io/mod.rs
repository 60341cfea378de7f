//! I/O layer: decoding animated (and still) images into frame sequences, and
//! `writers` for GIF/WebP outputs and reason reports. `webp_anim` owns the
//! libwebp animation encoder and decoder handles.
pub mod reader;
pub use reader::{frame_duration_ms, load_animation};

pub mod webp_anim;
pub mod writers;
