//! Output writers: animated GIF and WebP encoders, and the plain-text / JSON
//! reports produced by reason extraction.
pub mod gif;
pub mod reasons;
pub mod webp;
