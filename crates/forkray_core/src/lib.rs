//! forkray core - render configuration and the rendered image buffer.
//!
//! This crate provides:
//!
//! - **Configuration**: `RenderConfig`, its validation and JSON loading
//! - **Image buffer**: `Image`, a linear RGB buffer with gamma encoding,
//!   PNG output, a packed BGRX view for presentation and a checksum
//!
//! # Example
//!
//! ```ignore
//! use forkray_core::{Image, RenderConfig};
//!
//! let config = RenderConfig::from_json_file("render.json")?;
//! config.validate()?;
//! let image = Image::new(config.width, config.height)?;
//! image.save_png("out.png")?;
//! ```

pub mod buffer;
pub mod config;

pub use buffer::{encode_channel, Image, ImageError, ImageResult, DISPLAY_GAMMA};
pub use config::{ApertureShape, ConfigError, ConfigResult, RenderConfig};
