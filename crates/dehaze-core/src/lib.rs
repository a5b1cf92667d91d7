//! # dehaze-core
//!
//! Core types for streaming video dehazing.
//!
//! This crate provides the foundational types used throughout the DEHAZE-RS
//! workspace:
//!
//! - [`Rgb8`] - 8-bit RGB pixel
//! - [`Framing`], [`Tick`] - per-tick sync envelope and stream sample
//! - [`FrameTiming`], [`FrameStream`] - frame geometry and tick synthesis
//! - [`DelayLine`] - fixed-latency shift register for stage alignment
//! - [`DehazeConfig`] - validated pipeline configuration
//!
//! ## Design Philosophy
//!
//! The pipeline is strictly streaming: one pixel per tick, constant latency,
//! integer arithmetic only. The types here encode the two contracts every
//! stage must honor:
//!
//! 1. Framing travels with the data and is delayed by exactly the data
//!    latency ([`DelayLine`]), so output framing and output pixels always
//!    refer to the same input tick.
//! 2. Payloads on blanking ticks (`de == false`) are not meaningful and must
//!    never reach estimator state.
//!
//! ## Feature Flags
//!
//! - `serde` - Enable serialization for configuration and timing types

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod delay;
pub mod error;
pub mod framing;
pub mod pixel;

// Re-exports for convenience
pub use config::{AirlightReset, DehazeConfig, OverflowMode, DEFAULT_T0};
pub use delay::DelayLine;
pub use error::{Error, Result};
pub use framing::{FrameStream, FrameTiming, Framing, Tick};
pub use pixel::Rgb8;

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```
/// use dehaze_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{AirlightReset, DehazeConfig, OverflowMode, DEFAULT_T0};
    pub use crate::delay::DelayLine;
    pub use crate::error::{Error, Result};
    pub use crate::framing::{FrameStream, FrameTiming, Framing, Tick};
    pub use crate::pixel::Rgb8;
}
