//! # dehaze-stream
//!
//! Real-time, single-pass video dehazing based on the dark-channel prior.
//!
//! The pipeline consumes one framed pixel per tick and produces a
//! haze-corrected pixel stream with identical framing at a fixed latency of
//! [`Dehazer::LATENCY`] ticks, using integer arithmetic, table lookups, and
//! shifts only.
//!
//! # Modules
//!
//! - [`dark_channel`] - per-pixel channel minimum
//! - [`airlight`] - running-maximum atmospheric-light estimation
//! - [`transmittance`] - division-free adaptive gain table and floor
//! - [`restore`] - fixed-point scattering-model inversion
//! - [`pipeline`] - tick-by-tick composition with matched delay lines
//! - [`frame`] - offline two-pass dehazing of whole frames
//!
//! # Example
//!
//! ```
//! use dehaze_core::{DehazeConfig, FrameTiming, Rgb8};
//! use dehaze_stream::Dehazer;
//!
//! let timing = FrameTiming::new(8, 8)?;
//! let hazy = vec![Rgb8::splat(210); timing.active_pixels()];
//!
//! let mut dehazer = Dehazer::new(DehazeConfig::default());
//! let restored = dehazer.process_frame(&hazy, timing)?;
//! assert_eq!(restored.len(), hazy.len());
//! # Ok::<(), dehaze_core::Error>(())
//! ```
//!
//! # Feature Flags
//!
//! - `parallel` - rayon fan-out for the offline frame path (enabled by default)
//! - `serde` - serialization for configuration types

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod airlight;
pub mod dark_channel;
pub mod frame;
pub mod pipeline;
pub mod restore;
pub mod transmittance;

pub use airlight::AirlightEstimator;
pub use dark_channel::DarkChannelExtractor;
pub use frame::{dehaze_frame, dehaze_frame_in_place, estimate_airlight};
pub use pipeline::Dehazer;
pub use restore::Restorer;
pub use transmittance::TransmittanceEstimator;
