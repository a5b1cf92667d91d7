//! Error types for dehaze-core operations.
//!
//! The pipeline itself is a fixed-function, always-live stream transform and
//! has no steady-state error surface. Errors exist only at the edges:
//! configuration validation and frame-buffer/timing mismatches.

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring or feeding the dehazing pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// A configuration value is invalid.
    ///
    /// The canonical case is `t0 == 0`, which would permit a division by
    /// zero in the restorer. Configuration is rejected up front rather than
    /// producing undefined output.
    #[error("invalid configuration: {parameter} = {value} ({reason})")]
    InvalidConfig {
        /// Name of the offending parameter
        parameter: &'static str,
        /// Value that was rejected
        value: u32,
        /// Reason why the value is invalid
        reason: &'static str,
    },

    /// Frame timing parameters are invalid.
    ///
    /// Returned when the active region of a [`crate::framing::FrameTiming`]
    /// is empty.
    #[error("invalid frame timing: {width}x{height} active region ({reason})")]
    InvalidTiming {
        /// Active width
        width: u32,
        /// Active height
        height: u32,
        /// Reason why the timing is invalid
        reason: &'static str,
    },

    /// A pixel buffer does not match the frame timing it was paired with.
    #[error("frame buffer holds {got} pixels, timing expects {expected}")]
    BufferSize {
        /// Pixel count required by the timing
        expected: usize,
        /// Pixel count actually supplied
        got: usize,
    },
}

impl Error {
    /// Creates an [`Error::InvalidConfig`] error.
    #[inline]
    pub fn invalid_config(parameter: &'static str, value: u32, reason: &'static str) -> Self {
        Self::InvalidConfig {
            parameter,
            value,
            reason,
        }
    }

    /// Creates an [`Error::InvalidTiming`] error.
    #[inline]
    pub fn invalid_timing(width: u32, height: u32, reason: &'static str) -> Self {
        Self::InvalidTiming {
            width,
            height,
            reason,
        }
    }

    /// Creates an [`Error::BufferSize`] error.
    #[inline]
    pub fn buffer_size(expected: usize, got: usize) -> Self {
        Self::BufferSize { expected, got }
    }

    /// Returns `true` if this is a configuration error.
    #[inline]
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::InvalidConfig { .. })
    }
}
