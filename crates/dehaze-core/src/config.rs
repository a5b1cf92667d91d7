//! Pipeline configuration.
//!
//! Configuration values are static or rarely changed; nothing here is
//! per-pixel. Construction validates everything up front, so a successfully
//! built [`DehazeConfig`] can never drive the restorer into a division by
//! zero.

use std::num::NonZeroU8;

use crate::error::{Error, Result};

/// Default minimum transmittance floor (~10% of full scale).
pub const DEFAULT_T0: u8 = 26;

/// Lifetime of the atmospheric-light running maximum.
///
/// The estimator's accumulator has no intrinsic anchor to "one frame" versus
/// "forever"; which lifetime is correct depends on whether haze density is
/// expected to vary over time. Both are supported as an explicit choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum AirlightReset {
    /// Clear the accumulator at each vertical-sync frame boundary.
    ///
    /// The estimate tracks scene changes frame to frame.
    #[default]
    PerFrame,
    /// Keep the accumulator across frames; only a pipeline reset clears it.
    ///
    /// The estimate converges to the brightest haze seen since reset.
    Persistent,
}

/// Behavior when the restorer's Q8.12 result exceeds the 8-bit output range.
///
/// Bits above position 19 of the fixed-point result carry the excess. The
/// reference arithmetic discards them, so out-of-range results wrap; the
/// alternative clamps to 255. The two modes are not equivalent, so the
/// choice is explicit here rather than an accident of the arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum OverflowMode {
    /// Keep bits [19:12] only; out-of-range results wrap (bit-exact).
    #[default]
    Wrap,
    /// Saturate out-of-range results to 255.
    Saturate,
}

/// Validated configuration for the dehazing pipeline.
///
/// # Example
///
/// ```
/// use dehaze_core::{AirlightReset, DehazeConfig};
///
/// let config = DehazeConfig::new(26)?.with_airlight_reset(AirlightReset::Persistent);
/// assert_eq!(config.t0.get(), 26);
///
/// // t0 == 0 would make 4080 / t undefined downstream; rejected up front.
/// assert!(DehazeConfig::new(0).is_err());
/// # Ok::<(), dehaze_core::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DehazeConfig {
    /// Minimum transmittance floor, `1..=255`.
    ///
    /// Stored non-zero by construction: the restorer computes `4080 / t`
    /// and `t` is floored at this value.
    pub t0: NonZeroU8,
    /// Atmospheric-light accumulator lifetime.
    pub airlight_reset: AirlightReset,
    /// Restorer overflow behavior.
    pub overflow: OverflowMode,
}

impl DehazeConfig {
    /// Creates a configuration with the given transmittance floor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] for `t0 == 0`.
    pub fn new(t0: u8) -> Result<Self> {
        let t0 = NonZeroU8::new(t0)
            .ok_or_else(|| Error::invalid_config("t0", 0, "must be at least 1"))?;
        Ok(Self {
            t0,
            airlight_reset: AirlightReset::default(),
            overflow: OverflowMode::default(),
        })
    }

    /// Sets the atmospheric-light reset policy.
    #[must_use]
    pub fn with_airlight_reset(mut self, policy: AirlightReset) -> Self {
        self.airlight_reset = policy;
        self
    }

    /// Sets the restorer overflow mode.
    #[must_use]
    pub fn with_overflow(mut self, mode: OverflowMode) -> Self {
        self.overflow = mode;
        self
    }
}

impl Default for DehazeConfig {
    fn default() -> Self {
        Self {
            t0: NonZeroU8::new(DEFAULT_T0).unwrap(),
            airlight_reset: AirlightReset::default(),
            overflow: OverflowMode::default(),
        }
    }
}
