//! Tick-by-tick pipeline composition.
//!
//! ```text
//! input -+- DarkChannelExtractor -+- AirlightEstimator ------ A --+
//!        |                        +- TransmittanceEstimator -- t --+
//!        +------ pixel bypass delay line ----------------- pixel --+- Restorer -> output
//! ```
//!
//! Each stage carries its framing through a delay line matched to its data
//! latency; the undelayed input pixels take a bypass delay line sized so
//! that pixel and transmittance meet tap-aligned at the restorer. The
//! aggregate latency is the constant [`Dehazer::LATENCY`], and the tick
//! emerging from [`Dehazer::tick`] always describes the input from exactly
//! that many ticks ago.

use dehaze_core::{DehazeConfig, DelayLine, FrameTiming, Rgb8, Result, Tick};

use crate::airlight::AirlightEstimator;
use crate::dark_channel::DarkChannelExtractor;
use crate::restore::Restorer;
use crate::transmittance::TransmittanceEstimator;

/// The complete streaming dehazer.
///
/// Strictly one pixel per tick: no buffering beyond the fixed delay lines,
/// no backpressure, no out-of-order completion. All state is cleared
/// deterministically by [`reset`](Dehazer::reset).
///
/// # Example
///
/// ```
/// use dehaze_core::{DehazeConfig, Tick, Rgb8};
/// use dehaze_stream::Dehazer;
///
/// let mut dehazer = Dehazer::new(DehazeConfig::default());
/// let out = dehazer.tick(Tick::active(Rgb8::new(120, 130, 140)));
/// // Nothing meaningful emerges until the pipeline has filled.
/// assert!(!out.is_active());
/// ```
#[derive(Debug, Clone)]
pub struct Dehazer {
    config: DehazeConfig,
    dark: DarkChannelExtractor,
    airlight: AirlightEstimator,
    transmittance: TransmittanceEstimator,
    restorer: Restorer,
    pixel_bypass: DelayLine<Tick<Rgb8>>,
}

impl Dehazer {
    /// Delay of the pixel bypass line: the original pixel must arrive at
    /// the restorer together with its transmittance.
    const BYPASS_LATENCY: usize =
        DarkChannelExtractor::LATENCY + TransmittanceEstimator::LATENCY;

    /// Aggregate pipeline latency in ticks, constant and known up front.
    pub const LATENCY: usize = DarkChannelExtractor::LATENCY
        + TransmittanceEstimator::LATENCY
        + Restorer::LATENCY;

    /// Builds a pipeline from a validated configuration.
    pub fn new(config: DehazeConfig) -> Self {
        Self {
            config,
            dark: DarkChannelExtractor::new(),
            airlight: AirlightEstimator::new(config.airlight_reset),
            transmittance: TransmittanceEstimator::new(config.t0),
            restorer: Restorer::new(config.overflow),
            pixel_bypass: DelayLine::new(Self::BYPASS_LATENCY),
        }
    }

    /// The configuration this pipeline was built with.
    #[inline]
    pub fn config(&self) -> &DehazeConfig {
        &self.config
    }

    /// The current atmospheric-light estimate.
    #[inline]
    pub fn airlight(&self) -> u8 {
        self.airlight.airlight()
    }

    /// Advances the pipeline by one tick.
    ///
    /// The returned tick corresponds to the input presented
    /// [`Self::LATENCY`] ticks earlier; its framing envelope is the delayed
    /// copy of that input's framing.
    pub fn tick(&mut self, input: Tick<Rgb8>) -> Tick<Rgb8> {
        let dark = self.dark.tick(input);
        let airlight = self.airlight.tick(dark);
        let trans = self.transmittance.tick(dark, airlight);
        let pixel = self.pixel_bypass.push(input);
        debug_assert_eq!(pixel.framing, trans.framing, "bypass/transmittance skew");
        self.restorer.tick(pixel, trans.payload, airlight)
    }

    /// Deterministically clears all pipeline state.
    ///
    /// Every delay line, the atmospheric-light accumulator, and the frame
    /// boundary detector return to their zero state; the next
    /// [`Self::LATENCY`] outputs are idle blanking ticks, never stale
    /// pre-reset data.
    pub fn reset(&mut self) {
        self.dark.reset();
        self.airlight.reset();
        self.transmittance.reset();
        self.restorer.reset();
        self.pixel_bypass.clear();
        tracing::debug!("pipeline reset");
    }

    /// Streams one whole frame through the pipeline and collects the
    /// restored active pixels in raster order.
    ///
    /// The frame is synthesized into ticks per `timing`, followed by
    /// [`Self::LATENCY`] idle ticks to drain the pipe. State (most notably
    /// a persistent atmospheric-light accumulator) carries over between
    /// calls, as it would between frames of a live stream.
    ///
    /// # Errors
    ///
    /// Returns an error if `pixels` does not match `timing`.
    pub fn process_frame(&mut self, pixels: &[Rgb8], timing: FrameTiming) -> Result<Vec<Rgb8>> {
        let mut out = Vec::with_capacity(timing.active_pixels());
        for tick in timing.stream(pixels)? {
            let restored = self.tick(tick);
            if restored.is_active() {
                out.push(restored.payload);
            }
        }
        for _ in 0..Self::LATENCY {
            let restored = self.tick(Tick::blank());
            if restored.is_active() {
                out.push(restored.payload);
            }
        }
        tracing::debug!(
            airlight = self.airlight(),
            pixels = out.len(),
            "frame processed"
        );
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dehaze_core::Framing;

    #[test]
    fn test_latency_constant() {
        assert_eq!(Dehazer::LATENCY, 5);
        assert_eq!(Dehazer::BYPASS_LATENCY, 3);
    }

    #[test]
    fn test_output_framing_is_delayed_input_framing() {
        let mut dehazer = Dehazer::new(DehazeConfig::default());
        // A recognizable framing pattern: alternate de, pulse hsync.
        let pattern: Vec<Framing> = (0..32)
            .map(|i| Framing {
                hsync: i % 7 == 0,
                vsync: false,
                de: i % 3 != 0,
            })
            .collect();
        let mut outputs = Vec::new();
        for f in &pattern {
            outputs.push(dehazer.tick(Tick::new(Rgb8::splat(50), *f)).framing);
        }
        assert_eq!(&outputs[Dehazer::LATENCY..], &pattern[..32 - Dehazer::LATENCY]);
    }

    #[test]
    fn test_process_frame_returns_active_count() {
        let timing = FrameTiming::with_blanking(8, 4, 4, 2).unwrap();
        let frame = vec![Rgb8::splat(100); timing.active_pixels()];
        let mut dehazer = Dehazer::new(DehazeConfig::default());
        let out = dehazer.process_frame(&frame, timing).unwrap();
        assert_eq!(out.len(), timing.active_pixels());
    }

    #[test]
    fn test_buffer_mismatch_rejected() {
        let timing = FrameTiming::new(8, 4).unwrap();
        let mut dehazer = Dehazer::new(DehazeConfig::default());
        assert!(dehazer.process_frame(&[Rgb8::BLACK; 3], timing).is_err());
    }
}
