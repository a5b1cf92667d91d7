//! Dark-channel extraction stage.
//!
//! The dark channel of a pixel is the minimum of its three color channels.
//! In haze-free outdoor regions it is empirically near zero, so its
//! magnitude serves as the haze density proxy driving the rest of the
//! pipeline.

use dehaze_core::{DelayLine, Rgb8, Tick};

/// Computes the dark channel of a single pixel.
///
/// Two-step reduction: `min(r, g)`, then `min` with `b`. Ties are
/// irrelevant since `min` is commutative.
#[inline]
pub fn dark_channel(px: Rgb8) -> u8 {
    px.min_channel()
}

/// Registered dark-channel stage.
///
/// On active ticks the output payload is `min(R, G, B)` of the input pixel;
/// on blanking ticks it is 0 and must not be treated as data downstream
/// (consumers gate on `de` rather than trusting the value). Output is
/// delayed by [`DarkChannelExtractor::LATENCY`] ticks, framing included.
#[derive(Debug, Clone)]
pub struct DarkChannelExtractor {
    line: DelayLine<Tick<u8>>,
}

impl DarkChannelExtractor {
    /// Output latency of this stage, in ticks.
    pub const LATENCY: usize = 1;

    /// Creates the stage with cleared registers.
    pub fn new() -> Self {
        Self {
            line: DelayLine::new(Self::LATENCY),
        }
    }

    /// Processes one tick.
    pub fn tick(&mut self, input: Tick<Rgb8>) -> Tick<u8> {
        let dark = if input.framing.de {
            dark_channel(input.payload)
        } else {
            0
        };
        self.line.push(input.with_payload(dark))
    }

    /// Clears the stage registers.
    pub fn reset(&mut self) {
        self.line.clear();
    }
}

impl Default for DarkChannelExtractor {
    fn default() -> Self {
        Self::new()
    }
}
