//! Offline whole-frame dehazing.
//!
//! Two-pass variant of the streaming pipeline for still images and batch
//! use: pass one scans the frame for the atmospheric light (the dark-channel
//! maximum, exactly what the streaming estimator converges to), pass two
//! maps every pixel through the same gain-table and restoration kernels the
//! streaming stages use. Because the kernels are shared, a frame processed
//! here matches the streaming output wherever the streaming estimate has
//! settled; the integration tests lean on that as a cross-check.
//!
//! With the `parallel` feature (default) both passes fan out over rayon.

use dehaze_core::{DehazeConfig, Rgb8};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::dark_channel::dark_channel;
use crate::restore::restore_pixel;
use crate::transmittance::transmittance;

/// Estimates the atmospheric light of a frame.
///
/// Returns the maximum dark-channel value over all pixels; 0 for an empty
/// buffer.
pub fn estimate_airlight(pixels: &[Rgb8]) -> u8 {
    #[cfg(feature = "parallel")]
    {
        pixels
            .par_iter()
            .map(|&px| dark_channel(px))
            .reduce(|| 0, u8::max)
    }
    #[cfg(not(feature = "parallel"))]
    {
        pixels.iter().map(|&px| dark_channel(px)).fold(0, u8::max)
    }
}

/// Dehazes one pixel against a fixed atmospheric light.
#[inline]
pub fn dehaze_pixel(px: Rgb8, airlight: u8, config: &DehazeConfig) -> Rgb8 {
    let t = transmittance(airlight, dark_channel(px), config.t0);
    restore_pixel(px, t, airlight, config.overflow)
}

/// Dehazes a whole frame in place.
///
/// The atmospheric light is estimated once over the full frame, then every
/// pixel is restored against it.
pub fn dehaze_frame_in_place(pixels: &mut [Rgb8], config: &DehazeConfig) {
    let airlight = estimate_airlight(pixels);
    tracing::debug!(airlight, pixels = pixels.len(), "offline dehaze");

    #[cfg(feature = "parallel")]
    pixels
        .par_iter_mut()
        .for_each(|px| *px = dehaze_pixel(*px, airlight, config));

    #[cfg(not(feature = "parallel"))]
    for px in pixels.iter_mut() {
        *px = dehaze_pixel(*px, airlight, config);
    }
}

/// Dehazes a whole frame into a new buffer.
pub fn dehaze_frame(pixels: &[Rgb8], config: &DehazeConfig) -> Vec<Rgb8> {
    let mut out = pixels.to_vec();
    dehaze_frame_in_place(&mut out, config);
    out
}
