//! Stream framing: sync envelope, tick samples, and frame timing.
//!
//! Every tick of the video stream carries a [`Framing`] envelope alongside
//! its payload. The `de` (data-enable) flag separates active-video ticks,
//! where the payload is meaningful, from blanking ticks, where it is not and
//! must never influence estimator state. Sync flags mark line and frame
//! boundaries for downstream consumers.
//!
//! [`FrameTiming`] + [`FrameStream`] adapt a plain pixel buffer into a
//! correctly framed tick stream. This is the boundary to the upstream
//! producer: capture hardware is expected to deliver exactly this shape, and
//! tests/CLI use the synthesizer in its place.

use crate::error::{Error, Result};
use crate::pixel::Rgb8;

/// Per-tick sync envelope.
///
/// Threaded alongside the data at every pipeline stage and delayed by
/// exactly the same number of ticks as the payload, so that framing and
/// data emerge re-aligned at the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Framing {
    /// Horizontal (line) sync
    pub hsync: bool,
    /// Vertical (frame) sync
    pub vsync: bool,
    /// Data enable: `true` on active-video ticks
    pub de: bool,
}

impl Framing {
    /// Envelope of an active-video tick.
    pub const ACTIVE: Self = Self {
        hsync: false,
        vsync: false,
        de: true,
    };

    /// Envelope of an idle blanking tick (no sync asserted).
    pub const BLANK: Self = Self {
        hsync: false,
        vsync: false,
        de: false,
    };

    /// Returns `true` if this tick carries meaningful pixel data.
    #[inline]
    pub const fn active(self) -> bool {
        self.de
    }
}

/// One sample of the stream: a payload plus its framing envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Tick<T> {
    /// Payload value (pixel, dark value, transmittance, ...)
    pub payload: T,
    /// Sync envelope for this tick
    pub framing: Framing,
}

impl<T> Tick<T> {
    /// Creates a tick from a payload and its framing.
    #[inline]
    pub const fn new(payload: T, framing: Framing) -> Self {
        Self { payload, framing }
    }

    /// Creates an active-video tick.
    #[inline]
    pub const fn active(payload: T) -> Self {
        Self::new(payload, Framing::ACTIVE)
    }

    /// Returns `true` if this tick carries meaningful data.
    #[inline]
    pub const fn is_active(&self) -> bool {
        self.framing.de
    }

    /// Replaces the payload, keeping the framing.
    #[inline]
    pub fn with_payload<U>(&self, payload: U) -> Tick<U> {
        Tick::new(payload, self.framing)
    }
}

impl<T: Default> Tick<T> {
    /// Creates an idle blanking tick with a default payload.
    #[inline]
    pub fn blank() -> Self {
        Self::new(T::default(), Framing::BLANK)
    }
}

/// Frame geometry: active region plus blanking intervals.
///
/// A full frame is `(width + h_blank) * (height + v_blank)` ticks. During
/// horizontal blanking `hsync` is asserted; during vertical blanking
/// `vsync` is asserted. `de` is asserted only inside the active region.
///
/// # Example
///
/// ```
/// use dehaze_core::FrameTiming;
///
/// let timing = FrameTiming::new(640, 480)?;
/// assert_eq!(timing.active_pixels(), 640 * 480);
/// # Ok::<(), dehaze_core::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameTiming {
    /// Active pixels per line
    pub width: u32,
    /// Active lines per frame
    pub height: u32,
    /// Blanking ticks appended to each line
    pub h_blank: u32,
    /// Blanking lines appended to each frame
    pub v_blank: u32,
}

impl FrameTiming {
    /// Default horizontal blanking interval, in ticks.
    pub const DEFAULT_H_BLANK: u32 = 16;

    /// Default vertical blanking interval, in lines.
    pub const DEFAULT_V_BLANK: u32 = 2;

    /// Creates a timing with the default blanking intervals.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTiming`] if the active region is empty.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Self::with_blanking(width, height, Self::DEFAULT_H_BLANK, Self::DEFAULT_V_BLANK)
    }

    /// Creates a timing with explicit blanking intervals.
    ///
    /// Note that with `v_blank == 0` the stream never asserts `vsync`, so a
    /// per-frame atmospheric-light reset policy has no boundary to act on.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTiming`] if the active region is empty.
    pub fn with_blanking(width: u32, height: u32, h_blank: u32, v_blank: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::invalid_timing(
                width,
                height,
                "active region must be non-empty",
            ));
        }
        Ok(Self {
            width,
            height,
            h_blank,
            v_blank,
        })
    }

    /// Number of active pixels per frame.
    #[inline]
    pub const fn active_pixels(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Total ticks per frame, blanking included.
    #[inline]
    pub const fn ticks_per_frame(&self) -> usize {
        (self.width + self.h_blank) as usize * (self.height + self.v_blank) as usize
    }

    /// Framing envelope for the tick at `(col, line)` of the padded frame.
    #[inline]
    pub fn framing_at(&self, col: u32, line: u32) -> Framing {
        Framing {
            hsync: col >= self.width,
            vsync: line >= self.height,
            de: col < self.width && line < self.height,
        }
    }

    /// Wraps a pixel buffer into a framed tick stream over one frame.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferSize`] if `pixels` does not hold exactly
    /// `active_pixels()` entries.
    pub fn stream<'a>(&self, pixels: &'a [Rgb8]) -> Result<FrameStream<'a>> {
        if pixels.len() != self.active_pixels() {
            return Err(Error::buffer_size(self.active_pixels(), pixels.len()));
        }
        Ok(FrameStream {
            timing: *self,
            pixels,
            pos: 0,
        })
    }
}

/// Iterator yielding one framed [`Tick`] per clock of a single frame.
///
/// Active ticks carry the buffer pixels in raster order; blanking ticks
/// carry a black payload with `de` deasserted.
#[derive(Debug, Clone)]
pub struct FrameStream<'a> {
    timing: FrameTiming,
    pixels: &'a [Rgb8],
    pos: usize,
}

impl Iterator for FrameStream<'_> {
    type Item = Tick<Rgb8>;

    fn next(&mut self) -> Option<Tick<Rgb8>> {
        let t = &self.timing;
        if self.pos >= t.ticks_per_frame() {
            return None;
        }
        let line_len = (t.width + t.h_blank) as usize;
        let line = (self.pos / line_len) as u32;
        let col = (self.pos % line_len) as u32;
        self.pos += 1;

        let framing = t.framing_at(col, line);
        let payload = if framing.de {
            self.pixels[(line * t.width + col) as usize]
        } else {
            Rgb8::BLACK
        };
        Some(Tick::new(payload, framing))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let rest = self.timing.ticks_per_frame() - self.pos;
        (rest, Some(rest))
    }
}

impl ExactSizeIterator for FrameStream<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_counts() {
        let timing = FrameTiming::with_blanking(4, 3, 2, 1).unwrap();
        let pixels = vec![Rgb8::splat(9); 12];
        let ticks: Vec<_> = timing.stream(&pixels).unwrap().collect();

        assert_eq!(ticks.len(), (4 + 2) * (3 + 1));
        assert_eq!(ticks.iter().filter(|t| t.is_active()).count(), 12);
    }

    #[test]
    fn test_active_payloads_in_raster_order() {
        let timing = FrameTiming::with_blanking(2, 2, 1, 1).unwrap();
        let pixels: Vec<Rgb8> = (0..4).map(|i| Rgb8::splat(i as u8 + 1)).collect();
        let active: Vec<u8> = timing
            .stream(&pixels)
            .unwrap()
            .filter(|t| t.is_active())
            .map(|t| t.payload.r)
            .collect();
        assert_eq!(active, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_sync_flags() {
        let timing = FrameTiming::with_blanking(2, 2, 1, 1).unwrap();
        // Last column of each line is horizontal blanking.
        assert!(timing.framing_at(2, 0).hsync);
        assert!(!timing.framing_at(2, 0).de);
        // Last line of the frame is vertical blanking.
        assert!(timing.framing_at(0, 2).vsync);
        assert!(!timing.framing_at(0, 2).de);
        // Active corner.
        assert_eq!(timing.framing_at(1, 1), Framing::ACTIVE);
    }

    #[test]
    fn test_empty_region_rejected() {
        assert!(FrameTiming::new(0, 480).is_err());
        assert!(FrameTiming::new(640, 0).is_err());
    }

    #[test]
    fn test_buffer_size_checked() {
        let timing = FrameTiming::new(4, 4).unwrap();
        let short = vec![Rgb8::BLACK; 3];
        assert!(timing.stream(&short).is_err());
    }
}
