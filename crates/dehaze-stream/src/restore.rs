//! Haze-free pixel restoration.
//!
//! The atmospheric scattering model gives the ideal restored value
//! `J = (I - A) / t + A`. Rearranged for a divider-free fixed-point
//! datapath:
//!
//! ```text
//! recip  = floor(4080 / t)            4080 = 255 * 16
//! haze   = A * (255 - t)
//! scaled = I * 255
//! result = (scaled - haze) * recip    ~Q8.12
//! output = result[19:12]
//! ```
//!
//! `result` approximates `4080 * J`; taking bits [19:12] divides by 4096
//! instead of 4080, a power-of-two approximation that trades ~0.4%
//! systematic error for a plain bit shift. When `scaled <= haze` the
//! subtraction would go negative, so the original channel value is passed
//! through instead, shifted into the same fixed-point field. The clamp is
//! applied independently per channel.
//!
//! # Reference
//!
//! He, Sun, Tang, "Single Image Haze Removal Using Dark Channel Prior".

use dehaze_core::{DelayLine, OverflowMode, Rgb8, Tick};

/// Fixed-point scale numerator: `255 * 16`.
pub const RESTORE_SCALE: u32 = 4080;

/// Fractional bits of the Q8.12 result field.
pub const FIXED_POINT_BITS: u32 = 12;

/// Restores a single channel value.
///
/// `t` must be at least 1; the pipeline guarantees this through the
/// validated `t0` floor. Out-of-range results wrap or saturate per `mode`.
///
/// # Panics
///
/// Panics in debug builds if `t == 0` (division by zero otherwise).
#[inline]
pub fn restore_channel(value: u8, t: u8, airlight: u8, mode: OverflowMode) -> u8 {
    debug_assert!(t >= 1, "transmittance must be floored at t0 >= 1");
    let t = t as u32;
    let recip = RESTORE_SCALE / t;
    let haze = airlight as u32 * (255 - t);
    let scaled = value as u32 * 255;

    let result = if scaled <= haze {
        // Underflow clamp: emit the original value in the same Q8.12 field
        // rather than a wrapped negative intermediate.
        (value as u32) << FIXED_POINT_BITS
    } else {
        (scaled - haze) * recip
    };

    let integer = result >> FIXED_POINT_BITS;
    match mode {
        OverflowMode::Wrap => (integer & 0xFF) as u8,
        OverflowMode::Saturate => integer.min(255) as u8,
    }
}

/// Restores all three channels of a pixel independently.
#[inline]
pub fn restore_pixel(px: Rgb8, t: u8, airlight: u8, mode: OverflowMode) -> Rgb8 {
    Rgb8::new(
        restore_channel(px.r, t, airlight, mode),
        restore_channel(px.g, t, airlight, mode),
        restore_channel(px.b, t, airlight, mode),
    )
}

/// Registered restoration stage.
///
/// Consumes the delayed original pixel stream, the aligned transmittance
/// stream, and the published atmospheric light; produces the restored pixel
/// stream delayed by [`Restorer::LATENCY`] further ticks. Blanking ticks
/// yield black payloads and never touch the divider.
#[derive(Debug, Clone)]
pub struct Restorer {
    mode: OverflowMode,
    line: DelayLine<Tick<Rgb8>>,
}

impl Restorer {
    /// Output latency of this stage, in ticks (reciprocal, then multiply).
    pub const LATENCY: usize = 2;

    /// Creates the stage with the given overflow behavior.
    pub fn new(mode: OverflowMode) -> Self {
        Self {
            mode,
            line: DelayLine::new(Self::LATENCY),
        }
    }

    /// Processes one tick.
    ///
    /// `pixel` and `t` must be tap-aligned: both delayed by the same number
    /// of ticks relative to the source. The pipeline owns that alignment.
    pub fn tick(&mut self, pixel: Tick<Rgb8>, t: u8, airlight: u8) -> Tick<Rgb8> {
        let restored = if pixel.framing.de {
            restore_pixel(pixel.payload, t, airlight, self.mode)
        } else {
            Rgb8::BLACK
        };
        self.line.push(pixel.with_payload(restored))
    }

    /// Clears the stage registers.
    pub fn reset(&mut self) {
        self.line.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_underflow_clamp_passes_original() {
        // haze = 200 * 225 = 45000, scaled = 2550: clamp path.
        assert_eq!(restore_channel(10, 30, 200, OverflowMode::Wrap), 10);
        assert_eq!(restore_channel(10, 30, 200, OverflowMode::Saturate), 10);
    }

    #[test]
    fn test_normal_path_bit_truncation() {
        // (51000 - 27900) * (4080 / 100 = 40) = 924000; bits [19:12] = 225.
        assert_eq!(restore_channel(200, 100, 180, OverflowMode::Wrap), 225);
    }

    #[test]
    fn test_full_transmittance_is_near_identity() {
        // t = 255: recip = 16, haze = 0, result = I * 4080, shift divides
        // by 4096, so the output is I or I - 1.
        for i in 0..=255u16 {
            let i = i as u8;
            let out = restore_channel(i, 255, 77, OverflowMode::Wrap);
            let diff = i as i16 - out as i16;
            assert!((0..=1).contains(&diff), "I = {i} -> {out}");
        }
    }

    #[test]
    fn test_wrap_vs_saturate_differ_past_full_scale() {
        // I = 255, A = 0, t = 26: result >> 12 = 2476, past full scale.
        // 65025 * floor(4080 / 26 = 156) = 10143900.
        assert_eq!(restore_channel(255, 26, 0, OverflowMode::Wrap), 172);
        assert_eq!(restore_channel(255, 26, 0, OverflowMode::Saturate), 255);
    }

    #[test]
    fn test_channels_are_independent() {
        let px = Rgb8::new(10, 200, 255);
        let out = restore_pixel(px, 30, 200, OverflowMode::Saturate);
        assert_eq!(out.r, restore_channel(10, 30, 200, OverflowMode::Saturate));
        assert_eq!(out.g, restore_channel(200, 30, 200, OverflowMode::Saturate));
        assert_eq!(out.b, restore_channel(255, 30, 200, OverflowMode::Saturate));
    }

    #[test]
    fn test_zero_stays_zero() {
        for t in 1..=255u16 {
            assert_eq!(restore_channel(0, t as u8, 255, OverflowMode::Wrap), 0);
        }
    }

    #[test]
    fn test_stage_gates_on_data_enable() {
        let mut stage = Restorer::new(OverflowMode::Wrap);
        // Blanking tick with t = 0 must not reach the divider.
        stage.tick(Tick::blank(), 0, 200);
        stage.tick(Tick::blank(), 0, 200);
        let out = stage.tick(Tick::blank(), 0, 200);
        assert_eq!(out.payload, Rgb8::BLACK);
        assert!(!out.is_active());
    }
}
