//! Adaptive transmittance estimation.
//!
//! Transmittance is the fraction of scene radiance that survives
//! atmospheric scattering. The continuous form of the dark-channel prior
//! estimate is `t = 1 - omega * dark / A`; this stage replaces the division
//! and the continuous gain with a bucketed table over the atmospheric light:
//!
//! ```text
//! t_img = 255 - K(A) * dark
//! t     = max(t_img, t0)
//! ```
//!
//! Each `K` is a dyadic rational applied as a sum of truncating right
//! shifts of `dark`, so the whole stage is adds and shifts only. Low `A`
//! means a haze-free scene: `K = 0` leaves the image untouched. Brighter
//! airlight selects a monotonically stronger gain, up to `K = 1` above 240.

use std::num::NonZeroU8;

use dehaze_core::{DelayLine, Tick};

/// Gain table: bucket upper bound (inclusive) paired with the right-shift
/// amounts whose sum realizes `K * d`.
///
/// Buckets are 10 wide between 160 and 240. The realized gains are
/// 0, 21/32, 11/16, 23/32, 3/4, 25/32, 13/16, 7/8, 15/16, 1 -
/// monotonically non-decreasing in `A`.
const GAIN_TABLE: [(u8, &[u8]); 9] = [
    (160, &[]),             // K = 0        haze-free, pass through
    (170, &[1, 3, 5]),      // K = 21/32    (0.65625)
    (180, &[1, 3, 4]),      // K = 11/16    (0.6875)
    (190, &[1, 3, 4, 5]),   // K = 23/32    (0.71875)
    (200, &[1, 2]),         // K = 3/4
    (210, &[1, 2, 5]),      // K = 25/32    (0.78125)
    (220, &[1, 2, 4]),      // K = 13/16    (0.8125)
    (230, &[1, 2, 3]),      // K = 7/8
    (240, &[1, 2, 3, 4]),   // K = 15/16
];

/// Shift decomposition above the last bucket boundary: `K = 1`.
const GAIN_MAX: &[u8] = &[0];

/// Returns the shift decomposition of `K(airlight)`.
#[inline]
fn gain_shifts(airlight: u8) -> &'static [u8] {
    for &(bound, shifts) in &GAIN_TABLE {
        if airlight <= bound {
            return shifts;
        }
    }
    GAIN_MAX
}

/// Computes `K(airlight) * dark` by summed truncating shifts.
///
/// Each term truncates individually, exactly as a shift-add datapath would;
/// the result is always `<= dark` since `K <= 1`.
#[inline]
pub fn gain_times_dark(airlight: u8, dark: u8) -> u8 {
    let mut acc: u16 = 0;
    for &s in gain_shifts(airlight) {
        acc += (dark >> s) as u16;
    }
    debug_assert!(acc <= dark as u16);
    acc as u8
}

/// Computes the floored per-pixel transmittance.
///
/// `t_img = 255 - K(airlight) * dark`, then the floor selects `t_img` only
/// when strictly greater than `t0`.
#[inline]
pub fn transmittance(airlight: u8, dark: u8, t0: NonZeroU8) -> u8 {
    let t_img = 255 - gain_times_dark(airlight, dark);
    if t_img > t0.get() {
        t_img
    } else {
        t0.get()
    }
}

/// Registered transmittance stage.
///
/// Consumes the dark-channel stream plus the published atmospheric light
/// and produces the transmittance stream, delayed by
/// [`TransmittanceEstimator::LATENCY`] ticks. Blanking ticks carry a zero
/// payload; consumers gate on `de`, and the pipeline never lets a blanking
/// transmittance reach the restorer's divider.
#[derive(Debug, Clone)]
pub struct TransmittanceEstimator {
    t0: NonZeroU8,
    line: DelayLine<Tick<u8>>,
}

impl TransmittanceEstimator {
    /// Output latency of this stage, in ticks (shift-add, then floor).
    pub const LATENCY: usize = 2;

    /// Creates the stage with the given transmittance floor.
    pub fn new(t0: NonZeroU8) -> Self {
        Self {
            t0,
            line: DelayLine::new(Self::LATENCY),
        }
    }

    /// Processes one dark-channel tick against the current `A`.
    pub fn tick(&mut self, dark: Tick<u8>, airlight: u8) -> Tick<u8> {
        let t = if dark.framing.de {
            transmittance(airlight, dark.payload, self.t0)
        } else {
            0
        };
        self.line.push(dark.with_payload(t))
    }

    /// Clears the stage registers.
    pub fn reset(&mut self) {
        self.line.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dehaze_core::DEFAULT_T0;

    fn t0() -> NonZeroU8 {
        NonZeroU8::new(DEFAULT_T0).unwrap()
    }

    #[test]
    fn test_gain_zero_at_or_below_160() {
        for a in 0..=160u8 {
            assert_eq!(gain_times_dark(a, 255), 0, "A = {a}");
        }
    }

    #[test]
    fn test_gain_monotone_in_airlight() {
        // With d = 255 every table entry is distinguishable.
        let mut prev = 0u8;
        for a in 0..=255u8 {
            let kd = gain_times_dark(a, 255);
            assert!(kd >= prev, "K regressed at A = {a}: {kd} < {prev}");
            prev = kd;
        }
        // Unity gain above the last boundary.
        assert_eq!(gain_times_dark(241, 255), 255);
        assert_eq!(gain_times_dark(255, 123), 123);
    }

    #[test]
    fn test_gain_shift_sums() {
        // 3/4 bucket: d/2 + d/4 with per-term truncation.
        assert_eq!(gain_times_dark(195, 100), 50 + 25);
        assert_eq!(gain_times_dark(195, 7), 3 + 1);
        // 15/16 bucket: d/2 + d/4 + d/8 + d/16.
        assert_eq!(gain_times_dark(240, 255), 127 + 63 + 31 + 15);
    }

    #[test]
    fn test_gain_never_exceeds_dark() {
        for a in (0..=255u16).step_by(5) {
            for d in (0..=255u16).step_by(3) {
                assert!(gain_times_dark(a as u8, d as u8) <= d as u8);
            }
        }
    }

    #[test]
    fn test_floor_always_holds() {
        for a in (0..=255u16).step_by(5) {
            for d in (0..=255u16).step_by(3) {
                let t = transmittance(a as u8, d as u8, t0());
                assert!(t >= DEFAULT_T0);
            }
        }
    }

    #[test]
    fn test_floor_is_strict_greater_select() {
        // K = 1 above 240, so t_img = 255 - d; pick d so t_img == t0.
        let floor = NonZeroU8::new(255 - 200).unwrap();
        assert_eq!(transmittance(255, 200, floor), floor.get());
        // One below: t_img = t0 + 1 wins.
        assert_eq!(transmittance(255, 199, floor), floor.get() + 1);
    }

    #[test]
    fn test_haze_free_scene_passes_through() {
        // A <= 160: t_img is always 255 regardless of the dark value.
        assert_eq!(transmittance(160, 255, t0()), 255);
        assert_eq!(transmittance(0, 128, t0()), 255);
    }

    #[test]
    fn test_stage_latency_and_blanking() {
        let mut stage = TransmittanceEstimator::new(t0());
        let out1 = stage.tick(Tick::active(255), 255);
        let out2 = stage.tick(Tick::active(0), 255);
        assert!(!out1.is_active());
        assert!(!out2.is_active());
        // First input (d = 255, K = 1) emerges after two ticks: t = floor.
        let out3 = stage.tick(Tick::blank(), 255);
        assert!(out3.is_active());
        assert_eq!(out3.payload, DEFAULT_T0);
        // Second input: d = 0 gives t = 255.
        let out4 = stage.tick(Tick::blank(), 255);
        assert_eq!(out4.payload, 255);
        // The blanking input emerges with a zero payload.
        let out5 = stage.tick(Tick::blank(), 255);
        assert!(!out5.is_active());
        assert_eq!(out5.payload, 0);
    }
}
