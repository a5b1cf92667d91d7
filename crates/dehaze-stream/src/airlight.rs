//! Atmospheric-light estimation.
//!
//! The global atmospheric light `A` is approximated by the running maximum
//! of the dark-channel stream: the brightest dark value seen so far is taken
//! as the brightness of the airlight component. `A` is the only state shared
//! across the lifetime of a frame; this estimator is its single writer, the
//! transmittance and restore stages are read-only consumers.

use dehaze_core::{AirlightReset, Tick};

/// Running-maximum atmospheric-light estimator.
///
/// On each active tick the accumulator takes `max(accum, dark)`. The value
/// published on a tick is the accumulator state *before* that tick's update,
/// so consumers always read a stable value that does not yet include the
/// current pixel's contribution.
///
/// The accumulator lifetime is a configuration choice ([`AirlightReset`]):
/// cleared at each vertical-sync frame boundary, or persistent until
/// pipeline reset. It saturates at 255 and never decreases within its
/// lifetime.
#[derive(Debug, Clone)]
pub struct AirlightEstimator {
    policy: AirlightReset,
    max_accum: u8,
    prev_vsync: bool,
}

impl AirlightEstimator {
    /// Creates an estimator with a cleared accumulator.
    pub fn new(policy: AirlightReset) -> Self {
        Self {
            policy,
            max_accum: 0,
            prev_vsync: false,
        }
    }

    /// Consumes one dark-channel tick and returns the published `A`.
    ///
    /// Blanking ticks never update the accumulator; frame boundaries are
    /// detected on the rising edge of `vsync`.
    pub fn tick(&mut self, dark: Tick<u8>) -> u8 {
        if dark.framing.vsync && !self.prev_vsync && self.policy == AirlightReset::PerFrame {
            tracing::debug!(airlight = self.max_accum, "frame boundary, accumulator cleared");
            self.max_accum = 0;
        }
        self.prev_vsync = dark.framing.vsync;

        let published = self.max_accum;
        if dark.framing.de {
            self.max_accum = self.max_accum.max(dark.payload);
        }
        published
    }

    /// The current accumulator value.
    ///
    /// This is the estimate that will be published on the next tick; it
    /// already includes every active tick seen so far.
    #[inline]
    pub fn airlight(&self) -> u8 {
        self.max_accum
    }

    /// Clears the accumulator and the frame-boundary edge detector.
    pub fn reset(&mut self) {
        self.max_accum = 0;
        self.prev_vsync = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dehaze_core::Framing;

    fn vsync_tick() -> Tick<u8> {
        Tick::new(
            0,
            Framing {
                hsync: false,
                vsync: true,
                de: false,
            },
        )
    }

    #[test]
    fn test_published_value_lags_one_tick() {
        let mut est = AirlightEstimator::new(AirlightReset::Persistent);
        assert_eq!(est.tick(Tick::active(100)), 0);
        assert_eq!(est.tick(Tick::active(50)), 100);
        assert_eq!(est.tick(Tick::active(200)), 100);
        assert_eq!(est.tick(Tick::active(0)), 200);
    }

    #[test]
    fn test_blanking_does_not_update() {
        let mut est = AirlightEstimator::new(AirlightReset::Persistent);
        est.tick(Tick::active(10));
        est.tick(Tick::new(255, Framing::BLANK));
        assert_eq!(est.tick(Tick::active(0)), 10);
    }

    #[test]
    fn test_per_frame_reset_on_vsync_edge() {
        let mut est = AirlightEstimator::new(AirlightReset::PerFrame);
        est.tick(Tick::active(180));
        est.tick(Tick::active(0));
        assert_eq!(est.airlight(), 180);

        // Rising edge clears; a held vsync does not clear again.
        est.tick(vsync_tick());
        assert_eq!(est.airlight(), 0);
        est.tick(vsync_tick());

        assert_eq!(est.tick(Tick::active(90)), 0);
        assert_eq!(est.tick(Tick::active(0)), 90);
    }

    #[test]
    fn test_persistent_policy_survives_vsync() {
        let mut est = AirlightEstimator::new(AirlightReset::Persistent);
        est.tick(Tick::active(180));
        est.tick(vsync_tick());
        assert_eq!(est.tick(Tick::active(90)), 180);
    }

    #[test]
    fn test_saturates_at_full_scale() {
        let mut est = AirlightEstimator::new(AirlightReset::Persistent);
        est.tick(Tick::active(255));
        est.tick(Tick::active(255));
        assert_eq!(est.airlight(), 255);
    }
}
