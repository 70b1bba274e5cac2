/// Fixed timestep accumulator.
/// Physics only ever advances in increments of `dt`; leftover frame time is
/// carried into the next call.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    /// The fixed delta time per step.
    dt: f32,
    /// Frame deltas are clamped to this before accumulation.
    max_frame_dt: f32,
    /// Accumulated time from variable frame deltas.
    accumulator: f32,
}

impl FixedTimestep {
    pub fn new(dt: f32, max_frame_dt: f32) -> Self {
        Self {
            dt,
            max_frame_dt,
            accumulator: 0.0,
        }
    }

    /// Clamp a raw frame delta to `[0, max_frame_dt]`. NaN counts as zero.
    pub fn clamp_frame(&self, frame_dt: f32) -> f32 {
        if frame_dt.is_nan() {
            return 0.0;
        }
        frame_dt.clamp(0.0, self.max_frame_dt)
    }

    /// Add frame time to the accumulator. Returns the number of fixed steps to run.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += self.clamp_frame(frame_dt);
        let mut steps = 0;
        while self.accumulator >= self.dt {
            self.accumulator -= self.dt;
            steps += 1;
        }
        steps
    }

    /// Interpolation alpha for rendering between steps (0.0 to 1.0).
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.dt
    }

    /// Time carried over to the next frame.
    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn one_step_exact() {
        let mut ts = FixedTimestep::new(DT, 0.25);
        assert_eq!(ts.accumulate(DT), 1);
    }

    #[test]
    fn two_half_steps_make_one() {
        let mut ts = FixedTimestep::new(DT, 0.25);
        assert_eq!(ts.accumulate(1.0 / 120.0), 0);
        assert_eq!(ts.accumulate(1.0 / 120.0), 1);
    }

    #[test]
    fn accumulates_partial() {
        let mut ts = FixedTimestep::new(DT, 0.25);
        assert_eq!(ts.accumulate(0.008), 0);
        assert_eq!(ts.accumulate(0.010), 1);
        assert!(ts.accumulator() > 0.0);
    }

    #[test]
    fn clamps_large_frames() {
        let mut long = FixedTimestep::new(DT, 0.25);
        let mut capped = FixedTimestep::new(DT, 0.25);
        assert_eq!(long.accumulate(10.0), capped.accumulate(0.25));
        assert_eq!(long.accumulator(), capped.accumulator());
    }

    #[test]
    fn negative_and_nan_frames_are_ignored() {
        let mut ts = FixedTimestep::new(DT, 0.25);
        assert_eq!(ts.accumulate(-1.0), 0);
        assert_eq!(ts.accumulate(f32::NAN), 0);
        assert_eq!(ts.accumulator(), 0.0);
    }

    #[test]
    fn alpha_is_between_zero_and_one() {
        let mut ts = FixedTimestep::new(DT, 0.25);
        ts.accumulate(0.008);
        let a = ts.alpha();
        assert!((0.0..=1.0).contains(&a), "alpha was {}", a);
    }

    proptest! {
        #[test]
        fn split_frames_step_the_same_count(steps in 1u32..120, parts in 1u32..8) {
            let total = steps as f32 * DT;
            let mut whole = FixedTimestep::new(DT, f32::MAX);
            let mut split = FixedTimestep::new(DT, f32::MAX);

            let whole_steps = whole.accumulate(total);
            let mut split_steps = 0;
            for _ in 0..parts {
                split_steps += split.accumulate(total / parts as f32);
            }

            prop_assert!((whole_steps as i64 - steps as i64).abs() <= 1);
            prop_assert!((whole_steps as i64 - split_steps as i64).abs() <= 1);
        }

        #[test]
        fn leftover_never_reaches_a_full_step(frames in proptest::collection::vec(0.0f32..0.3, 1..50)) {
            let mut ts = FixedTimestep::new(DT, 0.25);
            for frame in frames {
                ts.accumulate(frame);
                prop_assert!(ts.accumulator() >= 0.0);
                prop_assert!(ts.accumulator() < DT);
            }
        }
    }
}
