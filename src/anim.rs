//! Time-based sweep driver.
//!
//! The host pumps [`Sweep::tick`] once per frame with a monotonic millisecond
//! clock; the sweep answers with an eased progress value and reports
//! completion exactly once per run. Cancellation is simply dropping the sweep,
//! which never runs completion logic.

use crate::geometry::{sin_cos, Fx, FX_ONE, FX_PI, FX_TWO, FX_ZERO};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SweepFrame {
    Running(Fx),
    Finished,
}

/// One 0→1 progress run over a fixed duration.
#[derive(Clone, Copy, Debug)]
pub struct Sweep {
    started_ms: Option<u64>,
    duration_ms: u32,
}

impl Sweep {
    /// The clock starts on the first tick, so a sweep created outside the
    /// frame loop does not lose its opening frames.
    pub fn new(duration_ms: u32) -> Self {
        Self {
            started_ms: None,
            duration_ms,
        }
    }

    pub fn tick(&mut self, now_ms: u64) -> SweepFrame {
        let started = *self.started_ms.get_or_insert(now_ms);
        if self.duration_ms == 0 {
            return SweepFrame::Finished;
        }
        let elapsed = now_ms.saturating_sub(started);
        if elapsed >= self.duration_ms as u64 {
            return SweepFrame::Finished;
        }
        let t = Fx::from_bits(((elapsed << 16) / self.duration_ms as u64) as i32);
        SweepFrame::Running(ease_in_out(t))
    }
}

/// Accelerate/decelerate curve: slow-fast-slow, endpoints exact.
pub fn ease_in_out(t: Fx) -> Fx {
    let t = t.clamp(FX_ZERO, FX_ONE);
    if t == FX_ZERO {
        return FX_ZERO;
    }
    if t == FX_ONE {
        return FX_ONE;
    }
    let (_, cos) = sin_cos(FX_PI * t);
    (FX_ONE - cos) / FX_TWO
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::FX_HALF;

    #[test]
    fn easing_endpoints_and_midpoint() {
        assert_eq!(ease_in_out(FX_ZERO), FX_ZERO);
        assert_eq!(ease_in_out(FX_ONE), FX_ONE);
        let mid = ease_in_out(FX_HALF);
        assert!((mid - FX_HALF).abs() < Fx::from_num(0.02), "mid {mid}");
    }

    #[test]
    fn easing_is_monotonic() {
        let mut prev = FX_ZERO;
        for step in 0..=50 {
            let t = Fx::from_num(step) / Fx::from_num(50);
            let v = ease_in_out(t);
            assert!(v >= prev, "dip at step {step}");
            prev = v;
        }
    }

    #[test]
    fn sweep_runs_then_finishes_on_schedule() {
        let mut sweep = Sweep::new(300);
        // Clock anchors at the first tick, not at construction.
        assert_eq!(sweep.tick(1_000), SweepFrame::Running(FX_ZERO));
        let SweepFrame::Running(early) = sweep.tick(1_060) else {
            panic!("sweep ended early");
        };
        let SweepFrame::Running(late) = sweep.tick(1_240) else {
            panic!("sweep ended early");
        };
        assert!(FX_ZERO < early && early < late && late < FX_ONE);
        assert_eq!(sweep.tick(1_300), SweepFrame::Finished);
        assert_eq!(sweep.tick(2_000), SweepFrame::Finished);
    }

    #[test]
    fn zero_duration_finishes_immediately() {
        let mut sweep = Sweep::new(0);
        assert_eq!(sweep.tick(42), SweepFrame::Finished);
    }
}
