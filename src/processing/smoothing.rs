//! Exponential smoothing for camera motion
//!
//! Each step moves a value a fixed fraction of the remaining distance toward
//! its target, which gives decaying, non-oscillating convergence.

/// 1D smoothed value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothedValue {
    pub value: f64,
}

impl SmoothedValue {
    pub fn new(initial: f64) -> Self {
        Self { value: initial }
    }

    /// Advance one step toward the target
    ///
    /// `value += (target - value) * factor`. With `factor` in (0, 1] the value
    /// never overshoots.
    pub fn step(&mut self, target: f64, factor: f64) {
        self.value += (target - self.value) * factor;
    }

    pub fn is_settled(&self, target: f64, epsilon: f64) -> bool {
        (self.value - target).abs() < epsilon
    }
}

/// 2D smoothed point (X and Y axes smoothed independently)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Smoothed2D {
    pub x: SmoothedValue,
    pub y: SmoothedValue,
}

impl Smoothed2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x: SmoothedValue::new(x),
            y: SmoothedValue::new(y),
        }
    }

    pub fn step(&mut self, target: (f64, f64), factor: f64) {
        self.x.step(target.0, factor);
        self.y.step(target.1, factor);
    }

    pub fn position(&self) -> (f64, f64) {
        (self.x.value, self.y.value)
    }

    /// Jump straight to a position
    pub fn reset(&mut self, x: f64, y: f64) {
        self.x = SmoothedValue::new(x);
        self.y = SmoothedValue::new(y);
    }

    pub fn is_settled(&self, target: (f64, f64), epsilon: f64) -> bool {
        self.x.is_settled(target.0, epsilon) && self.y.is_settled(target.1, epsilon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_approaches_target() {
        let mut state = SmoothedValue::new(0.0);

        for _ in 0..100 {
            state.step(100.0, 0.1);
        }

        assert!(
            state.is_settled(100.0, 0.01),
            "Value {} should be close to 100",
            state.value
        );
    }

    #[test]
    fn test_no_overshoot_and_monotonic() {
        let mut state = SmoothedValue::new(0.0);
        let mut previous_distance = f64::MAX;

        for _ in 0..200 {
            state.step(100.0, 0.3);
            let distance = 100.0 - state.value;
            assert!(distance >= 0.0, "Overshot target: {}", state.value);
            assert!(distance <= previous_distance);
            previous_distance = distance;
        }
    }

    #[test]
    fn test_factor_one_snaps() {
        let mut state = SmoothedValue::new(3.0);
        state.step(1.0, 1.0);
        assert_eq!(state.value, 1.0);
    }

    #[test]
    fn test_smoothed_2d() {
        let mut point = Smoothed2D::new(0.0, 0.0);

        for _ in 0..100 {
            point.step((100.0, 200.0), 0.1);
        }

        let (x, y) = point.position();
        assert!((x - 100.0).abs() < 0.01, "X {} should be close to 100", x);
        assert!((y - 200.0).abs() < 0.01, "Y {} should be close to 200", y);
        assert!(point.is_settled((100.0, 200.0), 0.01));
    }

    #[test]
    fn test_smoothed_2d_reset() {
        let mut point = Smoothed2D::new(0.0, 0.0);

        for _ in 0..10 {
            point.step((100.0, 100.0), 0.1);
        }

        point.reset(500.0, 250.0);
        assert_eq!(point.position(), (500.0, 250.0));
    }
}
