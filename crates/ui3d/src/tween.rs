//! Interpolation records sampled by widgets once per tick.

use serde::{Deserialize, Serialize};

/// Easing curve applied to normalized progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ease {
    /// Constant speed.
    Linear,
    /// Quadratic ease-out (fast start, soft landing).
    #[default]
    Power1Out,
}

impl Ease {
    /// Map progress `t` in `[0, 1]` to eased progress.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::Power1Out => 1.0 - (1.0 - t) * (1.0 - t),
        }
    }
}

/// One in-flight transition of a scalar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    /// Value at the start of the transition
    pub start: f32,
    /// Value at the end of the transition
    pub target: f32,
    /// Total length in seconds
    pub duration: f32,
    /// Seconds advanced so far
    pub elapsed: f32,
    /// Easing curve
    pub ease: Ease,
}

impl Tween {
    /// Create a new tween with the default ease
    pub fn new(start: f32, target: f32, duration: f32) -> Self {
        Self {
            start,
            target,
            duration,
            elapsed: 0.0,
            ease: Ease::default(),
        }
    }

    /// Builder: Set easing curve
    pub fn with_ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    /// Normalized progress in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }

    /// Current sampled value.
    pub fn value(&self) -> f32 {
        let t = self.ease.apply(self.progress());
        self.start + (self.target - self.start) * t
    }

    /// Whether the tween has reached its target.
    pub fn is_finished(&self) -> bool {
        self.progress() >= 1.0
    }

    /// Advance by `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        self.elapsed = (self.elapsed + dt.max(0.0)).min(self.duration.max(0.0));
    }
}

/// A scalar that owns at most one outstanding [`Tween`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Animated {
    value: f32,
    tween: Option<Tween>,
}

impl Animated {
    /// Resting value with no transition.
    pub fn new(value: f32) -> Self {
        Self { value, tween: None }
    }

    /// Current value.
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Where the value is heading (the current value when idle).
    pub fn target(&self) -> f32 {
        self.tween.map_or(self.value, |tween| tween.target)
    }

    /// Whether a transition is running.
    pub fn is_animating(&self) -> bool {
        self.tween.is_some()
    }

    /// Start a transition from the current value, replacing any in flight.
    pub fn animate_to(&mut self, target: f32, duration: f32) {
        self.animate_with(target, duration, Ease::default());
    }

    /// Same as [`Animated::animate_to`] with an explicit curve.
    pub fn animate_with(&mut self, target: f32, duration: f32, ease: Ease) {
        self.tween = Some(Tween::new(self.value, target, duration).with_ease(ease));
    }

    /// Jump to `value`, dropping any transition.
    pub fn set(&mut self, value: f32) {
        self.value = value;
        self.tween = None;
    }

    /// Advance the transition. Returns `true` on the step it completes.
    pub fn advance(&mut self, dt: f32) -> bool {
        let Some(tween) = self.tween.as_mut() else {
            return false;
        };
        tween.advance(dt);
        self.value = tween.value();
        if tween.is_finished() {
            self.value = tween.target;
            self.tween = None;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power1_out_front_loads_progress() {
        assert_eq!(Ease::Power1Out.apply(0.0), 0.0);
        assert_eq!(Ease::Power1Out.apply(1.0), 1.0);
        assert!((Ease::Power1Out.apply(0.5) - 0.75).abs() < 1e-6);
        assert_eq!(Ease::Linear.apply(0.5), 0.5);
    }

    #[test]
    fn tween_reaches_target_exactly() {
        let mut value = Animated::new(4.0);
        value.animate_to(5.0, 0.1);
        assert!(!value.advance(0.05));
        assert!(value.value() > 4.0 && value.value() < 5.0);
        assert!(value.advance(0.05));
        assert_eq!(value.value(), 5.0);
        assert!(!value.is_animating());
        assert!(!value.advance(0.05));
    }

    #[test]
    fn animate_to_replaces_in_flight_transition() {
        let mut value = Animated::new(0.0);
        value.animate_to(1.0, 0.2);
        value.advance(0.1);
        let midway = value.value();

        value.animate_to(0.0, 0.2);
        assert_eq!(value.target(), 0.0);
        // Restarts from where the previous transition left off.
        value.advance(0.0);
        assert_eq!(value.value(), midway);
        value.advance(0.2);
        assert_eq!(value.value(), 0.0);
    }

    #[test]
    fn zero_duration_completes_on_next_advance() {
        let mut value = Animated::new(1.0);
        value.animate_to(0.0, 0.0);
        assert!(value.advance(0.0));
        assert_eq!(value.value(), 0.0);
    }
}
