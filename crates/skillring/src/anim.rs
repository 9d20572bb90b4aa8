use serde_with::{DeserializeFromStr, SerializeDisplay};
use strum::{Display, EnumIter, EnumString};

pub const MIN_DURATION: f64 = 1e-4;

pub fn clamp_duration(duration: f64) -> f64 {
    // f64::max ignores NaN, so a NaN duration also lands on the floor
    duration.max(MIN_DURATION)
}

pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// Hermite smooth-step over `[0, 1]`, easing both ends of the motion.
pub fn smooth_step(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Wraps an angle in degrees into `[-180, 180)`.
pub fn wrap_degrees(degrees: f64) -> f64 {
    (degrees + 180.0).rem_euclid(360.0) - 180.0
}

/// Interpolates along the shortest arc between two orientations about a single axis.
pub fn lerp_angle(from: f64, to: f64, t: f64) -> f64 {
    from + wrap_degrees(to - from) * t
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    SerializeDisplay,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    Display,
)]
#[strum(ascii_case_insensitive, serialize_all = "kebab-case")]
pub enum Easing {
    Linear,
    #[default]
    #[strum(serialize = "smooth-step", serialize = "smoothstep")]
    SmoothStep,
    #[strum(serialize = "ease-in-out", serialize = "cubic")]
    EaseInOut,
    EaseIn,
    EaseOut,
}

impl Easing {
    pub fn evaluate(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::SmoothStep => smooth_step(t),
            Self::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Self::EaseIn => t * t * t,
            Self::EaseOut => 1.0 - (1.0 - t).powi(3),
        }
    }
}

/// Normalised time accumulator: `advance` adds `dt / duration` per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timeline {
    time: f64,
    duration: f64,
}

impl Timeline {
    pub fn new(duration: f64) -> Self {
        Self {
            time: 0.0,
            duration: clamp_duration(duration),
        }
    }

    /// Advances by one frame and returns the raw (unclamped) normalised time.
    pub fn advance(&mut self, dt: f64) -> f64 {
        self.time += dt.max(0.0) / self.duration;
        self.time
    }

    pub fn finished(&self) -> bool {
        self.time >= 1.0
    }
}

/// A suspension point inside a multi-step sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Wait {
    /// Resume on the next tick.
    Frame,
    /// Resume on the first tick at which this much time has elapsed.
    Seconds(f64),
}

impl Wait {
    /// Consumes one tick; returns true once the wait is over.
    pub fn poll(&mut self, dt: f64) -> bool {
        match self {
            Self::Frame => true,
            Self::Seconds(remaining) => {
                *remaining -= dt.max(0.0);
                *remaining <= 0.0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_curves_hit_endpoints() {
        for easing in Easing::iter() {
            assert_eq!(easing.evaluate(0.0), 0.0, "{easing}");
            assert_eq!(easing.evaluate(1.0), 1.0, "{easing}");
            assert_eq!(easing.evaluate(7.0), 1.0, "{easing}");
        }
        assert_eq!(smooth_step(0.5), 0.5);
    }

    #[test]
    fn test_easing_deserialization() {
        let cases = vec![
            ("\"linear\"", Easing::Linear),
            ("\"smooth-step\"", Easing::SmoothStep),
            ("\"SmoothStep\"", Easing::SmoothStep),
            ("\"ease-in-out\"", Easing::EaseInOut),
            ("\"EASE-OUT\"", Easing::EaseOut),
        ];

        for (json, expected) in cases {
            let deserialized: Easing = serde_json::from_str(json).unwrap();
            assert_eq!(deserialized, expected);
        }
    }

    #[test]
    fn test_zero_duration_never_divides_by_zero() {
        let mut timeline = Timeline::new(0.0);
        let t = timeline.advance(0.016);
        assert!(t.is_finite());
        assert!(timeline.finished());

        let mut negative = Timeline::new(-3.0);
        assert_eq!(negative.advance(0.0), 0.0);
        assert!(!negative.finished());
    }

    #[test]
    fn test_lerp_angle_takes_short_arc() {
        assert_eq!(wrap_degrees(270.0), -90.0);
        assert_eq!(lerp_angle(350.0, 10.0, 0.5), 360.0);
        assert_eq!(lerp_angle(0.0, -90.0, 1.0), -90.0);
    }

    #[test]
    fn test_wait_seconds_counts_down() {
        let mut wait = Wait::Seconds(0.05);
        assert!(!wait.poll(0.02));
        assert!(!wait.poll(0.02));
        assert!(wait.poll(0.02));
        assert!(Wait::Frame.poll(0.0));
    }
}
