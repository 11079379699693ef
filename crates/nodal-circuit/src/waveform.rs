//! Time-dependent source waveforms.
//!
//! The solver core only needs a callable `f64 -> f64`; concrete waveform
//! shapes are an external device-model concern. [`Pulse`] is kept here as
//! the one concrete example needed to exercise time-point folding in
//! [`crate::element::Element::time_varying_value`].
use std::fmt;

/// A SPICE-style trapezoidal pulse: holds at `initial` for `delay` seconds,
/// ramps linearly to `pulsed` over `rise_time`, holds for `pulse_width`,
/// ramps back down over `fall_time`, then repeats every `period`.
#[derive(Debug, Clone, Copy)]
pub struct Pulse {
    pub initial: f64,
    pub pulsed: f64,
    pub delay: f64,
    pub rise_time: f64,
    pub fall_time: f64,
    pub pulse_width: f64,
    pub period: f64,
}

impl Pulse {
    pub fn value_at(&self, t: f64) -> f64 {
        if t < self.delay {
            return self.initial;
        }
        let period = if self.period > 0.0 {
            self.period
        } else {
            f64::INFINITY
        };
        let tau = (t - self.delay) % period;

        let rise_end = self.rise_time;
        let plateau_end = rise_end + self.pulse_width;
        let fall_end = plateau_end + self.fall_time;

        if tau < rise_end {
            if rise_end == 0.0 {
                self.pulsed
            } else {
                self.initial + (self.pulsed - self.initial) * (tau / rise_end)
            }
        } else if tau < plateau_end {
            self.pulsed
        } else if tau < fall_end {
            if self.fall_time == 0.0 {
                self.initial
            } else {
                self.pulsed + (self.initial - self.pulsed) * ((tau - plateau_end) / self.fall_time)
            }
        } else {
            self.initial
        }
    }
}

impl fmt::Display for Pulse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PULSE({} {} {} {} {} {} {})",
            self.initial,
            self.pulsed,
            self.delay,
            self.rise_time,
            self.fall_time,
            self.pulse_width,
            self.period
        )
    }
}
