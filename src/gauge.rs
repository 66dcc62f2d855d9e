use std::fmt;

/// Bounded scalar resource. The current value never leaves [0, max_value].
#[derive(Clone, Debug)]
pub struct Gauge {
    max_value: f64,
    current_value: f64,
}

impl Gauge {
    /// Full gauge with the given capacity. Capacity must be positive.
    pub fn new(max_value: f64) -> Self {
        assert!(max_value > 0.0, "gauge capacity must be positive");
        Gauge {
            max_value,
            current_value: max_value,
        }
    }

    pub fn with_value(max_value: f64, current_value: f64) -> Self {
        let mut gauge = Gauge::new(max_value);
        gauge.current_value = current_value.clamp(0.0, max_value);
        gauge
    }

    pub fn value(&self) -> f64 {
        self.current_value
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn max_value(&self) -> f64 {
        self.max_value
    }

    pub fn is_alive(&self) -> bool {
        self.current_value > 0.0
    }

    pub fn percent_full(&self) -> f64 {
        self.current_value / self.max_value
    }

    /// Caller passes a fraction in [0, 1]; values outside are not clamped.
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn set_percent_full(&mut self, percent: f64) {
        self.current_value = self.max_value * percent;
    }

    /// Change capacity, preserving the fill percentage.
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn set_max(&mut self, new_max_value: f64) {
        assert!(new_max_value > 0.0, "gauge capacity must be positive");
        let percent = self.percent_full();
        self.max_value = new_max_value;
        self.set_percent_full(percent);
    }

    /// Add delta (may be negative) and return how much actually applied
    /// after clamping to [0, max_value].
    pub fn change(&mut self, delta: f64) -> f64 {
        let before = self.current_value;
        self.current_value = (self.current_value + delta).clamp(0.0, self.max_value);
        self.current_value - before
    }
}

impl fmt::Display for Gauge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}/{:.2}", self.current_value, self.max_value)
    }
}

/// Counts elapsed seconds toward a threshold. Expiry is level-persistent:
/// once `running()` turns false it stays false until an explicit reset, so
/// a consumer that misses a tick still observes the expiry exactly once.
#[derive(Clone, Debug)]
pub struct Timer {
    max_time: f64,
    current_time: f64,
}

impl Timer {
    pub fn new(max_time: f64) -> Self {
        assert!(max_time > 0.0, "timer threshold must be positive");
        Timer {
            max_time,
            current_time: 0.0,
        }
    }

    pub fn tick(&mut self, time_delta: f64) {
        self.current_time += time_delta;
    }

    pub fn running(&self) -> bool {
        self.current_time < self.max_time
    }

    /// Force-expire without waiting out the remaining time.
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn turn_off(&mut self) {
        self.current_time = self.max_time + 0.01;
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn time_left(&self) -> f64 {
        self.max_time - self.current_time
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn elapsed(&self) -> f64 {
        self.current_time
    }

    pub fn reset(&mut self) {
        self.current_time = 0.0;
    }

    /// Reset and rearm with a new threshold (used to randomize intervals).
    pub fn reset_with(&mut self, max_time: f64) {
        assert!(max_time > 0.0, "timer threshold must be positive");
        self.max_time = max_time;
        self.current_time = 0.0;
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn percent_full(&self) -> f64 {
        self.current_time / self.max_time
    }

    /// Gauge view of the timer: elapsed time, or remaining time when
    /// reversed. Handy for HUD bars.
    pub fn as_gauge(&self, reverse: bool) -> Gauge {
        if reverse {
            Gauge::with_value(self.max_time, self.max_time - self.current_time)
        } else {
            Gauge::with_value(self.max_time, self.current_time)
        }
    }
}
