// Script timer. Counts down and raises the Timer event when it reaches zero.
use bevy_ecs::prelude::Component;

#[derive(Component, Debug, Clone, Copy, Default)]
pub struct ScriptTimer {
    pub duration: f32,
    pub time_left: f32,
}

impl ScriptTimer {
    /// Starts counting `duration` seconds. Zero or less stops the timer.
    pub fn start(&mut self, duration: f32) {
        self.duration = duration.max(0.0);
        self.time_left = self.duration;
    }

    pub fn stop(&mut self) {
        self.time_left = 0.0;
    }

    pub fn is_running(&self) -> bool {
        self.time_left > 0.0
    }

    /// Advances the timer. Returns true on the tick it runs out.
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.time_left <= 0.0 {
            return false;
        }
        self.time_left -= dt;
        if self.time_left <= 0.0 {
            self.time_left = 0.0;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once() {
        let mut t = ScriptTimer::default();
        t.start(0.25);
        assert!(!t.tick(0.1));
        assert!(!t.tick(0.1));
        assert!(t.tick(0.1));
        assert!(!t.tick(0.1));
        assert!(!t.is_running());
    }

    #[test]
    fn zero_duration_never_fires() {
        let mut t = ScriptTimer::default();
        t.start(0.0);
        assert!(!t.tick(1.0));
    }
}
