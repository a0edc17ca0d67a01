//! Animation playback state, as seen by the logic.
//!
//! Frames and drawing are not handled here. The logic only needs to know which
//! animation is playing and when it ends, so it can raise `AnimationEnd`.

use bevy_ecs::prelude::{Component, Entity, World};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::components::mob::Mob;

/// How [`set_animation`] treats the animation already playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StartAnimOption {
    /// Always start from the beginning.
    #[default]
    Normal,
    /// Keep playing if it is already the current animation.
    NoRestart,
    /// Start at a random point of the animation.
    RandomTime,
}

#[derive(Debug, Clone, Default, Component, Serialize, Deserialize)]
pub struct Animation {
    pub animation_key: String,
    pub elapsed_time: f32,
    /// Seconds per loop. A zero-length one-shot ends on its first tick; a
    /// zero-length loop never ends.
    pub duration: f32,
    pub looped: bool,
    /// A non-looping animation reached its end.
    pub finished: bool,
}

impl Animation {
    pub fn new(animation_key: impl Into<String>, duration: f32, looped: bool) -> Self {
        Self {
            animation_key: animation_key.into(),
            elapsed_time: 0.0,
            duration,
            looped,
            finished: false,
        }
    }

    /// Advances playback. Returns true when the animation ends or loops.
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.finished || self.animation_key.is_empty() {
            return false;
        }
        if self.duration <= 0.0 {
            if self.looped {
                return false;
            }
            self.finished = true;
            return true;
        }
        self.elapsed_time += dt;
        if self.elapsed_time < self.duration {
            return false;
        }
        if self.looped {
            self.elapsed_time %= self.duration;
        } else {
            self.elapsed_time = self.duration;
            self.finished = true;
        }
        true
    }
}

/// Changes the animation of `mob` to `name`, using the timing its type
/// declares.
///
/// Animations the type does not declare are still set, with no duration, so
/// they end on the next tick.
pub fn set_animation(
    world: &mut World,
    mob: Entity,
    name: &str,
    option: StartAnimOption,
    random_start: bool,
) {
    let Some(info) = world
        .get::<Mob>(mob)
        .map(|m| (m.mob_type.animations.get(name).copied(), m.mob_type.name.clone()))
    else {
        return;
    };
    let (anim_info, type_name) = info;
    let Some(mut anim) = world.get_mut::<Animation>(mob) else {
        return;
    };

    if option == StartAnimOption::NoRestart && anim.animation_key == name {
        return;
    }

    let (duration, looped) = match anim_info {
        Some(a) => (a.duration, a.looped),
        None => {
            debug!("{}: no animation called \"{}\"", type_name, name);
            (0.0, false)
        }
    };
    *anim = Animation::new(name, duration, looped);
    if (random_start || option == StartAnimOption::RandomTime) && duration > 0.0 {
        anim.elapsed_time = fastrand::f32() * duration;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_shot_ends_once() {
        let mut anim = Animation::new("landing", 0.5, false);
        assert!(!anim.tick(0.3));
        assert!(anim.tick(0.3));
        assert!(anim.finished);
        assert!(!anim.tick(0.3));
    }

    #[test]
    fn looped_reports_every_loop() {
        let mut anim = Animation::new("idling", 1.0, true);
        assert!(anim.tick(1.2));
        assert!(!anim.finished);
        assert!((anim.elapsed_time - 0.2).abs() < 1e-5);
        assert!(!anim.tick(0.5));
        assert!(anim.tick(0.5));
    }

    #[test]
    fn undeclared_one_shot_ends_at_once() {
        let mut anim = Animation::new("unknown", 0.0, false);
        assert!(anim.tick(0.0));
        assert!(!anim.tick(100.0));
    }

    #[test]
    fn zero_length_loop_and_nothing_playing_never_end() {
        let mut anim = Animation::new("idling", 0.0, true);
        assert!(!anim.tick(100.0));
        let mut none = Animation::default();
        assert!(!none.tick(100.0));
    }
}
