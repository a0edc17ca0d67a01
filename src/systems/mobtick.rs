//! Per-tick mob logic.
//!
//! [`tick_mobs`] walks the [`MobList`] once per logic frame. Each mob gets,
//! in order: its first state entry (first tick only), physics, animation,
//! script checks (timer, health, focus, `OnTick`), then its category's
//! class tick. A mob marked for deletion by any step skips the rest.
use bevy_ecs::prelude::*;
use log::trace;

use crate::components::airborne::Airborne;
use crate::components::animation::Animation;
use crate::components::focus::Focus;
use crate::components::health::Health;
use crate::components::mapposition::MapPosition;
use crate::components::mob::{Mob, is_alive};
use crate::components::movetarget::MoveTarget;
use crate::components::standingon::StandingOn;
use crate::components::timer::ScriptTimer;
use crate::fsm::event::{EventInfo, MobEvent};
use crate::fsm::runtime::{MobFsm, enter_initial_state, raise_event, raise_simple};
use crate::mobs::track::tick_track_ride;
use crate::resources::gameconfig::tuning;
use crate::resources::moblist::MobList;
use crate::resources::worldtime::WorldTime;

/// Runs the logic of every mob that was alive when the tick started.
///
/// Mobs spawned during the tick wait for the next one.
pub fn tick_mobs(world: &mut World) {
    let dt = world.get_resource::<WorldTime>().map(|t| t.delta).unwrap_or(0.0);
    let mobs: Vec<Entity> = match world.get_resource::<MobList>() {
        Some(list) => list.as_slice().to_vec(),
        None => return,
    };
    for mob in mobs {
        tick_mob(world, mob, dt);
    }
}

/// One mob's logic for this tick.
pub fn tick_mob(world: &mut World, mob: Entity, dt: f32) {
    if !is_alive(world, mob) {
        return;
    }

    let first_tick = world.get::<MobFsm>(mob).is_some_and(|f| !f.entered);
    if first_tick {
        enter_initial_state(world, mob);
        raise_simple(world, mob, MobEvent::OnReady);
        if !is_alive(world, mob) {
            return;
        }
    }

    if let Some(mut m) = world.get_mut::<Mob>(mob) {
        m.time_alive += dt;
    }

    tick_physics(world, mob, dt);
    if !is_alive(world, mob) {
        return;
    }

    tick_animation(world, mob, dt);
    if !is_alive(world, mob) {
        return;
    }

    tick_script(world, mob, dt);
    if !is_alive(world, mob) {
        return;
    }

    let class_tick = world.get::<Mob>(mob).and_then(|m| m.mob_type.class_tick);
    if let Some(class_tick) = class_tick {
        class_tick(world, mob, dt);
    }
}

fn tick_physics(world: &mut World, mob: Entity, dt: f32) {
    tick_airborne(world, mob, dt);
    if !is_alive(world, mob) {
        return;
    }
    tick_move_target(world, mob, dt);
    if !is_alive(world, mob) {
        return;
    }
    tick_track_ride(world, mob, dt);
    if !is_alive(world, mob) {
        return;
    }
    update_standing_on(world, mob);
}

fn tick_airborne(world: &mut World, mob: Entity, dt: f32) {
    let gravity = tuning(world).gravity;
    let Some(mut airborne) = world.get::<Airborne>(mob).copied() else {
        return;
    };
    if let Some(mut pos) = world.get_mut::<MapPosition>(mob) {
        pos.pos += airborne.speed * dt;
    }
    airborne.z += airborne.speed_z * dt;
    airborne.speed_z -= gravity * dt;

    let landed = airborne.z <= 0.0;
    let Ok(mut entity) = world.get_entity_mut(mob) else {
        return;
    };
    if landed {
        entity.remove::<Airborne>();
    } else {
        entity.insert(airborne);
    }
    if landed {
        raise_simple(world, mob, MobEvent::Landed);
    }
}

fn tick_move_target(world: &mut World, mob: Entity, dt: f32) {
    let Some(move_target) = world.get::<MoveTarget>(mob).copied() else {
        return;
    };
    let Some(mut pos) = world.get_mut::<MapPosition>(mob) else {
        return;
    };
    let (new_pos, reached) = pos.pos.step_towards(move_target.target, move_target.speed * dt);
    pos.pos = new_pos;
    if !reached {
        return;
    }
    if let Ok(mut entity) = world.get_entity_mut(mob) {
        entity.remove::<MoveTarget>();
    }
    raise_simple(world, mob, MobEvent::ReachedDestination);
}

/// The walkable mob under `mob`, if any. Airborne mobs stand on nothing.
fn find_ground(world: &World, mob: Entity) -> Option<Entity> {
    if world.get::<Airborne>(mob).is_some() {
        return None;
    }
    let pos = world.get::<MapPosition>(mob)?.pos;
    let list = world.get_resource::<MobList>()?;
    list.iter().copied().find(|&other| {
        other != mob
            && world.get::<Mob>(other).is_some_and(|m| {
                !m.to_delete
                    && m.mob_type.walkable
                    && world
                        .get::<MapPosition>(other)
                        .is_some_and(|p| p.pos.distance(pos) <= m.mob_type.radius)
            })
    })
}

fn update_standing_on(world: &mut World, mob: Entity) {
    let Some(old) = world.get::<StandingOn>(mob).map(|s| s.target) else {
        return;
    };
    let new = find_ground(world, mob);
    if new == old {
        return;
    }
    if let Some(mut s) = world.get_mut::<StandingOn>(mob) {
        s.target = new;
    }
    if let Some(old) = old {
        raise_event(world, old, MobEvent::RiderRemoved, &EventInfo::Mob(mob), &EventInfo::None);
    }
    if let Some(new) = new {
        raise_event(world, new, MobEvent::RiderAdded, &EventInfo::Mob(mob), &EventInfo::None);
    }
}

fn tick_animation(world: &mut World, mob: Entity, dt: f32) {
    let ended = world
        .get_mut::<Animation>(mob)
        .is_some_and(|mut anim| anim.tick(dt));
    if ended {
        raise_simple(world, mob, MobEvent::AnimationEnd);
    }
}

fn tick_script(world: &mut World, mob: Entity, dt: f32) {
    let timer_fired = world
        .get_mut::<ScriptTimer>(mob)
        .is_some_and(|mut timer| timer.tick(dt));
    if timer_fired {
        raise_simple(world, mob, MobEvent::Timer);
        if !is_alive(world, mob) {
            return;
        }
    }

    let depleted = world.get::<Health>(mob).is_some_and(Health::is_depleted);
    if depleted {
        raise_simple(world, mob, MobEvent::ZeroHealth);
        if !is_alive(world, mob) {
            return;
        }
    }

    let focus = world.get::<Focus>(mob).and_then(|f| f.target);
    if let Some(target) = focus {
        let target_died = !is_alive(world, target)
            || world.get::<Health>(target).is_some_and(Health::is_depleted);
        if target_died {
            trace!("{:?} lost its focus {:?}", mob, target);
            if let Some(mut f) = world.get_mut::<Focus>(mob) {
                f.target = None;
            }
            raise_event(world, mob, MobEvent::FocusDied, &EventInfo::Mob(target), &EventInfo::None);
            if !is_alive(world, mob) {
                return;
            }
        }
    }

    raise_simple(world, mob, MobEvent::OnTick);
}
