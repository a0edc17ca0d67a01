//! Actions shared by the FSMs of several categories: drinking, riding,
//! holding, carrying, delivering and dying.

use bevy_ecs::prelude::*;
use log::{debug, warn};

use crate::components::airborne::Airborne;
use crate::components::animation::{StartAnimOption, set_animation};
use crate::components::carry::Carry;
use crate::components::focus::Focus;
use crate::components::holding::{HeldBy, Holding};
use crate::components::mapposition::MapPosition;
use crate::components::mob::{Mob, mark_for_deletion};
use crate::components::movetarget::MoveTarget;
use crate::components::statuses::Statuses;
use crate::components::timer::ScriptTimer;
use crate::fsm::event::{EventInfo, MobEvent};
use crate::fsm::runtime::{change_state_by_name, raise_event, raise_simple};
use crate::math::Vec2;
use crate::mobs::drop::{DrinkingFrom, DropEffect};
use crate::mobs::leader::Leader;
use crate::mobs::pikmin::Pikmin;
use crate::mobs::track::TrackRide;
use crate::resources::areainfo::AreaInfo;
use crate::resources::gameconfig::tuning;

fn set_focus(world: &mut World, mob: Entity, target: Option<Entity>) {
    if let Some(mut focus) = world.get_mut::<Focus>(mob) {
        focus.target = target;
    }
}

/// Starts drinking the drop in `info1`.
pub fn start_drinking(world: &mut World, mob: Entity, info1: &EventInfo, _: &EventInfo) {
    let drop = info1.mob();
    set_focus(world, mob, drop);
    let drop_type = drop.and_then(|d| world.get::<Mob>(d).map(|m| m.mob_type.clone()));
    if let (Some(drop_type), Ok(mut entity)) = (drop_type, world.get_entity_mut(mob)) {
        entity.insert(DrinkingFrom { drop_type });
    }
    set_animation(world, mob, "drinking", StartAnimOption::Normal, false);
}

/// Applies the effect of the drop being drunk. The drop itself may be gone
/// by now; its type is remembered from the first sip.
pub fn finish_drinking(world: &mut World, mob: Entity, _: &EventInfo, _: &EventInfo) {
    set_focus(world, mob, None);
    let Some(drinking) = world
        .get_entity_mut(mob)
        .ok()
        .and_then(|mut e| e.take::<DrinkingFrom>())
    else {
        return;
    };
    let Some(props) = drinking.drop_type.drop_props().cloned() else {
        return;
    };

    match props.effect {
        DropEffect::Maturate => {
            let max = i32::from(tuning(world).max_pikmin_maturity);
            if let Some(mut pikmin) = world.get_mut::<Pikmin>(mob) {
                let new_maturity = (i32::from(pikmin.maturity) + props.increase_amount).clamp(0, max);
                pikmin.maturity = new_maturity as u8;
            }
        }
        DropEffect::IncreaseSprays => {
            if let Some(mut leader) = world.get_mut::<Leader>(mob) {
                let amount = leader
                    .sprays
                    .entry(props.spray_type_to_increase.clone())
                    .or_insert(0);
                *amount = amount.saturating_add_signed(props.increase_amount);
            }
        }
        DropEffect::GiveStatus => {
            if let Some(mut statuses) = world.get_mut::<Statuses>(mob) {
                statuses.apply(&props.status_to_give);
            }
        }
    }
}

/// Gets on the track in `info1`.
pub fn start_riding_track(world: &mut World, mob: Entity, info1: &EventInfo, _: &EventInfo) {
    let Some(track) = info1.mob() else {
        return;
    };
    let Some((start, pose)) = world.get::<Mob>(track).and_then(|m| {
        let props = m.mob_type.track_props()?;
        let origin = world.get::<MapPosition>(track)?.pos;
        Some((origin + props.checkpoints.first().copied()?, props.riding_pose))
    }) else {
        warn!("{:?} cannot ride {:?}: it has no checkpoints", mob, track);
        return;
    };

    if let Ok(mut entity) = world.get_entity_mut(mob) {
        entity.insert(TrackRide {
            track,
            next_checkpoint: 1,
        });
    }
    if let Some(mut pos) = world.get_mut::<MapPosition>(mob) {
        pos.pos = start;
    }
    set_focus(world, mob, Some(track));
    set_animation(world, mob, pose.animation_name(), StartAnimOption::Normal, false);
}

pub fn stop_riding_track(world: &mut World, mob: Entity, _: &EventInfo, _: &EventInfo) {
    if let Ok(mut entity) = world.get_entity_mut(mob) {
        entity.remove::<TrackRide>();
    }
    set_focus(world, mob, None);
}

/// Gets off the track early if the track allows whistling riders off.
pub fn whistled_while_riding(world: &mut World, mob: Entity, info1: &EventInfo, info2: &EventInfo) {
    let cancellable = world
        .get::<TrackRide>(mob)
        .and_then(|r| world.get::<Mob>(r.track))
        .and_then(|m| m.mob_type.track_props().map(|p| p.cancellable_with_whistle))
        .unwrap_or(true);
    if cancellable {
        change_state_by_name(world, mob, "idling", info1, info2);
    }
}

/// Makes `holder` hold `held`, raising `Held` on the held mob.
pub fn hold(world: &mut World, holder: Entity, held: Entity) {
    if let Some(mut holding) = world.get_mut::<Holding>(holder) {
        if !holding.is_holding(held) {
            holding.held.push(held);
        }
    }
    if let Some(mut held_by) = world.get_mut::<HeldBy>(held) {
        held_by.holder = Some(holder);
    }
    raise_event(
        world,
        held,
        MobEvent::Held,
        &EventInfo::Mob(holder),
        &EventInfo::None,
    );
}

/// Lets go of `held`, raising `Released` on it.
pub fn release(world: &mut World, holder: Entity, held: Entity) {
    let was_holding = world
        .get_mut::<Holding>(holder)
        .is_some_and(|mut h| h.remove(held));
    if !was_holding {
        return;
    }
    if let Some(mut held_by) = world.get_mut::<HeldBy>(held) {
        held_by.holder = None;
    }
    raise_event(
        world,
        held,
        MobEvent::Released,
        &EventInfo::Mob(holder),
        &EventInfo::None,
    );
}

/// Releases everything `holder` holds.
pub fn release_all(world: &mut World, holder: Entity) {
    let held: Vec<Entity> = world
        .get::<Holding>(holder)
        .map(|h| h.held.to_vec())
        .unwrap_or_default();
    for h in held {
        release(world, holder, h);
    }
}

/// Stops any horizontal motion in the air.
pub fn lose_momentum(world: &mut World, mob: Entity, _: &EventInfo, _: &EventInfo) {
    if let Some(mut airborne) = world.get_mut::<Airborne>(mob) {
        airborne.speed = Vec2::ZERO;
    }
}

fn carrying_strength(world: &World, carrier: Entity) -> f32 {
    world
        .get::<Mob>(carrier)
        .and_then(|m| m.mob_type.pikmin_props().map(|p| p.carry_strength))
        .unwrap_or(1.0)
}

fn carried_weight(world: &World, mob: Entity) -> f32 {
    world.get::<Mob>(mob).map(|m| m.mob_type.weight).unwrap_or(1.0)
}

/// A carrier (in `info1`) grabbed on.
pub fn handle_carrier_added(world: &mut World, mob: Entity, info1: &EventInfo, _: &EventInfo) {
    let Some(carrier) = info1.mob() else {
        return;
    };
    let strength = carrying_strength(world, carrier);
    let weight = carried_weight(world, mob);
    let Some(mut carry) = world.get_mut::<Carry>(mob) else {
        return;
    };
    if carry.has_carrier(carrier) {
        return;
    }
    let could_move = carry.strength >= weight;
    carry.carriers.push(carrier);
    carry.strength += strength;
    let can_move = carry.strength >= weight;

    if can_move && !could_move {
        raise_simple(world, mob, MobEvent::CarryBeginMove);
    }
}

/// A carrier (in `info1`) let go.
pub fn handle_carrier_removed(world: &mut World, mob: Entity, info1: &EventInfo, _: &EventInfo) {
    let Some(carrier) = info1.mob() else {
        return;
    };
    let strength = carrying_strength(world, carrier);
    let weight = carried_weight(world, mob);
    let Some(mut carry) = world.get_mut::<Carry>(mob) else {
        return;
    };
    let Some(idx) = carry.carriers.iter().position(|&c| c == carrier) else {
        return;
    };
    let could_move = carry.strength >= weight;
    carry.carriers.remove(idx);
    carry.strength = (carry.strength - strength).max(0.0);
    let can_move = carry.strength >= weight;

    if could_move && !can_move {
        raise_simple(world, mob, MobEvent::CarryStopMove);
    }
}

/// Picks the carry destination: the area's delivery point.
pub fn carry_get_path(world: &mut World, mob: Entity, _: &EventInfo, _: &EventInfo) {
    let destination = world
        .get_resource::<AreaInfo>()
        .and_then(|a| a.delivery_point);
    if let Some(mut carry) = world.get_mut::<Carry>(mob) {
        carry.destination = destination;
    }
}

/// Starts moving towards the carry destination, or reports the path as
/// blocked if there is none.
pub fn carry_begin_move(world: &mut World, mob: Entity, _: &EventInfo, _: &EventInfo) {
    let speed = world.get::<Mob>(mob).map(|m| m.mob_type.move_speed).unwrap_or(0.0);
    let destination = match world.get_mut::<Carry>(mob) {
        Some(mut carry) => {
            carry.is_moving = true;
            carry.destination
        }
        None => return,
    };
    let Some(destination) = destination else {
        raise_simple(world, mob, MobEvent::PathBlocked);
        return;
    };
    if let Ok(mut entity) = world.get_entity_mut(mob) {
        entity.insert(MoveTarget {
            target: destination,
            speed,
        });
    }
}

pub fn carry_stop_move(world: &mut World, mob: Entity, _: &EventInfo, _: &EventInfo) {
    if let Some(mut carry) = world.get_mut::<Carry>(mob) {
        carry.is_moving = false;
    }
    if let Ok(mut entity) = world.get_entity_mut(mob) {
        entity.remove::<MoveTarget>();
    }
}

pub fn carry_become_stuck(world: &mut World, mob: Entity, _: &EventInfo, _: &EventInfo) {
    debug!("{:?} is stuck: nowhere to carry it to", mob);
    if let Ok(mut entity) = world.get_entity_mut(mob) {
        entity.remove::<MoveTarget>();
    }
}

/// Arrived at the delivery point.
pub fn carry_reach_destination(world: &mut World, mob: Entity, _: &EventInfo, _: &EventInfo) {
    if let Ok(mut entity) = world.get_entity_mut(mob) {
        entity.remove::<MoveTarget>();
    }
    raise_simple(world, mob, MobEvent::CarryDelivered);
}

/// Lets every carrier go, raising `FinishedTask` on each of them.
pub fn release_carriers(world: &mut World, mob: Entity) {
    let carriers = match world.get_mut::<Carry>(mob) {
        Some(mut carry) => {
            carry.strength = 0.0;
            carry.is_moving = false;
            std::mem::take(&mut carry.carriers)
        }
        None => return,
    };
    for carrier in carriers {
        raise_simple(world, carrier, MobEvent::FinishedTask);
    }
}

/// The carriers are done; the delivery target starts receiving the mob.
pub fn start_being_delivered(world: &mut World, mob: Entity, _: &EventInfo, _: &EventInfo) {
    release_carriers(world, mob);
    let target = world
        .get_resource::<AreaInfo>()
        .and_then(|a| a.delivery_target);
    set_focus(world, mob, target);
    let duration = tuning(world).delivery_duration;
    if let Some(mut timer) = world.get_mut::<ScriptTimer>(mob) {
        timer.start(duration);
    }
    set_animation(world, mob, "being_delivered", StartAnimOption::Normal, false);
}

/// The delivery is over; the mob goes away.
pub fn handle_delivery(world: &mut World, mob: Entity, _: &EventInfo, _: &EventInfo) {
    mark_for_deletion(world, mob);
}

pub fn start_dying(world: &mut World, mob: Entity, _: &EventInfo, _: &EventInfo) {
    if let Ok(mut entity) = world.get_entity_mut(mob) {
        entity.remove::<MoveTarget>();
    }
    release_all(world, mob);
    set_animation(world, mob, "dying", StartAnimOption::Normal, false);
}

pub fn finish_dying(world: &mut World, mob: Entity, _: &EventInfo, _: &EventInfo) {
    mark_for_deletion(world, mob);
}
