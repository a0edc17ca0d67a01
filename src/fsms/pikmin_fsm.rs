//! Pikmin FSM.

use bevy_ecs::prelude::*;
use std::f32::consts::TAU;

use crate::components::animation::{StartAnimOption, set_animation};
use crate::components::carry::Carry;
use crate::components::holding::{HeldBy, Holding};
use crate::components::mob::{Mob, category_of, is_alive};
use crate::content::errors::ContentError;
use crate::fsm::builder::FsmBuilder;
use crate::fsm::event::{EventInfo, MobEvent};
use crate::fsm::runtime::{has_event_handler, raise_event, set_state};
use crate::fsms::gen_mob_fsm;
use crate::fsms::install;
use crate::math::Vec2;
use crate::mobs::mobtype::{MobCategoryId, MobType};
use crate::mobs::pikmin::{Pikmin, PikminState};

pub fn create_fsm(mob_type: &mut MobType) -> Result<(), Vec<ContentError>> {
    let mut efc = FsmBuilder::new(mob_type.name.clone());

    efc.new_state("idling", PikminState::Idling as usize);
    efc.new_event(MobEvent::OnEnter);
    efc.run(set_idling_anim);
    efc.new_event(MobEvent::TouchedObject);
    efc.run(check_touched_object);
    efc.new_event(MobEvent::TouchedDrop);
    efc.change_state("drinking");
    efc.new_event(MobEvent::TouchedTrack);
    efc.change_state("riding_track");
    efc.new_event(MobEvent::Thrown);
    efc.change_state("thrown");
    efc.new_event(MobEvent::Whistled);
    efc.run(whistled);
    efc.new_event(MobEvent::ZeroHealth);
    efc.change_state("dying");

    efc.new_state("thrown", PikminState::Thrown as usize);
    efc.new_event(MobEvent::OnEnter);
    efc.run(set_thrown_anim);
    efc.new_event(MobEvent::Landed);
    efc.run(land);
    efc.change_state("idling");

    efc.new_state("drinking", PikminState::Drinking as usize);
    efc.new_event(MobEvent::OnEnter);
    efc.run(gen_mob_fsm::start_drinking);
    efc.new_event(MobEvent::OnLeave);
    efc.run(gen_mob_fsm::finish_drinking);
    efc.new_event(MobEvent::AnimationEnd);
    efc.change_state("idling");
    efc.new_event(MobEvent::ZeroHealth);
    efc.change_state("dying");

    efc.new_state("riding_track", PikminState::RidingTrack as usize);
    efc.new_event(MobEvent::OnEnter);
    efc.run(gen_mob_fsm::start_riding_track);
    efc.new_event(MobEvent::OnLeave);
    efc.run(gen_mob_fsm::stop_riding_track);
    efc.new_event(MobEvent::ReachedDestination);
    efc.change_state("idling");
    efc.new_event(MobEvent::Whistled);
    efc.run(gen_mob_fsm::whistled_while_riding);

    efc.new_state("carrying", PikminState::Carrying as usize);
    efc.new_event(MobEvent::OnEnter);
    efc.run(set_carrying_anim);
    efc.new_event(MobEvent::OnLeave);
    efc.run(stop_carrying);
    efc.new_event(MobEvent::FinishedTask);
    efc.change_state("idling");
    efc.new_event(MobEvent::Whistled);
    efc.change_state("idling");
    efc.new_event(MobEvent::ZeroHealth);
    efc.change_state("dying");

    efc.new_state("dying", PikminState::Dying as usize);
    efc.new_event(MobEvent::OnEnter);
    efc.run(gen_mob_fsm::start_dying);
    efc.new_event(MobEvent::AnimationEnd);
    efc.run(gen_mob_fsm::finish_dying);

    install(mob_type, efc, "idling", PikminState::COUNT)
}

fn set_idling_anim(world: &mut World, mob: Entity, _: &EventInfo, _: &EventInfo) {
    set_animation(world, mob, "idling", StartAnimOption::NoRestart, true);
}

fn set_thrown_anim(world: &mut World, mob: Entity, _: &EventInfo, _: &EventInfo) {
    set_animation(world, mob, "thrown", StartAnimOption::Normal, false);
}

fn set_carrying_anim(world: &mut World, mob: Entity, _: &EventInfo, _: &EventInfo) {
    set_animation(world, mob, "carrying", StartAnimOption::Normal, false);
}

/// Releases held tools whose type says so.
fn drop_tools(world: &mut World, pikmin: Entity, when: impl Fn(&MobType) -> bool) {
    let held: Vec<Entity> = world
        .get::<Holding>(pikmin)
        .map(|h| h.held.to_vec())
        .unwrap_or_default();
    for tool in held {
        let drops = world
            .get::<Mob>(tool)
            .is_some_and(|m| m.mob_type.tool_props().is_some() && when(&m.mob_type));
        if drops {
            gen_mob_fsm::release(world, pikmin, tool);
        }
    }
}

fn whistled(world: &mut World, mob: Entity, _: &EventInfo, _: &EventInfo) {
    drop_tools(world, mob, |t| {
        t.tool_props().is_some_and(|p| p.dropped_when_pikmin_is_whistled)
    });
}

fn land(world: &mut World, mob: Entity, _: &EventInfo, _: &EventInfo) {
    drop_tools(world, mob, |t| {
        t.tool_props().is_some_and(|p| p.dropped_when_pikmin_lands)
    });
}

/// Touched something while idling: grab it if it is a free tool, or latch
/// onto it if it is a resource with room for one more carrier.
pub fn check_touched_object(world: &mut World, mob: Entity, info1: &EventInfo, _: &EventInfo) {
    let Some(other) = info1.mob() else {
        return;
    };
    if !is_alive(world, other) {
        return;
    }
    match category_of(world, other) {
        Some(MobCategoryId::Tools) => try_grab_tool(world, mob, other),
        Some(MobCategoryId::Resources) => try_carry(world, mob, other),
        _ => {}
    }
}

fn try_grab_tool(world: &mut World, pikmin: Entity, tool: Entity) {
    let can_carry_tools = world
        .get::<Mob>(pikmin)
        .and_then(|m| m.mob_type.pikmin_props().map(|p| p.can_carry_tools))
        .unwrap_or(false);
    let hands_free = world.get::<Holding>(pikmin).is_some_and(|h| h.held.is_empty());
    let tool_free = world.get::<HeldBy>(tool).is_some_and(|h| h.holder.is_none());
    if can_carry_tools && hands_free && tool_free {
        gen_mob_fsm::hold(world, pikmin, tool);
    }
}

fn try_carry(world: &mut World, pikmin: Entity, resource: Entity) {
    let Some((max_carriers, radius)) = world
        .get::<Mob>(resource)
        .map(|m| (m.mob_type.max_carriers, m.mob_type.radius))
    else {
        return;
    };
    let Some(spot) = world
        .get::<Carry>(resource)
        .map(|c| c.carriers.len())
        .filter(|&n| n < max_carriers)
    else {
        return;
    };
    if !has_event_handler(world, resource, MobEvent::CarrierAdded) {
        return;
    }
    let Some(carrying_idx) = world
        .get::<Mob>(pikmin)
        .and_then(|m| m.mob_type.state_index("carrying"))
    else {
        return;
    };

    let own_radius = world.get::<Mob>(pikmin).map(|m| m.mob_type.radius).unwrap_or(0.0);
    let angle = TAU * spot as f32 / max_carriers as f32;
    let offset = Vec2::new(angle.cos(), angle.sin()) * (radius + own_radius);
    if let Some(mut pik) = world.get_mut::<Pikmin>(pikmin) {
        pik.carrying = Some(resource);
        pik.carry_offset = offset;
    }
    set_state(world, pikmin, carrying_idx, &EventInfo::Mob(resource), &EventInfo::None);
    raise_event(
        world,
        resource,
        MobEvent::CarrierAdded,
        &EventInfo::Mob(pikmin),
        &EventInfo::None,
    );
}

/// Lets go of the carried mob, telling it if it still counts on us.
pub fn stop_carrying(world: &mut World, mob: Entity, _: &EventInfo, _: &EventInfo) {
    let Some(resource) = world.get_mut::<Pikmin>(mob).and_then(|mut p| p.carrying.take()) else {
        return;
    };
    let still_listed = world.get::<Carry>(resource).is_some_and(|c| c.has_carrier(mob));
    if still_listed {
        raise_event(
            world,
            resource,
            MobEvent::CarrierRemoved,
            &EventInfo::Mob(mob),
            &EventInfo::None,
        );
    }
}
