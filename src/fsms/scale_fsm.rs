//! Scale FSM.

use bevy_ecs::prelude::*;

use crate::components::animation::{StartAnimOption, set_animation};
use crate::components::mob::Mob;
use crate::content::errors::ContentError;
use crate::fsm::builder::FsmBuilder;
use crate::fsm::event::{EventInfo, MobEvent};
use crate::fsm::runtime::set_state;
use crate::fsms::install;
use crate::mobs::mobtype::MobType;
use crate::mobs::scale::ScaleState;

pub fn create_fsm(mob_type: &mut MobType) -> Result<(), Vec<ContentError>> {
    let mut efc = FsmBuilder::new(mob_type.name.clone());

    efc.new_state("idling", ScaleState::Idling as usize);
    efc.new_event(MobEvent::OnEnter);
    efc.run(set_idling_anim);
    efc.new_event(MobEvent::WeightAdded);
    efc.run(check_goal);

    efc.new_state("goal_reached", ScaleState::GoalReached as usize);
    efc.new_event(MobEvent::OnEnter);
    efc.run(set_goal_reached_anim);
    efc.new_event(MobEvent::WeightRemoved);
    efc.run(check_goal_lost);

    install(mob_type, efc, "idling", ScaleState::COUNT)
}

fn set_idling_anim(world: &mut World, mob: Entity, _: &EventInfo, _: &EventInfo) {
    set_animation(world, mob, "idling", StartAnimOption::NoRestart, false);
}

fn set_goal_reached_anim(world: &mut World, mob: Entity, _: &EventInfo, _: &EventInfo) {
    set_animation(world, mob, "goal_reached", StartAnimOption::Normal, false);
}

fn goal_of(world: &World, mob: Entity) -> f32 {
    world
        .get::<Mob>(mob)
        .and_then(|m| m.mob_type.scale_props().map(|p| p.goal_number))
        .unwrap_or(0.0)
}

/// `info1` holds the new total weight.
fn check_goal(world: &mut World, mob: Entity, info1: &EventInfo, info2: &EventInfo) {
    let goal = goal_of(world, mob);
    let weight = info1.amount().unwrap_or(0.0);
    if goal > 0.0 && weight >= goal {
        set_state(world, mob, ScaleState::GoalReached as usize, info1, info2);
    }
}

fn check_goal_lost(world: &mut World, mob: Entity, info1: &EventInfo, info2: &EventInfo) {
    let goal = goal_of(world, mob);
    let weight = info1.amount().unwrap_or(0.0);
    if weight < goal {
        set_state(world, mob, ScaleState::Idling as usize, info1, info2);
    }
}
