//! Leader FSM.

use bevy_ecs::prelude::*;

use crate::components::animation::{StartAnimOption, set_animation};
use crate::content::errors::ContentError;
use crate::fsm::builder::FsmBuilder;
use crate::fsm::event::{EventInfo, MobEvent};
use crate::fsms::gen_mob_fsm;
use crate::fsms::install;
use crate::mobs::leader::LeaderState;
use crate::mobs::mobtype::MobType;

pub fn create_fsm(mob_type: &mut MobType) -> Result<(), Vec<ContentError>> {
    let mut efc = FsmBuilder::new(mob_type.name.clone());

    efc.new_state("idling", LeaderState::Idling as usize);
    efc.new_event(MobEvent::OnEnter);
    efc.run(set_idling_anim);
    efc.new_event(MobEvent::TouchedDrop);
    efc.change_state("drinking");
    efc.new_event(MobEvent::TouchedTrack);
    efc.change_state("riding_track");
    efc.new_event(MobEvent::ZeroHealth);
    efc.change_state("dying");

    efc.new_state("drinking", LeaderState::Drinking as usize);
    efc.new_event(MobEvent::OnEnter);
    efc.run(gen_mob_fsm::start_drinking);
    efc.new_event(MobEvent::OnLeave);
    efc.run(gen_mob_fsm::finish_drinking);
    efc.new_event(MobEvent::AnimationEnd);
    efc.change_state("idling");
    efc.new_event(MobEvent::ZeroHealth);
    efc.change_state("dying");

    efc.new_state("riding_track", LeaderState::RidingTrack as usize);
    efc.new_event(MobEvent::OnEnter);
    efc.run(gen_mob_fsm::start_riding_track);
    efc.new_event(MobEvent::OnLeave);
    efc.run(gen_mob_fsm::stop_riding_track);
    efc.new_event(MobEvent::ReachedDestination);
    efc.change_state("idling");

    efc.new_state("dying", LeaderState::Dying as usize);
    efc.new_event(MobEvent::OnEnter);
    efc.run(gen_mob_fsm::start_dying);

    install(mob_type, efc, "idling", LeaderState::COUNT)
}

fn set_idling_anim(world: &mut World, mob: Entity, _: &EventInfo, _: &EventInfo) {
    set_animation(world, mob, "idling", StartAnimOption::NoRestart, true);
}
