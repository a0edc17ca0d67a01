//! Track FSM. A track waits for riders; whatever touches it and is allowed
//! on gets a `TouchedTrack` event and hops on by itself.

use bevy_ecs::prelude::*;

use crate::components::animation::{StartAnimOption, set_animation};
use crate::components::mob::{Mob, category_of};
use crate::content::errors::ContentError;
use crate::fsm::builder::FsmBuilder;
use crate::fsm::event::{EventInfo, MobEvent};
use crate::fsm::runtime::{has_event_handler, raise_event};
use crate::fsms::install;
use crate::mobs::mobtype::{MobCategoryId, MobType};
use crate::mobs::track::{TRACK_RIDER_LEADERS, TRACK_RIDER_PIKMIN, TrackState};

pub fn create_fsm(mob_type: &mut MobType) -> Result<(), Vec<ContentError>> {
    let mut efc = FsmBuilder::new(mob_type.name.clone());

    efc.new_state("idling", TrackState::Idling as usize);
    efc.new_event(MobEvent::OnEnter);
    efc.run(set_idling_anim);
    efc.new_event(MobEvent::TouchedObject);
    efc.run(on_touched);

    install(mob_type, efc, "idling", TrackState::COUNT)
}

fn set_idling_anim(world: &mut World, mob: Entity, _: &EventInfo, _: &EventInfo) {
    set_animation(world, mob, "idling", StartAnimOption::NoRestart, false);
}

/// Something touched the track. `info1` holds the toucher.
pub fn on_touched(world: &mut World, mob: Entity, info1: &EventInfo, _: &EventInfo) {
    let Some(toucher) = info1.mob() else {
        return;
    };
    let flag = match category_of(world, toucher) {
        Some(MobCategoryId::Pikmin) => TRACK_RIDER_PIKMIN,
        Some(MobCategoryId::Leaders) => TRACK_RIDER_LEADERS,
        _ => return,
    };
    let allowed = world
        .get::<Mob>(mob)
        .and_then(|m| m.mob_type.track_props().map(|p| p.riders & flag != 0))
        .unwrap_or(false);
    if !allowed || !has_event_handler(world, toucher, MobEvent::TouchedTrack) {
        return;
    }
    raise_event(
        world,
        toucher,
        MobEvent::TouchedTrack,
        &EventInfo::Mob(mob),
        &EventInfo::None,
    );
}
