//! Drop FSM.
//!
//! A drop falls into place, lands, then idles until touched. A touch by a
//! mob that can drink it hands the drinker a `TouchedDrop` event and uses up
//! a dose; any other Pikmin or leader just bumps it.

use bevy_ecs::prelude::*;

use crate::components::animation::{StartAnimOption, set_animation};
use crate::components::mob::{Mob, category_of};
use crate::content::errors::ContentError;
use crate::fsm::builder::FsmBuilder;
use crate::fsm::event::{EventInfo, MobEvent};
use crate::fsm::runtime::{MobFsm, has_event_handler, raise_event, set_state};
use crate::fsms::install;
use crate::mobs::drop::{DropConsumer, DropEffect, DropInfo, DropState};
use crate::mobs::mobtype::{MobCategoryId, MobType};
use crate::mobs::pikmin::Pikmin;
use crate::resources::gameconfig::tuning;

pub fn create_fsm(mob_type: &mut MobType) -> Result<(), Vec<ContentError>> {
    let mut efc = FsmBuilder::new(mob_type.name.clone());

    efc.new_state("falling", DropState::Falling as usize);
    efc.new_event(MobEvent::OnEnter);
    efc.run(set_falling_anim);
    efc.new_event(MobEvent::Landed);
    efc.change_state("landing");

    efc.new_state("landing", DropState::Landing as usize);
    efc.new_event(MobEvent::OnEnter);
    efc.run(set_landing_anim);
    efc.new_event(MobEvent::AnimationEnd);
    efc.change_state("idling");

    efc.new_state("idling", DropState::Idling as usize);
    efc.new_event(MobEvent::OnEnter);
    efc.run(set_idling_anim);
    efc.new_event(MobEvent::TouchedObject);
    efc.run(on_touched);

    efc.new_state("bumped", DropState::Bumped as usize);
    efc.new_event(MobEvent::OnEnter);
    efc.run(set_bumped_anim);
    efc.new_event(MobEvent::AnimationEnd);
    efc.change_state("idling");
    efc.new_event(MobEvent::TouchedObject);
    efc.run(on_touched);

    install(mob_type, efc, "falling", DropState::COUNT)
}

fn set_falling_anim(world: &mut World, mob: Entity, _: &EventInfo, _: &EventInfo) {
    set_animation(world, mob, "falling", StartAnimOption::Normal, false);
}

fn set_landing_anim(world: &mut World, mob: Entity, _: &EventInfo, _: &EventInfo) {
    set_animation(world, mob, "landing", StartAnimOption::Normal, false);
}

fn set_idling_anim(world: &mut World, mob: Entity, _: &EventInfo, _: &EventInfo) {
    set_animation(world, mob, "idling", StartAnimOption::NoRestart, true);
}

fn set_bumped_anim(world: &mut World, mob: Entity, _: &EventInfo, _: &EventInfo) {
    set_animation(world, mob, "bumped", StartAnimOption::Normal, false);
}

/// Whether `toucher` would get anything out of drinking `drop_type`.
fn can_drink(world: &World, drop_type: &MobType, toucher: Entity) -> bool {
    let Some(props) = drop_type.drop_props() else {
        return false;
    };
    match (props.consumer, category_of(world, toucher)) {
        (DropConsumer::Pikmin, Some(MobCategoryId::Pikmin)) => match props.effect {
            DropEffect::Maturate => world
                .get::<Pikmin>(toucher)
                .is_some_and(|p| p.maturity < tuning(world).max_pikmin_maturity),
            DropEffect::GiveStatus => true,
            DropEffect::IncreaseSprays => false,
        },
        (DropConsumer::Leaders, Some(MobCategoryId::Leaders)) => match props.effect {
            DropEffect::IncreaseSprays | DropEffect::GiveStatus => true,
            DropEffect::Maturate => false,
        },
        _ => false,
    }
}

/// Something touched the drop. `info1` holds the toucher.
pub fn on_touched(world: &mut World, mob: Entity, info1: &EventInfo, _: &EventInfo) {
    let Some(toucher) = info1.mob() else {
        return;
    };
    let Some(doses_left) = world.get::<DropInfo>(mob).map(|d| d.doses_left) else {
        return;
    };
    if doses_left == 0 {
        return;
    }
    let Some(drop_type) = world.get::<Mob>(mob).map(|m| m.mob_type.clone()) else {
        return;
    };

    let will_drink = can_drink(world, &drop_type, toucher);

    if will_drink && has_event_handler(world, toucher, MobEvent::TouchedDrop) {
        raise_event(
            world,
            toucher,
            MobEvent::TouchedDrop,
            &EventInfo::Mob(mob),
            &EventInfo::None,
        );
        if let Some(mut info) = world.get_mut::<DropInfo>(mob) {
            info.doses_left = info.doses_left.saturating_sub(1);
        }
        return;
    }

    let bumps = matches!(
        category_of(world, toucher),
        Some(MobCategoryId::Pikmin) | Some(MobCategoryId::Leaders)
    );
    let Some(bumped) = drop_type.state_index("bumped") else {
        return;
    };
    let already_bumped = world.get::<MobFsm>(mob).is_some_and(|f| f.cur_state == bumped);
    if bumps && !already_bumped {
        set_state(world, mob, bumped, info1, &EventInfo::None);
    }
}
