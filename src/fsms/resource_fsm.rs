//! Resource FSM: waiting for carriers, being carried, getting stuck, and the
//! delivery itself.

use bevy_ecs::prelude::*;
use log::{debug, warn};

use crate::components::animation::{StartAnimOption, set_animation};
use crate::components::focus::Focus;
use crate::components::health::Health;
use crate::components::movetarget::MoveTarget;
use crate::components::mob::{Mob, mark_for_deletion};
use crate::components::timer::ScriptTimer;
use crate::content::errors::ContentError;
use crate::fsm::builder::FsmBuilder;
use crate::fsm::event::{EventInfo, MobEvent};
use crate::fsm::runtime::{raise_event, set_state};
use crate::fsms::gen_mob_fsm;
use crate::fsms::install;
use crate::mobs::mobtype::MobType;
use crate::mobs::resource::{DeliveryResult, ResourceProps, ResourceState};
use crate::resources::areainfo::Score;

pub fn create_fsm(mob_type: &mut MobType) -> Result<(), Vec<ContentError>> {
    let mut efc = FsmBuilder::new(mob_type.name.clone());

    efc.new_state("idle_waiting", ResourceState::IdleWaiting as usize);
    efc.new_event(MobEvent::OnEnter);
    efc.run(start_waiting);
    efc.run(gen_mob_fsm::carry_stop_move);
    efc.new_event(MobEvent::CarrierAdded);
    efc.run(gen_mob_fsm::handle_carrier_added);
    efc.new_event(MobEvent::CarrierRemoved);
    efc.run(gen_mob_fsm::handle_carrier_removed);
    efc.new_event(MobEvent::CarryBeginMove);
    efc.run(gen_mob_fsm::carry_get_path);
    efc.change_state("idle_moving");
    efc.new_event(MobEvent::Landed);
    efc.run(gen_mob_fsm::lose_momentum);
    efc.new_event(MobEvent::Timer);
    efc.run(vanish);

    efc.new_state("idle_moving", ResourceState::IdleMoving as usize);
    efc.new_event(MobEvent::OnEnter);
    efc.run(handle_start_moving);
    efc.run(gen_mob_fsm::carry_begin_move);
    efc.new_event(MobEvent::CarrierAdded);
    efc.run(gen_mob_fsm::handle_carrier_added);
    efc.new_event(MobEvent::CarrierRemoved);
    efc.run(gen_mob_fsm::handle_carrier_removed);
    efc.new_event(MobEvent::CarryStopMove);
    efc.run(handle_dropped);
    efc.change_state("idle_waiting");
    efc.new_event(MobEvent::CarryBeginMove);
    efc.run(gen_mob_fsm::carry_get_path);
    efc.run(gen_mob_fsm::carry_begin_move);
    efc.new_event(MobEvent::ReachedDestination);
    efc.run(handle_reach_destination);
    efc.new_event(MobEvent::PathBlocked);
    efc.change_state("idle_stuck");
    efc.new_event(MobEvent::CarryDelivered);
    efc.change_state("being_delivered");

    efc.new_state("idle_stuck", ResourceState::IdleStuck as usize);
    efc.new_event(MobEvent::OnEnter);
    efc.run(gen_mob_fsm::carry_become_stuck);
    efc.new_event(MobEvent::CarrierAdded);
    efc.run(gen_mob_fsm::handle_carrier_added);
    efc.new_event(MobEvent::CarrierRemoved);
    efc.run(gen_mob_fsm::handle_carrier_removed);
    efc.new_event(MobEvent::CarryBeginMove);
    efc.run(gen_mob_fsm::carry_get_path);
    efc.change_state("idle_moving");
    efc.new_event(MobEvent::CarryStopMove);
    efc.run(handle_dropped);
    efc.change_state("idle_waiting");

    efc.new_state("idle_thrown", ResourceState::IdleThrown as usize);
    efc.new_event(MobEvent::Landed);
    efc.run(gen_mob_fsm::lose_momentum);
    efc.run(gen_mob_fsm::carry_get_path);
    efc.change_state("idle_moving");

    efc.new_state("being_delivered", ResourceState::BeingDelivered as usize);
    efc.new_event(MobEvent::OnEnter);
    efc.run(gen_mob_fsm::start_being_delivered);
    efc.new_event(MobEvent::Timer);
    efc.run(handle_delivery_result);
    efc.run(gen_mob_fsm::handle_delivery);

    efc.new_state(
        "staying_after_delivery",
        ResourceState::StayingAfterDelivery as usize,
    );
    efc.new_event(MobEvent::OnEnter);
    efc.run(start_waiting);
    efc.run(gen_mob_fsm::carry_stop_move);
    efc.new_event(MobEvent::CarrierAdded);
    efc.run(gen_mob_fsm::handle_carrier_added);
    efc.new_event(MobEvent::CarrierRemoved);
    efc.run(gen_mob_fsm::handle_carrier_removed);
    efc.new_event(MobEvent::CarryBeginMove);
    efc.run(gen_mob_fsm::carry_get_path);
    efc.change_state("idle_moving");
    efc.new_event(MobEvent::CarryStopMove);
    efc.run(handle_dropped);
    efc.change_state("idle_waiting");

    install(mob_type, efc, "idle_waiting", ResourceState::COUNT)
}

fn props_of(world: &World, mob: Entity) -> Option<ResourceProps> {
    world
        .get::<Mob>(mob)
        .and_then(|m| m.mob_type.resource_props().cloned())
}

fn start_waiting(world: &mut World, mob: Entity, _: &EventInfo, _: &EventInfo) {
    set_animation(world, mob, "idling", StartAnimOption::NoRestart, false);
}

/// Carried again: any pending vanish is off.
fn handle_start_moving(world: &mut World, mob: Entity, _: &EventInfo, _: &EventInfo) {
    if let Some(mut timer) = world.get_mut::<ScriptTimer>(mob) {
        timer.stop();
    }
}

/// Dropped by its carriers. Vanishing resources go away now or after their
/// delay.
fn handle_dropped(world: &mut World, mob: Entity, _: &EventInfo, _: &EventInfo) {
    let Some(props) = props_of(world, mob) else {
        return;
    };
    if !props.vanish_on_drop {
        return;
    }
    if props.vanish_delay <= 0.0 {
        mark_for_deletion(world, mob);
    } else if let Some(mut timer) = world.get_mut::<ScriptTimer>(mob) {
        timer.start(props.vanish_delay);
    }
}

fn vanish(world: &mut World, mob: Entity, _: &EventInfo, _: &EventInfo) {
    debug!("{:?} vanished", mob);
    mark_for_deletion(world, mob);
}

/// Arrived where it was being carried to.
fn handle_reach_destination(world: &mut World, mob: Entity, info1: &EventInfo, info2: &EventInfo) {
    let stays = props_of(world, mob).is_some_and(|p| p.delivery_result == DeliveryResult::Stay);
    if !stays {
        gen_mob_fsm::carry_reach_destination(world, mob, info1, info2);
        return;
    }
    if let Ok(mut entity) = world.get_entity_mut(mob) {
        entity.remove::<MoveTarget>();
    }
    gen_mob_fsm::release_carriers(world, mob);
    set_state(
        world,
        mob,
        ResourceState::StayingAfterDelivery as usize,
        info1,
        info2,
    );
}

/// Applies the delivery's reward.
fn handle_delivery_result(world: &mut World, mob: Entity, _: &EventInfo, _: &EventInfo) {
    let Some(props) = props_of(world, mob) else {
        return;
    };
    match props.delivery_result {
        DeliveryResult::AddPoints => match world.get_resource_mut::<Score>() {
            Some(mut score) => score.points += props.point_amount,
            None => warn!("no Score in the world, {} points lost", props.point_amount),
        },
        DeliveryResult::DamageMob => {
            let Some(target) = world.get::<Focus>(mob).and_then(|f| f.target) else {
                debug!("{:?} delivered with nothing to damage", mob);
                return;
            };
            if let Some(mut health) = world.get_mut::<Health>(target) {
                let new_health = health.current - props.damage_mob_amount;
                health.set(new_health);
            }
            raise_event(
                world,
                target,
                MobEvent::Damage,
                &EventInfo::Amount(props.damage_mob_amount),
                &EventInfo::Mob(mob),
            );
        }
        DeliveryResult::Stay => {}
    }
}
