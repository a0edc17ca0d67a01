//! Mob lifecycle events.
//!
//! [`MobDeletedEvent`] is triggered right before a mob is despawned. The
//! [`observe_mob_deleted`] observer scrubs every handle other mobs keep to
//! it, so no focus, carry list or holding slot outlives its target.
use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::trace;

use crate::components::carry::Carry;
use crate::components::focus::Focus;
use crate::components::holding::{HeldBy, Holding};
use crate::components::standingon::StandingOn;
use crate::mobs::pikmin::Pikmin;

/// A mob is about to be despawned.
#[derive(Event, Debug, Clone, Copy)]
pub struct MobDeletedEvent {
    pub mob: Entity,
}

/// Clears every reference to the deleted mob held by other mobs.
pub fn observe_mob_deleted(
    trigger: On<MobDeletedEvent>,
    mut focuses: Query<&mut Focus>,
    mut standing: Query<&mut StandingOn>,
    mut held_by: Query<&mut HeldBy>,
    mut holding: Query<&mut Holding>,
    mut pikmin: Query<&mut Pikmin>,
    mut carries: Query<&mut Carry>,
) {
    let gone = trigger.event().mob;
    trace!("scrubbing references to {:?}", gone);

    for mut focus in focuses.iter_mut() {
        if focus.target == Some(gone) {
            focus.target = None;
        }
    }
    for mut s in standing.iter_mut() {
        if s.target == Some(gone) {
            s.target = None;
        }
    }
    for mut h in held_by.iter_mut() {
        if h.holder == Some(gone) {
            h.holder = None;
        }
    }
    for mut h in holding.iter_mut() {
        if h.is_holding(gone) {
            h.remove(gone);
        }
    }
    for mut p in pikmin.iter_mut() {
        if p.carrying == Some(gone) {
            p.carrying = None;
        }
    }
    for mut c in carries.iter_mut() {
        c.carriers.retain(|e| *e != gone);
    }
}
