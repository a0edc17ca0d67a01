//! Per-mob FSM cursor and event dispatch.
//!
//! Every mob entity carries a [`MobFsm`] component pointing into the state list
//! of its type (the `Arc<MobType>` held by its [`Mob`] component). Dispatch is
//! synchronous: actions run right away with full `World` access, and a state
//! change fires the leave and enter hooks before returning.
//!
//! Cycles (an enter hook that changes state back to the state that is being
//! left, forever) are not detected. They are content authoring errors.
//!
//! # Related
//!
//! - [`crate::fsm::builder`] – builds the state lists dispatched here
//! - [`crate::systems::mobtick`] – raises the per-tick events

use arrayvec::ArrayVec;
use bevy_ecs::prelude::*;
use log::{trace, warn};
use std::sync::Arc;

use crate::components::mob::Mob;
use crate::fsm::event::{EventInfo, MobEvent};
use crate::fsm::state::{ActionCall, StateTarget};
use crate::mobs::mobtype::MobType;

/// Number of previous states remembered per mob.
pub const STATE_HISTORY_SIZE: usize = 3;

/// Live FSM cursor of a mob.
#[derive(Component, Debug, Clone)]
pub struct MobFsm {
    /// Index into the type's state list.
    pub cur_state: usize,
    /// Whether the current state's enter hook already ran.
    pub entered: bool,
    /// Names of the previous states, most recent first.
    pub prev_state_names: ArrayVec<String, STATE_HISTORY_SIZE>,
}

impl MobFsm {
    pub fn new(first_state: usize) -> Self {
        Self {
            cur_state: first_state,
            entered: false,
            prev_state_names: ArrayVec::new(),
        }
    }

    fn push_history(&mut self, name: String) {
        if self.prev_state_names.is_full() {
            self.prev_state_names.pop();
        }
        self.prev_state_names.insert(0, name);
    }
}

fn cursor(world: &World, mob: Entity) -> Option<(Arc<MobType>, usize, bool)> {
    let mob_type = world.get::<Mob>(mob)?.mob_type.clone();
    let fsm = world.get::<MobFsm>(mob)?;
    Some((mob_type, fsm.cur_state, fsm.entered))
}

/// Raises `event` on `mob`.
///
/// Runs the actions the current state binds to `event`, in order. A state
/// without a binding ignores the event. A `SetState` action ends the list.
pub fn raise_event(
    world: &mut World,
    mob: Entity,
    event: MobEvent,
    info1: &EventInfo,
    info2: &EventInfo,
) {
    let Some((mob_type, cur_state, _)) = cursor(world, mob) else {
        return;
    };
    let Some(binding) = mob_type
        .states
        .get(cur_state)
        .and_then(|s| s.get_binding(event))
    else {
        return;
    };

    trace!(
        "{} {:?}: {:?} in \"{}\"",
        mob_type.name, mob, event, mob_type.states[cur_state].name
    );

    for action in binding.actions.iter() {
        match action {
            ActionCall::Run(code) => code(world, mob, info1, info2),
            ActionCall::Script(script) => script.run(world, mob, info1, info2),
            ActionCall::SetState(target) => {
                match target {
                    StateTarget::Index(idx) => {
                        set_state(world, mob, *idx, info1, info2);
                    }
                    StateTarget::Named(name) => warn!(
                        "{}: state change to unresolved state \"{}\" ignored",
                        mob_type.name, name
                    ),
                }
                break;
            }
        }
    }
}

/// Raises `event` with empty info slots.
pub fn raise_simple(world: &mut World, mob: Entity, event: MobEvent) {
    raise_event(world, mob, event, &EventInfo::None, &EventInfo::None);
}

/// Changes the state of `mob` to `new_state`.
///
/// Switching to the state the mob is already in is a no-op. Otherwise the old
/// state's `OnLeave` runs, the old name goes into the history, the cursor
/// moves and the new state's `OnEnter` runs, all with the given infos.
///
/// Returns whether the state changed.
pub fn set_state(
    world: &mut World,
    mob: Entity,
    new_state: usize,
    info1: &EventInfo,
    info2: &EventInfo,
) -> bool {
    let Some((mob_type, cur_state, entered)) = cursor(world, mob) else {
        warn!("set_state on {:?}, which is not a mob", mob);
        return false;
    };
    if new_state >= mob_type.states.len() {
        warn!(
            "{} {:?}: state index {} out of range ({} states)",
            mob_type.name,
            mob,
            new_state,
            mob_type.states.len()
        );
        return false;
    }
    if entered && new_state == cur_state {
        return false;
    }

    if entered {
        raise_event(world, mob, MobEvent::OnLeave, info1, info2);
    }

    {
        let Some(mut fsm) = world.get_mut::<MobFsm>(mob) else {
            return false;
        };
        if entered {
            fsm.push_history(mob_type.states[cur_state].name.clone());
        }
        fsm.cur_state = new_state;
        fsm.entered = true;
    }

    trace!(
        "{} {:?}: -> \"{}\"",
        mob_type.name, mob, mob_type.states[new_state].name
    );

    raise_event(world, mob, MobEvent::OnEnter, info1, info2);
    true
}

/// Changes state by name. Unknown names are logged and ignored.
pub fn change_state_by_name(
    world: &mut World,
    mob: Entity,
    name: &str,
    info1: &EventInfo,
    info2: &EventInfo,
) -> bool {
    let Some(mob_type) = world.get::<Mob>(mob).map(|m| m.mob_type.clone()) else {
        return false;
    };
    match mob_type.state_index(name) {
        Some(idx) => set_state(world, mob, idx, info1, info2),
        None => {
            warn!("{}: no state called \"{}\"", mob_type.name, name);
            false
        }
    }
}

/// Runs the enter hook of the mob's starting state, once.
///
/// Returns `false` if the mob was already entered.
pub fn enter_initial_state(world: &mut World, mob: Entity) -> bool {
    match world.get_mut::<MobFsm>(mob) {
        Some(mut fsm) if !fsm.entered => fsm.entered = true,
        _ => return false,
    }
    raise_simple(world, mob, MobEvent::OnEnter);
    true
}

/// Whether the mob's current state binds `event`.
pub fn has_event_handler(world: &World, mob: Entity, event: MobEvent) -> bool {
    cursor(world, mob)
        .and_then(|(mob_type, cur, _)| mob_type.states.get(cur).map(|s| s.handles(event)))
        .unwrap_or(false)
}

pub fn current_state_name(world: &World, mob: Entity) -> Option<String> {
    let (mob_type, cur, _) = cursor(world, mob)?;
    mob_type.states.get(cur).map(|s| s.name.clone())
}

pub fn is_in_state(world: &World, mob: Entity, name: &str) -> bool {
    current_state_name(world, mob).is_some_and(|n| n == name)
}

/// Previous state names of `mob`, most recent first.
pub fn state_history(world: &World, mob: Entity) -> Vec<String> {
    world
        .get::<MobFsm>(mob)
        .map(|fsm| fsm.prev_state_names.iter().cloned().collect())
        .unwrap_or_default()
}
