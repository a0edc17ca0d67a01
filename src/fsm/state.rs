//! States, event bindings and actions.
//!
//! A [`StateDefinition`] is immutable once its mob type is built. It is shared
//! by every mob of that type through the type's `Arc`.

use bevy_ecs::prelude::{Entity, World};
use smallvec::SmallVec;
use std::fmt;

use crate::fsm::event::{EventInfo, MobEvent};
use crate::fsm::script::ScriptAction;

/// Behavior function run by an event binding.
///
/// # Parameters
///
/// - `&mut World` – full access to the simulation, so the action can mutate the
///   mob, change its state, or raise events on other mobs
/// - `Entity` – the mob running the action
/// - `&EventInfo` ×2 – the payload slots of the event being handled
pub type ActionFn = fn(&mut World, Entity, &EventInfo, &EventInfo);

/// Target of a state change.
///
/// Builders record names; `finish` turns every name into an index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateTarget {
    Named(String),
    Index(usize),
}

/// One step of an event binding.
#[derive(Clone)]
pub enum ActionCall {
    /// Engine code.
    Run(ActionFn),
    /// Change to another state. Ends the binding's action list.
    SetState(StateTarget),
    /// Content-authored action.
    Script(ScriptAction),
}

impl fmt::Debug for ActionCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionCall::Run(_) => f.write_str("Run(<fn>)"),
            ActionCall::SetState(target) => f.debug_tuple("SetState").field(target).finish(),
            ActionCall::Script(action) => f.debug_tuple("Script").field(action).finish(),
        }
    }
}

/// Actions to run when an event happens inside a state.
#[derive(Debug, Clone)]
pub struct EventBinding {
    pub event: MobEvent,
    pub actions: SmallVec<[ActionCall; 4]>,
}

impl EventBinding {
    pub fn new(event: MobEvent) -> Self {
        Self {
            event,
            actions: SmallVec::new(),
        }
    }
}

/// A state in a mob type's FSM.
#[derive(Debug, Clone)]
pub struct StateDefinition {
    pub name: String,
    pub id: usize,
    /// Bindings in declaration order. At most one per event.
    pub bindings: Vec<EventBinding>,
}

impl StateDefinition {
    pub fn new(name: impl Into<String>, id: usize) -> Self {
        Self {
            name: name.into(),
            id,
            bindings: Vec::new(),
        }
    }

    /// Returns the binding for `event`, if this state handles it.
    pub fn get_binding(&self, event: MobEvent) -> Option<&EventBinding> {
        self.bindings.iter().find(|b| b.event == event)
    }

    pub fn handles(&self, event: MobEvent) -> bool {
        self.get_binding(event).is_some()
    }
}

/// Index of the state called `name` in `states`.
pub fn find_state_index(states: &[StateDefinition], name: &str) -> Option<usize> {
    states.iter().position(|s| s.name == name)
}
