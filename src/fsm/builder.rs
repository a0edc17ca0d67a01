//! Declarative FSM construction.
//!
//! Built-in mob FSMs are written in Rust code, but they read almost like a
//! content script: one line per state, event or action.
//!
//! ```ignore
//! let mut efc = FsmBuilder::new("drop");
//! efc.new_state("idling", DropState::Idling as usize);
//! efc.new_event(MobEvent::OnEnter);
//! efc.run(set_idling_anim);
//! efc.new_event(MobEvent::TouchedObject);
//! efc.run(on_touched);
//! efc.new_state("bumped", DropState::Bumped as usize);
//! efc.new_event(MobEvent::AnimationEnd);
//! efc.change_state("idling");
//! let fsm = efc.finish("idling")?;
//! ```
//!
//! The builder is only used while mob types are being defined.

use crate::content::errors::ContentError;
use crate::fsm::event::MobEvent;
use crate::fsm::script::ScriptAction;
use crate::fsm::state::{
    ActionCall, ActionFn, EventBinding, StateDefinition, StateTarget, find_state_index,
};

/// Result of [`FsmBuilder::finish`].
#[derive(Debug, Clone, Default)]
pub struct CompiledFsm {
    pub states: Vec<StateDefinition>,
    pub first_state_idx: usize,
}

/// Fluent builder for a list of states.
pub struct FsmBuilder {
    type_name: String,
    states: Vec<StateDefinition>,
    cur_state: Option<usize>,
    cur_event: Option<usize>,
}

impl FsmBuilder {
    /// `type_name` only shows up in error reports.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            states: Vec::new(),
            cur_state: None,
            cur_event: None,
        }
    }

    /// Opens a new state. Any state or event being staged is closed.
    pub fn new_state(&mut self, name: impl Into<String>, id: usize) -> &mut Self {
        self.cur_event = None;
        self.states.push(StateDefinition::new(name, id));
        self.cur_state = Some(self.states.len() - 1);
        self
    }

    /// Opens a binding for `event` in the current state.
    ///
    /// Declaring the same event twice in one state continues the existing
    /// binding, so its actions keep declaration order.
    pub fn new_event(&mut self, event: MobEvent) -> &mut Self {
        let Some(state_idx) = self.cur_state else {
            log::error!(
                "FSM of \"{}\": event {:?} declared outside of a state",
                self.type_name,
                event
            );
            return self;
        };
        let state = &mut self.states[state_idx];
        let binding_idx = match state.bindings.iter().position(|b| b.event == event) {
            Some(idx) => idx,
            None => {
                state.bindings.push(EventBinding::new(event));
                state.bindings.len() - 1
            }
        };
        self.cur_event = Some(binding_idx);
        self
    }

    /// Adds an action that runs engine code.
    pub fn run(&mut self, code: ActionFn) -> &mut Self {
        self.push_action(ActionCall::Run(code))
    }

    /// Adds a content-authored action.
    pub fn run_script(&mut self, action: ScriptAction) -> &mut Self {
        self.push_action(ActionCall::Script(action))
    }

    /// Adds an action that changes to the state called `new_state`.
    pub fn change_state(&mut self, new_state: impl Into<String>) -> &mut Self {
        self.push_action(ActionCall::SetState(StateTarget::Named(new_state.into())))
    }

    fn push_action(&mut self, action: ActionCall) -> &mut Self {
        match (self.cur_state, self.cur_event) {
            (Some(s), Some(e)) => self.states[s].bindings[e].actions.push(action),
            _ => log::error!(
                "FSM of \"{}\": action declared outside of an event",
                self.type_name
            ),
        }
        self
    }

    /// Closes everything being staged and compiles the state list.
    ///
    /// States are sorted by id, every named state change is turned into an
    /// index, and the index of `initial_state` is returned alongside. All
    /// unresolved names are returned, not only the first one.
    pub fn finish(mut self, initial_state: &str) -> Result<CompiledFsm, Vec<ContentError>> {
        self.cur_event = None;
        self.cur_state = None;
        self.states.sort_by_key(|s| s.id);

        let names: Vec<String> = self.states.iter().map(|s| s.name.clone()).collect();
        let mut errors = Vec::new();

        for state in self.states.iter_mut() {
            for binding in state.bindings.iter_mut() {
                for action in binding.actions.iter_mut() {
                    let ActionCall::SetState(target) = action else {
                        continue;
                    };
                    let StateTarget::Named(target_name) = target else {
                        continue;
                    };
                    match names.iter().position(|n| n == target_name) {
                        Some(idx) => *target = StateTarget::Index(idx),
                        None => errors.push(ContentError::UnresolvedState {
                            type_name: self.type_name.clone(),
                            state: state.name.clone(),
                            target: target_name.clone(),
                        }),
                    }
                }
            }
        }

        let first_state_idx = match find_state_index(&self.states, initial_state) {
            Some(idx) => idx,
            None => {
                errors.push(ContentError::MissingInitialState {
                    type_name: self.type_name.clone(),
                    state: initial_state.to_string(),
                });
                0
            }
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(CompiledFsm {
            states: self.states,
            first_state_idx,
        })
    }
}

/// Checks a built-in FSM against the number of states its enum declares.
pub fn check_state_count(
    type_name: &str,
    states: &[StateDefinition],
    expected: usize,
) -> Result<(), ContentError> {
    if states.len() == expected {
        Ok(())
    } else {
        Err(ContentError::StateCountMismatch {
            type_name: type_name.to_string(),
            registered: states.len(),
            expected,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_ecs::prelude::{Entity, World};

    use crate::fsm::event::EventInfo;

    fn noop(_: &mut World, _: Entity, _: &EventInfo, _: &EventInfo) {}

    #[test]
    fn finish_resolves_names_and_sorts_by_id() {
        let mut efc = FsmBuilder::new("test");
        efc.new_state("second", 1);
        efc.new_event(MobEvent::Timer);
        efc.change_state("first");
        efc.new_state("first", 0);
        efc.new_event(MobEvent::OnEnter);
        efc.run(noop);
        efc.new_event(MobEvent::Landed);
        efc.change_state("second");

        let fsm = efc.finish("second").expect("valid fsm");
        assert_eq!(fsm.states[0].name, "first");
        assert_eq!(fsm.states[1].name, "second");
        assert_eq!(fsm.first_state_idx, 1);

        let landed = fsm.states[0].get_binding(MobEvent::Landed).unwrap();
        assert!(matches!(
            landed.actions[0],
            ActionCall::SetState(StateTarget::Index(1))
        ));
    }

    #[test]
    fn finish_reports_every_unresolved_name() {
        let mut efc = FsmBuilder::new("broken");
        efc.new_state("idling", 0);
        efc.new_event(MobEvent::Timer);
        efc.change_state("nowhere");
        efc.new_event(MobEvent::Landed);
        efc.change_state("also_nowhere");

        let errors = efc.finish("idling").unwrap_err();
        assert_eq!(errors.len(), 2);
        match &errors[0] {
            ContentError::UnresolvedState {
                type_name,
                state,
                target,
            } => {
                assert_eq!(type_name, "broken");
                assert_eq!(state, "idling");
                assert_eq!(target, "nowhere");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn finish_reports_missing_initial_state() {
        let mut efc = FsmBuilder::new("t");
        efc.new_state("idling", 0);
        let errors = efc.finish("walking").unwrap_err();
        assert!(matches!(errors[0], ContentError::MissingInitialState { .. }));
    }

    #[test]
    fn repeated_event_extends_binding() {
        let mut efc = FsmBuilder::new("t");
        efc.new_state("idling", 0);
        efc.new_event(MobEvent::OnEnter);
        efc.run(noop);
        efc.new_event(MobEvent::OnEnter);
        efc.run(noop);
        let fsm = efc.finish("idling").unwrap();
        assert_eq!(fsm.states[0].bindings.len(), 1);
        assert_eq!(fsm.states[0].bindings[0].actions.len(), 2);
    }

    #[test]
    fn state_count_mismatch_is_an_error() {
        let states = vec![StateDefinition::new("a", 0)];
        assert!(check_state_count("t", &states, 1).is_ok());
        assert!(matches!(
            check_state_count("t", &states, 2),
            Err(ContentError::StateCountMismatch {
                registered: 1,
                expected: 2,
                ..
            })
        ));
    }
}
