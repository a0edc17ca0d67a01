//! Content-authored FSMs.
//!
//! Mob types of scripted categories (tools, interactables) describe their
//! states in the `"script"` block of their content file:
//!
//! ```json
//! "script": {
//!     "first_state": "idling",
//!     "states": [
//!         { "name": "idling", "events": [
//!             { "event": "on_enter", "actions": [["set_animation", "idling"]] },
//!             { "event": "on_held", "actions": [["set_state", "held"]] }
//!         ]}
//!     ]
//! }
//! ```
//!
//! Each action is an array whose first element is the action name. Unknown
//! names and bad arguments are reported and the action is skipped; the rest of
//! the script still loads.

use bevy_ecs::prelude::{Entity, World};
use serde::Deserialize;
use serde_json::Value;

use crate::components::animation::{StartAnimOption, set_animation};
use crate::components::focus::Focus;
use crate::components::health::Health;
use crate::components::mob::Mob;
use crate::components::timer::ScriptTimer;
use crate::components::vars::Vars;
use crate::content::errors::{ContentError, ErrorReporter};
use crate::fsm::builder::{CompiledFsm, FsmBuilder};
use crate::fsm::event::{EventInfo, MobEvent};
use crate::fsm::runtime::raise_event;

#[derive(Debug, Clone, Deserialize)]
pub struct ScriptDef {
    pub first_state: String,
    #[serde(default)]
    pub states: Vec<ScriptStateDef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScriptStateDef {
    pub name: String,
    #[serde(default)]
    pub events: Vec<ScriptEventDef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScriptEventDef {
    pub event: String,
    #[serde(default)]
    pub actions: Vec<Vec<Value>>,
}

/// An action written in a content file.
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptAction {
    SetAnimation {
        name: String,
        option: StartAnimOption,
    },
    SetTimer(f32),
    SetVar {
        name: String,
        value: String,
    },
    AddHealth(f32),
    SetHealth(f32),
    /// Marks the mob for deletion.
    Delete,
    Print(String),
    /// Focuses on the mob carried by the event's first slot.
    FocusOnTrigger,
    SendMessageToFocus(String),
}

impl ScriptAction {
    pub fn run(&self, world: &mut World, mob: Entity, info1: &EventInfo, _info2: &EventInfo) {
        match self {
            ScriptAction::SetAnimation { name, option } => {
                set_animation(world, mob, name, *option, false);
            }
            ScriptAction::SetTimer(secs) => {
                if let Some(mut timer) = world.get_mut::<ScriptTimer>(mob) {
                    timer.start(*secs);
                }
            }
            ScriptAction::SetVar { name, value } => {
                if let Some(mut vars) = world.get_mut::<Vars>(mob) {
                    vars.set(name.clone(), value.clone());
                }
            }
            ScriptAction::AddHealth(amount) => {
                if let Some(mut health) = world.get_mut::<Health>(mob) {
                    let new_value = health.current + amount;
                    health.set(new_value);
                }
            }
            ScriptAction::SetHealth(amount) => {
                if let Some(mut health) = world.get_mut::<Health>(mob) {
                    health.set(*amount);
                }
            }
            ScriptAction::Delete => {
                if let Some(mut m) = world.get_mut::<Mob>(mob) {
                    m.to_delete = true;
                }
            }
            ScriptAction::Print(text) => {
                let type_name = world
                    .get::<Mob>(mob)
                    .map(|m| m.mob_type.name.clone())
                    .unwrap_or_default();
                log::info!("[{} {:?}] {}", type_name, mob, text);
            }
            ScriptAction::FocusOnTrigger => {
                if let (Some(target), Some(mut focus)) = (info1.mob(), world.get_mut::<Focus>(mob))
                {
                    focus.target = Some(target);
                }
            }
            ScriptAction::SendMessageToFocus(text) => {
                let Some(target) = world.get::<Focus>(mob).and_then(|f| f.target) else {
                    return;
                };
                let message = EventInfo::Message {
                    from: mob,
                    text: text.clone(),
                };
                raise_event(
                    world,
                    target,
                    MobEvent::ReceiveMessage,
                    &message,
                    &EventInfo::None,
                );
            }
        }
    }
}

/// A parsed action line: either a state change or a plain action.
enum ParsedAction {
    SetState(String),
    Action(ScriptAction),
}

fn arg_str<'a>(args: &'a [Value], idx: usize) -> Option<&'a str> {
    args.get(idx).and_then(Value::as_str)
}

fn arg_f32(args: &[Value], idx: usize) -> Option<f32> {
    match args.get(idx)? {
        Value::Number(n) => n.as_f64().map(|v| v as f32),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn arg_to_string(args: &[Value], idx: usize) -> Option<String> {
    match args.get(idx)? {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

fn parse_action(source_name: &str, line: &[Value]) -> Result<ParsedAction, ContentError> {
    let Some(name) = arg_str(line, 0) else {
        return Err(ContentError::BadActionArgs {
            source_name: source_name.to_string(),
            action: String::new(),
            reason: "the first element must be the action name".to_string(),
        });
    };
    let bad_args = |reason: &str| ContentError::BadActionArgs {
        source_name: source_name.to_string(),
        action: name.to_string(),
        reason: reason.to_string(),
    };

    let action = match name {
        "set_state" => {
            let target = arg_str(line, 1).ok_or_else(|| bad_args("missing state name"))?;
            return Ok(ParsedAction::SetState(target.to_string()));
        }
        "set_animation" => {
            let anim = arg_str(line, 1).ok_or_else(|| bad_args("missing animation name"))?;
            let option = match arg_str(line, 2) {
                None => StartAnimOption::Normal,
                Some("no_restart") => StartAnimOption::NoRestart,
                Some("random_time") => StartAnimOption::RandomTime,
                Some(_) => return Err(bad_args("unknown start option")),
            };
            ScriptAction::SetAnimation {
                name: anim.to_string(),
                option,
            }
        }
        "set_timer" => ScriptAction::SetTimer(
            arg_f32(line, 1).ok_or_else(|| bad_args("missing or non-numeric duration"))?,
        ),
        "set_var" => {
            let var = arg_str(line, 1).ok_or_else(|| bad_args("missing variable name"))?;
            let value = arg_to_string(line, 2).ok_or_else(|| bad_args("missing value"))?;
            ScriptAction::SetVar {
                name: var.to_string(),
                value,
            }
        }
        "add_health" => ScriptAction::AddHealth(
            arg_f32(line, 1).ok_or_else(|| bad_args("missing or non-numeric amount"))?,
        ),
        "set_health" => ScriptAction::SetHealth(
            arg_f32(line, 1).ok_or_else(|| bad_args("missing or non-numeric amount"))?,
        ),
        "delete" => ScriptAction::Delete,
        "print" => ScriptAction::Print(
            line[1..]
                .iter()
                .map(|v| match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(" "),
        ),
        "focus" => ScriptAction::FocusOnTrigger,
        "send_message_to_focus" => ScriptAction::SendMessageToFocus(
            arg_to_string(line, 1).ok_or_else(|| bad_args("missing message"))?,
        ),
        _ => {
            return Err(ContentError::UnknownAction {
                source_name: source_name.to_string(),
                name: name.to_string(),
            });
        }
    };
    Ok(ParsedAction::Action(action))
}

/// Compiles a content script into a state list.
///
/// Returns `None` when the script cannot be used at all (unresolved state
/// names, missing first state); every problem is sent to `errors`.
pub fn compile_script(
    source_name: &str,
    script: &ScriptDef,
    errors: &mut ErrorReporter,
) -> Option<CompiledFsm> {
    let mut efc = FsmBuilder::new(source_name);

    for (id, state) in script.states.iter().enumerate() {
        efc.new_state(state.name.clone(), id);
        for event_def in &state.events {
            let Some(event) = MobEvent::from_script_name(&event_def.event) else {
                errors.report(ContentError::UnknownEvent {
                    source_name: source_name.to_string(),
                    name: event_def.event.clone(),
                });
                continue;
            };
            efc.new_event(event);
            for line in &event_def.actions {
                match parse_action(source_name, line) {
                    Ok(ParsedAction::SetState(target)) => {
                        efc.change_state(target);
                    }
                    Ok(ParsedAction::Action(action)) => {
                        efc.run_script(action);
                    }
                    Err(e) => errors.report(e),
                }
            }
        }
    }

    match efc.finish(&script.first_state) {
        Ok(fsm) => Some(fsm),
        Err(found) => {
            for e in found {
                errors.report(e);
            }
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fsm::state::{ActionCall, StateTarget};
    use serde_json::json;

    fn script(value: Value) -> ScriptDef {
        serde_json::from_value(value).expect("valid script json")
    }

    #[test]
    fn compiles_states_and_actions() {
        let def = script(json!({
            "first_state": "idling",
            "states": [
                { "name": "idling", "events": [
                    { "event": "on_enter", "actions": [["set_animation", "idling"], ["set_timer", 2]] },
                    { "event": "on_timer", "actions": [["set_state", "active"]] }
                ]},
                { "name": "active", "events": [
                    { "event": "on_enter", "actions": [["set_var", "hits", 3]] }
                ]}
            ]
        }));
        let mut errors = ErrorReporter::new();
        let fsm = compile_script("tools/bomb", &def, &mut errors).expect("compiles");
        assert!(errors.is_empty());
        assert_eq!(fsm.states.len(), 2);
        assert_eq!(fsm.first_state_idx, 0);

        let on_enter = fsm.states[0].get_binding(MobEvent::OnEnter).unwrap();
        assert_eq!(on_enter.actions.len(), 2);
        assert!(matches!(
            &on_enter.actions[1],
            ActionCall::Script(ScriptAction::SetTimer(t)) if *t == 2.0
        ));

        let on_timer = fsm.states[0].get_binding(MobEvent::Timer).unwrap();
        assert!(matches!(
            on_timer.actions[0],
            ActionCall::SetState(StateTarget::Index(1))
        ));

        let set_var = &fsm.states[1].get_binding(MobEvent::OnEnter).unwrap().actions[0];
        assert!(matches!(
            set_var,
            ActionCall::Script(ScriptAction::SetVar { name, value }) if name == "hits" && value == "3"
        ));
    }

    #[test]
    fn unknown_names_are_reported_and_skipped() {
        let def = script(json!({
            "first_state": "idling",
            "states": [
                { "name": "idling", "events": [
                    { "event": "on_sneeze", "actions": [["delete"]] },
                    { "event": "on_enter", "actions": [["dance"], ["set_timer", "soon"], ["delete"]] }
                ]}
            ]
        }));
        let mut errors = ErrorReporter::new();
        let fsm = compile_script("tools/odd", &def, &mut errors).expect("still compiles");
        assert_eq!(errors.len(), 3);
        assert!(matches!(errors.errors()[0], ContentError::UnknownEvent { .. }));
        assert!(matches!(errors.errors()[1], ContentError::UnknownAction { .. }));
        assert!(matches!(errors.errors()[2], ContentError::BadActionArgs { .. }));

        let on_enter = fsm.states[0].get_binding(MobEvent::OnEnter).unwrap();
        assert_eq!(on_enter.actions.len(), 1);
        assert!(fsm.states[0].get_binding(MobEvent::OnTick).is_none());
    }

    #[test]
    fn unresolved_state_fails_the_script() {
        let def = script(json!({
            "first_state": "idling",
            "states": [
                { "name": "idling", "events": [
                    { "event": "on_timer", "actions": [["set_state", "exploding"]] }
                ]}
            ]
        }));
        let mut errors = ErrorReporter::new();
        assert!(compile_script("tools/bomb", &def, &mut errors).is_none());
        assert!(matches!(
            errors.errors()[0],
            ContentError::UnresolvedState { .. }
        ));
    }

    #[test]
    fn print_joins_arguments() {
        let line = vec![json!("print"), json!("hello"), json!(42)];
        match parse_action("t", &line) {
            Ok(ParsedAction::Action(ScriptAction::Print(text))) => assert_eq!(text, "hello 42"),
            _ => panic!("print did not parse"),
        }
    }
}
