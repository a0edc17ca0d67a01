//! FSM builder and dispatcher integration tests.

use bevy_ecs::prelude::*;
use serde_json::json;
use std::sync::Arc;

use mobcore::components::mob::Mob;
use mobcore::content::errors::{ContentError, ErrorReporter};
use mobcore::fsm::builder::FsmBuilder;
use mobcore::fsm::event::{EventInfo, MobEvent};
use mobcore::fsm::runtime::{
    MobFsm, current_state_name, enter_initial_state, has_event_handler, raise_event,
    raise_simple, set_state, state_history,
};
use mobcore::fsm::script::{ScriptDef, compile_script};
use mobcore::mobs::category::{MobCategory, MobCategoryManager};
use mobcore::mobs::drop::DropState;
use mobcore::mobs::leader::LeaderState;
use mobcore::mobs::mobtype::{MobCategoryId, MobType};
use mobcore::mobs::pikmin::PikminState;
use mobcore::mobs::resource::ResourceState;
use mobcore::mobs::scale::ScaleState;
use mobcore::mobs::track::TrackState;

/// What the test actions saw, in order.
#[derive(Component, Default)]
struct Trace(Vec<&'static str>);

fn push(world: &mut World, mob: Entity, what: &'static str) {
    if let Some(mut t) = world.get_mut::<Trace>(mob) {
        t.0.push(what);
    }
}

fn enter_a(world: &mut World, mob: Entity, _: &EventInfo, _: &EventInfo) {
    push(world, mob, "enter a");
}
fn leave_a(world: &mut World, mob: Entity, _: &EventInfo, _: &EventInfo) {
    push(world, mob, "leave a");
}
fn enter_b(world: &mut World, mob: Entity, _: &EventInfo, _: &EventInfo) {
    push(world, mob, "enter b");
}
fn after_change(world: &mut World, mob: Entity, _: &EventInfo, _: &EventInfo) {
    push(world, mob, "after change");
}
fn record_amount(world: &mut World, mob: Entity, info1: &EventInfo, _: &EventInfo) {
    if info1.amount() == Some(3.0) {
        push(world, mob, "amount 3");
    }
}

/// Two states: "a" goes to "b" on `Timer`, "b" goes back on `Landed`.
fn two_state_type() -> Arc<MobType> {
    let mut efc = FsmBuilder::new("tester");
    efc.new_state("a", 0);
    efc.new_event(MobEvent::OnEnter);
    efc.run(enter_a);
    efc.new_event(MobEvent::OnLeave);
    efc.run(leave_a);
    efc.new_event(MobEvent::Timer);
    efc.change_state("b");
    efc.run(after_change);
    efc.new_event(MobEvent::Damage);
    efc.run(record_amount);

    efc.new_state("b", 1);
    efc.new_event(MobEvent::OnEnter);
    efc.run(enter_b);
    efc.new_event(MobEvent::Landed);
    efc.change_state("a");

    let mut mob_type = MobType::new(MobCategoryId::None);
    mob_type.name = "tester".to_string();
    mob_type.set_fsm(efc.finish("a").unwrap());
    Arc::new(mob_type)
}

fn spawn_tester(world: &mut World) -> Entity {
    let mob_type = two_state_type();
    world
        .spawn((
            MobFsm::new(mob_type.first_state_idx),
            Mob::new(mob_type),
            Trace::default(),
        ))
        .id()
}

fn trace(world: &World, mob: Entity) -> Vec<&'static str> {
    world.get::<Trace>(mob).unwrap().0.clone()
}

#[test]
fn initial_state_is_entered_once() {
    let mut world = World::new();
    let mob = spawn_tester(&mut world);

    assert!(enter_initial_state(&mut world, mob));
    assert!(!enter_initial_state(&mut world, mob));
    assert_eq!(trace(&world, mob), vec!["enter a"]);
    assert_eq!(current_state_name(&world, mob).as_deref(), Some("a"));
}

#[test]
fn unbound_event_is_a_no_op() {
    let mut world = World::new();
    let mob = spawn_tester(&mut world);
    enter_initial_state(&mut world, mob);

    assert!(!has_event_handler(&world, mob, MobEvent::Landed));
    raise_simple(&mut world, mob, MobEvent::Landed);
    raise_simple(&mut world, mob, MobEvent::Whistled);

    assert_eq!(trace(&world, mob), vec!["enter a"]);
    assert_eq!(current_state_name(&world, mob).as_deref(), Some("a"));
    assert!(state_history(&world, mob).is_empty());
}

#[test]
fn set_state_to_the_current_state_does_nothing() {
    let mut world = World::new();
    let mob = spawn_tester(&mut world);
    enter_initial_state(&mut world, mob);

    assert!(!set_state(&mut world, mob, 0, &EventInfo::None, &EventInfo::None));
    assert_eq!(trace(&world, mob), vec!["enter a"]);
    assert!(state_history(&world, mob).is_empty());
}

#[test]
fn state_change_leaves_then_enters_and_stops_the_action_list() {
    let mut world = World::new();
    let mob = spawn_tester(&mut world);
    enter_initial_state(&mut world, mob);

    raise_simple(&mut world, mob, MobEvent::Timer);

    assert_eq!(trace(&world, mob), vec!["enter a", "leave a", "enter b"]);
    assert_eq!(current_state_name(&world, mob).as_deref(), Some("b"));
    assert_eq!(state_history(&world, mob), vec!["a".to_string()]);

    raise_simple(&mut world, mob, MobEvent::Landed);
    assert_eq!(current_state_name(&world, mob).as_deref(), Some("a"));
    assert_eq!(state_history(&world, mob), vec!["b".to_string(), "a".to_string()]);
}

#[test]
fn event_info_reaches_the_actions() {
    let mut world = World::new();
    let mob = spawn_tester(&mut world);
    enter_initial_state(&mut world, mob);

    raise_event(
        &mut world,
        mob,
        MobEvent::Damage,
        &EventInfo::Amount(3.0),
        &EventInfo::None,
    );
    assert_eq!(trace(&world, mob), vec!["enter a", "amount 3"]);
}

#[test]
fn out_of_range_state_is_refused() {
    let mut world = World::new();
    let mob = spawn_tester(&mut world);
    enter_initial_state(&mut world, mob);

    assert!(!set_state(&mut world, mob, 7, &EventInfo::None, &EventInfo::None));
    assert_eq!(world.get::<MobFsm>(mob).unwrap().cur_state, 0);
}

#[test]
fn builtin_fsms_have_one_state_per_enum_variant() {
    let manager = MobCategoryManager::with_default_categories();
    let expected = [
        (MobCategoryId::Pikmin, PikminState::COUNT, "idling"),
        (MobCategoryId::Leaders, LeaderState::COUNT, "idling"),
        (MobCategoryId::Drops, DropState::COUNT, "falling"),
        (MobCategoryId::Tracks, TrackState::COUNT, "idling"),
        (MobCategoryId::Resources, ResourceState::COUNT, "idle_waiting"),
        (MobCategoryId::Scales, ScaleState::COUNT, "idling"),
    ];
    for (id, count, first) in expected {
        let category: &dyn MobCategory = manager.get(id).unwrap();
        let mut mob_type = category.create_type();
        mob_type.name = format!("{:?} test", id);
        category.create_fsm(&mut mob_type).unwrap();
        assert_eq!(mob_type.states.len(), count, "{:?}", id);
        assert_eq!(mob_type.states[mob_type.first_state_idx].name, first, "{:?}", id);
    }
}

#[test]
fn builtin_state_indices_match_their_enums() {
    let manager = MobCategoryManager::with_default_categories();

    let drops = manager.get(MobCategoryId::Drops).unwrap();
    let mut drop = drops.create_type();
    drops.create_fsm(&mut drop).unwrap();
    assert_eq!(drop.state_index("bumped"), Some(DropState::Bumped as usize));
    assert_eq!(drop.state_index("landing"), Some(DropState::Landing as usize));

    let resources = manager.get(MobCategoryId::Resources).unwrap();
    let mut pellet = resources.create_type();
    resources.create_fsm(&mut pellet).unwrap();
    assert_eq!(
        pellet.state_index("staying_after_delivery"),
        Some(ResourceState::StayingAfterDelivery as usize)
    );
    assert_eq!(pellet.state_index("idle_thrown"), Some(ResourceState::IdleThrown as usize));
}

#[test]
fn scripts_report_bad_entries_and_keep_the_rest() {
    let script: ScriptDef = serde_json::from_value(json!({
        "first_state": "idle",
        "states": [
            {
                "name": "idle",
                "events": [
                    { "event": "on_timer", "actions": [["set_state", "done"], ["explode"]] },
                    { "event": "on_sneeze", "actions": [["print", "achoo"]] },
                    { "event": "on_enter", "actions": [["set_timer", "soon"]] }
                ]
            },
            { "name": "done", "events": [] }
        ]
    }))
    .unwrap();

    let mut errors = ErrorReporter::new();
    let fsm = compile_script("tools/test", &script, &mut errors).unwrap();

    assert_eq!(fsm.states.len(), 2);
    let timer = fsm.states[0].get_binding(MobEvent::Timer).unwrap();
    assert_eq!(timer.actions.len(), 1);
    assert!(
        fsm.states[0]
            .get_binding(MobEvent::OnEnter)
            .is_some_and(|b| b.actions.is_empty())
    );
    assert_eq!(errors.len(), 3);
    assert!(errors.errors().iter().any(|e| matches!(e, ContentError::UnknownAction { .. })));
    assert!(errors.errors().iter().any(|e| matches!(e, ContentError::UnknownEvent { .. })));
    assert!(errors.errors().iter().any(|e| matches!(e, ContentError::BadActionArgs { .. })));
}

#[test]
fn scripts_with_unknown_targets_are_rejected() {
    let script: ScriptDef = serde_json::from_value(json!({
        "first_state": "idle",
        "states": [
            { "name": "idle", "events": [
                { "event": "on_timer", "actions": [["set_state", "nowhere"]] }
            ] }
        ]
    }))
    .unwrap();

    let mut errors = ErrorReporter::new();
    assert!(compile_script("tools/broken", &script, &mut errors).is_none());
    assert!(matches!(errors.errors()[0], ContentError::UnresolvedState { .. }));
}
