//! Whole-session scenarios: content built from JSON nodes, mobs spawned into
//! a `GameplaySession`, and logic frames run until something happens.

use bevy_ecs::prelude::*;
use serde_json::json;

use mobcore::components::carry::Carry;
use mobcore::components::focus::Focus;
use mobcore::components::holding::Holding;
use mobcore::components::mapposition::MapPosition;
use mobcore::components::movetarget::MoveTarget;
use mobcore::components::vars::Vars;
use mobcore::fsm::runtime::{is_in_state, state_history};
use mobcore::gameplay::GameplaySession;
use mobcore::math::Vec2;
use mobcore::mobs::drop::{DrinkingFrom, DropInfo};
use mobcore::mobs::leader::{Leader, interact, throw_pikmin, whistle};
use mobcore::mobs::mobtype::MobCategoryId;
use mobcore::mobs::pikmin::Pikmin;
use mobcore::mobs::scale::ScaleInfo;
use mobcore::mobs::track::TrackRide;
use mobcore::resources::areainfo::AreaInfo;
use mobcore::resources::gameconfig::GameConfig;

fn new_session() -> GameplaySession {
    GameplaySession::new(GameConfig::new())
}

/// Ticks until `cond` holds, at most `max` times. Returns whether it held.
fn tick_until(
    session: &mut GameplaySession,
    max: usize,
    cond: impl Fn(&GameplaySession) -> bool,
) -> bool {
    for _ in 0..max {
        if cond(session) {
            return true;
        }
        session.tick();
    }
    cond(session)
}

fn in_state(session: &GameplaySession, mob: Entity, name: &str) -> bool {
    is_in_state(&session.world, mob, name)
}

fn move_to(session: &mut GameplaySession, mob: Entity, x: f32, y: f32) {
    session.world.get_mut::<MapPosition>(mob).unwrap().pos = Vec2::new(x, y);
}

fn spawn(session: &mut GameplaySession, cat: MobCategoryId, name: &str, x: f32, y: f32) -> Entity {
    let mob_type = session.get_type(cat, name).unwrap();
    session.spawn(mob_type, Vec2::new(x, y), 0.0).unwrap()
}

fn add_red_pikmin(session: &mut GameplaySession) {
    session
        .register_type(
            MobCategoryId::Pikmin,
            "red",
            &json!({ "animations": { "drinking": { "duration": 0.5 } } }),
        )
        .unwrap();
}

#[test]
fn drop_falls_lands_is_drunk_and_bumped() {
    let mut s = new_session();
    add_red_pikmin(&mut s);
    s.register_type(
        MobCategoryId::Drops,
        "nectar",
        &json!({
            "total_doses": 3,
            "animations": {
                "landing": { "duration": 0.25 },
                "bumped": { "duration": 0.3 }
            }
        }),
    )
    .unwrap();

    let drop = spawn(&mut s, MobCategoryId::Drops, "nectar", 0.0, 0.0);
    let pik = spawn(&mut s, MobCategoryId::Pikmin, "red", 200.0, 0.0);

    assert!(tick_until(&mut s, 200, |s| in_state(s, drop, "idling")));
    assert_eq!(
        state_history(&s.world, drop),
        vec!["landing".to_string(), "falling".to_string()]
    );
    assert_eq!(s.world.get::<DropInfo>(drop).unwrap().doses_left, 3);

    // An idle Pikmin walks into it and starts drinking.
    move_to(&mut s, pik, 0.0, 0.0);
    s.tick();
    assert!(in_state(&s, pik, "drinking"));
    assert!(in_state(&s, drop, "idling"));
    assert_eq!(s.world.get::<DropInfo>(drop).unwrap().doses_left, 2);

    // Busy drinking, it only bumps the drop.
    s.tick();
    assert!(in_state(&s, drop, "bumped"));
    assert_eq!(s.world.get::<DropInfo>(drop).unwrap().doses_left, 2);

    move_to(&mut s, pik, 200.0, 0.0);
    assert!(tick_until(&mut s, 100, |s| in_state(s, drop, "idling")));
    assert_eq!(
        state_history(&s.world, drop),
        vec!["bumped".to_string(), "idling".to_string(), "landing".to_string()]
    );

    assert!(tick_until(&mut s, 100, |s| in_state(s, pik, "idling")));
    assert_eq!(s.world.get::<Pikmin>(pik).unwrap().maturity, 2);
    assert_eq!(s.world.get::<DropInfo>(drop).unwrap().doses_left, 2);
}

#[test]
fn drop_serves_every_dose_then_ignores_touches() {
    let mut s = new_session();
    add_red_pikmin(&mut s);
    s.register_type(
        MobCategoryId::Drops,
        "nectar",
        &json!({
            "total_doses": 3,
            "shrink_speed": 0.01,
            "animations": {
                "landing": { "duration": 0.25 },
                "bumped": { "duration": 0.3 }
            }
        }),
    )
    .unwrap();

    let drop = spawn(&mut s, MobCategoryId::Drops, "nectar", 0.0, 0.0);
    let homes = [(200.0, 0.0), (0.0, 200.0), (0.0, -200.0), (-200.0, 0.0)];
    let piks: Vec<Entity> = homes
        .iter()
        .map(|&(x, y)| spawn(&mut s, MobCategoryId::Pikmin, "red", x, y))
        .collect();
    assert!(tick_until(&mut s, 200, |s| in_state(s, drop, "idling")));

    // The first drinker lingers and bumps the drop.
    move_to(&mut s, piks[0], 0.0, 0.0);
    s.tick();
    assert!(in_state(&s, piks[0], "drinking"));
    assert_eq!(s.world.get::<DropInfo>(drop).unwrap().doses_left, 2);
    s.tick();
    assert!(in_state(&s, drop, "bumped"));
    move_to(&mut s, piks[0], homes[0].0, homes[0].1);
    assert!(tick_until(&mut s, 100, |s| in_state(s, drop, "idling")));
    assert_eq!(
        state_history(&s.world, drop),
        vec!["bumped".to_string(), "idling".to_string(), "landing".to_string()]
    );

    // The next two each take a dose.
    for (i, left) in [(1, 1), (2, 0)] {
        move_to(&mut s, piks[i], 0.0, 0.0);
        s.tick();
        assert!(in_state(&s, piks[i], "drinking"));
        assert_eq!(s.world.get::<DropInfo>(drop).unwrap().doses_left, left);
        move_to(&mut s, piks[i], homes[i].0, homes[i].1);
    }

    // An empty drop neither serves nor gets bumped.
    move_to(&mut s, piks[3], 0.0, 0.0);
    s.tick();
    assert!(in_state(&s, piks[3], "idling"));
    assert!(in_state(&s, drop, "idling"));
    assert!(s.world.get::<DrinkingFrom>(piks[3]).is_none());
    assert_eq!(s.world.get::<DropInfo>(drop).unwrap().doses_left, 0);
    s.tick();
    assert_eq!(s.world.get::<DropInfo>(drop).unwrap().doses_left, 0);
    assert!(s.is_mob(drop));

    assert!(tick_until(&mut s, 100, |s| piks[..3]
        .iter()
        .all(|&p| in_state(s, p, "idling"))));
    for &p in &piks[..3] {
        assert_eq!(s.world.get::<Pikmin>(p).unwrap().maturity, 2);
    }
    assert_eq!(s.world.get::<Pikmin>(piks[3]).unwrap().maturity, 0);
}

#[test]
fn empty_drop_shrinks_away_but_the_drink_still_counts() {
    let mut s = new_session();
    add_red_pikmin(&mut s);
    s.register_type(
        MobCategoryId::Drops,
        "nectar",
        &json!({ "total_doses": 1, "increase_amount": 1, "shrink_speed": 20.0 }),
    )
    .unwrap();

    let drop = spawn(&mut s, MobCategoryId::Drops, "nectar", 0.0, 0.0);
    let pik = spawn(&mut s, MobCategoryId::Pikmin, "red", 0.0, 0.0);

    assert!(tick_until(&mut s, 200, |s| !s.is_mob(drop)));
    assert_eq!(s.mob_count(MobCategoryId::Drops), 0);
    assert!(tick_until(&mut s, 100, |s| in_state(s, pik, "idling")));
    assert_eq!(s.world.get::<Pikmin>(pik).unwrap().maturity, 1);
}

#[test]
fn spray_drops_only_serve_leaders() {
    let mut s = new_session();
    add_red_pikmin(&mut s);
    s.register_type(MobCategoryId::Leaders, "olimar", &json!({})).unwrap();
    s.register_type(
        MobCategoryId::Drops,
        "spicy",
        &json!({
            "consumer": "leaders",
            "effect": "increase_sprays",
            "spray_to_increase": "spicy",
            "increase_amount": 1,
            "total_doses": 1
        }),
    )
    .unwrap();

    let drop = spawn(&mut s, MobCategoryId::Drops, "spicy", 0.0, 0.0);
    let pik = spawn(&mut s, MobCategoryId::Pikmin, "red", 0.0, 5.0);
    let olimar = spawn(&mut s, MobCategoryId::Leaders, "olimar", 300.0, 0.0);

    assert!(tick_until(&mut s, 200, |s| in_state(s, drop, "idling") || in_state(s, drop, "bumped")));
    assert!(!in_state(&s, pik, "drinking"));
    assert_eq!(s.world.get::<DropInfo>(drop).unwrap().doses_left, 1);

    move_to(&mut s, pik, 300.0, 300.0);
    move_to(&mut s, olimar, 0.0, 0.0);
    assert!(tick_until(&mut s, 100, |s| in_state(s, olimar, "drinking")));
    assert!(tick_until(&mut s, 100, |s| in_state(s, olimar, "idling")));
    let sprays = &s.world.get::<Leader>(olimar).unwrap().sprays;
    assert_eq!(sprays.get("spicy"), Some(&1));
}

#[test]
fn track_only_takes_the_riders_it_allows() {
    let mut s = new_session();
    add_red_pikmin(&mut s);
    s.register_type(MobCategoryId::Leaders, "olimar", &json!({})).unwrap();
    s.register_type(
        MobCategoryId::Tracks,
        "slide",
        &json!({
            "radius": 12,
            "riders": ["pikmin"],
            "ride_speed": 200,
            "checkpoints": [[0, 0], [0, 60], [40, 120]]
        }),
    )
    .unwrap();

    let track = spawn(&mut s, MobCategoryId::Tracks, "slide", 0.0, 0.0);
    let pik = spawn(&mut s, MobCategoryId::Pikmin, "red", 5.0, 0.0);
    let olimar = spawn(&mut s, MobCategoryId::Leaders, "olimar", -5.0, 0.0);

    s.tick();
    assert!(in_state(&s, pik, "riding_track"));
    assert_eq!(s.world.get::<TrackRide>(pik).unwrap().track, track);
    assert!(in_state(&s, olimar, "idling"));

    assert!(tick_until(&mut s, 200, |s| in_state(s, pik, "idling")));
    assert!(s.world.get::<TrackRide>(pik).is_none());
    assert_eq!(s.world.get::<MapPosition>(pik).unwrap().pos, Vec2::new(40.0, 120.0));
    assert_eq!(state_history(&s.world, pik)[0], "riding_track");
    assert!(state_history(&s.world, olimar).is_empty());
}

#[test]
fn carried_pellet_is_delivered_for_points() {
    let mut s = new_session();
    add_red_pikmin(&mut s);
    s.register_type(
        MobCategoryId::Resources,
        "pellet",
        &json!({ "weight": 1, "max_carriers": 1, "point_amount": 5, "move_speed": 120 }),
    )
    .unwrap();
    s.world.resource_mut::<AreaInfo>().delivery_point = Some(Vec2::new(-100.0, 0.0));

    let pellet = spawn(&mut s, MobCategoryId::Resources, "pellet", 20.0, 0.0);
    let pik = spawn(&mut s, MobCategoryId::Pikmin, "red", 5.0, 0.0);

    s.tick();
    assert!(in_state(&s, pik, "carrying"));
    assert!(in_state(&s, pellet, "idle_moving"));
    assert!(s.world.get::<Carry>(pellet).unwrap().has_carrier(pik));
    assert!(s.world.get::<MoveTarget>(pellet).is_some());

    assert!(tick_until(&mut s, 300, |s| in_state(s, pellet, "being_delivered")));
    assert!(in_state(&s, pik, "idling"));
    assert_eq!(s.world.get::<Pikmin>(pik).unwrap().carrying, None);
    assert_eq!(s.score(), 0);

    assert!(tick_until(&mut s, 300, |s| !s.is_mob(pellet)));
    assert_eq!(s.score(), 5);
    assert_eq!(s.mob_count(MobCategoryId::Resources), 0);
    assert_eq!(s.live_mobs(), vec![pik]);
}

#[test]
fn whistle_makes_carriers_let_go() {
    let mut s = new_session();
    add_red_pikmin(&mut s);
    s.register_type(MobCategoryId::Leaders, "olimar", &json!({})).unwrap();
    s.register_type(
        MobCategoryId::Resources,
        "pellet",
        &json!({ "weight": 1, "max_carriers": 1 }),
    )
    .unwrap();
    s.world.resource_mut::<AreaInfo>().delivery_point = Some(Vec2::new(-1000.0, 0.0));

    let pellet = spawn(&mut s, MobCategoryId::Resources, "pellet", 20.0, 0.0);
    let pik = spawn(&mut s, MobCategoryId::Pikmin, "red", 5.0, 0.0);
    let olimar = spawn(&mut s, MobCategoryId::Leaders, "olimar", 0.0, 60.0);

    s.tick();
    assert!(in_state(&s, pellet, "idle_moving"));

    assert_eq!(whistle(&mut s.world, olimar), 1);
    assert!(in_state(&s, pik, "idling"));
    assert!(in_state(&s, pellet, "idle_waiting"));
    let carry = s.world.get::<Carry>(pellet).unwrap();
    assert!(carry.carriers.is_empty());
    assert!(!carry.is_moving);
    assert!(s.world.get::<MoveTarget>(pellet).is_none());
}

#[test]
fn pellet_with_nowhere_to_go_gets_stuck() {
    let mut s = new_session();
    add_red_pikmin(&mut s);
    s.register_type(MobCategoryId::Resources, "pellet", &json!({})).unwrap();

    let pellet = spawn(&mut s, MobCategoryId::Resources, "pellet", 20.0, 0.0);
    spawn(&mut s, MobCategoryId::Pikmin, "red", 5.0, 0.0);

    s.tick();
    assert!(in_state(&s, pellet, "idle_stuck"));
    assert!(s.world.get::<MoveTarget>(pellet).is_none());
}

#[test]
fn scale_reaches_and_loses_its_goal() {
    let mut s = new_session();
    add_red_pikmin(&mut s);
    s.register_type(MobCategoryId::Scales, "plate", &json!({ "radius": 40, "goal_number": 2 }))
        .unwrap();

    let plate = spawn(&mut s, MobCategoryId::Scales, "plate", 0.0, 0.0);
    let a = spawn(&mut s, MobCategoryId::Pikmin, "red", 10.0, 0.0);
    spawn(&mut s, MobCategoryId::Pikmin, "red", -10.0, 0.0);

    s.tick();
    s.tick();
    assert!(in_state(&s, plate, "goal_reached"));
    assert_eq!(s.world.get::<ScaleInfo>(plate).unwrap().cur_weight, 2.0);

    move_to(&mut s, a, 500.0, 0.0);
    s.tick();
    s.tick();
    assert!(in_state(&s, plate, "idling"));
    assert_eq!(s.world.get::<ScaleInfo>(plate).unwrap().cur_weight, 1.0);
}

#[test]
fn thrown_pikmin_drops_its_tool_on_landing() {
    let mut s = new_session();
    add_red_pikmin(&mut s);
    s.register_type(MobCategoryId::Leaders, "olimar", &json!({})).unwrap();
    s.register_type(
        MobCategoryId::Tools,
        "bomb_rock",
        &json!({
            "radius": 4,
            "dropped_when_pikmin_lands": true,
            "animations": { "exploding": { "duration": 0.5 } },
            "script": {
                "first_state": "idling",
                "states": [
                    { "name": "idling", "events": [
                        { "event": "on_held", "actions": [["focus"], ["set_var", "held", true]] },
                        { "event": "on_released", "actions": [["set_state", "ticking"]] }
                    ] },
                    { "name": "ticking", "events": [
                        { "event": "on_enter", "actions": [["set_timer", 1.0]] },
                        { "event": "on_timer", "actions": [["set_state", "exploding"]] }
                    ] },
                    { "name": "exploding", "events": [
                        { "event": "on_enter", "actions": [["set_animation", "exploding"]] },
                        { "event": "on_animation_end", "actions": [["delete"]] }
                    ] }
                ]
            }
        }),
    )
    .unwrap();

    let olimar = spawn(&mut s, MobCategoryId::Leaders, "olimar", -200.0, 0.0);
    let pik = spawn(&mut s, MobCategoryId::Pikmin, "red", 0.0, 0.0);
    let rock = spawn(&mut s, MobCategoryId::Tools, "bomb_rock", 3.0, 0.0);

    s.tick();
    assert!(s.world.get::<Holding>(pik).unwrap().is_holding(rock));
    assert_eq!(s.world.get::<Vars>(rock).unwrap().get("held"), Some("true"));

    assert!(throw_pikmin(&mut s.world, olimar, pik, Vec2::new(60.0, 0.0)));
    assert!(in_state(&s, pik, "thrown"));
    assert!(tick_until(&mut s, 120, |s| in_state(s, rock, "ticking")));

    assert!(tick_until(&mut s, 300, |s| !s.is_mob(rock)));
    assert!(!s.world.get::<Holding>(pik).unwrap().is_holding(rock));
    assert_eq!(s.mob_count(MobCategoryId::Tools), 0);
}

#[test]
fn leader_interacts_with_the_nearest_interactable() {
    let mut s = new_session();
    s.register_type(MobCategoryId::Leaders, "olimar", &json!({})).unwrap();
    s.register_type(
        MobCategoryId::Interactables,
        "hatch",
        &json!({
            "radius": 20,
            "trigger_range": 40,
            "script": {
                "first_state": "closed",
                "states": [
                    { "name": "closed", "events": [
                        { "event": "on_interaction", "actions": [["focus"], ["send_message_to_focus", "opened"], ["set_state", "open"]] }
                    ] },
                    { "name": "open", "events": [
                        { "event": "on_enter", "actions": [["set_var", "open", 1]] }
                    ] }
                ]
            }
        }),
    )
    .unwrap();

    let olimar = spawn(&mut s, MobCategoryId::Leaders, "olimar", 0.0, 0.0);
    let hatch = spawn(&mut s, MobCategoryId::Interactables, "hatch", 0.0, 200.0);
    s.tick();

    assert_eq!(interact(&mut s.world, olimar), None);

    move_to(&mut s, olimar, 0.0, 150.0);
    assert_eq!(interact(&mut s.world, olimar), Some(hatch));
    assert!(in_state(&s, hatch, "open"));
    assert_eq!(s.world.get::<Vars>(hatch).unwrap().get("open"), Some("1"));
}

#[test]
fn content_folder_and_area_load_together() {
    let mut s = new_session();
    let loaded = s.load_content_from(std::path::Path::new("assets/content"));
    assert!(loaded >= 9, "loaded {} types", loaded);
    assert!(s.errors().is_empty(), "{:?}", s.errors());

    let spawned = s
        .load_area_file(std::path::Path::new("assets/areas/test_field.json"))
        .unwrap();
    assert_eq!(spawned.len(), s.live_mobs().len());
    assert_eq!(s.mob_count(MobCategoryId::Pikmin), 3);
    assert_eq!(
        s.world.resource::<AreaInfo>().delivery_point,
        Some(Vec2::new(-200.0, 0.0))
    );

    for _ in 0..120 {
        s.tick();
    }
    s.teardown();
    assert!(s.live_mobs().is_empty());
    assert!(s.get_type(MobCategoryId::Pikmin, "red").is_none());
}

fn add_watch_types(s: &mut GameplaySession, target_dies_by: &str) {
    s.register_type(
        MobCategoryId::Interactables,
        "watcher",
        &json!({
            "script": {
                "first_state": "watching",
                "states": [
                    { "name": "watching", "events": [
                        { "event": "on_touch_object", "actions": [["focus"]] },
                        { "event": "on_focus_died", "actions": [["set_var", "saw", "died"]] }
                    ] }
                ]
            }
        }),
    )
    .unwrap();
    s.register_type(
        MobCategoryId::Interactables,
        "target",
        &json!({
            "max_health": 10,
            "script": {
                "first_state": "waiting",
                "states": [
                    { "name": "waiting", "events": [
                        { "event": "on_enter", "actions": [["set_timer", 0.1]] },
                        { "event": "on_timer", "actions": [[target_dies_by, 0]] }
                    ] }
                ]
            }
        }),
    )
    .unwrap();
}

fn saw_died(s: &GameplaySession, watcher: Entity) -> bool {
    s.world.get::<Vars>(watcher).unwrap().get("saw") == Some("died")
}

#[test]
fn focus_death_is_seen_whatever_the_spawn_order() {
    for watcher_first in [false, true] {
        let mut s = new_session();
        add_watch_types(&mut s, "delete");

        let (watcher, target) = if watcher_first {
            let w = spawn(&mut s, MobCategoryId::Interactables, "watcher", 0.0, 0.0);
            (w, spawn(&mut s, MobCategoryId::Interactables, "target", 5.0, 0.0))
        } else {
            let t = spawn(&mut s, MobCategoryId::Interactables, "target", 5.0, 0.0);
            (spawn(&mut s, MobCategoryId::Interactables, "watcher", 0.0, 0.0), t)
        };

        s.tick();
        assert_eq!(s.world.get::<Focus>(watcher).unwrap().target, Some(target));
        assert!(!saw_died(&s, watcher));

        assert!(tick_until(&mut s, 60, |s| !s.is_mob(target)), "watcher_first={watcher_first}");
        assert!(saw_died(&s, watcher), "watcher_first={watcher_first}");
        assert_eq!(s.world.get::<Focus>(watcher).unwrap().target, None);
    }
}

#[test]
fn focus_dies_when_its_health_runs_out() {
    let mut s = new_session();
    add_watch_types(&mut s, "set_health");
    let watcher = spawn(&mut s, MobCategoryId::Interactables, "watcher", 0.0, 0.0);
    let target = spawn(&mut s, MobCategoryId::Interactables, "target", 5.0, 0.0);

    s.tick();
    assert_eq!(s.world.get::<Focus>(watcher).unwrap().target, Some(target));
    assert!(tick_until(&mut s, 60, |s| saw_died(s, watcher)));
    assert!(s.is_mob(target));
}
