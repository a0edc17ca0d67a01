//! Touch detection between mobs.
//!
//! Pairs are collected first from a snapshot of the [`MobList`] and events
//! are raised afterwards, so the handlers can freely change the world. Two
//! mobs touch when their circles overlap (with a small tolerance) and their
//! vertical extents overlap. Mobs that have not entered their first state yet
//! touch nothing.
use bevy_ecs::prelude::*;

use crate::components::airborne::Airborne;
use crate::components::mapposition::MapPosition;
use crate::components::mob::{Mob, is_alive};
use crate::fsm::event::{EventInfo, MobEvent};
use crate::fsm::runtime::{MobFsm, raise_event};
use crate::math::Vec2;
use crate::mobs::mobtype::Team;
use crate::resources::gameconfig::tuning;
use crate::resources::moblist::MobList;

#[derive(Debug, Clone, Copy)]
struct Body {
    mob: Entity,
    pos: Vec2,
    radius: f32,
    z: f32,
    height: f32,
    team: Team,
}

impl Body {
    fn touches(&self, other: &Body, tolerance: f32) -> bool {
        let reach = self.radius + other.radius + tolerance;
        self.pos.distance(other.pos) <= reach
            && self.z <= other.z + other.height
            && other.z <= self.z + self.height
    }
}

fn body_of(world: &World, mob: Entity) -> Option<Body> {
    let m = world.get::<Mob>(mob)?;
    if m.to_delete || !world.get::<MobFsm>(mob).is_some_and(|f| f.entered) {
        return None;
    }
    Some(Body {
        mob,
        pos: world.get::<MapPosition>(mob)?.pos,
        radius: m.mob_type.radius,
        z: world.get::<Airborne>(mob).map(|a| a.z).unwrap_or(0.0),
        height: m.mob_type.height,
        team: m.team,
    })
}

/// Every touching pair, each listed once, in mob list order.
pub fn touching_pairs(world: &World) -> Vec<(Entity, Entity, bool)> {
    let tolerance = tuning(world).touch_tolerance;
    let Some(list) = world.get_resource::<MobList>() else {
        return Vec::new();
    };
    let bodies: Vec<Body> = list.iter().filter_map(|&m| body_of(world, m)).collect();

    let mut pairs = Vec::new();
    for (i, a) in bodies.iter().enumerate() {
        for b in &bodies[i + 1..] {
            if a.touches(b, tolerance) {
                pairs.push((a.mob, b.mob, a.team.is_opponent(b.team)));
            }
        }
    }
    pairs
}

/// Raises `TouchedObject` (and `TouchedOpponent` between opposing teams) on
/// both mobs of every touching pair. `info1` holds the other mob.
pub fn process_mob_interactions(world: &mut World) {
    for (a, b, opponents) in touching_pairs(world) {
        for (me, other) in [(a, b), (b, a)] {
            if !is_alive(world, me) || !is_alive(world, other) {
                continue;
            }
            let info = EventInfo::Mob(other);
            raise_event(world, me, MobEvent::TouchedObject, &info, &EventInfo::None);
            if opponents && is_alive(world, me) {
                raise_event(world, me, MobEvent::TouchedOpponent, &info, &EventInfo::None);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mobs::mobtype::{MobCategoryId, MobType};
    use std::sync::Arc;

    fn put_mob(world: &mut World, pos: Vec2, entered: bool) -> Entity {
        let mob_type = Arc::new(MobType::new(MobCategoryId::None));
        let mut fsm = MobFsm::new(0);
        fsm.entered = entered;
        let mob = world
            .spawn((Mob::new(mob_type), MapPosition::from(pos), fsm))
            .id();
        world.resource_mut::<MobList>().push(mob);
        mob
    }

    #[test]
    fn only_entered_mobs_touch() {
        let mut world = World::new();
        world.insert_resource(MobList::default());
        let a = put_mob(&mut world, Vec2::ZERO, true);
        let _fresh = put_mob(&mut world, Vec2::new(4.0, 0.0), false);
        let b = put_mob(&mut world, Vec2::new(10.0, 0.0), true);
        let _far = put_mob(&mut world, Vec2::new(500.0, 0.0), true);

        assert_eq!(touching_pairs(&world), vec![(a, b, false)]);
    }

    #[test]
    fn marked_mobs_touch_nothing() {
        let mut world = World::new();
        world.insert_resource(MobList::default());
        let a = put_mob(&mut world, Vec2::ZERO, true);
        put_mob(&mut world, Vec2::ZERO, true);
        assert_eq!(touching_pairs(&world).len(), 1);

        world.get_mut::<Mob>(a).unwrap().to_delete = true;
        assert!(touching_pairs(&world).is_empty());
    }
}
