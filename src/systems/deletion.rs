//! End-of-tick removal of mobs marked for deletion.
use bevy_ecs::prelude::*;
use log::{debug, trace, warn};

use crate::components::focus::Focus;
use crate::components::holding::HeldBy;
use crate::components::mob::{Mob, is_alive};
use crate::events::mob::MobDeletedEvent;
use crate::fsm::event::{EventInfo, MobEvent};
use crate::fsm::runtime::raise_event;
use crate::fsms::gen_mob_fsm::{release, release_all, release_carriers};
use crate::fsms::pikmin_fsm::stop_carrying;
use crate::mobs::category::MobCategoryManager;
use crate::resources::moblist::MobList;

/// Deletes every mob marked with `to_delete`, in mob list order. Mobs already
/// erased from their category (and so from the list) go last.
pub fn delete_marked_mobs(world: &mut World) {
    let mut marked: Vec<Entity> = match world.get_resource::<MobList>() {
        Some(list) => list
            .iter()
            .copied()
            .filter(|&m| world.get::<Mob>(m).is_some_and(|m| m.to_delete))
            .collect(),
        None => return,
    };
    let mut all_marked = world.query::<(Entity, &Mob)>();
    let erased: Vec<Entity> = all_marked
        .iter(world)
        .filter(|(e, m)| m.to_delete && !marked.contains(e))
        .map(|(e, _)| e)
        .collect();
    marked.extend(erased);
    for mob in marked {
        delete_mob(world, mob);
    }
}

/// Raises `FocusDied` on every other mob focused on `mob`, clearing their
/// focus first.
fn notify_watchers(world: &mut World, mob: Entity) {
    let mut focuses = world.query::<(Entity, &Focus)>();
    let watchers: Vec<Entity> = focuses
        .iter(world)
        .filter(|(e, f)| *e != mob && f.target == Some(mob))
        .map(|(e, _)| e)
        .collect();
    for watcher in watchers {
        if let Some(mut focus) = world.get_mut::<Focus>(watcher) {
            focus.target = None;
        }
        if is_alive(world, watcher) {
            trace!("{:?} lost its focus {:?}", watcher, mob);
            raise_event(world, watcher, MobEvent::FocusDied, &EventInfo::Mob(mob), &EventInfo::None);
        }
    }
}

/// Removes `mob` from the game: cuts its ties with other mobs (raising the
/// matching events on them), takes it out of its category's index and the
/// mob list, then despawns it.
pub fn delete_mob(world: &mut World, mob: Entity) -> bool {
    let Some(mob_type) = world.get::<Mob>(mob).map(|m| m.mob_type.clone()) else {
        warn!("delete of {:?}, which is not a mob", mob);
        return false;
    };

    notify_watchers(world, mob);
    release_carriers(world, mob);
    stop_carrying(world, mob, &EventInfo::None, &EventInfo::None);
    if let Some(holder) = world.get::<HeldBy>(mob).and_then(|h| h.holder) {
        release(world, holder, mob);
    }
    release_all(world, mob);

    if let Some(mut manager) = world.get_resource_mut::<MobCategoryManager>() {
        if let Some(category) = manager.get_mut(mob_type.category) {
            category.store_mut().forget(mob);
        }
    }
    if let Some(mut list) = world.get_resource_mut::<MobList>() {
        list.remove(mob);
    }

    world.trigger(MobDeletedEvent { mob });
    world.flush();
    debug!("Deleted \"{}\" {:?}", mob_type.name, mob);
    world.despawn(mob)
}
