//! The logic frame schedule.
use bevy_ecs::prelude::*;

use crate::systems::deletion::delete_marked_mobs;
use crate::systems::interactions::process_mob_interactions;
use crate::systems::mobtick::tick_mobs;

/// Mob logic, then touches, then deletions. Time is advanced by the caller
/// with [`crate::systems::time::update_world_time`] before running it.
pub fn build_logic_schedule() -> Schedule {
    let mut update = Schedule::default();
    update.add_systems(tick_mobs);
    update.add_systems(process_mob_interactions.after(tick_mobs));
    update.add_systems(delete_marked_mobs.after(process_mob_interactions));
    update
}
