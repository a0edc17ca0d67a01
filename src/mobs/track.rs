//! Tracks: slides, zip lines and the like that carry riders along a list of
//! checkpoints.

use bevy_ecs::prelude::*;

use crate::components::mapposition::MapPosition;
use crate::components::mob::Mob;
use crate::content::datanode::PropReader;
use crate::content::errors::{ContentError, ErrorReporter};
use crate::fsm::event::MobEvent;
use crate::fsm::runtime::raise_simple;
use crate::fsms::track_fsm;
use crate::math::Vec2;
use crate::mobs::category::{CategoryInfo, CategoryStore, MobCategory};
use crate::mobs::mobtype::{CategoryProps, MobCategoryId, MobType};

/// Rider flags.
pub const TRACK_RIDER_PIKMIN: u8 = 1 << 0;
pub const TRACK_RIDER_LEADERS: u8 = 1 << 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackState {
    Idling,
}

impl TrackState {
    pub const COUNT: usize = 1;
}

/// Pose riders take while on the track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RidingPose {
    #[default]
    Stopped,
    Climbing,
    Sliding,
}

impl RidingPose {
    pub fn animation_name(self) -> &'static str {
        match self {
            RidingPose::Stopped => "riding",
            RidingPose::Climbing => "climbing",
            RidingPose::Sliding => "sliding",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrackProps {
    /// Which kinds of mob can ride, as `TRACK_RIDER_*` flags.
    pub riders: u8,
    pub riding_pose: RidingPose,
    pub cancellable_with_whistle: bool,
    pub ride_speed: f32,
    /// Points to travel through, relative to the track's position.
    pub checkpoints: Vec<Vec2>,
}

impl Default for TrackProps {
    fn default() -> Self {
        Self {
            riders: TRACK_RIDER_PIKMIN | TRACK_RIDER_LEADERS,
            riding_pose: RidingPose::Stopped,
            cancellable_with_whistle: false,
            ride_speed: 200.0,
            checkpoints: Vec::new(),
        }
    }
}

/// A mob riding a track.
#[derive(Component, Debug, Clone, Copy)]
pub struct TrackRide {
    pub track: Entity,
    /// Index of the checkpoint being moved to.
    pub next_checkpoint: usize,
}

pub struct TrackCategory {
    info: CategoryInfo,
    store: CategoryStore,
}

impl Default for TrackCategory {
    fn default() -> Self {
        Self {
            info: CategoryInfo {
                id: MobCategoryId::Tracks,
                name: "Track",
                plural_name: "Tracks",
                folder_name: "tracks",
            },
            store: CategoryStore::default(),
        }
    }
}

impl MobCategory for TrackCategory {
    fn info(&self) -> &CategoryInfo {
        &self.info
    }
    fn store(&self) -> &CategoryStore {
        &self.store
    }
    fn store_mut(&mut self) -> &mut CategoryStore {
        &mut self.store
    }

    fn create_type(&self) -> MobType {
        let mut mob_type = MobType::new(MobCategoryId::Tracks);
        mob_type.props = CategoryProps::Track(TrackProps::default());
        mob_type
    }

    fn create_fsm(&self, mob_type: &mut MobType) -> Result<(), Vec<ContentError>> {
        track_fsm::create_fsm(mob_type)
    }

    fn load_cat_properties(
        &self,
        node: &PropReader<'_>,
        mob_type: &mut MobType,
        errors: &mut ErrorReporter,
    ) {
        let mut props = TrackProps::default();

        if let Some(riders) = node.get("riders") {
            let names: Vec<String> = serde_json::from_value(riders.clone()).unwrap_or_else(|_| {
                errors.report(ContentError::InvalidValue {
                    source_name: node.source_name().to_string(),
                    field: "riders".to_string(),
                    value: riders.to_string(),
                });
                Vec::new()
            });
            props.riders = 0;
            for name in names {
                match name.as_str() {
                    "pikmin" => props.riders |= TRACK_RIDER_PIKMIN,
                    "leaders" => props.riders |= TRACK_RIDER_LEADERS,
                    other => errors.report(ContentError::InvalidValue {
                        source_name: node.source_name().to_string(),
                        field: "riders".to_string(),
                        value: other.to_string(),
                    }),
                }
            }
        }

        props.riding_pose = node.parse_str("riding_pose", props.riding_pose, errors, |s| match s {
            "stopped" => Some(RidingPose::Stopped),
            "climbing" => Some(RidingPose::Climbing),
            "sliding" => Some(RidingPose::Sliding),
            _ => None,
        });
        props.cancellable_with_whistle = node.bool(
            "cancellable_with_whistle",
            props.cancellable_with_whistle,
            errors,
        );
        props.ride_speed = node.f32("ride_speed", props.ride_speed, errors);
        props.checkpoints = node.points("checkpoints", errors);

        if props.checkpoints.len() < 2 {
            errors.report(ContentError::InvalidValue {
                source_name: node.source_name().to_string(),
                field: "checkpoints".to_string(),
                value: format!("{} points, need at least 2", props.checkpoints.len()),
            });
        }

        mob_type.props = CategoryProps::Track(props);
    }
}

/// Moves a rider along its track. Raises `ReachedDestination` on the rider
/// once it passes the last checkpoint, or if the track is gone.
pub fn tick_track_ride(world: &mut World, rider: Entity, dt: f32) {
    let Some(ride) = world.get::<TrackRide>(rider).copied() else {
        return;
    };
    let track_info = world.get::<Mob>(ride.track).and_then(|m| {
        let props = m.mob_type.track_props()?;
        let origin = world.get::<MapPosition>(ride.track)?.pos;
        Some((origin, props.ride_speed, props.checkpoints.clone()))
    });
    let Some((origin, ride_speed, checkpoints)) = track_info else {
        raise_simple(world, rider, MobEvent::ReachedDestination);
        return;
    };
    let Some(cur_pos) = world.get::<MapPosition>(rider).map(|p| p.pos) else {
        return;
    };

    let mut pos = cur_pos;
    let mut next = ride.next_checkpoint;
    let mut budget = ride_speed * dt;
    while next < checkpoints.len() {
        let target = origin + checkpoints[next];
        let dist = pos.distance(target);
        let (new_pos, reached) = pos.step_towards(target, budget);
        pos = new_pos;
        if !reached {
            break;
        }
        budget -= dist;
        next += 1;
    }

    if let Some(mut p) = world.get_mut::<MapPosition>(rider) {
        p.pos = pos;
    }
    if let Some(mut r) = world.get_mut::<TrackRide>(rider) {
        r.next_checkpoint = next;
    }
    if next >= checkpoints.len() {
        raise_simple(world, rider, MobEvent::ReachedDestination);
    }
}
