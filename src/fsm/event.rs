//! Mob script events and their payloads.
//!
//! A [`MobEvent`] names something that happened to a mob. Every state of a mob
//! type may bind a list of actions to any event; the dispatcher looks bindings
//! up by equality, so new variants can be added here without touching
//! [`crate::fsm::runtime`].
//!
//! Each raise carries two [`EventInfo`] slots. What they hold depends on the
//! event, e.g. `TouchedObject` carries the toucher in slot 1, `WeightAdded`
//! carries the new total weight.

use bevy_ecs::prelude::Entity;

/// Kinds of script events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MobEvent {
    /// The state was entered.
    OnEnter,
    /// The state is being left.
    OnLeave,
    /// The game ticked a frame.
    OnTick,
    /// The mob finished spawning and got its first tick.
    OnReady,
    /// The current animation ended (or looped).
    AnimationEnd,
    /// The mob got damaged.
    Damage,
    /// The mob touched another object.
    TouchedObject,
    /// The mob touched a hostile object.
    TouchedOpponent,
    /// The mob touched a drop it can consume.
    TouchedDrop,
    /// The mob touched a track it can ride.
    TouchedTrack,
    /// The mob landed on the ground.
    Landed,
    /// The script timer reached zero.
    Timer,
    /// Health is zero.
    ZeroHealth,
    /// Another mob grabbed this one.
    Held,
    /// Another mob let go of this one.
    Released,
    /// A leader whistled this mob.
    Whistled,
    /// A leader threw this mob.
    Thrown,
    /// Another mob sent a message.
    ReceiveMessage,
    /// A mob landed on top of this (walkable) one.
    RiderAdded,
    /// A mob on top of this (walkable) one left.
    RiderRemoved,
    /// Weight on top of this mob went up.
    WeightAdded,
    /// Weight on top of this mob went down.
    WeightRemoved,
    /// A carrier joined.
    CarrierAdded,
    /// A carrier left.
    CarrierRemoved,
    /// There are enough carriers to move.
    CarryBeginMove,
    /// There are no longer enough carriers to move.
    CarryStopMove,
    /// The carried mob reached its delivery spot.
    CarryDelivered,
    /// The mob reached the point it was moving to.
    ReachedDestination,
    /// There is no way to reach the destination.
    PathBlocked,
    /// A task (like carrying) was finished.
    FinishedTask,
    /// The focused mob got deleted.
    FocusDied,
    /// A leader interacted with this mob.
    Interaction,
}

impl MobEvent {
    /// Parses the event name used in content scripts.
    ///
    /// Only events that make sense for content-authored scripts have a name;
    /// engine-internal ones (carry, whistle, ...) return `None`.
    pub fn from_script_name(name: &str) -> Option<MobEvent> {
        let event = match name {
            "on_enter" => MobEvent::OnEnter,
            "on_leave" => MobEvent::OnLeave,
            "on_tick" => MobEvent::OnTick,
            "on_ready" => MobEvent::OnReady,
            "on_animation_end" => MobEvent::AnimationEnd,
            "on_damage" => MobEvent::Damage,
            "on_touch_object" => MobEvent::TouchedObject,
            "on_touch_opponent" => MobEvent::TouchedOpponent,
            "on_land" => MobEvent::Landed,
            "on_timer" => MobEvent::Timer,
            "on_held" => MobEvent::Held,
            "on_released" => MobEvent::Released,
            "on_receive_message" => MobEvent::ReceiveMessage,
            "on_rider_added" => MobEvent::RiderAdded,
            "on_rider_removed" => MobEvent::RiderRemoved,
            "on_weight_added" => MobEvent::WeightAdded,
            "on_weight_removed" => MobEvent::WeightRemoved,
            "on_reach_destination" => MobEvent::ReachedDestination,
            "on_focus_died" => MobEvent::FocusDied,
            "on_interaction" => MobEvent::Interaction,
            "on_zero_health" => MobEvent::ZeroHealth,
            _ => return None,
        };
        Some(event)
    }
}

/// Payload slot of a raised event.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum EventInfo {
    #[default]
    None,
    /// Another mob involved in the event (toucher, drop, track, carrier...).
    Mob(Entity),
    /// A number (new weight, damage amount...).
    Amount(f32),
    /// A script message and its sender.
    Message { from: Entity, text: String },
}

impl EventInfo {
    pub fn mob(&self) -> Option<Entity> {
        match self {
            EventInfo::Mob(e) => Some(*e),
            EventInfo::Message { from, .. } => Some(*from),
            _ => None,
        }
    }

    pub fn amount(&self) -> Option<f32> {
        match self {
            EventInfo::Amount(a) => Some(*a),
            _ => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            EventInfo::Message { text, .. } => Some(text.as_str()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_names_parse() {
        assert_eq!(MobEvent::from_script_name("on_enter"), Some(MobEvent::OnEnter));
        assert_eq!(
            MobEvent::from_script_name("on_weight_added"),
            Some(MobEvent::WeightAdded)
        );
        assert_eq!(MobEvent::from_script_name("on_whatever"), None);
    }

    #[test]
    fn internal_events_have_no_script_name() {
        assert_eq!(MobEvent::from_script_name("on_carry_begin_move"), None);
    }

    #[test]
    fn info_accessors() {
        let mut world = bevy_ecs::world::World::new();
        let e = world.spawn_empty().id();
        assert_eq!(EventInfo::Mob(e).mob(), Some(e));
        assert_eq!(EventInfo::Amount(2.5).amount(), Some(2.5));
        assert_eq!(EventInfo::None.mob(), None);
        let msg = EventInfo::Message {
            from: e,
            text: "hi".into(),
        };
        assert_eq!(msg.message(), Some("hi"));
        assert_eq!(msg.mob(), Some(e));
    }
}
