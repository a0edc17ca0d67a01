//! ECS resources made available to systems.
//!
//! Overview
//! - `areainfo` – the area being played (delivery point) and the score
//! - `gameconfig` – settings loaded from `config.ini`
//! - `moblist` – authoritative ordered list of live mobs
//! - `worldtime` – simulation time and delta
pub mod areainfo;
pub mod gameconfig;
pub mod moblist;
pub mod worldtime;
