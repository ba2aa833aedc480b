//! Void Space: a 2D arcade shoot-em-up.
//!
//! The library is the game core: entities, the motion model, the spawner,
//! collisions, scoring/leveling and the per-frame orchestrator.  Drawing,
//! sound and the status panel are reached through the traits in
//! [`services`]; the `void_space` binary supplies terminal implementations.

pub mod collision;
pub mod compute;
pub mod config;
pub mod entities;
pub mod error;
pub mod motion;
pub mod services;
pub mod sound;
pub mod spawn;
pub mod status;
